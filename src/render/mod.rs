mod page;

use crate::artifact::{Artifact, DrawOp};
use crate::config::PageConfig;
use crate::error::Error;
use crate::linebreak::{VisualLine, break_runs};
use crate::metrics::{ASCENT_RATIO, MM_PER_PT, MetricProvider, line_height_mm};
use crate::model::{Alignment, Block, DocumentTree, FontFamily, Rgb};
use crate::resolve::{BlockDefaults, ResolvedRun, ResolvedStyle, resolve_runs};

use page::Paginator;

const EPS: f32 = 0.01;

/// Indent added per list nesting level and per blockquote.
const INDENT_STEP_MM: f32 = 6.0;

const BULLET_MARKER: &str = "\u{2022} ";

const CODE_SIZE_PT: f32 = 10.0;
const CODE_PAD_MM: f32 = 2.0;
const CODE_BG: Rgb = [240, 240, 240];
const CODE_FG: Rgb = [33, 37, 41];

const RULE_BLOCK_MM: f32 = 6.0;
const RULE_WIDTH_MM: f32 = 0.35;
const RULE_COLOR: Rgb = [180, 180, 180];

const QUOTE_BAR_WIDTH_MM: f32 = 0.8;
const QUOTE_BAR_COLOR: Rgb = [190, 200, 210];

// Fractions of the heading line height
const HEADING_SPACE_ABOVE: f32 = 0.5;
const HEADING_SPACE_BELOW: f32 = 0.25;

fn heading_size_pt(level: u8) -> f32 {
    match level {
        1 => 24.0,
        2 => 18.0,
        _ => 14.0,
    }
}

/// Inherited geometry and forced marks for the block being rendered.
#[derive(Clone, Copy)]
struct BlockCtx {
    indent_mm: f32,
    bold: bool,
    italic: bool,
}

impl BlockCtx {
    fn root() -> Self {
        Self {
            indent_mm: 0.0,
            bold: false,
            italic: false,
        }
    }

    fn indented(self) -> Self {
        Self {
            indent_mm: self.indent_mm + INDENT_STEP_MM,
            ..self
        }
    }
}

pub(crate) fn run(
    doc: &DocumentTree,
    cfg: &PageConfig,
    metrics: &dyn MetricProvider,
) -> Result<Artifact, Error> {
    cfg.validate()?;
    let mut renderer = Renderer {
        cfg,
        metrics,
        pager: Paginator::new(cfg),
    };
    let ctx = BlockCtx::root();
    let mut marker = None;
    for block in &doc.blocks {
        renderer.render_block(block, &ctx, &mut marker)?;
    }
    Ok(renderer.pager.into_artifact())
}

struct Renderer<'a> {
    cfg: &'a PageConfig,
    metrics: &'a dyn MetricProvider,
    pager: Paginator,
}

impl Renderer<'_> {
    fn origin_x(&self, ctx: &BlockCtx) -> f32 {
        self.cfg.margin_mm + ctx.indent_mm
    }

    fn avail_width(&self, ctx: &BlockCtx) -> f32 {
        // deep nesting narrows the column; never hand the breaker a
        // non-positive width
        (self.cfg.content_width_mm() - ctx.indent_mm).max(1.0)
    }

    fn body_defaults(&self, ctx: &BlockCtx) -> BlockDefaults {
        BlockDefaults {
            bold: ctx.bold,
            italic: ctx.italic,
            ..BlockDefaults::body()
        }
    }

    fn render_block(
        &mut self,
        block: &Block,
        ctx: &BlockCtx,
        marker: &mut Option<String>,
    ) -> Result<(), Error> {
        match block {
            Block::Heading {
                level,
                align,
                inline,
            } => self.render_heading(*level, *align, inline, ctx, marker),
            Block::Paragraph { align, inline } => {
                let defaults = self.body_defaults(ctx);
                let runs = resolve_runs(inline, &defaults);
                self.render_paragraph(&runs, *align, &defaults, ctx, marker)
            }
            Block::BulletList { items } => {
                for item in items {
                    let mut item_marker = Some(BULLET_MARKER.to_string());
                    self.render_block(item, ctx, &mut item_marker)?;
                }
                Ok(())
            }
            Block::OrderedList { items } => {
                // 1-based counter, reset per list
                for (i, item) in items.iter().enumerate() {
                    let mut item_marker = Some(format!("{}. ", i + 1));
                    self.render_block(item, ctx, &mut item_marker)?;
                }
                Ok(())
            }
            Block::ListItem { blocks } => {
                let inner = ctx.indented();
                for child in blocks {
                    self.render_block(child, &inner, marker)?;
                }
                Ok(())
            }
            Block::Blockquote { blocks } => self.render_blockquote(blocks, ctx, marker),
            Block::CodeBlock { text } => self.render_code_block(text, ctx),
            Block::HorizontalRule => {
                self.render_rule(ctx);
                Ok(())
            }
            Block::Other { children } => {
                // forward-compatible fallback: render what we recognize
                for child in children {
                    self.render_block(child, ctx, marker)?;
                }
                Ok(())
            }
        }
    }

    fn render_heading(
        &mut self,
        level: u8,
        align: Alignment,
        inline: &[crate::model::InlineRun],
        ctx: &BlockCtx,
        marker: &mut Option<String>,
    ) -> Result<(), Error> {
        let size = heading_size_pt(level);
        let defaults = BlockDefaults {
            family: FontFamily::Helvetica,
            size_pt: size,
            bold: true,
            italic: ctx.italic,
            color: [0, 0, 0],
        };
        let runs = resolve_runs(inline, &defaults);
        let line_h = line_height_mm(size, self.cfg.line_spacing);
        let lines = break_runs(
            &runs,
            self.avail_width(ctx),
            marker.take(),
            self.cfg.line_spacing,
            self.metrics,
        )?;

        if lines.is_empty() {
            self.pager.request_space(line_h);
            self.pager.advance(line_h);
            return Ok(());
        }

        let space_above = line_h * HEADING_SPACE_ABOVE;
        let space_below = line_h * HEADING_SPACE_BELOW;
        let text_h: f32 = lines.iter().map(|l| l.height_mm).sum();

        // A heading never splits across a page: reserve the whole of it
        // (plus its leading space) up front.
        let fits = self.pager.request_space(space_above + text_h + space_below);
        if !self.pager.at_page_top() {
            self.pager.advance(space_above);
        }
        for line in &lines {
            if !fits {
                // heading taller than an entire page; place line by line
                self.pager.request_space(line.height_mm);
            }
            self.draw_line(line, align, ctx);
        }
        self.pager.advance(space_below);
        Ok(())
    }

    fn render_paragraph(
        &mut self,
        runs: &[ResolvedRun],
        align: Alignment,
        defaults: &BlockDefaults,
        ctx: &BlockCtx,
        marker: &mut Option<String>,
    ) -> Result<(), Error> {
        let line_h = line_height_mm(defaults.size_pt, self.cfg.line_spacing);

        if runs.is_empty() {
            // an empty paragraph still consumes one blank line
            self.pager.request_space(line_h);
            if let Some(m) = marker.take() {
                let style = ResolvedStyle::from_defaults(defaults);
                let baseline = self.pager.y() + style.size_pt * ASCENT_RATIO * MM_PER_PT;
                self.push_text(self.origin_x(ctx), baseline, m, &style);
            }
            self.pager.advance(line_h);
            return Ok(());
        }

        let lines = break_runs(
            runs,
            self.avail_width(ctx),
            marker.take(),
            self.cfg.line_spacing,
            self.metrics,
        )?;
        for line in &lines {
            self.pager.request_space(line.height_mm);
            self.draw_line(line, align, ctx);
        }
        Ok(())
    }

    fn render_blockquote(
        &mut self,
        blocks: &[Block],
        ctx: &BlockCtx,
        marker: &mut Option<String>,
    ) -> Result<(), Error> {
        let start_page = self.pager.page_index();
        let start_y = self.pager.y();
        let ops_before = self.pager.ops_len(start_page);

        let inner = BlockCtx {
            italic: true,
            ..ctx.indented()
        };
        for child in blocks {
            self.render_block(child, &inner, marker)?;
        }

        let end_page = self.pager.page_index();
        let end_y = self.pager.y();

        // One rule segment per page the quote marked. A break taken
        // before the first line landed must not leave a bar on the page
        // the quote abandoned.
        let first_page = (start_page..=end_page).find(|&p| {
            self.pager.ops_len(p) > if p == start_page { ops_before } else { 0 }
        });
        let first_page = match first_page {
            Some(p) => p,
            // no instructions at all: blank content that only moved the
            // cursor still gets its bar, a bare page break does not
            None if end_page == start_page => start_page,
            None => return Ok(()),
        };

        let bar_x = self.origin_x(ctx) + QUOTE_BAR_WIDTH_MM / 2.0;
        for page in first_page..=end_page {
            let y0 = if page == start_page {
                start_y
            } else {
                self.pager.top()
            };
            let y1 = if page == end_page {
                end_y
            } else {
                self.pager.limit()
            };
            if y1 - y0 > EPS {
                self.pager.push_on(
                    page,
                    DrawOp::Line {
                        x1_mm: bar_x,
                        y1_mm: y0,
                        x2_mm: bar_x,
                        y2_mm: y1,
                        width_mm: QUOTE_BAR_WIDTH_MM,
                        color: QUOTE_BAR_COLOR,
                    },
                );
            }
        }
        Ok(())
    }

    fn render_code_block(&mut self, text: &str, ctx: &BlockCtx) -> Result<(), Error> {
        let style = ResolvedStyle {
            family: FontFamily::Courier,
            size_pt: CODE_SIZE_PT,
            color: CODE_FG,
            ..ResolvedStyle::plain()
        };
        let line_h = line_height_mm(CODE_SIZE_PT, self.cfg.line_spacing);
        let wrap_width = (self.avail_width(ctx) - 2.0 * CODE_PAD_MM).max(1.0);

        // Literal newlines are hard breaks; wrapping happens only within
        // a source line.
        let mut lines: Vec<VisualLine> = Vec::new();
        for source_line in text.split('\n') {
            if source_line.is_empty() {
                lines.push(VisualLine {
                    pieces: Vec::new(),
                    prefix: None,
                    width_mm: 0.0,
                    height_mm: line_h,
                });
            } else {
                let run = ResolvedRun {
                    text: source_line.to_string(),
                    style,
                };
                lines.extend(break_runs(
                    &[run],
                    wrap_width,
                    None,
                    self.cfg.line_spacing,
                    self.metrics,
                )?);
            }
        }
        if lines.is_empty() {
            lines.push(VisualLine {
                pieces: Vec::new(),
                prefix: None,
                width_mm: 0.0,
                height_mm: line_h,
            });
        }

        let total_h = 2.0 * CODE_PAD_MM + lines.len() as f32 * line_h;
        if self.pager.request_space(total_h) {
            self.draw_code_segment(&lines, ctx, true);
            return Ok(());
        }

        // Taller than a whole page: emit one background rectangle per
        // page segment so no single decoration spans a break.
        let mut idx = 0;
        while idx < lines.len() {
            let room = self.pager.limit() - self.pager.y();
            let remaining = lines.len() - idx;
            let fit_closed = ((room - 2.0 * CODE_PAD_MM) / line_h).floor() as isize;
            let fit_open = ((room - CODE_PAD_MM) / line_h).floor() as isize;

            if remaining as isize <= fit_closed {
                self.draw_code_segment(&lines[idx..], ctx, true);
                break;
            }
            let count = if fit_open >= 1 {
                fit_open as usize
            } else if self.pager.at_page_top() {
                // page too short for even one padded line; overflow one
                1
            } else {
                self.pager.break_page();
                continue;
            };
            let count = count.min(remaining);
            self.draw_code_segment(&lines[idx..idx + count], ctx, false);
            idx += count;
            if idx < lines.len() {
                self.pager.break_page();
            }
        }
        Ok(())
    }

    /// Background rectangle first, then the text on top of it.
    fn draw_code_segment(&mut self, lines: &[VisualLine], ctx: &BlockCtx, closed: bool) {
        let text_h: f32 = lines.iter().map(|l| l.height_mm).sum();
        let seg_h = CODE_PAD_MM + text_h + if closed { CODE_PAD_MM } else { 0.0 };
        self.pager.push(DrawOp::Rect {
            x_mm: self.origin_x(ctx),
            y_mm: self.pager.y(),
            w_mm: self.avail_width(ctx),
            h_mm: seg_h,
            color: CODE_BG,
        });
        self.pager.advance(CODE_PAD_MM);
        let inner = BlockCtx {
            indent_mm: ctx.indent_mm + CODE_PAD_MM,
            ..*ctx
        };
        for line in lines {
            self.draw_line(line, Alignment::Left, &inner);
        }
        if closed {
            self.pager.advance(CODE_PAD_MM);
        }
    }

    fn render_rule(&mut self, ctx: &BlockCtx) {
        // space check first so the rule never clips at the page boundary
        self.pager.request_space(RULE_BLOCK_MM);
        let y = self.pager.y() + RULE_BLOCK_MM / 2.0;
        self.pager.push(DrawOp::Line {
            x1_mm: self.origin_x(ctx),
            y1_mm: y,
            x2_mm: self.cfg.margin_mm + self.cfg.content_width_mm(),
            y2_mm: y,
            width_mm: RULE_WIDTH_MM,
            color: RULE_COLOR,
        });
        self.pager.advance(RULE_BLOCK_MM);
    }

    /// Draw one visual line at the cursor and advance past it.
    ///
    /// `left` places each piece at its own x so per-run styles land
    /// contiguously. The other alignments draw the line as a single unit
    /// in its dominant style; per-run color/highlight fidelity is only
    /// guaranteed for left alignment.
    ///
    /// Callers reserve the line's height first. A single line taller
    /// than the content area cannot be reserved; it is placed at the top
    /// of a page and its instructions run past the bottom margin rather
    /// than being dropped or clipped.
    fn draw_line(&mut self, line: &VisualLine, align: Alignment, ctx: &BlockCtx) {
        let origin = self.origin_x(ctx);
        let avail = self.avail_width(ctx);
        let dom = line.dominant_style();
        let ascent = dom.size_pt * ASCENT_RATIO * MM_PER_PT;
        let baseline = self.pager.y() + ascent.min(line.height_mm);

        let mut x = origin;
        if let Some(prefix) = &line.prefix {
            // marker width is not carved out of the wrap width; see the
            // module tests for the resulting first-line overhang
            let marker_style = line
                .pieces
                .first()
                .map(|p| p.style)
                .unwrap_or(dom);
            self.push_text(x, baseline, prefix.clone(), &marker_style);
            x += self.metrics.text_width_mm(&marker_style, prefix);
        }

        match align {
            Alignment::Left => self.draw_pieces(line, x, baseline),
            Alignment::Center | Alignment::Right | Alignment::Justify => {
                let line_x = match align {
                    Alignment::Center => x + (avail - line.width_mm).max(0.0) / 2.0,
                    Alignment::Right => x + (avail - line.width_mm).max(0.0),
                    // full justification is not implemented; justified
                    // text renders flush left
                    _ => x,
                };
                self.draw_uniform(line, &dom, line_x, baseline);
            }
        }
        self.pager.advance(line.height_mm);
    }

    /// Left alignment: every piece keeps its own style and x-advance.
    fn draw_pieces(&mut self, line: &VisualLine, start_x: f32, baseline: f32) {
        let mut placed: Vec<(f32, f32, &crate::linebreak::LinePiece)> =
            Vec::with_capacity(line.pieces.len());
        let mut x = start_x;
        for piece in &line.pieces {
            let w = self.metrics.text_width_mm(&piece.style, &piece.text);
            placed.push((x, w, piece));
            x += w;
        }

        // highlights first, merged across adjacent same-color pieces
        let mut span: Option<(f32, f32, Rgb, f32)> = None;
        for &(px, pw, piece) in &placed {
            let hl = piece.style.highlight;
            if let Some(color) = hl
                && let Some(cur) = span.as_mut()
                && cur.2 == color
            {
                cur.1 = px + pw;
                cur.3 = cur.3.max(piece.style.effective_size_pt());
                continue;
            }
            if let Some((sx, ex, color, fs)) = span.take() {
                self.push_highlight(sx, ex, color, fs, baseline);
            }
            if let Some(color) = hl {
                span = Some((px, px + pw, color, piece.style.effective_size_pt()));
            }
        }
        if let Some((sx, ex, color, fs)) = span {
            self.push_highlight(sx, ex, color, fs, baseline);
        }

        for &(px, pw, piece) in &placed {
            self.push_text(px, baseline, piece.text.clone(), &piece.style);
            self.push_decorations(px, pw, baseline, &piece.style);
        }
    }

    /// Center/right/justify: one text instruction in the dominant style.
    fn draw_uniform(&mut self, line: &VisualLine, dom: &ResolvedStyle, x: f32, baseline: f32) {
        if let Some(color) = dom.highlight {
            self.push_highlight(x, x + line.width_mm, color, dom.effective_size_pt(), baseline);
        }
        self.push_text(x, baseline, line.text(), dom);
        self.push_decorations(x, line.width_mm, baseline, dom);
    }

    fn push_text(&mut self, x: f32, baseline: f32, text: String, style: &ResolvedStyle) {
        if text.is_empty() {
            return;
        }
        self.pager.push(DrawOp::Text {
            x_mm: x,
            y_mm: baseline - style.baseline_shift_mm(),
            text,
            family: style.family,
            bold: style.bold,
            italic: style.italic,
            size_pt: style.effective_size_pt(),
            color: style.color,
        });
    }

    fn push_highlight(&mut self, x0: f32, x1: f32, color: Rgb, size_pt: f32, baseline: f32) {
        if x1 - x0 <= EPS {
            return;
        }
        let fs_mm = size_pt * MM_PER_PT;
        self.pager.push(DrawOp::Rect {
            x_mm: x0,
            y_mm: baseline - 0.95 * fs_mm,
            w_mm: x1 - x0,
            h_mm: 1.15 * fs_mm,
            color,
        });
    }

    fn push_decorations(&mut self, x: f32, w: f32, baseline: f32, style: &ResolvedStyle) {
        if w <= EPS {
            return;
        }
        let fs = style.effective_size_pt();
        let thickness = (fs * 0.05).max(0.5) * MM_PER_PT;
        if style.underline {
            self.pager.push(DrawOp::Rect {
                x_mm: x,
                y_mm: baseline + 0.12 * fs * MM_PER_PT,
                w_mm: w,
                h_mm: thickness,
                color: style.color,
            });
        }
        if style.strike {
            self.pager.push(DrawOp::Rect {
                x_mm: x,
                y_mm: baseline - 0.3 * fs * MM_PER_PT,
                w_mm: w,
                h_mm: thickness,
                color: style.color,
            });
        }
    }
}
