use crate::error::Error;
use crate::metrics::{MetricProvider, line_height_mm};
use crate::resolve::{ResolvedRun, ResolvedStyle};

/// A slice of one resolved run as it lands on a line.
#[derive(Clone, Debug, PartialEq)]
pub struct LinePiece {
    pub style: ResolvedStyle,
    pub text: String,
}

/// One laid-out line. Pieces preserve per-character style fidelity; the
/// optional prefix is a list marker that rides the item's first line.
#[derive(Clone, Debug, PartialEq)]
pub struct VisualLine {
    pub pieces: Vec<LinePiece>,
    pub prefix: Option<String>,
    /// Measured width of the line text (trailing whitespace excluded,
    /// prefix excluded), in the line's dominant style.
    pub width_mm: f32,
    pub height_mm: f32,
}

impl VisualLine {
    pub fn text(&self) -> String {
        self.pieces.iter().map(|p| p.text.as_str()).collect()
    }

    /// Style of the largest piece, first on ties. Used as the uniform
    /// style for centered/right-aligned drawing.
    pub fn dominant_style(&self) -> ResolvedStyle {
        dominant(self.pieces.iter().map(|p| &p.style))
    }
}

fn dominant<'a>(styles: impl Iterator<Item = &'a ResolvedStyle>) -> ResolvedStyle {
    let mut best = ResolvedStyle::plain();
    let mut best_size = f32::MIN;
    for s in styles {
        if s.size_pt > best_size {
            best_size = s.size_pt;
            best = *s;
        }
    }
    best
}

/// Greedy word wrap of a run sequence into visual lines.
///
/// The run texts are treated as one logical string; break candidates sit
/// at whitespace boundaries and are measured with the dominant
/// (largest, first-on-tie) font of the whole sequence. A `'\n'` is a
/// mandatory break. The chosen line ranges are then re-partitioned
/// across the original run boundaries, so a run spanning a break is
/// split into two pieces with identical style. Whitespace at a break
/// stays on the preceding line: concatenating the emitted lines always
/// reproduces the input text exactly.
///
/// A single word wider than `width_mm` is emitted as its own line,
/// unsplit (no hyphenation). The prefix is not subtracted from the wrap
/// width before breaking the first line.
pub fn break_runs(
    runs: &[ResolvedRun],
    width_mm: f32,
    prefix: Option<String>,
    line_spacing: f32,
    metrics: &dyn MetricProvider,
) -> Result<Vec<VisualLine>, Error> {
    if !(width_mm > 0.0) {
        return Err(Error::Configuration(format!(
            "wrap width must be positive, got {width_mm} mm"
        )));
    }
    if runs.is_empty() {
        return Ok(Vec::new());
    }

    let logical: String = runs.iter().map(|r| r.text.as_str()).collect();
    let wrap_style = dominant(runs.iter().map(|r| &r.style));

    // Greedy fill of one newline-free segment: a line breaks before the
    // word that would overflow it, never inside a word, so a word
    // crossing a run boundary stays whole.
    let fill = |seg_start: usize, seg_end: usize, ranges: &mut Vec<(usize, usize)>| {
        let mut words: Vec<(usize, usize)> = Vec::new();
        let mut word_start: Option<usize> = None;
        for (idx, ch) in logical[seg_start..seg_end].char_indices() {
            let idx = seg_start + idx;
            if ch.is_whitespace() {
                if let Some(start) = word_start.take() {
                    words.push((start, idx));
                }
            } else if word_start.is_none() {
                word_start = Some(idx);
            }
        }
        if let Some(start) = word_start {
            words.push((start, seg_end));
        }

        let mut line_start = seg_start;
        let mut line_has_word = false;
        for &(wstart, wend) in &words {
            if line_has_word {
                let candidate = metrics.text_width_mm(&wrap_style, &logical[line_start..wend]);
                if candidate > width_mm {
                    ranges.push((line_start, wstart));
                    line_start = wstart;
                }
            }
            line_has_word = true;
        }
        ranges.push((line_start, seg_end));
    };

    // Every '\n' ends a line unconditionally; the newline itself stays
    // with the line it terminates.
    let mut ranges: Vec<(usize, usize)> = Vec::new();
    let mut seg_start = 0usize;
    for (idx, ch) in logical.char_indices() {
        if ch == '\n' {
            fill(seg_start, idx + 1, &mut ranges);
            seg_start = idx + 1;
        }
    }
    fill(seg_start, logical.len(), &mut ranges);

    // Re-partition line ranges across run boundaries
    let mut run_spans: Vec<(usize, usize, &ResolvedRun)> = Vec::with_capacity(runs.len());
    let mut offset = 0usize;
    for run in runs {
        run_spans.push((offset, offset + run.text.len(), run));
        offset += run.text.len();
    }

    let mut lines: Vec<VisualLine> = Vec::with_capacity(ranges.len());
    for &(start, end) in &ranges {
        let mut pieces: Vec<LinePiece> = Vec::new();
        for &(rstart, rend, run) in &run_spans {
            let s = rstart.max(start);
            let e = rend.min(end);
            if s < e {
                pieces.push(LinePiece {
                    style: run.style,
                    text: logical[s..e].to_string(),
                });
            }
        }

        let line_style = dominant(pieces.iter().map(|p| &p.style));
        let trimmed = logical[start..end].trim_end();
        let width = metrics.text_width_mm(&line_style, trimmed);
        // A range left empty by consecutive newlines still takes a line
        // at the wrap style's height.
        let max_size = pieces
            .iter()
            .map(|p| p.style.size_pt)
            .fold(f32::MIN, f32::max)
            .max(if pieces.is_empty() { wrap_style.size_pt } else { 0.0 });

        lines.push(VisualLine {
            pieces,
            prefix: None,
            width_mm: width,
            height_mm: line_height_mm(max_size, line_spacing),
        });
    }

    if let Some(p) = prefix
        && let Some(first) = lines.first_mut()
    {
        first.prefix = Some(p);
    }
    Ok(lines)
}
