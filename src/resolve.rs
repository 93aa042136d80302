use crate::metrics::MM_PER_PT;
use crate::model::{FontFamily, InlineRun, Marks, Rgb, VertAlign};

/// Style defaults a block hands down to its inline content. Headings
/// force bold, blockquotes force italic; list nesting and quote depth
/// only affect geometry, not marks.
#[derive(Clone, Copy, Debug)]
pub struct BlockDefaults {
    pub family: FontFamily,
    pub size_pt: f32,
    pub bold: bool,
    pub italic: bool,
    pub color: Rgb,
}

pub const BODY_SIZE_PT: f32 = 12.0;

impl BlockDefaults {
    pub fn body() -> Self {
        Self {
            family: FontFamily::Helvetica,
            size_pt: BODY_SIZE_PT,
            bold: false,
            italic: false,
            color: [0, 0, 0],
        }
    }
}

/// An inline run's style with every field made concrete.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedStyle {
    pub family: FontFamily,
    pub size_pt: f32,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strike: bool,
    pub vert: VertAlign,
    pub color: Rgb,
    pub highlight: Option<Rgb>,
}

impl ResolvedStyle {
    pub fn plain() -> Self {
        Self {
            family: FontFamily::Helvetica,
            size_pt: BODY_SIZE_PT,
            bold: false,
            italic: false,
            underline: false,
            strike: false,
            vert: VertAlign::Baseline,
            color: [0, 0, 0],
            highlight: None,
        }
    }

    pub fn from_defaults(d: &BlockDefaults) -> Self {
        Self {
            family: d.family,
            size_pt: d.size_pt,
            bold: d.bold,
            italic: d.italic,
            ..Self::plain()
        }
    }

    /// Drawing size: superscript and subscript render reduced.
    pub fn effective_size_pt(&self) -> f32 {
        match self.vert {
            VertAlign::Baseline => self.size_pt,
            VertAlign::Superscript | VertAlign::Subscript => self.size_pt * 0.58,
        }
    }

    /// Baseline shift in mm; positive raises the text.
    pub fn baseline_shift_mm(&self) -> f32 {
        match self.vert {
            VertAlign::Baseline => 0.0,
            VertAlign::Superscript => self.size_pt * 0.35 * MM_PER_PT,
            VertAlign::Subscript => -self.size_pt * 0.14 * MM_PER_PT,
        }
    }
}

/// `InlineRun` after inheritance: text plus a fully concrete style.
/// Invariant: `text` is never empty.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedRun {
    pub text: String,
    pub style: ResolvedStyle,
}

/// Map a document font-family string to the nearest supported output
/// family. Fixed lookup; unknown names land on Helvetica.
pub fn map_family(name: &str) -> FontFamily {
    let lower = name.to_ascii_lowercase();
    if ["courier", "mono", "consolas", "menlo"]
        .iter()
        .any(|k| lower.contains(k))
    {
        FontFamily::Courier
    } else if ["times", "serif", "georgia", "garamond", "cambria"]
        .iter()
        .any(|k| lower.contains(k))
    {
        FontFamily::Times
    } else {
        FontFamily::Helvetica
    }
}

fn resolve_one(marks: &Marks, defaults: &BlockDefaults) -> ResolvedStyle {
    let vert = if marks.superscript {
        // superscript wins when both marks are present
        VertAlign::Superscript
    } else if marks.subscript {
        VertAlign::Subscript
    } else {
        VertAlign::Baseline
    };

    ResolvedStyle {
        family: marks
            .font_family
            .as_deref()
            .map(map_family)
            .unwrap_or(defaults.family),
        size_pt: marks.font_size_pt.unwrap_or(defaults.size_pt),
        bold: marks.bold || defaults.bold,
        italic: marks.italic || defaults.italic,
        underline: marks.underline,
        strike: marks.strike,
        vert,
        color: marks.color.unwrap_or(defaults.color),
        highlight: marks.highlight,
    }
}

/// Flatten a block's inline content into resolved runs. Zero-length runs
/// are dropped; adjacent runs with identical resolved style are merged
/// to cut fragment count.
pub fn resolve_runs(inline: &[InlineRun], defaults: &BlockDefaults) -> Vec<ResolvedRun> {
    let mut out: Vec<ResolvedRun> = Vec::with_capacity(inline.len());
    for run in inline {
        if run.text.is_empty() {
            continue;
        }
        let style = resolve_one(&run.marks, defaults);
        match out.last_mut() {
            Some(prev) if prev.style == style => prev.text.push_str(&run.text),
            _ => out.push(ResolvedRun {
                text: run.text.clone(),
                style,
            }),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::InlineRun;

    fn marked(text: &str, f: impl FnOnce(&mut Marks)) -> InlineRun {
        let mut run = InlineRun::plain(text);
        f(&mut run.marks);
        run
    }

    #[test]
    fn defaults_fill_every_field() {
        let runs = resolve_runs(&[InlineRun::plain("hi")], &BlockDefaults::body());
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].style.family, FontFamily::Helvetica);
        assert_eq!(runs[0].style.size_pt, BODY_SIZE_PT);
        assert_eq!(runs[0].style.color, [0, 0, 0]);
    }

    #[test]
    fn block_forced_bold_combines_with_marks() {
        let defaults = BlockDefaults {
            bold: true,
            ..BlockDefaults::body()
        };
        let runs = resolve_runs(
            &[marked("a", |m| m.italic = true)],
            &defaults,
        );
        assert!(runs[0].style.bold);
        assert!(runs[0].style.italic);
    }

    #[test]
    fn empty_runs_are_dropped() {
        let runs = resolve_runs(
            &[InlineRun::plain(""), InlineRun::plain("x")],
            &BlockDefaults::body(),
        );
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text, "x");
    }

    #[test]
    fn identical_neighbours_merge() {
        let runs = resolve_runs(
            &[
                marked("foo", |m| m.bold = true),
                marked("bar", |m| m.bold = true),
                marked("baz", |m| m.italic = true),
            ],
            &BlockDefaults::body(),
        );
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].text, "foobar");
        assert_eq!(runs[1].text, "baz");
    }

    #[test]
    fn superscript_beats_subscript() {
        let runs = resolve_runs(
            &[marked("x", |m| {
                m.superscript = true;
                m.subscript = true;
            })],
            &BlockDefaults::body(),
        );
        assert_eq!(runs[0].style.vert, VertAlign::Superscript);
    }

    #[test]
    fn family_lookup_buckets() {
        assert_eq!(map_family("Courier New"), FontFamily::Courier);
        assert_eq!(map_family("Times New Roman"), FontFamily::Times);
        assert_eq!(map_family("Georgia"), FontFamily::Times);
        assert_eq!(map_family("Arial"), FontFamily::Helvetica);
        assert_eq!(map_family("Comic Sans MS"), FontFamily::Helvetica);
    }

    #[test]
    fn explicit_size_overrides_default() {
        let runs = resolve_runs(
            &[marked("x", |m| m.font_size_pt = Some(18.0))],
            &BlockDefaults::body(),
        );
        assert_eq!(runs[0].style.size_pt, 18.0);
    }
}
