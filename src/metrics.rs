use std::collections::HashMap;

use ttf_parser::Face;

use crate::error::Error;
use crate::model::FontFamily;
use crate::resolve::ResolvedStyle;

/// Glyph-width point-to-millimeter conversion.
pub const MM_PER_PT: f32 = 0.352_778;

/// Millimeters of line height per point of font size, before the
/// line-spacing multiplier is applied.
pub const LINE_MM_PER_PT: f32 = 0.38;

/// Fraction of the font size above the baseline.
pub const ASCENT_RATIO: f32 = 0.75;

pub fn line_height_mm(size_pt: f32, line_spacing: f32) -> f32 {
    size_pt * LINE_MM_PER_PT * line_spacing
}

/// Width-of-text source for layout. Widths are expressed in the classic
/// 1000-units-per-em convention so both the built-in tables and parsed
/// font faces share one scale.
pub trait MetricProvider {
    fn char_width_1000(&self, family: FontFamily, bold: bool, ch: char) -> f32;

    fn text_width_mm(&self, style: &ResolvedStyle, text: &str) -> f32 {
        let size = style.effective_size_pt();
        let units: f32 = text
            .chars()
            .map(|ch| self.char_width_1000(style.family, style.bold, ch))
            .sum();
        units * size * MM_PER_PT / 1000.0
    }
}

// AFM advance widths for chars 32..=126, 1000 units per em. Oblique
// variants share the widths of their upright face, so only bold needs a
// separate table; Courier is uniformly 600.
#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333,
    278, 278, 556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278,
    584, 584, 584, 556, 1015, 667, 667, 722, 722, 667, 611, 778, 722, 278,
    500, 667, 556, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944,
    667, 667, 611, 278, 278, 278, 469, 556, 333, 556, 556, 500, 556, 556,
    278, 556, 556, 222, 222, 500, 222, 833, 556, 556, 556, 556, 333, 500,
    278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333,
    278, 278, 556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333,
    584, 584, 584, 611, 975, 722, 722, 722, 722, 667, 611, 778, 722, 278,
    556, 722, 611, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944,
    667, 667, 611, 333, 278, 333, 584, 556, 333, 556, 611, 556, 611, 556,
    333, 611, 611, 278, 278, 556, 278, 889, 611, 611, 611, 611, 389, 556,
    333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

#[rustfmt::skip]
const TIMES: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333,
    250, 278, 500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278,
    564, 564, 564, 444, 921, 722, 667, 667, 722, 611, 556, 722, 722, 333,
    389, 722, 611, 889, 722, 722, 556, 722, 667, 556, 611, 722, 722, 944,
    722, 722, 611, 333, 278, 333, 469, 500, 333, 444, 500, 444, 500, 444,
    333, 500, 500, 278, 278, 500, 278, 778, 500, 500, 500, 500, 333, 389,
    278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541,
];

#[rustfmt::skip]
const TIMES_BOLD: [u16; 95] = [
    250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333,
    250, 278, 500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333,
    570, 570, 570, 500, 930, 722, 667, 722, 722, 667, 611, 778, 778, 389,
    500, 778, 667, 944, 722, 778, 611, 778, 722, 556, 667, 722, 722, 1000,
    722, 722, 667, 333, 278, 333, 581, 500, 333, 500, 556, 444, 556, 444,
    333, 500, 556, 278, 333, 556, 278, 833, 556, 500, 556, 556, 444, 389,
    333, 556, 500, 722, 500, 500, 444, 394, 220, 394, 520,
];

const COURIER_WIDTH: f32 = 600.0;
const BULLET_WIDTH: f32 = 350.0;

/// Fixed-width approximation for the three supported output families,
/// using the standard AFM tables for the printable ASCII range. The
/// default metric source; no font files required.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinMetrics;

impl MetricProvider for BuiltinMetrics {
    fn char_width_1000(&self, family: FontFamily, bold: bool, ch: char) -> f32 {
        if family == FontFamily::Courier {
            return COURIER_WIDTH;
        }
        if ch == '\u{2022}' {
            return BULLET_WIDTH;
        }
        let table = match (family, bold) {
            (FontFamily::Helvetica, false) => &HELVETICA,
            (FontFamily::Helvetica, true) => &HELVETICA_BOLD,
            (FontFamily::Times, false) => &TIMES,
            (FontFamily::Times, true) => &TIMES_BOLD,
            (FontFamily::Courier, _) => unreachable!(),
        };
        let code = ch as u32;
        if (32..=126).contains(&code) {
            table[(code - 32) as usize] as f32
        } else {
            // Non-ASCII fallback: a middling lowercase advance
            table[('n' as u32 - 32) as usize] as f32
        }
    }
}

/// Vector metrics parsed from a TTF/OTF face. Measures every style with
/// the one supplied face, which beats the approximation tables whenever
/// the output is viewed with that font.
pub struct FaceMetrics {
    widths_1000: HashMap<char, f32>,
    default_1000: f32,
}

impl FaceMetrics {
    pub fn from_bytes(data: &[u8]) -> Result<Self, Error> {
        Self::from_bytes_with_charset(data, std::iter::empty())
    }

    /// Parse a face and additionally cache widths for `extra` characters
    /// beyond printable ASCII.
    pub fn from_bytes_with_charset(
        data: &[u8],
        extra: impl Iterator<Item = char>,
    ) -> Result<Self, Error> {
        let face = Face::parse(data, 0)
            .map_err(|e| Error::Configuration(format!("unusable font face: {e}")))?;
        let upem = face.units_per_em() as f32;
        if upem <= 0.0 {
            return Err(Error::Configuration("font face has no units_per_em".into()));
        }

        let mut widths_1000 = HashMap::new();
        let ascii = (32u8..=126).map(char::from);
        for ch in ascii.chain(extra) {
            if let Some(gid) = face.glyph_index(ch)
                && let Some(adv) = face.glyph_hor_advance(gid)
            {
                widths_1000.insert(ch, adv as f32 / upem * 1000.0);
            }
        }

        let default_1000 = widths_1000.get(&'n').copied().unwrap_or(500.0);
        Ok(Self {
            widths_1000,
            default_1000,
        })
    }
}

impl MetricProvider for FaceMetrics {
    fn char_width_1000(&self, _family: FontFamily, _bold: bool, ch: char) -> f32 {
        self.widths_1000
            .get(&ch)
            .copied()
            .unwrap_or(self.default_1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style(family: FontFamily, bold: bool, size_pt: f32) -> ResolvedStyle {
        ResolvedStyle {
            family,
            size_pt,
            bold,
            ..ResolvedStyle::plain()
        }
    }

    #[test]
    fn courier_is_monospaced() {
        let m = BuiltinMetrics;
        let s = style(FontFamily::Courier, false, 10.0);
        assert_eq!(
            m.text_width_mm(&s, "iii"),
            m.text_width_mm(&s, "WWW"),
        );
    }

    #[test]
    fn bold_helvetica_is_wider() {
        let m = BuiltinMetrics;
        let regular = style(FontFamily::Helvetica, false, 12.0);
        let bold = style(FontFamily::Helvetica, true, 12.0);
        assert!(m.text_width_mm(&bold, "effort") > m.text_width_mm(&regular, "effort"));
    }

    #[test]
    fn width_scales_linearly_with_size() {
        let m = BuiltinMetrics;
        let small = style(FontFamily::Times, false, 10.0);
        let large = style(FontFamily::Times, false, 20.0);
        let w1 = m.text_width_mm(&small, "scale");
        let w2 = m.text_width_mm(&large, "scale");
        assert!((w2 - 2.0 * w1).abs() < 1e-4);
    }

    #[test]
    fn line_height_uses_spacing_multiplier() {
        let single = line_height_mm(12.0, 1.0);
        let spaced = line_height_mm(12.0, 1.15);
        assert!((single - 12.0 * LINE_MM_PER_PT).abs() < 1e-6);
        assert!(spaced > single);
    }

    #[test]
    fn garbage_font_bytes_are_rejected() {
        assert!(matches!(
            FaceMetrics::from_bytes(b"not a font"),
            Err(Error::Configuration(_))
        ));
    }
}
