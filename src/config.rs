use crate::error::Error;

/// Named page sizes, in millimeters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PageProfile {
    A4,
    A5,
    Letter,
    Legal,
    Custom { width_mm: f32, height_mm: f32 },
}

impl PageProfile {
    pub fn dimensions_mm(self) -> (f32, f32) {
        match self {
            PageProfile::A4 => (210.0, 297.0),
            PageProfile::A5 => (148.0, 210.0),
            PageProfile::Letter => (215.9, 279.4),
            PageProfile::Legal => (215.9, 355.6),
            PageProfile::Custom { width_mm, height_mm } => (width_mm, height_mm),
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "a4" => Some(PageProfile::A4),
            "a5" => Some(PageProfile::A5),
            "letter" => Some(PageProfile::Letter),
            "legal" => Some(PageProfile::Legal),
            _ => None,
        }
    }
}

/// Page geometry and spacing for one render invocation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageConfig {
    pub profile: PageProfile,
    /// Uniform margin on all four edges.
    pub margin_mm: f32,
    /// Multiplier applied on top of the natural line height.
    pub line_spacing: f32,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            profile: PageProfile::A4,
            margin_mm: 25.4,
            line_spacing: 1.15,
        }
    }
}

impl PageConfig {
    pub fn with_profile(profile: PageProfile) -> Self {
        Self {
            profile,
            ..Self::default()
        }
    }

    pub fn page_width_mm(&self) -> f32 {
        self.profile.dimensions_mm().0
    }

    pub fn page_height_mm(&self) -> f32 {
        self.profile.dimensions_mm().1
    }

    pub fn content_width_mm(&self) -> f32 {
        self.page_width_mm() - 2.0 * self.margin_mm
    }

    pub fn content_height_mm(&self) -> f32 {
        self.page_height_mm() - 2.0 * self.margin_mm
    }

    /// Checked before any rendering; a bad geometry never produces a
    /// partial artifact.
    pub fn validate(&self) -> Result<(), Error> {
        let (w, h) = self.profile.dimensions_mm();
        if !(w > 0.0) || !(h > 0.0) {
            return Err(Error::Configuration(format!(
                "page size must be positive, got {w}x{h} mm"
            )));
        }
        if self.margin_mm < 0.0 {
            return Err(Error::Configuration(format!(
                "margin must be non-negative, got {} mm",
                self.margin_mm
            )));
        }
        if self.content_width_mm() <= 0.0 || self.content_height_mm() <= 0.0 {
            return Err(Error::Configuration(format!(
                "margins of {} mm leave no content area on a {w}x{h} mm page",
                self.margin_mm
            )));
        }
        if !(self.line_spacing > 0.0) {
            return Err(Error::Configuration(format!(
                "line spacing must be positive, got {}",
                self.line_spacing
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_a4_with_one_inch_margin() {
        let cfg = PageConfig::default();
        assert_eq!(cfg.page_width_mm(), 210.0);
        assert_eq!(cfg.page_height_mm(), 297.0);
        assert_eq!(cfg.margin_mm, 25.4);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn zero_width_is_rejected() {
        let cfg = PageConfig::with_profile(PageProfile::Custom {
            width_mm: 0.0,
            height_mm: 297.0,
        });
        assert!(matches!(cfg.validate(), Err(Error::Configuration(_))));
    }

    #[test]
    fn margins_swallowing_the_page_are_rejected() {
        let cfg = PageConfig {
            margin_mm: 120.0,
            ..PageConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(Error::Configuration(_))));
    }

    #[test]
    fn profile_names_round_trip() {
        assert_eq!(PageProfile::from_name("A4"), Some(PageProfile::A4));
        assert_eq!(PageProfile::from_name("legal"), Some(PageProfile::Legal));
        assert_eq!(PageProfile::from_name("tabloid"), None);
    }

    #[test]
    fn nan_line_spacing_is_rejected() {
        let cfg = PageConfig {
            line_spacing: f32::NAN,
            ..PageConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
