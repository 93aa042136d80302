use serde::Serialize;

use crate::model::{FontFamily, Rgb};

/// One primitive draw instruction. Coordinates are millimeters from the
/// top-left corner of the page; `Text` y is the baseline.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DrawOp {
    #[serde(rename_all = "camelCase")]
    Text {
        x_mm: f32,
        y_mm: f32,
        text: String,
        family: FontFamily,
        bold: bool,
        italic: bool,
        size_pt: f32,
        color: Rgb,
    },
    /// Filled rectangle; y is the top edge.
    #[serde(rename_all = "camelCase")]
    Rect {
        x_mm: f32,
        y_mm: f32,
        w_mm: f32,
        h_mm: f32,
        color: Rgb,
    },
    #[serde(rename_all = "camelCase")]
    Line {
        x1_mm: f32,
        y1_mm: f32,
        x2_mm: f32,
        y2_mm: f32,
        width_mm: f32,
        color: Rgb,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

/// The paginated output of one render call: ordered pages of ordered
/// draw instructions, plus the geometry they were laid out against.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub pages: Vec<Page>,
}

impl Artifact {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}
