use crate::artifact::{Artifact, DrawOp, Page};
use crate::config::PageConfig;

const EPS: f32 = 0.01;

/// Owns the page list and the write cursor: 1-based page index plus the
/// vertical offset from the page top, in mm. Created fresh per render,
/// threaded by mutable reference through the block walk.
pub(crate) struct Paginator {
    page_width_mm: f32,
    page_height_mm: f32,
    margin_mm: f32,
    pages: Vec<Page>,
    y_mm: f32,
}

impl Paginator {
    pub(crate) fn new(cfg: &PageConfig) -> Self {
        Self {
            page_width_mm: cfg.page_width_mm(),
            page_height_mm: cfg.page_height_mm(),
            margin_mm: cfg.margin_mm,
            pages: vec![Page::default()],
            y_mm: cfg.margin_mm,
        }
    }

    /// 1-based index of the page currently being written.
    pub(crate) fn page_index(&self) -> usize {
        self.pages.len()
    }

    pub(crate) fn y(&self) -> f32 {
        self.y_mm
    }

    pub(crate) fn top(&self) -> f32 {
        self.margin_mm
    }

    /// Lowest y the cursor may reach: page height minus bottom margin.
    pub(crate) fn limit(&self) -> f32 {
        self.page_height_mm - self.margin_mm
    }

    pub(crate) fn at_page_top(&self) -> bool {
        (self.y_mm - self.margin_mm).abs() < EPS
    }

    pub(crate) fn break_page(&mut self) {
        self.pages.push(Page::default());
        self.y_mm = self.margin_mm;
    }

    /// Make room for `height_mm` of content, inserting a page break if
    /// the current page cannot hold it. Returns false only when the
    /// request does not fit an empty page either; callers then degrade
    /// to line-by-line placement.
    pub(crate) fn request_space(&mut self, height_mm: f32) -> bool {
        if self.y_mm + height_mm <= self.limit() + EPS {
            return true;
        }
        if self.at_page_top() {
            // a break would only open another page it cannot fit either
            return false;
        }
        self.break_page();
        self.y_mm + height_mm <= self.limit() + EPS
    }

    /// Move the cursor down, clamped to the bottom margin so trailing
    /// block spacing never leaves the cursor past the limit.
    pub(crate) fn advance(&mut self, height_mm: f32) {
        self.y_mm = (self.y_mm + height_mm).min(self.limit());
    }

    pub(crate) fn push(&mut self, op: DrawOp) {
        // pages is never empty
        self.pages.last_mut().unwrap().ops.push(op);
    }

    /// Number of instructions on a 1-based page; zero for pages that do
    /// not exist yet.
    pub(crate) fn ops_len(&self, page_index: usize) -> usize {
        self.pages.get(page_index - 1).map_or(0, |p| p.ops.len())
    }

    /// Append to an already-emitted page; used for decorations whose
    /// extent is only known after their content rendered (quote rules).
    pub(crate) fn push_on(&mut self, page_index: usize, op: DrawOp) {
        if let Some(page) = self.pages.get_mut(page_index - 1) {
            page.ops.push(op);
        }
    }

    pub(crate) fn into_artifact(self) -> Artifact {
        Artifact {
            page_width_mm: self.page_width_mm,
            page_height_mm: self.page_height_mm,
            pages: self.pages,
        }
    }
}
