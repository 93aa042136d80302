#![allow(dead_code)]

use prosepress::{
    Alignment, Artifact, Block, DocumentTree, DrawOp, InlineRun, Marks, PageConfig, PageProfile,
};

pub fn doc(blocks: Vec<Block>) -> DocumentTree {
    DocumentTree::new(blocks)
}

pub fn run(text: &str) -> InlineRun {
    InlineRun::plain(text)
}

pub fn marked(text: &str, f: impl FnOnce(&mut Marks)) -> InlineRun {
    let mut r = InlineRun::plain(text);
    f(&mut r.marks);
    r
}

pub fn para(runs: Vec<InlineRun>) -> Block {
    Block::Paragraph {
        align: Alignment::Left,
        inline: runs,
    }
}

pub fn item(blocks: Vec<Block>) -> Block {
    Block::ListItem { blocks }
}

/// A small custom page for wrap-sensitive tests: `content_w` mm of text
/// column inside 10 mm margins.
pub fn narrow_config(content_w: f32, page_h: f32) -> PageConfig {
    PageConfig {
        profile: PageProfile::Custom {
            width_mm: content_w + 20.0,
            height_mm: page_h,
        },
        margin_mm: 10.0,
        line_spacing: 1.15,
    }
}

/// All text instructions as (1-based page, y, text), in emission order.
pub fn text_ops(artifact: &Artifact) -> Vec<(usize, f32, String)> {
    let mut out = Vec::new();
    for (i, page) in artifact.pages.iter().enumerate() {
        for op in &page.ops {
            if let DrawOp::Text { y_mm, text, .. } = op {
                out.push((i + 1, *y_mm, text.clone()));
            }
        }
    }
    out
}

/// 1-based page index of the first text instruction containing `needle`.
pub fn page_of(artifact: &Artifact, needle: &str) -> Option<usize> {
    text_ops(artifact)
        .iter()
        .find(|(_, _, t)| t.contains(needle))
        .map(|(p, _, _)| *p)
}
