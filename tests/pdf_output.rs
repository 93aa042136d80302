mod common;

use common::{doc, marked};
use prosepress::{Block, PageConfig, emit_pdf, render, render_pdf};

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

#[test]
fn output_is_a_wellformed_pdf_shell() {
    let tree = doc(vec![Block::paragraph("Hello PDF")]);
    let bytes = render_pdf(&tree, &PageConfig::default()).unwrap();

    assert!(bytes.starts_with(b"%PDF-"));
    assert!(contains(&bytes, b"%%EOF"));
    assert!(contains(&bytes, b"/Type /Page"));
}

#[test]
fn page_count_matches_the_artifact() {
    let blocks: Vec<Block> = (0..200)
        .map(|i| Block::paragraph(format!("paragraph number {i}")))
        .collect();
    let tree = doc(blocks);
    let cfg = PageConfig::default();

    let artifact = render(&tree, &cfg).unwrap();
    assert!(artifact.page_count() > 1);
    let bytes = emit_pdf(&artifact);

    let needle = format!("/Count {}", artifact.page_count());
    assert!(contains(&bytes, needle.as_bytes()));
}

#[test]
fn only_used_font_variants_are_registered() {
    let tree = doc(vec![
        Block::paragraph("regular"),
        doc_para_bold("emphatic"),
    ]);
    let bytes = render_pdf(&tree, &PageConfig::default()).unwrap();

    assert!(contains(&bytes, b"/Helvetica"));
    assert!(contains(&bytes, b"/Helvetica-Bold"));
    assert!(!contains(&bytes, b"/Courier"));
    assert!(!contains(&bytes, b"/Times-Roman"));
    assert!(contains(&bytes, b"/WinAnsiEncoding"));
}

#[test]
fn code_blocks_pull_in_courier() {
    let tree = doc(vec![Block::CodeBlock {
        text: "let x = 1;".to_string(),
    }]);
    let bytes = render_pdf(&tree, &PageConfig::default()).unwrap();
    assert!(contains(&bytes, b"/Courier"));
}

#[test]
fn media_box_reflects_the_page_profile() {
    // A4 is 210 x 297 mm, 595.27... x 841.88... pt
    let tree = doc(vec![Block::paragraph("x")]);
    let bytes = render_pdf(&tree, &PageConfig::default()).unwrap();
    assert!(contains(&bytes, b"/MediaBox [0 "));
}

fn doc_para_bold(text: &str) -> Block {
    Block::Paragraph {
        align: prosepress::Alignment::Left,
        inline: vec![marked(text, |m| m.bold = true)],
    }
}
