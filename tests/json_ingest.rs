mod common;

use common::{page_of, text_ops};
use prosepress::{DrawOp, FontFamily, PageConfig, document_from_json_str, render};

const EDITOR_DOC: &str = r##"{
  "type": "doc",
  "content": [
    {
      "type": "heading",
      "attrs": { "level": 1, "textAlign": "center" },
      "content": [{ "type": "text", "text": "Release notes" }]
    },
    {
      "type": "paragraph",
      "content": [
        { "type": "text", "text": "Shipped " },
        { "type": "text", "text": "faster", "marks": [{ "type": "bold" }] },
        { "type": "text", "text": " exports." }
      ]
    },
    {
      "type": "bulletList",
      "content": [
        {
          "type": "listItem",
          "content": [
            {
              "type": "paragraph",
              "content": [{ "type": "text", "text": "first item" }]
            }
          ]
        },
        {
          "type": "listItem",
          "content": [
            {
              "type": "paragraph",
              "content": [{ "type": "text", "text": "second item" }]
            }
          ]
        }
      ]
    },
    {
      "type": "codeBlock",
      "content": [{ "type": "text", "text": "cargo run --release" }]
    },
    { "type": "horizontalRule" },
    {
      "type": "paragraph",
      "content": [
        {
          "type": "text",
          "text": "teal",
          "marks": [
            { "type": "textStyle", "attrs": { "color": "#008080" } },
            { "type": "highlight", "attrs": { "color": "#fff176" } }
          ]
        }
      ]
    }
  ]
}"##;

#[test]
fn editor_document_renders_end_to_end() {
    let doc = document_from_json_str(EDITOR_DOC).unwrap();
    let artifact = render(&doc, &PageConfig::default()).unwrap();
    assert_eq!(artifact.page_count(), 1);

    assert!(page_of(&artifact, "Release notes").is_some());
    assert!(page_of(&artifact, "faster").is_some());
    assert!(page_of(&artifact, "first item").is_some());
    assert!(page_of(&artifact, "cargo run --release").is_some());
}

#[test]
fn heading_from_json_is_large_and_centered() {
    let doc = document_from_json_str(EDITOR_DOC).unwrap();
    let artifact = render(&doc, &PageConfig::default()).unwrap();
    let cfg = PageConfig::default();

    let (x, size) = artifact.pages[0]
        .ops
        .iter()
        .find_map(|op| match op {
            DrawOp::Text {
                x_mm,
                size_pt,
                text,
                ..
            } if text == "Release notes" => Some((*x_mm, *size_pt)),
            _ => None,
        })
        .unwrap();
    assert_eq!(size, 24.0);
    assert!(x > cfg.margin_mm + 10.0, "centered heading starts at {x}");
}

#[test]
fn bold_mark_survives_into_the_artifact() {
    let doc = document_from_json_str(EDITOR_DOC).unwrap();
    let artifact = render(&doc, &PageConfig::default()).unwrap();

    let bold = artifact.pages[0].ops.iter().any(|op| {
        matches!(op, DrawOp::Text { text, bold: true, .. } if text.contains("faster"))
    });
    assert!(bold);
}

#[test]
fn text_color_and_highlight_are_applied() {
    let doc = document_from_json_str(EDITOR_DOC).unwrap();
    let artifact = render(&doc, &PageConfig::default()).unwrap();
    let ops = &artifact.pages[0].ops;

    let text_idx = ops
        .iter()
        .position(|op| {
            matches!(op, DrawOp::Text { text, color, .. } if text == "teal" && *color == [0, 128, 128])
        })
        .expect("colored run");
    let rect_idx = ops
        .iter()
        .position(|op| matches!(op, DrawOp::Rect { color, .. } if *color == [255, 241, 118]))
        .expect("highlight rectangle");
    assert!(rect_idx < text_idx, "highlight must be drawn under the text");
}

#[test]
fn code_block_from_json_uses_courier() {
    let doc = document_from_json_str(EDITOR_DOC).unwrap();
    let artifact = render(&doc, &PageConfig::default()).unwrap();

    let courier = artifact.pages[0].ops.iter().any(|op| {
        matches!(
            op,
            DrawOp::Text { text, family: FontFamily::Courier, .. }
                if text == "cargo run --release"
        )
    });
    assert!(courier);
}

#[test]
fn bullet_items_get_markers() {
    let doc = document_from_json_str(EDITOR_DOC).unwrap();
    let artifact = render(&doc, &PageConfig::default()).unwrap();

    let bullets = text_ops(&artifact)
        .into_iter()
        .filter(|(_, _, t)| t == "\u{2022} ")
        .count();
    assert_eq!(bullets, 2);
}

#[test]
fn hard_break_forces_a_new_line() {
    let doc = document_from_json_str(
        r#"{"type":"doc","content":[
            {"type":"paragraph","content":[
                {"type":"text","text":"above"},
                {"type":"hardBreak"},
                {"type":"text","text":"below"}
            ]}
        ]}"#,
    )
    .unwrap();
    let artifact = render(&doc, &PageConfig::default()).unwrap();

    let texts = text_ops(&artifact);
    let above = texts.iter().find(|(_, _, t)| t.contains("above")).unwrap();
    let below = texts.iter().find(|(_, _, t)| t.contains("below")).unwrap();
    assert!(below.1 > above.1, "hard break did not move the baseline");
}

#[test]
fn malformed_json_is_rejected() {
    assert!(document_from_json_str("{not json").is_err());
    assert!(document_from_json_str(r#"{"type":"paragraph"}"#).is_err());
}
