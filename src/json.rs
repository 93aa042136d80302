//! Ingestion of editor documents serialized as ProseMirror-style JSON:
//! `{"type": "doc", "content": [...]}` with text leaves carrying a
//! `marks` array. Shape errors are fatal; bad style values (sizes,
//! colors) are logged and fall back to inherited defaults.

use serde_json::Value;

use crate::error::Error;
use crate::model::{Alignment, Block, DocumentTree, InlineRun, Marks, Rgb};

pub fn document_from_json_str(input: &str) -> Result<DocumentTree, Error> {
    let value: Value = serde_json::from_str(input)
        .map_err(|e| Error::InvalidDocument(format!("not valid JSON: {e}")))?;
    document_from_json(&value)
}

pub fn document_from_json(value: &Value) -> Result<DocumentTree, Error> {
    let node_type = value.get("type").and_then(Value::as_str).unwrap_or("");
    if node_type != "doc" {
        return Err(Error::InvalidDocument(format!(
            "root node must be \"doc\", got \"{node_type}\""
        )));
    }
    let blocks = content_nodes(value, "doc")?
        .iter()
        .map(parse_block)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(DocumentTree::new(blocks))
}

/// A missing `content` field means "no children"; a present one that is
/// not an array is a malformed tree.
fn content_nodes<'a>(node: &'a Value, kind: &str) -> Result<&'a [Value], Error> {
    match node.get("content") {
        None => Ok(&[]),
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(Error::InvalidDocument(format!(
            "content of \"{kind}\" node is not a list"
        ))),
    }
}

fn parse_block(node: &Value) -> Result<Block, Error> {
    let kind = node.get("type").and_then(Value::as_str).unwrap_or("");
    let align = parse_align(node);
    match kind {
        "heading" => {
            let level = node
                .get("attrs")
                .and_then(|a| a.get("level"))
                .and_then(Value::as_u64)
                .unwrap_or(1)
                .clamp(1, 3) as u8;
            Ok(Block::Heading {
                level,
                align,
                inline: parse_inline(content_nodes(node, kind)?),
            })
        }
        "paragraph" => Ok(Block::Paragraph {
            align,
            inline: parse_inline(content_nodes(node, kind)?),
        }),
        "bulletList" => Ok(Block::BulletList {
            items: parse_blocks(content_nodes(node, kind)?)?,
        }),
        "orderedList" => Ok(Block::OrderedList {
            items: parse_blocks(content_nodes(node, kind)?)?,
        }),
        "listItem" => Ok(Block::ListItem {
            blocks: parse_blocks(content_nodes(node, kind)?)?,
        }),
        "blockquote" => Ok(Block::Blockquote {
            blocks: parse_blocks(content_nodes(node, kind)?)?,
        }),
        "codeBlock" => {
            let text: String = content_nodes(node, kind)?
                .iter()
                .filter_map(|n| n.get("text").and_then(Value::as_str))
                .collect();
            Ok(Block::CodeBlock { text })
        }
        "horizontalRule" => Ok(Block::HorizontalRule),
        other => {
            log::debug!("unknown block type \"{other}\", recursing into children");
            Ok(Block::Other {
                children: parse_blocks(content_nodes(node, other)?)?,
            })
        }
    }
}

fn parse_blocks(nodes: &[Value]) -> Result<Vec<Block>, Error> {
    nodes.iter().map(parse_block).collect()
}

fn parse_inline(nodes: &[Value]) -> Vec<InlineRun> {
    let mut runs = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node.get("type").and_then(Value::as_str) {
            Some("text") => {
                let text = node
                    .get("text")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                runs.push(InlineRun {
                    text,
                    marks: parse_marks(node),
                });
            }
            Some("hardBreak") => runs.push(InlineRun::plain("\n")),
            other => {
                log::debug!("skipping unsupported inline node {other:?}");
            }
        }
    }
    runs
}

fn parse_align(node: &Value) -> Alignment {
    match node
        .get("attrs")
        .and_then(|a| a.get("textAlign"))
        .and_then(Value::as_str)
    {
        Some("center") => Alignment::Center,
        Some("right") => Alignment::Right,
        Some("justify") => Alignment::Justify,
        _ => Alignment::Left,
    }
}

fn parse_marks(node: &Value) -> Marks {
    let mut marks = Marks::default();
    let Some(list) = node.get("marks").and_then(Value::as_array) else {
        return marks;
    };
    for mark in list {
        let attrs = mark.get("attrs");
        match mark.get("type").and_then(Value::as_str) {
            Some("bold") | Some("strong") => marks.bold = true,
            Some("italic") | Some("em") => marks.italic = true,
            Some("underline") => marks.underline = true,
            Some("strike") => marks.strike = true,
            Some("superscript") => marks.superscript = true,
            Some("subscript") => marks.subscript = true,
            Some("textStyle") => {
                if let Some(attrs) = attrs {
                    if let Some(family) = attrs.get("fontFamily").and_then(Value::as_str) {
                        marks.font_family = Some(family.to_string());
                    }
                    if let Some(size) = attrs.get("fontSize").and_then(Value::as_str) {
                        marks.font_size_pt = parse_size_pt(size);
                    }
                    if let Some(color) = attrs.get("color").and_then(Value::as_str) {
                        marks.color = parse_hex_color(color);
                    }
                }
            }
            Some("highlight") => {
                marks.highlight = attrs
                    .and_then(|a| a.get("color"))
                    .and_then(Value::as_str)
                    .and_then(parse_hex_color)
                    .or(Some([255, 241, 118]));
            }
            other => log::debug!("ignoring unsupported mark {other:?}"),
        }
    }
    marks
}

/// Parse `"12pt"`, `"16px"` or a bare number into points (px→pt at
/// 0.75). Malformed values are not an error; the block default applies.
fn parse_size_pt(raw: &str) -> Option<f32> {
    let trimmed = raw.trim();
    let (number, scale) = if let Some(v) = trimmed.strip_suffix("pt") {
        (v, 1.0)
    } else if let Some(v) = trimmed.strip_suffix("px") {
        (v, 0.75)
    } else {
        (trimmed, 1.0)
    };
    match number.trim().parse::<f32>() {
        Ok(v) if v > 0.0 => Some(v * scale),
        _ => {
            log::warn!("unparseable font size {raw:?}, falling back to block default");
            None
        }
    }
}

/// `#rgb` or `#rrggbb`. Anything else logs and falls back.
fn parse_hex_color(raw: &str) -> Option<Rgb> {
    let parsed = hex_rgb(raw.trim());
    if parsed.is_none() {
        log::warn!("unparseable color {raw:?}, falling back to block default");
    }
    parsed
}

fn hex_rgb(trimmed: &str) -> Option<Rgb> {
    let hex = trimmed.strip_prefix('#')?;
    let expand = |d: u8| d * 16 + d;
    let nibble = |c: char| c.to_digit(16).map(|d| d as u8);
    match hex.len() {
        3 => {
            let mut it = hex.chars();
            let r = nibble(it.next()?)?;
            let g = nibble(it.next()?)?;
            let b = nibble(it.next()?)?;
            Some([expand(r), expand(g), expand(b)])
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some([r, g, b])
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_units() {
        assert_eq!(parse_size_pt("12pt"), Some(12.0));
        assert_eq!(parse_size_pt("16px"), Some(12.0));
        assert_eq!(parse_size_pt("14"), Some(14.0));
        assert_eq!(parse_size_pt("huge"), None);
        assert_eq!(parse_size_pt("-3pt"), None);
    }

    #[test]
    fn hex_colors() {
        assert_eq!(parse_hex_color("#ff0000"), Some([255, 0, 0]));
        assert_eq!(parse_hex_color("#fff"), Some([255, 255, 255]));
        assert_eq!(parse_hex_color("#1a2b3c"), Some([26, 43, 60]));
        assert_eq!(parse_hex_color("red"), None);
        assert_eq!(parse_hex_color("#12345"), None);
    }

    #[test]
    fn root_must_be_doc() {
        let err = document_from_json_str(r#"{"type":"paragraph"}"#);
        assert!(matches!(err, Err(Error::InvalidDocument(_))));
    }

    #[test]
    fn content_must_be_a_list() {
        let err = document_from_json_str(r#"{"type":"doc","content":"oops"}"#);
        assert!(matches!(err, Err(Error::InvalidDocument(_))));

        let err = document_from_json_str(
            r#"{"type":"doc","content":[{"type":"paragraph","content":42}]}"#,
        );
        assert!(matches!(err, Err(Error::InvalidDocument(_))));
    }

    #[test]
    fn heading_level_is_clamped() {
        let doc = document_from_json_str(
            r#"{"type":"doc","content":[
                {"type":"heading","attrs":{"level":9},"content":[{"type":"text","text":"t"}]}
            ]}"#,
        )
        .unwrap();
        assert!(matches!(doc.blocks[0], Block::Heading { level: 3, .. }));
    }

    #[test]
    fn unknown_blocks_keep_their_children() {
        let doc = document_from_json_str(
            r#"{"type":"doc","content":[
                {"type":"callout","content":[{"type":"paragraph","content":[{"type":"text","text":"inner"}]}]}
            ]}"#,
        )
        .unwrap();
        let Block::Other { children } = &doc.blocks[0] else {
            panic!("expected Other");
        };
        assert!(matches!(children[0], Block::Paragraph { .. }));
    }

    #[test]
    fn marks_are_picked_up() {
        let doc = document_from_json_str(
            r##"{"type":"doc","content":[
                {"type":"paragraph","content":[
                    {"type":"text","text":"x","marks":[
                        {"type":"bold"},
                        {"type":"textStyle","attrs":{"fontSize":"16px","color":"#ff0000","fontFamily":"Times New Roman"}}
                    ]}
                ]}
            ]}"##,
        )
        .unwrap();
        let Block::Paragraph { inline, .. } = &doc.blocks[0] else {
            panic!("expected Paragraph");
        };
        assert!(inline[0].marks.bold);
        assert_eq!(inline[0].marks.font_size_pt, Some(12.0));
        assert_eq!(inline[0].marks.color, Some([255, 0, 0]));
        assert_eq!(inline[0].marks.font_family.as_deref(), Some("Times New Roman"));
    }

    #[test]
    fn malformed_size_falls_back_silently() {
        let doc = document_from_json_str(
            r#"{"type":"doc","content":[
                {"type":"paragraph","content":[
                    {"type":"text","text":"x","marks":[{"type":"textStyle","attrs":{"fontSize":"banana"}}]}
                ]}
            ]}"#,
        )
        .unwrap();
        let Block::Paragraph { inline, .. } = &doc.blocks[0] else {
            panic!("expected Paragraph");
        };
        assert_eq!(inline[0].marks.font_size_pt, None);
    }
}
