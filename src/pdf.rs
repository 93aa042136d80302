use std::collections::HashMap;

use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str};

use crate::artifact::{Artifact, DrawOp};
use crate::model::{FontFamily, Rgb};

const PT_PER_MM: f32 = 72.0 / 25.4;

/// PostScript name for a base-14 variant.
fn base_font_name(family: FontFamily, bold: bool, italic: bool) -> &'static str {
    match (family, bold, italic) {
        (FontFamily::Helvetica, false, false) => "Helvetica",
        (FontFamily::Helvetica, true, false) => "Helvetica-Bold",
        (FontFamily::Helvetica, false, true) => "Helvetica-Oblique",
        (FontFamily::Helvetica, true, true) => "Helvetica-BoldOblique",
        (FontFamily::Times, false, false) => "Times-Roman",
        (FontFamily::Times, true, false) => "Times-Bold",
        (FontFamily::Times, false, true) => "Times-Italic",
        (FontFamily::Times, true, true) => "Times-BoldItalic",
        (FontFamily::Courier, false, false) => "Courier",
        (FontFamily::Courier, true, false) => "Courier-Bold",
        (FontFamily::Courier, false, true) => "Courier-Oblique",
        (FontFamily::Courier, true, true) => "Courier-BoldOblique",
    }
}

/// Convert a UTF-8 string to WinAnsi (Windows-1252) bytes for PDF Str
/// encoding. Control characters are dropped; other unmappable chars
/// degrade to '?'.
fn to_winansi_bytes(s: &str) -> Vec<u8> {
    s.chars()
        .filter_map(|c| match c as u32 {
            0x0000..=0x001F => None,
            0x0020..=0x007F => Some(c as u8),
            0x00A0..=0x00FF => Some(c as u8), // Latin-1 supplement maps directly
            0x20AC => Some(0x80),
            0x201A => Some(0x82),
            0x0192 => Some(0x83),
            0x201E => Some(0x84),
            0x2026 => Some(0x85),
            0x2020 => Some(0x86),
            0x2021 => Some(0x87),
            0x02C6 => Some(0x88),
            0x2030 => Some(0x89),
            0x0160 => Some(0x8A),
            0x2039 => Some(0x8B),
            0x0152 => Some(0x8C),
            0x017D => Some(0x8E),
            0x2018 => Some(0x91),
            0x2019 => Some(0x92),
            0x201C => Some(0x93),
            0x201D => Some(0x94),
            0x2022 => Some(0x95),
            0x2013 => Some(0x96),
            0x2014 => Some(0x97),
            0x02DC => Some(0x98),
            0x2122 => Some(0x99),
            0x0161 => Some(0x9A),
            0x203A => Some(0x9B),
            0x0153 => Some(0x9C),
            0x017E => Some(0x9E),
            0x0178 => Some(0x9F),
            _ => Some(b'?'),
        })
        .collect()
}

fn set_fill(content: &mut Content, current: &mut Option<Rgb>, color: Rgb) {
    if *current != Some(color) {
        if color == [0, 0, 0] {
            content.set_fill_gray(0.0);
        } else {
            content.set_fill_rgb(
                color[0] as f32 / 255.0,
                color[1] as f32 / 255.0,
                color[2] as f32 / 255.0,
            );
        }
        *current = Some(color);
    }
}

/// Serialize an artifact to PDF bytes. Text uses the base-14 Type1 fonts
/// with WinAnsi encoding; nothing is embedded.
pub fn emit_pdf(artifact: &Artifact) -> Vec<u8> {
    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();

    // Register one Type1 font per (family, bold, italic) combination
    // that actually draws text.
    let mut seen_fonts: HashMap<(FontFamily, bool, bool), (String, Ref)> = HashMap::new();
    let mut font_order: Vec<(FontFamily, bool, bool)> = Vec::new();
    for page in &artifact.pages {
        for op in &page.ops {
            if let DrawOp::Text {
                family,
                bold,
                italic,
                ..
            } = op
            {
                let key = (*family, *bold, *italic);
                seen_fonts.entry(key).or_insert_with(|| {
                    font_order.push(key);
                    (format!("F{}", font_order.len()), alloc())
                });
            }
        }
    }
    for &(family, bold, italic) in &font_order {
        let (_, font_ref) = seen_fonts[&(family, bold, italic)];
        pdf.type1_font(font_ref)
            .base_font(Name(base_font_name(family, bold, italic).as_bytes()))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
    }

    let page_w = artifact.page_width_mm * PT_PER_MM;
    let page_h = artifact.page_height_mm * PT_PER_MM;
    // top-down mm -> bottom-up pt
    let flip_y = |y_mm: f32| (artifact.page_height_mm - y_mm) * PT_PER_MM;

    let mut page_ids: Vec<Ref> = Vec::with_capacity(artifact.pages.len());
    let mut content_ids: Vec<Ref> = Vec::with_capacity(artifact.pages.len());

    for page in &artifact.pages {
        let mut content = Content::new();
        let mut fill: Option<Rgb> = None;
        let mut cur_font: Option<(String, f32)> = None;

        for op in &page.ops {
            match op {
                DrawOp::Text {
                    x_mm,
                    y_mm,
                    text,
                    family,
                    bold,
                    italic,
                    size_pt,
                    color,
                } => {
                    let (pdf_name, _) = &seen_fonts[&(*family, *bold, *italic)];
                    set_fill(&mut content, &mut fill, *color);
                    content.begin_text();
                    let sel = (pdf_name.as_str(), *size_pt);
                    if cur_font.as_ref().map(|(n, s)| (n.as_str(), *s)) != Some(sel) {
                        content.set_font(Name(pdf_name.as_bytes()), *size_pt);
                        cur_font = Some((pdf_name.clone(), *size_pt));
                    }
                    content.next_line(x_mm * PT_PER_MM, flip_y(*y_mm));
                    content.show(Str(&to_winansi_bytes(text)));
                    content.end_text();
                }
                DrawOp::Rect {
                    x_mm,
                    y_mm,
                    w_mm,
                    h_mm,
                    color,
                } => {
                    set_fill(&mut content, &mut fill, *color);
                    content.rect(
                        x_mm * PT_PER_MM,
                        flip_y(y_mm + h_mm),
                        w_mm * PT_PER_MM,
                        h_mm * PT_PER_MM,
                    );
                    content.fill_nonzero();
                }
                DrawOp::Line {
                    x1_mm,
                    y1_mm,
                    x2_mm,
                    y2_mm,
                    width_mm,
                    color,
                } => {
                    content.save_state();
                    content.set_stroke_rgb(
                        color[0] as f32 / 255.0,
                        color[1] as f32 / 255.0,
                        color[2] as f32 / 255.0,
                    );
                    content.set_line_width(width_mm * PT_PER_MM);
                    content.move_to(x1_mm * PT_PER_MM, flip_y(*y1_mm));
                    content.line_to(x2_mm * PT_PER_MM, flip_y(*y2_mm));
                    content.stroke();
                    content.restore_state();
                }
            }
        }

        let content_id = alloc();
        pdf.stream(content_id, &content.finish());
        content_ids.push(content_id);
        page_ids.push(alloc());
    }

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(page_ids.len() as i32);

    for (i, &page_id) in page_ids.iter().enumerate() {
        let mut page = pdf.page(page_id);
        page.media_box(Rect::new(0.0, 0.0, page_w, page_h))
            .parent(pages_id)
            .contents(content_ids[i]);
        let mut resources = page.resources();
        let mut fonts = resources.fonts();
        for key in &font_order {
            let (name, font_ref) = &seen_fonts[key];
            fonts.pair(Name(name.as_bytes()), *font_ref);
        }
    }

    pdf.finish()
}
