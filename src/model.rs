pub type Rgb = [u8; 3];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

/// The three output font families text can resolve to. Arbitrary family
/// names from the document are mapped onto these (see `resolve`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub enum FontFamily {
    Helvetica,
    Times,
    Courier,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VertAlign {
    #[default]
    Baseline,
    Superscript,
    Subscript,
}

/// Formatting marks on an inline run. Every field is optional; absence
/// means "inherit the block default".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Marks {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strike: bool,
    pub superscript: bool,
    pub subscript: bool,
    pub font_family: Option<String>,
    pub font_size_pt: Option<f32>,
    pub color: Option<Rgb>,
    pub highlight: Option<Rgb>,
}

/// A contiguous span of text sharing one set of marks.
#[derive(Clone, Debug, PartialEq)]
pub struct InlineRun {
    pub text: String,
    pub marks: Marks,
}

impl InlineRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            marks: Marks::default(),
        }
    }
}

/// One structural node of the document.
///
/// `Other` carries blocks of a kind this engine does not know; the
/// renderer recurses into their children instead of failing.
#[derive(Clone, Debug, PartialEq)]
pub enum Block {
    Heading {
        level: u8,
        align: Alignment,
        inline: Vec<InlineRun>,
    },
    Paragraph {
        align: Alignment,
        inline: Vec<InlineRun>,
    },
    BulletList {
        items: Vec<Block>,
    },
    OrderedList {
        items: Vec<Block>,
    },
    ListItem {
        blocks: Vec<Block>,
    },
    Blockquote {
        blocks: Vec<Block>,
    },
    CodeBlock {
        text: String,
    },
    HorizontalRule,
    Other {
        children: Vec<Block>,
    },
}

impl Block {
    pub fn paragraph(text: impl Into<String>) -> Self {
        Block::Paragraph {
            align: Alignment::Left,
            inline: vec![InlineRun::plain(text)],
        }
    }

    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Block::Heading {
            level,
            align: Alignment::Left,
            inline: vec![InlineRun::plain(text)],
        }
    }
}

/// Root of a document. Immutable input to the engine; the renderer never
/// mutates it and holds no state between invocations.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DocumentTree {
    pub blocks: Vec<Block>,
}

impl DocumentTree {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }
}
