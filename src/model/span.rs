//! Span-level input types produced by the rendering layer.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::{ImageAsset, TableData};

/// A font size in points, usable as an exact map key.
///
/// Two sizes are equal only when their `f32` values are identical, which is
/// the continuation criterion used when merging spans into runs.
#[derive(Debug, Clone, Copy)]
pub struct FontSize(f32);

impl FontSize {
    /// Wrap a raw size. Returns `None` for non-finite or non-positive values.
    pub fn new(points: f32) -> Option<Self> {
        if points.is_finite() && points > 0.0 {
            Some(Self(points))
        } else {
            None
        }
    }

    /// The size in points.
    pub fn points(self) -> f32 {
        self.0
    }
}

impl PartialEq for FontSize {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for FontSize {}

impl Hash for FontSize {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl PartialOrd for FontSize {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FontSize {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for FontSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An atomic styled text run.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    /// The text content (may be empty or whitespace)
    pub text: String,
    /// Font size
    pub size: FontSize,
    /// Font identifier (e.g., "Helvetica-Bold")
    pub font: String,
    /// Style bit-set reported by the rendering layer
    pub flags: u32,
    /// sRGB color as an integer
    pub color: u32,
}

impl Span {
    /// Create a span with default font, flags and color.
    pub fn new(text: impl Into<String>, size: FontSize) -> Self {
        Self {
            text: text.into(),
            size,
            font: String::new(),
            flags: 0,
            color: 0,
        }
    }

    /// Set the font identifier.
    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.font = font.into();
        self
    }

    /// Set the style flags.
    pub fn with_flags(mut self, flags: u32) -> Self {
        self.flags = flags;
        self
    }

    /// Set the color.
    pub fn with_color(mut self, color: u32) -> Self {
        self.color = color;
        self
    }

    /// Whether the span carries no visible text.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Length of the text in characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// A line of spans.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Line {
    /// Spans in emission order
    pub spans: Vec<Span>,
}

impl Line {
    /// Create a line from spans.
    pub fn new(spans: Vec<Span>) -> Self {
        Self { spans }
    }
}

/// A layout block on a page.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// A block of text lines
    Text {
        /// Lines in emission order
        lines: Vec<Line>,
    },
    /// A non-text block (image placeholder, drawing, etc.)
    Other,
}

impl Block {
    /// Create a text block.
    pub fn text(lines: Vec<Line>) -> Self {
        Block::Text { lines }
    }

    /// Create a text block holding a single line.
    pub fn single_line(spans: Vec<Span>) -> Self {
        Block::Text {
            lines: vec![Line::new(spans)],
        }
    }

    /// Check if this block carries text.
    pub fn is_text(&self) -> bool {
        matches!(self, Block::Text { .. })
    }

    /// Iterate over all spans of the block in emission order.
    ///
    /// Non-text blocks yield nothing.
    pub fn spans(&self) -> impl Iterator<Item = &Span> {
        let lines: &[Line] = match self {
            Block::Text { lines } => lines,
            Block::Other => &[],
        };
        lines.iter().flat_map(|line| line.spans.iter())
    }
}

/// One page as emitted by the rendering layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourcePage {
    /// Page number (1-indexed)
    pub number: u32,

    /// Page width in points, if reported
    pub width: Option<f32>,

    /// Page height in points, if reported
    pub height: Option<f32>,

    /// Blocks in emission order
    pub blocks: Vec<Block>,

    /// Embedded raster images shipped with the dump
    pub images: Vec<ImageAsset>,

    /// Tables extracted for this page
    pub tables: Vec<TableData>,
}

impl SourcePage {
    /// Create an empty page.
    pub fn new(number: u32) -> Self {
        Self {
            number,
            ..Default::default()
        }
    }

    /// Add a block to the page.
    pub fn add_block(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Builder-style variant of [`SourcePage::add_block`].
    pub fn with_block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    /// Iterate over all spans of all text blocks.
    pub fn spans(&self) -> impl Iterator<Item = &Span> {
        self.blocks.iter().flat_map(|b| b.spans())
    }

    /// Whether the page holds at least one span with visible text.
    pub fn has_text(&self) -> bool {
        self.spans().any(|s| !s.is_blank())
    }
}
