//! Output elements.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Semantic type of an output element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementType {
    /// Body text
    #[serde(rename = "para")]
    Para,
    /// Large text without numbering, kept from the raw size tag
    #[serde(rename = "header/title")]
    HeaderTitle,
    /// Mid-sized text kept from the raw size tag
    #[serde(rename = "sub-title")]
    SubTitle,
    /// Small text outside the page's trailing footer run
    #[serde(rename = "s")]
    Small,
    /// Small text in the page's trailing footer run
    #[serde(rename = "footer")]
    Footer,
    /// Numbered heading ("1. Introduction")
    #[serde(rename = "heading")]
    Heading,
    /// Numbered sub-heading ("2.1 Background")
    #[serde(rename = "sub-heading")]
    SubHeading,
    /// Short body-sized text opening a run
    #[serde(rename = "other")]
    Other,
    /// Image reference
    #[serde(rename = "image")]
    Image,
    /// Table reference
    #[serde(rename = "table")]
    Table,
}

impl ElementType {
    /// Wire name of the type.
    pub fn as_str(self) -> &'static str {
        match self {
            ElementType::Para => "para",
            ElementType::HeaderTitle => "header/title",
            ElementType::SubTitle => "sub-title",
            ElementType::Small => "s",
            ElementType::Footer => "footer",
            ElementType::Heading => "heading",
            ElementType::SubHeading => "sub-heading",
            ElementType::Other => "other",
            ElementType::Image => "image",
            ElementType::Table => "table",
        }
    }

    /// Whether the element references a persisted asset.
    pub fn is_asset(self) -> bool {
        matches!(self, ElementType::Image | ElementType::Table)
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified unit of the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    /// Semantic type
    #[serde(rename = "type")]
    pub kind: ElementType,

    /// Text content, or the asset path for images and tables
    pub text: String,

    /// Page number (1-indexed)
    pub page: u32,
}

impl Element {
    /// Create a new element.
    pub fn new(kind: ElementType, text: impl Into<String>, page: u32) -> Self {
        Self {
            kind,
            text: text.into(),
            page,
        }
    }

    /// Create an image element referencing a persisted file.
    pub fn image(path: impl Into<String>, page: u32) -> Self {
        Self::new(ElementType::Image, path, page)
    }

    /// Create a table element referencing a persisted file.
    pub fn table(path: impl Into<String>, page: u32) -> Self {
        Self::new(ElementType::Table, path, page)
    }
}

/// The ordered element sequence of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementSet {
    /// Elements grouped by page, in document order
    pub elements: Vec<Element>,
}

impl ElementSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element.
    pub fn push(&mut self, element: Element) {
        self.elements.push(element);
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if the set holds no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Iterate over elements.
    pub fn iter(&self) -> std::slice::Iter<'_, Element> {
        self.elements.iter()
    }

    /// Elements of one page.
    pub fn page(&self, page: u32) -> impl Iterator<Item = &Element> {
        self.elements.iter().filter(move |e| e.page == page)
    }

    /// Elements of one type.
    pub fn of_kind(&self, kind: ElementType) -> impl Iterator<Item = &Element> {
        self.elements.iter().filter(move |e| e.kind == kind)
    }
}

impl From<Vec<Element>> for ElementSet {
    fn from(elements: Vec<Element>) -> Self {
        Self { elements }
    }
}

impl IntoIterator for ElementSet {
    type Item = Element;
    type IntoIter = std::vec::IntoIter<Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}

impl<'a> IntoIterator for &'a ElementSet {
    type Item = &'a Element;
    type IntoIter = std::slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}
