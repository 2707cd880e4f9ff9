//! Extraction statistics.

use serde::{Deserialize, Serialize};

use crate::model::{Element, ElementSet, ElementType};

/// Statistics collected while classifying a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Number of pages that emitted elements
    pub page_count: u32,

    /// Number of `para` elements
    pub para_count: u32,

    /// Number of `header/title` elements
    pub header_title_count: u32,

    /// Number of `sub-title` elements
    pub sub_title_count: u32,

    /// Number of `heading` elements
    pub heading_count: u32,

    /// Number of `sub-heading` elements
    pub sub_heading_count: u32,

    /// Number of `s` elements
    pub small_count: u32,

    /// Number of `footer` elements
    pub footer_count: u32,

    /// Number of `other` elements
    pub other_count: u32,

    /// Number of `image` elements
    pub image_count: u32,

    /// Number of `table` elements
    pub table_count: u32,

    /// Spans dropped while loading the input
    pub malformed_span_count: u32,

    /// Character count of text elements (excluding whitespace)
    pub char_count: u32,
}

impl ExtractionStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect statistics over an element sequence.
    pub fn from_elements(elements: &ElementSet) -> Self {
        let mut stats = Self::new();
        for element in elements {
            stats.add_element(element);
        }
        stats
    }

    /// Count one element.
    pub fn add_element(&mut self, element: &Element) {
        *self.counter_mut(element.kind) += 1;
        if !element.kind.is_asset() {
            self.count_text(&element.text);
        }
    }

    /// Increment page count.
    pub fn add_page(&mut self) {
        self.page_count += 1;
    }

    /// Add character counts from text.
    pub fn count_text(&mut self, text: &str) {
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }

    /// Number of elements of one type.
    pub fn count(&self, kind: ElementType) -> u32 {
        match kind {
            ElementType::Para => self.para_count,
            ElementType::HeaderTitle => self.header_title_count,
            ElementType::SubTitle => self.sub_title_count,
            ElementType::Heading => self.heading_count,
            ElementType::SubHeading => self.sub_heading_count,
            ElementType::Small => self.small_count,
            ElementType::Footer => self.footer_count,
            ElementType::Other => self.other_count,
            ElementType::Image => self.image_count,
            ElementType::Table => self.table_count,
        }
    }

    /// Total number of elements.
    pub fn element_count(&self) -> u32 {
        self.text_element_count() + self.image_count + self.table_count
    }

    /// Number of text elements.
    pub fn text_element_count(&self) -> u32 {
        self.para_count
            + self.header_title_count
            + self.sub_title_count
            + self.heading_count
            + self.sub_heading_count
            + self.small_count
            + self.footer_count
            + self.other_count
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &ExtractionStats) {
        self.page_count += other.page_count;
        self.para_count += other.para_count;
        self.header_title_count += other.header_title_count;
        self.sub_title_count += other.sub_title_count;
        self.heading_count += other.heading_count;
        self.sub_heading_count += other.sub_heading_count;
        self.small_count += other.small_count;
        self.footer_count += other.footer_count;
        self.other_count += other.other_count;
        self.image_count += other.image_count;
        self.table_count += other.table_count;
        self.malformed_span_count += other.malformed_span_count;
        self.char_count += other.char_count;
    }

    fn counter_mut(&mut self, kind: ElementType) -> &mut u32 {
        match kind {
            ElementType::Para => &mut self.para_count,
            ElementType::HeaderTitle => &mut self.header_title_count,
            ElementType::SubTitle => &mut self.sub_title_count,
            ElementType::Heading => &mut self.heading_count,
            ElementType::SubHeading => &mut self.sub_heading_count,
            ElementType::Small => &mut self.small_count,
            ElementType::Footer => &mut self.footer_count,
            ElementType::Other => &mut self.other_count,
            ElementType::Image => &mut self.image_count,
            ElementType::Table => &mut self.table_count,
        }
    }
}
