//! Span merging and element tagging.
//!
//! Spans are walked in emission order. Consecutive spans of the same size
//! inside a text block are joined into one run; a run is flushed as an
//! [`Element`] when the size changes or the block ends. The tag of a run is
//! derived from its first span.

use std::borrow::Cow;
use std::mem;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use super::footer::FooterIndexSet;
use super::options::{ClassifyOptions, DEFAULT_MAX_HEADING_CHARS, DEFAULT_MIN_ELEMENT_CHARS};
use super::tagger::{SizeTag, SizeTagMap};
use crate::model::{Element, ElementType, FontSize, SourcePage, Span};

/// Numbering patterns that promote title-sized text to headings.
#[derive(Debug, Clone)]
pub struct HeadingPatterns {
    heading: Regex,
    sub_heading: Regex,
}

impl HeadingPatterns {
    /// Create the default patterns.
    pub fn new() -> Self {
        Self {
            // "1. Intro", "1) Intro", "1 Intro"
            heading: Regex::new(r"^\d+(?:[.)]\s*|\s+)\S").unwrap(),
            // "1.1 Intro", "1.2) Intro", "1.4. Intro"
            sub_heading: Regex::new(r"^\d+\.\d+[.)]?\s*\S").unwrap(),
        }
    }

    /// Check for leading integer numbering.
    pub fn is_heading(&self, text: &str) -> bool {
        self.heading.is_match(text)
    }

    /// Check for leading `N.N` numbering.
    pub fn is_sub_heading(&self, text: &str) -> bool {
        self.sub_heading.is_match(text)
    }
}

impl Default for HeadingPatterns {
    fn default() -> Self {
        Self::new()
    }
}

/// Position of the span being assembled.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'f> {
    /// Page number (1-indexed)
    pub page: u32,
    /// Block index within the page
    pub block: usize,
    /// Footer candidates of the page
    pub footers: &'f FooterIndexSet,
}

impl Cursor<'_> {
    fn in_footer(&self) -> bool {
        self.footers.contains(self.block)
    }
}

/// What a span did to the assembler state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// First visible span of the document; takes the raw size tag
    Started,
    /// Same size as the previous span; joined onto the current run
    Appended,
    /// Same size as the previous span but the block's run was empty;
    /// opens a new run with a reclassified tag
    Reopened,
    /// Size changed; the previous run was flushed (if long enough)
    /// and a new run opened with a reclassified tag
    Boundary {
        /// The element emitted for the closed run
        flushed: Option<Element>,
    },
    /// Blank span, or a size outside the tag map
    Ignored,
}

/// Mutable state of the span walk.
///
/// The run buffer is scoped to a text block; the previous span size carries
/// across blocks of a page.
#[derive(Debug, Clone, Default)]
pub struct AssemblerState {
    buffer: String,
    active_tag: Option<ElementType>,
    previous_size: Option<FontSize>,
    started: bool,
}

impl AssemblerState {
    /// State at the start of a document. The first visible span keeps its raw tag.
    pub fn new() -> Self {
        Self::default()
    }

    /// State at the start of any later page.
    pub fn resumed() -> Self {
        Self {
            started: true,
            ..Self::default()
        }
    }

    /// Text of the current run.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Tag of the current run.
    pub fn active_tag(&self) -> Option<ElementType> {
        self.active_tag
    }

    /// Size of the last visible span.
    pub fn previous_size(&self) -> Option<FontSize> {
        self.previous_size
    }

    /// Start a new text block with an empty run.
    pub fn begin_block(&mut self) {
        self.buffer.clear();
    }

    /// Close the current run.
    ///
    /// Returns an element when the run holds at least `min_chars` characters;
    /// shorter runs are dropped.
    pub fn flush(&mut self, page: u32, min_chars: usize) -> Option<Element> {
        let text = mem::take(&mut self.buffer);
        match self.active_tag {
            Some(kind) if text.chars().count() >= min_chars => Some(Element::new(kind, text, page)),
            _ => None,
        }
    }

    fn open_run(&mut self, text: &str, tag: ElementType) {
        self.buffer.clear();
        self.buffer.push_str(text);
        self.active_tag = Some(tag);
    }
}

/// Turns the spans of a page into tagged text elements.
#[derive(Debug, Clone)]
pub struct ElementAssembler<'a> {
    tags: &'a SizeTagMap,
    patterns: HeadingPatterns,
    min_element_chars: usize,
    max_heading_chars: usize,
    normalize_unicode: bool,
}

impl<'a> ElementAssembler<'a> {
    /// Create an assembler with default thresholds.
    pub fn new(tags: &'a SizeTagMap) -> Self {
        Self {
            tags,
            patterns: HeadingPatterns::new(),
            min_element_chars: DEFAULT_MIN_ELEMENT_CHARS,
            max_heading_chars: DEFAULT_MAX_HEADING_CHARS,
            normalize_unicode: false,
        }
    }

    /// Create an assembler configured from classification options.
    pub fn from_options(tags: &'a SizeTagMap, options: &ClassifyOptions) -> Self {
        Self::new(tags)
            .with_min_element_chars(options.min_element_chars)
            .with_max_heading_chars(options.max_heading_chars)
            .with_unicode_normalization(options.normalize_unicode)
    }

    /// Set the minimum element length.
    pub fn with_min_element_chars(mut self, chars: usize) -> Self {
        self.min_element_chars = chars;
        self
    }

    /// Set the heading length threshold.
    pub fn with_max_heading_chars(mut self, chars: usize) -> Self {
        self.max_heading_chars = chars;
        self
    }

    /// Enable or disable NFC normalization of span text.
    pub fn with_unicode_normalization(mut self, normalize: bool) -> Self {
        self.normalize_unicode = normalize;
        self
    }

    /// Tag for a span opening a new run.
    ///
    /// Footer runs override small print; title sizes become headings only
    /// when numbered and short; short body-sized text becomes `other`.
    pub fn reclassify(&self, raw: SizeTag, text: &str, in_footer: bool) -> ElementType {
        let len = text.chars().count();
        match raw {
            SizeTag::Small if in_footer => ElementType::Footer,
            SizeTag::HeaderTitle | SizeTag::SubTitle => {
                if len > self.max_heading_chars {
                    ElementType::Para
                } else if self.patterns.is_sub_heading(text) {
                    ElementType::SubHeading
                } else if self.patterns.is_heading(text) {
                    ElementType::Heading
                } else {
                    ElementType::Para
                }
            }
            SizeTag::Para if len < self.max_heading_chars => ElementType::Other,
            other => other.into(),
        }
    }

    /// Whether `span` continues the run of the previous span.
    pub fn continues_run(state: &AssemblerState, span: &Span) -> bool {
        state.previous_size == Some(span.size)
    }

    /// Feed one span into the state machine.
    pub fn transition(
        &self,
        state: &mut AssemblerState,
        span: &Span,
        cursor: Cursor<'_>,
    ) -> Transition {
        if span.is_blank() {
            return Transition::Ignored;
        }

        let raw = match self.tags.get(span.size) {
            Some(tag) => tag,
            None => {
                log::warn!(
                    "Page {}: no tag for font size {}, skipping span",
                    cursor.page,
                    span.size
                );
                return Transition::Ignored;
            }
        };

        let text = self.prepare_text(&span.text);

        let outcome = if !state.started {
            state.started = true;
            state.open_run(&text, raw.into());
            Transition::Started
        } else if Self::continues_run(state, span) {
            if state.buffer.is_empty() {
                let tag = self.reclassify(raw, &text, cursor.in_footer());
                state.open_run(&text, tag);
                Transition::Reopened
            } else {
                state.buffer.push(' ');
                state.buffer.push_str(&text);
                Transition::Appended
            }
        } else {
            let flushed = state.flush(cursor.page, self.min_element_chars);
            let tag = self.reclassify(raw, &text, cursor.in_footer());
            state.open_run(&text, tag);
            Transition::Boundary { flushed }
        };

        state.previous_size = Some(span.size);
        outcome
    }

    /// Assemble the text elements of one page.
    ///
    /// `state` is [`AssemblerState::new`] for the page holding the document's
    /// first visible span and [`AssemblerState::resumed`] for every other page.
    pub fn assemble_page(
        &self,
        page: &SourcePage,
        footers: &FooterIndexSet,
        mut state: AssemblerState,
    ) -> Vec<Element> {
        let mut elements = Vec::new();

        for (index, block) in page.blocks.iter().enumerate() {
            if !block.is_text() {
                continue;
            }

            let cursor = Cursor {
                page: page.number,
                block: index,
                footers,
            };

            state.begin_block();
            for span in block.spans() {
                if let Transition::Boundary { flushed: Some(element) } =
                    self.transition(&mut state, span, cursor)
                {
                    elements.push(element);
                }
            }

            if let Some(element) = state.flush(page.number, self.min_element_chars) {
                elements.push(element);
            }
        }

        log::debug!("Page {}: {} text elements", page.number, elements.len());
        elements
    }

    fn prepare_text<'t>(&self, text: &'t str) -> Cow<'t, str> {
        if self.normalize_unicode {
            Cow::Owned(text.nfc().collect())
        } else {
            Cow::Borrowed(text)
        }
    }
}
