//! Classification options and configuration.

use std::ops::RangeInclusive;

use crate::error::{Error, Result};

use super::profile::Granularity;

/// Default minimum length (in characters) of an emitted text element.
pub const DEFAULT_MIN_ELEMENT_CHARS: usize = 4;

/// Default length (in characters) above which large text is demoted to body text.
pub const DEFAULT_MAX_HEADING_CHARS: usize = 60;

/// Options for classifying a document.
#[derive(Debug, Clone)]
pub struct ClassifyOptions {
    /// Which style attributes discriminate histogram entries
    pub granularity: Granularity,

    /// Buffers shorter than this are dropped at flush time
    pub min_element_chars: usize,

    /// Large text longer than this is treated as a paragraph
    pub max_heading_chars: usize,

    /// Whether to emit image elements
    pub extract_images: bool,

    /// Whether to emit table elements
    pub extract_tables: bool,

    /// Whether to classify pages in parallel
    pub parallel: bool,

    /// Page selection (which pages emit elements)
    pub pages: PageSelection,

    /// Error handling mode for asset collaborators
    pub error_mode: ErrorMode,

    /// Normalize span text to Unicode NFC before assembly
    pub normalize_unicode: bool,
}

impl ClassifyOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the histogram granularity.
    pub fn with_granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = granularity;
        self
    }

    /// Discriminate styles by size, flags, font and color.
    pub fn granular(mut self) -> Self {
        self.granularity = Granularity::Full;
        self
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

    /// Enable or disable image elements.
    pub fn with_images(mut self, extract: bool) -> Self {
        self.extract_images = extract;
        self
    }

    /// Enable or disable table elements.
    pub fn with_tables(mut self, extract: bool) -> Self {
        self.extract_tables = extract;
        self
    }

    /// Classify text only.
    pub fn text_only(mut self) -> Self {
        self.extract_images = false;
        self.extract_tables = false;
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (skip failing collaborators).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Abort on the first asset collaborator failure.
    pub fn strict(mut self) -> Self {
        self.error_mode = ErrorMode::Strict;
        self
    }

    /// Enable or disable NFC normalization of span text.
    pub fn with_unicode_normalization(mut self, normalize: bool) -> Self {
        self.normalize_unicode = normalize;
        self
    }
}

impl Default for ClassifyOptions {
    fn default() -> Self {
        Self {
            granularity: Granularity::SizeOnly,
            min_element_chars: DEFAULT_MIN_ELEMENT_CHARS,
            max_heading_chars: DEFAULT_MAX_HEADING_CHARS,
            extract_images: true,
            extract_tables: true,
            parallel: true,
            pages: PageSelection::All,
            error_mode: ErrorMode::Lenient,
            normalize_unicode: false,
        }
    }
}

/// Error handling mode for asset collaborators.
///
/// Only a document without text spans is fatal by itself. Asset failures
/// degrade to fewer elements unless `Strict` is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any collaborator error
    Strict,
    /// Log the failure and emit no assets for that page
    #[default]
    Lenient,
}

/// Page selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelection {
    /// All pages
    #[default]
    All,
    /// A range of pages (inclusive, 1-indexed)
    Range(RangeInclusive<u32>),
    /// Specific pages (1-indexed)
    Pages(Vec<u32>),
}

impl PageSelection {
    /// Check if a page number is selected.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.contains(&page),
        }
    }

    /// Parse a page selection string (e.g., "1-10", "1,3,5,7-10").
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        if s.is_empty() || s == "all" {
            return Ok(PageSelection::All);
        }

        let invalid = |what: &str| Error::InvalidPageRange(format!("{} in \"{}\"", what, s));

        if let Some((start, end)) = s.split_once('-') {
            if !start.contains(',') && !end.contains(',') {
                let start: u32 = start.trim().parse().map_err(|_| invalid("invalid start page"))?;
                let end: u32 = end.trim().parse().map_err(|_| invalid("invalid end page"))?;
                if start == 0 || end < start {
                    return Err(invalid("empty range"));
                }
                return Ok(PageSelection::Range(start..=end));
            }
        }

        let mut pages = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            if let Some((start, end)) = part.split_once('-') {
                let start: u32 = start.trim().parse().map_err(|_| invalid("invalid page number"))?;
                let end: u32 = end.trim().parse().map_err(|_| invalid("invalid page number"))?;
                for p in start..=end {
                    if !pages.contains(&p) {
                        pages.push(p);
                    }
                }
            } else {
                let p: u32 = part.parse().map_err(|_| invalid("invalid page number"))?;
                if !pages.contains(&p) {
                    pages.push(p);
                }
            }
        }

        if pages.contains(&0) {
            return Err(invalid("pages are 1-indexed"));
        }

        pages.sort();
        Ok(PageSelection::Pages(pages))
    }
}
