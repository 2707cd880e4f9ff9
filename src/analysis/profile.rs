//! Font usage profiling.
//!
//! Builds a histogram of span styles over the whole document. The most used
//! style becomes the paragraph baseline for size tagging.

use std::fmt;

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::model::{FontSize, Span, SpanDocument};

/// Which span attributes discriminate histogram entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Granularity {
    /// Size alone
    #[default]
    SizeOnly,
    /// Size, flags, font and color
    Full,
}

/// Histogram key derived from a span.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StyleKey {
    /// Size-only fingerprint
    Size(FontSize),
    /// Full style fingerprint
    Styled {
        /// Font size
        size: FontSize,
        /// Style flags
        flags: u32,
        /// Font identifier
        font: String,
        /// Color
        color: u32,
    },
}

impl StyleKey {
    /// Fingerprint a span.
    pub fn of(span: &Span, granularity: Granularity) -> Self {
        match granularity {
            Granularity::SizeOnly => StyleKey::Size(span.size),
            Granularity::Full => StyleKey::Styled {
                size: span.size,
                flags: span.flags,
                font: span.font.clone(),
                color: span.color,
            },
        }
    }

    /// Font size of the key.
    pub fn size(&self) -> FontSize {
        match self {
            StyleKey::Size(size) => *size,
            StyleKey::Styled { size, .. } => *size,
        }
    }
}

impl fmt::Display for StyleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleKey::Size(size) => write!(f, "{}", size),
            StyleKey::Styled {
                size,
                flags,
                font,
                color,
            } => write!(f, "{}_{}_{}_{}", size, flags, font, color),
        }
    }
}

/// Representative style attributes of a histogram entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    /// Font size
    pub size: FontSize,
    /// Font identifier
    pub font: String,
    /// Style flags (granular profiles only)
    pub flags: Option<u32>,
    /// Color (granular profiles only)
    pub color: Option<u32>,
}

impl Style {
    fn of(span: &Span, granularity: Granularity) -> Self {
        let granular = granularity == Granularity::Full;
        Self {
            size: span.size,
            font: span.font.clone(),
            flags: granular.then_some(span.flags),
            color: granular.then_some(span.color),
        }
    }
}

/// One ranked histogram entry.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleUsage<'a> {
    /// Histogram key
    pub key: &'a StyleKey,
    /// Representative style
    pub style: &'a Style,
    /// Number of spans with this key
    pub count: usize,
}

#[derive(Debug, Clone)]
struct Entry {
    style: Style,
    count: usize,
}

/// Style usage histogram of a document.
///
/// Keys keep first-seen order, so ranking by count is deterministic.
#[derive(Debug, Clone)]
pub struct FontProfile {
    granularity: Granularity,
    entries: IndexMap<StyleKey, Entry>,
    dominant: usize,
}

impl FontProfile {
    /// Profile every span of every text block in the document.
    ///
    /// Fails with [`Error::NoDiscriminatingStyle`] when the document holds no spans.
    pub fn build(doc: &SpanDocument, granularity: Granularity) -> Result<Self> {
        Self::from_spans(doc.spans(), granularity)
    }

    /// Profile an arbitrary span sequence.
    pub fn from_spans<'a, I>(spans: I, granularity: Granularity) -> Result<Self>
    where
        I: IntoIterator<Item = &'a Span>,
    {
        let mut entries: IndexMap<StyleKey, Entry> = IndexMap::new();

        for span in spans {
            let style = Style::of(span, granularity);
            entries
                .entry(StyleKey::of(span, granularity))
                .and_modify(|entry| {
                    // Representative attributes follow the latest span.
                    entry.style = style.clone();
                    entry.count += 1;
                })
                .or_insert(Entry { style, count: 1 });
        }

        if entries.is_empty() {
            return Err(Error::NoDiscriminatingStyle);
        }

        // First-seen key wins ties.
        let mut dominant = 0;
        for (index, entry) in entries.values().enumerate() {
            if entry.count > entries[dominant].count {
                dominant = index;
            }
        }

        log::debug!(
            "Font profile: {} styles over {} spans",
            entries.len(),
            entries.values().map(|e| e.count).sum::<usize>()
        );

        Ok(Self {
            granularity,
            entries,
            dominant,
        })
    }

    /// Granularity the profile was built with.
    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Number of distinct style keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false for a built profile; present for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of profiled spans.
    pub fn total_spans(&self) -> usize {
        self.entries.values().map(|e| e.count).sum()
    }

    /// Usage count of a key.
    pub fn count(&self, key: &StyleKey) -> usize {
        self.entries.get(key).map(|e| e.count).unwrap_or(0)
    }

    /// Representative style of a key.
    pub fn style(&self, key: &StyleKey) -> Option<&Style> {
        self.entries.get(key).map(|e| &e.style)
    }

    /// Entries sorted by descending count; ties keep first-seen order.
    pub fn ranked(&self) -> Vec<StyleUsage<'_>> {
        let mut ranked: Vec<StyleUsage<'_>> = self
            .entries
            .iter()
            .map(|(key, entry)| StyleUsage {
                key,
                style: &entry.style,
                count: entry.count,
            })
            .collect();
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked
    }

    /// The most used style.
    pub fn dominant(&self) -> &Style {
        &self.entries[self.dominant].style
    }

    /// Distinct font sizes across all keys, largest first.
    pub fn distinct_sizes(&self) -> Vec<FontSize> {
        let mut sizes: Vec<FontSize> = self.entries.keys().map(StyleKey::size).collect();
        sizes.sort_by(|a, b| b.cmp(a));
        sizes.dedup();
        sizes
    }
}
