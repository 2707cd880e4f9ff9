//! Size-to-tag assignment.
//!
//! The dominant style's size is the paragraph baseline. Every other distinct
//! size is compared against it using the spread of the distinct-size set as
//! threshold: sizes within that spread read as body text, larger ones as
//! titles, smaller ones as small print.

use std::collections::BTreeMap;
use std::fmt;

use super::profile::FontProfile;
use crate::model::{ElementType, FontSize};

/// Semantic class of a font size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeTag {
    /// Body text
    Para,
    /// Largest title sizes
    HeaderTitle,
    /// Remaining title sizes
    SubTitle,
    /// Small print (footer candidate)
    Small,
}

impl SizeTag {
    /// Tag name as written in the output.
    pub fn as_str(&self) -> &'static str {
        ElementType::from(*self).as_str()
    }

    /// Whether the tag marks a title size.
    pub fn is_title(&self) -> bool {
        matches!(self, SizeTag::HeaderTitle | SizeTag::SubTitle)
    }
}

impl From<SizeTag> for ElementType {
    fn from(tag: SizeTag) -> Self {
        match tag {
            SizeTag::Para => ElementType::Para,
            SizeTag::HeaderTitle => ElementType::HeaderTitle,
            SizeTag::SubTitle => ElementType::SubTitle,
            SizeTag::Small => ElementType::Small,
        }
    }
}

impl fmt::Display for SizeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Root mean square distance of `sizes` from `baseline`, rounded to 2 decimals.
///
/// Taken over the given sizes as-is, without weighting by usage.
pub fn size_deviation(sizes: &[FontSize], baseline: FontSize) -> f64 {
    if sizes.is_empty() {
        return 0.0;
    }

    let p = baseline.points() as f64;
    let variance = sizes
        .iter()
        .map(|s| {
            let d = s.points() as f64 - p;
            d * d
        })
        .sum::<f64>()
        / sizes.len() as f64;

    (variance.sqrt() * 100.0).round() / 100.0
}

/// Mapping from every distinct font size of a document to its tag.
#[derive(Debug, Clone, PartialEq)]
pub struct SizeTagMap {
    baseline: FontSize,
    deviation: f64,
    tags: BTreeMap<FontSize, SizeTag>,
}

impl SizeTagMap {
    /// Derive the tag map from a font profile.
    pub fn from_profile(profile: &FontProfile) -> Self {
        Self::from_sizes(&profile.distinct_sizes(), profile.dominant().size)
    }

    /// Derive the tag map from distinct sizes (largest first) and a baseline.
    pub fn from_sizes(sizes: &[FontSize], baseline: FontSize) -> Self {
        let deviation = size_deviation(sizes, baseline);
        let p = baseline.points() as f64;

        let mut tags = BTreeMap::new();
        let mut idx = 0usize;

        for &size in sizes {
            let s = size.points() as f64;
            let tag = if size == baseline {
                idx = 0;
                SizeTag::Para
            } else {
                let tag = if s > p {
                    if s - p < deviation {
                        SizeTag::Para
                    } else if idx <= 1 {
                        SizeTag::HeaderTitle
                    } else {
                        SizeTag::SubTitle
                    }
                } else if p - s < deviation {
                    SizeTag::Para
                } else {
                    SizeTag::Small
                };
                idx += 1;
                tag
            };
            tags.insert(size, tag);
        }

        // The baseline always belongs to the map, even if absent from `sizes`.
        tags.insert(baseline, SizeTag::Para);

        log::debug!(
            "Size tags: baseline={} deviation={} sizes={}",
            baseline,
            deviation,
            tags.len()
        );

        Self {
            baseline,
            deviation,
            tags,
        }
    }

    /// Tag of a size, if the size occurs in the document.
    pub fn get(&self, size: FontSize) -> Option<SizeTag> {
        self.tags.get(&size).copied()
    }

    /// Paragraph baseline size.
    pub fn baseline(&self) -> FontSize {
        self.baseline
    }

    /// Threshold used to separate body text from titles and small print.
    pub fn deviation(&self) -> f64 {
        self.deviation
    }

    /// Number of distinct sizes.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Check if the map is empty.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Iterate over (size, tag), largest size first.
    pub fn iter(&self) -> impl Iterator<Item = (FontSize, SizeTag)> + '_ {
        self.tags.iter().rev().map(|(size, tag)| (*size, *tag))
    }
}
