//! Document structure analysis.
//!
//! Data flows one way: [`FontProfile`] → [`SizeTagMap`] →
//! {[`FooterDetector`], [`ElementAssembler`]} → elements.

pub mod assembler;
pub mod footer;
pub mod options;
pub mod profile;
pub mod tagger;

pub use assembler::{AssemblerState, Cursor, ElementAssembler, HeadingPatterns, Transition};
pub use footer::{FooterDetector, FooterIndexSet};
pub use options::{ClassifyOptions, ErrorMode, PageSelection};
pub use profile::{FontProfile, Granularity, Style, StyleKey, StyleUsage};
pub use tagger::{size_deviation, SizeTag, SizeTagMap};
