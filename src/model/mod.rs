//! Document model types.
//!
//! Input side: the span dump produced by an external PDF rendering layer
//! (pages of blocks of lines of styled spans). Output side: the flat,
//! page-ordered sequence of tagged [`Element`]s.

mod asset;
mod document;
mod element;
mod span;

pub use asset::{ImageAsset, TableData};
pub use document::SpanDocument;
pub use element::{Element, ElementSet, ElementType};
pub use span::{Block, FontSize, Line, SourcePage, Span};
