//! Document-level classification: asset collaborators and page orchestration.
//!
//! # Example
//!
//! ```no_run
//! use pdfstruct::extract::{FolderSink, PageOrchestrator};
//! use pdfstruct::SpanDocument;
//!
//! fn main() -> pdfstruct::Result<()> {
//!     let doc = SpanDocument::open("paper.json")?;
//!     let sink = FolderSink::new("paper");
//!
//!     let result = PageOrchestrator::new(&doc).with_sink(&sink).run()?;
//!     for element in &result.elements {
//!         println!("[{}] p{}: {}", element.kind, element.page, element.text);
//!     }
//!     Ok(())
//! }
//! ```

mod collaborators;
mod orchestrator;

pub use collaborators::{AssetSink, FolderSink, NoAssets, PageImages, TableExtractor};
pub use orchestrator::{classify_document, Classification, PageOrchestrator};
