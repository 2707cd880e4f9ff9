//! # pdfstruct
//!
//! Logical structure inference for PDF text.
//!
//! An external rendering layer turns a PDF into a "span dump": pages of
//! blocks of lines of styled text spans. This library profiles the font
//! usage of the whole document, derives a semantic tag for every font size,
//! and walks the spans page by page to produce a flat, page-ordered list of
//! tagged elements (titles, headings, paragraphs, footers, images, tables).
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfstruct::{classify_file, render};
//!
//! fn main() -> pdfstruct::Result<()> {
//!     let elements = classify_file("paper.json")?;
//!     let json = render::to_json(&elements, render::JsonFormat::Pretty)?;
//!     println!("{}", json);
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - [`FontProfile`]: style usage histogram, dominant style = paragraph baseline
//! - [`SizeTagMap`]: one tag per distinct size (`para`, `header/title`, `sub-title`, `s`)
//! - [`FooterDetector`]: trailing small-print blocks of each page
//! - [`ElementAssembler`]: merges same-size runs and reclassifies them
//! - [`PageOrchestrator`]: images, then tables, then text, page by page

pub mod analysis;
pub mod detect;
pub mod error;
pub mod extract;
pub mod model;
pub mod render;

// Re-export commonly used types
pub use analysis::{
    ClassifyOptions, ElementAssembler, ErrorMode, FontProfile, FooterDetector, FooterIndexSet,
    Granularity, PageSelection, SizeTag, SizeTagMap,
};
pub use detect::{detect_input_kind_from_bytes, detect_input_kind_from_path, is_pdf, InputKind};
pub use error::{Error, Result};
pub use extract::{
    classify_document, AssetSink, Classification, FolderSink, NoAssets, PageImages,
    PageOrchestrator, TableExtractor,
};
pub use model::{
    Block, Element, ElementSet, ElementType, FontSize, ImageAsset, Line, SourcePage, Span,
    SpanDocument, TableData,
};
pub use render::{ExtractionStats, JsonFormat};

use std::path::{Path, PathBuf};

/// Classify the text of a span dump file.
///
/// # Example
///
/// ```no_run
/// use pdfstruct::classify_file;
///
/// let elements = classify_file("paper.json").unwrap();
/// println!("Elements: {}", elements.len());
/// ```
pub fn classify_file<P: AsRef<Path>>(path: P) -> Result<ElementSet> {
    classify_file_with_options(path, &ClassifyOptions::default())
}

/// Classify the text of a span dump file with custom options.
///
/// # Example
///
/// ```no_run
/// use pdfstruct::{classify_file_with_options, ClassifyOptions};
///
/// let options = ClassifyOptions::new().granular().sequential();
/// let elements = classify_file_with_options("paper.json", &options).unwrap();
/// ```
pub fn classify_file_with_options<P: AsRef<Path>>(
    path: P,
    options: &ClassifyOptions,
) -> Result<ElementSet> {
    let doc = SpanDocument::open(path)?;
    classify_document(&doc, options)
}

/// Classify the text of a span dump held in memory.
pub fn classify_json(json: &str) -> Result<ElementSet> {
    let doc = SpanDocument::from_json_str(json)?;
    classify_document(&doc, &ClassifyOptions::default())
}

/// Classify a span dump file and persist its images and tables into `out_dir`.
///
/// # Example
///
/// ```no_run
/// use pdfstruct::extract_to_folder;
///
/// let result = extract_to_folder("paper.json", "paper").unwrap();
/// println!("{} images, {} tables", result.stats.image_count, result.stats.table_count);
/// ```
pub fn extract_to_folder<P: AsRef<Path>, Q: AsRef<Path>>(
    path: P,
    out_dir: Q,
) -> Result<Classification> {
    Classifier::new().with_asset_dir(out_dir.as_ref()).classify(path)
}

/// Classify a span dump file without blocking the async runtime.
#[cfg(feature = "async")]
pub async fn classify_file_async<P: AsRef<Path>>(
    path: P,
    options: ClassifyOptions,
) -> Result<ElementSet> {
    let doc = SpanDocument::open_async(path).await?;
    classify_document(&doc, &options)
}

/// Builder for classifying span dumps.
///
/// # Example
///
/// ```no_run
/// use pdfstruct::Classifier;
///
/// let result = Classifier::new()
///     .granular()
///     .with_asset_dir("./paper")
///     .strict()
///     .classify("paper.json")?;
/// println!("{}", result.to_json(pdfstruct::JsonFormat::Pretty)?);
/// # Ok::<(), pdfstruct::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    options: ClassifyOptions,
    asset_dir: Option<PathBuf>,
}

impl Classifier {
    /// Create a new classifier builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all options at once.
    pub fn with_options(mut self, options: ClassifyOptions) -> Self {
        self.options = options;
        self
    }

    /// Discriminate styles by size, flags, font and color.
    pub fn granular(mut self) -> Self {
        self.options = self.options.granular();
        self
    }

    /// Skip failing asset collaborators instead of aborting (the default).
    pub fn lenient(mut self) -> Self {
        self.options = self.options.lenient();
        self
    }

    /// Abort on the first failing asset collaborator.
    pub fn strict(mut self) -> Self {
        self.options = self.options.strict();
        self
    }

    /// Classify text only.
    pub fn text_only(mut self) -> Self {
        self.options = self.options.text_only();
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.options = self.options.sequential();
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.options = self.options.with_pages(pages);
        self
    }

    /// NFC-normalize span text before assembly.
    pub fn with_unicode_normalization(mut self) -> Self {
        self.options = self.options.with_unicode_normalization(true);
        self
    }

    /// Persist images and tables into a folder.
    pub fn with_asset_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.asset_dir = Some(dir.into());
        self
    }

    /// The options in use.
    pub fn options(&self) -> &ClassifyOptions {
        &self.options
    }

    /// Classify a span dump file.
    pub fn classify<P: AsRef<Path>>(&self, path: P) -> Result<Classification> {
        let doc = SpanDocument::open(path)?;
        self.classify_document(&doc)
    }

    /// Classify an in-memory span dump.
    pub fn classify_json(&self, json: &str) -> Result<Classification> {
        let doc = SpanDocument::from_json_str(json)?;
        self.classify_document(&doc)
    }

    /// Classify a loaded document.
    pub fn classify_document(&self, doc: &SpanDocument) -> Result<Classification> {
        let orchestrator = PageOrchestrator::new(doc).with_options(self.options.clone());
        match &self.asset_dir {
            Some(dir) => {
                let sink = FolderSink::new(dir);
                orchestrator.with_sink(&sink).run()
            }
            None => orchestrator.run(),
        }
    }
}

impl Classification {
    /// Render the elements as JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.elements, format)
    }
}
