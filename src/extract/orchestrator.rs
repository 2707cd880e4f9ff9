//! Per-page orchestration of asset collaborators and text assembly.

use rayon::prelude::*;

use super::collaborators::{AssetSink, PageImages, TableExtractor};
use crate::analysis::{
    AssemblerState, ClassifyOptions, ElementAssembler, ErrorMode, FontProfile, FooterDetector,
    SizeTagMap,
};
use crate::error::Result;
use crate::model::{Element, ElementSet, SourcePage, SpanDocument};
use crate::render::ExtractionStats;

/// Result of classifying a document.
#[derive(Debug, Clone)]
pub struct Classification {
    /// Elements grouped by page, in document order
    pub elements: ElementSet,

    /// Size tags the text elements were derived from
    pub tags: SizeTagMap,

    /// Extraction statistics
    pub stats: ExtractionStats,
}

/// Drives classification of a whole document.
///
/// For each selected page, emits image elements, then table elements, then
/// text elements. Pages are concatenated in document order.
pub struct PageOrchestrator<'d> {
    doc: &'d SpanDocument,
    options: ClassifyOptions,
    images: &'d dyn PageImages,
    tables: &'d dyn TableExtractor,
    sink: Option<&'d dyn AssetSink>,
}

impl<'d> PageOrchestrator<'d> {
    /// Create an orchestrator reading assets from the span dump itself.
    ///
    /// Without an [`AssetSink`], no image or table elements are emitted.
    pub fn new(doc: &'d SpanDocument) -> Self {
        Self {
            doc,
            options: ClassifyOptions::default(),
            images: doc,
            tables: doc,
            sink: None,
        }
    }

    /// Set classification options.
    pub fn with_options(mut self, options: ClassifyOptions) -> Self {
        self.options = options;
        self
    }

    /// Use a different image collaborator.
    pub fn with_images(mut self, images: &'d dyn PageImages) -> Self {
        self.images = images;
        self
    }

    /// Use a different table collaborator.
    pub fn with_tables(mut self, tables: &'d dyn TableExtractor) -> Self {
        self.tables = tables;
        self
    }

    /// Persist assets through `sink`.
    pub fn with_sink(mut self, sink: &'d dyn AssetSink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// The options in use.
    pub fn options(&self) -> &ClassifyOptions {
        &self.options
    }

    /// Classify the document.
    ///
    /// Fails with [`crate::Error::NoDiscriminatingStyle`] before touching any
    /// collaborator when the document has no text spans.
    pub fn run(&self) -> Result<Classification> {
        let profile = FontProfile::build(self.doc, self.options.granularity)?;
        let tags = SizeTagMap::from_profile(&profile);
        let assembler = ElementAssembler::from_options(&tags, &self.options);

        // Only the document's first visible span keeps its raw tag.
        let opening = self.doc.pages.iter().position(SourcePage::has_text);

        let selected: Vec<(usize, &SourcePage)> = self
            .doc
            .pages
            .iter()
            .enumerate()
            .filter(|(_, page)| self.options.pages.includes(page.number))
            .collect();

        log::debug!(
            "Classifying {} of {} pages ({})",
            selected.len(),
            self.doc.page_count(),
            if self.options.parallel { "parallel" } else { "sequential" }
        );

        let classify = |&(index, page): &(usize, &SourcePage)| {
            let state = if Some(index) == opening {
                AssemblerState::new()
            } else {
                AssemblerState::resumed()
            };
            self.classify_page(page, &tags, &assembler, state)
        };

        let per_page: Vec<Vec<Element>> = if self.options.parallel {
            selected.par_iter().map(classify).collect::<Result<_>>()?
        } else {
            selected.iter().map(classify).collect::<Result<_>>()?
        };

        let mut stats = ExtractionStats::new();
        stats.page_count = per_page.len() as u32;
        stats.malformed_span_count = self.doc.malformed_spans() as u32;

        let elements: ElementSet = per_page.into_iter().flatten().collect::<Vec<_>>().into();
        for element in &elements {
            stats.add_element(element);
        }

        Ok(Classification {
            elements,
            tags,
            stats,
        })
    }

    fn classify_page(
        &self,
        page: &SourcePage,
        tags: &SizeTagMap,
        assembler: &ElementAssembler<'_>,
        state: AssemblerState,
    ) -> Result<Vec<Element>> {
        let mut elements = Vec::new();

        if let Some(sink) = self.sink {
            if self.options.extract_images {
                let images = self.image_elements(page.number, sink);
                elements.extend(self.recover(page.number, "images", images)?);
            }
            if self.options.extract_tables {
                let tables = self.table_elements(page.number, sink);
                elements.extend(self.recover(page.number, "tables", tables)?);
            }
        }

        let footers = FooterDetector::new(tags).detect(&page.blocks);
        elements.extend(assembler.assemble_page(page, &footers, state));

        Ok(elements)
    }

    fn image_elements(&self, page: u32, sink: &dyn AssetSink) -> Result<Vec<Element>> {
        self.images
            .page_images(page)?
            .iter()
            .enumerate()
            .map(|(i, image)| {
                sink.persist_image(page, i + 1, image)
                    .map(|path| Element::image(path, page))
            })
            .collect()
    }

    fn table_elements(&self, page: u32, sink: &dyn AssetSink) -> Result<Vec<Element>> {
        self.tables
            .extract_tables(page)?
            .iter()
            .enumerate()
            .map(|(i, table)| {
                sink.persist_table(page, i + 1, table)
                    .map(|path| Element::table(path, page))
            })
            .collect()
    }

    fn recover(&self, page: u32, what: &str, result: Result<Vec<Element>>) -> Result<Vec<Element>> {
        match result {
            Ok(elements) => Ok(elements),
            Err(e) if self.options.error_mode == ErrorMode::Lenient => {
                log::warn!("Failed to extract {} from page {}: {}", what, page, e);
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }
}

/// Classify the text of a document, without assets.
pub fn classify_document(doc: &SpanDocument, options: &ClassifyOptions) -> Result<ElementSet> {
    let classification = PageOrchestrator::new(doc)
        .with_options(options.clone())
        .run()?;
    Ok(classification.elements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::extract::NoAssets;
    use crate::model::{Block, ElementType, FontSize, ImageAsset, Span, TableData};
    use crate::PageSelection;
    use std::sync::Mutex;

    fn span(text: &str, points: f32) -> Span {
        Span::new(text, FontSize::new(points).unwrap())
    }

    fn text_block(text: &str, points: f32) -> Block {
        Block::single_line(vec![span(text, points)])
    }

    fn page(number: u32, blocks: Vec<Block>) -> SourcePage {
        let mut page = SourcePage::new(number);
        page.blocks = blocks;
        page
    }

    fn sample_doc() -> SpanDocument {
        let mut first = page(
            1,
            vec![
                text_block("Document Title", 24.0),
                text_block("The body of the first page is set in the regular size of the document.", 12.0),
                text_block("More body text.", 12.0),
            ],
        );
        first.images.push(ImageAsset::new(vec![1, 2, 3, 4], "png"));
        first
            .tables
            .push(TableData::new(vec!["k".into()], vec![vec!["v".into()]]));

        let second = page(
            2,
            vec![
                text_block("1. Introduction", 24.0),
                text_block("Introductory body text goes here.", 12.0),
            ],
        );

        SpanDocument::new().with_page(first).with_page(second)
    }

    /// Records persisted assets instead of writing files.
    #[derive(Default)]
    struct RecordingSink {
        persisted: Mutex<Vec<String>>,
    }

    impl AssetSink for RecordingSink {
        fn persist_image(&self, page: u32, index: usize, image: &ImageAsset) -> Result<String> {
            let name = format!("page_{}_image_{}.{}", page, index, image.extension());
            self.persisted.lock().unwrap().push(name.clone());
            Ok(name)
        }

        fn persist_table(&self, page: u32, index: usize, _table: &TableData) -> Result<String> {
            let name = format!("page_{}_table_{}.csv", page, index);
            self.persisted.lock().unwrap().push(name.clone());
            Ok(name)
        }
    }

    struct FailingTables;

    impl TableExtractor for FailingTables {
        fn extract_tables(&self, page: u32) -> Result<Vec<TableData>> {
            Err(Error::TableExtract(format!("no table engine for page {}", page)))
        }
    }

    #[test]
    fn test_assets_precede_text() {
        let doc = sample_doc();
        let sink = RecordingSink::default();
        let result = PageOrchestrator::new(&doc).with_sink(&sink).run().unwrap();

        let kinds: Vec<(ElementType, u32)> = result.elements.iter().map(|e| (e.kind, e.page)).collect();
        assert_eq!(
            kinds,
            vec![
                (ElementType::Image, 1),
                (ElementType::Table, 1),
                (ElementType::HeaderTitle, 1),
                (ElementType::Para, 1),
                (ElementType::Other, 1),
                (ElementType::Heading, 2),
                (ElementType::Other, 2),
            ]
        );
        assert_eq!(result.elements.elements[0].text, "page_1_image_1.png");
        assert_eq!(result.stats.page_count, 2);
        assert_eq!(result.stats.image_count, 1);
        assert_eq!(result.stats.heading_count, 1);
    }

    #[test]
    fn test_no_sink_means_text_only() {
        let doc = sample_doc();
        let elements = classify_document(&doc, &ClassifyOptions::default()).unwrap();
        assert!(elements.iter().all(|e| !e.kind.is_asset()));
        assert_eq!(elements.len(), 5);
    }

    #[test]
    fn test_empty_document_fails_before_collaborators() {
        let doc = SpanDocument::new().with_page(page(1, vec![Block::Other]));
        let sink = RecordingSink::default();
        let result = PageOrchestrator::new(&doc).with_sink(&sink).run();

        assert!(matches!(result, Err(Error::NoDiscriminatingStyle)));
        assert!(sink.persisted.lock().unwrap().is_empty());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let doc = sample_doc();
        let sink = RecordingSink::default();

        let parallel = PageOrchestrator::new(&doc).with_sink(&sink).run().unwrap();
        let sequential = PageOrchestrator::new(&doc)
            .with_options(ClassifyOptions::new().sequential())
            .with_sink(&sink)
            .run()
            .unwrap();

        assert_eq!(parallel.elements, sequential.elements);
    }

    #[test]
    fn test_page_selection_keeps_profile() {
        let doc = sample_doc();
        let options = ClassifyOptions::new().with_pages(PageSelection::Pages(vec![2]));
        let result = PageOrchestrator::new(&doc).with_options(options).run().unwrap();

        assert!(result.elements.iter().all(|e| e.page == 2));
        assert_eq!(result.elements.elements[0].kind, ElementType::Heading);
        assert_eq!(result.tags.baseline().points(), 12.0);
    }

    #[test]
    fn test_collaborator_failure_modes() {
        let doc = sample_doc();
        let sink = RecordingSink::default();

        let degraded = PageOrchestrator::new(&doc)
            .with_tables(&FailingTables)
            .with_sink(&sink)
            .run()
            .unwrap();
        assert_eq!(degraded.stats.table_count, 0);
        assert_eq!(degraded.stats.image_count, 1);
        assert_eq!(degraded.stats.header_title_count, 1);

        let strict = PageOrchestrator::new(&doc)
            .with_options(ClassifyOptions::new().strict())
            .with_tables(&FailingTables)
            .with_sink(&sink)
            .run();
        assert!(matches!(strict, Err(Error::TableExtract(_))));
    }

    #[test]
    fn test_disabled_asset_kinds() {
        let doc = sample_doc();
        let sink = RecordingSink::default();
        let result = PageOrchestrator::new(&doc)
            .with_options(ClassifyOptions::new().with_tables(false))
            .with_images(&NoAssets)
            .with_sink(&sink)
            .run()
            .unwrap();

        assert_eq!(result.stats.image_count, 0);
        assert_eq!(result.stats.table_count, 0);
        assert!(sink.persisted.lock().unwrap().is_empty());
    }
}
