//! Document-level input: the span dump emitted by the rendering layer.

use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

use super::{Block, FontSize, ImageAsset, Line, SourcePage, Span, TableData};
use crate::error::{Error, Result};

/// A document as a sequence of pages of positioned spans.
#[derive(Debug, Clone, Default)]
pub struct SpanDocument {
    /// Path of the PDF the dump was rendered from, if known
    pub source: Option<PathBuf>,

    /// Pages in document order
    pub pages: Vec<SourcePage>,

    /// Spans dropped while loading because they were malformed
    malformed_spans: usize,
}

impl SpanDocument {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the source path.
    pub fn with_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Add a page to the document.
    pub fn add_page(&mut self, page: SourcePage) {
        self.pages.push(page);
    }

    /// Builder-style variant of [`SpanDocument::add_page`].
    pub fn with_page(mut self, page: SourcePage) -> Self {
        self.pages.push(page);
        self
    }

    /// Get the number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Get a page by number (1-indexed).
    pub fn get_page(&self, page_num: u32) -> Option<&SourcePage> {
        self.pages.iter().find(|p| p.number == page_num)
    }

    /// Get a page by number, failing when it does not exist.
    pub fn page(&self, page_num: u32) -> Result<&SourcePage> {
        self.get_page(page_num)
            .ok_or(Error::PageOutOfRange(page_num, self.page_count()))
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Number of spans dropped while loading.
    pub fn malformed_spans(&self) -> usize {
        self.malformed_spans
    }

    /// Iterate over every span of every text block, in document order.
    pub fn spans(&self) -> impl Iterator<Item = &Span> {
        self.pages.iter().flat_map(|p| p.spans())
    }

    /// Load a span dump from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let wire: WireDocument = serde_json::from_str(json)?;
        Ok(wire.into_document())
    }

    /// Load a span dump from JSON bytes.
    pub fn from_json_slice(data: &[u8]) -> Result<Self> {
        let wire: WireDocument = serde_json::from_slice(data)?;
        Ok(wire.into_document())
    }

    /// Load a span dump from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_json_slice(&data)
    }

    /// Load a span dump from a file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path.as_ref())?;
        Self::from_json_slice(&data)
    }

    /// Load a span dump from a file without blocking the async runtime.
    #[cfg(feature = "async")]
    pub async fn open_async<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = tokio::fs::read(path.as_ref()).await?;
        Self::from_json_slice(&data)
    }
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct WireDocument {
    #[serde(default)]
    source: Option<PathBuf>,
    #[serde(default)]
    pages: Vec<WirePage>,
}

#[derive(Deserialize)]
struct WirePage {
    #[serde(default)]
    number: Option<u32>,
    #[serde(default)]
    width: Option<f32>,
    #[serde(default)]
    height: Option<f32>,
    #[serde(default)]
    blocks: Vec<WireBlock>,
    #[serde(default)]
    images: Vec<ImageAsset>,
    #[serde(default)]
    tables: Vec<TableData>,
}

#[derive(Deserialize)]
struct WireBlock {
    #[serde(rename = "type", default)]
    kind: Option<i64>,
    #[serde(default)]
    lines: Vec<WireLine>,
}

#[derive(Deserialize)]
struct WireLine {
    #[serde(default)]
    spans: Vec<WireSpan>,
}

#[derive(Deserialize)]
struct WireSpan {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    size: Option<Value>,
    #[serde(default)]
    font: Option<String>,
    #[serde(default)]
    flags: Option<Value>,
    #[serde(default)]
    color: Option<Value>,
}

/// Block type code for text blocks in the dump.
const TEXT_BLOCK: i64 = 0;

impl WireDocument {
    fn into_document(self) -> SpanDocument {
        let mut doc = SpanDocument {
            source: self.source,
            pages: Vec::with_capacity(self.pages.len()),
            malformed_spans: 0,
        };

        for (index, wire_page) in self.pages.into_iter().enumerate() {
            let number = wire_page.number.unwrap_or(index as u32 + 1);
            let mut page = SourcePage::new(number);
            page.width = wire_page.width;
            page.height = wire_page.height;
            page.images = wire_page.images;
            page.tables = wire_page.tables;

            for wire_block in wire_page.blocks {
                if wire_block.kind.unwrap_or(TEXT_BLOCK) != TEXT_BLOCK {
                    page.add_block(Block::Other);
                    continue;
                }

                let mut lines = Vec::with_capacity(wire_block.lines.len());
                for wire_line in wire_block.lines {
                    let mut spans = Vec::with_capacity(wire_line.spans.len());
                    for wire_span in wire_line.spans {
                        match wire_span.into_span(number) {
                            Ok(span) => spans.push(span),
                            Err(e) => {
                                log::warn!("Skipping span: {}", e);
                                doc.malformed_spans += 1;
                            }
                        }
                    }
                    lines.push(Line::new(spans));
                }
                page.add_block(Block::text(lines));
            }

            doc.add_page(page);
        }

        if doc.malformed_spans > 0 {
            log::warn!(
                "Dropped {} malformed spans while loading span dump",
                doc.malformed_spans
            );
        }

        doc
    }
}

impl WireSpan {
    fn into_span(self, page: u32) -> Result<Span> {
        let malformed = |reason: &str| Error::MalformedSpan {
            page,
            reason: reason.to_string(),
        };

        let text = self.text.ok_or_else(|| malformed("missing text"))?;
        let raw_size = self
            .size
            .as_ref()
            .and_then(Value::as_f64)
            .ok_or_else(|| malformed("missing or non-numeric size"))?;
        let size = FontSize::new(raw_size as f32)
            .ok_or_else(|| malformed(&format!("unusable size {}", raw_size)))?;

        Ok(Span {
            text,
            size,
            font: self.font.unwrap_or_default(),
            flags: as_u32(self.flags.as_ref()),
            color: as_u32(self.color.as_ref()),
        })
    }
}

fn as_u32(value: Option<&Value>) -> u32 {
    value
        .and_then(|v| v.as_u64().or_else(|| v.as_i64().map(|i| i as u64)))
        .map(|v| v as u32)
        .unwrap_or(0)
}
