//! Input kind detection.
//!
//! The classifier consumes span dumps produced by an external rendering layer.
//! Raw PDFs are recognized so callers can report a useful error.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};

/// Kind of an input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputKind {
    /// A raw PDF document
    Pdf {
        /// PDF version (e.g., "1.7", "2.0")
        version: String,
    },
    /// A JSON span dump
    SpanDump,
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputKind::Pdf { version } => write!(f, "PDF {}", version),
            InputKind::SpanDump => f.write_str("span dump"),
        }
    }
}

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const PDF_MAGIC_LEN: usize = 5;
const VERSION_LEN: usize = 3; // e.g., "1.7"
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
const SNIFF_LEN: usize = 64;

/// Detect the input kind from a file path.
///
/// # Example
/// ```no_run
/// use pdfstruct::detect::detect_input_kind_from_path;
///
/// let kind = detect_input_kind_from_path("paper.json").unwrap();
/// println!("Input: {}", kind);
/// ```
pub fn detect_input_kind_from_path<P: AsRef<Path>>(path: P) -> Result<InputKind> {
    let file = File::open(path)?;
    let mut header = Vec::with_capacity(SNIFF_LEN);
    file.take(SNIFF_LEN as u64).read_to_end(&mut header)?;
    detect_input_kind_from_bytes(&header)
}

/// Detect the input kind from the leading bytes of a file.
///
/// # Returns
/// * `Ok(InputKind::Pdf)` for data starting with a valid `%PDF-x.y` header
/// * `Ok(InputKind::SpanDump)` for data starting with a JSON object
/// * `Err(Error::UnknownFormat)` otherwise
pub fn detect_input_kind_from_bytes(data: &[u8]) -> Result<InputKind> {
    if data.starts_with(PDF_MAGIC) {
        if data.len() < PDF_MAGIC_LEN + VERSION_LEN {
            return Err(Error::UnknownFormat);
        }

        let version_bytes = &data[PDF_MAGIC_LEN..PDF_MAGIC_LEN + VERSION_LEN];
        let version = String::from_utf8_lossy(version_bytes).to_string();
        if !is_valid_version(&version) {
            return Err(Error::UnknownFormat);
        }

        return Ok(InputKind::Pdf { version });
    }

    let body = data.strip_prefix(UTF8_BOM).unwrap_or(data);
    match body.iter().find(|b| !b.is_ascii_whitespace()) {
        Some(b'{') => Ok(InputKind::SpanDump),
        _ => Err(Error::UnknownFormat),
    }
}

/// Check if a version string is valid.
fn is_valid_version(version: &str) -> bool {
    let bytes = version.as_bytes();
    bytes.len() == 3 && bytes[0].is_ascii_digit() && bytes[1] == b'.' && bytes[2].is_ascii_digit()
}

/// Check if a file is a PDF: `.pdf` extension (any case) and a `%PDF` header.
pub fn is_pdf<P: AsRef<Path>>(path: P) -> bool {
    let path = path.as_ref();
    let has_extension = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
    if !has_extension {
        return false;
    }

    let mut header = [0u8; 4];
    File::open(path)
        .and_then(|mut f| f.read_exact(&mut header))
        .map(|_| header == PDF_MAGIC[..4])
        .unwrap_or(false)
}

/// Fail unless the file is a span dump.
pub fn ensure_span_dump<P: AsRef<Path>>(path: P) -> Result<()> {
    match detect_input_kind_from_path(path)? {
        InputKind::SpanDump => Ok(()),
        kind @ InputKind::Pdf { .. } => Err(Error::UnsupportedInput(format!(
            "{} files must first be rendered to a span dump (pages of blocks, lines and spans as JSON)",
            kind
        ))),
    }
}
