//! Non-text assets handed over by external collaborators.

use serde::{Deserialize, Serialize};

/// A raster image embedded in a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageAsset {
    /// Encoded image bytes (base64 in span dumps)
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,

    /// Format tag reported by the rendering layer (e.g., "png", "jpeg")
    #[serde(default)]
    pub ext: String,
}

impl ImageAsset {
    /// Create an image asset.
    pub fn new(data: Vec<u8>, ext: impl Into<String>) -> Self {
        Self {
            data,
            ext: ext.into(),
        }
    }

    /// Get the size of the image data in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// File extension to persist the image under.
    ///
    /// Uses the reported format tag when it is plain ASCII alphanumeric,
    /// falling back to magic-byte sniffing.
    pub fn extension(&self) -> &str {
        let ext = self.ext.trim().trim_start_matches('.');
        if !ext.is_empty() && ext.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return ext;
        }
        Self::detect_extension(&self.data).unwrap_or("bin")
    }

    /// Detect an image extension from data magic bytes.
    pub fn detect_extension(data: &[u8]) -> Option<&'static str> {
        if data.len() < 8 {
            return None;
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some("jpeg");
        }

        // PNG: 89 50 4E 47 0D 0A 1A 0A
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some("png");
        }

        if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            return Some("gif");
        }

        // TIFF, little- or big-endian
        if data.starts_with(&[0x49, 0x49, 0x2A, 0x00])
            || data.starts_with(&[0x4D, 0x4D, 0x00, 0x2A])
        {
            return Some("tiff");
        }

        if data.starts_with(b"BM") {
            return Some("bmp");
        }

        // JPEG 2000: 00 00 00 0C 6A 50 20 20
        if data.starts_with(&[0x00, 0x00, 0x00, 0x0C, 0x6A, 0x50, 0x20, 0x20]) {
            return Some("jp2");
        }

        None
    }
}

/// A table returned by the table-extraction collaborator.
///
/// Row-major, with an optional header row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableData {
    /// Column names, empty when the table has no header
    #[serde(default)]
    pub header: Vec<String>,

    /// Body rows
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
}

impl TableData {
    /// Create a table from a header and body rows.
    pub fn new(header: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { header, rows }
    }

    /// Get the number of body rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns (widest of header and rows).
    pub fn column_count(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.header.len()))
            .max()
            .unwrap_or(0)
    }

    /// Check if the table has neither header nor rows.
    pub fn is_empty(&self) -> bool {
        self.header.is_empty() && self.rows.is_empty()
    }
}

mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(data))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.trim())
            .map_err(serde::de::Error::custom)
    }
}
