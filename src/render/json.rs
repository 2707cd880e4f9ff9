//! JSON rendering for element sequences.

use std::io::Write;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::{Error, Result};
use crate::model::ElementSet;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON, four-space indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert an element sequence to a JSON document with top-level key `elements`.
pub fn to_json(elements: &ElementSet, format: JsonFormat) -> Result<String> {
    let mut buffer = Vec::new();
    write_json(elements, format, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| Error::Render(format!("JSON output is not UTF-8: {}", e)))
}

/// Write an element sequence as JSON.
pub fn write_json<W: Write>(elements: &ElementSet, format: JsonFormat, writer: W) -> Result<()> {
    let result = match format {
        JsonFormat::Pretty => {
            let formatter = PrettyFormatter::with_indent(b"    ");
            let mut serializer = Serializer::with_formatter(writer, formatter);
            elements.serialize(&mut serializer)
        }
        JsonFormat::Compact => serde_json::to_writer(writer, elements),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}
