//! Rendering of classified element sequences.

mod json;
mod result;

pub use json::{to_json, write_json, JsonFormat};
pub use result::ExtractionStats;
