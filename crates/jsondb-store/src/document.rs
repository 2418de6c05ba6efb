//! On-disk document encoding.
//!
//! A document is an open JSON object. Files hold it pretty-printed with one
//! tab per indentation level and a single trailing newline.

use std::path::Path;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::{Map, Value};

use crate::error::{StoreError, StoreResult};

/// A schemaless JSON document.
pub type Document = Map<String, Value>;

/// Serialize a document to its on-disk form.
pub fn encode(doc: &Document) -> StoreResult<Vec<u8>> {
    let mut buf = Vec::with_capacity(128);
    let formatter = PrettyFormatter::with_indent(b"\t");
    let mut ser = Serializer::with_formatter(&mut buf, formatter);
    doc.serialize(&mut ser)
        .map_err(|e| StoreError::Serialization(e.to_string()))?;
    buf.push(b'\n');
    Ok(buf)
}

/// Decode file bytes into a document.
///
/// `path` is only used for error reporting. Valid JSON that is not an
/// object is treated as corrupt.
pub fn decode(path: &Path, bytes: &[u8]) -> StoreResult<Document> {
    let value: Value = serde_json::from_slice(bytes).map_err(|e| StoreError::CorruptData {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    match value {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::CorruptData {
            path: path.to_path_buf(),
            reason: format!("expected a JSON object, found {}", json_kind(&other)),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
