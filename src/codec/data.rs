//! App data and metadata values.
//!
//! The server stores both as opaque [`DataMapValue`]s. Values written by this
//! crate are JSON text in `string_val`; values read back are parsed as JSON
//! when possible and returned raw otherwise.

use serde_json::Value;

use crate::error::Result;
use crate::proto::{data_map_value, DataMapValue};

/// Encode a JSON value as `string_val`.
pub fn json_data_value(value: &Value) -> Result<DataMapValue> {
    Ok(DataMapValue {
        value: Some(data_map_value::Value::StringVal(serde_json::to_string(value)?)),
    })
}

/// Read a stored value back.
///
/// A non-empty `string_val` is parsed as JSON, falling back to the plain
/// string. Otherwise the `bytes_val` is returned as an array of byte values.
pub fn parse_data_value(value: &DataMapValue) -> Value {
    match &value.value {
        Some(data_map_value::Value::StringVal(text)) if !text.is_empty() => {
            serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.clone()))
        }
        Some(data_map_value::Value::BytesVal(bytes)) => bytes_value(bytes),
        Some(data_map_value::Value::StringVal(_)) | None => bytes_value(&[]),
    }
}

fn bytes_value(bytes: &[u8]) -> Value {
    Value::Array(bytes.iter().map(|b| Value::from(*b)).collect())
}
