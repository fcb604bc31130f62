//! # Text Codec — JSON Text In and Out
//!
//! Thin delegation to `serde_json` for the `*_text` convenience operations
//! on serializer nodes. Malformed text surfaces as a format error at the
//! breadcrumb of the node that was asked to decode it.

use serde_json::Value;

use crate::breadcrumb::Breadcrumb;
use crate::error::{Direction, Result, SerializerError};

/// Layout of encoded JSON text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextStyle {
    /// Single line, no insignificant whitespace.
    #[default]
    Compact,
    /// Indented, one member per line.
    Pretty,
}

/// Encode a plain value as JSON text.
///
/// # Errors
///
/// Returns a serialization format error if `serde_json` rejects the value.
pub fn encode(value: &Value, style: TextStyle, breadcrumb: &Breadcrumb) -> Result<String> {
    let encoded = match style {
        TextStyle::Compact => serde_json::to_string(value),
        TextStyle::Pretty => serde_json::to_string_pretty(value),
    };
    encoded.map_err(|e| {
        SerializerError::format(
            Direction::Serialization,
            breadcrumb,
            format!("cannot encode JSON text: {e}"),
        )
    })
}

/// Decode JSON text into a plain value.
///
/// # Errors
///
/// Returns a deserialization format error carrying the parser's line and
/// column when `text` is not valid JSON.
pub fn decode(text: &str, breadcrumb: &Breadcrumb) -> Result<Value> {
    serde_json::from_str(text).map_err(|e| {
        SerializerError::format(
            Direction::Deserialization,
            breadcrumb,
            format!("malformed JSON text: {e}"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_compact_keeps_insertion_order() {
        let value = json!({"z": 1, "a": [true, null]});
        let text = encode(&value, TextStyle::Compact, &Breadcrumb::root()).unwrap();
        assert_eq!(text, r#"{"z":1,"a":[true,null]}"#);
    }

    #[test]
    fn test_encode_pretty_is_multiline() {
        let value = json!({"a": 1});
        let text = encode(&value, TextStyle::Pretty, &Breadcrumb::root()).unwrap();
        assert!(text.contains('\n'));
    }

    #[test]
    fn test_decode_malformed_is_format_error() {
        let crumb = Breadcrumb::root().enter("record.User");
        let err = decode("{\"id\": ", &crumb).unwrap_err();
        assert!(err.is_format_error());
        assert_eq!(err.breadcrumb(), &crumb);
        assert!(err.to_string().contains("malformed JSON text"));
    }

    #[test]
    fn test_float_text_round_trip_is_exact() {
        let value = json!([-98229.50753332672_f64, 0.1, 1e-300, f64::MAX]);
        let crumb = Breadcrumb::root();
        let text = encode(&value, TextStyle::Compact, &crumb).unwrap();
        assert_eq!(decode(&text, &crumb).unwrap(), value);

        let s = crate::Registry::new()
            .create(&crate::TypeDesc::sequence(crate::TypeDesc::float()))
            .unwrap();
        let instance = crate::Instance::List(vec![crate::Instance::Float(-98229.50753332672)]);
        let text = s.serialize_to_text(&instance).unwrap();
        assert_eq!(s.deserialize_from_text(&text).unwrap(), instance);
    }
}
