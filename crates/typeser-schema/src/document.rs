//! # Schema Documents — Declaring Types Without Writing Rust
//!
//! A schema document names enumerations and records and, optionally, the
//! root type to convert:
//!
//! ```yaml
//! root: User
//! enums:
//!   Role: [admin, member]
//! records:
//!   User:
//!     fields:
//!       - { name: id, type: int }
//!       - { name: tag, type: "Optional[str]", default: null }
//!       - { name: role, type: Role, default: member }
//! ```
//!
//! YAML and JSON are both accepted; YAML is converted to a JSON value tree
//! first so both formats go through the same deserialization. Unknown keys
//! are rejected at every level.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::SchemaError;

/// Top-level schema document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaDocument {
    /// Type expression converted by default, e.g. `User` or `List[User]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,
    /// Enumeration name → ordered member names.
    #[serde(default)]
    pub enums: BTreeMap<String, Vec<String>>,
    /// Record name → field declarations.
    #[serde(default)]
    pub records: BTreeMap<String, RecordSpec>,
}

/// Declaration of one record type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecordSpec {
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

/// Declaration of one record field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldSpec {
    pub name: String,
    /// Type expression.
    #[serde(rename = "type")]
    pub ty: String,
    /// Plain default value. `Some(Value::Null)` is an explicit `null`
    /// default; `None` means the field is required.
    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub default: Option<Value>,
}

/// Keeps an explicit `null` distinguishable from an absent key.
fn present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl SchemaDocument {
    /// Parse a document from a JSON value tree.
    ///
    /// # Errors
    ///
    /// [`SchemaError::Parse`] for missing or unknown keys and wrong shapes.
    pub fn from_value(value: Value) -> Result<Self, SchemaError> {
        serde_json::from_value(value).map_err(|e| SchemaError::Parse {
            reason: e.to_string(),
        })
    }

    /// Parse a document from JSON text.
    ///
    /// # Errors
    ///
    /// [`SchemaError::Parse`] for malformed JSON or an invalid document.
    pub fn from_json_str(text: &str) -> Result<Self, SchemaError> {
        let value: Value = serde_json::from_str(text).map_err(|e| SchemaError::Parse {
            reason: format!("invalid JSON: {e}"),
        })?;
        Self::from_value(value)
    }

    /// Parse a document from YAML text.
    ///
    /// # Errors
    ///
    /// [`SchemaError::Parse`] for malformed YAML, YAML outside the JSON
    /// subset, or an invalid document.
    pub fn from_yaml_str(text: &str) -> Result<Self, SchemaError> {
        let value = parse_yaml(text).map_err(|reason| SchemaError::Parse { reason })?;
        Self::from_value(value)
    }

    /// Load a document from disk; `.yaml`/`.yml` files are YAML, anything
    /// else is JSON.
    ///
    /// # Errors
    ///
    /// [`SchemaError::Load`] if the file cannot be read or decoded, or
    /// [`SchemaError::Parse`] if it is not a valid document.
    pub fn load(path: &Path) -> Result<Self, SchemaError> {
        let value = load_value(path)?;
        tracing::debug!(path = %path.display(), "loaded schema document");
        Self::from_value(value)
    }
}

/// Read a YAML or JSON file into a JSON value tree, choosing the format by
/// extension.
///
/// # Errors
///
/// [`SchemaError::Load`] if the file cannot be read or parsed.
pub fn load_value(path: &Path) -> Result<Value, SchemaError> {
    let load_error = |reason: String| SchemaError::Load {
        path: path.display().to_string(),
        reason,
    };

    let content =
        std::fs::read_to_string(path).map_err(|e| load_error(format!("cannot read file: {e}")))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    match ext {
        "yaml" | "yml" => parse_yaml(&content).map_err(load_error),
        _ => serde_json::from_str(&content).map_err(|e| load_error(format!("invalid JSON: {e}"))),
    }
}

fn parse_yaml(text: &str) -> Result<Value, String> {
    let yaml: serde_yaml::Value =
        serde_yaml::from_str(text).map_err(|e| format!("invalid YAML: {e}"))?;
    yaml_to_json(&yaml).map_err(|e| format!("YAML-to-JSON conversion failed: {e}"))
}

/// Convert a `serde_yaml::Value` to a `serde_json::Value`.
///
/// Tags are dropped; map keys must be strings, numbers or booleans.
///
/// # Errors
///
/// Returns a description of the first value with no JSON equivalent.
pub fn yaml_to_json(yaml: &serde_yaml::Value) -> Result<Value, String> {
    use serde_yaml::Value as Yaml;

    Ok(match yaml {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(*b),
        Yaml::Number(n) => json_number(n)?,
        Yaml::String(s) => Value::String(s.clone()),
        Yaml::Sequence(items) => Value::Array(items.iter().map(yaml_to_json).collect::<Result<_, _>>()?),
        Yaml::Mapping(map) => Value::Object(
            map.iter()
                .map(|(k, v)| -> Result<(String, Value), String> { Ok((object_key(k)?, yaml_to_json(v)?)) })
                .collect::<Result<_, _>>()?,
        ),
        Yaml::Tagged(tagged) => yaml_to_json(&tagged.value)?,
    })
}

fn json_number(n: &serde_yaml::Number) -> Result<Value, String> {
    if let Some(i) = n.as_i64() {
        return Ok(i.into());
    }
    if let Some(u) = n.as_u64() {
        return Ok(u.into());
    }
    n.as_f64()
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| format!("number {n} has no JSON equivalent"))
}

fn object_key(key: &serde_yaml::Value) -> Result<String, String> {
    match key {
        serde_yaml::Value::String(s) => Ok(s.clone()),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        serde_yaml::Value::Tagged(tagged) => object_key(&tagged.value),
        other => Err(format!("map key {other:?} is not a string, number or boolean")),
    }
}
