//! # typeser-cli — Command-Line Front End
//!
//! Provides the `typeser` binary, which converts JSON or YAML data files
//! through serializers compiled from schema documents.
//!
//! ## Subcommands
//!
//! - `typeser check` — deserialize the input and report the first error with
//!   its breadcrumb.
//! - `typeser normalize` — deserialize then serialize, printing canonical
//!   JSON with defaults filled in and undeclared keys dropped.
//! - `typeser describe` — print the serializer tree built for a type.
//!
//! ```bash
//! typeser check --schema users.yaml data.json
//! typeser normalize --schema users.yaml --type "List[User]" --pretty data.yaml
//! typeser describe --schema users.yaml --type User
//! ```
//!
//! Field types may use the `datetime` and `uuid` extension types; see
//! [`extensions`].

pub mod check;
pub mod describe;
pub mod extensions;
pub mod normalize;

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;
use typeser_core::{Registry, Serializer};
use typeser_schema::{load_value, SchemaDocument};

/// Schema selection shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct SchemaArgs {
    /// Schema document (YAML or JSON, chosen by extension).
    #[arg(long)]
    pub schema: PathBuf,

    /// Type expression to use instead of the document's root, e.g. `List[User]`.
    #[arg(long = "type", value_name = "TYPE")]
    pub type_expr: Option<String>,
}

impl SchemaArgs {
    /// Load and compile the schema, then build the serializer for the
    /// selected type.
    pub fn serializer(&self, registry: &Registry) -> Result<Serializer> {
        let doc = SchemaDocument::load(&self.schema)?;
        let compiled = doc
            .compile(registry)
            .with_context(|| format!("failed to compile schema {}", self.schema.display()))?;
        let desc = match &self.type_expr {
            Some(expr) => compiled.resolve(expr)?,
            None => compiled.require_root()?.clone(),
        };
        tracing::info!(schema = %self.schema.display(), r#type = %desc, "building serializer");
        registry
            .create(&desc)
            .with_context(|| format!("cannot build a serializer for {desc}"))
    }
}

/// Read input data: `-` is JSON on stdin, otherwise a YAML or JSON file.
pub fn read_input(path: &Path) -> Result<Value> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        return serde_json::from_str(&text).context("stdin is not valid JSON");
    }
    Ok(load_value(path)?)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{write, USERS_YAML};

    #[test]
    fn test_serializer_uses_root_or_type() {
        let dir = tempfile::tempdir().unwrap();
        let schema = write(dir.path(), "users.yaml", USERS_YAML);
        let registry = extensions::registry();

        let root = SchemaArgs {
            schema: schema.clone(),
            type_expr: None,
        };
        assert_eq!(root.serializer(&registry).unwrap().breadcrumb().to_string(), "record.User");

        let list = SchemaArgs {
            schema,
            type_expr: Some("List[User]".into()),
        };
        assert_eq!(list.serializer(&registry).unwrap().breadcrumb().to_string(), "sequence");
    }

    #[test]
    fn test_extension_types_need_the_extended_registry() {
        let dir = tempfile::tempdir().unwrap();
        let args = SchemaArgs {
            schema: write(dir.path(), "users.yaml", USERS_YAML),
            type_expr: None,
        };
        let err = args.serializer(&Registry::new()).unwrap_err();
        assert!(format!("{err:#}").contains("unknown type 'uuid'"));
    }

    #[test]
    fn test_read_input_yaml_and_json() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = write(dir.path(), "in.yml", "a: [1, 2]\n");
        let json = write(dir.path(), "in.json", r#"{"a": [1, 2]}"#);
        assert_eq!(read_input(&yaml).unwrap(), read_input(&json).unwrap());
        assert!(read_input(&dir.path().join("absent.json")).is_err());
    }
}
