//! `typeser normalize`: round-trip input data into its canonical JSON form.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde_json::Value;
use typeser_core::{Serializer, SerializerError};

use crate::{extensions, read_input, SchemaArgs};

/// Arguments for `typeser normalize`.
#[derive(Args, Debug)]
pub struct NormalizeArgs {
    #[command(flatten)]
    pub schema: SchemaArgs,

    /// Indent the output.
    #[arg(long)]
    pub pretty: bool,

    /// Input data file (`.json`, `.yaml`, `.yml`), or `-` for JSON on stdin.
    pub input: PathBuf,
}

/// Execute `typeser normalize`. Prints the canonical JSON, or the error
/// and exit code 1.
pub fn run_normalize(args: &NormalizeArgs) -> Result<u8> {
    let serializer = args.schema.serializer(&extensions::registry())?;
    let raw = read_input(&args.input)?;
    match normalize(&serializer, &raw, args.pretty) {
        Ok(text) => {
            println!("{text}");
            Ok(0)
        }
        Err(e) => {
            println!("{e}");
            Ok(1)
        }
    }
}

/// Deserialize `raw`, then serialize the instance back to JSON text.
pub fn normalize(serializer: &Serializer, raw: &Value, pretty: bool) -> Result<String, SerializerError> {
    let instance = serializer.deserialize(raw)?;
    if pretty {
        serializer.serialize_to_text_pretty(&instance)
    } else {
        serializer.serialize_to_text(&instance)
    }
}
