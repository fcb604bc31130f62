//! `typeser check`: validate input data against a schema type.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde_json::Value;
use typeser_core::{Serializer, SerializerError};

use crate::{extensions, read_input, SchemaArgs};

/// Arguments for `typeser check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub schema: SchemaArgs,

    /// Input data file (`.json`, `.yaml`, `.yml`), or `-` for JSON on stdin.
    pub input: PathBuf,
}

/// Execute `typeser check`. Exit code 0 if the input deserializes, 1 if not.
pub fn run_check(args: &CheckArgs) -> Result<u8> {
    let serializer = args.schema.serializer(&extensions::registry())?;
    let raw = read_input(&args.input)?;
    match check(&serializer, &raw) {
        Ok(()) => {
            println!("OK");
            Ok(0)
        }
        Err(e) => {
            println!("{e}");
            Ok(1)
        }
    }
}

/// Deserialize `raw`, discarding the instance.
pub fn check(serializer: &Serializer, raw: &Value) -> Result<(), SerializerError> {
    serializer.deserialize(raw).map(drop)
}
