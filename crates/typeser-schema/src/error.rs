//! Errors raised while loading and compiling schema documents.

use thiserror::Error;
use typeser_core::SerializerError;

/// Failure to load, parse, or compile a schema document.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The document file could not be read or decoded.
    #[error("document load error for '{path}': {reason}")]
    Load {
        /// Path of the document.
        path: String,
        /// What went wrong.
        reason: String,
    },

    /// The document text is not a valid schema document.
    #[error("invalid schema document: {reason}")]
    Parse {
        /// Parser message, including the offending key when known.
        reason: String,
    },

    /// A type expression could not be parsed or is malformed.
    #[error("invalid type expression '{expr}' at offset {position}: {message}")]
    Expression {
        /// The full expression text.
        expr: String,
        /// Byte offset of the problem.
        position: usize,
        /// What was expected there.
        message: String,
    },

    /// A type name is declared twice or shadows a built-in.
    #[error("duplicate declaration of '{name}': {reason}")]
    Duplicate {
        /// The clashing name.
        name: String,
        /// Where the clash was found.
        reason: String,
    },

    /// Records reference each other in a loop.
    #[error("record reference cycle: {}", .path.join(" -> "))]
    Cycle {
        /// Record names along the cycle, first name repeated at the end.
        path: Vec<String>,
    },

    /// A field's type has no serializer factory in the registry.
    #[error("{location}: unknown type '{descriptor}'")]
    UnknownType {
        /// `Record.field` or `root`.
        location: String,
        /// The unresolved descriptor.
        descriptor: String,
    },

    /// A field default does not deserialize as the field's type.
    #[error("{location}: invalid default value: {source}")]
    Default {
        /// `Record.field`.
        location: String,
        /// The serializer's rejection.
        #[source]
        source: SerializerError,
    },

    /// A root type was requested but the document declares none.
    #[error("schema document declares no root type")]
    NoRoot,
}
