//! # typeser-schema — Schema Documents for typeser
//!
//! Declares enums and records in YAML or JSON instead of Rust and compiles
//! them into [`typeser_core::TypeDesc`] tables.
//!
//! ## Loading (`document`)
//!
//! [`SchemaDocument::load`] picks the format by file extension; YAML is
//! converted to a JSON value tree before deserialization so both formats
//! share one code path. Unknown keys are rejected.
//!
//! ## Type Expressions (`expr`)
//!
//! Field types are written as expressions such as `Dict[str, List[Role]]`
//! or `Optional[datetime]`, parsed by a small recursive-descent parser that
//! reports byte offsets.
//!
//! ## Compilation (`compile`)
//!
//! [`SchemaDocument::compile`] resolves names against the document and a
//! [`typeser_core::Registry`], so names handled by extension factories
//! (`datetime`, `uuid`, ...) are accepted only when such a factory is
//! registered.

pub mod compile;
pub mod document;
pub mod error;
pub mod expr;

pub use compile::CompiledSchema;
pub use document::{load_value, yaml_to_json, FieldSpec, RecordSpec, SchemaDocument};
pub use error::SchemaError;
pub use expr::TypeExpr;
