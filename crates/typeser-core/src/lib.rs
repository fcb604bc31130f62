//! # typeser-core — Schema-Driven Serialization Engine
//!
//! Converts typed in-memory values ([`Instance`]) to plain JSON values
//! (`serde_json::Value`) and back, driven by a [`TypeDesc`] describing the
//! expected shape. Every mismatch is reported with a [`Breadcrumb`] naming
//! the exact position in the value tree where it occurred.
//!
//! ## Building Blocks
//!
//! - [`TypeDesc`] — what shape is expected: primitives, mappings,
//!   sequences, tuples, unions, enums, records, self-serializing types and
//!   opaque named types for extensions.
//! - [`Registry`] — ordered [`SerializerFactory`] list resolving a
//!   descriptor to a tree of [`SerializerNode`]s, built once and reused.
//! - [`SerializerNode`] — one layer of the tree: a type check, a format
//!   check, then the conversion, in both directions.
//! - [`SerializerError`] — `Type`, `Format` or `MissingFactory`, always
//!   with the breadcrumb of the node that raised it.
//!
//! ```
//! use typeser_core::{Instance, Record, RecordDesc, Registry, TypeDesc};
//!
//! let user = RecordDesc::builder("User")
//!     .field("id", TypeDesc::int())
//!     .field("name", TypeDesc::str())
//!     .build();
//! let serializer = Registry::new().create(&TypeDesc::Record(user)).unwrap();
//!
//! let err = serializer
//!     .deserialize_from_text(r#"{"id": "7", "name": "ann"}"#)
//!     .unwrap_err();
//! assert_eq!(err.breadcrumb().to_string(), "record.User['id']->int");
//!
//! let ann = Instance::Record(Record::new("User").with("id", 7).with("name", "ann"));
//! assert_eq!(serializer.serialize_to_text(&ann).unwrap(), r#"{"id":7,"name":"ann"}"#);
//! ```
//!
//! ## Crate Policy
//!
//! - No `unsafe` code.
//! - No `.unwrap()` outside tests; every failure is a [`SerializerError`].
//! - Serializer trees are immutable and `Send + Sync`; share them freely.

pub mod breadcrumb;
pub mod codec;
pub mod descriptor;
pub mod error;
pub mod global;
pub mod node;
pub mod registry;
pub mod serializers;
pub mod value;

pub use breadcrumb::{Breadcrumb, Segment};
pub use codec::TextStyle;
pub use descriptor::{EnumDesc, FieldDesc, Primitive, RecordBuilder, RecordDesc, SerializableDesc, TypeDesc};
pub use error::{Direction, ExpectedTypes, Result, SerializerError};
pub use global::{create_serializer, register, with_registry};
pub use node::{FormatCheck, Serializer, SerializerNode, TypeCheck};
pub use registry::{BuildContext, Registry, RegistryBuilder, SerializerFactory};
pub use serializers::{
    AnyFactory, EnumFactory, MappingFactory, PrimitiveFactory, RecordFactory, SerializableFactory,
    SequenceFactory, TupleFactory, UnionFactory,
};
pub use value::{plain_kind, CustomValue, EnumMember, Instance, Opaque, Record, Serializable};
