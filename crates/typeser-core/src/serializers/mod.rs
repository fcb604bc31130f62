//! # Built-in Serializers
//!
//! One factory and node type per descriptor family. Composite nodes build
//! their children at construction time and append a role segment to each
//! child's breadcrumb:
//!
//! | Family | Node name | Child segments |
//! |---|---|---|
//! | primitive | `int`, `float`, `str`, `bool`, `None`, `dict`, `list`, `tuple` | – |
//! | any | `Any` | – |
//! | mapping | `mapping` | `[key]`, `[value]` |
//! | sequence | `sequence` | `[]` |
//! | tuple | `tuple` | `[0]`, `[1]`, ... |
//! | union | `union` | `[0]`, `[1]`, ... (by arm) |
//! | enum | `enum.<Name>` | – |
//! | record | `record.<Name>` | `['field']` |
//! | serializable | `serializable.<Name>` | – |

mod any;
mod enumeration;
mod mapping;
mod primitive;
mod record;
mod serializable;
mod sequence;
mod tuple;
mod union;

pub use any::AnyFactory;
pub use enumeration::EnumFactory;
pub use mapping::MappingFactory;
pub use primitive::PrimitiveFactory;
pub use record::RecordFactory;
pub use serializable::SerializableFactory;
pub use sequence::SequenceFactory;
pub use tuple::TupleFactory;
pub use union::UnionFactory;

#[cfg(test)]
mod proptests;
