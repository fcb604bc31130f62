//! # Type Descriptors — What Value Is Expected Here
//!
//! A [`TypeDesc`] describes the shape a serializer node converts. The core
//! never reflects on Rust types at call time: record layouts are explicit
//! [`RecordDesc`] tables authored by hand, by the `typeser-schema` document
//! compiler, or by a derive-style helper such as
//! [`TypeDesc::serializable`].
//!
//! Descriptors are immutable and cheap to clone; composite descriptors
//! share their tables through `Arc`.
//!
//! ## Open Extension
//!
//! [`TypeDesc::Named`] is the escape hatch for types unknown to the core
//! (timestamps, identifiers, value objects). No built-in factory accepts it;
//! a user-registered factory must.

use std::fmt;
use std::sync::Arc;

use crate::value::{Instance, Serializable};

/// JSON primitive and untyped collection descriptors.
///
/// These are always served by the built-in primitive factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Int,
    Float,
    Str,
    Bool,
    None,
    /// Untyped mapping of plain values.
    Dict,
    /// Untyped list of plain values.
    List,
    /// Untyped tuple of plain values.
    Tuple,
}

impl Primitive {
    /// Type name used in breadcrumbs and errors.
    pub fn name(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::Str => "str",
            Self::Bool => "bool",
            Self::None => "None",
            Self::Dict => "dict",
            Self::List => "list",
            Self::Tuple => "tuple",
        }
    }
}

/// Description of the type expected at one position of a value tree.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDesc {
    /// Any plain value, passed through unchanged.
    Any,
    Primitive(Primitive),
    /// Mapping from key type to value type.
    Mapping(Box<TypeDesc>, Box<TypeDesc>),
    /// Homogeneous ordered sequence.
    Sequence(Box<TypeDesc>),
    /// Fixed-arity heterogeneous tuple.
    Tuple(Vec<TypeDesc>),
    /// One of several alternatives, tried in declaration order.
    Union(Vec<TypeDesc>),
    Enum(Arc<EnumDesc>),
    Record(Arc<RecordDesc>),
    /// A user type that converts itself to and from a plain value.
    Serializable(SerializableDesc),
    /// An opaque type understood only by user-registered factories.
    Named {
        /// Type name, e.g. `datetime`.
        name: String,
        /// Optional type arguments, e.g. the element type of a set.
        args: Vec<TypeDesc>,
    },
}

impl TypeDesc {
    pub fn int() -> Self {
        Self::Primitive(Primitive::Int)
    }

    pub fn float() -> Self {
        Self::Primitive(Primitive::Float)
    }

    pub fn str() -> Self {
        Self::Primitive(Primitive::Str)
    }

    pub fn bool() -> Self {
        Self::Primitive(Primitive::Bool)
    }

    pub fn none() -> Self {
        Self::Primitive(Primitive::None)
    }

    pub fn mapping(key: Self, value: Self) -> Self {
        Self::Mapping(Box::new(key), Box::new(value))
    }

    pub fn sequence(element: Self) -> Self {
        Self::Sequence(Box::new(element))
    }

    pub fn tuple(elements: impl IntoIterator<Item = Self>) -> Self {
        Self::Tuple(elements.into_iter().collect())
    }

    pub fn union(arms: impl IntoIterator<Item = Self>) -> Self {
        Self::Union(arms.into_iter().collect())
    }

    /// `Union[inner, None]`.
    pub fn optional(inner: Self) -> Self {
        Self::Union(vec![inner, Self::none()])
    }

    /// An opaque named type without arguments.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// An opaque named type with arguments.
    pub fn named_with(name: impl Into<String>, args: impl IntoIterator<Item = Self>) -> Self {
        Self::Named {
            name: name.into(),
            args: args.into_iter().collect(),
        }
    }

    /// Descriptor for a [`Serializable`] user type.
    pub fn serializable<T: Serializable>() -> Self {
        Self::Serializable(SerializableDesc::of::<T>())
    }

    /// Returns the primitive kind, if this is a JSON primitive descriptor.
    pub fn as_primitive(&self) -> Option<Primitive> {
        match self {
            Self::Primitive(p) => Some(*p),
            _ => None,
        }
    }

    /// Returns true if the absence sentinel is a valid value of this type.
    pub fn accepts_none(&self) -> bool {
        match self {
            Self::Any | Self::Primitive(Primitive::None) => true,
            Self::Union(arms) => arms.iter().any(Self::accepts_none),
            _ => false,
        }
    }
}

impl fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("Any"),
            Self::Primitive(p) => f.write_str(p.name()),
            Self::Mapping(k, v) => write!(f, "Dict[{k}, {v}]"),
            Self::Sequence(t) => write!(f, "List[{t}]"),
            Self::Tuple(items) => write!(f, "Tuple[{}]", join(items)),
            Self::Union(arms) => write!(f, "Union[{}]", join(arms)),
            Self::Enum(desc) => write!(f, "enum.{}", desc.name),
            Self::Record(desc) => write!(f, "record.{}", desc.name),
            Self::Serializable(desc) => write!(f, "serializable.{}", desc.name),
            Self::Named { name, args } if args.is_empty() => f.write_str(name),
            Self::Named { name, args } => write!(f, "{name}[{}]", join(args)),
        }
    }
}

fn join(items: &[TypeDesc]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// An enumeration: a name and its ordered member names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDesc {
    pub name: String,
    pub members: Vec<String>,
}

impl EnumDesc {
    pub fn new<I, S>(name: impl Into<String>, members: I) -> Arc<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Arc::new(Self {
            name: name.into(),
            members: members.into_iter().map(Into::into).collect(),
        })
    }

    pub fn contains(&self, member: &str) -> bool {
        self.members.iter().any(|m| m == member)
    }

    /// The instance for a declared member, or `None` if undeclared.
    pub fn member(&self, member: &str) -> Option<Instance> {
        self.contains(member)
            .then(|| Instance::member(self.name.clone(), member))
    }
}

/// One declared record field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDesc {
    pub name: String,
    pub ty: TypeDesc,
    /// Value used when the field is absent; `None` means the field is required.
    pub default: Option<Instance>,
}

impl FieldDesc {
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// The type the field's serializer is built for.
    ///
    /// A field whose default is the absence sentinel also accepts `None`,
    /// even when its declared type does not.
    pub fn effective_type(&self) -> TypeDesc {
        match &self.default {
            Some(Instance::None) if !self.ty.accepts_none() => TypeDesc::optional(self.ty.clone()),
            _ => self.ty.clone(),
        }
    }
}

/// Structural descriptor of a record type: its name and ordered fields.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordDesc {
    pub name: String,
    pub fields: Vec<FieldDesc>,
}

impl RecordDesc {
    pub fn builder(name: impl Into<String>) -> RecordBuilder {
        RecordBuilder {
            desc: Self {
                name: name.into(),
                fields: Vec::new(),
            },
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDesc> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Builder for [`RecordDesc`]. Redeclaring a field replaces it in place.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    desc: RecordDesc,
}

impl RecordBuilder {
    /// Declare a required field.
    #[must_use]
    pub fn field(self, name: impl Into<String>, ty: TypeDesc) -> Self {
        self.push(FieldDesc {
            name: name.into(),
            ty,
            default: None,
        })
    }

    /// Declare a field with a default value.
    #[must_use]
    pub fn field_with_default(
        self,
        name: impl Into<String>,
        ty: TypeDesc,
        default: impl Into<Instance>,
    ) -> Self {
        self.push(FieldDesc {
            name: name.into(),
            ty,
            default: Some(default.into()),
        })
    }

    fn push(mut self, field: FieldDesc) -> Self {
        match self.desc.fields.iter_mut().find(|f| f.name == field.name) {
            Some(slot) => *slot = field,
            None => self.desc.fields.push(field),
        }
        self
    }

    pub fn build(self) -> Arc<RecordDesc> {
        Arc::new(self.desc)
    }
}

/// Type-erased conversion table of a [`Serializable`] type.
#[derive(Clone, Copy)]
pub struct SerializableDesc {
    pub name: &'static str,
    pub(crate) is_instance: fn(&Instance) -> bool,
    pub(crate) to_plain: fn(&Instance) -> Option<Instance>,
    pub(crate) from_plain: fn(&Instance) -> Result<Instance, String>,
}

impl SerializableDesc {
    pub fn of<T: Serializable>() -> Self {
        Self {
            name: T::TYPE_NAME,
            is_instance: is_instance::<T>,
            to_plain: to_plain::<T>,
            from_plain: from_plain::<T>,
        }
    }
}

fn is_instance<T: Serializable>(value: &Instance) -> bool {
    value.downcast_ref::<T>().is_some()
}

fn to_plain<T: Serializable>(value: &Instance) -> Option<Instance> {
    value.downcast_ref::<T>().map(T::to_plain)
}

fn from_plain<T: Serializable>(plain: &Instance) -> Result<Instance, String> {
    T::from_plain(plain).map(Instance::custom)
}

impl fmt::Debug for SerializableDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerializableDesc")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl PartialEq for SerializableDesc {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}
