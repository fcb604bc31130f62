//! # Instances — Typed In-Memory Values
//!
//! [`Instance`] is the typed side of every conversion: the value handed to
//! `serialize` and produced by `deserialize`. It distinguishes types that
//! plain JSON collapses (tuples vs lists, enum members vs strings, records
//! vs mappings) and carries arbitrary user types through
//! [`Instance::Custom`].
//!
//! ## Plain Instances
//!
//! An instance is *plain* when it only uses `None`, `Bool`, `Int`, finite
//! `Float`, `Str`, `List`, `Tuple` and `Map` with scalar keys. Plain
//! instances convert losslessly to `serde_json::Value` via
//! [`Instance::to_plain`] (tuples become arrays, scalar keys are
//! stringified).
//!
//! ## Booleans and Integers
//!
//! `Bool` and `Int` are distinct variants and no serializer treats one as
//! the other.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Number, Value};

/// A user-defined runtime value carried inside [`Instance::Custom`].
///
/// Blanket-implemented for every `Any + Debug + PartialEq + Send + Sync`
/// type, so extension types (timestamps, identifiers, value objects) need no
/// boilerplate.
pub trait CustomValue: Any + fmt::Debug + Send + Sync {
    /// Short type name reported as the observed type in errors.
    fn type_name(&self) -> &'static str;

    /// Upcast for downcasting to the concrete type.
    fn as_any(&self) -> &dyn Any;

    /// Equality against another custom value of any type.
    fn eq_value(&self, other: &dyn CustomValue) -> bool;
}

impl<T> CustomValue for T
where
    T: Any + fmt::Debug + PartialEq + Send + Sync,
{
    fn type_name(&self) -> &'static str {
        short_type_name(std::any::type_name::<T>())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn eq_value(&self, other: &dyn CustomValue) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }
}

/// Strip module paths and generic arguments: `chrono::DateTime<Utc>` → `DateTime`.
fn short_type_name(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// A user type that converts itself to and from a plain instance.
///
/// Registered through [`TypeDesc::serializable`](crate::TypeDesc::serializable).
/// The serializer rejects any `to_plain` result that is not a plain
/// instance, so a record, enum member or custom value can never leak into
/// the output.
pub trait Serializable: Any + fmt::Debug + PartialEq + Send + Sync + Sized {
    /// Name used in breadcrumbs and type errors.
    const TYPE_NAME: &'static str;

    /// Produce the plain representation of `self`.
    fn to_plain(&self) -> Instance;

    /// Rebuild a value from its plain representation.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason when `plain` does not describe a
    /// valid value; it is reported as a format error.
    fn from_plain(plain: &Instance) -> Result<Self, String>;
}

/// Shared handle to a [`CustomValue`].
#[derive(Clone)]
pub struct Opaque(Arc<dyn CustomValue>);

impl Opaque {
    /// Wrap a custom value.
    pub fn new<T: CustomValue>(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// Short type name of the wrapped value.
    pub fn type_name(&self) -> &'static str {
        self.0.type_name()
    }

    /// Borrow the wrapped value as `T`, if it is one.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }
}

impl fmt::Debug for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl PartialEq for Opaque {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_value(&*other.0)
    }
}

/// A member of a declared enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumMember {
    /// Name of the enumeration this member belongs to.
    pub enum_name: String,
    /// Symbolic member name.
    pub name: String,
}

/// A record value: a record type name and named field values.
///
/// Equality compares the type name and the name→value set, ignoring the
/// order fields were assigned in. Omitted defaulted fields are not implied:
/// deserializing fills them in, so a record that leaves them out compares
/// unequal to its own round trip.
#[derive(Debug, Clone, Default)]
pub struct Record {
    /// Name of the record type.
    pub type_name: String,
    /// Field values in assignment order. Deserialized records use
    /// declaration order.
    pub fields: Vec<(String, Instance)>,
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name
            && self.fields.len() == other.fields.len()
            && self
                .fields
                .iter()
                .all(|(name, value)| other.get(name) == Some(value))
    }
}

impl Record {
    /// An empty record of the given type.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Vec::new(),
        }
    }

    /// Builder-style field assignment; replaces an existing field of the same name.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Instance>) -> Self {
        self.set(name, value);
        self
    }

    /// Assign a field, replacing an existing one of the same name.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Instance>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Look up a field value by name.
    pub fn get(&self, name: &str) -> Option<&Instance> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }
}

/// A typed in-memory value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Instance {
    /// The absence sentinel.
    #[default]
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Instance>),
    Tuple(Vec<Instance>),
    /// Ordered mapping; keys may be any instance.
    Map(Vec<(Instance, Instance)>),
    Enum(EnumMember),
    Record(Record),
    Custom(Opaque),
}

impl Instance {
    /// Wrap a user value.
    pub fn custom<T: CustomValue>(value: T) -> Self {
        Self::Custom(Opaque::new(value))
    }

    /// Enum member constructor.
    pub fn member(enum_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Enum(EnumMember {
            enum_name: enum_name.into(),
            name: name.into(),
        })
    }

    /// Borrow a custom value as `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Self::Custom(opaque) => opaque.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Name of this value's runtime type, as reported in type errors.
    pub fn kind_name(&self) -> String {
        match self {
            Self::None => "None".into(),
            Self::Bool(_) => "bool".into(),
            Self::Int(_) => "int".into(),
            Self::Float(_) => "float".into(),
            Self::Str(_) => "str".into(),
            Self::List(_) => "list".into(),
            Self::Tuple(_) => "tuple".into(),
            Self::Map(_) => "dict".into(),
            Self::Enum(member) => format!("enum.{}", member.enum_name),
            Self::Record(record) => format!("record.{}", record.type_name),
            Self::Custom(opaque) => opaque.type_name().into(),
        }
    }

    /// Returns true if [`Instance::to_plain`] would succeed.
    pub fn is_plain(&self) -> bool {
        self.to_plain().is_ok()
    }

    /// Convert a plain instance into a JSON value.
    ///
    /// # Errors
    ///
    /// Returns a description of the first non-plain component: an enum
    /// member, record, custom value, non-finite float, non-scalar mapping
    /// key, or duplicate stringified key.
    pub fn to_plain(&self) -> Result<Value, String> {
        match self {
            Self::None => Ok(Value::Null),
            Self::Bool(b) => Ok(Value::Bool(*b)),
            Self::Int(i) => Ok(Value::from(*i)),
            Self::Float(f) => float_to_plain(*f),
            Self::Str(s) => Ok(Value::String(s.clone())),
            Self::List(items) | Self::Tuple(items) => items
                .iter()
                .map(Self::to_plain)
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            Self::Map(entries) => {
                let mut map = Map::new();
                for (key, value) in entries {
                    let key_plain = key.to_plain()?;
                    let Some(key) = scalar_key(&key_plain) else {
                        return Err(format!(
                            "mapping key of type {} is not a JSON scalar",
                            key.kind_name()
                        ));
                    };
                    if map.contains_key(&key) {
                        return Err(format!("duplicate mapping key '{key}'"));
                    }
                    map.insert(key, value.to_plain()?);
                }
                Ok(Value::Object(map))
            }
            Self::Enum(_) | Self::Record(_) | Self::Custom(_) => {
                Err(format!("{} is not a plain value", self.kind_name()))
            }
        }
    }

    /// Convert a JSON value into a plain instance.
    ///
    /// Arrays become lists, objects become maps with string keys, integers
    /// that fit `i64` become `Int` and every other number becomes `Float`.
    pub fn from_plain(value: &Value) -> Self {
        match value {
            Value::Null => Self::None,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => Self::Str(s.clone()),
            Value::Array(items) => Self::List(items.iter().map(Self::from_plain).collect()),
            Value::Object(map) => Self::Map(
                map.iter()
                    .map(|(k, v)| (Self::Str(k.clone()), Self::from_plain(v)))
                    .collect(),
            ),
        }
    }
}

/// Convert a finite float to a JSON number.
pub(crate) fn float_to_plain(f: f64) -> Result<Value, String> {
    Number::from_f64(f)
        .map(Value::Number)
        .ok_or_else(|| format!("float {f} is not representable in JSON"))
}

/// Name of a plain value's JSON kind, using the same vocabulary as
/// [`Instance::kind_name`].
pub fn plain_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "None",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_i64() || n.is_u64() => "int",
        Value::Number(_) => "float",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

/// Text form of a scalar used as an object key; `None` for arrays and objects.
pub fn scalar_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Null => Some("null".into()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

impl From<bool> for Instance {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Instance {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Instance {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for Instance {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<&str> for Instance {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Instance {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<Record> for Instance {
    fn from(record: Record) -> Self {
        Self::Record(record)
    }
}

impl<T: Into<Instance>> From<Option<T>> for Instance {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::None, Into::into)
    }
}
