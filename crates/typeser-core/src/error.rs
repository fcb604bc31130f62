//! # Error Types — Breadcrumb-Attributed Failures
//!
//! Every failure produced by a serializer node names the node's breadcrumb,
//! so a mismatch deep inside a nested value is reported at its exact
//! location rather than as a generic conversion failure.
//!
//! ## Taxonomy
//!
//! - [`SerializerError::Type`] — the value's runtime type is not in the set
//!   accepted at this breadcrumb. Carries the expected type set and the
//!   observed type.
//! - [`SerializerError::Format`] — the value has an accepted type but the
//!   wrong shape or content: tuple arity, missing record field, unknown enum
//!   member, non-plain payload from a self-serializing type, malformed text.
//! - [`SerializerError::MissingFactory`] — no factory accepts a descriptor.
//!   Raised while building a serializer tree, never while converting.
//!
//! Errors are never recovered inside the engine except during union arm
//! selection, which only consults type checks.

use std::fmt;

use thiserror::Error;

use crate::breadcrumb::Breadcrumb;

/// Which half of the contract failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Typed instance → plain value.
    Serialization,
    /// Plain value → typed instance.
    Deserialization,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Serialization => f.write_str("serialization"),
            Self::Deserialization => f.write_str("deserialization"),
        }
    }
}

/// Ordered, de-duplicated set of type names a node accepts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ExpectedTypes(Vec<String>);

impl ExpectedTypes {
    /// A single expected type.
    pub fn one(name: impl Into<String>) -> Self {
        Self(vec![name.into()])
    }

    /// Several expected types, keeping first occurrence order.
    pub fn many<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self(Vec::new());
        for name in names {
            set.insert(name.into());
        }
        set
    }

    /// Merge another set into this one.
    pub fn extend(&mut self, other: Self) {
        for name in other.0 {
            self.insert(name);
        }
    }

    fn insert(&mut self, name: String) {
        if !self.0.contains(&name) {
            self.0.push(name);
        }
    }

    /// Returns true if `name` is one of the expected types.
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|n| n == name)
    }

    /// The type names, in insertion order.
    pub fn names(&self) -> &[String] {
        &self.0
    }

    /// Number of distinct expected types.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ExpectedTypes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_slice() {
            [single] => write!(f, "expected type: {single}"),
            names => write!(f, "expected types: [{}]", names.join(", ")),
        }
    }
}

/// Error raised while building or running a serializer tree.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SerializerError {
    /// The value's runtime type is not accepted at this breadcrumb.
    #[error("{direction} type error at {breadcrumb}: {expected}; got {observed}")]
    Type {
        /// Phase that failed.
        direction: Direction,
        /// Location of the rejecting node.
        breadcrumb: Breadcrumb,
        /// Types the node would have accepted.
        expected: ExpectedTypes,
        /// Type name of the value actually supplied.
        observed: String,
    },

    /// The value has an accepted type but the wrong shape or content.
    #[error("{direction} format error at {breadcrumb}: {message}")]
    Format {
        /// Phase that failed.
        direction: Direction,
        /// Location of the rejecting node.
        breadcrumb: Breadcrumb,
        /// Description of the structural violation.
        message: String,
    },

    /// No registered factory accepts a type descriptor.
    #[error("{breadcrumb}: no serializer factory is registered for type descriptor '{descriptor}'")]
    MissingFactory {
        /// Rendering of the unresolved descriptor.
        descriptor: String,
        /// Breadcrumb at which resolution was attempted.
        breadcrumb: Breadcrumb,
    },
}

impl SerializerError {
    /// Build a [`SerializerError::Type`] at `breadcrumb`.
    pub fn type_mismatch(
        direction: Direction,
        breadcrumb: &Breadcrumb,
        expected: ExpectedTypes,
        observed: impl Into<String>,
    ) -> Self {
        Self::Type {
            direction,
            breadcrumb: breadcrumb.clone(),
            expected,
            observed: observed.into(),
        }
    }

    /// Build a [`SerializerError::Format`] at `breadcrumb`.
    pub fn format(direction: Direction, breadcrumb: &Breadcrumb, message: impl Into<String>) -> Self {
        Self::Format {
            direction,
            breadcrumb: breadcrumb.clone(),
            message: message.into(),
        }
    }

    /// Breadcrumb of the node that raised the error.
    pub fn breadcrumb(&self) -> &Breadcrumb {
        match self {
            Self::Type { breadcrumb, .. }
            | Self::Format { breadcrumb, .. }
            | Self::MissingFactory { breadcrumb, .. } => breadcrumb,
        }
    }

    /// Returns true for [`SerializerError::Type`].
    pub fn is_type_error(&self) -> bool {
        matches!(self, Self::Type { .. })
    }

    /// Returns true for [`SerializerError::Format`].
    pub fn is_format_error(&self) -> bool {
        matches!(self, Self::Format { .. })
    }

    /// Returns true for [`SerializerError::MissingFactory`].
    pub fn is_missing_factory(&self) -> bool {
        matches!(self, Self::MissingFactory { .. })
    }
}

/// Result alias used throughout the engine.
pub type Result<T> = std::result::Result<T, SerializerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_types_dedup_preserves_order() {
        let mut set = ExpectedTypes::many(["int", "float"]);
        set.extend(ExpectedTypes::many(["float", "None", "int"]));
        assert_eq!(set.names(), ["int", "float", "None"]);
    }

    #[test]
    fn test_expected_types_display() {
        assert_eq!(ExpectedTypes::one("int").to_string(), "expected type: int");
        assert_eq!(
            ExpectedTypes::many(["int", "str"]).to_string(),
            "expected types: [int, str]"
        );
    }

    #[test]
    fn test_type_error_message() {
        let err = SerializerError::Type {
            direction: Direction::Deserialization,
            breadcrumb: Breadcrumb::root().enter("int"),
            expected: ExpectedTypes::one("int"),
            observed: "str".into(),
        };
        assert_eq!(
            err.to_string(),
            "deserialization type error at int: expected type: int; got str"
        );
        assert!(err.is_type_error());
        assert!(!err.is_format_error());
    }

    #[test]
    fn test_missing_factory_message() {
        let err = SerializerError::MissingFactory {
            descriptor: "datetime".into(),
            breadcrumb: Breadcrumb::root(),
        };
        let msg = err.to_string();
        assert!(msg.contains("datetime"));
        assert!(msg.starts_with("(root)"));
        assert!(err.is_missing_factory());
    }
}
