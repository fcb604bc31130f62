//! # Serializer Nodes — The Validate-Then-Convert Contract
//!
//! A [`SerializerNode`] converts one layer of a type descriptor. Composite
//! nodes own their children, built once by the registry when the node is
//! constructed; nothing is resolved per call.
//!
//! ## Two Phases
//!
//! [`SerializerNode::serialize`] and [`SerializerNode::deserialize`] are
//! provided methods that always run, in order:
//!
//! 1. the **type check**: on failure a [`SerializerError::Type`] with the
//!    expected type set, the observed type and this node's breadcrumb;
//! 2. the **format check**: on failure a [`SerializerError::Format`];
//! 3. the **conversion**, which may recurse into children.
//!
//! Implementors supply the checks and conversions and must not override the
//! provided operations. Conversions may assume both checks passed.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::breadcrumb::Breadcrumb;
use crate::codec::{self, TextStyle};
use crate::error::{Direction, ExpectedTypes, Result, SerializerError};
use crate::value::{plain_kind, Instance};

/// Outcome of a type check: the expected type set on mismatch.
pub type TypeCheck = std::result::Result<(), ExpectedTypes>;

/// Outcome of a format check: a description of the violation.
pub type FormatCheck = std::result::Result<(), String>;

/// One layer of a serializer tree.
///
/// Nodes are immutable after construction and safe to share across threads.
pub trait SerializerNode: Send + Sync + fmt::Debug {
    /// Location of this node in its tree.
    fn breadcrumb(&self) -> &Breadcrumb;

    /// Type check for values passed to `serialize`.
    fn check_serialize_type(&self, value: &Instance) -> TypeCheck;

    /// Structural check for values passed to `serialize`.
    fn check_serialize_format(&self, _value: &Instance) -> FormatCheck {
        Ok(())
    }

    /// Type check for plain values passed to `deserialize`.
    fn check_deserialize_type(&self, raw: &Value) -> TypeCheck;

    /// Structural check for plain values passed to `deserialize`.
    fn check_deserialize_format(&self, _raw: &Value) -> FormatCheck {
        Ok(())
    }

    /// Conversion half of `serialize`, run after both checks passed.
    fn convert_serialize(&self, value: &Instance) -> Result<Value>;

    /// Conversion half of `deserialize`, run after both checks passed.
    fn convert_deserialize(&self, raw: &Value) -> Result<Instance>;

    /// Child nodes, in declaration order.
    fn children(&self) -> Vec<&dyn SerializerNode> {
        Vec::new()
    }

    /// Pick which of several plain readings of a mapping key to deserialize.
    ///
    /// `forms` holds the key as a JSON string, followed by its reparse as a
    /// JSON scalar when it has one. Returns the index of the chosen form, or
    /// `None` if this node accepts none of them.
    fn select_key_form(&self, forms: &[Value]) -> Option<usize> {
        forms
            .iter()
            .position(|form| self.check_deserialize_type(form).is_ok())
    }

    /// Validate `value`, then convert it to a plain value.
    ///
    /// # Errors
    ///
    /// Type, format, or nested child errors, each carrying the breadcrumb of
    /// the node that rejected the value.
    fn serialize(&self, value: &Instance) -> Result<Value> {
        if let Err(expected) = self.check_serialize_type(value) {
            return Err(SerializerError::type_mismatch(
                Direction::Serialization,
                self.breadcrumb(),
                expected,
                value.kind_name(),
            ));
        }
        if let Err(message) = self.check_serialize_format(value) {
            return Err(SerializerError::format(
                Direction::Serialization,
                self.breadcrumb(),
                message,
            ));
        }
        self.convert_serialize(value)
    }

    /// Validate `raw`, then convert it to a typed instance.
    ///
    /// # Errors
    ///
    /// Type, format, or nested child errors, each carrying the breadcrumb of
    /// the node that rejected the value.
    fn deserialize(&self, raw: &Value) -> Result<Instance> {
        if let Err(expected) = self.check_deserialize_type(raw) {
            return Err(SerializerError::type_mismatch(
                Direction::Deserialization,
                self.breadcrumb(),
                expected,
                plain_kind(raw),
            ));
        }
        if let Err(message) = self.check_deserialize_format(raw) {
            return Err(SerializerError::format(
                Direction::Deserialization,
                self.breadcrumb(),
                message,
            ));
        }
        self.convert_deserialize(raw)
    }

    /// `serialize`, then encode as compact JSON text.
    ///
    /// # Errors
    ///
    /// Any `serialize` error, or a format error from the text codec.
    fn serialize_to_text(&self, value: &Instance) -> Result<String> {
        codec::encode(&self.serialize(value)?, TextStyle::Compact, self.breadcrumb())
    }

    /// `serialize`, then encode as indented JSON text.
    ///
    /// # Errors
    ///
    /// Any `serialize` error, or a format error from the text codec.
    fn serialize_to_text_pretty(&self, value: &Instance) -> Result<String> {
        codec::encode(&self.serialize(value)?, TextStyle::Pretty, self.breadcrumb())
    }

    /// Decode JSON text, then `deserialize` it.
    ///
    /// # Errors
    ///
    /// A format error for malformed text, or any `deserialize` error.
    fn deserialize_from_text(&self, text: &str) -> Result<Instance> {
        self.deserialize(&codec::decode(text, self.breadcrumb())?)
    }
}

/// Cloneable handle to the root of a serializer tree.
///
/// Returned by [`Registry::create`](crate::Registry::create) and
/// [`create_serializer`](crate::create_serializer).
#[derive(Clone)]
pub struct Serializer {
    root: Arc<dyn SerializerNode>,
}

impl Serializer {
    pub(crate) fn new(root: Box<dyn SerializerNode>) -> Self {
        Self { root: root.into() }
    }

    /// The root node.
    pub fn node(&self) -> &dyn SerializerNode {
        &*self.root
    }

    pub fn breadcrumb(&self) -> &Breadcrumb {
        self.root.breadcrumb()
    }

    /// See [`SerializerNode::serialize`].
    ///
    /// # Errors
    ///
    /// See [`SerializerNode::serialize`].
    pub fn serialize(&self, value: &Instance) -> Result<Value> {
        self.root.serialize(value)
    }

    /// See [`SerializerNode::deserialize`].
    ///
    /// # Errors
    ///
    /// See [`SerializerNode::deserialize`].
    pub fn deserialize(&self, raw: &Value) -> Result<Instance> {
        self.root.deserialize(raw)
    }

    /// See [`SerializerNode::serialize_to_text`].
    ///
    /// # Errors
    ///
    /// See [`SerializerNode::serialize_to_text`].
    pub fn serialize_to_text(&self, value: &Instance) -> Result<String> {
        self.root.serialize_to_text(value)
    }

    /// See [`SerializerNode::serialize_to_text_pretty`].
    ///
    /// # Errors
    ///
    /// See [`SerializerNode::serialize_to_text_pretty`].
    pub fn serialize_to_text_pretty(&self, value: &Instance) -> Result<String> {
        self.root.serialize_to_text_pretty(value)
    }

    /// See [`SerializerNode::deserialize_from_text`].
    ///
    /// # Errors
    ///
    /// See [`SerializerNode::deserialize_from_text`].
    pub fn deserialize_from_text(&self, text: &str) -> Result<Instance> {
        self.root.deserialize_from_text(text)
    }

    /// Breadcrumbs of every node in the tree, depth first, with depth.
    pub fn walk(&self) -> Vec<(usize, &Breadcrumb)> {
        let mut out = Vec::new();
        walk_node(self.node(), 0, &mut out);
        out
    }
}

fn walk_node<'a>(node: &'a dyn SerializerNode, depth: usize, out: &mut Vec<(usize, &'a Breadcrumb)>) {
    out.push((depth, node.breadcrumb()));
    for child in node.children() {
        walk_node(child, depth + 1, out);
    }
}

impl fmt::Debug for Serializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Serializer")
            .field("root", &self.root)
            .finish()
    }
}
