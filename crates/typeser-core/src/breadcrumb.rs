//! # Breadcrumbs — Diagnostic Paths Through the Serializer Tree
//!
//! Every serializer node carries a [`Breadcrumb`] describing where it sits
//! in the tree built from a type descriptor. Breadcrumbs only feed error
//! messages; they never influence conversion.
//!
//! ## Rendering
//!
//! A breadcrumb is an ordered list of [`Segment`]s. Node segments name the
//! serializer layer (`record.User`, `sequence`, `int`) and are joined with
//! `->`. Role segments describe the child's position inside its parent
//! (`['name']`, `[key]`, `[value]`, `[]`, `[0]`) and are appended directly:
//!
//! ```text
//! record.User['friend_ids']->sequence[]->int
//! ```

use std::fmt;

/// One step of a breadcrumb path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// A serializer layer, e.g. `record.User` or `int`.
    Node(String),
    /// The key position of a mapping.
    Key,
    /// The value position of a mapping.
    Value,
    /// The element position of a sequence.
    Element,
    /// A positional child: tuple element or union arm.
    Index(usize),
    /// A named record field.
    Field(String),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(name) => f.write_str(name),
            Self::Key => f.write_str("[key]"),
            Self::Value => f.write_str("[value]"),
            Self::Element => f.write_str("[]"),
            Self::Index(i) => write!(f, "[{i}]"),
            Self::Field(name) => write!(f, "['{name}']"),
        }
    }
}

/// Path from the root of a serializer tree to one node.
///
/// The root breadcrumb is empty. Each node's breadcrumb is its parent's
/// breadcrumb plus the role segment chosen by the parent, plus the node's
/// own [`Segment::Node`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Breadcrumb {
    segments: Vec<Segment>,
}

impl Breadcrumb {
    /// The empty root breadcrumb.
    pub fn root() -> Self {
        Self::default()
    }

    /// Breadcrumb of a node named `name` placed at `self`.
    #[must_use]
    pub fn enter(&self, name: impl Into<String>) -> Self {
        self.push(Segment::Node(name.into()))
    }

    /// Breadcrumb handed to a child in the given role.
    #[must_use]
    pub fn push(&self, segment: Segment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }

    /// The segments, root first.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

impl fmt::Display for Breadcrumb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("(root)");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 && matches!(segment, Segment::Node(_)) {
                f.write_str("->")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}
