//! # Registry — Descriptor to Serializer Resolution
//!
//! The [`Registry`] owns an ordered list of [`SerializerFactory`] objects.
//! Resolving a descriptor picks one factory and lets it build a node, which
//! in turn resolves its children through the same registry.
//!
//! ## Resolution Order
//!
//! 1. JSON primitive descriptors (`int`, `str`, `dict`, ...) are always
//!    served by the built-in primitive factory. It cannot be shadowed, so
//!    plain JSON values remain serializable whatever is registered.
//! 2. Otherwise registered factories are tried newest first; the first
//!    whose `test` accepts the descriptor builds the node. A later
//!    registration therefore overrides built-ins and earlier extensions.
//! 3. If nothing matches, resolution fails with
//!    [`SerializerError::MissingFactory`].
//!
//! ## Assembly
//!
//! Registries are assembled at startup, either imperatively with
//! [`Registry::register`] or through [`RegistryBuilder`]. Resolution only
//! reads the factory list.

use std::fmt;
use std::sync::Arc;

use crate::breadcrumb::{Breadcrumb, Segment};
use crate::descriptor::TypeDesc;
use crate::error::{Result, SerializerError};
use crate::node::{Serializer, SerializerNode};
use crate::serializers::{
    AnyFactory, EnumFactory, MappingFactory, PrimitiveFactory, RecordFactory,
    SerializableFactory, SequenceFactory, TupleFactory, UnionFactory,
};

/// Matcher and constructor for one family of type descriptors.
pub trait SerializerFactory: Send + Sync {
    /// Name used in logs and [`Registry::factory_names`].
    fn name(&self) -> &str;

    /// Returns true if this factory can build a node for `desc`.
    fn test(&self, desc: &TypeDesc) -> bool;

    /// Build the node for `desc`, resolving children through `ctx`.
    ///
    /// # Errors
    ///
    /// Errors from resolving child descriptors, typically
    /// [`SerializerError::MissingFactory`].
    fn construct(&self, desc: &TypeDesc, ctx: &BuildContext<'_>) -> Result<Box<dyn SerializerNode>>;
}

/// What a factory sees while constructing a node.
pub struct BuildContext<'a> {
    registry: &'a Registry,
    parent: &'a Breadcrumb,
}

impl<'a> BuildContext<'a> {
    /// The breadcrumb of a node named `name` at this position.
    pub fn breadcrumb(&self, name: impl Into<String>) -> Breadcrumb {
        self.parent.enter(name)
    }

    /// Resolve a child of the node at `own`, in the given role.
    ///
    /// # Errors
    ///
    /// Any resolution error for `desc`.
    pub fn child(
        &self,
        own: &Breadcrumb,
        segment: Segment,
        desc: &TypeDesc,
    ) -> Result<Box<dyn SerializerNode>> {
        self.registry.resolve(desc, &own.push(segment))
    }

    /// The error a factory returns when handed a descriptor it does not handle.
    pub fn unsupported(&self, desc: &TypeDesc) -> SerializerError {
        SerializerError::MissingFactory {
            descriptor: desc.to_string(),
            breadcrumb: self.parent.clone(),
        }
    }
}

/// Ordered collection of serializer factories.
#[derive(Clone)]
pub struct Registry {
    factories: Vec<Arc<dyn SerializerFactory>>,
}

impl Registry {
    /// A registry preloaded with the built-in composite factories.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(AnyFactory);
        registry.register(MappingFactory);
        registry.register(SequenceFactory);
        registry.register(TupleFactory);
        registry.register(UnionFactory);
        registry.register(EnumFactory);
        registry.register(RecordFactory);
        registry.register(SerializableFactory);
        registry
    }

    /// A registry with no composite factories; only JSON primitives resolve.
    pub fn empty() -> Self {
        Self {
            factories: Vec::new(),
        }
    }

    /// Start assembling a registry on top of the built-ins.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder {
            registry: Self::new(),
        }
    }

    /// Append a factory. It takes priority over everything registered before it.
    pub fn register<F: SerializerFactory + 'static>(&mut self, factory: F) {
        tracing::debug!(
            factory = factory.name(),
            position = self.factories.len(),
            "registered serializer factory"
        );
        self.factories.push(Arc::new(factory));
    }

    /// Factory names in registration order, oldest first.
    pub fn factory_names(&self) -> Vec<&str> {
        self.factories.iter().map(|f| f.name()).collect()
    }

    /// Build the node for `desc` below `parent`.
    ///
    /// # Errors
    ///
    /// [`SerializerError::MissingFactory`] if no factory accepts `desc` or
    /// any descriptor nested in it.
    pub fn resolve(&self, desc: &TypeDesc, parent: &Breadcrumb) -> Result<Box<dyn SerializerNode>> {
        let ctx = BuildContext {
            registry: self,
            parent,
        };

        if PrimitiveFactory.test(desc) {
            return PrimitiveFactory.construct(desc, &ctx);
        }

        match self.factories.iter().rev().find(|f| f.test(desc)) {
            Some(factory) => {
                tracing::trace!(
                    factory = factory.name(),
                    descriptor = %desc,
                    breadcrumb = %parent,
                    "resolved serializer factory"
                );
                factory.construct(desc, &ctx)
            }
            None => Err(SerializerError::MissingFactory {
                descriptor: desc.to_string(),
                breadcrumb: parent.clone(),
            }),
        }
    }

    /// Build a serializer tree for `desc` with an empty root breadcrumb.
    ///
    /// # Errors
    ///
    /// See [`Registry::resolve`].
    pub fn create(&self, desc: &TypeDesc) -> Result<Serializer> {
        self.resolve(desc, &Breadcrumb::root()).map(Serializer::new)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("factories", &self.factory_names())
            .finish()
    }
}

/// Startup-time assembly of a [`Registry`].
#[derive(Debug)]
pub struct RegistryBuilder {
    registry: Registry,
}

impl RegistryBuilder {
    /// Register a factory; later calls take priority.
    #[must_use]
    pub fn register<F: SerializerFactory + 'static>(mut self, factory: F) -> Self {
        self.registry.register(factory);
        self
    }

    pub fn build(self) -> Registry {
        self.registry
    }
}
