//! # Process-Wide Registry
//!
//! A lazily initialised [`Registry`] preloaded with the built-ins, for
//! callers that do not thread a registry through their code. Extensions are
//! registered at startup with [`register`]; serializers are then built with
//! [`create_serializer`]. Registering after serializers were created is
//! allowed but only affects serializers created afterwards.

use std::sync::OnceLock;

use parking_lot::RwLock;

use crate::descriptor::TypeDesc;
use crate::error::Result;
use crate::node::Serializer;
use crate::registry::{Registry, SerializerFactory};

static GLOBAL: OnceLock<RwLock<Registry>> = OnceLock::new();

fn global() -> &'static RwLock<Registry> {
    GLOBAL.get_or_init(|| RwLock::new(Registry::new()))
}

/// Append a factory to the process-wide registry.
pub fn register<F: SerializerFactory + 'static>(factory: F) {
    global().write().register(factory);
}

/// Build a serializer for `desc` from the process-wide registry.
///
/// # Errors
///
/// [`SerializerError::MissingFactory`](crate::SerializerError::MissingFactory)
/// if some descriptor in `desc` has no factory.
pub fn create_serializer(desc: &TypeDesc) -> Result<Serializer> {
    global().read().create(desc)
}

/// Run `f` with shared access to the process-wide registry.
pub fn with_registry<R>(f: impl FnOnce(&Registry) -> R) -> R {
    f(&global().read())
}
