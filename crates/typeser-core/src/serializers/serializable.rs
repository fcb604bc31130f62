//! Self-serializing user types.
//!
//! The node delegates to [`Serializable::to_plain`](crate::Serializable::to_plain)
//! and [`Serializable::from_plain`](crate::Serializable::from_plain) and
//! verifies that what comes back from `to_plain` is plain.

use serde_json::Value;

use crate::breadcrumb::Breadcrumb;
use crate::descriptor::{SerializableDesc, TypeDesc};
use crate::error::{Direction, ExpectedTypes, Result, SerializerError};
use crate::node::{FormatCheck, SerializerNode, TypeCheck};
use crate::registry::{BuildContext, SerializerFactory};
use crate::value::Instance;

#[derive(Debug, Clone, Copy, Default)]
pub struct SerializableFactory;

impl SerializerFactory for SerializableFactory {
    fn name(&self) -> &str {
        "serializable"
    }

    fn test(&self, desc: &TypeDesc) -> bool {
        matches!(desc, TypeDesc::Serializable(_))
    }

    fn construct(&self, desc: &TypeDesc, ctx: &BuildContext<'_>) -> Result<Box<dyn SerializerNode>> {
        let TypeDesc::Serializable(serializable) = desc else {
            return Err(ctx.unsupported(desc));
        };
        Ok(Box::new(SerializableSerializer {
            breadcrumb: ctx.breadcrumb(format!("serializable.{}", serializable.name)),
            desc: *serializable,
        }))
    }
}

#[derive(Debug)]
struct SerializableSerializer {
    breadcrumb: Breadcrumb,
    desc: SerializableDesc,
}

impl SerializableSerializer {
    fn plain_of(&self, value: &Instance) -> std::result::Result<Value, String> {
        let plain = (self.desc.to_plain)(value)
            .ok_or_else(|| format!("value is not a {}", self.desc.name))?;
        plain
            .to_plain()
            .map_err(|reason| format!("{}::to_plain returned a non-plain value: {reason}", self.desc.name))
    }
}

impl SerializerNode for SerializableSerializer {
    fn breadcrumb(&self) -> &Breadcrumb {
        &self.breadcrumb
    }

    fn check_serialize_type(&self, value: &Instance) -> TypeCheck {
        if (self.desc.is_instance)(value) {
            Ok(())
        } else {
            Err(ExpectedTypes::one(self.desc.name))
        }
    }

    fn check_serialize_format(&self, value: &Instance) -> FormatCheck {
        self.plain_of(value).map(drop)
    }

    fn check_deserialize_type(&self, _raw: &Value) -> TypeCheck {
        Ok(())
    }

    fn convert_serialize(&self, value: &Instance) -> Result<Value> {
        self.plain_of(value)
            .map_err(|message| SerializerError::format(Direction::Serialization, &self.breadcrumb, message))
    }

    fn convert_deserialize(&self, raw: &Value) -> Result<Instance> {
        (self.desc.from_plain)(&Instance::from_plain(raw))
            .map_err(|message| SerializerError::format(Direction::Deserialization, &self.breadcrumb, message))
    }
}
