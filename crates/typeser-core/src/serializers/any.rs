//! `Any`: plain values pass through untouched.

use serde_json::Value;

use crate::breadcrumb::Breadcrumb;
use crate::descriptor::TypeDesc;
use crate::error::{Direction, Result, SerializerError};
use crate::node::{FormatCheck, SerializerNode, TypeCheck};
use crate::registry::{BuildContext, SerializerFactory};
use crate::value::Instance;

#[derive(Debug, Clone, Copy, Default)]
pub struct AnyFactory;

impl SerializerFactory for AnyFactory {
    fn name(&self) -> &str {
        "any"
    }

    fn test(&self, desc: &TypeDesc) -> bool {
        matches!(desc, TypeDesc::Any)
    }

    fn construct(&self, _desc: &TypeDesc, ctx: &BuildContext<'_>) -> Result<Box<dyn SerializerNode>> {
        Ok(Box::new(AnySerializer {
            breadcrumb: ctx.breadcrumb("Any"),
        }))
    }
}

#[derive(Debug)]
struct AnySerializer {
    breadcrumb: Breadcrumb,
}

impl SerializerNode for AnySerializer {
    fn breadcrumb(&self) -> &Breadcrumb {
        &self.breadcrumb
    }

    fn check_serialize_type(&self, _value: &Instance) -> TypeCheck {
        Ok(())
    }

    fn check_serialize_format(&self, value: &Instance) -> FormatCheck {
        value.to_plain().map(drop)
    }

    fn check_deserialize_type(&self, _raw: &Value) -> TypeCheck {
        Ok(())
    }

    fn convert_serialize(&self, value: &Instance) -> Result<Value> {
        value
            .to_plain()
            .map_err(|message| SerializerError::format(Direction::Serialization, &self.breadcrumb, message))
    }

    fn convert_deserialize(&self, raw: &Value) -> Result<Instance> {
        Ok(Instance::from_plain(raw))
    }
}
