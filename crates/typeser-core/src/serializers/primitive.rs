//! JSON primitives and untyped plain collections.
//!
//! Type checks are exact: `Bool` is never accepted as `int`, and `Int` is
//! never accepted as `float`, in either direction.

use serde_json::Value;

use crate::breadcrumb::Breadcrumb;
use crate::descriptor::{Primitive, TypeDesc};
use crate::error::{Direction, ExpectedTypes, Result, SerializerError};
use crate::node::{FormatCheck, SerializerNode, TypeCheck};
use crate::registry::{BuildContext, SerializerFactory};
use crate::value::Instance;

/// Fallback factory for [`TypeDesc::Primitive`]; consulted before any
/// registered factory and never shadowed.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrimitiveFactory;

impl SerializerFactory for PrimitiveFactory {
    fn name(&self) -> &str {
        "primitive"
    }

    fn test(&self, desc: &TypeDesc) -> bool {
        desc.as_primitive().is_some()
    }

    fn construct(&self, desc: &TypeDesc, ctx: &BuildContext<'_>) -> Result<Box<dyn SerializerNode>> {
        let Some(primitive) = desc.as_primitive() else {
            return Err(ctx.unsupported(desc));
        };
        Ok(Box::new(PrimitiveSerializer {
            primitive,
            breadcrumb: ctx.breadcrumb(primitive.name()),
        }))
    }
}

#[derive(Debug)]
struct PrimitiveSerializer {
    primitive: Primitive,
    breadcrumb: Breadcrumb,
}

impl PrimitiveSerializer {
    fn expected(&self) -> ExpectedTypes {
        ExpectedTypes::one(self.primitive.name())
    }
}

impl SerializerNode for PrimitiveSerializer {
    fn breadcrumb(&self) -> &Breadcrumb {
        &self.breadcrumb
    }

    fn check_serialize_type(&self, value: &Instance) -> TypeCheck {
        let matches = matches!(
            (self.primitive, value),
            (Primitive::Int, Instance::Int(_))
                | (Primitive::Float, Instance::Float(_))
                | (Primitive::Str, Instance::Str(_))
                | (Primitive::Bool, Instance::Bool(_))
                | (Primitive::None, Instance::None)
                | (Primitive::Dict, Instance::Map(_))
                | (Primitive::List, Instance::List(_))
                | (Primitive::Tuple, Instance::Tuple(_))
        );
        if matches {
            Ok(())
        } else {
            Err(self.expected())
        }
    }

    fn check_serialize_format(&self, value: &Instance) -> FormatCheck {
        match value {
            Instance::Float(f) if !f.is_finite() => {
                Err(format!("float {f} is not representable in JSON"))
            }
            Instance::Map(_) | Instance::List(_) | Instance::Tuple(_) => {
                value.to_plain().map(drop)
            }
            _ => Ok(()),
        }
    }

    fn check_deserialize_type(&self, raw: &Value) -> TypeCheck {
        let matches = match (self.primitive, raw) {
            (Primitive::Int, Value::Number(n)) => n.is_i64() || n.is_u64(),
            (Primitive::Float, Value::Number(n)) => n.is_f64(),
            (Primitive::Str, Value::String(_))
            | (Primitive::Bool, Value::Bool(_))
            | (Primitive::None, Value::Null)
            | (Primitive::Dict, Value::Object(_))
            | (Primitive::List | Primitive::Tuple, Value::Array(_)) => true,
            _ => false,
        };
        if matches {
            Ok(())
        } else {
            Err(self.expected())
        }
    }

    fn check_deserialize_format(&self, raw: &Value) -> FormatCheck {
        match raw {
            Value::Number(n) if self.primitive == Primitive::Int && n.as_i64().is_none() => {
                Err(format!("integer {n} does not fit in 64 signed bits"))
            }
            _ => Ok(()),
        }
    }

    fn convert_serialize(&self, value: &Instance) -> Result<Value> {
        value
            .to_plain()
            .map_err(|message| SerializerError::format(Direction::Serialization, &self.breadcrumb, message))
    }

    fn convert_deserialize(&self, raw: &Value) -> Result<Instance> {
        Ok(match (self.primitive, Instance::from_plain(raw)) {
            (Primitive::Tuple, Instance::List(items)) => Instance::Tuple(items),
            (_, instance) => instance,
        })
    }
}
