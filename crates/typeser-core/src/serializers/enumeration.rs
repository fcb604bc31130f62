//! Enumerations serialize as their member name.

use std::sync::Arc;

use serde_json::Value;

use crate::breadcrumb::Breadcrumb;
use crate::descriptor::{EnumDesc, TypeDesc};
use crate::error::{Direction, ExpectedTypes, Result, SerializerError};
use crate::node::{FormatCheck, SerializerNode, TypeCheck};
use crate::registry::{BuildContext, SerializerFactory};
use crate::value::{plain_kind, Instance};

#[derive(Debug, Clone, Copy, Default)]
pub struct EnumFactory;

impl SerializerFactory for EnumFactory {
    fn name(&self) -> &str {
        "enum"
    }

    fn test(&self, desc: &TypeDesc) -> bool {
        matches!(desc, TypeDesc::Enum(_))
    }

    fn construct(&self, desc: &TypeDesc, ctx: &BuildContext<'_>) -> Result<Box<dyn SerializerNode>> {
        let TypeDesc::Enum(enum_desc) = desc else {
            return Err(ctx.unsupported(desc));
        };
        let type_name = format!("enum.{}", enum_desc.name);
        Ok(Box::new(EnumSerializer {
            breadcrumb: ctx.breadcrumb(type_name.clone()),
            type_name,
            desc: Arc::clone(enum_desc),
        }))
    }
}

#[derive(Debug)]
struct EnumSerializer {
    breadcrumb: Breadcrumb,
    type_name: String,
    desc: Arc<EnumDesc>,
}

impl EnumSerializer {
    fn check_member(&self, name: &str) -> FormatCheck {
        if self.desc.contains(name) {
            Ok(())
        } else {
            Err(format!(
                "invalid enum member '{name}', allowed members: [{}]",
                self.desc.members.join(", ")
            ))
        }
    }
}

impl SerializerNode for EnumSerializer {
    fn breadcrumb(&self) -> &Breadcrumb {
        &self.breadcrumb
    }

    fn check_serialize_type(&self, value: &Instance) -> TypeCheck {
        match value {
            Instance::Enum(member) if member.enum_name == self.desc.name => Ok(()),
            _ => Err(ExpectedTypes::one(self.type_name.clone())),
        }
    }

    fn check_serialize_format(&self, value: &Instance) -> FormatCheck {
        match value {
            Instance::Enum(member) => self.check_member(&member.name),
            _ => Ok(()),
        }
    }

    fn check_deserialize_type(&self, raw: &Value) -> TypeCheck {
        match raw {
            Value::String(_) => Ok(()),
            _ => Err(ExpectedTypes::one("str")),
        }
    }

    fn check_deserialize_format(&self, raw: &Value) -> FormatCheck {
        match raw {
            Value::String(name) => self.check_member(name),
            _ => Ok(()),
        }
    }

    fn convert_serialize(&self, value: &Instance) -> Result<Value> {
        match value {
            Instance::Enum(member) => Ok(Value::String(member.name.clone())),
            _ => Err(SerializerError::type_mismatch(
                Direction::Serialization,
                &self.breadcrumb,
                ExpectedTypes::one(self.type_name.clone()),
                value.kind_name(),
            )),
        }
    }

    fn convert_deserialize(&self, raw: &Value) -> Result<Instance> {
        raw.as_str()
            .and_then(|name| self.desc.member(name))
            .ok_or_else(|| {
                SerializerError::type_mismatch(
                    Direction::Deserialization,
                    &self.breadcrumb,
                    ExpectedTypes::one("str"),
                    plain_kind(raw),
                )
            })
    }
}
