//! `Tuple[T0, T1, ...]`: fixed-arity heterogeneous sequences.

use serde_json::Value;

use crate::breadcrumb::{Breadcrumb, Segment};
use crate::descriptor::TypeDesc;
use crate::error::{Direction, ExpectedTypes, Result, SerializerError};
use crate::node::{FormatCheck, SerializerNode, TypeCheck};
use crate::registry::{BuildContext, SerializerFactory};
use crate::value::{plain_kind, Instance};

#[derive(Debug, Clone, Copy, Default)]
pub struct TupleFactory;

impl SerializerFactory for TupleFactory {
    fn name(&self) -> &str {
        "tuple"
    }

    fn test(&self, desc: &TypeDesc) -> bool {
        matches!(desc, TypeDesc::Tuple(_))
    }

    fn construct(&self, desc: &TypeDesc, ctx: &BuildContext<'_>) -> Result<Box<dyn SerializerNode>> {
        let TypeDesc::Tuple(elements) = desc else {
            return Err(ctx.unsupported(desc));
        };
        let breadcrumb = ctx.breadcrumb("tuple");
        let elements = elements
            .iter()
            .enumerate()
            .map(|(i, element)| ctx.child(&breadcrumb, Segment::Index(i), element))
            .collect::<Result<Vec<_>>>()?;
        Ok(Box::new(TupleSerializer {
            breadcrumb,
            elements,
        }))
    }
}

#[derive(Debug)]
struct TupleSerializer {
    breadcrumb: Breadcrumb,
    elements: Vec<Box<dyn SerializerNode>>,
}

impl TupleSerializer {
    fn check_arity(&self, len: usize) -> FormatCheck {
        if len == self.elements.len() {
            Ok(())
        } else {
            Err(format!(
                "expected tuple of length {}, got {len}",
                self.elements.len()
            ))
        }
    }
}

impl SerializerNode for TupleSerializer {
    fn breadcrumb(&self) -> &Breadcrumb {
        &self.breadcrumb
    }

    fn check_serialize_type(&self, value: &Instance) -> TypeCheck {
        match value {
            Instance::List(_) | Instance::Tuple(_) => Ok(()),
            _ => Err(ExpectedTypes::many(["list", "tuple"])),
        }
    }

    fn check_serialize_format(&self, value: &Instance) -> FormatCheck {
        match value {
            Instance::List(items) | Instance::Tuple(items) => self.check_arity(items.len()),
            _ => Ok(()),
        }
    }

    fn check_deserialize_type(&self, raw: &Value) -> TypeCheck {
        match raw {
            Value::Array(_) => Ok(()),
            _ => Err(ExpectedTypes::one("list")),
        }
    }

    fn check_deserialize_format(&self, raw: &Value) -> FormatCheck {
        match raw {
            Value::Array(items) => self.check_arity(items.len()),
            _ => Ok(()),
        }
    }

    fn convert_serialize(&self, value: &Instance) -> Result<Value> {
        let (Instance::List(items) | Instance::Tuple(items)) = value else {
            return Err(SerializerError::type_mismatch(
                Direction::Serialization,
                &self.breadcrumb,
                ExpectedTypes::many(["list", "tuple"]),
                value.kind_name(),
            ));
        };
        self.elements
            .iter()
            .zip(items)
            .map(|(node, item)| node.serialize(item))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array)
    }

    fn convert_deserialize(&self, raw: &Value) -> Result<Instance> {
        let Value::Array(items) = raw else {
            return Err(SerializerError::type_mismatch(
                Direction::Deserialization,
                &self.breadcrumb,
                ExpectedTypes::one("list"),
                plain_kind(raw),
            ));
        };
        self.elements
            .iter()
            .zip(items)
            .map(|(node, item)| node.deserialize(item))
            .collect::<Result<Vec<_>>>()
            .map(Instance::Tuple)
    }

    fn children(&self) -> Vec<&dyn SerializerNode> {
        self.elements.iter().map(|e| &**e).collect()
    }
}
