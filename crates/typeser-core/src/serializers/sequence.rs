//! `List[T]`: homogeneous sequences.

use serde_json::Value;

use crate::breadcrumb::{Breadcrumb, Segment};
use crate::descriptor::TypeDesc;
use crate::error::{Direction, ExpectedTypes, Result, SerializerError};
use crate::node::{SerializerNode, TypeCheck};
use crate::registry::{BuildContext, SerializerFactory};
use crate::value::{plain_kind, Instance};

#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceFactory;

impl SerializerFactory for SequenceFactory {
    fn name(&self) -> &str {
        "sequence"
    }

    fn test(&self, desc: &TypeDesc) -> bool {
        matches!(desc, TypeDesc::Sequence(_))
    }

    fn construct(&self, desc: &TypeDesc, ctx: &BuildContext<'_>) -> Result<Box<dyn SerializerNode>> {
        let TypeDesc::Sequence(element) = desc else {
            return Err(ctx.unsupported(desc));
        };
        let breadcrumb = ctx.breadcrumb("sequence");
        let element = ctx.child(&breadcrumb, Segment::Element, element)?;
        Ok(Box::new(SequenceSerializer {
            breadcrumb,
            element,
        }))
    }
}

#[derive(Debug)]
struct SequenceSerializer {
    breadcrumb: Breadcrumb,
    element: Box<dyn SerializerNode>,
}

impl SerializerNode for SequenceSerializer {
    fn breadcrumb(&self) -> &Breadcrumb {
        &self.breadcrumb
    }

    fn check_serialize_type(&self, value: &Instance) -> TypeCheck {
        match value {
            Instance::List(_) | Instance::Tuple(_) => Ok(()),
            _ => Err(ExpectedTypes::many(["list", "tuple"])),
        }
    }

    fn check_deserialize_type(&self, raw: &Value) -> TypeCheck {
        match raw {
            Value::Array(_) => Ok(()),
            _ => Err(ExpectedTypes::one("list")),
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
        items
            .iter()
            .map(|item| self.element.serialize(item))
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
        items
            .iter()
            .map(|item| self.element.deserialize(item))
            .collect::<Result<Vec<_>>>()
            .map(Instance::List)
    }

    fn children(&self) -> Vec<&dyn SerializerNode> {
        vec![&*self.element]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;
    use serde_json::json;

    fn ints() -> crate::Serializer {
        Registry::new().create(&TypeDesc::sequence(TypeDesc::int())).unwrap()
    }

    #[test]
    fn test_list_and_tuple_serialize_to_array() {
        let s = ints();
        let list = Instance::List(vec![Instance::Int(1), Instance::Int(2)]);
        let tuple = Instance::Tuple(vec![Instance::Int(3)]);
        assert_eq!(s.serialize(&list).unwrap(), json!([1, 2]));
        assert_eq!(s.serialize(&tuple).unwrap(), json!([3]));
        assert_eq!(s.deserialize(&json!([1, 2])).unwrap(), list);
    }

    #[test]
    fn test_empty_sequence() {
        let s = ints();
        assert_eq!(s.serialize(&Instance::List(vec![])).unwrap(), json!([]));
        assert_eq!(s.deserialize(&json!([])).unwrap(), Instance::List(vec![]));
    }

    #[test]
    fn test_element_error_breadcrumb() {
        let err = ints().deserialize(&json!([1, "two", 3])).unwrap_err();
        assert!(err.is_type_error());
        assert_eq!(err.breadcrumb().to_string(), "sequence[]->int");
    }

    #[test]
    fn test_expected_types_on_mismatch() {
        match ints().serialize(&Instance::from("abc")).unwrap_err() {
            SerializerError::Type { expected, observed, .. } => {
                assert_eq!(expected, ExpectedTypes::many(["list", "tuple"]));
                assert_eq!(observed, "str");
            }
            other => panic!("expected type error, got {other:?}"),
        }
        match ints().deserialize(&json!({"a": 1})).unwrap_err() {
            SerializerError::Type { expected, observed, .. } => {
                assert_eq!(expected, ExpectedTypes::one("list"));
                assert_eq!(observed, "dict");
            }
            other => panic!("expected type error, got {other:?}"),
        }
    }
}
