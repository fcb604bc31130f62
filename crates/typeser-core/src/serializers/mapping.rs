//! `Dict[K, V]`: typed keys and values.
//!
//! JSON object keys are text. On serialization each key must serialize to
//! a JSON scalar, which is stringified. On deserialization each key is
//! read both as a string and, when the text parses as one, as a JSON scalar
//! (`"1"` → `1`, `"true"` → `true`). The key node picks between the two
//! with [`SerializerNode::select_key_form`]: a plain node takes the string
//! if it accepts strings, and a union asks its arms in declared order.
//! Keys remain lossy where an earlier union arm claims a string that a
//! later arm produced, e.g. `Str("1")` under `Union[int, str]`.

use serde_json::{Map, Value};

use crate::breadcrumb::{Breadcrumb, Segment};
use crate::descriptor::TypeDesc;
use crate::error::{Direction, ExpectedTypes, Result, SerializerError};
use crate::node::{SerializerNode, TypeCheck};
use crate::registry::{BuildContext, SerializerFactory};
use crate::value::{plain_kind, scalar_key, Instance};

#[derive(Debug, Clone, Copy, Default)]
pub struct MappingFactory;

impl SerializerFactory for MappingFactory {
    fn name(&self) -> &str {
        "mapping"
    }

    fn test(&self, desc: &TypeDesc) -> bool {
        matches!(desc, TypeDesc::Mapping(..))
    }

    fn construct(&self, desc: &TypeDesc, ctx: &BuildContext<'_>) -> Result<Box<dyn SerializerNode>> {
        let TypeDesc::Mapping(key, value) = desc else {
            return Err(ctx.unsupported(desc));
        };
        let breadcrumb = ctx.breadcrumb("mapping");
        let key = ctx.child(&breadcrumb, Segment::Key, key)?;
        let value = ctx.child(&breadcrumb, Segment::Value, value)?;
        Ok(Box::new(MappingSerializer {
            breadcrumb,
            key,
            value,
        }))
    }
}

#[derive(Debug)]
struct MappingSerializer {
    breadcrumb: Breadcrumb,
    key: Box<dyn SerializerNode>,
    value: Box<dyn SerializerNode>,
}

impl MappingSerializer {
    fn deserialize_key(&self, text: &str) -> Result<Instance> {
        let mut forms = vec![Value::String(text.to_string())];
        if let Ok(scalar) = serde_json::from_str::<Value>(text) {
            if scalar.is_number() || scalar.is_boolean() || scalar.is_null() {
                forms.push(scalar);
            }
        }
        // Without a match, report the rejection of the key as it appeared in the input.
        let chosen = self.key.select_key_form(&forms).unwrap_or(0);
        self.key.deserialize(&forms[chosen])
    }
}

impl SerializerNode for MappingSerializer {
    fn breadcrumb(&self) -> &Breadcrumb {
        &self.breadcrumb
    }

    fn check_serialize_type(&self, value: &Instance) -> TypeCheck {
        match value {
            Instance::Map(_) => Ok(()),
            _ => Err(ExpectedTypes::one("dict")),
        }
    }

    fn check_deserialize_type(&self, raw: &Value) -> TypeCheck {
        match raw {
            Value::Object(_) => Ok(()),
            _ => Err(ExpectedTypes::one("dict")),
        }
    }

    fn convert_serialize(&self, value: &Instance) -> Result<Value> {
        let Instance::Map(entries) = value else {
            return Err(SerializerError::type_mismatch(
                Direction::Serialization,
                &self.breadcrumb,
                ExpectedTypes::one("dict"),
                value.kind_name(),
            ));
        };

        let mut out = Map::new();
        for (key, item) in entries {
            let key_plain = self.key.serialize(key)?;
            let Some(key_text) = scalar_key(&key_plain) else {
                return Err(SerializerError::format(
                    Direction::Serialization,
                    &self.breadcrumb,
                    format!(
                        "mapping key must serialize to a JSON scalar, got {}",
                        plain_kind(&key_plain)
                    ),
                ));
            };
            if out.contains_key(&key_text) {
                return Err(SerializerError::format(
                    Direction::Serialization,
                    &self.breadcrumb,
                    format!("duplicate mapping key '{key_text}'"),
                ));
            }
            let item_plain = self.value.serialize(item)?;
            out.insert(key_text, item_plain);
        }
        Ok(Value::Object(out))
    }

    fn convert_deserialize(&self, raw: &Value) -> Result<Instance> {
        let Value::Object(map) = raw else {
            return Err(SerializerError::type_mismatch(
                Direction::Deserialization,
                &self.breadcrumb,
                ExpectedTypes::one("dict"),
                plain_kind(raw),
            ));
        };

        let mut entries = Vec::with_capacity(map.len());
        for (key, item) in map {
            let key = self.deserialize_key(key)?;
            let item = self.value.deserialize(item)?;
            entries.push((key, item));
        }
        Ok(Instance::Map(entries))
    }

    fn children(&self) -> Vec<&dyn SerializerNode> {
        vec![&*self.key, &*self.value]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;
    use serde_json::json;

    fn create(key: TypeDesc, value: TypeDesc) -> crate::Serializer {
        Registry::new().create(&TypeDesc::mapping(key, value)).unwrap()
    }

    #[test]
    fn test_string_keys_round_trip() {
        let s = create(TypeDesc::str(), TypeDesc::int());
        let instance = Instance::Map(vec![
            (Instance::from("b"), Instance::Int(2)),
            (Instance::from("a"), Instance::Int(1)),
        ]);
        let plain = s.serialize(&instance).unwrap();
        assert_eq!(serde_json::to_string(&plain).unwrap(), r#"{"b":2,"a":1}"#);
        assert_eq!(s.deserialize(&plain).unwrap(), instance);
    }

    #[test]
    fn test_int_keys_are_stringified_and_recovered() {
        let s = create(TypeDesc::int(), TypeDesc::str());
        let instance = Instance::Map(vec![(Instance::Int(10), Instance::from("ten"))]);
        let plain = s.serialize(&instance).unwrap();
        assert_eq!(plain, json!({"10": "ten"}));
        assert_eq!(s.deserialize(&plain).unwrap(), instance);
    }

    #[test]
    fn test_unparseable_key_reports_key_breadcrumb() {
        let s = create(TypeDesc::int(), TypeDesc::str());
        let err = s.deserialize(&json!({"ten": "x"})).unwrap_err();
        assert!(err.is_type_error());
        assert_eq!(err.breadcrumb().to_string(), "mapping[key]->int");
    }

    #[test]
    fn test_value_error_reports_value_breadcrumb() {
        let s = create(TypeDesc::str(), TypeDesc::int());
        let err = s.deserialize(&json!({"a": 1, "b": "2"})).unwrap_err();
        assert!(err.is_type_error());
        assert_eq!(err.breadcrumb().to_string(), "mapping[value]->int");
    }

    #[test]
    fn test_non_mapping_rejected() {
        let s = create(TypeDesc::str(), TypeDesc::int());
        let err = s.serialize(&Instance::List(vec![])).unwrap_err();
        match err {
            SerializerError::Type { expected, observed, .. } => {
                assert_eq!(expected, ExpectedTypes::one("dict"));
                assert_eq!(observed, "list");
            }
            other => panic!("expected type error, got {other:?}"),
        }
    }

    #[test]
    fn test_non_scalar_key_is_format_error() {
        let s = create(TypeDesc::sequence(TypeDesc::int()), TypeDesc::int());
        let instance = Instance::Map(vec![(Instance::List(vec![]), Instance::Int(1))]);
        let err = s.serialize(&instance).unwrap_err();
        assert!(err.is_format_error());
        assert_eq!(err.breadcrumb().to_string(), "mapping");
    }

    #[test]
    fn test_duplicate_key_is_format_error() {
        let s = create(TypeDesc::str(), TypeDesc::int());
        let instance = Instance::Map(vec![
            (Instance::from("a"), Instance::Int(1)),
            (Instance::from("a"), Instance::Int(2)),
        ]);
        assert!(s.serialize(&instance).unwrap_err().is_format_error());
    }

    #[test]
    fn test_union_keys_follow_arm_order() {
        let s = create(TypeDesc::union([TypeDesc::int(), TypeDesc::str()]), TypeDesc::int());
        let instance = Instance::Map(vec![
            (Instance::Int(1), Instance::Int(2)),
            (Instance::from("x"), Instance::Int(3)),
        ]);
        let plain = s.serialize(&instance).unwrap();
        assert_eq!(plain, json!({"1": 2, "x": 3}));
        assert_eq!(s.deserialize(&plain).unwrap(), instance);

        let s = create(TypeDesc::union([TypeDesc::str(), TypeDesc::int()]), TypeDesc::int());
        let back = s.deserialize(&json!({"1": 2})).unwrap();
        assert_eq!(back, Instance::Map(vec![(Instance::from("1"), Instance::Int(2))]));
    }

    #[test]
    fn test_optional_int_key_reads_null() {
        let s = create(TypeDesc::optional(TypeDesc::int()), TypeDesc::str());
        let back = s.deserialize(&json!({"null": "none", "4": "four"})).unwrap();
        assert_eq!(
            back,
            Instance::Map(vec![
                (Instance::None, Instance::from("none")),
                (Instance::Int(4), Instance::from("four")),
            ])
        );
    }
}
