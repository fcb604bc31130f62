//! `Union[T0, T1, ...]`: the first arm whose type check passes handles the value.
//!
//! Arm selection only consults type checks. Once an arm is chosen it runs
//! fully, so a format or nested error inside that arm is reported as-is
//! instead of falling through to later arms. `Optional[T]` is
//! `Union[T, None]`.

use serde_json::Value;

use crate::breadcrumb::{Breadcrumb, Segment};
use crate::descriptor::TypeDesc;
use crate::error::{Direction, ExpectedTypes, Result, SerializerError};
use crate::node::{SerializerNode, TypeCheck};
use crate::registry::{BuildContext, SerializerFactory};
use crate::value::{plain_kind, Instance};

#[derive(Debug, Clone, Copy, Default)]
pub struct UnionFactory;

impl SerializerFactory for UnionFactory {
    fn name(&self) -> &str {
        "union"
    }

    fn test(&self, desc: &TypeDesc) -> bool {
        matches!(desc, TypeDesc::Union(_))
    }

    fn construct(&self, desc: &TypeDesc, ctx: &BuildContext<'_>) -> Result<Box<dyn SerializerNode>> {
        let TypeDesc::Union(arms) = desc else {
            return Err(ctx.unsupported(desc));
        };
        let breadcrumb = ctx.breadcrumb("union");
        let arms = arms
            .iter()
            .enumerate()
            .map(|(i, arm)| ctx.child(&breadcrumb, Segment::Index(i), arm))
            .collect::<Result<Vec<_>>>()?;
        Ok(Box::new(UnionSerializer { breadcrumb, arms }))
    }
}

#[derive(Debug)]
struct UnionSerializer {
    breadcrumb: Breadcrumb,
    arms: Vec<Box<dyn SerializerNode>>,
}

impl UnionSerializer {
    /// Index of the first arm accepting the value, or every arm's expected types.
    fn select<F>(&self, check: F) -> std::result::Result<usize, ExpectedTypes>
    where
        F: Fn(&dyn SerializerNode) -> TypeCheck,
    {
        let mut expected = ExpectedTypes::default();
        for (i, arm) in self.arms.iter().enumerate() {
            match check(&**arm) {
                Ok(()) => return Ok(i),
                Err(arm_expected) => expected.extend(arm_expected),
            }
        }
        Err(expected)
    }
}

impl SerializerNode for UnionSerializer {
    fn breadcrumb(&self) -> &Breadcrumb {
        &self.breadcrumb
    }

    fn check_serialize_type(&self, value: &Instance) -> TypeCheck {
        self.select(|arm| arm.check_serialize_type(value)).map(drop)
    }

    fn check_deserialize_type(&self, raw: &Value) -> TypeCheck {
        self.select(|arm| arm.check_deserialize_type(raw)).map(drop)
    }

    fn convert_serialize(&self, value: &Instance) -> Result<Value> {
        match self.select(|arm| arm.check_serialize_type(value)) {
            Ok(i) => {
                tracing::trace!(breadcrumb = %self.breadcrumb, arm = i, "selected union arm");
                self.arms[i].serialize(value)
            }
            Err(expected) => Err(SerializerError::type_mismatch(
                Direction::Serialization,
                &self.breadcrumb,
                expected,
                value.kind_name(),
            )),
        }
    }

    fn convert_deserialize(&self, raw: &Value) -> Result<Instance> {
        match self.select(|arm| arm.check_deserialize_type(raw)) {
            Ok(i) => {
                tracing::trace!(breadcrumb = %self.breadcrumb, arm = i, "selected union arm");
                self.arms[i].deserialize(raw)
            }
            Err(expected) => Err(SerializerError::type_mismatch(
                Direction::Deserialization,
                &self.breadcrumb,
                expected,
                plain_kind(raw),
            )),
        }
    }

    fn children(&self) -> Vec<&dyn SerializerNode> {
        self.arms.iter().map(|a| &**a).collect()
    }

    /// Arm order wins over form order: `Union[int, str]` reads key `"1"` as `1`.
    fn select_key_form(&self, forms: &[Value]) -> Option<usize> {
        self.arms.iter().find_map(|arm| arm.select_key_form(forms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::EnumDesc;
    use crate::registry::Registry;
    use serde_json::json;

    fn create(desc: TypeDesc) -> crate::Serializer {
        Registry::new().create(&desc).unwrap()
    }

    #[test]
    fn test_optional() {
        let s = create(TypeDesc::optional(TypeDesc::str()));
        assert_eq!(s.serialize(&Instance::None).unwrap(), json!(null));
        assert_eq!(s.serialize(&Instance::from("x")).unwrap(), json!("x"));
        assert_eq!(s.deserialize(&json!(null)).unwrap(), Instance::None);
        assert_eq!(s.deserialize(&json!("x")).unwrap(), Instance::from("x"));
    }

    #[test]
    fn test_no_matching_arm_lists_all_expected_types() {
        let s = create(TypeDesc::union([TypeDesc::int(), TypeDesc::str()]));
        match s.deserialize(&json!(1.5)).unwrap_err() {
            SerializerError::Type {
                breadcrumb,
                expected,
                observed,
                ..
            } => {
                assert_eq!(breadcrumb.to_string(), "union");
                assert_eq!(expected, ExpectedTypes::many(["int", "str"]));
                assert_eq!(observed, "float");
            }
            other => panic!("expected type error, got {other:?}"),
        }
    }

    #[test]
    fn test_first_type_valid_arm_wins() {
        // Both arms accept a JSON string; the enum comes first.
        let color = TypeDesc::Enum(EnumDesc::new("Color", ["RED"]));
        let s = create(TypeDesc::union([color.clone(), TypeDesc::str()]));
        assert_eq!(
            s.deserialize(&json!("RED")).unwrap(),
            Instance::member("Color", "RED")
        );
        // The chosen arm reports its own format error; no fallback to `str`.
        let err = s.deserialize(&json!("BLUE")).unwrap_err();
        assert!(err.is_format_error());
        assert_eq!(err.breadcrumb().to_string(), "union[0]->enum.Color");

        let reversed = create(TypeDesc::union([TypeDesc::str(), color]));
        assert_eq!(reversed.deserialize(&json!("RED")).unwrap(), Instance::from("RED"));
    }

    #[test]
    fn test_nested_error_inside_selected_arm() {
        let s = create(TypeDesc::union([
            TypeDesc::sequence(TypeDesc::int()),
            TypeDesc::none(),
        ]));
        let err = s.deserialize(&json!([1, "x"])).unwrap_err();
        assert!(err.is_type_error());
        assert_eq!(err.breadcrumb().to_string(), "union[0]->sequence[]->int");
    }
}
