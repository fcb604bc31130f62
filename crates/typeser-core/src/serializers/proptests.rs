use proptest::prelude::*;
use serde_json::Value;

use crate::descriptor::{EnumDesc, RecordDesc, TypeDesc};
use crate::error::{Direction, ExpectedTypes, SerializerError};
use crate::registry::Registry;
use crate::value::{Instance, Record};

/// JSON values without floats, so equality is exact.
fn plain_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| serde_json::json!(n)),
        "[a-zA-Z0-9_ ]{0,20}".prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,8}", inner, 0..6)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

fn user_desc() -> TypeDesc {
    TypeDesc::Record(
        RecordDesc::builder("User")
            .field("id", TypeDesc::int())
            .field("name", TypeDesc::str())
            .field_with_default("tag", TypeDesc::str(), Instance::None)
            .field_with_default("scores", TypeDesc::sequence(TypeDesc::float()), Instance::List(vec![]))
            .build(),
    )
}

/// Descriptors paired with the instance kinds they accept.
fn target_desc() -> impl Strategy<Value = (TypeDesc, Vec<&'static str>)> {
    let cases = vec![
        (TypeDesc::int(), vec!["int"]),
        (TypeDesc::float(), vec!["float"]),
        (TypeDesc::str(), vec!["str"]),
        (TypeDesc::bool(), vec!["bool"]),
        (TypeDesc::none(), vec!["None"]),
        (TypeDesc::sequence(TypeDesc::int()), vec!["list", "tuple"]),
        (TypeDesc::mapping(TypeDesc::str(), TypeDesc::int()), vec!["dict"]),
        (TypeDesc::Enum(EnumDesc::new("Level", ["LOW", "HIGH"])), vec!["enum.Level"]),
        (user_desc(), vec!["record.User"]),
        (TypeDesc::optional(TypeDesc::int()), vec!["int", "None"]),
    ];
    prop::sample::select(cases)
}

fn sample_instance() -> impl Strategy<Value = Instance> {
    prop_oneof![
        Just(Instance::None),
        any::<bool>().prop_map(Instance::Bool),
        any::<i64>().prop_map(Instance::Int),
        (-1.0e6f64..1.0e6).prop_map(Instance::Float),
        "[a-z]{0,8}".prop_map(Instance::Str),
        prop::collection::vec(any::<i64>().prop_map(Instance::Int), 0..3).prop_map(Instance::List),
        Just(Instance::Map(Vec::new())),
        Just(Instance::member("Level", "LOW")),
        Just(Instance::member("Color", "RED")),
        Just(Instance::Record(Record::new("Group"))),
    ]
}

proptest! {
    /// `Any` hands plain values back unchanged.
    #[test]
    fn any_round_trips_plain_json(value in plain_json()) {
        let s = Registry::new().create(&TypeDesc::Any).unwrap();
        let instance = s.deserialize(&value).unwrap();
        prop_assert_eq!(s.serialize(&instance).unwrap(), value);
    }

    /// Fully populated records survive a text round trip whatever order
    /// their fields were assigned in.
    #[test]
    fn record_round_trip(
        fields in (
            any::<i64>(),
            "[a-z]{0,12}",
            proptest::option::of("[a-z]{1,6}"),
            prop::collection::vec(prop::num::f64::NORMAL | prop::num::f64::ZERO, 0..5),
        )
            .prop_map(|(id, name, tag, scores)| {
                vec![
                    ("id", Instance::Int(id)),
                    ("name", Instance::Str(name)),
                    ("tag", Instance::from(tag)),
                    ("scores", Instance::List(scores.into_iter().map(Instance::Float).collect())),
                ]
            })
            .prop_shuffle(),
    ) {
        let s = Registry::new().create(&user_desc()).unwrap();
        let record = fields
            .into_iter()
            .fold(Record::new("User"), |record, (name, value)| record.with(name, value));
        let instance = Instance::Record(record);
        let text = s.serialize_to_text(&instance).unwrap();
        prop_assert_eq!(s.deserialize_from_text(&text).unwrap(), instance);
    }

    /// A value whose runtime type the descriptor does not accept is a type
    /// error naming the accepted types and the observed one.
    #[test]
    fn serialize_rejects_unaccepted_kinds(
        (desc, accepted) in target_desc(),
        instance in sample_instance(),
    ) {
        let observed = instance.kind_name();
        prop_assume!(!accepted.contains(&observed.as_str()));
        let s = Registry::new().create(&desc).unwrap();
        match s.serialize(&instance).unwrap_err() {
            SerializerError::Type { direction, expected, observed: reported, .. } => {
                prop_assert_eq!(direction, Direction::Serialization);
                prop_assert_eq!(expected, ExpectedTypes::many(accepted.iter().copied()));
                prop_assert_eq!(reported, observed);
            }
            other => prop_assert!(false, "expected type error, got {:?}", other),
        }
    }

    /// Integer keys are stringified on the way out and recovered on the way in.
    #[test]
    fn int_keyed_mapping_round_trip(
        entries in prop::collection::btree_map(any::<i64>(), prop::collection::vec("[a-z]{0,4}", 0..4), 0..8)
    ) {
        let desc = TypeDesc::mapping(TypeDesc::int(), TypeDesc::sequence(TypeDesc::str()));
        let s = Registry::new().create(&desc).unwrap();
        let instance = Instance::Map(
            entries
                .into_iter()
                .map(|(k, v)| (Instance::Int(k), Instance::List(v.into_iter().map(Instance::from).collect())))
                .collect(),
        );
        let plain = s.serialize(&instance).unwrap();
        prop_assert_eq!(s.deserialize(&plain).unwrap(), instance);
    }

    /// Any array whose length differs from the arity is a format error.
    #[test]
    fn tuple_arity_mismatch_is_format_error(items in prop::collection::vec(any::<i64>(), 0..8)) {
        prop_assume!(items.len() != 3);
        let desc = TypeDesc::tuple([TypeDesc::int(), TypeDesc::int(), TypeDesc::int()]);
        let s = Registry::new().create(&desc).unwrap();
        let err = s.deserialize(&serde_json::json!(items)).unwrap_err();
        prop_assert!(err.is_format_error());
        let expected = format!("got {}", items.len());
        prop_assert!(err.to_string().contains(&expected));
    }

    /// Strings outside the member list never deserialize as an enum.
    #[test]
    fn enum_rejects_undeclared_names(name in "[a-z]{1,10}") {
        let desc = TypeDesc::Enum(EnumDesc::new("Level", ["LOW", "HIGH"]));
        let s = Registry::new().create(&desc).unwrap();
        let err = s.deserialize(&Value::String(name)).unwrap_err();
        prop_assert!(err.is_format_error());
    }

    /// `Optional[int]` round-trips both arms.
    #[test]
    fn optional_int_round_trip(value in proptest::option::of(any::<i64>())) {
        let s = Registry::new().create(&TypeDesc::optional(TypeDesc::int())).unwrap();
        let instance = Instance::from(value);
        let plain = s.serialize(&instance).unwrap();
        prop_assert_eq!(s.deserialize(&plain).unwrap(), instance);
    }
}
