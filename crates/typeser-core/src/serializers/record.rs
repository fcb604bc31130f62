//! Records serialize as JSON objects keyed by field name.
//!
//! ## Serialization
//!
//! The instance must be a [`Record`] of the declared type carrying only
//! declared fields. Absent fields with a default are filled in; absent
//! required fields are a format error. Output keys follow declaration
//! order.
//!
//! ## Deserialization
//!
//! Every required field must be present; the first missing one in
//! declaration order is reported. Absent defaulted fields take their
//! default. Keys that are not declared fields are ignored.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::breadcrumb::{Breadcrumb, Segment};
use crate::descriptor::{FieldDesc, RecordDesc, TypeDesc};
use crate::error::{Direction, ExpectedTypes, Result, SerializerError};
use crate::node::{FormatCheck, SerializerNode, TypeCheck};
use crate::registry::{BuildContext, SerializerFactory};
use crate::value::{plain_kind, Instance, Record};

#[derive(Debug, Clone, Copy, Default)]
pub struct RecordFactory;

impl SerializerFactory for RecordFactory {
    fn name(&self) -> &str {
        "record"
    }

    fn test(&self, desc: &TypeDesc) -> bool {
        matches!(desc, TypeDesc::Record(_))
    }

    fn construct(&self, desc: &TypeDesc, ctx: &BuildContext<'_>) -> Result<Box<dyn SerializerNode>> {
        let TypeDesc::Record(record) = desc else {
            return Err(ctx.unsupported(desc));
        };
        let type_name = format!("record.{}", record.name);
        let breadcrumb = ctx.breadcrumb(type_name.clone());
        let fields = record
            .fields
            .iter()
            .map(|field| {
                let node = ctx.child(
                    &breadcrumb,
                    Segment::Field(field.name.clone()),
                    &field.effective_type(),
                )?;
                Ok(FieldSlot {
                    desc: field.clone(),
                    node,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Box::new(RecordSerializer {
            breadcrumb,
            type_name,
            record: Arc::clone(record),
            fields,
        }))
    }
}

#[derive(Debug)]
struct FieldSlot {
    desc: FieldDesc,
    node: Box<dyn SerializerNode>,
}

#[derive(Debug)]
struct RecordSerializer {
    breadcrumb: Breadcrumb,
    type_name: String,
    record: Arc<RecordDesc>,
    fields: Vec<FieldSlot>,
}

impl RecordSerializer {
    fn type_error(&self, direction: Direction, observed: impl Into<String>) -> SerializerError {
        let expected = match direction {
            Direction::Serialization => ExpectedTypes::one(self.type_name.clone()),
            Direction::Deserialization => ExpectedTypes::one("dict"),
        };
        SerializerError::type_mismatch(direction, &self.breadcrumb, expected, observed)
    }
}

impl SerializerNode for RecordSerializer {
    fn breadcrumb(&self) -> &Breadcrumb {
        &self.breadcrumb
    }

    fn check_serialize_type(&self, value: &Instance) -> TypeCheck {
        match value {
            Instance::Record(record) if record.type_name == self.record.name => Ok(()),
            _ => Err(ExpectedTypes::one(self.type_name.clone())),
        }
    }

    fn check_serialize_format(&self, value: &Instance) -> FormatCheck {
        let Instance::Record(record) = value else {
            return Ok(());
        };
        if let Some((name, _)) = record
            .fields
            .iter()
            .find(|(name, _)| self.record.field(name).is_none())
        {
            return Err(format!("unknown field '{name}' for {}", self.type_name));
        }
        match self
            .fields
            .iter()
            .find(|slot| !slot.desc.has_default() && record.get(&slot.desc.name).is_none())
        {
            Some(slot) => Err(format!("missing required field '{}'", slot.desc.name)),
            None => Ok(()),
        }
    }

    fn check_deserialize_type(&self, raw: &Value) -> TypeCheck {
        match raw {
            Value::Object(_) => Ok(()),
            _ => Err(ExpectedTypes::one("dict")),
        }
    }

    fn check_deserialize_format(&self, raw: &Value) -> FormatCheck {
        let Value::Object(map) = raw else {
            return Ok(());
        };
        match self
            .fields
            .iter()
            .find(|slot| !slot.desc.has_default() && !map.contains_key(&slot.desc.name))
        {
            Some(slot) => Err(format!("missing required key '{}'", slot.desc.name)),
            None => Ok(()),
        }
    }

    fn convert_serialize(&self, value: &Instance) -> Result<Value> {
        let Instance::Record(record) = value else {
            return Err(self.type_error(Direction::Serialization, value.kind_name()));
        };

        let mut out = Map::new();
        for slot in &self.fields {
            let name = &slot.desc.name;
            let field_value = match (record.get(name), &slot.desc.default) {
                (Some(v), _) | (None, Some(v)) => v,
                (None, None) => {
                    return Err(SerializerError::format(
                        Direction::Serialization,
                        &self.breadcrumb,
                        format!("missing required field '{name}'"),
                    ))
                }
            };
            out.insert(name.clone(), slot.node.serialize(field_value)?);
        }
        Ok(Value::Object(out))
    }

    fn convert_deserialize(&self, raw: &Value) -> Result<Instance> {
        let Value::Object(map) = raw else {
            return Err(self.type_error(Direction::Deserialization, plain_kind(raw)));
        };

        let mut record = Record::new(self.record.name.clone());
        for slot in &self.fields {
            let name = &slot.desc.name;
            let field_value = match (map.get(name), &slot.desc.default) {
                (Some(item), _) => slot.node.deserialize(item)?,
                (None, Some(default)) => default.clone(),
                (None, None) => {
                    return Err(SerializerError::format(
                        Direction::Deserialization,
                        &self.breadcrumb,
                        format!("missing required key '{name}'"),
                    ))
                }
            };
            record.fields.push((name.clone(), field_value));
        }
        Ok(Instance::Record(record))
    }

    fn children(&self) -> Vec<&dyn SerializerNode> {
        self.fields.iter().map(|slot| &*slot.node).collect()
    }
}
