//! # Extension Types — `datetime` and `uuid`
//!
//! Serializer factories for two named types that schema documents may use
//! in field types:
//!
//! | Name | Runtime value | Plain form |
//! |---|---|---|
//! | `datetime` | `chrono::DateTime<Utc>` | RFC 3339 string, `Z` suffix on output; any offset accepted on input |
//! | `uuid` | `uuid::Uuid` | hyphenated lowercase string |

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use typeser_core::{
    Breadcrumb, BuildContext, Direction, ExpectedTypes, FormatCheck, Instance, Registry, Result,
    SerializerError, SerializerFactory, SerializerNode, TypeCheck, TypeDesc,
};
use uuid::Uuid;

/// A registry with the built-ins plus every extension in this module.
pub fn registry() -> Registry {
    Registry::builder()
        .register(DateTimeFactory)
        .register(UuidFactory)
        .build()
}

fn is_named(desc: &TypeDesc, expected: &str) -> bool {
    matches!(desc, TypeDesc::Named { name, args } if name == expected && args.is_empty())
}

fn expect_string(raw: &Value) -> TypeCheck {
    if raw.is_string() {
        Ok(())
    } else {
        Err(ExpectedTypes::one("str"))
    }
}

/// Factory for the `datetime` named type.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateTimeFactory;

impl SerializerFactory for DateTimeFactory {
    fn name(&self) -> &str {
        "datetime"
    }

    fn test(&self, desc: &TypeDesc) -> bool {
        is_named(desc, "datetime")
    }

    fn construct(&self, _desc: &TypeDesc, ctx: &BuildContext<'_>) -> Result<Box<dyn SerializerNode>> {
        Ok(Box::new(DateTimeSerializer {
            breadcrumb: ctx.breadcrumb("datetime"),
        }))
    }
}

#[derive(Debug)]
struct DateTimeSerializer {
    breadcrumb: Breadcrumb,
}

impl DateTimeSerializer {
    fn parse(text: &str) -> std::result::Result<DateTime<Utc>, String> {
        DateTime::parse_from_rfc3339(text)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(|e| format!("invalid RFC 3339 timestamp '{text}': {e}"))
    }
}

impl SerializerNode for DateTimeSerializer {
    fn breadcrumb(&self) -> &Breadcrumb {
        &self.breadcrumb
    }

    fn check_serialize_type(&self, value: &Instance) -> TypeCheck {
        match value.downcast_ref::<DateTime<Utc>>() {
            Some(_) => Ok(()),
            None => Err(ExpectedTypes::one("datetime")),
        }
    }

    fn check_deserialize_type(&self, raw: &Value) -> TypeCheck {
        expect_string(raw)
    }

    fn check_deserialize_format(&self, raw: &Value) -> FormatCheck {
        raw.as_str().map_or(Ok(()), |text| Self::parse(text).map(drop))
    }

    fn convert_serialize(&self, value: &Instance) -> Result<Value> {
        let ts = value.downcast_ref::<DateTime<Utc>>().ok_or_else(|| {
            SerializerError::type_mismatch(
                Direction::Serialization,
                &self.breadcrumb,
                ExpectedTypes::one("datetime"),
                value.kind_name(),
            )
        })?;
        Ok(Value::String(ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)))
    }

    fn convert_deserialize(&self, raw: &Value) -> Result<Instance> {
        Self::parse(raw.as_str().unwrap_or_default())
            .map(Instance::custom)
            .map_err(|message| SerializerError::format(Direction::Deserialization, &self.breadcrumb, message))
    }
}

/// Factory for the `uuid` named type.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidFactory;

impl SerializerFactory for UuidFactory {
    fn name(&self) -> &str {
        "uuid"
    }

    fn test(&self, desc: &TypeDesc) -> bool {
        is_named(desc, "uuid")
    }

    fn construct(&self, _desc: &TypeDesc, ctx: &BuildContext<'_>) -> Result<Box<dyn SerializerNode>> {
        Ok(Box::new(UuidSerializer {
            breadcrumb: ctx.breadcrumb("uuid"),
        }))
    }
}

#[derive(Debug)]
struct UuidSerializer {
    breadcrumb: Breadcrumb,
}

impl SerializerNode for UuidSerializer {
    fn breadcrumb(&self) -> &Breadcrumb {
        &self.breadcrumb
    }

    fn check_serialize_type(&self, value: &Instance) -> TypeCheck {
        match value.downcast_ref::<Uuid>() {
            Some(_) => Ok(()),
            None => Err(ExpectedTypes::one("uuid")),
        }
    }

    fn check_deserialize_type(&self, raw: &Value) -> TypeCheck {
        expect_string(raw)
    }

    fn check_deserialize_format(&self, raw: &Value) -> FormatCheck {
        match raw.as_str().map(Uuid::parse_str) {
            Some(Err(e)) => Err(format!("invalid UUID: {e}")),
            _ => Ok(()),
        }
    }

    fn convert_serialize(&self, value: &Instance) -> Result<Value> {
        let id = value.downcast_ref::<Uuid>().ok_or_else(|| {
            SerializerError::type_mismatch(
                Direction::Serialization,
                &self.breadcrumb,
                ExpectedTypes::one("uuid"),
                value.kind_name(),
            )
        })?;
        Ok(Value::String(id.hyphenated().to_string()))
    }

    fn convert_deserialize(&self, raw: &Value) -> Result<Instance> {
        Uuid::parse_str(raw.as_str().unwrap_or_default())
            .map(Instance::custom)
            .map_err(|e| {
                SerializerError::format(
                    Direction::Deserialization,
                    &self.breadcrumb,
                    format!("invalid UUID: {e}"),
                )
            })
    }
}
