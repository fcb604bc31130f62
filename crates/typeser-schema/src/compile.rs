//! # Compilation — Documents to Type Descriptors
//!
//! Turns a [`SchemaDocument`] into [`TypeDesc`] tables:
//!
//! 1. Declared names are checked: no name may be both an enum and a record
//!    or shadow a built-in type name; enum members and record fields must
//!    be unique.
//! 2. Records are compiled depth first so a field referencing another
//!    record embeds that record's finished descriptor. Reference cycles are
//!    rejected.
//! 3. Every field type is resolved through the registry, so a type name no
//!    factory understands is reported against its field.
//! 4. Defaults are converted by the field's own serializer: an enum field's
//!    default `"member"` becomes the enum member, a `null` default becomes
//!    the absence sentinel.

use std::collections::BTreeMap;

use typeser_core::{EnumDesc, Instance, Primitive, RecordDesc, Registry, Serializer, SerializerError, TypeDesc};

use crate::document::SchemaDocument;
use crate::error::SchemaError;
use crate::expr::{self, TypeExpr};

/// Names with a fixed meaning in type expressions.
const BUILTIN_NAMES: &[&str] = &[
    "int", "float", "str", "bool", "None", "dict", "list", "tuple", "Any", "List", "Dict", "Tuple",
    "Union", "Optional",
];

/// Descriptors compiled from a schema document.
#[derive(Debug, Clone)]
pub struct CompiledSchema {
    root: Option<TypeDesc>,
    types: BTreeMap<String, TypeDesc>,
}

impl CompiledSchema {
    /// The document's root type, if it declares one.
    pub fn root(&self) -> Option<&TypeDesc> {
        self.root.as_ref()
    }

    /// A declared enum or record by name.
    pub fn get(&self, name: &str) -> Option<&TypeDesc> {
        self.types.get(name)
    }

    /// Declared enum and record names, sorted.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// Resolve a type expression against the declared names, e.g.
    /// `List[User]`.
    ///
    /// # Errors
    ///
    /// [`SchemaError::Expression`] for malformed expressions or wrong
    /// argument counts.
    pub fn resolve(&self, text: &str) -> Result<TypeDesc, SchemaError> {
        let expr = expr::parse(text)?;
        resolve_expr(&expr, text, &mut |name: &str| self.types.get(name).cloned().map(Ok))
    }

    /// The root type, or [`SchemaError::NoRoot`].
    ///
    /// # Errors
    ///
    /// [`SchemaError::NoRoot`] if the document declares no root.
    pub fn require_root(&self) -> Result<&TypeDesc, SchemaError> {
        self.root.as_ref().ok_or(SchemaError::NoRoot)
    }
}

impl SchemaDocument {
    /// Compile the document's declarations against `registry`.
    ///
    /// # Errors
    ///
    /// Any [`SchemaError`] other than `Load`/`Parse`: bad expressions,
    /// duplicate or reserved names, cycles, unknown types, invalid defaults.
    pub fn compile(&self, registry: &Registry) -> Result<CompiledSchema, SchemaError> {
        check_names(self)?;

        let mut compiler = Compiler {
            doc: self,
            registry,
            types: BTreeMap::new(),
            in_progress: Vec::new(),
        };
        for (name, members) in &self.enums {
            compiler
                .types
                .insert(name.clone(), TypeDesc::Enum(EnumDesc::new(name.clone(), members.iter().cloned())));
        }
        for name in self.records.keys() {
            compiler.record(name)?;
        }

        let root = match &self.root {
            Some(text) => {
                let desc = compiler.resolve(text)?;
                compiler.field_serializer("root", &desc)?;
                Some(desc)
            }
            None => None,
        };

        tracing::debug!(
            enums = self.enums.len(),
            records = self.records.len(),
            root = self.root.as_deref().unwrap_or("-"),
            "compiled schema document"
        );
        Ok(CompiledSchema {
            root,
            types: compiler.types,
        })
    }
}

fn check_names(doc: &SchemaDocument) -> Result<(), SchemaError> {
    let duplicate = |name: &str, reason: String| SchemaError::Duplicate {
        name: name.to_string(),
        reason,
    };

    for name in doc.enums.keys().chain(doc.records.keys()) {
        if BUILTIN_NAMES.contains(&name.as_str()) {
            return Err(duplicate(name.as_str(), "shadows a built-in type".into()));
        }
    }
    if let Some(name) = doc.enums.keys().find(|n| doc.records.contains_key(*n)) {
        return Err(duplicate(name.as_str(), "declared as both an enum and a record".into()));
    }
    for (name, members) in &doc.enums {
        if let Some((i, member)) = members
            .iter()
            .enumerate()
            .find(|(i, m)| members[..*i].contains(*m))
        {
            return Err(duplicate(member.as_str(), format!("member {i} of enum {name} repeats an earlier member")));
        }
    }
    for (name, spec) in &doc.records {
        for (i, field) in spec.fields.iter().enumerate() {
            if spec.fields[..i].iter().any(|f| f.name == field.name) {
                return Err(duplicate(field.name.as_str(), format!("field of record {name} declared twice")));
            }
        }
    }
    Ok(())
}

struct Compiler<'a> {
    doc: &'a SchemaDocument,
    registry: &'a Registry,
    types: BTreeMap<String, TypeDesc>,
    /// Records currently being compiled, outermost first.
    in_progress: Vec<String>,
}

impl<'a> Compiler<'a> {
    fn resolve(&mut self, text: &str) -> Result<TypeDesc, SchemaError> {
        let expr = expr::parse(text)?;
        let doc = self.doc;
        resolve_expr(&expr, text, &mut |name: &str| {
            (doc.enums.contains_key(name) || doc.records.contains_key(name)).then(|| self.declared(name))
        })
    }

    fn declared(&mut self, name: &str) -> Result<TypeDesc, SchemaError> {
        match self.types.get(name) {
            Some(desc) => Ok(desc.clone()),
            None => self.record(name),
        }
    }

    fn record(&mut self, name: &str) -> Result<TypeDesc, SchemaError> {
        if let Some(desc) = self.types.get(name) {
            return Ok(desc.clone());
        }
        if let Some(start) = self.in_progress.iter().position(|n| n == name) {
            let mut path = self.in_progress[start..].to_vec();
            path.push(name.to_string());
            return Err(SchemaError::Cycle { path });
        }
        let doc: &'a SchemaDocument = self.doc;
        let Some(spec) = doc.records.get(name) else {
            return Err(SchemaError::UnknownType {
                location: name.to_string(),
                descriptor: name.to_string(),
            });
        };

        self.in_progress.push(name.to_string());
        let mut builder = RecordDesc::builder(name);
        for field in &spec.fields {
            let location = format!("{name}.{}", field.name);
            let ty = self.resolve(&field.ty)?;
            let serializer = self.field_serializer(&location, &ty)?;
            builder = match &field.default {
                None => builder.field(field.name.clone(), ty),
                Some(serde_json::Value::Null) => builder.field_with_default(field.name.clone(), ty, Instance::None),
                Some(default) => {
                    let value = serializer
                        .deserialize(default)
                        .map_err(|source| SchemaError::Default { location, source })?;
                    builder.field_with_default(field.name.clone(), ty, value)
                }
            };
        }
        self.in_progress.pop();

        let desc = TypeDesc::Record(builder.build());
        tracing::trace!(record = name, "compiled record");
        self.types.insert(name.to_string(), desc.clone());
        Ok(desc)
    }

    /// Build the serializer for `desc`, reporting unknown named types.
    fn field_serializer(&self, location: &str, desc: &TypeDesc) -> Result<Serializer, SchemaError> {
        self.registry.create(desc).map_err(|e| match e {
            SerializerError::MissingFactory { descriptor, .. } => SchemaError::UnknownType {
                location: location.to_string(),
                descriptor,
            },
            other => SchemaError::Default {
                location: location.to_string(),
                source: other,
            },
        })
    }
}

type Lookup<'l> = dyn FnMut(&str) -> Option<Result<TypeDesc, SchemaError>> + 'l;

/// Turn a parsed expression into a descriptor. `lookup` answers for
/// declared names; unknown names become [`TypeDesc::Named`].
fn resolve_expr(expr: &TypeExpr, source: &str, lookup: &mut Lookup<'_>) -> Result<TypeDesc, SchemaError> {
    let arity_error = |takes: &str| SchemaError::Expression {
        expr: source.to_string(),
        position: expr.position,
        message: format!("'{}' takes {takes}, got {}", expr.name, expr.args.len()),
    };

    if let Some(primitive) = primitive(&expr.name) {
        return if expr.args.is_empty() {
            Ok(TypeDesc::Primitive(primitive))
        } else {
            Err(arity_error("no type arguments"))
        };
    }

    match expr.name.as_str() {
        "Any" if expr.args.is_empty() => Ok(TypeDesc::Any),
        "Any" => Err(arity_error("no type arguments")),
        "List" | "Optional" => match resolve_args(expr, source, lookup)?.as_slice() {
            [inner] if expr.name == "List" => Ok(TypeDesc::sequence(inner.clone())),
            [inner] => Ok(TypeDesc::optional(inner.clone())),
            _ => Err(arity_error("one type argument")),
        },
        "Dict" => match resolve_args(expr, source, lookup)?.as_slice() {
            [key, value] => Ok(TypeDesc::mapping(key.clone(), value.clone())),
            _ => Err(arity_error("two type arguments")),
        },
        "Tuple" => Ok(TypeDesc::Tuple(resolve_args(expr, source, lookup)?)),
        "Union" if expr.args.is_empty() => Err(arity_error("at least one type argument")),
        "Union" => Ok(TypeDesc::Union(resolve_args(expr, source, lookup)?)),
        name => match lookup(name) {
            Some(_) if !expr.args.is_empty() => Err(arity_error("no type arguments")),
            Some(resolved) => resolved,
            None => Ok(TypeDesc::named_with(name, resolve_args(expr, source, lookup)?)),
        },
    }
}

fn resolve_args(expr: &TypeExpr, source: &str, lookup: &mut Lookup<'_>) -> Result<Vec<TypeDesc>, SchemaError> {
    expr.args
        .iter()
        .map(|arg| resolve_expr(arg, source, lookup))
        .collect()
}

fn primitive(name: &str) -> Option<Primitive> {
    Some(match name {
        "int" => Primitive::Int,
        "float" => Primitive::Float,
        "str" => Primitive::Str,
        "bool" => Primitive::Bool,
        "None" => Primitive::None,
        "dict" => Primitive::Dict,
        "list" => Primitive::List,
        "tuple" => Primitive::Tuple,
        _ => return None,
    })
}
