//! Resolved field types: the serialize/deserialize behavior of each shape.

use crate::attr::Attr;
use crate::desc::{Primitive, TypeDesc};
use crate::error::{JsonError, JsonResult};
use crate::schema::Schema;
use indexmap::IndexMap;
use serde_json::{Map, Number, Value};
use std::any::TypeId;
use std::sync::Arc;

/// A resolved field type.
#[derive(Debug, Clone)]
pub enum JsonType {
    Simple(Primitive),
    Nullable(Box<JsonType>),
    Foreign(Arc<Schema>),
    VariableList(Box<JsonType>),
    StaticList(Vec<JsonType>),
    VariableMap(Box<JsonType>),
    StaticMap(Vec<(String, JsonType)>),
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn float(f: f64) -> JsonResult<Value> {
    Number::from_f64(f)
        .map(Value::Number)
        .ok_or_else(|| JsonError::type_mismatch("finite float", "non-finite float"))
}

fn coerce(primitive: Primitive, value: &Value) -> JsonResult<Attr> {
    let mismatch = || JsonError::type_mismatch(primitive.as_str(), kind(value));
    match (primitive, value) {
        (_, Value::Null) => Ok(Attr::Null),
        (Primitive::Null, _) => Err(mismatch()),

        (Primitive::Integer, Value::Number(n)) => match n.as_i64() {
            Some(i) => Ok(Attr::Integer(i)),
            None => n
                .as_f64()
                .filter(|f| f.is_finite())
                .map(|f| Attr::Integer(f.trunc() as i64))
                .ok_or_else(mismatch),
        },
        (Primitive::Integer, Value::Bool(b)) => Ok(Attr::Integer(i64::from(*b))),
        (Primitive::Integer, Value::String(s)) => {
            s.trim().parse().map(Attr::Integer).map_err(|_| mismatch())
        }

        (Primitive::Float, Value::Number(n)) => n.as_f64().map(Attr::Float).ok_or_else(mismatch),
        (Primitive::Float, Value::Bool(b)) => Ok(Attr::Float(if *b { 1.0 } else { 0.0 })),
        (Primitive::Float, Value::String(s)) => {
            s.trim().parse().map(Attr::Float).map_err(|_| mismatch())
        }

        (Primitive::Boolean, other) => Ok(Attr::Bool(truthy(other))),

        (Primitive::String, Value::String(s)) => Ok(Attr::String(s.clone())),
        (Primitive::String, Value::Number(n)) => Ok(Attr::String(n.to_string())),
        (Primitive::String, Value::Bool(b)) => Ok(Attr::String(b.to_string())),

        _ => Err(mismatch()),
    }
}

fn list_items<'a>(value: &'a Value) -> JsonResult<&'a Vec<Value>> {
    match value {
        Value::Array(items) => Ok(items),
        other => Err(JsonError::type_mismatch("array", kind(other))),
    }
}

fn object<'a>(value: &'a Value) -> JsonResult<&'a Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(JsonError::type_mismatch("object", kind(other))),
    }
}

fn map_entries(attr: &Attr) -> JsonResult<&IndexMap<String, Attr>> {
    match attr {
        Attr::Map(entries) | Attr::Record(entries) => Ok(entries),
        other => Err(JsonError::type_mismatch("map", other.kind())),
    }
}

impl JsonType {
    /// Resolve a descriptor, depth-first. Model references must already be
    /// registered; `lookup` finds their schemas.
    pub fn resolve<F>(desc: &TypeDesc, lookup: &F) -> JsonResult<Self>
    where
        F: Fn(TypeId) -> Option<Arc<Schema>>,
    {
        Ok(match desc {
            TypeDesc::Primitive(p) => JsonType::Simple(*p),
            TypeDesc::Nullable(inner) => JsonType::Nullable(Box::new(Self::resolve(inner, lookup)?)),
            TypeDesc::ListOf(item) => JsonType::VariableList(Box::new(Self::resolve(item, lookup)?)),
            TypeDesc::TupleOf(items) => JsonType::StaticList(
                items
                    .iter()
                    .map(|item| Self::resolve(item, lookup))
                    .collect::<JsonResult<_>>()?,
            ),
            TypeDesc::MapOf(value) => JsonType::VariableMap(Box::new(Self::resolve(value, lookup)?)),
            TypeDesc::FixedMapOf(entries) => JsonType::StaticMap(
                entries
                    .iter()
                    .map(|(key, desc)| Ok((key.clone(), Self::resolve(desc, lookup)?)))
                    .collect::<JsonResult<_>>()?,
            ),
            TypeDesc::ModelRef { type_id, name } => JsonType::Foreign(
                lookup(*type_id).ok_or_else(|| {
                    JsonError::Unresolved(format!("model {name} is not registered"))
                })?,
            ),
        })
    }

    /// Convert a field value to its wire form.
    pub fn serialize(&self, attr: &Attr) -> JsonResult<Value> {
        match self {
            JsonType::Simple(_) => match attr {
                Attr::Null => Ok(Value::Null),
                Attr::Bool(b) => Ok(Value::Bool(*b)),
                Attr::Integer(i) => Ok(Value::from(*i)),
                Attr::Float(f) => float(*f),
                Attr::String(s) => Ok(Value::String(s.clone())),
                other => Err(JsonError::type_mismatch("primitive", other.kind())),
            },
            JsonType::Nullable(inner) => match attr {
                Attr::Null => Ok(Value::Null),
                other => inner.serialize(other),
            },
            JsonType::Foreign(schema) => match attr {
                Attr::Record(record) => schema.to_dict(record).map(Value::Object),
                other => Err(JsonError::type_mismatch("record", other.kind())),
            },
            JsonType::VariableList(item) => match attr {
                Attr::List(items) => items
                    .iter()
                    .enumerate()
                    .map(|(i, v)| item.serialize(v).map_err(|e| e.at(i.to_string())))
                    .collect::<JsonResult<_>>()
                    .map(Value::Array),
                other => Err(JsonError::type_mismatch("list", other.kind())),
            },
            JsonType::StaticList(types) => match attr {
                Attr::List(items) if items.len() == types.len() => types
                    .iter()
                    .zip(items)
                    .enumerate()
                    .map(|(i, (ty, v))| ty.serialize(v).map_err(|e| e.at(i.to_string())))
                    .collect::<JsonResult<_>>()
                    .map(Value::Array),
                Attr::List(items) => Err(JsonError::Arity {
                    expected: types.len(),
                    found: items.len(),
                }),
                other => Err(JsonError::type_mismatch("list", other.kind())),
            },
            JsonType::VariableMap(value) => map_entries(attr)?
                .iter()
                .map(|(k, v)| Ok((k.clone(), value.serialize(v).map_err(|e| e.at(k.as_str()))?)))
                .collect::<JsonResult<_>>()
                .map(Value::Object),
            JsonType::StaticMap(entries) => {
                let values = map_entries(attr)?;
                entries
                    .iter()
                    .map(|(key, ty)| {
                        let v = values.get(key).unwrap_or(&Attr::Null);
                        Ok((key.clone(), ty.serialize(v).map_err(|e| e.at(key.as_str()))?))
                    })
                    .collect::<JsonResult<_>>()
                    .map(Value::Object)
            }
        }
    }

    /// Convert a wire value to a field value.
    pub fn deserialize(&self, value: &Value) -> JsonResult<Attr> {
        match self {
            JsonType::Simple(primitive) => coerce(*primitive, value),
            JsonType::Nullable(inner) => match value {
                Value::Null => Ok(Attr::Null),
                other => inner.deserialize(other),
            },
            JsonType::Foreign(schema) => schema.from_dict(object(value)?).map(Attr::Record),
            JsonType::VariableList(item) => list_items(value)?
                .iter()
                .enumerate()
                .map(|(i, v)| item.deserialize(v).map_err(|e| e.at(i.to_string())))
                .collect::<JsonResult<_>>()
                .map(Attr::List),
            JsonType::StaticList(types) => {
                let items = list_items(value)?;
                if items.len() != types.len() {
                    return Err(JsonError::Arity {
                        expected: types.len(),
                        found: items.len(),
                    });
                }
                types
                    .iter()
                    .zip(items)
                    .enumerate()
                    .map(|(i, (ty, v))| ty.deserialize(v).map_err(|e| e.at(i.to_string())))
                    .collect::<JsonResult<_>>()
                    .map(Attr::List)
            }
            JsonType::VariableMap(item) => object(value)?
                .iter()
                .map(|(k, v)| Ok((k.clone(), item.deserialize(v).map_err(|e| e.at(k.as_str()))?)))
                .collect::<JsonResult<_>>()
                .map(Attr::Map),
            JsonType::StaticMap(entries) => {
                let map = object(value)?;
                entries
                    .iter()
                    .map(|(key, ty)| {
                        let v = map.get(key).unwrap_or(&Value::Null);
                        Ok((key.clone(), ty.deserialize(v).map_err(|e| e.at(key.as_str()))?))
                    })
                    .collect::<JsonResult<_>>()
                    .map(Attr::Map)
            }
        }
    }
}
