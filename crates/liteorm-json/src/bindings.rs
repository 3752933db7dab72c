//! Schema registry and text conversions.

use crate::error::{JsonError, JsonResult};
use crate::model::{JsonModel, from_record};
use crate::schema::Schema;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::{Map, Value};
use std::any::{TypeId, type_name};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Registered schemas plus output settings.
///
/// Models must be registered before use, and nested models before the
/// models that reference them.
#[derive(Debug, Default)]
pub struct JsonBindings {
    schemas: RwLock<HashMap<TypeId, Arc<Schema>>>,
    indent: Option<usize>,
}

impl JsonBindings {
    /// Compact output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretty output indented by `indent` spaces.
    pub fn with_indent(indent: usize) -> Self {
        Self {
            indent: Some(indent),
            ..Self::default()
        }
    }

    pub fn indent(&self) -> Option<usize> {
        self.indent
    }

    /// Resolve and store the schema of `T`. Registering twice returns the
    /// first schema.
    pub fn register<T: JsonModel>(&self) -> JsonResult<Arc<Schema>> {
        let type_id = TypeId::of::<T>();
        if let Some(schema) = self.schema_of(type_id) {
            return Ok(schema);
        }

        let name = short_name::<T>();
        let schema = Arc::new(Schema::resolve(name, type_id, T::fields(), &|id| {
            self.schema_of(id)
        })?);

        let mut schemas = self.schemas.write().unwrap_or_else(PoisonError::into_inner);
        let schema = schemas.entry(type_id).or_insert(schema).clone();
        tracing::debug!(
            target: "liteorm_json",
            model = name,
            fields = schema.fields().len(),
            "registered json schema"
        );
        Ok(schema)
    }

    pub fn schema<T: JsonModel>(&self) -> JsonResult<Arc<Schema>> {
        self.schema_of(TypeId::of::<T>())
            .ok_or_else(|| JsonError::NotRegistered(short_name::<T>().to_string()))
    }

    pub fn schema_of(&self, type_id: TypeId) -> Option<Arc<Schema>> {
        self.schemas
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .cloned()
    }

    pub fn to_dict<T: JsonModel>(&self, value: &T) -> JsonResult<Map<String, Value>> {
        self.schema::<T>()?.to_dict(&value.to_record())
    }

    pub fn from_dict<T: JsonModel>(&self, values: &Map<String, Value>) -> JsonResult<T> {
        let record = self.schema::<T>()?.from_dict(values)?;
        from_record(record)
    }

    pub fn to_json<T: JsonModel>(&self, value: &T) -> JsonResult<String> {
        self.render(&Value::Object(self.to_dict(value)?))
    }

    pub fn from_json<T: JsonModel>(&self, text: &str) -> JsonResult<T> {
        let value: Value = serde_json::from_str(text)?;
        self.from_value(&value)
    }

    pub fn to_json_list<T: JsonModel>(&self, values: &[T]) -> JsonResult<String> {
        let items = values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                self.to_dict(v)
                    .map(Value::Object)
                    .map_err(|e| e.at(i.to_string()))
            })
            .collect::<JsonResult<_>>()?;
        self.render(&Value::Array(items))
    }

    pub fn from_json_list<T: JsonModel>(&self, text: &str) -> JsonResult<Vec<T>> {
        match serde_json::from_str(text)? {
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| self.from_value(item).map_err(|e| e.at(i.to_string())))
                .collect(),
            other => Err(JsonError::type_mismatch("array", wire_kind(&other))),
        }
    }

    fn from_value<T: JsonModel>(&self, value: &Value) -> JsonResult<T> {
        match value {
            Value::Object(map) => self.from_dict(map),
            other => Err(JsonError::type_mismatch("object", wire_kind(other))),
        }
    }

    fn render(&self, value: &Value) -> JsonResult<String> {
        let Some(indent) = self.indent else {
            return Ok(serde_json::to_string(value)?);
        };
        let spaces = vec![b' '; indent];
        let mut out = Vec::new();
        let mut ser = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(&spaces));
        value.serialize(&mut ser)?;
        String::from_utf8(out)
            .map_err(|e| JsonError::Syntax(<serde_json::Error as serde::ser::Error>::custom(e)))
    }
}

fn wire_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn short_name<T>() -> &'static str {
    let full = type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}
