//! Resolved per-model schemas.

use crate::attr::{Attr, Record};
use crate::desc::FieldDef;
use crate::error::JsonResult;
use crate::json_type::JsonType;
use serde_json::{Map, Value};
use std::any::TypeId;
use std::sync::Arc;

/// One resolved field: internal name, wire name and type.
#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub json_name: String,
    pub ty: JsonType,
}

/// The resolved schema of one model type.
#[derive(Debug, Clone)]
pub struct Schema {
    model: &'static str,
    type_id: TypeId,
    fields: Vec<Field>,
}

impl Schema {
    /// Resolve `defs` against already-registered schemas.
    pub fn resolve<F>(
        model: &'static str,
        type_id: TypeId,
        defs: Vec<FieldDef>,
        lookup: &F,
    ) -> JsonResult<Self>
    where
        F: Fn(TypeId) -> Option<Arc<Schema>>,
    {
        let fields = defs
            .into_iter()
            .map(|def| {
                let ty = JsonType::resolve(&def.desc, lookup).map_err(|e| e.at(def.name.as_str()))?;
                Ok(Field {
                    json_name: def.json_name().to_string(),
                    name: def.name,
                    ty,
                })
            })
            .collect::<JsonResult<_>>()?;
        Ok(Self {
            model,
            type_id,
            fields,
        })
    }

    pub fn model(&self) -> &'static str {
        self.model
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Wire object for `record`, keyed by wire name in declaration order.
    /// Fields absent from the record serialize as null.
    pub fn to_dict(&self, record: &Record) -> JsonResult<Map<String, Value>> {
        self.fields
            .iter()
            .map(|field| {
                let attr = record.get(&field.name).unwrap_or(&Attr::Null);
                let value = field
                    .ty
                    .serialize(attr)
                    .map_err(|e| e.at(field.json_name.as_str()))?;
                Ok((field.json_name.clone(), value))
            })
            .collect()
    }

    /// Record for a wire object. Missing keys read as null; unknown keys are ignored.
    pub fn from_dict(&self, values: &Map<String, Value>) -> JsonResult<Record> {
        self.fields
            .iter()
            .map(|field| {
                let value = values.get(&field.json_name).unwrap_or(&Value::Null);
                let attr = field
                    .ty
                    .deserialize(value)
                    .map_err(|e| e.at(field.json_name.as_str()))?;
                Ok((field.name.clone(), attr))
            })
            .collect()
    }
}
