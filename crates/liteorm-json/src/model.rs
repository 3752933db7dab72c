//! The model trait and the conversions every model gets for free.

use crate::attr::{Attr, Record};
use crate::bindings::JsonBindings;
use crate::desc::FieldDef;
use crate::error::JsonResult;
use serde_json::{Map, Value};

/// A type with a declared JSON shape.
///
/// `fields` declares the wire layout. `to_record`/`set_attr` move values in
/// and out by internal field name and are usually generated with
/// [`json_fields!`](crate::json_fields).
pub trait JsonModel: Default + 'static {
    fn fields() -> Vec<FieldDef>;

    fn to_record(&self) -> Record;

    fn set_attr(&mut self, name: &str, attr: Attr) -> JsonResult<()>;

    /// Checked by callers that accept user input. Decoding never runs it.
    fn validate(&self) -> JsonResult<()> {
        Ok(())
    }
}

/// Generate `to_record` and `set_attr` for the listed fields.
///
/// ```ignore
/// impl JsonModel for Answer {
///     fn fields() -> Vec<FieldDef> { vec![field("text", TypeDesc::string())] }
///     json_fields!(Answer { text });
/// }
/// ```
#[macro_export]
macro_rules! json_fields {
    ($model:ident { $($field:ident),* $(,)? }) => {
        fn to_record(&self) -> $crate::Record {
            let mut record = $crate::Record::new();
            $(record.insert(
                stringify!($field).to_string(),
                $crate::ToAttr::to_attr(&self.$field),
            );)*
            record
        }

        fn set_attr(&mut self, name: &str, attr: $crate::Attr) -> $crate::JsonResult<()> {
            match name {
                $(stringify!($field) => {
                    self.$field = $crate::FromAttr::from_attr(attr).map_err(|e| e.at(name))?;
                    Ok(())
                })*
                _ => Err($crate::JsonError::UnknownField {
                    model: stringify!($model).to_string(),
                    field: name.to_string(),
                }),
            }
        }
    };
}

/// Let a model be used as the type of another model's field.
#[macro_export]
macro_rules! json_nested {
    ($model:ty) => {
        impl $crate::ToAttr for $model {
            fn to_attr(&self) -> $crate::Attr {
                $crate::Attr::Record($crate::JsonModel::to_record(self))
            }
        }

        impl $crate::FromAttr for $model {
            fn from_attr(attr: $crate::Attr) -> $crate::JsonResult<Self> {
                match attr {
                    $crate::Attr::Record(record) => $crate::from_record(record),
                    other => Err($crate::JsonError::type_mismatch("record", other.kind())),
                }
            }
        }
    };
}

/// Build a model from its record, starting from `T::default()`.
pub fn from_record<T: JsonModel>(record: Record) -> JsonResult<T> {
    let mut model = T::default();
    for (name, attr) in record {
        model.set_attr(&name, attr)?;
    }
    Ok(model)
}

/// Wire conversions for registered models.
pub trait Serializable: JsonModel {
    fn to_dict(&self, bindings: &JsonBindings) -> JsonResult<Map<String, Value>> {
        bindings.to_dict(self)
    }

    fn from_dict(bindings: &JsonBindings, values: &Map<String, Value>) -> JsonResult<Self> {
        bindings.from_dict(values)
    }

    fn to_json(&self, bindings: &JsonBindings) -> JsonResult<String> {
        bindings.to_json(self)
    }

    fn from_json(bindings: &JsonBindings, text: &str) -> JsonResult<Self> {
        bindings.from_json(text)
    }

    fn to_json_list(bindings: &JsonBindings, values: &[Self]) -> JsonResult<String> {
        bindings.to_json_list(values)
    }

    fn from_json_list(bindings: &JsonBindings, text: &str) -> JsonResult<Vec<Self>> {
        bindings.from_json_list(text)
    }
}

impl<T: JsonModel> Serializable for T {}
