//! # liteorm-json
//!
//! Declarative JSON layouts for model types. Each model lists its fields with
//! a [`TypeDesc`]; registering the model resolves those descriptors into a
//! [`Schema`] of [`JsonType`]s that convert between [`Attr`] values and
//! `serde_json` values.
//!
//! ```ignore
//! use liteorm_json::{FieldDef, JsonBindings, JsonModel, Serializable, TypeDesc, field, json_fields};
//!
//! #[derive(Default)]
//! struct Answer {
//!     text: String,
//!     is_correct: bool,
//! }
//!
//! impl JsonModel for Answer {
//!     fn fields() -> Vec<FieldDef> {
//!         vec![
//!             field("text", TypeDesc::string()),
//!             field("is_correct", (TypeDesc::boolean(), "correct")),
//!         ]
//!     }
//!     json_fields!(Answer { text, is_correct });
//! }
//!
//! let bindings = JsonBindings::new();
//! bindings.register::<Answer>()?;
//! let answer = Answer::from_json(&bindings, r#"{"text": "4", "correct": true}"#)?;
//! ```

pub mod attr;
pub mod bindings;
pub mod desc;
pub mod error;
pub mod json_type;
pub mod model;
pub mod schema;

pub use attr::{Attr, FromAttr, Record, ToAttr};
pub use bindings::JsonBindings;
pub use desc::{AliasedDesc, FieldDef, Primitive, TypeDesc, field};
pub use error::{JsonError, JsonResult};
pub use json_type::JsonType;
pub use model::{JsonModel, Serializable, from_record};
pub use schema::{Field, Schema};
