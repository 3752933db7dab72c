//! Convenient imports for typical `liteorm` usage.
//!
//! ```ignore
//! use liteorm::prelude::*;
//! ```

pub use crate::{
    Column, ColumnConstraint, ColumnType, ConfirmAllRows, Conflicting, Database, DatabaseConfig,
    Filtered, Model, Order, OrmError, OrmResult, Params, Persistable, Returning, SqlBuilder,
    TableConstraint, TableDef, TableOption, Value, params, raw_sql,
};
