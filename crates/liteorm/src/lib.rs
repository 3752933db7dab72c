//! # liteorm
//!
//! A small SQLite ORM: composable statement builders plus declarative
//! table-to-model binding over one embedded connection.
//!
//! ## Features
//!
//! - **Safe composition**: identifiers and literals are quoted; [`RawSql`] opts out
//! - **Build-time checks**: DELETE/UPDATE without WHERE must be confirmed, OFFSET needs LIMIT
//! - **Declarative tables**: columns and constraints are declared once per model
//! - **Generated values**: `add` reads back autoincrement ids via `RETURNING`, or a
//!   follow-up `_rowid_` SELECT on SQLite builds without it
//! - **Tracing**: every statement can be logged through `tracing` (target `liteorm.sql`)
//!
//! ```ignore
//! use liteorm::prelude::*;
//!
//! #[derive(Debug, Default)]
//! struct Question {
//!     id: i64,
//!     text: String,
//!     position: i64,
//! }
//!
//! impl Model for Question {
//!     fn table_def() -> TableDef {
//!         TableDef::new()
//!             .named("questions")
//!             .column(Column::of::<i64>("id").constraint(ColumnConstraint::primary_autoincrement()))
//!             .column(Column::of::<String>("text"))
//!             .column(Column::of::<i64>("position"))
//!     }
//!
//!     liteorm::model_fields!(Question { id, text, position });
//! }
//!
//! let db = Database::open(DatabaseConfig::memory().auto_create_tables(true))?;
//! db.register::<Question>()?;
//!
//! let mut q = Question { text: "2 + 2?".into(), ..Default::default() };
//! q.add(&db, &["id"])?;
//! let all = Question::list(&db, None, Some(Order::asc("position")), &Params::new())?;
//! ```

pub mod builder;
pub mod column;
pub mod config;
pub mod constraint;
pub mod database;
pub mod error;
pub mod fragment;
pub mod model;
pub mod params;
pub mod prelude;
pub mod table;
pub mod trace;
pub mod value;

pub use builder::{
    AlterAction, AlterTable, ConfirmAllRows, ConflictAction, Conflicting, CreateTable, Delete,
    DropTable, Filtered, Insert, Join, JoinKind, Returning, Select, SqlBuilder, TableOption,
    Update,
};
pub use column::{Column, ColumnType, HasColumnType, SqlType};
pub use config::{DatabaseConfig, ReturningMode};
pub use constraint::{ColumnConstraint, IndexedColumn, TableConstraint};
pub use database::{Database, Outcome, ResultSet, Row, Session};
pub use error::{OrmError, OrmResult};
pub use fragment::{
    Aliased, Fragment, RawSql, placeholder, positional_placeholder, quote_identifier, quote_value,
    raw_sql, real_literal,
};
pub use model::{Model, Order, Persistable, bind_row};
pub use params::Params;
pub use table::{Table, TableDef};
pub use trace::{QueryType, TracingSqlHook};
pub use value::{FromValue, Value, ValueError};
