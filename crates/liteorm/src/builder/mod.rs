//! Statement builders.
//!
//! Every builder is a by-value fluent value that renders one SQLite
//! statement. Shared clauses are mixed in through traits:
//!
//! - [`Filtered`]: WHERE / ORDER BY / LIMIT / OFFSET
//! - [`ConfirmAllRows`]: unconditioned UPDATE and DELETE must be confirmed
//! - [`Conflicting`]: `OR ABORT|FAIL|IGNORE|REPLACE|ROLLBACK`
//! - [`Returning`]: `RETURNING expr [AS alias], ...`
//!
//! Contract violations (offset without limit, an ALTER without action, ...)
//! are reported by [`SqlBuilder::build`] and never reach the database.

pub mod alter_table;
pub mod clause;
pub mod create_table;
pub mod delete;
pub mod drop_table;
pub mod insert;
pub mod join;
pub mod select;
pub mod traits;
pub mod update;

pub use alter_table::{AlterAction, AlterTable};
pub use clause::{ConfirmAllRows, ConflictAction, Conflicting, Filter, Filtered, Returning};
pub use create_table::{CreateTable, TableOption};
pub use delete::Delete;
pub use drop_table::DropTable;
pub use insert::Insert;
pub use join::{Join, JoinKind};
pub use select::Select;
pub use traits::SqlBuilder;
pub use update::Update;

#[cfg(test)]
mod tests;
