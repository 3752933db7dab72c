//! Model binding and the CRUD operations every model gets.

use crate::builder::{ConfirmAllRows, Filtered, Select, SqlBuilder};
use crate::database::{Database, Row};
use crate::error::{OrmError, OrmResult};
use crate::fragment::{Fragment, join_fragments, raw_sql};
use crate::params::Params;
use crate::table::{Table, TableDef};
use crate::value::{FromValue, Value};

/// A type stored as one row of a table.
///
/// `Default` serves as the empty instance that fetched rows are bound onto.
/// Use [`model_fields!`](crate::model_fields) to generate the accessors.
pub trait Model: Default + 'static {
    fn table_def() -> TableDef;

    /// Read a field by its model (not column) name.
    fn field(&self, name: &str) -> OrmResult<Value>;

    /// Assign a field by its model (not column) name.
    fn set_field(&mut self, name: &str, value: Value) -> OrmResult<()>;
}

/// Generate [`Model::field`] and [`Model::set_field`] for the listed fields.
///
/// ```ignore
/// impl Model for Question {
///     fn table_def() -> TableDef { /* ... */ }
///     liteorm::model_fields!(Question { id, text, position });
/// }
/// ```
#[macro_export]
macro_rules! model_fields {
    ($model:ident { $($field:ident),* $(,)? }) => {
        fn field(&self, name: &str) -> $crate::OrmResult<$crate::Value> {
            match name {
                $(stringify!($field) => Ok($crate::Value::from(self.$field.clone())),)*
                _ => Err($crate::OrmError::unknown_field(stringify!($model), name)),
            }
        }

        fn set_field(&mut self, name: &str, value: $crate::Value) -> $crate::OrmResult<()> {
            match name {
                $(stringify!($field) => {
                    self.$field = $crate::FromValue::from_value(value)
                        .map_err(|e| $crate::OrmError::decode(name, e.to_string()))?;
                    Ok(())
                })*
                _ => Err($crate::OrmError::unknown_field(stringify!($model), name)),
            }
        }
    };
}

/// Ordering for [`Persistable::list`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Order(Vec<(Fragment, bool)>);

impl Order {
    pub fn asc(expr: impl Into<Fragment>) -> Self {
        Self(vec![(expr.into(), false)])
    }

    pub fn desc(expr: impl Into<Fragment>) -> Self {
        Self(vec![(expr.into(), true)])
    }

    pub fn then_asc(mut self, expr: impl Into<Fragment>) -> Self {
        self.0.push((expr.into(), false));
        self
    }

    pub fn then_desc(mut self, expr: impl Into<Fragment>) -> Self {
        self.0.push((expr.into(), true));
        self
    }

    fn apply(self, select: Select) -> Select {
        self.0.into_iter().fold(select, |select, (expr, desc)| {
            if desc {
                select.order_by_desc(expr)
            } else {
                select.order_by(expr)
            }
        })
    }
}

/// Bind one fetched row onto a fresh model.
///
/// Every column of the row must belong to the table; values are coerced to
/// the column's logical type before assignment.
pub fn bind_row<T: Model>(table: &Table, row: Row<'_>) -> OrmResult<T> {
    let mut model = T::default();
    bind_into(&mut model, table, row)?;
    Ok(model)
}

fn bind_into<T: Model>(model: &mut T, table: &Table, row: Row<'_>) -> OrmResult<()> {
    for (name, value) in row.iter() {
        let column = table.column(name)?;
        let value = value
            .clone()
            .coerce(column.column_type())
            .map_err(|e| OrmError::decode(name, e.to_string()))?;
        model.set_field(column.field_name(), value)?;
    }
    Ok(())
}

fn describe_ids(ids: &Params) -> String {
    join_fragments(", ", ids.iter().map(|(name, value)| format!("{name}={value}")))
}

/// CRUD operations, available on every [`Model`].
///
/// The model's table must be registered with [`Database::register`].
pub trait Persistable: Model {
    /// Insert this instance, leaving `defaults` (column or field names) to
    /// the database and reading them back onto `self`.
    ///
    /// Returns whether exactly one row was inserted.
    fn add(&mut self, db: &Database, defaults: &[&str]) -> OrmResult<bool> {
        let table = db.table_of::<Self>()?;
        let deferred = table.resolve_columns(defaults)?;
        let native = db.supports_returning();
        let insert = table.insert(defaults, native)?.build()?;
        let params = table.params_of(
            table
                .columns()
                .filter(|c| !deferred.iter().any(|d| d.name() == c.name())),
            |field| self.field(field),
        )?;

        // One lock hold covers the insert and the follow-up read.
        let session = db.session()?;
        let outcome = session.run(&insert, &params)?;
        let generated = if deferred.is_empty() {
            None
        } else if native {
            Some(outcome.rows)
        } else if table.without_rowid() {
            tracing::debug!(
                target: "liteorm",
                table = %table.name(),
                "table has no rowid, generated values are not read back"
            );
            None
        } else {
            tracing::debug!(
                target: "liteorm",
                table = %table.name(),
                rowid = outcome.last_insert_rowid,
                "reading generated values by rowid"
            );
            let select = Select::new()
                .columns(deferred.iter().map(|c| c.name()))
                .from_table(table.name())
                .where_("_rowid_ = :rowid")
                .build()?;
            let params = Params::new().with("rowid", outcome.last_insert_rowid);
            Some(session.run(&select, &params)?.rows)
        };
        drop(session);

        if let Some(row) = generated.as_ref().and_then(|rows| rows.first()) {
            bind_into(self, &table, row)?;
        }
        Ok(outcome.changes == 1)
    }

    /// Update every non-identifying column of this instance's row.
    fn save(&self, db: &Database) -> OrmResult<bool> {
        let table = db.table_of::<Self>()?;
        let params = table.params_of(table.columns(), |field| self.field(field))?;
        Ok(table.update()?.execute(db, &params)? == 1)
    }

    /// Delete this instance's row.
    fn delete(&self, db: &Database) -> OrmResult<bool> {
        let table = db.table_of::<Self>()?;
        let params = table.params_of(table.id_columns()?, |field| self.field(field))?;
        Ok(table.delete(true)?.execute(db, &params)? == 1)
    }

    /// Rows matching an optional condition, in an optional order.
    fn list(
        db: &Database,
        condition: Option<&str>,
        order: Option<Order>,
        params: &Params,
    ) -> OrmResult<Vec<Self>> {
        let table = db.table_of::<Self>()?;
        let mut select = table.select(false)?;
        if let Some(condition) = condition {
            select = select.where_(condition);
        }
        if let Some(order) = order {
            select = order.apply(select);
        }
        db.fetch_many::<Self>(&select.build()?, params)
    }

    fn count(db: &Database, condition: Option<&str>, params: &Params) -> OrmResult<u64> {
        let table = db.table_of::<Self>()?;
        let mut select = Select::new()
            .column_as(raw_sql("count(*)"), "count")
            .from_table(table.name());
        if let Some(condition) = condition {
            select = select.where_(condition);
        }
        let rows = db.query(&select.build()?, params)?;
        let Some(value) = rows.first().and_then(|row| row.value(0).cloned()) else {
            return Ok(0);
        };
        let count = i64::from_value(value).map_err(|e| OrmError::decode("count", e.to_string()))?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    /// Fetch one row by identity. `ids` is keyed by field name and must name
    /// exactly the identifying fields.
    fn get(db: &Database, ids: &Params) -> OrmResult<Option<Self>> {
        let table = db.table_of::<Self>()?;
        let columns = table.id_columns()?;

        let mut expected: Vec<String> = columns.iter().map(|c| c.field_name().to_string()).collect();
        let mut given: Vec<String> = ids.iter().map(|(name, _)| name.to_string()).collect();
        expected.sort();
        given.sort();
        if expected != given {
            return Err(OrmError::IdMismatch {
                table: table.name().to_string(),
                expected,
                given,
            });
        }

        let params = table.params_of(columns, |field| {
            ids.get(field)
                .cloned()
                .ok_or_else(|| OrmError::unknown_field(table.model_name(), field))
        })?;
        let select = table.select(true)?.build()?;
        Ok(db.fetch_many::<Self>(&select, &params)?.into_iter().next())
    }

    /// Like [`get`](Persistable::get), failing with `NotFound` when absent.
    fn require(db: &Database, ids: &Params) -> OrmResult<Self> {
        Self::get(db, ids)?.ok_or_else(|| {
            let resource = db
                .table_of::<Self>()
                .map(|t| t.name().to_string())
                .unwrap_or_default();
            OrmError::not_found(resource, describe_ids(ids))
        })
    }

    /// Delete every row of the table. Returns the number of deleted rows.
    fn delete_all(db: &Database) -> OrmResult<u64> {
        let table = db.table_of::<Self>()?;
        table.delete(false)?.all_rows(true).execute(db, &Params::new())
    }
}

impl<T: Model> Persistable for T {}
