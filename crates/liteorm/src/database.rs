//! The single-connection SQLite wrapper and the table registry.
//!
//! Every statement runs while holding the connection mutex. Callers that
//! need several statements to run back to back (the RETURNING fallback in
//! [`Persistable::add`](crate::Persistable::add)) take a [`Session`].

use crate::builder::SqlBuilder;
use crate::config::{DatabaseConfig, ReturningMode};
use crate::error::{OrmError, OrmResult};
use crate::model::{Model, bind_row};
use crate::params::Params;
use crate::table::Table;
use crate::trace::{QueryType, TracingSqlHook};
use crate::value::Value;
use rusqlite::{Connection, Statement};
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use std::time::Instant;

/// First SQLite release with `RETURNING`.
const RETURNING_MIN_VERSION: i32 = 3_035_000;

/// Rows produced by a statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl ResultSet {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Row<'_>> {
        self.rows.get(index).map(|values| Row {
            columns: &self.columns,
            values,
        })
    }

    pub fn first(&self) -> Option<Row<'_>> {
        self.get(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(|values| Row {
            columns: &self.columns,
            values,
        })
    }

    /// First value of the first row.
    pub fn scalar(&self) -> Option<&Value> {
        self.rows.first().and_then(|row| row.first())
    }

    pub fn into_rows(self) -> Vec<Vec<Value>> {
        self.rows
    }
}

/// One row of a [`ResultSet`].
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    columns: &'a [String],
    values: &'a [Value],
}

impl<'a> Row<'a> {
    /// Value of a column by result name.
    pub fn get(&self, column: &str) -> Option<&'a Value> {
        let index = self.columns.iter().position(|c| c == column)?;
        self.values.get(index)
    }

    pub fn value(&self, index: usize) -> Option<&'a Value> {
        self.values.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a Value)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }
}

/// Result of running one statement.
#[derive(Debug, Clone, Default)]
pub struct Outcome {
    pub rows: ResultSet,
    /// Rows changed by an INSERT, UPDATE or DELETE; 0 for anything else.
    pub changes: u64,
    pub last_insert_rowid: i64,
}

/// Bind the parameters the statement declares; unknown extras are ignored.
fn bind(stmt: &mut Statement<'_>, params: &Params) -> OrmResult<()> {
    for index in 1..=stmt.parameter_count() {
        let key = match stmt.parameter_name(index) {
            Some(name) => name.trim_start_matches([':', '@', '$', '?']).to_string(),
            None => index.to_string(),
        };
        let value = params
            .get(&key)
            .ok_or_else(|| OrmError::build(format!("no value for parameter {key}")))?;
        stmt.raw_bind_parameter(index, value)?;
    }
    Ok(())
}

/// Exclusive use of the connection for several statements in a row.
pub struct Session<'a> {
    conn: MutexGuard<'a, Connection>,
    trace: Option<&'a TracingSqlHook>,
}

impl Session<'_> {
    pub fn run(&self, sql: &str, params: &Params) -> OrmResult<Outcome> {
        if let Some(hook) = self.trace {
            hook.before_statement(sql, params);
        }
        let started = Instant::now();

        let mut stmt = self.conn.prepare(sql)?;
        bind(&mut stmt, params)?;
        let columns: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();

        let mut rows = Vec::new();
        let mut raw = stmt.raw_query();
        while let Some(row) = raw.next()? {
            let values = (0..columns.len())
                .map(|i| row.get::<_, Value>(i))
                .collect::<rusqlite::Result<Vec<_>>>()?;
            rows.push(values);
        }
        drop(raw);
        drop(stmt);

        let changes = match QueryType::from_sql(sql) {
            QueryType::Insert | QueryType::Update | QueryType::Delete => self.conn.changes() as u64,
            _ => 0,
        };
        if let Some(hook) = self.trace {
            hook.after_statement(sql, rows.len(), changes, started.elapsed());
        }
        Ok(Outcome {
            rows: ResultSet { columns, rows },
            changes,
            last_insert_rowid: self.conn.last_insert_rowid(),
        })
    }
}

#[derive(Default)]
struct Registry {
    by_name: HashMap<String, Arc<Table>>,
    by_type: HashMap<TypeId, String>,
}

/// An embedded SQLite database with a registry of model tables.
pub struct Database {
    conn: Mutex<Connection>,
    config: DatabaseConfig,
    returning: bool,
    registry: RwLock<Registry>,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("path", &self.config.path)
            .field("returning", &self.returning)
            .finish_non_exhaustive()
    }
}

impl Database {
    pub fn open(config: DatabaseConfig) -> OrmResult<Self> {
        let conn = Connection::open(&config.path)?;
        conn.execute_batch("PRAGMA encoding = 'UTF-8'")?;

        let returning = match config.returning {
            ReturningMode::Auto => rusqlite::version_number() >= RETURNING_MIN_VERSION,
            ReturningMode::Native => true,
            ReturningMode::Emulate => false,
        };
        tracing::debug!(
            target: "liteorm",
            path = %config.path,
            sqlite = rusqlite::version(),
            returning,
            "opened database"
        );

        Ok(Self {
            conn: Mutex::new(conn),
            config,
            returning,
            registry: RwLock::new(Registry::default()),
        })
    }

    /// A fresh in-memory database with default settings.
    pub fn memory() -> OrmResult<Self> {
        Self::open(DatabaseConfig::memory())
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Whether inserts read generated values with `RETURNING`.
    pub fn supports_returning(&self) -> bool {
        self.returning
    }

    /// Lock the connection until the session is dropped.
    pub fn session(&self) -> OrmResult<Session<'_>> {
        Ok(Session {
            conn: self.conn.lock()?,
            trace: self.config.trace.as_ref(),
        })
    }

    pub fn run(&self, sql: &str, params: &Params) -> OrmResult<Outcome> {
        self.session()?.run(sql, params)
    }

    /// Run a statement and return the number of changed rows.
    pub fn execute(&self, sql: &str, params: &Params) -> OrmResult<u64> {
        Ok(self.run(sql, params)?.changes)
    }

    pub fn query(&self, sql: &str, params: &Params) -> OrmResult<ResultSet> {
        Ok(self.run(sql, params)?.rows)
    }

    pub fn fetch_many<T: Model>(&self, sql: &str, params: &Params) -> OrmResult<Vec<T>> {
        let table = self.table_of::<T>()?;
        let rows = self.query(sql, params)?;
        rows.iter().map(|row| bind_row::<T>(&table, row)).collect()
    }

    pub fn fetch_one<T: Model>(&self, sql: &str, params: &Params) -> OrmResult<Option<T>> {
        let table = self.table_of::<T>()?;
        let rows = self.query(sql, params)?;
        rows.first().map(|row| bind_row::<T>(&table, row)).transpose()
    }

    /// Register `T`'s table, creating it when `auto_create_tables` is set.
    ///
    /// Registering the same type twice returns the existing table. A second
    /// type claiming an already registered table name is rejected.
    pub fn register<T: Model>(&self) -> OrmResult<Arc<Table>> {
        if let Ok(table) = self.table_of::<T>() {
            return Ok(table);
        }
        let table = Arc::new(Table::new::<T>(T::table_def()));
        {
            let mut registry = self.registry.write()?;
            if let Some(existing) = registry.by_name.get(table.name()) {
                if existing.type_id() != table.type_id() {
                    return Err(OrmError::DuplicateTable {
                        table: table.name().to_string(),
                        existing: existing.model_name().to_string(),
                        model: table.model_name().to_string(),
                    });
                }
                return Ok(Arc::clone(existing));
            }
            registry
                .by_type
                .insert(TypeId::of::<T>(), table.name().to_string());
            registry
                .by_name
                .insert(table.name().to_string(), Arc::clone(&table));
        }
        tracing::debug!(
            target: "liteorm",
            table = %table.name(),
            model = table.model_name(),
            "registered table"
        );
        if self.config.auto_create_tables {
            self.create_table_of(&table)?;
        }
        Ok(table)
    }

    pub fn table(&self, name: &str) -> OrmResult<Arc<Table>> {
        self.registry
            .read()?
            .by_name
            .get(name)
            .cloned()
            .ok_or_else(|| OrmError::UnknownTable(name.to_string()))
    }

    pub fn table_of<T: Model>(&self) -> OrmResult<Arc<Table>> {
        let registry = self.registry.read()?;
        registry
            .by_type
            .get(&TypeId::of::<T>())
            .and_then(|name| registry.by_name.get(name))
            .cloned()
            .ok_or_else(|| OrmError::UnknownTable(std::any::type_name::<T>().to_string()))
    }

    fn create_table_of(&self, table: &Table) -> OrmResult<()> {
        table
            .create()
            .if_not_exists(true)
            .temporary(self.config.create_temporary)
            .execute(self, &Params::new())?;
        Ok(())
    }

    /// Create `T`'s table if it does not exist yet.
    pub fn create_table<T: Model>(&self) -> OrmResult<()> {
        let table = self.table_of::<T>()?;
        self.create_table_of(&table)
    }

    /// Drop and create `T`'s table, discarding its rows.
    pub fn recreate<T: Model>(&self) -> OrmResult<()> {
        let table = self.table_of::<T>()?;
        table.drop_table().if_exists(true).execute(self, &Params::new())?;
        self.create_table_of(&table)
    }

    /// Close the connection, reporting any error SQLite raises.
    pub fn close(self) -> OrmResult<()> {
        let conn = self.conn.into_inner()?;
        conn.close().map_err(|(_, err)| OrmError::Query(err))
    }
}
