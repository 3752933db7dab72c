//! Registered table metadata and the statements derived from it.

use crate::builder::{
    AlterTable, CreateTable, Delete, DropTable, Filtered, Insert, Returning, Select, TableOption,
    Update,
};
use crate::column::Column;
use crate::constraint::TableConstraint;
use crate::error::{OrmError, OrmResult};
use crate::fragment::{join_fragments, placeholder, quote_name};
use crate::params::Params;
use crate::value::Value;
use indexmap::IndexMap;
use std::any::TypeId;
use std::sync::OnceLock;

/// Declarative description of a model's table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableDef {
    name: Option<String>,
    columns: Vec<Column>,
    constraints: Vec<TableConstraint>,
    options: Vec<TableOption>,
}

impl TableDef {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the table name; it defaults to the model type's name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn constraint(mut self, constraint: TableConstraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn option(mut self, option: TableOption) -> Self {
        if !self.options.contains(&option) {
            self.options.push(option);
        }
        self
    }
}

/// Last path segment of a type name, without generic arguments.
fn short_type_name(type_name: &str) -> &str {
    let base = type_name.split('<').next().unwrap_or(type_name);
    base.rsplit("::").next().unwrap_or(base)
}

/// A table bound to a model type.
///
/// Immutable once registered; shared as `Arc<Table>`.
#[derive(Debug)]
pub struct Table {
    model: &'static str,
    type_id: TypeId,
    name: String,
    columns: IndexMap<String, Column>,
    constraints: Vec<TableConstraint>,
    options: Vec<TableOption>,
    ids: OnceLock<Vec<String>>,
}

impl Table {
    pub fn new<T: 'static>(def: TableDef) -> Self {
        let model = std::any::type_name::<T>();
        let name = def
            .name
            .unwrap_or_else(|| short_type_name(model).to_string());
        let columns = def
            .columns
            .into_iter()
            .map(|column| (column.name().to_string(), column))
            .collect();
        Self {
            model,
            type_id: TypeId::of::<T>(),
            name,
            columns,
            constraints: def.constraints,
            options: def.options,
            ids: OnceLock::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full type name of the bound model.
    pub fn model_name(&self) -> &'static str {
        self.model
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Columns in declaration order.
    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.values()
    }

    pub fn constraints(&self) -> &[TableConstraint] {
        &self.constraints
    }

    pub fn options(&self) -> &[TableOption] {
        &self.options
    }

    pub fn without_rowid(&self) -> bool {
        self.options.contains(&TableOption::WithoutRowid)
    }

    pub fn column(&self, name: &str) -> OrmResult<&Column> {
        self.columns
            .get(name)
            .ok_or_else(|| OrmError::unknown_column(&self.name, name))
    }

    pub fn column_by_field(&self, field: &str) -> OrmResult<&Column> {
        self.columns()
            .find(|c| c.field_name() == field)
            .ok_or_else(|| OrmError::unknown_column(&self.name, field))
    }

    /// Identifying column names: table-level primary key columns first, then
    /// columns carrying a primary key constraint. Computed once.
    pub fn ids(&self) -> &[String] {
        self.ids.get_or_init(|| {
            let mut ids: Vec<String> = Vec::new();
            let table_level = self
                .constraints
                .iter()
                .flat_map(TableConstraint::primary_key_columns);
            let column_level = self
                .columns()
                .filter(|c| c.is_primary())
                .map(Column::name);
            for name in table_level.chain(column_level) {
                if !ids.iter().any(|id| id == name) {
                    ids.push(name.to_string());
                }
            }
            ids
        })
    }

    /// Identifying columns, failing when the table has none.
    pub fn id_columns(&self) -> OrmResult<Vec<&Column>> {
        if self.ids().is_empty() {
            return Err(OrmError::MissingIds(self.name.clone()));
        }
        self.ids().iter().map(|id| self.column(id)).collect()
    }

    pub fn is_id(&self, column: &str) -> bool {
        self.ids().iter().any(|id| id == column)
    }

    /// `` `a` = :a AND `b` = :b `` over the identifying columns.
    pub fn ids_condition(&self) -> OrmResult<String> {
        let columns = self.id_columns()?;
        Ok(join_fragments(
            " AND ",
            columns.iter().map(|c| {
                format!("{} = {}", quote_name(c.name()), placeholder(c.name()))
            }),
        ))
    }

    /// Resolve column names (SQL or field names) in declaration order.
    pub fn resolve_columns(&self, names: &[&str]) -> OrmResult<Vec<&Column>> {
        for name in names {
            if !self
                .columns()
                .any(|c| c.name() == *name || c.field_name() == *name)
            {
                return Err(OrmError::unknown_column(&self.name, *name));
            }
        }
        Ok(self
            .columns()
            .filter(|c| names.iter().any(|n| c.name() == *n || c.field_name() == *n))
            .collect())
    }

    pub fn create(&self) -> CreateTable {
        self.options.iter().fold(
            CreateTable::new(&self.name)
                .columns(self.columns().cloned())
                .constraints(self.constraints.iter().cloned()),
            |create, option| create.option(*option),
        )
    }

    pub fn alter(&self) -> AlterTable {
        AlterTable::new(&self.name)
    }

    pub fn drop_table(&self) -> DropTable {
        DropTable::new(&self.name)
    }

    /// SELECT every column, optionally restricted to one identity.
    pub fn select(&self, where_id: bool) -> OrmResult<Select> {
        let select = Select::new()
            .columns(self.columns().map(Column::name))
            .from_table(&self.name);
        if where_id {
            Ok(select.where_(self.ids_condition()?))
        } else {
            Ok(select)
        }
    }

    /// INSERT one row of placeholders, leaving `defaults` to the database.
    ///
    /// With `returning`, the deferred columns are requested back.
    pub fn insert(&self, defaults: &[&str], returning: bool) -> OrmResult<Insert> {
        let deferred = self.resolve_columns(defaults)?;
        let mut insert = Insert::new(&self.name);
        for column in self.columns() {
            if deferred.iter().any(|d| d.name() == column.name()) {
                if returning {
                    insert = insert.returning(column.name());
                }
            } else {
                insert = insert.value(column.name(), placeholder(column.name()));
            }
        }
        Ok(insert)
    }

    /// UPDATE every non-identifying column of one identity.
    pub fn update(&self) -> OrmResult<Update> {
        let condition = self.ids_condition()?;
        Ok(self
            .columns()
            .filter(|c| !self.is_id(c.name()))
            .fold(Update::new(&self.name), |update, c| {
                update.set(c.name(), placeholder(c.name()))
            })
            .where_(condition))
    }

    /// DELETE, optionally restricted to one identity.
    ///
    /// Without `where_id` the statement must still be confirmed with
    /// `all_rows(true)` before it builds.
    pub fn delete(&self, where_id: bool) -> OrmResult<Delete> {
        let delete = Delete::new(&self.name);
        if where_id {
            Ok(delete.where_(self.ids_condition()?))
        } else {
            Ok(delete)
        }
    }

    /// Collect named parameters for `columns` from a model, keyed by column name.
    pub fn params_of<'a, F>(&self, columns: impl IntoIterator<Item = &'a Column>, field: F) -> OrmResult<Params>
    where
        F: Fn(&str) -> OrmResult<Value>,
    {
        let mut params = Params::new();
        for column in columns {
            params.set(column.name(), field(column.field_name())?);
        }
        Ok(params)
    }
}
