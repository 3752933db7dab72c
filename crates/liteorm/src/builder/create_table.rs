use super::traits::SqlBuilder;
use crate::column::Column;
use crate::constraint::TableConstraint;
use crate::error::{OrmError, OrmResult};
use crate::fragment::{join_fragments, quote_name};

/// Trailing table options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableOption {
    WithoutRowid,
    Strict,
}

impl TableOption {
    pub fn as_str(self) -> &'static str {
        match self {
            TableOption::WithoutRowid => "WITHOUT ROWID",
            TableOption::Strict => "STRICT",
        }
    }
}

/// CREATE TABLE statement builder.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTable {
    name: String,
    columns: Vec<Column>,
    constraints: Vec<TableConstraint>,
    options: Vec<TableOption>,
    if_not_exists: bool,
    temporary: bool,
}

impl CreateTable {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            columns: Vec::new(),
            constraints: Vec::new(),
            options: Vec::new(),
            if_not_exists: false,
            temporary: false,
        }
    }

    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn columns(mut self, columns: impl IntoIterator<Item = Column>) -> Self {
        self.columns.extend(columns);
        self
    }

    pub fn constraint(mut self, constraint: TableConstraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn constraints(mut self, constraints: impl IntoIterator<Item = TableConstraint>) -> Self {
        self.constraints.extend(constraints);
        self
    }

    pub fn option(mut self, option: TableOption) -> Self {
        if !self.options.contains(&option) {
            self.options.push(option);
        }
        self
    }

    pub fn if_not_exists(mut self, yes: bool) -> Self {
        self.if_not_exists = yes;
        self
    }

    pub fn temporary(mut self, yes: bool) -> Self {
        self.temporary = yes;
        self
    }
}

impl SqlBuilder for CreateTable {
    fn validate(&self) -> OrmResult<()> {
        if self.columns.is_empty() {
            return Err(OrmError::build(format!(
                "CREATE TABLE {} needs at least one column",
                self.name
            )));
        }
        Ok(())
    }

    fn render(&self) -> String {
        let definitions = join_fragments(
            ", ",
            self.columns
                .iter()
                .map(Column::to_sql)
                .chain(self.constraints.iter().map(TableConstraint::to_sql)),
        );
        let options = join_fragments(", ", self.options.iter().map(|o| o.as_str()));
        join_fragments(
            " ",
            [
                "CREATE".to_string(),
                if self.temporary { "TEMPORARY" } else { "" }.to_string(),
                "TABLE".to_string(),
                if self.if_not_exists { "IF NOT EXISTS" } else { "" }.to_string(),
                quote_name(&self.name),
                format!("({definitions})"),
                options,
            ],
        )
    }
}
