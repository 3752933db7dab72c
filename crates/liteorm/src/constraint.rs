//! Column-level and table-level constraints.
//!
//! Each constraint renders to a SQL fragment and may carry a name, in which
//! case it renders as ``CONSTRAINT `name` ...``.

use crate::fragment::{join_fragments, quote_name};

/// Kinds of column-level constraints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnConstraintKind {
    Primary { auto_increment: bool, desc: bool },
    NotNull(bool),
    Unique(bool),
    References { table: String, column: String },
    Default(String),
    Check(String),
}

/// A column-level constraint with an optional name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnConstraint {
    pub name: Option<String>,
    pub kind: ColumnConstraintKind,
}

impl ColumnConstraint {
    fn of(kind: ColumnConstraintKind) -> Self {
        Self { name: None, kind }
    }

    pub fn primary() -> Self {
        Self::primary_with(false, false)
    }

    pub fn primary_autoincrement() -> Self {
        Self::primary_with(true, false)
    }

    pub fn primary_with(auto_increment: bool, desc: bool) -> Self {
        Self::of(ColumnConstraintKind::Primary {
            auto_increment,
            desc,
        })
    }

    pub fn not_null() -> Self {
        Self::not_null_if(true)
    }

    pub fn not_null_if(enabled: bool) -> Self {
        Self::of(ColumnConstraintKind::NotNull(enabled))
    }

    pub fn unique() -> Self {
        Self::unique_if(true)
    }

    pub fn unique_if(enabled: bool) -> Self {
        Self::of(ColumnConstraintKind::Unique(enabled))
    }

    /// Single-column foreign key.
    pub fn references(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::of(ColumnConstraintKind::References {
            table: table.into(),
            column: column.into(),
        })
    }

    /// `DEFAULT (expression)`; the expression is emitted verbatim.
    pub fn default_expr(expression: impl Into<String>) -> Self {
        Self::of(ColumnConstraintKind::Default(expression.into()))
    }

    /// `CHECK (expression)`; the expression is emitted verbatim.
    pub fn check(expression: impl Into<String>) -> Self {
        Self::of(ColumnConstraintKind::Check(expression.into()))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn is_primary(&self) -> bool {
        matches!(self.kind, ColumnConstraintKind::Primary { .. })
    }

    fn body(&self) -> Option<String> {
        match &self.kind {
            ColumnConstraintKind::Primary {
                auto_increment,
                desc,
            } => Some(join_fragments(
                " ",
                [
                    "PRIMARY KEY",
                    if *desc { "DESC" } else { "" },
                    if *auto_increment { "AUTOINCREMENT" } else { "" },
                ],
            )),
            ColumnConstraintKind::NotNull(enabled) => enabled.then(|| "NOT NULL".to_string()),
            ColumnConstraintKind::Unique(enabled) => enabled.then(|| "UNIQUE".to_string()),
            ColumnConstraintKind::References { table, column } => Some(format!(
                "REFERENCES {} ({})",
                quote_name(table),
                quote_name(column)
            )),
            ColumnConstraintKind::Default(expr) => Some(format!("DEFAULT ({expr})")),
            ColumnConstraintKind::Check(expr) => Some(format!("CHECK ({expr})")),
        }
    }

    /// Render the constraint; disabled flags render nothing.
    pub fn to_sql(&self) -> Option<String> {
        let body = self.body()?;
        Some(named(self.name.as_deref(), body))
    }
}

/// A key column, optionally descending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedColumn {
    pub name: String,
    pub desc: bool,
}

impl IndexedColumn {
    pub fn asc(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            desc: false,
        }
    }

    pub fn desc(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            desc: true,
        }
    }

    fn to_sql(&self) -> String {
        if self.desc {
            format!("{} DESC", quote_name(&self.name))
        } else {
            quote_name(&self.name)
        }
    }
}

impl From<&str> for IndexedColumn {
    fn from(name: &str) -> Self {
        Self::asc(name)
    }
}

impl From<String> for IndexedColumn {
    fn from(name: String) -> Self {
        Self::asc(name)
    }
}

/// Kinds of table-level constraints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableConstraintKind {
    PrimaryKey(Vec<IndexedColumn>),
    Unique(Vec<IndexedColumn>),
    /// Local columns paired with the referenced table's columns.
    ForeignKey {
        table: String,
        columns: Vec<(String, String)>,
    },
    Check(String),
}

/// A table-level constraint with an optional name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConstraint {
    pub name: Option<String>,
    pub kind: TableConstraintKind,
}

impl TableConstraint {
    fn of(kind: TableConstraintKind) -> Self {
        Self { name: None, kind }
    }

    pub fn primary_key<I, C>(columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<IndexedColumn>,
    {
        Self::of(TableConstraintKind::PrimaryKey(
            columns.into_iter().map(Into::into).collect(),
        ))
    }

    pub fn unique<I, C>(columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<IndexedColumn>,
    {
        Self::of(TableConstraintKind::Unique(
            columns.into_iter().map(Into::into).collect(),
        ))
    }

    /// `FOREIGN KEY (local, ...) REFERENCES table (foreign, ...)`.
    pub fn foreign_key<I, L, F>(table: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = (L, F)>,
        L: Into<String>,
        F: Into<String>,
    {
        Self::of(TableConstraintKind::ForeignKey {
            table: table.into(),
            columns: columns
                .into_iter()
                .map(|(local, foreign)| (local.into(), foreign.into()))
                .collect(),
        })
    }

    pub fn check(expression: impl Into<String>) -> Self {
        Self::of(TableConstraintKind::Check(expression.into()))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Columns of a `PRIMARY KEY` constraint; empty for other kinds.
    pub fn primary_key_columns(&self) -> Vec<&str> {
        match &self.kind {
            TableConstraintKind::PrimaryKey(columns) => {
                columns.iter().map(|c| c.name.as_str()).collect()
            }
            _ => Vec::new(),
        }
    }

    pub fn to_sql(&self) -> String {
        let body = match &self.kind {
            TableConstraintKind::PrimaryKey(columns) => {
                format!("PRIMARY KEY ({})", key_columns(columns))
            }
            TableConstraintKind::Unique(columns) => format!("UNIQUE ({})", key_columns(columns)),
            TableConstraintKind::ForeignKey { table, columns } => {
                let local = join_fragments(", ", columns.iter().map(|(l, _)| quote_name(l)));
                let foreign = join_fragments(", ", columns.iter().map(|(_, f)| quote_name(f)));
                format!(
                    "FOREIGN KEY ({local}) REFERENCES {} ({foreign})",
                    quote_name(table)
                )
            }
            TableConstraintKind::Check(expr) => format!("CHECK ({expr})"),
        };
        named(self.name.as_deref(), body)
    }
}

fn key_columns(columns: &[IndexedColumn]) -> String {
    join_fragments(", ", columns.iter().map(IndexedColumn::to_sql))
}

fn named(name: Option<&str>, body: String) -> String {
    match name {
        Some(name) => format!("CONSTRAINT {} {}", quote_name(name), body),
        None => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_variants() {
        assert_eq!(
            ColumnConstraint::primary().to_sql().as_deref(),
            Some("PRIMARY KEY")
        );
        assert_eq!(
            ColumnConstraint::primary_with(true, true).to_sql().as_deref(),
            Some("PRIMARY KEY DESC AUTOINCREMENT")
        );
    }

    #[test]
    fn named_column_constraint() {
        let c = ColumnConstraint::check("score >= 0").with_name("positive");
        assert_eq!(
            c.to_sql().as_deref(),
            Some("CONSTRAINT `positive` CHECK (score >= 0)")
        );
    }

    #[test]
    fn references_and_default() {
        assert_eq!(
            ColumnConstraint::references("questions", "id").to_sql().as_deref(),
            Some("REFERENCES `questions` (`id`)")
        );
        assert_eq!(
            ColumnConstraint::default_expr("0").to_sql().as_deref(),
            Some("DEFAULT (0)")
        );
    }

    #[test]
    fn disabled_flag_is_absent() {
        assert_eq!(ColumnConstraint::unique_if(false).to_sql(), None);
        assert_eq!(ColumnConstraint::not_null_if(false).to_sql(), None);
    }

    #[test]
    fn table_level_keys() {
        let pk = TableConstraint::primary_key(["a", "b"]);
        assert_eq!(pk.to_sql(), "PRIMARY KEY (`a`, `b`)");
        assert_eq!(pk.primary_key_columns(), vec!["a", "b"]);

        let unique = TableConstraint::unique([IndexedColumn::asc("x"), IndexedColumn::desc("y")]);
        assert_eq!(unique.to_sql(), "UNIQUE (`x`, `y` DESC)");
        assert!(unique.primary_key_columns().is_empty());
    }

    #[test]
    fn table_level_foreign_key() {
        let fk = TableConstraint::foreign_key("questions", [("question", "id")]).with_name("fk_q");
        assert_eq!(
            fk.to_sql(),
            "CONSTRAINT `fk_q` FOREIGN KEY (`question`) REFERENCES `questions` (`id`)"
        );
    }
}
