use super::clause::{ConflictAction, Conflicting, Returning, conflict_clause, returning_clause};
use super::traits::SqlBuilder;
use crate::error::{OrmError, OrmResult};
use crate::fragment::{Aliased, Fragment, join_fragments, join_wrapped, quote_name, quote_value};
use indexmap::IndexMap;

/// INSERT statement builder.
///
/// Each column owns a list of values; row `i` takes the `i`-th value of
/// every column. Without any column the statement inserts `DEFAULT VALUES`.
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    table: String,
    values: IndexMap<String, Vec<Fragment>>,
    conflict: Option<ConflictAction>,
    returning: Vec<Aliased>,
}

impl Insert {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            values: IndexMap::new(),
            conflict: None,
            returning: Vec::new(),
        }
    }

    /// Append a value to a column; text is quoted as a literal.
    pub fn value(mut self, column: &str, value: impl Into<Fragment>) -> Self {
        self.values
            .entry(column.to_string())
            .or_default()
            .push(value.into());
        self
    }

    pub fn values<I, F>(mut self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<Fragment>,
    {
        self.values
            .entry(column.to_string())
            .or_default()
            .extend(values.into_iter().map(Into::into));
        self
    }

    fn row_count(&self) -> usize {
        self.values.values().map(Vec::len).min().unwrap_or(0)
    }
}

impl Conflicting for Insert {
    fn conflict_mut(&mut self) -> &mut Option<ConflictAction> {
        &mut self.conflict
    }
}

impl Returning for Insert {
    fn returning_mut(&mut self) -> &mut Vec<Aliased> {
        &mut self.returning
    }
}

impl SqlBuilder for Insert {
    fn validate(&self) -> OrmResult<()> {
        let mut lengths = self.values.iter().map(|(column, values)| (column, values.len()));
        let Some((first, expected)) = lengths.next() else {
            return Ok(());
        };
        if expected == 0 {
            return Err(OrmError::build(format!(
                "INSERT INTO {}: column {first} has no values",
                self.table
            )));
        }
        if let Some((column, found)) = lengths.find(|(_, len)| *len != expected) {
            return Err(OrmError::build(format!(
                "INSERT INTO {}: column {column} has {found} values, {first} has {expected}",
                self.table
            )));
        }
        Ok(())
    }

    fn render(&self) -> String {
        let head = join_fragments(
            " ",
            [
                "INSERT".to_string(),
                conflict_clause(self.conflict),
                "INTO".to_string(),
                quote_name(&self.table),
            ],
        );
        let body = if self.values.is_empty() {
            "DEFAULT VALUES".to_string()
        } else {
            let columns = join_wrapped(", ", self.values.keys().map(|c| quote_name(c)), "(", ")", true);
            let rows = (0..self.row_count()).map(|i| {
                join_wrapped(
                    ", ",
                    self.values.values().map(|values| quote_value(&values[i])),
                    "(",
                    ")",
                    true,
                )
            });
            format!("{columns} VALUES {}", join_fragments(", ", rows))
        };
        join_fragments(" ", [head, body, returning_clause(&self.returning)])
    }
}
