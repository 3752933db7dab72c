use super::clause::{
    ConfirmAllRows, ConflictAction, Conflicting, Filter, Filtered, Returning, check_all_rows,
    conflict_clause, returning_clause,
};
use super::traits::SqlBuilder;
use crate::error::{OrmError, OrmResult};
use crate::fragment::{Aliased, Fragment, join_fragments, quote_name, quote_value};
use indexmap::IndexMap;

/// UPDATE statement builder.
///
/// Building fails without any SET value, and without a condition unless
/// every row was explicitly confirmed with [`ConfirmAllRows::all_rows`].
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    table: String,
    sets: IndexMap<String, Fragment>,
    filter: Filter,
    all_rows: bool,
    conflict: Option<ConflictAction>,
    returning: Vec<Aliased>,
}

impl Update {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            sets: IndexMap::new(),
            filter: Filter::default(),
            all_rows: false,
            conflict: None,
            returning: Vec::new(),
        }
    }

    /// Set a column; text is quoted as a literal, raw SQL is kept as is.
    pub fn set(mut self, column: &str, value: impl Into<Fragment>) -> Self {
        self.sets.insert(column.to_string(), value.into());
        self
    }
}

impl Filtered for Update {
    fn filter_mut(&mut self) -> &mut Filter {
        &mut self.filter
    }
}

impl ConfirmAllRows for Update {
    fn confirm_mut(&mut self) -> &mut bool {
        &mut self.all_rows
    }
}

impl Conflicting for Update {
    fn conflict_mut(&mut self) -> &mut Option<ConflictAction> {
        &mut self.conflict
    }
}

impl Returning for Update {
    fn returning_mut(&mut self) -> &mut Vec<Aliased> {
        &mut self.returning
    }
}

impl SqlBuilder for Update {
    fn validate(&self) -> OrmResult<()> {
        if self.sets.is_empty() {
            return Err(OrmError::build(format!(
                "UPDATE {} has no values to set",
                self.table
            )));
        }
        check_all_rows(&self.filter, self.all_rows, "UPDATE")
    }

    fn render(&self) -> String {
        let sets = join_fragments(
            ", ",
            self.sets
                .iter()
                .map(|(column, value)| format!("{} = {}", quote_name(column), quote_value(value))),
        );
        join_fragments(
            " ",
            [
                "UPDATE".to_string(),
                conflict_clause(self.conflict),
                quote_name(&self.table),
                format!("SET {sets}"),
                self.filter.where_clause(),
                returning_clause(&self.returning),
                self.filter.tail_clause(),
            ],
        )
    }
}
