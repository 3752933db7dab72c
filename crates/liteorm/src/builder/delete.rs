use super::clause::{
    ConfirmAllRows, Filter, Filtered, Returning, check_all_rows, returning_clause,
};
use super::traits::SqlBuilder;
use crate::error::OrmResult;
use crate::fragment::{Aliased, join_fragments, quote_name};

/// DELETE statement builder.
///
/// Deleting without a condition requires [`ConfirmAllRows::all_rows`].
#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    table: String,
    filter: Filter,
    all_rows: bool,
    returning: Vec<Aliased>,
}

impl Delete {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            filter: Filter::default(),
            all_rows: false,
            returning: Vec::new(),
        }
    }
}

impl Filtered for Delete {
    fn filter_mut(&mut self) -> &mut Filter {
        &mut self.filter
    }
}

impl ConfirmAllRows for Delete {
    fn confirm_mut(&mut self) -> &mut bool {
        &mut self.all_rows
    }
}

impl Returning for Delete {
    fn returning_mut(&mut self) -> &mut Vec<Aliased> {
        &mut self.returning
    }
}

impl SqlBuilder for Delete {
    fn validate(&self) -> OrmResult<()> {
        check_all_rows(&self.filter, self.all_rows, "DELETE")
    }

    fn render(&self) -> String {
        join_fragments(
            " ",
            [
                format!("DELETE FROM {}", quote_name(&self.table)),
                self.filter.where_clause(),
                returning_clause(&self.returning),
                self.filter.tail_clause(),
            ],
        )
    }
}
