use super::clause::{Filter, Filtered};
use super::join::Join;
use super::traits::SqlBuilder;
use crate::error::OrmResult;
use crate::fragment::{Aliased, Fragment, join_aliased, join_fragments, quote_identifier, quote_name, quote_value, raw_sql};

#[derive(Debug, Clone, PartialEq)]
enum Source {
    Table(Aliased),
    Subquery(Box<Select>, String),
}

impl Source {
    fn to_sql(&self) -> String {
        match self {
            Source::Table(table) => table.to_sql(),
            Source::Subquery(select, alias) => {
                format!("({}) AS {}", select.render(), quote_name(alias))
            }
        }
    }
}

/// SELECT statement builder.
///
/// Clauses are emitted in SQL order regardless of call order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Select {
    distinct: bool,
    columns: Vec<Aliased>,
    sources: Vec<Source>,
    joins: Vec<Join>,
    filter: Filter,
    group_by: Vec<Fragment>,
    having: Option<String>,
}

impl Select {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Add a column or expression; text is quoted as an identifier.
    pub fn column(mut self, expr: impl Into<Fragment>) -> Self {
        self.columns.push(Aliased::new(expr, None));
        self
    }

    pub fn column_as(mut self, expr: impl Into<Fragment>, alias: &str) -> Self {
        self.columns.push(Aliased::new(expr, Some(alias)));
        self
    }

    pub fn columns<I, F>(self, exprs: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<Fragment>,
    {
        exprs.into_iter().fold(self, |select, expr| select.column(expr))
    }

    /// Add a literal; text is quoted as a value.
    pub fn value(mut self, value: impl Into<Fragment>) -> Self {
        let literal = quote_value(&value.into());
        self.columns.push(Aliased::new(raw_sql(literal), None));
        self
    }

    pub fn value_as(mut self, value: impl Into<Fragment>, alias: &str) -> Self {
        let literal = quote_value(&value.into());
        self.columns.push(Aliased::new(raw_sql(literal), Some(alias)));
        self
    }

    pub fn from_table(mut self, table: &str) -> Self {
        self.sources.push(Source::Table(Aliased::new(table, None)));
        self
    }

    pub fn from_table_as(mut self, table: &str, alias: &str) -> Self {
        self.sources
            .push(Source::Table(Aliased::new(table, Some(alias))));
        self
    }

    pub fn from_subquery(mut self, select: Select, alias: &str) -> Self {
        self.sources
            .push(Source::Subquery(Box::new(select), alias.to_string()));
        self
    }

    pub fn join(mut self, join: Join) -> Self {
        self.joins.push(join);
        self
    }

    pub fn group_by(mut self, expr: impl Into<Fragment>) -> Self {
        self.group_by.push(expr.into());
        self
    }

    /// HAVING condition, emitted verbatim.
    pub fn having(mut self, condition: impl Into<String>) -> Self {
        self.having = Some(condition.into());
        self
    }
}

impl Filtered for Select {
    fn filter_mut(&mut self) -> &mut Filter {
        &mut self.filter
    }
}

impl SqlBuilder for Select {
    fn validate(&self) -> OrmResult<()> {
        self.filter.validate()?;
        for join in &self.joins {
            join.validate()?;
        }
        for source in &self.sources {
            if let Source::Subquery(select, _) = source {
                select.validate()?;
            }
        }
        Ok(())
    }

    fn render(&self) -> String {
        let columns = if self.columns.is_empty() {
            "*".to_string()
        } else {
            join_aliased(", ", &self.columns)
        };
        let sources = join_fragments(", ", self.sources.iter().map(Source::to_sql));
        let group_by = join_fragments(", ", self.group_by.iter().map(quote_identifier));

        join_fragments(
            " ",
            [
                "SELECT".to_string(),
                if self.distinct { "DISTINCT" } else { "" }.to_string(),
                columns,
                if sources.is_empty() {
                    String::new()
                } else {
                    format!("FROM {sources}")
                },
                join_fragments(" ", self.joins.iter().map(Join::render)),
                self.filter.where_clause(),
                if group_by.is_empty() {
                    String::new()
                } else {
                    format!("GROUP BY {group_by}")
                },
                self.having
                    .as_ref()
                    .map(|h| format!("HAVING {h}"))
                    .unwrap_or_default(),
                self.filter.tail_clause(),
            ],
        )
    }
}
