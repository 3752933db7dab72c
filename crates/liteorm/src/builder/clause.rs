//! Clause state shared by several statements, with fluent mixin traits.
//!
//! A builder owns the state (`Filter`, a conflict action, a RETURNING list)
//! and exposes it through one accessor; the trait supplies the fluent API.

use crate::error::{OrmError, OrmResult};
use crate::fragment::{Aliased, Fragment, join_aliased, join_fragments, quote_identifier};

/// WHERE / ORDER BY / LIMIT / OFFSET state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    condition: Option<String>,
    orders: Vec<(Fragment, bool)>,
    limit: Option<u64>,
    offset: u64,
}

impl Filter {
    pub fn has_condition(&self) -> bool {
        self.condition.is_some()
    }

    pub fn validate(&self) -> OrmResult<()> {
        if self.offset > 0 && self.limit.is_none() {
            return Err(OrmError::build(format!(
                "OFFSET {} requires a LIMIT",
                self.offset
            )));
        }
        Ok(())
    }

    /// `WHERE condition`, or nothing.
    pub fn where_clause(&self) -> String {
        match &self.condition {
            Some(condition) => format!("WHERE {condition}"),
            None => String::new(),
        }
    }

    /// `ORDER BY ... LIMIT n OFFSET m`, skipping the absent parts.
    pub fn tail_clause(&self) -> String {
        let orders = join_fragments(
            ", ",
            self.orders.iter().map(|(expr, desc)| {
                if *desc {
                    format!("{} DESC", quote_identifier(expr))
                } else {
                    quote_identifier(expr)
                }
            }),
        );
        join_fragments(
            " ",
            [
                if orders.is_empty() {
                    String::new()
                } else {
                    format!("ORDER BY {orders}")
                },
                self.limit.map(|n| format!("LIMIT {n}")).unwrap_or_default(),
                if self.offset > 0 {
                    format!("OFFSET {}", self.offset)
                } else {
                    String::new()
                },
            ],
        )
    }
}

/// Fluent WHERE / ORDER BY / LIMIT / OFFSET.
pub trait Filtered: Sized {
    fn filter_mut(&mut self) -> &mut Filter;

    /// Set the condition; it is emitted verbatim.
    fn where_(mut self, condition: impl Into<String>) -> Self {
        self.filter_mut().condition = Some(condition.into());
        self
    }

    fn order_by(mut self, expr: impl Into<Fragment>) -> Self {
        self.filter_mut().orders.push((expr.into(), false));
        self
    }

    fn order_by_desc(mut self, expr: impl Into<Fragment>) -> Self {
        self.filter_mut().orders.push((expr.into(), true));
        self
    }

    fn limit(mut self, limit: u64) -> Self {
        self.filter_mut().limit = Some(limit);
        self
    }

    fn offset(mut self, offset: u64) -> Self {
        self.filter_mut().offset = offset;
        self
    }
}

/// Explicit opt-in for UPDATE/DELETE statements without a condition.
pub trait ConfirmAllRows: Sized {
    fn confirm_mut(&mut self) -> &mut bool;

    fn all_rows(mut self, confirm: bool) -> Self {
        *self.confirm_mut() = confirm;
        self
    }
}

/// Fail unless the statement is conditioned or all-rows was confirmed.
pub(crate) fn check_all_rows(filter: &Filter, confirmed: bool, verb: &str) -> OrmResult<()> {
    filter.validate()?;
    if !filter.has_condition() && !confirmed {
        return Err(OrmError::build(format!(
            "{verb} without WHERE would touch every row; confirm with all_rows(true)"
        )));
    }
    Ok(())
}

/// `OR <action>` conflict resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictAction {
    Abort,
    Fail,
    Ignore,
    Replace,
    Rollback,
}

impl ConflictAction {
    pub fn as_str(self) -> &'static str {
        match self {
            ConflictAction::Abort => "ABORT",
            ConflictAction::Fail => "FAIL",
            ConflictAction::Ignore => "IGNORE",
            ConflictAction::Replace => "REPLACE",
            ConflictAction::Rollback => "ROLLBACK",
        }
    }
}

pub(crate) fn conflict_clause(action: Option<ConflictAction>) -> String {
    action
        .map(|a| format!("OR {}", a.as_str()))
        .unwrap_or_default()
}

pub trait Conflicting: Sized {
    fn conflict_mut(&mut self) -> &mut Option<ConflictAction>;

    fn or_action(mut self, action: ConflictAction) -> Self {
        *self.conflict_mut() = Some(action);
        self
    }

    fn or_abort(self) -> Self {
        self.or_action(ConflictAction::Abort)
    }

    fn or_fail(self) -> Self {
        self.or_action(ConflictAction::Fail)
    }

    fn or_ignore(self) -> Self {
        self.or_action(ConflictAction::Ignore)
    }

    fn or_replace(self) -> Self {
        self.or_action(ConflictAction::Replace)
    }

    fn or_rollback(self) -> Self {
        self.or_action(ConflictAction::Rollback)
    }
}

pub(crate) fn returning_clause(items: &[Aliased]) -> String {
    if items.is_empty() {
        String::new()
    } else {
        format!("RETURNING {}", join_aliased(", ", items))
    }
}

pub trait Returning: Sized {
    fn returning_mut(&mut self) -> &mut Vec<Aliased>;

    fn returning(mut self, expr: impl Into<Fragment>) -> Self {
        self.returning_mut().push(Aliased::new(expr, None));
        self
    }

    fn returning_as(mut self, expr: impl Into<Fragment>, alias: &str) -> Self {
        self.returning_mut().push(Aliased::new(expr, Some(alias)));
        self
    }

    fn returning_all(self) -> Self {
        self.returning("*")
    }
}
