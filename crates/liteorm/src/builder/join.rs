use crate::error::{OrmError, OrmResult};
use crate::fragment::{Aliased, join_fragments, join_wrapped, quote_name};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Cross,
    Inner,
    Left,
}

impl JoinKind {
    pub fn as_str(self) -> &'static str {
        match self {
            JoinKind::Cross => "CROSS JOIN",
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
        }
    }
}

/// A JOIN clause for [`Select`](super::Select).
///
/// INNER and LEFT joins take exactly one of `on` or `using`; CROSS joins
/// take neither.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    kind: JoinKind,
    table: String,
    alias: Option<String>,
    on: Option<String>,
    using: Vec<String>,
}

impl Join {
    fn new(kind: JoinKind, table: &str) -> Self {
        Self {
            kind,
            table: table.to_string(),
            alias: None,
            on: None,
            using: Vec::new(),
        }
    }

    pub fn cross(table: &str) -> Self {
        Self::new(JoinKind::Cross, table)
    }

    pub fn inner(table: &str) -> Self {
        Self::new(JoinKind::Inner, table)
    }

    pub fn left(table: &str) -> Self {
        Self::new(JoinKind::Left, table)
    }

    pub fn alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.to_string());
        self
    }

    /// Join condition, emitted verbatim.
    pub fn on(mut self, condition: impl Into<String>) -> Self {
        self.on = Some(condition.into());
        self
    }

    pub fn using<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.using.extend(columns.into_iter().map(Into::into));
        self
    }

    pub fn kind(&self) -> JoinKind {
        self.kind
    }

    pub fn validate(&self) -> OrmResult<()> {
        let has_on = self.on.is_some();
        let has_using = !self.using.is_empty();
        match self.kind {
            JoinKind::Cross if has_on || has_using => Err(OrmError::build(format!(
                "CROSS JOIN {} takes neither ON nor USING",
                self.table
            ))),
            JoinKind::Inner | JoinKind::Left if has_on == has_using => {
                Err(OrmError::build(format!(
                    "{} {} needs exactly one of ON or USING",
                    self.kind.as_str(),
                    self.table
                )))
            }
            _ => Ok(()),
        }
    }

    pub fn render(&self) -> String {
        let table = Aliased::new(self.table.as_str(), self.alias.as_deref()).to_sql();
        let constraint = match (&self.on, self.using.is_empty()) {
            (Some(on), _) => format!("ON {on}"),
            (None, false) => format!(
                "USING {}",
                join_wrapped(", ", self.using.iter().map(|c| quote_name(c)), "(", ")", true)
            ),
            (None, true) => String::new(),
        };
        join_fragments(" ", [self.kind.as_str().to_string(), table, constraint])
    }

    pub fn build(&self) -> OrmResult<String> {
        self.validate()?;
        Ok(self.render())
    }
}
