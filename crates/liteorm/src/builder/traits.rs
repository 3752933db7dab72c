use crate::database::{Database, ResultSet};
use crate::error::OrmResult;
use crate::params::Params;

/// Base trait for SQL builders.
///
/// Builders only produce text. [`execute`](SqlBuilder::execute) and
/// [`fetch`](SqlBuilder::fetch) hand the built statement to a [`Database`].
pub trait SqlBuilder {
    /// Render the statement without checking it.
    fn render(&self) -> String;

    /// Validate builder state.
    fn validate(&self) -> OrmResult<()> {
        Ok(())
    }

    /// Validate, then render.
    fn build(&self) -> OrmResult<String> {
        self.validate()?;
        Ok(self.render())
    }

    /// Execute and return the number of changed rows.
    fn execute(&self, db: &Database, params: &Params) -> OrmResult<u64> {
        db.execute(&self.build()?, params)
    }

    /// Execute and return every produced row.
    fn fetch(&self, db: &Database, params: &Params) -> OrmResult<ResultSet> {
        db.query(&self.build()?, params)
    }
}
