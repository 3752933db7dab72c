use super::traits::SqlBuilder;
use crate::column::Column;
use crate::error::{OrmError, OrmResult};
use crate::fragment::quote_name;

/// The single change an ALTER TABLE statement performs.
#[derive(Debug, Clone, PartialEq)]
pub enum AlterAction {
    RenameTable(String),
    RenameColumn { from: String, to: String },
    AddColumn(Column),
    DropColumn(String),
}

/// ALTER TABLE statement builder.
///
/// SQLite applies one action per statement; setting another action replaces
/// the previous one.
#[derive(Debug, Clone, PartialEq)]
pub struct AlterTable {
    name: String,
    action: Option<AlterAction>,
}

impl AlterTable {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            action: None,
        }
    }

    pub fn action(mut self, action: AlterAction) -> Self {
        self.action = Some(action);
        self
    }

    pub fn rename_to(self, new_name: &str) -> Self {
        self.action(AlterAction::RenameTable(new_name.to_string()))
    }

    pub fn rename_column(self, from: &str, to: &str) -> Self {
        self.action(AlterAction::RenameColumn {
            from: from.to_string(),
            to: to.to_string(),
        })
    }

    pub fn add_column(self, column: Column) -> Self {
        self.action(AlterAction::AddColumn(column))
    }

    pub fn drop_column(self, name: &str) -> Self {
        self.action(AlterAction::DropColumn(name.to_string()))
    }
}

impl SqlBuilder for AlterTable {
    fn validate(&self) -> OrmResult<()> {
        if self.action.is_none() {
            return Err(OrmError::build(format!(
                "ALTER TABLE {} has no action",
                self.name
            )));
        }
        Ok(())
    }

    fn render(&self) -> String {
        let action = match &self.action {
            Some(AlterAction::RenameTable(to)) => format!("RENAME TO {}", quote_name(to)),
            Some(AlterAction::RenameColumn { from, to }) => {
                format!("RENAME COLUMN {} TO {}", quote_name(from), quote_name(to))
            }
            Some(AlterAction::AddColumn(column)) => format!("ADD COLUMN {}", column.to_sql()),
            Some(AlterAction::DropColumn(column)) => format!("DROP COLUMN {}", quote_name(column)),
            None => return format!("ALTER TABLE {}", quote_name(&self.name)),
        };
        format!("ALTER TABLE {} {action}", quote_name(&self.name))
    }
}
