use super::traits::SqlBuilder;
use crate::fragment::quote_name;

/// DROP TABLE statement builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropTable {
    name: String,
    if_exists: bool,
}

impl DropTable {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            if_exists: false,
        }
    }

    pub fn if_exists(mut self, yes: bool) -> Self {
        self.if_exists = yes;
        self
    }
}

impl SqlBuilder for DropTable {
    fn render(&self) -> String {
        if self.if_exists {
            format!("DROP TABLE IF EXISTS {}", quote_name(&self.name))
        } else {
            format!("DROP TABLE {}", quote_name(&self.name))
        }
    }
}
