//! Statement tracing.

use crate::params::Params;
use crate::value::Value;
use std::time::Duration;
use tracing::Level;

const REDACTED: &str = "<redacted>";

/// The kind of statement being executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryType {
    Select,
    Insert,
    Update,
    Delete,
    /// CREATE / ALTER / DROP
    Ddl,
    Other,
}

impl QueryType {
    /// Classify a statement by its leading keyword.
    pub fn from_sql(sql: &str) -> Self {
        let keyword = sql
            .trim_start()
            .split(|c: char| !c.is_ascii_alphabetic())
            .next()
            .unwrap_or_default()
            .to_ascii_uppercase();
        match keyword.as_str() {
            "SELECT" | "VALUES" => QueryType::Select,
            "INSERT" | "REPLACE" => QueryType::Insert,
            "UPDATE" => QueryType::Update,
            "DELETE" => QueryType::Delete,
            "CREATE" | "ALTER" | "DROP" => QueryType::Ddl,
            _ => QueryType::Other,
        }
    }
}

fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

/// Emits `tracing` events (target `liteorm.sql`) around each executed statement.
///
/// Parameter values are logged only when `log_values` is set. Parameters
/// named in `redact` are masked even then.
#[derive(Debug, Clone)]
pub struct TracingSqlHook {
    pub level: Level,
    /// Truncate long SQL strings (in bytes). `None` means no truncation.
    pub max_sql_length: Option<usize>,
    pub log_values: bool,
    /// Longest text value logged before truncation, in bytes.
    pub max_value_length: usize,
    pub redact: Vec<String>,
}

impl Default for TracingSqlHook {
    fn default() -> Self {
        Self {
            level: Level::DEBUG,
            max_sql_length: Some(200),
            log_values: false,
            max_value_length: 32,
            redact: Vec::new(),
        }
    }
}

macro_rules! emit_at_level {
    ($level:expr, $($field:tt)*) => {
        match $level {
            Level::ERROR => tracing::error!($($field)*),
            Level::WARN => tracing::warn!($($field)*),
            Level::INFO => tracing::info!($($field)*),
            Level::DEBUG => tracing::debug!($($field)*),
            Level::TRACE => tracing::trace!($($field)*),
        }
    };
}

impl TracingSqlHook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    /// Log bound values next to parameter names.
    pub fn log_values(mut self, enabled: bool) -> Self {
        self.log_values = enabled;
        self
    }

    pub fn max_value_length(mut self, len: usize) -> Self {
        self.max_value_length = len;
        self
    }

    /// Never log the value of this parameter.
    pub fn redact(mut self, name: impl Into<String>) -> Self {
        self.redact.push(name.into());
        self
    }

    fn truncate_sql(&self, sql: &str) -> String {
        match self.max_sql_length {
            Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
            _ => sql.to_string(),
        }
    }

    fn render_value(&self, name: &str, value: &Value) -> String {
        if self.redact.iter().any(|r| r == name) {
            return REDACTED.to_string();
        }
        match value {
            Value::Text(text) if text.len() > self.max_value_length => {
                format!("'{}...'", truncate_sql_bytes(text, self.max_value_length))
            }
            Value::Text(text) => format!("'{text}'"),
            other => other.to_string(),
        }
    }

    /// `name=value` pairs, or bare names when values are not logged.
    fn render_params(&self, params: &Params) -> Vec<String> {
        params
            .iter()
            .map(|(name, value)| {
                if self.log_values {
                    format!("{name}={}", self.render_value(name, value))
                } else {
                    name.to_string()
                }
            })
            .collect()
    }

    /// Log a statement right before it runs.
    pub fn before_statement(&self, sql: &str, params: &Params) {
        let sql_text = self.truncate_sql(sql);
        let rendered = self.render_params(params);
        emit_at_level!(
            self.level,
            target: "liteorm.sql",
            query_type = ?QueryType::from_sql(sql),
            param_count = params.len(),
            sql = %sql_text,
            params = ?rendered,
        );
    }

    /// Log what a statement did once it finished.
    pub fn after_statement(&self, sql: &str, rows: usize, changes: u64, elapsed: Duration) {
        emit_at_level!(
            self.level,
            target: "liteorm.sql",
            query_type = ?QueryType::from_sql(sql),
            rows,
            changes,
            elapsed_us = elapsed.as_micros() as u64,
            "statement finished"
        );
    }
}
