use crate::trace::TracingSqlHook;

/// Default database file when none is configured.
pub const DEFAULT_PATH: &str = "database.db";

/// How generated values are read back after an INSERT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReturningMode {
    /// Use `RETURNING` when the linked SQLite supports it (3.35.0 and later).
    #[default]
    Auto,
    /// Always use `RETURNING`.
    Native,
    /// Always re-select the inserted row by `_rowid_`.
    Emulate,
}

impl ReturningMode {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "auto" => Some(ReturningMode::Auto),
            "native" => Some(ReturningMode::Native),
            "emulate" => Some(ReturningMode::Emulate),
            _ => None,
        }
    }
}

/// Configuration for [`Database`](crate::Database).
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// File path, or `:memory:`.
    pub path: String,
    /// Create every registered table on registration.
    pub auto_create_tables: bool,
    /// Statement tracing; `None` disables it.
    pub trace: Option<TracingSqlHook>,
    pub returning: ReturningMode,
    /// Create auto-created tables as `TEMPORARY`.
    pub create_temporary: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_PATH.to_string(),
            auto_create_tables: false,
            trace: None,
            returning: ReturningMode::Auto,
            create_temporary: false,
        }
    }
}

fn truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

impl DatabaseConfig {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// An in-memory database.
    pub fn memory() -> Self {
        Self::new(":memory:")
    }

    /// Read `LITEORM_DATABASE`, `LITEORM_AUTO_CREATE`, `LITEORM_TRACE` and
    /// `LITEORM_RETURNING`; unset or unparsable variables keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(path) = lookup("LITEORM_DATABASE").filter(|p| !p.trim().is_empty()) {
            config.path = path;
        }
        if let Some(value) = lookup("LITEORM_AUTO_CREATE") {
            config.auto_create_tables = truthy(&value);
        }
        if lookup("LITEORM_TRACE").is_some_and(|v| truthy(&v)) {
            config.trace = Some(TracingSqlHook::default());
        }
        if let Some(mode) = lookup("LITEORM_RETURNING").and_then(|v| ReturningMode::parse(&v)) {
            config.returning = mode;
        }
        config
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn auto_create_tables(mut self, yes: bool) -> Self {
        self.auto_create_tables = yes;
        self
    }

    /// Toggle statement tracing with the default hook.
    pub fn trace(mut self, enabled: bool) -> Self {
        self.trace = enabled.then(TracingSqlHook::default);
        self
    }

    pub fn trace_hook(mut self, hook: TracingSqlHook) -> Self {
        self.trace = Some(hook);
        self
    }

    pub fn returning(mut self, mode: ReturningMode) -> Self {
        self.returning = mode;
        self
    }

    pub fn create_temporary(mut self, yes: bool) -> Self {
        self.create_temporary = yes;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = DatabaseConfig::default();
        assert_eq!(config.path, DEFAULT_PATH);
        assert!(!config.auto_create_tables);
        assert!(config.trace.is_none());
        assert_eq!(config.returning, ReturningMode::Auto);
    }

    #[test]
    fn reads_environment() {
        let config = DatabaseConfig::from_lookup(env(&[
            ("LITEORM_DATABASE", "quiz.db"),
            ("LITEORM_AUTO_CREATE", "yes"),
            ("LITEORM_TRACE", "1"),
            ("LITEORM_RETURNING", "Emulate"),
        ]));
        assert_eq!(config.path, "quiz.db");
        assert!(config.auto_create_tables);
        assert!(config.trace.is_some());
        assert_eq!(config.returning, ReturningMode::Emulate);
    }

    #[test]
    fn ignores_unparsable_values() {
        let config = DatabaseConfig::from_lookup(env(&[
            ("LITEORM_DATABASE", " "),
            ("LITEORM_TRACE", "nope"),
            ("LITEORM_RETURNING", "sometimes"),
        ]));
        assert_eq!(config.path, DEFAULT_PATH);
        assert!(config.trace.is_none());
        assert_eq!(config.returning, ReturningMode::Auto);
    }

    #[test]
    fn builder_methods() {
        let config = DatabaseConfig::memory()
            .auto_create_tables(true)
            .trace(true)
            .returning(ReturningMode::Native);
        assert_eq!(config.path, ":memory:");
        assert!(config.auto_create_tables);
        assert!(config.trace.is_some());
        assert_eq!(config.returning, ReturningMode::Native);
    }
}
