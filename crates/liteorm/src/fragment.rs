//! SQL fragments and quoting.
//!
//! Every builder renders through these helpers:
//! - [`quote_identifier`] quotes each dotted segment with backticks
//! - [`quote_value`] quotes literals with single quotes
//! - [`RawSql`] marks text that is already safe and is emitted verbatim
//!
//! Embedded quote characters are escaped by doubling them.

use std::fmt;

const NAME_SEPARATOR: char = '.';
const NAME_QUOTE: char = '`';
const VALUE_QUOTE: char = '\'';
const NAMED_PLACEHOLDER_PREFIX: char = ':';
const POSITIONAL_PLACEHOLDER: &str = "?";

/// SQL text that bypasses quoting.
///
/// **Warning**: the caller is responsible for the safety of anything wrapped here.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawSql(String);

impl RawSql {
    pub fn new(sql: impl Into<String>) -> Self {
        Self(sql.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RawSql {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Wrap trusted SQL text, e.g. `raw_sql("position + 1")`.
pub fn raw_sql(sql: impl Into<String>) -> RawSql {
    RawSql::new(sql)
}

/// Named placeholder (`:name`).
pub fn placeholder(name: &str) -> RawSql {
    RawSql(format!("{NAMED_PLACEHOLDER_PREFIX}{name}"))
}

/// Positional placeholder (`?`).
pub fn positional_placeholder() -> RawSql {
    RawSql(POSITIONAL_PLACEHOLDER.to_string())
}

/// A piece of SQL that is either quoted on output or emitted raw.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Fragment {
    Text(String),
    Raw(RawSql),
}

impl Fragment {
    pub fn is_empty(&self) -> bool {
        match self {
            Fragment::Text(s) => s.is_empty(),
            Fragment::Raw(raw) => raw.0.is_empty(),
        }
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, Fragment::Raw(_))
    }

    /// The unquoted text.
    pub fn as_str(&self) -> &str {
        match self {
            Fragment::Text(s) => s,
            Fragment::Raw(raw) => raw.as_str(),
        }
    }
}

impl From<&str> for Fragment {
    fn from(s: &str) -> Self {
        Fragment::Text(s.to_string())
    }
}

impl From<String> for Fragment {
    fn from(s: String) -> Self {
        Fragment::Text(s)
    }
}

impl From<&String> for Fragment {
    fn from(s: &String) -> Self {
        Fragment::Text(s.clone())
    }
}

impl From<RawSql> for Fragment {
    fn from(raw: RawSql) -> Self {
        Fragment::Raw(raw)
    }
}

impl From<&Fragment> for Fragment {
    fn from(f: &Fragment) -> Self {
        f.clone()
    }
}

// Numbers are already safe literals.
macro_rules! numeric_fragment {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Fragment {
                fn from(n: $ty) -> Self {
                    Fragment::Raw(RawSql(n.to_string()))
                }
            }
        )*
    };
}

numeric_fragment!(i32, i64, u32, u64);

/// A float as a SQL literal. SQLite has no infinity or NaN literal: overflowing
/// exponents read back as infinities and NaN is stored as NULL.
pub fn real_literal(r: f64) -> RawSql {
    if r.is_nan() {
        RawSql("NULL".to_string())
    } else if r.is_infinite() {
        RawSql(if r > 0.0 { "9e999" } else { "-9e999" }.to_string())
    } else {
        RawSql(r.to_string())
    }
}

impl From<f64> for Fragment {
    fn from(r: f64) -> Self {
        Fragment::Raw(real_literal(r))
    }
}

/// An expression with an optional `AS` alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aliased {
    pub expr: Fragment,
    pub alias: Option<String>,
}

impl Aliased {
    pub fn new(expr: impl Into<Fragment>, alias: Option<&str>) -> Self {
        Self {
            expr: expr.into(),
            alias: alias.map(str::to_string),
        }
    }

    pub fn to_sql(&self) -> String {
        match &self.alias {
            Some(alias) => format!(
                "{} AS {}",
                quote_identifier(&self.expr),
                quote_name(alias)
            ),
            None => quote_identifier(&self.expr),
        }
    }
}

impl From<Fragment> for Aliased {
    fn from(expr: Fragment) -> Self {
        Self { expr, alias: None }
    }
}

impl From<&str> for Aliased {
    fn from(expr: &str) -> Self {
        Fragment::from(expr).into()
    }
}

impl From<String> for Aliased {
    fn from(expr: String) -> Self {
        Fragment::from(expr).into()
    }
}

impl From<RawSql> for Aliased {
    fn from(expr: RawSql) -> Self {
        Fragment::from(expr).into()
    }
}

fn escape(s: &str, quote: char) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for ch in s.chars() {
        if ch == quote {
            out.push(quote);
        }
        out.push(ch);
    }
    out.push(quote);
    out
}

/// Quote a plain (possibly dotted) name.
pub fn quote_name(name: &str) -> String {
    if name == "*" {
        return name.to_string();
    }
    match name.split_once(NAME_SEPARATOR) {
        Some((head, tail)) => format!("{}{}{}", quote_name(head), NAME_SEPARATOR, quote_name(tail)),
        None => escape(name, NAME_QUOTE),
    }
}

/// Quote an identifier.
///
/// Dotted names are split on the first separator and each side is quoted
/// recursively; `*` and raw fragments pass through unchanged.
pub fn quote_identifier(name: &Fragment) -> String {
    match name {
        Fragment::Raw(raw) => raw.0.clone(),
        Fragment::Text(text) => quote_name(text),
    }
}

/// Quote a literal value; raw fragments pass through unchanged.
pub fn quote_value(value: &Fragment) -> String {
    match value {
        Fragment::Raw(raw) => raw.0.clone(),
        Fragment::Text(text) => escape(text, VALUE_QUOTE),
    }
}

/// Join the non-empty items with `separator`.
pub fn join_fragments<I, S>(separator: &str, items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for item in items {
        let item = item.as_ref();
        if item.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push_str(separator);
        }
        out.push_str(item);
    }
    out
}

/// Like [`join_fragments`], then wrap in `start`/`end` when the result is
/// non-empty (or always, with `force`).
pub fn join_wrapped<I, S>(separator: &str, items: I, start: &str, end: &str, force: bool) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let joined = join_fragments(separator, items);
    if force || !joined.is_empty() {
        format!("{start}{joined}{end}")
    } else {
        joined
    }
}

/// Join aliased expressions as `expr AS alias`.
pub fn join_aliased<'a, I>(separator: &str, items: I) -> String
where
    I: IntoIterator<Item = &'a Aliased>,
{
    join_fragments(separator, items.into_iter().map(Aliased::to_sql))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_simple_identifier() {
        assert_eq!(quote_identifier(&"users".into()), "`users`");
    }

    #[test]
    fn quotes_dotted_identifier_per_segment() {
        assert_eq!(quote_identifier(&"a.b".into()), "`a`.`b`");
        assert_eq!(quote_identifier(&"main.users.id".into()), "`main`.`users`.`id`");
    }

    #[test]
    fn star_passes_through() {
        assert_eq!(quote_identifier(&"*".into()), "*");
        assert_eq!(quote_identifier(&"q.*".into()), "`q`.*");
    }

    #[test]
    fn raw_passes_through() {
        let raw: Fragment = raw_sql("count(*)").into();
        assert_eq!(quote_identifier(&raw), "count(*)");
        assert_eq!(quote_value(&raw), "count(*)");
    }

    #[test]
    fn embedded_quotes_are_doubled() {
        assert_eq!(quote_identifier(&"we`ird".into()), "`we``ird`");
        assert_eq!(quote_value(&"it's".into()), "'it''s'");
    }

    #[test]
    fn placeholders() {
        assert_eq!(placeholder("id").as_str(), ":id");
        assert_eq!(positional_placeholder().as_str(), "?");
    }

    #[test]
    fn non_finite_floats_stay_literals() {
        assert_eq!(quote_value(&f64::INFINITY.into()), "9e999");
        assert_eq!(quote_value(&f64::NEG_INFINITY.into()), "-9e999");
        assert_eq!(quote_value(&f64::NAN.into()), "NULL");
        assert_eq!(quote_value(&2.5f64.into()), "2.5");
    }

    #[test]
    fn join_skips_empty_items() {
        assert_eq!(join_fragments(" ", ["SELECT", "", "*"]), "SELECT *");
        assert_eq!(join_fragments(", ", Vec::<String>::new()), "");
    }

    #[test]
    fn wrap_only_when_non_empty() {
        assert_eq!(join_wrapped(", ", ["a", "b"], "(", ")", false), "(a, b)");
        assert_eq!(join_wrapped(", ", ["", ""], "(", ")", false), "");
        assert_eq!(join_wrapped(", ", [""], "(", ")", true), "()");
    }

    #[test]
    fn aliased_rendering() {
        let items = vec![
            Aliased::new("id", None),
            Aliased::new(raw_sql("count(*)"), Some("total")),
        ];
        assert_eq!(join_aliased(", ", &items), "`id`, count(*) AS `total`");
    }
}
