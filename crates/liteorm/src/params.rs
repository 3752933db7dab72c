//! Named statement parameters.

use crate::value::Value;

const PREFIX: char = ':';

/// Ordered named parameters for a statement.
///
/// Names are stored without the `:` prefix; either spelling is accepted.
/// Purely numeric names address positional (`?`) placeholders, counted from 1.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params(Vec<(String, Value)>);

fn normalize(name: &str) -> &str {
    name.strip_prefix(PREFIX).unwrap_or(name)
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Positional parameters, bound to `?` placeholders in order.
    pub fn positional<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self(
            values
                .into_iter()
                .enumerate()
                .map(|(i, v)| ((i + 1).to_string(), v.into()))
                .collect(),
        )
    }

    /// Add or replace a parameter.
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: &str, value: impl Into<Value>) {
        let name = normalize(name);
        let value = value.into();
        match self.0.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = value,
            None => self.0.push((name.to_string(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        let name = normalize(name);
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn extend(&mut self, other: Params) {
        for (name, value) in other.0 {
            self.set(&name, value);
        }
    }
}

impl<S: AsRef<str>, V: Into<Value>> FromIterator<(S, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (S, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (name, value) in iter {
            params.set(name.as_ref(), value);
        }
        params
    }
}

/// Build [`Params`] from `name => value` pairs.
///
/// ```
/// use liteorm::params;
///
/// let p = params! { "id" => 1, ":text" => "hello" };
/// assert_eq!(p.len(), 2);
/// ```
#[macro_export]
macro_rules! params {
    () => {
        $crate::Params::new()
    };
    ($($name:expr => $value:expr),+ $(,)?) => {
        $crate::Params::new()$(.with($name, $value))+
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_is_optional() {
        let p = Params::new().with(":id", 3).with("text", "x");
        assert_eq!(p.get("id"), Some(&Value::Integer(3)));
        assert_eq!(p.get(":text"), Some(&Value::Text("x".into())));
    }

    #[test]
    fn later_value_replaces_earlier() {
        let p = crate::params! { "id" => 1, ":id" => 2 };
        assert_eq!(p.len(), 1);
        assert_eq!(p.get("id"), Some(&Value::Integer(2)));
    }

    #[test]
    fn positional_names_count_from_one() {
        let p = Params::positional([10, 20]);
        assert_eq!(p.get("1"), Some(&Value::Integer(10)));
        assert_eq!(p.get("2"), Some(&Value::Integer(20)));
    }
}
