//! In-memory field values and conversions from and to Rust types.

use crate::error::{JsonError, JsonResult};
use indexmap::IndexMap;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// Field values of one model instance, keyed by field name.
pub type Record = IndexMap<String, Attr>;

/// The value of one model field.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Attr {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<Attr>),
    Map(IndexMap<String, Attr>),
    /// A nested model.
    Record(Record),
}

impl Attr {
    pub fn kind(&self) -> &'static str {
        match self {
            Attr::Null => "null",
            Attr::Bool(_) => "boolean",
            Attr::Integer(_) => "integer",
            Attr::Float(_) => "float",
            Attr::String(_) => "string",
            Attr::List(_) => "list",
            Attr::Map(_) => "map",
            Attr::Record(_) => "record",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Attr::Null)
    }

    fn mismatch(&self, expected: &'static str) -> JsonError {
        JsonError::type_mismatch(expected, self.kind())
    }
}

/// Conversion of a field into an [`Attr`].
pub trait ToAttr {
    fn to_attr(&self) -> Attr;
}

/// Conversion of an [`Attr`] back into a field.
pub trait FromAttr: Sized {
    fn from_attr(attr: Attr) -> JsonResult<Self>;
}

impl ToAttr for Attr {
    fn to_attr(&self) -> Attr {
        self.clone()
    }
}

impl FromAttr for Attr {
    fn from_attr(attr: Attr) -> JsonResult<Self> {
        Ok(attr)
    }
}

impl ToAttr for bool {
    fn to_attr(&self) -> Attr {
        Attr::Bool(*self)
    }
}

impl FromAttr for bool {
    fn from_attr(attr: Attr) -> JsonResult<Self> {
        match attr {
            Attr::Bool(b) => Ok(b),
            other => Err(other.mismatch("boolean")),
        }
    }
}

macro_rules! integer_attr {
    ($($ty:ty),*) => {
        $(
            impl ToAttr for $ty {
                fn to_attr(&self) -> Attr {
                    Attr::Integer(i64::from(*self))
                }
            }

            impl FromAttr for $ty {
                fn from_attr(attr: Attr) -> JsonResult<Self> {
                    match attr {
                        Attr::Integer(i) => <$ty>::try_from(i)
                            .map_err(|_| JsonError::type_mismatch(stringify!($ty), "integer")),
                        other => Err(other.mismatch("integer")),
                    }
                }
            }
        )*
    };
}

integer_attr!(i64, i32, u32);

impl ToAttr for f64 {
    fn to_attr(&self) -> Attr {
        Attr::Float(*self)
    }
}

impl FromAttr for f64 {
    fn from_attr(attr: Attr) -> JsonResult<Self> {
        match attr {
            Attr::Float(f) => Ok(f),
            Attr::Integer(i) => Ok(i as f64),
            other => Err(other.mismatch("float")),
        }
    }
}

impl ToAttr for String {
    fn to_attr(&self) -> Attr {
        Attr::String(self.clone())
    }
}

impl ToAttr for str {
    fn to_attr(&self) -> Attr {
        Attr::String(self.to_string())
    }
}

impl FromAttr for String {
    fn from_attr(attr: Attr) -> JsonResult<Self> {
        match attr {
            Attr::String(s) => Ok(s),
            other => Err(other.mismatch("string")),
        }
    }
}

impl<T: ToAttr> ToAttr for Option<T> {
    fn to_attr(&self) -> Attr {
        self.as_ref().map_or(Attr::Null, ToAttr::to_attr)
    }
}

impl<T: FromAttr> FromAttr for Option<T> {
    fn from_attr(attr: Attr) -> JsonResult<Self> {
        match attr {
            Attr::Null => Ok(None),
            other => T::from_attr(other).map(Some),
        }
    }
}

impl<T: ToAttr> ToAttr for Vec<T> {
    fn to_attr(&self) -> Attr {
        Attr::List(self.iter().map(ToAttr::to_attr).collect())
    }
}

impl<T: FromAttr> FromAttr for Vec<T> {
    fn from_attr(attr: Attr) -> JsonResult<Self> {
        match attr {
            Attr::List(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| T::from_attr(item).map_err(|e| e.at(i.to_string())))
                .collect(),
            other => Err(other.mismatch("list")),
        }
    }
}

fn take_items<const N: usize>(attr: Attr) -> JsonResult<[Attr; N]> {
    match attr {
        Attr::List(items) => {
            let found = items.len();
            items
                .try_into()
                .map_err(|_| JsonError::Arity { expected: N, found })
        }
        other => Err(other.mismatch("list")),
    }
}

impl<A: ToAttr, B: ToAttr> ToAttr for (A, B) {
    fn to_attr(&self) -> Attr {
        Attr::List(vec![self.0.to_attr(), self.1.to_attr()])
    }
}

impl<A: FromAttr, B: FromAttr> FromAttr for (A, B) {
    fn from_attr(attr: Attr) -> JsonResult<Self> {
        let [a, b] = take_items::<2>(attr)?;
        Ok((
            A::from_attr(a).map_err(|e| e.at("0"))?,
            B::from_attr(b).map_err(|e| e.at("1"))?,
        ))
    }
}

impl<A: ToAttr, B: ToAttr, C: ToAttr> ToAttr for (A, B, C) {
    fn to_attr(&self) -> Attr {
        Attr::List(vec![self.0.to_attr(), self.1.to_attr(), self.2.to_attr()])
    }
}

impl<A: FromAttr, B: FromAttr, C: FromAttr> FromAttr for (A, B, C) {
    fn from_attr(attr: Attr) -> JsonResult<Self> {
        let [a, b, c] = take_items::<3>(attr)?;
        Ok((
            A::from_attr(a).map_err(|e| e.at("0"))?,
            B::from_attr(b).map_err(|e| e.at("1"))?,
            C::from_attr(c).map_err(|e| e.at("2"))?,
        ))
    }
}

fn map_to_attr<'a, T: ToAttr + 'a>(entries: impl Iterator<Item = (&'a String, &'a T)>) -> Attr {
    Attr::Map(entries.map(|(k, v)| (k.clone(), v.to_attr())).collect())
}

fn map_from_attr<T: FromAttr, M: FromIterator<(String, T)>>(attr: Attr) -> JsonResult<M> {
    match attr {
        Attr::Map(entries) | Attr::Record(entries) => entries
            .into_iter()
            .map(|(k, v)| match T::from_attr(v) {
                Ok(v) => Ok((k, v)),
                Err(e) => Err(e.at(k)),
            })
            .collect(),
        other => Err(other.mismatch("map")),
    }
}

impl<T: ToAttr, S: BuildHasher> ToAttr for IndexMap<String, T, S> {
    fn to_attr(&self) -> Attr {
        map_to_attr(self.iter())
    }
}

impl<T: FromAttr, S: BuildHasher + Default> FromAttr for IndexMap<String, T, S> {
    fn from_attr(attr: Attr) -> JsonResult<Self> {
        map_from_attr(attr)
    }
}

impl<T: ToAttr> ToAttr for BTreeMap<String, T> {
    fn to_attr(&self) -> Attr {
        map_to_attr(self.iter())
    }
}

impl<T: FromAttr> FromAttr for BTreeMap<String, T> {
    fn from_attr(attr: Attr) -> JsonResult<Self> {
        map_from_attr(attr)
    }
}

impl<T: ToAttr, S: BuildHasher> ToAttr for HashMap<String, T, S> {
    fn to_attr(&self) -> Attr {
        map_to_attr(self.iter())
    }
}

impl<T: FromAttr, S: BuildHasher + Default> FromAttr for HashMap<String, T, S> {
    fn from_attr(attr: Attr) -> JsonResult<Self> {
        map_from_attr(attr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_map_to_null() {
        assert_eq!(None::<i64>.to_attr(), Attr::Null);
        assert_eq!(Option::<String>::from_attr(Attr::Null).unwrap(), None);
        assert_eq!(Some(3i64).to_attr(), Attr::Integer(3));
    }

    #[test]
    fn required_fields_reject_null() {
        let err = i64::from_attr(Attr::Null).unwrap_err();
        assert_eq!(err.to_string(), "Expected integer, found null");
    }

    #[test]
    fn tuples_check_arity() {
        let pair: (String, i64) =
            FromAttr::from_attr(Attr::List(vec![Attr::String("a".into()), Attr::Integer(1)]))
                .unwrap();
        assert_eq!(pair, ("a".to_string(), 1));

        let err = <(i64, i64)>::from_attr(Attr::List(vec![Attr::Integer(1)])).unwrap_err();
        assert!(matches!(err, JsonError::Arity { expected: 2, found: 1 }));
    }

    #[test]
    fn list_errors_carry_the_index() {
        let err = Vec::<i64>::from_attr(Attr::List(vec![Attr::Integer(1), Attr::Bool(true)]))
            .unwrap_err();
        assert_eq!(err.path(), vec!["1"]);
    }

    #[test]
    fn maps_keep_insertion_order() {
        let mut scores = IndexMap::new();
        scores.insert("zoe".to_string(), 3i64);
        scores.insert("adam".to_string(), 5i64);
        let attr = scores.to_attr();
        let back: IndexMap<String, i64> = FromAttr::from_attr(attr).unwrap();
        assert_eq!(back.keys().collect::<Vec<_>>(), ["zoe", "adam"]);
    }

    #[test]
    fn narrow_integers_check_range() {
        assert!(u32::from_attr(Attr::Integer(-1)).is_err());
        assert_eq!(i32::from_attr(Attr::Integer(7)).unwrap(), 7);
    }
}
