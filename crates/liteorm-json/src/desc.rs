//! Field type descriptors, as declared by models.

use std::any::TypeId;

/// Scalar JSON types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    String,
    Integer,
    Float,
    Boolean,
    Null,
}

impl Primitive {
    pub fn as_str(self) -> &'static str {
        match self {
            Primitive::String => "string",
            Primitive::Integer => "integer",
            Primitive::Float => "float",
            Primitive::Boolean => "boolean",
            Primitive::Null => "null",
        }
    }
}

/// The declared type of a JSON field.
///
/// Resolved into a [`JsonType`](crate::JsonType) when the owning model is
/// registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDesc {
    Primitive(Primitive),
    Nullable(Box<TypeDesc>),
    /// Any number of items of one type.
    ListOf(Box<TypeDesc>),
    /// Exactly one item per listed type.
    TupleOf(Vec<TypeDesc>),
    /// Any keys, values of one type.
    MapOf(Box<TypeDesc>),
    /// Exactly the listed keys, in order.
    FixedMapOf(Vec<(String, TypeDesc)>),
    /// Another registered model.
    ModelRef { type_id: TypeId, name: &'static str },
}

impl TypeDesc {
    pub fn string() -> Self {
        Self::Primitive(Primitive::String)
    }

    pub fn integer() -> Self {
        Self::Primitive(Primitive::Integer)
    }

    pub fn float() -> Self {
        Self::Primitive(Primitive::Float)
    }

    pub fn boolean() -> Self {
        Self::Primitive(Primitive::Boolean)
    }

    pub fn null() -> Self {
        Self::Primitive(Primitive::Null)
    }

    pub fn nullable(inner: TypeDesc) -> Self {
        Self::Nullable(Box::new(inner))
    }

    pub fn list_of(item: TypeDesc) -> Self {
        Self::ListOf(Box::new(item))
    }

    pub fn tuple_of(items: impl IntoIterator<Item = TypeDesc>) -> Self {
        Self::TupleOf(items.into_iter().collect())
    }

    pub fn map_of(value: TypeDesc) -> Self {
        Self::MapOf(Box::new(value))
    }

    pub fn fixed_map_of<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, TypeDesc)>,
        K: Into<String>,
    {
        Self::FixedMapOf(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn model<T: 'static>() -> Self {
        Self::ModelRef {
            type_id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }
}

impl From<Primitive> for TypeDesc {
    fn from(primitive: Primitive) -> Self {
        Self::Primitive(primitive)
    }
}

/// A type descriptor with an optional wire name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasedDesc {
    pub desc: TypeDesc,
    pub alias: Option<String>,
}

impl From<TypeDesc> for AliasedDesc {
    fn from(desc: TypeDesc) -> Self {
        Self { desc, alias: None }
    }
}

// The string half of a pair is the alias, on either side.
impl From<(&str, TypeDesc)> for AliasedDesc {
    fn from((alias, desc): (&str, TypeDesc)) -> Self {
        Self {
            desc,
            alias: Some(alias.to_string()),
        }
    }
}

impl From<(TypeDesc, &str)> for AliasedDesc {
    fn from((desc, alias): (TypeDesc, &str)) -> Self {
        Self {
            desc,
            alias: Some(alias.to_string()),
        }
    }
}

/// One declared field of a JSON model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub alias: Option<String>,
    pub desc: TypeDesc,
}

impl FieldDef {
    /// Key used on the wire.
    pub fn json_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// Declare a field: `field("is_correct", (TypeDesc::boolean(), "correct"))`.
pub fn field(name: &str, desc: impl Into<AliasedDesc>) -> FieldDef {
    let AliasedDesc { desc, alias } = desc.into();
    FieldDef {
        name: name.to_string(),
        alias,
        desc,
    }
}
