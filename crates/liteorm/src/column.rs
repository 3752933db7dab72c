//! Column descriptors and logical → storage type mapping.

use crate::constraint::ColumnConstraint;
use crate::fragment::{join_fragments, quote_name};
use std::fmt;

/// Storage class understood by SQLite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlType {
    Text,
    Integer,
    Real,
    Null,
    Blob,
}

impl SqlType {
    pub fn as_str(self) -> &'static str {
        match self {
            SqlType::Text => "TEXT",
            SqlType::Integer => "INTEGER",
            SqlType::Real => "REAL",
            SqlType::Null => "NULL",
            SqlType::Blob => "BLOB",
        }
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logical type of a column, used both for DDL and for coercing fetched values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Text,
    Integer,
    Bool,
    Real,
    Null,
    Blob,
}

impl ColumnType {
    /// Logical type of a Rust field type.
    pub fn of<T: HasColumnType>() -> Self {
        T::COLUMN_TYPE
    }

    pub fn sql_type(self) -> SqlType {
        match self {
            ColumnType::Text => SqlType::Text,
            ColumnType::Integer | ColumnType::Bool => SqlType::Integer,
            ColumnType::Real => SqlType::Real,
            ColumnType::Null => SqlType::Null,
            ColumnType::Blob => SqlType::Blob,
        }
    }
}

/// Maps Rust types to their logical column type.
pub trait HasColumnType {
    const COLUMN_TYPE: ColumnType;
}

macro_rules! has_column_type {
    ($($ty:ty => $column_type:ident),* $(,)?) => {
        $(
            impl HasColumnType for $ty {
                const COLUMN_TYPE: ColumnType = ColumnType::$column_type;
            }
        )*
    };
}

has_column_type! {
    String => Text,
    &str => Text,
    i64 => Integer,
    i32 => Integer,
    u32 => Integer,
    bool => Bool,
    f64 => Real,
    f32 => Real,
    Vec<u8> => Blob,
    () => Null,
}

impl<T: HasColumnType> HasColumnType for Option<T> {
    const COLUMN_TYPE: ColumnType = T::COLUMN_TYPE;
}

/// A typed column definition.
///
/// `field_name` is the model attribute the column binds to; it defaults to
/// the SQL name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    name: String,
    field_name: String,
    ty: ColumnType,
    constraints: Vec<ColumnConstraint>,
}

impl Column {
    pub fn new(name: impl Into<String>, ty: ColumnType) -> Self {
        let name = name.into();
        Self {
            field_name: name.clone(),
            name,
            ty,
            constraints: Vec::new(),
        }
    }

    /// Column whose logical type follows a Rust type, e.g. `Column::of::<i64>("id")`.
    pub fn of<T: HasColumnType>(name: impl Into<String>) -> Self {
        Self::new(name, T::COLUMN_TYPE)
    }

    pub fn constraint(mut self, constraint: ColumnConstraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Bind to a differently-named model attribute.
    pub fn with_field_name(mut self, field_name: impl Into<String>) -> Self {
        self.field_name = field_name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn column_type(&self) -> ColumnType {
        self.ty
    }

    pub fn sql_type(&self) -> SqlType {
        self.ty.sql_type()
    }

    pub fn constraints(&self) -> &[ColumnConstraint] {
        &self.constraints
    }

    pub fn is_primary(&self) -> bool {
        self.constraints.iter().any(ColumnConstraint::is_primary)
    }

    pub fn to_sql(&self) -> String {
        let constraints: Vec<String> = self
            .constraints
            .iter()
            .filter_map(ColumnConstraint::to_sql)
            .collect();
        join_fragments(
            " ",
            [quote_name(&self.name), self.sql_type().to_string()]
                .into_iter()
                .chain(constraints),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logical_types_map_to_storage_classes() {
        assert_eq!(ColumnType::of::<String>().sql_type(), SqlType::Text);
        assert_eq!(ColumnType::of::<bool>().sql_type(), SqlType::Integer);
        assert_eq!(ColumnType::of::<Option<f64>>().sql_type(), SqlType::Real);
        assert_eq!(ColumnType::of::<Vec<u8>>().sql_type(), SqlType::Blob);
        assert_eq!(ColumnType::of::<()>().sql_type(), SqlType::Null);
    }

    #[test]
    fn column_definition() {
        let col = Column::of::<i64>("id").constraint(ColumnConstraint::primary_autoincrement());
        assert_eq!(col.to_sql(), "`id` INTEGER PRIMARY KEY AUTOINCREMENT");
        assert!(col.is_primary());
    }

    #[test]
    fn disabled_flags_render_nothing() {
        let col = Column::of::<String>("text").constraint(ColumnConstraint::not_null_if(false));
        assert_eq!(col.to_sql(), "`text` TEXT");
    }

    #[test]
    fn field_name_defaults_to_sql_name() {
        let col = Column::of::<bool>("is_correct");
        assert_eq!(col.field_name(), "is_correct");
        let col = col.with_field_name("correct");
        assert_eq!(col.field_name(), "correct");
        assert_eq!(col.name(), "is_correct");
    }
}
