//! Static SQL types and the implicit-coercion table used by overload
//! resolution.

use std::fmt;

/// A PostgreSQL scalar type, as seen by the function catalog.
///
/// `Unknown` is the static type of an untyped literal (a quoted string
/// without a cast, or a bare `NULL`); it can be coerced to any parameter
/// type.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SqlType {
    Bool,
    Int2,
    Int4,
    Int8,
    Float4,
    Float8,
    Numeric,
    Text,
    Varchar,
    Bpchar,
    Unknown,
}

/// PostgreSQL type category (`pg_type.typcategory`), restricted to the
/// categories the builtin set touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeCategory {
    Boolean,
    Numeric,
    String,
    Unknown,
}

impl SqlType {
    /// All types, in declaration order.
    pub const ALL: [Self; 11] = [
        Self::Bool,
        Self::Int2,
        Self::Int4,
        Self::Int8,
        Self::Float4,
        Self::Float8,
        Self::Numeric,
        Self::Text,
        Self::Varchar,
        Self::Bpchar,
        Self::Unknown,
    ];

    /// Canonical short name, used in signatures and error messages.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int2 => "int2",
            Self::Int4 => "int4",
            Self::Int8 => "int8",
            Self::Float4 => "float4",
            Self::Float8 => "float8",
            Self::Numeric => "numeric",
            Self::Text => "text",
            Self::Varchar => "varchar",
            Self::Bpchar => "bpchar",
            Self::Unknown => "unknown",
        }
    }

    /// SQL-standard spelling, used in input-syntax errors
    /// (`invalid input syntax for type integer`).
    pub const fn sql_name(self) -> &'static str {
        match self {
            Self::Bool => "boolean",
            Self::Int2 => "smallint",
            Self::Int4 => "integer",
            Self::Int8 => "bigint",
            Self::Float4 => "real",
            Self::Float8 => "double precision",
            Self::Numeric => "numeric",
            Self::Text => "text",
            Self::Varchar => "character varying",
            Self::Bpchar => "character",
            Self::Unknown => "unknown",
        }
    }

    /// Look up a type by any of its common spellings (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.trim().to_ascii_lowercase();
        let ty = match lower.as_str() {
            "bool" | "boolean" => Self::Bool,
            "int2" | "smallint" => Self::Int2,
            "int4" | "int" | "integer" => Self::Int4,
            "int8" | "bigint" => Self::Int8,
            "float4" | "real" => Self::Float4,
            "float8" | "float" | "double precision" => Self::Float8,
            "numeric" | "decimal" => Self::Numeric,
            "text" => Self::Text,
            "varchar" | "character varying" => Self::Varchar,
            "bpchar" | "char" | "character" => Self::Bpchar,
            "unknown" => Self::Unknown,
            _ => return None,
        };
        Some(ty)
    }

    pub const fn category(self) -> TypeCategory {
        match self {
            Self::Bool => TypeCategory::Boolean,
            Self::Int2
            | Self::Int4
            | Self::Int8
            | Self::Float4
            | Self::Float8
            | Self::Numeric => TypeCategory::Numeric,
            Self::Text | Self::Varchar | Self::Bpchar => TypeCategory::String,
            Self::Unknown => TypeCategory::Unknown,
        }
    }

    /// Whether this is the preferred type of its category.
    pub const fn is_preferred(self) -> bool {
        matches!(self, Self::Float8 | Self::Text)
    }

    /// Position on the numeric widening lattice
    /// `int2 → int4 → int8 → numeric → float4 → float8`.
    const fn numeric_rank(self) -> Option<u32> {
        match self {
            Self::Int2 => Some(0),
            Self::Int4 => Some(1),
            Self::Int8 => Some(2),
            Self::Numeric => Some(3),
            Self::Float4 => Some(4),
            Self::Float8 => Some(5),
            _ => None,
        }
    }

    /// Cost of implicitly coercing a value of type `self` into a parameter
    /// of type `to`, or `None` if no implicit coercion exists.
    ///
    /// Identity costs 0. Numeric types widen along the lattice at one unit
    /// per step and never narrow. `varchar`/`bpchar` reach `text` at cost 1.
    /// `unknown` reaches `text` at cost 1 and every other type at cost 2,
    /// which biases untyped literals toward the string category.
    pub fn coercion_distance(self, to: Self) -> Option<u32> {
        if self == to {
            return Some(0);
        }
        match (self, to) {
            (Self::Unknown, Self::Text) => Some(1),
            (Self::Unknown, _) => Some(2),
            (Self::Varchar | Self::Bpchar, Self::Text) => Some(1),
            _ => {
                let from_rank = self.numeric_rank()?;
                let to_rank = to.numeric_rank()?;
                (to_rank > from_rank).then_some(to_rank - from_rank)
            }
        }
    }

    /// Whether a value of type `self` may be passed where `to` is expected.
    pub fn can_coerce_to(self, to: Self) -> bool {
        self.coercion_distance(to).is_some()
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Render `name(t1, t2, ...)` for signatures and error messages.
pub fn format_signature(name: &str, types: &[SqlType]) -> String {
    let mut out = String::with_capacity(name.len() + 2 + types.len() * 8);
    out.push_str(name);
    out.push('(');
    for (i, ty) in types.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(ty.name());
    }
    out.push(')');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_roundtrip() {
        for ty in SqlType::ALL {
            assert_eq!(SqlType::from_name(ty.name()), Some(ty));
        }
        assert_eq!(SqlType::from_name("INTEGER"), Some(SqlType::Int4));
        assert_eq!(SqlType::from_name(" double precision "), Some(SqlType::Float8));
        assert_eq!(SqlType::from_name("character varying"), Some(SqlType::Varchar));
        assert_eq!(SqlType::from_name("jsonb"), None);
    }

    #[test]
    fn test_identity_distance_is_zero() {
        for ty in SqlType::ALL {
            assert_eq!(ty.coercion_distance(ty), Some(0));
        }
    }

    #[test]
    fn test_numeric_widening_distances() {
        assert_eq!(SqlType::Int2.coercion_distance(SqlType::Int4), Some(1));
        assert_eq!(SqlType::Int2.coercion_distance(SqlType::Int8), Some(2));
        assert_eq!(SqlType::Int4.coercion_distance(SqlType::Numeric), Some(2));
        assert_eq!(SqlType::Int8.coercion_distance(SqlType::Float8), Some(3));
        assert_eq!(SqlType::Numeric.coercion_distance(SqlType::Float8), Some(2));
        assert_eq!(SqlType::Float4.coercion_distance(SqlType::Float8), Some(1));
    }

    #[test]
    fn test_no_implicit_narrowing() {
        assert_eq!(SqlType::Int8.coercion_distance(SqlType::Int4), None);
        assert_eq!(SqlType::Float8.coercion_distance(SqlType::Numeric), None);
        assert_eq!(SqlType::Numeric.coercion_distance(SqlType::Int8), None);
    }

    #[test]
    fn test_cross_category_unreachable() {
        assert!(!SqlType::Text.can_coerce_to(SqlType::Int4));
        assert!(!SqlType::Int4.can_coerce_to(SqlType::Text));
        assert!(!SqlType::Bool.can_coerce_to(SqlType::Int4));
        assert!(!SqlType::Text.can_coerce_to(SqlType::Varchar));
    }

    #[test]
    fn test_string_family_reaches_text() {
        assert_eq!(SqlType::Varchar.coercion_distance(SqlType::Text), Some(1));
        assert_eq!(SqlType::Bpchar.coercion_distance(SqlType::Text), Some(1));
    }

    #[test]
    fn test_unknown_prefers_text() {
        let to_text = SqlType::Unknown.coercion_distance(SqlType::Text).unwrap();
        let to_int = SqlType::Unknown.coercion_distance(SqlType::Int4).unwrap();
        assert!(to_text < to_int);
        assert!(SqlType::Unknown.can_coerce_to(SqlType::Bool));
    }

    #[test]
    fn test_categories_and_preferred() {
        assert_eq!(SqlType::Numeric.category(), TypeCategory::Numeric);
        assert_eq!(SqlType::Bpchar.category(), TypeCategory::String);
        assert!(SqlType::Float8.is_preferred());
        assert!(SqlType::Text.is_preferred());
        assert!(!SqlType::Int4.is_preferred());
    }

    #[test]
    fn test_format_signature() {
        assert_eq!(format_signature("pi", &[]), "pi()");
        assert_eq!(
            format_signature("gcd", &[SqlType::Int4, SqlType::Text]),
            "gcd(int4, text)"
        );
    }
}
