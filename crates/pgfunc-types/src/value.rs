use std::fmt;
use std::str::FromStr;

use pgfunc_error::{FuncError, Result};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};

use crate::SqlType;

/// A dynamically-typed SQL value.
///
/// Each non-NULL variant carries its [`SqlType`] tag, so function bodies
/// dispatch on the variant instead of asserting a type at runtime. The
/// string family (`text`, `varchar`, `bpchar`) shares the `Text` variant.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Value {
    /// SQL NULL.
    Null,
    Bool(bool),
    Int2(i16),
    Int4(i32),
    Int8(i64),
    Float4(f32),
    Float8(f64),
    /// Arbitrary-precision decimal.
    Numeric(Decimal),
    Text(String),
}

impl Value {
    /// The type tag of this value, or `None` for NULL.
    pub const fn sql_type(&self) -> Option<SqlType> {
        match self {
            Self::Null => None,
            Self::Bool(_) => Some(SqlType::Bool),
            Self::Int2(_) => Some(SqlType::Int2),
            Self::Int4(_) => Some(SqlType::Int4),
            Self::Int8(_) => Some(SqlType::Int8),
            Self::Float4(_) => Some(SqlType::Float4),
            Self::Float8(_) => Some(SqlType::Float8),
            Self::Numeric(_) => Some(SqlType::Numeric),
            Self::Text(_) => Some(SqlType::Text),
        }
    }

    /// Short type name for diagnostics; `"null"` for NULL.
    pub const fn type_name(&self) -> &'static str {
        match self.sql_type() {
            Some(ty) => ty.name(),
            None => "null",
        }
    }

    /// Returns true if this is a NULL value.
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Any integer variant, widened to `i64`.
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int2(v) => Some(*v as i64),
            Self::Int4(v) => Some(*v as i64),
            Self::Int8(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float4(v) => Some(f64::from(*v)),
            Self::Float8(v) => Some(*v),
            _ => None,
        }
    }

    pub const fn as_numeric(&self) -> Option<&Decimal> {
        match self {
            Self::Numeric(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Apply the implicit cast chosen at plan time, converting a value whose
    /// static type is `from` into parameter type `to`.
    ///
    /// NULL stays NULL. An `unknown` literal is parsed as `to`. A `bpchar`
    /// value loses its trailing blanks when cast to `text` or `varchar`. Any
    /// pair not on the implicit-coercion table is a
    /// [`FuncError::TypeMismatch`].
    pub fn coerce(self, from: SqlType, to: SqlType) -> Result<Self> {
        if self.is_null() || from == to {
            return Ok(self);
        }
        match (from, self) {
            (SqlType::Unknown, Self::Text(s)) => Self::parse_literal(&s, to),
            (SqlType::Bpchar, Self::Text(s))
                if matches!(to, SqlType::Text | SqlType::Varchar) =>
            {
                Ok(Self::Text(s.trim_end_matches(' ').to_owned()))
            }
            (_, value) => value.widen(to),
        }
    }

    /// Widening conversions between typed values.
    #[allow(clippy::cast_precision_loss)]
    fn widen(self, to: SqlType) -> Result<Self> {
        if self.sql_type() == Some(to) {
            return Ok(self);
        }
        let converted = match (&self, to) {
            (Self::Int2(v), SqlType::Int4) => Some(Self::Int4(i32::from(*v))),
            (Self::Int2(v), SqlType::Int8) => Some(Self::Int8(i64::from(*v))),
            (Self::Int4(v), SqlType::Int8) => Some(Self::Int8(i64::from(*v))),
            (Self::Int2(_) | Self::Int4(_) | Self::Int8(_), SqlType::Numeric) => {
                self.as_i64().map(|v| Self::Numeric(Decimal::from(v)))
            }
            (Self::Int2(_) | Self::Int4(_) | Self::Int8(_), SqlType::Float4) => {
                self.as_i64().map(|v| Self::Float4(v as f32))
            }
            (Self::Int2(_) | Self::Int4(_) | Self::Int8(_), SqlType::Float8) => {
                self.as_i64().map(|v| Self::Float8(v as f64))
            }
            (Self::Numeric(d), SqlType::Float4) => d.to_f32().map(Self::Float4),
            (Self::Numeric(d), SqlType::Float8) => d.to_f64().map(Self::Float8),
            (Self::Float4(v), SqlType::Float8) => Some(Self::Float8(f64::from(*v))),
            (Self::Text(s), SqlType::Text | SqlType::Varchar | SqlType::Bpchar) => {
                Some(Self::Text(s.clone()))
            }
            _ => None,
        };
        converted.ok_or_else(|| FuncError::type_mismatch(to.name(), self.type_name()))
    }

    /// Read an untyped literal as a value of type `ty`.
    pub fn parse_literal(input: &str, ty: SqlType) -> Result<Self> {
        let invalid = || FuncError::InvalidTextRepresentation {
            type_name: ty.sql_name().to_owned(),
            input: input.to_owned(),
        };
        let trimmed = input.trim();
        match ty {
            SqlType::Text | SqlType::Varchar | SqlType::Bpchar | SqlType::Unknown => {
                Ok(Self::Text(input.to_owned()))
            }
            SqlType::Bool => match trimmed.to_ascii_lowercase().as_str() {
                "t" | "true" | "y" | "yes" | "on" | "1" => Ok(Self::Bool(true)),
                "f" | "false" | "n" | "no" | "off" | "0" => Ok(Self::Bool(false)),
                _ => Err(invalid()),
            },
            SqlType::Int2 => {
                let v = trimmed.parse::<i64>().map_err(|_| invalid())?;
                i16::try_from(v)
                    .map(Self::Int2)
                    .map_err(|_| FuncError::out_of_range("smallint"))
            }
            SqlType::Int4 => {
                let v = trimmed.parse::<i64>().map_err(|_| invalid())?;
                i32::try_from(v)
                    .map(Self::Int4)
                    .map_err(|_| FuncError::out_of_range("integer"))
            }
            SqlType::Int8 => trimmed.parse::<i64>().map(Self::Int8).map_err(|e| {
                if matches!(
                    e.kind(),
                    std::num::IntErrorKind::PosOverflow | std::num::IntErrorKind::NegOverflow
                ) {
                    FuncError::out_of_range("bigint")
                } else {
                    invalid()
                }
            }),
            SqlType::Float4 => trimmed.parse::<f32>().map(Self::Float4).map_err(|_| invalid()),
            SqlType::Float8 => trimmed.parse::<f64>().map(Self::Float8).map_err(|_| invalid()),
            SqlType::Numeric => Decimal::from_str(trimmed)
                .or_else(|_| Decimal::from_scientific(trimmed))
                .map(Self::Numeric)
                .map_err(|_| invalid()),
        }
    }

    /// Build a `numeric` value from a float, failing on NaN, infinities and
    /// magnitudes beyond the decimal range.
    pub fn numeric_from_f64(f: f64) -> Result<Self> {
        Decimal::from_f64(f)
            .map(Self::Numeric)
            .ok_or_else(|| FuncError::out_of_range("numeric"))
    }
}

/// Render a `float8` the way PostgreSQL's output function does: shortest
/// round-trip digits, exponent form outside `[1e-4, 1e15)`.
pub fn format_float8(f: f64) -> String {
    format_float(f, 15, format!("{f:e}"), format!("{f}"))
}

/// Render a `float4`; exponent form outside `[1e-4, 1e6)`.
pub fn format_float4(f: f32) -> String {
    format_float(f64::from(f), 6, format!("{f:e}"), format!("{f}"))
}

fn format_float(f: f64, max_exp: i32, sci: String, plain: String) -> String {
    if f.is_nan() {
        return "NaN".to_owned();
    }
    if f.is_infinite() {
        return if f > 0.0 { "Infinity" } else { "-Infinity" }.to_owned();
    }
    if f == 0.0 {
        return if f.is_sign_negative() { "-0" } else { "0" }.to_owned();
    }
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return plain;
    };
    let exp: i32 = exp.parse().unwrap_or(0);
    if exp < -4 || exp >= max_exp {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exp.abs())
    } else {
        plain
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Bool(b) => f.write_str(if *b { "t" } else { "f" }),
            Self::Int2(v) => write!(f, "{v}"),
            Self::Int4(v) => write!(f, "{v}"),
            Self::Int8(v) => write!(f, "{v}"),
            Self::Float4(v) => f.write_str(&format_float4(*v)),
            Self::Float8(v) => f.write_str(&format_float8(*v)),
            Self::Numeric(d) => write!(f, "{d}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i16> for Value {
    fn from(i: i16) -> Self {
        Self::Int2(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int4(i)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int8(i)
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Self::Float4(f)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float8(f)
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Self::Numeric(d)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => Self::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_sql_type_tags() {
        assert_eq!(Value::Null.sql_type(), None);
        assert_eq!(Value::Int2(1).sql_type(), Some(SqlType::Int2));
        assert_eq!(Value::Numeric(dec("1.5")).sql_type(), Some(SqlType::Numeric));
        assert_eq!(Value::from("x").sql_type(), Some(SqlType::Text));
        assert_eq!(Value::Null.type_name(), "null");
        assert_eq!(Value::Float8(1.0).type_name(), "float8");
    }

    #[test]
    fn test_coerce_null_stays_null() {
        let v = Value::Null.coerce(SqlType::Int4, SqlType::Numeric).unwrap();
        assert!(v.is_null());
    }

    #[test]
    fn test_coerce_integer_widening() {
        assert_eq!(
            Value::Int2(7).coerce(SqlType::Int2, SqlType::Int8).unwrap(),
            Value::Int8(7)
        );
        assert_eq!(
            Value::Int4(-3).coerce(SqlType::Int4, SqlType::Numeric).unwrap(),
            Value::Numeric(Decimal::from(-3))
        );
        assert_eq!(
            Value::Int8(2).coerce(SqlType::Int8, SqlType::Float8).unwrap(),
            Value::Float8(2.0)
        );
    }

    #[test]
    fn test_coerce_numeric_to_float() {
        assert_eq!(
            Value::Numeric(dec("2.5"))
                .coerce(SqlType::Numeric, SqlType::Float8)
                .unwrap(),
            Value::Float8(2.5)
        );
        assert_eq!(
            Value::Float4(1.5).coerce(SqlType::Float4, SqlType::Float8).unwrap(),
            Value::Float8(1.5)
        );
    }

    #[test]
    fn test_coerce_rejects_narrowing() {
        let err = Value::Int8(1)
            .coerce(SqlType::Int8, SqlType::Int4)
            .unwrap_err();
        assert!(matches!(err, FuncError::TypeMismatch { .. }));
    }

    #[test]
    fn test_coerce_string_family_is_identity() {
        assert_eq!(
            Value::from("ab ").coerce(SqlType::Varchar, SqlType::Text).unwrap(),
            Value::from("ab ")
        );
    }

    #[test]
    fn test_coerce_bpchar_drops_trailing_blanks() {
        assert_eq!(
            Value::from(" ab  ").coerce(SqlType::Bpchar, SqlType::Text).unwrap(),
            Value::from(" ab")
        );
        assert_eq!(
            Value::from("ab ").coerce(SqlType::Bpchar, SqlType::Varchar).unwrap(),
            Value::from("ab")
        );
        assert_eq!(
            Value::from("ab ").coerce(SqlType::Bpchar, SqlType::Bpchar).unwrap(),
            Value::from("ab ")
        );
    }

    #[test]
    fn test_unknown_literal_parsing() {
        assert_eq!(
            Value::from(" 42 ").coerce(SqlType::Unknown, SqlType::Int4).unwrap(),
            Value::Int4(42)
        );
        assert_eq!(
            Value::from("1.25").coerce(SqlType::Unknown, SqlType::Numeric).unwrap(),
            Value::Numeric(dec("1.25"))
        );
        assert_eq!(
            Value::from("yes").coerce(SqlType::Unknown, SqlType::Bool).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            Value::from("-Infinity").coerce(SqlType::Unknown, SqlType::Float8).unwrap(),
            Value::Float8(f64::NEG_INFINITY)
        );
        assert_eq!(
            Value::from("abc").coerce(SqlType::Unknown, SqlType::Text).unwrap(),
            Value::from("abc")
        );
    }

    #[test]
    fn test_unknown_literal_errors() {
        let err = Value::parse_literal("abc", SqlType::Int4).unwrap_err();
        assert_eq!(err.to_string(), r#"invalid input syntax for type integer: "abc""#);

        let err = Value::parse_literal("70000", SqlType::Int2).unwrap_err();
        assert_eq!(err.to_string(), "smallint out of range");

        let err = Value::parse_literal("99999999999999999999", SqlType::Int8).unwrap_err();
        assert_eq!(err.to_string(), "bigint out of range");
    }

    #[test]
    fn test_display_postgres_output() {
        assert_eq!(Value::Bool(true).to_string(), "t");
        assert_eq!(Value::Int4(-12).to_string(), "-12");
        assert_eq!(Value::Float8(0.1).to_string(), "0.1");
        assert_eq!(Value::Float8(1e21).to_string(), "1e+21");
        assert_eq!(Value::Float8(1.5e-7).to_string(), "1.5e-07");
        assert_eq!(Value::Float8(123.456).to_string(), "123.456");
        assert_eq!(Value::Float8(f64::INFINITY).to_string(), "Infinity");
        assert_eq!(Value::Float8(f64::NAN).to_string(), "NaN");
        assert_eq!(Value::Numeric(dec("1.50")).to_string(), "1.50");
        assert_eq!(Value::from("hi").to_string(), "hi");
    }

    #[test]
    fn test_from_option() {
        assert_eq!(Value::from(Some(3_i32)), Value::Int4(3));
        assert_eq!(Value::from(None::<i32>), Value::Null);
    }

    #[test]
    fn test_serde_roundtrip() {
        for v in [Value::Null, Value::Int8(-9), Value::Numeric(dec("3.140")), Value::from("x")] {
            let json = serde_json::to_string(&v).unwrap();
            let back: Value = serde_json::from_str(&json).unwrap();
            assert_eq!(back, v);
        }
    }
}
