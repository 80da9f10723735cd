//! Builtin registration and the argument accessors shared by every builtin
//! body.
//!
//! Bodies are registered strict unless stated otherwise, so the accessors
//! here treat NULL like any other unexpected kind: a
//! [`FuncError::TypeMismatch`].
#![allow(clippy::unnecessary_wraps)]

use pgfunc_error::{FuncError, Result, SqlState};
use pgfunc_types::Value;
use rust_decimal::Decimal;

use crate::math::register_math_builtins;
use crate::string::register_string_builtins;
use crate::trig::register_trig_builtins;
use crate::Catalog;

/// Register every builtin scalar function into `catalog`.
pub fn register_builtins(catalog: &mut Catalog) -> Result<()> {
    register_math_builtins(catalog)?;
    register_trig_builtins(catalog)?;
    register_string_builtins(catalog)?;
    Ok(())
}

// ── Argument accessors ────────────────────────────────────────────────────

fn arg(args: &[Value], i: usize) -> Result<&Value> {
    args.get(i)
        .ok_or_else(|| FuncError::internal(format!("missing argument {i}")))
}

pub(crate) fn int2_arg(args: &[Value], i: usize) -> Result<i16> {
    match arg(args, i)? {
        Value::Int2(v) => Ok(*v),
        other => Err(FuncError::type_mismatch("int2", other.type_name())),
    }
}

pub(crate) fn int4_arg(args: &[Value], i: usize) -> Result<i32> {
    match arg(args, i)? {
        Value::Int4(v) => Ok(*v),
        other => Err(FuncError::type_mismatch("int4", other.type_name())),
    }
}

pub(crate) fn int8_arg(args: &[Value], i: usize) -> Result<i64> {
    match arg(args, i)? {
        Value::Int8(v) => Ok(*v),
        other => Err(FuncError::type_mismatch("int8", other.type_name())),
    }
}

pub(crate) fn float4_arg(args: &[Value], i: usize) -> Result<f32> {
    match arg(args, i)? {
        Value::Float4(v) => Ok(*v),
        other => Err(FuncError::type_mismatch("float4", other.type_name())),
    }
}

pub(crate) fn float8_arg(args: &[Value], i: usize) -> Result<f64> {
    match arg(args, i)? {
        Value::Float8(v) => Ok(*v),
        other => Err(FuncError::type_mismatch("float8", other.type_name())),
    }
}

pub(crate) fn numeric_arg(args: &[Value], i: usize) -> Result<Decimal> {
    match arg(args, i)? {
        Value::Numeric(d) => Ok(*d),
        other => Err(FuncError::type_mismatch("numeric", other.type_name())),
    }
}

pub(crate) fn text_arg(args: &[Value], i: usize) -> Result<&str> {
    match arg(args, i)? {
        Value::Text(s) => Ok(s),
        other => Err(FuncError::type_mismatch("text", other.type_name())),
    }
}

// ── Shared errors ─────────────────────────────────────────────────────────

/// `value out of range: overflow`
pub(crate) fn float_overflow() -> FuncError {
    FuncError::domain(SqlState::NumericValueOutOfRange, "value out of range: overflow")
}

/// `value out of range: underflow`
pub(crate) fn float_underflow() -> FuncError {
    FuncError::domain(SqlState::NumericValueOutOfRange, "value out of range: underflow")
}

/// `value overflows numeric format`
pub(crate) fn numeric_overflow() -> FuncError {
    FuncError::domain(SqlState::NumericValueOutOfRange, "value overflows numeric format")
}

/// Check a float8 result computed from finite inputs. `inf_ok` and
/// `zero_ok` allow results that are legitimately infinite or zero.
pub(crate) fn check_float8(result: f64, inf_ok: bool, zero_ok: bool) -> Result<f64> {
    if result.is_infinite() && !inf_ok {
        return Err(float_overflow());
    }
    if result == 0.0 && !zero_ok {
        return Err(float_underflow());
    }
    Ok(result)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors_match_kind() {
        let args = [
            Value::Int2(1),
            Value::Int4(2),
            Value::Int8(3),
            Value::Float4(4.0),
            Value::Float8(5.0),
            Value::Numeric(Decimal::from(6)),
            Value::from("seven"),
        ];
        assert_eq!(int2_arg(&args, 0).unwrap(), 1);
        assert_eq!(int4_arg(&args, 1).unwrap(), 2);
        assert_eq!(int8_arg(&args, 2).unwrap(), 3);
        assert!((float4_arg(&args, 3).unwrap() - 4.0).abs() < f32::EPSILON);
        assert!((float8_arg(&args, 4).unwrap() - 5.0).abs() < f64::EPSILON);
        assert_eq!(numeric_arg(&args, 5).unwrap(), Decimal::from(6));
        assert_eq!(text_arg(&args, 6).unwrap(), "seven");
    }

    #[test]
    fn test_accessor_mismatch() {
        let err = int4_arg(&[Value::Int8(1)], 0).unwrap_err();
        assert_eq!(err.to_string(), "type mismatch: expected int4, got int8");
        let err = text_arg(&[Value::Null], 0).unwrap_err();
        assert_eq!(err.to_string(), "type mismatch: expected text, got null");
    }

    #[test]
    fn test_accessor_missing_argument() {
        let err = float8_arg(&[], 0).unwrap_err();
        assert!(err.is_defect());
    }

    #[test]
    fn test_check_float8() {
        assert!(check_float8(1.0, false, false).is_ok());
        assert_eq!(
            check_float8(f64::INFINITY, false, true).unwrap_err().to_string(),
            "value out of range: overflow"
        );
        assert_eq!(
            check_float8(0.0, true, false).unwrap_err().to_string(),
            "value out of range: underflow"
        );
        assert!(check_float8(0.0, false, true).is_ok());
    }

    #[test]
    fn test_register_builtins_twice_is_duplicate() {
        let mut c = Catalog::new();
        register_builtins(&mut c).unwrap();
        let err = register_builtins(&mut c).unwrap_err();
        assert!(matches!(err, FuncError::DuplicateSignature { .. }));
    }

    #[test]
    fn test_every_builtin_strict_except_quote_nullable() {
        let c = test_support::catalog();
        for d in c.iter() {
            assert_eq!(d.is_strict(), d.name() != "quote_nullable", "{}", d.signature());
        }
    }

    #[test]
    fn test_only_random_is_volatile() {
        let c = test_support::catalog();
        for d in c.iter() {
            assert_eq!(d.is_deterministic(), d.name() != "random", "{}", d.signature());
        }
    }
}
