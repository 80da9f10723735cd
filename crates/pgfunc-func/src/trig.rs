//! Trigonometric and hyperbolic functions over `float8`.
//!
//! The degree-based variants (`sind`, `cosd`, ...) reduce their argument to
//! the first quadrant before converting to radians, so that multiples of
//! 30, 45 and 90 degrees give exact results (`sind(30) = 0.5`,
//! `cosd(90) = 0`, `tand(45) = 1`).
#![allow(clippy::float_cmp, clippy::unnecessary_wraps)]

use pgfunc_error::{FuncError, Result, SqlState};
use pgfunc_types::{SqlType as Ty, Value};

use crate::builtins::float8_arg;
use crate::{Catalog, ExecContext, FunctionDescriptor};

// ── Helpers ───────────────────────────────────────────────────────────────

fn input_out_of_range() -> FuncError {
    FuncError::domain(SqlState::NumericValueOutOfRange, "input is out of range")
}

/// Apply `f` to a single `float8` argument, rejecting inputs outside
/// `domain`. NaN passes through untouched.
fn unary(args: &[Value], domain: fn(f64) -> bool, f: fn(f64) -> f64) -> Result<Value> {
    let x = float8_arg(args, 0)?;
    if x.is_nan() {
        return Ok(Value::Float8(x));
    }
    if !domain(x) {
        return Err(input_out_of_range());
    }
    Ok(Value::Float8(f(x)))
}

fn any(_: f64) -> bool {
    true
}

fn finite(x: f64) -> bool {
    x.is_finite()
}

fn unit_interval(x: f64) -> bool {
    (-1.0..=1.0).contains(&x)
}

/// Snap a degree result to the nearest integer when it is within rounding
/// error of it.
fn snap_degrees(d: f64) -> f64 {
    let r = d.round();
    if (d - r).abs() <= 4.0 * f64::EPSILON * d.abs().max(1.0) {
        r
    } else {
        d
    }
}

/// Sine of `x` degrees for `x` in `[0, 90]`.
fn sin_first_quadrant(x: f64) -> f64 {
    if x == 0.0 {
        0.0
    } else if x == 30.0 {
        0.5
    } else if x == 90.0 {
        1.0
    } else if x <= 45.0 {
        x.to_radians().sin()
    } else {
        (90.0 - x).to_radians().cos()
    }
}

fn cos_first_quadrant(x: f64) -> f64 {
    sin_first_quadrant(90.0 - x)
}

fn sind_value(x: f64) -> f64 {
    let mut x = x % 360.0;
    let mut sign = 1.0;
    if x < 0.0 {
        x = -x;
        sign = -sign;
    }
    if x > 180.0 {
        x -= 180.0;
        sign = -sign;
    }
    if x > 90.0 {
        x = 180.0 - x;
    }
    sign * sin_first_quadrant(x)
}

fn cosd_value(x: f64) -> f64 {
    let mut x = (x % 360.0).abs();
    if x > 180.0 {
        x = 360.0 - x;
    }
    if x > 90.0 {
        -cos_first_quadrant(180.0 - x)
    } else {
        cos_first_quadrant(x)
    }
}

/// `num / den`, where a zero denominator yields a signed infinity.
fn ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 {
        if num < 0.0 {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        }
    } else {
        num / den
    }
}

// ── Radians ───────────────────────────────────────────────────────────────

fn acos(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    unary(args, unit_interval, f64::acos)
}

fn asin(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    unary(args, unit_interval, f64::asin)
}

fn atan(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    unary(args, any, f64::atan)
}

fn atan2(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    let y = float8_arg(args, 0)?;
    let x = float8_arg(args, 1)?;
    Ok(Value::Float8(y.atan2(x)))
}

fn cos(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    unary(args, finite, f64::cos)
}

fn cot(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    unary(args, finite, |x| ratio(1.0, x.tan()))
}

fn sin(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    unary(args, finite, f64::sin)
}

fn tan(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    unary(args, finite, f64::tan)
}

// ── Degrees ───────────────────────────────────────────────────────────────

fn acosd(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    unary(args, unit_interval, |x| snap_degrees(x.acos().to_degrees()))
}

fn asind(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    unary(args, unit_interval, |x| snap_degrees(x.asin().to_degrees()))
}

fn atand(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    unary(args, any, |x| snap_degrees(x.atan().to_degrees()))
}

fn atan2d(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    let y = float8_arg(args, 0)?;
    let x = float8_arg(args, 1)?;
    Ok(Value::Float8(snap_degrees(y.atan2(x).to_degrees())))
}

fn cosd(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    unary(args, finite, cosd_value)
}

fn cotd(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    unary(args, finite, |x| ratio(cosd_value(x), sind_value(x)))
}

fn sind(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    unary(args, finite, sind_value)
}

fn tand(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    unary(args, finite, |x| ratio(sind_value(x), cosd_value(x)))
}

// ── Hyperbolic ────────────────────────────────────────────────────────────

fn sinh(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    unary(args, any, f64::sinh)
}

fn cosh(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    unary(args, any, f64::cosh)
}

fn tanh(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    unary(args, any, f64::tanh)
}

fn asinh(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    unary(args, any, f64::asinh)
}

fn acosh(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    unary(args, |x| x >= 1.0, f64::acosh)
}

fn atanh(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    unary(args, unit_interval, f64::atanh)
}

// ── Registration ──────────────────────────────────────────────────────────

/// Register the trigonometric and hyperbolic builtins.
pub fn register_trig_builtins(catalog: &mut Catalog) -> Result<()> {
    let unary_fns: [(&str, fn(&ExecContext, &[Value]) -> Result<Value>); 20] = [
        ("acos", acos),
        ("asin", asin),
        ("atan", atan),
        ("cos", cos),
        ("cot", cot),
        ("sin", sin),
        ("tan", tan),
        ("acosd", acosd),
        ("asind", asind),
        ("atand", atand),
        ("cosd", cosd),
        ("cotd", cotd),
        ("sind", sind),
        ("tand", tand),
        ("sinh", sinh),
        ("cosh", cosh),
        ("tanh", tanh),
        ("asinh", asinh),
        ("acosh", acosh),
        ("atanh", atanh),
    ];
    for (name, body) in unary_fns {
        catalog.register(FunctionDescriptor::new(name, [Ty::Float8], Ty::Float8, body))?;
    }
    catalog.register(FunctionDescriptor::new(
        "atan2",
        [Ty::Float8, Ty::Float8],
        Ty::Float8,
        atan2,
    ))?;
    catalog.register(FunctionDescriptor::new(
        "atan2d",
        [Ty::Float8, Ty::Float8],
        Ty::Float8,
        atan2d,
    ))?;
    Ok(())
}
