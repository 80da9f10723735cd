//! PostgreSQL mathematical functions over integers, `float8` and `numeric`.
//!
//! # Errors
//! - Domain violations (zero divisor, logarithm of a non-positive number,
//!   negative factorial, degenerate width-bucket bounds) are errors, never
//!   NULL results.
//! - Integer results that do not fit their type fail with
//!   `<type> out of range`.
//! - `float8` results that overflow or underflow from finite inputs fail
//!   with `value out of range: overflow` / `underflow`.
//! - `numeric` is a 96-bit decimal; results beyond its range fail with
//!   `value overflows numeric format`.
#![allow(
    clippy::cast_possible_truncation,
    clippy::float_cmp,
    clippy::unnecessary_wraps,
    clippy::too_many_lines
)]

use pgfunc_error::{FuncError, Result, SqlState};
use pgfunc_types::{SqlType as Ty, Value};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy};

use crate::builtins::{
    check_float8, float4_arg, float8_arg, int2_arg, int4_arg, int8_arg, numeric_arg,
    numeric_overflow,
};
use crate::{Catalog, ExecContext, FunctionDescriptor};

/// Largest scale a `numeric` can carry.
const MAX_SCALE: u32 = 28;

// ── Helpers ───────────────────────────────────────────────────────────────

fn log_domain(is_zero: bool, is_negative: bool) -> Result<()> {
    if is_zero {
        return Err(FuncError::domain(
            SqlState::InvalidArgumentForLogarithm,
            "cannot take logarithm of zero",
        ));
    }
    if is_negative {
        return Err(FuncError::domain(
            SqlState::InvalidArgumentForLogarithm,
            "cannot take logarithm of a negative number",
        ));
    }
    Ok(())
}

fn negative_sqrt() -> FuncError {
    FuncError::domain(
        SqlState::InvalidArgumentForPowerFunction,
        "cannot take square root of a negative number",
    )
}

fn zero_to_negative_power() -> FuncError {
    FuncError::domain(
        SqlState::InvalidArgumentForPowerFunction,
        "zero raised to a negative power is undefined",
    )
}

fn complex_power() -> FuncError {
    FuncError::domain(
        SqlState::InvalidArgumentForPowerFunction,
        "a negative number raised to a non-integer power yields a complex result",
    )
}

fn bucket_error(message: &str) -> FuncError {
    FuncError::domain(SqlState::InvalidArgumentForWidthBucketFunction, message)
}

fn pow10(k: u32) -> Option<Decimal> {
    let mut p = Decimal::ONE;
    for _ in 0..k {
        p = p.checked_mul(Decimal::TEN)?;
    }
    Some(p)
}

/// Round (or truncate, per `strategy`) to `scale` fractional digits. A
/// negative scale rounds to the left of the decimal point.
fn round_to_scale(d: Decimal, scale: i32, strategy: RoundingStrategy) -> Result<Decimal> {
    if scale >= 0 {
        let dp = scale.unsigned_abs().min(MAX_SCALE);
        let mut rounded = d.round_dp_with_strategy(dp, strategy);
        if rounded.scale() < dp {
            rounded.rescale(dp);
        }
        return Ok(rounded);
    }
    let Some(factor) = pow10(scale.unsigned_abs()) else {
        return Ok(Decimal::ZERO);
    };
    let shifted = d.checked_div(factor).ok_or_else(numeric_overflow)?;
    shifted
        .round_dp_with_strategy(0, strategy)
        .checked_mul(factor)
        .ok_or_else(numeric_overflow)
}

fn gcd_u128(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

fn gcd_decimal(a: Decimal, b: Decimal) -> Result<Decimal> {
    let (mut a, mut b) = (a.abs(), b.abs());
    while !b.is_zero() {
        let t = a.checked_rem(b).ok_or_else(numeric_overflow)?;
        a = b;
        b = t;
    }
    Ok(a)
}

// ── abs ───────────────────────────────────────────────────────────────────

fn abs_int2(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    int2_arg(args, 0)?
        .checked_abs()
        .map(Value::Int2)
        .ok_or_else(|| FuncError::out_of_range("smallint"))
}

fn abs_int4(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    int4_arg(args, 0)?
        .checked_abs()
        .map(Value::Int4)
        .ok_or_else(|| FuncError::out_of_range("integer"))
}

fn abs_int8(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    int8_arg(args, 0)?
        .checked_abs()
        .map(Value::Int8)
        .ok_or_else(|| FuncError::out_of_range("bigint"))
}

fn abs_float4(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    Ok(Value::Float4(float4_arg(args, 0)?.abs()))
}

fn abs_float8(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    Ok(Value::Float8(float8_arg(args, 0)?.abs()))
}

fn abs_numeric(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    Ok(Value::Numeric(numeric_arg(args, 0)?.abs()))
}

// ── Rounding ──────────────────────────────────────────────────────────────

fn ceil_float8(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    Ok(Value::Float8(float8_arg(args, 0)?.ceil()))
}

fn ceil_numeric(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    Ok(Value::Numeric(numeric_arg(args, 0)?.ceil()))
}

fn floor_float8(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    Ok(Value::Float8(float8_arg(args, 0)?.floor()))
}

fn floor_numeric(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    Ok(Value::Numeric(numeric_arg(args, 0)?.floor()))
}

/// Round half to even, like the C library's `rint`.
fn round_float8(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    Ok(Value::Float8(float8_arg(args, 0)?.round_ties_even()))
}

/// Half away from zero.
fn round_numeric(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    let d = numeric_arg(args, 0)?;
    let scale = int4_arg(args, 1)?;
    round_to_scale(d, scale, RoundingStrategy::MidpointAwayFromZero).map(Value::Numeric)
}

fn trunc_float8(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    Ok(Value::Float8(float8_arg(args, 0)?.trunc()))
}

fn trunc_numeric(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    let d = numeric_arg(args, 0)?;
    let scale = int4_arg(args, 1)?;
    round_to_scale(d, scale, RoundingStrategy::ToZero).map(Value::Numeric)
}

/// Call a two-argument `round` or `trunc` overload with scale 0.
fn at_scale_zero(
    target: &FunctionDescriptor,
    ctx: &ExecContext,
    args: &[Value],
) -> Result<Value> {
    target.invoke(ctx, &[args[0].clone(), Value::Int4(0)])
}

// ── Roots, exponentials and logarithms ────────────────────────────────────

fn cbrt_float8(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    let x = float8_arg(args, 0)?;
    check_float8(x.cbrt(), x.is_infinite(), x == 0.0).map(Value::Float8)
}

fn sqrt_float8(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    let x = float8_arg(args, 0)?;
    if x < 0.0 {
        return Err(negative_sqrt());
    }
    check_float8(x.sqrt(), x.is_infinite(), x == 0.0).map(Value::Float8)
}

fn sqrt_numeric(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    let d = numeric_arg(args, 0)?;
    if d.is_sign_negative() && !d.is_zero() {
        return Err(negative_sqrt());
    }
    d.sqrt().map(Value::Numeric).ok_or_else(numeric_overflow)
}

fn exp_float8(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    let x = float8_arg(args, 0)?;
    check_float8(x.exp(), x.is_infinite(), x.is_infinite()).map(Value::Float8)
}

fn exp_numeric(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    let x = numeric_arg(args, 0)?;
    match x.checked_exp() {
        Some(v) => Ok(Value::Numeric(v)),
        // underflow rounds to zero
        None if x.is_sign_negative() => Ok(Value::Numeric(Decimal::ZERO)),
        None => Err(numeric_overflow()),
    }
}

fn ln_float8(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    let x = float8_arg(args, 0)?;
    log_domain(x == 0.0, x < 0.0)?;
    check_float8(x.ln(), x.is_infinite(), x == 1.0).map(Value::Float8)
}

fn ln_numeric(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    let d = numeric_arg(args, 0)?;
    log_domain(d.is_zero(), d.is_sign_negative())?;
    d.checked_ln().map(Value::Numeric).ok_or_else(numeric_overflow)
}

/// Base-10 logarithm.
fn log_float8(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    let x = float8_arg(args, 0)?;
    log_domain(x == 0.0, x < 0.0)?;
    check_float8(x.log10(), x.is_infinite(), x == 1.0).map(Value::Float8)
}

fn log_numeric(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    let d = numeric_arg(args, 0)?;
    log_domain(d.is_zero(), d.is_sign_negative())?;
    d.checked_log10().map(Value::Numeric).ok_or_else(numeric_overflow)
}

/// `log(base, x)`.
fn log_base_numeric(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    let base = numeric_arg(args, 0)?;
    let x = numeric_arg(args, 1)?;
    log_domain(base.is_zero(), base.is_sign_negative())?;
    log_domain(x.is_zero(), x.is_sign_negative())?;
    if base == Decimal::ONE {
        return Err(FuncError::division_by_zero());
    }
    let ln_x = x.checked_ln().ok_or_else(numeric_overflow)?;
    let ln_base = base.checked_ln().ok_or_else(numeric_overflow)?;
    ln_x.checked_div(ln_base)
        .map(Value::Numeric)
        .ok_or_else(numeric_overflow)
}

fn power_float8(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    let x = float8_arg(args, 0)?;
    let y = float8_arg(args, 1)?;
    if x == 0.0 && y < 0.0 {
        return Err(zero_to_negative_power());
    }
    if x.is_finite() && x < 0.0 && y.is_finite() && y.fract() != 0.0 {
        return Err(complex_power());
    }
    let inputs_finite = x.is_finite() && y.is_finite();
    check_float8(x.powf(y), !inputs_finite, x == 0.0 || !inputs_finite).map(Value::Float8)
}

fn power_numeric(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    let x = numeric_arg(args, 0)?;
    let y = numeric_arg(args, 1)?;
    let y_integral = y.fract().is_zero();
    if x.is_zero() && y.is_sign_negative() && !y.is_zero() {
        return Err(zero_to_negative_power());
    }
    if x.is_sign_negative() && !x.is_zero() && !y_integral {
        return Err(complex_power());
    }
    let result = if y_integral {
        y.to_i64().and_then(|e| x.checked_powi(e))
    } else {
        x.checked_powd(y)
    };
    result.map(Value::Numeric).ok_or_else(numeric_overflow)
}

// ── Integer and numeric arithmetic ────────────────────────────────────────

/// Integer quotient of `x / y`, truncated toward zero.
fn div_numeric(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    let x = numeric_arg(args, 0)?;
    let y = numeric_arg(args, 1)?;
    if y.is_zero() {
        return Err(FuncError::division_by_zero());
    }
    x.checked_div(y)
        .map(|q| Value::Numeric(q.trunc()))
        .ok_or_else(numeric_overflow)
}

fn mod_int2(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    let x = int2_arg(args, 0)?;
    let y = int2_arg(args, 1)?;
    if y == 0 {
        return Err(FuncError::division_by_zero());
    }
    Ok(Value::Int2(x.wrapping_rem(y)))
}

fn mod_int4(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    let x = int4_arg(args, 0)?;
    let y = int4_arg(args, 1)?;
    if y == 0 {
        return Err(FuncError::division_by_zero());
    }
    Ok(Value::Int4(x.wrapping_rem(y)))
}

fn mod_int8(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    let x = int8_arg(args, 0)?;
    let y = int8_arg(args, 1)?;
    if y == 0 {
        return Err(FuncError::division_by_zero());
    }
    Ok(Value::Int8(x.wrapping_rem(y)))
}

fn mod_numeric(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    let x = numeric_arg(args, 0)?;
    let y = numeric_arg(args, 1)?;
    if y.is_zero() {
        return Err(FuncError::division_by_zero());
    }
    x.checked_rem(y).map(Value::Numeric).ok_or_else(numeric_overflow)
}

fn factorial_int8(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    let n = int8_arg(args, 0)?;
    if n < 0 {
        return Err(FuncError::invalid_parameter(
            "factorial of a negative number is undefined",
        ));
    }
    let mut product = Decimal::ONE;
    for k in 2..=n {
        product = product
            .checked_mul(Decimal::from(k))
            .ok_or_else(numeric_overflow)?;
    }
    Ok(Value::Numeric(product))
}

fn gcd_int4(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    let a = i128::from(int4_arg(args, 0)?);
    let b = i128::from(int4_arg(args, 1)?);
    i32::try_from(gcd_u128(a.unsigned_abs(), b.unsigned_abs()))
        .map(Value::Int4)
        .map_err(|_| FuncError::out_of_range("integer"))
}

fn gcd_int8(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    let a = i128::from(int8_arg(args, 0)?);
    let b = i128::from(int8_arg(args, 1)?);
    i64::try_from(gcd_u128(a.unsigned_abs(), b.unsigned_abs()))
        .map(Value::Int8)
        .map_err(|_| FuncError::out_of_range("bigint"))
}

fn gcd_numeric(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    gcd_decimal(numeric_arg(args, 0)?, numeric_arg(args, 1)?).map(Value::Numeric)
}

/// `|a / gcd(a, b) * b|`, with the divisor computed by the same-typed `gcd`
/// overload.
fn lcm_int4(gcd: &FunctionDescriptor, ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    let a = int4_arg(args, 0)?;
    let b = int4_arg(args, 1)?;
    if a == 0 || b == 0 {
        return Ok(Value::Int4(0));
    }
    let g = i64::from(int4_arg(&[gcd.invoke(ctx, args)?], 0)?);
    let lcm = (i64::from(a) / g * i64::from(b)).abs();
    i32::try_from(lcm)
        .map(Value::Int4)
        .map_err(|_| FuncError::out_of_range("integer"))
}

fn lcm_int8(gcd: &FunctionDescriptor, ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    let a = int8_arg(args, 0)?;
    let b = int8_arg(args, 1)?;
    if a == 0 || b == 0 {
        return Ok(Value::Int8(0));
    }
    let g = i128::from(int8_arg(&[gcd.invoke(ctx, args)?], 0)?);
    let lcm = (i128::from(a) / g * i128::from(b)).abs();
    i64::try_from(lcm)
        .map(Value::Int8)
        .map_err(|_| FuncError::out_of_range("bigint"))
}

fn lcm_numeric(gcd: &FunctionDescriptor, ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    let a = numeric_arg(args, 0)?;
    let b = numeric_arg(args, 1)?;
    if a.is_zero() || b.is_zero() {
        return Ok(Value::Numeric(Decimal::ZERO));
    }
    let g = numeric_arg(&[gcd.invoke(ctx, args)?], 0)?;
    a.checked_div(g)
        .and_then(|q| q.checked_mul(b))
        .map(|l| Value::Numeric(l.abs()))
        .ok_or_else(numeric_overflow)
}

// ── Scale inspection ──────────────────────────────────────────────────────

fn scale_numeric(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    Ok(Value::Int4(numeric_arg(args, 0)?.scale() as i32))
}

/// Smallest scale that represents the value exactly.
fn min_scale_numeric(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    Ok(Value::Int4(numeric_arg(args, 0)?.normalize().scale() as i32))
}

fn trim_scale_numeric(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    Ok(Value::Numeric(numeric_arg(args, 0)?.normalize()))
}

// ── Other ─────────────────────────────────────────────────────────────────

fn degrees_float8(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    let x = float8_arg(args, 0)?;
    check_float8(x.to_degrees(), x.is_infinite(), x == 0.0).map(Value::Float8)
}

fn radians_float8(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    let x = float8_arg(args, 0)?;
    check_float8(x.to_radians(), x.is_infinite(), x == 0.0).map(Value::Float8)
}

fn pi(_ctx: &ExecContext, _args: &[Value]) -> Result<Value> {
    Ok(Value::Float8(std::f64::consts::PI))
}

/// Uniform in `[0, 1)`.
fn random(_ctx: &ExecContext, _args: &[Value]) -> Result<Value> {
    Ok(Value::Float8(rand::random::<f64>()))
}

fn sign_float8(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    let x = float8_arg(args, 0)?;
    let sign = if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else if x.is_nan() {
        x
    } else {
        0.0
    };
    Ok(Value::Float8(sign))
}

fn sign_numeric(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    let d = numeric_arg(args, 0)?;
    let sign = if d.is_zero() {
        Decimal::ZERO
    } else if d.is_sign_negative() {
        Decimal::NEGATIVE_ONE
    } else {
        Decimal::ONE
    };
    Ok(Value::Numeric(sign))
}

// ── width_bucket ──────────────────────────────────────────────────────────

/// Bucket index for operands at or past the upper end of the range.
fn past_last_bucket(count: i32) -> Result<i32> {
    count
        .checked_add(1)
        .ok_or_else(|| FuncError::out_of_range("integer"))
}

/// How far `x` lies from `from` toward `to`, as a fraction of the span.
/// Halves every operand when the span itself overflows.
fn span_fraction(x: f64, from: f64, to: f64) -> f64 {
    if (to - from).is_infinite() {
        (x / 2.0 - from / 2.0) / (to / 2.0 - from / 2.0)
    } else {
        (x - from) / (to - from)
    }
}

/// 1-based bucket for an operand `fraction` of the way through the range.
fn bucket_of(fraction: f64, count: i32) -> i32 {
    let bucket = (fraction * f64::from(count)).floor() as i32 + 1;
    bucket.clamp(1, count)
}

fn width_bucket_float8(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    let operand = float8_arg(args, 0)?;
    let low = float8_arg(args, 1)?;
    let high = float8_arg(args, 2)?;
    let count = int4_arg(args, 3)?;
    if count <= 0 {
        return Err(bucket_error("count must be greater than zero"));
    }
    if operand.is_nan() || low.is_nan() || high.is_nan() {
        return Err(bucket_error(
            "operand, lower bound, and upper bound cannot be NaN",
        ));
    }
    if !low.is_finite() || !high.is_finite() {
        return Err(bucket_error("lower and upper bounds must be finite"));
    }
    if low == high {
        return Err(bucket_error("lower bound cannot equal upper bound"));
    }
    let bucket = if low < high {
        if operand < low {
            0
        } else if operand >= high {
            past_last_bucket(count)?
        } else {
            bucket_of(span_fraction(operand, low, high), count)
        }
    } else if operand > low {
        0
    } else if operand <= high {
        past_last_bucket(count)?
    } else {
        bucket_of(span_fraction(operand, low, high), count)
    };
    Ok(Value::Int4(bucket))
}

/// `(x - from, to - from)`. When either difference overflows, both are
/// taken over quartered operands, which keeps their ratio.
fn decimal_span(x: Decimal, from: Decimal, to: Decimal) -> (Decimal, Decimal) {
    x.checked_sub(from)
        .zip(to.checked_sub(from))
        .unwrap_or_else(|| {
            let four = Decimal::from(4);
            (x / four - from / four, to / four - from / four)
        })
}

fn width_bucket_numeric(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    let operand = numeric_arg(args, 0)?;
    let low = numeric_arg(args, 1)?;
    let high = numeric_arg(args, 2)?;
    let count = int4_arg(args, 3)?;
    if count <= 0 {
        return Err(bucket_error("count must be greater than zero"));
    }
    if low == high {
        return Err(bucket_error("lower bound cannot equal upper bound"));
    }
    let (offset, span) = if low < high {
        if operand < low {
            return Ok(Value::Int4(0));
        }
        if operand >= high {
            return past_last_bucket(count).map(Value::Int4);
        }
        decimal_span(operand, low, high)
    } else {
        if operand > low {
            return Ok(Value::Int4(0));
        }
        if operand <= high {
            return past_last_bucket(count).map(Value::Int4);
        }
        decimal_span(operand, low, high)
    };
    let buckets = Decimal::from(count);
    let scaled = offset
        .checked_mul(buckets)
        .and_then(|p| p.checked_div(span))
        .or_else(|| offset.checked_div(span).and_then(|f| f.checked_mul(buckets)))
        .ok_or_else(numeric_overflow)?;
    let bucket = scaled
        .floor()
        .to_i32()
        .ok_or_else(|| FuncError::out_of_range("integer"))?
        .saturating_add(1);
    Ok(Value::Int4(bucket.clamp(1, count)))
}

// ── Registration ──────────────────────────────────────────────────────────

/// Register the math builtins. Aliases (`ceiling`, `log10`, `pow`) and the
/// defaulted forms of `round`/`trunc` forward to the overloads registered
/// here; `lcm` computes through the same-typed `gcd`.
pub fn register_math_builtins(catalog: &mut Catalog) -> Result<()> {
    // abs
    catalog.register(FunctionDescriptor::new("abs", [Ty::Int2], Ty::Int2, abs_int2))?;
    catalog.register(FunctionDescriptor::new("abs", [Ty::Int4], Ty::Int4, abs_int4))?;
    catalog.register(FunctionDescriptor::new("abs", [Ty::Int8], Ty::Int8, abs_int8))?;
    catalog.register(FunctionDescriptor::new("abs", [Ty::Float4], Ty::Float4, abs_float4))?;
    catalog.register(FunctionDescriptor::new("abs", [Ty::Float8], Ty::Float8, abs_float8))?;
    catalog.register(FunctionDescriptor::new("abs", [Ty::Numeric], Ty::Numeric, abs_numeric))?;

    // Rounding
    let ceil_f8 =
        catalog.register(FunctionDescriptor::new("ceil", [Ty::Float8], Ty::Float8, ceil_float8))?;
    let ceil_num = catalog.register(FunctionDescriptor::new(
        "ceil",
        [Ty::Numeric],
        Ty::Numeric,
        ceil_numeric,
    ))?;
    catalog.register(FunctionDescriptor::alias("ceiling", &ceil_f8))?;
    catalog.register(FunctionDescriptor::alias("ceiling", &ceil_num))?;
    catalog.register(FunctionDescriptor::new("floor", [Ty::Float8], Ty::Float8, floor_float8))?;
    catalog.register(FunctionDescriptor::new(
        "floor",
        [Ty::Numeric],
        Ty::Numeric,
        floor_numeric,
    ))?;

    catalog.register(FunctionDescriptor::new("round", [Ty::Float8], Ty::Float8, round_float8))?;
    let round2 = catalog.register(FunctionDescriptor::new(
        "round",
        [Ty::Numeric, Ty::Int4],
        Ty::Numeric,
        round_numeric,
    ))?;
    catalog.register(FunctionDescriptor::new(
        "round",
        [Ty::Numeric],
        Ty::Numeric,
        move |ctx: &ExecContext, args: &[Value]| at_scale_zero(&round2, ctx, args),
    ))?;

    catalog.register(FunctionDescriptor::new("trunc", [Ty::Float8], Ty::Float8, trunc_float8))?;
    let trunc2 = catalog.register(FunctionDescriptor::new(
        "trunc",
        [Ty::Numeric, Ty::Int4],
        Ty::Numeric,
        trunc_numeric,
    ))?;
    catalog.register(FunctionDescriptor::new(
        "trunc",
        [Ty::Numeric],
        Ty::Numeric,
        move |ctx: &ExecContext, args: &[Value]| at_scale_zero(&trunc2, ctx, args),
    ))?;

    // Roots, exponentials and logarithms
    catalog.register(FunctionDescriptor::new("cbrt", [Ty::Float8], Ty::Float8, cbrt_float8))?;
    catalog.register(FunctionDescriptor::new("sqrt", [Ty::Float8], Ty::Float8, sqrt_float8))?;
    catalog.register(FunctionDescriptor::new("sqrt", [Ty::Numeric], Ty::Numeric, sqrt_numeric))?;
    catalog.register(FunctionDescriptor::new("exp", [Ty::Float8], Ty::Float8, exp_float8))?;
    catalog.register(FunctionDescriptor::new("exp", [Ty::Numeric], Ty::Numeric, exp_numeric))?;
    catalog.register(FunctionDescriptor::new("ln", [Ty::Float8], Ty::Float8, ln_float8))?;
    catalog.register(FunctionDescriptor::new("ln", [Ty::Numeric], Ty::Numeric, ln_numeric))?;
    let log_f8 =
        catalog.register(FunctionDescriptor::new("log", [Ty::Float8], Ty::Float8, log_float8))?;
    let log_num =
        catalog.register(FunctionDescriptor::new("log", [Ty::Numeric], Ty::Numeric, log_numeric))?;
    catalog.register(FunctionDescriptor::new(
        "log",
        [Ty::Numeric, Ty::Numeric],
        Ty::Numeric,
        log_base_numeric,
    ))?;
    catalog.register(FunctionDescriptor::alias("log10", &log_f8))?;
    catalog.register(FunctionDescriptor::alias("log10", &log_num))?;

    let power_f8 = catalog.register(FunctionDescriptor::new(
        "power",
        [Ty::Float8, Ty::Float8],
        Ty::Float8,
        power_float8,
    ))?;
    let power_num = catalog.register(FunctionDescriptor::new(
        "power",
        [Ty::Numeric, Ty::Numeric],
        Ty::Numeric,
        power_numeric,
    ))?;
    catalog.register(FunctionDescriptor::alias("pow", &power_f8))?;
    catalog.register(FunctionDescriptor::alias("pow", &power_num))?;

    // Integer and numeric arithmetic
    catalog.register(FunctionDescriptor::new(
        "div",
        [Ty::Numeric, Ty::Numeric],
        Ty::Numeric,
        div_numeric,
    ))?;
    catalog.register(FunctionDescriptor::new("mod", [Ty::Int2, Ty::Int2], Ty::Int2, mod_int2))?;
    catalog.register(FunctionDescriptor::new("mod", [Ty::Int4, Ty::Int4], Ty::Int4, mod_int4))?;
    catalog.register(FunctionDescriptor::new("mod", [Ty::Int8, Ty::Int8], Ty::Int8, mod_int8))?;
    catalog.register(FunctionDescriptor::new(
        "mod",
        [Ty::Numeric, Ty::Numeric],
        Ty::Numeric,
        mod_numeric,
    ))?;
    catalog.register(FunctionDescriptor::new(
        "factorial",
        [Ty::Int8],
        Ty::Numeric,
        factorial_int8,
    ))?;

    let gcd4 =
        catalog.register(FunctionDescriptor::new("gcd", [Ty::Int4, Ty::Int4], Ty::Int4, gcd_int4))?;
    let gcd8 =
        catalog.register(FunctionDescriptor::new("gcd", [Ty::Int8, Ty::Int8], Ty::Int8, gcd_int8))?;
    let gcd_num = catalog.register(FunctionDescriptor::new(
        "gcd",
        [Ty::Numeric, Ty::Numeric],
        Ty::Numeric,
        gcd_numeric,
    ))?;
    catalog.register(FunctionDescriptor::new(
        "lcm",
        [Ty::Int4, Ty::Int4],
        Ty::Int4,
        move |ctx: &ExecContext, args: &[Value]| lcm_int4(&gcd4, ctx, args),
    ))?;
    catalog.register(FunctionDescriptor::new(
        "lcm",
        [Ty::Int8, Ty::Int8],
        Ty::Int8,
        move |ctx: &ExecContext, args: &[Value]| lcm_int8(&gcd8, ctx, args),
    ))?;
    catalog.register(FunctionDescriptor::new(
        "lcm",
        [Ty::Numeric, Ty::Numeric],
        Ty::Numeric,
        move |ctx: &ExecContext, args: &[Value]| lcm_numeric(&gcd_num, ctx, args),
    ))?;

    // Scale inspection
    catalog.register(FunctionDescriptor::new("scale", [Ty::Numeric], Ty::Int4, scale_numeric))?;
    catalog.register(FunctionDescriptor::new(
        "min_scale",
        [Ty::Numeric],
        Ty::Int4,
        min_scale_numeric,
    ))?;
    catalog.register(FunctionDescriptor::new(
        "trim_scale",
        [Ty::Numeric],
        Ty::Numeric,
        trim_scale_numeric,
    ))?;

    // Other
    catalog.register(FunctionDescriptor::new(
        "degrees",
        [Ty::Float8],
        Ty::Float8,
        degrees_float8,
    ))?;
    catalog.register(FunctionDescriptor::new(
        "radians",
        [Ty::Float8],
        Ty::Float8,
        radians_float8,
    ))?;
    catalog.register(FunctionDescriptor::new("pi", [], Ty::Float8, pi))?;
    catalog.register(FunctionDescriptor::new("random", [], Ty::Float8, random).volatile())?;
    catalog.register(FunctionDescriptor::new("sign", [Ty::Float8], Ty::Float8, sign_float8))?;
    catalog.register(FunctionDescriptor::new("sign", [Ty::Numeric], Ty::Numeric, sign_numeric))?;
    catalog.register(FunctionDescriptor::new(
        "width_bucket",
        [Ty::Float8, Ty::Float8, Ty::Float8, Ty::Int4],
        Ty::Int4,
        width_bucket_float8,
    ))?;
    catalog.register(FunctionDescriptor::new(
        "width_bucket",
        [Ty::Numeric, Ty::Numeric, Ty::Numeric, Ty::Int4],
        Ty::Int4,
        width_bucket_numeric,
    ))?;

    Ok(())
}
