//! PostgreSQL string functions.
//!
//! Positions and lengths count characters, not bytes, except for
//! `octet_length` and `bit_length`. Functions that build strings whose size
//! depends on an argument (`repeat`, `lpad`, `rpad`) are bounded by
//! [`FunctionSettings::max_string_bytes`](crate::FunctionSettings::max_string_bytes).
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::unnecessary_wraps,
    clippy::too_many_lines
)]

use std::sync::Arc;

use pgfunc_error::{FuncError, Result, SqlState};
use pgfunc_types::{SqlType as Ty, Value};

use crate::builtins::{int4_arg, int8_arg, text_arg};
use crate::{Catalog, ExecContext, FunctionDescriptor};

// ── Helpers ───────────────────────────────────────────────────────────────

fn char_count(s: &str) -> usize {
    s.chars().count()
}

/// Byte offset of the `n`th character, or `s.len()` if `s` is shorter.
fn char_offset(s: &str, n: usize) -> usize {
    s.char_indices().nth(n).map_or(s.len(), |(i, _)| i)
}

fn length_value(n: usize) -> Result<Value> {
    i32::try_from(n)
        .map(Value::Int4)
        .map_err(|_| FuncError::out_of_range("integer"))
}

// ── Length and character codes ────────────────────────────────────────────

/// Code point of the first character; 0 for the empty string.
fn ascii(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    let s = text_arg(args, 0)?;
    Ok(Value::Int4(s.chars().next().map_or(0, |c| c as i32)))
}

fn bit_length(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    let bytes = text_arg(args, 0)?.len();
    length_value(bytes.saturating_mul(8))
}

fn octet_length(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    length_value(text_arg(args, 0)?.len())
}

fn char_length(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    length_value(char_count(text_arg(args, 0)?))
}

fn chr(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    let code = int4_arg(args, 0)?;
    if code == 0 {
        return Err(FuncError::invalid_parameter("null character not permitted"));
    }
    if code < 0 {
        return Err(FuncError::domain(
            SqlState::ProgramLimitExceeded,
            "character number must be positive",
        ));
    }
    if code > 0x10_FFFF {
        return Err(FuncError::domain(
            SqlState::ProgramLimitExceeded,
            format!("requested character too large for encoding: {code}"),
        ));
    }
    char::from_u32(code as u32)
        .map(|c| Value::Text(c.to_string()))
        .ok_or_else(|| {
            FuncError::domain(
                SqlState::ProgramLimitExceeded,
                format!("requested character not valid for encoding: {code}"),
            )
        })
}

// ── Case ──────────────────────────────────────────────────────────────────

fn lower(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    Ok(Value::Text(text_arg(args, 0)?.to_lowercase()))
}

fn upper(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    Ok(Value::Text(text_arg(args, 0)?.to_uppercase()))
}

/// Upper-case the first letter of each alphanumeric run, lower-case the
/// rest.
fn initcap(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    let s = text_arg(args, 0)?;
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if in_word {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        in_word = c.is_alphanumeric();
    }
    Ok(Value::Text(out))
}

// ── Slicing ───────────────────────────────────────────────────────────────

/// First `n` characters; with negative `n`, all but the last `|n|`.
fn left(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    let s = text_arg(args, 0)?;
    let n = int4_arg(args, 1)?;
    let keep = if n >= 0 {
        n as usize
    } else {
        char_count(s).saturating_sub(n.unsigned_abs() as usize)
    };
    Ok(Value::Text(s[..char_offset(s, keep)].to_owned()))
}

/// Last `n` characters; with negative `n`, all but the first `|n|`.
fn right(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    let s = text_arg(args, 0)?;
    let n = int4_arg(args, 1)?;
    let skip = if n >= 0 {
        char_count(s).saturating_sub(n as usize)
    } else {
        n.unsigned_abs() as usize
    };
    Ok(Value::Text(s[char_offset(s, skip)..].to_owned()))
}

/// Characters `[start, start + count)`, 1-based. Positions before 1 still
/// consume `count`, so `substr('hello', -1, 3)` is `'h'`.
fn substr_with_count(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    let s = text_arg(args, 0)?;
    let start = i64::from(int4_arg(args, 1)?);
    let count = i64::from(int4_arg(args, 2)?);
    if count < 0 {
        return Err(FuncError::domain(
            SqlState::SubstringError,
            "negative substring length not allowed",
        ));
    }
    let end = start + count;
    if end <= 1 {
        return Ok(Value::Text(String::new()));
    }
    let first = start.max(1);
    let from = char_offset(s, (first - 1) as usize);
    let rest = &s[from..];
    let to = char_offset(rest, (end - first) as usize);
    Ok(Value::Text(rest[..to].to_owned()))
}

fn substr_from(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    let s = text_arg(args, 0)?;
    let start = i64::from(int4_arg(args, 1)?).max(1);
    Ok(Value::Text(s[char_offset(s, (start - 1) as usize)..].to_owned()))
}

/// Field `n` of `s` split on `delimiter`, counting from the end when `n` is
/// negative. An empty delimiter makes the whole string the only field.
fn split_part(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    let s = text_arg(args, 0)?;
    let delimiter = text_arg(args, 1)?;
    let n = int4_arg(args, 2)?;
    if n == 0 {
        return Err(FuncError::invalid_parameter("field position must not be zero"));
    }
    if s.is_empty() {
        return Ok(Value::Text(String::new()));
    }
    let fields: Vec<&str> = if delimiter.is_empty() {
        vec![s]
    } else {
        s.split(delimiter).collect()
    };
    let index = if n > 0 {
        Some(n as usize - 1)
    } else {
        fields.len().checked_sub(n.unsigned_abs() as usize)
    };
    let field = index.and_then(|i| fields.get(i)).copied().unwrap_or("");
    Ok(Value::Text(field.to_owned()))
}

// ── Search ────────────────────────────────────────────────────────────────

fn starts_with(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    let s = text_arg(args, 0)?;
    let prefix = text_arg(args, 1)?;
    Ok(Value::Bool(s.starts_with(prefix)))
}

/// 1-based character position of the first occurrence of `needle`, or 0.
fn strpos(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    let s = text_arg(args, 0)?;
    let needle = text_arg(args, 1)?;
    match s.find(needle) {
        Some(byte) => length_value(char_count(&s[..byte]) + 1),
        None => Ok(Value::Int4(0)),
    }
}

// ── Transformation ────────────────────────────────────────────────────────

fn repeat(ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    let s = text_arg(args, 0)?;
    let n = int4_arg(args, 1)?;
    if n <= 0 || s.is_empty() {
        return Ok(Value::Text(String::new()));
    }
    let bytes = s
        .len()
        .checked_mul(n as usize)
        .ok_or_else(FuncError::length_too_large)?;
    ctx.check_string_len(bytes)?;
    Ok(Value::Text(s.repeat(n as usize)))
}

fn replace(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    let s = text_arg(args, 0)?;
    let from = text_arg(args, 1)?;
    let to = text_arg(args, 2)?;
    if from.is_empty() {
        return Ok(Value::Text(s.to_owned()));
    }
    Ok(Value::Text(s.replace(from, to)))
}

fn reverse(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    Ok(Value::Text(text_arg(args, 0)?.chars().rev().collect()))
}

/// Replace each character of `from` found in `s` with the character at the
/// same position in `to`, deleting it when `to` is shorter.
fn translate(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    let s = text_arg(args, 0)?;
    let from: Vec<char> = text_arg(args, 1)?.chars().collect();
    let to: Vec<char> = text_arg(args, 2)?.chars().collect();
    let out = s
        .chars()
        .filter_map(|c| match from.iter().position(|&f| f == c) {
            Some(i) => to.get(i).copied(),
            None => Some(c),
        })
        .collect();
    Ok(Value::Text(out))
}

fn to_hex_int4(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    let v = int4_arg(args, 0)?;
    Ok(Value::Text(format!("{:x}", v as u32)))
}

fn to_hex_int8(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    let v = int8_arg(args, 0)?;
    Ok(Value::Text(format!("{:x}", v as u64)))
}

/// Quote as a string literal: single quotes are doubled, and a string
/// containing backslashes doubles them and gets an `E` prefix.
fn quote_literal(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    let s = text_arg(args, 0)?;
    let mut out = String::with_capacity(s.len() + 3);
    if s.contains('\\') {
        out.push('E');
    }
    out.push('\'');
    for c in s.chars() {
        if c == '\'' || c == '\\' {
            out.push(c);
        }
        out.push(c);
    }
    out.push('\'');
    Ok(Value::Text(out))
}

/// Non-strict: NULL becomes the unquoted word `NULL`.
fn quote_nullable(
    quote_literal: &FunctionDescriptor,
    ctx: &ExecContext,
    args: &[Value],
) -> Result<Value> {
    if args[0].is_null() {
        return Ok(Value::Text("NULL".to_owned()));
    }
    quote_literal.invoke(ctx, args)
}

// ── Padding ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy)]
enum Side {
    Left,
    Right,
}

/// Pad `s` to `len` characters with repetitions of `fill`, or truncate it
/// to `len` characters if it is longer.
fn pad(ctx: &ExecContext, args: &[Value], side: Side) -> Result<Value> {
    let s = text_arg(args, 0)?;
    let len = int4_arg(args, 1)?;
    let fill = text_arg(args, 2)?;
    if len <= 0 {
        return Ok(Value::Text(String::new()));
    }
    let len = len as usize;
    ctx.check_string_len(len)?;
    let have = char_count(s);
    if have >= len || fill.is_empty() {
        return Ok(Value::Text(s[..char_offset(s, len)].to_owned()));
    }
    let padding: String = fill.chars().cycle().take(len - have).collect();
    ctx.check_string_len(s.len() + padding.len())?;
    let mut out = String::with_capacity(s.len() + padding.len());
    match side {
        Side::Left => {
            out.push_str(&padding);
            out.push_str(s);
        }
        Side::Right => {
            out.push_str(s);
            out.push_str(&padding);
        }
    }
    Ok(Value::Text(out))
}

fn lpad(ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    pad(ctx, args, Side::Left)
}

fn rpad(ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    pad(ctx, args, Side::Right)
}

// ── Trimming ──────────────────────────────────────────────────────────────

fn ltrim(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    let s = text_arg(args, 0)?;
    let chars = text_arg(args, 1)?;
    Ok(Value::Text(
        s.trim_start_matches(|c| chars.contains(c)).to_owned(),
    ))
}

fn rtrim(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    let s = text_arg(args, 0)?;
    let chars = text_arg(args, 1)?;
    Ok(Value::Text(s.trim_end_matches(|c| chars.contains(c)).to_owned()))
}

/// `rtrim(ltrim(s, chars), chars)`.
fn btrim(
    ltrim: &FunctionDescriptor,
    rtrim: &FunctionDescriptor,
    ctx: &ExecContext,
    args: &[Value],
) -> Result<Value> {
    let trimmed = ltrim.invoke(ctx, args)?;
    rtrim.invoke(ctx, &[trimmed, args[1].clone()])
}

/// Append a constant trailing argument and forward to `target`.
fn with_default(
    target: &FunctionDescriptor,
    default: &Value,
    ctx: &ExecContext,
    args: &[Value],
) -> Result<Value> {
    let mut full = Vec::with_capacity(args.len() + 1);
    full.extend_from_slice(args);
    full.push(default.clone());
    target.invoke(ctx, &full)
}

/// Register `name(params without last)` forwarding to `target` with `default`
/// as its final argument.
fn register_defaulted<const N: usize>(
    catalog: &mut Catalog,
    name: &str,
    params: [Ty; N],
    target: &Arc<FunctionDescriptor>,
    default: Value,
) -> Result<()> {
    let target = Arc::clone(target);
    let return_type = target.return_type();
    catalog.register(FunctionDescriptor::new(
        name,
        params,
        return_type,
        move |ctx: &ExecContext, args: &[Value]| with_default(&target, &default, ctx, args),
    ))?;
    Ok(())
}

// ── Registration ──────────────────────────────────────────────────────────

/// Register the string builtins.
///
/// Defaulted forms (`lpad(text, int4)`, `ltrim(text)`, ...) and aliases
/// (`length`, `substring`) forward to the overloads registered here, and
/// `btrim` is `ltrim` followed by `rtrim`.
pub fn register_string_builtins(catalog: &mut Catalog) -> Result<()> {
    let space = Value::from(" ");

    // Length and character codes
    catalog.register(FunctionDescriptor::new("ascii", [Ty::Text], Ty::Int4, ascii))?;
    catalog.register(FunctionDescriptor::new("bit_length", [Ty::Text], Ty::Int4, bit_length))?;
    catalog.register(FunctionDescriptor::new(
        "octet_length",
        [Ty::Text],
        Ty::Int4,
        octet_length,
    ))?;
    let char_len =
        catalog.register(FunctionDescriptor::new("char_length", [Ty::Text], Ty::Int4, char_length))?;
    catalog.register(FunctionDescriptor::alias("character_length", &char_len))?;
    catalog.register(FunctionDescriptor::alias("length", &char_len))?;
    catalog.register(FunctionDescriptor::new("chr", [Ty::Int4], Ty::Text, chr))?;

    // Case
    catalog.register(FunctionDescriptor::new("lower", [Ty::Text], Ty::Text, lower))?;
    catalog.register(FunctionDescriptor::new("upper", [Ty::Text], Ty::Text, upper))?;
    catalog.register(FunctionDescriptor::new("initcap", [Ty::Text], Ty::Text, initcap))?;

    // Slicing
    catalog.register(FunctionDescriptor::new("left", [Ty::Text, Ty::Int4], Ty::Text, left))?;
    catalog.register(FunctionDescriptor::new("right", [Ty::Text, Ty::Int4], Ty::Text, right))?;
    let substr3 = catalog.register(FunctionDescriptor::new(
        "substr",
        [Ty::Text, Ty::Int4, Ty::Int4],
        Ty::Text,
        substr_with_count,
    ))?;
    let substr2 = catalog.register(FunctionDescriptor::new(
        "substr",
        [Ty::Text, Ty::Int4],
        Ty::Text,
        substr_from,
    ))?;
    catalog.register(FunctionDescriptor::alias("substring", &substr3))?;
    catalog.register(FunctionDescriptor::alias("substring", &substr2))?;
    catalog.register(FunctionDescriptor::new(
        "split_part",
        [Ty::Text, Ty::Text, Ty::Int4],
        Ty::Text,
        split_part,
    ))?;

    // Search
    catalog.register(FunctionDescriptor::new(
        "starts_with",
        [Ty::Text, Ty::Text],
        Ty::Bool,
        starts_with,
    ))?;
    catalog.register(FunctionDescriptor::new("strpos", [Ty::Text, Ty::Text], Ty::Int4, strpos))?;

    // Transformation
    catalog.register(FunctionDescriptor::new("repeat", [Ty::Text, Ty::Int4], Ty::Text, repeat))?;
    catalog.register(FunctionDescriptor::new(
        "replace",
        [Ty::Text, Ty::Text, Ty::Text],
        Ty::Text,
        replace,
    ))?;
    catalog.register(FunctionDescriptor::new("reverse", [Ty::Text], Ty::Text, reverse))?;
    catalog.register(FunctionDescriptor::new(
        "translate",
        [Ty::Text, Ty::Text, Ty::Text],
        Ty::Text,
        translate,
    ))?;
    catalog.register(FunctionDescriptor::new("to_hex", [Ty::Int4], Ty::Text, to_hex_int4))?;
    catalog.register(FunctionDescriptor::new("to_hex", [Ty::Int8], Ty::Text, to_hex_int8))?;
    let quote = catalog.register(FunctionDescriptor::new(
        "quote_literal",
        [Ty::Text],
        Ty::Text,
        quote_literal,
    ))?;
    catalog.register(
        FunctionDescriptor::new(
            "quote_nullable",
            [Ty::Text],
            Ty::Text,
            move |ctx: &ExecContext, args: &[Value]| quote_nullable(&quote, ctx, args),
        )
        .non_strict(),
    )?;

    // Padding
    let lpad3 = catalog.register(FunctionDescriptor::new(
        "lpad",
        [Ty::Text, Ty::Int4, Ty::Text],
        Ty::Text,
        lpad,
    ))?;
    let rpad3 = catalog.register(FunctionDescriptor::new(
        "rpad",
        [Ty::Text, Ty::Int4, Ty::Text],
        Ty::Text,
        rpad,
    ))?;
    register_defaulted(catalog, "lpad", [Ty::Text, Ty::Int4], &lpad3, space.clone())?;
    register_defaulted(catalog, "rpad", [Ty::Text, Ty::Int4], &rpad3, space.clone())?;

    // Trimming
    let ltrim2 =
        catalog.register(FunctionDescriptor::new("ltrim", [Ty::Text, Ty::Text], Ty::Text, ltrim))?;
    let rtrim2 =
        catalog.register(FunctionDescriptor::new("rtrim", [Ty::Text, Ty::Text], Ty::Text, rtrim))?;
    let btrim2 = {
        let (ltrim2, rtrim2) = (Arc::clone(&ltrim2), Arc::clone(&rtrim2));
        catalog.register(FunctionDescriptor::new(
            "btrim",
            [Ty::Text, Ty::Text],
            Ty::Text,
            move |ctx: &ExecContext, args: &[Value]| btrim(&ltrim2, &rtrim2, ctx, args),
        ))?
    };
    register_defaulted(catalog, "ltrim", [Ty::Text], &ltrim2, space.clone())?;
    register_defaulted(catalog, "rtrim", [Ty::Text], &rtrim2, space.clone())?;
    register_defaulted(catalog, "btrim", [Ty::Text], &btrim2, space)?;

    Ok(())
}
