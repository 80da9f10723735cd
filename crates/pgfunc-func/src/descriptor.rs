//! Function descriptors and the invoker.
//!
//! A [`FunctionDescriptor`] is one overload: a name, a fixed parameter list,
//! a return type, a strictness flag and a body. Bodies implement
//! [`ScalarFunction`]; plain functions and closures of the right shape do
//! so automatically.
//!
//! # Strictness
//!
//! A strict descriptor never runs its body when any argument is NULL:
//! [`FunctionDescriptor::invoke`] returns NULL instead. Bodies of strict
//! descriptors therefore never need a NULL guard.
//!
//! # Delegation
//!
//! [`Catalog::register`](crate::Catalog::register) hands back an
//! `Arc<FunctionDescriptor>`. A body that reuses another overload captures
//! that handle and calls [`FunctionDescriptor::invoke`] on it directly, so
//! the target is fixed at registration and never looked up by name again.

use std::fmt;
use std::sync::Arc;

use pgfunc_error::{FuncError, Result};
use pgfunc_types::{format_signature, SqlType, Value};
use tracing::trace;

use crate::{canonical_name, ExecContext};

/// The executable body of a scalar function.
///
/// Bodies are pure with respect to the catalog and must be thread-safe:
/// descriptors are shared across connections through `Arc`.
pub trait ScalarFunction: Send + Sync {
    /// Compute the result for one row. For strict descriptors, `args`
    /// contains no NULLs.
    fn invoke(&self, ctx: &ExecContext, args: &[Value]) -> Result<Value>;
}

impl<F> ScalarFunction for F
where
    F: Fn(&ExecContext, &[Value]) -> Result<Value> + Send + Sync,
{
    fn invoke(&self, ctx: &ExecContext, args: &[Value]) -> Result<Value> {
        self(ctx, args)
    }
}

/// One registered overload.
pub struct FunctionDescriptor {
    name: String,
    params: Box<[SqlType]>,
    return_type: SqlType,
    strict: bool,
    deterministic: bool,
    body: Box<dyn ScalarFunction>,
}

impl FunctionDescriptor {
    /// A strict, deterministic overload taking exactly `N` arguments.
    pub fn new<const N: usize, F>(
        name: &str,
        params: [SqlType; N],
        return_type: SqlType,
        body: F,
    ) -> Self
    where
        F: ScalarFunction + 'static,
    {
        Self {
            name: canonical_name(name),
            params: Box::new(params),
            return_type,
            strict: true,
            deterministic: true,
            body: Box::new(body),
        }
    }

    /// A descriptor named `name` with `target`'s signature and flags whose
    /// body forwards to `target`.
    pub fn alias(name: &str, target: &Arc<Self>) -> Self {
        let forward = Arc::clone(target);
        Self {
            name: canonical_name(name),
            params: target.params.clone(),
            return_type: target.return_type,
            strict: target.strict,
            deterministic: target.deterministic,
            body: Box::new(move |ctx: &ExecContext, args: &[Value]| forward.invoke(ctx, args)),
        }
    }

    /// Mark the body as handling NULL arguments itself.
    #[must_use]
    pub fn non_strict(mut self) -> Self {
        self.strict = false;
        self
    }

    /// Mark the function as returning different results for the same inputs.
    #[must_use]
    pub fn volatile(mut self) -> Self {
        self.deterministic = false;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn params(&self) -> &[SqlType] {
        &self.params
    }

    pub fn return_type(&self) -> SqlType {
        self.return_type
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn is_deterministic(&self) -> bool {
        self.deterministic
    }

    /// `name(t1, t2, ...)`.
    pub fn signature(&self) -> String {
        format_signature(&self.name, &self.params)
    }

    /// Run this overload on already-coerced argument values.
    ///
    /// A wrong argument count is an [`FuncError::ArityMismatch`], which
    /// signals a binder bug rather than bad input.
    pub fn invoke(&self, ctx: &ExecContext, args: &[Value]) -> Result<Value> {
        if args.len() != self.params.len() {
            return Err(FuncError::ArityMismatch {
                name: self.name.clone(),
                expected: self.params.len(),
                actual: args.len(),
            });
        }
        if self.strict && args.iter().any(Value::is_null) {
            trace!(function = %self.name, "strict null short-circuit");
            return Ok(Value::Null);
        }
        self.body.invoke(ctx, args)
    }
}

impl fmt::Debug for FunctionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionDescriptor")
            .field("signature", &self.signature())
            .field("return_type", &self.return_type)
            .field("strict", &self.strict)
            .field("deterministic", &self.deterministic)
            .finish_non_exhaustive()
    }
}

/// Execute `descriptor` against `args`.
pub fn invoke(descriptor: &FunctionDescriptor, ctx: &ExecContext, args: &[Value]) -> Result<Value> {
    descriptor.invoke(ctx, args)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn add_int4(_ctx: &ExecContext, args: &[Value]) -> Result<Value> {
        match (&args[0], &args[1]) {
            (Value::Int4(a), Value::Int4(b)) => a
                .checked_add(*b)
                .map(Value::Int4)
                .ok_or_else(|| FuncError::out_of_range("integer")),
            (a, _) => Err(FuncError::type_mismatch("int4", a.type_name())),
        }
    }

    fn probe(counter: &Arc<AtomicUsize>) -> impl ScalarFunction + 'static {
        let counter = Arc::clone(counter);
        move |_ctx: &ExecContext, _args: &[Value]| -> Result<Value> {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(FuncError::internal("probe body ran"))
        }
    }

    #[test]
    fn test_metadata() {
        let d = FunctionDescriptor::new("Add", [SqlType::Int4, SqlType::Int4], SqlType::Int4, add_int4);
        assert_eq!(d.name(), "add");
        assert_eq!(d.arity(), 2);
        assert_eq!(d.params(), &[SqlType::Int4, SqlType::Int4]);
        assert_eq!(d.return_type(), SqlType::Int4);
        assert!(d.is_strict());
        assert!(d.is_deterministic());
        assert_eq!(d.signature(), "add(int4, int4)");
    }

    #[test]
    fn test_builders() {
        let body = |_: &ExecContext, _: &[Value]| -> Result<Value> { Ok(Value::Float8(0.5)) };
        let d = FunctionDescriptor::new("r", [], SqlType::Float8, body)
            .non_strict()
            .volatile();
        assert!(!d.is_strict());
        assert!(!d.is_deterministic());
    }

    #[test]
    fn test_invoke_runs_body() {
        let d = FunctionDescriptor::new("add", [SqlType::Int4, SqlType::Int4], SqlType::Int4, add_int4);
        let ctx = ExecContext::default();
        assert_eq!(
            invoke(&d, &ctx, &[Value::Int4(2), Value::Int4(3)]).unwrap(),
            Value::Int4(5)
        );
        let err = d.invoke(&ctx, &[Value::Int4(i32::MAX), Value::Int4(1)]).unwrap_err();
        assert_eq!(err.to_string(), "integer out of range");
    }

    #[test]
    fn test_strict_null_never_reaches_body() {
        let counter = Arc::new(AtomicUsize::new(0));
        let d = FunctionDescriptor::new(
            "probe",
            [SqlType::Int4, SqlType::Text],
            SqlType::Int4,
            probe(&counter),
        );
        let ctx = ExecContext::default();
        for args in [
            [Value::Null, Value::from("x")],
            [Value::Int4(1), Value::Null],
            [Value::Null, Value::Null],
        ] {
            assert_eq!(d.invoke(&ctx, &args).unwrap(), Value::Null);
        }
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        assert!(d.invoke(&ctx, &[Value::Int4(1), Value::from("x")]).is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_non_strict_sees_nulls() {
        let counter = Arc::new(AtomicUsize::new(0));
        let d = FunctionDescriptor::new("probe", [SqlType::Int4], SqlType::Int4, probe(&counter))
            .non_strict();
        assert!(d.invoke(&ExecContext::default(), &[Value::Null]).is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_arity_mismatch_is_defect() {
        let d = FunctionDescriptor::new("add", [SqlType::Int4, SqlType::Int4], SqlType::Int4, add_int4);
        let err = d.invoke(&ExecContext::default(), &[Value::Int4(1)]).unwrap_err();
        assert_eq!(
            err,
            FuncError::ArityMismatch {
                name: "add".to_owned(),
                expected: 2,
                actual: 1
            }
        );
        assert!(err.is_defect());
    }

    #[test]
    fn test_arity_checked_before_null_short_circuit() {
        let d = FunctionDescriptor::new("add", [SqlType::Int4, SqlType::Int4], SqlType::Int4, add_int4);
        let err = d.invoke(&ExecContext::default(), &[Value::Null]).unwrap_err();
        assert!(matches!(err, FuncError::ArityMismatch { .. }));
    }

    #[test]
    fn test_alias_forwards_to_target() {
        let target = Arc::new(FunctionDescriptor::new(
            "add",
            [SqlType::Int4, SqlType::Int4],
            SqlType::Int4,
            add_int4,
        ));
        let alias = FunctionDescriptor::alias("plus", &target);
        assert_eq!(alias.signature(), "plus(int4, int4)");
        assert_eq!(
            alias
                .invoke(&ExecContext::default(), &[Value::Int4(4), Value::Int4(5)])
                .unwrap(),
            Value::Int4(9)
        );
    }

    #[test]
    fn test_debug_shows_signature() {
        let d = FunctionDescriptor::new("add", [SqlType::Int4, SqlType::Int4], SqlType::Int4, add_int4);
        let dbg = format!("{d:?}");
        assert!(dbg.contains("add(int4, int4)"), "{dbg}");
    }
}
