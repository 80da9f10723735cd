//! Overload resolution.
//!
//! Given a call's name and the static types of its arguments, pick exactly
//! one overload:
//!
//! 1. keep the overloads whose arity matches;
//! 2. an overload whose parameter types equal the argument types wins
//!    outright;
//! 3. otherwise score every overload whose parameters are all reachable by
//!    implicit coercion, summing [`SqlType::coercion_distance`] across
//!    arguments, and take the unique lowest score;
//! 4. a tie is [`FuncError::AmbiguousOverload`], no candidate is
//!    [`FuncError::NotFoundOverload`].
//!
//! Resolution runs once per call site at plan time. Its result is an
//! `Arc<FunctionDescriptor>` that the plan reuses for every row.

use std::sync::Arc;

use pgfunc_error::{FuncError, Result};
use pgfunc_types::{format_signature, SqlType};
use tracing::debug;

use crate::{canonical_name, Catalog, FunctionDescriptor, ResolveOptions};

/// The outcome of resolving one call site.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub descriptor: Arc<FunctionDescriptor>,
    /// Per argument, the parameter type it must be cast to, or `None` when
    /// the argument already has the parameter's type.
    pub casts: Vec<Option<SqlType>>,
    /// Total coercion distance; 0 for an exact match.
    pub distance: u32,
}

impl Resolution {
    pub fn is_exact(&self) -> bool {
        self.distance == 0
    }
}

/// Binds call sites to overloads in a borrowed catalog.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    catalog: &'a Catalog,
    options: ResolveOptions,
}

impl<'a> Resolver<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self::with_options(catalog, ResolveOptions::default())
    }

    pub fn with_options(catalog: &'a Catalog, options: ResolveOptions) -> Self {
        Self { catalog, options }
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    pub fn options(&self) -> ResolveOptions {
        self.options
    }

    /// Select the overload of `name` for arguments of `arg_types`.
    pub fn resolve(&self, name: &str, arg_types: &[SqlType]) -> Result<Arc<FunctionDescriptor>> {
        self.resolve_call(name, arg_types).map(|r| r.descriptor)
    }

    /// Like [`resolve`](Self::resolve), also reporting the implicit casts
    /// the call needs.
    pub fn resolve_call(&self, name: &str, arg_types: &[SqlType]) -> Result<Resolution> {
        let canon = canonical_name(name);
        let candidates = self
            .catalog
            .lookup(&canon)
            .iter()
            .filter(|d| d.arity() == arg_types.len());

        if let Some(exact) = candidates.clone().find(|d| d.params() == arg_types) {
            debug!(name = %canon, arity = arg_types.len(), hit = "exact", "resolve function");
            return Ok(Resolution {
                descriptor: Arc::clone(exact),
                casts: vec![None; arg_types.len()],
                distance: 0,
            });
        }

        let not_found = || FuncError::NotFoundOverload {
            signature: format_signature(&canon, arg_types),
        };

        if !self.options.implicit_coercion {
            debug!(name = %canon, arity = arg_types.len(), hit = "miss", "resolve function");
            return Err(not_found());
        }

        let mut best: Vec<&Arc<FunctionDescriptor>> = Vec::new();
        let mut best_distance = u32::MAX;
        for candidate in candidates {
            let Some(distance) = total_distance(arg_types, candidate.params()) else {
                continue;
            };
            if distance < best_distance {
                best_distance = distance;
                best.clear();
                best.push(candidate);
            } else if distance == best_distance {
                best.push(candidate);
            }
        }

        match best.as_slice() {
            [] => {
                debug!(name = %canon, arity = arg_types.len(), hit = "miss", "resolve function");
                Err(not_found())
            }
            [chosen] => {
                debug!(
                    name = %canon,
                    arity = arg_types.len(),
                    hit = "coerced",
                    distance = best_distance,
                    "resolve function"
                );
                let casts = arg_types
                    .iter()
                    .zip(chosen.params())
                    .map(|(arg, param)| (arg != param).then_some(*param))
                    .collect();
                Ok(Resolution {
                    descriptor: Arc::clone(chosen),
                    casts,
                    distance: best_distance,
                })
            }
            tied => {
                debug!(
                    name = %canon,
                    arity = arg_types.len(),
                    hit = "ambiguous",
                    candidates = tied.len(),
                    "resolve function"
                );
                Err(FuncError::AmbiguousOverload {
                    signature: format_signature(&canon, arg_types),
                    candidates: tied.iter().map(|d| d.signature()).collect(),
                })
            }
        }
    }
}

/// Sum of per-argument coercion distances, or `None` if any argument cannot
/// reach its parameter.
fn total_distance(args: &[SqlType], params: &[SqlType]) -> Option<u32> {
    args.iter()
        .zip(params)
        .try_fold(0_u32, |acc, (arg, param)| {
            arg.coercion_distance(*param).map(|d| acc + d)
        })
}

#[cfg(test)]
mod tests {
    use pgfunc_types::Value;

    use super::*;
    use crate::ExecContext;

    fn tag(label: &'static str) -> impl crate::ScalarFunction + 'static {
        move |_: &ExecContext, _: &[Value]| -> Result<Value> { Ok(Value::from(label)) }
    }

    fn numeric_family() -> Catalog {
        let mut c = Catalog::new();
        for ty in [SqlType::Int4, SqlType::Int8, SqlType::Numeric, SqlType::Float8] {
            c.register(FunctionDescriptor::new("f", [ty], ty, tag(ty.name())))
                .unwrap();
        }
        c.register(FunctionDescriptor::new(
            "g",
            [SqlType::Int4, SqlType::Int8],
            SqlType::Int4,
            tag("g(int4, int8)"),
        ))
        .unwrap();
        c.register(FunctionDescriptor::new(
            "g",
            [SqlType::Int8, SqlType::Int4],
            SqlType::Int4,
            tag("g(int8, int4)"),
        ))
        .unwrap();
        c.freeze();
        c
    }

    fn run(d: &FunctionDescriptor) -> Value {
        let args = vec![Value::Int4(0); d.arity()];
        d.invoke(&ExecContext::default(), &args).unwrap()
    }

    #[test]
    fn test_exact_match_wins() {
        let c = numeric_family();
        let r = Resolver::new(&c);
        for ty in [SqlType::Int4, SqlType::Int8, SqlType::Numeric, SqlType::Float8] {
            let res = r.resolve_call("f", &[ty]).unwrap();
            assert!(res.is_exact());
            assert_eq!(res.descriptor.params(), &[ty]);
            assert_eq!(res.casts, vec![None]);
        }
    }

    #[test]
    fn test_shortest_widening_selected() {
        let c = numeric_family();
        let r = Resolver::new(&c);
        let res = r.resolve_call("f", &[SqlType::Int2]).unwrap();
        assert_eq!(res.descriptor.params(), &[SqlType::Int4]);
        assert_eq!(res.casts, vec![Some(SqlType::Int4)]);
        assert_eq!(res.distance, 1);

        let res = r.resolve_call("F", &[SqlType::Float4]).unwrap();
        assert_eq!(res.descriptor.params(), &[SqlType::Float8]);
        assert_eq!(run(&res.descriptor), Value::from("float8"));
    }

    #[test]
    fn test_not_found_names_call_signature() {
        let c = numeric_family();
        let r = Resolver::new(&c);
        let err = r.resolve("f", &[SqlType::Text]).unwrap_err();
        assert_eq!(err.to_string(), "function f(text) does not exist");
        assert_eq!(err.sqlstate().code(), "42883");

        let err = r.resolve("f", &[SqlType::Int4, SqlType::Int4]).unwrap_err();
        assert_eq!(err.to_string(), "function f(int4, int4) does not exist");

        let err = r.resolve("nope", &[]).unwrap_err();
        assert_eq!(err.to_string(), "function nope() does not exist");
    }

    #[test]
    fn test_tie_is_ambiguous() {
        let c = numeric_family();
        let r = Resolver::new(&c);
        let err = r.resolve("g", &[SqlType::Int4, SqlType::Int4]).unwrap_err();
        match &err {
            FuncError::AmbiguousOverload {
                signature,
                candidates,
            } => {
                assert_eq!(signature, "g(int4, int4)");
                assert_eq!(candidates.len(), 2);
            }
            other => panic!("expected AmbiguousOverload, got {other:?}"),
        }
        assert_eq!(err.to_string(), "function g(int4, int4) is not unique");
    }

    #[test]
    fn test_unknown_literal_prefers_text() {
        let mut c = Catalog::new();
        c.register(FunctionDescriptor::new("h", [SqlType::Int4], SqlType::Int4, tag("int")))
            .unwrap();
        c.register(FunctionDescriptor::new("h", [SqlType::Text], SqlType::Text, tag("text")))
            .unwrap();
        let r = Resolver::new(&c);
        let d = r.resolve("h", &[SqlType::Unknown]).unwrap();
        assert_eq!(d.params(), &[SqlType::Text]);
    }

    #[test]
    fn test_exact_only_mode() {
        let c = numeric_family();
        let r = Resolver::with_options(
            &c,
            ResolveOptions {
                implicit_coercion: false,
            },
        );
        assert!(r.resolve("f", &[SqlType::Int8]).is_ok());
        let err = r.resolve("f", &[SqlType::Int2]).unwrap_err();
        assert!(matches!(err, FuncError::NotFoundOverload { .. }));
    }

    #[test]
    fn test_total_distance() {
        assert_eq!(
            total_distance(&[SqlType::Int2, SqlType::Int4], &[SqlType::Int8, SqlType::Int4]),
            Some(2)
        );
        assert_eq!(total_distance(&[SqlType::Text], &[SqlType::Int4]), None);
        assert_eq!(total_distance(&[], &[]), Some(0));
    }
}
