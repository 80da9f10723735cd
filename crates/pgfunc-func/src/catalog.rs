//! The function catalog.
//!
//! Built once at startup by sequential [`Catalog::register`] calls from
//! every builtin module, then frozen. A frozen catalog is never mutated
//! again, so it can be shared as `Arc<Catalog>` and read from any number of
//! threads without locking.

use std::collections::HashMap;
use std::sync::Arc;

use pgfunc_error::{FuncError, Result};
use pgfunc_types::SqlType;
use tracing::debug;

use crate::builtins::register_builtins;
use crate::{canonical_name, FunctionDescriptor};

/// Mapping from function name to its overloads.
#[derive(Debug, Default)]
pub struct Catalog {
    functions: HashMap<String, Vec<Arc<FunctionDescriptor>>>,
    count: usize,
    frozen: bool,
}

impl Catalog {
    /// Create an empty, unfrozen catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A frozen catalog holding every builtin function.
    pub fn with_builtins() -> Result<Self> {
        let mut catalog = Self::new();
        register_builtins(&mut catalog)?;
        catalog.freeze();
        Ok(catalog)
    }

    /// Add an overload and return a shared handle to it.
    ///
    /// Fails with [`FuncError::DuplicateSignature`] if an overload with the
    /// same name and parameter types exists, and with
    /// [`FuncError::CatalogFrozen`] after [`freeze`](Self::freeze).
    pub fn register(&mut self, descriptor: FunctionDescriptor) -> Result<Arc<FunctionDescriptor>> {
        if self.frozen {
            return Err(FuncError::CatalogFrozen {
                signature: descriptor.signature(),
            });
        }
        let overloads = self
            .functions
            .entry(descriptor.name().to_owned())
            .or_default();
        if overloads.iter().any(|d| d.params() == descriptor.params()) {
            return Err(FuncError::DuplicateSignature {
                signature: descriptor.signature(),
            });
        }
        debug!(
            name = %descriptor.name(),
            arity = descriptor.arity(),
            strict = descriptor.is_strict(),
            "register function"
        );
        let descriptor = Arc::new(descriptor);
        overloads.push(Arc::clone(&descriptor));
        self.count += 1;
        Ok(descriptor)
    }

    /// End the registration phase. Idempotent.
    pub fn freeze(&mut self) {
        if !self.frozen {
            self.frozen = true;
            debug!(
                names = self.functions.len(),
                overloads = self.count,
                "function catalog frozen"
            );
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Every overload registered under `name` (case-insensitive), in
    /// registration order. Empty for unknown names.
    pub fn lookup(&self, name: &str) -> &[Arc<FunctionDescriptor>] {
        self.functions
            .get(&canonical_name(name))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The overload of `name` whose parameter types are exactly `params`.
    pub fn exact(&self, name: &str, params: &[SqlType]) -> Option<Arc<FunctionDescriptor>> {
        self.lookup(name)
            .iter()
            .find(|d| d.params() == params)
            .map(Arc::clone)
    }

    /// Whether any overload is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        !self.lookup(name).is_empty()
    }

    /// Total number of overloads.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Iterate over every overload, grouped by name in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<FunctionDescriptor>> {
        self.functions.values().flatten()
    }
}

#[cfg(test)]
mod tests {
    use pgfunc_error::Result;
    use pgfunc_types::Value;

    use super::*;
    use crate::ExecContext;

    fn zero(_ctx: &ExecContext, _args: &[Value]) -> Result<Value> {
        Ok(Value::Int4(0))
    }

    fn one(_ctx: &ExecContext, _args: &[Value]) -> Result<Value> {
        Ok(Value::Int4(1))
    }

    #[test]
    fn test_register_and_lookup() {
        let mut c = Catalog::new();
        c.register(FunctionDescriptor::new("f", [SqlType::Int4], SqlType::Int4, zero))
            .unwrap();
        c.register(FunctionDescriptor::new("f", [SqlType::Int8], SqlType::Int4, one))
            .unwrap();
        c.register(FunctionDescriptor::new("f", [], SqlType::Int4, one)).unwrap();

        assert_eq!(c.lookup("f").len(), 3);
        assert_eq!(c.lookup("F").len(), 3);
        assert_eq!(c.lookup("  f ").len(), 3);
        assert!(c.lookup("g").is_empty());
        assert_eq!(c.len(), 3);
        assert!(c.contains("f"));
        assert!(!c.contains("g"));
    }

    #[test]
    fn test_duplicate_signature_rejected() {
        let mut c = Catalog::new();
        c.register(FunctionDescriptor::new("f", [SqlType::Int4], SqlType::Int4, zero))
            .unwrap();
        let err = c
            .register(FunctionDescriptor::new("F", [SqlType::Int4], SqlType::Int8, one))
            .unwrap_err();
        assert_eq!(
            err,
            FuncError::DuplicateSignature {
                signature: "f(int4)".to_owned()
            }
        );
        assert!(err.is_defect());
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn test_differing_signatures_both_reachable() {
        let mut c = Catalog::new();
        c.register(FunctionDescriptor::new("f", [SqlType::Int4], SqlType::Int4, zero))
            .unwrap();
        c.register(FunctionDescriptor::new("f", [SqlType::Text], SqlType::Int4, one))
            .unwrap();
        let ctx = ExecContext::default();
        let a = c.exact("f", &[SqlType::Int4]).unwrap();
        let b = c.exact("f", &[SqlType::Text]).unwrap();
        assert_eq!(a.invoke(&ctx, &[Value::Int4(5)]).unwrap(), Value::Int4(0));
        assert_eq!(b.invoke(&ctx, &[Value::from("x")]).unwrap(), Value::Int4(1));
        assert!(c.exact("f", &[SqlType::Int8]).is_none());
    }

    #[test]
    fn test_register_after_freeze_fails() {
        let mut c = Catalog::new();
        c.freeze();
        c.freeze();
        assert!(c.is_frozen());
        let err = c
            .register(FunctionDescriptor::new("f", [], SqlType::Int4, zero))
            .unwrap_err();
        assert!(matches!(err, FuncError::CatalogFrozen { .. }));
        assert!(c.is_empty());
    }

    #[test]
    fn test_register_returns_shared_handle() {
        let mut c = Catalog::new();
        let handle = c
            .register(FunctionDescriptor::new("f", [], SqlType::Int4, one))
            .unwrap();
        assert!(Arc::ptr_eq(&handle, &c.lookup("f")[0]));
    }

    #[test]
    fn test_names_sorted() {
        let mut c = Catalog::new();
        for name in ["zeta", "alpha", "mid"] {
            c.register(FunctionDescriptor::new(name, [], SqlType::Int4, zero))
                .unwrap();
        }
        assert_eq!(c.names(), vec!["alpha", "mid", "zeta"]);
        assert_eq!(c.iter().count(), 3);
    }

    #[test]
    fn test_with_builtins_is_frozen() {
        let c = Catalog::with_builtins().unwrap();
        assert!(c.is_frozen());
        assert!(c.contains("gcd"));
        assert!(c.contains("btrim"));
        assert!(c.contains("width_bucket"));
        assert_eq!(c.lookup("abs").len(), 6);
    }

    #[test]
    fn test_catalog_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Catalog>();
        assert_send_sync::<Arc<FunctionDescriptor>>();
    }
}
