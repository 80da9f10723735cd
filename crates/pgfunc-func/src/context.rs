//! Per-call execution context.

use std::sync::Arc;

use pgfunc_error::{FuncError, Result};

use crate::FunctionSettings;

/// Ambient state handed to every function body.
///
/// The catalog and resolver never look inside; bodies read the shared
/// [`FunctionSettings`]. A context is cheap to clone and is owned per
/// statement or per worker, never shared mutably.
#[derive(Debug, Clone)]
pub struct ExecContext {
    session_id: u64,
    txn_id: Option<u64>,
    settings: Arc<FunctionSettings>,
}

impl ExecContext {
    #[must_use]
    pub fn new(session_id: u64, settings: Arc<FunctionSettings>) -> Self {
        Self {
            session_id,
            txn_id: None,
            settings,
        }
    }

    /// Attach the current transaction.
    #[must_use]
    pub fn with_txn(mut self, txn_id: u64) -> Self {
        self.txn_id = Some(txn_id);
        self
    }

    pub fn session_id(&self) -> u64 {
        self.session_id
    }

    pub fn txn_id(&self) -> Option<u64> {
        self.txn_id
    }

    pub fn settings(&self) -> &FunctionSettings {
        &self.settings
    }

    /// Fail with `requested length too large` if a string of `bytes` bytes
    /// would exceed `max_string_bytes`.
    pub fn check_string_len(&self, bytes: usize) -> Result<()> {
        if bytes > self.settings.max_string_bytes {
            return Err(FuncError::length_too_large());
        }
        Ok(())
    }
}

impl Default for ExecContext {
    fn default() -> Self {
        Self::new(0, Arc::new(FunctionSettings::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_passthrough() {
        let ctx = ExecContext::new(7, Arc::new(FunctionSettings::default())).with_txn(42);
        assert_eq!(ctx.session_id(), 7);
        assert_eq!(ctx.txn_id(), Some(42));
        assert_eq!(ExecContext::default().txn_id(), None);
    }

    #[test]
    fn test_check_string_len() {
        let settings = FunctionSettings {
            max_string_bytes: 4,
            ..FunctionSettings::default()
        };
        let ctx = ExecContext::new(1, Arc::new(settings));
        assert!(ctx.check_string_len(4).is_ok());
        let err = ctx.check_string_len(5).unwrap_err();
        assert_eq!(err.to_string(), "requested length too large");
    }
}
