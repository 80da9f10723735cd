//! Settings read by the resolver and by function bodies.

use pgfunc_error::{FuncError, Result};
use serde::{Deserialize, Serialize};

/// PostgreSQL's allocation ceiling for a single value (1 GiB - 1).
pub const DEFAULT_MAX_STRING_BYTES: usize = (1 << 30) - 1;

/// Overload resolution options.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ResolveOptions {
    /// When false, only exact signature matches resolve.
    pub implicit_coercion: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            implicit_coercion: true,
        }
    }
}

/// Function-layer settings, shared by every [`ExecContext`](crate::ExecContext)
/// of an engine instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FunctionSettings {
    /// Upper bound, in bytes, on strings built by `repeat`, `lpad` and `rpad`.
    pub max_string_bytes: usize,
    pub resolve: ResolveOptions,
}

impl Default for FunctionSettings {
    fn default() -> Self {
        Self {
            max_string_bytes: DEFAULT_MAX_STRING_BYTES,
            resolve: ResolveOptions::default(),
        }
    }
}

impl FunctionSettings {
    /// Parse settings from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self =
            serde_json::from_str(json).map_err(|e| FuncError::Config(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| FuncError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_string_bytes == 0 {
            return Err(FuncError::Config(
                "max_string_bytes must be greater than zero".to_owned(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = FunctionSettings::default();
        assert_eq!(s.max_string_bytes, 1_073_741_823);
        assert!(s.resolve.implicit_coercion);
    }

    #[test]
    fn test_from_json_partial() {
        let s = FunctionSettings::from_json(r#"{"max_string_bytes": 64}"#).unwrap();
        assert_eq!(s.max_string_bytes, 64);
        assert!(s.resolve.implicit_coercion);

        let s = FunctionSettings::from_json(r#"{"resolve": {"implicit_coercion": false}}"#).unwrap();
        assert_eq!(s.max_string_bytes, DEFAULT_MAX_STRING_BYTES);
        assert!(!s.resolve.implicit_coercion);
    }

    #[test]
    fn test_from_json_rejects_zero_limit() {
        let err = FunctionSettings::from_json(r#"{"max_string_bytes": 0}"#).unwrap_err();
        assert!(matches!(err, FuncError::Config(_)));
        assert_eq!(err.sqlstate().code(), "F0000");
    }

    #[test]
    fn test_from_json_syntax_error() {
        let err = FunctionSettings::from_json("{not json").unwrap_err();
        assert!(err.to_string().starts_with("invalid function settings:"));
    }

    #[test]
    fn test_json_roundtrip() {
        let s = FunctionSettings {
            max_string_bytes: 10,
            resolve: ResolveOptions {
                implicit_coercion: false,
            },
        };
        let back = FunctionSettings::from_json(&s.to_json().unwrap()).unwrap();
        assert_eq!(back, s);
    }
}
