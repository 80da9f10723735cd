//! Error type shared by the function catalog, resolver and builtin bodies.
//!
//! Every failure the core can produce lives in one enum, [`FuncError`], so
//! that the planner and the row evaluator propagate a single type. Variants
//! fall in two groups:
//!
//! - **defects**: a programming error in the engine or in a builtin module
//!   (duplicate signature, registration after freeze, wrong argument count
//!   handed to the invoker). These are never caused by user input.
//! - **user-facing**: resolution and domain failures that are reported as
//!   the failing statement's error.

use thiserror::Error;

/// Primary error type for catalog, resolution and function execution.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FuncError {
    // === Registration Errors ===
    /// Two descriptors with the same name and parameter types.
    #[error("duplicate function overload: {signature}")]
    DuplicateSignature { signature: String },

    /// `register` was called after the catalog was frozen.
    #[error("cannot register {signature}: function catalog is frozen")]
    CatalogFrozen { signature: String },

    // === Resolution Errors ===
    /// No overload matches the call's name, arity and argument types.
    #[error("function {signature} does not exist")]
    NotFoundOverload { signature: String },

    /// Two or more overloads tie under the coercion-distance rule.
    #[error("function {signature} is not unique")]
    AmbiguousOverload {
        signature: String,
        candidates: Vec<String>,
    },

    // === Execution Errors ===
    /// The invoker received a different number of arguments than the bound
    /// descriptor declares.
    #[error("function {name} takes {expected} arguments but was invoked with {actual}")]
    ArityMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    /// Argument values are well-typed but violate a precondition of the
    /// function (division by zero, logarithm of zero, ...).
    #[error("{message}")]
    Domain { code: SqlState, message: String },

    /// A body received a value of a kind its signature does not allow.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    /// Arithmetic result does not fit the result type.
    #[error("{what} out of range")]
    OutOfRange { what: String },

    /// An untyped literal could not be read as the parameter type it was
    /// coerced to.
    #[error("invalid input syntax for type {type_name}: \"{input}\"")]
    InvalidTextRepresentation { type_name: String, input: String },

    // === Configuration Errors ===
    /// Settings failed to parse or validate.
    #[error("invalid function settings: {0}")]
    Config(String),

    // === Internal Errors ===
    /// Internal logic error (should never happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// PostgreSQL SQLSTATE codes for the errors this crate raises.
///
/// The string form is the five-character code clients see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlState {
    /// `22012`
    DivisionByZero,
    /// `22003`
    NumericValueOutOfRange,
    /// `2201E`
    InvalidArgumentForLogarithm,
    /// `2201F`
    InvalidArgumentForPowerFunction,
    /// `2201G`
    InvalidArgumentForWidthBucketFunction,
    /// `22011`
    SubstringError,
    /// `22023`
    InvalidParameterValue,
    /// `22P02`
    InvalidTextRepresentation,
    /// `54000`
    ProgramLimitExceeded,
    /// `42883`
    UndefinedFunction,
    /// `42725`
    AmbiguousFunction,
    /// `42804`
    DatatypeMismatch,
    /// `42723`
    DuplicateFunction,
    /// `F0000`
    ConfigFileError,
    /// `XX000`
    InternalError,
}

impl SqlState {
    /// The five-character SQLSTATE code.
    pub const fn code(self) -> &'static str {
        match self {
            Self::DivisionByZero => "22012",
            Self::NumericValueOutOfRange => "22003",
            Self::InvalidArgumentForLogarithm => "2201E",
            Self::InvalidArgumentForPowerFunction => "2201F",
            Self::InvalidArgumentForWidthBucketFunction => "2201G",
            Self::SubstringError => "22011",
            Self::InvalidParameterValue => "22023",
            Self::InvalidTextRepresentation => "22P02",
            Self::ProgramLimitExceeded => "54000",
            Self::UndefinedFunction => "42883",
            Self::AmbiguousFunction => "42725",
            Self::DatatypeMismatch => "42804",
            Self::DuplicateFunction => "42723",
            Self::ConfigFileError => "F0000",
            Self::InternalError => "XX000",
        }
    }
}

impl std::fmt::Display for SqlState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl FuncError {
    /// Map this error to its SQLSTATE.
    pub const fn sqlstate(&self) -> SqlState {
        match self {
            Self::DuplicateSignature { .. } => SqlState::DuplicateFunction,
            Self::NotFoundOverload { .. } => SqlState::UndefinedFunction,
            Self::AmbiguousOverload { .. } => SqlState::AmbiguousFunction,
            Self::Domain { code, .. } => *code,
            Self::TypeMismatch { .. } => SqlState::DatatypeMismatch,
            Self::OutOfRange { .. } => SqlState::NumericValueOutOfRange,
            Self::InvalidTextRepresentation { .. } => SqlState::InvalidTextRepresentation,
            Self::Config(_) => SqlState::ConfigFileError,
            Self::CatalogFrozen { .. } | Self::ArityMismatch { .. } | Self::Internal(_) => {
                SqlState::InternalError
            }
        }
    }

    /// Whether this error indicates a bug in the engine or a builtin module
    /// rather than a problem with the user's statement.
    pub const fn is_defect(&self) -> bool {
        matches!(
            self,
            Self::DuplicateSignature { .. }
                | Self::CatalogFrozen { .. }
                | Self::ArityMismatch { .. }
                | Self::Internal(_)
        )
    }

    /// Whether this error is reported to the client as the failing
    /// statement's error.
    pub const fn is_user_facing(&self) -> bool {
        !self.is_defect()
    }

    /// Create a domain error with an explicit SQLSTATE.
    pub fn domain(code: SqlState, message: impl Into<String>) -> Self {
        Self::Domain {
            code,
            message: message.into(),
        }
    }

    /// `division by zero`
    pub fn division_by_zero() -> Self {
        Self::domain(SqlState::DivisionByZero, "division by zero")
    }

    /// Domain error with `invalid_parameter_value`.
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::domain(SqlState::InvalidParameterValue, message)
    }

    /// `requested length too large`
    pub fn length_too_large() -> Self {
        Self::domain(SqlState::ProgramLimitExceeded, "requested length too large")
    }

    /// Create an out-of-range error, e.g. `out_of_range("integer")`.
    pub fn out_of_range(what: impl Into<String>) -> Self {
        Self::OutOfRange { what: what.into() }
    }

    /// Create a type mismatch error.
    pub fn type_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// Result type alias using `FuncError`.
pub type Result<T> = std::result::Result<T, FuncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_not_found() {
        let err = FuncError::NotFoundOverload {
            signature: "gcd(int4, text)".to_owned(),
        };
        assert_eq!(err.to_string(), "function gcd(int4, text) does not exist");
    }

    #[test]
    fn error_display_domain_is_bare_message() {
        assert_eq!(FuncError::division_by_zero().to_string(), "division by zero");
        assert_eq!(
            FuncError::invalid_parameter("field position must not be zero").to_string(),
            "field position must not be zero"
        );
    }

    #[test]
    fn error_display_out_of_range() {
        assert_eq!(
            FuncError::out_of_range("integer").to_string(),
            "integer out of range"
        );
    }

    #[test]
    fn sqlstate_mapping() {
        assert_eq!(FuncError::division_by_zero().sqlstate().code(), "22012");
        assert_eq!(
            FuncError::NotFoundOverload {
                signature: String::new()
            }
            .sqlstate(),
            SqlState::UndefinedFunction
        );
        assert_eq!(
            FuncError::AmbiguousOverload {
                signature: String::new(),
                candidates: vec![]
            }
            .sqlstate()
            .code(),
            "42725"
        );
        assert_eq!(FuncError::length_too_large().sqlstate().code(), "54000");
        assert_eq!(
            FuncError::out_of_range("bigint").sqlstate(),
            SqlState::NumericValueOutOfRange
        );
    }

    #[test]
    fn defects_are_not_user_facing() {
        let dup = FuncError::DuplicateSignature {
            signature: "abs(int4)".to_owned(),
        };
        assert!(dup.is_defect());
        assert!(!dup.is_user_facing());

        let arity = FuncError::ArityMismatch {
            name: "abs".to_owned(),
            expected: 1,
            actual: 2,
        };
        assert!(arity.is_defect());
        assert_eq!(arity.sqlstate(), SqlState::InternalError);

        assert!(FuncError::division_by_zero().is_user_facing());
        assert!(
            FuncError::NotFoundOverload {
                signature: "f()".to_owned()
            }
            .is_user_facing()
        );
    }

    #[test]
    fn invalid_text_representation_message() {
        let err = FuncError::InvalidTextRepresentation {
            type_name: "integer".to_owned(),
            input: "abc".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            r#"invalid input syntax for type integer: "abc""#
        );
        assert_eq!(err.sqlstate().code(), "22P02");
    }

    #[test]
    fn sqlstate_display() {
        assert_eq!(SqlState::SubstringError.to_string(), "22011");
        assert_eq!(SqlState::InvalidArgumentForLogarithm.to_string(), "2201E");
    }
}
