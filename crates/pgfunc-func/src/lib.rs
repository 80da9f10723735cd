//! Function catalog, overload resolution and PostgreSQL builtin scalar
//! functions.
//!
//! - [`FunctionDescriptor`] describes one overload and is also the invoker:
//!   it checks arity, short-circuits strict calls on NULL and runs the body.
//! - [`Catalog`] holds every overload by name. It is filled once at startup
//!   and then frozen; a frozen catalog is read-only and shared freely.
//! - [`Resolver`] binds a call's name and argument types to one overload at
//!   plan time, preferring exact matches, then the shortest implicit
//!   coercion.
//! - [`BoundCall`] keeps the resolved overload for a call site and evaluates
//!   it per row.
//!
//! The builtin set lives in [`math`], [`trig`] and [`string`];
//! [`Catalog::with_builtins`] registers all of it.

pub mod bind;
pub mod builtins;
pub mod catalog;
pub mod config;
pub mod context;
pub mod descriptor;
pub mod math;
pub mod resolve;
pub mod string;
pub mod trig;

pub use bind::{BoundCall, ScalarExpr};
pub use builtins::register_builtins;
pub use catalog::Catalog;
pub use config::{FunctionSettings, ResolveOptions};
pub use context::ExecContext;
pub use descriptor::{invoke, FunctionDescriptor, ScalarFunction};
pub use math::register_math_builtins;
pub use resolve::{Resolution, Resolver};
pub use string::register_string_builtins;
pub use trig::register_trig_builtins;

/// Catalog key for a function name: trimmed, ASCII lowercase.
pub(crate) fn canonical_name(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}
