//! SQL type descriptors and dynamically-typed values consumed by the
//! function catalog.
//!
//! [`SqlType`] is the static type the planner assigns to every argument
//! expression; [`Value`] is what a function body receives at run time.

pub mod sql_type;
pub mod value;

pub use sql_type::{format_signature, SqlType, TypeCategory};
pub use value::{format_float4, format_float8, Value};
