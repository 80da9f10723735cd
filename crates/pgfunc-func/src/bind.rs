//! Plan-time call binding.
//!
//! [`BoundCall::bind`] resolves a call site once and keeps the chosen
//! overload together with the casts its arguments need. Evaluating the bound
//! call per row is then argument evaluation plus one indirect body call.

use std::sync::Arc;

use pgfunc_error::{FuncError, Result};
use pgfunc_types::{SqlType, Value};
use tracing::debug;

use crate::{ExecContext, FunctionDescriptor, Resolver};

/// A scalar expression over one input row.
#[derive(Debug, Clone)]
pub enum ScalarExpr {
    /// A constant. Untyped literals carry [`SqlType::Unknown`].
    Literal { value: Value, ty: SqlType },
    /// The value at `index` in the input row.
    Column { index: usize, ty: SqlType },
    Call(Box<BoundCall>),
}

impl ScalarExpr {
    /// A typed constant. NULL gets the `unknown` type.
    pub fn literal(value: impl Into<Value>) -> Self {
        let value = value.into();
        let ty = value.sql_type().unwrap_or(SqlType::Unknown);
        Self::Literal { value, ty }
    }

    /// An untyped quoted literal, e.g. `'42'` with no cast.
    pub fn unknown(text: &str) -> Self {
        Self::Literal {
            value: Value::from(text),
            ty: SqlType::Unknown,
        }
    }

    /// A bare `NULL`.
    pub fn null() -> Self {
        Self::Literal {
            value: Value::Null,
            ty: SqlType::Unknown,
        }
    }

    pub fn column(index: usize, ty: SqlType) -> Self {
        Self::Column { index, ty }
    }

    pub fn static_type(&self) -> SqlType {
        match self {
            Self::Literal { ty, .. } | Self::Column { ty, .. } => *ty,
            Self::Call(call) => call.return_type(),
        }
    }

    pub fn eval(&self, ctx: &ExecContext, row: &[Value]) -> Result<Value> {
        match self {
            Self::Literal { value, .. } => Ok(value.clone()),
            Self::Column { index, .. } => row.get(*index).cloned().ok_or_else(|| {
                FuncError::internal(format!(
                    "column {index} out of range for row of width {}",
                    row.len()
                ))
            }),
            Self::Call(call) => call.eval(ctx, row),
        }
    }
}

/// A call site bound to one overload.
///
/// Owned by the plan node; shares the descriptor with the catalog and is
/// safe to evaluate from several threads at once.
#[derive(Debug, Clone)]
pub struct BoundCall {
    descriptor: Arc<FunctionDescriptor>,
    args: Vec<ScalarExpr>,
    casts: Vec<Option<SqlType>>,
}

impl BoundCall {
    /// Resolve `name` against the static types of `args`.
    pub fn bind(resolver: &Resolver<'_>, name: &str, args: Vec<ScalarExpr>) -> Result<Self> {
        let arg_types: Vec<SqlType> = args.iter().map(ScalarExpr::static_type).collect();
        let resolution = resolver.resolve_call(name, &arg_types)?;
        debug!(
            signature = %resolution.descriptor.signature(),
            distance = resolution.distance,
            "bind call"
        );
        Ok(Self {
            descriptor: resolution.descriptor,
            args,
            casts: resolution.casts,
        })
    }

    pub fn descriptor(&self) -> &Arc<FunctionDescriptor> {
        &self.descriptor
    }

    pub fn args(&self) -> &[ScalarExpr] {
        &self.args
    }

    /// The implicit cast applied to each argument, if any.
    pub fn casts(&self) -> &[Option<SqlType>] {
        &self.casts
    }

    pub fn return_type(&self) -> SqlType {
        self.descriptor.return_type()
    }

    /// Evaluate the arguments over `row`, apply the bound casts and invoke
    /// the overload.
    pub fn eval(&self, ctx: &ExecContext, row: &[Value]) -> Result<Value> {
        let mut values = Vec::with_capacity(self.args.len());
        for (expr, cast) in self.args.iter().zip(&self.casts) {
            let value = expr.eval(ctx, row)?;
            let value = match cast {
                Some(to) => value.coerce(expr.static_type(), *to)?,
                None => value,
            };
            values.push(value);
        }
        self.descriptor.invoke(ctx, &values)
    }
}

impl From<BoundCall> for ScalarExpr {
    fn from(call: BoundCall) -> Self {
        Self::Call(Box::new(call))
    }
}
