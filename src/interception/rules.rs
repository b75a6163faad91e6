// src/interception/rules.rs
//! Rule function types
//!
//! Each rule map holds one closure type. Rules run bound to the user
//! context, which they receive through [`Invocation::user_context`].

use crate::host::Value;
use crate::interception::path_matcher::AccessPath;
use crate::utils::errors::Result;
use std::sync::Arc;

/// Everything a rule can see about the interception that triggered it
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    /// Opaque value supplied at wrap time
    pub user_context: &'a Value,

    /// Root object of the wrap tree
    pub origin: &'a Value,

    /// Underlying object the operation is applied to
    pub target: &'a Value,

    /// Segment name at the interception point
    pub name: &'a str,

    /// Full access path, including `name`
    pub path: &'a AccessPath,
}

/// `(invocation, current_value) -> replacement`
pub type CreatorRule = Arc<dyn Fn(&Invocation<'_>, Value) -> Result<Value> + Send + Sync>;

/// `(invocation, new_value) -> outcome`; an outcome of `false` rejects the write
pub type SetterRule = Arc<dyn Fn(&Invocation<'_>, Value) -> Result<Value> + Send + Sync>;

/// `(invocation, this, args) -> result`
pub type ApplyRule = Arc<dyn Fn(&Invocation<'_>, &Value, &[Value]) -> Result<Value> + Send + Sync>;

/// `(invocation, args, new_target) -> instance`
pub type ConstructRule =
    Arc<dyn Fn(&Invocation<'_>, &[Value], &Value) -> Result<Value> + Send + Sync>;

/// Setter outcome check: anything but an explicit `false` accepts
pub fn accepts_write(outcome: &Value) -> bool {
    !matches!(outcome, Value::Bool(false))
}
