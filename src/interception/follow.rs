// src/interception/follow.rs
//! Follow predicate
//!
//! Decides whether a value met during traversal is wrapped recursively.

use crate::host::{Value, ValueKind};
use crate::interception::options::Configuration;

/// True when `value` should be wrapped under `config`
pub fn should_follow(value: &Value, config: &Configuration) -> bool {
    match value.kind() {
        ValueKind::Function => config.follow_function,
        ValueKind::Array => config.follow_array,
        ValueKind::PlainObject => true,
        ValueKind::Object => config.follow_non_plain_object,
        ValueKind::Undefined
        | ValueKind::Null
        | ValueKind::Boolean
        | ValueKind::Number
        | ValueKind::String => false,
    }
}
