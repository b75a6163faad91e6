// src/host/mod.rs
//! Host object model
//!
//! The object graph the interception layer wraps:
//!
//! - **Value**: dynamic values (primitives, objects, views)
//! - **Object**: shared, lock-protected heap objects (plain objects, arrays,
//!   class instances, functions and constructors)
//!
//! Native operations on these types are what every view falls back to when
//! no rule applies.

pub mod object;
pub mod value;

// Re-export commonly used types
pub use object::{NativeCtor, NativeFn, ObjectKind, ObjectRef};
pub use value::{Value, ValueKind};
