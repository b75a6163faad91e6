// src/lib.rs
//! Recursive Proxy Library
//!
//! A configurable recursive interception layer: wrap a root object and every
//! property read, property write, function call and construction anywhere in
//! its reachable graph is routed to a rule selected by the textual path from
//! the root.
//!
//! # Architecture
//!
//! The library is structured into several key modules:
//!
//! - **host**: dynamic values and shared heap objects (the wrapped graph)
//! - **interception**: path matching, views, dispatch, read-only modes
//! - **observability**: tracing subscriber setup and interception metrics
//! - **utils**: errors and file/environment settings
//!
//! # Example
//!
//! ```
//! use recursive_proxy::{ProxyOptions, RecursiveProxy, Value};
//! use serde_json::json;
//!
//! let proxy = RecursiveProxy::new(ProxyOptions::new().value(".a.b.c", 5));
//! let view = proxy
//!     .wrap(Value::from_json(json!({"a": {"b": {"c": 2}}})))
//!     .unwrap();
//!
//! assert_eq!(view.get_in(["a", "b", "c"]).unwrap(), Value::from(5));
//! assert!(view.get("b").unwrap().is_undefined());
//! ```

// Public module exports
pub mod host;
pub mod interception;
pub mod observability;
pub mod utils;

// Re-export commonly used types
pub use host::{ObjectRef, Value, ValueKind};
pub use interception::{
    wrap, AccessPath, Configuration, Handler, Invocation, ProxyOptions, ReadOnlyMode,
    RecursiveProxy, View,
};
pub use utils::config::ProxySettings;
pub use utils::errors::{ProxyError, Result};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
