// src/interception/mod.rs
//! Recursive interception layer
//!
//! Wraps a root object in a view that intercepts every read, write, call and
//! construction anywhere in its reachable graph, and routes each one to a
//! rule chosen by the textual path from the root:
//!
//! - **Path Matcher**: exact path, then bare segment name, then catch-all
//! - **Follow Predicate**: which values get wrapped recursively
//! - **Context**: path, target, origin and user context per view
//! - **Dispatcher**: the four rule-driven operation handlers
//! - **Read Only**: silent and erroring handler variants
//! - **Options**: user options and their normalized configuration
//! - **Proxy**: the handler trait and the view type
//!
//! # Architecture
//!
//! ```text
//! ProxyOptions → normalize → Configuration ─┐
//!                                           ├─ select handlers (off / silent / error)
//! root target → validate (follow predicate) ┘
//!     │
//!     ▼
//! View(root, ctx: path = [])
//!     │ get "a"
//!     ├─ value rule? ─ else native read
//!     ├─ creator rule?
//!     └─ followable? → View(value, ctx: path = [a]) → ...
//! ```

pub mod context;
pub mod dispatcher;
pub mod follow;
pub mod options;
pub mod path_matcher;
pub mod proxy;
pub mod read_only;
pub mod recursive_proxy;
pub mod rules;

// Re-export commonly used types
pub use context::InterceptionContext;
pub use dispatcher::Dispatcher;
pub use follow::should_follow;
pub use options::{Configuration, ProxyOptions, ReadOnlyMode};
pub use path_matcher::{AccessPath, MatchKind, RuleMap};
pub use proxy::{Handler, View};
pub use read_only::{select_handlers, ReadOnlyGuard};
pub use recursive_proxy::{wrap, RecursiveProxy};
pub use rules::{ApplyRule, ConstructRule, CreatorRule, Invocation, SetterRule};
