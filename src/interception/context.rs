// src/interception/context.rs
//! Interception context
//!
//! Each view carries the context it was created with. Configuration, handler
//! set, origin and user context are shared by every view of one wrap tree;
//! path and target are per view.

use crate::host::Value;
use crate::interception::options::Configuration;
use crate::interception::path_matcher::AccessPath;
use crate::interception::proxy::Handler;
use crate::interception::rules::Invocation;
use std::fmt;
use std::sync::Arc;

#[derive(Clone)]
pub struct InterceptionContext {
    config: Arc<Configuration>,
    user_context: Value,
    origin: Value,
    handlers: Arc<dyn Handler>,
    path: AccessPath,
    target: Value,
}

impl InterceptionContext {
    /// Context of a root view: empty path, target is the origin
    pub fn root(
        config: Arc<Configuration>,
        handlers: Arc<dyn Handler>,
        origin: Value,
        user_context: Value,
    ) -> Self {
        Self {
            config,
            user_context,
            target: origin.clone(),
            origin,
            handlers,
            path: AccessPath::root(),
        }
    }

    /// Child context; an empty `segment` keeps the path unchanged
    pub fn extend(&self, target: Value, segment: &str) -> Self {
        let path = if segment.is_empty() {
            self.path.clone()
        } else {
            self.path.child(segment)
        };

        Self {
            config: Arc::clone(&self.config),
            user_context: self.user_context.clone(),
            origin: self.origin.clone(),
            handlers: Arc::clone(&self.handlers),
            path,
            target,
        }
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn shared_config(&self) -> &Arc<Configuration> {
        &self.config
    }

    pub fn user_context(&self) -> &Value {
        &self.user_context
    }

    pub fn origin(&self) -> &Value {
        &self.origin
    }

    pub fn handlers(&self) -> &Arc<dyn Handler> {
        &self.handlers
    }

    pub fn path(&self) -> &AccessPath {
        &self.path
    }

    pub fn target(&self) -> &Value {
        &self.target
    }

    /// Last path segment, `""` at the root
    pub fn segment(&self) -> &str {
        self.path.last()
    }

    /// Path rendered with the configured separator
    pub fn anchored_path(&self) -> String {
        self.path.anchored(&self.config.path_separator)
    }

    /// Rule arguments for an interception at this context
    pub fn invocation(&self) -> Invocation<'_> {
        Invocation {
            user_context: &self.user_context,
            origin: &self.origin,
            target: &self.target,
            name: self.segment(),
            path: &self.path,
        }
    }
}

impl fmt::Debug for InterceptionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptionContext")
            .field("path", &self.anchored_path())
            .field("target", &self.target.kind())
            .field("read_only", &self.config.read_only)
            .finish()
    }
}
