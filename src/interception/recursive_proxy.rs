// src/interception/recursive_proxy.rs
//! Wrap entry points
//!
//! [`RecursiveProxy`] normalizes options and selects the handler set once,
//! then wraps any number of root targets. [`wrap`] is the single-shot form.

use crate::host::{Value, ValueKind};
use crate::interception::context::InterceptionContext;
use crate::interception::follow::should_follow;
use crate::interception::options::{Configuration, ProxyOptions};
use crate::interception::proxy::{Handler, View};
use crate::interception::read_only::select_handlers;
use crate::utils::errors::{ProxyError, Result};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Configured wrapper factory
#[derive(Clone)]
pub struct RecursiveProxy {
    config: Arc<Configuration>,
    handlers: Arc<dyn Handler>,
}

impl RecursiveProxy {
    /// Normalize `options` and select the handler set for its read-only mode
    pub fn new(options: ProxyOptions) -> Self {
        let config = Configuration::normalize(options);
        info!(
            "Creating recursive proxy (read_only: {}, separator: {:?})",
            config.read_only, config.path_separator
        );
        debug!("Normalized configuration: {:?}", config);

        let handlers = select_handlers(config.read_only);
        Self {
            config: Arc::new(config),
            handlers,
        }
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Wrap `target` with an empty object as user context
    pub fn wrap(&self, target: impl Into<Value>) -> Result<View> {
        self.wrap_with_context(target, Value::object())
    }

    /// Wrap `target`; `user_context` is handed to every rule invocation
    pub fn wrap_with_context(
        &self,
        target: impl Into<Value>,
        user_context: impl Into<Value>,
    ) -> Result<View> {
        let target = target.into();
        self.validate_target(&target)?;

        let ctx = InterceptionContext::root(
            Arc::clone(&self.config),
            Arc::clone(&self.handlers),
            target.clone(),
            user_context.into(),
        );
        debug!("Wrapping root {}", target.kind());

        Ok(View::new(target, Arc::clone(&self.handlers), ctx))
    }

    /// The root must be followable: there is no parent to fall back to
    pub fn validate_target(&self, target: &Value) -> Result<()> {
        if should_follow(target, &self.config) {
            return Ok(());
        }

        let hint = match target.kind() {
            k if k.is_primitive() => "primitives cannot be wrapped",
            ValueKind::Array => "enable follow_array to wrap arrays",
            ValueKind::Function => "enable follow_function to wrap functions",
            _ => "enable follow_non_plain_object to wrap non-plain objects",
        };
        Err(ProxyError::InvalidTarget(format!(
            "{} is not followable ({})",
            target.kind(),
            hint
        )))
    }
}

impl fmt::Debug for RecursiveProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecursiveProxy")
            .field("config", &self.config)
            .finish()
    }
}

/// Normalize `options` and wrap `target` in one step
pub fn wrap(options: ProxyOptions, target: impl Into<Value>, user_context: impl Into<Value>) -> Result<View> {
    RecursiveProxy::new(options).wrap_with_context(target, user_context)
}
