// src/interception/read_only.rs
//! Read-only handler variants
//!
//! Selected once per wrap tree from [`ReadOnlyMode`]. The read-only variants
//! stop writes and structural mutations before they reach the base
//! dispatcher; reads, calls and constructions pass through unchanged.

use crate::host::{ObjectRef, Value};
use crate::interception::context::InterceptionContext;
use crate::interception::dispatcher::Dispatcher;
use crate::interception::options::ReadOnlyMode;
use crate::interception::proxy::Handler;
use crate::utils::errors::{ProxyError, Result};
use std::sync::Arc;
use tracing::{debug, warn};

/// Base dispatcher with mutations refused
#[derive(Debug, Clone, Copy)]
pub struct ReadOnlyGuard {
    base: Dispatcher,
    raise: bool,
}

impl ReadOnlyGuard {
    /// Report success without modifying anything
    pub fn silent() -> Self {
        Self {
            base: Dispatcher,
            raise: false,
        }
    }

    /// Fail with a read-only violation
    pub fn error() -> Self {
        Self {
            base: Dispatcher,
            raise: true,
        }
    }

    fn refuse(&self, ctx: &InterceptionContext, operation: &'static str, name: &str) -> Result<bool> {
        let path = if name.is_empty() {
            ctx.anchored_path()
        } else {
            ctx.path().child(name).anchored(&ctx.config().path_separator)
        };

        if self.raise {
            warn!("Blocked {} at {} on read-only view", operation, path);
            return Err(ProxyError::ReadOnlyViolation { operation, path });
        }

        debug!("Ignored {} at {} on read-only view", operation, path);
        Ok(true)
    }
}

impl Handler for ReadOnlyGuard {
    fn get(&self, ctx: &InterceptionContext, target: &Value, name: &str) -> Result<Value> {
        self.base.get(ctx, target, name)
    }

    fn set(&self, ctx: &InterceptionContext, _target: &Value, name: &str, _value: Value) -> Result<bool> {
        self.refuse(ctx, "set", name)
    }

    fn apply(
        &self,
        ctx: &InterceptionContext,
        target: &Value,
        this: &Value,
        args: &[Value],
    ) -> Result<Value> {
        self.base.apply(ctx, target, this, args)
    }

    fn construct(
        &self,
        ctx: &InterceptionContext,
        target: &Value,
        args: &[Value],
        new_target: &Value,
    ) -> Result<Value> {
        self.base.construct(ctx, target, args, new_target)
    }

    fn delete_property(&self, ctx: &InterceptionContext, _target: &Value, name: &str) -> Result<bool> {
        self.refuse(ctx, "delete", name)
    }

    fn define_property(
        &self,
        ctx: &InterceptionContext,
        _target: &Value,
        name: &str,
        _value: Value,
    ) -> Result<bool> {
        self.refuse(ctx, "define", name)
    }

    fn prevent_extensions(&self, ctx: &InterceptionContext, _target: &Value) -> Result<bool> {
        self.refuse(ctx, "prevent extensions", "")
    }

    fn set_prototype_of(
        &self,
        ctx: &InterceptionContext,
        _target: &Value,
        _prototype: Option<ObjectRef>,
    ) -> Result<bool> {
        self.refuse(ctx, "set prototype", "")
    }
}

/// Handler set for a read-only mode
pub fn select_handlers(mode: ReadOnlyMode) -> Arc<dyn Handler> {
    match mode {
        ReadOnlyMode::Off => Arc::new(Dispatcher),
        ReadOnlyMode::Silent => Arc::new(ReadOnlyGuard::silent()),
        ReadOnlyMode::Error => Arc::new(ReadOnlyGuard::error()),
    }
}
