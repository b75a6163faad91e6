// src/interception/proxy.rs
//! Handler-backed views
//!
//! A [`View`] pairs a target with a [`Handler`] and the context it was
//! created in. Every trapped operation on the view goes to the handler; the
//! handler's default methods perform the native operation on the target, so
//! a handler only overrides what it intercepts.

use crate::host::{ObjectRef, Value};
use crate::interception::context::InterceptionContext;
use crate::interception::path_matcher::AccessPath;
use crate::utils::errors::{ProxyError, Result};
use std::fmt;
use std::sync::Arc;

/// Operation hooks of a view
pub trait Handler: Send + Sync {
    /// Property read
    fn get(&self, _ctx: &InterceptionContext, target: &Value, name: &str) -> Result<Value> {
        target.get(name)
    }

    /// Property write; `Ok(false)` reports a failed assignment
    fn set(&self, _ctx: &InterceptionContext, target: &Value, name: &str, value: Value) -> Result<bool> {
        target.set(name, value)
    }

    /// Call of a callable target
    fn apply(
        &self,
        _ctx: &InterceptionContext,
        target: &Value,
        this: &Value,
        args: &[Value],
    ) -> Result<Value> {
        target.call(this, args)
    }

    /// Construction of a constructible target
    fn construct(
        &self,
        _ctx: &InterceptionContext,
        target: &Value,
        args: &[Value],
        new_target: &Value,
    ) -> Result<Value> {
        target.construct_with(args, new_target)
    }

    fn delete_property(&self, _ctx: &InterceptionContext, target: &Value, name: &str) -> Result<bool> {
        target.delete(name)
    }

    fn define_property(
        &self,
        _ctx: &InterceptionContext,
        target: &Value,
        name: &str,
        value: Value,
    ) -> Result<bool> {
        target.define_property(name, value)
    }

    fn prevent_extensions(&self, _ctx: &InterceptionContext, target: &Value) -> Result<bool> {
        target.prevent_extensions()
    }

    fn set_prototype_of(
        &self,
        _ctx: &InterceptionContext,
        target: &Value,
        prototype: Option<ObjectRef>,
    ) -> Result<bool> {
        target.set_prototype(prototype)
    }
}

struct ViewInner {
    target: Value,
    handler: Arc<dyn Handler>,
    context: InterceptionContext,
}

/// Wrapped view of a target
#[derive(Clone)]
pub struct View {
    inner: Arc<ViewInner>,
}

impl View {
    pub fn new(target: Value, handler: Arc<dyn Handler>, context: InterceptionContext) -> Self {
        Self {
            inner: Arc::new(ViewInner {
                target,
                handler,
                context,
            }),
        }
    }

    /// The value this view wraps (may itself be a view)
    pub fn target(&self) -> &Value {
        &self.inner.target
    }

    pub fn context(&self) -> &InterceptionContext {
        &self.inner.context
    }

    pub fn path(&self) -> &AccessPath {
        self.inner.context.path()
    }

    /// Handle identity
    pub fn ptr_eq(&self, other: &View) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn get(&self, name: &str) -> Result<Value> {
        self.inner.handler.get(&self.inner.context, &self.inner.target, name)
    }

    /// Read along a sequence of segments
    pub fn get_in<I, S>(&self, segments: I) -> Result<Value>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Value::View(self.clone()).get_in(segments)
    }

    /// Write; `Ok(false)` when a setter rejected it or the target refused it
    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<bool> {
        self.inner
            .handler
            .set(&self.inner.context, &self.inner.target, name, value.into())
    }

    /// Strict write: a rejected assignment becomes [`ProxyError::RejectedWrite`]
    pub fn assign(&self, name: &str, value: impl Into<Value>) -> Result<()> {
        if self.set(name, value)? {
            Ok(())
        } else {
            let path = self.path().child(name);
            Err(ProxyError::RejectedWrite {
                path: path.anchored(&self.inner.context.config().path_separator),
            })
        }
    }

    pub fn call(&self, this: &Value, args: &[Value]) -> Result<Value> {
        self.inner
            .handler
            .apply(&self.inner.context, &self.inner.target, this, args)
    }

    /// Method call with the view as receiver
    pub fn invoke(&self, name: &str, args: &[Value]) -> Result<Value> {
        Value::View(self.clone()).invoke(name, args)
    }

    /// Construction with the view itself as the new-target hint
    pub fn construct(&self, args: &[Value]) -> Result<Value> {
        self.construct_with(args, &Value::View(self.clone()))
    }

    pub fn construct_with(&self, args: &[Value], new_target: &Value) -> Result<Value> {
        self.inner
            .handler
            .construct(&self.inner.context, &self.inner.target, args, new_target)
    }

    pub fn delete(&self, name: &str) -> Result<bool> {
        self.inner
            .handler
            .delete_property(&self.inner.context, &self.inner.target, name)
    }

    pub fn define_property(&self, name: &str, value: impl Into<Value>) -> Result<bool> {
        self.inner
            .handler
            .define_property(&self.inner.context, &self.inner.target, name, value.into())
    }

    pub fn prevent_extensions(&self) -> Result<bool> {
        self.inner
            .handler
            .prevent_extensions(&self.inner.context, &self.inner.target)
    }

    pub fn set_prototype(&self, prototype: Option<ObjectRef>) -> Result<bool> {
        self.inner
            .handler
            .set_prototype_of(&self.inner.context, &self.inner.target, prototype)
    }

    // Not trapped: forwarded to the target

    pub fn has(&self, name: &str) -> bool {
        self.inner.target.has(name)
    }

    pub fn keys(&self) -> Vec<String> {
        self.inner.target.keys()
    }
}

impl fmt::Debug for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("path", &self.inner.context.anchored_path())
            .field("target", &self.inner.target)
            .finish()
    }
}
