// src/interception/dispatcher.rs
//! Rule-driven interception
//!
//! The base handler: reads, writes, calls and constructions consult the
//! configured rule maps at the current path and fall back to the native
//! operation. Reads re-wrap their result when the follow predicate says so,
//! which is what makes the interception recursive.

use crate::host::Value;
use crate::interception::context::InterceptionContext;
use crate::interception::follow::should_follow;
use crate::interception::proxy::{Handler, View};
use crate::interception::rules::accepts_write;
use crate::observability::{record_interception, record_rule_hit};
use crate::utils::errors::{ProxyError, Result};
use std::sync::Arc;
use tracing::{debug, trace};

/// Base operation handler
#[derive(Debug, Clone, Copy, Default)]
pub struct Dispatcher;

impl Handler for Dispatcher {
    fn get(&self, ctx: &InterceptionContext, target: &Value, name: &str) -> Result<Value> {
        record_interception("get");
        let ctx = ctx.extend(target.clone(), name);
        let config = ctx.config();
        let anchored = ctx.anchored_path();

        let mut value = match config.value.lookup(&anchored, name) {
            Some((replacement, kind)) if !replacement.is_undefined() => {
                record_rule_hit("value", kind);
                trace!("Value rule ({}) at {}", kind.as_str(), anchored);
                replacement.clone()
            }
            _ => target.get(name)?,
        };

        if let Some((creator, kind)) = config.creator.lookup(&anchored, name) {
            record_rule_hit("creator", kind);
            trace!("Creator rule ({}) at {}", kind.as_str(), anchored);
            value = creator(&ctx.invocation(), value)?;
        }

        if should_follow(&value, config) {
            debug!("Following {} at {}", value.kind(), anchored);
            let handlers = Arc::clone(ctx.handlers());
            return Ok(Value::View(View::new(value, handlers, ctx)));
        }

        Ok(value)
    }

    fn set(&self, ctx: &InterceptionContext, target: &Value, name: &str, value: Value) -> Result<bool> {
        record_interception("set");
        let ctx = ctx.extend(target.clone(), name);
        let anchored = ctx.anchored_path();

        if let Some((setter, kind)) = ctx.config().setter.lookup(&anchored, name) {
            record_rule_hit("setter", kind);
            let outcome = setter(&ctx.invocation(), value)?;
            let accepted = accepts_write(&outcome);
            if !accepted {
                debug!("Setter rejected write at {}", anchored);
            }
            return Ok(accepted);
        }

        trace!("Native write at {}", anchored);
        target.set(name, value)
    }

    fn apply(
        &self,
        ctx: &InterceptionContext,
        target: &Value,
        this: &Value,
        args: &[Value],
    ) -> Result<Value> {
        record_interception("apply");
        let ctx = ctx.extend(target.clone(), "");
        let anchored = ctx.anchored_path();

        if let Some((rule, kind)) = ctx.config().apply.lookup(&anchored, ctx.segment()) {
            record_rule_hit("apply", kind);
            debug!("Apply rule ({}) at {}", kind.as_str(), anchored);
            return rule(&ctx.invocation(), this, args);
        }

        target.call(this, args)
    }

    fn construct(
        &self,
        ctx: &InterceptionContext,
        target: &Value,
        args: &[Value],
        new_target: &Value,
    ) -> Result<Value> {
        record_interception("construct");
        let ctx = ctx.extend(target.clone(), "");
        let anchored = ctx.anchored_path();

        if let Some((rule, kind)) = ctx.config().construct.lookup(&anchored, ctx.segment()) {
            record_rule_hit("construct", kind);
            debug!("Construct rule ({}) at {}", kind.as_str(), anchored);
            let instance = rule(&ctx.invocation(), args, new_target)?;
            if !instance.is_object_like() {
                return Err(ProxyError::InvalidConstructResult {
                    path: anchored,
                    found: instance.kind().as_str(),
                });
            }
            return Ok(instance);
        }

        target.construct_with(args, new_target)
    }
}
