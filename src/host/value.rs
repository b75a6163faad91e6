// src/host/value.rs
//! Dynamic host values
//!
//! [`Value`] is the unit every interception reads, writes, calls, and
//! returns. Object-shaped values are shared handles; a [`View`] stands in for
//! an object anywhere a value is accepted and routes every operation through
//! its handler.

use crate::host::object::ObjectRef;
use crate::interception::proxy::View;
use crate::utils::errors::{ProxyError, Result};
use std::collections::HashSet;
use std::fmt;

/// Shape classification of a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Undefined,
    Null,
    Boolean,
    Number,
    String,
    Function,
    Array,
    /// Object with no prototype and no class tag
    PlainObject,
    /// Any other object-shaped value
    Object,
}

impl ValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Undefined => "undefined",
            ValueKind::Null => "null",
            ValueKind::Boolean => "boolean",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Function => "function",
            ValueKind::Array => "array",
            ValueKind::PlainObject => "plain object",
            ValueKind::Object => "object",
        }
    }

    /// Primitives are never wrapped
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            ValueKind::Undefined
                | ValueKind::Null
                | ValueKind::Boolean
                | ValueKind::Number
                | ValueKind::String
        )
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Host value
#[derive(Clone, Default)]
pub enum Value {
    /// Absent value sentinel
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Object(ObjectRef),
    /// Wrapped view of another value
    View(View),
}

impl Value {
    /// New empty plain object
    pub fn object() -> Self {
        Value::Object(ObjectRef::plain())
    }

    /// New array
    pub fn array(elements: Vec<Value>) -> Self {
        Value::Object(ObjectRef::array(elements))
    }

    /// New callable
    pub fn function<F>(call: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        Value::Object(ObjectRef::function(call))
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Undefined => ValueKind::Undefined,
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Boolean,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Object(obj) => obj.kind(),
            Value::View(view) => view.target().kind(),
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn is_object_like(&self) -> bool {
        !self.kind().is_primitive()
    }

    pub fn is_callable(&self) -> bool {
        self.kind() == ValueKind::Function
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_view(&self) -> Option<&View> {
        match self {
            Value::View(view) => Some(view),
            _ => None,
        }
    }

    /// Peel every view layer and return the underlying value
    pub fn unwrapped(&self) -> Value {
        match self {
            Value::View(view) => view.target().unwrapped(),
            other => other.clone(),
        }
    }

    /// Strict identity: primitives by value, objects and views by handle
    pub fn same(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::View(a), Value::View(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    fn require_object(&self, name: &str) -> Result<()> {
        match self {
            Value::Undefined | Value::Null => Err(ProxyError::NotAnObject {
                name: name.to_string(),
                found: self.kind().as_str(),
            }),
            _ => Ok(()),
        }
    }

    /// Property read
    pub fn get(&self, name: &str) -> Result<Value> {
        self.require_object(name)?;
        match self {
            Value::Object(obj) => Ok(obj.get(name)),
            Value::View(view) => view.get(name),
            Value::String(s) if name == "length" => Ok(Value::Number(s.chars().count() as f64)),
            _ => Ok(Value::Undefined),
        }
    }

    /// Read along a sequence of segments
    pub fn get_in<I, S>(&self, segments: I) -> Result<Value>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        segments
            .into_iter()
            .try_fold(self.clone(), |current, segment| current.get(segment.as_ref()))
    }

    /// Property write; `Ok(false)` reports a failed assignment
    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<bool> {
        self.require_object(name)?;
        match self {
            Value::Object(obj) => Ok(obj.set(name, value.into())),
            Value::View(view) => view.set(name, value),
            _ => Ok(false),
        }
    }

    pub fn has(&self, name: &str) -> bool {
        match self {
            Value::Object(obj) => obj.has(name),
            Value::View(view) => view.has(name),
            _ => false,
        }
    }

    pub fn keys(&self) -> Vec<String> {
        match self {
            Value::Object(obj) => obj.keys(),
            Value::View(view) => view.keys(),
            _ => Vec::new(),
        }
    }

    pub fn delete(&self, name: &str) -> Result<bool> {
        self.require_object(name)?;
        match self {
            Value::Object(obj) => Ok(obj.delete(name)),
            Value::View(view) => view.delete(name),
            _ => Ok(false),
        }
    }

    pub fn define_property(&self, name: &str, value: impl Into<Value>) -> Result<bool> {
        self.require_object(name)?;
        match self {
            Value::Object(obj) => Ok(obj.define_property(name, value.into())),
            Value::View(view) => view.define_property(name, value),
            _ => Ok(false),
        }
    }

    pub fn prevent_extensions(&self) -> Result<bool> {
        match self {
            Value::Object(obj) => Ok(obj.prevent_extensions()),
            Value::View(view) => view.prevent_extensions(),
            _ => Ok(false),
        }
    }

    pub fn set_prototype(&self, prototype: Option<ObjectRef>) -> Result<bool> {
        match self {
            Value::Object(obj) => Ok(obj.set_prototype(prototype)),
            Value::View(view) => view.set_prototype(prototype),
            _ => Ok(false),
        }
    }

    /// Call with an explicit receiver
    pub fn call(&self, this: &Value, args: &[Value]) -> Result<Value> {
        match self {
            Value::Object(obj) => obj.call(this, args),
            Value::View(view) => view.call(this, args),
            other => Err(ProxyError::NotCallable(other.kind().as_str())),
        }
    }

    /// Method call: read `name` and call it with `self` as receiver
    pub fn invoke(&self, name: &str, args: &[Value]) -> Result<Value> {
        self.get(name)?.call(self, args)
    }

    /// Construction using the value itself as the new-target hint
    pub fn construct(&self, args: &[Value]) -> Result<Value> {
        self.construct_with(args, self)
    }

    pub fn construct_with(&self, args: &[Value], new_target: &Value) -> Result<Value> {
        match self {
            Value::Object(obj) => obj.construct(args, new_target),
            Value::View(view) => view.construct_with(args, new_target),
            other => Err(ProxyError::NotConstructible(other.kind().as_str())),
        }
    }

    /// Build a host graph from JSON
    pub fn from_json(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::array(items.into_iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(map) => {
                let obj = ObjectRef::plain();
                for (key, item) in map {
                    obj.set(&key, Value::from_json(item));
                }
                Value::Object(obj)
            }
        }
    }

    /// Parse JSON text into a host graph
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(Value::from_json(serde_json::from_str(text)?))
    }

    /// Snapshot the graph as JSON; functions and undefined become null
    /// (undefined properties are skipped), views convert through their target
    pub fn to_json(&self) -> Result<serde_json::Value> {
        let mut visiting = HashSet::new();
        self.to_json_inner(&mut visiting)
    }

    fn to_json_inner(&self, visiting: &mut HashSet<usize>) -> Result<serde_json::Value> {
        let obj = match self {
            Value::Undefined | Value::Null => return Ok(serde_json::Value::Null),
            Value::Bool(b) => return Ok(serde_json::Value::Bool(*b)),
            Value::Number(n) => return Ok(number_to_json(*n)),
            Value::String(s) => return Ok(serde_json::Value::String(s.clone())),
            Value::View(view) => return view.target().to_json_inner(visiting),
            Value::Object(obj) => obj,
        };

        let key = obj.identity();
        if !visiting.insert(key) {
            return Err(ProxyError::CyclicValue);
        }

        let json = match obj.kind() {
            ValueKind::Function => serde_json::Value::Null,
            ValueKind::Array => serde_json::Value::Array(
                obj.elements()?
                    .iter()
                    .map(|item| item.to_json_inner(visiting))
                    .collect::<Result<_>>()?,
            ),
            _ => {
                let mut map = serde_json::Map::new();
                for (name, item) in obj.properties() {
                    if item.is_undefined() {
                        continue;
                    }
                    map.insert(name, item.to_json_inner(visiting)?);
                }
                serde_json::Value::Object(map)
            }
        };

        visiting.remove(&key);
        Ok(json)
    }
}

/// Integral numbers in the `i64` range become JSON integers; NaN and the
/// infinities become null
fn number_to_json(n: f64) -> serde_json::Value {
    if n.fract() == 0.0 && n >= i64::MIN as f64 && n < i64::MAX as f64 {
        return serde_json::Value::from(n as i64);
    }
    serde_json::Number::from_f64(n)
        .map(serde_json::Value::Number)
        .unwrap_or(serde_json::Value::Null)
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Object(obj) => obj.fmt(f),
            Value::View(view) => view.fmt(f),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Undefined
    }
}

impl From<ObjectRef> for Value {
    fn from(obj: ObjectRef) -> Self {
        Value::Object(obj)
    }
}

impl From<View> for Value {
    fn from(view: View) -> Self {
        Value::View(view)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        Value::from_json(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_conversion() {
        let value = Value::from_json(json!({"a": {"b": [1, 2, {"c": true}]}, "s": "x"}));
        assert_eq!(value.get_in(["a", "b", "2", "c"]).unwrap(), Value::from(true));
        assert_eq!(value.get("s").unwrap(), Value::from("x"));
        assert_eq!(
            value.to_json().unwrap(),
            json!({"a": {"b": [1, 2, {"c": true}]}, "s": "x"})
        );
    }

    #[test]
    fn test_json_text() {
        let value = Value::from_json_str(r#"{"n": 1.5, "list": [null, "x"]}"#).unwrap();
        assert_eq!(value.get("n").unwrap(), Value::from(1.5));
        assert_eq!(value.get_in(["list", "1"]).unwrap(), Value::from("x"));
        assert!(matches!(
            Value::from_json_str("{not json"),
            Err(ProxyError::Serialization(_))
        ));
    }

    #[test]
    fn test_sparse_array_to_json() {
        let list = Value::array(vec![Value::from(1)]);
        list.set("2", 3).unwrap();
        assert_eq!(list.to_json().unwrap(), json!([1, null, 3]));

        list.set("4000000000", 4).unwrap();
        assert!(matches!(list.to_json(), Err(ProxyError::Host(_))));
    }

    #[test]
    fn test_callable_values() {
        let function = Value::function(|_, _| Ok(Value::Null));
        assert!(function.is_callable());
        assert!(!Value::object().is_callable());
        assert!(!Value::from("f").is_callable());
    }

    #[test]
    fn test_cycle_detection() {
        let value = Value::object();
        value.set("me", value.clone()).unwrap();
        assert!(matches!(value.to_json(), Err(ProxyError::CyclicValue)));
    }

    #[test]
    fn test_primitive_access() {
        assert!(matches!(
            Value::Undefined.get("a"),
            Err(ProxyError::NotAnObject { .. })
        ));
        assert_eq!(Value::from("abc").get("length").unwrap(), Value::from(3));
        assert!(Value::from(5).get("a").unwrap().is_undefined());
        assert!(!Value::from(5).set("a", 1).unwrap());
    }

    #[test]
    fn test_identity() {
        let a = Value::object();
        assert_eq!(a, a.clone());
        assert_ne!(a, Value::object());
        assert_ne!(Value::Number(f64::NAN), Value::Number(f64::NAN));
    }

    #[test]
    fn test_invoke_passes_receiver() {
        let obj = Value::object();
        obj.set("name", "host").unwrap();
        obj.set("describe", Value::function(|this, _| this.get("name")))
            .unwrap();
        assert_eq!(obj.invoke("describe", &[]).unwrap(), Value::from("host"));
    }
}
