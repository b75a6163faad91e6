// src/host/object.rs
//! Shared heap objects
//!
//! Every non-primitive host value lives behind an [`ObjectRef`], a cheap
//! clonable handle to lock-protected object data. Cloning the handle shares
//! the object, so writes through one handle are visible through every other.

use crate::host::value::{Value, ValueKind};
use crate::utils::errors::{ProxyError, Result};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Native function body: `(this, args) -> result`
pub type NativeFn = Arc<dyn Fn(&Value, &[Value]) -> Result<Value> + Send + Sync>;

/// Native constructor body: `(args, new_target) -> instance`
pub type NativeCtor = Arc<dyn Fn(&[Value], &Value) -> Result<Value> + Send + Sync>;

/// Object kind
#[derive(Clone)]
pub enum ObjectKind {
    /// Plain data object
    Plain,

    /// Ordered sequence
    Array,

    /// Class instance or any other non-plain object
    Instance { class: String },

    /// Callable, optionally constructible
    Function {
        call: NativeFn,
        construct: Option<NativeCtor>,
    },
}

impl fmt::Debug for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectKind::Plain => f.write_str("Plain"),
            ObjectKind::Array => f.write_str("Array"),
            ObjectKind::Instance { class } => write!(f, "Instance({})", class),
            ObjectKind::Function { construct, .. } => {
                write!(f, "Function(constructible: {})", construct.is_some())
            }
        }
    }
}

struct ObjectData {
    kind: ObjectKind,
    properties: BTreeMap<String, Value>,
    elements: BTreeMap<usize, Value>,
    length: usize,
    prototype: Option<ObjectRef>,
    extensible: bool,
}

impl ObjectData {
    fn own(&self, name: &str) -> Option<Value> {
        if matches!(self.kind, ObjectKind::Array) {
            if name == "length" {
                return Some(Value::Number(self.length as f64));
            }
            if let Some(index) = parse_index(name) {
                return self.elements.get(&index).cloned();
            }
        }

        self.properties.get(name).cloned()
    }

    fn put(&mut self, name: &str, value: Value) -> bool {
        if matches!(self.kind, ObjectKind::Array) {
            if name == "length" {
                let Some(length) = value.as_f64().and_then(array_length) else {
                    return false;
                };
                if length < self.length {
                    self.elements.retain(|&index, _| index < length);
                }
                self.length = length;
                return true;
            }
            if let Some(index) = parse_index(name) {
                if !self.extensible && !self.elements.contains_key(&index) {
                    return false;
                }
                if index >= self.length {
                    let Some(length) = index.checked_add(1) else {
                        return false;
                    };
                    self.length = length;
                }
                self.elements.insert(index, value);
                return true;
            }
        }

        if !self.extensible && !self.properties.contains_key(name) {
            return false;
        }

        self.properties.insert(name.to_string(), value);
        true
    }
}

/// Largest array length; indices run up to one below it
pub const MAX_ARRAY_LENGTH: u32 = u32::MAX;

/// Largest array length [`ObjectRef::elements`] materializes densely
pub const MAX_DENSE_LENGTH: usize = 1 << 24;

/// Canonical array index below [`MAX_ARRAY_LENGTH`]; other keys are named
/// properties
fn parse_index(name: &str) -> Option<usize> {
    if name.is_empty() || (name.len() > 1 && name.starts_with('0')) {
        return None;
    }
    if !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let index: u32 = name.parse().ok()?;
    if index >= MAX_ARRAY_LENGTH {
        return None;
    }
    usize::try_from(index).ok()
}

fn array_length(value: f64) -> Option<usize> {
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 {
        return None;
    }
    if value > f64::from(MAX_ARRAY_LENGTH) {
        return None;
    }
    usize::try_from(value as u32).ok()
}

/// Shared handle to a host object
#[derive(Clone)]
pub struct ObjectRef(Arc<RwLock<ObjectData>>);

impl ObjectRef {
    fn from_parts(kind: ObjectKind, elements: Vec<Value>) -> Self {
        Self(Arc::new(RwLock::new(ObjectData {
            kind,
            properties: BTreeMap::new(),
            length: elements.len(),
            elements: elements.into_iter().enumerate().collect(),
            prototype: None,
            extensible: true,
        })))
    }

    /// Create an empty plain object
    pub fn plain() -> Self {
        Self::from_parts(ObjectKind::Plain, Vec::new())
    }

    /// Create an array holding `elements`
    pub fn array(elements: Vec<Value>) -> Self {
        Self::from_parts(ObjectKind::Array, elements)
    }

    /// Create a non-plain object tagged with a class name
    pub fn instance(class: impl Into<String>) -> Self {
        Self::from_parts(
            ObjectKind::Instance {
                class: class.into(),
            },
            Vec::new(),
        )
    }

    /// Create a callable that cannot be constructed
    pub fn function<F>(call: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        Self::from_parts(
            ObjectKind::Function {
                call: Arc::new(call),
                construct: None,
            },
            Vec::new(),
        )
    }

    /// Create a callable that can also be constructed
    pub fn constructor<F, C>(call: F, construct: C) -> Self
    where
        F: Fn(&Value, &[Value]) -> Result<Value> + Send + Sync + 'static,
        C: Fn(&[Value], &Value) -> Result<Value> + Send + Sync + 'static,
    {
        Self::from_parts(
            ObjectKind::Function {
                call: Arc::new(call),
                construct: Some(Arc::new(construct)),
            },
            Vec::new(),
        )
    }

    /// Builder helper: set a property and return the handle
    pub fn with(self, name: &str, value: impl Into<Value>) -> Self {
        self.set(name, value.into());
        self
    }

    /// Kind classification used by the follow predicate
    pub fn kind(&self) -> ValueKind {
        let data = self.0.read();
        match &data.kind {
            ObjectKind::Function { .. } => ValueKind::Function,
            ObjectKind::Array => ValueKind::Array,
            ObjectKind::Plain if data.prototype.is_none() => ValueKind::PlainObject,
            ObjectKind::Plain | ObjectKind::Instance { .. } => ValueKind::Object,
        }
    }

    /// Class tag for instances
    pub fn class_name(&self) -> Option<String> {
        match &self.0.read().kind {
            ObjectKind::Instance { class } => Some(class.clone()),
            _ => None,
        }
    }

    pub fn is_callable(&self) -> bool {
        matches!(self.0.read().kind, ObjectKind::Function { .. })
    }

    pub fn is_constructible(&self) -> bool {
        matches!(
            self.0.read().kind,
            ObjectKind::Function {
                construct: Some(_),
                ..
            }
        )
    }

    pub fn is_extensible(&self) -> bool {
        self.0.read().extensible
    }

    /// Handle identity
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Address of the shared allocation, stable while any handle is alive
    pub fn identity(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }

    /// Property lookup through own properties, then the prototype chain
    pub fn get(&self, name: &str) -> Value {
        let prototype = {
            let data = self.0.read();
            if let Some(value) = data.own(name) {
                return value;
            }
            data.prototype.clone()
        };

        match prototype {
            Some(prototype) => prototype.get(name),
            None => Value::Undefined,
        }
    }

    /// Own or inherited property check
    pub fn has(&self, name: &str) -> bool {
        let prototype = {
            let data = self.0.read();
            if data.own(name).is_some() {
                return true;
            }
            data.prototype.clone()
        };

        prototype.map_or(false, |prototype| prototype.has(name))
    }

    /// Assignment; false when the object is not extensible and the key is new
    pub fn set(&self, name: &str, value: Value) -> bool {
        self.0.write().put(name, value)
    }

    /// Property definition
    pub fn define_property(&self, name: &str, value: Value) -> bool {
        self.0.write().put(name, value)
    }

    /// Property removal; array slots become holes
    pub fn delete(&self, name: &str) -> bool {
        let mut data = self.0.write();
        if matches!(data.kind, ObjectKind::Array) {
            if name == "length" {
                return false;
            }
            if let Some(index) = parse_index(name) {
                data.elements.remove(&index);
                return true;
            }
        }

        data.properties.remove(name);
        true
    }

    pub fn prevent_extensions(&self) -> bool {
        self.0.write().extensible = false;
        true
    }

    /// Current prototype, if any
    pub fn prototype(&self) -> Option<ObjectRef> {
        self.0.read().prototype.clone()
    }

    /// Replace the prototype; refuses cycles and changes on sealed objects
    pub fn set_prototype(&self, prototype: Option<ObjectRef>) -> bool {
        {
            let data = self.0.read();
            let unchanged = match (&data.prototype, &prototype) {
                (None, None) => true,
                (Some(current), Some(next)) => current.ptr_eq(next),
                _ => false,
            };
            if unchanged {
                return true;
            }
            if !data.extensible {
                return false;
            }
        }

        let mut cursor = prototype.clone();
        while let Some(link) = cursor {
            if link.ptr_eq(self) {
                return false;
            }
            cursor = link.prototype();
        }

        self.0.write().prototype = prototype;
        true
    }

    /// Own keys: present array indices first, then named properties in
    /// sorted order
    pub fn keys(&self) -> Vec<String> {
        let data = self.0.read();
        let mut keys: Vec<String> = data.elements.keys().map(|i| i.to_string()).collect();
        if matches!(data.kind, ObjectKind::Array) {
            keys.push("length".to_string());
        }
        keys.extend(data.properties.keys().cloned());
        keys
    }

    /// Array length (zero for other kinds)
    pub fn length(&self) -> usize {
        self.0.read().length
    }

    /// Dense snapshot of array elements with holes as `Undefined` (empty for
    /// other kinds); fails above [`MAX_DENSE_LENGTH`]
    pub fn elements(&self) -> Result<Vec<Value>> {
        let data = self.0.read();
        if data.length > MAX_DENSE_LENGTH {
            return Err(ProxyError::host(format!(
                "array of length {} is too large to materialize",
                data.length
            )));
        }

        let mut dense = vec![Value::Undefined; data.length];
        for (index, value) in &data.elements {
            if let Some(slot) = dense.get_mut(*index) {
                *slot = value.clone();
            }
        }
        Ok(dense)
    }

    /// Snapshot of named properties
    pub fn properties(&self) -> Vec<(String, Value)> {
        self.0
            .read()
            .properties
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Native call
    pub fn call(&self, this: &Value, args: &[Value]) -> Result<Value> {
        let call = match &self.0.read().kind {
            ObjectKind::Function { call, .. } => Some(Arc::clone(call)),
            _ => None,
        };
        match call {
            Some(call) => call(this, args),
            None => Err(ProxyError::NotCallable(self.kind().as_str())),
        }
    }

    /// Native construction
    pub fn construct(&self, args: &[Value], new_target: &Value) -> Result<Value> {
        let construct = match &self.0.read().kind {
            ObjectKind::Function {
                construct: Some(construct),
                ..
            } => Some(Arc::clone(construct)),
            _ => None,
        };
        let Some(construct) = construct else {
            return Err(ProxyError::NotConstructible(self.kind().as_str()));
        };

        let instance = construct(args, new_target)?;
        if !instance.is_object_like() {
            return Err(ProxyError::InvalidConstructResult {
                path: String::new(),
                found: instance.kind().as_str(),
            });
        }
        Ok(instance)
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_read() {
            Some(data) => f
                .debug_struct("Object")
                .field("kind", &data.kind)
                .field("keys", &data.properties.keys().collect::<Vec<_>>())
                .field("len", &data.length)
                .finish(),
            None => f.write_str("Object(<locked>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_get_set() {
        let obj = ObjectRef::plain();
        assert!(obj.set("a", Value::from(1)));
        assert_eq!(obj.get("a"), Value::from(1));
        assert!(obj.get("b").is_undefined());
        assert_eq!(obj.kind(), ValueKind::PlainObject);
    }

    #[test]
    fn test_array_indices_and_length() {
        let arr = ObjectRef::array(vec![Value::from(1), Value::from(2)]);
        assert_eq!(arr.get("length"), Value::from(2));
        assert_eq!(arr.get("1"), Value::from(2));
        assert!(arr.get("01").is_undefined());

        assert!(arr.set("3", Value::from(4)));
        assert_eq!(arr.get("length"), Value::from(4));
        assert!(arr.get("2").is_undefined());

        assert!(arr.set("length", Value::from(1)));
        assert_eq!(arr.elements().unwrap().len(), 1);
        assert!(!arr.delete("length"));
    }

    #[test]
    fn test_index_range_is_bounded() {
        let arr = ObjectRef::array(vec![Value::from(1)]);

        assert!(arr.set("18446744073709551615", Value::from(2)));
        assert_eq!(arr.get("18446744073709551615"), Value::from(2));
        assert!(arr.set("4294967295", Value::from(3)));
        assert_eq!(arr.get("length"), Value::from(1));
        assert_eq!(
            arr.keys(),
            vec!["0", "length", "18446744073709551615", "4294967295"]
        );

        assert!(arr.set("4294967294", Value::from(4)));
        assert_eq!(arr.length(), 4_294_967_295);
        assert_eq!(arr.get("4294967294"), Value::from(4));
    }

    #[test]
    fn test_length_rejects_out_of_range() {
        let arr = ObjectRef::array(vec![Value::from(1)]);
        for bad in [1e300, 4_294_967_296.0, -1.0, 1.5, f64::NAN, f64::INFINITY] {
            assert!(!arr.set("length", Value::Number(bad)));
        }
        assert!(!arr.set("length", Value::from("2")));
        assert_eq!(arr.get("length"), Value::from(1));

        assert!(arr.set("length", Value::Number(4_294_967_295.0)));
        assert_eq!(arr.length(), 4_294_967_295);
        assert_eq!(arr.keys(), vec!["0", "length"]);
    }

    #[test]
    fn test_sparse_writes_and_truncation() {
        let arr = ObjectRef::array(vec![Value::from(1), Value::from(2)]);
        assert!(arr.set("4000000000", Value::from(3)));
        assert_eq!(arr.length(), 4_000_000_001);
        assert_eq!(arr.keys(), vec!["0", "1", "4000000000", "length"]);
        assert!(matches!(arr.elements(), Err(ProxyError::Host(_))));

        assert!(arr.delete("1"));
        assert!(arr.get("1").is_undefined());
        assert!(!arr.has("1"));

        assert!(arr.set("length", Value::from(1)));
        assert!(arr.get("4000000000").is_undefined());
        assert_eq!(arr.elements().unwrap(), vec![Value::from(1)]);
    }

    #[test]
    fn test_non_extensible_array() {
        let arr = ObjectRef::array(vec![Value::from(1)]);
        assert!(arr.prevent_extensions());
        assert!(arr.set("0", Value::from(2)));
        assert!(!arr.set("5", Value::from(3)));
        assert_eq!(arr.get("length"), Value::from(1));
    }

    #[test]
    fn test_kind_predicates() {
        let instance = ObjectRef::instance("Date");
        assert_eq!(instance.class_name().as_deref(), Some("Date"));
        assert!(!instance.is_callable());
        assert!(ObjectRef::plain().class_name().is_none());

        let function = ObjectRef::function(|_, _| Ok(Value::Undefined));
        assert!(function.is_callable());
        assert!(!function.is_constructible());

        let constructor =
            ObjectRef::constructor(|_, _| Ok(Value::Undefined), |_, _| Ok(Value::object()));
        assert!(constructor.is_callable());
        assert!(constructor.is_constructible());
        assert!(!ObjectRef::array(Vec::new()).is_constructible());
    }

    #[test]
    fn test_prevent_extensions() {
        let obj = ObjectRef::plain().with("a", 1);
        assert!(obj.prevent_extensions());
        assert!(!obj.set("b", Value::from(2)));
        assert!(obj.set("a", Value::from(3)));
        assert_eq!(obj.get("a"), Value::from(3));
    }

    #[test]
    fn test_prototype_chain_and_cycles() {
        let base = ObjectRef::plain().with("greeting", "hi");
        let derived = ObjectRef::plain();
        assert!(derived.set_prototype(Some(base.clone())));
        assert_eq!(derived.get("greeting"), Value::from("hi"));
        assert!(derived.has("greeting"));
        assert_eq!(derived.kind(), ValueKind::Object);

        assert!(!base.set_prototype(Some(derived.clone())));
    }

    #[test]
    fn test_call_and_construct() {
        let double = ObjectRef::function(|_, args| {
            let n = args.first().and_then(Value::as_f64).unwrap_or(0.0);
            Ok(Value::from(n * 2.0))
        });
        assert_eq!(
            double.call(&Value::Undefined, &[Value::from(4)]).unwrap(),
            Value::from(8)
        );
        assert!(matches!(
            double.construct(&[], &Value::Undefined),
            Err(ProxyError::NotConstructible(_))
        ));

        let point = ObjectRef::constructor(
            |_, _| Ok(Value::Undefined),
            |args, _| {
                let x = args.first().cloned().unwrap_or_default();
                Ok(Value::from(ObjectRef::instance("Point").with("x", x)))
            },
        );
        let p = point.construct(&[Value::from(3)], &Value::Undefined).unwrap();
        assert_eq!(p.get("x").unwrap(), Value::from(3));

        let plain = ObjectRef::plain();
        assert!(matches!(
            plain.call(&Value::Undefined, &[]),
            Err(ProxyError::NotCallable(_))
        ));
    }
}
