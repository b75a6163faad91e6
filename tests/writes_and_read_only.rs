// tests/writes_and_read_only.rs
//! Write interception, setter outcomes and read-only modes

use parking_lot::Mutex;
use recursive_proxy::{ObjectRef, ProxyError, ProxyOptions, ReadOnlyMode, RecursiveProxy, Value};
use serde_json::json;
use std::sync::Arc;

fn wrap(options: ProxyOptions, target: &Value) -> recursive_proxy::View {
    RecursiveProxy::new(options).wrap(target.clone()).unwrap()
}

#[test]
fn native_write_round_trips() {
    let target = Value::from_json(json!({"a": {"b": 1}}));
    let view = wrap(ProxyOptions::new(), &target);

    assert!(view.set("c", 3).unwrap());
    assert_eq!(view.get("c").unwrap(), Value::from(3));
    assert_eq!(target.get("c").unwrap(), Value::from(3));

    let a = view.get("a").unwrap();
    assert!(a.set("b", 2).unwrap());
    assert_eq!(target.get_in(["a", "b"]).unwrap(), Value::from(2));
}

#[test]
fn array_writes_out_of_index_range() {
    let target = Value::array(vec![Value::from(1)]);
    let view = wrap(ProxyOptions::new().follow_array(true), &target);

    assert!(view.set("18446744073709551615", 1).unwrap());
    assert_eq!(view.get("18446744073709551615").unwrap(), Value::from(1));
    assert_eq!(view.get("length").unwrap(), Value::from(1));

    assert!(!view.set("length", 1e300).unwrap());
    assert!(!view.set("length", 4_294_967_296.0).unwrap());
    assert_eq!(target.get("length").unwrap(), Value::from(1));

    assert!(view.set("4000000000", "far").unwrap());
    assert_eq!(view.get("length").unwrap(), Value::from(4_000_000_001.0));
    assert_eq!(target.get("4000000000").unwrap(), Value::from("far"));
    assert!(view.get("2").unwrap().is_undefined());
}

#[test]
fn setter_rejection_leaves_target_untouched() {
    let target = Value::from_json(json!({"a": 1}));
    let view = wrap(
        ProxyOptions::new().setter(".a", |_, _| Ok(Value::Bool(false))),
        &target,
    );

    assert!(!view.set("a", 3).unwrap());
    assert!(matches!(
        view.assign("a", 3),
        Err(ProxyError::RejectedWrite { ref path }) if path == ".a"
    ));
    assert_eq!(target.get("a").unwrap(), Value::from(1));
}

#[test]
fn setter_is_responsible_for_the_mutation() {
    let target = Value::from_json(json!({"a": 1}));
    let view = wrap(
        ProxyOptions::new().setter(".a", |_, _| Ok(Value::Undefined)),
        &target,
    );

    view.assign("a", 3).unwrap();
    assert_eq!(target.get("a").unwrap(), Value::from(1));
}

#[test]
fn setter_receives_invocation_and_value() {
    let seen: Arc<Mutex<Vec<(String, String, Value)>>> = Arc::new(Mutex::new(Vec::new()));
    let target = Value::from_json(json!({"a": {"b": 1}}));
    let inner = target.get("a").unwrap();

    let record = Arc::clone(&seen);
    let view = wrap(
        ProxyOptions::new().setter("b", move |inv, value| {
            record
                .lock()
                .push((inv.name.to_string(), inv.path.to_string(), value.clone()));
            inv.target.set(inv.name, value)?;
            Ok(Value::Bool(true))
        }),
        &target,
    );

    view.get("a").unwrap().set("b", 9).unwrap();

    let seen = seen.lock();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0, "b");
    assert_eq!(seen[0].1, ".a.b");
    assert_eq!(seen[0].2, Value::from(9));
    assert_eq!(inner.get("b").unwrap(), Value::from(9));
}

#[test]
fn setter_for_other_path_does_not_apply() {
    let target = Value::from_json(json!({"a": 1, "b": 1}));
    let view = wrap(
        ProxyOptions::new().setter(".a", |_, _| Ok(Value::Bool(false))),
        &target,
    );

    assert!(view.set("b", 2).unwrap());
    assert_eq!(target.get("b").unwrap(), Value::from(2));
}

#[test]
fn native_write_on_frozen_object_fails() {
    let target = Value::from_json(json!({"a": {}}));
    target.get("a").unwrap().prevent_extensions().unwrap();
    let view = wrap(ProxyOptions::new(), &target);

    let a = view.get("a").unwrap();
    assert!(!a.set("new", 1).unwrap());
    assert!(a.get("new").unwrap().is_undefined());
}

#[test]
fn silent_read_only_shallow() {
    let target = Value::from_json(json!({"a": 1}));
    let view = wrap(ProxyOptions::new().read_only(ReadOnlyMode::Silent), &target);

    assert!(view.set("a", 3).unwrap());
    assert_eq!(view.get("a").unwrap(), Value::from(1));
}

#[test]
fn silent_read_only_nested() {
    let target = Value::from_json(json!({"a": {"b": {"c": 2}}}));
    let view = wrap(ProxyOptions::new().read_only(ReadOnlyMode::Silent), &target);

    let b = view.get_in(["a", "b"]).unwrap();
    assert!(b.set("c", 3).unwrap());
    assert_eq!(view.get_in(["a", "b", "c"]).unwrap(), Value::from(2));
}

#[test]
fn error_read_only_shallow() {
    let target = Value::from_json(json!({"a": 1}));
    let view = wrap(ProxyOptions::new().read_only(ReadOnlyMode::Error), &target);

    let err = view.set("a", 3).unwrap_err();
    assert!(err.is_read_only_violation());
    assert_eq!(view.get("a").unwrap(), Value::from(1));
}

#[test]
fn error_read_only_nested() {
    let target = Value::from_json(json!({"a": {"b": {"c": 2}}}));
    let view = wrap(ProxyOptions::new().read_only(ReadOnlyMode::Error), &target);

    let b = view.get_in(["a", "b"]).unwrap();
    assert!(matches!(
        b.set("c", 3),
        Err(ProxyError::ReadOnlyViolation { operation: "set", ref path }) if path == ".a.b.c"
    ));
    assert_eq!(target.get_in(["a", "b", "c"]).unwrap(), Value::from(2));
}

#[test]
fn read_only_precedes_setter_rules() {
    let calls = Arc::new(Mutex::new(0usize));
    let counter = Arc::clone(&calls);
    let target = Value::from_json(json!({"a": 1}));
    let view = wrap(
        ProxyOptions::new()
            .read_only(ReadOnlyMode::Error)
            .setter("", move |_, _| {
                *counter.lock() += 1;
                Ok(Value::Undefined)
            }),
        &target,
    );

    assert!(view.set("a", 2).is_err());
    assert_eq!(*calls.lock(), 0);
}

#[test]
fn read_only_blocks_structural_operations() {
    let target = Value::from_json(json!({"a": {"b": 1}}));
    let view = wrap(ProxyOptions::new().read_only(ReadOnlyMode::Error), &target);
    let a = view.get("a").unwrap();
    let a = a.as_view().unwrap();

    assert!(a.delete("b").unwrap_err().is_read_only_violation());
    assert!(a.define_property("c", 1).unwrap_err().is_read_only_violation());
    assert!(a.prevent_extensions().unwrap_err().is_read_only_violation());
    assert!(a
        .set_prototype(Some(ObjectRef::plain()))
        .unwrap_err()
        .is_read_only_violation());

    let inner = target.get("a").unwrap();
    let inner = inner.as_object().unwrap();
    assert!(inner.has("b"));
    assert!(!inner.has("c"));
    assert!(inner.is_extensible());
    assert!(inner.prototype().is_none());
}

#[test]
fn read_only_still_allows_rules_on_reads() {
    let target = Value::from_json(json!({"a": 1}));
    let view = wrap(
        ProxyOptions::new()
            .read_only(ReadOnlyMode::Silent)
            .value(".a", 5),
        &target,
    );

    assert_eq!(view.get("a").unwrap(), Value::from(5));
}

#[test]
fn structural_operations_pass_through_when_writable() {
    let target = Value::from_json(json!({"a": {"b": 1}}));
    let view = wrap(ProxyOptions::new(), &target);
    let a = view.get("a").unwrap();
    let a = a.as_view().unwrap();

    assert!(a.delete("b").unwrap());
    assert!(a.define_property("c", 2).unwrap());
    assert!(a.prevent_extensions().unwrap());

    let inner = target.get("a").unwrap();
    assert!(!inner.has("b"));
    assert_eq!(inner.get("c").unwrap(), Value::from(2));
    assert!(!inner.as_object().unwrap().is_extensible());
}
