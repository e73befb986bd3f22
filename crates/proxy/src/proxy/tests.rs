use std::sync::Arc;

use super::Proxy;
use crate::contract::Contract;
use crate::error::Error;
use crate::testing::{RecordingSink, SinkCall};
use crate::value::{Value, ValueType};

fn note() -> Arc<Contract> {
	Arc::new(
		Contract::builder("Note")
			.watched("body", ValueType::Text)
			.property("pinned", ValueType::Bool)
			.method("Archive", 0)
			.build()
			.unwrap(),
	)
}

#[test]
fn test_proxy_is_send_and_sync() {
	fn assert_send_sync<T: Send + Sync>() {}
	assert_send_sync::<Proxy>();
	assert_send_sync::<Value>();
}

#[test]
fn test_instances_do_not_share_state() {
	let contract = note();
	let a = Proxy::new(Arc::clone(&contract));
	let b = Proxy::new(contract);
	a.set("pinned", true).unwrap();
	assert_eq!(a.get("pinned").unwrap(), Value::Bool(true));
	assert_eq!(b.get("pinned").unwrap(), Value::Bool(false));
	assert!(!a.ptr_eq(&b));
}

#[test]
fn test_clones_share_instance() {
	let a = Proxy::new(note());
	let b = a.clone();
	b.set("pinned", true).unwrap();
	assert_eq!(a.get("pinned").unwrap(), Value::Bool(true));
	assert!(a.ptr_eq(&b));
}

#[test]
fn test_structural_equality() {
	let contract = note();
	let a = Proxy::new(Arc::clone(&contract));
	let b = Proxy::new(contract);
	assert_eq!(a, b);
	a.set("pinned", true).unwrap();
	assert_ne!(a, b);
	b.set("pinned", true).unwrap();
	assert_eq!(a, b);
}

#[test]
fn test_sink_slot() {
	let proxy = Proxy::new(note());
	assert!(!proxy.has_sink());

	let first = RecordingSink::new();
	let second = RecordingSink::new();
	proxy.attach_sink(&first);
	assert!(proxy.has_sink());

	proxy.attach_sink(&second);
	proxy.invoke("Archive", vec![]).unwrap();
	assert!(first.calls().is_empty());
	assert_eq!(second.calls().len(), 1);

	proxy.detach_sink();
	assert!(!proxy.has_sink());
	assert!(matches!(
		proxy.invoke("Archive", vec![]).unwrap_err(),
		Error::SinkUnavailable { .. }
	));
}

#[test]
fn test_dyn_sink() {
	let proxy = Proxy::new(note());
	let sink = RecordingSink::new();
	let erased: Arc<dyn crate::sink::DispatchSink> = sink.clone();
	proxy.attach_dyn_sink(&erased);
	proxy.set("body", "text").unwrap();
	assert_eq!(
		sink.calls(),
		[SinkCall::NotifyChange {
			property: "body".into(),
			value: Value::from("text"),
		}]
	);
}

#[test]
fn test_property_access_by_name() {
	let proxy = Proxy::new(note());
	let err = proxy.get("missing").unwrap_err();
	assert!(matches!(err, Error::UnknownMember { ref member, .. } if member == "missing"));
	assert!(matches!(proxy.set("Archive", 1).unwrap_err(), Error::UnknownMember { .. }));
}

#[test]
fn test_snapshot_reads_every_property() {
	let proxy = Proxy::new(note());
	proxy.set("pinned", true).unwrap();
	let snapshot = proxy.snapshot();
	assert_eq!(snapshot.len(), 2);
	assert_eq!(snapshot["body"], Value::Null);
	assert_eq!(snapshot["pinned"], Value::Bool(true));
}

#[test]
fn test_nested_contract_values() {
	let outer = Proxy::new(note());
	let inner = Proxy::new(note());
	inner.set("pinned", true).unwrap();

	let value = Value::from(inner.clone());
	assert!(value.as_proxy().unwrap().ptr_eq(&inner));
	assert_eq!(value.kind(), "contract");
	assert_ne!(Value::from(outer), value);
}

#[test]
fn test_debug_lists_values() {
	let proxy = Proxy::new(note());
	let debug = format!("{proxy:?}");
	assert!(debug.contains("Note"));
	assert!(debug.contains("pinned"));
}

fn node() -> Arc<Contract> {
	Arc::new(
		Contract::builder("Node")
			.property("next", ValueType::contract("Node"))
			.property("label", ValueType::Text)
			.build()
			.unwrap(),
	)
}

#[test]
fn test_debug_of_cyclic_instance() {
	let a = Proxy::new(node());
	a.set("next", a.clone()).unwrap();
	a.set("label", "a").unwrap();

	let debug = format!("{a:?}");
	assert!(debug.contains("Proxy(Node @ 0x"), "{debug}");
	assert!(debug.contains("\"a\""), "{debug}");
}

#[test]
fn test_equality_of_cyclic_instances() {
	let contract = node();
	let a = Proxy::new(Arc::clone(&contract));
	let b = Proxy::new(contract);
	a.set("next", a.clone()).unwrap();
	b.set("next", b.clone()).unwrap();
	assert_eq!(a, b);

	b.set("label", "b").unwrap();
	assert_ne!(a, b);
}

#[test]
fn test_equality_through_mutual_references() {
	let contract = node();
	let a = Proxy::new(Arc::clone(&contract));
	let b = Proxy::new(Arc::clone(&contract));
	a.set("next", b.clone()).unwrap();
	b.set("next", a.clone()).unwrap();

	let c = Proxy::new(contract);
	c.set("next", c.clone()).unwrap();
	assert_eq!(a, c);
	assert_eq!(Value::List(vec![a.into()]), Value::List(vec![c.into()]));
}
