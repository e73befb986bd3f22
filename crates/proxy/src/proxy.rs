//! Dynamic contract instances.

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};

use crate::contract::{Contract, Member};
use crate::error::{Error, Result};
use crate::router::{self, Reply};
use crate::sink::DispatchSink;
use crate::store::ValueStore;
use crate::value::{Value, ValueMap};

/// Runtime instance of a contract.
///
/// Owns one [`ValueStore`] and one optional weak reference to a
/// [`DispatchSink`]. Cloning yields another handle to the same instance.
///
/// Each call is applied atomically; the store lock is never held while the
/// sink is called. Ordering between concurrent writers is up to the caller.
#[derive(Clone)]
pub struct Proxy {
	inner: Arc<ProxyInner>,
}

pub(crate) struct ProxyInner {
	pub(crate) contract: Arc<Contract>,
	pub(crate) store: Mutex<ValueStore>,
	sink: RwLock<Option<Weak<dyn DispatchSink>>>,
}

impl ProxyInner {
	/// Upgrades the attached sink for forwarding `member`.
	pub(crate) fn sink(&self, member: &str) -> Result<Arc<dyn DispatchSink>> {
		self.sink
			.read()
			.as_ref()
			.and_then(Weak::upgrade)
			.ok_or_else(|| Error::SinkUnavailable {
				member: member.to_owned(),
			})
	}
}

impl Proxy {
	pub(crate) fn new(contract: Arc<Contract>) -> Self {
		tracing::debug!(contract = contract.name(), "proxy.create");
		Self {
			inner: Arc::new(ProxyInner {
				store: Mutex::new(ValueStore::new(Arc::clone(&contract))),
				contract,
				sink: RwLock::new(None),
			}),
		}
	}

	/// The contract this instance satisfies.
	pub fn contract(&self) -> &Arc<Contract> {
		&self.inner.contract
	}

	/// Attaches `sink`, replacing any previous one.
	///
	/// Only a weak reference is kept; the caller owns the sink's lifetime.
	pub fn attach_sink<S: DispatchSink + 'static>(&self, sink: &Arc<S>) {
		let weak = Arc::downgrade(sink);
		let weak: Weak<dyn DispatchSink> = weak;
		*self.inner.sink.write() = Some(weak);
	}

	/// Attaches an already type-erased sink.
	pub fn attach_dyn_sink(&self, sink: &Arc<dyn DispatchSink>) {
		*self.inner.sink.write() = Some(Arc::downgrade(sink));
	}

	/// Detaches the current sink.
	pub fn detach_sink(&self) {
		*self.inner.sink.write() = None;
	}

	/// Returns true when a live sink is attached.
	pub fn has_sink(&self) -> bool {
		self.inner.sink.read().as_ref().is_some_and(|weak| weak.strong_count() > 0)
	}

	/// Intercepts a call to `member` (an accessor entry point such as
	/// `get_count`/`set_count`, or a declared method name).
	pub fn invoke(&self, member: &str, args: Vec<Value>) -> Result<Reply> {
		let Some(classified) = self.inner.contract.classify(member) else {
			return Err(self.unknown(member));
		};
		router::route(&self.inner, classified, args)
	}

	/// Reads a property through its getter.
	pub fn get(&self, property: &str) -> Result<Value> {
		let index = self.property_index(property)?;
		Ok(router::read(&self.inner, index))
	}

	/// Writes a property through its setter.
	pub fn set(&self, property: &str, value: impl Into<Value>) -> Result<()> {
		let index = self.property_index(property)?;
		router::route(&self.inner, Member::Set(index), vec![value.into()]).map(drop)
	}

	/// Stores `value` under the property read by `getter` unless it already
	/// holds a non-null value, returning what the property holds afterwards.
	///
	/// Never notifies the sink.
	pub(crate) fn fill_absent(&self, getter: &str, value: Value) -> Value {
		let Some(Member::Get(index)) = self.inner.contract.classify(getter) else {
			return value;
		};
		let prop = self.inner.contract.property_at(index);
		let mut store = self.inner.store.lock();
		let current = store.get(prop.name());
		if !current.is_null() {
			return current;
		}
		tracing::trace!(contract = self.inner.contract.name(), member = getter, "proxy.fill_absent");
		store.set(prop.name(), value.clone());
		value
	}

	/// Every declared property read through its getter, in declaration order.
	pub fn snapshot(&self) -> ValueMap {
		self.inner
			.contract
			.properties()
			.iter()
			.enumerate()
			.map(|(index, prop)| (prop.name().to_owned(), router::read(&self.inner, index)))
			.collect()
	}

	/// Returns true when both handles refer to the same instance.
	pub fn ptr_eq(&self, other: &Proxy) -> bool {
		Arc::ptr_eq(&self.inner, &other.inner)
	}

	/// Instance identity, shared by every handle of the instance.
	pub(crate) fn addr(&self) -> usize {
		Arc::as_ptr(&self.inner).addr()
	}

	fn property_index(&self, property: &str) -> Result<usize> {
		self.inner
			.contract
			.property_index(property)
			.ok_or_else(|| self.unknown(property))
	}

	fn unknown(&self, member: &str) -> Error {
		Error::UnknownMember {
			contract: self.inner.contract.name().to_owned(),
			member: member.to_owned(),
		}
	}
}

/// Structural equality: same contract and equal property values.
///
/// A pair of instances already being compared further up counts as equal, so
/// self-referencing graphs compare without unbounded recursion.
impl PartialEq for Proxy {
	fn eq(&self, other: &Self) -> bool {
		proxies_equal(self, other, &mut Vec::new())
	}
}

fn proxies_equal(a: &Proxy, b: &Proxy, comparing: &mut Vec<(usize, usize)>) -> bool {
	if a.ptr_eq(b) {
		return true;
	}
	if a.contract().name() != b.contract().name() {
		return false;
	}
	let pair = (a.addr(), b.addr());
	if comparing.contains(&pair) {
		return true;
	}
	comparing.push(pair);
	let equal = maps_equal(&a.snapshot(), &b.snapshot(), comparing);
	comparing.pop();
	equal
}

fn maps_equal(a: &ValueMap, b: &ValueMap, comparing: &mut Vec<(usize, usize)>) -> bool {
	a.len() == b.len()
		&& a
			.iter()
			.all(|(key, value)| b.get(key).is_some_and(|other| values_equal(value, other, comparing)))
}

fn values_equal(a: &Value, b: &Value, comparing: &mut Vec<(usize, usize)>) -> bool {
	match (a, b) {
		(Value::Contract(a), Value::Contract(b)) => proxies_equal(a, b, comparing),
		(Value::List(a), Value::List(b)) => {
			a.len() == b.len() && a.iter().zip(b).all(|(a, b)| values_equal(a, b, comparing))
		}
		(Value::Map(a), Value::Map(b)) => maps_equal(a, b, comparing),
		_ => a == b,
	}
}

/// Nested instances print as their contract name and identity only.
impl fmt::Debug for Proxy {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let values = Value::Map(self.snapshot());
		f.debug_struct("Proxy")
			.field("contract", &self.contract().name())
			.field("values", &Shallow(&values))
			.field("sink", &self.has_sink())
			.finish()
	}
}

struct Shallow<'a>(&'a Value);

impl fmt::Debug for Shallow<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.0 {
			Value::Contract(proxy) => write!(f, "Proxy({} @ {:#x})", proxy.contract().name(), proxy.addr()),
			Value::List(items) => f.debug_list().entries(items.iter().map(Shallow)).finish(),
			Value::Map(entries) => f
				.debug_map()
				.entries(entries.iter().map(|(key, value)| (key, Shallow(value))))
				.finish(),
			other => fmt::Debug::fmt(other, f),
		}
	}
}

#[cfg(test)]
mod tests;
