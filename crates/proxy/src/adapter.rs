//! Runtime surface of `#[contract]`-generated adapters.
//!
//! A generated adapter wraps one [`Proxy`] and forwards every trait member to
//! [`Proxy::invoke`] through the helpers below.

use crate::contract::ContractDef;
use crate::error::Result;
use crate::factory::ProxyFactory;
use crate::proxy::Proxy;
use crate::router::Reply;
use crate::sink::Pending;
use crate::value::{PropertyType, Value, ValueType};

/// A typed adapter over a [`Proxy`].
pub trait ContractType: Sized {
	/// Static declaration of the adapted contract.
	fn definition() -> &'static ContractDef;

	/// Wraps a proxy of this contract.
	fn from_proxy(proxy: Proxy) -> Self;

	/// The wrapped proxy.
	fn proxy(&self) -> &Proxy;

	/// Unwraps the proxy.
	fn into_proxy(self) -> Proxy;
}

/// Creates an adapter through the global factory.
pub fn create<C: ContractType>() -> C {
	ProxyFactory::global().create_typed()
}

/// Property read entry point.
///
/// An absent property of a nested contract type reads as a fresh instance
/// that is stored in place, so writes through it are kept.
pub fn read<T: PropertyType>(proxy: &Proxy, getter: &str) -> T {
	let value = match proxy.invoke(getter, Vec::new()) {
		Ok(reply) => reply.into_value(),
		Err(error) => {
			tracing::warn!(%error, "proxy.adapter.read");
			return T::from_value(Value::Null);
		}
	};
	if value.is_null() && matches!(T::value_type(), ValueType::Contract(_)) {
		let fresh = T::from_value(Value::Null).into_value();
		if !fresh.is_null() {
			return T::from_value(proxy.fill_absent(getter, fresh));
		}
	}
	T::from_value(value)
}

/// Property write entry point.
pub fn write<T: PropertyType>(proxy: &Proxy, setter: &str, value: T) -> Result<()> {
	proxy.invoke(setter, vec![value.into_value()]).map(drop)
}

/// Synchronous method entry point.
pub fn call(proxy: &Proxy, member: &str, args: Vec<Value>) -> Result<()> {
	match proxy.invoke(member, args)? {
		Reply::Pending(pending) => pending.detach(),
		Reply::Value(_) | Reply::Done => {}
	}
	Ok(())
}

/// Asynchronous method entry point.
pub fn call_async(proxy: &Proxy, member: &str, args: Vec<Value>) -> Result<Pending> {
	Ok(proxy
		.invoke(member, args)?
		.into_pending()
		.unwrap_or_else(|| Pending::completed(member)))
}

/// Converts a stored value into a nested adapter.
///
/// Anything other than an instance of `C`'s contract yields a fresh, detached
/// instance.
pub fn contract_from_value<C: ContractType>(value: Value) -> C {
	match value {
		Value::Contract(proxy) if proxy.contract().name() == C::definition().name => C::from_proxy(proxy),
		other => {
			if !other.is_null() {
				tracing::warn!(
					expected = C::definition().name,
					found = other.kind(),
					"proxy.value.mismatch"
				);
			}
			create()
		}
	}
}
