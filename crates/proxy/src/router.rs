//! Call classification and the dispatch protocol.
//!
//! Every intercepted member call lands here after the contract's member index
//! classified it:
//! * property read: served from the value store, never forwarded
//! * property write: stored, then `notify_change` when the property is watched
//! * `Dispatch` / `DispatchAsync`: the single map argument goes to `dispatch_properties`
//! * `Dispose` / `DisposeAsync`: `dispose`
//! * any other method: `dispatch(name, first argument)`; the rest are dropped
//!
//! Asynchronous methods return the forwarded operation as [`Reply::Pending`].
//! Synchronous methods and property writes launch it detached, so their call
//! sites never observe its completion or failure.

use crate::contract::{Member, MethodDescriptor, MethodKind};
use crate::error::{Error, Result};
use crate::proxy::ProxyInner;
use crate::sink::Pending;
use crate::value::{Value, ValueMap};

/// Outcome of a routed call.
#[derive(Debug)]
pub enum Reply {
	/// A property read.
	Value(Value),
	/// A completed write or a launched synchronous command.
	Done,
	/// The forwarded operation of an asynchronous method.
	Pending(Pending),
}

impl Reply {
	/// The read value; [`Value::Null`] for other replies.
	pub fn into_value(self) -> Value {
		match self {
			Reply::Value(value) => value,
			Reply::Done | Reply::Pending(_) => Value::Null,
		}
	}

	/// The forwarded operation of an asynchronous method.
	pub fn into_pending(self) -> Option<Pending> {
		match self {
			Reply::Pending(pending) => Some(pending),
			Reply::Value(_) | Reply::Done => None,
		}
	}
}

pub(crate) fn route(proxy: &ProxyInner, member: Member, args: Vec<Value>) -> Result<Reply> {
	match member {
		Member::Get(index) => Ok(Reply::Value(read(proxy, index))),
		Member::Set(index) => {
			let value = args.into_iter().next().unwrap_or_default();
			write(proxy, index, value)?;
			Ok(Reply::Done)
		}
		Member::Method(index) => {
			let method = proxy.contract.method_at(index);
			tracing::trace!(
				contract = proxy.contract.name(),
				member = method.name(),
				is_async = method.is_async(),
				"proxy.route"
			);
			let pending = forward(proxy, method, args)?;
			if method.is_async() {
				Ok(Reply::Pending(pending))
			} else {
				pending.detach();
				Ok(Reply::Done)
			}
		}
	}
}

pub(crate) fn read(proxy: &ProxyInner, index: usize) -> Value {
	let prop = proxy.contract.property_at(index);
	tracing::trace!(contract = proxy.contract.name(), member = prop.getter(), "proxy.route");
	proxy.store.lock().get(prop.name())
}

fn write(proxy: &ProxyInner, index: usize, value: Value) -> Result<()> {
	let prop = proxy.contract.property_at(index);
	tracing::trace!(
		contract = proxy.contract.name(),
		member = prop.setter(),
		watched = prop.is_watched(),
		"proxy.route"
	);

	let notification = prop.is_watched().then(|| value.clone());
	proxy.store.lock().set(prop.name(), value);

	if let Some(value) = notification {
		let sink = proxy.sink(prop.setter())?;
		Pending::new(prop.setter(), sink.notify_change(prop.name(), value)).detach();
	}
	Ok(())
}

fn forward(proxy: &ProxyInner, method: &MethodDescriptor, args: Vec<Value>) -> Result<Pending> {
	let name = method.name();
	match method.kind() {
		MethodKind::Dispatch => {
			let properties = dispatch_argument(name, args)?;
			let sink = proxy.sink(name)?;
			Ok(Pending::new(name, sink.dispatch_properties(properties)))
		}
		MethodKind::Dispose => {
			let sink = proxy.sink(name)?;
			Ok(Pending::new(name, sink.dispose()))
		}
		MethodKind::Command => {
			let sink = proxy.sink(name)?;
			if args.len() > 1 {
				tracing::trace!(member = name, dropped = args.len() - 1, "proxy.route.extra_arguments");
			}
			let payload = args.into_iter().next();
			Ok(Pending::new(name, sink.dispatch(name, payload)))
		}
	}
}

fn dispatch_argument(member: &str, args: Vec<Value>) -> Result<ValueMap> {
	let invalid = |reason| Error::InvalidDispatchArgument {
		member: member.to_owned(),
		reason,
	};
	let mut args = args.into_iter();
	match (args.next(), args.next()) {
		(Some(Value::Map(properties)), None) => Ok(properties),
		(None, _) => Err(invalid("expected one name/value map argument, got none")),
		(Some(_), Some(_)) => Err(invalid("expected exactly one argument")),
		(Some(_), None) => Err(invalid("argument is not a name/value map")),
	}
}
