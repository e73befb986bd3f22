//! Dispatch sink contract and pending completions.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::error::{Error, Result, SinkResult};
use crate::spawn::spawn_detached;
use crate::value::{Value, ValueMap};

/// A pinned, boxed future that is required to be Send and 'static.
pub type BoxFutureStatic<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// External collaborator receiving forwarded notifications and commands.
///
/// Each method is called synchronously from inside the intercepted call, so
/// the operation is initiated before the call returns. The returned future
/// signals completion; the proxy either hands it to the caller or drives it
/// detached, depending on the call site's signature.
pub trait DispatchSink: Send + Sync {
	/// A watched property was written.
	fn notify_change(&self, property: &str, value: Value) -> BoxFutureStatic<SinkResult>;

	/// A named command was invoked with at most one payload.
	fn dispatch(&self, command: &str, payload: Option<Value>) -> BoxFutureStatic<SinkResult>;

	/// A reserved `Dispatch` member forwarded a name/value map.
	fn dispatch_properties(&self, properties: ValueMap) -> BoxFutureStatic<SinkResult>;

	/// A reserved `Dispose` member was invoked.
	fn dispose(&self) -> BoxFutureStatic<SinkResult>;
}

/// Completion of a forwarded sink operation.
///
/// Resolves when the sink's operation resolves; sink failures surface as
/// [`Error::Sink`].
#[must_use = "dropping a Pending discards the forwarded operation; call `detach` to run it unobserved"]
pub struct Pending {
	member: String,
	fut: BoxFutureStatic<SinkResult>,
}

impl Pending {
	pub(crate) fn new(member: impl Into<String>, fut: BoxFutureStatic<SinkResult>) -> Self {
		Self {
			member: member.into(),
			fut,
		}
	}

	/// An already completed operation.
	pub fn completed(member: impl Into<String>) -> Self {
		Self::new(member, Box::pin(std::future::ready(Ok(()))))
	}

	/// Member whose call produced this operation.
	pub fn member(&self) -> &str {
		&self.member
	}

	/// Runs the operation to completion without an observer.
	///
	/// Failures are logged and otherwise lost.
	pub fn detach(self) {
		let Self { member, fut } = self;
		spawn_detached(&member.clone(), async move {
			if let Err(error) = fut.await {
				tracing::warn!(member = %member, %error, "proxy.forward.detached_failed");
			}
		});
	}
}

impl Future for Pending {
	type Output = Result<()>;

	fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
		self.get_mut().fut.as_mut().poll(cx).map(|res| res.map_err(Error::Sink))
	}
}

impl fmt::Debug for Pending {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Pending").field("member", &self.member).finish_non_exhaustive()
	}
}
