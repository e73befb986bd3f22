//! Recording sink for tests and diagnostics.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use tokio::sync::watch;

use crate::error::SinkResult;
use crate::sink::{BoxFutureStatic, DispatchSink};
use crate::value::{Value, ValueMap};

/// One operation received by a [`RecordingSink`].
#[derive(Debug, Clone, PartialEq)]
pub enum SinkCall {
	/// `notify_change`.
	NotifyChange {
		/// Written property.
		property: String,
		/// Written value.
		value: Value,
	},
	/// `dispatch`.
	Dispatch {
		/// Command name.
		command: String,
		/// First argument, if any.
		payload: Option<Value>,
	},
	/// `dispatch_properties`.
	DispatchProperties(ValueMap),
	/// `dispose`.
	Dispose,
}

/// Sink recording every operation at the moment it is initiated.
///
/// Operations complete immediately unless the sink is gated, and fail when
/// the sink was built with [`RecordingSink::failing`].
#[derive(Debug, Default)]
pub struct RecordingSink {
	calls: Mutex<Vec<SinkCall>>,
	completed: Arc<AtomicUsize>,
	failure: Option<String>,
	gate: Option<watch::Receiver<bool>>,
}

/// Releases the operations of a gated [`RecordingSink`].
#[derive(Debug)]
pub struct Gate(watch::Sender<bool>);

impl Gate {
	/// Lets every pending and future operation complete.
	pub fn open(&self) {
		self.0.send_replace(true);
	}
}

impl RecordingSink {
	/// A sink whose operations succeed immediately.
	pub fn new() -> Arc<Self> {
		Arc::new(Self::default())
	}

	/// A sink whose operations fail with `message`.
	pub fn failing(message: impl Into<String>) -> Arc<Self> {
		Arc::new(Self {
			failure: Some(message.into()),
			..Self::default()
		})
	}

	/// A sink whose operations complete only once the gate opens.
	pub fn gated() -> (Arc<Self>, Gate) {
		let (tx, rx) = watch::channel(false);
		let sink = Self {
			gate: Some(rx),
			..Self::default()
		};
		(Arc::new(sink), Gate(tx))
	}

	/// Operations initiated so far, in order.
	pub fn calls(&self) -> Vec<SinkCall> {
		self.calls.lock().clone()
	}

	/// Number of operations that ran to completion.
	pub fn completed(&self) -> usize {
		self.completed.load(Ordering::Acquire)
	}

	/// Forgets recorded operations.
	pub fn clear(&self) {
		self.calls.lock().clear();
	}

	fn record(&self, call: SinkCall) -> BoxFutureStatic<SinkResult> {
		self.calls.lock().push(call);
		let completed = Arc::clone(&self.completed);
		let failure = self.failure.clone();
		let gate = self.gate.clone();
		Box::pin(async move {
			if let Some(mut gate) = gate {
				let _ = gate.wait_for(|open| *open).await;
			}
			completed.fetch_add(1, Ordering::AcqRel);
			match failure {
				Some(message) => Err(message.into()),
				None => Ok(()),
			}
		})
	}
}

impl DispatchSink for RecordingSink {
	fn notify_change(&self, property: &str, value: Value) -> BoxFutureStatic<SinkResult> {
		self.record(SinkCall::NotifyChange {
			property: property.to_owned(),
			value,
		})
	}

	fn dispatch(&self, command: &str, payload: Option<Value>) -> BoxFutureStatic<SinkResult> {
		self.record(SinkCall::Dispatch {
			command: command.to_owned(),
			payload,
		})
	}

	fn dispatch_properties(&self, properties: ValueMap) -> BoxFutureStatic<SinkResult> {
		self.record(SinkCall::DispatchProperties(properties))
	}

	fn dispose(&self) -> BoxFutureStatic<SinkResult> {
		self.record(SinkCall::Dispose)
	}
}
