//! Error kinds surfaced by proxies.

use crate::contract::IntrospectError;

/// Opaque failure reported by a dispatch sink.
pub type SinkError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Completion result of a forwarded sink operation.
pub type SinkResult = std::result::Result<(), SinkError>;

/// Errors raised at proxy call sites.
///
/// Every variant is a contract violation reported to the caller as it
/// happens. Nothing is retried and nothing is rolled back: a watched write
/// whose notification cannot be forwarded still leaves the value stored.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// Forwarding was required but no live sink is attached.
	#[error("no dispatch sink attached; `{member}` cannot be forwarded")]
	SinkUnavailable {
		/// Member whose call needed the sink.
		member: String,
	},
	/// A reserved `Dispatch` member was called without a single name/value map.
	#[error("invalid argument to `{member}`: {reason}")]
	InvalidDispatchArgument {
		/// The reserved member that was called.
		member: String,
		/// What was wrong with the arguments.
		reason: &'static str,
	},
	/// The sink reported a failure for a forwarded operation.
	#[error("dispatch sink failed: {0}")]
	Sink(#[source] SinkError),
	/// The member is neither a property accessor nor a declared method.
	#[error("contract `{contract}` has no member `{member}`")]
	UnknownMember {
		/// Contract name.
		contract: String,
		/// Requested member name.
		member: String,
	},
	/// No contract is registered under the requested name.
	#[error("no contract registered as `{0}`")]
	UnknownContract(String),
	/// A contract with this name is already registered.
	#[error("contract `{0}` is already registered")]
	DuplicateContract(String),
	/// A run-time contract declaration was rejected.
	#[error(transparent)]
	Introspect(#[from] IntrospectError),
}

/// Result alias for proxy operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
