//! Runtime stand-ins for declarative property/command contracts.
//!
//! A contract is a named set of typed properties and commands with no
//! implementation. This crate synthesizes instances of such contracts whose
//! every member call is turned into a local value lookup or a forwarded
//! operation on an external [`DispatchSink`]:
//! * [`Proxy`]: the dynamic instance, one value store and one sink slot each
//! * [`router`]: classifies intercepted calls and applies the dispatch protocol
//! * [`ProxyFactory`]: creates proxies for contracts known by name at run time
//! * [`Bridge`]: serde integration that materializes proxies while decoding
//! * [`contract`](macro@contract): generates a typed adapter per contract trait
//!
//! ```ignore
//! #[standin::contract]
//! pub trait Counter {
//!     #[watch]
//!     fn label(&self) -> Option<String>;
//!     #[property]
//!     fn count(&self) -> i64;
//!     fn increment(&self, amount: i64) -> standin::Result<()>;
//!     fn dispose_async(&self) -> standin::Result<standin::Pending>;
//! }
//!
//! let counter = CounterProxy::new();
//! counter.attach_sink(&sink);
//! counter.set_label(Some("clicks".into()))?; // notifies the sink
//! counter.increment(2)?;                     // dispatch("Increment", Some(2))
//! counter.dispose_async()?.await?;           // dispose(), awaited
//! ```

pub mod adapter;
pub mod bridge;
pub mod config;
pub mod contract;
pub mod error;
pub mod factory;
pub mod proxy;
pub mod registry;
pub mod router;
pub mod sink;
mod spawn;
pub mod store;
pub mod testing;
pub mod value;

pub use adapter::ContractType;
pub use bridge::{Bridge, ContractSeed};
pub use config::{BridgeConfig, ConfigError, UnknownFields};
pub use contract::{
	Contract, ContractBuilder, ContractDef, IntrospectError, Member, MethodDef, MethodDescriptor,
	MethodKind, PropertyDef, PropertyDescriptor,
};
pub use error::{Error, Result, SinkError, SinkResult};
pub use factory::ProxyFactory;
pub use proxy::Proxy;
pub use registry::{ContractReg, ContractRegistry};
pub use router::Reply;
pub use sink::{BoxFutureStatic, DispatchSink, Pending};
pub use standin_macros::contract;
pub use store::ValueStore;
pub use value::{PropertyType, Value, ValueMap, ValueType};

// Installed by the integration tests only.
#[cfg(test)]
use tracing_subscriber as _;

#[doc(hidden)]
pub mod __private {
	pub use {inventory, serde};
}
