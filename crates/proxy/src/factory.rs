//! Proxy creation for contracts known by name at run time.

use std::sync::Arc;

use crate::adapter::ContractType;
use crate::contract::Contract;
use crate::error::Result;
use crate::proxy::Proxy;
use crate::registry::ContractRegistry;

/// Creates proxies wired to a fresh value store and an empty sink slot.
#[derive(Clone)]
pub struct ProxyFactory {
	registry: Arc<ContractRegistry>,
}

impl ProxyFactory {
	/// Creates a factory resolving contracts through `registry`.
	pub fn new(registry: Arc<ContractRegistry>) -> Self {
		Self { registry }
	}

	/// Factory over the process-wide registry.
	pub fn global() -> Self {
		Self::new(ContractRegistry::global())
	}

	/// The registry contracts are resolved through.
	pub fn registry(&self) -> &Arc<ContractRegistry> {
		&self.registry
	}

	/// Creates an instance of the contract registered as `contract`.
	pub fn create(&self, contract: &str) -> Result<Proxy> {
		self.registry.resolve(contract).map(Proxy::new)
	}

	/// Creates an instance of an already resolved contract.
	pub fn create_for(&self, contract: Arc<Contract>) -> Proxy {
		Proxy::new(contract)
	}

	/// Creates a typed adapter, declaring its contract if needed.
	pub fn create_typed<C: ContractType>(&self) -> C {
		C::from_proxy(Proxy::new(self.registry.resolve_def(C::definition())))
	}
}

impl Default for ProxyFactory {
	fn default() -> Self {
		Self::global()
	}
}

impl std::fmt::Debug for ProxyFactory {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ProxyFactory").field("contracts", &self.registry.names()).finish()
	}
}
