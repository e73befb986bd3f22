//! Process-wide contract registry.
//!
//! `#[contract]` submits each declaration through `inventory`; the global
//! registry collects them on first use and introspects each contract lazily
//! the first time it is resolved. Entries are never removed, so a resolved
//! [`Contract`] can be shared for the life of the process.

use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::contract::{Contract, ContractDef};
use crate::error::{Error, Result};

/// Registry wrapper for `#[contract]` declarations.
pub struct ContractReg(pub &'static ContractDef);
inventory::collect!(ContractReg);

enum Entry {
	Declared(&'static ContractDef),
	Resolved(Arc<Contract>),
}

static GLOBAL: LazyLock<Arc<ContractRegistry>> = LazyLock::new(|| {
	let registry = ContractRegistry::new();
	for reg in inventory::iter::<ContractReg> {
		if let Err(err) = registry.declare(reg.0) {
			tracing::warn!(%err, "registry.declare");
		}
	}
	Arc::new(registry)
});

/// Append-only map from contract name to its (lazily) introspected form.
#[derive(Default)]
pub struct ContractRegistry {
	entries: RwLock<FxHashMap<String, Entry>>,
}

impl ContractRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// The process-wide registry, seeded with every `#[contract]` declaration.
	pub fn global() -> Arc<Self> {
		Arc::clone(&GLOBAL)
	}

	/// Adds a static declaration, introspected on first resolve.
	pub fn declare(&self, def: &'static ContractDef) -> Result<()> {
		let mut entries = self.entries.write();
		if entries.contains_key(def.name) {
			return Err(Error::DuplicateContract(def.name.to_owned()));
		}
		tracing::debug!(contract = def.name, "registry.declare");
		entries.insert(def.name.to_owned(), Entry::Declared(def));
		Ok(())
	}

	/// Adds an already introspected contract.
	pub fn register(&self, contract: Contract) -> Result<Arc<Contract>> {
		let mut entries = self.entries.write();
		if entries.contains_key(contract.name()) {
			return Err(Error::DuplicateContract(contract.name().to_owned()));
		}
		tracing::debug!(contract = contract.name(), "registry.register");
		let contract = Arc::new(contract);
		entries.insert(contract.name().to_owned(), Entry::Resolved(Arc::clone(&contract)));
		Ok(contract)
	}

	/// Resolves a contract by name, introspecting it on first use.
	pub fn resolve(&self, name: &str) -> Result<Arc<Contract>> {
		let def = match self.entries.read().get(name) {
			Some(Entry::Resolved(contract)) => return Ok(Arc::clone(contract)),
			Some(Entry::Declared(def)) => *def,
			None => return Err(Error::UnknownContract(name.to_owned())),
		};
		Ok(self.introspect(def))
	}

	/// Resolves `def` by name, declaring it first when absent.
	pub fn resolve_def(&self, def: &'static ContractDef) -> Arc<Contract> {
		if let Ok(contract) = self.resolve(def.name) {
			return contract;
		}
		// Losing a declaration race keeps the first entry.
		let _ = self.declare(def);
		self.resolve(def.name).unwrap_or_else(|_| self.introspect(def))
	}

	/// Returns true when `name` is declared or registered.
	pub fn contains(&self, name: &str) -> bool {
		self.entries.read().contains_key(name)
	}

	/// Registered contract names, sorted.
	pub fn names(&self) -> Vec<String> {
		let mut names: Vec<_> = self.entries.read().keys().cloned().collect();
		names.sort();
		names
	}

	fn introspect(&self, def: &'static ContractDef) -> Arc<Contract> {
		let contract = Arc::new(Contract::from_def(def));
		let mut entries = self.entries.write();
		match entries.get(def.name) {
			Some(Entry::Resolved(existing)) => Arc::clone(existing),
			Some(Entry::Declared(_)) | None => {
				entries.insert(def.name.to_owned(), Entry::Resolved(Arc::clone(&contract)));
				contract
			}
		}
	}
}
