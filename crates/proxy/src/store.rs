//! Per-instance property values.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::contract::Contract;
use crate::value::{Value, ValueMap};

/// Last-assigned value of each property of one proxy.
///
/// Unwritten properties read as the default of their declared type. Writes
/// always overwrite; there is no removal.
#[derive(Debug)]
pub struct ValueStore {
	contract: Arc<Contract>,
	values: FxHashMap<String, Value>,
}

impl ValueStore {
	/// Creates an empty store for `contract`.
	pub fn new(contract: Arc<Contract>) -> Self {
		Self {
			contract,
			values: FxHashMap::default(),
		}
	}

	/// Returns the stored value, or the declared default when unwritten.
	///
	/// Names the contract does not declare read as [`Value::Null`].
	pub fn get(&self, name: &str) -> Value {
		if let Some(value) = self.values.get(name) {
			return value.clone();
		}
		self.contract
			.property(name)
			.map(|prop| prop.default_value().clone())
			.unwrap_or_default()
	}

	/// Stores `value`, replacing any previous value.
	pub fn set(&mut self, name: &str, value: Value) {
		self.values.insert(name.to_owned(), value);
	}

	/// Returns true once `name` has been written.
	pub fn is_written(&self, name: &str) -> bool {
		self.values.contains_key(name)
	}

	/// Number of written properties.
	pub fn len(&self) -> usize {
		self.values.len()
	}

	/// Returns true when nothing has been written.
	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	/// Every declared property with its current value, in declaration order.
	pub fn snapshot(&self) -> ValueMap {
		self.contract
			.properties()
			.iter()
			.map(|prop| (prop.name().to_owned(), self.get(prop.name())))
			.collect()
	}
}
