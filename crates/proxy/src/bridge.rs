//! serde integration for proxies.
//!
//! Encoding reads every declared property through its getter; the sink is
//! runtime wiring and is never written. Decoding has no constructor to call
//! for a contract, so whenever a contract-typed position is decoded the
//! [`Bridge`] asks its [`ProxyFactory`] for an empty instance and populates it
//! through the ordinary setters. Watched properties therefore notify the
//! bridge's sink while decoding.

use std::cell::RefCell;
use std::fmt;
use std::sync::{Arc, LazyLock};

use serde::de::{self, DeserializeSeed, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::ser::{self, SerializeMap, SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};

use crate::adapter::ContractType;
use crate::config::{BridgeConfig, UnknownFields};
use crate::error::Result;
use crate::factory::ProxyFactory;
use crate::proxy::Proxy;
use crate::sink::DispatchSink;
use crate::value::{Value, ValueType};

static GLOBAL: LazyLock<Bridge> = LazyLock::new(Bridge::default);

/// Creation hook and encoder for contract-typed data.
#[derive(Clone, Default)]
pub struct Bridge {
	factory: ProxyFactory,
	sink: Option<Arc<dyn DispatchSink>>,
	config: BridgeConfig,
}

impl Bridge {
	/// Creates a bridge materializing instances through `factory`.
	pub fn new(factory: ProxyFactory) -> Self {
		Self {
			factory,
			sink: None,
			config: BridgeConfig::default(),
		}
	}

	/// Bridge over the global factory, without a sink and with default options.
	///
	/// Used by the `Deserialize` impls of generated adapters.
	pub fn global() -> &'static Bridge {
		&GLOBAL
	}

	/// Attaches `sink` to every decoded instance before it is populated.
	#[must_use]
	pub fn with_sink(mut self, sink: Arc<dyn DispatchSink>) -> Self {
		self.sink = Some(sink);
		self
	}

	/// Replaces the options.
	#[must_use]
	pub fn with_config(mut self, config: BridgeConfig) -> Self {
		self.config = config;
		self
	}

	/// Current options.
	pub fn config(&self) -> &BridgeConfig {
		&self.config
	}

	/// Seed decoding one instance of `contract`.
	pub fn seed<'b>(&'b self, contract: &'b str) -> ContractSeed<'b> {
		ContractSeed { bridge: self, contract }
	}

	/// Decodes one instance of `contract`.
	pub fn decode<'de, D: Deserializer<'de>>(&self, contract: &str, deserializer: D) -> Result<Proxy, D::Error> {
		self.seed(contract).deserialize(deserializer)
	}

	/// Decodes one instance wrapped in its typed adapter.
	pub fn decode_as<'de, C: ContractType, D: Deserializer<'de>>(&self, deserializer: D) -> Result<C, D::Error> {
		let contract = self.factory.registry().resolve_def(C::definition());
		self.decode(contract.name(), deserializer).map(C::from_proxy)
	}

	/// Encodes `proxy` honoring this bridge's options.
	///
	/// Fails when an instance contains itself, directly or through nested
	/// values.
	pub fn encode<S: Serializer>(&self, proxy: &Proxy, serializer: S) -> Result<S::Ok, S::Error> {
		Encode {
			proxy,
			config: &self.config,
			path: &RefCell::default(),
		}
		.serialize(serializer)
	}

	fn materialize(&self, contract: &str) -> Result<Proxy> {
		let proxy = self.factory.create(contract)?;
		if let Some(sink) = &self.sink {
			proxy.attach_dyn_sink(sink);
		}
		Ok(proxy)
	}

	fn populate<'de, A: MapAccess<'de>>(&self, contract: &str, mut map: A) -> Result<Proxy, A::Error> {
		let proxy = self.materialize(contract).map_err(de::Error::custom)?;
		let contract = Arc::clone(proxy.contract());
		while let Some(key) = map.next_key::<String>()? {
			let Some(prop) = contract.property(&key) else {
				match self.config.unknown_fields {
					UnknownFields::Ignore => {
						tracing::trace!(contract = contract.name(), key = %key, "bridge.unknown_field");
						map.next_value::<IgnoredAny>()?;
						continue;
					}
					UnknownFields::Reject => {
						return Err(de::Error::custom(format_args!(
							"unknown field `{key}` for contract `{}`",
							contract.name()
						)));
					}
				}
			};
			let value = map.next_value_seed(TypedSeed {
				bridge: self,
				ty: prop.value_type(),
			})?;
			proxy.set(&key, value).map_err(de::Error::custom)?;
		}
		tracing::debug!(contract = contract.name(), "bridge.decoded");
		Ok(proxy)
	}
}

impl fmt::Debug for Bridge {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Bridge")
			.field("factory", &self.factory)
			.field("sink", &self.sink.is_some())
			.field("config", &self.config)
			.finish()
	}
}

/// Decodes one instance of a contract through a [`Bridge`].
#[derive(Clone, Copy)]
pub struct ContractSeed<'b> {
	bridge: &'b Bridge,
	contract: &'b str,
}

impl<'de> DeserializeSeed<'de> for ContractSeed<'_> {
	type Value = Proxy;

	fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Proxy, D::Error> {
		deserializer.deserialize_map(ContractVisitor(self))
	}
}

struct ContractVisitor<'b>(ContractSeed<'b>);

impl<'de> Visitor<'de> for ContractVisitor<'_> {
	type Value = Proxy;

	fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "a map of `{}` properties", self.0.contract)
	}

	fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Proxy, A::Error> {
		self.0.bridge.populate(self.0.contract, map)
	}
}

/// Decodes a value guided by its declared type.
struct TypedSeed<'b> {
	bridge: &'b Bridge,
	ty: &'b ValueType,
}

impl<'de> DeserializeSeed<'de> for TypedSeed<'_> {
	type Value = Value;

	fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
		deserializer.deserialize_any(self)
	}
}

impl<'de> Visitor<'de> for TypedSeed<'_> {
	type Value = Value;

	fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self.ty {
			ValueType::Any => f.write_str("any value"),
			ValueType::Bool => f.write_str("a boolean"),
			ValueType::Int => f.write_str("an integer"),
			ValueType::Float => f.write_str("a number"),
			ValueType::Text => f.write_str("a string"),
			ValueType::List(_) => f.write_str("a sequence"),
			ValueType::Map => f.write_str("a map"),
			ValueType::Contract(name) => write!(f, "a map of `{name}` properties"),
		}
	}

	fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
		Ok(Value::Bool(v))
	}

	fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
		Ok(match self.ty {
			ValueType::Float => Value::Float(v as f64),
			_ => Value::Int(v),
		})
	}

	fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
		Ok(match self.ty {
			ValueType::Float => Value::Float(v as f64),
			_ => Value::from(v),
		})
	}

	fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
		Ok(Value::Float(v))
	}

	fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
		Ok(Value::Text(v.to_owned()))
	}

	fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
		Ok(Value::Text(v))
	}

	fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
		Ok(Value::Null)
	}

	fn visit_none<E: de::Error>(self) -> Result<Value, E> {
		Ok(Value::Null)
	}

	fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
		self.deserialize(deserializer)
	}

	fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
		let element = self.ty.element();
		let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
		while let Some(item) = seq.next_element_seed(TypedSeed {
			bridge: self.bridge,
			ty: element,
		})? {
			items.push(item);
		}
		Ok(Value::List(items))
	}

	fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Value, A::Error> {
		if let ValueType::Contract(name) = self.ty {
			return self.bridge.populate(name, map).map(Value::Contract);
		}
		let mut entries = crate::value::ValueMap::with_capacity(map.size_hint().unwrap_or(0));
		while let Some(key) = map.next_key::<String>()? {
			let value = map.next_value_seed(TypedSeed {
				bridge: self.bridge,
				ty: &ValueType::Any,
			})?;
			entries.insert(key, value);
		}
		Ok(Value::Map(entries))
	}
}

struct Encode<'a> {
	proxy: &'a Proxy,
	config: &'a BridgeConfig,
	/// Instances being encoded, outermost first.
	path: &'a RefCell<Vec<usize>>,
}

impl Serialize for Encode<'_> {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let addr = self.proxy.addr();
		if self.path.borrow().contains(&addr) {
			return Err(ser::Error::custom(format_args!(
				"cyclic contract value: `{}` contains itself",
				self.proxy.contract().name()
			)));
		}
		self.path.borrow_mut().push(addr);
		let result = self.serialize_entries(serializer);
		self.path.borrow_mut().pop();
		result
	}
}

impl Encode<'_> {
	fn serialize_entries<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let values = self.proxy.snapshot();
		let values: Vec<_> = values
			.iter()
			.filter(|(_, value)| !(self.config.skip_absent && value.is_null()))
			.collect();
		let mut map = serializer.serialize_map(Some(values.len()))?;
		for (name, value) in values {
			map.serialize_entry(
				name,
				&EncodeValue {
					value,
					config: self.config,
					path: self.path,
				},
			)?;
		}
		map.end()
	}
}

struct EncodeValue<'a> {
	value: &'a Value,
	config: &'a BridgeConfig,
	path: &'a RefCell<Vec<usize>>,
}

impl Serialize for EncodeValue<'_> {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let Self { config, path, .. } = *self;
		match self.value {
			Value::Null => serializer.serialize_none(),
			Value::Bool(v) => serializer.serialize_bool(*v),
			Value::Int(v) => serializer.serialize_i64(*v),
			Value::UInt(v) => serializer.serialize_u64(*v),
			Value::Float(v) => serializer.serialize_f64(*v),
			Value::Text(v) => serializer.serialize_str(v),
			Value::List(items) => {
				let mut seq = serializer.serialize_seq(Some(items.len()))?;
				for value in items {
					seq.serialize_element(&EncodeValue { value, config, path })?;
				}
				seq.end()
			}
			Value::Map(entries) => {
				let mut map = serializer.serialize_map(Some(entries.len()))?;
				for (key, value) in entries {
					map.serialize_entry(key, &EncodeValue { value, config, path })?;
				}
				map.end()
			}
			Value::Contract(proxy) => Encode { proxy, config, path }.serialize(serializer),
		}
	}
}

impl Serialize for Proxy {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		Bridge::global().encode(self, serializer)
	}
}

impl Serialize for Value {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		EncodeValue {
			value: self,
			config: Bridge::global().config(),
			path: &RefCell::default(),
		}
		.serialize(serializer)
	}
}

/// Structural decoding; maps decode as [`Value::Map`], never as contracts.
impl<'de> Deserialize<'de> for Value {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		TypedSeed {
			bridge: Bridge::global(),
			ty: &ValueType::Any,
		}
		.deserialize(deserializer)
	}
}
