//! Contract declarations and their introspected form.
//!
//! A [`ContractDef`] is the static declaration emitted by `#[contract]`; a
//! [`ContractBuilder`] declares a contract at run time. Both are introspected
//! once into a [`Contract`], which carries the ordered property and method
//! descriptors plus the member index the router classifies calls with.

use rustc_hash::FxHashMap;

use crate::value::{Value, ValueType};

/// Reserved member forwarding a name/value map to the sink.
pub const DISPATCH: &str = "Dispatch";
/// Asynchronous spelling of [`DISPATCH`].
pub const DISPATCH_ASYNC: &str = "DispatchAsync";
/// Reserved member forwarding disposal to the sink.
pub const DISPOSE: &str = "Dispose";
/// Asynchronous spelling of [`DISPOSE`].
pub const DISPOSE_ASYNC: &str = "DisposeAsync";

/// Prefix of generated property read entry points.
pub const GETTER_PREFIX: &str = "get_";
/// Prefix of generated property write entry points.
pub const SETTER_PREFIX: &str = "set_";

/// Static contract declaration.
#[derive(Debug)]
pub struct ContractDef {
	/// Contract identity.
	pub name: &'static str,
	/// Declared properties, in declaration order.
	pub properties: &'static [PropertyDef],
	/// Declared methods, in declaration order.
	pub methods: &'static [MethodDef],
}

/// Static property declaration.
#[derive(Debug)]
pub struct PropertyDef {
	/// Property name.
	pub name: &'static str,
	/// Declared type factory.
	pub value_type: fn() -> ValueType,
	/// Whether writes notify the sink.
	pub watched: bool,
}

/// Static method declaration.
#[derive(Debug)]
pub struct MethodDef {
	/// Member name (reserved names are matched case-sensitively).
	pub name: &'static str,
	/// Declared parameter count.
	pub arity: usize,
	/// Whether the call site receives the pending completion.
	pub is_async: bool,
}

/// Forwarding behavior of a declared method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodKind {
	/// Named command carrying at most one payload.
	Command,
	/// `Dispatch` / `DispatchAsync`: forwards a name/value map.
	Dispatch,
	/// `Dispose` / `DisposeAsync`: forwards disposal.
	Dispose,
}

impl MethodKind {
	/// Classifies a member name against the reserved names.
	pub fn classify(name: &str) -> Self {
		match name {
			DISPATCH | DISPATCH_ASYNC => MethodKind::Dispatch,
			DISPOSE | DISPOSE_ASYNC => MethodKind::Dispose,
			_ => MethodKind::Command,
		}
	}
}

/// Introspected property.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDescriptor {
	name: String,
	value_type: ValueType,
	watched: bool,
	default: Value,
	getter: String,
	setter: String,
}

impl PropertyDescriptor {
	fn new(name: String, value_type: ValueType, watched: bool) -> Self {
		Self {
			default: value_type.default_value(),
			getter: format!("{GETTER_PREFIX}{name}"),
			setter: format!("{SETTER_PREFIX}{name}"),
			name,
			value_type,
			watched,
		}
	}

	/// Property name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Declared type.
	pub fn value_type(&self) -> &ValueType {
		&self.value_type
	}

	/// Whether writes notify the sink.
	pub fn is_watched(&self) -> bool {
		self.watched
	}

	/// Value read before the first write.
	pub fn default_value(&self) -> &Value {
		&self.default
	}

	/// Read entry point (`get_<name>`).
	pub fn getter(&self) -> &str {
		&self.getter
	}

	/// Write entry point (`set_<name>`).
	pub fn setter(&self) -> &str {
		&self.setter
	}
}

/// Introspected method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
	name: String,
	arity: usize,
	is_async: bool,
	kind: MethodKind,
}

impl MethodDescriptor {
	/// Member name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Declared parameter count.
	pub fn arity(&self) -> usize {
		self.arity
	}

	/// Whether the call site receives the pending completion.
	pub fn is_async(&self) -> bool {
		self.is_async
	}

	/// Reserved-name classification.
	pub fn kind(&self) -> MethodKind {
		self.kind
	}
}

/// Classification of a member entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Member {
	/// Read of the property at this index.
	Get(usize),
	/// Write of the property at this index.
	Set(usize),
	/// Invocation of the method at this index.
	Method(usize),
}

/// Contract declaration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntrospectError {
	/// Two members resolve to the same entry point.
	#[error("contract `{contract}` declares member `{member}` more than once")]
	DuplicateMember {
		/// Contract name.
		contract: String,
		/// Conflicting entry point.
		member: String,
	},
	/// The contract has no name.
	#[error("contract name must not be empty")]
	EmptyName,
}

/// Introspected contract, shared by every proxy of that contract.
#[derive(Debug)]
pub struct Contract {
	name: String,
	properties: Vec<PropertyDescriptor>,
	methods: Vec<MethodDescriptor>,
	members: FxHashMap<String, Member>,
	by_property: FxHashMap<String, usize>,
}

impl Contract {
	/// Starts a run-time contract declaration.
	pub fn builder(name: impl Into<String>) -> ContractBuilder {
		ContractBuilder {
			name: name.into(),
			properties: Vec::new(),
			methods: Vec::new(),
		}
	}

	/// Introspects a static declaration.
	///
	/// `#[contract]` rejects colliding members at compile time. A hand-written
	/// declaration that still collides keeps the first entry point and logs the
	/// rest.
	pub fn from_def(def: &ContractDef) -> Self {
		let properties = def
			.properties
			.iter()
			.map(|p| PropertyDescriptor::new(p.name.to_owned(), (p.value_type)(), p.watched))
			.collect();
		let methods = def
			.methods
			.iter()
			.map(|m| (m.name.to_owned(), m.arity, m.is_async))
			.collect();
		match Self::assemble(def.name.to_owned(), properties, methods, false) {
			Ok(contract) => contract,
			Err(err) => unreachable!("lenient introspection cannot fail: {err}"),
		}
	}

	fn assemble(
		name: String,
		properties: Vec<PropertyDescriptor>,
		methods: Vec<(String, usize, bool)>,
		strict: bool,
	) -> Result<Self, IntrospectError> {
		if strict && name.is_empty() {
			return Err(IntrospectError::EmptyName);
		}

		let mut members = FxHashMap::default();
		let mut by_property = FxHashMap::default();
		let insert = |members: &mut FxHashMap<String, Member>, key: &str, member: Member| {
			if members.contains_key(key) {
				if strict {
					return Err(IntrospectError::DuplicateMember {
						contract: name.clone(),
						member: key.to_owned(),
					});
				}
				tracing::warn!(contract = %name, member = key, "contract.duplicate_member");
				return Ok(());
			}
			members.insert(key.to_owned(), member);
			Ok(())
		};

		for (index, prop) in properties.iter().enumerate() {
			insert(&mut members, prop.getter(), Member::Get(index))?;
			insert(&mut members, prop.setter(), Member::Set(index))?;
			by_property.entry(prop.name.clone()).or_insert(index);
		}

		let methods: Vec<_> = methods
			.into_iter()
			.map(|(name, arity, is_async)| MethodDescriptor {
				kind: MethodKind::classify(&name),
				name,
				arity,
				is_async,
			})
			.collect();
		for (index, method) in methods.iter().enumerate() {
			insert(&mut members, method.name(), Member::Method(index))?;
		}

		tracing::debug!(
			contract = %name,
			properties = properties.len(),
			methods = methods.len(),
			"contract.introspect"
		);

		Ok(Self {
			name,
			properties,
			methods,
			members,
			by_property,
		})
	}

	/// Contract identity.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Properties in declaration order.
	pub fn properties(&self) -> &[PropertyDescriptor] {
		&self.properties
	}

	/// Methods in declaration order.
	pub fn methods(&self) -> &[MethodDescriptor] {
		&self.methods
	}

	/// Finds a property by name.
	pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
		self.property_index(name).map(|index| &self.properties[index])
	}

	/// Finds a property's declaration index by name.
	pub fn property_index(&self, name: &str) -> Option<usize> {
		self.by_property.get(name).copied()
	}

	/// Finds a method by member name.
	pub fn method(&self, name: &str) -> Option<&MethodDescriptor> {
		match self.classify(name)? {
			Member::Method(index) => Some(&self.methods[index]),
			Member::Get(_) | Member::Set(_) => None,
		}
	}

	/// Classifies a member entry point.
	///
	/// Accessor entry points are property accesses; declared method names are
	/// method invocations; anything else is not part of the contract.
	pub fn classify(&self, member: &str) -> Option<Member> {
		self.members.get(member).copied()
	}

	pub(crate) fn property_at(&self, index: usize) -> &PropertyDescriptor {
		&self.properties[index]
	}

	pub(crate) fn method_at(&self, index: usize) -> &MethodDescriptor {
		&self.methods[index]
	}
}

/// Run-time contract declaration.
#[derive(Debug, Clone)]
#[must_use]
pub struct ContractBuilder {
	name: String,
	properties: Vec<PropertyDescriptor>,
	methods: Vec<(String, usize, bool)>,
}

impl ContractBuilder {
	/// Declares a plain property.
	pub fn property(mut self, name: impl Into<String>, value_type: ValueType) -> Self {
		self.properties.push(PropertyDescriptor::new(name.into(), value_type, false));
		self
	}

	/// Declares a watched property.
	pub fn watched(mut self, name: impl Into<String>, value_type: ValueType) -> Self {
		self.properties.push(PropertyDescriptor::new(name.into(), value_type, true));
		self
	}

	/// Declares a synchronous method.
	pub fn method(mut self, name: impl Into<String>, arity: usize) -> Self {
		self.methods.push((name.into(), arity, false));
		self
	}

	/// Declares an asynchronous method.
	pub fn async_method(mut self, name: impl Into<String>, arity: usize) -> Self {
		self.methods.push((name.into(), arity, true));
		self
	}

	/// Introspects the declaration, rejecting colliding members.
	pub fn build(self) -> Result<Contract, IntrospectError> {
		Contract::assemble(self.name, self.properties, self.methods, true)
	}
}

#[cfg(test)]
mod tests;
