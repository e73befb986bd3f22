//! Dynamic property values and declared value types.

use indexmap::IndexMap;

use crate::proxy::Proxy;

/// Insertion-ordered name to value mapping.
pub type ValueMap = IndexMap<String, Value>;

/// A property value or command payload.
#[derive(Debug, Clone, Default)]
pub enum Value {
	/// Absent value.
	#[default]
	Null,
	/// Boolean value.
	Bool(bool),
	/// Integer value.
	Int(i64),
	/// Unsigned integer above `i64::MAX`; smaller values are always `Int`.
	UInt(u64),
	/// Floating-point value.
	Float(f64),
	/// Text value.
	Text(String),
	/// Sequence of values.
	List(Vec<Value>),
	/// Name to value mapping.
	Map(ValueMap),
	/// Nested contract instance (shared handle).
	Contract(Proxy),
}

impl Value {
	/// Returns true for [`Value::Null`].
	pub fn is_null(&self) -> bool {
		matches!(self, Value::Null)
	}

	/// Returns the boolean value if this is a `Bool` variant.
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Value::Bool(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns the integer value if this is an `Int` variant.
	pub fn as_int(&self) -> Option<i64> {
		match self {
			Value::Int(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns the unsigned value of a non-negative integer.
	pub fn as_uint(&self) -> Option<u64> {
		match self {
			Value::Int(v) => u64::try_from(*v).ok(),
			Value::UInt(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns the float value, widening integers.
	pub fn as_float(&self) -> Option<f64> {
		match self {
			Value::Float(v) => Some(*v),
			Value::Int(v) => Some(*v as f64),
			Value::UInt(v) => Some(*v as f64),
			_ => None,
		}
	}

	/// Returns the text if this is a `Text` variant.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::Text(v) => Some(v),
			_ => None,
		}
	}

	/// Returns the items if this is a `List` variant.
	pub fn as_list(&self) -> Option<&[Value]> {
		match self {
			Value::List(v) => Some(v),
			_ => None,
		}
	}

	/// Returns the mapping if this is a `Map` variant.
	pub fn as_map(&self) -> Option<&ValueMap> {
		match self {
			Value::Map(v) => Some(v),
			_ => None,
		}
	}

	/// Returns the nested proxy if this is a `Contract` variant.
	pub fn as_proxy(&self) -> Option<&Proxy> {
		match self {
			Value::Contract(v) => Some(v),
			_ => None,
		}
	}

	/// Short variant name for diagnostics.
	pub fn kind(&self) -> &'static str {
		match self {
			Value::Null => "null",
			Value::Bool(_) => "bool",
			Value::Int(_) => "int",
			Value::UInt(_) => "uint",
			Value::Float(_) => "float",
			Value::Text(_) => "text",
			Value::List(_) => "list",
			Value::Map(_) => "map",
			Value::Contract(_) => "contract",
		}
	}
}

impl PartialEq for Value {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Value::Null, Value::Null) => true,
			(Value::Bool(a), Value::Bool(b)) => a == b,
			(Value::Int(a), Value::Int(b)) => a == b,
			(Value::UInt(a), Value::UInt(b)) => a == b,
			(Value::Float(a), Value::Float(b)) => a == b,
			(Value::Text(a), Value::Text(b)) => a == b,
			(Value::List(a), Value::List(b)) => a == b,
			(Value::Map(a), Value::Map(b)) => a == b,
			(Value::Contract(a), Value::Contract(b)) => a == b,
			_ => false,
		}
	}
}

impl From<bool> for Value {
	fn from(v: bool) -> Self {
		Value::Bool(v)
	}
}

impl From<i64> for Value {
	fn from(v: i64) -> Self {
		Value::Int(v)
	}
}

impl From<i32> for Value {
	fn from(v: i32) -> Self {
		Value::Int(v.into())
	}
}

impl From<u64> for Value {
	fn from(v: u64) -> Self {
		i64::try_from(v).map_or(Value::UInt(v), Value::Int)
	}
}

impl From<f64> for Value {
	fn from(v: f64) -> Self {
		Value::Float(v)
	}
}

impl From<&str> for Value {
	fn from(v: &str) -> Self {
		Value::Text(v.to_owned())
	}
}

impl From<String> for Value {
	fn from(v: String) -> Self {
		Value::Text(v)
	}
}

impl From<Vec<Value>> for Value {
	fn from(v: Vec<Value>) -> Self {
		Value::List(v)
	}
}

impl From<ValueMap> for Value {
	fn from(v: ValueMap) -> Self {
		Value::Map(v)
	}
}

impl From<Proxy> for Value {
	fn from(v: Proxy) -> Self {
		Value::Contract(v)
	}
}

impl<T: Into<Value>> From<Option<T>> for Value {
	fn from(v: Option<T>) -> Self {
		v.map_or(Value::Null, Into::into)
	}
}

/// Declared type of a contract property.
///
/// Drives default resolution for unwritten properties and guides decoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueType {
	/// Any value; decoded structurally.
	Any,
	/// Boolean.
	Bool,
	/// Integer of any width.
	Int,
	/// Floating point.
	Float,
	/// Text.
	Text,
	/// Sequence with the given element type.
	List(Box<ValueType>),
	/// Name to value mapping.
	Map,
	/// Nested contract, by contract name.
	Contract(String),
}

impl ValueType {
	/// Sequence type with the given element type.
	pub fn list_of(element: ValueType) -> Self {
		ValueType::List(Box::new(element))
	}

	/// Nested contract type.
	pub fn contract(name: impl Into<String>) -> Self {
		ValueType::Contract(name.into())
	}

	/// Canonical value of a property of this type that was never written.
	///
	/// Numerics and booleans have a zero value; every reference-like type is
	/// absent.
	pub fn default_value(&self) -> Value {
		match self {
			ValueType::Bool => Value::Bool(false),
			ValueType::Int => Value::Int(0),
			ValueType::Float => Value::Float(0.0),
			ValueType::Any | ValueType::Text | ValueType::List(_) | ValueType::Map | ValueType::Contract(_) => {
				Value::Null
			}
		}
	}

	/// Element type of a sequence; `Any` for everything else.
	pub fn element(&self) -> &ValueType {
		match self {
			ValueType::List(element) => element,
			_ => &ValueType::Any,
		}
	}
}

/// Rust types usable as contract property and argument types.
///
/// Conversions out of [`Value`] are total: a mismatched value is logged and
/// read as the type's default.
pub trait PropertyType: Sized {
	/// Declared value type.
	fn value_type() -> ValueType;

	/// Converts into a dynamic value.
	fn into_value(self) -> Value;

	/// Converts from a dynamic value.
	fn from_value(value: Value) -> Self;
}

fn mismatch(expected: &'static str, value: &Value) {
	if !value.is_null() {
		tracing::warn!(expected, found = value.kind(), "proxy.value.mismatch");
	}
}

macro_rules! int_property {
	($wide:ty => $($ty:ty),* $(,)?) => {$(
		impl PropertyType for $ty {
			fn value_type() -> ValueType {
				ValueType::Int
			}

			fn into_value(self) -> Value {
				Value::from(self as $wide)
			}

			fn from_value(value: Value) -> Self {
				let converted = match &value {
					Value::Int(n) => <$ty>::try_from(*n).ok(),
					Value::UInt(n) => <$ty>::try_from(*n).ok(),
					_ => None,
				};
				converted.unwrap_or_else(|| {
					mismatch(stringify!($ty), &value);
					0
				})
			}
		}
	)*};
}

int_property!(i64 => i8, i16, i32, i64, isize);
int_property!(u64 => u8, u16, u32, u64, usize);

impl PropertyType for f64 {
	fn value_type() -> ValueType {
		ValueType::Float
	}

	fn into_value(self) -> Value {
		Value::Float(self)
	}

	fn from_value(value: Value) -> Self {
		value.as_float().unwrap_or_else(|| {
			mismatch("f64", &value);
			0.0
		})
	}
}

impl PropertyType for f32 {
	fn value_type() -> ValueType {
		ValueType::Float
	}

	fn into_value(self) -> Value {
		Value::Float(self.into())
	}

	fn from_value(value: Value) -> Self {
		f64::from_value(value) as f32
	}
}

impl PropertyType for bool {
	fn value_type() -> ValueType {
		ValueType::Bool
	}

	fn into_value(self) -> Value {
		Value::Bool(self)
	}

	fn from_value(value: Value) -> Self {
		value.as_bool().unwrap_or_else(|| {
			mismatch("bool", &value);
			false
		})
	}
}

impl PropertyType for String {
	fn value_type() -> ValueType {
		ValueType::Text
	}

	fn into_value(self) -> Value {
		Value::Text(self)
	}

	fn from_value(value: Value) -> Self {
		match value {
			Value::Text(text) => text,
			other => {
				mismatch("String", &other);
				String::new()
			}
		}
	}
}

impl<T: PropertyType> PropertyType for Option<T> {
	fn value_type() -> ValueType {
		T::value_type()
	}

	fn into_value(self) -> Value {
		self.map_or(Value::Null, T::into_value)
	}

	fn from_value(value: Value) -> Self {
		match value {
			Value::Null => None,
			value => Some(T::from_value(value)),
		}
	}
}

impl<T: PropertyType> PropertyType for Vec<T> {
	fn value_type() -> ValueType {
		ValueType::list_of(T::value_type())
	}

	fn into_value(self) -> Value {
		Value::List(self.into_iter().map(T::into_value).collect())
	}

	fn from_value(value: Value) -> Self {
		match value {
			Value::List(items) => items.into_iter().map(T::from_value).collect(),
			other => {
				mismatch("Vec", &other);
				Vec::new()
			}
		}
	}
}

impl PropertyType for ValueMap {
	fn value_type() -> ValueType {
		ValueType::Map
	}

	fn into_value(self) -> Value {
		Value::Map(self)
	}

	fn from_value(value: Value) -> Self {
		match value {
			Value::Map(map) => map,
			other => {
				mismatch("ValueMap", &other);
				ValueMap::new()
			}
		}
	}
}

impl PropertyType for Value {
	fn value_type() -> ValueType {
		ValueType::Any
	}

	fn into_value(self) -> Value {
		self
	}

	fn from_value(value: Value) -> Self {
		value
	}
}

#[cfg(test)]
mod tests;
