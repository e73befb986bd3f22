use proptest::prelude::*;

use super::{PropertyType, Value, ValueMap, ValueType};

#[test]
fn test_default_values() {
	assert_eq!(ValueType::Bool.default_value(), Value::Bool(false));
	assert_eq!(ValueType::Int.default_value(), Value::Int(0));
	assert_eq!(ValueType::Float.default_value(), Value::Float(0.0));
	assert_eq!(ValueType::Text.default_value(), Value::Null);
	assert_eq!(ValueType::list_of(ValueType::Int).default_value(), Value::Null);
	assert_eq!(ValueType::Map.default_value(), Value::Null);
	assert_eq!(ValueType::contract("Counter").default_value(), Value::Null);
	assert_eq!(ValueType::Any.default_value(), Value::Null);
}

#[test]
fn test_element_type() {
	assert_eq!(ValueType::list_of(ValueType::Text).element(), &ValueType::Text);
	assert_eq!(ValueType::Int.element(), &ValueType::Any);
}

#[test]
fn test_declared_types() {
	assert_eq!(<i32 as PropertyType>::value_type(), ValueType::Int);
	assert_eq!(<u8 as PropertyType>::value_type(), ValueType::Int);
	assert_eq!(<f32 as PropertyType>::value_type(), ValueType::Float);
	assert_eq!(<Option<String> as PropertyType>::value_type(), ValueType::Text);
	assert_eq!(
		<Vec<Vec<bool>> as PropertyType>::value_type(),
		ValueType::list_of(ValueType::list_of(ValueType::Bool))
	);
	assert_eq!(<ValueMap as PropertyType>::value_type(), ValueType::Map);
	assert_eq!(<Value as PropertyType>::value_type(), ValueType::Any);
}

#[test]
fn test_null_reads_as_type_default() {
	assert_eq!(i64::from_value(Value::Null), 0);
	assert!(!bool::from_value(Value::Null));
	assert_eq!(f64::from_value(Value::Null), 0.0);
	assert_eq!(String::from_value(Value::Null), "");
	assert_eq!(Option::<i64>::from_value(Value::Null), None);
	assert!(Vec::<String>::from_value(Value::Null).is_empty());
}

#[test]
fn test_mismatch_reads_as_type_default() {
	assert_eq!(i64::from_value(Value::from("seven")), 0);
	assert!(!bool::from_value(Value::Int(1)));
	assert_eq!(String::from_value(Value::Bool(true)), "");
	assert_eq!(u8::from_value(Value::Int(300)), 0);
	assert_eq!(Option::<bool>::from_value(Value::Int(3)), Some(false));
}

#[test]
fn test_float_accepts_integers() {
	assert_eq!(f64::from_value(Value::Int(3)), 3.0);
	assert_eq!(Value::Int(2).as_float(), Some(2.0));
	assert_eq!(Value::Float(2.0).as_int(), None);
}

#[test]
fn test_unsigned_values_are_lossless() {
	assert_eq!(u64::MAX.into_value(), Value::UInt(u64::MAX));
	assert_eq!(u64::from_value(Value::UInt(u64::MAX)), u64::MAX);
	assert_eq!(usize::from_value(usize::MAX.into_value()), usize::MAX);
	assert_eq!(Value::UInt(u64::MAX).as_uint(), Some(u64::MAX));
	assert_eq!(Value::UInt(u64::MAX).as_float(), Some(u64::MAX as f64));
	assert_eq!(Value::UInt(u64::MAX).kind(), "uint");
}

#[test]
fn test_small_unsigned_values_are_int() {
	assert_eq!(7_u64.into_value(), Value::Int(7));
	assert_eq!(Value::from(i64::MAX as u64), Value::Int(i64::MAX));
	assert_eq!(Value::from(i64::MAX as u64 + 1), Value::UInt(i64::MAX as u64 + 1));
	assert_eq!(u32::from_value(Value::Int(7)), 7);
	assert_eq!(Value::Int(-1).as_uint(), None);
}

#[test]
fn test_unsigned_out_of_range_reads_default() {
	assert_eq!(i64::from_value(Value::UInt(u64::MAX)), 0);
	assert_eq!(u64::from_value(Value::Int(-1)), 0);
}

#[test]
fn test_option_conversions() {
	assert_eq!(Some(5_i64).into_value(), Value::Int(5));
	assert_eq!(None::<i64>.into_value(), Value::Null);
	assert_eq!(Value::from(None::<&str>), Value::Null);
	assert_eq!(Value::from(Some("x")), Value::Text("x".into()));
}

#[test]
fn test_nested_lists() {
	let value = vec![vec![1_i64, 2], vec![3]].into_value();
	assert_eq!(
		value,
		Value::List(vec![
			Value::List(vec![Value::Int(1), Value::Int(2)]),
			Value::List(vec![Value::Int(3)]),
		])
	);
	assert_eq!(Vec::<Vec<i64>>::from_value(value), vec![vec![1, 2], vec![3]]);
}

#[test]
fn test_accessors() {
	let mut map = ValueMap::new();
	map.insert("a".into(), Value::Int(1));
	let value = Value::from(map.clone());

	assert_eq!(value.as_map(), Some(&map));
	assert_eq!(value.kind(), "map");
	assert!(value.as_list().is_none());
	assert!(Value::default().is_null());
	assert_eq!(Value::from("hi").as_str(), Some("hi"));
	assert_eq!(Value::from(true).as_bool(), Some(true));
	assert_eq!(Value::from(vec![Value::Null]).as_list(), Some(&[Value::Null][..]));
}

#[test]
fn test_equality_is_variant_strict() {
	assert_ne!(Value::Int(1), Value::Float(1.0));
	assert_ne!(Value::Null, Value::Bool(false));
	assert_eq!(Value::Float(1.5), Value::Float(1.5));
}

proptest! {
	#[test]
	fn prop_int_round_trip(n in any::<i32>()) {
		prop_assert_eq!(i32::from_value(n.into_value()), n);
	}

	#[test]
	fn prop_i64_round_trip(n in any::<i64>()) {
		prop_assert_eq!(i64::from_value(n.into_value()), n);
	}

	#[test]
	fn prop_u64_round_trip(n in any::<u64>()) {
		prop_assert_eq!(u64::from_value(n.into_value()), n);
	}

	#[test]
	fn prop_usize_round_trip(n in any::<usize>()) {
		prop_assert_eq!(usize::from_value(n.into_value()), n);
	}

	#[test]
	fn prop_text_round_trip(s in ".*") {
		prop_assert_eq!(String::from_value(s.clone().into_value()), s);
	}

	#[test]
	fn prop_list_round_trip(items in prop::collection::vec(any::<i64>(), 0..16)) {
		prop_assert_eq!(Vec::<i64>::from_value(items.clone().into_value()), items);
	}
}
