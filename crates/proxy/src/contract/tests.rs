use super::*;

fn text() -> ValueType {
	ValueType::Text
}

fn int() -> ValueType {
	ValueType::Int
}

static SAMPLE_PROPERTIES: [PropertyDef; 2] = [
	PropertyDef {
		name: "label",
		value_type: text,
		watched: true,
	},
	PropertyDef {
		name: "count",
		value_type: int,
		watched: false,
	},
];

static SAMPLE_METHODS: [MethodDef; 3] = [
	MethodDef {
		name: "Increment",
		arity: 1,
		is_async: false,
	},
	MethodDef {
		name: "DisposeAsync",
		arity: 0,
		is_async: true,
	},
	MethodDef {
		name: "Dispatch",
		arity: 1,
		is_async: false,
	},
];

static SAMPLE: ContractDef = ContractDef {
	name: "Sample",
	properties: &SAMPLE_PROPERTIES,
	methods: &SAMPLE_METHODS,
};

static COLLIDING_METHODS: [MethodDef; 2] = [
	MethodDef {
		name: "get_label",
		arity: 0,
		is_async: false,
	},
	MethodDef {
		name: "Reset",
		arity: 0,
		is_async: false,
	},
];

static COLLIDING: ContractDef = ContractDef {
	name: "Colliding",
	properties: &SAMPLE_PROPERTIES,
	methods: &COLLIDING_METHODS,
};

#[test]
fn test_from_def_preserves_declaration_order() {
	let contract = Contract::from_def(&SAMPLE);
	assert_eq!(contract.name(), "Sample");

	let names: Vec<_> = contract.properties().iter().map(PropertyDescriptor::name).collect();
	assert_eq!(names, ["label", "count"]);
	let methods: Vec<_> = contract.methods().iter().map(MethodDescriptor::name).collect();
	assert_eq!(methods, ["Increment", "DisposeAsync", "Dispatch"]);
}

#[test]
fn test_descriptor_fields() {
	let contract = Contract::from_def(&SAMPLE);

	let label = contract.property("label").unwrap();
	assert!(label.is_watched());
	assert_eq!(label.value_type(), &ValueType::Text);
	assert_eq!(label.default_value(), &Value::Null);
	assert_eq!(label.getter(), "get_label");
	assert_eq!(label.setter(), "set_label");

	let count = contract.property("count").unwrap();
	assert!(!count.is_watched());
	assert_eq!(count.default_value(), &Value::Int(0));

	let dispose = contract.method("DisposeAsync").unwrap();
	assert!(dispose.is_async());
	assert_eq!(dispose.arity(), 0);
	assert_eq!(dispose.kind(), MethodKind::Dispose);
	assert_eq!(contract.method("Increment").unwrap().kind(), MethodKind::Command);
	assert_eq!(contract.method("Dispatch").unwrap().kind(), MethodKind::Dispatch);
}

#[test]
fn test_classify_members() {
	let contract = Contract::from_def(&SAMPLE);
	assert_eq!(contract.classify("get_label"), Some(Member::Get(0)));
	assert_eq!(contract.classify("set_count"), Some(Member::Set(1)));
	assert_eq!(contract.classify("Increment"), Some(Member::Method(0)));
	assert_eq!(contract.classify("label"), None);
	assert_eq!(contract.classify("get_missing"), None);
	assert_eq!(contract.classify("Dispose"), None);
	assert!(contract.method("get_label").is_none());
}

#[test]
fn test_reserved_names_are_case_sensitive() {
	assert_eq!(MethodKind::classify("Dispatch"), MethodKind::Dispatch);
	assert_eq!(MethodKind::classify("DispatchAsync"), MethodKind::Dispatch);
	assert_eq!(MethodKind::classify("Dispose"), MethodKind::Dispose);
	assert_eq!(MethodKind::classify("DisposeAsync"), MethodKind::Dispose);
	assert_eq!(MethodKind::classify("dispose"), MethodKind::Command);
	assert_eq!(MethodKind::classify("DispatchLater"), MethodKind::Command);
}

#[test]
fn test_from_def_keeps_first_colliding_member() {
	let contract = Contract::from_def(&COLLIDING);
	assert_eq!(contract.classify("get_label"), Some(Member::Get(0)));
	assert_eq!(contract.classify("Reset"), Some(Member::Method(1)));
	assert_eq!(contract.methods().len(), 2);
}

#[test]
fn test_builder() {
	let contract = Contract::builder("Built")
		.watched("title", ValueType::Text)
		.property("flag", ValueType::Bool)
		.method("Refresh", 0)
		.async_method("DispatchAsync", 1)
		.build()
		.unwrap();

	assert_eq!(contract.properties().len(), 2);
	assert!(contract.property("title").unwrap().is_watched());
	assert_eq!(contract.property("flag").unwrap().default_value(), &Value::Bool(false));
	assert_eq!(contract.property_index("flag"), Some(1));
	assert!(!contract.method("Refresh").unwrap().is_async());
	assert_eq!(contract.method("DispatchAsync").unwrap().kind(), MethodKind::Dispatch);
}

#[test]
fn test_builder_rejects_duplicates() {
	let err = Contract::builder("Dup")
		.property("x", ValueType::Int)
		.property("x", ValueType::Text)
		.build()
		.unwrap_err();
	assert_eq!(
		err,
		IntrospectError::DuplicateMember {
			contract: "Dup".into(),
			member: "get_x".into(),
		}
	);

	let err = Contract::builder("Clash")
		.property("x", ValueType::Int)
		.method("set_x", 1)
		.build()
		.unwrap_err();
	assert!(matches!(err, IntrospectError::DuplicateMember { member, .. } if member == "set_x"));
}

#[test]
fn test_builder_rejects_empty_name() {
	assert_eq!(Contract::builder("").build().unwrap_err(), IntrospectError::EmptyName);
}
