use super::*;

#[test]
fn test_defaults() {
	let config = BridgeConfig::default();
	assert_eq!(config.unknown_fields, UnknownFields::Ignore);
	assert!(!config.skip_absent);
	assert_eq!(BridgeConfig::from_toml("").unwrap(), config);
}

#[test]
fn test_from_toml() {
	let config = BridgeConfig::from_toml(
		r#"
		unknown-fields = "reject"
		skip-absent = true
		"#,
	)
	.unwrap();
	assert_eq!(
		config,
		BridgeConfig {
			unknown_fields: UnknownFields::Reject,
			skip_absent: true,
		}
	);
}

#[test]
fn test_partial_toml_keeps_defaults() {
	let config = BridgeConfig::from_toml("skip-absent = true").unwrap();
	assert_eq!(config.unknown_fields, UnknownFields::Ignore);
	assert!(config.skip_absent);
}

#[test]
fn test_rejects_unknown_keys() {
	let err = BridgeConfig::from_toml("strict = true").unwrap_err();
	assert!(err.to_string().contains("strict"));
}

#[test]
fn test_rejects_bad_policy() {
	assert!(matches!(
		BridgeConfig::from_toml(r#"unknown-fields = "explode""#),
		Err(ConfigError::Toml(_))
	));
}
