//! Serialization bridge configuration.
//!
//! The structures are format-neutral; [`BridgeConfig::from_toml`] loads them
//! from TOML:
//!
//! ```toml
//! unknown-fields = "reject"
//! skip-absent = true
//! ```

use serde::Deserialize;

/// How decoding treats keys the contract does not declare.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnknownFields {
	/// Skip the key and its value.
	#[default]
	Ignore,
	/// Fail decoding.
	Reject,
}

/// Options for [`Bridge`](crate::Bridge).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct BridgeConfig {
	/// Handling of undeclared keys while decoding.
	pub unknown_fields: UnknownFields,
	/// Omit absent properties when encoding instead of writing `null`.
	pub skip_absent: bool,
}

impl BridgeConfig {
	/// Parses a configuration from TOML source.
	pub fn from_toml(src: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(src)?)
	}
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	/// Error parsing TOML syntax or structure.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests;
