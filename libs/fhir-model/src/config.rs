//! Model configuration
//!
//! Toggles for the optional checks run by builders. A configuration is passed
//! explicitly to [`Builder::build_with`](crate::Builder::build_with); `build()`
//! uses [`ModelConfig::default`].

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Default upper bound for string-like primitive values (1 MiB)
pub const DEFAULT_MAX_STRING_LENGTH: usize = 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ModelConfig {
    /// Reject C0 control characters other than tab, carriage return and line feed
    pub check_control_chars: bool,

    /// Enforce the permitted target types of reference elements
    pub check_reference_types: bool,

    /// Enforce required value set bindings on coded elements
    pub check_value_set_bindings: bool,

    /// Maximum length (in characters) of string-like primitive values
    pub max_string_length: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            check_control_chars: true,
            check_reference_types: true,
            check_value_set_bindings: true,
            max_string_length: DEFAULT_MAX_STRING_LENGTH,
        }
    }
}

impl ModelConfig {
    /// Configuration with every optional check turned off.
    ///
    /// Structural invariants (required elements, choice types, ele-1) are
    /// always enforced.
    pub fn lenient() -> Self {
        Self {
            check_control_chars: false,
            check_reference_types: false,
            check_value_set_bindings: false,
            max_string_length: DEFAULT_MAX_STRING_LENGTH,
        }
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_string_length == 0 {
            return Err(ConfigError::Invalid(
                "max_string_length must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
