//! Product configuration singleton: default of the unique-variant flag.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use forgeerp_core::ValueObject;

pub const UNIQUE_VARIANT_ENV: &str = "FORGEERP_UNIQUE_VARIANT_DEFAULT";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be a boolean, got {value:?}")]
    InvalidFlag { var: &'static str, value: String },

    #[error("invalid product configuration document: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductConfiguration {
    /// Default `unique_variant` for new templates.
    #[serde(default)]
    pub unique_variant: bool,
}

impl ValueObject for ProductConfiguration {}

impl ProductConfiguration {
    pub fn from_json(document: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(document)?)
    }

    /// Read [`UNIQUE_VARIANT_ENV`]; `Ok(None)` when unset.
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Option<Self>, ConfigError> {
        let Some(raw) = lookup(UNIQUE_VARIANT_ENV) else {
            return Ok(None);
        };
        let unique_variant = match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => {
                return Err(ConfigError::InvalidFlag {
                    var: UNIQUE_VARIANT_ENV,
                    value: raw,
                });
            }
        };
        Ok(Some(Self { unique_variant }))
    }
}

/// Source of the configuration singleton, if one has been saved.
pub trait ConfigurationProvider {
    fn configuration(&self) -> Option<ProductConfiguration>;
}

impl ConfigurationProvider for ProductConfiguration {
    fn configuration(&self) -> Option<ProductConfiguration> {
        Some(*self)
    }
}

impl ConfigurationProvider for Option<ProductConfiguration> {
    fn configuration(&self) -> Option<ProductConfiguration> {
        *self
    }
}

/// `unique_variant` value for a template created without one.
pub fn default_unique_variant(provider: &dyn ConfigurationProvider) -> bool {
    provider
        .configuration()
        .map(|config| config.unique_variant)
        .unwrap_or(false)
}
