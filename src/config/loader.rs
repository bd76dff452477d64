//! Configuration loader for policy YAML files.

use std::fs;
use std::path::Path;

use rust_decimal::Decimal;
use tracing::info;

use super::types::{DurationPolicy, PolicyConfig, PolicyMetadata};
use crate::error::{EngineError, EngineResult};

/// Loads and holds the policy configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: PolicyConfig,
}

impl ConfigLoader {
    /// Loads the policy from a YAML file.
    ///
    /// # Errors
    ///
    /// - `ConfigNotFound` if the file cannot be read
    /// - `ConfigParseError` if the YAML does not match the policy schema
    /// - `InvalidConfig` if any cap is zero or negative
    ///
    /// # Example
    ///
    /// ```no_run
    /// use shift_ledger::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/policy.yaml")?;
    /// println!("Loaded policy: {}", loader.metadata().name);
    /// # Ok::<(), shift_ledger::error::EngineError>(())
    /// ```
    pub fn load(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        let loader = Self::from_yaml(&content).map_err(|err| match err {
            EngineError::ConfigParseError { message, .. } => EngineError::ConfigParseError {
                path: path_str.clone(),
                message,
            },
            other => other,
        })?;

        info!(
            path = %path_str,
            policy = %loader.metadata().name,
            version = %loader.metadata().version,
            "Loaded policy configuration"
        );
        Ok(loader)
    }

    /// Parses a policy from YAML text.
    pub fn from_yaml(content: &str) -> EngineResult<Self> {
        let config: PolicyConfig =
            serde_yaml::from_str(content).map_err(|e| EngineError::ConfigParseError {
                path: "<inline>".to_string(),
                message: e.to_string(),
            })?;

        Self::from_config(config)
    }

    /// Wraps an already built policy, checking its caps.
    pub fn from_config(config: PolicyConfig) -> EngineResult<Self> {
        Self::validate(&config.durations)?;
        Ok(Self { config })
    }

    fn validate(policy: &DurationPolicy) -> EngineResult<()> {
        for (label, hours) in policy.labelled_caps() {
            if hours <= Decimal::ZERO {
                return Err(EngineError::InvalidConfig {
                    message: format!("{} must be positive, got {}", label, hours),
                });
            }
        }
        Ok(())
    }

    /// Returns the underlying policy configuration.
    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Returns the policy metadata.
    pub fn metadata(&self) -> &PolicyMetadata {
        &self.config.metadata
    }

    /// Returns the duration rules.
    pub fn durations(&self) -> &DurationPolicy {
        &self.config.durations
    }
}
