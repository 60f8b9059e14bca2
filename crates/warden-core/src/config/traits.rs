//! Configuration loading trait

use crate::{WardenError, WardenResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

/// Prefix of environment variables that override configuration fields
pub const ENV_PREFIX: &str = "WARDEN_";

/// Core trait for Warden configuration types.
///
/// Configuration is a flat serde struct. Sources apply in order: defaults,
/// then a TOML file, then `WARDEN_*` environment variables, then validation.
pub trait WardenConfig:
    Clone + Default + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Parse from TOML text and validate
    fn from_toml_str(text: &str) -> WardenResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file and validate
    fn load_from_file(path: &Path) -> WardenResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            WardenError::config(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }

    /// Apply `WARDEN_*` overrides from the process environment
    fn merge_with_env(&mut self) -> WardenResult<()> {
        self.merge_with_vars(std::env::vars())
    }

    /// Apply `WARDEN_*` overrides from the given variables.
    ///
    /// `WARDEN_REPLAY_LATEST_COMMIT=true` sets the `replay_latest_commit`
    /// field. Variables naming fields the config does not have are ignored.
    fn merge_with_vars<I>(&mut self, vars: I) -> WardenResult<()>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut current = serde_json::to_value(&*self)?;
        let fields = current
            .as_object_mut()
            .ok_or_else(|| WardenError::config("Configuration must be a table"))?;

        for (key, raw) in vars {
            let Some(name) = key.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let field = name.to_ascii_lowercase();
            match fields.get_mut(&field) {
                Some(slot) => *slot = parse_env_value(&raw),
                None => tracing::debug!(variable = %key, "Ignoring unknown config override"),
            }
        }

        let merged: Self = serde_json::from_value(current)
            .map_err(|e| WardenError::config(format!("Invalid environment override: {e}")))?;
        merged.validate()?;
        *self = merged;
        Ok(())
    }

    /// Validate field values
    fn validate(&self) -> WardenResult<()> {
        Ok(())
    }
}

fn parse_env_value(raw: &str) -> Value {
    if let Ok(flag) = raw.parse::<bool>() {
        return Value::Bool(flag);
    }
    if let Ok(number) = raw.parse::<u64>() {
        return Value::from(number);
    }
    Value::String(raw.to_string())
}
