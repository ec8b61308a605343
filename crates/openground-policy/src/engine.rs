//! TOML-driven mission policy.
//!
//! `TomlMissionPolicy` loads a `PolicyConfig` from a TOML string or file.
//!
//! Evaluation algorithm:
//!
//! 1. Iterate triggers in declaration order.
//! 2. The first trigger whose constraints all match the weather report wins;
//!    its `reason` is returned.
//! 3. If no trigger matches, the mission does not adapt.

use std::path::Path;

use tracing::{debug, info};

use openground_contracts::{
    agent::AgentSettings,
    error::{MissionError, MissionResult},
    tool::WeatherReport,
};

use crate::rule::PolicyConfig;

/// Mission policy read from a TOML document.
///
/// ```rust,ignore
/// use openground_policy::TomlMissionPolicy;
///
/// let policy = TomlMissionPolicy::from_file(Path::new("policies/open-ground.toml"))?;
/// let agent = MissionAgent::new(id, tools, planner, events).with_settings(policy.settings());
/// ```
#[derive(Debug, Clone, Default)]
pub struct TomlMissionPolicy {
    config: PolicyConfig,
}

impl TomlMissionPolicy {
    /// Parse `s` as TOML and build a `TomlMissionPolicy`.
    ///
    /// Returns `MissionError::ConfigError` if the TOML is malformed or does
    /// not match the expected `PolicyConfig` schema.
    pub fn from_toml_str(s: &str) -> MissionResult<Self> {
        let config: PolicyConfig = toml::from_str(s).map_err(|e| MissionError::ConfigError {
            reason: format!("failed to parse policy TOML: {}", e),
        })?;

        for trigger in &config.triggers {
            if trigger.reason.trim().is_empty() {
                return Err(MissionError::ConfigError {
                    reason: format!("trigger '{}' has an empty reason", trigger.id),
                });
            }
        }

        debug!(triggers = config.triggers.len(), "mission policy loaded");
        Ok(Self { config })
    }

    /// Read the file at `path` and parse it as TOML policy configuration.
    pub fn from_file(path: &Path) -> MissionResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| MissionError::ConfigError {
            reason: format!("failed to read policy file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Agent settings declared under `[agent]`.
    pub fn settings(&self) -> AgentSettings {
        self.config.agent.clone()
    }

    /// Return the reason to adapt for `weather`, or `None` to carry on.
    pub fn adaptation_reason(&self, weather: &WeatherReport) -> Option<String> {
        let trigger = self.config.triggers.iter().find(|t| t.matches(weather));

        match trigger {
            Some(trigger) => {
                info!(
                    trigger_id = %trigger.id,
                    condition = %weather.condition,
                    temperature = weather.temperature,
                    "adaptation trigger matched"
                );
                Some(trigger.reason.clone())
            }
            None => {
                debug!(
                    condition = %weather.condition,
                    temperature = weather.temperature,
                    "no adaptation trigger matched"
                );
                None
            }
        }
    }
}
