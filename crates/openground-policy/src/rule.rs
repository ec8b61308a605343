//! Mission policy schema.
//!
//! A `PolicyConfig` is deserialized from TOML. It carries the agent settings
//! and an ordered list of `AdaptationTrigger`s. Triggers are evaluated in
//! declaration order and the first matching trigger wins.

use serde::{Deserialize, Serialize};

use openground_contracts::{agent::AgentSettings, tool::WeatherReport};

/// A weather condition that should make a running mission adapt.
///
/// Every field that is set must match for the trigger to fire. `condition`
/// accepts the wildcard `"*"`, which matches any condition string.
///
/// ```toml
/// [[triggers]]
/// id = "rain"
/// description = "Move outdoor steps under cover"
/// condition = "light_rain"
/// reason = "Rain started; move the mission indoors"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptationTrigger {
    /// Stable identifier used in logs.
    pub id: String,

    pub description: String,

    /// Weather condition to match, compared case-insensitively. `"*"` matches any.
    pub condition: String,

    /// Fires only when the temperature is at or below this value (°C).
    pub max_temperature: Option<i32>,

    /// When set, fires only if `is_outdoor_safe` is the opposite of this flag.
    pub outdoor_unsafe: Option<bool>,

    /// The reason handed to `MissionAgent::adapt_mission`.
    pub reason: String,
}

impl AdaptationTrigger {
    /// Return true if `weather` satisfies every constraint on this trigger.
    pub fn matches(&self, weather: &WeatherReport) -> bool {
        let condition_matches =
            self.condition == "*" || self.condition.eq_ignore_ascii_case(&weather.condition);
        let temperature_matches = self
            .max_temperature
            .map_or(true, |max| weather.temperature <= max);
        let safety_matches = self
            .outdoor_unsafe
            .map_or(true, |unsafe_only| unsafe_only != weather.is_outdoor_safe);
        condition_matches && temperature_matches && safety_matches
    }
}

/// The top-level structure deserialized from a TOML policy file.
///
/// ```toml
/// [agent]
/// nearby_query = "community spaces"
/// timezone = "America/Los_Angeles"
///
/// [[triggers]]
/// id = "cold"
/// description = "Too cold to stay outside"
/// condition = "*"
/// max_temperature = 5
/// reason = "Temperature dropped below 5°C"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Settings passed to every agent. Missing keys take their defaults.
    #[serde(default)]
    pub agent: AgentSettings,

    /// Ordered list of triggers. First match wins.
    #[serde(default)]
    pub triggers: Vec<AdaptationTrigger>,
}
