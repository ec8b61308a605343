//! # openground-policy
//!
//! TOML-driven mission configuration for Open Ground.
//!
//! ## Overview
//!
//! [`TomlMissionPolicy`] reads two things from one TOML file: the
//! [`AgentSettings`](openground_contracts::agent::AgentSettings) handed to
//! every mission agent, and an ordered list of adaptation triggers. When a
//! fresh weather report matches a trigger, the trigger's reason is what the
//! consumer passes to `MissionAgent::adapt_mission`.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::path::Path;
//! use openground_policy::TomlMissionPolicy;
//!
//! let policy = TomlMissionPolicy::from_file(Path::new("policies/open-ground.toml"))?;
//! if let Some(reason) = policy.adaptation_reason(&weather) {
//!     agent.adapt_mission(&reason, &plan).await?;
//! }
//! ```

pub mod engine;
pub mod rule;

pub use engine::TomlMissionPolicy;
pub use rule::{AdaptationTrigger, PolicyConfig};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use openground_contracts::{agent::AgentSettings, error::MissionError, tool::WeatherReport};

    use crate::TomlMissionPolicy;

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn weather(condition: &str, temperature: i32, safe: bool) -> WeatherReport {
        WeatherReport {
            condition: condition.to_string(),
            temperature,
            is_outdoor_safe: safe,
            humidity: 60,
        }
    }

    const POLICY: &str = r#"
        [agent]
        nearby_query = "libraries"
        timezone = "America/Los_Angeles"

        [[triggers]]
        id = "rain"
        description = "Move outdoor steps under cover"
        condition = "light_rain"
        reason = "Rain started; move the mission indoors"

        [[triggers]]
        id = "cold"
        description = "Too cold to stay outside"
        condition = "*"
        max_temperature = 5
        reason = "Temperature dropped below 5C"

        [[triggers]]
        id = "unsafe"
        description = "Anything flagged unsafe"
        condition = "*"
        outdoor_unsafe = true
        reason = "Outdoor conditions are no longer safe"
    "#;

    // ── Settings ──────────────────────────────────────────────────────────────

    #[test]
    fn settings_are_read_from_agent_table() {
        let policy = TomlMissionPolicy::from_toml_str(POLICY).unwrap();
        let settings = policy.settings();
        assert_eq!(settings.nearby_query, "libraries");
        assert_eq!(settings.timezone.as_deref(), Some("America/Los_Angeles"));
    }

    #[test]
    fn empty_document_uses_default_settings() {
        let policy = TomlMissionPolicy::from_toml_str("").unwrap();
        assert_eq!(policy.settings(), AgentSettings::default());
        assert!(policy.config().triggers.is_empty());
    }

    // ── Triggers ──────────────────────────────────────────────────────────────

    #[test]
    fn condition_trigger_matches_case_insensitively() {
        let policy = TomlMissionPolicy::from_toml_str(POLICY).unwrap();
        let reason = policy.adaptation_reason(&weather("Light_Rain", 14, false));
        assert_eq!(reason.as_deref(), Some("Rain started; move the mission indoors"));
    }

    /// Rain at 3°C matches both "rain" and "cold"; only the first fires.
    #[test]
    fn first_matching_trigger_wins() {
        let policy = TomlMissionPolicy::from_toml_str(POLICY).unwrap();
        let reason = policy.adaptation_reason(&weather("light_rain", 3, false));
        assert_eq!(reason.as_deref(), Some("Rain started; move the mission indoors"));

        let reason = policy.adaptation_reason(&weather("cloudy", 3, true));
        assert_eq!(reason.as_deref(), Some("Temperature dropped below 5C"));
    }

    #[test]
    fn outdoor_unsafe_trigger_ignores_safe_weather() {
        let policy = TomlMissionPolicy::from_toml_str(POLICY).unwrap();
        let reason = policy.adaptation_reason(&weather("windy", 12, false));
        assert_eq!(reason.as_deref(), Some("Outdoor conditions are no longer safe"));
    }

    #[test]
    fn no_matching_trigger_means_no_adaptation() {
        let policy = TomlMissionPolicy::from_toml_str(POLICY).unwrap();
        assert!(policy.adaptation_reason(&weather("sunny", 22, true)).is_none());
    }

    // ── Errors ────────────────────────────────────────────────────────────────

    #[test]
    fn malformed_toml_is_a_config_error() {
        let result = TomlMissionPolicy::from_toml_str("this is not valid toml ][[[");
        match result {
            Err(MissionError::ConfigError { reason }) => {
                assert!(reason.contains("failed to parse policy TOML"), "{reason}");
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn trigger_without_reason_text_is_rejected() {
        let toml = r#"
            [[triggers]]
            id = "blank"
            description = "no reason given"
            condition = "*"
            reason = "   "
        "#;
        let err = TomlMissionPolicy::from_toml_str(toml).unwrap_err();
        assert!(err.to_string().contains("trigger 'blank'"));
    }

    #[test]
    fn missing_policy_file_is_a_config_error() {
        let err = TomlMissionPolicy::from_file(std::path::Path::new("/nonexistent/policy.toml"))
            .unwrap_err();
        assert!(matches!(err, MissionError::ConfigError { .. }));
    }
}
