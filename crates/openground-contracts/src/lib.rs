//! # openground-contracts
//!
//! Shared types, event wire format, and error contracts for the Open Ground
//! mission runtime.
//!
//! All crates in the workspace import from here. No orchestration logic lives
//! in this crate, only data definitions, their invariants, and error types.

pub mod agent;
pub mod error;
pub mod event;
pub mod image;
pub mod mission;
pub mod tool;
pub mod validate;

#[cfg(test)]
mod tests {
    use super::*;
    use agent::{MissionContext, MissionId, MissionStatus};
    use error::MissionError;
    use event::AgentEvent;
    use image::EncodedImage;
    use mission::{MissionPlan, MissionStep, StepRole, StepStatus, VerificationResult};
    use serde_json::json;
    use tool::{
        Location, NearbyPlaces, Place, TimeOfDay, ToolCallRecord, ToolCallStatus, ToolName,
        WeatherReport,
    };

    fn plan_with_steps(steps: Vec<MissionStep>) -> MissionPlan {
        MissionPlan {
            id: MissionId::new("m-1"),
            title: "Bench revival".to_string(),
            problem: "broken bench".to_string(),
            steps,
            secret_code: "two taps".to_string(),
            adaptations: vec![],
            estimated_duration: "30 min".to_string(),
        }
    }

    // ── MissionStatus ────────────────────────────────────────────────────────

    #[test]
    fn lifecycle_edges_are_accepted() {
        use MissionStatus::*;
        let edges = [
            (Planning, Executing),
            (Executing, Verifying),
            (Verifying, Executing),
            (Verifying, Completed),
            (Executing, Adapting),
            (Verifying, Adapting),
            (Adapting, Executing),
        ];
        for (from, to) in edges {
            assert!(from.can_transition_to(to), "{from} -> {to} should be allowed");
        }
    }

    #[test]
    fn lifecycle_rejects_edges_outside_the_graph() {
        use MissionStatus::*;
        assert!(!Planning.can_transition_to(Verifying));
        assert!(!Planning.can_transition_to(Adapting));
        assert!(!Executing.can_transition_to(Completed));
        assert!(!Adapting.can_transition_to(Completed));
        assert!(!Completed.can_transition_to(Executing));

        match Planning.transition(Completed) {
            Err(MissionError::InvalidTransition { from, to }) => {
                assert_eq!(from, Planning);
                assert_eq!(to, Completed);
            }
            other => panic!("expected InvalidTransition, got {:?}", other),
        }
    }

    #[test]
    fn failed_is_reachable_only_from_non_terminal_states() {
        use MissionStatus::*;
        for from in [Planning, Executing, Verifying, Adapting] {
            assert!(from.can_transition_to(Failed));
        }
        assert!(!Completed.can_transition_to(Failed));
        assert!(!Failed.can_transition_to(Failed));
    }

    // ── MissionContext ───────────────────────────────────────────────────────

    #[test]
    fn context_summary_uses_fixed_field_order() {
        let ctx = MissionContext {
            location: Some(Location {
                lat: 37.7749,
                lng: -122.4194,
                address: "Mission District".to_string(),
            }),
            weather: Some(WeatherReport {
                condition: "sunny".to_string(),
                temperature: 21,
                is_outdoor_safe: true,
                humidity: 45,
            }),
            time: Some(TimeOfDay {
                hour: 14,
                is_daytime: true,
                is_weekend: false,
                formatted_time: "2:00 PM".to_string(),
            }),
            nearby: Some(NearbyPlaces {
                places: vec![
                    Place {
                        name: "Dolores Park".to_string(),
                        distance: "0.3 mi".to_string(),
                        kind: "park".to_string(),
                    },
                    Place {
                        name: "Community Garden".to_string(),
                        distance: "0.5 mi".to_string(),
                        kind: "garden".to_string(),
                    },
                ],
            }),
            observations: vec![],
        };

        let summary = ctx.summary();
        let lines: Vec<&str> = summary.lines().collect();
        assert_eq!(lines[0], "Location: Mission District");
        assert_eq!(lines[1], "Weather: sunny, 21°C, Outdoor safe: true");
        assert_eq!(lines[2], "Time: 2:00 PM, Daytime: true, Weekend: false");
        assert_eq!(lines[3], "Nearby: Dolores Park, Community Garden");
    }

    #[test]
    fn context_summary_marks_missing_fields() {
        let summary = MissionContext::default().summary();
        assert!(summary.contains("Location: unknown"));
        assert!(summary.contains("Nearby: none"));
    }

    // ── ToolCallRecord ───────────────────────────────────────────────────────

    #[test]
    fn tool_call_reaches_one_terminal_status() {
        let mut record = ToolCallRecord::running(ToolName::GetWeather, json!({ "lat": 1.0 }));
        assert_eq!(record.status, ToolCallStatus::Running);

        record.fail("upstream timeout");
        assert_eq!(record.status, ToolCallStatus::Failed);
        assert!(record.output.is_none());

        // A terminal record ignores later updates.
        record.complete(json!({ "condition": "sunny" }));
        assert_eq!(record.status, ToolCallStatus::Failed);
        assert!(record.output.is_none());
    }

    #[test]
    fn tool_name_serializes_snake_case() {
        let json = serde_json::to_string(&ToolName::SearchNearby).unwrap();
        assert_eq!(json, "\"search_nearby\"");
    }

    // ── MissionPlan / VerificationResult ────────────────────────────────────

    #[test]
    fn plan_without_steps_is_malformed() {
        let err = plan_with_steps(vec![]).check_shape().unwrap_err();
        assert!(matches!(err, MissionError::MalformedResponse { .. }));
    }

    #[test]
    fn plan_counts_only_completed_steps() {
        let mut plan = plan_with_steps(vec![
            MissionStep::new("s1", StepRole::Initiator, "mark the bench", "chalk mark visible"),
            MissionStep::new("s2", StepRole::Resonator, "sit down", "person on bench"),
            MissionStep::new("s3", StepRole::Initiator, "wave", "wave visible"),
        ]);
        assert_eq!(plan.completed_steps(), 0);

        plan.step_mut("s1").unwrap().status = StepStatus::Completed;
        plan.step_mut("s2").unwrap().status = StepStatus::InProgress;
        assert_eq!(plan.completed_steps(), 1);
    }

    #[test]
    fn plan_with_duplicate_step_ids_is_malformed() {
        let plan = plan_with_steps(vec![
            MissionStep::new("s1", StepRole::Initiator, "mark the bench", "chalk mark visible"),
            MissionStep::new("s1", StepRole::Resonator, "sit down", "person on bench"),
        ]);
        let err = plan.check_shape().unwrap_err();
        assert!(err.to_string().contains("duplicate step id 's1'"));
    }

    #[test]
    fn verification_confidence_must_be_a_percentage() {
        let mut result = VerificationResult {
            is_complete: true,
            confidence: 87.0,
            feedback: "looks good".to_string(),
            detected_elements: vec!["bench".to_string()],
            suggested_next_action: None,
        };
        assert!(result.check_shape().is_ok());

        result.confidence = 140.0;
        assert!(result.check_shape().is_err());

        result.confidence = f64::NAN;
        assert!(result.check_shape().is_err());
    }

    // ── EncodedImage ─────────────────────────────────────────────────────────

    #[test]
    fn encoded_image_reads_data_url_header() {
        let img = EncodedImage::from_parts("image/png", "aGVsbG8=");
        assert_eq!(img.mime_type(), "image/png");
        assert_eq!(img.payload(), "aGVsbG8=");
    }

    #[test]
    fn bare_encoded_image_defaults_to_jpeg() {
        let img = EncodedImage::new("aGVsbG8=");
        assert_eq!(img.mime_type(), "image/jpeg");
        assert_eq!(img.payload(), "aGVsbG8=");
    }

    // ── AgentEvent wire format ───────────────────────────────────────────────

    #[test]
    fn events_are_tagged_with_snake_case_type() {
        let event = AgentEvent::StepComplete {
            step_id: "s2".to_string(),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value, json!({ "type": "step_complete", "stepId": "s2" }));
        assert_eq!(event.kind(), "step_complete");

        let event = AgentEvent::MissionComplete {
            mission_id: MissionId::new("m-9"),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value, json!({ "type": "mission_complete", "missionId": "m-9" }));
    }

    // ── MissionError display messages ────────────────────────────────────────

    #[test]
    fn error_tool_failed_display() {
        let err = MissionError::ToolFailed {
            tool: ToolName::GetWeather,
            reason: "503 from upstream".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("get_weather"));
        assert!(msg.contains("503 from upstream"));
    }

    #[test]
    fn error_invalid_transition_display() {
        let err = MissionError::InvalidTransition {
            from: MissionStatus::Completed,
            to: MissionStatus::Verifying,
        };
        assert_eq!(err.to_string(), "invalid mission transition: completed -> verifying");
    }

    #[test]
    fn error_step_already_completed_display() {
        let err = MissionError::StepAlreadyCompleted {
            step_id: "s1".to_string(),
        };
        assert!(err.to_string().contains("'s1' has already been completed"));
    }

    #[test]
    fn error_abandoned_display() {
        let err = MissionError::Abandoned {
            operation: "plan_mission".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "a previous plan_mission call was abandoned before it finished"
        );
    }
}
