//! Built-in response schemas for plans and photo judgments.

use serde_json::{json, Value};

use openground_contracts::validate::{ResponseSchema, ValidationRule, ValidationRuleType};

/// Name of the custom rule requiring the initiator to take the first step.
pub const INITIATOR_FIRST: &str = "initiator-first";

pub fn plan_schema() -> ResponseSchema {
    ResponseSchema {
        schema_id: "mission-plan-v1".to_string(),
        json_schema: plan_json_schema(),
        rules: vec![
            rule(
                "unique-step-ids",
                "step ids must be unique within a plan",
                ValidationRuleType::UniqueItems {
                    field_path: "steps".to_string(),
                    key: "id".to_string(),
                },
            ),
            rule(
                "step-role",
                "every step is performed by the initiator or the resonator",
                ValidationRuleType::AllowedValues {
                    field_path: "steps.*.role".to_string(),
                    allowed: vec![json!("initiator"), json!("resonator")],
                },
            ),
            rule(
                "step-criteria",
                "every step says what its completion photo must show",
                ValidationRuleType::RequiredField {
                    field_path: "steps.*.verificationCriteria".to_string(),
                },
            ),
            rule(
                "secret-code",
                "the plan carries a secret code for the two participants",
                ValidationRuleType::RequiredField {
                    field_path: "secretCode".to_string(),
                },
            ),
            rule(
                "initiator-first",
                "the person who reported the observation starts the mission",
                ValidationRuleType::Custom {
                    function_name: INITIATOR_FIRST.to_string(),
                },
            ),
        ],
    }
}

pub fn judgment_schema() -> ResponseSchema {
    ResponseSchema {
        schema_id: "photo-judgment-v1".to_string(),
        json_schema: json!({
            "type": "object",
            "required": ["isComplete", "confidence", "feedback"],
            "properties": {
                "isComplete": { "type": "boolean" },
                "confidence": { "type": "number", "minimum": 0, "maximum": 100 },
                "feedback": { "type": "string" },
                "detectedElements": { "type": "array", "items": { "type": "string" } },
                "suggestedNextAction": { "type": "string" }
            }
        }),
        rules: vec![rule(
            "feedback-present",
            "a judgment always explains itself",
            ValidationRuleType::RequiredField {
                field_path: "feedback".to_string(),
            },
        )],
    }
}

/// Returns a failure message unless the first step belongs to the initiator.
pub(crate) fn initiator_first(plan: &Value) -> Option<String> {
    match plan.pointer("/steps/0/role").and_then(Value::as_str) {
        Some("initiator") | None => None,
        Some(other) => Some(format!("first step is assigned to '{other}', not the initiator")),
    }
}

fn plan_json_schema() -> Value {
    json!({
        "type": "object",
        "required": ["id", "title", "problem", "steps", "secretCode", "estimatedDuration"],
        "properties": {
            "title": { "type": "string", "minLength": 1 },
            "problem": { "type": "string" },
            "secretCode": { "type": "string" },
            "estimatedDuration": { "type": "string" },
            "adaptations": { "type": "array", "items": { "type": "string" } },
            "steps": {
                "type": "array",
                "minItems": 1,
                "items": {
                    "type": "object",
                    "required": ["id", "role", "action", "verificationCriteria", "status"],
                    "properties": {
                        "id": { "type": "string", "minLength": 1 },
                        "action": { "type": "string", "minLength": 1 },
                        "verificationCriteria": { "type": "string" },
                        "status": {
                            "enum": ["pending", "in_progress", "completed", "skipped"]
                        }
                    }
                }
            }
        }
    })
}

fn rule(id: &str, description: &str, rule_type: ValidationRuleType) -> ValidationRule {
    ValidationRule {
        rule_id: id.to_string(),
        description: description.to_string(),
        rule_type,
    }
}
