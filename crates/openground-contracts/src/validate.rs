//! Response validation schema and report types.
//!
//! Before the agent accepts a plan or a photo judgment from the planning
//! service, an optional `ResponseValidator` may check it against a
//! `ResponseSchema`. A failing `ValidationReport` makes the agent reject the
//! response as malformed.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The full specification a planning-service response is checked against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseSchema {
    /// Unique identifier, e.g. "mission-plan-v1".
    pub schema_id: String,
    /// JSON Schema document for structural validation. `Null` skips it.
    pub json_schema: Value,
    /// Semantic rules evaluated after structural validation.
    pub rules: Vec<ValidationRule>,
}

/// A single semantic rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationRule {
    /// Referenced in failure reports.
    pub rule_id: String,
    pub description: String,
    pub rule_type: ValidationRuleType,
}

/// Rule kinds supported by the validator.
///
/// Field paths are dotted (`"steps.0.role"`); numeric segments index arrays.
/// A path ending in `*` (`"steps.*.role"`) applies the rule to every element.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ValidationRuleType {
    /// The field must be present and non-null.
    RequiredField { field_path: String },

    /// The field must equal one of `allowed`.
    AllowedValues { field_path: String, allowed: Vec<Value> },

    /// The array at `field_path`, projected through `key`, has no duplicates.
    UniqueItems { field_path: String, key: String },

    /// The string field must not contain `pattern` as a substring.
    ForbiddenPattern { field_path: String, pattern: String },

    /// Delegate to a function registered under `function_name`.
    Custom { function_name: String },
}

/// Result of checking one response against a `ResponseSchema`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    /// True only if every rule passed.
    pub passed: bool,
    pub failures: Vec<ValidationFailure>,
}

impl ValidationReport {
    /// Join every failure into one line for error messages.
    pub fn summary(&self) -> String {
        self.failures
            .iter()
            .map(|f| format!("[{}] {}", f.rule_id, f.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationFailure {
    pub rule_id: String,
    pub message: String,
}
