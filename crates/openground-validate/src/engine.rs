//! Schema-based response validator.
//!
//! `SchemaValidator` implements `ResponseValidator` from `openground-core`.
//! Validation runs in two phases:
//!
//! 1. **Structural**: the serialized response is validated against
//!    `ResponseSchema::json_schema` using the `jsonschema` crate.
//! 2. **Semantic**: each `ValidationRule` in `ResponseSchema::rules` is
//!    evaluated in order. All failures are collected before returning.
//!
//! Custom rules delegate to named functions registered via `register_rule`.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use openground_contracts::{
    error::{MissionError, MissionResult},
    mission::{MissionPlan, VerificationResult},
    validate::{ResponseSchema, ValidationFailure, ValidationReport, ValidationRuleType},
};
use openground_core::traits::ResponseValidator;

use crate::schemas::{initiator_first, judgment_schema, plan_schema, INITIATOR_FIRST};

/// A caller-supplied validation function.
///
/// Receives the whole serialized response. Returns `Some(message)` when the
/// check fails, `None` on success.
pub type CustomRuleFn = Box<dyn Fn(&Value) -> Option<String> + Send + Sync>;

/// Validates planning-service responses against a plan schema and a
/// judgment schema.
pub struct SchemaValidator {
    plan: ResponseSchema,
    judgment: ResponseSchema,
    custom_rules: HashMap<String, CustomRuleFn>,
}

impl SchemaValidator {
    /// A validator using `plan_schema()` and `judgment_schema()`.
    pub fn new() -> Self {
        Self::with_schemas(plan_schema(), judgment_schema())
    }

    pub fn with_schemas(plan: ResponseSchema, judgment: ResponseSchema) -> Self {
        let mut validator = Self {
            plan,
            judgment,
            custom_rules: HashMap::new(),
        };
        validator.register_rule(INITIATOR_FIRST, Box::new(initiator_first));
        validator
    }

    /// Register a custom rule under `name`, replacing any previous one.
    pub fn register_rule(&mut self, name: impl Into<String>, f: CustomRuleFn) {
        self.custom_rules.insert(name.into(), f);
    }

    /// Validate an arbitrary JSON value against `schema`.
    pub fn validate(&self, value: &Value, schema: &ResponseSchema) -> ValidationReport {
        let mut failures: Vec<ValidationFailure> = Vec::new();

        // ── Phase 1: JSON Schema structural validation ────────────────────────
        if !schema.json_schema.is_null() {
            match jsonschema::validator_for(&schema.json_schema) {
                Ok(validator) => {
                    for error in validator.iter_errors(value) {
                        let message = format!(
                            "JSON Schema violation at {}: {}",
                            error.instance_path, error
                        );
                        warn!(schema_id = %schema.schema_id, %message, "structural validation failure");
                        failures.push(ValidationFailure {
                            rule_id: "json-schema".to_string(),
                            message,
                        });
                    }
                }
                Err(e) => {
                    let message = format!("invalid JSON Schema document: {e}");
                    warn!(schema_id = %schema.schema_id, %message, "schema compilation failure");
                    failures.push(ValidationFailure {
                        rule_id: "json-schema".to_string(),
                        message,
                    });
                }
            }
        }

        // ── Phase 2: Semantic rule evaluation ────────────────────────────────
        for rule in &schema.rules {
            debug!(rule_id = %rule.rule_id, description = %rule.description, "evaluating rule");

            if let Some(message) = self.evaluate(value, &rule.rule_type) {
                warn!(rule_id = %rule.rule_id, %message, "semantic rule failed");
                failures.push(ValidationFailure {
                    rule_id: rule.rule_id.clone(),
                    message,
                });
            }
        }

        let passed = failures.is_empty();
        debug!(
            schema_id = %schema.schema_id,
            passed,
            failure_count = failures.len(),
            "validation complete"
        );

        ValidationReport { passed, failures }
    }

    fn evaluate(&self, value: &Value, rule: &ValidationRuleType) -> Option<String> {
        match rule {
            ValidationRuleType::RequiredField { field_path } => {
                let missing = resolve_each(value, field_path)
                    .iter()
                    .filter(|v| v.is_none())
                    .count();
                (missing > 0).then(|| {
                    format!("required field '{field_path}' is missing or null ({missing} occurrence(s))")
                })
            }

            ValidationRuleType::AllowedValues { field_path, allowed } => {
                resolve_each(value, field_path).into_iter().find_map(|actual| match actual {
                    None => Some(format!(
                        "field '{field_path}' is missing; cannot check allowed values"
                    )),
                    Some(v) if !allowed.contains(v) => Some(format!(
                        "field '{field_path}' has value {v} which is not in the allowed set"
                    )),
                    Some(_) => None,
                })
            }

            ValidationRuleType::UniqueItems { field_path, key } => {
                resolve_each(value, field_path)
                    .into_iter()
                    .flatten()
                    .filter_map(Value::as_array)
                    .find_map(|items| duplicate_key(items, key))
                    .map(|dup| format!("'{field_path}' repeats {key} {dup}"))
            }

            // Non-string and absent fields pass; the rule only applies to strings.
            ValidationRuleType::ForbiddenPattern { field_path, pattern } => {
                resolve_each(value, field_path)
                    .into_iter()
                    .flatten()
                    .filter_map(Value::as_str)
                    .any(|s| s.contains(pattern.as_str()))
                    .then(|| format!("field '{field_path}' contains forbidden pattern '{pattern}'"))
            }

            ValidationRuleType::Custom { function_name } => {
                match self.custom_rules.get(function_name.as_str()) {
                    Some(f) => f(value),
                    None => Some(format!(
                        "no custom rule registered for function name '{function_name}'"
                    )),
                }
            }
        }
    }

    fn validate_typed<T: Serialize>(
        &self,
        response: &T,
        schema: &ResponseSchema,
    ) -> MissionResult<ValidationReport> {
        let value = serde_json::to_value(response).map_err(|e| MissionError::SchemaValidation {
            reason: format!("response for '{}' is not serializable: {e}", schema.schema_id),
        })?;
        Ok(self.validate(&value, schema))
    }
}

impl Default for SchemaValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseValidator for SchemaValidator {
    fn validate_plan(&self, plan: &MissionPlan) -> MissionResult<ValidationReport> {
        self.validate_typed(plan, &self.plan)
    }

    fn validate_judgment(&self, result: &VerificationResult) -> MissionResult<ValidationReport> {
        self.validate_typed(result, &self.judgment)
    }
}

// ── Path resolution ──────────────────────────────────────────────────────────

/// Resolve a dotted path, expanding `*` segments over arrays.
///
/// Returns one entry per leaf: `None` where a segment is missing or the value
/// is JSON `null`. A `*` over an empty array yields no leaves.
pub(crate) fn resolve_each<'v>(value: &'v Value, path: &str) -> Vec<Option<&'v Value>> {
    let mut current = vec![Some(value)];

    for segment in path.split('.') {
        let mut next = Vec::with_capacity(current.len());
        for node in current {
            let Some(node) = node else {
                next.push(None);
                continue;
            };
            match (segment, node) {
                ("*", Value::Array(items)) => next.extend(items.iter().map(Some)),
                (_, Value::Array(items)) => {
                    next.push(segment.parse::<usize>().ok().and_then(|i| items.get(i)))
                }
                (_, Value::Object(map)) => next.push(map.get(segment)),
                _ => next.push(None),
            }
        }
        current = next;
    }

    current
        .into_iter()
        .map(|v| v.filter(|v| !v.is_null()))
        .collect()
}

fn duplicate_key(items: &[Value], key: &str) -> Option<String> {
    let mut seen = HashSet::new();
    items
        .iter()
        .filter_map(|item| item.get(key))
        .map(Value::to_string)
        .find(|k| !seen.insert(k.clone()))
}
