//! Role contract types

use crate::{OperationFailure, OperationResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// What was observed when an entity performed an operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Operation completed with a value
    Success { value: Value },
    /// Operation raised or panicked
    Failure { failure: OperationFailure },
    /// Entity has no such operation
    Missing,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure { .. })
    }
}

impl From<OperationResult> for Outcome {
    fn from(result: OperationResult) -> Self {
        match result {
            Ok(value) => Outcome::Success { value },
            Err(failure) => Outcome::Failure { failure },
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success { value } => write!(f, "success returning {}", value),
            Outcome::Failure { failure } => {
                write!(f, "failure ({}) with message {}", failure.kind, failure.message)
            }
            Outcome::Missing => write!(f, "no such operation"),
        }
    }
}

/// Arbitrary check over an observed outcome
#[derive(Clone)]
pub struct Predicate {
    description: String,
    check: Arc<dyn Fn(&Outcome) -> bool + Send + Sync>,
}

impl Predicate {
    pub fn new<F>(description: impl Into<String>, check: F) -> Self
    where
        F: Fn(&Outcome) -> bool + Send + Sync + 'static,
    {
        Self {
            description: description.into(),
            check: Arc::new(check),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn test(&self, outcome: &Outcome) -> bool {
        (self.check)(outcome)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Behavioural expectation a role places on an operation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "expect", rename_all = "snake_case")]
pub enum Invariant {
    /// Operation must not fail
    Succeeds,
    /// Operation must fail
    Fails,
    /// Operation must succeed with exactly this value
    Returns { value: Value },
    /// Operation outcome must satisfy a predicate
    #[serde(skip)]
    Satisfies(Predicate),
}

impl Invariant {
    /// Evaluate the invariant against an observed outcome
    pub fn holds(&self, outcome: &Outcome) -> bool {
        match self {
            Invariant::Succeeds => outcome.is_success(),
            Invariant::Fails => outcome.is_failure(),
            Invariant::Returns { value } => {
                matches!(outcome, Outcome::Success { value: observed } if observed == value)
            }
            Invariant::Satisfies(predicate) => predicate.test(outcome),
        }
    }

    /// Human-readable expectation
    pub fn expectation(&self) -> String {
        match self {
            Invariant::Succeeds => "success".to_string(),
            Invariant::Fails => "failure".to_string(),
            Invariant::Returns { value } => format!("success returning {}", value),
            Invariant::Satisfies(predicate) => predicate.description().to_string(),
        }
    }
}

/// A named role and the invariant any entity claiming it must honour
#[derive(Debug, Clone)]
pub struct RoleContract {
    pub name: String,
    pub description: String,
    pub invariant: Invariant,
}

impl RoleContract {
    pub fn new(name: impl Into<String>, invariant: Invariant) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            invariant,
        }
    }

    /// Builder: set description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Expected vs. observed behaviour of an entity used in a role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractViolation {
    pub entity: String,
    pub role: String,
    pub operation: String,
    pub expected: String,
    pub observed: Outcome,
}

impl fmt::Display for ContractViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' cannot stand in for '{}' on '{}': expected {}, observed {}",
            self.entity, self.role, self.operation, self.expected, self.observed
        )
    }
}

/// Result of a substitutability check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    Pass,
    Violation(ContractViolation),
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }

    pub fn violation(&self) -> Option<&ContractViolation> {
        match self {
            Verdict::Pass => None,
            Verdict::Violation(v) => Some(v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn success(value: Value) -> Outcome {
        Outcome::Success { value }
    }

    fn failure(message: &str) -> Outcome {
        Outcome::Failure {
            failure: OperationFailure::raised(message),
        }
    }

    // ============== Invariant Tests ==============

    #[test]
    fn test_succeeds_invariant() {
        assert!(Invariant::Succeeds.holds(&success(json!(null))));
        assert!(!Invariant::Succeeds.holds(&failure("nope")));
        assert!(!Invariant::Succeeds.holds(&Outcome::Missing));
    }

    #[test]
    fn test_fails_invariant() {
        assert!(Invariant::Fails.holds(&failure("nope")));
        assert!(!Invariant::Fails.holds(&success(json!(1))));
        assert!(!Invariant::Fails.holds(&Outcome::Missing));
    }

    #[test]
    fn test_returns_invariant() {
        let inv = Invariant::Returns {
            value: json!("<div>Component</div>"),
        };

        assert!(inv.holds(&success(json!("<div>Component</div>"))));
        assert!(!inv.holds(&success(json!("<span/>"))));
        assert!(!inv.holds(&failure("Render is impossible here")));
    }

    #[test]
    fn test_predicate_invariant() {
        let inv = Invariant::Satisfies(Predicate::new("non-empty text", |o| {
            matches!(o, Outcome::Success { value: Value::String(s) } if !s.is_empty())
        }));

        assert!(inv.holds(&success(json!("hi"))));
        assert!(!inv.holds(&success(json!(""))));
        assert_eq!(inv.expectation(), "non-empty text");
    }

    #[test]
    fn test_invariant_from_yaml() {
        let inv: Invariant = serde_yaml::from_str("expect: succeeds").unwrap();
        assert!(matches!(inv, Invariant::Succeeds));

        let inv: Invariant = serde_yaml::from_str("expect: returns\nvalue: 42").unwrap();
        assert!(inv.holds(&success(json!(42))));
    }

    // ============== Outcome Tests ==============

    #[test]
    fn test_outcome_from_result() {
        let ok: OperationResult = Ok(json!(true));
        let err: OperationResult = Err(OperationFailure::panicked("boom"));

        assert!(Outcome::from(ok).is_success());
        assert!(Outcome::from(err).is_failure());
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(
            failure("You don't have access!").to_string(),
            "failure (raised) with message You don't have access!"
        );
        assert_eq!(Outcome::Missing.to_string(), "no such operation");
    }

    // ============== Verdict Tests ==============

    #[test]
    fn test_violation_display() {
        let violation = ContractViolation {
            entity: "Pilot".to_string(),
            role: "Member".to_string(),
            operation: "access".to_string(),
            expected: Invariant::Succeeds.expectation(),
            observed: failure("You don't have access!"),
        };

        let text = violation.to_string();
        assert!(text.contains("expected success"));
        assert!(text.contains("observed failure (raised) with message You don't have access!"));
    }

    #[test]
    fn test_verdict_accessors() {
        assert!(Verdict::Pass.is_pass());
        assert!(Verdict::Pass.violation().is_none());
    }

    #[test]
    fn test_verdict_serializes_tagged() {
        let json = serde_json::to_value(Verdict::Pass).unwrap();
        assert_eq!(json, json!({"verdict": "pass"}));
    }
}
