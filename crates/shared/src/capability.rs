//! Capability and operation types

use crate::Entity;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// How an operation failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The operation returned an error
    #[default]
    Raised,
    /// The operation panicked and the panic was caught
    Panicked,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Raised => write!(f, "raised"),
            FailureKind::Panicked => write!(f, "panicked"),
        }
    }
}

/// Failure signal produced by an operation
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[error("{message}")]
pub struct OperationFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl OperationFailure {
    /// Failure returned by the operation itself
    pub fn raised(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Raised,
            message: message.into(),
        }
    }

    /// Failure recovered from a panic
    pub fn panicked(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Panicked,
            message: message.into(),
        }
    }
}

pub type OperationResult = std::result::Result<Value, OperationFailure>;

type OperationFn = dyn Fn(&Entity, &[Value]) -> OperationResult + Send + Sync;

/// A callable unit of behaviour, run with an entity as receiver
#[derive(Clone)]
pub struct Operation {
    func: Arc<OperationFn>,
}

impl Operation {
    /// Wrap a closure
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&Entity, &[Value]) -> OperationResult + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
        }
    }

    /// Operation that renders a text template (`{name}`, `{kind}`, `{0}`, `{1}`, ...)
    pub fn say(template: impl Into<String>) -> Self {
        let template = template.into();
        Self::new(move |entity, args| Ok(Value::String(render_template(&template, entity, args))))
    }

    /// Operation that always fails with the given message
    pub fn fail(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(move |entity, args| {
            Err(OperationFailure::raised(render_template(&message, entity, args)))
        })
    }

    /// Operation that always returns the given value
    pub fn returning(value: Value) -> Self {
        Self::new(move |_, _| Ok(value.clone()))
    }

    /// Run the operation
    pub fn call(&self, entity: &Entity, args: &[Value]) -> OperationResult {
        (self.func)(entity, args)
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Operation(..)")
    }
}

/// A named, shareable trait (e.g. `swim`)
#[derive(Debug, Clone)]
pub struct Capability {
    pub name: String,
    pub description: String,
    operation: Operation,
}

impl Capability {
    /// Create a capability
    pub fn new(name: impl Into<String>, operation: Operation) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            operation,
        }
    }

    /// Builder: set description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// The capability's operation
    pub fn operation(&self) -> &Operation {
        &self.operation
    }

    /// Run the capability with `entity` as receiver
    pub fn run(&self, entity: &Entity, args: &[Value]) -> OperationResult {
        self.operation.call(entity, args)
    }
}

static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{(\w+)\}").expect("valid placeholder regex"));

/// Interpolate `{name}`, `{kind}`, `{id}` and positional `{N}` placeholders
pub fn render_template(template: &str, entity: &Entity, args: &[Value]) -> String {
    PLACEHOLDER_RE
        .replace_all(template, |caps: &regex::Captures<'_>| {
            let key = &caps[1];
            match key {
                "name" => entity.name().to_string(),
                "kind" => entity.kind().unwrap_or_default().to_string(),
                "id" => entity.id().to_string(),
                _ => match key.parse::<usize>().ok().and_then(|i| args.get(i)) {
                    Some(Value::String(s)) => s.clone(),
                    Some(other) => other.to_string(),
                    None => caps[0].to_string(),
                },
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ============== Template Tests ==============

    #[test]
    fn test_placeholder_pattern() {
        assert!(PLACEHOLDER_RE.is_match("{name}"));
        assert!(PLACEHOLDER_RE.is_match("{0}"));
        assert!(!PLACEHOLDER_RE.is_match("{ name }"));
        assert!(!PLACEHOLDER_RE.is_match("{}"));

        let whale = Entity::new("Grey");
        assert_eq!(render_template("{ name } {}", &whale, &[]), "{ name } {}");
    }

    #[test]
    fn test_render_entity_name() {
        let dog = Entity::new("Lucky").with_kind("Dog");

        assert_eq!(render_template("{name} can swim", &dog, &[]), "Lucky can swim");
        assert_eq!(render_template("{kind} {name}", &dog, &[]), "Dog Lucky");
    }

    #[test]
    fn test_render_positional_args() {
        let eagle = Entity::new("Majesty");
        let args = vec![json!("the valley"), json!(300)];

        assert_eq!(
            render_template("{name} flies over {0} at {1}m", &eagle, &args),
            "Majesty flies over the valley at 300m"
        );
    }

    #[test]
    fn test_render_keeps_unknown_placeholder() {
        let whale = Entity::new("Grey");

        assert_eq!(render_template("{name} sings {3}", &whale, &[]), "Grey sings {3}");
        assert_eq!(render_template("{colour}", &whale, &[]), "{colour}");
    }

    #[test]
    fn test_render_missing_kind_is_empty() {
        let whale = Entity::new("Grey");
        assert_eq!(render_template("[{kind}]", &whale, &[]), "[]");
    }

    // ============== Operation Tests ==============

    #[test]
    fn test_say_operation() {
        let op = Operation::say("{name} can walk");
        let dog = Entity::new("Lucky");

        assert_eq!(op.call(&dog, &[]).unwrap(), json!("Lucky can walk"));
    }

    #[test]
    fn test_fail_operation() {
        let op = Operation::fail("{name} has no access");
        let pilot = Entity::new("Pilot");

        let err = op.call(&pilot, &[]).unwrap_err();
        assert_eq!(err.kind, FailureKind::Raised);
        assert_eq!(err.message, "Pilot has no access");
    }

    #[test]
    fn test_returning_operation() {
        let op = Operation::returning(json!({"html": "<div>Component</div>"}));
        let header = Entity::new("Header");

        assert_eq!(op.call(&header, &[]).unwrap()["html"], "<div>Component</div>");
    }

    #[test]
    fn test_closure_operation_sees_args() {
        let op = Operation::new(|_, args| Ok(json!(args.len())));
        let entity = Entity::new("counter");

        assert_eq!(op.call(&entity, &[json!(1), json!(2)]).unwrap(), json!(2));
    }

    // ============== Capability Tests ==============

    #[test]
    fn test_capability_builder() {
        let swim = Capability::new("swim", Operation::say("{name} can swim"))
            .with_description("Moves through water");

        assert_eq!(swim.name, "swim");
        assert_eq!(swim.description, "Moves through water");
        assert_eq!(swim.run(&Entity::new("Grey"), &[]).unwrap(), json!("Grey can swim"));
    }

    #[test]
    fn test_failure_kind_display() {
        assert_eq!(FailureKind::Raised.to_string(), "raised");
        assert_eq!(FailureKind::Panicked.to_string(), "panicked");
    }
}
