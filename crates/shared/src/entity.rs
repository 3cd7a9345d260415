//! Entity - named instance composed from shared traits

use crate::{Capability, Operation, OperationResult};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

/// A named object instance.
///
/// Traits are shared capabilities attached through a registry. Operations
/// are the entity's own behaviour and shadow traits of the same name when
/// the entity performs an operation.
#[derive(Debug, Clone)]
pub struct Entity {
    id: Uuid,
    name: String,
    kind: Option<String>,
    traits: BTreeMap<String, Arc<Capability>>,
    operations: BTreeMap<String, Operation>,
}

impl Entity {
    /// Create an entity with no traits
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind: None,
            traits: BTreeMap::new(),
            operations: BTreeMap::new(),
        }
    }

    /// Builder: set kind (e.g. `Dog`)
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Builder: add an own operation
    pub fn with_operation(mut self, name: impl Into<String>, operation: Operation) -> Self {
        self.define_operation(name, operation);
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    /// Install an own operation, replacing any previous one of that name
    pub fn define_operation(&mut self, name: impl Into<String>, operation: Operation) {
        self.operations.insert(name.into(), operation);
    }

    /// Attach a shared capability. Returns `true` if it replaced one of the same name.
    pub fn adopt(&mut self, capability: Arc<Capability>) -> bool {
        self.traits
            .insert(capability.name.clone(), capability)
            .is_some()
    }

    /// Names of attached traits, sorted
    pub fn trait_names(&self) -> Vec<&str> {
        self.traits.keys().map(|s| s.as_str()).collect()
    }

    /// Number of attached traits
    pub fn trait_count(&self) -> usize {
        self.traits.len()
    }

    /// Check if a trait is attached
    pub fn has_trait(&self, name: &str) -> bool {
        self.traits.contains_key(name)
    }

    /// Get an attached trait
    pub fn get_trait(&self, name: &str) -> Option<&Arc<Capability>> {
        self.traits.get(name)
    }

    /// Names of own operations, sorted
    pub fn operation_names(&self) -> Vec<&str> {
        self.operations.keys().map(|s| s.as_str()).collect()
    }

    /// Check if the entity can perform `name`, either as own operation or trait
    pub fn responds_to(&self, name: &str) -> bool {
        self.operations.contains_key(name) || self.traits.contains_key(name)
    }

    /// Perform an operation. Own operations take precedence over traits.
    /// Returns `None` when the entity has neither.
    pub fn perform(&self, name: &str, args: &[Value]) -> Option<OperationResult> {
        if let Some(op) = self.operations.get(name) {
            return Some(op.call(self, args));
        }
        self.traits.get(name).map(|cap| cap.run(self, args))
    }
}
