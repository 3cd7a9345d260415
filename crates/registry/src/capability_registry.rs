//! CapabilityRegistry - Trait definitions, attachment and invocation

use serde_json::Value;
use shared::{
    Capability, ConsoleOutput, DuplicateTraitError, Entity, Operation, OutputSink, SolidError,
    TraitNotAttachedError, TraitSpec, UnknownTraitError,
};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// CapabilityRegistry holds named traits and composes them onto entities
pub struct CapabilityRegistry {
    /// All defined traits, write-once per name
    traits: BTreeMap<String, Arc<Capability>>,
    /// Where string results of `invoke` are written
    output: Arc<dyn OutputSink>,
}

impl CapabilityRegistry {
    /// Create an empty registry writing to stdout
    pub fn new() -> Self {
        Self::with_output(Arc::new(ConsoleOutput))
    }

    /// Create an empty registry writing to the given sink
    pub fn with_output(output: Arc<dyn OutputSink>) -> Self {
        Self {
            traits: BTreeMap::new(),
            output,
        }
    }

    /// Define a trait from a name and an operation
    pub fn define_trait(
        &mut self,
        name: impl Into<String>,
        operation: Operation,
    ) -> Result<Arc<Capability>, DuplicateTraitError> {
        self.define(Capability::new(name, operation))
    }

    /// Define a fully built capability. The first definition of a name wins.
    pub fn define(&mut self, capability: Capability) -> Result<Arc<Capability>, DuplicateTraitError> {
        if self.traits.contains_key(&capability.name) {
            return Err(DuplicateTraitError {
                name: capability.name,
            });
        }

        debug!(name = %capability.name, "trait defined");
        let capability = Arc::new(capability);
        self.traits
            .insert(capability.name.clone(), Arc::clone(&capability));
        Ok(capability)
    }

    /// Define every trait of a catalog
    pub fn load_traits(&mut self, specs: &[TraitSpec]) -> shared::Result<()> {
        for spec in specs {
            self.define(spec.to_capability()?)?;
        }
        Ok(())
    }

    /// Get a trait by name
    pub fn get_trait(&self, name: &str) -> Option<&Arc<Capability>> {
        self.traits.get(name)
    }

    /// Check if a trait is defined
    pub fn has_trait(&self, name: &str) -> bool {
        self.traits.contains_key(name)
    }

    /// Names of all defined traits, sorted
    pub fn trait_names(&self) -> Vec<&str> {
        self.traits.keys().map(|s| s.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.traits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.traits.is_empty()
    }

    /// Attach named traits to an entity.
    ///
    /// All names are resolved before the entity is touched, so an unknown
    /// name leaves it unchanged. Re-attaching a trait overwrites it.
    pub fn attach<I, S>(&self, entity: &mut Entity, names: I) -> Result<(), UnknownTraitError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut resolved = Vec::new();
        for name in names {
            let name = name.as_ref();
            let capability = self.traits.get(name).ok_or_else(|| UnknownTraitError {
                name: name.to_string(),
                known_traits: self.trait_names().iter().map(|s| s.to_string()).collect(),
            })?;
            resolved.push(Arc::clone(capability));
        }

        for capability in resolved {
            let replaced = entity.adopt(capability);
            debug!(
                entity = entity.name(),
                traits = ?entity.trait_names(),
                replaced,
                "trait attached"
            );
        }
        Ok(())
    }

    /// Run an attached trait with the entity as receiver.
    ///
    /// String results are written to the output sink.
    pub fn invoke(&self, entity: &Entity, name: &str, args: &[Value]) -> shared::Result<Value> {
        let capability = entity.get_trait(name).ok_or_else(|| TraitNotAttachedError {
            entity: entity.name().to_string(),
            name: name.to_string(),
            attached_traits: entity.trait_names().iter().map(|s| s.to_string()).collect(),
        })?;

        let value = capability.run(entity, args).map_err(SolidError::Operation)?;
        if let Value::String(text) = &value {
            self.output.emit(text);
        }
        Ok(value)
    }
}

impl Default for CapabilityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CapabilityRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilityRegistry")
            .field("traits", &self.trait_names())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared::{BufferedOutput, FailureKind, OperationSpec};

    fn create_test_registry() -> (CapabilityRegistry, Arc<BufferedOutput>) {
        let output = Arc::new(BufferedOutput::new());
        let mut registry = CapabilityRegistry::with_output(output.clone());
        registry.define_trait("swim", Operation::say("{name} can swim")).unwrap();
        registry.define_trait("fly", Operation::say("{name} can fly")).unwrap();
        registry.define_trait("walk", Operation::say("{name} can walk")).unwrap();
        (registry, output)
    }

    // ============== Definition Tests ==============

    #[test]
    fn test_define_trait() {
        let (registry, _) = create_test_registry();

        assert_eq!(registry.len(), 3);
        assert!(registry.has_trait("swim"));
        assert_eq!(registry.trait_names(), vec!["fly", "swim", "walk"]);
    }

    #[test]
    fn test_duplicate_trait_rejected_and_original_kept() {
        let (mut registry, output) = create_test_registry();

        let err = registry
            .define_trait("swim", Operation::say("{name} sinks"))
            .unwrap_err();
        assert_eq!(err.name, "swim");

        let mut whale = Entity::new("Grey");
        registry.attach(&mut whale, ["swim"]).unwrap();
        registry.invoke(&whale, "swim", &[]).unwrap();
        assert_eq!(output.lines(), vec!["Grey can swim"]);
    }

    #[test]
    fn test_load_traits_from_specs() {
        let mut registry = CapabilityRegistry::with_output(Arc::new(BufferedOutput::new()));
        let specs = vec![TraitSpec {
            name: "swim".to_string(),
            description: "Moves through water".to_string(),
            operation: OperationSpec::say("{name} can swim"),
        }];

        registry.load_traits(&specs).unwrap();
        assert_eq!(registry.get_trait("swim").unwrap().description, "Moves through water");

        let err = registry.load_traits(&specs).unwrap_err();
        assert!(matches!(err, SolidError::DuplicateTrait(_)));
    }

    // ============== Attach Tests ==============

    #[test]
    fn test_attach_enables_exactly_attached_traits() {
        let (registry, _) = create_test_registry();
        let mut dog = Entity::new("Lucky").with_kind("Dog");

        registry.attach(&mut dog, ["swim", "walk"]).unwrap();

        assert!(registry.invoke(&dog, "swim", &[]).is_ok());
        assert!(registry.invoke(&dog, "walk", &[]).is_ok());
        assert!(registry.invoke(&dog, "fly", &[]).is_err());
        assert!(registry.invoke(&dog, "teleport", &[]).is_err());
    }

    #[test]
    fn test_attach_unknown_trait_fails() {
        let (registry, _) = create_test_registry();
        let mut dog = Entity::new("Lucky");

        let err = registry.attach(&mut dog, ["swim", "dig"]).unwrap_err();
        assert_eq!(err.name, "dig");
        assert!(err.known_traits.contains(&"swim".to_string()));
    }

    #[test]
    fn test_failed_attach_leaves_entity_untouched() {
        let (registry, _) = create_test_registry();
        let mut dog = Entity::new("Lucky");
        registry.attach(&mut dog, ["walk"]).unwrap();

        assert!(registry.attach(&mut dog, ["swim", "dig"]).is_err());
        assert_eq!(dog.trait_names(), vec!["walk"]);
    }

    #[test]
    fn test_attach_twice_keeps_single_trait() {
        let (registry, _) = create_test_registry();
        let mut whale = Entity::new("Grey");

        registry.attach(&mut whale, ["swim"]).unwrap();
        let before = whale.trait_count();
        registry.attach(&mut whale, ["swim"]).unwrap();
        registry.attach(&mut whale, ["swim", "swim"]).unwrap();

        assert_eq!(before, 1);
        assert_eq!(whale.trait_count(), 1);
    }

    #[test]
    fn test_attach_never_drops_previous_traits() {
        let (registry, _) = create_test_registry();
        let mut eagle = Entity::new("Majesty");

        registry.attach(&mut eagle, ["walk"]).unwrap();
        registry.attach(&mut eagle, ["fly"]).unwrap();

        assert_eq!(eagle.trait_names(), vec!["fly", "walk"]);
    }

    // ============== Invoke Tests ==============

    #[test]
    fn test_lucky_swims_but_cannot_fly() {
        let (registry, output) = create_test_registry();
        let mut dog = Entity::new("Lucky").with_kind("Dog");
        registry.attach(&mut dog, ["swim", "walk"]).unwrap();

        let value = registry.invoke(&dog, "swim", &[]).unwrap();
        assert_eq!(value, json!("Lucky can swim"));
        assert_eq!(output.lines(), vec!["Lucky can swim"]);

        let err = registry.invoke(&dog, "fly", &[]).unwrap_err();
        match err {
            SolidError::TraitNotAttached(e) => {
                assert_eq!(e.entity, "Lucky");
                assert_eq!(e.name, "fly");
                assert_eq!(e.attached_traits, vec!["swim", "walk"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invoke_unattached_fails_for_every_entity() {
        let (registry, _) = create_test_registry();
        let bare = Entity::new("Nobody");

        for name in ["swim", "fly", "walk", "unknown"] {
            let err = registry.invoke(&bare, name, &[]).unwrap_err();
            assert!(matches!(err, SolidError::TraitNotAttached(_)));
        }
    }

    #[test]
    fn test_invoke_ignores_own_operations() {
        let (registry, _) = create_test_registry();
        let pilot = Entity::new("Pilot").with_operation("fly", Operation::say("{name} flies a plane"));

        let err = registry.invoke(&pilot, "fly", &[]).unwrap_err();
        assert!(matches!(err, SolidError::TraitNotAttached(_)));
    }

    #[test]
    fn test_invoke_passes_args() {
        let (mut registry, output) = create_test_registry();
        registry
            .define_trait("dive", Operation::say("{name} dives to {0}m"))
            .unwrap();
        let mut whale = Entity::new("Grey");
        registry.attach(&mut whale, ["dive"]).unwrap();

        registry.invoke(&whale, "dive", &[json!(200)]).unwrap();
        assert_eq!(output.lines(), vec!["Grey dives to 200m"]);
    }

    #[test]
    fn test_invoke_propagates_operation_failure() {
        let (mut registry, output) = create_test_registry();
        registry
            .define_trait("render", Operation::fail("Render is impossible here"))
            .unwrap();
        let mut hoc = Entity::new("HOC");
        registry.attach(&mut hoc, ["render"]).unwrap();

        let err = registry.invoke(&hoc, "render", &[]).unwrap_err();
        match err {
            SolidError::Operation(f) => assert_eq!(f.kind, FailureKind::Raised),
            other => panic!("unexpected error: {other}"),
        }
        assert!(output.lines().is_empty());
    }

    #[test]
    fn test_non_string_results_are_not_emitted() {
        let (mut registry, output) = create_test_registry();
        registry
            .define_trait("weight", Operation::returning(json!(150)))
            .unwrap();
        let mut whale = Entity::new("Grey");
        registry.attach(&mut whale, ["weight"]).unwrap();

        assert_eq!(registry.invoke(&whale, "weight", &[]).unwrap(), json!(150));
        assert!(output.lines().is_empty());
    }
}
