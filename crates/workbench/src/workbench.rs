//! Workbench - Named entities behind a registry, a checker and a ledger

use audit::CheckLog;
use contracts::ContractChecker;
use registry::CapabilityRegistry;
use serde_json::Value;
use shared::{
    Catalog, ConsoleOutput, Entity, EntitySpec, Outcome, OutputSink, Result, SolidError,
    TraitNotAttachedError, Verdict,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Workbench configuration
#[derive(Debug, Clone)]
pub struct WorkbenchConfig {
    /// Consult the contract checker before admitting an entity into a role
    pub enforce_contracts: bool,
    /// Ledger capacity
    pub max_log_entries: usize,
}

impl Default for WorkbenchConfig {
    fn default() -> Self {
        Self {
            enforce_contracts: true,
            max_log_entries: 10000,
        }
    }
}

/// Workbench - the place where entities are composed, invoked and checked
pub struct Workbench {
    /// Configuration
    config: WorkbenchConfig,
    /// Trait catalog
    registry: CapabilityRegistry,
    /// Role catalog
    checker: ContractChecker,
    /// Ledger of invocations and verdicts
    log: CheckLog,
    /// Named entities
    entities: BTreeMap<String, Entity>,
    /// Text side channel
    output: Arc<dyn OutputSink>,
}

impl Workbench {
    /// Create an empty workbench
    pub fn new(config: WorkbenchConfig, output: Arc<dyn OutputSink>) -> Self {
        Self {
            log: CheckLog::new(config.max_log_entries),
            config,
            registry: CapabilityRegistry::with_output(output.clone()),
            checker: ContractChecker::new(),
            entities: BTreeMap::new(),
            output,
        }
    }

    /// Build a workbench from a catalog: traits, then roles, then entities
    pub fn from_catalog(
        catalog: &Catalog,
        config: WorkbenchConfig,
        output: Arc<dyn OutputSink>,
    ) -> Result<Self> {
        let mut bench = Self::new(config, output);
        bench.registry.load_traits(&catalog.traits)?;
        bench.checker.load_roles(&catalog.roles)?;
        for spec in &catalog.entities {
            bench.load_entity(spec)?;
        }

        info!(
            traits = bench.registry.len(),
            roles = bench.checker.role_names().len(),
            entities = bench.entities.len(),
            "catalog loaded"
        );
        Ok(bench)
    }

    fn load_entity(&mut self, spec: &EntitySpec) -> Result<()> {
        let mut entity = Entity::new(spec.name.clone());
        if let Some(kind) = &spec.kind {
            entity = entity.with_kind(kind.clone());
        }
        for (name, op) in &spec.operations {
            entity.define_operation(name.clone(), op.to_operation()?);
        }
        self.registry.attach(&mut entity, &spec.traits)?;
        self.add_entity(entity)
    }

    /// Default configuration writing to stdout
    pub fn with_defaults() -> Self {
        Self::new(WorkbenchConfig::default(), Arc::new(ConsoleOutput))
    }

    pub fn config(&self) -> &WorkbenchConfig {
        &self.config
    }

    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut CapabilityRegistry {
        &mut self.registry
    }

    pub fn checker(&self) -> &ContractChecker {
        &self.checker
    }

    pub fn checker_mut(&mut self) -> &mut ContractChecker {
        &mut self.checker
    }

    pub fn log(&self) -> &CheckLog {
        &self.log
    }

    /// Enable or disable contract enforcement in `admit`
    pub fn set_enforce_contracts(&mut self, enforce: bool) {
        self.config.enforce_contracts = enforce;
    }

    /// Add a pre-built entity. Names are unique.
    pub fn add_entity(&mut self, entity: Entity) -> Result<()> {
        if self.entities.contains_key(entity.name()) {
            return Err(SolidError::Config(format!(
                "entity '{}' is defined more than once",
                entity.name()
            )));
        }
        self.entities.insert(entity.name().to_string(), entity);
        Ok(())
    }

    /// Create an entity with the given kind and traits
    pub fn spawn(&mut self, name: &str, kind: Option<&str>, traits: &[&str]) -> Result<&Entity> {
        let mut entity = Entity::new(name);
        if let Some(kind) = kind {
            entity = entity.with_kind(kind);
        }
        self.registry.attach(&mut entity, traits)?;
        self.add_entity(entity)?;
        self.entity(name)
    }

    /// Look up an entity by name
    pub fn entity(&self, name: &str) -> Result<&Entity> {
        self.entities
            .get(name)
            .ok_or_else(|| SolidError::UnknownEntity(name.to_string()))
    }

    /// Names of all entities, sorted
    pub fn entity_names(&self) -> Vec<&str> {
        self.entities.keys().map(|s| s.as_str()).collect()
    }

    /// Attach more traits to a named entity
    pub fn attach(&mut self, entity: &str, traits: &[&str]) -> Result<()> {
        let target = self
            .entities
            .get_mut(entity)
            .ok_or_else(|| SolidError::UnknownEntity(entity.to_string()))?;
        self.registry.attach(target, traits)?;
        Ok(())
    }

    /// Invoke an attached trait and record it
    pub fn invoke(&mut self, entity: &str, trait_name: &str, args: &[Value]) -> Result<Value> {
        let target = self
            .entities
            .get(entity)
            .ok_or_else(|| SolidError::UnknownEntity(entity.to_string()))?;

        let result = self.registry.invoke(target, trait_name, args);
        match &result {
            Ok(_) => self.log.log_invocation(entity, trait_name, true, None),
            Err(e) => self
                .log
                .log_invocation(entity, trait_name, false, Some(&e.to_string())),
        }
        result
    }

    /// Check an entity against a role and record the verdict
    pub fn check(&mut self, entity: &str, role: &str, operation: &str) -> Result<Verdict> {
        let target = self
            .entities
            .get(entity)
            .ok_or_else(|| SolidError::UnknownEntity(entity.to_string()))?;

        let verdict = self.checker.check_substitutable(target, role, operation)?;
        self.log.log_verdict(entity, role, operation, &verdict);
        Ok(verdict)
    }

    /// Use an entity where `role` is expected: perform `operation` on it.
    ///
    /// With enforcement on, the operation runs once in a guarded context
    /// and its outcome is judged against the contract. A violating entity
    /// is turned away with `SubstitutionDenied` and nothing is emitted.
    /// With enforcement off, the operation runs unguarded and its failure
    /// propagates.
    pub fn admit(
        &mut self,
        entity: &str,
        role: &str,
        operation: &str,
        args: &[Value],
    ) -> Result<Value> {
        let target = self
            .entities
            .get(entity)
            .ok_or_else(|| SolidError::UnknownEntity(entity.to_string()))?;

        let observed = if self.config.enforce_contracts {
            let contract = self.checker.resolve_role(role)?;
            let observed = ContractChecker::observe(target, operation, args);
            let verdict = ContractChecker::judge(contract, target, operation, &observed);
            self.log.log_verdict(entity, role, operation, &verdict);

            if let Verdict::Violation(violation) = verdict {
                warn!(entity, role, "admission denied");
                self.log.log_denial(&violation);
                return Err(SolidError::SubstitutionDenied(violation));
            }
            observed
        } else {
            target
                .perform(operation, args)
                .map_or(Outcome::Missing, Outcome::from)
        };

        match observed {
            Outcome::Success { value } => {
                if let Value::String(text) = &value {
                    self.output.emit(text);
                }
                self.log.log_invocation(entity, operation, true, None);
                Ok(value)
            }
            Outcome::Failure { failure } => {
                self.log
                    .log_invocation(entity, operation, false, Some(&failure.message));
                Err(SolidError::Operation(failure))
            }
            Outcome::Missing => {
                let missing = TraitNotAttachedError {
                    entity: entity.to_string(),
                    name: operation.to_string(),
                    attached_traits: target.trait_names().iter().map(|s| s.to_string()).collect(),
                };
                self.log
                    .log_invocation(entity, operation, false, Some(&missing.to_string()));
                Err(missing.into())
            }
        }
    }
}

impl Default for Workbench {
    fn default() -> Self {
        Self::with_defaults()
    }
}
