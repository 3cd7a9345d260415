//! ContractChecker - Role contracts and substitutability checks

use serde_json::Value;
use shared::{
    ContractViolation, DuplicateRoleError, Entity, Invariant, OperationFailure, Outcome,
    RoleContract, RoleSpec, UnknownRoleError, Verdict,
};
use std::any::Any;
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, warn};

/// ContractChecker evaluates entities against registered role contracts.
///
/// A check is single-shot: perform the operation, observe the outcome,
/// evaluate the invariant. The entity is only borrowed immutably and
/// nothing is emitted.
#[derive(Debug, Default)]
pub struct ContractChecker {
    /// All registered roles, write-once per name
    roles: BTreeMap<String, RoleContract>,
}

impl ContractChecker {
    /// Create an empty checker
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a role from a name and an invariant
    pub fn register_role(
        &mut self,
        name: impl Into<String>,
        invariant: Invariant,
    ) -> Result<&RoleContract, DuplicateRoleError> {
        self.register(RoleContract::new(name, invariant))
    }

    /// Register a fully built contract. The first registration of a name wins.
    pub fn register(&mut self, contract: RoleContract) -> Result<&RoleContract, DuplicateRoleError> {
        if self.roles.contains_key(&contract.name) {
            return Err(DuplicateRoleError {
                name: contract.name,
            });
        }

        debug!(role = %contract.name, expect = %contract.invariant.expectation(), "role registered");
        let name = contract.name.clone();
        Ok(&*self.roles.entry(name).or_insert(contract))
    }

    /// Register every role of a catalog
    pub fn load_roles(&mut self, specs: &[RoleSpec]) -> Result<(), DuplicateRoleError> {
        for spec in specs {
            self.register(spec.to_contract())?;
        }
        Ok(())
    }

    /// Get a role by name
    pub fn get_role(&self, name: &str) -> Option<&RoleContract> {
        self.roles.get(name)
    }

    /// Check if role exists
    pub fn has_role(&self, name: &str) -> bool {
        self.roles.contains_key(name)
    }

    /// Names of all registered roles, sorted
    pub fn role_names(&self) -> Vec<&str> {
        self.roles.keys().map(|s| s.as_str()).collect()
    }

    /// Check whether `entity` honours `role_name` when performing `operation`
    pub fn check_substitutable(
        &self,
        entity: &Entity,
        role_name: &str,
        operation: &str,
    ) -> Result<Verdict, UnknownRoleError> {
        self.check_substitutable_with(entity, role_name, operation, &[])
    }

    /// Same as `check_substitutable`, passing arguments to the operation
    pub fn check_substitutable_with(
        &self,
        entity: &Entity,
        role_name: &str,
        operation: &str,
        args: &[Value],
    ) -> Result<Verdict, UnknownRoleError> {
        let role = self.resolve_role(role_name)?;
        let observed = Self::observe(entity, operation, args);
        Ok(Self::judge(role, entity, operation, &observed))
    }

    /// Get a role by name, or an error listing the known roles
    pub fn resolve_role(&self, name: &str) -> Result<&RoleContract, UnknownRoleError> {
        self.get_role(name).ok_or_else(|| UnknownRoleError {
            name: name.to_string(),
            known_roles: self.role_names().iter().map(|s| s.to_string()).collect(),
        })
    }

    /// Evaluate an already observed outcome against a role
    pub fn judge(role: &RoleContract, entity: &Entity, operation: &str, observed: &Outcome) -> Verdict {
        if role.invariant.holds(observed) {
            debug!(entity = entity.name(), role = %role.name, operation, "substitutable");
            return Verdict::Pass;
        }

        let violation = ContractViolation {
            entity: entity.name().to_string(),
            role: role.name.clone(),
            operation: operation.to_string(),
            expected: role.invariant.expectation(),
            observed: observed.clone(),
        };
        warn!(%violation, "contract violation");
        Verdict::Violation(violation)
    }

    /// Perform an operation in a guarded context. Returned errors and
    /// panics both become `Outcome::Failure`.
    ///
    /// The process panic hook is left alone, so a caught panic still
    /// prints its message to stderr.
    pub fn observe(entity: &Entity, operation: &str, args: &[Value]) -> Outcome {
        let attempt = panic::catch_unwind(AssertUnwindSafe(|| entity.perform(operation, args)));

        match attempt {
            Ok(Some(result)) => Outcome::from(result),
            Ok(None) => Outcome::Missing,
            Err(payload) => Outcome::Failure {
                failure: OperationFailure::panicked(panic_message(payload.as_ref())),
            },
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
