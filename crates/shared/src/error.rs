//! Error types for SOLID Kit

use crate::{ContractViolation, OperationFailure};
use thiserror::Error;

/// Error thrown when a trait name is registered twice
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Trait '{name}' is already defined")]
pub struct DuplicateTraitError {
    pub name: String,
}

/// Error thrown when attaching a trait that was never registered
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Trait '{name}' is not registered. Known traits: {}", known_traits.join(", "))]
pub struct UnknownTraitError {
    pub name: String,
    pub known_traits: Vec<String>,
}

/// Error thrown when invoking a trait the entity does not carry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Entity '{entity}' has no trait '{name}'. Attached traits: {}", attached_traits.join(", "))]
pub struct TraitNotAttachedError {
    pub entity: String,
    pub name: String,
    pub attached_traits: Vec<String>,
}

/// Error thrown when a role name is registered twice
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Role '{name}' is already registered")]
pub struct DuplicateRoleError {
    pub name: String,
}

/// Error thrown when checking against a role that was never registered
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Role '{name}' not found. Available roles: {}", known_roles.join(", "))]
pub struct UnknownRoleError {
    pub name: String,
    pub known_roles: Vec<String>,
}

/// General SOLID Kit error type
#[derive(Debug, Error)]
pub enum SolidError {
    #[error(transparent)]
    DuplicateTrait(#[from] DuplicateTraitError),

    #[error(transparent)]
    UnknownTrait(#[from] UnknownTraitError),

    #[error(transparent)]
    TraitNotAttached(#[from] TraitNotAttachedError),

    #[error(transparent)]
    DuplicateRole(#[from] DuplicateRoleError),

    #[error(transparent)]
    UnknownRole(#[from] UnknownRoleError),

    #[error("Operation failed: {0}")]
    Operation(#[from] OperationFailure),

    #[error("Substitution denied: {0}")]
    SubstitutionDenied(ContractViolation),

    #[error("Entity '{0}' not found")]
    UnknownEntity(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),
}

pub type Result<T> = std::result::Result<T, SolidError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_trait_lists_known() {
        let err = UnknownTraitError {
            name: "fly".to_string(),
            known_traits: vec!["swim".to_string(), "walk".to_string()],
        };

        assert_eq!(
            err.to_string(),
            "Trait 'fly' is not registered. Known traits: swim, walk"
        );
    }

    #[test]
    fn test_trait_not_attached_message() {
        let err = TraitNotAttachedError {
            entity: "Lucky".to_string(),
            name: "fly".to_string(),
            attached_traits: vec!["swim".to_string()],
        };

        assert!(err.to_string().contains("Lucky"));
        assert!(err.to_string().contains("fly"));
    }

    #[test]
    fn test_solid_error_is_transparent() {
        let err: SolidError = DuplicateRoleError {
            name: "Member".to_string(),
        }
        .into();

        assert!(matches!(err, SolidError::DuplicateRole(_)));
        assert_eq!(err.to_string(), "Role 'Member' is already registered");
    }
}
