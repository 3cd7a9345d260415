//! Catalog configuration - traits, roles and entities described in YAML or JSON

use crate::{Capability, Invariant, Operation, RoleContract, SolidError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// Behaviour of an operation described in a catalog. Exactly one field must be set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationSpec {
    /// Text template to emit (`{name}`, `{kind}`, `{0}`...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub say: Option<String>,

    /// Failure message to raise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail: Option<String>,

    /// Fixed value to return
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returns: Option<Value>,
}

impl OperationSpec {
    pub fn say(template: impl Into<String>) -> Self {
        Self {
            say: Some(template.into()),
            ..Default::default()
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            fail: Some(message.into()),
            ..Default::default()
        }
    }

    /// Build the runtime operation
    pub fn to_operation(&self) -> crate::Result<Operation> {
        match (&self.say, &self.fail, &self.returns) {
            (Some(template), None, None) => Ok(Operation::say(template.clone())),
            (None, Some(message), None) => Ok(Operation::fail(message.clone())),
            (None, None, Some(value)) => Ok(Operation::returning(value.clone())),
            _ => Err(SolidError::Config(
                "operation must set exactly one of 'say', 'fail' or 'returns'".to_string(),
            )),
        }
    }
}

/// Trait definition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraitSpec {
    pub name: String,

    #[serde(default)]
    pub description: String,

    pub operation: OperationSpec,
}

impl TraitSpec {
    pub fn to_capability(&self) -> crate::Result<Capability> {
        Ok(Capability::new(self.name.clone(), self.operation.to_operation()?)
            .with_description(self.description.clone()))
    }
}

/// Role definition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleSpec {
    pub name: String,

    #[serde(default)]
    pub description: String,

    pub invariant: Invariant,
}

impl RoleSpec {
    pub fn to_contract(&self) -> RoleContract {
        RoleContract::new(self.name.clone(), self.invariant.clone())
            .with_description(self.description.clone())
    }
}

/// Entity definition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySpec {
    pub name: String,

    /// Kind label, e.g. `Dog`
    pub kind: Option<String>,

    /// Registered traits to attach
    #[serde(default)]
    pub traits: Vec<String>,

    /// Own operations, overriding traits of the same name
    #[serde(default)]
    pub operations: BTreeMap<String, OperationSpec>,
}

/// A full catalog file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    #[serde(default)]
    pub traits: Vec<TraitSpec>,

    #[serde(default)]
    pub roles: Vec<RoleSpec>,

    #[serde(default)]
    pub entities: Vec<EntitySpec>,
}

impl Catalog {
    /// Parse a YAML catalog
    pub fn from_yaml_str(content: &str) -> crate::Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Parse a JSON catalog
    pub fn from_json_str(content: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a catalog file (`.json` as JSON, anything else as YAML)
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content),
            _ => Self::from_yaml_str(&content),
        }
    }

    /// Load and merge every `*.yaml` / `*.yml` file in a directory, in path order
    pub fn load_directory(dir: &Path) -> crate::Result<Self> {
        let mut catalog = Catalog::default();
        if !dir.exists() {
            return Ok(catalog);
        }

        // The directory itself may contain glob metacharacters
        let base = Path::new(&glob::Pattern::escape(&dir.to_string_lossy())).to_path_buf();
        let mut paths = Vec::new();
        for ext in ["yaml", "yml"] {
            let pattern = base.join(format!("*.{}", ext));
            for entry in glob::glob(&pattern.to_string_lossy())? {
                match entry {
                    Ok(path) => paths.push(path),
                    Err(e) => return Err(SolidError::Io(e.into())),
                }
            }
        }
        paths.sort();

        for path in paths {
            catalog.merge(Self::from_file(&path)?);
        }
        Ok(catalog)
    }

    /// Load a file or a directory
    pub fn load(path: &Path) -> crate::Result<Self> {
        if path.is_dir() {
            Self::load_directory(path)
        } else {
            Self::from_file(path)
        }
    }

    /// Append another catalog's definitions
    pub fn merge(&mut self, other: Catalog) {
        self.traits.extend(other.traits);
        self.roles.extend(other.roles);
        self.entities.extend(other.entities);
    }

    /// Static checks. Returns a list of problems; empty means valid.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        let mut trait_names = HashSet::new();
        for t in &self.traits {
            if !trait_names.insert(t.name.as_str()) {
                problems.push(format!("trait '{}' is defined more than once", t.name));
            }
            if let Err(e) = t.operation.to_operation() {
                problems.push(format!("trait '{}': {}", t.name, e));
            }
        }

        let mut role_names = HashSet::new();
        for r in &self.roles {
            if !role_names.insert(r.name.as_str()) {
                problems.push(format!("role '{}' is defined more than once", r.name));
            }
        }

        let mut entity_names = HashSet::new();
        for e in &self.entities {
            if !entity_names.insert(e.name.as_str()) {
                problems.push(format!("entity '{}' is defined more than once", e.name));
            }
            for t in &e.traits {
                if !trait_names.contains(t.as_str()) {
                    problems.push(format!("entity '{}' uses unknown trait '{}'", e.name, t));
                }
            }
            for (op_name, op) in &e.operations {
                if let Err(err) = op.to_operation() {
                    problems.push(format!("entity '{}' operation '{}': {}", e.name, op_name, err));
                }
            }
        }

        problems
    }
}
