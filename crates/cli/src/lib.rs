//! SOLID Kit CLI library - shared context for commands

pub mod commands;

use shared::{Catalog, OutputSink};
use std::path::Path;
use std::sync::Arc;
use workbench::{Workbench, WorkbenchConfig};

/// Catalog compiled into the binary
pub const BUILTIN_CATALOG: &str = include_str!("../catalog/solid.yaml");

/// State shared by all commands
#[derive(Debug, Clone)]
pub struct Context {
    pub catalog: Catalog,
    pub json: bool,
}

impl Context {
    /// Load the catalog at `path`, or the built-in one
    pub fn load(path: Option<&Path>, json: bool) -> shared::Result<Self> {
        let catalog = match path {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading catalog");
                Catalog::load(path)?
            }
            None => Catalog::from_yaml_str(BUILTIN_CATALOG)?,
        };
        Ok(Self { catalog, json })
    }

    /// Build a workbench over the catalog
    pub fn workbench(&self, output: Arc<dyn OutputSink>) -> shared::Result<Workbench> {
        Workbench::from_catalog(&self.catalog, WorkbenchConfig::default(), output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::NullOutput;

    #[test]
    fn test_builtin_catalog_is_valid() {
        let ctx = Context::load(None, false).unwrap();

        assert!(ctx.catalog.validate().is_empty());
        let bench = ctx.workbench(Arc::new(NullOutput)).unwrap();
        assert!(bench.entity("Lucky").is_ok());
        assert!(bench.checker().has_role("Member"));
    }

    #[test]
    fn test_load_catalog_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zoo.yaml");
        std::fs::write(
            &path,
            "traits:\n  - name: swim\n    operation: { say: \"{name} can swim\" }\n",
        )
        .unwrap();

        let ctx = Context::load(Some(&path), true).unwrap();
        assert!(ctx.json);
        assert_eq!(ctx.catalog.traits.len(), 1);
    }
}
