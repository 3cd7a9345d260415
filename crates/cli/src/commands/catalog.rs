//! solid catalog command

use crate::Context;
use clap::{Args, Subcommand};
use console::style;
use shared::{Catalog, NullOutput};
use std::sync::Arc;

#[derive(Debug, Args)]
pub struct CatalogCommand {
    #[command(subcommand)]
    pub command: CatalogSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum CatalogSubcommand {
    /// List traits, roles and entities
    List,
    /// Check the catalog for problems
    Validate,
}

impl CatalogCommand {
    pub fn run(&self, ctx: &Context) -> anyhow::Result<()> {
        match &self.command {
            CatalogSubcommand::List => {
                if ctx.json {
                    println!("{}", serde_json::to_string_pretty(&ctx.catalog)?);
                } else {
                    for line in render_listing(&ctx.catalog) {
                        println!("{}", line);
                    }
                }
            }
            CatalogSubcommand::Validate => {
                let mut problems = ctx.catalog.validate();
                if problems.is_empty() {
                    // Static checks pass; make sure it also builds
                    if let Err(e) = ctx.workbench(Arc::new(NullOutput)) {
                        problems.push(e.to_string());
                    }
                }

                if ctx.json {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&serde_json::json!({
                            "valid": problems.is_empty(),
                            "problems": problems,
                        }))?
                    );
                } else if problems.is_empty() {
                    println!("{} catalog is valid", style("✓").green());
                } else {
                    for problem in &problems {
                        println!("{} {}", style("✗").red(), problem);
                    }
                }

                if !problems.is_empty() {
                    anyhow::bail!("catalog has {} problem(s)", problems.len());
                }
            }
        }
        Ok(())
    }
}

/// Human-readable listing
pub fn render_listing(catalog: &Catalog) -> Vec<String> {
    let mut lines = vec![style("Traits:").bold().to_string()];
    for t in &catalog.traits {
        lines.push(format!("  {:<10} {}", t.name, t.description));
    }

    lines.push(style("Roles:").bold().to_string());
    for r in &catalog.roles {
        lines.push(format!(
            "  {:<10} expects {} ({})",
            r.name,
            r.invariant.expectation(),
            r.description
        ));
    }

    lines.push(style("Entities:").bold().to_string());
    for e in &catalog.entities {
        let mut surface: Vec<String> = e.traits.clone();
        surface.extend(e.operations.keys().map(|op| format!("{} (own)", op)));
        lines.push(format!(
            "  {:<10} {:<22} {}",
            e.name,
            e.kind.as_deref().unwrap_or("-"),
            surface.join(", ")
        ));
    }
    lines
}
