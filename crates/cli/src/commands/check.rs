//! solid check command

use crate::Context;
use clap::Args;
use console::style;
use shared::{NullOutput, Verdict};
use std::sync::Arc;

#[derive(Debug, Args)]
pub struct CheckCommand {
    /// Entity to check
    #[arg(short, long)]
    pub entity: String,

    /// Role the entity claims
    #[arg(short, long)]
    pub role: String,

    /// Operation the role relies on
    #[arg(short, long)]
    pub operation: String,
}

impl CheckCommand {
    pub fn run(&self, ctx: &Context) -> anyhow::Result<()> {
        let mut bench = ctx.workbench(Arc::new(NullOutput))?;
        let verdict = bench.check(&self.entity, &self.role, &self.operation)?;

        if ctx.json {
            println!("{}", serde_json::to_string_pretty(&verdict)?);
        } else {
            println!("{}", self.describe(&verdict));
        }
        Ok(())
    }

    fn describe(&self, verdict: &Verdict) -> String {
        match verdict {
            Verdict::Pass => format!(
                "{} '{}' can stand in for '{}' on '{}'",
                style("✓").green(),
                self.entity,
                self.role,
                self.operation
            ),
            Verdict::Violation(violation) => format!("{} {}", style("✗").red(), violation),
        }
    }
}
