//! solid demo command

use crate::Context;
use clap::{Args, ValueEnum};
use console::style;
use shared::{BufferedOutput, ConsoleOutput, OutputSink, SolidError};
use std::sync::Arc;
use tracing::debug;
use workbench::Workbench;

/// Traits each animal uses, in walkthrough order
const ANIMAL_ACTIONS: &[(&str, &str)] = &[
    ("Lucky", "walk"),
    ("Lucky", "swim"),
    ("Majesty", "walk"),
    ("Majesty", "fly"),
    ("Grey", "swim"),
];

/// Actions the animals were never given
const ANIMAL_REFUSALS: &[(&str, &str)] = &[("Lucky", "fly"), ("Grey", "walk")];

const MEMBERS: &[&str] = &["Frontend", "Backend", "Pilot"];
const COMPONENTS: &[&str] = &["Header", "Footer", "HOC"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Principle {
    /// Members at the secret door, components at the renderer
    Liskov,
    /// Animals composed from swim/fly/walk
    InterfaceSegregation,
    All,
}

#[derive(Debug, Args)]
pub struct DemoCommand {
    /// Walkthrough to replay
    #[arg(value_enum, default_value_t = Principle::All)]
    pub principle: Principle,

    /// Skip contract checks at the door and let failures surface at the point of use
    #[arg(long)]
    pub unguarded: bool,
}

impl DemoCommand {
    pub fn run(&self, ctx: &Context) -> anyhow::Result<()> {
        let buffer = Arc::new(BufferedOutput::new());
        let output: Arc<dyn OutputSink> = if ctx.json {
            buffer.clone() as Arc<dyn OutputSink>
        } else {
            Arc::new(ConsoleOutput)
        };

        let mut bench = ctx.workbench(output.clone())?;
        if matches!(self.principle, Principle::InterfaceSegregation | Principle::All) {
            interface_segregation(&mut bench, output.as_ref())?;
        }
        if matches!(self.principle, Principle::Liskov | Principle::All) {
            liskov_substitution(&mut bench, output.as_ref(), !self.unguarded)?;
        }

        if ctx.json {
            let report = serde_json::json!({
                "output": buffer.lines(),
                "ledger": bench.log().export_json(),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Ok(())
    }
}

/// Walkthrough cast members the loaded catalog actually defines
fn present<'a>(bench: &Workbench, entities: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
    entities
        .into_iter()
        .filter(|name| {
            let found = bench.entity(name).is_ok();
            if !found {
                debug!(entity = *name, "not in catalog, skipped");
            }
            found
        })
        .collect()
}

/// Each animal does what its traits allow and nothing more
pub fn interface_segregation(bench: &mut Workbench, out: &dyn OutputSink) -> shared::Result<()> {
    out.emit(&style("== Interface segregation ==").bold().to_string());

    for (entity, trait_name) in ANIMAL_ACTIONS.iter().chain(ANIMAL_REFUSALS) {
        if present(bench, [*entity]).is_empty() {
            continue;
        }
        match bench.invoke(entity, trait_name, &[]) {
            Ok(_) => {}
            Err(SolidError::TraitNotAttached(e)) => {
                out.emit(&format!("{} {}", style("✗").red(), e));
            }
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

/// Members go through the secret door, components go to the renderer
pub fn liskov_substitution(
    bench: &mut Workbench,
    out: &dyn OutputSink,
    guarded: bool,
) -> shared::Result<()> {
    out.emit(&style("== Liskov substitution ==").bold().to_string());
    bench.set_enforce_contracts(guarded);

    let gates: [(&str, &str, &[&str]); 2] =
        [("Member", "access", MEMBERS), ("Renderable", "render", COMPONENTS)];

    for (role, operation, entities) in gates {
        if !bench.checker().has_role(role) {
            debug!(role, "not in catalog, skipped");
            continue;
        }
        for entity in present(bench, entities.iter().copied()) {
            match bench.admit(entity, role, operation, &[]) {
                Ok(_) => {}
                Err(SolidError::SubstitutionDenied(violation)) => {
                    out.emit(&format!("{} denied: {}", style("✗").red(), violation));
                }
                Err(SolidError::Operation(failure)) => {
                    out.emit(&format!(
                        "{} '{}' failed at the point of use: {}",
                        style("!").yellow(),
                        entity,
                        failure
                    ));
                }
                Err(e) => return Err(e),
            }
        }
    }
    Ok(())
}
