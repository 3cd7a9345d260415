//! SOLID Kit CLI - Command-line interface
//!
//! Usage:
//!   solid demo [liskov|interface-segregation|all]    - Replay the walkthroughs
//!   solid check --entity <e> --role <r> --operation <o> - Check substitutability
//!   solid invoke --entity <e> --trait <t> [args...]     - Invoke an attached trait
//!   solid catalog list|validate                         - Inspect the catalog

use clap::{Parser, Subcommand};
use cli::commands::{CatalogCommand, CheckCommand, DemoCommand, InvokeCommand};
use cli::Context;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "solid")]
#[command(about = "SOLID Kit - Capability composition and role contract checks")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Catalog file or directory (defaults to the built-in catalog)
    #[arg(short, long, global = true)]
    catalog: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay the teaching walkthroughs
    Demo(DemoCommand),
    /// Check whether an entity can stand in for a role
    Check(CheckCommand),
    /// Invoke a trait attached to an entity
    Invoke(InvokeCommand),
    /// Inspect the catalog
    Catalog(CatalogCommand),
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let ctx = Context::load(cli.catalog.as_deref(), cli.json)?;

    match cli.command {
        Commands::Demo(cmd) => cmd.run(&ctx),
        Commands::Check(cmd) => cmd.run(&ctx),
        Commands::Invoke(cmd) => cmd.run(&ctx),
        Commands::Catalog(cmd) => cmd.run(&ctx),
    }
}
