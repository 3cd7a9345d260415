//! solid invoke command

use crate::Context;
use clap::Args;
use serde_json::Value;
use shared::{BufferedOutput, ConsoleOutput, OutputSink};
use std::sync::Arc;

#[derive(Debug, Args)]
pub struct InvokeCommand {
    /// Entity to act
    #[arg(short, long)]
    pub entity: String,

    /// Attached trait to invoke
    #[arg(short = 't', long = "trait")]
    pub trait_name: String,

    /// Arguments, parsed as JSON when possible
    pub args: Vec<String>,
}

impl InvokeCommand {
    pub fn run(&self, ctx: &Context) -> anyhow::Result<()> {
        let output: Arc<dyn OutputSink> = if ctx.json {
            Arc::new(BufferedOutput::new())
        } else {
            Arc::new(ConsoleOutput)
        };
        let mut bench = ctx.workbench(output)?;

        let value = bench.invoke(&self.entity, &self.trait_name, &self.parsed_args())?;
        if ctx.json {
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        Ok(())
    }

    /// `42` and `{"a":1}` become JSON values, anything else a string
    pub fn parsed_args(&self) -> Vec<Value> {
        self.args
            .iter()
            .map(|arg| serde_json::from_str(arg).unwrap_or_else(|_| Value::String(arg.clone())))
            .collect()
    }
}
