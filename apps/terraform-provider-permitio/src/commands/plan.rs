//! Show what applying a configuration would do.

use crate::commands::{Context, TypeArgs, print_json};
use crate::error::CliResult;
use crate::files::{read_json, read_state};
use clap::Args;
use std::path::PathBuf;

/// Plan a change to one resource instance
#[derive(Args, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub target: TypeArgs,

    /// Resource configuration (JSON)
    #[arg(short = 'c', long = "config")]
    pub config: PathBuf,

    /// Current state; omit or point at a missing file to plan a create
    #[arg(short = 's', long = "state")]
    pub state: Option<PathBuf>,
}

pub fn execute(args: PlanArgs, ctx: &Context) -> CliResult<()> {
    let lifecycle = ctx.lifecycle(&args.target.type_name)?;
    let config = read_json(&args.config)?;
    let prior = match &args.state {
        Some(path) => read_state(path)?,
        None => None,
    };

    let mut change = lifecycle.plan(prior.as_ref(), &config)?;
    change.planned_state = lifecycle.schema().redact(&change.planned_state);
    print_json(&change)
}
