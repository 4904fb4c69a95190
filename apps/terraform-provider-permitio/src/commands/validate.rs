//! Validate a resource configuration without touching the API.

use crate::commands::{Context, TypeArgs, print_json};
use crate::error::CliResult;
use crate::files::read_json;
use clap::Args;
use serde_json::json;
use std::path::PathBuf;

/// Run schema and configuration validation
#[derive(Args, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub target: TypeArgs,

    /// Resource configuration (JSON)
    #[arg(short = 'c', long = "config")]
    pub config: PathBuf,
}

pub fn execute(args: ValidateArgs, ctx: &Context) -> CliResult<()> {
    let lifecycle = ctx.lifecycle(&args.target.type_name)?;
    let config = read_json(&args.config)?;
    lifecycle.validate(&config)?;
    print_json(&json!({"type": args.target.type_name, "valid": true}))
}
