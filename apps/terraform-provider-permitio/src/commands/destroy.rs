//! Delete an instance and its state file.

use crate::commands::{Context, TypeArgs, print_json, state_path_or_read_error};
use crate::error::CliResult;
use crate::files::remove;
use clap::Args;
use serde_json::json;
use std::path::PathBuf;

/// Destroy one resource instance
#[derive(Args, Debug)]
pub struct DestroyArgs {
    #[command(flatten)]
    pub target: TypeArgs,

    #[arg(short = 's', long = "state")]
    pub state: PathBuf,
}

pub async fn execute(args: DestroyArgs, ctx: &Context) -> CliResult<()> {
    let lifecycle = ctx.lifecycle(&args.target.type_name)?;
    let state = state_path_or_read_error(&args.state)?;

    lifecycle.destroy(&state).await?;
    remove(&args.state)?;
    print_json(&json!({"type": args.target.type_name, "destroyed": true}))
}
