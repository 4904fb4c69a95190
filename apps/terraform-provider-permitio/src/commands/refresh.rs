//! Re-read an instance and rewrite its state file.

use crate::commands::{Context, TypeArgs, print_json, state_path_or_read_error};
use crate::error::CliResult;
use crate::files::write_json;
use clap::Args;
use std::path::PathBuf;

/// Refresh the state of one resource instance
#[derive(Args, Debug)]
pub struct RefreshArgs {
    #[command(flatten)]
    pub target: TypeArgs,

    #[arg(short = 's', long = "state")]
    pub state: PathBuf,
}

pub async fn execute(args: RefreshArgs, ctx: &Context) -> CliResult<()> {
    let lifecycle = ctx.lifecycle(&args.target.type_name)?;
    let state = state_path_or_read_error(&args.state)?;

    let refreshed = lifecycle.refresh(&state).await?;
    write_json(&args.state, &refreshed)?;
    print_json(&lifecycle.schema().redact(&refreshed))
}
