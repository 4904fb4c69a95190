//! Read a data source.

use crate::commands::{Context, TypeArgs, print_json};
use crate::error::CliResult;
use crate::files::read_json;
use clap::Args;
use permitio_framework::read_data_source;
use std::path::PathBuf;

/// Look up an existing object through a data source
#[derive(Args, Debug)]
pub struct ReadDataArgs {
    #[command(flatten)]
    pub target: TypeArgs,

    /// Data source configuration (JSON)
    #[arg(short = 'c', long = "config")]
    pub config: PathBuf,
}

pub async fn execute(args: ReadDataArgs, ctx: &Context) -> CliResult<()> {
    let data_source = ctx.data_source(&args.target.type_name)?;
    let config = read_json(&args.config)?;
    let values = read_data_source(data_source.as_ref(), &config).await?;
    print_json(&values)
}
