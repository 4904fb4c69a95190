//! terraform-provider-permitio - manage Permit.io policy objects from JSON files
//!
//! This CLI enables operators to:
//! - Print the provider, resource and data source schemas
//! - Validate and plan a resource configuration
//! - Apply, refresh and destroy a single instance tracked in a state file
//! - Read data sources

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use terraform_provider_permitio::commands::{self, Context};
use terraform_provider_permitio::logging::init_logging;
use terraform_provider_permitio::CliResult;

/// Permit.io provider host
#[derive(Parser)]
#[command(name = "terraform-provider-permitio")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Provider block (JSON). PERMITIO_* environment variables take precedence.
    #[arg(long, global = true, env = "PERMITIO_PROVIDER_CONFIG")]
    provider: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the provider, resource and data source schemas
    Schema(commands::schema::SchemaArgs),

    /// Validate a resource configuration
    Validate(commands::validate::ValidateArgs),

    /// Show the planned change for a resource configuration
    Plan(commands::plan::PlanArgs),

    /// Apply a resource configuration and write the new state
    Apply(commands::apply::ApplyArgs),

    /// Re-read a resource and rewrite its state
    Refresh(commands::refresh::RefreshArgs),

    /// Delete a resource and remove its state
    Destroy(commands::destroy::DestroyArgs),

    /// Read a data source
    ReadData(commands::read_data::ReadDataArgs),
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_logging(cli.log_json);

    match run(cli).await {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            e.print();
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    if let Commands::Schema(args) = cli.command {
        return commands::schema::execute(args);
    }

    let ctx = Context::load(cli.provider.as_deref())?;
    match cli.command {
        Commands::Schema(_) => Ok(()),
        Commands::Validate(args) => commands::validate::execute(args, &ctx),
        Commands::Plan(args) => commands::plan::execute(args, &ctx),
        Commands::Apply(args) => commands::apply::execute(args, &ctx).await,
        Commands::Refresh(args) => commands::refresh::execute(args, &ctx).await,
        Commands::Destroy(args) => commands::destroy::execute(args, &ctx).await,
        Commands::ReadData(args) => commands::read_data::execute(args, &ctx).await,
    }
}
