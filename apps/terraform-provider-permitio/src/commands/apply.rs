//! Plan and apply a configuration, then persist the new state.

use crate::commands::{Context, TypeArgs, print_json};
use crate::error::CliResult;
use crate::files::{read_json, read_state, remove, write_json};
use clap::Args;
use permitio_framework::PlanAction;
use serde_json::json;
use std::path::PathBuf;
use tracing::{info, warn};

/// Apply a configuration to one resource instance
#[derive(Args, Debug)]
pub struct ApplyArgs {
    #[command(flatten)]
    pub target: TypeArgs,

    /// Resource configuration (JSON)
    #[arg(short = 'c', long = "config")]
    pub config: PathBuf,

    /// State file; created when missing, rewritten after apply
    #[arg(short = 's', long = "state")]
    pub state: PathBuf,
}

pub async fn execute(args: ApplyArgs, ctx: &Context) -> CliResult<()> {
    let lifecycle = ctx.lifecycle(&args.target.type_name)?;
    let config = read_json(&args.config)?;
    let prior = read_state(&args.state)?;

    let change = lifecycle.plan(prior.as_ref(), &config)?;
    if change.action == PlanAction::Noop {
        info!(type_name = %args.target.type_name, "No changes");
        return print_json(&json!({"action": change.action, "changed": false}));
    }

    let state = match lifecycle.apply(&change, prior.as_ref()).await {
        Ok(state) => state,
        Err(err) => {
            if err.prior_deleted {
                remove(&args.state)?;
                warn!(
                    type_name = %args.target.type_name,
                    state = %args.state.display(),
                    "Prior instance was deleted; state file removed"
                );
            }
            return Err(err.diagnostics.into());
        }
    };
    write_json(&args.state, &state)?;
    info!(
        type_name = %args.target.type_name,
        action = change.action.as_str(),
        state = %args.state.display(),
        "State written"
    );
    let shown = lifecycle.schema().redact(&state);
    print_json(&json!({"action": change.action, "changed": true, "state": shown}))
}
