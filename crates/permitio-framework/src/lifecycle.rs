//! Validate, plan, apply, refresh and destroy a single resource instance.

use crate::diag::{DiagResult, Diagnostic, Diagnostics};
use crate::plan::{PlanAction, PlannedChange, plan_resource_change};
use crate::resource::{DynDataSource, DynResource};
use crate::schema::Schema;
use crate::validate::{check_config_validators, validate_config};
use crate::value::contains_unknown;
use serde_json::Value as Json;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Failure of [`Lifecycle::apply`].
#[derive(Debug, Clone, thiserror::Error)]
#[error("{diagnostics}")]
pub struct ApplyError {
    pub diagnostics: Diagnostics,
    /// The prior instance was deleted before the failure, so prior state no
    /// longer refers to a live object and must be discarded.
    pub prior_deleted: bool,
}

impl From<Diagnostics> for ApplyError {
    fn from(diagnostics: Diagnostics) -> Self {
        Self {
            diagnostics,
            prior_deleted: false,
        }
    }
}

/// Drives one resource type through its lifecycle.
#[derive(Clone)]
pub struct Lifecycle {
    type_name: String,
    resource: Arc<dyn DynResource>,
}

impl Lifecycle {
    pub fn new(type_name: impl Into<String>, resource: Arc<dyn DynResource>) -> Self {
        Self {
            type_name: type_name.into(),
            resource,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn schema(&self) -> Schema {
        self.resource.schema()
    }

    /// Schema checks, then cross-attribute rules, then the resource's own
    /// checks. Later stages only run when earlier ones pass.
    pub fn validate(&self, config: &Json) -> DiagResult<()> {
        let schema = self.resource.schema();
        validate_config(&schema, config).into_result(())?;
        check_config_validators(&self.resource.config_validators(), config).into_result(())?;
        self.resource.validate_config(config)
    }

    #[instrument(skip(self, prior, config), fields(type_name = %self.type_name))]
    pub fn plan(&self, prior: Option<&Json>, config: &Json) -> DiagResult<PlannedChange> {
        self.validate(config)?;
        let change = plan_resource_change(&self.resource.schema(), prior, config);
        debug!(action = change.action.as_str(), "Planned resource change");
        Ok(change)
    }

    /// Apply a planned change and return the new state.
    ///
    /// A replacement deletes the prior instance before creating the new one.
    /// When that create fails the error has `prior_deleted` set.
    #[instrument(skip(self, change, prior), fields(type_name = %self.type_name, action = change.action.as_str()))]
    pub async fn apply(
        &self,
        change: &PlannedChange,
        prior: Option<&Json>,
    ) -> Result<Json, ApplyError> {
        let planned = change.planned_state.clone();
        let state = match (change.action, prior) {
            (PlanAction::Noop, Some(prior)) => return Ok(prior.clone()),
            (PlanAction::Create, _) | (PlanAction::Noop, None) => {
                self.resource.create(planned).await?
            }
            (PlanAction::Update, Some(prior)) => {
                self.resource.update(planned, prior.clone()).await?
            }
            (PlanAction::Update, None) => {
                return Err(Diagnostics::from(Diagnostic::error(
                    "Missing prior state",
                    format!("Cannot update {} without prior state", self.type_name),
                ))
                .into());
            }
            (PlanAction::Replace, prior) => {
                let prior_deleted = match prior {
                    Some(prior) => {
                        self.resource.delete(prior.clone()).await?;
                        true
                    }
                    None => false,
                };
                self.resource.create(planned).await.map_err(|diagnostics| {
                    if prior_deleted {
                        warn!("Replacement failed after the prior instance was deleted");
                    }
                    ApplyError {
                        diagnostics,
                        prior_deleted,
                    }
                })?
            }
        };

        self.check_result(&state)?;
        info!("Applied resource change");
        Ok(state)
    }

    #[instrument(skip(self, state), fields(type_name = %self.type_name))]
    pub async fn refresh(&self, state: &Json) -> DiagResult<Json> {
        let refreshed = self.resource.read(state.clone()).await?;
        self.check_result(&refreshed)?;
        Ok(refreshed)
    }

    #[instrument(skip(self, state), fields(type_name = %self.type_name))]
    pub async fn destroy(&self, state: &Json) -> DiagResult<()> {
        self.resource.delete(state.clone()).await?;
        info!("Destroyed resource");
        Ok(())
    }

    fn check_result(&self, state: &Json) -> DiagResult<()> {
        if contains_unknown(state) {
            return Err(invalid_result(&self.type_name));
        }
        Ok(())
    }
}

fn invalid_result(type_name: &str) -> Diagnostics {
    Diagnostic::error(
        "Provider returned invalid result object after apply",
        format!(
            "After the apply operation, the provider still indicated an unknown value for {type_name}. \
             All values must be known after apply."
        ),
    )
    .into()
}

/// Validate a data source configuration and read it.
#[instrument(skip(data_source, config), fields(type_suffix = data_source.type_suffix()))]
pub async fn read_data_source(data_source: &dyn DynDataSource, config: &Json) -> DiagResult<Json> {
    validate_config(&data_source.schema(), config).into_result(())?;
    let state = data_source.read(config.clone()).await?;
    if contains_unknown(&state) {
        return Err(invalid_result(data_source.type_suffix()));
    }
    Ok(state)
}
