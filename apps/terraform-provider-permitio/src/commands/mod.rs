//! Subcommand implementations.

pub mod apply;
pub mod destroy;
pub mod plan;
pub mod read_data;
pub mod refresh;
pub mod schema;
pub mod validate;

use crate::error::{CliError, CliResult};
use crate::files::read_json;
use clap::Args;
use permitio_framework::{DynDataSource, Lifecycle, Registry};
use permitio_provider::PermitProvider;
use serde::Serialize;
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Arguments shared by every command that operates on one type.
#[derive(Args, Debug, Clone)]
pub struct TypeArgs {
    /// Full type name, e.g. `permitio_role`
    #[arg(short = 't', long = "type")]
    pub type_name: String,
}

/// A configured provider.
pub struct Context {
    registry: Registry,
}

impl Context {
    /// Configure from an optional provider block file. Environment variables
    /// apply either way.
    pub fn load(provider: Option<&Path>) -> CliResult<Self> {
        let block = match provider {
            Some(path) => read_json(path)?,
            None => json!({}),
        };
        let registry = PermitProvider::configure(&block, |key| std::env::var(key))?;
        Ok(Self::new(registry))
    }

    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }

    pub fn lifecycle(&self, type_name: &str) -> CliResult<Lifecycle> {
        let resource = self.registry.resource(type_name).ok_or_else(|| CliError::UnknownType {
            kind: "resource",
            name: type_name.to_string(),
        })?;
        Ok(Lifecycle::new(type_name, resource))
    }

    pub fn data_source(&self, type_name: &str) -> CliResult<Arc<dyn DynDataSource>> {
        self.registry.data_source(type_name).ok_or_else(|| CliError::UnknownType {
            kind: "data source",
            name: type_name.to_string(),
        })
    }
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) fn state_path_or_read_error(path: &Path) -> CliResult<Value> {
    crate::files::read_state(path)?.ok_or_else(|| CliError::Read {
        path: PathBuf::from(path),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "state file does not exist"),
    })
}
