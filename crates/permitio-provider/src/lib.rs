//! Permit.io resource and data source adapters.
//!
//! Each adapter maps a typed Terraform model onto `permitio-client` calls.
//! [`PermitProvider::configure`] resolves the provider block and returns a
//! [`permitio_framework::Registry`] holding every adapter.

pub mod common;
pub mod config;
pub mod data_sources;
pub mod provider;
pub mod resources;

pub use config::{ENV_API_KEY, ENV_API_URL, ENV_DEBUG, ENV_TIMEOUT, ProviderModel, resolve_from_env};
pub use provider::{PermitProvider, TYPE_NAME};
