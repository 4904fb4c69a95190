//! Permit.io API client.
//!
//! A typed `reqwest` client for the schema and facts families of the
//! Permit.io v2 API: resources, roles, condition sets and set rules,
//! relations and implicit grants, proxy configs, tenants and resource
//! attributes.
//!
//! ```no_run
//! use permitio_client::{PermitClient, PermitConfig};
//!
//! # async fn run() -> permitio_client::PermitResult<()> {
//! let client = PermitClient::new(PermitConfig::new("permit_key_..."))?;
//! let role = client.get_role("viewer").await?;
//! println!("{}", role.name);
//! # Ok(())
//! # }
//! ```

mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod models;

pub use client::{PermitClient, USER_AGENT};
pub use config::{DEFAULT_API_URL, DEFAULT_TIMEOUT, PermitConfig};
pub use error::{PermitError, PermitResult};
