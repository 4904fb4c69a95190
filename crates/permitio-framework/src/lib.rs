//! Provider framework primitives.
//!
//! Typed tri-state values, schemas, plan modifiers, validators, diagnostics
//! and the plan/apply cycle for one resource instance. Resource adapters
//! implement [`Resource`] or [`DataSource`] and are served from a
//! [`Registry`].

pub mod diag;
pub mod lifecycle;
pub mod path;
pub mod plan;
pub mod registry;
pub mod resource;
pub mod schema;
pub mod validate;
pub mod value;

pub use async_trait::async_trait;
pub use diag::{DiagResult, Diagnostic, Diagnostics, Severity};
pub use lifecycle::{ApplyError, Lifecycle, read_data_source};
pub use path::AttributePath;
pub use plan::{PlanAction, PlannedChange, plan_resource_change};
pub use registry::{ProviderSchema, Registry};
pub use resource::{DataSource, DynDataSource, DynResource, Resource, unsupported_operation};
pub use schema::{
    Attribute, AttributeKind, ElementType, PlanModifier, REDACTED, Schema, StringValidator,
};
pub use validate::{ConfigValidator, validate_config};
pub use value::{UNKNOWN_SENTINEL, Value};

/// Everything an adapter module usually needs.
pub mod prelude {
    pub use crate::async_trait;
    pub use crate::diag::{DiagResult, Diagnostic, Diagnostics};
    pub use crate::path::AttributePath;
    pub use crate::resource::{DataSource, Resource, unsupported_operation};
    pub use crate::schema::{
        Attribute, ElementType, PlanModifier, Schema, StringValidator, attributes,
    };
    pub use crate::validate::ConfigValidator;
    pub use crate::value::Value;
}
