//! Request and response bodies of the Permit.io API.
//!
//! `*Create` and `*Update` structs are request bodies; `*Read` structs are
//! what the API returns. Optional request fields are omitted when `None`.

mod condition_sets;
mod proxy_configs;
mod relations;
mod resources;
mod roles;
mod scope;
mod tenants;

pub use condition_sets::{
    ConditionSetCreate, ConditionSetRead, ConditionSetType, ConditionSetUpdate, ResourceRef,
    SetRule, SetRuleRead,
};
pub use proxy_configs::{
    AuthMechanism, MappingRule, ProxyConfigCreate, ProxyConfigRead, ProxyConfigUpdate,
};
pub use relations::{DerivedRoleRule, RelationCreate, RelationRead};
pub use resources::{
    ActionBlock, ActionBlockRead, AttributeBlock, AttributeBlockRead, ResourceAttributeCreate,
    ResourceAttributeRead, ResourceAttributeUpdate, ResourceCreate, ResourceRead, ResourceUpdate,
};
pub use roles::{GrantedTo, RoleCreate, RoleRead, RoleUpdate};
pub use scope::ApiKeyScope;
pub use tenants::{TenantCreate, TenantRead, TenantUpdate};

use serde::{Deserialize, Serialize};

/// Identifiers shared by every object the API returns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectIds {
    pub id: String,
    pub organization_id: String,
    pub project_id: String,
    pub environment_id: String,
}
