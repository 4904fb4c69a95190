//! Managed resource adapters, one per Permit object type.

mod condition_set;
mod condition_set_rule;
mod proxy_config;
mod relation;
mod resource;
mod role;
mod role_derivation;
mod tenant;
mod user_attribute;

pub use condition_set::{ConditionSetModel, ConditionSetResource};
pub use condition_set_rule::{ConditionSetRuleModel, ConditionSetRuleResource};
pub use proxy_config::{
    AuthMechanismValidator, AuthSecretModel, MappingRuleModel, ProxyConfigModel,
    ProxyConfigResource,
};
pub use relation::{RelationModel, RelationResource};
pub use resource::{ActionModel, AttributeModel, ResourceModel, ResourceResource};
pub use role::{RoleModel, RoleResource, RoleScope};
pub use role_derivation::{RoleDerivationModel, RoleDerivationResource};
pub use tenant::{TenantModel, TenantResource};
pub use user_attribute::{USER_RESOURCE_KEY, UserAttributeModel, UserAttributeResource};
