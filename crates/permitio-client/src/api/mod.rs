//! Endpoint methods, one module per REST family.

mod condition_sets;
mod implicit_grants;
mod proxy_configs;
mod relations;
mod resource_attributes;
mod resources;
mod roles;
mod set_rules;
mod tenants;
