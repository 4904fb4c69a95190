//! Data sources: read-only lookups by key.

mod condition_set;
mod resource;
mod role;

pub use condition_set::{ConditionSetDataModel, ConditionSetDataSource};
pub use resource::ResourceDataSource;
pub use role::RoleDataSource;

use permitio_framework::AttributeKind;
use permitio_framework::prelude::*;
use std::collections::BTreeMap;

/// Turn a resource schema into a lookup schema: `required` keys stay
/// required, `optional` keys stay optional, everything else is computed.
pub(crate) fn lookup_schema(mut schema: Schema, required: &[&str], optional: &[&str]) -> Schema {
    for (name, attribute) in &mut schema.attributes {
        if required.contains(&name.as_str()) {
            *attribute = lookup(attribute.clone()).required();
        } else if optional.contains(&name.as_str()) {
            *attribute = lookup(attribute.clone()).optional();
        } else {
            computed_only(attribute);
        }
    }
    schema
}

fn lookup(mut attribute: Attribute) -> Attribute {
    attribute.required = false;
    attribute.optional = false;
    attribute.computed = false;
    attribute.plan_modifiers.clear();
    attribute
}

fn computed_only(attribute: &mut Attribute) {
    attribute.required = false;
    attribute.optional = false;
    attribute.computed = true;
    attribute.plan_modifiers.clear();
    attribute.validators.clear();
    if let Some(nested) = nested_mut(&mut attribute.kind) {
        nested.values_mut().for_each(computed_only);
    }
}

fn nested_mut(kind: &mut AttributeKind) -> Option<&mut BTreeMap<String, Attribute>> {
    match kind {
        AttributeKind::SingleNested { attributes }
        | AttributeKind::ListNested { attributes }
        | AttributeKind::MapNested { attributes } => Some(attributes),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_schema_flags() {
        let resource = Schema::new(attributes([
            (
                "key",
                Attribute::string()
                    .required()
                    .with_plan_modifier(PlanModifier::RequiresReplace),
            ),
            ("resource", Attribute::string().optional()),
            ("name", Attribute::string().required()),
            (
                "actions",
                Attribute::map_nested(attributes([("name", Attribute::string().required())])).required(),
            ),
        ]));

        let schema = lookup_schema(resource, &["key"], &["resource"]);
        let key = schema.attribute("key").unwrap();
        assert!(key.required && !key.computed && key.plan_modifiers.is_empty());
        assert!(schema.attribute("resource").unwrap().optional);
        assert!(schema.attribute("name").unwrap().is_read_only());

        let actions = schema.attribute("actions").unwrap();
        assert!(actions.is_read_only());
        assert!(actions.nested_attributes().unwrap()["name"].is_read_only());
    }
}
