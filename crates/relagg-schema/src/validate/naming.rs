use crate::{
    MAX_FIELD_NAME_LEN, MAX_RESOURCE_NAME_LEN, err, error::ErrorTree, node::ResourceModel,
};
use std::collections::BTreeSet;

// Validate resource, field and relationship identifiers for one resource.
pub fn validate_resource_naming(resource: &ResourceModel, errs: &mut ErrorTree) {
    validate_ident("resource", &resource.name, MAX_RESOURCE_NAME_LEN, errs);

    let mut seen = BTreeSet::new();
    let names = resource
        .fields
        .iter()
        .map(|field| field.name.as_str())
        .chain(resource.relationships.iter().map(|rel| rel.name.as_str()));

    for name in names {
        validate_ident("field", name, MAX_FIELD_NAME_LEN, errs);
        if !seen.insert(name) {
            err!(errs, "name '{name}' is declared more than once");
        }
    }
}

// At most one read action may be primary, and names must be unique.
pub fn validate_read_actions(resource: &ResourceModel, errs: &mut ErrorTree) {
    let primaries = resource
        .read_actions
        .iter()
        .filter(|action| action.primary)
        .count();
    if primaries > 1 {
        err!(errs, "{primaries} read actions are marked primary");
    }

    let mut seen = BTreeSet::new();
    for action in &resource.read_actions {
        if !seen.insert(action.name.as_str()) {
            err!(errs, "read action '{}' is declared more than once", action.name);
        }
    }
}

fn validate_ident(label: &str, ident: &str, max_len: usize, errs: &mut ErrorTree) {
    if ident.is_empty() {
        err!(errs, "{label} name is empty");
    } else if ident.len() > max_len {
        err!(errs, "{label} name '{ident}' exceeds {max_len} characters");
    }
}
