use crate::{error::ErrorTree, node::ResourceModel, validate::validate_catalog};
use std::collections::BTreeMap;
use thiserror::Error as ThisError;

///
/// CatalogError
///

#[derive(Debug, ThisError)]
pub enum CatalogError {
    #[error("resource '{0}' is registered more than once")]
    DuplicateResource(String),

    #[error("catalog validation failed: {0}")]
    Validation(ErrorTree),
}

///
/// Catalog
///
/// Read-only registry of resources keyed by name.
/// Only constructed through `CatalogBuilder`, which validates before handing
/// the catalog out.
///

#[derive(Clone, Debug, Default)]
pub struct Catalog {
    resources: BTreeMap<String, ResourceModel>,
}

impl Catalog {
    #[must_use]
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    #[must_use]
    pub fn resource(&self, name: &str) -> Option<&ResourceModel> {
        self.resources.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.resources.contains_key(name)
    }

    pub fn resources(&self) -> impl Iterator<Item = &ResourceModel> {
        self.resources.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

///
/// CatalogBuilder
///

#[derive(Debug, Default)]
pub struct CatalogBuilder {
    resources: Vec<ResourceModel>,
}

impl CatalogBuilder {
    #[must_use]
    pub fn resource(mut self, resource: ResourceModel) -> Self {
        self.resources.push(resource);
        self
    }

    /// Register every resource and run catalog validation.
    pub fn build(self) -> Result<Catalog, CatalogError> {
        let mut resources = BTreeMap::new();
        for resource in self.resources {
            if resources.contains_key(&resource.name) {
                return Err(CatalogError::DuplicateResource(resource.name));
            }
            resources.insert(resource.name.clone(), resource);
        }

        let catalog = Catalog { resources };
        validate_catalog(&catalog).map_err(CatalogError::Validation)?;

        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::RelationshipKind;

    #[test]
    fn duplicate_resources_are_rejected() {
        let err = Catalog::builder()
            .resource(ResourceModel::new("order", "postgres"))
            .resource(ResourceModel::new("order", "postgres"))
            .build()
            .expect_err("duplicate resource should fail");

        assert!(matches!(err, CatalogError::DuplicateResource(name) if name == "order"));
    }

    #[test]
    fn build_runs_validation() {
        let err = Catalog::builder()
            .resource(ResourceModel::new("order", "postgres").with_relationship(
                "line_items",
                RelationshipKind::HasMany,
                "line_item",
            ))
            .build()
            .expect_err("dangling destination should fail");

        let CatalogError::Validation(tree) = err else {
            panic!("expected validation error");
        };
        assert_eq!(tree.len(), 1);
    }
}
