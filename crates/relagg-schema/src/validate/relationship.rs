use crate::{
    catalog::Catalog,
    err,
    error::ErrorTree,
    node::FieldSource,
    types::AggregateKind,
};

// Every relationship must start at its owner and land on a registered resource.
pub fn validate_relationship_targets(catalog: &Catalog, errors: &mut ErrorTree) {
    for resource in catalog.resources() {
        let mut errs = ErrorTree::new();

        for rel in &resource.relationships {
            let mut rel_errs = ErrorTree::new();

            if rel.source != resource.name {
                err!(
                    rel_errs,
                    "source '{}' does not match owning resource '{}'",
                    rel.source,
                    resource.name
                );
            }
            if !catalog.contains(&rel.destination) {
                err!(
                    rel_errs,
                    "destination '{}' is not a registered resource",
                    rel.destination
                );
            }
            if let Some(through) = rel.through()
                && !catalog.contains(through)
            {
                err!(
                    rel_errs,
                    "join resource '{through}' is not a registered resource"
                );
            }

            errs.merge(rel.name.clone(), rel_errs);
        }

        errors.merge(resource.name.clone(), errs);
    }
}

// Declared custom aggregates must carry both a result type and an implementation.
pub fn validate_aggregate_declarations(catalog: &Catalog, errors: &mut ErrorTree) {
    for resource in catalog.resources() {
        let mut errs = ErrorTree::new();

        for field in &resource.fields {
            let FieldSource::Aggregate(agg) = &field.source else {
                continue;
            };
            if agg.kind != AggregateKind::Custom {
                continue;
            }
            if agg.ty.is_none() {
                errs.add_at(field.name.clone(), "custom aggregate requires a type");
            }
            if agg.implementation.is_none() {
                errs.add_at(
                    field.name.clone(),
                    "custom aggregate requires an implementation",
                );
            }
        }

        errors.merge(resource.name.clone(), errs);
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        catalog::{Catalog, CatalogError},
        node::{AggregateFieldModel, FieldModel, RelationshipKind, RelationshipModel, ResourceModel},
        types::{AggregateKind, FieldType},
    };

    fn validation_errors(builder: crate::catalog::CatalogBuilder) -> Vec<(String, String)> {
        match builder.build() {
            Err(CatalogError::Validation(tree)) => tree.flatten(),
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn missing_join_resource_is_reported_under_relationship_route() {
        let errors = validation_errors(
            Catalog::builder()
                .resource(ResourceModel::new("order", "postgres").with_relationship(
                    "tags",
                    RelationshipKind::ManyToMany {
                        through: "order_tag".to_string(),
                    },
                    "tag",
                ))
                .resource(ResourceModel::new("tag", "postgres")),
        );

        assert_eq!(
            errors,
            vec![(
                "order.tags".to_string(),
                "join resource 'order_tag' is not a registered resource".to_string()
            )]
        );
    }

    #[test]
    fn foreign_source_is_reported() {
        let errors = validation_errors(
            Catalog::builder()
                .resource(
                    ResourceModel::new("order", "postgres").with_relationship_model(
                        RelationshipModel::new(
                            "customer",
                            RelationshipKind::BelongsTo,
                            "invoice",
                            "customer",
                        ),
                    ),
                )
                .resource(ResourceModel::new("customer", "postgres")),
        );

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].0, "order.customer");
    }

    #[test]
    fn custom_aggregate_declaration_needs_type_and_implementation() {
        let errors = validation_errors(Catalog::builder().resource(
            ResourceModel::new("order", "postgres").with_field(FieldModel::aggregate(
                "score",
                AggregateFieldModel::new(AggregateKind::Custom, Vec::<String>::new()),
            )),
        ));
        assert_eq!(errors.len(), 2);

        let ok = Catalog::builder()
            .resource(
                ResourceModel::new("order", "postgres").with_field(FieldModel::aggregate(
                    "score",
                    AggregateFieldModel::new(AggregateKind::Custom, Vec::<String>::new())
                        .ty(FieldType::Float)
                        .implementation("score_impl"),
                )),
            )
            .build();
        assert!(ok.is_ok());
    }
}
