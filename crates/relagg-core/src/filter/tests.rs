use super::*;
use crate::{
    expr::{FieldRef, eq, field, gt, is_null, lit, parent_field},
    test_fixtures::shop_catalog,
};
use relagg_schema::types::FieldType;

fn stack(names: &[&str]) -> Vec<String> {
    names.iter().map(ToString::to_string).collect()
}

#[test]
fn local_fields_bind_to_the_filtered_resource() {
    let catalog = shop_catalog();
    let parser = SchemaFilterParser::new(&catalog);

    let parsed = parser
        .parse("line_item", &gt(field("quantity"), 2), &[])
        .expect("quantity should resolve");

    assert_eq!(parsed.resource, "line_item");
    assert!(parsed.parent_stack.is_empty());
    assert_eq!(
        parsed.bindings,
        vec![BoundField {
            depth: 0,
            resource: "line_item".to_string(),
            field: "quantity".to_string(),
            ty: Some(FieldType::Integer),
        }]
    );
}

#[test]
fn parent_references_walk_the_stack() {
    let catalog = shop_catalog();
    let parser = SchemaFilterParser::new(&catalog);
    let expr = eq(field("category"), lit("tools"))
        .and(is_null(parent_field("note")))
        .and(eq(
            Expr::Field(FieldRef::new("status").parent().parent()),
            lit("open"),
        ));

    let parsed = parser
        .parse("product", &expr, &stack(&["line_item", "order"]))
        .expect("ancestor references should resolve");

    let owners: Vec<_> = parsed
        .bindings
        .iter()
        .map(|b| (b.depth, b.resource.as_str(), b.field.as_str()))
        .collect();
    assert_eq!(
        owners,
        vec![
            (0, "product", "category"),
            (1, "line_item", "note"),
            (2, "order", "status"),
        ]
    );
}

#[test]
fn references_beyond_the_stack_fail() {
    let catalog = shop_catalog();
    let parser = SchemaFilterParser::new(&catalog);
    let expr = is_null(Expr::Field(FieldRef::new("status").parent().parent()));

    let err = parser
        .parse("line_item", &expr, &stack(&["order"]))
        .expect_err("only one ancestor is in scope");

    assert_eq!(
        err,
        FilterError::ParentOutOfScope {
            field: "parent(parent(status))".to_string(),
            depth: 2,
            available: 1,
        }
    );
}

#[test]
fn relationship_paths_inside_references_are_followed() {
    let catalog = shop_catalog();
    let parser = SchemaFilterParser::new(&catalog);
    let expr = eq(
        Expr::Field(FieldRef::new("category").through(["product"])),
        lit("tools"),
    );

    let parsed = parser
        .parse("line_item", &expr, &[])
        .expect("product.category should resolve");
    assert_eq!(parsed.bindings[0].resource, "product");

    let bad = eq(
        Expr::Field(FieldRef::new("category").through(["vendor"])),
        lit("tools"),
    );
    assert_eq!(
        parser.parse("line_item", &bad, &[]),
        Err(FilterError::UnknownRelationship {
            resource: "line_item".to_string(),
            relationship: "vendor".to_string(),
        })
    );
}

#[test]
fn unknown_fields_and_resources_are_rejected() {
    let catalog = shop_catalog();
    let parser = SchemaFilterParser::new(&catalog);

    assert_eq!(
        parser.parse("line_item", &is_null(field("colour")), &[]),
        Err(FilterError::UnknownField {
            resource: "line_item".to_string(),
            field: "colour".to_string(),
        })
    );
    assert_eq!(
        parser.parse("warehouse", &lit(true), &[]),
        Err(FilterError::UnknownResource {
            resource: "warehouse".to_string(),
        })
    );
}

#[test]
fn aggregate_fields_bind_without_declared_type() {
    let catalog = shop_catalog();
    let parser = SchemaFilterParser::new(&catalog);

    let parsed = parser
        .parse("order", &gt(field("item_count"), 0), &[])
        .expect("aggregate fields are referencable");

    assert_eq!(parsed.bindings[0].ty, None);
}
