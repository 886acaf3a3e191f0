use crate::{
    aggregate::{ancestor_stack, parse_join_filters},
    error::CompileError,
    expr::{Expr, FieldRef, eq, field, gt, lit, parent_field},
    filter::{FilterError, SchemaFilterParser},
    test_fixtures::shop_catalog,
};

fn path(hops: &[&str]) -> Vec<String> {
    hops.iter().map(ToString::to_string).collect()
}

#[test]
fn stack_lists_ancestors_nearest_first() {
    let catalog = shop_catalog();

    let (target, stack) =
        ancestor_stack(&catalog, "customer", &path(&["orders", "line_items", "product"])).unwrap();

    assert_eq!(target, "product");
    assert_eq!(stack, ["line_item", "order", "customer"]);
}

#[test]
fn single_hop_stack_is_the_origin() {
    let catalog = shop_catalog();

    let (target, stack) = ancestor_stack(&catalog, "order", &path(&["line_items"])).unwrap();

    assert_eq!(target, "line_item");
    assert_eq!(stack, ["order"]);
}

#[test]
fn filters_can_reach_ancestors() {
    let catalog = shop_catalog();
    let parser = SchemaFilterParser::new(&catalog);
    let grandparent_status: Expr = FieldRef::new("status").parent().parent().into();
    let expr = eq(field("category"), lit("tools"))
        .and(gt(parent_field("quantity"), 1))
        .and(eq(grandparent_status, lit("open")));

    let parsed = parse_join_filters(
        &catalog,
        &parser,
        "order",
        &[
            (path(&["line_items"]), eq(field("active"), lit(true))),
            (path(&["line_items", "product"]), expr),
        ],
    )
    .unwrap();

    assert_eq!(parsed.len(), 2);

    let product = &parsed[&path(&["line_items", "product"])];
    assert_eq!(product.resource, "product");
    assert_eq!(product.parent_stack, ["line_item", "order"]);

    let bound: Vec<_> = product
        .bindings
        .iter()
        .map(|b| (b.depth, b.resource.as_str(), b.field.as_str()))
        .collect();
    assert_eq!(
        bound,
        [
            (0, "product", "category"),
            (1, "line_item", "quantity"),
            (2, "order", "status"),
        ]
    );
}

#[test]
fn one_bad_filter_fails_the_whole_map() {
    let catalog = shop_catalog();
    let parser = SchemaFilterParser::new(&catalog);

    let err = parse_join_filters(
        &catalog,
        &parser,
        "order",
        &[
            (path(&["line_items"]), eq(field("active"), lit(true))),
            (path(&["line_items", "product"]), eq(field("colour"), lit("red"))),
        ],
    )
    .unwrap_err();

    assert_eq!(
        err,
        CompileError::InvalidJoinFilter {
            path: path(&["line_items", "product"]),
            source: FilterError::UnknownField {
                resource: "product".to_string(),
                field: "colour".to_string(),
            },
        }
    );
}

#[test]
fn unresolvable_paths_fail_like_the_path_validator() {
    let catalog = shop_catalog();
    let parser = SchemaFilterParser::new(&catalog);

    let err = parse_join_filters(
        &catalog,
        &parser,
        "order",
        &[(path(&["line_items", "vendor"]), eq(field("id"), lit(1)))],
    )
    .unwrap_err();

    assert_eq!(
        err,
        CompileError::NoSuchRelationship {
            resource: "line_item".to_string(),
            relationship: "vendor".to_string(),
        }
    );
}

#[test]
fn ancestors_beyond_the_origin_are_out_of_scope() {
    let catalog = shop_catalog();
    let parser = SchemaFilterParser::new(&catalog);
    let too_far: Expr = FieldRef::new("name").parent().parent().into();

    let err = parse_join_filters(
        &catalog,
        &parser,
        "order",
        &[(path(&["line_items"]), eq(too_far, lit("x")))],
    )
    .unwrap_err();

    assert!(matches!(
        err,
        CompileError::InvalidJoinFilter {
            source: FilterError::ParentOutOfScope {
                depth: 2,
                available: 1,
                ..
            },
            ..
        }
    ));
}
