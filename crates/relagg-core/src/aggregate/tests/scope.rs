use crate::{
    aggregate::{ScopeInput, build_scoped_query},
    error::{CompileError, ScopeViolation},
    expr::{eq, field, gt, lit, parent_field},
    filter::{FilterParser, SchemaFilterParser},
    query::{Query, QueryContext, QueryOption, SortKey},
    test_fixtures::shop_catalog,
};
use proptest::prelude::*;

#[test]
fn no_input_is_an_empty_query_over_the_destination() {
    let catalog = shop_catalog();
    let parser = SchemaFilterParser::new(&catalog);
    let ctx = QueryContext::new(&catalog, &parser);

    let query = build_scoped_query(&ctx, "order", "line_item", None).unwrap();

    assert_eq!(query, Query::new("line_item"));
}

#[test]
fn option_filters_are_scoped_against_the_owner() {
    let catalog = shop_catalog();
    let parser = SchemaFilterParser::new(&catalog);
    let ctx = QueryContext::new(&catalog, &parser);
    let input = ScopeInput::Options(vec![
        QueryOption::Filter(eq(field("active"), lit(true))),
        QueryOption::Sort(vec![SortKey::asc("quantity")]),
        QueryOption::Load(vec!["product".to_string()]),
        QueryOption::Offset(0),
        QueryOption::Filter(eq(parent_field("status"), lit("open"))),
    ]);

    let query = build_scoped_query(&ctx, "order", "line_item", Some(&input)).unwrap();

    assert!(query.is_valid(), "unexpected errors: {:?}", query.errors());
    assert_eq!(query.sort_keys(), &[SortKey::asc("quantity")]);
    assert!(query.loads().is_empty());
    assert_eq!(query.offset_value(), None);

    // both filters are conjoined into one, parsed with the owner as parent
    assert_eq!(query.filters().len(), 1);
    let filter = &query.filters()[0];
    assert_eq!(filter.parent_stack, ["order"]);
    assert_eq!(filter.bindings[1].resource, "order");
}

#[test]
fn option_filter_errors_surface_on_the_query() {
    let catalog = shop_catalog();
    let parser = SchemaFilterParser::new(&catalog);
    let ctx = QueryContext::new(&catalog, &parser);
    let input = ScopeInput::Options(vec![QueryOption::Filter(eq(field("colour"), lit("red")))]);

    let query = build_scoped_query(&ctx, "order", "line_item", Some(&input)).unwrap();

    assert!(!query.is_valid());
    assert_eq!(query.errors().len(), 1);
}

#[test]
fn limit_is_rejected_from_options() {
    let catalog = shop_catalog();
    let parser = SchemaFilterParser::new(&catalog);
    let ctx = QueryContext::new(&catalog, &parser);
    let input = ScopeInput::Options(vec![QueryOption::Limit(5)]);

    let err = build_scoped_query(&ctx, "order", "line_item", Some(&input)).unwrap_err();

    assert_eq!(err, CompileError::QueryScope(ScopeViolation::Limit));
    assert_eq!(err.to_string(), "cannot set limit on aggregate query");
}

#[test]
fn prepared_queries_are_only_stripped() {
    let catalog = shop_catalog();
    let parser = SchemaFilterParser::new(&catalog);
    let ctx = QueryContext::new(&catalog, &parser);

    // filters already on the query are kept as parsed, without the owner
    let filter = parser
        .parse("line_item", &gt(field("quantity"), 1), &[])
        .unwrap();
    let prepared = Query::new("line_item")
        .filter(filter.clone())
        .load(["product"])
        .offset(0);

    let query =
        build_scoped_query(&ctx, "order", "line_item", Some(&ScopeInput::Query(prepared))).unwrap();

    assert_eq!(query.filters(), &[filter]);
    assert!(query.loads().is_empty());
    assert_eq!(query.offset_value(), None);
}

#[test]
fn prepared_queries_with_pagination_are_rejected() {
    let catalog = shop_catalog();
    let parser = SchemaFilterParser::new(&catalog);
    let ctx = QueryContext::new(&catalog, &parser);

    let limited = ScopeInput::Query(Query::new("line_item").limit(10));
    let offset = ScopeInput::Query(Query::new("line_item").offset(3));

    assert_eq!(
        build_scoped_query(&ctx, "order", "line_item", Some(&limited)),
        Err(CompileError::QueryScope(ScopeViolation::Limit))
    );
    assert_eq!(
        build_scoped_query(&ctx, "order", "line_item", Some(&offset)),
        Err(CompileError::QueryScope(ScopeViolation::Offset))
    );
}

proptest! {
    #[test]
    fn only_a_zero_offset_is_accepted(offset in 0u32..1000, prepared in any::<bool>()) {
        let catalog = shop_catalog();
        let parser = SchemaFilterParser::new(&catalog);
        let ctx = QueryContext::new(&catalog, &parser);
        let input = if prepared {
            ScopeInput::Query(Query::new("line_item").offset(offset))
        } else {
            ScopeInput::Options(vec![QueryOption::Offset(offset)])
        };

        let result = build_scoped_query(&ctx, "order", "line_item", Some(&input));

        if offset == 0 {
            prop_assert_eq!(result.map(|q| q.offset_value()), Ok(None));
        } else {
            prop_assert_eq!(result, Err(CompileError::QueryScope(ScopeViolation::Offset)));
        }
    }

    #[test]
    fn any_limit_is_rejected(limit in any::<u32>()) {
        let catalog = shop_catalog();
        let parser = SchemaFilterParser::new(&catalog);
        let ctx = QueryContext::new(&catalog, &parser);
        let input = ScopeInput::Options(vec![QueryOption::Limit(limit), QueryOption::Offset(0)]);

        prop_assert_eq!(
            build_scoped_query(&ctx, "order", "line_item", Some(&input)),
            Err(CompileError::QueryScope(ScopeViolation::Limit))
        );
    }
}
