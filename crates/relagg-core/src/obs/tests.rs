use super::*;
use crate::{
    aggregate::{AggregateCompiler, RawOptions},
    filter::SchemaFilterParser,
    test_fixtures::shop_catalog,
};
use relagg_schema::types::AggregateKind;

// Metrics state is thread-local; callers reset before counting.
fn compile_a_few() {
    let catalog = shop_catalog();
    let parser = SchemaFilterParser::new(&catalog);
    let compiler = AggregateCompiler::new(&catalog, &parser);

    compiler
        .compile(
            "order",
            "total_items",
            AggregateKind::Count,
            RawOptions::new().path(["line_items"]),
        )
        .unwrap();
    compiler
        .compile(
            "order",
            "amounts",
            AggregateKind::List,
            RawOptions::new().path(["line_items"]).field("amount"),
        )
        .unwrap();
    compiler
        .compile(
            "customer",
            "x",
            AggregateKind::Count,
            RawOptions::new().path(["invoices"]),
        )
        .unwrap_err();
}

#[test]
fn report_counts_compiles_by_resource_kind_and_error() {
    metrics_reset_all();
    compile_a_few();

    let report = metrics_report();

    assert_eq!(
        report.totals,
        CompileTotals {
            started: 3,
            finished: 2,
            failed: 1,
        }
    );
    assert_eq!(
        report.resources["order"],
        ResourceCounters {
            started: 2,
            finished: 2,
            failed: 0,
        }
    );
    assert_eq!(report.resources["customer"].failed, 1);
    assert_eq!(report.kinds["count"], 1);
    assert_eq!(report.kinds["list"], 1);
    assert_eq!(report.errors["no_such_relationship"], 1);
}

#[test]
fn reset_clears_everything() {
    compile_a_few();
    metrics_reset_all();

    assert_eq!(metrics_report(), CompileReport::default());
}

#[test]
fn report_serializes_for_diagnostics() {
    metrics_reset_all();
    compile_a_few();

    let json = serde_json::to_value(metrics_report()).unwrap();

    assert_eq!(json["totals"]["started"], 3);
    assert_eq!(json["resources"]["customer"]["failed"], 1);
    assert_eq!(json["errors"]["no_such_relationship"], 1);

    let back: CompileReport = serde_json::from_value(json).unwrap();
    assert_eq!(back, metrics_report());
}
