use crate::{
    aggregate::{
        path_to_reversed_relationships, related_resource, resolve_relationship_chain,
        validate_path,
    },
    error::CompileError,
    test_fixtures::shop_catalog,
};
use relagg_schema::types::DataLayer;

fn path(hops: &[&str]) -> Vec<String> {
    hops.iter().map(ToString::to_string).collect()
}

#[test]
fn empty_path_is_trivially_valid() {
    let catalog = shop_catalog();

    assert_eq!(validate_path(&catalog, "order", &[]), Ok(()));
    assert_eq!(related_resource(&catalog, "order", &[]), Ok("order"));
}

#[test]
fn chain_is_reversed_once() {
    let catalog = shop_catalog();
    let hops = path(&["orders", "line_items", "product"]);

    let reversed: Vec<_> = path_to_reversed_relationships(&catalog, "customer", &hops)
        .unwrap()
        .into_iter()
        .map(|rel| rel.name.as_str())
        .collect();
    let forward: Vec<_> = resolve_relationship_chain(&catalog, "customer", &hops)
        .unwrap()
        .into_iter()
        .map(|rel| rel.name.as_str())
        .collect();

    assert_eq!(reversed, ["product", "line_items", "orders"]);
    assert_eq!(forward, ["orders", "line_items", "product"]);
    assert_eq!(related_resource(&catalog, "customer", &hops), Ok("product"));
}

#[test]
fn unknown_hop_is_named() {
    let catalog = shop_catalog();

    let err = validate_path(&catalog, "order", &path(&["line_items", "warehouse"])).unwrap_err();

    assert_eq!(
        err,
        CompileError::NoSuchRelationship {
            resource: "line_item".to_string(),
            relationship: "warehouse".to_string(),
        }
    );
}

#[test]
fn destination_needs_a_read_action() {
    let catalog = shop_catalog();

    let err = validate_path(&catalog, "order", &path(&["shipments"])).unwrap_err();

    assert_eq!(
        err,
        CompileError::NoReadAction {
            resource: "shipment".to_string(),
            action: None,
        }
    );
}

#[test]
fn relationship_read_action_must_exist_on_destination() {
    let catalog = shop_catalog();

    assert_eq!(
        validate_path(&catalog, "order", &path(&["active_items"])),
        Ok(())
    );
    assert_eq!(
        validate_path(&catalog, "order", &path(&["archived_items"])),
        Err(CompileError::NoReadAction {
            resource: "line_item".to_string(),
            action: Some("archived".to_string()),
        })
    );
}

#[test]
fn many_to_many_join_resource_needs_a_read_action() {
    let catalog = shop_catalog();

    assert_eq!(validate_path(&catalog, "order", &path(&["tags"])), Ok(()));
    assert_eq!(
        validate_path(&catalog, "order", &path(&["labels"])),
        Err(CompileError::NoReadAction {
            resource: "order_label".to_string(),
            action: None,
        })
    );
}

#[test]
fn crossing_data_layers_is_rejected() {
    let catalog = shop_catalog();

    assert_eq!(
        validate_path(&catalog, "order", &path(&["audits"])),
        Err(CompileError::CrossDataLayer {
            relationship: "audits".to_string(),
            origin: DataLayer::new("postgres"),
            destination: DataLayer::new("ets"),
        })
    );
}

#[test]
fn first_failure_wins() {
    let catalog = shop_catalog();

    // shipments fails before the unknown hop after it is ever looked at
    let err = validate_path(&catalog, "order", &path(&["shipments", "nowhere"])).unwrap_err();

    assert!(matches!(err, CompileError::NoReadAction { .. }));
}

#[test]
fn unknown_origin_is_reported() {
    let catalog = shop_catalog();

    assert_eq!(
        validate_path(&catalog, "warehouse", &[]),
        Err(CompileError::UnknownResource {
            resource: "warehouse".to_string(),
        })
    );
}
