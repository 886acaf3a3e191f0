use relagg_schema::{
    catalog::Catalog,
    node::{
        AggregateFieldModel, ArgumentModel, CalculationModel, FieldModel, ReadActionModel,
        RelationshipKind, RelationshipModel, ResourceModel,
    },
    types::{AggregateKind, Constraints, FieldType},
    value::Value,
};

///
/// shop_catalog
///
/// Shared test catalog:
/// - customer → orders → line_items → product, all on postgres
/// - order → tags through order_tag (readable join)
/// - order → labels through order_label (join without read actions)
/// - order → audits on ets
/// - order → shipments (destination without read actions)
/// - node → children, with two aggregates that aggregate each other
///
pub fn shop_catalog() -> Catalog {
    Catalog::builder()
        .resource(customer())
        .resource(order())
        .resource(line_item())
        .resource(product())
        .resource(readable("tag").with_field(FieldModel::attribute("name", FieldType::Text)))
        .resource(readable("order_tag"))
        .resource(readable("label"))
        .resource(ResourceModel::new("order_label", "postgres"))
        .resource(
            ResourceModel::new("audit", "ets")
                .with_field(FieldModel::attribute("message", FieldType::Text))
                .with_read_action(ReadActionModel::primary("read")),
        )
        .resource(
            ResourceModel::new("shipment", "postgres")
                .with_field(FieldModel::attribute("carrier", FieldType::Text)),
        )
        .resource(node())
        .build()
        .expect("shop catalog should validate")
}

fn readable(name: &str) -> ResourceModel {
    ResourceModel::new(name, "postgres")
        .with_field(FieldModel::attribute("id", FieldType::Uuid))
        .with_read_action(ReadActionModel::primary("read"))
}

fn customer() -> ResourceModel {
    readable("customer")
        .with_field(FieldModel::attribute("name", FieldType::Text))
        .with_field(FieldModel::attribute("active", FieldType::Boolean))
        .with_field(FieldModel::aggregate(
            "order_count",
            AggregateFieldModel::new(AggregateKind::Count, ["orders"]),
        ))
        .with_relationship("orders", RelationshipKind::HasMany, "order")
}

fn order() -> ResourceModel {
    readable("order")
        .with_field(FieldModel::attribute("status", FieldType::Text))
        .with_field(FieldModel::attribute_with(
            "total",
            FieldType::Decimal,
            Constraints::new().with("precision", 12).with("scale", 2),
        ))
        .with_field(FieldModel::attribute("created_at", FieldType::Timestamp))
        .with_field(FieldModel::aggregate(
            "item_count",
            AggregateFieldModel::new(AggregateKind::Count, ["line_items"]),
        ))
        .with_relationship("line_items", RelationshipKind::HasMany, "line_item")
        .with_relationship_model(
            RelationshipModel::new(
                "active_items",
                RelationshipKind::HasMany,
                "order",
                "line_item",
            )
            .with_read_action("active_only"),
        )
        .with_relationship_model(
            RelationshipModel::new(
                "archived_items",
                RelationshipKind::HasMany,
                "order",
                "line_item",
            )
            .with_read_action("archived"),
        )
        .with_relationship("customer", RelationshipKind::BelongsTo, "customer")
        .with_relationship(
            "tags",
            RelationshipKind::ManyToMany {
                through: "order_tag".to_string(),
            },
            "tag",
        )
        .with_relationship(
            "labels",
            RelationshipKind::ManyToMany {
                through: "order_label".to_string(),
            },
            "label",
        )
        .with_relationship("audits", RelationshipKind::HasMany, "audit")
        .with_relationship("shipments", RelationshipKind::HasMany, "shipment")
}

fn line_item() -> ResourceModel {
    readable("line_item")
        .with_field(FieldModel::attribute("quantity", FieldType::Integer))
        .with_field(FieldModel::attribute_with(
            "amount",
            FieldType::Decimal,
            Constraints::new().with("precision", 10),
        ))
        .with_field(FieldModel::attribute("active", FieldType::Boolean))
        .with_field(FieldModel::attribute("note", FieldType::Text))
        .with_field(FieldModel::calculation(
            "subtotal",
            CalculationModel::new(FieldType::Decimal)
                .with_implementation("line_subtotal")
                .with_argument(
                    ArgumentModel::new("discount", FieldType::Decimal)
                        .with_default(Value::decimal("0")),
                ),
        ))
        .with_relationship("product", RelationshipKind::BelongsTo, "product")
        .with_relationship("order", RelationshipKind::BelongsTo, "order")
        .with_read_action(ReadActionModel::new("active_only"))
}

fn product() -> ResourceModel {
    readable("product")
        .with_field(FieldModel::attribute("name", FieldType::Text))
        .with_field(FieldModel::attribute("category", FieldType::Text))
        .with_field(FieldModel::attribute("price", FieldType::Decimal))
        .with_relationship("line_items", RelationshipKind::HasMany, "line_item")
}

fn node() -> ResourceModel {
    readable("node")
        .with_field(FieldModel::attribute("weight", FieldType::Integer))
        .with_field(FieldModel::aggregate(
            "ping",
            AggregateFieldModel::new(AggregateKind::Max, ["children"]).field("pong"),
        ))
        .with_field(FieldModel::aggregate(
            "pong",
            AggregateFieldModel::new(AggregateKind::Max, ["children"]).field("ping"),
        ))
        .with_relationship("children", RelationshipKind::HasMany, "node")
}
