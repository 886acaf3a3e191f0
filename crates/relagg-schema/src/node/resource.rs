use crate::{
    node::{FieldModel, ReadActionModel, RelationshipKind, RelationshipModel},
    types::DataLayer,
};
use serde::Serialize;

///
/// ResourceModel
///
/// Everything the compiler needs to know about one resource.
/// Fields and relationships share a namespace; validation rejects overlaps.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResourceModel {
    pub name: String,
    pub data_layer: DataLayer,
    pub fields: Vec<FieldModel>,
    pub relationships: Vec<RelationshipModel>,
    pub read_actions: Vec<ReadActionModel>,
}

impl ResourceModel {
    #[must_use]
    pub fn new(name: impl Into<String>, data_layer: impl Into<DataLayer>) -> Self {
        Self {
            name: name.into(),
            data_layer: data_layer.into(),
            fields: Vec::new(),
            relationships: Vec::new(),
            read_actions: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_field(mut self, field: FieldModel) -> Self {
        self.fields.push(field);
        self
    }

    /// Add a relationship whose source is this resource.
    #[must_use]
    pub fn with_relationship(
        self,
        name: impl Into<String>,
        kind: RelationshipKind,
        destination: impl Into<String>,
    ) -> Self {
        let relationship = RelationshipModel::new(name, kind, self.name.clone(), destination);

        self.with_relationship_model(relationship)
    }

    #[must_use]
    pub fn with_relationship_model(mut self, relationship: RelationshipModel) -> Self {
        self.relationships.push(relationship);
        self
    }

    #[must_use]
    pub fn with_read_action(mut self, action: ReadActionModel) -> Self {
        self.read_actions.push(action);
        self
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldModel> {
        self.fields.iter().find(|field| field.name == name)
    }

    #[must_use]
    pub fn relationship(&self, name: &str) -> Option<&RelationshipModel> {
        self.relationships.iter().find(|rel| rel.name == name)
    }

    /// Resolve a read action by name, or the primary read action when `name`
    /// is `None`. A resource with read actions but none marked primary falls
    /// back to its first one.
    #[must_use]
    pub fn read_action(&self, name: Option<&str>) -> Option<&ReadActionModel> {
        match name {
            Some(name) => self.read_actions.iter().find(|action| action.name == name),
            None => self
                .read_actions
                .iter()
                .find(|action| action.primary)
                .or_else(|| self.read_actions.first()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldType;

    fn order() -> ResourceModel {
        ResourceModel::new("order", "postgres")
            .with_field(FieldModel::attribute("id", FieldType::Uuid))
            .with_relationship("line_items", RelationshipKind::HasMany, "line_item")
            .with_read_action(ReadActionModel::new("archived"))
            .with_read_action(ReadActionModel::primary("read"))
    }

    #[test]
    fn relationship_source_is_owner() {
        let order = order();
        let rel = order.relationship("line_items").expect("relationship should exist");

        assert_eq!(rel.source, "order");
        assert_eq!(rel.destination, "line_item");
        assert!(rel.is_many());
        assert_eq!(rel.through(), None);
    }

    #[test]
    fn read_action_prefers_primary_then_first() {
        let order = order();
        assert_eq!(
            order.read_action(None).map(|a| a.name.as_str()),
            Some("read")
        );
        assert_eq!(
            order.read_action(Some("archived")).map(|a| a.name.as_str()),
            Some("archived")
        );
        assert!(order.read_action(Some("missing")).is_none());

        let no_primary =
            ResourceModel::new("tag", "postgres").with_read_action(ReadActionModel::new("list"));
        assert_eq!(
            no_primary.read_action(None).map(|a| a.name.as_str()),
            Some("list")
        );
        assert!(ResourceModel::new("bare", "postgres").read_action(None).is_none());
    }
}
