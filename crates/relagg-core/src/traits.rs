use relagg_schema::{
    catalog::Catalog,
    node::{FieldModel, ReadActionModel, RelationshipModel, ResourceModel},
    types::DataLayer,
};

///
/// ResourceMetadata
///
/// Read-only view over the resource catalog. The compiler never writes
/// through it, so one catalog can back any number of concurrent compiles.
///

pub trait ResourceMetadata {
    fn resource(&self, name: &str) -> Option<&ResourceModel>;

    fn relationships_of(&self, resource: &str) -> Option<&[RelationshipModel]> {
        self.resource(resource)
            .map(|model| model.relationships.as_slice())
    }

    fn fields_of(&self, resource: &str) -> Option<&[FieldModel]> {
        self.resource(resource).map(|model| model.fields.as_slice())
    }

    fn relationship(&self, resource: &str, name: &str) -> Option<&RelationshipModel> {
        self.resource(resource)?.relationship(name)
    }

    fn field(&self, resource: &str, name: &str) -> Option<&FieldModel> {
        self.resource(resource)?.field(name)
    }

    /// Named read action, or the primary read when `action` is `None`.
    fn read_capability_of(&self, resource: &str, action: Option<&str>) -> Option<&ReadActionModel> {
        self.resource(resource)?.read_action(action)
    }

    fn storage_backend_of(&self, resource: &str) -> Option<&DataLayer> {
        self.resource(resource).map(|model| &model.data_layer)
    }
}

impl ResourceMetadata for Catalog {
    fn resource(&self, name: &str) -> Option<&ResourceModel> {
        Self::resource(self, name)
    }
}
