use crate::{
    expr::{Expr, FieldRef},
    filter::{BoundField, FilterError, FilterParser, ParsedFilter},
    traits::ResourceMetadata,
};

///
/// SchemaFilterParser
/// Binds filter references against catalog metadata.
///

pub struct SchemaFilterParser<'m, M: ResourceMetadata> {
    metadata: &'m M,
}

impl<'m, M: ResourceMetadata> SchemaFilterParser<'m, M> {
    #[must_use]
    pub const fn new(metadata: &'m M) -> Self {
        Self { metadata }
    }

    // Resolve one reference: pick its scope, walk its relationship path, then
    // find the field on whatever resource that lands on.
    fn bind(
        &self,
        resource: &str,
        parent_stack: &[String],
        field: &FieldRef,
    ) -> Result<BoundField, FilterError> {
        let scope = if field.parent == 0 {
            resource
        } else {
            parent_stack
                .get(field.parent - 1)
                .map(String::as_str)
                .ok_or_else(|| FilterError::ParentOutOfScope {
                    field: field.to_string(),
                    depth: field.parent,
                    available: parent_stack.len(),
                })?
        };

        let mut current = scope;
        for hop in &field.path {
            let rel = self.metadata.relationship(current, hop).ok_or_else(|| {
                FilterError::UnknownRelationship {
                    resource: current.to_string(),
                    relationship: hop.clone(),
                }
            })?;
            current = rel.destination.as_str();
        }

        let model = self
            .metadata
            .field(current, &field.name)
            .ok_or_else(|| FilterError::UnknownField {
                resource: current.to_string(),
                field: field.name.clone(),
            })?;

        Ok(BoundField {
            depth: field.parent,
            resource: current.to_string(),
            field: field.name.clone(),
            ty: model.declared_type().cloned(),
        })
    }
}

impl<M: ResourceMetadata> FilterParser for SchemaFilterParser<'_, M> {
    fn parse(
        &self,
        resource: &str,
        expr: &Expr,
        parent_stack: &[String],
    ) -> Result<ParsedFilter, FilterError> {
        if self.metadata.resource(resource).is_none() {
            return Err(FilterError::UnknownResource {
                resource: resource.to_string(),
            });
        }

        let bindings = expr
            .field_refs()
            .into_iter()
            .map(|field| self.bind(resource, parent_stack, field))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ParsedFilter {
            resource: resource.to_string(),
            parent_stack: parent_stack.to_vec(),
            expr: expr.clone(),
            bindings,
        })
    }
}
