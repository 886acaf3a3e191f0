//! Relationship path resolution and validation.

use crate::{error::CompileError, traits::ResourceMetadata};
use relagg_schema::node::RelationshipModel;

/// Resolve `path` hop by hop from `resource`, innermost relationship first.
pub fn path_to_reversed_relationships<'m, M: ResourceMetadata>(
    metadata: &'m M,
    resource: &str,
    path: &[String],
) -> Result<Vec<&'m RelationshipModel>, CompileError> {
    fn walk<'m, M: ResourceMetadata>(
        metadata: &'m M,
        current: &str,
        rest: &[String],
        mut acc: Vec<&'m RelationshipModel>,
    ) -> Result<Vec<&'m RelationshipModel>, CompileError> {
        let Some((hop, rest)) = rest.split_first() else {
            acc.reverse();
            return Ok(acc);
        };

        let rel = metadata
            .relationship(current, hop)
            .ok_or_else(|| CompileError::NoSuchRelationship {
                resource: current.to_string(),
                relationship: hop.clone(),
            })?;
        acc.push(rel);

        walk(metadata, &rel.destination, rest, acc)
    }

    walk(metadata, resource, path, Vec::with_capacity(path.len()))
}

/// Resolve `path` hop by hop from `resource`, in traversal order.
pub fn resolve_relationship_chain<'m, M: ResourceMetadata>(
    metadata: &'m M,
    resource: &str,
    path: &[String],
) -> Result<Vec<&'m RelationshipModel>, CompileError> {
    let mut chain = path_to_reversed_relationships(metadata, resource, path)?;
    chain.reverse();

    Ok(chain)
}

/// Resource at the end of `path`; `resource` itself for the empty path.
pub fn related_resource<'a, M: ResourceMetadata>(
    metadata: &'a M,
    resource: &'a str,
    path: &[String],
) -> Result<&'a str, CompileError> {
    let reversed = path_to_reversed_relationships(metadata, resource, path)?;

    Ok(reversed
        .first()
        .map_or(resource, |rel| rel.destination.as_str()))
}

/// Walk `path` from `resource`, checking that every hop exists, can be read,
/// and stays on the originating resource's data layer. Stops at the first
/// failure.
pub fn validate_path<M: ResourceMetadata>(
    metadata: &M,
    resource: &str,
    path: &[String],
) -> Result<(), CompileError> {
    let origin = metadata
        .storage_backend_of(resource)
        .ok_or_else(|| CompileError::UnknownResource {
            resource: resource.to_string(),
        })?;

    let mut current = resource;
    for hop in path {
        let rel = metadata
            .relationship(current, hop)
            .ok_or_else(|| CompileError::NoSuchRelationship {
                resource: current.to_string(),
                relationship: hop.clone(),
            })?;

        ensure_readable(metadata, rel)?;

        let destination = metadata
            .storage_backend_of(&rel.destination)
            .ok_or_else(|| CompileError::UnknownResource {
                resource: rel.destination.clone(),
            })?;
        if destination != origin {
            return Err(CompileError::CrossDataLayer {
                relationship: rel.name.clone(),
                origin: origin.clone(),
                destination: destination.clone(),
            });
        }

        current = &rel.destination;
    }

    Ok(())
}

// The destination must expose the relationship's read action (or a primary
// read), and many-to-many join resources must be readable too.
fn ensure_readable<M: ResourceMetadata>(
    metadata: &M,
    rel: &RelationshipModel,
) -> Result<(), CompileError> {
    let action = rel.read_action.as_deref();
    if metadata
        .read_capability_of(&rel.destination, action)
        .is_none()
    {
        return Err(CompileError::NoReadAction {
            resource: rel.destination.clone(),
            action: rel.read_action.clone(),
        });
    }

    if let Some(through) = rel.through()
        && metadata.read_capability_of(through, None).is_none()
    {
        return Err(CompileError::NoReadAction {
            resource: through.to_string(),
            action: None,
        });
    }

    Ok(())
}
