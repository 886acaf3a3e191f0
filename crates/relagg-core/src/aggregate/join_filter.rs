//! Per-hop join filters.

use crate::{
    aggregate::path::path_to_reversed_relationships,
    error::CompileError,
    expr::Expr,
    filter::{FilterParser, ParsedFilter},
    traits::ResourceMetadata,
};
use std::collections::BTreeMap;

///
/// JoinFilters
/// Parsed join filters keyed by relationship path.
///

pub type JoinFilters = BTreeMap<Vec<String>, ParsedFilter>;

/// Parse every `(path, expr)` entry against the resource the path lands on,
/// with the ancestor resources of that hop as the parent stack.
///
/// Any failure aborts the whole map.
pub fn parse_join_filters<M, P>(
    metadata: &M,
    parser: &P,
    resource: &str,
    entries: &[(Vec<String>, Expr)],
) -> Result<JoinFilters, CompileError>
where
    M: ResourceMetadata,
    P: FilterParser,
{
    let mut parsed = JoinFilters::new();

    for (path, expr) in entries {
        let (target, parent_stack) = ancestor_stack(metadata, resource, path)?;

        let filter = parser
            .parse(&target, expr, &parent_stack)
            .map_err(|source| CompileError::InvalidJoinFilter {
                path: path.clone(),
                source,
            })?;

        parsed.insert(path.clone(), filter);
    }

    Ok(parsed)
}

/// Resource a join path lands on, plus its ancestors nearest first and the
/// originating resource last.
pub fn ancestor_stack<M: ResourceMetadata>(
    metadata: &M,
    resource: &str,
    path: &[String],
) -> Result<(String, Vec<String>), CompileError> {
    let reversed = path_to_reversed_relationships(metadata, resource, path)?;

    let Some((innermost, outer)) = reversed.split_first() else {
        return Ok((resource.to_string(), Vec::new()));
    };

    let mut stack: Vec<String> = outer.iter().map(|rel| rel.destination.clone()).collect();
    let origin = reversed
        .last()
        .map_or(resource, |rel| rel.source.as_str());
    stack.push(origin.to_string());

    Ok((innermost.destination.clone(), stack))
}
