//! Aggregation scope construction.

use crate::{
    error::{CompileError, ScopeViolation},
    expr::Expr,
    filter::FilterParser,
    query::{Query, QueryClause, QueryContext, QueryOption},
    traits::ResourceMetadata,
};

///
/// ScopeInput
/// Base scope supplied with an aggregate request.
///

#[derive(Clone, Debug, PartialEq)]
pub enum ScopeInput {
    /// Build options; any filters are scoped against the owning resource.
    Options(Vec<QueryOption>),
    /// A prepared query whose filters are taken as already scoped.
    Query(Query),
}

/// Build the query an aggregate over `related` is evaluated in.
///
/// Pagination is rejected. A query carrying build errors is returned as is;
/// the caller decides whether that fails the compile.
pub fn build_scoped_query<M, P>(
    ctx: &QueryContext<'_, M, P>,
    owner: &str,
    related: &str,
    input: Option<&ScopeInput>,
) -> Result<Query, CompileError>
where
    M: ResourceMetadata,
    P: FilterParser,
{
    match input {
        None => Ok(Query::new(related)),
        Some(ScopeInput::Options(options)) => from_options(ctx, owner, related, options),
        Some(ScopeInput::Query(query)) => normalize(query.clone()),
    }
}

fn from_options<M, P>(
    ctx: &QueryContext<'_, M, P>,
    owner: &str,
    related: &str,
    options: &[QueryOption],
) -> Result<Query, CompileError>
where
    M: ResourceMetadata,
    P: FilterParser,
{
    // Phase 1: pagination
    for option in options {
        match option {
            QueryOption::Limit(_) => return Err(CompileError::QueryScope(ScopeViolation::Limit)),
            QueryOption::Offset(offset) if *offset != 0 => {
                return Err(CompileError::QueryScope(ScopeViolation::Offset));
            }
            _ => {}
        }
    }

    // Phase 2: build without filters
    let mut filters = Vec::new();
    let mut rest = Vec::with_capacity(options.len());
    for option in options {
        match option {
            QueryOption::Filter(expr) => filters.push(expr.clone()),
            other => rest.push(other.clone()),
        }
    }
    let query = normalize(ctx.build(related, &rest))?;

    // Phase 3: filters see the owning resource as their parent
    let query = match filters.into_iter().reduce(Expr::and) {
        Some(expr) => ctx.filter(query, &expr, &[owner.to_string()]),
        None => query,
    };

    Ok(query)
}

// Reject pagination, then drop the clauses an aggregate scope never carries.
fn normalize(query: Query) -> Result<Query, CompileError> {
    if query.limit_value().is_some() {
        return Err(CompileError::QueryScope(ScopeViolation::Limit));
    }
    if query.offset_value().is_some_and(|offset| offset != 0) {
        return Err(CompileError::QueryScope(ScopeViolation::Offset));
    }

    Ok(query.unset(&[QueryClause::Load, QueryClause::Limit, QueryClause::Offset]))
}
