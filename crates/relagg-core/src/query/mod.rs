//! Query objects used as aggregate scopes.
//!
//! A `Query` never fails while it is being built; problems are recorded on
//! the query itself and surfaced through `is_valid` / `errors`.

mod context;


use crate::{
    expr::Expr,
    filter::{FilterError, ParsedFilter},
};
use relagg_schema::value::Value;
use thiserror::Error as ThisError;

// re-exports
pub use context::QueryContext;

///
/// SortDirection
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

///
/// SortKey
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SortKey {
    pub field: String,
    pub direction: SortDirection,
}

impl SortKey {
    #[must_use]
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    #[must_use]
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

///
/// QueryOption
/// Build options accepted by `QueryContext::build`.
///

#[derive(Clone, Debug, PartialEq)]
pub enum QueryOption {
    Filter(Expr),
    Sort(Vec<SortKey>),
    Limit(u32),
    Offset(u32),
    Load(Vec<String>),
    Tenant(Value),
}

///
/// QueryClause
/// Clauses that can be cleared with `Query::unset`.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum QueryClause {
    Filter,
    Sort,
    Limit,
    Offset,
    Load,
}

///
/// QueryError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum QueryError {
    #[error("unknown resource '{resource}'")]
    UnknownResource { resource: String },

    #[error("cannot sort '{resource}' by unknown field '{field}'")]
    UnknownSortField { resource: String, field: String },

    #[error("cannot load unknown field or relationship '{name}' on '{resource}'")]
    UnknownLoad { resource: String, name: String },

    #[error("invalid filter: {0}")]
    Filter(FilterError),
}

///
/// Query
///

#[derive(Clone, Debug, PartialEq)]
pub struct Query {
    resource: String,
    filters: Vec<ParsedFilter>,
    sort: Vec<SortKey>,
    limit: Option<u32>,
    offset: Option<u32>,
    load: Vec<String>,
    tenant: Option<Value>,
    errors: Vec<QueryError>,
}

impl Query {
    /// Empty query over `resource`.
    #[must_use]
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            filters: Vec::new(),
            sort: Vec::new(),
            limit: None,
            offset: None,
            load: Vec::new(),
            tenant: None,
            errors: Vec::new(),
        }
    }

    #[must_use]
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Conjunctive filters, in the order they were applied.
    #[must_use]
    pub fn filters(&self) -> &[ParsedFilter] {
        &self.filters
    }

    #[must_use]
    pub fn sort_keys(&self) -> &[SortKey] {
        &self.sort
    }

    #[must_use]
    pub const fn limit_value(&self) -> Option<u32> {
        self.limit
    }

    #[must_use]
    pub const fn offset_value(&self) -> Option<u32> {
        self.offset
    }

    #[must_use]
    pub fn loads(&self) -> &[String] {
        &self.load
    }

    #[must_use]
    pub const fn tenant(&self) -> Option<&Value> {
        self.tenant.as_ref()
    }

    #[must_use]
    pub fn errors(&self) -> &[QueryError] {
        &self.errors
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an already-parsed filter, AND-ing with existing filters.
    #[must_use]
    pub fn filter(mut self, filter: ParsedFilter) -> Self {
        self.filters.push(filter);
        self
    }

    #[must_use]
    pub fn sort(mut self, keys: impl IntoIterator<Item = SortKey>) -> Self {
        self.sort.extend(keys);
        self
    }

    #[must_use]
    pub const fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub const fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    #[must_use]
    pub fn load<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.load.extend(names.into_iter().map(Into::into));
        self
    }

    /// Replace the tenant scope.
    #[must_use]
    pub fn set_tenant(mut self, tenant: Value) -> Self {
        self.tenant = Some(tenant);
        self
    }

    /// Clear the given clauses, leaving everything else untouched.
    #[must_use]
    pub fn unset(mut self, clauses: &[QueryClause]) -> Self {
        for clause in clauses {
            match clause {
                QueryClause::Filter => self.filters.clear(),
                QueryClause::Sort => self.sort.clear(),
                QueryClause::Limit => self.limit = None,
                QueryClause::Offset => self.offset = None,
                QueryClause::Load => self.load.clear(),
            }
        }
        self
    }

    /// Record a build problem; the query becomes invalid.
    #[must_use]
    pub fn with_error(mut self, error: QueryError) -> Self {
        self.errors.push(error);
        self
    }
}
