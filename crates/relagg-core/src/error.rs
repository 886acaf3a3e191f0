use crate::{aggregate::OptionErrors, filter::FilterError, query::QueryError};
use relagg_schema::types::{AggregateKind, DataLayer};
use std::fmt;
use thiserror::Error as ThisError;

///
/// ErrorClass
///
/// Coarse classification used by callers that surface compile failures to
/// end users and by the metrics sink.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Validation,
    Query,
    Unsupported,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Validation => "validation",
            Self::Query => "query",
            Self::Unsupported => "unsupported",
        };
        write!(f, "{label}")
    }
}

///
/// ScopeViolation
/// Pagination clauses an aggregate scope may not carry.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, ThisError)]
pub enum ScopeViolation {
    #[error("cannot set limit on aggregate query")]
    Limit,

    #[error("cannot set offset on aggregate query")]
    Offset,
}

///
/// CompileError
///
/// Recoverable aggregate compilation failures. The first failure wins; no
/// partial descriptor is ever produced.
///

#[derive(Clone, Debug, PartialEq, ThisError)]
pub enum CompileError {
    #[error("invalid aggregate options: {0}")]
    Schema(OptionErrors),

    #[error("unknown resource '{resource}'")]
    UnknownResource { resource: String },

    #[error("no such relationship '{relationship}' on resource '{resource}'")]
    NoSuchRelationship {
        resource: String,
        relationship: String,
    },

    #[error("resource '{resource}' has no usable read action{}", action_suffix(.action.as_deref()))]
    NoReadAction {
        resource: String,
        action: Option<String>,
    },

    #[error(
        "relationship '{relationship}' crosses from data layer '{origin}' to '{destination}'"
    )]
    CrossDataLayer {
        relationship: String,
        origin: DataLayer,
        destination: DataLayer,
    },

    #[error("invalid aggregate kind '{kind}'")]
    InvalidAggregateKind { kind: String },

    #[error("aggregate kind '{kind}' requires a field type")]
    MissingFieldType { kind: AggregateKind },

    #[error("no such field '{field}' on resource '{resource}'")]
    NoSuchField { resource: String, field: String },

    #[error("aggregate field '{field}' on resource '{resource}' aggregates itself")]
    RecursiveAggregateField { resource: String, field: String },

    #[error("options 'field' and 'expr' are mutually exclusive")]
    ConflictingFieldAndExpr,

    #[error("option 'expr' requires 'expr_type'")]
    MissingExprType,

    #[error("aggregate kind '{kind}' does not support uniq")]
    UnsupportedUniq { kind: AggregateKind },

    #[error("{0}")]
    QueryScope(ScopeViolation),

    #[error("aggregate query is invalid: {}", join_errors(.errors))]
    QueryBuild { errors: Vec<QueryError> },

    #[error("join filter for path [{}] is invalid: {source}", .path.join(", "))]
    InvalidJoinFilter {
        path: Vec<String>,
        #[source]
        source: FilterError,
    },
}

impl CompileError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Schema(_)
            | Self::UnknownResource { .. }
            | Self::NoSuchRelationship { .. }
            | Self::InvalidAggregateKind { .. }
            | Self::MissingFieldType { .. }
            | Self::NoSuchField { .. }
            | Self::RecursiveAggregateField { .. }
            | Self::ConflictingFieldAndExpr
            | Self::MissingExprType
            | Self::UnsupportedUniq { .. } => ErrorClass::Validation,
            Self::NoReadAction { .. } | Self::CrossDataLayer { .. } => ErrorClass::Unsupported,
            Self::QueryScope(_) | Self::QueryBuild { .. } | Self::InvalidJoinFilter { .. } => {
                ErrorClass::Query
            }
        }
    }

    /// Stable variant label for metrics and diagnostics.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Schema(_) => "schema",
            Self::UnknownResource { .. } => "unknown_resource",
            Self::NoSuchRelationship { .. } => "no_such_relationship",
            Self::NoReadAction { .. } => "no_read_action",
            Self::CrossDataLayer { .. } => "cross_data_layer",
            Self::InvalidAggregateKind { .. } => "invalid_aggregate_kind",
            Self::MissingFieldType { .. } => "missing_field_type",
            Self::NoSuchField { .. } => "no_such_field",
            Self::RecursiveAggregateField { .. } => "recursive_aggregate_field",
            Self::ConflictingFieldAndExpr => "conflicting_field_and_expr",
            Self::MissingExprType => "missing_expr_type",
            Self::UnsupportedUniq { .. } => "unsupported_uniq",
            Self::QueryScope(_) => "query_scope",
            Self::QueryBuild { .. } => "query_build",
            Self::InvalidJoinFilter { .. } => "invalid_join_filter",
        }
    }
}

fn action_suffix(action: Option<&str>) -> String {
    action.map_or_else(String::new, |action| format!(" named '{action}'"))
}

fn join_errors(errors: &[QueryError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
