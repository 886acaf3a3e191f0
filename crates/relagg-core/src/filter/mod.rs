//! Filter parsing boundary.
//!
//! Filters arrive as schema-agnostic `Expr` trees. A `FilterParser` binds
//! every field reference to a concrete resource, using the parent stack to
//! resolve references that climb out of the filtered resource.

mod schema;

#[cfg(test)]
mod tests;

use crate::expr::Expr;
use relagg_schema::types::FieldType;
use thiserror::Error as ThisError;

// re-exports
pub use schema::SchemaFilterParser;

///
/// FilterError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum FilterError {
    #[error("unknown resource '{resource}'")]
    UnknownResource { resource: String },

    #[error("no such field '{field}' on resource '{resource}'")]
    UnknownField { resource: String, field: String },

    #[error("no such relationship '{relationship}' on resource '{resource}'")]
    UnknownRelationship {
        resource: String,
        relationship: String,
    },

    #[error("reference '{field}' climbs {depth} levels but only {available} ancestors are in scope")]
    ParentOutOfScope {
        field: String,
        depth: usize,
        available: usize,
    },
}

///
/// BoundField
/// One resolved field reference inside a parsed filter.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BoundField {
    /// Ancestor depth the reference was written against.
    pub depth: usize,
    /// Resource that owns the field after following any relationship path.
    pub resource: String,
    pub field: String,
    pub ty: Option<FieldType>,
}

///
/// ParsedFilter
///
/// A filter expression whose references are known to resolve.
/// Carries the parent stack it was parsed against so later layers can
/// rebind ancestor references without re-walking relationships.
///

#[derive(Clone, Debug, PartialEq)]
pub struct ParsedFilter {
    pub resource: String,
    pub parent_stack: Vec<String>,
    pub expr: Expr,
    pub bindings: Vec<BoundField>,
}

///
/// FilterParser
///

pub trait FilterParser {
    /// Bind `expr` against `resource`, with `parent_stack[0]` as the nearest
    /// ancestor scope.
    fn parse(
        &self,
        resource: &str,
        expr: &Expr,
        parent_stack: &[String],
    ) -> Result<ParsedFilter, FilterError>;
}
