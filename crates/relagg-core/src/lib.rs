//! Aggregate descriptor compiler for relagg.
//!
//! Turns an aggregate request ("count of line items", "sum of amounts where
//! active") into an immutable, type-resolved `AggregateDescriptor`: relationship
//! paths are walked and checked, result types are derived per kind, the
//! aggregation scope is built as a constrained sub-query, and per-hop join
//! filters are parsed against their ancestor chain.

pub mod aggregate;
pub mod error;
pub mod expr;
pub mod filter;
pub mod obs;
pub mod query;
pub mod traits;

// test
#[cfg(test)]
pub(crate) mod test_fixtures;

// re-exports
pub use relagg_schema as schema;
pub use relagg_schema::value::Value;

///
/// Prelude
///
/// Vocabulary needed to issue compile requests and read descriptors.
///

pub mod prelude {
    pub use crate::{
        aggregate::{
            AggregateCompiler, AggregateDescriptor, AggregateField, CalculationRef, RawOptions,
        },
        error::CompileError,
        expr::{Expr, FieldRef},
        filter::{FilterParser, SchemaFilterParser},
        query::{Query, QueryOption},
        traits::ResourceMetadata,
    };
    pub use relagg_schema::prelude::*;
}
