//! Aggregate compilation.
//!
//! `AggregateCompiler` is the entry point; the submodules are the stages it
//! runs, each usable on its own.

mod compile;
mod descriptor;
mod join_filter;
mod kind;
mod options;
mod path;
mod scope;

#[cfg(test)]
mod tests;

// re-exports
pub use compile::AggregateCompiler;
pub use descriptor::{AggregateDescriptor, AggregateField, CalculationRef, CalculationSource};
pub use join_filter::{JoinFilters, ancestor_stack, parse_join_filters};
pub use kind::{ResolvedType, default_for_kind, parse_kind, resolve_result_type};
pub use options::{
    AggregateOptions, DefaultProducer, DefaultValue, OptionErrors, OptionKey, OptionValue,
    RawOptions,
};
pub use path::{
    path_to_reversed_relationships, related_resource, resolve_relationship_chain, validate_path,
};
pub use scope::{ScopeInput, build_scoped_query};
