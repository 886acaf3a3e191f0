//! Resource catalog for relagg: resources, their fields and relationships,
//! the read actions they expose, and the data layer each one lives in.
//!
//! The catalog is the read-only metadata surface the aggregate compiler walks.

pub mod catalog;
pub mod config;
pub mod error;
pub mod node;
pub mod types;
pub mod validate;
pub mod value;

use crate::{catalog::CatalogError, config::ConfigError};
use thiserror::Error as ThisError;

/// Maximum length for resource identifiers.
pub const MAX_RESOURCE_NAME_LEN: usize = 64;

/// Maximum length for field and relationship identifiers.
pub const MAX_FIELD_NAME_LEN: usize = 64;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        catalog::Catalog,
        err,
        error::ErrorTree,
        node::*,
        types::{AggregateKind, Constraint, Constraints, DataLayer, FieldType},
        value::Value,
    };
    pub use serde::{Deserialize, Serialize};
}

///
/// Error
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    CatalogError(#[from] CatalogError),

    #[error(transparent)]
    ConfigError(#[from] ConfigError),
}
