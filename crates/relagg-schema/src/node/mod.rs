//! Catalog node definitions: resources and everything hanging off them.

mod action;
mod field;
mod relationship;
mod resource;

pub use action::*;
pub use field::*;
pub use relationship::*;
pub use resource::*;
