//! Result-type derivation per aggregate kind.

use crate::error::CompileError;
use relagg_schema::{
    types::{AggregateKind, Constraints, FieldType},
    value::Value,
};

///
/// ResolvedType
/// A semantic type together with its constraints.
///

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedType {
    pub ty: FieldType,
    pub constraints: Constraints,
}

impl ResolvedType {
    #[must_use]
    pub const fn new(ty: FieldType, constraints: Constraints) -> Self {
        Self { ty, constraints }
    }

    #[must_use]
    pub const fn bare(ty: FieldType) -> Self {
        Self::new(ty, Constraints::new())
    }
}

/// Parse a kind name, mapping unknown names to `InvalidAggregateKind`.
pub fn parse_kind(name: &str) -> Result<AggregateKind, CompileError> {
    name.parse()
        .map_err(|_| CompileError::InvalidAggregateKind {
            kind: name.to_string(),
        })
}

/// Derive the result type of an aggregate.
///
/// `custom_type` is only consulted for `custom`; `attribute` is the type of
/// the aggregated field, when there is one.
pub fn resolve_result_type(
    kind: AggregateKind,
    custom_type: Option<&FieldType>,
    attribute: Option<&ResolvedType>,
) -> Result<ResolvedType, CompileError> {
    let missing = || CompileError::MissingFieldType { kind };

    match kind {
        AggregateKind::Custom => custom_type.cloned().map(ResolvedType::bare).ok_or_else(missing),
        AggregateKind::First | AggregateKind::Sum | AggregateKind::Max | AggregateKind::Min => {
            attribute.cloned().ok_or_else(missing)
        }
        AggregateKind::List => {
            let item = attribute.ok_or_else(missing)?;

            Ok(ResolvedType::new(
                FieldType::array(item.ty.clone()),
                Constraints::items(item.constraints.clone()),
            ))
        }
        AggregateKind::Count => Ok(ResolvedType::bare(FieldType::Integer)),
        AggregateKind::Exists => Ok(ResolvedType::bare(FieldType::Boolean)),
        AggregateKind::Avg => Ok(ResolvedType::bare(FieldType::Float)),
    }
}

/// Value an aggregate of `kind` takes when it has nothing to aggregate.
#[must_use]
pub const fn default_for_kind(kind: AggregateKind) -> Value {
    match kind {
        AggregateKind::Count => Value::Int(0),
        AggregateKind::List => Value::List(Vec::new()),
        AggregateKind::Avg
        | AggregateKind::Custom
        | AggregateKind::Exists
        | AggregateKind::First
        | AggregateKind::Max
        | AggregateKind::Min
        | AggregateKind::Sum => Value::Null,
    }
}
