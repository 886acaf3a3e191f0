use crate::{
    aggregate::{join_filter::JoinFilters, kind::ResolvedType},
    expr::Expr,
    query::Query,
};
use relagg_schema::{
    types::{AggregateKind, Constraints, FieldType},
    value::Value,
};
use std::collections::BTreeMap;

///
/// AggregateDescriptor
///
/// Compiled aggregate. Built once by `AggregateCompiler` and immutable
/// afterwards; every reference it holds has already been resolved against
/// the catalog.
///

#[derive(Clone, Debug, PartialEq)]
#[allow(clippy::struct_excessive_bools)]
pub struct AggregateDescriptor {
    pub(crate) name: String,
    pub(crate) resource: String,
    pub(crate) related: String,
    pub(crate) relationship_path: Vec<String>,
    pub(crate) kind: AggregateKind,
    pub(crate) field: Option<AggregateField>,
    pub(crate) result_type: FieldType,
    pub(crate) constraints: Constraints,
    pub(crate) default_value: Value,
    pub(crate) scoped_query: Query,
    pub(crate) join_filters: JoinFilters,
    pub(crate) implementation: Option<String>,
    pub(crate) read_action: Option<String>,
    pub(crate) agg_name: Option<String>,
    pub(crate) authorize: bool,
    pub(crate) include_nil: bool,
    pub(crate) uniq: bool,
    pub(crate) filterable: bool,
    pub(crate) sortable: bool,
    pub(crate) sensitive: bool,
}

impl AggregateDescriptor {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resource the aggregate is declared on.
    #[must_use]
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Resource the relationship path lands on.
    #[must_use]
    pub fn related(&self) -> &str {
        &self.related
    }

    #[must_use]
    pub fn relationship_path(&self) -> &[String] {
        &self.relationship_path
    }

    #[must_use]
    pub const fn kind(&self) -> AggregateKind {
        self.kind
    }

    #[must_use]
    pub const fn field(&self) -> Option<&AggregateField> {
        self.field.as_ref()
    }

    #[must_use]
    pub const fn result_type(&self) -> &FieldType {
        &self.result_type
    }

    #[must_use]
    pub const fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    /// Value used when there is nothing to aggregate.
    #[must_use]
    pub const fn default_value(&self) -> &Value {
        &self.default_value
    }

    #[must_use]
    pub const fn scoped_query(&self) -> &Query {
        &self.scoped_query
    }

    #[must_use]
    pub const fn join_filters(&self) -> &JoinFilters {
        &self.join_filters
    }

    #[must_use]
    pub fn implementation(&self) -> Option<&str> {
        self.implementation.as_deref()
    }

    #[must_use]
    pub fn read_action(&self) -> Option<&str> {
        self.read_action.as_deref()
    }

    #[must_use]
    pub fn agg_name(&self) -> Option<&str> {
        self.agg_name.as_deref()
    }

    #[must_use]
    pub const fn authorize(&self) -> bool {
        self.authorize
    }

    #[must_use]
    pub const fn include_nil(&self) -> bool {
        self.include_nil
    }

    #[must_use]
    pub const fn uniq(&self) -> bool {
        self.uniq
    }

    #[must_use]
    pub const fn filterable(&self) -> bool {
        self.filterable
    }

    #[must_use]
    pub const fn sortable(&self) -> bool {
        self.sortable
    }

    #[must_use]
    pub const fn sensitive(&self) -> bool {
        self.sensitive
    }

    /// Result type and constraints as one value.
    #[must_use]
    pub fn resolved_type(&self) -> ResolvedType {
        ResolvedType::new(self.result_type.clone(), self.constraints.clone())
    }
}

///
/// AggregateField
/// What an aggregate aggregates over.
///

#[derive(Clone, Debug, PartialEq)]
pub enum AggregateField {
    Attribute {
        name: String,
        ty: FieldType,
        constraints: Constraints,
    },
    Calculation(CalculationRef),
    Aggregate(Box<AggregateDescriptor>),
}

impl AggregateField {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Attribute { name, .. } => name,
            Self::Calculation(calc) => &calc.name,
            Self::Aggregate(agg) => agg.name(),
        }
    }

    /// Type the field contributes to the aggregate.
    #[must_use]
    pub fn resolved_type(&self) -> ResolvedType {
        match self {
            Self::Attribute {
                ty, constraints, ..
            } => ResolvedType::new(ty.clone(), constraints.clone()),
            Self::Calculation(calc) => {
                ResolvedType::new(calc.ty.clone(), calc.constraints.clone())
            }
            Self::Aggregate(agg) => agg.resolved_type(),
        }
    }
}

///
/// CalculationRef
///
/// Calculation evaluated per related record. Arguments are the declared
/// defaults overlaid with the arguments supplied on the request.
///

#[derive(Clone, Debug, PartialEq)]
pub struct CalculationRef {
    pub name: String,
    pub ty: FieldType,
    pub constraints: Constraints,
    pub arguments: BTreeMap<String, Value>,
    pub source: CalculationSource,
}

///
/// CalculationSource
///

#[derive(Clone, Debug, PartialEq)]
pub enum CalculationSource {
    /// Calculation declared on the related resource.
    Declared { implementation: Option<String> },
    /// Expression supplied inline with the request.
    Inline(Expr),
}
