use crate::{
    types::{AggregateKind, Constraints, FieldType},
    value::Value,
};
use serde::{Deserialize, Serialize};

///
/// FieldModel
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FieldModel {
    pub name: String,
    pub source: FieldSource,
}

impl FieldModel {
    #[must_use]
    pub fn attribute(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            source: FieldSource::Attribute {
                ty,
                constraints: Constraints::new(),
            },
        }
    }

    #[must_use]
    pub fn attribute_with(name: impl Into<String>, ty: FieldType, constraints: Constraints) -> Self {
        Self {
            name: name.into(),
            source: FieldSource::Attribute { ty, constraints },
        }
    }

    #[must_use]
    pub fn calculation(name: impl Into<String>, calculation: CalculationModel) -> Self {
        Self {
            name: name.into(),
            source: FieldSource::Calculation(calculation),
        }
    }

    #[must_use]
    pub fn aggregate(name: impl Into<String>, aggregate: AggregateFieldModel) -> Self {
        Self {
            name: name.into(),
            source: FieldSource::Aggregate(aggregate),
        }
    }

    /// Declared type, when the field carries one without further resolution.
    #[must_use]
    pub const fn declared_type(&self) -> Option<&FieldType> {
        match &self.source {
            FieldSource::Attribute { ty, .. } => Some(ty),
            FieldSource::Calculation(calc) => Some(&calc.ty),
            FieldSource::Aggregate(agg) => agg.ty.as_ref(),
        }
    }
}

///
/// FieldSource
///
/// Where a field's value comes from. Aggregate fields have no declared type
/// of their own unless one is given; it is derived from what they aggregate.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum FieldSource {
    Attribute {
        ty: FieldType,
        constraints: Constraints,
    },
    Calculation(CalculationModel),
    Aggregate(AggregateFieldModel),
}

///
/// CalculationModel
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CalculationModel {
    pub ty: FieldType,
    pub constraints: Constraints,
    pub arguments: Vec<ArgumentModel>,
    pub implementation: Option<String>,
}

impl CalculationModel {
    #[must_use]
    pub const fn new(ty: FieldType) -> Self {
        Self {
            ty,
            constraints: Constraints::new(),
            arguments: Vec::new(),
            implementation: None,
        }
    }

    #[must_use]
    pub fn with_constraints(mut self, constraints: Constraints) -> Self {
        self.constraints = constraints;
        self
    }

    #[must_use]
    pub fn with_argument(mut self, argument: ArgumentModel) -> Self {
        self.arguments.push(argument);
        self
    }

    #[must_use]
    pub fn with_implementation(mut self, implementation: impl Into<String>) -> Self {
        self.implementation = Some(implementation.into());
        self
    }
}

///
/// ArgumentModel
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ArgumentModel {
    pub name: String,
    pub ty: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl ArgumentModel {
    #[must_use]
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
            default: None,
        }
    }

    #[must_use]
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }
}

///
/// AggregateFieldModel
///
/// Aggregate declared on a resource. It compiles through the same path as an
/// ad-hoc aggregate request, so the options mirror the request options.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AggregateFieldModel {
    pub kind: AggregateKind,
    pub path: Vec<String>,
    pub field: Option<String>,
    pub ty: Option<FieldType>,
    pub constraints: Option<Constraints>,
    pub default: Option<Value>,
    pub read_action: Option<String>,
    pub implementation: Option<String>,
    pub uniq: bool,
    pub include_nil: bool,
    pub filterable: bool,
    pub sortable: bool,
    pub sensitive: bool,
    pub authorize: bool,
}

impl AggregateFieldModel {
    #[must_use]
    pub fn new<I, S>(kind: AggregateKind, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind,
            path: path.into_iter().map(Into::into).collect(),
            field: None,
            ty: None,
            constraints: None,
            default: None,
            read_action: None,
            implementation: None,
            uniq: false,
            include_nil: false,
            filterable: true,
            sortable: true,
            sensitive: false,
            authorize: true,
        }
    }

    #[must_use]
    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    #[must_use]
    pub fn ty(mut self, ty: FieldType) -> Self {
        self.ty = Some(ty);
        self
    }

    #[must_use]
    pub fn constraints(mut self, constraints: Constraints) -> Self {
        self.constraints = Some(constraints);
        self
    }

    #[must_use]
    pub fn default_value(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    #[must_use]
    pub fn read_action(mut self, action: impl Into<String>) -> Self {
        self.read_action = Some(action.into());
        self
    }

    #[must_use]
    pub fn implementation(mut self, implementation: impl Into<String>) -> Self {
        self.implementation = Some(implementation.into());
        self
    }

    #[must_use]
    pub const fn uniq(mut self, uniq: bool) -> Self {
        self.uniq = uniq;
        self
    }

    #[must_use]
    pub const fn include_nil(mut self, include_nil: bool) -> Self {
        self.include_nil = include_nil;
        self
    }
}
