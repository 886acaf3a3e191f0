//! TOML catalog configuration.
//!
//! Configuration structs mirror the node model but keep types and kinds as
//! text; conversion parses them and the resulting catalog is validated like
//! any other.

use crate::{
    catalog::{Catalog, CatalogError},
    node::{
        AggregateFieldModel, ArgumentModel, CalculationModel, FieldModel, ReadActionModel,
        RelationshipKind, RelationshipModel, ResourceModel,
    },
    types::{AggregateKind, AggregateKindParseError, Constraints, FieldType, FieldTypeParseError},
    value::Value,
};
use serde::Deserialize;
use thiserror::Error as ThisError;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("failed to parse catalog configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("resource '{resource}': {source}")]
    FieldType {
        resource: String,
        #[source]
        source: FieldTypeParseError,
    },

    #[error("resource '{resource}': {source}")]
    AggregateKind {
        resource: String,
        #[source]
        source: AggregateKindParseError,
    },

    #[error("resource '{resource}', relationship '{relationship}': unknown kind '{kind}'")]
    RelationshipKind {
        resource: String,
        relationship: String,
        kind: String,
    },

    #[error("resource '{resource}', relationship '{relationship}': many_to_many requires 'through'")]
    MissingThrough {
        resource: String,
        relationship: String,
    },

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

///
/// CatalogConfig
///

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogConfig {
    #[serde(default, rename = "resource")]
    pub resources: Vec<ResourceConfig>,
}

///
/// ResourceConfig
///

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceConfig {
    pub name: String,
    pub data_layer: String,
    #[serde(default)]
    pub read_actions: Vec<ReadActionModel>,
    #[serde(default, rename = "attribute")]
    pub attributes: Vec<AttributeConfig>,
    #[serde(default, rename = "calculation")]
    pub calculations: Vec<CalculationConfig>,
    #[serde(default, rename = "aggregate")]
    pub aggregates: Vec<AggregateConfig>,
    #[serde(default, rename = "relationship")]
    pub relationships: Vec<RelationshipConfig>,
}

///
/// AttributeConfig
///

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttributeConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub constraints: toml::Table,
}

///
/// CalculationConfig
///

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CalculationConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub constraints: toml::Table,
    #[serde(default)]
    pub implementation: Option<String>,
    #[serde(default)]
    pub arguments: Vec<ArgumentConfig>,
}

///
/// ArgumentConfig
///

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArgumentConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub default: Option<toml::Value>,
}

///
/// RelationshipConfig
///

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelationshipConfig {
    pub name: String,
    pub kind: String,
    pub destination: String,
    #[serde(default)]
    pub through: Option<String>,
    #[serde(default)]
    pub read_action: Option<String>,
}

///
/// AggregateConfig
///

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AggregateConfig {
    pub name: String,
    pub kind: String,
    #[serde(default)]
    pub path: Vec<String>,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default, rename = "type")]
    pub ty: Option<String>,
    #[serde(default)]
    pub constraints: Option<toml::Table>,
    #[serde(default)]
    pub default: Option<toml::Value>,
    #[serde(default)]
    pub read_action: Option<String>,
    #[serde(default)]
    pub implementation: Option<String>,
    #[serde(default)]
    pub uniq: bool,
    #[serde(default)]
    pub include_nil: bool,
    #[serde(default)]
    pub filterable: Option<bool>,
    #[serde(default)]
    pub sortable: Option<bool>,
    #[serde(default)]
    pub sensitive: bool,
    #[serde(default)]
    pub authorize: Option<bool>,
}

impl Catalog {
    /// Parse, convert and validate a TOML catalog definition.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: CatalogConfig = toml::from_str(source)?;

        config.into_catalog()
    }
}

impl CatalogConfig {
    pub fn into_catalog(self) -> Result<Catalog, ConfigError> {
        let mut builder = Catalog::builder();
        for resource in self.resources {
            builder = builder.resource(resource.into_model()?);
        }

        Ok(builder.build()?)
    }
}

impl ResourceConfig {
    fn into_model(self) -> Result<ResourceModel, ConfigError> {
        let name = self.name;
        let field_type = |ty: &str| {
            ty.parse::<FieldType>()
                .map_err(|source| ConfigError::FieldType {
                    resource: name.clone(),
                    source,
                })
        };

        let mut model = ResourceModel::new(name.clone(), self.data_layer.as_str());

        for attr in self.attributes {
            let ty = field_type(&attr.ty)?;
            model = model.with_field(FieldModel::attribute_with(
                attr.name,
                ty,
                constraints_from_table(attr.constraints),
            ));
        }

        for calc in self.calculations {
            let mut calculation = CalculationModel::new(field_type(&calc.ty)?)
                .with_constraints(constraints_from_table(calc.constraints));
            if let Some(implementation) = calc.implementation {
                calculation = calculation.with_implementation(implementation);
            }
            for arg in calc.arguments {
                let mut argument = ArgumentModel::new(arg.name, field_type(&arg.ty)?);
                if let Some(default) = arg.default {
                    argument = argument.with_default(value_from_toml(default));
                }
                calculation = calculation.with_argument(argument);
            }
            model = model.with_field(FieldModel::calculation(calc.name, calculation));
        }

        for agg in self.aggregates {
            let kind = agg
                .kind
                .parse::<AggregateKind>()
                .map_err(|source| ConfigError::AggregateKind {
                    resource: name.clone(),
                    source,
                })?;

            let mut aggregate = AggregateFieldModel::new(kind, agg.path)
                .uniq(agg.uniq)
                .include_nil(agg.include_nil);
            aggregate.field = agg.field;
            aggregate.ty = agg.ty.as_deref().map(field_type).transpose()?;
            aggregate.constraints = agg.constraints.map(constraints_from_table);
            aggregate.default = agg.default.map(value_from_toml);
            aggregate.read_action = agg.read_action;
            aggregate.implementation = agg.implementation;
            aggregate.filterable = agg.filterable.unwrap_or(true);
            aggregate.sortable = agg.sortable.unwrap_or(true);
            aggregate.sensitive = agg.sensitive;
            aggregate.authorize = agg.authorize.unwrap_or(true);

            model = model.with_field(FieldModel::aggregate(agg.name, aggregate));
        }

        for rel in self.relationships {
            let kind = match (rel.kind.as_str(), rel.through) {
                ("belongs_to", _) => RelationshipKind::BelongsTo,
                ("has_one", _) => RelationshipKind::HasOne,
                ("has_many", _) => RelationshipKind::HasMany,
                ("many_to_many", Some(through)) => RelationshipKind::ManyToMany { through },
                ("many_to_many", None) => {
                    return Err(ConfigError::MissingThrough {
                        resource: name,
                        relationship: rel.name,
                    });
                }
                (other, _) => {
                    return Err(ConfigError::RelationshipKind {
                        resource: name,
                        relationship: rel.name,
                        kind: other.to_string(),
                    });
                }
            };

            let mut relationship =
                RelationshipModel::new(rel.name, kind, name.clone(), rel.destination);
            relationship.read_action = rel.read_action;
            model = model.with_relationship_model(relationship);
        }

        for action in self.read_actions {
            model = model.with_read_action(action);
        }

        Ok(model)
    }
}

fn constraints_from_table(table: toml::Table) -> Constraints {
    table
        .into_iter()
        .fold(Constraints::new(), |acc, (key, value)| match value {
            toml::Value::Table(nested) => acc.with_nested(key, constraints_from_table(nested)),
            other => acc.with(key, value_from_toml(other)),
        })
}

/// Convert a TOML literal into the catalog value vocabulary.
#[must_use]
pub fn value_from_toml(value: toml::Value) -> Value {
    match value {
        toml::Value::String(text) => Value::Text(text),
        toml::Value::Integer(int) => Value::Int(int),
        toml::Value::Float(float) => Value::Float(float),
        toml::Value::Boolean(flag) => Value::Bool(flag),
        toml::Value::Datetime(datetime) => Value::Text(datetime.to_string()),
        toml::Value::Array(items) => Value::List(items.into_iter().map(value_from_toml).collect()),
        toml::Value::Table(table) => Value::Map(
            table
                .into_iter()
                .map(|(key, value)| (key, value_from_toml(value)))
                .collect(),
        ),
    }
}
