use crate::value::Value;
use derive_more::{Deref, Display};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, str::FromStr};
use thiserror::Error as ThisError;

///
/// AggregateKind
///
/// Closed set of aggregate kinds. Every kind-dependent rule matches on this
/// enum exhaustively.
///

#[derive(
    Clone, Copy, Debug, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(rename_all = "snake_case")]
#[remain::sorted]
pub enum AggregateKind {
    #[display("avg")]
    Avg,
    #[display("count")]
    Count,
    #[display("custom")]
    Custom,
    #[display("exists")]
    Exists,
    #[display("first")]
    First,
    #[display("list")]
    List,
    #[display("max")]
    Max,
    #[display("min")]
    Min,
    #[display("sum")]
    Sum,
}

impl AggregateKind {
    pub const ALL: [Self; 9] = [
        Self::Avg,
        Self::Count,
        Self::Custom,
        Self::Exists,
        Self::First,
        Self::List,
        Self::Max,
        Self::Min,
        Self::Sum,
    ];

    /// Kinds that accept `uniq? = true`.
    #[must_use]
    pub const fn supports_uniq(self) -> bool {
        match self {
            Self::Count | Self::List => true,
            Self::Avg
            | Self::Custom
            | Self::Exists
            | Self::First
            | Self::Max
            | Self::Min
            | Self::Sum => false,
        }
    }
}

///
/// AggregateKindParseError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("unknown aggregate kind '{0}'")]
pub struct AggregateKindParseError(pub String);

impl FromStr for AggregateKind {
    type Err = AggregateKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.to_string() == s)
            .ok_or_else(|| AggregateKindParseError(s.to_string()))
    }
}

///
/// FieldType
///
/// Semantic type of an attribute, calculation or aggregate result.
/// Identifiers that are not built in parse as `Custom`.
///

#[derive(Clone, Debug, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(into = "String", try_from = "String")]
#[remain::sorted]
pub enum FieldType {
    #[display("array<{_0}>")]
    Array(Box<Self>),
    #[display("boolean")]
    Boolean,
    #[display("{_0}")]
    Custom(String),
    #[display("date")]
    Date,
    #[display("decimal")]
    Decimal,
    #[display("float")]
    Float,
    #[display("integer")]
    Integer,
    #[display("map")]
    Map,
    #[display("text")]
    Text,
    #[display("timestamp")]
    Timestamp,
    #[display("uuid")]
    Uuid,
}

impl FieldType {
    #[must_use]
    pub fn array(inner: Self) -> Self {
        Self::Array(Box::new(inner))
    }

    #[must_use]
    pub fn custom(name: impl Into<String>) -> Self {
        Self::Custom(name.into())
    }

    /// Element type when this is an array.
    #[must_use]
    pub fn item(&self) -> Option<&Self> {
        match self {
            Self::Array(inner) => Some(inner),
            _ => None,
        }
    }
}

///
/// FieldTypeParseError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("invalid field type '{0}'")]
pub struct FieldTypeParseError(pub String);

impl FromStr for FieldType {
    type Err = FieldTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(inner) = trimmed
            .strip_prefix("array<")
            .and_then(|rest| rest.strip_suffix('>'))
        {
            return inner
                .parse()
                .map(Self::array)
                .map_err(|_| FieldTypeParseError(s.to_string()));
        }

        let ty = match trimmed {
            "" => return Err(FieldTypeParseError(s.to_string())),
            "boolean" => Self::Boolean,
            "date" => Self::Date,
            "decimal" => Self::Decimal,
            "float" => Self::Float,
            "integer" => Self::Integer,
            "map" => Self::Map,
            "text" => Self::Text,
            "timestamp" => Self::Timestamp,
            "uuid" => Self::Uuid,
            other if other.contains(['<', '>']) => {
                return Err(FieldTypeParseError(s.to_string()));
            }
            other => Self::Custom(other.to_string()),
        };

        Ok(ty)
    }
}

impl From<FieldType> for String {
    fn from(ty: FieldType) -> Self {
        ty.to_string()
    }
}

impl TryFrom<String> for FieldType {
    type Error = FieldTypeParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

///
/// Constraint
///
/// One constraint entry: either a literal or a nested constraint set
/// (`items` on array types).
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Constraint {
    Value(Value),
    Nested(Constraints),
}

///
/// Constraints
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Constraints(BTreeMap<String, Constraint>);

impl Constraints {
    /// Key under which element constraints of an array type are nested.
    pub const ITEMS: &'static str = "items";

    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Wrap element constraints under the `items` key.
    #[must_use]
    pub fn items(inner: Self) -> Self {
        Self::new().with_nested(Self::ITEMS, inner)
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), Constraint::Value(value.into()));
        self
    }

    #[must_use]
    pub fn with_nested(mut self, key: impl Into<String>, nested: Self) -> Self {
        self.0.insert(key.into(), Constraint::Nested(nested));
        self
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Constraint> {
        self.0.get(key)
    }

    /// Nested constraints under `key`, if present.
    #[must_use]
    pub fn nested(&self, key: &str) -> Option<&Self> {
        match self.0.get(key) {
            Some(Constraint::Nested(nested)) => Some(nested),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Constraint)> {
        self.0.iter()
    }
}

///
/// DataLayer
///
/// Identifier of the storage backend a resource is persisted in.
///

#[derive(
    Clone, Debug, Deref, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(transparent)]
pub struct DataLayer(String);

impl DataLayer {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DataLayer {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}
