use serde::{Deserialize, Serialize};

///
/// RelationshipKind
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    BelongsTo,
    HasOne,
    HasMany,
    ManyToMany { through: String },
}

///
/// RelationshipModel
///
/// One named edge from `source` to `destination`. Many-to-many edges also
/// name the join resource they travel through.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct RelationshipModel {
    pub name: String,
    pub kind: RelationshipKind,
    pub source: String,
    pub destination: String,

    /// Read action used on the destination; `None` means its primary read.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_action: Option<String>,
}

impl RelationshipModel {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        kind: RelationshipKind,
        source: impl Into<String>,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            source: source.into(),
            destination: destination.into(),
            read_action: None,
        }
    }

    #[must_use]
    pub fn with_read_action(mut self, action: impl Into<String>) -> Self {
        self.read_action = Some(action.into());
        self
    }

    /// Join resource for many-to-many relationships.
    #[must_use]
    pub fn through(&self) -> Option<&str> {
        match &self.kind {
            RelationshipKind::ManyToMany { through } => Some(through),
            RelationshipKind::BelongsTo | RelationshipKind::HasOne | RelationshipKind::HasMany => {
                None
            }
        }
    }

    /// True when traversal can yield more than one destination record.
    #[must_use]
    pub const fn is_many(&self) -> bool {
        matches!(
            self.kind,
            RelationshipKind::HasMany | RelationshipKind::ManyToMany { .. }
        )
    }
}
