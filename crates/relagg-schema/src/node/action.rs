use serde::{Deserialize, Serialize};

///
/// ReadActionModel
/// Named read capability exposed by a resource.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ReadActionModel {
    pub name: String,
    #[serde(default)]
    pub primary: bool,
}

impl ReadActionModel {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primary: false,
        }
    }

    #[must_use]
    pub fn primary(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primary: true,
        }
    }
}
