use serde::{Deserialize, Serialize};
use std::{fmt::Display, ops::Deref};

/// Opaque record/toast identifier. Fresh ids are ULIDs, so they sort by
/// creation time but are not coordinated across processes.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Eid(String);

impl Eid {
    pub fn generate() -> Self {
        Self(rusty_ulid::generate_ulid_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Eid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Deref for Eid {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl From<String> for Eid {
    fn from(id: String) -> Self {
        Self(id)
    }
}
