//! Team data structure, as handed out by the remote team registry.

use serde::{Deserialize, Serialize};

/// Identifier assigned to a team by the remote registry.
pub type TeamId = u64;

/// A registered team. Owned by the remote service; never edited locally.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    #[serde(alias = "nome")]
    pub name: String,
}

impl Team {
    pub fn new(id: TeamId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
