use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::holding::Holding;

/// A collection of metal holdings, addressed by an unguessable UUID.
///
/// There are no user accounts: whoever knows the id can view and edit the
/// portfolio. The browser remembers the last id it visited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    pub id: Uuid,

    pub created_at: NaiveDateTime,

    pub updated_at: NaiveDateTime,

    /// Holdings ordered by creation time (oldest first).
    pub holdings: Vec<Holding>,
}

impl Portfolio {
    /// Find a holding of this portfolio by id.
    pub fn holding(&self, holding_id: Uuid) -> Option<&Holding> {
        self.holdings.iter().find(|h| h.id == holding_id)
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }
}
