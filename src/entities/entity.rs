use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle to a world entity. The generation changes whenever the slot is
/// reused, so a handle to a removed entity never aliases a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityRef {
    pub index: u32,
    pub generation: u32,
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Item lying on the ground.
    DroppedItem,
    /// Invisible stand holding an item.
    ArmorStand,
    Other,
}

impl EntityKind {
    pub fn carries_item(self) -> bool {
        matches!(self, EntityKind::DroppedItem | EntityKind::ArmorStand)
    }
}
