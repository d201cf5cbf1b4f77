use crate::entities::item::ItemStack;
use crate::world::position::BlockPosition;
use serde::{Deserialize, Serialize};

/// Read-only view of a shop record owned by the shop registry.
pub trait ShopView {
    fn location(&self) -> &BlockPosition;

    /// The item the shop trades.
    fn item(&self) -> &ItemStack;

    /// Canonical location string embedded in protection flags.
    fn location_key(&self) -> String {
        self.location().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shop {
    pub location: BlockPosition,
    pub item: ItemStack,
}

impl Shop {
    pub fn new(location: BlockPosition, item: ItemStack) -> Self {
        Self { location, item }
    }
}

impl ShopView for Shop {
    fn location(&self) -> &BlockPosition {
        &self.location
    }

    fn item(&self) -> &ItemStack {
        &self.item
    }
}
