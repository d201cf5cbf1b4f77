//! Display markers: the item entity hovering over a shop.

pub mod armor_stand;
pub mod classifier;
pub mod dedup;
pub mod factory;
pub mod flag;
pub mod lifecycle;
pub mod real_item;
pub mod signature;
pub mod watcher;

use crate::config::DisplayConfig;
use crate::display::factory::GuardError;
use crate::entities::entity::EntityRef;
use crate::entities::shop::ShopView;
use crate::world::access::{WorldAccess, WorldError};
use crate::world::position::Location;
use thiserror::Error;

pub use armor_stand::ArmorStandDisplayItem;
pub use real_item::RealDisplayItem;

#[derive(Debug, Error)]
pub enum DisplayError {
    #[error(transparent)]
    World(#[from] WorldError),

    #[error("cannot build protection flag: {0}")]
    Guard(#[from] GuardError),

    #[error("entity {0} holds no item to guard")]
    NothingToGuard(EntityRef),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayType {
    RealItem,
    ArmorStand,
}

impl DisplayType {
    /// Unknown ids fall back to [`DisplayType::RealItem`].
    pub fn from_id(id: u8) -> Self {
        match id {
            1 => DisplayType::ArmorStand,
            _ => DisplayType::RealItem,
        }
    }
}

/// Live state of a display, derived from the world on every query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayHealth {
    Absent,
    Spawned,
    Moved,
    NeedsRegen,
}

/// One shop's display marker.
///
/// The world is passed into every call; implementations keep only an
/// [`EntityRef`] and check it against the world before trusting it.
/// Callers must not run two operations on the same display concurrently.
pub trait DisplayItem {
    /// Places a marker unless a live one is already held.
    fn spawn(&mut self, world: &mut dyn WorldAccess) -> Result<(), DisplayError>;

    fn is_spawned(&self, world: &dyn WorldAccess) -> bool;

    fn check_display_is_moved(&self, world: &dyn WorldAccess) -> bool;

    /// A marker was requested but the world no longer has it.
    fn check_display_need_regen(&self, world: &dyn WorldAccess) -> bool;

    fn fix_display_moved(&mut self, world: &mut dyn WorldAccess) -> Result<(), DisplayError>;

    fn fix_display_need_regen(&mut self, world: &mut dyn WorldAccess) -> Result<(), DisplayError>;

    /// Remove then spawn; used after the shop's item or location changed.
    fn respawn(&mut self, world: &mut dyn WorldAccess) -> Result<(), DisplayError>;

    fn remove(&mut self, world: &mut dyn WorldAccess);

    /// Removes other markers of this shop near the display. Returns whether
    /// any were found.
    fn remove_dupe(&mut self, world: &mut dyn WorldAccess) -> bool;

    fn check_is_shop_entity(&self, world: &dyn WorldAccess, entity: EntityRef) -> bool;

    /// Flags the item carried by `entity` as belonging to this shop.
    fn safe_guard(&self, world: &mut dyn WorldAccess, entity: EntityRef)
        -> Result<(), DisplayError>;

    /// Held marker handle, possibly stale.
    fn display(&self) -> Option<EntityRef>;

    /// Where the marker should be, not where it is.
    fn display_location(&self) -> Location;

    fn display_type(&self) -> DisplayType;

    fn health(&self, world: &dyn WorldAccess) -> DisplayHealth {
        if self.is_spawned(world) {
            if self.check_display_is_moved(world) {
                DisplayHealth::Moved
            } else {
                DisplayHealth::Spawned
            }
        } else if self.check_display_need_regen(world) {
            DisplayHealth::NeedsRegen
        } else {
            DisplayHealth::Absent
        }
    }
}

/// Builds the display style selected by `config`.
pub fn create_display<S>(shop: S, config: &DisplayConfig) -> Box<dyn DisplayItem>
where
    S: ShopView + 'static,
{
    match config.display_type() {
        DisplayType::RealItem => Box::new(RealDisplayItem::new(shop, config)),
        DisplayType::ArmorStand => Box::new(ArmorStandDisplayItem::new(shop, config)),
    }
}
