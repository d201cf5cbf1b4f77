use crate::config::DisplayConfig;
use crate::display::lifecycle::MarkerSlot;
use crate::display::{DisplayError, DisplayItem, DisplayType};
use crate::entities::entity::{EntityKind, EntityRef};
use crate::entities::shop::ShopView;
use crate::world::access::WorldAccess;
use crate::world::position::{Location, LocationDelta};

/// Invisible stand on top of the shop block, holding the item.
const ARMOR_STAND_OFFSET: LocationDelta = LocationDelta {
    dx: 0.5,
    dy: 1.0,
    dz: 0.5,
};

pub struct ArmorStandDisplayItem<S> {
    slot: MarkerSlot<S>,
}

impl<S: ShopView> ArmorStandDisplayItem<S> {
    pub fn new(shop: S, config: &DisplayConfig) -> Self {
        Self {
            slot: MarkerSlot::new(shop, EntityKind::ArmorStand, ARMOR_STAND_OFFSET, config),
        }
    }
}

impl<S: ShopView> DisplayItem for ArmorStandDisplayItem<S> {
    fn spawn(&mut self, world: &mut dyn WorldAccess) -> Result<(), DisplayError> {
        self.slot.spawn(world)
    }

    fn is_spawned(&self, world: &dyn WorldAccess) -> bool {
        self.slot.is_spawned(world)
    }

    fn check_display_is_moved(&self, world: &dyn WorldAccess) -> bool {
        self.slot.is_moved(world)
    }

    fn check_display_need_regen(&self, world: &dyn WorldAccess) -> bool {
        self.slot.needs_regen(world)
    }

    fn fix_display_moved(&mut self, world: &mut dyn WorldAccess) -> Result<(), DisplayError> {
        self.slot.fix_moved(world)
    }

    fn fix_display_need_regen(&mut self, world: &mut dyn WorldAccess) -> Result<(), DisplayError> {
        self.slot.fix_need_regen(world)
    }

    fn respawn(&mut self, world: &mut dyn WorldAccess) -> Result<(), DisplayError> {
        self.slot.respawn(world)
    }

    fn remove(&mut self, world: &mut dyn WorldAccess) {
        self.slot.remove(world)
    }

    fn remove_dupe(&mut self, world: &mut dyn WorldAccess) -> bool {
        self.slot.remove_dupe(world) > 0
    }

    fn check_is_shop_entity(&self, world: &dyn WorldAccess, entity: EntityRef) -> bool {
        self.slot.is_shop_entity(world, entity)
    }

    fn safe_guard(
        &self,
        world: &mut dyn WorldAccess,
        entity: EntityRef,
    ) -> Result<(), DisplayError> {
        self.slot.safe_guard(world, entity)
    }

    fn display(&self) -> Option<EntityRef> {
        self.slot.held()
    }

    fn display_location(&self) -> Location {
        self.slot.display_location()
    }

    fn display_type(&self) -> DisplayType {
        DisplayType::ArmorStand
    }
}
