//! State shared by every display style: the held entity handle and the
//! spawn / check / fix / dedup logic around it.

use crate::config::DisplayConfig;
use crate::display::classifier;
use crate::display::dedup::DedupScanner;
use crate::display::factory::MarkerFactory;
use crate::display::DisplayError;
use crate::entities::entity::{EntityKind, EntityRef};
use crate::entities::shop::ShopView;
use crate::world::access::WorldAccess;
use crate::world::area::Region;
use crate::world::position::{Location, LocationDelta};
use tracing::{debug, warn};

pub struct MarkerSlot<S> {
    shop: S,
    kind: EntityKind,
    offset: LocationDelta,
    factory: MarkerFactory,
    scanner: DedupScanner,
    move_tolerance: f64,
    dedup_radius: u8,
    held: Option<EntityRef>,
    /// Set by `spawn`, cleared by `remove`; a wanted marker that is gone
    /// needs regeneration.
    wanted: bool,
}

impl<S: ShopView> MarkerSlot<S> {
    pub fn new(shop: S, kind: EntityKind, offset: LocationDelta, config: &DisplayConfig) -> Self {
        Self {
            shop,
            kind,
            offset,
            factory: MarkerFactory::new(config),
            scanner: DedupScanner::new(config.flag_cache_size),
            move_tolerance: config.move_tolerance.max(0.0),
            dedup_radius: config.dedup_radius,
            held: None,
            wanted: false,
        }
    }

    pub fn held(&self) -> Option<EntityRef> {
        self.held
    }

    pub fn display_location(&self) -> Location {
        self.shop.location().to_location().offset(self.offset)
    }

    fn live(&self, world: &dyn WorldAccess) -> Option<EntityRef> {
        self.held.filter(|entity| world.entity_exists(*entity))
    }

    pub fn spawn(&mut self, world: &mut dyn WorldAccess) -> Result<(), DisplayError> {
        if self.live(world).is_some() {
            return Ok(());
        }
        self.held = None;
        self.wanted = true;
        let item = self.factory.create_guarded(self.shop.item(), &self.shop)?;
        let location = self.display_location();
        let entity = world.spawn_entity(self.kind, &location, Some(item))?;
        debug!(shop = %self.shop.location(), %entity, "spawned display");
        self.held = Some(entity);
        Ok(())
    }

    pub fn is_spawned(&self, world: &dyn WorldAccess) -> bool {
        self.live(world).is_some()
    }

    pub fn is_moved(&self, world: &dyn WorldAccess) -> bool {
        let Some(entity) = self.live(world) else {
            return false;
        };
        match world.entity_position(entity) {
            Some(position) => !position.approx_eq(&self.display_location(), self.move_tolerance),
            None => false,
        }
    }

    pub fn needs_regen(&self, world: &dyn WorldAccess) -> bool {
        self.wanted && self.live(world).is_none()
    }

    pub fn fix_moved(&mut self, world: &mut dyn WorldAccess) -> Result<(), DisplayError> {
        let Some(entity) = self.live(world) else {
            return Ok(());
        };
        world.teleport(entity, &self.display_location())?;
        debug!(shop = %self.shop.location(), %entity, "moved display back");
        Ok(())
    }

    pub fn fix_need_regen(&mut self, world: &mut dyn WorldAccess) -> Result<(), DisplayError> {
        if let Some(stale) = self.held.take() {
            warn!(shop = %self.shop.location(), entity = %stale, "display lost, regenerating");
        }
        self.spawn(world)
    }

    pub fn respawn(&mut self, world: &mut dyn WorldAccess) -> Result<(), DisplayError> {
        self.remove(world);
        self.spawn(world)
    }

    pub fn remove(&mut self, world: &mut dyn WorldAccess) {
        self.wanted = false;
        let Some(entity) = self.held.take() else {
            return;
        };
        if !world.entity_exists(entity) {
            return;
        }
        match world.despawn_entity(entity) {
            Ok(()) => debug!(shop = %self.shop.location(), %entity, "removed display"),
            Err(err) => {
                warn!(shop = %self.shop.location(), %entity, "display removal failed: {err}")
            }
        }
    }

    pub fn remove_dupe(&mut self, world: &mut dyn WorldAccess) -> usize {
        let keep = self.live(world);
        let center = self.display_location().block().chunk();
        let region = Region::around(&center, self.dedup_radius);
        let key = self.shop.location_key();
        self.scanner.scan(world, &key, &region, keep)
    }

    pub fn is_shop_entity(&self, world: &dyn WorldAccess, entity: EntityRef) -> bool {
        world
            .entity_item(entity)
            .is_some_and(|item| classifier::belongs_to(&item, &self.shop))
    }

    pub fn safe_guard(
        &self,
        world: &mut dyn WorldAccess,
        entity: EntityRef,
    ) -> Result<(), DisplayError> {
        let mut item = world
            .entity_item(entity)
            .ok_or(DisplayError::NothingToGuard(entity))?;
        self.factory.guard_in_place(&mut item, &self.shop)?;
        world.set_entity_item(entity, item)?;
        Ok(())
    }
}
