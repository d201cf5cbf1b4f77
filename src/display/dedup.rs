use crate::display::classifier::FlagCache;
use crate::entities::entity::EntityRef;
use crate::world::access::WorldAccess;
use crate::world::area::Region;
use tracing::{debug, warn};

/// Removes extra markers of one shop from a region of the world.
pub struct DedupScanner {
    flags: FlagCache,
}

impl DedupScanner {
    pub fn new(cache_size: usize) -> Self {
        Self {
            flags: FlagCache::new(cache_size),
        }
    }

    /// Despawns every entity in `region` whose item belongs to the shop at
    /// `shop_location`, except `keep`. Returns how many were removed.
    pub fn scan(
        &mut self,
        world: &mut dyn WorldAccess,
        shop_location: &str,
        region: &Region,
        keep: Option<EntityRef>,
    ) -> usize {
        let mut removed = 0;
        for snapshot in world.entities_in_region(region) {
            if Some(snapshot.entity) == keep {
                continue;
            }
            let Some(item) = snapshot.item.as_ref() else {
                continue;
            };
            if !self.flags.belongs_to_location(item, shop_location) {
                continue;
            }
            match world.despawn_entity(snapshot.entity) {
                Ok(()) => {
                    warn!(
                        shop = shop_location,
                        entity = %snapshot.entity,
                        "removed duplicate display"
                    );
                    removed += 1;
                }
                Err(err) => debug!(entity = %snapshot.entity, "duplicate already gone: {err}"),
            }
        }
        removed
    }
}
