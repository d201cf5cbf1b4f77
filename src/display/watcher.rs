use crate::display::{DisplayHealth, DisplayItem};
use crate::world::access::WorldAccess;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchReport {
    pub checked: usize,
    pub regenerated: usize,
    pub moved_back: usize,
    /// Displays that had at least one duplicate removed.
    pub deduplicated: usize,
    pub failures: usize,
}

/// Periodic health pass over many displays.
///
/// Duplicate scans walk every entity in a region, so they only run on every
/// `dedup_interval`-th pass.
#[derive(Debug, Clone)]
pub struct DisplayWatcher {
    dedup_interval: u32,
    passes: u64,
}

impl DisplayWatcher {
    pub fn new(dedup_interval: u32) -> Self {
        Self {
            dedup_interval,
            passes: 0,
        }
    }

    pub fn passes(&self) -> u64 {
        self.passes
    }

    fn dedup_due(&self) -> bool {
        self.dedup_interval == 0 || self.passes % u64::from(self.dedup_interval) == 0
    }

    pub fn run_pass(
        &mut self,
        world: &mut dyn WorldAccess,
        displays: &mut [Box<dyn DisplayItem>],
    ) -> WatchReport {
        let dedup = self.dedup_due();
        self.passes += 1;

        let mut report = WatchReport::default();
        for display in displays.iter_mut() {
            report.checked += 1;
            match display.health(world) {
                DisplayHealth::Absent => continue,
                DisplayHealth::Spawned => {}
                DisplayHealth::NeedsRegen => match display.fix_display_need_regen(world) {
                    Ok(()) => report.regenerated += 1,
                    Err(err) => {
                        let location = display.display_location();
                        warn!(?location, "display regen failed: {err}");
                        report.failures += 1;
                        continue;
                    }
                },
                DisplayHealth::Moved => match display.fix_display_moved(world) {
                    Ok(()) => report.moved_back += 1,
                    Err(err) => {
                        let location = display.display_location();
                        warn!(?location, "display move fix failed: {err}");
                        report.failures += 1;
                    }
                },
            }
            if dedup && display.remove_dupe(world) {
                report.deduplicated += 1;
            }
        }

        info!(
            pass = self.passes,
            checked = report.checked,
            regenerated = report.regenerated,
            moved_back = report.moved_back,
            deduplicated = report.deduplicated,
            failures = report.failures,
            "display watch pass"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DisplayConfig;
    use crate::display::create_display;
    use crate::entities::entity::EntityKind;
    use crate::entities::item::ItemStack;
    use crate::entities::shop::Shop;
    use crate::world::memory::MemoryWorld;
    use crate::world::position::{BlockPosition, Location};

    fn displays(count: i32) -> Vec<Box<dyn DisplayItem>> {
        (0..count)
            .map(|i| {
                let shop = Shop::new(
                    BlockPosition::new("world", i * 32, 64, 0),
                    ItemStack::new("DIAMOND", 1),
                );
                create_display(shop, &DisplayConfig::default())
            })
            .collect()
    }

    #[test]
    fn pass_repairs_each_kind_of_drift() {
        let mut world = MemoryWorld::new(["world"]);
        let mut displays = displays(3);
        for display in displays.iter_mut() {
            display.spawn(&mut world).expect("spawn");
        }

        let lost = displays[0].display().expect("held");
        world.despawn_entity(lost).expect("despawn");
        let moved = displays[1].display().expect("held");
        world
            .teleport(moved, &Location::new("world", 40.0, 64.0, 3.0))
            .expect("teleport");
        let marker = world
            .entity_item(displays[2].display().expect("held"))
            .expect("item");
        world
            .spawn_entity(
                EntityKind::DroppedItem,
                &displays[2].display_location(),
                Some(marker),
            )
            .expect("spawn");

        let mut watcher = DisplayWatcher::new(0);
        let report = watcher.run_pass(&mut world, &mut displays);
        assert_eq!(
            report,
            WatchReport {
                checked: 3,
                regenerated: 1,
                moved_back: 1,
                deduplicated: 1,
                failures: 0,
            }
        );
        assert_eq!(world.len(), 3);
        for display in &displays {
            assert_eq!(display.health(&world), DisplayHealth::Spawned);
        }
    }

    #[test]
    fn dedup_runs_on_interval() {
        let mut world = MemoryWorld::new(["world"]);
        let mut displays = displays(1);
        displays[0].spawn(&mut world).expect("spawn");
        let location = displays[0].display_location();
        let marker = world
            .entity_item(displays[0].display().expect("held"))
            .expect("item");

        let mut watcher = DisplayWatcher::new(3);
        assert_eq!(watcher.run_pass(&mut world, &mut displays).deduplicated, 0);

        world
            .spawn_entity(EntityKind::DroppedItem, &location, Some(marker))
            .expect("spawn");
        assert_eq!(watcher.run_pass(&mut world, &mut displays).deduplicated, 0);
        assert_eq!(watcher.run_pass(&mut world, &mut displays).deduplicated, 0);
        assert_eq!(world.len(), 2);
        assert_eq!(watcher.run_pass(&mut world, &mut displays).deduplicated, 1);
        assert_eq!(world.len(), 1);
        assert_eq!(watcher.passes(), 4);
    }

    #[test]
    fn failed_regen_is_counted_and_retried() {
        let mut world = MemoryWorld::new(["world"]);
        let mut displays = displays(1);
        displays[0].spawn(&mut world).expect("spawn");
        let chunk = displays[0].display_location().block().chunk();
        world.unload_chunk(&chunk);

        let mut watcher = DisplayWatcher::new(0);
        let report = watcher.run_pass(&mut world, &mut displays);
        assert_eq!(report.failures, 1);
        assert_eq!(report.regenerated, 0);

        world.load_chunk(&chunk);
        let report = watcher.run_pass(&mut world, &mut displays);
        assert_eq!(report.regenerated, 1);
        assert_eq!(report.deduplicated, 1);
        assert_eq!(world.len(), 1);
    }

    #[test]
    fn absent_displays_are_skipped() {
        let mut world = MemoryWorld::new(["world"]);
        let mut displays = displays(2);
        let report = DisplayWatcher::new(0).run_pass(&mut world, &mut displays);
        assert_eq!(report.checked, 2);
        assert_eq!(report.regenerated, 0);
        assert!(world.is_empty());
    }
}
