use crate::entities::entity::{EntityKind, EntityRef};
use crate::entities::item::ItemStack;
use crate::world::access::{EntitySnapshot, WorldAccess, WorldError};
use crate::world::area::Region;
use crate::world::position::{ChunkCoord, Location};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone)]
struct EntityEntry {
    kind: EntityKind,
    location: Location,
    item: Option<ItemStack>,
}

#[derive(Debug, Clone, Default)]
struct Slot {
    generation: u32,
    entry: Option<EntityEntry>,
}

/// Generational entity arena with chunk loading.
///
/// Unloading a chunk stashes its entities and invalidates their handles;
/// loading it again brings them back under fresh handles, the way a host
/// world rebuilds entity objects after a chunk reload.
#[derive(Debug, Default)]
pub struct MemoryWorld {
    worlds: HashSet<String>,
    slots: Vec<Slot>,
    free: Vec<u32>,
    unloaded: HashMap<ChunkCoord, Vec<EntityEntry>>,
}

impl MemoryWorld {
    pub fn new<I, S>(worlds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            worlds: worlds.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.entry.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_chunk_loaded(&self, chunk: &ChunkCoord) -> bool {
        self.worlds.contains(&chunk.world) && !self.unloaded.contains_key(chunk)
    }

    /// Returns how many live entities were stashed.
    pub fn unload_chunk(&mut self, chunk: &ChunkCoord) -> usize {
        if self.unloaded.contains_key(chunk) {
            return 0;
        }
        let mut stashed = Vec::new();
        for (index, slot) in self.slots.iter_mut().enumerate() {
            let in_chunk = slot
                .entry
                .as_ref()
                .is_some_and(|entry| entry.location.block().chunk() == *chunk);
            if in_chunk {
                if let Some(entry) = slot.entry.take() {
                    stashed.push(entry);
                }
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(index as u32);
            }
        }
        let count = stashed.len();
        self.unloaded.insert(chunk.clone(), stashed);
        count
    }

    /// Returns the fresh handles of restored entities.
    pub fn load_chunk(&mut self, chunk: &ChunkCoord) -> Vec<EntityRef> {
        let Some(stashed) = self.unloaded.remove(chunk) else {
            return Vec::new();
        };
        stashed.into_iter().map(|entry| self.insert(entry)).collect()
    }

    fn insert(&mut self, entry: EntityEntry) -> EntityRef {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.entry = Some(entry);
            return EntityRef {
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            entry: Some(entry),
        });
        EntityRef {
            index,
            generation: 0,
        }
    }

    /// Every loaded entity, in slot order.
    pub fn entities(&self) -> Vec<EntitySnapshot> {
        self.snapshots(|_| true)
    }

    fn snapshots(&self, mut keep: impl FnMut(&EntityEntry) -> bool) -> Vec<EntitySnapshot> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| {
                let entry = slot.entry.as_ref().filter(|entry| keep(entry))?;
                Some(EntitySnapshot {
                    entity: EntityRef {
                        index: index as u32,
                        generation: slot.generation,
                    },
                    kind: entry.kind,
                    location: entry.location.clone(),
                    item: entry.item.clone(),
                })
            })
            .collect()
    }

    fn entry(&self, entity: EntityRef) -> Option<&EntityEntry> {
        let slot = self.slots.get(entity.index as usize)?;
        if slot.generation != entity.generation {
            return None;
        }
        slot.entry.as_ref()
    }

    fn entry_mut(&mut self, entity: EntityRef) -> Result<&mut EntityEntry, WorldError> {
        self.slots
            .get_mut(entity.index as usize)
            .filter(|slot| slot.generation == entity.generation)
            .and_then(|slot| slot.entry.as_mut())
            .ok_or(WorldError::UnknownEntity(entity))
    }

    fn check_loaded(&self, location: &Location) -> Result<(), WorldError> {
        if !self.worlds.contains(&location.world) {
            return Err(WorldError::UnknownWorld(location.world.clone()));
        }
        let chunk = location.block().chunk();
        if self.unloaded.contains_key(&chunk) {
            return Err(WorldError::ChunkNotLoaded(chunk));
        }
        Ok(())
    }
}

impl WorldAccess for MemoryWorld {
    fn spawn_entity(
        &mut self,
        kind: EntityKind,
        location: &Location,
        item: Option<ItemStack>,
    ) -> Result<EntityRef, WorldError> {
        self.check_loaded(location)?;
        Ok(self.insert(EntityEntry {
            kind,
            location: location.clone(),
            item,
        }))
    }

    fn despawn_entity(&mut self, entity: EntityRef) -> Result<(), WorldError> {
        let slot = self
            .slots
            .get_mut(entity.index as usize)
            .filter(|slot| slot.generation == entity.generation && slot.entry.is_some())
            .ok_or(WorldError::UnknownEntity(entity))?;
        slot.entry = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(entity.index);
        Ok(())
    }

    fn entity_exists(&self, entity: EntityRef) -> bool {
        self.entry(entity).is_some()
    }

    fn entity_position(&self, entity: EntityRef) -> Option<Location> {
        self.entry(entity).map(|entry| entry.location.clone())
    }

    fn teleport(&mut self, entity: EntityRef, location: &Location) -> Result<(), WorldError> {
        self.check_loaded(location)?;
        let entry = self.entry_mut(entity)?;
        entry.location = location.clone();
        Ok(())
    }

    fn entities_in_region(&self, region: &Region) -> Vec<EntitySnapshot> {
        self.snapshots(|entry| region.contains(&entry.location))
    }

    fn entity_item(&self, entity: EntityRef) -> Option<ItemStack> {
        self.entry(entity)?.item.clone()
    }

    fn set_entity_item(&mut self, entity: EntityRef, item: ItemStack) -> Result<(), WorldError> {
        let entry = self.entry_mut(entity)?;
        if !entry.kind.carries_item() {
            return Err(WorldError::NoItemSlot(entity));
        }
        entry.item = Some(item);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_world() -> MemoryWorld {
        MemoryWorld::new(["world"])
    }

    fn spawn_at(world: &mut MemoryWorld, x: f64, z: f64) -> EntityRef {
        world
            .spawn_entity(
                EntityKind::DroppedItem,
                &Location::new("world", x, 64.0, z),
                Some(ItemStack::new("STONE", 1)),
            )
            .expect("spawn")
    }

    #[test]
    fn despawned_handle_does_not_alias_reused_slot() {
        let mut world = test_world();
        let first = spawn_at(&mut world, 1.0, 1.0);
        world.despawn_entity(first).expect("despawn");
        let second = spawn_at(&mut world, 2.0, 2.0);

        assert_eq!(first.index, second.index);
        assert!(!world.entity_exists(first));
        assert!(world.entity_exists(second));
        assert_eq!(
            world.despawn_entity(first),
            Err(WorldError::UnknownEntity(first))
        );
    }

    #[test]
    fn spawn_in_unknown_world_fails() {
        let mut world = test_world();
        let result = world.spawn_entity(
            EntityKind::DroppedItem,
            &Location::new("world_the_end", 0.0, 64.0, 0.0),
            None,
        );
        assert_eq!(
            result,
            Err(WorldError::UnknownWorld("world_the_end".to_string()))
        );
    }

    #[test]
    fn unload_and_reload_chunk_issues_new_handles() {
        let mut world = test_world();
        let entity = spawn_at(&mut world, 3.0, 3.0);
        let chunk = ChunkCoord::new("world", 0, 0);

        assert_eq!(world.unload_chunk(&chunk), 1);
        assert!(!world.entity_exists(entity));
        assert!(!world.is_chunk_loaded(&chunk));
        assert!(world
            .spawn_entity(EntityKind::DroppedItem, &Location::new("world", 1.0, 64.0, 1.0), None)
            .is_err());

        let restored = world.load_chunk(&chunk);
        assert_eq!(restored.len(), 1);
        assert_ne!(restored[0], entity);
        assert!(world.entity_exists(restored[0]));
        assert!(!world.entity_exists(entity));
    }

    #[test]
    fn region_query_filters_by_chunk() {
        let mut world = test_world();
        let inside = spawn_at(&mut world, 5.0, 5.0);
        spawn_at(&mut world, 40.0, 5.0);

        let region = Region::chunk(&ChunkCoord::new("world", 0, 0));
        let found = world.entities_in_region(&region);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].entity, inside);
        assert_eq!(found[0].item, Some(ItemStack::new("STONE", 1)));
    }

    #[test]
    fn set_item_requires_item_carrier() {
        let mut world = test_world();
        let other = world
            .spawn_entity(EntityKind::Other, &Location::new("world", 0.0, 64.0, 0.0), None)
            .expect("spawn");
        assert_eq!(
            world.set_entity_item(other, ItemStack::new("STONE", 1)),
            Err(WorldError::NoItemSlot(other))
        );
    }

    #[test]
    fn teleport_moves_entity() {
        let mut world = test_world();
        let entity = spawn_at(&mut world, 1.0, 1.0);
        let target = Location::new("world", 8.0, 70.0, 8.0);
        world.teleport(entity, &target).expect("teleport");
        assert_eq!(world.entity_position(entity), Some(target));
    }
}
