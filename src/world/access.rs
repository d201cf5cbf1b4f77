use crate::entities::entity::{EntityKind, EntityRef};
use crate::entities::item::ItemStack;
use crate::world::area::Region;
use crate::world::position::{ChunkCoord, Location};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorldError {
    #[error("entity {0} does not exist")]
    UnknownEntity(EntityRef),

    #[error("chunk {0} is not loaded")]
    ChunkNotLoaded(ChunkCoord),

    #[error("world {0} is not loaded")]
    UnknownWorld(String),

    #[error("entity {0} cannot carry an item")]
    NoItemSlot(EntityRef),
}

/// An entity as seen by a region query.
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySnapshot {
    pub entity: EntityRef,
    pub kind: EntityKind,
    pub location: Location,
    pub item: Option<ItemStack>,
}

/// The operations display markers need from the host world.
///
/// Implementations own all entity state; callers hold only [`EntityRef`]
/// handles and must re-check them with [`WorldAccess::entity_exists`].
pub trait WorldAccess {
    fn spawn_entity(
        &mut self,
        kind: EntityKind,
        location: &Location,
        item: Option<ItemStack>,
    ) -> Result<EntityRef, WorldError>;

    fn despawn_entity(&mut self, entity: EntityRef) -> Result<(), WorldError>;

    fn entity_exists(&self, entity: EntityRef) -> bool;

    fn entity_position(&self, entity: EntityRef) -> Option<Location>;

    fn teleport(&mut self, entity: EntityRef, location: &Location) -> Result<(), WorldError>;

    /// Entities inside loaded chunks of `region`; unloaded chunks are skipped.
    fn entities_in_region(&self, region: &Region) -> Vec<EntitySnapshot>;

    fn entity_item(&self, entity: EntityRef) -> Option<ItemStack>;

    fn set_entity_item(&mut self, entity: EntityRef, item: ItemStack) -> Result<(), WorldError>;
}
