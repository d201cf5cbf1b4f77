use crate::world::position::{ChunkCoord, Location};

/// A rectangle of chunk columns in one world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub world: String,
    pub min: (i32, i32),
    pub max: (i32, i32),
}

impl Region {
    pub fn chunk(chunk: &ChunkCoord) -> Self {
        Self::around(chunk, 0)
    }

    pub fn around(center: &ChunkCoord, radius: u8) -> Self {
        let radius = i32::from(radius);
        Self {
            world: center.world.clone(),
            min: (center.x.saturating_sub(radius), center.z.saturating_sub(radius)),
            max: (center.x.saturating_add(radius), center.z.saturating_add(radius)),
        }
    }

    pub fn contains_chunk(&self, chunk: &ChunkCoord) -> bool {
        chunk.world == self.world
            && chunk.x >= self.min.0
            && chunk.x <= self.max.0
            && chunk.z >= self.min.1
            && chunk.z <= self.max.1
    }

    pub fn contains(&self, location: &Location) -> bool {
        self.contains_chunk(&location.block().chunk())
    }
}
