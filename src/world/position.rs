use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer block coordinates, the canonical location of a shop.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockPosition {
    pub world: String,
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

/// Continuous coordinates of an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub world: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationDelta {
    pub dx: f64,
    pub dy: f64,
    pub dz: f64,
}

/// Chunk column coordinates, the unit the world loads and unloads in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChunkCoord {
    pub world: String,
    pub x: i32,
    pub z: i32,
}

pub const CHUNK_SIZE: i32 = 16;

impl BlockPosition {
    pub fn new(world: impl Into<String>, x: i32, y: i32, z: i32) -> Self {
        Self {
            world: world.into(),
            x,
            y,
            z,
        }
    }

    /// Corner of the block as a continuous location.
    pub fn to_location(&self) -> Location {
        Location {
            world: self.world.clone(),
            x: f64::from(self.x),
            y: f64::from(self.y),
            z: f64::from(self.z),
        }
    }

    pub fn chunk(&self) -> ChunkCoord {
        ChunkCoord {
            world: self.world.clone(),
            x: self.x.div_euclid(CHUNK_SIZE),
            z: self.z.div_euclid(CHUNK_SIZE),
        }
    }
}

/// `world,x,y,z`; this string is embedded in protection flags and must not change.
impl fmt::Display for BlockPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.world, self.x, self.y, self.z)
    }
}

impl fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{},{}", self.world, self.x, self.z)
    }
}

impl Location {
    pub fn new(world: impl Into<String>, x: f64, y: f64, z: f64) -> Self {
        Self {
            world: world.into(),
            x,
            y,
            z,
        }
    }

    pub fn offset(&self, delta: LocationDelta) -> Self {
        Self {
            world: self.world.clone(),
            x: self.x + delta.dx,
            y: self.y + delta.dy,
            z: self.z + delta.dz,
        }
    }

    pub fn block(&self) -> BlockPosition {
        BlockPosition {
            world: self.world.clone(),
            x: self.x.floor() as i32,
            y: self.y.floor() as i32,
            z: self.z.floor() as i32,
        }
    }

    /// Same world and every axis within `tolerance`.
    pub fn approx_eq(&self, other: &Location, tolerance: f64) -> bool {
        self.world == other.world
            && (self.x - other.x).abs() <= tolerance
            && (self.y - other.y).abs() <= tolerance
            && (self.z - other.z).abs() <= tolerance
    }
}

impl ChunkCoord {
    pub fn new(world: impl Into<String>, x: i32, z: i32) -> Self {
        Self {
            world: world.into(),
            x,
            z,
        }
    }
}
