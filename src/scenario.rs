use crate::config::DisplayConfig;
use crate::display::factory::{GuardError, MarkerFactory};
use crate::entities::entity::EntityKind;
use crate::entities::item::ItemStack;
use crate::entities::shop::Shop;
use crate::world::access::{WorldAccess, WorldError};
use crate::world::memory::MemoryWorld;
use crate::world::position::{ChunkCoord, Location};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read scenario {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse scenario {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("entity {entity} refers to unknown shop {shop}")]
    UnknownShop { entity: usize, shop: usize },

    #[error(transparent)]
    Guard(#[from] GuardError),

    #[error(transparent)]
    World(#[from] WorldError),
}

/// An entity present before displays are spawned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioEntity {
    pub kind: EntityKind,
    pub location: Location,
    #[serde(default)]
    pub item: Option<ItemStack>,
    /// Replace `item` with a guarded marker of this shop, as a left-over
    /// display from an earlier run would be.
    #[serde(default)]
    pub marker_of: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnloadedChunk {
    pub world: String,
    pub x: i32,
    pub z: i32,
}

/// World snapshot for an offline display audit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub worlds: Vec<String>,
    pub shops: Vec<Shop>,
    pub entities: Vec<ScenarioEntity>,
    pub unloaded_chunks: Vec<UnloadedChunk>,
}

impl Scenario {
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let text = std::fs::read_to_string(path).map_err(|source| ScenarioError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text).map_err(|source| ScenarioError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn build_world(&self, config: &DisplayConfig) -> Result<MemoryWorld, ScenarioError> {
        let mut world = MemoryWorld::new(self.worlds.iter().cloned());
        let factory = MarkerFactory::new(config);
        for (index, entity) in self.entities.iter().enumerate() {
            let item = match entity.marker_of {
                Some(shop_index) => {
                    let shop = self.shops.get(shop_index).ok_or(ScenarioError::UnknownShop {
                        entity: index,
                        shop: shop_index,
                    })?;
                    let source = entity.item.as_ref().unwrap_or(&shop.item);
                    Some(factory.create_guarded(source, shop)?)
                }
                None => entity.item.clone(),
            };
            world.spawn_entity(entity.kind, &entity.location, item)?;
        }
        for chunk in &self.unloaded_chunks {
            world.unload_chunk(&ChunkCoord::new(chunk.world.clone(), chunk.x, chunk.z));
        }
        Ok(world)
    }
}
