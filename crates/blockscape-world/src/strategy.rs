use blockscape_chunk::{ChunkCoord, ChunkMesh};

use crate::map::TileMap;

/// Computes per-tile light values for a whole map. Every call is a full recompute.
pub trait TileMapLighter: Send + Sync {
    fn light(&self, map: &mut TileMap);
}

/// Builds render buffers for one chunk from the map's current tiles and light.
pub trait ChunkMeshGenerator: Send + Sync {
    fn generate(&self, map: &TileMap, chunk: ChunkCoord) -> ChunkMesh;

    /// Whether output depends on light values, so relighting should trigger remeshing.
    fn uses_lighting(&self) -> bool {
        false
    }
}
