//! Tile grids: the shared container capability and the chunk storage unit.
#![forbid(unsafe_code)]

pub mod chunk;
pub mod container;
pub mod coord;

pub use chunk::{ChunkMesh, TileChunk};
pub use container::TileContainer;
pub use coord::{ChunkCoord, TileCoord};
