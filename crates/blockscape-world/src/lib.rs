//! The chunked tile map and the strategy seams it drives.
#![forbid(unsafe_code)]

pub mod map;
pub mod strategy;

pub use blockscape_chunk::{ChunkCoord, ChunkMesh, TileChunk, TileContainer, TileCoord};
pub use map::{TileMap, TileMapConfig};
pub use strategy::{ChunkMeshGenerator, TileMapLighter};
