//! Tile values, tile meshes, and the mesh collection.
#![forbid(unsafe_code)]

pub mod atlas;
pub mod collection;
pub mod config;
pub mod error;
pub mod face;
pub mod mesh;
pub mod tile;
pub mod vertex;

pub use atlas::{TextureAtlas, UvRect};
pub use collection::TileMeshCollection;
pub use error::TileDefError;
pub use face::{Face, Rotation};
pub use mesh::{CubeTileMeshDef, ModelTileMeshDef, TileMesh, TileMeshShape, VERTICES_PER_FACE};
pub use tile::{LIGHT_VALUE_MAX, Tile};
pub use vertex::{Vertex, VertexAttribute, VertexBuffer, VertexLayout};
