use blockscape_tiles::LIGHT_VALUE_MAX;
use blockscape_world::TileMapConfig;
use serde::{Deserialize, Serialize};

/// JSON shape of a saved map. Chunk blobs are base64 tile records in chunk row-major
/// order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapDocument {
    pub chunk_width: usize,
    pub chunk_height: usize,
    pub chunk_depth: usize,
    pub width_in_chunks: usize,
    pub height_in_chunks: usize,
    pub depth_in_chunks: usize,
    #[serde(default)]
    pub ambient_light: u8,
    #[serde(default = "default_sky_light")]
    pub sky_light: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lighting_mode: Option<String>,
    pub chunks: Vec<String>,
}

fn default_sky_light() -> u8 {
    LIGHT_VALUE_MAX
}

impl MapDocument {
    pub fn config(&self) -> TileMapConfig {
        TileMapConfig {
            chunk_width: self.chunk_width,
            chunk_height: self.chunk_height,
            chunk_depth: self.chunk_depth,
            width_in_chunks: self.width_in_chunks,
            height_in_chunks: self.height_in_chunks,
            depth_in_chunks: self.depth_in_chunks,
            ambient_light: self.ambient_light,
            sky_light: self.sky_light,
        }
    }
}
