use std::error::Error;

use blockscape_chunk::TileContainer;
use blockscape_tiles::{Tile, TileMeshCollection};
use blockscape_world::TileMap;
use fastnoise_lite::{FastNoiseLite, NoiseType};
use serde::Deserialize;

/// Heightmap terrain parameters. Ratios are fractions of the map height.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    pub frequency: f32,
    pub min_height_ratio: f32,
    pub max_height_ratio: f32,
    /// Soil layers between the surface tile and stone.
    pub topsoil: usize,
    /// Columns at or above this height ratio are capped with snow.
    pub snow_ratio: f32,
    /// Columns at or below this height ratio are sand.
    pub sand_ratio: f32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            frequency: 0.02,
            min_height_ratio: 0.2,
            max_height_ratio: 0.6,
            topsoil: 3,
            snow_ratio: 0.55,
            sand_ratio: 0.26,
        }
    }
}

/// Mesh indices the generator paints with.
#[derive(Clone, Copy, Debug)]
pub struct TerrainPalette {
    pub stone: u16,
    pub dirt: u16,
    pub grass: u16,
    pub sand: u16,
    pub snow: u16,
}

impl TerrainPalette {
    pub fn resolve(meshes: &TileMeshCollection) -> Result<Self, Box<dyn Error>> {
        let find = |name: &str| {
            meshes
                .index_of(name)
                .ok_or_else(|| format!("tile mesh '{name}' is required for terrain"))
        };
        Ok(Self {
            stone: find("stone")?,
            dirt: find("dirt")?,
            grass: find("grass")?,
            sand: find("sand")?,
            snow: find("snow")?,
        })
    }
}

/// Fills `map` with noise terrain and returns the column heights in `x + z * width`
/// order (the first empty y of each column).
pub fn generate(
    map: &mut TileMap,
    cfg: &TerrainConfig,
    palette: &TerrainPalette,
    seed: i32,
) -> Vec<usize> {
    let mut noise = FastNoiseLite::with_seed(seed);
    noise.set_noise_type(Some(NoiseType::OpenSimplex2));
    noise.set_frequency(Some(cfg.frequency));

    let (w, h, d) = (map.width(), map.height(), map.depth());
    let mut heights = vec![0usize; w * d];
    for z in 0..d {
        for x in 0..w {
            let t = ((noise.get_noise_2d(x as f32, z as f32) + 1.0) * 0.5).clamp(0.0, 1.0);
            let ratio = cfg.min_height_ratio + (cfg.max_height_ratio - cfg.min_height_ratio) * t;
            let height = ((ratio * h as f32) as usize).clamp(1, h.saturating_sub(1).max(1));
            let surface = if ratio >= cfg.snow_ratio {
                palette.snow
            } else if ratio <= cfg.sand_ratio {
                palette.sand
            } else {
                palette.grass
            };
            let soil = if surface == palette.sand { palette.sand } else { palette.dirt };
            for y in 0..height {
                let index = if y + 1 == height {
                    surface
                } else if y + 1 + cfg.topsoil >= height {
                    soil
                } else {
                    palette.stone
                };
                *map.get_mut(x, y, z) = Tile::new(index, Tile::COLLIDEABLE);
            }
            heights[x + z * w] = height;
        }
    }
    log::debug!(target: "tilemap", "terrain seed={} columns={}", seed, heights.len());
    heights
}
