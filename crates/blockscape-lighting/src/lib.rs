//! Tile map lighting: sky casting and flood-fill propagation.
#![forbid(unsafe_code)]

use std::collections::VecDeque;
use std::time::Instant;

use blockscape_chunk::TileContainer;
use blockscape_tiles::{Face, Tile, TileMeshCollection};
use blockscape_world::{TileMap, TileMapLighter};

mod mode;

pub use mode::{LightingMode, ParseLightingModeError};

/// The two independent light channels a tile stores.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LightChannel {
    Sky,
    Tile,
}

impl LightChannel {
    #[inline]
    pub fn get(self, tile: &Tile) -> u8 {
        match self {
            LightChannel::Sky => tile.sky_light,
            LightChannel::Tile => tile.tile_light,
        }
    }

    #[inline]
    fn set(self, tile: &mut Tile, v: u8) {
        match self {
            LightChannel::Sky => tile.set_sky_light(v),
            LightChannel::Tile => tile.set_tile_light(v),
        }
    }
}

/// Work item: cell and the light level it holds.
pub type LightNode = (usize, usize, usize, u8);

/// Passes shared by every lighter.
pub struct BaseTileMapLighter;

impl BaseTileMapLighter {
    /// Clears sky light and the sky-lit flag everywhere and sets tile light to the
    /// map's ambient level.
    pub fn reset(map: &mut TileMap) {
        let ambient = map.ambient_light();
        let (w, h, d) = (map.width(), map.height(), map.depth());
        for y in 0..h {
            for z in 0..d {
                for x in 0..w {
                    let t = map.get_mut(x, y, z);
                    t.clear_flag(Tile::SKY_LIT);
                    t.sky_light = 0;
                    t.set_tile_light(ambient);
                }
            }
        }
    }

    /// Walks every column top-down from the map's sky light. Each visited tile is marked
    /// sky-lit and stores the carried value; non-empty tiles that let light through
    /// vertically scale it by their translucency first. The first tile opaque on its top
    /// or bottom receives the light but ends the column. A column also ends once the
    /// carried light has dropped to zero; that tile and the ones below stay unlit.
    /// Returns the number of sky-lit tiles.
    pub fn cast_sky_light(map: &mut TileMap) -> usize {
        let meshes = map.meshes().clone();
        let sky = map.sky_light();
        let (w, h, d) = (map.width(), map.height(), map.depth());
        let mut lit = 0;
        for z in 0..d {
            for x in 0..w {
                let mut light = sky;
                for y in (0..h).rev() {
                    let t = map.get_mut(x, y, z);
                    let mut blocks = false;
                    if !t.is_empty() {
                        let mesh = meshes.get(t);
                        blocks = mesh.is_opaque(Face::TOP) || mesh.is_opaque(Face::BOTTOM);
                        if !blocks {
                            light = attenuate(light, mesh.translucency());
                        }
                    }
                    if light == 0 {
                        break;
                    }
                    t.set_flag(Tile::SKY_LIT);
                    t.set_sky_light(light);
                    lit += 1;
                    if blocks {
                        break;
                    }
                }
            }
        }
        lit
    }

    /// Floods `queue` outward through the map on one channel. A neighbor takes
    /// `level - 1`, scaled by its translucency when non-empty, if it is not opaque on
    /// the side facing the source and currently holds less. Returns cells updated.
    pub fn spread(map: &mut TileMap, channel: LightChannel, queue: &mut VecDeque<LightNode>) -> usize {
        let meshes = map.meshes().clone();
        let (w, h, d) = (map.width() as i32, map.height() as i32, map.depth() as i32);
        let mut updated = 0;
        while let Some((x, y, z, level)) = queue.pop_front() {
            // A brighter value reached this cell after it was queued.
            if channel.get(map.get(x, y, z)) != level || level <= 1 {
                continue;
            }
            for face in Face::ALL {
                let (dx, dy, dz) = face.delta();
                let (nx, ny, nz) = (x as i32 + dx, y as i32 + dy, z as i32 + dz);
                if nx < 0 || ny < 0 || nz < 0 || nx >= w || ny >= h || nz >= d {
                    continue;
                }
                let (nx, ny, nz) = (nx as usize, ny as usize, nz as usize);
                let n = map.get_mut(nx, ny, nz);
                let Some(v) = admitted_light(&meshes, n, face, level - 1) else {
                    continue;
                };
                if channel.get(n) < v {
                    channel.set(n, v);
                    queue.push_back((nx, ny, nz, v));
                    updated += 1;
                }
            }
        }
        updated
    }
}

#[inline]
fn attenuate(light: u8, translucency: f32) -> u8 {
    (light as f32 * translucency).floor() as u8
}

// Light a neighbor entered through `face` (as seen from the source) would receive, or
// `None` when its mesh blocks that side or nothing is left.
#[inline]
fn admitted_light(meshes: &TileMeshCollection, n: &Tile, face: Face, incoming: u8) -> Option<u8> {
    let v = if n.is_empty() {
        incoming
    } else {
        let mesh = meshes.get(n);
        let local = face.opposite().rotated(n.facing().inverse());
        if mesh.is_opaque(local) {
            return None;
        }
        attenuate(incoming, mesh.translucency())
    };
    (v > 0).then_some(v)
}

/// Reset plus sky casting. No horizontal spread.
#[derive(Copy, Clone, Debug, Default)]
pub struct SimpleTileMapLighter;

impl TileMapLighter for SimpleTileMapLighter {
    fn light(&self, map: &mut TileMap) {
        let t0 = Instant::now();
        BaseTileMapLighter::reset(map);
        let lit = BaseTileMapLighter::cast_sky_light(map);
        log::info!(
            target: "perf",
            "ms={} light_simple sky_lit={}",
            t0.elapsed().as_millis(),
            lit
        );
    }
}

/// Reset, sky casting, then flood fill of sky light from sky-lit empty cells and of
/// tile light from emissive meshes.
#[derive(Copy, Clone, Debug, Default)]
pub struct LightSpreadingTileMapLighter;

impl TileMapLighter for LightSpreadingTileMapLighter {
    fn light(&self, map: &mut TileMap) {
        let t0 = Instant::now();
        BaseTileMapLighter::reset(map);
        let lit = BaseTileMapLighter::cast_sky_light(map);

        let meshes = map.meshes().clone();
        let (w, h, d) = (map.width(), map.height(), map.depth());
        let mut sky = VecDeque::new();
        let mut sources = VecDeque::new();
        for y in 0..h {
            for z in 0..d {
                for x in 0..w {
                    let t = map.get_mut(x, y, z);
                    if t.is_empty() {
                        if t.is_sky_lit() && t.sky_light > 1 {
                            sky.push_back((x, y, z, t.sky_light));
                        }
                        continue;
                    }
                    let emission = meshes.get(t).light_value();
                    if emission > 0 {
                        if t.tile_light < emission {
                            t.set_tile_light(emission);
                        }
                        sources.push_back((x, y, z, t.tile_light));
                    }
                }
            }
        }
        let seeds = (sky.len(), sources.len());
        let sky_spread = BaseTileMapLighter::spread(map, LightChannel::Sky, &mut sky);
        let tile_spread = BaseTileMapLighter::spread(map, LightChannel::Tile, &mut sources);
        log::info!(
            target: "perf",
            "ms={} light_spread sky_lit={} sky_seeds={} sources={} sky_updates={} tile_updates={}",
            t0.elapsed().as_millis(),
            lit,
            seeds.0,
            seeds.1,
            sky_spread,
            tile_spread
        );
    }
}
