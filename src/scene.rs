use std::collections::BTreeMap;
use std::error::Error;
use std::sync::Arc;

use blockscape_chunk::TileContainer;
use blockscape_geom::{Ray, Vec3};
use blockscape_lighting::LightingMode;
use blockscape_mesh_cpu::{ChunkVertexGenerator, LitChunkVertexGenerator};
use blockscape_structures::TilePrefab;
use blockscape_tiles::{Rotation, Tile, TileMeshCollection};
use blockscape_world::{ChunkMeshGenerator, TileMap, TileMapConfig};
use serde::Deserialize;

use crate::terrain::{self, TerrainConfig, TerrainPalette};

/// Everything the `demo` command reads from its TOML file.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub map: TileMapConfig,
    pub terrain: TerrainConfig,
    pub scene: SceneConfig,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Lighting mode tag, `none` for an unlit map.
    pub lighting: String,
    pub huts: usize,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            lighting: "skyAndSources".to_string(),
            huts: 2,
        }
    }
}

impl DemoConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: DemoConfig = toml::from_str(s)?;
        if !cfg.map.is_valid() {
            return Err(format!("invalid map section: {:?}", cfg.map).into());
        }
        Ok(cfg)
    }
}

/// Mesh generator matching a lighting mode: lit output only when something lights it.
pub fn generator_for(mode: LightingMode) -> Arc<dyn ChunkMeshGenerator> {
    match mode {
        LightingMode::None => Arc::new(ChunkVertexGenerator),
        _ => Arc::new(LitChunkVertexGenerator),
    }
}

/// Small plank hut with glass windows, a doorway on its front and a lamp inside.
pub fn hut_prefab(meshes: &TileMeshCollection) -> Result<TilePrefab, Box<dyn Error>> {
    let find = |name: &str| {
        meshes
            .index_of(name)
            .ok_or_else(|| format!("tile mesh '{name}' is required for huts"))
    };
    let (planks, glass, lamp, ramp) = (find("planks")?, find("glass")?, find("lamp")?, find("ramp")?);
    let (w, h, d) = (5, 4, 5);
    let mut hut = TilePrefab::new(w, h, d);
    for y in 0..h {
        for z in 0..d {
            for x in 0..w {
                let edge = x == 0 || z == 0 || x == w - 1 || z == d - 1;
                let index = if y == 0 || y == h - 1 {
                    planks
                } else if !edge {
                    continue;
                } else if x == 2 && z == 0 {
                    // Doorway.
                    continue;
                } else if y == 2 && (x == 2 || z == 2) {
                    glass
                } else {
                    planks
                };
                *hut.get_mut(x, y, z) = Tile::new(index, Tile::COLLIDEABLE);
            }
        }
    }
    *hut.get_mut(2, 1, 2) = Tile::new(lamp, Tile::COLLIDEABLE);
    let mut step = Tile::new(ramp, Tile::COLLIDEABLE | Tile::WALKABLE_SURFACE);
    step.set_rotation(Rotation::R90);
    *hut.get_mut(3, 1, 3) = step;
    Ok(hut)
}

/// Stamps `count` huts on the terrain, each turned a further quarter. Sites that would
/// poke out of the map are skipped. Returns the number placed.
pub fn place_huts(map: &mut TileMap, heights: &[usize], hut: &TilePrefab, count: usize) -> usize {
    let (mw, mh, md) = (map.width(), map.height(), map.depth());
    let mut placed = 0;
    for i in 0..count {
        let rotation = Rotation::from_turns(i as u8);
        let mut view = hut.clone();
        view.rotate(rotation);
        let (vw, vh, vd) = (view.width(), view.height(), view.depth());
        if vw > mw || vd > md {
            break;
        }
        let x0 = (i * 17 + 3) % (mw - vw + 1);
        let z0 = (i * 29 + 5) % (md - vd + 1);
        let ground = (z0..z0 + vd)
            .flat_map(|z| (x0..x0 + vw).map(move |x| heights[x + z * mw]))
            .max()
            .unwrap_or(0);
        if ground + vh > mh {
            log::warn!(target: "tilemap", "hut {} at ({}, {}) does not fit under the sky", i, x0, z0);
            continue;
        }
        hut.place_in(map, (x0, ground, z0), rotation);
        placed += 1;
        log::debug!(
            target: "tilemap",
            "hut {} at ({}, {}, {}) facing {}deg",
            i,
            x0,
            ground,
            z0,
            rotation.degrees()
        );
    }
    placed
}

/// Builds the demo map: terrain, huts, then a full light and mesh pass.
pub fn build_demo(
    cfg: &DemoConfig,
    meshes: Arc<TileMeshCollection>,
    seed: i32,
) -> Result<(TileMap, LightingMode), Box<dyn Error>> {
    let mode: LightingMode = cfg.scene.lighting.parse()?;
    let palette = TerrainPalette::resolve(&meshes)?;
    let hut = hut_prefab(&meshes)?;
    let mut map = TileMap::new(cfg.map, meshes).with_generator(generator_for(mode));
    map.set_lighter(mode.lighter());
    let heights = terrain::generate(&mut map, &cfg.terrain, &palette, seed);
    let huts = place_huts(&mut map, &heights, &hut, cfg.scene.huts);
    log::info!(target: "tilemap", "placed {} of {} huts", huts, cfg.scene.huts);
    map.update_lighting();
    map.update_all_meshes();
    Ok((map, mode))
}

/// Human-readable summary of a map's contents and generated buffers.
pub fn report(map: &TileMap, mode: LightingMode) -> String {
    let c = map.config();
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    let mut sky_lit = 0;
    for chunk in map.chunks() {
        for t in chunk.tiles() {
            if t.is_sky_lit() {
                sky_lit += 1;
            }
            if !t.is_empty() {
                *counts.entry(map.mesh_of(t).name()).or_default() += 1;
            }
        }
    }
    let (mut opaque, mut alpha) = (0, 0);
    for chunk in map.chunks() {
        opaque += chunk.opaque_mesh().map_or(0, |b| b.len());
        alpha += chunk.alpha_mesh().map_or(0, |b| b.len());
    }

    let mut out = String::new();
    out.push_str(&format!(
        "map {}x{}x{} tiles in {}x{}x{} chunks, lighting {}\n",
        map.width(),
        map.height(),
        map.depth(),
        c.width_in_chunks,
        c.height_in_chunks,
        c.depth_in_chunks,
        mode.tag().unwrap_or("none")
    ));
    for (name, n) in &counts {
        out.push_str(&format!("  {name:<10} {n}\n"));
    }
    out.push_str(&format!("sky-lit tiles: {sky_lit}\n"));
    out.push_str(&format!("vertices: opaque {opaque}, alpha {alpha}\n"));

    // Drop a ray on the middle of the map to find the ground.
    let (cx, cz) = (map.width() as f32 * 0.5 + 0.25, map.depth() as f32 * 0.5 + 0.25);
    let ray = Ray::new(
        Vec3::new(cx, map.height() as f32 + 4.0, cz),
        Vec3::new(0.0, -1.0, 0.0),
    );
    match map.check_for_precise_collision(&ray, map.meshes()) {
        Some((cell, hit)) => out.push_str(&format!(
            "ground hit: tile ({}, {}, {}) '{}' at y={:.2}\n",
            cell.x,
            cell.y,
            cell.z,
            map.tile(cell.x, cell.y, cell.z).map_or("?", |t| map.mesh_of(t).name()),
            hit.y
        )),
        None => out.push_str("ground hit: no collideable tile\n"),
    }
    out
}
