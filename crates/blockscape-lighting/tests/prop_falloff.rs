use std::sync::Arc;

use blockscape_chunk::TileContainer;
use blockscape_lighting::LightSpreadingTileMapLighter;
use blockscape_tiles::{CubeTileMeshDef, Face, TextureAtlas, Tile, TileMeshCollection};
use blockscape_world::{TileMap, TileMapConfig, TileMapLighter};
use proptest::prelude::*;

const N: usize = 6;

fn meshes() -> Arc<TileMeshCollection> {
    let mut c = TileMeshCollection::new(TextureAtlas::new(64, 64, 16, 16));
    c.add_cube_all("stone", 0).unwrap();
    c.add_cube(
        &CubeTileMeshDef::new("glass")
            .all_textures(1)
            .alpha(true)
            .opaque_sides(0)
            .translucency(0.5),
    )
    .unwrap();
    c.add_cube(&CubeTileMeshDef::new("lamp").all_textures(2).light(12))
        .unwrap();
    Arc::new(c)
}

fn lit_map(cells: &[u16], ambient: u8) -> TileMap {
    let config = TileMapConfig {
        chunk_width: N,
        chunk_height: N,
        chunk_depth: N,
        ambient_light: ambient,
        ..Default::default()
    };
    let mut map = TileMap::new(config, meshes());
    for y in 0..N {
        for z in 0..N {
            for x in 0..N {
                let index = cells[(y * N + z) * N + x];
                if index != 0 {
                    map.get_mut(x, y, z).set(index, Tile::COLLIDEABLE);
                }
            }
        }
    }
    LightSpreadingTileMapLighter.light(&mut map);
    map
}

fn brightest_neighbor(map: &TileMap, x: usize, y: usize, z: usize, sky: bool) -> u8 {
    Face::ALL
        .iter()
        .filter_map(|f| {
            let (dx, dy, dz) = f.delta();
            map.get_safe(x as i32 + dx, y as i32 + dy, z as i32 + dz)
        })
        .map(|t| if sky { t.sky_light } else { t.tile_light })
        .max()
        .unwrap_or(0)
}

fn cells() -> impl Strategy<Value = Vec<u16>> {
    // Mostly air, some stone, a little glass and the odd lamp.
    let cell = prop_oneof![6 => Just(0u16), 3 => Just(1u16), 1 => Just(2u16), 1 => Just(3u16)];
    prop::collection::vec(cell, N * N * N)
}

proptest! {
    #[test]
    fn every_spread_value_has_a_brighter_neighbor(cells in cells(), ambient in 0u8..4) {
        let map = lit_map(&cells, ambient);
        for y in 0..N {
            for z in 0..N {
                for x in 0..N {
                    let t = *map.get(x, y, z);
                    prop_assert!(t.tile_light <= 15 && t.sky_light <= 15);
                    let emitter = !t.is_empty() && map.mesh_of(&t).light_value() > 0;
                    if t.tile_light > ambient && !emitter {
                        prop_assert!(brightest_neighbor(&map, x, y, z, false) > t.tile_light);
                    }
                    if t.sky_light > 0 && !t.is_sky_lit() {
                        prop_assert!(brightest_neighbor(&map, x, y, z, true) > t.sky_light);
                    }
                }
            }
        }
    }

    #[test]
    fn tile_light_never_reaches_past_the_emission(cells in cells()) {
        let map = lit_map(&cells, 0);
        let lamps: Vec<(i32, i32, i32)> = (0..N * N * N)
            .filter(|i| cells[*i] == 3)
            .map(|i| ((i % N) as i32, (i / (N * N)) as i32, ((i / N) % N) as i32))
            .collect();
        for y in 0..N {
            for z in 0..N {
                for x in 0..N {
                    let light = map.get(x, y, z).tile_light as i32;
                    if light == 0 {
                        continue;
                    }
                    // Some lamp lies within 12 - light steps.
                    let reach = lamps.iter().any(|(lx, ly, lz)| {
                        (lx - x as i32).abs() + (ly - y as i32).abs() + (lz - z as i32).abs()
                            <= 12 - light
                    });
                    prop_assert!(reach, "({x},{y},{z}) holds {light} with no lamp in range");
                }
            }
        }
    }
}
