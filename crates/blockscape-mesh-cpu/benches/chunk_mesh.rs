use std::sync::Arc;
use std::time::Duration;

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use blockscape_lighting::LightSpreadingTileMapLighter;
use blockscape_mesh_cpu::{ChunkVertexGenerator, LitChunkVertexGenerator};
use blockscape_tiles::{CubeTileMeshDef, TextureAtlas, Tile, TileMeshCollection};
use blockscape_world::{ChunkCoord, ChunkMeshGenerator, TileMap, TileMapConfig, TileMapLighter};

fn terrain_map() -> TileMap {
    let mut c = TileMeshCollection::new(TextureAtlas::new(256, 256, 16, 16));
    let grass = c.add_cube_top_side("grass", 0, 1, 2).unwrap();
    let stone = c.add_cube_all("stone", 3).unwrap();
    let glass = c
        .add_cube(
            &CubeTileMeshDef::new("glass")
                .all_textures(4)
                .alpha(true)
                .opaque_sides(0)
                .translucency(0.8),
        )
        .unwrap();
    let config = TileMapConfig {
        chunk_width: 32,
        chunk_height: 64,
        chunk_depth: 32,
        ..Default::default()
    };
    let mut map = TileMap::new(config, Arc::new(c));
    // Rolling hills with a sprinkle of glass pillars.
    for z in 0..32 {
        for x in 0..32 {
            let h = 20 + ((x as f32 * 0.3).sin() * 6.0 + (z as f32 * 0.2).cos() * 5.0) as i32;
            for y in 0..h {
                let index = if y == h - 1 { grass } else { stone };
                map.set_tile(x, y, z, Tile::new(index, Tile::COLLIDEABLE));
            }
            if (x * 7 + z * 3) % 29 == 0 {
                for y in h..h + 4 {
                    map.set_tile(x, y, z, Tile::new(glass, 0));
                }
            }
        }
    }
    map
}

fn bench_generate_flat(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_chunk");
    let map = terrain_map();
    group.bench_function("flat_32x64x32", |b| {
        b.iter(|| black_box(ChunkVertexGenerator.generate(&map, ChunkCoord::new(0, 0, 0))))
    });
    group.finish();
}

fn bench_generate_lit(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_chunk");
    let mut map = terrain_map();
    LightSpreadingTileMapLighter.light(&mut map);
    group.bench_function("lit_32x64x32", |b| {
        b.iter(|| black_box(LitChunkVertexGenerator.generate(&map, ChunkCoord::new(0, 0, 0))))
    });
    group.finish();
}

fn bench_light_spread(c: &mut Criterion) {
    let mut group = c.benchmark_group("light_map");
    let mut map = terrain_map();
    group.bench_function("spread_32x64x32", |b| {
        b.iter(|| LightSpreadingTileMapLighter.light(black_box(&mut map)))
    });
    group.finish();
}

fn long_config() -> Criterion {
    Criterion::default()
        .measurement_time(Duration::from_secs(20))
        .warm_up_time(Duration::from_secs(5))
        .sample_size(20)
}

criterion_group! {
    name = benches;
    config = long_config();
    targets =
        bench_generate_flat,
        bench_generate_lit,
        bench_light_spread
}
criterion_main!(benches);
