use std::sync::Arc;

use blockscape_geom::{Color, Vec3};
use blockscape_lighting::SimpleTileMapLighter;
use blockscape_mesh_cpu::{ChunkVertexGenerator, LitChunkVertexGenerator};
use blockscape_tiles::{
    CubeTileMeshDef, Face, ModelTileMeshDef, Rotation, TextureAtlas, Tile, TileMeshCollection,
    VertexBuffer,
};
use blockscape_world::{ChunkCoord, ChunkMeshGenerator, TileMap, TileMapConfig, TileMapLighter};

const STONE: u16 = 1;
const GLASS: u16 = 2;
const PANEL: u16 = 3;
const RAMP: u16 = 4;
const SHUTTER: u16 = 5;

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
    c.add_cube(
        &CubeTileMeshDef::new("panel")
            .all_textures(2)
            .faces(Face::RIGHT.bit())
            .opaque_sides(0),
    )
    .unwrap();
    let positions = vec![
        Vec3::new(-0.5, -0.5, -0.5),
        Vec3::new(0.5, -0.5, 0.5),
        Vec3::new(0.5, -0.5, -0.5),
        Vec3::new(-0.5, -0.5, -0.5),
        Vec3::new(-0.5, 0.5, 0.5),
        Vec3::new(0.5, -0.5, 0.5),
    ];
    c.add_model(&ModelTileMeshDef {
        name: "ramp".into(),
        positions,
        texture: Some(3),
        translucency: 1.0,
        opaque_sides: Face::BOTTOM.bit(),
        ..Default::default()
    })
    .unwrap();
    // A single quad on the +X side of the cell, facing out.
    let shutter = vec![
        Vec3::new(0.5, -0.5, -0.5),
        Vec3::new(0.5, 0.5, -0.5),
        Vec3::new(0.5, 0.5, 0.5),
        Vec3::new(0.5, -0.5, -0.5),
        Vec3::new(0.5, 0.5, 0.5),
        Vec3::new(0.5, -0.5, 0.5),
    ];
    c.add_model(&ModelTileMeshDef {
        name: "shutter".into(),
        normals: Some(vec![Vec3::new(1.0, 0.0, 0.0); shutter.len()]),
        positions: shutter,
        texture: Some(4),
        translucency: 1.0,
        color: Color::WHITE,
        ..Default::default()
    })
    .unwrap();
    Arc::new(c)
}

fn map(chunk: usize, width_in_chunks: usize) -> TileMap {
    let config = TileMapConfig {
        chunk_width: chunk,
        chunk_height: chunk,
        chunk_depth: chunk,
        width_in_chunks,
        ..Default::default()
    };
    TileMap::new(config, meshes())
}

fn put(map: &mut TileMap, x: i32, y: i32, z: i32, index: u16) {
    assert!(map.set_tile(x, y, z, Tile::new(index, Tile::COLLIDEABLE)));
}

fn opaque_count(map: &TileMap, coord: ChunkCoord) -> usize {
    ChunkVertexGenerator
        .generate(map, coord)
        .opaque
        .map_or(0, |b| b.len())
}

fn positions(buf: &VertexBuffer) -> Vec<Vec3> {
    (0..buf.len()).map(|i| buf.position(i)).collect()
}

#[test]
fn isolated_cube_emits_36_vertices() {
    let mut m = map(3, 1);
    put(&mut m, 1, 1, 1, STONE);
    let mesh = ChunkVertexGenerator.generate(&m, ChunkCoord::new(0, 0, 0));
    assert!(mesh.alpha.is_none());
    let buf = mesh.opaque.unwrap();
    assert_eq!(buf.len(), 36);
    // Every slot was written: nothing sits at the zeroed origin.
    for p in positions(&buf) {
        assert!((1.0..=2.0).contains(&p.x), "{p:?}");
        assert!((1.0..=2.0).contains(&p.y), "{p:?}");
        assert!((1.0..=2.0).contains(&p.z), "{p:?}");
    }
}

#[test]
fn empty_chunk_has_no_buffers() {
    let m = map(3, 1);
    assert!(ChunkVertexGenerator.generate(&m, ChunkCoord::new(0, 0, 0)).is_empty());
}

#[test]
fn shared_faces_are_culled() {
    let mut m = map(4, 1);
    put(&mut m, 1, 1, 1, STONE);
    put(&mut m, 2, 1, 1, STONE);
    assert_eq!(opaque_count(&m, ChunkCoord::new(0, 0, 0)), 60);
}

#[test]
fn gap_keeps_both_faces() {
    let mut m = map(4, 1);
    put(&mut m, 0, 1, 1, STONE);
    put(&mut m, 2, 1, 1, STONE);
    assert_eq!(opaque_count(&m, ChunkCoord::new(0, 0, 0)), 72);
}

#[test]
fn culling_crosses_chunk_edges() {
    let mut m = map(2, 2);
    put(&mut m, 1, 0, 0, STONE);
    put(&mut m, 2, 0, 0, STONE);
    assert_eq!(opaque_count(&m, ChunkCoord::new(0, 0, 0)), 30);
    assert_eq!(opaque_count(&m, ChunkCoord::new(1, 0, 0)), 30);
}

#[test]
fn alpha_tiles_route_to_the_alpha_buffer() {
    let mut m = map(3, 1);
    put(&mut m, 0, 0, 0, STONE);
    put(&mut m, 1, 0, 0, GLASS);
    let mesh = ChunkVertexGenerator.generate(&m, ChunkCoord::new(0, 0, 0));
    // Glass hides nothing behind it; stone hides the glass face touching it.
    assert_eq!(mesh.opaque.unwrap().len(), 36);
    assert_eq!(mesh.alpha.unwrap().len(), 30);
}

#[test]
fn custom_color_replaces_mesh_color() {
    let mut m = map(3, 1);
    let mut t = Tile::new(STONE, 0);
    t.set_custom_color(Color::rgba(200, 10, 20, 40));
    m.set_tile(1, 1, 1, t);
    let buf = ChunkVertexGenerator
        .generate(&m, ChunkCoord::new(0, 0, 0))
        .opaque
        .unwrap();
    for i in 0..buf.len() {
        assert_eq!(buf.color(i), Color::rgba(200, 10, 20, 40));
    }

    // Lit shading only tints: the mesh alpha survives.
    let buf = LitChunkVertexGenerator
        .generate(&m, ChunkCoord::new(0, 0, 0))
        .opaque
        .unwrap();
    for i in 0..buf.len() {
        assert_eq!(buf.color(i).a, 255);
    }
}

#[test]
fn rotation_turns_faces_and_their_culling() {
    // The panel's only face points +X in mesh space; a quarter turn points it at -Z.
    let mut m = map(3, 1);
    let mut t = Tile::new(PANEL, 0);
    t.set_rotation(Rotation::R90);
    m.set_tile(1, 1, 1, t);
    let buf = ChunkVertexGenerator
        .generate(&m, ChunkCoord::new(0, 0, 0))
        .opaque
        .unwrap();
    assert_eq!(buf.len(), 6);
    for i in 0..buf.len() {
        assert_eq!(buf.normal(i), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(buf.position(i).z, 1.0);
    }
    put(&mut m, 1, 1, 0, STONE);
    // The panel face is now hidden, and the see-through panel hides nothing of the stone.
    assert_eq!(opaque_count(&m, ChunkCoord::new(0, 0, 0)), 36);
}

#[test]
fn models_draw_whole_when_any_side_shows() {
    let mut m = map(3, 1);
    put(&mut m, 1, 1, 1, RAMP);
    for face in Face::ALL {
        let (dx, dy, dz) = face.delta();
        put(&mut m, 1 + dx, 1 + dy, 1 + dz, STONE);
    }
    // Stones keep their inner faces: the ramp is only opaque underneath.
    assert_eq!(opaque_count(&m, ChunkCoord::new(0, 0, 0)), 5 * 36 + 30);
    m.set_tile(1, 2, 1, Tile::EMPTY);
    assert_eq!(opaque_count(&m, ChunkCoord::new(0, 0, 0)), 4 * 36 + 30 + 6);
}

#[test]
fn lit_top_faces_see_the_sky() {
    let mut m = map(3, 1);
    put(&mut m, 1, 0, 1, STONE);
    SimpleTileMapLighter.light(&mut m);
    let buf = LitChunkVertexGenerator
        .generate(&m, ChunkCoord::new(0, 0, 0))
        .opaque
        .unwrap();
    let mut top = 0;
    let mut bottom = 0;
    for i in 0..buf.len() {
        let c = buf.color(i);
        assert_eq!(c.a, 255);
        if buf.normal(i).y > 0.5 {
            assert_eq!(c, Color::WHITE);
            top += 1;
        } else if buf.normal(i).y < -0.5 {
            // Below the map: falls back to the tile's own light, which is ambient 0.
            let dark = (255.0 * Tile::brightness_for(0)).round() as u8;
            assert_eq!(c, Color::rgba(dark, dark, dark, 255));
            bottom += 1;
        }
    }
    assert_eq!((top, bottom), (6, 6));
}

#[test]
fn lit_samples_above_the_map_use_sky_light() {
    // Unlit map: every stored light is zero, but the top row looks past the map top.
    let mut m = map(3, 1);
    let mut t = Tile::new(STONE, 0);
    t.set_custom_color(Color::rgba(255, 0, 0, 10));
    m.set_tile(1, 2, 1, t);
    let buf = LitChunkVertexGenerator
        .generate(&m, ChunkCoord::new(0, 0, 0))
        .opaque
        .unwrap();
    for i in 0..buf.len() {
        let c = buf.color(i);
        if buf.normal(i).y > 0.5 {
            assert_eq!(c, Color::rgba(255, 0, 0, 255));
        } else {
            assert!(c.r < 20 && c.g == 0 && c.b == 0, "{c:?}");
        }
    }
}

#[test]
fn lit_models_fall_back_to_their_own_light_against_opaque_sides() {
    let mut m = map(4, 1);
    let mut shutter = Tile::new(SHUTTER, 0);
    shutter.set_tile_light(4);
    m.set_tile(1, 1, 1, shutter);
    let mut stone = Tile::new(STONE, 0);
    stone.set_tile_light(12);
    m.set_tile(2, 1, 1, stone);

    // The stone is opaque on the side facing the shutter, so its light is ignored.
    let buf = LitChunkVertexGenerator
        .generate(&m, ChunkCoord::new(0, 0, 0))
        .opaque
        .unwrap();
    let own = Color::WHITE.scale_rgb(Tile::brightness_for(4));
    let shutter_colors: Vec<Color> = (0..buf.len())
        .filter(|&i| buf.normal(i) == Vec3::new(1.0, 0.0, 0.0) && buf.position(i).x == 2.0)
        .map(|i| buf.color(i))
        .collect();
    // The stone's -X face also lies on x=2 but points the other way.
    assert_eq!(shutter_colors.len(), 6);
    assert!(shutter_colors.iter().all(|&c| c == own), "{shutter_colors:?}");
    assert_ne!(own, Color::WHITE.scale_rgb(Tile::brightness_for(12)));

    // An empty, lit cell in front of the shutter is sampled as usual.
    let mut air = Tile::EMPTY;
    air.set_tile_light(12);
    m.set_tile(2, 1, 1, air);
    let buf = LitChunkVertexGenerator
        .generate(&m, ChunkCoord::new(0, 0, 0))
        .opaque
        .unwrap();
    assert_eq!(buf.len(), 6);
    let lit = Color::WHITE.scale_rgb(Tile::brightness_for(12));
    for i in 0..buf.len() {
        assert_eq!(buf.color(i), lit);
    }
}

#[test]
fn lit_generator_asks_for_lighting() {
    assert!(LitChunkVertexGenerator.uses_lighting());
    assert!(!ChunkVertexGenerator.uses_lighting());
}

#[test]
#[should_panic(expected = "outside mesh collection")]
fn unknown_mesh_index_panics() {
    let mut m = map(2, 1);
    m.set_tile(0, 0, 0, Tile::new(99, 0));
    ChunkVertexGenerator.generate(&m, ChunkCoord::new(0, 0, 0));
}
