use std::sync::Arc;

use blockscape_mesh_cpu::ChunkVertexGenerator;
use blockscape_structures::TilePrefab;
use blockscape_tiles::{Rotation, TextureAtlas, Tile, TileMeshCollection};
use blockscape_world::{ChunkCoord, TileMap, TileMapConfig};

fn meshed_map() -> TileMap {
    let mut meshes = TileMeshCollection::new(TextureAtlas::new(32, 32, 16, 16));
    meshes.add_cube_all("stone", 0).unwrap();
    let config = TileMapConfig {
        chunk_width: 4,
        chunk_height: 4,
        chunk_depth: 4,
        ..Default::default()
    };
    let mut map =
        TileMap::new(config, Arc::new(meshes)).with_generator(Arc::new(ChunkVertexGenerator));
    map.update_dirty();
    assert_eq!(map.vertex_count(), 0);
    map
}

#[test]
fn stamping_into_a_meshed_map_remeshes_it() {
    let mut map = meshed_map();
    let stone = TilePrefab::from_tiles(1, 1, 1, vec![Tile::new(1, Tile::COLLIDEABLE)]);
    stone.place_in(&mut map, (1, 1, 1), Rotation::R0);

    assert!(map.is_dirty(ChunkCoord::new(0, 0, 0)));
    assert!(map.is_lighting_dirty());
    assert!(map.update_dirty() > 0);
    assert_eq!(map.tile(1, 1, 1).map(|t| t.index), Some(1));
    assert_eq!(map.vertex_count(), 36);
}

#[test]
fn rotated_stamp_marks_every_touched_chunk() {
    let mut map = {
        let mut meshes = TileMeshCollection::new(TextureAtlas::new(32, 32, 16, 16));
        meshes.add_cube_all("stone", 0).unwrap();
        let config = TileMapConfig {
            chunk_width: 2,
            chunk_height: 2,
            chunk_depth: 2,
            width_in_chunks: 2,
            height_in_chunks: 1,
            depth_in_chunks: 2,
            ..Default::default()
        };
        TileMap::new(config, Arc::new(meshes)).with_generator(Arc::new(ChunkVertexGenerator))
    };
    map.update_dirty();
    assert!(map.dirty_chunks().is_empty());

    // 3 wide, 1 deep: a quarter turn lays it along z across both chunk rows.
    let bar = TilePrefab::from_tiles(3, 1, 1, vec![Tile::new(1, 0); 3]);
    bar.place_in(&mut map, (1, 0, 0), Rotation::R90);
    let mut dirty = map.dirty_chunks();
    dirty.sort_by_key(|c| (c.cz, c.cx));
    assert_eq!(
        dirty,
        vec![
            ChunkCoord::new(0, 0, 0),
            ChunkCoord::new(1, 0, 0),
            ChunkCoord::new(0, 0, 1),
            ChunkCoord::new(1, 0, 1)
        ]
    );
    assert_eq!(map.update_dirty(), 4);
}
