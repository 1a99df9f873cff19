//! CPU chunk meshing: per-tile vertex emission with face culling, flat or lit.
#![forbid(unsafe_code)]

use std::time::Instant;

use blockscape_chunk::{ChunkCoord, ChunkMesh, TileContainer};
use blockscape_tiles::Face;
use blockscape_world::{ChunkMeshGenerator, TileMap};

mod emit;
mod shading;
mod visibility;

use emit::{BufferCursor, TileTransform};
use shading::{Flat, Lit, Shading};
use visibility::{any_side_exposed, visible_cube_faces};

/// Emits every visible tile of a chunk with its mesh colors, or the tile's custom color
/// when it has one.
#[derive(Copy, Clone, Debug, Default)]
pub struct ChunkVertexGenerator;

impl ChunkMeshGenerator for ChunkVertexGenerator {
    fn generate(&self, map: &TileMap, chunk: ChunkCoord) -> ChunkMesh {
        build_chunk_mesh(map, chunk, &Flat, "mesh_chunk")
    }
}

/// Like [`ChunkVertexGenerator`] but multiplies each vertex color by the brightness of
/// the cell the vertex faces, so it needs lit tiles.
#[derive(Copy, Clone, Debug, Default)]
pub struct LitChunkVertexGenerator;

impl ChunkMeshGenerator for LitChunkVertexGenerator {
    fn generate(&self, map: &TileMap, chunk: ChunkCoord) -> ChunkMesh {
        build_chunk_mesh(map, chunk, &Lit, "mesh_chunk_lit")
    }

    fn uses_lighting(&self) -> bool {
        true
    }
}

fn build_chunk_mesh<S: Shading>(
    map: &TileMap,
    coord: ChunkCoord,
    shading: &S,
    label: &str,
) -> ChunkMesh {
    let t0 = Instant::now();
    let chunk = map
        .chunk(coord)
        .unwrap_or_else(|| panic!("chunk {coord:?} outside tile map"));
    if chunk.is_all_empty() {
        log::debug!(target: "mesh", "chunk {coord:?} is empty; nothing to emit");
        return ChunkMesh::default();
    }
    let o = chunk.origin();
    let meshes = map.meshes();
    let mut opaque: Option<BufferCursor> = None;
    let mut alpha: Option<BufferCursor> = None;

    for y in 0..chunk.height() {
        for z in 0..chunk.depth() {
            for x in 0..chunk.width() {
                let tile = chunk.get(x, y, z);
                if tile.is_empty() {
                    continue;
                }
                let mesh = meshes.get(tile);
                if mesh.is_null() {
                    continue;
                }
                let cell = (o.x + x as i32, o.y + y as i32, o.z + z as i32);
                let facing = tile.facing();
                let src = mesh.vertices();

                // Vertex ranges to emit for this tile.
                let mut ranges = [const { None }; 6];
                let mut count = 0;
                if mesh.is_cube() {
                    let visible = visible_cube_faces(map, mesh, cell, facing);
                    for (slot, face) in ranges.iter_mut().zip(Face::ALL) {
                        if face.in_mask(visible) {
                            let r = mesh.face_vertices(face);
                            count += r.as_ref().map_or(0, |r| r.len());
                            *slot = r;
                        }
                    }
                } else if any_side_exposed(map, cell) {
                    ranges[0] = Some(0..src.len());
                    count = src.len();
                }
                if count == 0 {
                    continue;
                }

                let target = if mesh.is_alpha() { &mut alpha } else { &mut opaque };
                let cursor = target.get_or_insert_with(BufferCursor::new);
                cursor.reserve(count);
                let transform = TileTransform::new(facing, cell);
                for range in ranges.into_iter().flatten() {
                    for i in range {
                        let mut v = transform.apply(src.vertex(i));
                        v.color = shading.shade(map, tile, cell, &v);
                        cursor.write(v);
                    }
                }
            }
        }
    }

    let out = ChunkMesh {
        opaque: opaque.map(BufferCursor::finish),
        alpha: alpha.map(BufferCursor::finish),
    };
    log::info!(
        target: "perf",
        "ms={} {} chunk=({}, {}, {}) opaque={} alpha={}",
        t0.elapsed().as_millis(),
        label,
        coord.cx,
        coord.cy,
        coord.cz,
        out.opaque.as_ref().map_or(0, |b| b.len()),
        out.alpha.as_ref().map_or(0, |b| b.len())
    );
    out
}
