use blockscape_chunk::TileContainer;
use blockscape_geom::{Color, Vec3};
use blockscape_tiles::{Face, Tile, Vertex};
use blockscape_world::TileMap;

// Pulls vertices on a cell's max edge back inside the cell before sampling.
const EDGE_EPSILON: f32 = 1e-3;

/// Final vertex color of a tile's world-space vertex.
pub(crate) trait Shading {
    fn shade(&self, map: &TileMap, tile: &Tile, cell: (i32, i32, i32), v: &Vertex) -> Color;
}

/// Mesh color, replaced outright by the tile's custom color (alpha included).
pub(crate) struct Flat;

impl Shading for Flat {
    #[inline]
    fn shade(&self, _map: &TileMap, tile: &Tile, _cell: (i32, i32, i32), v: &Vertex) -> Color {
        tile.custom_color().unwrap_or(v.color)
    }
}

/// Mesh color tinted by the custom color and darkened by the light in front of the
/// vertex. The custom color only tints RGB here: alpha stays the mesh's, which decided
/// whether the tile went to the opaque or the alpha buffer.
pub(crate) struct Lit;

impl Shading for Lit {
    fn shade(&self, map: &TileMap, tile: &Tile, cell: (i32, i32, i32), v: &Vertex) -> Color {
        let tint = tile.custom_color().unwrap_or(Color::WHITE);
        let brightness = sample_brightness(map, tile, cell, v);
        let c = v.color.modulate(tint).scale_rgb(brightness);
        Color { a: v.color.a, ..c }
    }
}

/// Brightness of the cell the vertex looks into along its normal.
pub(crate) fn sample_brightness(
    map: &TileMap,
    tile: &Tile,
    cell: (i32, i32, i32),
    v: &Vertex,
) -> f32 {
    let own = Tile::brightness_for(tile.tile_light);
    let (sx, sy, sz) = sample_cell(cell, v.position, v.normal);
    if sy >= map.height() as i32 {
        return Tile::brightness_for(map.sky_light());
    }
    let Some(s) = map.tile(sx, sy, sz) else {
        return own;
    };
    if !s.is_empty() {
        let back = dominant_face(v.normal).opposite().rotated(s.facing().inverse());
        if map.meshes().get(s).is_opaque(back) {
            return own;
        }
    }
    s.brightness()
}

fn sample_cell(cell: (i32, i32, i32), position: Vec3, normal: Vec3) -> (i32, i32, i32) {
    let max = [cell.0 + 1, cell.1 + 1, cell.2 + 1];
    let mut p = [position.x, position.y, position.z];
    for axis in 0..3 {
        if p[axis] == max[axis] as f32 {
            p[axis] -= EDGE_EPSILON;
        }
        p[axis] += normal.axis(axis);
    }
    (p[0].floor() as i32, p[1].floor() as i32, p[2].floor() as i32)
}

/// Axis-aligned face closest to `n`; ties prefer Y, then X.
fn dominant_face(n: Vec3) -> Face {
    let (ax, ay, az) = (n.x.abs(), n.y.abs(), n.z.abs());
    if ay >= ax && ay >= az {
        if n.y >= 0.0 { Face::PosY } else { Face::NegY }
    } else if ax >= az {
        if n.x >= 0.0 { Face::PosX } else { Face::NegX }
    } else if n.z >= 0.0 {
        Face::PosZ
    } else {
        Face::NegZ
    }
}
