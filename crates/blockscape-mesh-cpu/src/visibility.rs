use blockscape_tiles::{Face, Rotation, TileMesh};
use blockscape_world::TileMap;

/// Whether the cell at `cell` shows through its world-space side `side`: the
/// neighbor there is outside the map, empty, or not opaque on the side facing back.
#[inline]
pub(crate) fn is_exposed(map: &TileMap, cell: (i32, i32, i32), side: Face) -> bool {
    let (dx, dy, dz) = side.delta();
    let Some(n) = map.tile(cell.0 + dx, cell.1 + dy, cell.2 + dz) else {
        return true;
    };
    if n.is_empty() {
        return true;
    }
    let back = side.opposite().rotated(n.facing().inverse());
    !map.meshes().get(n).is_opaque(back)
}

/// Mesh-space cube faces of a tile that survive culling, as a face mask.
pub(crate) fn visible_cube_faces(
    map: &TileMap,
    mesh: &TileMesh,
    cell: (i32, i32, i32),
    facing: Rotation,
) -> u8 {
    Face::ALL
        .into_iter()
        .filter(|f| mesh.has_face(*f) && is_exposed(map, cell, f.rotated(facing)))
        .fold(0, |mask, f| mask | f.bit())
}

/// Non-cube meshes are drawn whole as soon as any side is exposed.
#[inline]
pub(crate) fn any_side_exposed(map: &TileMap, cell: (i32, i32, i32)) -> bool {
    Face::ALL.into_iter().any(|f| is_exposed(map, cell, f))
}
