//! Prefabricated tile grids that can be viewed rotated and stamped into other containers.
#![forbid(unsafe_code)]

use blockscape_chunk::{TileContainer, TileCoord};
use blockscape_tiles::{Rotation, Tile};

/// Maps a view cell to a backing cell on the XZ plane:
/// `bx = xx*vx + xz*vz + x0`, `bz = zx*vx + zz*vz + z0`. Y is never remapped.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct ViewTransform {
    xx: i32,
    xz: i32,
    x0: i32,
    zx: i32,
    zz: i32,
    z0: i32,
}

impl ViewTransform {
    /// A quarter turn moves backing `(bx, bz)` to view `(bz, sx-1-bx)`, matching
    /// [`Face::rotated`](blockscape_tiles::Face::rotated) and vertex rotation.
    fn for_rotation(rotation: Rotation, sx: usize, sz: usize) -> Self {
        let (w, d) = (sx as i32 - 1, sz as i32 - 1);
        let (xx, xz, x0, zx, zz, z0) = match rotation {
            Rotation::R0 => (1, 0, 0, 0, 1, 0),
            Rotation::R90 => (0, -1, w, 1, 0, 0),
            Rotation::R180 => (-1, 0, w, 0, -1, d),
            Rotation::R270 => (0, 1, 0, -1, 0, d),
        };
        ViewTransform {
            xx,
            xz,
            x0,
            zx,
            zz,
            z0,
        }
    }

    #[inline]
    fn backing(&self, vx: usize, vz: usize) -> (usize, usize) {
        let (vx, vz) = (vx as i32, vz as i32);
        let bx = self.xx * vx + self.xz * vz + self.x0;
        let bz = self.zx * vx + self.zz * vz + self.z0;
        (bx as usize, bz as usize)
    }
}

/// A standalone tile grid. All four rotations can be read through
/// [`TileContainer`] without copying; [`TilePrefab::rotate`] picks the active one.
#[derive(Clone, Debug)]
pub struct TilePrefab {
    sx: usize,
    sy: usize,
    sz: usize,
    tiles: Vec<Tile>,
    views: [ViewTransform; 4],
    rotation: Rotation,
    position: TileCoord,
}

impl TilePrefab {
    pub fn new(sx: usize, sy: usize, sz: usize) -> Self {
        Self::from_tiles(sx, sy, sz, vec![Tile::EMPTY; sx * sy * sz])
    }

    /// Wraps a row-major tile array (`(y*sz + z)*sx + x`). Panics on a length mismatch.
    pub fn from_tiles(sx: usize, sy: usize, sz: usize, tiles: Vec<Tile>) -> Self {
        assert_eq!(tiles.len(), sx * sy * sz, "prefab tile array does not match {sx}x{sy}x{sz}");
        TilePrefab {
            sx,
            sy,
            sz,
            tiles,
            views: Rotation::ALL.map(|r| ViewTransform::for_rotation(r, sx, sz)),
            rotation: Rotation::R0,
            position: TileCoord::default(),
        }
    }

    /// Copies the cells `[min, min+size)` of `source` (local coordinates) into a new prefab.
    pub fn capture<C: TileContainer + ?Sized>(
        source: &C,
        min: (usize, usize, usize),
        size: (usize, usize, usize),
    ) -> Self {
        let (sx, sy, sz) = size;
        let mut tiles = Vec::with_capacity(sx * sy * sz);
        for y in 0..sy {
            for z in 0..sz {
                for x in 0..sx {
                    tiles.push(*source.get(min.0 + x, min.1 + y, min.2 + z));
                }
            }
        }
        Self::from_tiles(sx, sy, sz, tiles)
    }

    #[inline]
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Switches the active view. Width and depth swap for 90° and 270°.
    pub fn rotate(&mut self, rotation: Rotation) {
        self.rotation = rotation;
    }

    /// World placement used by the [`TileContainer`] bounds and collision queries.
    pub fn set_position(&mut self, position: TileCoord) {
        self.position = position;
    }

    /// Backing array in unrotated order.
    #[inline]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Backing dimensions, independent of the active view.
    #[inline]
    pub fn backing_size(&self) -> (usize, usize, usize) {
        (self.sx, self.sy, self.sz)
    }

    #[inline]
    fn view_size(&self, rotation: Rotation) -> (usize, usize, usize) {
        if rotation.swaps_axes() {
            (self.sz, self.sy, self.sx)
        } else {
            (self.sx, self.sy, self.sz)
        }
    }

    #[inline]
    fn backing_index(&self, rotation: Rotation, x: usize, y: usize, z: usize) -> usize {
        let (vw, vh, vd) = self.view_size(rotation);
        assert!(x < vw && y < vh && z < vd, "tile ({x},{y},{z}) outside prefab");
        let (bx, bz) = self.views[rotation.turns() as usize].backing(x, z);
        (y * self.sz + bz) * self.sx + bx
    }

    /// Copies every non-empty tile of the view at `rotation` into `dest`, with the
    /// view's `(0,0,0)` at local `offset`. Each copied tile's own facing advances by
    /// `rotation`. `rotation` is taken relative to the backing array, not the active view.
    ///
    /// Panics if the rotated prefab does not fit inside `dest` at `offset`.
    pub fn place_in<C: TileContainer + ?Sized>(
        &self,
        dest: &mut C,
        offset: (usize, usize, usize),
        rotation: Rotation,
    ) {
        let (vw, vh, vd) = self.view_size(rotation);
        assert!(
            offset.0 + vw <= dest.width()
                && offset.1 + vh <= dest.height()
                && offset.2 + vd <= dest.depth(),
            "prefab {vw}x{vh}x{vd} at {offset:?} does not fit destination {}x{}x{}",
            dest.width(),
            dest.height(),
            dest.depth()
        );
        let mut placed = 0usize;
        for y in 0..vh {
            for z in 0..vd {
                for x in 0..vw {
                    let src = self.tiles[self.backing_index(rotation, x, y, z)];
                    if src.is_empty() {
                        continue;
                    }
                    let mut tile = src;
                    let facing = src.facing().advance(rotation);
                    if facing == Rotation::R0 {
                        tile.clear_rotation();
                    } else {
                        tile.set_rotation(facing);
                    }
                    dest.replace_tile(offset.0 + x, offset.1 + y, offset.2 + z, tile);
                    placed += 1;
                }
            }
        }
        log::debug!(
            target: "tilemap",
            "stamped prefab {}x{}x{} at {:?} rotated {}°: {} tiles",
            vw,
            vh,
            vd,
            offset,
            rotation.degrees(),
            placed
        );
    }
}

impl TileContainer for TilePrefab {
    #[inline]
    fn width(&self) -> usize {
        self.view_size(self.rotation).0
    }

    #[inline]
    fn height(&self) -> usize {
        self.sy
    }

    #[inline]
    fn depth(&self) -> usize {
        self.view_size(self.rotation).2
    }

    #[inline]
    fn origin(&self) -> TileCoord {
        self.position
    }

    #[inline]
    fn get(&self, x: usize, y: usize, z: usize) -> &Tile {
        &self.tiles[self.backing_index(self.rotation, x, y, z)]
    }

    #[inline]
    fn get_mut(&mut self, x: usize, y: usize, z: usize) -> &mut Tile {
        let i = self.backing_index(self.rotation, x, y, z);
        &mut self.tiles[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockscape_chunk::{ChunkCoord, TileChunk};

    // An L-shaped 3x1x2 prefab:
    //   z=0: A B C
    //   z=1: D . .
    fn l_shape() -> TilePrefab {
        let mut p = TilePrefab::new(3, 1, 2);
        for (x, z, index) in [(0, 0, 1), (1, 0, 2), (2, 0, 3), (0, 1, 4)] {
            p.get_mut(x, 0, z).set(index, Tile::COLLIDEABLE);
        }
        p
    }

    #[test]
    fn quarter_view_swaps_and_mirrors() {
        let mut p = l_shape();
        p.rotate(Rotation::R90);
        assert_eq!((p.width(), p.depth()), (2, 3));
        // backing (bx,bz) shows up at view (bz, 2-bx)
        assert_eq!(p.get(0, 0, 2).index, 1);
        assert_eq!(p.get(0, 0, 1).index, 2);
        assert_eq!(p.get(0, 0, 0).index, 3);
        assert_eq!(p.get(1, 0, 2).index, 4);
        assert!(p.get(1, 0, 0).is_empty());
    }

    #[test]
    fn half_turn_view_reverses_both_axes() {
        let mut p = l_shape();
        p.rotate(Rotation::R180);
        assert_eq!((p.width(), p.depth()), (3, 2));
        assert_eq!(p.get(2, 0, 1).index, 1);
        assert_eq!(p.get(0, 0, 1).index, 3);
        assert_eq!(p.get(2, 0, 0).index, 4);
    }

    #[test]
    fn stamping_advances_tile_facing() {
        let mut p = l_shape();
        p.get_mut(1, 0, 0).set_rotation(Rotation::R270);
        let mut dest = TileChunk::new(ChunkCoord::default(), 4, 2, 4);
        p.place_in(&mut dest, (1, 1, 0), Rotation::R90);
        let b = dest.get(1, 1, 1);
        assert_eq!(b.index, 2);
        assert_eq!(b.facing(), Rotation::R0);
        assert!(!b.is_rotated());
        let a = dest.get(1, 1, 2);
        assert_eq!(a.index, 1);
        assert_eq!(a.facing(), Rotation::R90);
        assert!(a.is_rotated());
        assert!(dest.get(2, 1, 0).is_empty());
    }

    #[test]
    fn stamping_skips_empty_cells() {
        let p = l_shape();
        let mut dest = TileChunk::new(ChunkCoord::default(), 3, 1, 2);
        dest.get_mut(1, 0, 1).set(9, 0);
        p.place_in(&mut dest, (0, 0, 0), Rotation::R0);
        assert_eq!(dest.get(1, 0, 1).index, 9);
    }

    #[test]
    #[should_panic(expected = "does not fit")]
    fn stamping_past_destination_edge_panics() {
        let p = l_shape();
        let mut dest = TileChunk::new(ChunkCoord::default(), 3, 1, 2);
        p.place_in(&mut dest, (0, 0, 0), Rotation::R90);
    }

    #[test]
    fn capture_copies_a_region() {
        let mut src = TileChunk::new(ChunkCoord::default(), 4, 4, 4);
        src.get_mut(2, 1, 3).set(5, 0);
        let p = TilePrefab::capture(&src, (1, 1, 2), (2, 1, 2));
        assert_eq!(p.backing_size(), (2, 1, 2));
        assert_eq!(p.get(1, 0, 1).index, 5);
    }
}
