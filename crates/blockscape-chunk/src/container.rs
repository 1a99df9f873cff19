use blockscape_geom::{Aabb, Ray, Vec3};
use blockscape_tiles::{Tile, TileMeshCollection};

use crate::coord::TileCoord;

/// A 3D grid of tiles placed in world space.
///
/// Implementors supply dimensions, placement and raw cell access; bounds checks,
/// overlap queries and ray collision come for free. Local coordinates run from
/// `(0,0,0)` to `(width-1, height-1, depth-1)`; world coordinates add [`origin`].
///
/// [`origin`]: TileContainer::origin
pub trait TileContainer {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn depth(&self) -> usize;

    /// World tile position of local `(0,0,0)`.
    fn origin(&self) -> TileCoord;

    /// Panics when the coordinate is outside the container.
    fn get(&self, x: usize, y: usize, z: usize) -> &Tile;

    /// Panics when the coordinate is outside the container.
    fn get_mut(&mut self, x: usize, y: usize, z: usize) -> &mut Tile;

    /// Stores `tile` at a local coordinate. Containers that track edits override this
    /// so writes made through the trait are seen by their change tracking.
    ///
    /// Panics when the coordinate is outside the container.
    fn replace_tile(&mut self, x: usize, y: usize, z: usize, tile: Tile) {
        *self.get_mut(x, y, z) = tile;
    }

    /// `None` outside the container instead of a panic.
    fn get_safe(&self, x: i32, y: i32, z: i32) -> Option<&Tile> {
        if self.is_within_local_bounds(x, y, z) {
            Some(self.get(x as usize, y as usize, z as usize))
        } else {
            None
        }
    }

    fn is_within_local_bounds(&self, x: i32, y: i32, z: i32) -> bool {
        x >= 0
            && y >= 0
            && z >= 0
            && (x as usize) < self.width()
            && (y as usize) < self.height()
            && (z as usize) < self.depth()
    }

    /// World-space variant of [`TileContainer::is_within_local_bounds`].
    fn is_within_bounds(&self, x: i32, y: i32, z: i32) -> bool {
        let o = self.origin();
        self.is_within_local_bounds(x - o.x, y - o.y, z - o.z)
    }

    /// World-space box covering every cell.
    fn bounds(&self) -> Aabb {
        let o = self.origin();
        let min = Vec3::new(o.x as f32, o.y as f32, o.z as f32);
        Aabb::new(
            min,
            min + Vec3::new(
                self.width() as f32,
                self.height() as f32,
                self.depth() as f32,
            ),
        )
    }

    /// Inclusive local cell range touched by a world-space box, clipped to this
    /// container. `None` when the box lies entirely outside.
    fn get_overlapped_tiles(&self, aabb: &Aabb) -> Option<(TileCoord, TileCoord)> {
        let clipped = self.bounds().intersection(aabb)?;
        let o = self.origin();
        let origin = Vec3::new(o.x as f32, o.y as f32, o.z as f32);
        let lo = clipped.min - origin;
        let hi = clipped.max - origin;
        let dims = [self.width(), self.height(), self.depth()];
        let mut min = [0i32; 3];
        let mut max = [0i32; 3];
        for axis in 0..3 {
            let last = dims[axis] as i32 - 1;
            if last < 0 {
                return None;
            }
            min[axis] = (lo.axis(axis).floor() as i32).clamp(0, last);
            // A box edge lying exactly on a cell boundary does not reach into that cell.
            max[axis] = (hi.axis(axis).ceil() as i32 - 1).clamp(min[axis], last);
        }
        Some((
            TileCoord::new(min[0], min[1], min[2]),
            TileCoord::new(max[0], max[1], max[2]),
        ))
    }

    /// First collideable cell along `ray`, in local coordinates.
    fn check_for_collision(&self, ray: &Ray) -> Option<TileCoord> {
        march_cells(self, ray, |c, t| t.is_collideable().then_some(c))
    }

    /// Nearest world-space hit between `ray` and the collision triangles of the tile at
    /// local `coord`, honoring the tile's facing.
    fn check_for_collision_with_tile_mesh(
        &self,
        ray: &Ray,
        coord: TileCoord,
        meshes: &TileMeshCollection,
    ) -> Option<Vec3> {
        let tile = self.get_safe(coord.x, coord.y, coord.z)?;
        let mesh = meshes.get(tile);
        let o = self.origin();
        let base = Vec3::new(
            (o.x + coord.x) as f32,
            (o.y + coord.y) as f32,
            (o.z + coord.z) as f32,
        ) + Vec3::splat(0.5);
        let turns = tile.facing().turns();
        let to_world = |v: Vec3| v.rotate_y_quarters(turns) + base;

        let mut nearest: Option<f32> = None;
        for tri in mesh.collision_vertices().chunks_exact(3) {
            let hit = ray.intersects_triangle(to_world(tri[0]), to_world(tri[1]), to_world(tri[2]));
            if let Some(t) = hit {
                if nearest.is_none_or(|n| t < n) {
                    nearest = Some(t);
                }
            }
        }
        nearest.map(|t| ray.at(t))
    }

    /// Marches collideable cells front to back and returns the first one whose mesh
    /// the ray actually hits, with the world-space hit point.
    fn check_for_precise_collision(
        &self,
        ray: &Ray,
        meshes: &TileMeshCollection,
    ) -> Option<(TileCoord, Vec3)> {
        march_cells(self, ray, |c, t| {
            if !t.is_collideable() {
                return None;
            }
            self.check_for_collision_with_tile_mesh(ray, c, meshes)
                .map(|p| (c, p))
        })
    }
}

/// Grid march over the cells `ray` passes through inside `container`, front to back,
/// stopping at the first cell for which `visit` returns a value.
fn march_cells<C, T, F>(container: &C, ray: &Ray, mut visit: F) -> Option<T>
where
    C: TileContainer + ?Sized,
    F: FnMut(TileCoord, &Tile) -> Option<T>,
{
    let bounds = container.bounds();
    let t_enter = ray.intersects_aabb(&bounds)?;
    let o = container.origin();
    let start = ray.at(t_enter) - Vec3::new(o.x as f32, o.y as f32, o.z as f32);
    let dims = [container.width(), container.height(), container.depth()];

    let mut cell = [0i32; 3];
    let mut step = [0i32; 3];
    let mut t_max = [f32::INFINITY; 3];
    let mut t_delta = [f32::INFINITY; 3];
    for axis in 0..3 {
        if dims[axis] == 0 {
            return None;
        }
        let p = start.axis(axis);
        let d = ray.direction.axis(axis);
        // The entry point may sit exactly on the far face.
        cell[axis] = (p.floor() as i32).clamp(0, dims[axis] as i32 - 1);
        // Zero components never reach a boundary on their axis.
        if d > 0.0 {
            step[axis] = 1;
            t_delta[axis] = 1.0 / d;
            t_max[axis] = t_enter + (cell[axis] as f32 + 1.0 - p) / d;
        } else if d < 0.0 {
            step[axis] = -1;
            t_delta[axis] = -1.0 / d;
            t_max[axis] = t_enter + (p - cell[axis] as f32) / -d;
        }
    }

    loop {
        let c = TileCoord::new(cell[0], cell[1], cell[2]);
        let tile = container.get_safe(c.x, c.y, c.z)?;
        if let Some(found) = visit(c, tile) {
            return Some(found);
        }
        let axis = if t_max[0] < t_max[1] {
            if t_max[0] < t_max[2] { 0 } else { 2 }
        } else if t_max[1] < t_max[2] {
            1
        } else {
            2
        };
        if t_max[axis] == f32::INFINITY {
            return None;
        }
        cell[axis] += step[axis];
        t_max[axis] += t_delta[axis];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ChunkCoord, TileChunk};
    use blockscape_tiles::{TextureAtlas, TileMeshCollection};

    fn solid_at(chunk: &mut TileChunk, x: usize, y: usize, z: usize, index: u16) {
        chunk.get_mut(x, y, z).set(index, Tile::COLLIDEABLE);
    }

    #[test]
    fn overlapped_tiles_are_clipped_to_bounds() {
        let chunk = TileChunk::new(ChunkCoord::new(1, 0, 0), 4, 4, 4);
        let b = Aabb::new(Vec3::new(2.5, -3.0, 1.2), Vec3::new(5.0, 1.5, 2.0));
        let (min, max) = chunk.get_overlapped_tiles(&b).unwrap();
        assert_eq!(min, TileCoord::new(0, 0, 1));
        assert_eq!(max, TileCoord::new(0, 1, 1));
        let far = Aabb::new(Vec3::splat(20.0), Vec3::splat(21.0));
        assert_eq!(chunk.get_overlapped_tiles(&far), None);
    }

    #[test]
    fn ray_hits_first_collideable_cell() {
        let mut chunk = TileChunk::new(ChunkCoord::new(0, 0, 0), 8, 8, 8);
        solid_at(&mut chunk, 5, 2, 3, 1);
        solid_at(&mut chunk, 7, 2, 3, 1);
        let ray = Ray::new(Vec3::new(-4.0, 2.5, 3.5), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(chunk.check_for_collision(&ray), Some(TileCoord::new(5, 2, 3)));
    }

    #[test]
    fn zero_direction_components_still_terminate() {
        let mut chunk = TileChunk::new(ChunkCoord::new(0, 0, 0), 4, 4, 4);
        solid_at(&mut chunk, 0, 0, 0, 1);
        let miss = Ray::new(Vec3::new(0.5, 3.5, 2.5), Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(chunk.check_for_collision(&miss), None);
        let down = Ray::new(Vec3::new(0.5, 3.5, 0.5), Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(chunk.check_for_collision(&down), Some(TileCoord::new(0, 0, 0)));
        let still = Ray::new(Vec3::new(1.5, 1.5, 1.5), Vec3::ZERO);
        assert_eq!(chunk.check_for_collision(&still), None);
    }

    #[test]
    fn diagonal_ray_visits_cells_in_order() {
        let mut chunk = TileChunk::new(ChunkCoord::new(0, 0, 0), 8, 8, 8);
        solid_at(&mut chunk, 6, 6, 6, 1);
        solid_at(&mut chunk, 3, 3, 3, 1);
        let ray = Ray::new(Vec3::splat(0.1), Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(chunk.check_for_collision(&ray), Some(TileCoord::new(3, 3, 3)));
    }

    #[test]
    fn mesh_collision_refines_to_the_surface() {
        let mut meshes = TileMeshCollection::new(TextureAtlas::new(32, 32, 16, 16));
        let stone = meshes.add_cube_all("stone", 0).unwrap();
        let mut chunk = TileChunk::new(ChunkCoord::new(0, 0, 0), 4, 4, 4);
        solid_at(&mut chunk, 2, 1, 1, stone);
        let ray = Ray::new(Vec3::new(-1.0, 1.3, 1.6), Vec3::new(1.0, 0.0, 0.0));
        let cell = chunk.check_for_collision(&ray).unwrap();
        let p = chunk.check_for_collision_with_tile_mesh(&ray, cell, &meshes).unwrap();
        assert!((p.x - 2.0).abs() < 1e-5, "hit at {p:?}");
        let (c, q) = chunk.check_for_precise_collision(&ray, &meshes).unwrap();
        assert_eq!(c, cell);
        assert_eq!(p, q);
    }
}
