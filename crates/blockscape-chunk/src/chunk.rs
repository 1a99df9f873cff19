use blockscape_tiles::{Tile, VertexBuffer};

use crate::container::TileContainer;
use crate::coord::{ChunkCoord, TileCoord};

/// Render buffers generated for one chunk. Either half is absent when no tile routes
/// geometry to it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChunkMesh {
    pub opaque: Option<VertexBuffer>,
    pub alpha: Option<VertexBuffer>,
}

impl ChunkMesh {
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.opaque.as_ref().map_or(0, VertexBuffer::len)
            + self.alpha.as_ref().map_or(0, VertexBuffer::len)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.opaque.is_none() && self.alpha.is_none()
    }
}

/// Fixed-size block of tiles at a chunk-grid position, plus its generated buffers.
#[derive(Clone, Debug)]
pub struct TileChunk {
    coord: ChunkCoord,
    sx: usize,
    sy: usize,
    sz: usize,
    tiles: Vec<Tile>,
    mesh: ChunkMesh,
}

impl TileChunk {
    pub fn new(coord: ChunkCoord, sx: usize, sy: usize, sz: usize) -> Self {
        Self::from_tiles(coord, sx, sy, sz, vec![Tile::EMPTY; sx * sy * sz])
    }

    /// Wraps an existing row-major tile array. Panics if its length is not
    /// `sx * sy * sz`.
    pub fn from_tiles(coord: ChunkCoord, sx: usize, sy: usize, sz: usize, tiles: Vec<Tile>) -> Self {
        assert_eq!(
            tiles.len(),
            sx * sy * sz,
            "chunk tile array does not match {sx}x{sy}x{sz}"
        );
        TileChunk {
            coord,
            sx,
            sy,
            sz,
            tiles,
            mesh: ChunkMesh::default(),
        }
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        (y * self.sz + z) * self.sx + x
    }

    #[inline]
    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    #[inline]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    #[inline]
    pub fn tiles_mut(&mut self) -> &mut [Tile] {
        &mut self.tiles
    }

    /// Local coordinate of a flat index.
    #[inline]
    pub fn coord_of(&self, i: usize) -> (usize, usize, usize) {
        let x = i % self.sx;
        let z = (i / self.sx) % self.sz;
        let y = i / (self.sx * self.sz);
        (x, y, z)
    }

    #[inline]
    pub fn is_all_empty(&self) -> bool {
        self.tiles.iter().all(Tile::is_empty)
    }

    #[inline]
    pub fn opaque_mesh(&self) -> Option<&VertexBuffer> {
        self.mesh.opaque.as_ref()
    }

    #[inline]
    pub fn alpha_mesh(&self) -> Option<&VertexBuffer> {
        self.mesh.alpha.as_ref()
    }

    #[inline]
    pub fn mesh(&self) -> &ChunkMesh {
        &self.mesh
    }

    /// Drops both buffers.
    pub fn release_mesh(&mut self) {
        self.mesh = ChunkMesh::default();
    }

    /// Installs freshly generated buffers in place of the previous ones.
    pub fn set_mesh(&mut self, mesh: ChunkMesh) {
        self.mesh = mesh;
    }
}

impl TileContainer for TileChunk {
    #[inline]
    fn width(&self) -> usize {
        self.sx
    }

    #[inline]
    fn height(&self) -> usize {
        self.sy
    }

    #[inline]
    fn depth(&self) -> usize {
        self.sz
    }

    #[inline]
    fn origin(&self) -> TileCoord {
        self.coord.tile_origin(self.sx, self.sy, self.sz)
    }

    #[inline]
    fn get(&self, x: usize, y: usize, z: usize) -> &Tile {
        assert!(x < self.sx && y < self.sy && z < self.sz, "tile ({x},{y},{z}) outside chunk");
        &self.tiles[self.idx(x, y, z)]
    }

    #[inline]
    fn get_mut(&mut self, x: usize, y: usize, z: usize) -> &mut Tile {
        assert!(x < self.sx && y < self.sy && z < self.sz, "tile ({x},{y},{z}) outside chunk");
        let i = self.idx(x, y, z);
        &mut self.tiles[i]
    }
}
