use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Instant;

use blockscape_chunk::{ChunkCoord, TileChunk, TileContainer, TileCoord};
use blockscape_tiles::{LIGHT_VALUE_MAX, Tile, TileMesh, TileMeshCollection};
use serde::{Deserialize, Serialize};

use crate::strategy::{ChunkMeshGenerator, TileMapLighter};

/// Map sizing and light constants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileMapConfig {
    pub chunk_width: usize,
    pub chunk_height: usize,
    pub chunk_depth: usize,
    pub width_in_chunks: usize,
    pub height_in_chunks: usize,
    pub depth_in_chunks: usize,
    /// Tile light every cell starts a lighting pass with.
    pub ambient_light: u8,
    /// Light entering the top of every column.
    pub sky_light: u8,
}

impl Default for TileMapConfig {
    fn default() -> Self {
        Self {
            chunk_width: 16,
            chunk_height: 16,
            chunk_depth: 16,
            width_in_chunks: 1,
            height_in_chunks: 1,
            depth_in_chunks: 1,
            ambient_light: 0,
            sky_light: LIGHT_VALUE_MAX,
        }
    }
}

impl TileMapConfig {
    #[inline]
    pub fn chunk_count(&self) -> usize {
        self.width_in_chunks * self.height_in_chunks * self.depth_in_chunks
    }

    #[inline]
    pub fn tiles_per_chunk(&self) -> usize {
        self.chunk_width * self.chunk_height * self.chunk_depth
    }

    /// Non-zero dimensions whose tile extents fit `i32` world coordinates and whose
    /// tile total fits `usize`, plus light constants in range. Once this holds,
    /// [`chunk_count`](Self::chunk_count) and [`tiles_per_chunk`](Self::tiles_per_chunk)
    /// cannot overflow.
    pub fn is_valid(&self) -> bool {
        let extent = |tiles: usize, chunks: usize| {
            tiles
                .checked_mul(chunks)
                .filter(|&n| n > 0 && n <= i32::MAX as usize)
        };
        let volume = extent(self.chunk_width, self.width_in_chunks)
            .zip(extent(self.chunk_height, self.height_in_chunks))
            .zip(extent(self.chunk_depth, self.depth_in_chunks))
            .and_then(|((w, h), d)| w.checked_mul(h)?.checked_mul(d));
        volume.is_some()
            && self.ambient_light <= LIGHT_VALUE_MAX
            && self.sky_light <= LIGHT_VALUE_MAX
    }
}

/// A 3D grid of equally sized chunks addressed by global tile coordinates.
///
/// The map owns every chunk. Lighting and meshing are delegated to the strategies it
/// was given; edits made through [`TileMap::set_tile`] are tracked so that
/// [`TileMap::update_dirty`] only relights and remeshes what changed.
pub struct TileMap {
    config: TileMapConfig,
    chunks: Vec<TileChunk>,
    dirty: Vec<bool>,
    lighting_dirty: bool,
    meshes: Arc<TileMeshCollection>,
    lighter: Option<Arc<dyn TileMapLighter>>,
    generator: Option<Arc<dyn ChunkMeshGenerator>>,
}

impl TileMap {
    /// Empty map. Panics on zero dimensions or out-of-range light constants.
    pub fn new(config: TileMapConfig, meshes: Arc<TileMeshCollection>) -> Self {
        assert!(config.is_valid(), "invalid tile map config {config:?}");
        let chunks = (0..config.chunk_count())
            .map(|i| {
                TileChunk::new(
                    chunk_coord_of(&config, i),
                    config.chunk_width,
                    config.chunk_height,
                    config.chunk_depth,
                )
            })
            .collect();
        Self::from_chunks(config, meshes, chunks)
    }

    /// Adopts chunks listed in chunk row-major order. Panics if their number, sizes or
    /// coordinates disagree with `config`.
    pub fn from_chunks(
        config: TileMapConfig,
        meshes: Arc<TileMeshCollection>,
        chunks: Vec<TileChunk>,
    ) -> Self {
        assert!(config.is_valid(), "invalid tile map config {config:?}");
        assert_eq!(chunks.len(), config.chunk_count(), "chunk count mismatch");
        for (i, c) in chunks.iter().enumerate() {
            assert_eq!(c.coord(), chunk_coord_of(&config, i), "chunk {i} out of order");
            assert_eq!(
                (c.width(), c.height(), c.depth()),
                (config.chunk_width, config.chunk_height, config.chunk_depth),
                "chunk {i} has the wrong size"
            );
        }
        let n = chunks.len();
        TileMap {
            config,
            chunks,
            dirty: vec![true; n],
            lighting_dirty: true,
            meshes,
            lighter: None,
            generator: None,
        }
    }

    pub fn with_lighter(mut self, lighter: Arc<dyn TileMapLighter>) -> Self {
        self.lighter = Some(lighter);
        self
    }

    pub fn with_generator(mut self, generator: Arc<dyn ChunkMeshGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn set_lighter(&mut self, lighter: Option<Arc<dyn TileMapLighter>>) {
        self.lighter = lighter;
        self.lighting_dirty = true;
    }

    pub fn set_generator(&mut self, generator: Option<Arc<dyn ChunkMeshGenerator>>) {
        self.generator = generator;
        self.dirty.fill(true);
    }

    #[inline]
    pub fn config(&self) -> &TileMapConfig {
        &self.config
    }

    #[inline]
    pub fn meshes(&self) -> &Arc<TileMeshCollection> {
        &self.meshes
    }

    /// Mesh for a tile of this map.
    #[inline]
    pub fn mesh_of(&self, tile: &Tile) -> &TileMesh {
        self.meshes.get(tile)
    }

    #[inline]
    pub fn ambient_light(&self) -> u8 {
        self.config.ambient_light
    }

    #[inline]
    pub fn sky_light(&self) -> u8 {
        self.config.sky_light
    }

    pub fn set_ambient_light(&mut self, light: u8) {
        self.config.ambient_light = light.min(LIGHT_VALUE_MAX);
        self.lighting_dirty = true;
    }

    pub fn set_sky_light(&mut self, light: u8) {
        self.config.sky_light = light.min(LIGHT_VALUE_MAX);
        self.lighting_dirty = true;
    }

    #[inline]
    pub fn chunk_index(&self, coord: ChunkCoord) -> Option<usize> {
        let c = &self.config;
        let in_range = |v: i32, n: usize| v >= 0 && (v as usize) < n;
        if !in_range(coord.cx, c.width_in_chunks)
            || !in_range(coord.cy, c.height_in_chunks)
            || !in_range(coord.cz, c.depth_in_chunks)
        {
            return None;
        }
        Some(
            (coord.cy as usize * c.depth_in_chunks + coord.cz as usize) * c.width_in_chunks
                + coord.cx as usize,
        )
    }

    #[inline]
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&TileChunk> {
        self.chunk_index(coord).map(|i| &self.chunks[i])
    }

    #[inline]
    pub fn chunk_mut(&mut self, coord: ChunkCoord) -> Option<&mut TileChunk> {
        self.chunk_index(coord).map(|i| &mut self.chunks[i])
    }

    /// All chunks in chunk row-major order.
    #[inline]
    pub fn chunks(&self) -> &[TileChunk] {
        &self.chunks
    }

    pub fn chunk_coords(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.chunks.iter().map(TileChunk::coord)
    }

    /// Chunk holding world tile `(x,y,z)`, or `None` outside the map.
    pub fn chunk_coord_of(&self, x: i32, y: i32, z: i32) -> Option<ChunkCoord> {
        if !self.is_within_bounds(x, y, z) {
            return None;
        }
        let c = &self.config;
        Some(ChunkCoord::new(
            x / c.chunk_width as i32,
            y / c.chunk_height as i32,
            z / c.chunk_depth as i32,
        ))
    }

    /// Global tile read; `None` past the map edge.
    #[inline]
    pub fn tile(&self, x: i32, y: i32, z: i32) -> Option<&Tile> {
        self.get_safe(x, y, z)
    }

    /// Edit entry point: replaces a tile and schedules relighting and remeshing of the
    /// owning chunk plus any neighbor sharing the edited cell's faces. Returns `false`
    /// outside the map.
    pub fn set_tile(&mut self, x: i32, y: i32, z: i32, tile: Tile) -> bool {
        if !self.is_within_bounds(x, y, z) {
            return false;
        }
        *self.get_mut(x as usize, y as usize, z as usize) = tile;
        self.lighting_dirty = true;
        for coord in self.affected_chunks(x, y, z) {
            self.mark_dirty(coord);
        }
        true
    }

    /// Chunk owning `(x,y,z)` plus the neighbors across any chunk face the cell touches.
    pub fn affected_chunks(&self, x: i32, y: i32, z: i32) -> Vec<ChunkCoord> {
        let Some(home) = self.chunk_coord_of(x, y, z) else {
            return Vec::new();
        };
        let c = &self.config;
        let local = [
            x - home.cx * c.chunk_width as i32,
            y - home.cy * c.chunk_height as i32,
            z - home.cz * c.chunk_depth as i32,
        ];
        let size = [c.chunk_width as i32, c.chunk_height as i32, c.chunk_depth as i32];
        let mut out = vec![home];
        for axis in 0..3 {
            // A one-tile-thick chunk touches both neighbors on that axis.
            for (edge, dir) in [(0, -1), (size[axis] - 1, 1)] {
                if local[axis] != edge {
                    continue;
                }
                let mut d = [0i32; 3];
                d[axis] = dir;
                let n = home.offset(d[0], d[1], d[2]);
                if self.chunk_index(n).is_some() {
                    out.push(n);
                }
            }
        }
        out
    }

    pub fn mark_dirty(&mut self, coord: ChunkCoord) {
        if let Some(i) = self.chunk_index(coord) {
            self.dirty[i] = true;
        }
    }

    pub fn mark_all_dirty(&mut self) {
        self.dirty.fill(true);
        self.lighting_dirty = true;
    }

    #[inline]
    pub fn is_dirty(&self, coord: ChunkCoord) -> bool {
        self.chunk_index(coord).is_some_and(|i| self.dirty[i])
    }

    #[inline]
    pub fn is_lighting_dirty(&self) -> bool {
        self.lighting_dirty
    }

    pub fn dirty_chunks(&self) -> Vec<ChunkCoord> {
        self.chunks
            .iter()
            .zip(&self.dirty)
            .filter(|(_, d)| **d)
            .map(|(c, _)| c.coord())
            .collect()
    }

    /// Full relight with the configured lighter. Without one, light values are left
    /// as they are.
    pub fn update_lighting(&mut self) {
        self.lighting_dirty = false;
        let Some(lighter) = self.lighter.clone() else {
            log::debug!(target: "lighting", "no lighter configured; skipping");
            return;
        };
        let t0 = Instant::now();
        lighter.light(self);
        log::info!(
            target: "perf",
            "ms={} tilemap_light chunks={}",
            t0.elapsed().as_millis(),
            self.chunks.len()
        );
    }

    /// Regenerates one chunk's buffers. Returns `false` without a generator or for an
    /// unknown chunk.
    pub fn update_chunk_mesh(&mut self, coord: ChunkCoord) -> bool {
        let Some(generator) = self.generator.clone() else {
            return false;
        };
        let Some(i) = self.chunk_index(coord) else {
            return false;
        };
        self.chunks[i].release_mesh();
        let mesh = generator.generate(self, coord);
        self.chunks[i].set_mesh(mesh);
        self.dirty[i] = false;
        true
    }

    pub fn update_all_meshes(&mut self) {
        let t0 = Instant::now();
        let coords: Vec<ChunkCoord> = self.chunk_coords().collect();
        for coord in &coords {
            self.update_chunk_mesh(*coord);
        }
        log::info!(
            target: "perf",
            "ms={} tilemap_mesh_all chunks={} vertices={}",
            t0.elapsed().as_millis(),
            coords.len(),
            self.vertex_count()
        );
    }

    /// Relights if any edit happened since the last pass, then remeshes dirty chunks.
    /// With a light-dependent generator, chunks whose light changed (and their
    /// neighbors) are remeshed too. Returns the number of chunks remeshed.
    pub fn update_dirty(&mut self) -> usize {
        let t0 = Instant::now();
        if self.lighting_dirty {
            let track = self.generator.as_ref().is_some_and(|g| g.uses_lighting());
            let before = if track { self.light_fingerprints() } else { Vec::new() };
            self.update_lighting();
            if track {
                let after = self.light_fingerprints();
                let changed: Vec<ChunkCoord> = self
                    .chunks
                    .iter()
                    .zip(before.iter().zip(&after))
                    .filter(|(_, (b, a))| b != a)
                    .map(|(c, _)| c.coord())
                    .collect();
                for c in changed {
                    self.mark_dirty(c);
                    for (dx, dy, dz) in NEIGHBOR_OFFSETS {
                        self.mark_dirty(c.offset(dx, dy, dz));
                    }
                }
            }
        }
        let dirty = self.dirty_chunks();
        let mut rebuilt = 0;
        for coord in &dirty {
            if self.update_chunk_mesh(*coord) {
                rebuilt += 1;
            }
        }
        if rebuilt > 0 {
            log::debug!(
                target: "perf",
                "ms={} tilemap_update_dirty remeshed={}",
                t0.elapsed().as_millis(),
                rebuilt
            );
        }
        rebuilt
    }

    /// Vertices across every chunk's buffers.
    pub fn vertex_count(&self) -> usize {
        self.chunks.iter().map(|c| c.mesh().vertex_count()).sum()
    }

    fn light_fingerprints(&self) -> Vec<u64> {
        self.chunks
            .iter()
            .map(|c| {
                let mut h = DefaultHasher::new();
                for t in c.tiles() {
                    (t.tile_light, t.sky_light).hash(&mut h);
                }
                h.finish()
            })
            .collect()
    }

    #[inline]
    fn split(&self, x: usize, y: usize, z: usize) -> (usize, usize, usize, usize) {
        let c = &self.config;
        let coord = ChunkCoord::new(
            (x / c.chunk_width) as i32,
            (y / c.chunk_height) as i32,
            (z / c.chunk_depth) as i32,
        );
        let Some(i) = self.chunk_index(coord) else {
            panic!("tile ({x},{y},{z}) outside map");
        };
        (i, x % c.chunk_width, y % c.chunk_height, z % c.chunk_depth)
    }
}

const NEIGHBOR_OFFSETS: [(i32, i32, i32); 6] = [
    (1, 0, 0),
    (-1, 0, 0),
    (0, 1, 0),
    (0, -1, 0),
    (0, 0, 1),
    (0, 0, -1),
];

fn chunk_coord_of(config: &TileMapConfig, i: usize) -> ChunkCoord {
    let w = config.width_in_chunks;
    let d = config.depth_in_chunks;
    ChunkCoord::new((i % w) as i32, (i / (w * d)) as i32, ((i / w) % d) as i32)
}

impl TileContainer for TileMap {
    #[inline]
    fn width(&self) -> usize {
        self.config.chunk_width * self.config.width_in_chunks
    }

    #[inline]
    fn height(&self) -> usize {
        self.config.chunk_height * self.config.height_in_chunks
    }

    #[inline]
    fn depth(&self) -> usize {
        self.config.chunk_depth * self.config.depth_in_chunks
    }

    #[inline]
    fn origin(&self) -> TileCoord {
        TileCoord::default()
    }

    #[inline]
    fn get(&self, x: usize, y: usize, z: usize) -> &Tile {
        let (i, lx, ly, lz) = self.split(x, y, z);
        self.chunks[i].get(lx, ly, lz)
    }

    /// Raw access for lighting passes; does not mark anything dirty.
    #[inline]
    fn get_mut(&mut self, x: usize, y: usize, z: usize) -> &mut Tile {
        let (i, lx, ly, lz) = self.split(x, y, z);
        self.chunks[i].get_mut(lx, ly, lz)
    }

    /// Trait-level writes (prefab stamps) are edits: they go through
    /// [`TileMap::set_tile`] and its dirty tracking.
    fn replace_tile(&mut self, x: usize, y: usize, z: usize, tile: Tile) {
        assert!(
            x < self.width() && y < self.height() && z < self.depth(),
            "tile ({x},{y},{z}) outside tile map"
        );
        // Extents fit i32 for any valid config.
        self.set_tile(x as i32, y as i32, z as i32, tile);
    }
}
