/// Integer tile position. Local or world space depending on the API that returns it.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct TileCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl TileCoord {
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

/// Position of a chunk in a map's chunk grid.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cy: i32,
    pub cz: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(cx: i32, cy: i32, cz: i32) -> Self {
        Self { cx, cy, cz }
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            cx: self.cx + dx,
            cy: self.cy + dy,
            cz: self.cz + dz,
        }
    }

    /// World tile position of this chunk's local origin.
    #[inline]
    pub fn tile_origin(self, sx: usize, sy: usize, sz: usize) -> TileCoord {
        TileCoord::new(
            self.cx * sx as i32,
            self.cy * sy as i32,
            self.cz * sz as i32,
        )
    }
}
