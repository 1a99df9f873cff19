use blockscape_geom::Vec3;
use blockscape_tiles::{Rotation, Vertex, VertexBuffer, VertexLayout};

/// Append cursor over a [`VertexBuffer`] that only ever grows by what is about to be
/// written, so a finished buffer has no unused slots.
pub(crate) struct BufferCursor {
    buf: VertexBuffer,
    next: usize,
}

impl BufferCursor {
    pub(crate) fn new() -> Self {
        Self {
            buf: VertexBuffer::new(VertexLayout::POSITION_NORMAL_COLOR_TEXCOORD),
            next: 0,
        }
    }

    /// Makes room for `n` more vertices, extending by exactly the deficit.
    #[inline]
    pub(crate) fn reserve(&mut self, n: usize) {
        let remaining = self.buf.len() - self.next;
        if remaining < n {
            self.buf.extend(n - remaining);
        }
    }

    #[inline]
    pub(crate) fn write(&mut self, v: Vertex) {
        self.buf.set_vertex(self.next, v);
        self.next += 1;
    }

    #[inline]
    pub(crate) fn written(&self) -> usize {
        self.next
    }

    pub(crate) fn finish(self) -> VertexBuffer {
        debug_assert_eq!(self.next, self.buf.len());
        self.buf
    }
}

/// Mesh space to world space for one tile: turn about Y, shift the unit cube's center
/// onto the cell center, then move to the cell.
#[derive(Copy, Clone, Debug)]
pub(crate) struct TileTransform {
    turns: u8,
    offset: Vec3,
}

impl TileTransform {
    pub(crate) fn new(facing: Rotation, cell: (i32, i32, i32)) -> Self {
        Self {
            turns: facing.turns(),
            offset: Vec3::new(cell.0 as f32, cell.1 as f32, cell.2 as f32) + Vec3::splat(0.5),
        }
    }

    #[inline]
    pub(crate) fn apply(&self, v: Vertex) -> Vertex {
        Vertex {
            position: v.position.rotate_y_quarters(self.turns) + self.offset,
            normal: v.normal.rotate_y_quarters(self.turns),
            ..v
        }
    }
}
