use blockscape_geom::{Color, Vec3};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum VertexAttribute {
    Position,
    Normal,
    Color,
    TexCoord,
}

/// Declared per-vertex attributes of a [`VertexBuffer`]. Position is always present.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct VertexLayout {
    pub normals: bool,
    pub colors: bool,
    pub texcoords: bool,
}

impl VertexLayout {
    pub const POSITION: VertexLayout = VertexLayout {
        normals: false,
        colors: false,
        texcoords: false,
    };
    pub const POSITION_NORMAL_COLOR_TEXCOORD: VertexLayout = VertexLayout {
        normals: true,
        colors: true,
        texcoords: true,
    };

    #[inline]
    pub fn has(&self, attr: VertexAttribute) -> bool {
        match attr {
            VertexAttribute::Position => true,
            VertexAttribute::Normal => self.normals,
            VertexAttribute::Color => self.colors,
            VertexAttribute::TexCoord => self.texcoords,
        }
    }
}

/// Convenience aggregate for reading or writing one vertex.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub color: Color,
    pub texcoord: (f32, f32),
}

impl Default for Vertex {
    fn default() -> Self {
        Vertex {
            position: Vec3::ZERO,
            normal: Vec3::ZERO,
            color: Color::WHITE,
            texcoord: (0.0, 0.0),
        }
    }
}

/// CPU-side vertex storage, one flat array per declared attribute, ready for upload.
///
/// The buffer's size is the number of allocated vertex slots. It only grows through
/// [`VertexBuffer::extend`], so callers decide exactly how much is allocated.
#[derive(Clone, Debug, PartialEq)]
pub struct VertexBuffer {
    layout: VertexLayout,
    len: usize,
    pos: Vec<f32>,
    norm: Vec<f32>,
    col: Vec<u8>,
    uv: Vec<f32>,
}

impl VertexBuffer {
    pub fn new(layout: VertexLayout) -> Self {
        Self::with_len(layout, 0)
    }

    /// Allocates `len` zeroed vertex slots.
    pub fn with_len(layout: VertexLayout, len: usize) -> Self {
        let mut vb = VertexBuffer {
            layout,
            len: 0,
            pos: Vec::new(),
            norm: Vec::new(),
            col: Vec::new(),
            uv: Vec::new(),
        };
        vb.extend(len);
        vb
    }

    #[inline]
    pub fn layout(&self) -> VertexLayout {
        self.layout
    }

    /// Number of allocated vertex slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Grows the buffer by exactly `additional` zeroed slots.
    pub fn extend(&mut self, additional: usize) {
        if additional == 0 {
            return;
        }
        self.len += additional;
        self.pos.resize(self.len * 3, 0.0);
        if self.layout.normals {
            self.norm.resize(self.len * 3, 0.0);
        }
        if self.layout.colors {
            self.col.resize(self.len * 4, 0);
        }
        if self.layout.texcoords {
            self.uv.resize(self.len * 2, 0.0);
        }
    }

    /// Appends one vertex, growing by a single slot.
    pub fn push(&mut self, v: Vertex) {
        let i = self.len;
        self.extend(1);
        self.set_vertex(i, v);
    }

    #[inline]
    pub fn position(&self, i: usize) -> Vec3 {
        let p = &self.pos[i * 3..i * 3 + 3];
        Vec3::new(p[0], p[1], p[2])
    }

    #[inline]
    pub fn set_position(&mut self, i: usize, v: Vec3) {
        self.pos[i * 3..i * 3 + 3].copy_from_slice(&[v.x, v.y, v.z]);
    }

    #[inline]
    pub fn normal(&self, i: usize) -> Vec3 {
        assert!(self.layout.normals, "vertex layout has no normals");
        let n = &self.norm[i * 3..i * 3 + 3];
        Vec3::new(n[0], n[1], n[2])
    }

    #[inline]
    pub fn set_normal(&mut self, i: usize, v: Vec3) {
        assert!(self.layout.normals, "vertex layout has no normals");
        self.norm[i * 3..i * 3 + 3].copy_from_slice(&[v.x, v.y, v.z]);
    }

    #[inline]
    pub fn color(&self, i: usize) -> Color {
        assert!(self.layout.colors, "vertex layout has no colors");
        let c = &self.col[i * 4..i * 4 + 4];
        Color::rgba(c[0], c[1], c[2], c[3])
    }

    #[inline]
    pub fn set_color(&mut self, i: usize, c: Color) {
        assert!(self.layout.colors, "vertex layout has no colors");
        self.col[i * 4..i * 4 + 4].copy_from_slice(&[c.r, c.g, c.b, c.a]);
    }

    #[inline]
    pub fn texcoord(&self, i: usize) -> (f32, f32) {
        assert!(self.layout.texcoords, "vertex layout has no texcoords");
        (self.uv[i * 2], self.uv[i * 2 + 1])
    }

    #[inline]
    pub fn set_texcoord(&mut self, i: usize, uv: (f32, f32)) {
        assert!(self.layout.texcoords, "vertex layout has no texcoords");
        self.uv[i * 2] = uv.0;
        self.uv[i * 2 + 1] = uv.1;
    }

    /// Reads every attribute; undeclared ones come back as [`Vertex::default`] values.
    pub fn vertex(&self, i: usize) -> Vertex {
        let d = Vertex::default();
        Vertex {
            position: self.position(i),
            normal: if self.layout.normals { self.normal(i) } else { d.normal },
            color: if self.layout.colors { self.color(i) } else { d.color },
            texcoord: if self.layout.texcoords { self.texcoord(i) } else { d.texcoord },
        }
    }

    /// Writes the declared attributes of `v`; the rest are ignored.
    pub fn set_vertex(&mut self, i: usize, v: Vertex) {
        self.set_position(i, v.position);
        if self.layout.normals {
            self.set_normal(i, v.normal);
        }
        if self.layout.colors {
            self.set_color(i, v.color);
        }
        if self.layout.texcoords {
            self.set_texcoord(i, v.texcoord);
        }
    }

    /// Returns a slice of interleaved vertex positions (x,y,z per vertex).
    pub fn positions(&self) -> &[f32] {
        &self.pos
    }
    /// Returns a slice of interleaved vertex normals (x,y,z per vertex).
    pub fn normals(&self) -> &[f32] {
        &self.norm
    }
    pub fn colors(&self) -> &[u8] {
        &self.col
    }
    pub fn texcoords(&self) -> &[f32] {
        &self.uv
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extend_grows_every_declared_array_exactly() {
        let mut vb = VertexBuffer::new(VertexLayout::POSITION_NORMAL_COLOR_TEXCOORD);
        vb.extend(5);
        assert_eq!(vb.len(), 5);
        assert_eq!(vb.positions().len(), 15);
        assert_eq!(vb.normals().len(), 15);
        assert_eq!(vb.colors().len(), 20);
        assert_eq!(vb.texcoords().len(), 10);
    }

    #[test]
    fn position_only_layout_skips_other_arrays() {
        let mut vb = VertexBuffer::with_len(VertexLayout::POSITION, 3);
        vb.set_position(2, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(vb.position(2), Vec3::new(1.0, 2.0, 3.0));
        assert!(vb.normals().is_empty());
        assert_eq!(vb.vertex(2).color, Color::WHITE);
    }

    #[test]
    fn push_and_read_back() {
        let mut vb = VertexBuffer::new(VertexLayout::POSITION_NORMAL_COLOR_TEXCOORD);
        let v = Vertex {
            position: Vec3::new(0.5, -0.5, 0.5),
            normal: Vec3::UP,
            color: Color::rgb(9, 8, 7),
            texcoord: (0.25, 0.75),
        };
        vb.push(v);
        assert_eq!(vb.len(), 1);
        assert_eq!(vb.vertex(0), v);
    }

    #[test]
    #[should_panic(expected = "no normals")]
    fn undeclared_attribute_access_panics() {
        let vb = VertexBuffer::with_len(VertexLayout::POSITION, 1);
        let _ = vb.normal(0);
    }
}
