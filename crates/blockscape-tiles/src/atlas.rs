use serde::Deserialize;

/// Normalized texture sub-rectangle.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct UvRect {
    pub u0: f32,
    pub v0: f32,
    pub u1: f32,
    pub v1: f32,
}

/// A texture atlas laid out as a grid of equally sized tile regions, numbered row by
/// row from the top-left.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct TextureAtlas {
    pub width: u32,
    pub height: u32,
    pub tile_width: u32,
    pub tile_height: u32,
}

impl TextureAtlas {
    pub fn new(width: u32, height: u32, tile_width: u32, tile_height: u32) -> Self {
        Self {
            width,
            height,
            tile_width,
            tile_height,
        }
    }

    /// An atlas must hold at least one whole region.
    pub fn is_valid(&self) -> bool {
        self.tile_width > 0
            && self.tile_height > 0
            && self.width >= self.tile_width
            && self.height >= self.tile_height
    }

    #[inline]
    pub fn columns(&self) -> u32 {
        self.width / self.tile_width.max(1)
    }

    #[inline]
    pub fn rows(&self) -> u32 {
        self.height / self.tile_height.max(1)
    }

    #[inline]
    pub fn region_count(&self) -> usize {
        (self.columns() as usize).saturating_mul(self.rows() as usize)
    }

    /// UV rectangle of region `n`. Panics if `n` is outside the atlas.
    pub fn region(&self, n: usize) -> UvRect {
        assert!(
            n < self.region_count(),
            "atlas region {n} out of range ({} regions)",
            self.region_count()
        );
        let cols = self.columns() as usize;
        let (col, row) = ((n % cols) as f32, (n / cols) as f32);
        let (w, h) = (self.width as f32, self.height as f32);
        let (tw, th) = (self.tile_width as f32, self.tile_height as f32);
        UvRect {
            u0: col * tw / w,
            v0: row * th / h,
            u1: (col + 1.0) * tw / w,
            v1: (row + 1.0) * th / h,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regions_are_numbered_row_major() {
        let atlas = TextureAtlas::new(64, 32, 16, 16);
        assert_eq!(atlas.region_count(), 8);
        assert_eq!(
            atlas.region(5),
            UvRect {
                u0: 0.25,
                v0: 0.5,
                u1: 0.5,
                v1: 1.0
            }
        );
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn huge_atlases_count_regions_without_wrapping() {
        let atlas = TextureAtlas::new(u32::MAX, u32::MAX, 1, 1);
        assert_eq!(atlas.columns(), u32::MAX);
        assert!(atlas.region_count() > u32::MAX as usize);
        assert_eq!(atlas.region(u32::MAX as usize).u0, 0.0);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn region_past_end_panics() {
        TextureAtlas::new(32, 32, 16, 16).region(4);
    }
}
