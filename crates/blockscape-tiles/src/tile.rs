use blockscape_geom::Color;

use crate::face::Rotation;

/// Highest value either light channel can hold.
pub const LIGHT_VALUE_MAX: u8 = 15;

// 0.8^(15 - light): each step down in light dims by a fifth.
const BRIGHTNESS: [f32; (LIGHT_VALUE_MAX as usize) + 1] = [
    0.035_184_372,
    0.043_980_465,
    0.054_975_58,
    0.068_719_48,
    0.085_899_35,
    0.107_374_18,
    0.134_217_73,
    0.167_772_16,
    0.209_715_2,
    0.262_144,
    0.327_68,
    0.409_6,
    0.512,
    0.64,
    0.8,
    1.0,
];

/// One grid cell. Plain value type; owned by the flat arrays of chunks and prefabs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Tile {
    /// 0 is empty space, anything else indexes the mesh collection.
    pub index: u16,
    pub flags: u16,
    pub tile_light: u8,
    pub sky_light: u8,
    /// Quarter turns about +Y; only meaningful with [`Tile::ROTATED`].
    pub rotation: u8,
    pub parent_offset_x: u8,
    pub parent_offset_y: u8,
    pub parent_offset_z: u8,
    pub parent_width: u8,
    pub parent_height: u8,
    pub parent_depth: u8,
    /// Only meaningful with [`Tile::CUSTOM_COLOR`].
    pub color: Color,
}

impl Default for Tile {
    fn default() -> Self {
        Tile::EMPTY
    }
}

impl Tile {
    pub const COLLIDEABLE: u16 = 1 << 0;
    pub const ROTATED: u16 = 1 << 1;
    pub const LARGE_TILE: u16 = 1 << 2;
    pub const LARGE_TILE_OWNER: u16 = 1 << 3;
    pub const CUSTOM_COLOR: u16 = 1 << 4;
    pub const SLIPPERY: u16 = 1 << 5;
    pub const SKY_LIT: u16 = 1 << 6;
    pub const WALKABLE_SURFACE: u16 = 1 << 7;

    pub const NO_TILE: u16 = 0;

    pub const EMPTY: Tile = Tile {
        index: Tile::NO_TILE,
        flags: 0,
        tile_light: 0,
        sky_light: 0,
        rotation: 0,
        parent_offset_x: 0,
        parent_offset_y: 0,
        parent_offset_z: 0,
        parent_width: 0,
        parent_height: 0,
        parent_depth: 0,
        color: Color::TRANSPARENT,
    };

    /// A tile of the given mesh index with the given flags and nothing else set.
    #[inline]
    pub const fn new(index: u16, flags: u16) -> Self {
        Tile {
            index,
            flags,
            ..Tile::EMPTY
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index == Tile::NO_TILE
    }

    #[inline]
    pub fn has_flag(&self, flag: u16) -> bool {
        self.flags & flag == flag
    }

    #[inline]
    pub fn set_flag(&mut self, flag: u16) {
        self.flags |= flag;
    }

    #[inline]
    pub fn clear_flag(&mut self, flag: u16) {
        self.flags &= !flag;
    }

    #[inline]
    pub fn is_collideable(&self) -> bool {
        self.has_flag(Tile::COLLIDEABLE)
    }

    #[inline]
    pub fn is_sky_lit(&self) -> bool {
        self.has_flag(Tile::SKY_LIT)
    }

    #[inline]
    pub fn is_rotated(&self) -> bool {
        self.has_flag(Tile::ROTATED)
    }

    /// Effective facing; `R0` unless the rotated flag is set.
    #[inline]
    pub fn facing(&self) -> Rotation {
        if self.is_rotated() {
            Rotation::from_turns(self.rotation)
        } else {
            Rotation::R0
        }
    }

    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation.turns();
        self.set_flag(Tile::ROTATED);
    }

    pub fn clear_rotation(&mut self) {
        self.rotation = 0;
        self.clear_flag(Tile::ROTATED);
    }

    #[inline]
    pub fn custom_color(&self) -> Option<Color> {
        self.has_flag(Tile::CUSTOM_COLOR).then_some(self.color)
    }

    pub fn set_custom_color(&mut self, color: Color) {
        self.color = color;
        self.set_flag(Tile::CUSTOM_COLOR);
    }

    pub fn clear_custom_color(&mut self) {
        self.color = Color::TRANSPARENT;
        self.clear_flag(Tile::CUSTOM_COLOR);
    }

    pub fn set_tile_light(&mut self, light: u8) {
        self.tile_light = light.min(LIGHT_VALUE_MAX);
    }

    pub fn set_sky_light(&mut self, light: u8) {
        self.sky_light = light.min(LIGHT_VALUE_MAX);
    }

    /// Replaces the mesh index and flags, keeping light values.
    pub fn set(&mut self, index: u16, flags: u16) {
        self.index = index;
        self.flags = flags;
    }

    /// Resets to the zero value.
    pub fn clear(&mut self) {
        *self = Tile::EMPTY;
    }

    /// Stronger of the two light channels.
    #[inline]
    pub fn light(&self) -> u8 {
        self.tile_light.max(self.sky_light)
    }

    #[inline]
    pub fn brightness(&self) -> f32 {
        Tile::brightness_for(self.light())
    }

    /// Render brightness for a light value; values above the maximum saturate.
    #[inline]
    pub fn brightness_for(light: u8) -> f32 {
        BRIGHTNESS[light.min(LIGHT_VALUE_MAX) as usize]
    }
}
