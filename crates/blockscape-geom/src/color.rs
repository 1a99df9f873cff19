/// 8-bit RGBA color. Packs to a `u32` with red in the lowest byte (`0xAABBGGRR`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

impl Color {
    pub const WHITE: Color = Color::rgba(255, 255, 255, 255);
    pub const BLACK: Color = Color::rgba(0, 0, 0, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    #[inline]
    pub const fn from_packed(v: u32) -> Self {
        Self {
            r: (v & 0xFF) as u8,
            g: ((v >> 8) & 0xFF) as u8,
            b: ((v >> 16) & 0xFF) as u8,
            a: ((v >> 24) & 0xFF) as u8,
        }
    }

    #[inline]
    pub const fn packed(self) -> u32 {
        (self.r as u32) | ((self.g as u32) << 8) | ((self.b as u32) << 16) | ((self.a as u32) << 24)
    }

    /// Channel-wise product, treating each channel as a fraction of 255.
    #[inline]
    pub fn modulate(self, other: Color) -> Color {
        #[inline]
        fn mul(a: u8, b: u8) -> u8 {
            ((a as u16 * b as u16 + 127) / 255) as u8
        }
        Color::rgba(
            mul(self.r, other.r),
            mul(self.g, other.g),
            mul(self.b, other.b),
            mul(self.a, other.a),
        )
    }

    /// Scales RGB by `factor` in `[0,1]`; alpha is left alone.
    #[inline]
    pub fn scale_rgb(self, factor: f32) -> Color {
        let f = factor.clamp(0.0, 1.0);
        let s = |c: u8| (c as f32 * f).round() as u8;
        Color::rgba(s(self.r), s(self.g), s(self.b), self.a)
    }

    /// Parses `#RRGGBB` or `#RRGGBBAA` (leading `#` optional).
    pub fn from_hex(s: &str) -> Option<Color> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            6 => Some(Color::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Color::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }
}
