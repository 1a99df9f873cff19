use blockscape_geom::Vec3;

/// One side of a tile cell. Discriminants double as bit positions in side masks.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Face {
    PosY = 0,
    NegY = 1,
    PosX = 2,
    NegX = 3,
    PosZ = 4,
    NegZ = 5,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::PosY,
        Face::NegY,
        Face::PosX,
        Face::NegX,
        Face::PosZ,
        Face::NegZ,
    ];

    pub const TOP: Face = Face::PosY;
    pub const BOTTOM: Face = Face::NegY;
    pub const RIGHT: Face = Face::PosX;
    pub const LEFT: Face = Face::NegX;
    pub const FRONT: Face = Face::PosZ;
    pub const BACK: Face = Face::NegZ;

    /// Mask with every side set.
    pub const ALL_MASK: u8 = 0b11_1111;

    /// Returns the `[0..6)` index of this face.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn bit(self) -> u8 {
        1 << self.index()
    }

    #[inline]
    pub fn in_mask(self, mask: u8) -> bool {
        mask & self.bit() != 0
    }

    #[inline]
    pub fn opposite(self) -> Face {
        match self {
            Face::PosY => Face::NegY,
            Face::NegY => Face::PosY,
            Face::PosX => Face::NegX,
            Face::NegX => Face::PosX,
            Face::PosZ => Face::NegZ,
            Face::NegZ => Face::PosZ,
        }
    }

    /// Returns the unit-normal vector for this face.
    #[inline]
    pub fn normal(self) -> Vec3 {
        let (dx, dy, dz) = self.delta();
        Vec3::new(dx as f32, dy as f32, dz as f32)
    }

    /// Returns the integer grid delta `(dx,dy,dz)` when stepping out of this face.
    #[inline]
    pub fn delta(self) -> (i32, i32, i32) {
        match self {
            Face::PosY => (0, 1, 0),
            Face::NegY => (0, -1, 0),
            Face::PosX => (1, 0, 0),
            Face::NegX => (-1, 0, 0),
            Face::PosZ => (0, 0, 1),
            Face::NegZ => (0, 0, -1),
        }
    }

    /// The face this one becomes after turning the cell by `rotation` about +Y.
    /// Agrees with [`Vec3::rotate_y_quarters`] applied to [`Face::normal`].
    #[inline]
    pub fn rotated(self, rotation: Rotation) -> Face {
        let mut f = self;
        for _ in 0..rotation.turns() {
            f = match f {
                Face::PosX => Face::NegZ,
                Face::NegZ => Face::NegX,
                Face::NegX => Face::PosZ,
                Face::PosZ => Face::PosX,
                vertical => vertical,
            };
        }
        f
    }

    /// Parses config names: `top`, `bottom`, `left`, `right`, `front`, `back`.
    pub fn from_name(name: &str) -> Option<Face> {
        match name {
            "top" => Some(Face::TOP),
            "bottom" => Some(Face::BOTTOM),
            "right" => Some(Face::RIGHT),
            "left" => Some(Face::LEFT),
            "front" => Some(Face::FRONT),
            "back" => Some(Face::BACK),
            _ => None,
        }
    }
}

/// Discrete facing about the +Y axis.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Rotation {
    #[default]
    R0 = 0,
    R90 = 1,
    R180 = 2,
    R270 = 3,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [Rotation::R0, Rotation::R90, Rotation::R180, Rotation::R270];

    /// Wraps any turn count into `[0, 4)`.
    #[inline]
    pub fn from_turns(turns: u8) -> Rotation {
        match turns & 3 {
            0 => Rotation::R0,
            1 => Rotation::R90,
            2 => Rotation::R180,
            _ => Rotation::R270,
        }
    }

    /// Strict conversion for persisted or user-supplied values.
    #[inline]
    pub fn try_from_turns(turns: u8) -> Option<Rotation> {
        (turns < 4).then(|| Rotation::from_turns(turns))
    }

    #[inline]
    pub fn from_degrees(deg: u32) -> Option<Rotation> {
        match deg {
            0 => Some(Rotation::R0),
            90 => Some(Rotation::R90),
            180 => Some(Rotation::R180),
            270 => Some(Rotation::R270),
            _ => None,
        }
    }

    #[inline]
    pub fn turns(self) -> u8 {
        self as u8
    }

    #[inline]
    pub fn degrees(self) -> u32 {
        self.turns() as u32 * 90
    }

    #[inline]
    pub fn advance(self, by: Rotation) -> Rotation {
        Rotation::from_turns(self.turns() + by.turns())
    }

    #[inline]
    pub fn inverse(self) -> Rotation {
        Rotation::from_turns(4 - self.turns())
    }

    /// True for the turns that swap the X and Z extents.
    #[inline]
    pub fn swaps_axes(self) -> bool {
        matches!(self, Rotation::R90 | Rotation::R270)
    }
}
