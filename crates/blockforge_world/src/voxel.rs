//! The smallest data unit in the voxel world.

/// The material tag of one voxel.
///
/// `Stone` is the single "generic solid" code point; every non-`Empty`
/// kind is solid. The discriminants are the on-disk codes of the binary
/// world format and must never be reordered.
#[repr(u8)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum VoxelKind {
    /// No surface.
    #[default]
    Empty = 0,
    /// Generic solid stone.
    Stone = 1,
    /// Red-tinted solid (editor marker material).
    SolidRed = 2,
    /// Dirt.
    Dirt = 3,
    /// Grass-topped soil.
    Grass = 4,
    /// Wood.
    Wood = 5,
}

impl VoxelKind {
    /// Returns the on-disk code of this kind.
    #[inline]
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Decodes an on-disk code.
    ///
    /// Codes outside the enumeration decode leniently to `Empty`; a
    /// corrupt payload byte must never alias into a solid cell.
    #[inline]
    #[must_use]
    pub const fn from_code(code: u8) -> Self {
        match code {
            1 => Self::Stone,
            2 => Self::SolidRed,
            3 => Self::Dirt,
            4 => Self::Grass,
            5 => Self::Wood,
            _ => Self::Empty,
        }
    }

    /// Returns true if this kind carries a surface.
    #[inline]
    #[must_use]
    pub const fn is_solid(self) -> bool {
        !matches!(self, Self::Empty)
    }

    /// Returns the mesher material byte for this kind.
    ///
    /// Only `Stone` and `SolidRed` carry distinct mesh material codes;
    /// the terrain kinds collapse to 0 and take their colour from the
    /// albedo palette instead. The greedy merge key sees exactly these
    /// bytes, so this table decides which faces may share a rectangle.
    #[inline]
    #[must_use]
    pub const fn material(self) -> u8 {
        match self {
            Self::Stone => 1,
            Self::SolidRed => 251,
            Self::Empty | Self::Dirt | Self::Grass | Self::Wood => 0,
        }
    }

    /// Returns the base albedo of this kind as 8-bit RGB.
    #[inline]
    #[must_use]
    pub const fn albedo_rgb(self) -> [u8; 3] {
        match self {
            Self::Stone => [150, 154, 160],
            Self::Dirt => [122, 93, 58],
            Self::Grass => [80, 142, 63],
            Self::Wood => [141, 106, 64],
            Self::SolidRed => [255, 71, 56],
            Self::Empty => [0, 0, 0],
        }
    }
}

/// One voxel - a tagged material value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Voxel {
    /// The material tag.
    pub kind: VoxelKind,
}

impl Voxel {
    /// The empty voxel.
    pub const EMPTY: Self = Self::new(VoxelKind::Empty);

    /// Creates a voxel of the given kind.
    #[inline]
    #[must_use]
    pub const fn new(kind: VoxelKind) -> Self {
        Self { kind }
    }

    /// Returns true if this voxel carries a surface.
    #[inline]
    #[must_use]
    pub const fn is_solid(self) -> bool {
        self.kind.is_solid()
    }

    /// Returns true if this voxel is empty.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        !self.is_solid()
    }
}
