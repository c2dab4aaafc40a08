//! Integer grid primitives: cells, half-open cell boxes, and the six
//! axis-aligned neighbour directions.
//!
//! Everything here is a plain `Copy` value with component-wise integer
//! arithmetic. These types are the vocabulary of every deterministic
//! subsystem: CSG, meshing, the clipmap index, and transport topology.

use bytemuck::{Pod, Zeroable};

use crate::math::Vec3;

/// One integer voxel position in world space.
///
/// Arithmetic is component-wise. Overflow is checked by the standard
/// debug-build assertions; world extents are bounded to 24 bits by
/// contract so release arithmetic cannot wrap.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable, PartialEq, Eq, Hash)]
pub struct Cell3 {
    /// X coordinate.
    pub x: i32,
    /// Y coordinate.
    pub y: i32,
    /// Z coordinate.
    pub z: i32,
}

impl Cell3 {
    /// The origin cell.
    pub const ZERO: Self = Self::new(0, 0, 0);

    /// Creates a new cell.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Returns the neighbouring cell one step along `dir`.
    #[inline]
    #[must_use]
    pub const fn neighbor(self, dir: Dir6) -> Self {
        let offset = dir.offset();
        Self::new(self.x + offset.x, self.y + offset.y, self.z + offset.z)
    }
}

impl std::ops::Add for Cell3 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl std::ops::AddAssign for Cell3 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl std::ops::Sub for Cell3 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl std::ops::SubAssign for Cell3 {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl std::ops::Mul<i32> for Cell3 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: i32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl std::ops::Mul<Cell3> for i32 {
    type Output = Cell3;

    #[inline]
    fn mul(self, rhs: Cell3) -> Cell3 {
        rhs * self
    }
}

/// Half-open axis-aligned box of cells: `[min_inclusive, max_exclusive)`.
///
/// An invalid or empty box contains no cell. `include_cell` seeds a valid
/// unit box; `include_box` is the running union; `intersect` collapses to
/// an invalid box whenever the inputs are invalid, empty, or disjoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellBox {
    /// Inclusive minimum corner.
    pub min_inclusive: Cell3,
    /// Exclusive maximum corner.
    pub max_exclusive: Cell3,
    /// Whether this box holds meaningful bounds at all.
    pub valid: bool,
}

impl CellBox {
    /// The invalid box - contains nothing, unions as identity.
    pub const INVALID: Self = Self {
        min_inclusive: Cell3::ZERO,
        max_exclusive: Cell3::ZERO,
        valid: false,
    };

    /// Creates a valid box from explicit corners.
    ///
    /// The corners are taken as-is; an inverted pair yields a box that is
    /// valid but empty.
    #[inline]
    #[must_use]
    pub const fn from_min_max(min_inclusive: Cell3, max_exclusive: Cell3) -> Self {
        Self {
            min_inclusive,
            max_exclusive,
            valid: true,
        }
    }

    /// Returns true if this box contains no cell.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        if !self.valid {
            return true;
        }
        self.max_exclusive.x <= self.min_inclusive.x
            || self.max_exclusive.y <= self.min_inclusive.y
            || self.max_exclusive.z <= self.min_inclusive.z
    }

    /// Returns true if `cell` lies inside the box.
    #[inline]
    #[must_use]
    pub const fn contains(&self, cell: Cell3) -> bool {
        if !self.valid || self.is_empty() {
            return false;
        }
        cell.x >= self.min_inclusive.x
            && cell.x < self.max_exclusive.x
            && cell.y >= self.min_inclusive.y
            && cell.y < self.max_exclusive.y
            && cell.z >= self.min_inclusive.z
            && cell.z < self.max_exclusive.z
    }

    /// Grows the box to include a single cell.
    ///
    /// On an invalid box this seeds a valid unit box around the cell.
    pub fn include_cell(&mut self, cell: Cell3) {
        if !self.valid {
            self.min_inclusive = cell;
            self.max_exclusive = cell + Cell3::new(1, 1, 1);
            self.valid = true;
            return;
        }

        self.min_inclusive.x = self.min_inclusive.x.min(cell.x);
        self.min_inclusive.y = self.min_inclusive.y.min(cell.y);
        self.min_inclusive.z = self.min_inclusive.z.min(cell.z);

        let cell_max = cell + Cell3::new(1, 1, 1);
        self.max_exclusive.x = self.max_exclusive.x.max(cell_max.x);
        self.max_exclusive.y = self.max_exclusive.y.max(cell_max.y);
        self.max_exclusive.z = self.max_exclusive.z.max(cell_max.z);
    }

    /// Grows the box to include another box (running union).
    ///
    /// Invalid or empty operands leave the receiver untouched.
    pub fn include_box(&mut self, other: &Self) {
        if !other.valid || other.is_empty() {
            return;
        }
        if !self.valid || self.is_empty() {
            *self = *other;
            return;
        }

        self.min_inclusive.x = self.min_inclusive.x.min(other.min_inclusive.x);
        self.min_inclusive.y = self.min_inclusive.y.min(other.min_inclusive.y);
        self.min_inclusive.z = self.min_inclusive.z.min(other.min_inclusive.z);
        self.max_exclusive.x = self.max_exclusive.x.max(other.max_exclusive.x);
        self.max_exclusive.y = self.max_exclusive.y.max(other.max_exclusive.y);
        self.max_exclusive.z = self.max_exclusive.z.max(other.max_exclusive.z);
    }

    /// Componentwise intersection of two boxes.
    ///
    /// Returns [`CellBox::INVALID`] whenever either input is invalid or
    /// empty, or any axis collapses.
    #[must_use]
    pub fn intersect(lhs: &Self, rhs: &Self) -> Self {
        if !lhs.valid || lhs.is_empty() || !rhs.valid || rhs.is_empty() {
            return Self::INVALID;
        }

        let result = Self::from_min_max(
            Cell3::new(
                lhs.min_inclusive.x.max(rhs.min_inclusive.x),
                lhs.min_inclusive.y.max(rhs.min_inclusive.y),
                lhs.min_inclusive.z.max(rhs.min_inclusive.z),
            ),
            Cell3::new(
                lhs.max_exclusive.x.min(rhs.max_exclusive.x),
                lhs.max_exclusive.y.min(rhs.max_exclusive.y),
                lhs.max_exclusive.z.min(rhs.max_exclusive.z),
            ),
        );

        if result.is_empty() {
            return Self::INVALID;
        }
        result
    }

    /// Returns true if the two boxes share at least one cell.
    #[inline]
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        !Self::intersect(self, other).is_empty()
    }
}

/// The six axis-aligned neighbour directions, indexed 0..=5.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dir6 {
    /// +X.
    PosX = 0,
    /// -X.
    NegX = 1,
    /// +Y.
    PosY = 2,
    /// -Y.
    NegY = 3,
    /// +Z.
    PosZ = 4,
    /// -Z.
    NegZ = 5,
}

/// All six directions in index order.
pub const ALL_DIRS: [Dir6; 6] = [
    Dir6::PosX,
    Dir6::NegX,
    Dir6::PosY,
    Dir6::NegY,
    Dir6::PosZ,
    Dir6::NegZ,
];

impl Dir6 {
    /// Returns the 0..=5 index of this direction.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Returns the single-bit mask `1 << index`.
    #[inline]
    #[must_use]
    pub const fn bit(self) -> u8 {
        1 << self.index()
    }

    /// Looks a direction up by its 0..=5 index.
    #[inline]
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::PosX),
            1 => Some(Self::NegX),
            2 => Some(Self::PosY),
            3 => Some(Self::NegY),
            4 => Some(Self::PosZ),
            5 => Some(Self::NegZ),
            _ => None,
        }
    }

    /// Returns the unit cell step for this direction.
    #[inline]
    #[must_use]
    pub const fn offset(self) -> Cell3 {
        match self {
            Self::PosX => Cell3::new(1, 0, 0),
            Self::NegX => Cell3::new(-1, 0, 0),
            Self::PosY => Cell3::new(0, 1, 0),
            Self::NegY => Cell3::new(0, -1, 0),
            Self::PosZ => Cell3::new(0, 0, 1),
            Self::NegZ => Cell3::new(0, 0, -1),
        }
    }

    /// Returns the opposite direction. This is an involution.
    #[inline]
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::PosX => Self::NegX,
            Self::NegX => Self::PosX,
            Self::PosY => Self::NegY,
            Self::NegY => Self::PosY,
            Self::PosZ => Self::NegZ,
            Self::NegZ => Self::PosZ,
        }
    }

    /// Returns true if `a` and `b` point along the same axis in opposite
    /// senses.
    #[inline]
    #[must_use]
    pub const fn are_opposite(a: Self, b: Self) -> bool {
        a.opposite() as u8 == b as u8
    }

    /// Returns true if the two directions share an axis (equal or
    /// opposite).
    #[inline]
    #[must_use]
    pub const fn shares_axis(a: Self, b: Self) -> bool {
        a as u8 == b as u8 || Self::are_opposite(a, b)
    }

    /// Returns this direction as a float unit vector.
    #[inline]
    #[must_use]
    pub const fn unit_vector(self) -> Vec3 {
        match self {
            Self::PosX => Vec3::new(1.0, 0.0, 0.0),
            Self::NegX => Vec3::new(-1.0, 0.0, 0.0),
            Self::PosY => Vec3::new(0.0, 1.0, 0.0),
            Self::NegY => Vec3::new(0.0, -1.0, 0.0),
            Self::PosZ => Vec3::new(0.0, 0.0, 1.0),
            Self::NegZ => Vec3::new(0.0, 0.0, -1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_algebra() {
        let a = Cell3::new(10, 5, -2);
        let b = Cell3::new(3, -7, 4);
        assert_eq!((a + b) - b, a);
        assert_eq!(a * 3, 3 * a);
        assert_eq!(a * 3, Cell3::new(30, 15, -6));
    }

    #[test]
    fn test_neighbor_round_trip() {
        let start = Cell3::new(10, 5, -2);
        assert_eq!(start.neighbor(Dir6::PosX), Cell3::new(11, 5, -2));
        assert_eq!(start.neighbor(Dir6::NegZ), Cell3::new(10, 5, -3));

        for dir in ALL_DIRS {
            assert_eq!(start.neighbor(dir) + dir.opposite().offset(), start);
        }
    }

    #[test]
    fn test_opposite_is_involution() {
        for dir in ALL_DIRS {
            assert_eq!(dir.opposite().opposite(), dir);
            assert!(Dir6::are_opposite(dir, dir.opposite()));
            assert!(!Dir6::are_opposite(dir, dir));
        }
    }

    #[test]
    fn test_dir_bits_are_distinct() {
        let mut seen = 0u8;
        for dir in ALL_DIRS {
            assert_eq!(seen & dir.bit(), 0);
            seen |= dir.bit();
        }
        assert_eq!(seen, 0x3F);
    }

    #[test]
    fn test_box_include_cell() {
        let mut dirty = CellBox::INVALID;
        dirty.include_cell(Cell3::new(0, 0, 0));
        dirty.include_cell(Cell3::new(2, 1, 0));

        assert!(dirty.valid);
        assert!(dirty.contains(Cell3::new(0, 0, 0)));
        assert!(dirty.contains(Cell3::new(1, 0, 0)));
        assert!(dirty.contains(Cell3::new(2, 1, 0)));
        assert!(!dirty.contains(Cell3::new(3, 1, 0)));
    }

    #[test]
    fn test_box_union() {
        let mut acc = CellBox::INVALID;
        let other = CellBox::from_min_max(Cell3::new(4, 4, 4), Cell3::new(6, 6, 6));
        acc.include_box(&other);
        assert_eq!(acc, other);

        acc.include_box(&CellBox::INVALID);
        assert_eq!(acc, other);

        acc.include_box(&CellBox::from_min_max(Cell3::new(0, 0, 0), Cell3::new(1, 1, 1)));
        assert!(acc.contains(Cell3::new(0, 0, 0)));
        assert!(acc.contains(Cell3::new(5, 5, 5)));
    }

    #[test]
    fn test_intersect_commutative() {
        let a = CellBox::from_min_max(Cell3::new(0, 0, 0), Cell3::new(8, 8, 8));
        let b = CellBox::from_min_max(Cell3::new(4, 4, 4), Cell3::new(12, 12, 12));

        assert_eq!(CellBox::intersect(&a, &b), CellBox::intersect(&b, &a));
        assert_eq!(
            CellBox::intersect(&a, &b),
            CellBox::from_min_max(Cell3::new(4, 4, 4), Cell3::new(8, 8, 8))
        );
    }

    #[test]
    fn test_intersect_self_identity() {
        let a = CellBox::from_min_max(Cell3::new(-3, 0, 2), Cell3::new(5, 4, 9));
        assert_eq!(CellBox::intersect(&a, &a), a);
    }

    #[test]
    fn test_intersect_disjoint_is_invalid() {
        let a = CellBox::from_min_max(Cell3::new(0, 0, 0), Cell3::new(2, 2, 2));
        let b = CellBox::from_min_max(Cell3::new(10, 0, 0), Cell3::new(12, 2, 2));
        let result = CellBox::intersect(&a, &b);
        assert!(!result.valid);
        assert!(result.is_empty());
    }

    #[test]
    fn test_inverted_box_is_empty() {
        let inverted = CellBox::from_min_max(Cell3::new(4, 4, 4), Cell3::new(1, 1, 1));
        assert!(inverted.is_empty());
        assert!(!inverted.contains(Cell3::new(2, 2, 2)));
    }
}
