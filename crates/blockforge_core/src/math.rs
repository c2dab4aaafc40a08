//! Float vector math shared with the render-facing layer.
//!
//! World-state logic never stores these; they only appear at the seams
//! where the camera, pipe axes, and static-mesh offsets cross into the
//! deterministic core.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// 3D vector - camera positions, pipe axes, mesh offsets.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component.
    pub x: f32,
    /// Y component.
    pub y: f32,
    /// Z component.
    pub z: f32,
}

impl Vec3 {
    /// Zero vector.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Unit X vector.
    pub const X: Self = Self::new(1.0, 0.0, 0.0);

    /// Unit Y vector.
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);

    /// Unit Z vector.
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    /// Creates a new vector.
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Converts to an array.
    #[must_use]
    pub const fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// Creates from an array.
    #[must_use]
    pub const fn from_array(arr: [f32; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
    }

    /// Dot product.
    #[must_use]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product.
    #[must_use]
    pub fn cross(self, other: Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Length squared (avoids sqrt).
    #[must_use]
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    /// Length.
    #[must_use]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Returns a unit-length copy, or zero if the vector is degenerate.
    #[must_use]
    pub fn normalized(self) -> Self {
        let len = self.length();
        if len <= f32::EPSILON {
            return Self::ZERO;
        }
        Self::new(self.x / len, self.y / len, self.z / len)
    }
}

/// An orthonormal frame built around a grid direction.
///
/// Placement code orients join pieces and pipe caps with this; the
/// frame is fully determined by the forward direction, so equal inputs
/// give bit-equal frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisFrame {
    /// The forward axis.
    pub forward: Vec3,
    /// The right axis.
    pub right: Vec3,
    /// The up axis.
    pub up: Vec3,
}

impl Default for AxisFrame {
    fn default() -> Self {
        Self {
            forward: Vec3::Y,
            right: Vec3::X,
            up: Vec3::Z,
        }
    }
}

/// Builds an orthonormal frame with `forward` along a grid direction.
///
/// Vertical forwards fall back to +Z as the reference up so the frame
/// never degenerates.
#[must_use]
pub fn build_axis_frame(forward: crate::grid::Dir6) -> AxisFrame {
    let forward = forward.unit_vector();
    let fallback_up = if forward.y.abs() > 0.99 { Vec3::Z } else { Vec3::Y };

    let mut right = forward.cross(fallback_up).normalized();
    if right.length_squared() <= 1.0e-6 {
        right = Vec3::X;
    }
    let up = right.cross(forward).normalized();

    AxisFrame { forward, right, up }
}

impl std::ops::Add for Vec3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl std::ops::Mul<f32> for Vec3 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}
