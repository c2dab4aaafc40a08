//! # Fixed-Point Transform Quantization
//!
//! **No floating point crosses the wire or the save file.**
//!
//! Placement transforms quantize to Q12 metres and Q10 degrees before
//! they touch deterministic state. Round-trip error is bounded by
//! 2^-12 m for positions and 180/1024 degrees for angles.
//!
//! All math runs in f64 so the result is identical on every host
//! regardless of extended-precision float modes.

use blockforge_core::Vec3;

/// Quantizes a value to signed fixed point with `frac_bits` fractional
/// bits, rounding to nearest and saturating into the i32 range.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn quantize_fixed(value: f32, frac_bits: u32) -> i32 {
    let scale = f64::from(1u32 << frac_bits);
    let scaled = f64::from(value) * scale;
    let clamped = scaled.clamp(f64::from(i32::MIN), f64::from(i32::MAX));
    clamped.round() as i32
}

/// Exact inverse scale of [`quantize_fixed`].
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn dequantize_fixed(value: i32, frac_bits: u32) -> f32 {
    (f64::from(value) / f64::from(1u32 << frac_bits)) as f32
}

/// Quantizes an angle in degrees to Q10 over the half-turn.
///
/// The angle wraps into `(-180, 180]` first, then scales by `1024/180`
/// and saturates into the i16 range.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn quantize_angle_deg_q10(degrees: f32) -> i16 {
    let mut wrapped = f64::from(degrees) % 360.0;
    if wrapped > 180.0 {
        wrapped -= 360.0;
    } else if wrapped <= -180.0 {
        wrapped += 360.0;
    }

    let scaled = wrapped * (1024.0 / 180.0);
    let clamped = scaled.clamp(f64::from(i16::MIN), f64::from(i16::MAX));
    clamped.round() as i16
}

/// Exact inverse scale of [`quantize_angle_deg_q10`].
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn dequantize_angle_deg_q10(quantized: i16) -> f32 {
    (f64::from(quantized) * (180.0 / 1024.0)) as f32
}

/// A placement transform in fixed point: Q12 metric position plus Q10
/// Euler angles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct QuantizedTransform {
    /// Position X, Q12 metres.
    pub tx_q12: i32,
    /// Position Y, Q12 metres.
    pub ty_q12: i32,
    /// Position Z, Q12 metres.
    pub tz_q12: i32,
    /// Yaw, Q10 degrees.
    pub yaw_deg_q10: i16,
    /// Pitch, Q10 degrees.
    pub pitch_deg_q10: i16,
    /// Roll, Q10 degrees.
    pub roll_deg_q10: i16,
}

/// Quantizes a metric position and Euler degrees (pitch = x, yaw = y,
/// roll = z) into one transform.
#[must_use]
pub fn quantize_transform(position_meters: Vec3, euler_degrees: Vec3) -> QuantizedTransform {
    QuantizedTransform {
        tx_q12: quantize_fixed(position_meters.x, 12),
        ty_q12: quantize_fixed(position_meters.y, 12),
        tz_q12: quantize_fixed(position_meters.z, 12),
        yaw_deg_q10: quantize_angle_deg_q10(euler_degrees.y),
        pitch_deg_q10: quantize_angle_deg_q10(euler_degrees.x),
        roll_deg_q10: quantize_angle_deg_q10(euler_degrees.z),
    }
}

/// Recovers the metric position of a transform.
#[must_use]
pub fn dequantize_position(transform: &QuantizedTransform) -> Vec3 {
    Vec3::new(
        dequantize_fixed(transform.tx_q12, 12),
        dequantize_fixed(transform.ty_q12, 12),
        dequantize_fixed(transform.tz_q12, 12),
    )
}

/// Recovers the Euler degrees (pitch, yaw, roll) of a transform.
#[must_use]
pub fn dequantize_euler_degrees(transform: &QuantizedTransform) -> Vec3 {
    Vec3::new(
        dequantize_angle_deg_q10(transform.pitch_deg_q10),
        dequantize_angle_deg_q10(transform.yaw_deg_q10),
        dequantize_angle_deg_q10(transform.roll_deg_q10),
    )
}
