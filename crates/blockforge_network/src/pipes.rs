//! Pipe endpoint geometry: rendered radii and end-cap extension.
//!
//! When a pipe meets a perpendicular neighbour, its end cap extends into
//! the shared cell just far enough to meet the neighbour's wall; two
//! colinear pipes butt flush and never extend.

use std::collections::HashMap;

use blockforge_core::{Cell3, Dir6, Vec3};

use crate::topology::neighbor_mask_6;

/// Fraction of a neighbour's rendered radius that blocks extension.
pub const PIPE_TRANSFER_HALF_EXTENT: f32 = 0.58;

/// Minimum rendered pipe radius in cells.
pub const PIPE_MIN_RADIUS: f32 = 0.02;

/// Maximum rendered pipe radius in cells.
pub const PIPE_MAX_RADIUS: f32 = 0.5;

/// Radius boost applied when any off-axis neighbour exists.
pub const PIPE_BRANCH_RADIUS_BOOST: f32 = 0.05;

/// Upper bound on end-cap extension in cells.
pub const PIPE_MAX_END_EXTENSION: f32 = 0.49;

/// Rendered belt radius; belts never extend.
pub const BELT_RADIUS: f32 = 0.49;

/// Rendered track radius; tracks never extend.
pub const TRACK_RADIUS: f32 = 0.38;

/// One placed pipe segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pipe {
    /// The cell the segment occupies.
    pub cell: Cell3,
    /// The segment's axis; snapped to its dominant direction.
    pub axis: Vec3,
    /// Base radius before clamping and branch boost.
    pub radius: f32,
}

/// Derived per-pipe rendering state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipeEndpointState {
    /// The snapped axis as a unit vector.
    pub axis: Vec3,
    /// Radius after clamping and branch boost.
    pub rendered_radius: f32,
    /// Extension of the endpoint facing opposite the axis.
    pub start_extension: f32,
    /// Extension of the endpoint facing along the axis.
    pub end_extension: f32,
}

impl Default for PipeEndpointState {
    fn default() -> Self {
        Self {
            axis: Vec3::Y,
            rendered_radius: 0.45,
            start_extension: 0.0,
            end_extension: 0.0,
        }
    }
}

/// Snaps an arbitrary axis vector to its dominant direction.
///
/// Degenerate vectors snap to +Y.
#[must_use]
pub fn dominant_axis_dir6(direction: Vec3) -> Dir6 {
    if direction.length_squared() <= 1.0e-6 {
        return Dir6::PosY;
    }
    let normalized = direction.normalized();
    let abs_x = normalized.x.abs();
    let abs_y = normalized.y.abs();
    let abs_z = normalized.z.abs();
    if abs_x >= abs_y && abs_x >= abs_z {
        return if normalized.x >= 0.0 { Dir6::PosX } else { Dir6::NegX };
    }
    if abs_y >= abs_x && abs_y >= abs_z {
        return if normalized.y >= 0.0 { Dir6::PosY } else { Dir6::NegY };
    }
    if normalized.z >= 0.0 {
        Dir6::PosZ
    } else {
        Dir6::NegZ
    }
}

/// Clamps a base radius into the rendered range and applies the branch
/// boost.
#[must_use]
pub fn compute_rendered_pipe_radius(base_radius: f32, has_branch_connection: bool) -> f32 {
    let mut rendered = base_radius.clamp(PIPE_MIN_RADIUS, PIPE_MAX_RADIUS);
    if has_branch_connection {
        rendered = (rendered + PIPE_BRANCH_RADIUS_BOOST).min(PIPE_MAX_RADIUS);
    }
    rendered
}

/// Packs a cell into a 63-bit key, 21 bits per component.
#[inline]
#[must_use]
#[allow(clippy::cast_sign_loss)]
fn pipe_cell_key(cell: Cell3) -> u64 {
    const MASK: u64 = (1 << 21) - 1;
    let x = u64::from(cell.x as u32) & MASK;
    let y = u64::from(cell.y as u32) & MASK;
    let z = u64::from(cell.z as u32) & MASK;
    x | (y << 21) | (z << 42)
}

/// Computes the endpoint state of every pipe in one pass.
///
/// Output order matches input order; index `i` describes `pipes[i]`.
#[must_use]
pub fn build_pipe_endpoint_states(pipes: &[Pipe]) -> Vec<PipeEndpointState> {
    let mut cell_to_index: HashMap<u64, usize> = HashMap::with_capacity(pipes.len() * 2);
    for (i, pipe) in pipes.iter().enumerate() {
        cell_to_index.insert(pipe_cell_key(pipe.cell), i);
    }
    let mut axis_directions = vec![Dir6::PosY; pipes.len()];
    let mut rendered_radii = vec![0.45f32; pipes.len()];
    for (i, pipe) in pipes.iter().enumerate() {
        let axis_dir = dominant_axis_dir6(pipe.axis);
        let start_dir = axis_dir.opposite();
        let end_dir = axis_dir;

        let neighbor_mask = neighbor_mask_6(pipe.cell, |cell| {
            cell_to_index.contains_key(&pipe_cell_key(cell))
        });
        let axial_mask = start_dir.bit() | end_dir.bit();
        let has_branch_connection = neighbor_mask & (!axial_mask & 0x3F) != 0;

        axis_directions[i] = axis_dir;
        rendered_radii[i] = compute_rendered_pipe_radius(pipe.radius, has_branch_connection);
    }

    let end_extension_for_direction = |pipe_index: usize, cell: Cell3, end_direction: Dir6| {
        let Some(&neighbor_index) = cell_to_index.get(&pipe_cell_key(cell.neighbor(end_direction)))
        else {
            return 0.0;
        };

        // Colinear runs butt flush.
        if Dir6::shares_axis(axis_directions[pipe_index], axis_directions[neighbor_index]) {
            return 0.0;
        }

        let neighbor_half_extent = PIPE_TRANSFER_HALF_EXTENT * rendered_radii[neighbor_index];
        (0.5 - neighbor_half_extent).clamp(0.0, PIPE_MAX_END_EXTENSION)
    };

    let mut states = vec![PipeEndpointState::default(); pipes.len()];
    for (i, pipe) in pipes.iter().enumerate() {
        let axis_dir = axis_directions[i];
        states[i].axis = axis_dir.unit_vector();
        states[i].rendered_radius = rendered_radii[i];
        states[i].start_extension =
            end_extension_for_direction(i, pipe.cell, axis_dir.opposite());
        states[i].end_extension = end_extension_for_direction(i, pipe.cell, axis_dir);
    }

    states
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pipe_at(x: i32, y: i32, z: i32, axis: Vec3) -> Pipe {
        Pipe {
            cell: Cell3::new(x, y, z),
            axis,
            radius: 0.3,
        }
    }

    #[test]
    fn test_dominant_axis_snapping() {
        assert_eq!(dominant_axis_dir6(Vec3::new(0.9, 0.1, 0.0)), Dir6::PosX);
        assert_eq!(dominant_axis_dir6(Vec3::new(-0.9, 0.1, 0.0)), Dir6::NegX);
        assert_eq!(dominant_axis_dir6(Vec3::new(0.0, 0.0, -2.0)), Dir6::NegZ);
        assert_eq!(dominant_axis_dir6(Vec3::ZERO), Dir6::PosY);
    }

    #[test]
    fn test_rendered_radius_clamps_and_boosts() {
        assert_eq!(compute_rendered_pipe_radius(0.001, false), PIPE_MIN_RADIUS);
        assert_eq!(compute_rendered_pipe_radius(2.0, false), PIPE_MAX_RADIUS);
        assert!(
            (compute_rendered_pipe_radius(0.3, true) - 0.35).abs() < 1.0e-6,
            "branch boost applies"
        );
        // Boost never exceeds the max radius.
        assert_eq!(compute_rendered_pipe_radius(0.49, true), PIPE_MAX_RADIUS);
    }

    #[test]
    fn test_isolated_pipe_has_no_extension() {
        let states = build_pipe_endpoint_states(&[pipe_at(0, 0, 0, Vec3::X)]);
        assert_eq!(states.len(), 1);
        assert_eq!(states[0].start_extension, 0.0);
        assert_eq!(states[0].end_extension, 0.0);
        assert_eq!(states[0].axis, Vec3::X);
    }

    #[test]
    fn test_colinear_neighbors_do_not_extend() {
        let pipes = [
            pipe_at(0, 0, 0, Vec3::X),
            pipe_at(1, 0, 0, Vec3::X),
        ];
        let states = build_pipe_endpoint_states(&pipes);
        assert_eq!(states[0].end_extension, 0.0);
        assert_eq!(states[1].start_extension, 0.0);
    }

    #[test]
    fn test_perpendicular_neighbor_extends_endpoint() {
        let pipes = [
            pipe_at(0, 0, 0, Vec3::X),
            pipe_at(1, 0, 0, Vec3::Y),
        ];
        let states = build_pipe_endpoint_states(&pipes);

        // The Y neighbour sees an off-axis connection and boosts:
        // rendered = 0.3 + 0.05 = 0.35.
        let expected_neighbor_radius = 0.35;
        assert!((states[1].rendered_radius - expected_neighbor_radius).abs() < 1.0e-6);

        // The X pipe's +X endpoint extends to meet the neighbour wall.
        let expected =
            (0.5 - PIPE_TRANSFER_HALF_EXTENT * expected_neighbor_radius).clamp(0.0, PIPE_MAX_END_EXTENSION);
        assert!((states[0].end_extension - expected).abs() < 1.0e-6);
        assert_eq!(states[0].start_extension, 0.0);
    }

    #[test]
    fn test_output_order_matches_input() {
        let pipes = [
            pipe_at(5, 5, 5, Vec3::Z),
            pipe_at(9, 9, 9, Vec3::X),
        ];
        let states = build_pipe_endpoint_states(&pipes);
        assert_eq!(states[0].axis, Vec3::Z);
        assert_eq!(states[1].axis, Vec3::X);
    }

    #[test]
    fn test_negative_cells_key_uniquely() {
        let pipes = [
            pipe_at(-1, 0, 0, Vec3::X),
            pipe_at(0, 0, 0, Vec3::Y),
        ];
        let states = build_pipe_endpoint_states(&pipes);
        // The -X pipe's +X endpoint faces the perpendicular neighbour.
        assert!(states[0].end_extension > 0.0);
    }
}
