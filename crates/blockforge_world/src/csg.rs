//! Deterministic voxel-space CSG commands for building and carving
//! structures.
//!
//! All containment math is integer (Q8 fixed point for the pipe brush).
//! Commands iterate their clipped bounds in Y, then Z, then X order so
//! edit traces replay identically across runs and hosts.

use blockforge_core::{Cell3, CellBox, Dir6};

use crate::chunk::{Chunk, CHUNK_SIZE};
use crate::voxel::{Voxel, VoxelKind};

/// Affect-mask bit: command may touch empty cells.
pub const AFFECT_EMPTY: u16 = 1 << 0;

/// Affect-mask bit: command may touch solid cells.
pub const AFFECT_SOLID: u16 = 1 << 1;

/// Affect-mask value that touches every cell.
pub const AFFECT_ALL: u16 = 0xFFFF;

/// The shape family of a brush.
#[repr(u8)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BrushKind {
    /// The full axis-aligned box.
    #[default]
    Box = 0,
    /// A square-section prism along `axis`, radius in Q8 cells.
    PrismPipe = 1,
    /// A ramp rising along `axis`; degenerates to the full prism for
    /// vertical axes.
    Ramp = 2,
}

/// A CSG brush: a shape tag plus its axis-aligned bounding cells.
///
/// `min_cell`/`max_cell` are taken unordered; the effective AABB is their
/// componentwise min/max, and an inverted box is simply empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Brush {
    /// Shape family.
    pub kind: BrushKind,
    /// One corner of the AABB (inclusive cell).
    pub min_cell: Cell3,
    /// The opposite corner (exclusive cell).
    pub max_cell: Cell3,
    /// Prism/ramp axis.
    pub axis: Dir6,
    /// Prism cross-section radius as a Q8 fraction of a cell.
    pub radius_q8: u16,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            kind: BrushKind::Box,
            min_cell: Cell3::ZERO,
            max_cell: Cell3::ZERO,
            axis: Dir6::PosY,
            radius_q8: 128,
        }
    }
}

/// The operation a command applies inside its brush.
#[repr(u8)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CsgOp {
    /// Set cells solid and assign the command material.
    #[default]
    AddSolid = 0,
    /// Clear cells to empty and drop their material.
    SubtractSolid = 1,
    /// Recolour already-solid cells; never introduces surfaces.
    PaintMaterial = 2,
}

/// One edit command: operation, brush, material, and affect filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsgCommand {
    /// The operation.
    pub op: CsgOp,
    /// The brush volume.
    pub brush: Brush,
    /// Material id written by `AddSolid` / `PaintMaterial` (0 = none).
    pub material_id: u16,
    /// Which cell states the command may touch.
    pub affect_mask: u16,
}

impl Default for CsgCommand {
    fn default() -> Self {
        Self {
            op: CsgOp::AddSolid,
            brush: Brush::default(),
            material_id: 0,
            affect_mask: AFFECT_ALL,
        }
    }
}

/// One cell of a CSG volume: a voxel plus its 16-bit material id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CsgCell {
    /// The voxel value.
    pub voxel: Voxel,
    /// Material id; 0 means "no material".
    pub material_id: u16,
}

/// Dense axis-aligned grid of [`CsgCell`]s with a world origin.
///
/// Out-of-bounds world cells read as default cells and writes to them
/// are silently ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsgVolume {
    origin: Cell3,
    size_x: i32,
    size_y: i32,
    size_z: i32,
    cells: Vec<CsgCell>,
}

impl CsgVolume {
    /// Creates a volume of the given extents at a world origin.
    ///
    /// Negative extents clamp to zero, producing an invalid volume.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn new(size_x: i32, size_y: i32, size_z: i32, origin: Cell3) -> Self {
        let size_x = size_x.max(0);
        let size_y = size_y.max(0);
        let size_z = size_z.max(0);
        Self {
            origin,
            size_x,
            size_y,
            size_z,
            cells: vec![CsgCell::default(); (size_x as usize) * (size_y as usize) * (size_z as usize)],
        }
    }

    /// Returns true if the volume has positive extent on every axis.
    #[inline]
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.size_x > 0 && self.size_y > 0 && self.size_z > 0
    }

    /// Returns the world origin cell.
    #[inline]
    #[must_use]
    pub const fn origin(&self) -> Cell3 {
        self.origin
    }

    /// Returns the world-cell bounds, or an invalid box for an invalid
    /// volume.
    #[must_use]
    pub const fn world_bounds(&self) -> CellBox {
        if !self.is_valid() {
            return CellBox::INVALID;
        }
        CellBox::from_min_max(
            self.origin,
            Cell3::new(
                self.origin.x + self.size_x,
                self.origin.y + self.size_y,
                self.origin.z + self.size_z,
            ),
        )
    }

    /// Returns true if `world_cell` lies inside the volume.
    #[inline]
    #[must_use]
    pub fn contains_world_cell(&self, world_cell: Cell3) -> bool {
        self.world_bounds().contains(world_cell)
    }

    #[inline]
    #[allow(clippy::cast_sign_loss)]
    fn linear_index_from_world(&self, world_cell: Cell3) -> usize {
        let local = world_cell - self.origin;
        (local.x + self.size_x * (local.z + self.size_z * local.y)) as usize
    }

    /// Reads the cell at a world position; out of bounds reads default.
    #[inline]
    #[must_use]
    pub fn cell_at_world(&self, world_cell: Cell3) -> CsgCell {
        if !self.contains_world_cell(world_cell) {
            return CsgCell::default();
        }
        self.cells[self.linear_index_from_world(world_cell)]
    }

    /// Writes the cell at a world position; out of bounds is ignored.
    #[inline]
    pub fn set_cell_at_world(&mut self, world_cell: Cell3, cell: CsgCell) {
        if !self.contains_world_cell(world_cell) {
            return;
        }
        let index = self.linear_index_from_world(world_cell);
        self.cells[index] = cell;
    }

    /// Returns the raw cells in storage order.
    #[inline]
    #[must_use]
    pub fn cells(&self) -> &[CsgCell] {
        &self.cells
    }

    /// Counts solid cells; test and diagnostics helper.
    #[must_use]
    pub fn solid_cell_count(&self) -> usize {
        self.cells.iter().filter(|c| c.voxel.is_solid()).count()
    }
}

/// Returns the ordered AABB of a brush; an inverted box yields an
/// invalid (empty) result.
#[must_use]
pub fn brush_bounds(brush: &Brush) -> CellBox {
    let min_cell = Cell3::new(
        brush.min_cell.x.min(brush.max_cell.x),
        brush.min_cell.y.min(brush.max_cell.y),
        brush.min_cell.z.min(brush.max_cell.z),
    );
    let max_cell = Cell3::new(
        brush.min_cell.x.max(brush.max_cell.x),
        brush.min_cell.y.max(brush.max_cell.y),
        brush.min_cell.z.max(brush.max_cell.z),
    );

    if max_cell.x <= min_cell.x || max_cell.y <= min_cell.y || max_cell.z <= min_cell.z {
        return CellBox::INVALID;
    }
    CellBox::from_min_max(min_cell, max_cell)
}

fn prism_pipe_contains(brush: &Brush, bounds: &CellBox, cell: Cell3) -> bool {
    if !bounds.contains(cell) {
        return false;
    }

    // Cell centres in Q8; the bounds centre doubles to stay integer.
    let radius_q8 = i32::from(brush.radius_q8).max(1);
    let cell_x_q8 = cell.x * 256 + 128;
    let cell_y_q8 = cell.y * 256 + 128;
    let cell_z_q8 = cell.z * 256 + 128;
    let center_x_q8 = (bounds.min_inclusive.x + bounds.max_exclusive.x) * 128;
    let center_y_q8 = (bounds.min_inclusive.y + bounds.max_exclusive.y) * 128;
    let center_z_q8 = (bounds.min_inclusive.z + bounds.max_exclusive.z) * 128;

    // Chebyshev distance on the two cross-axis components.
    match brush.axis {
        Dir6::PosX | Dir6::NegX => {
            (cell_y_q8 - center_y_q8).abs().max((cell_z_q8 - center_z_q8).abs()) <= radius_q8
        }
        Dir6::PosY | Dir6::NegY => {
            (cell_x_q8 - center_x_q8).abs().max((cell_z_q8 - center_z_q8).abs()) <= radius_q8
        }
        Dir6::PosZ | Dir6::NegZ => {
            (cell_x_q8 - center_x_q8).abs().max((cell_y_q8 - center_y_q8).abs()) <= radius_q8
        }
    }
}

fn ramp_contains(brush: &Brush, bounds: &CellBox, cell: Cell3) -> bool {
    if !bounds.contains(cell) {
        return false;
    }

    let height = bounds.max_exclusive.y - bounds.min_inclusive.y;
    if height <= 0 {
        return false;
    }

    // Ceiling rise: the final step reaches full height.
    let rise_for_step = |step: i32, run_length: i32| -> i32 {
        if run_length <= 0 {
            return 0;
        }
        let numerator = (step + 1) * height;
        (numerator + run_length - 1) / run_length
    };

    match brush.axis {
        Dir6::PosX | Dir6::NegX => {
            let run_length = bounds.max_exclusive.x - bounds.min_inclusive.x;
            if run_length <= 0 {
                return false;
            }
            let step = if brush.axis == Dir6::PosX {
                cell.x - bounds.min_inclusive.x
            } else {
                (bounds.max_exclusive.x - 1) - cell.x
            };
            let rise = rise_for_step(step, run_length).clamp(0, height);
            cell.y < bounds.min_inclusive.y + rise
        }
        Dir6::PosZ | Dir6::NegZ => {
            let run_length = bounds.max_exclusive.z - bounds.min_inclusive.z;
            if run_length <= 0 {
                return false;
            }
            let step = if brush.axis == Dir6::PosZ {
                cell.z - bounds.min_inclusive.z
            } else {
                (bounds.max_exclusive.z - 1) - cell.z
            };
            let rise = rise_for_step(step, run_length).clamp(0, height);
            cell.y < bounds.min_inclusive.y + rise
        }
        // A vertical ramp is the full prism.
        Dir6::PosY | Dir6::NegY => true,
    }
}

fn brush_contains(brush: &Brush, bounds: &CellBox, cell: Cell3) -> bool {
    match brush.kind {
        BrushKind::Box => bounds.contains(cell),
        BrushKind::PrismPipe => prism_pipe_contains(brush, bounds, cell),
        BrushKind::Ramp => ramp_contains(brush, bounds, cell),
    }
}

fn affect_mask_allows(current: &CsgCell, affect_mask: u16) -> bool {
    if affect_mask == AFFECT_ALL {
        return true;
    }
    if current.voxel.is_solid() {
        affect_mask & AFFECT_SOLID != 0
    } else {
        affect_mask & AFFECT_EMPTY != 0
    }
}

/// Applies one command to a volume.
///
/// Returns the exact box of world cells actually mutated; an invalid box
/// means the command was a complete no-op (degenerate brush, disjoint
/// bounds, or no cell changed).
pub fn apply_csg_command(volume: &mut CsgVolume, command: &CsgCommand) -> CellBox {
    let mut touched = CellBox::INVALID;
    if !volume.is_valid() {
        return touched;
    }

    let bounds = CellBox::intersect(&volume.world_bounds(), &brush_bounds(&command.brush));
    if !bounds.valid || bounds.is_empty() {
        return touched;
    }

    for y in bounds.min_inclusive.y..bounds.max_exclusive.y {
        for z in bounds.min_inclusive.z..bounds.max_exclusive.z {
            for x in bounds.min_inclusive.x..bounds.max_exclusive.x {
                let world_cell = Cell3::new(x, y, z);
                if !brush_contains(&command.brush, &bounds, world_cell) {
                    continue;
                }

                let mut current = volume.cell_at_world(world_cell);
                if !affect_mask_allows(&current, command.affect_mask) {
                    continue;
                }

                let mut changed = false;
                match command.op {
                    CsgOp::AddSolid => {
                        if current.voxel.kind != VoxelKind::Stone {
                            current.voxel = Voxel::new(VoxelKind::Stone);
                            changed = true;
                        }
                        if current.material_id != command.material_id {
                            current.material_id = command.material_id;
                            changed = true;
                        }
                    }
                    CsgOp::SubtractSolid => {
                        if current.voxel.is_solid() {
                            current.voxel = Voxel::EMPTY;
                            changed = true;
                        }
                        if current.material_id != 0 {
                            current.material_id = 0;
                            changed = true;
                        }
                    }
                    CsgOp::PaintMaterial => {
                        // Paint only recolours already-solid cells.
                        if current.voxel.is_solid() && current.material_id != command.material_id {
                            current.material_id = command.material_id;
                            changed = true;
                        }
                    }
                }

                if !changed {
                    continue;
                }
                volume.set_cell_at_world(world_cell, current);
                touched.include_cell(world_cell);
            }
        }
    }

    touched
}

/// Applies a command sequence left to right, returning the union of the
/// per-command dirty boxes.
pub fn apply_csg_commands(volume: &mut CsgVolume, commands: &[CsgCommand]) -> CellBox {
    let mut touched = CellBox::INVALID;
    for command in commands {
        let dirty = apply_csg_command(volume, command);
        touched.include_box(&dirty);
    }
    touched
}

/// Copies the solid state of a volume into the overlapping region of a
/// chunk, diffing per cell.
///
/// Returns the world box of cells whose voxel actually changed.
pub fn copy_volume_solids_to_chunk(volume: &CsgVolume, chunk: &mut Chunk) -> CellBox {
    let mut touched = CellBox::INVALID;
    if !volume.is_valid() {
        return touched;
    }

    let chunk_origin = chunk.world_origin();
    let chunk_bounds = CellBox::from_min_max(
        chunk_origin,
        chunk_origin + Cell3::new(CHUNK_SIZE, CHUNK_SIZE, CHUNK_SIZE),
    );

    let overlap = CellBox::intersect(&volume.world_bounds(), &chunk_bounds);
    if !overlap.valid || overlap.is_empty() {
        return touched;
    }

    for y in overlap.min_inclusive.y..overlap.max_exclusive.y {
        for z in overlap.min_inclusive.z..overlap.max_exclusive.z {
            for x in overlap.min_inclusive.x..overlap.max_exclusive.x {
                let world_cell = Cell3::new(x, y, z);
                let source = volume.cell_at_world(world_cell);
                let local = world_cell - chunk_origin;

                let existing = chunk.voxel_at(local.x, local.y, local.z);
                if existing.kind == source.voxel.kind {
                    continue;
                }

                chunk.set_voxel(local.x, local.y, local.z, source.voxel);
                touched.include_cell(world_cell);
            }
        }
    }

    touched
}
