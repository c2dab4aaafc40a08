//! Six-neighbourhood topology: occupancy masks, join-piece
//! classification, and span rasterization.

use blockforge_core::{Cell3, Dir6, ALL_DIRS};

use crate::graph::EdgeSpan;

/// Builds the 6-bit occupancy mask of a cell's neighbourhood.
///
/// Bit `i` is set when `is_occupied` reports the neighbour along the
/// direction with index `i`.
pub fn neighbor_mask_6<F>(cell: Cell3, mut is_occupied: F) -> u8
where
    F: FnMut(Cell3) -> bool,
{
    let mut mask = 0u8;
    for dir in ALL_DIRS {
        if is_occupied(cell.neighbor(dir)) {
            mask |= dir.bit();
        }
    }
    mask
}

/// Counts set directions in a neighbour mask.
#[inline]
#[must_use]
pub const fn connection_count(neighbor_mask: u8) -> u32 {
    (neighbor_mask & 0x3F).count_ones()
}

/// Topological classification of a six-neighbour connection pattern,
/// used to pick the visual join mesh.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinPiece {
    /// No connections.
    Isolated = 0,
    /// One connection.
    EndCap = 1,
    /// Two opposite connections.
    Straight = 2,
    /// Two perpendicular connections.
    Elbow = 3,
    /// Three connections.
    Tee = 4,
    /// Four or more connections.
    Cross = 5,
}

/// Classifies a neighbour mask into its join piece.
#[must_use]
pub fn classify_join_piece(neighbor_mask: u8) -> JoinPiece {
    let mask = neighbor_mask & 0x3F;
    let degree = connection_count(mask);
    match degree {
        0 => JoinPiece::Isolated,
        1 => JoinPiece::EndCap,
        2 => {
            let mut first = Dir6::PosX;
            let mut second = Dir6::PosX;
            let mut found = 0;
            for dir in ALL_DIRS {
                if mask & dir.bit() == 0 {
                    continue;
                }
                if found == 0 {
                    first = dir;
                } else {
                    second = dir;
                }
                found += 1;
            }
            if Dir6::are_opposite(first, second) {
                JoinPiece::Straight
            } else {
                JoinPiece::Elbow
            }
        }
        3 => JoinPiece::Tee,
        _ => JoinPiece::Cross,
    }
}

/// Produces the cells a span occupies: exactly `length_voxels` cells
/// starting at `start` stepping along `dir`.
///
/// Invalid (zero-length) spans rasterize to nothing.
#[must_use]
pub fn rasterize_span(span: &EdgeSpan) -> Vec<Cell3> {
    if !span.is_valid() {
        return Vec::new();
    }

    let mut cells = Vec::with_capacity(usize::from(span.length_voxels));
    let step = span.dir.offset();
    let mut cursor = span.start;
    for _ in 0..span.length_voxels {
        cells.push(cursor);
        cursor += step;
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbor_mask_reports_directions() {
        let pivot = Cell3::new(4, 4, 4);
        let mask = neighbor_mask_6(pivot, |cell| {
            cell == pivot.neighbor(Dir6::PosX) || cell == pivot.neighbor(Dir6::NegY)
        });

        assert_ne!(mask & Dir6::PosX.bit(), 0);
        assert_ne!(mask & Dir6::NegY.bit(), 0);
        assert_eq!(connection_count(mask), 2);
    }

    #[test]
    fn test_join_classification_table() {
        assert_eq!(classify_join_piece(0), JoinPiece::Isolated);
        assert_eq!(classify_join_piece(Dir6::PosX.bit()), JoinPiece::EndCap);
        assert_eq!(
            classify_join_piece(Dir6::PosX.bit() | Dir6::NegX.bit()),
            JoinPiece::Straight
        );
        assert_eq!(
            classify_join_piece(Dir6::PosX.bit() | Dir6::PosZ.bit()),
            JoinPiece::Elbow
        );
        assert_eq!(
            classify_join_piece(Dir6::PosX.bit() | Dir6::NegX.bit() | Dir6::PosZ.bit()),
            JoinPiece::Tee
        );
        assert_eq!(
            classify_join_piece(
                Dir6::PosX.bit() | Dir6::NegX.bit() | Dir6::PosZ.bit() | Dir6::NegZ.bit()
            ),
            JoinPiece::Cross
        );
        assert_eq!(classify_join_piece(0x3F), JoinPiece::Cross);
    }

    #[test]
    fn test_high_bits_ignored() {
        assert_eq!(classify_join_piece(0xC0), JoinPiece::Isolated);
    }

    #[test]
    fn test_rasterize_span() {
        let span = EdgeSpan {
            start: Cell3::new(1, 1, 0),
            dir: Dir6::PosX,
            length_voxels: 3,
        };
        let cells = rasterize_span(&span);
        assert_eq!(cells.len(), 3);
        assert_eq!(cells[0], Cell3::new(1, 1, 0));
        assert_eq!(cells[2], Cell3::new(3, 1, 0));
    }

    #[test]
    fn test_rasterize_invalid_span_is_empty() {
        let span = EdgeSpan {
            start: Cell3::ZERO,
            dir: Dir6::PosY,
            length_voxels: 0,
        };
        assert!(rasterize_span(&span).is_empty());
    }
}
