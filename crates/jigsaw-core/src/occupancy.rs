//! Nearest-free-cell search.
//!
//! When a piece is released on the board it snaps to the nearest cell that is
//! not already occupied by another piece. The search first checks the desired
//! cell, then expands outward in square rings of growing Chebyshev radius,
//! testing only the boundary of each ring.

use crate::{BoardGeometry, Cell, Point};

/// A view of which cells are currently taken.
pub trait Occupancy {
    /// Returns `true` if `cell` is occupied.
    fn is_occupied(&self, cell: Cell) -> bool;
}

impl<F> Occupancy for F
where
    F: Fn(Cell) -> bool,
{
    fn is_occupied(&self, cell: Cell) -> bool {
        self(cell)
    }
}

/// Occupancy derived from the current positions of other pieces.
///
/// A cell is occupied if any of the positions lies within
/// [`BoardGeometry::epsilon`] of its center. The caller is responsible for
/// leaving out the piece being placed.
#[derive(Debug, Clone, Copy)]
pub struct PositionOccupancy<'a> {
    board: &'a BoardGeometry,
    positions: &'a [Point],
}

impl<'a> PositionOccupancy<'a> {
    /// Creates an occupancy view over `positions`.
    #[must_use]
    pub fn new(board: &'a BoardGeometry, positions: &'a [Point]) -> Self {
        Self { board, positions }
    }
}

impl Occupancy for PositionOccupancy<'_> {
    fn is_occupied(&self, cell: Cell) -> bool {
        let center = self.board.center_of(cell);
        let epsilon = self.board.epsilon();
        self.positions.iter().any(|p| p.is_near(center, epsilon))
    }
}

/// Returns the free cell nearest to `desired`.
///
/// Rings of radius `1..grid_size` around `desired` are scanned with `dy`
/// ascending in the outer loop and `dx` ascending in the inner loop. Within the
/// first ring that contains a free cell, the one with the smallest squared
/// distance wins, earlier cells winning ties.
///
/// If every cell is occupied, `desired` is returned unchanged.
///
/// # Example
///
/// ```
/// use jigsaw_core::{BoardGeometry, Cell, GridSize, nearest_free_cell};
///
/// let board = BoardGeometry::new(300.0, GridSize::new(3).unwrap());
/// let taken = [Cell::new(1, 1), Cell::new(1, 0)];
/// let cell = nearest_free_cell(&board, Cell::new(1, 1), &|c: Cell| taken.contains(&c));
/// assert_eq!(cell, Cell::new(0, 1));
/// ```
#[must_use]
pub fn nearest_free_cell<O>(board: &BoardGeometry, desired: Cell, occupancy: &O) -> Cell
where
    O: Occupancy + ?Sized,
{
    if !occupancy.is_occupied(desired) {
        return desired;
    }

    let grid_size = board.grid_size();
    let origin_col = i32::from(desired.col);
    let origin_row = i32::from(desired.row);

    for radius in 1..i32::from(grid_size.get()) {
        let mut best: Option<(i32, Cell)> = None;
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx.abs() != radius && dy.abs() != radius {
                    continue;
                }
                let (col, row) = (origin_col + dx, origin_row + dy);
                if !grid_size.contains(col, row) {
                    continue;
                }
                let (Ok(col), Ok(row)) = (u8::try_from(col), u8::try_from(row)) else {
                    continue;
                };
                let cell = Cell::new(col, row);
                if occupancy.is_occupied(cell) {
                    continue;
                }
                let dist_sq = dx * dx + dy * dy;
                if best.is_none_or(|(best_dist_sq, _)| dist_sq < best_dist_sq) {
                    best = Some((dist_sq, cell));
                }
            }
        }
        if let Some((_, cell)) = best {
            return cell;
        }
    }

    desired
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use proptest::prelude::*;

    use super::*;
    use crate::GridSize;

    fn board(n: u8) -> BoardGeometry {
        BoardGeometry::new(f64::from(n) * 100.0, GridSize::new(n).unwrap())
    }

    fn taken(cells: &HashSet<Cell>) -> impl Fn(Cell) -> bool + '_ {
        move |cell| cells.contains(&cell)
    }

    #[test]
    fn test_free_desired_cell_is_returned() {
        let board = board(3);
        let occupied = HashSet::from([Cell::new(0, 0)]);
        assert_eq!(
            nearest_free_cell(&board, Cell::new(1, 1), &taken(&occupied)),
            Cell::new(1, 1)
        );
    }

    #[test]
    fn test_orthogonal_neighbor_beats_diagonal() {
        let board = board(3);
        let occupied = HashSet::from([Cell::new(1, 1), Cell::new(1, 0)]);
        // (0,0) is scanned first but is diagonal; (0,1) is the first orthogonal.
        assert_eq!(
            nearest_free_cell(&board, Cell::new(1, 1), &taken(&occupied)),
            Cell::new(0, 1)
        );
    }

    #[test]
    fn test_ties_resolve_in_scan_order() {
        let board = board(3);
        // Only diagonals remain free: (0,0) comes first with dy = -1, dx = -1.
        let occupied = HashSet::from([
            Cell::new(1, 1),
            Cell::new(1, 0),
            Cell::new(0, 1),
            Cell::new(2, 1),
            Cell::new(1, 2),
        ]);
        assert_eq!(
            nearest_free_cell(&board, Cell::new(1, 1), &taken(&occupied)),
            Cell::new(0, 0)
        );
    }

    #[test]
    fn test_inner_ring_wins_over_outer_ring() {
        let board = board(6);
        let mut occupied: HashSet<_> = board.grid_size().cells().collect();
        // Free a diagonal of ring 1 and an orthogonal cell of ring 2.
        occupied.remove(&Cell::new(3, 3));
        occupied.remove(&Cell::new(2, 0));
        assert_eq!(
            nearest_free_cell(&board, Cell::new(2, 2), &taken(&occupied)),
            Cell::new(3, 3)
        );
    }

    #[test]
    fn test_search_reaches_far_corner() {
        let board = board(4);
        let mut occupied: HashSet<_> = board.grid_size().cells().collect();
        occupied.remove(&Cell::new(3, 3));
        assert_eq!(
            nearest_free_cell(&board, Cell::new(0, 0), &taken(&occupied)),
            Cell::new(3, 3)
        );
    }

    #[test]
    fn test_full_board_returns_desired() {
        let board = board(3);
        let occupied: HashSet<_> = board.grid_size().cells().collect();
        assert_eq!(
            nearest_free_cell(&board, Cell::new(2, 1), &taken(&occupied)),
            Cell::new(2, 1)
        );
    }

    #[test]
    fn test_single_free_cell_is_always_found() {
        for n in [3, 4, 6] {
            let board = board(n);
            for free in board.grid_size().cells() {
                let occupied: HashSet<_> =
                    board.grid_size().cells().filter(|c| *c != free).collect();
                for desired in board.grid_size().cells() {
                    assert_eq!(
                        nearest_free_cell(&board, desired, &taken(&occupied)),
                        free,
                        "grid {n}, desired {desired}, free {free}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_position_occupancy_uses_epsilon() {
        let board = board(3);
        let positions = [Point::new(150.5, 150.0), Point::new(52.0, 50.0)];
        let occupancy = PositionOccupancy::new(&board, &positions);
        // Within 1.0 of the center.
        assert!(occupancy.is_occupied(Cell::new(1, 1)));
        // 2.0 away from the center is not coincident.
        assert!(!occupancy.is_occupied(Cell::new(0, 0)));
        assert!(!occupancy.is_occupied(Cell::new(2, 2)));
    }

    #[test]
    fn test_position_occupancy_snap_to_neighbor() {
        let board = board(3);
        let positions = [board.center_of(Cell::new(1, 1))];
        let occupancy = PositionOccupancy::new(&board, &positions);
        assert_eq!(
            nearest_free_cell(&board, Cell::new(1, 1), &occupancy),
            Cell::new(1, 0)
        );
    }

    fn occupancy_strategy() -> impl Strategy<Value = (u8, Vec<bool>, u16)> {
        prop_oneof![Just(3u8), Just(4u8), Just(6u8)].prop_flat_map(|n| {
            let count = usize::from(n) * usize::from(n);
            (
                Just(n),
                proptest::collection::vec(any::<bool>(), count),
                0..u16::try_from(count).unwrap(),
            )
        })
    }

    proptest! {
        #[test]
        fn never_returns_occupied_cell_when_one_is_free((n, mask, desired) in occupancy_strategy()) {
            let board = board(n);
            let occupied: HashSet<_> = board
                .grid_size()
                .cells()
                .zip(&mask)
                .filter_map(|(cell, taken)| taken.then_some(cell))
                .collect();
            let desired = board.cell_at_index(usize::from(desired)).unwrap();
            let result = nearest_free_cell(&board, desired, &taken(&occupied));

            if occupied.len() < board.grid_size().cell_count() {
                prop_assert!(!occupied.contains(&result));
                // No free cell is strictly closer in Chebyshev distance.
                let ring = |c: Cell| {
                    (i32::from(c.col) - i32::from(desired.col))
                        .abs()
                        .max((i32::from(c.row) - i32::from(desired.row)).abs())
                };
                let nearest_ring = board
                    .grid_size()
                    .cells()
                    .filter(|c| !occupied.contains(c))
                    .map(ring)
                    .min()
                    .unwrap();
                prop_assert_eq!(ring(result), nearest_ring);
            } else {
                prop_assert_eq!(result, desired);
            }
        }
    }
}
