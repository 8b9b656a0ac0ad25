use jigsaw_core::{BoardGeometry, Point, Translation};
use rand::{Rng as _, SeedableRng as _, seq::SliceRandom as _};
use rand_pcg::Pcg64;

use crate::LayoutSeed;

/// Default maximum jitter per axis, as a fraction of the cell side.
pub const DEFAULT_JITTER_FACTOR: f64 = 0.20;

/// Default distance under which a piece counts as starting solved, as a
/// fraction of the cell side.
pub const DEFAULT_PRESOLVED_FACTOR: f64 = 0.30;

/// Tuning knobs for [`LayoutGenerator`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    /// Maximum random offset applied to each cell center, per axis.
    pub jitter_factor: f64,
    /// Pieces starting closer than this to their own target are swapped away.
    pub presolved_factor: f64,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            jitter_factor: DEFAULT_JITTER_FACTOR,
            presolved_factor: DEFAULT_PRESOLVED_FACTOR,
        }
    }
}

/// Initial piece positions for one session.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedLayout {
    /// Initial center of each piece, indexed by the piece's row-major index.
    pub positions: Vec<Point>,
    /// Seed the layout was generated from.
    pub seed: LayoutSeed,
}

impl GeneratedLayout {
    /// Returns how many pieces start closer than `presolved_factor` cell sides
    /// to their own target.
    #[must_use]
    pub fn presolved_count(&self, board: &BoardGeometry, presolved_factor: f64) -> usize {
        let threshold = board.cell_side() * presolved_factor;
        (0..self.positions.len())
            .filter(|&index| is_presolved(board, &self.positions, index, threshold))
            .count()
    }
}

/// Generates scrambled initial layouts.
#[derive(Debug, Clone, Default)]
pub struct LayoutGenerator {
    params: LayoutParams,
}

impl LayoutGenerator {
    /// Creates a generator with the given parameters.
    #[must_use]
    pub fn new(params: LayoutParams) -> Self {
        Self { params }
    }

    /// Returns the generator parameters.
    #[must_use]
    pub fn params(&self) -> &LayoutParams {
        &self.params
    }

    /// Generates a layout from a fresh random seed.
    #[must_use]
    pub fn generate(&self, board: &BoardGeometry) -> GeneratedLayout {
        self.generate_with_seed(board, LayoutSeed::random())
    }

    /// Generates the layout determined by `seed`.
    ///
    /// Each cell center, in row-major order, is offset by up to
    /// `jitter_factor` cell sides per axis. The jittered positions are shuffled
    /// across pieces, then pieces starting within `presolved_factor` cell sides
    /// of their own target are swapped with the first piece that does not.
    #[must_use]
    pub fn generate_with_seed(&self, board: &BoardGeometry, seed: LayoutSeed) -> GeneratedLayout {
        let mut rng = Pcg64::from_seed(*seed.as_bytes());
        let jitter = board.cell_side() * self.params.jitter_factor.abs();

        let mut positions = board
            .grid_size()
            .cells()
            .map(|cell| {
                let dx = sample_offset(&mut rng, jitter);
                let dy = sample_offset(&mut rng, jitter);
                board.center_of(cell) + Translation::new(dx, dy)
            })
            .collect::<Vec<_>>();
        positions.shuffle(&mut rng);

        separate_presolved(
            board,
            &mut positions,
            board.cell_side() * self.params.presolved_factor,
        );

        GeneratedLayout { positions, seed }
    }
}

fn sample_offset(rng: &mut Pcg64, jitter: f64) -> f64 {
    if jitter.is_finite() && jitter > 0.0 {
        rng.random_range(-jitter..=jitter)
    } else {
        0.0
    }
}

fn is_presolved(board: &BoardGeometry, positions: &[Point], index: usize, threshold: f64) -> bool {
    board
        .cell_at_index(index)
        .is_some_and(|cell| positions[index].distance_to(board.center_of(cell)) < threshold)
}

/// Best-effort pass moving pieces away from their own target.
///
/// Every presolved piece swaps positions once with the lowest-indexed other
/// piece that is not presolved. When no such piece exists it is left alone.
fn separate_presolved(board: &BoardGeometry, positions: &mut [Point], threshold: f64) {
    for index in 0..positions.len() {
        if !is_presolved(board, positions, index, threshold) {
            continue;
        }
        let other = (0..positions.len())
            .filter(|&other| other != index)
            .find(|&other| !is_presolved(board, positions, other, threshold));
        if let Some(other) = other {
            positions.swap(index, other);
        }
    }
}
