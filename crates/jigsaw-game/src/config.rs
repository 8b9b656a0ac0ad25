use jigsaw_core::BoardGeometry;
use jigsaw_generator::LayoutParams;

/// Default snap threshold, as a fraction of the cell side.
pub const DEFAULT_SNAP_THRESHOLD_FACTOR: f64 = 0.30;

/// Snap threshold used when the player asked for reduced motion.
pub const REDUCED_MOTION_SNAP_THRESHOLD_FACTOR: f64 = 0.40;

/// Session tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Fraction of one cell side that counts as "close enough" to a target.
    ///
    /// Kept for the presentation layer (e.g. to highlight the target while
    /// dragging). Releasing on the board always snaps to the nearest free cell
    /// regardless of this value.
    pub snap_threshold_factor: f64,
    /// Initial layout parameters.
    pub layout: LayoutParams,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            snap_threshold_factor: DEFAULT_SNAP_THRESHOLD_FACTOR,
            layout: LayoutParams::default(),
        }
    }
}

impl SessionConfig {
    /// Returns the default configuration, adjusted for the reduced-motion
    /// accessibility setting.
    #[must_use]
    pub fn with_reduced_motion(reduced_motion: bool) -> Self {
        let snap_threshold_factor = if reduced_motion {
            REDUCED_MOTION_SNAP_THRESHOLD_FACTOR
        } else {
            DEFAULT_SNAP_THRESHOLD_FACTOR
        };
        Self {
            snap_threshold_factor,
            ..Self::default()
        }
    }

    /// Returns the snap threshold in board units.
    #[must_use]
    pub fn snap_threshold(&self, board: &BoardGeometry) -> f64 {
        board.cell_side() * self.snap_threshold_factor
    }
}
