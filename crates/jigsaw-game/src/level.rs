use jigsaw_core::GridSize;
use serde::{Deserialize, Serialize};

/// Stable identifier of a level, used as the key for persisted progress.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display, Serialize, Deserialize)]
#[display("{_0}")]
#[serde(transparent)]
pub struct LevelId(String);

impl LevelId {
    /// Creates a level id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LevelId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for LevelId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

const EASY_GRID: GridSize = match GridSize::new(3) {
    Ok(size) => size,
    Err(_) => panic!("3 is a valid grid size"),
};
const STANDARD_GRID: GridSize = match GridSize::new(4) {
    Ok(size) => size,
    Err(_) => panic!("4 is a valid grid size"),
};
const HARD_GRID: GridSize = match GridSize::new(6) {
    Ok(size) => size,
    Err(_) => panic!("6 is a valid grid size"),
};

/// Difficulty presets.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display, derive_more::IsVariant, Serialize, Deserialize,
)]
pub enum Difficulty {
    /// 3×3 grid.
    #[display("easy")]
    Easy,
    /// 4×4 grid.
    #[display("standard")]
    Standard,
    /// 6×6 grid.
    #[display("hard")]
    Hard,
}

impl Difficulty {
    /// All presets, from easiest to hardest.
    pub const ALL: [Self; 3] = [Self::Easy, Self::Standard, Self::Hard];

    /// Returns the grid size of this preset.
    #[must_use]
    pub const fn grid_size(self) -> GridSize {
        match self {
            Self::Easy => EASY_GRID,
            Self::Standard => STANDARD_GRID,
            Self::Hard => HARD_GRID,
        }
    }
}

/// A level descriptor.
///
/// The image reference is opaque to the engine: it only needs the grid to
/// compute crop rectangles, never the pixels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    /// Stable identifier used for progress persistence.
    pub id: LevelId,
    /// Display title.
    pub title: String,
    /// Number of cells along one side of the board.
    pub grid_size: GridSize,
    /// Difficulty preset, when the grid size came from one.
    pub difficulty: Option<Difficulty>,
    /// Reference to the source image, interpreted by the content layer.
    pub image: String,
}

impl Level {
    /// Creates a level with an explicit grid size.
    #[must_use]
    pub fn new(id: impl Into<LevelId>, grid_size: GridSize) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            grid_size,
            difficulty: None,
            image: String::new(),
        }
    }

    /// Creates a level whose grid size comes from a difficulty preset.
    #[must_use]
    pub fn with_difficulty(id: impl Into<LevelId>, difficulty: Difficulty) -> Self {
        Self {
            difficulty: Some(difficulty),
            ..Self::new(id, difficulty.grid_size())
        }
    }

    /// Sets the display title.
    #[must_use]
    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the source image reference.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Returns the number of pieces in this level.
    #[must_use]
    pub fn piece_count(&self) -> usize {
        self.grid_size.cell_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_grid_sizes() {
        assert_eq!(Difficulty::Easy.grid_size().get(), 3);
        assert_eq!(Difficulty::Standard.grid_size().get(), 4);
        assert_eq!(Difficulty::Hard.grid_size().get(), 6);
        assert_eq!(Difficulty::Hard.to_string(), "hard");
    }

    #[test]
    fn test_level_builders() {
        let level = Level::with_difficulty("garden-2", Difficulty::Standard)
            .titled("Garden")
            .with_image("garden.jpg");
        assert_eq!(level.id.as_str(), "garden-2");
        assert_eq!(level.title, "Garden");
        assert_eq!(level.image, "garden.jpg");
        assert_eq!(level.difficulty, Some(Difficulty::Standard));
        assert_eq!(level.piece_count(), 16);

        let custom = Level::new(LevelId::new("custom"), GridSize::new(5).unwrap());
        assert_eq!(custom.difficulty, None);
        assert_eq!(custom.piece_count(), 25);
        assert_eq!(custom.id.to_string(), "custom");
    }
}
