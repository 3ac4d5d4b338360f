#![no_std]

extern crate alloc;

use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use error::*;
pub use game::*;
pub use generator::*;
pub use settings::*;
pub use solver::*;
pub use tile::*;
pub use types::*;

mod board;
mod error;
mod game;
mod generator;
mod settings;
mod solver;
mod tile;
mod types;

/// Dimensions and bomb count of a board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// `(rows, columns)`
    pub size: Coord2,
    pub bombs: CellCount,
}

impl GameConfig {
    pub(crate) const fn new_unchecked(size: Coord2, bombs: CellCount) -> Self {
        Self { size, bombs }
    }

    /// Builds a config clamped into the range the settings screen allows.
    pub fn new((rows, cols): Coord2, bombs: CellCount) -> Self {
        let rows = rows.clamp(MIN_SIDE, MAX_SIDE);
        let cols = cols.clamp(MIN_SIDE, MAX_SIDE);
        let bombs = bombs.clamp(1, mult(rows, cols) - 1);
        Self::new_unchecked((rows, cols), bombs)
    }

    pub const fn rows(&self) -> Coord {
        self.size.0
    }

    pub const fn columns(&self) -> Coord {
        self.size.1
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells().saturating_sub(self.bombs)
    }

    /// Rejects configs that bomb placement could never satisfy.
    pub fn validate(&self) -> Result<()> {
        if self.size.0 == 0 || self.size.1 == 0 {
            Err(GameError::InvalidSize)
        } else if self.bombs == 0 {
            Err(GameError::NoBombs)
        } else if self.bombs >= self.total_cells() {
            Err(GameError::TooManyBombs)
        } else {
            Ok(())
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new_unchecked((8, 8), 8)
    }
}

/// Which cells hold a bomb.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BombLayout {
    bomb_mask: Array2<bool>,
    bomb_count: CellCount,
}

impl BombLayout {
    pub fn from_bomb_mask(bomb_mask: Array2<bool>) -> Self {
        let bomb_count = bomb_mask
            .iter()
            .filter(|&&is_bomb| is_bomb)
            .count()
            .try_into()
            .unwrap_or(CellCount::MAX);
        Self {
            bomb_mask,
            bomb_count,
        }
    }

    pub fn from_bomb_coords(size: Coord2, bomb_coords: &[Coord2]) -> Result<Self> {
        let mut bomb_mask: Array2<bool> = Array2::default(size.to_nd_index());

        for &coords in bomb_coords {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(GameError::InvalidCoords);
            }
            bomb_mask[coords.to_nd_index()] = true;
        }

        Ok(Self::from_bomb_mask(bomb_mask))
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig::new_unchecked(self.size(), self.bomb_count)
    }

    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.bomb_mask.dim();
        (
            rows.try_into().unwrap_or(Coord::MAX),
            cols.try_into().unwrap_or(Coord::MAX),
        )
    }

    pub fn bomb_count(&self) -> CellCount {
        self.bomb_count
    }

    pub fn contains_bomb(&self, coords: Coord2) -> bool {
        self[coords]
    }

    /// Bombs in the clipped 8-neighborhood of `coords`, the cell itself excluded.
    pub fn adjacent_bomb_count(&self, coords: Coord2) -> u8 {
        // at most 8 neighbors, always fits
        self.bomb_mask
            .iter_neighbors(coords)
            .filter(|&pos| self[pos])
            .count() as u8
    }
}

impl Index<Coord2> for BombLayout {
    type Output = bool;

    fn index(&self, (row, col): Coord2) -> &Self::Output {
        &self.bomb_mask[(row as usize, col as usize)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_new_clamps_into_settings_range() {
        assert_eq!(GameConfig::new((1, 50), 0), GameConfig::new_unchecked((2, 40), 1));
        assert_eq!(GameConfig::new((2, 2), 10), GameConfig::new_unchecked((2, 2), 3));
    }

    #[test]
    fn validate_rejects_unplaceable_configs() {
        assert_eq!(GameConfig::new_unchecked((0, 3), 1).validate(), Err(GameError::InvalidSize));
        assert_eq!(GameConfig::new_unchecked((3, 3), 0).validate(), Err(GameError::NoBombs));
        assert_eq!(GameConfig::new_unchecked((3, 3), 9).validate(), Err(GameError::TooManyBombs));
        assert_eq!(GameConfig::new_unchecked((1, 2), 1).validate(), Ok(()));
    }

    #[test]
    fn default_config_is_eight_by_eight() {
        let config = GameConfig::default();
        assert_eq!(config.size, (8, 8));
        assert_eq!(config.bombs, 8);
        assert_eq!(config.safe_cells(), 56);
    }

    #[test]
    fn layout_counts_adjacent_bombs() {
        let layout = BombLayout::from_bomb_coords((3, 3), &[(0, 0), (2, 2)]).unwrap();

        assert_eq!(layout.bomb_count(), 2);
        assert_eq!(layout.adjacent_bomb_count((1, 1)), 2);
        assert_eq!(layout.adjacent_bomb_count((0, 2)), 0);
        assert_eq!(layout.adjacent_bomb_count((0, 0)), 0);
        assert!(layout.contains_bomb((2, 2)));
    }

    #[test]
    fn layout_rejects_out_of_bounds_bomb() {
        assert_eq!(
            BombLayout::from_bomb_coords((2, 2), &[(2, 0)]),
            Err(GameError::InvalidCoords)
        );
    }

    #[test]
    fn config_roundtrips_through_json() {
        let config = GameConfig::new((10, 12), 20);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(serde_json::from_str::<GameConfig>(&json).unwrap(), config);
    }
}
