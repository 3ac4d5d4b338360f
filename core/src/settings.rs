use serde::{Deserialize, Serialize};

use crate::*;

/// Smallest row or column count the settings screen allows.
pub const MIN_SIDE: Coord = 2;

/// Largest row or column count the settings screen allows.
pub const MAX_SIDE: Coord = 40;

/// Step of a primary click on a settings arrow.
pub const SMALL_STEP: i16 = 1;

/// Step of a secondary click on a settings arrow.
pub const LARGE_STEP: i16 = 5;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SettingsField {
    Rows,
    Columns,
    Bombs,
}

impl GameConfig {
    /// Moves one field by `delta`, keeping the whole config within bounds.
    ///
    /// Sides stay in `[MIN_SIDE, MAX_SIDE]` and bombs in `[1, rows * columns - 1]`.
    /// Shrinking a side pulls the bomb count down with it, growing one leaves
    /// the bomb count alone.
    pub fn adjusted(self, field: SettingsField, delta: i16) -> Self {
        let Self {
            size: (rows, cols),
            bombs,
        } = self;

        let step_side = |side: Coord| -> Coord {
            let next = (i16::from(side) + delta).clamp(MIN_SIDE.into(), MAX_SIDE.into());
            // clamped into Coord range above
            next as Coord
        };

        let (rows, cols, bombs) = match field {
            SettingsField::Rows => (step_side(rows), cols, bombs),
            SettingsField::Columns => (rows, step_side(cols), bombs),
            SettingsField::Bombs => {
                let max = i32::from(mult(rows, cols)) - 1;
                let next = (i32::from(bombs) + i32::from(delta)).clamp(1, max.max(1));
                (rows, cols, next as CellCount)
            }
        };

        let bombs = if delta < 0 && field != SettingsField::Bombs {
            bombs.min(mult(rows, cols).saturating_sub(1))
        } else {
            bombs
        };

        let adjusted = Self::new_unchecked((rows, cols), bombs);
        if adjusted != self {
            log::debug!("Settings {:?} {:+} -> {:?}", field, delta, adjusted);
        }
        adjusted
    }
}
