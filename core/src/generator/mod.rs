use crate::*;
pub use random::*;

mod random;

/// Source of bomb positions, run once per board on the first reveal.
pub trait BombGenerator {
    /// Produce a layout with exactly `config.bombs` bombs, none at `avoid`.
    fn generate(self, config: GameConfig, avoid: Coord2) -> BombLayout;
}

/// Hands out a prepared layout, ignoring the cell to avoid.
///
/// The board rejects it when its size or bomb count differ from the config.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedBombGenerator(pub BombLayout);

impl BombGenerator for FixedBombGenerator {
    fn generate(self, _config: GameConfig, _avoid: Coord2) -> BombLayout {
        self.0
    }
}
