use super::*;
use ndarray::Array2;

/// Purely random placement by rejection sampling, only the first revealed
/// cell is kept safe.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomBombGenerator {
    seed: u64,
}

impl RandomBombGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl BombGenerator for RandomBombGenerator {
    fn generate(self, config: GameConfig, avoid: Coord2) -> BombLayout {
        use rand::prelude::*;

        let (rows, cols) = config.size;
        let mut mask: Array2<bool> = Array2::default(config.size.to_nd_index());

        // callers validate first, this only guards against spinning forever
        let target = if config.bombs >= config.total_cells() {
            log::warn!(
                "Cannot keep {:?} safe with {} bombs on {} cells, placing {}",
                avoid,
                config.bombs,
                config.total_cells(),
                config.total_cells().saturating_sub(1)
            );
            config.total_cells().saturating_sub(1)
        } else {
            config.bombs
        };

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut placed: CellCount = 0;
        let mut draws: u32 = 0;
        while placed < target {
            draws += 1;
            let coords = (rng.random_range(0..rows), rng.random_range(0..cols));
            if coords != avoid && !mask[coords.to_nd_index()] {
                mask[coords.to_nd_index()] = true;
                placed += 1;
            }
        }
        log::trace!("Placed {} bombs in {} draws", placed, draws);

        BombLayout::from_bomb_mask(mask)
    }
}
