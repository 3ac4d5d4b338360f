use crate::*;

/// What the solver may see and do on a board: read tiles, reveal, flag.
pub trait Playfield {
    fn size(&self) -> Coord2;

    fn tile_at(&self, coords: Coord2) -> Option<Tile>;

    /// Same semantics as a player's primary click.
    fn reveal(&mut self, coords: Coord2);

    /// Flag a closed tile, never overwriting a mark.
    fn flag(&mut self, coords: Coord2);
}

impl Playfield for Board {
    fn size(&self) -> Coord2 {
        Board::size(self)
    }

    fn tile_at(&self, coords: Coord2) -> Option<Tile> {
        Board::tile_at(self, coords)
    }

    fn reveal(&mut self, coords: Coord2) {
        self.left_click(coords);
    }

    fn flag(&mut self, coords: Coord2) {
        self.ai_right_click(coords);
    }
}

/// Requests issued by one solver pass.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TurnReport {
    /// Reveal requests on satisfied numbers
    pub reveals: CellCount,
    /// Tiles that went from closed to flagged
    pub flags: CellCount,
}

/// Runs a single deduction pass over every tile in row-major order.
///
/// An open number whose flags already account for all its bombs is revealed
/// again, which chords open its remaining closed neighbors. An open number
/// whose closed and flagged neighbors together equal its bomb count has all
/// its neighbors flagged.
///
/// Tiles are re-read after every action, but deductions made possible by a
/// later tile are not revisited in the same pass. Calling it again is how
/// further progress is made, and boards that need more than these two local
/// rules will stall.
pub fn play_turn(field: &mut impl Playfield) -> TurnReport {
    let mut report = TurnReport::default();
    let (rows, cols) = field.size();

    for row in 0..rows {
        for col in 0..cols {
            let coords = (row, col);

            if let Some(tile) = field.tile_at(coords)
                && tile.is_open()
                && tile.adjacent_bombs() == count_around(&*field, coords, Tile::is_flagged)
            {
                log::trace!("Solver reveals around satisfied {:?}", coords);
                field.reveal(coords);
                report.reveals += 1;
            }

            if let Some(tile) = field.tile_at(coords)
                && tile.is_open()
                && tile.adjacent_bombs() > 0
                && count_around(&*field, coords, Tile::is_closed)
                    + count_around(&*field, coords, Tile::is_flagged)
                    == tile.adjacent_bombs()
            {
                log::trace!("Solver flags around saturated {:?}", coords);
                for pos in NeighborIter::new(coords, (rows, cols)) {
                    let was_closed = field.tile_at(pos).is_some_and(Tile::is_closed);
                    field.flag(pos);
                    if was_closed && field.tile_at(pos).is_some_and(Tile::is_flagged) {
                        report.flags += 1;
                    }
                }
            }
        }
    }

    log::debug!(
        "Solver pass issued {} reveals, placed {} flags",
        report.reveals,
        report.flags
    );
    report
}

fn count_around(field: &impl Playfield, coords: Coord2, pred: impl Fn(Tile) -> bool) -> u8 {
    NeighborIter::new(coords, field.size())
        .filter_map(|pos| field.tile_at(pos))
        .filter(|&tile| pred(tile))
        .count() as u8
}
