use serde::{Deserialize, Serialize};

/// Player-visible cover of a tile, exactly one holds at a time.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cover {
    Closed,
    Flagged,
    Questioned,
    Open,
}

impl Default for Cover {
    fn default() -> Self {
        Self::Closed
    }
}

/// State of a single grid cell.
///
/// `bomb` and `adjacent_bombs` are written once by bomb placement, everything
/// else changes through the transitions below. Transitions that don't apply
/// to the current cover are no-ops.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    cover: Cover,
    bomb: bool,
    adjacent_bombs: u8,
    hovered: bool,
}

impl Tile {
    pub const fn cover(self) -> Cover {
        self.cover
    }

    pub const fn is_closed(self) -> bool {
        matches!(self.cover, Cover::Closed)
    }

    pub const fn is_flagged(self) -> bool {
        matches!(self.cover, Cover::Flagged)
    }

    pub const fn is_questioned(self) -> bool {
        matches!(self.cover, Cover::Questioned)
    }

    pub const fn is_open(self) -> bool {
        matches!(self.cover, Cover::Open)
    }

    pub const fn is_bomb(self) -> bool {
        self.bomb
    }

    pub const fn is_hovered(self) -> bool {
        self.hovered
    }

    /// Bombs among the up-to-8 neighbors, meaningful once bombs are placed.
    pub const fn adjacent_bombs(self) -> u8 {
        self.adjacent_bombs
    }

    /// Whether opening this tile floods into its neighborhood.
    pub(crate) const fn opens_region(self) -> bool {
        self.is_open() && !self.bomb && self.adjacent_bombs == 0
    }

    pub(crate) fn set_bomb(&mut self) {
        self.bomb = true;
    }

    pub(crate) fn set_adjacent_bombs(&mut self, count: u8) {
        self.adjacent_bombs = count;
    }

    /// Closed -> Open, marks are protected.
    pub fn reveal(&mut self) {
        if self.is_closed() {
            self.cover = Cover::Open;
            self.hovered = false;
        }
    }

    /// Closed -> Flagged -> Questioned -> Closed.
    pub fn cycle_mark(&mut self) {
        use Cover::*;
        self.cover = match self.cover {
            Closed => Flagged,
            Flagged => Questioned,
            Questioned => Closed,
            Open => Open,
        };
        if !self.is_closed() {
            self.hovered = false;
        }
    }

    /// Closed -> Flagged, never touches an existing mark.
    pub fn force_flag(&mut self) {
        if self.is_closed() {
            self.cover = Cover::Flagged;
            self.hovered = false;
        }
    }

    /// Any unopened tile -> Flagged, used when a won board shows its bombs.
    pub(crate) fn settle_flag(&mut self) {
        if !self.is_open() {
            self.cover = Cover::Flagged;
            self.hovered = false;
        }
    }

    pub fn hover(&mut self) {
        if self.is_closed() {
            self.hovered = true;
        }
    }

    pub fn unhover(&mut self) {
        self.hovered = false;
    }
}

/// What the presentation layer should draw for a tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileDisplay {
    Closed,
    Hovered,
    Open(u8),
    Flag,
    Question,
    /// Opened bomb
    Exploded,
    /// Unopened bomb shown after a loss
    Mine,
    /// Flag over a safe tile shown after a loss
    IncorrectFlag,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_tile() -> Tile {
        let mut tile = Tile::default();
        tile.reveal();
        tile
    }

    #[test]
    fn new_tile_is_closed_and_safe() {
        let tile = Tile::default();
        assert!(tile.is_closed());
        assert!(!tile.is_bomb());
        assert_eq!(tile.adjacent_bombs(), 0);
    }

    #[test]
    fn mark_cycle_has_period_three() {
        // closed, flagged, questioned is the whole cycle, so every third
        // call returns to the starting mark and a fourth moves one step on
        let mut tile = Tile::default();
        tile.cycle_mark();
        assert_eq!(tile.cover(), Cover::Flagged);
        tile.cycle_mark();
        assert_eq!(tile.cover(), Cover::Questioned);
        tile.cycle_mark();
        assert_eq!(tile.cover(), Cover::Closed);

        for _ in 0..2 {
            tile.cycle_mark();
            let start = tile.cover();
            for _ in 0..3 {
                tile.cycle_mark();
            }
            assert_eq!(tile.cover(), start);
        }

        let start = tile.cover();
        for _ in 0..4 {
            tile.cycle_mark();
        }
        assert_ne!(tile.cover(), start);
    }

    #[test]
    fn cycle_mark_ignores_open_tile() {
        let mut tile = open_tile();
        tile.cycle_mark();
        assert!(tile.is_open());
    }

    #[test]
    fn reveal_is_blocked_by_marks() {
        let mut tile = Tile::default();
        tile.cycle_mark();
        tile.reveal();
        assert!(tile.is_flagged());

        tile.cycle_mark();
        tile.reveal();
        assert!(tile.is_questioned());
    }

    #[test]
    fn force_flag_only_flags_closed_tiles() {
        let mut tile = open_tile();
        tile.force_flag();
        assert!(tile.is_open());

        let mut tile = Tile::default();
        tile.cycle_mark();
        tile.cycle_mark();
        tile.force_flag();
        assert!(tile.is_questioned());

        let mut tile = Tile::default();
        tile.force_flag();
        assert!(tile.is_flagged());
        tile.force_flag();
        assert!(tile.is_flagged());
    }

    #[test]
    fn hover_only_applies_to_closed_tiles() {
        let mut tile = Tile::default();
        tile.hover();
        assert!(tile.is_hovered());
        tile.unhover();
        assert!(!tile.is_hovered());

        let mut tile = open_tile();
        tile.hover();
        assert!(!tile.is_hovered());
    }
}
