use alloc::collections::VecDeque;
use core::fmt;
use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::*;

/// Outcome of a board, derived from its tiles on every query.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardState {
    Running,
    Lost,
    Won,
}

/// The playing grid.
///
/// Bombs are placed lazily on the first reveal, so the first opened tile is
/// always safe. Every operation taking coordinates silently ignores ones that
/// fall outside the grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    config: GameConfig,
    grid: Array2<Tile>,
    bombs_placed: bool,
    seed: u64,
}

impl Board {
    /// Board whose bombs will be drawn from OS entropy.
    pub fn new(config: GameConfig) -> Result<Self> {
        Self::with_seed(config, rand::random())
    }

    /// Board whose bomb placement is fully determined by `seed`.
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        Ok(Self::new_unchecked(config, seed))
    }

    pub(crate) fn new_unchecked(config: GameConfig, seed: u64) -> Self {
        log::debug!("New {:?} board with seed {}", config, seed);
        Self {
            config,
            grid: Array2::default(config.size.to_nd_index()),
            bombs_placed: false,
            seed,
        }
    }

    /// Board with bombs already placed at the given layout.
    pub fn from_layout(layout: BombLayout) -> Result<Self> {
        let mut board = Self::with_seed(layout.game_config(), 0)?;
        board.place_bombs_with(FixedBombGenerator(layout), (0, 0))?;
        Ok(board)
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn size(&self) -> Coord2 {
        self.config.size
    }

    pub fn rows(&self) -> Coord {
        self.config.rows()
    }

    pub fn columns(&self) -> Coord {
        self.config.columns()
    }

    pub fn total_bombs(&self) -> CellCount {
        self.config.bombs
    }

    pub fn bombs_placed(&self) -> bool {
        self.bombs_placed
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let (rows, cols) = self.size();
        if coords.0 < rows && coords.1 < cols {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn tile_at(&self, coords: Coord2) -> Option<Tile> {
        let coords = self.validate_coords(coords).ok()?;
        Some(self.grid[coords.to_nd_index()])
    }

    /// Read-only view of the whole grid, indexed `[row, col]`.
    pub fn tiles(&self) -> ArrayView2<'_, Tile> {
        self.grid.view()
    }

    /// All coordinates in row-major order.
    pub fn iter_coords(&self) -> impl Iterator<Item = Coord2> + use<> {
        let (rows, cols) = self.size();
        (0..rows).flat_map(move |row| (0..cols).map(move |col| (row, col)))
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.grid.iter_neighbors(coords)
    }

    /// Counts neighbors of `coords` matching `pred`.
    pub fn count_adjacent(&self, coords: Coord2, pred: impl Fn(Tile) -> bool) -> u8 {
        // at most 8 neighbors
        self.iter_neighbors(coords)
            .filter(|&pos| pred(self.grid[pos.to_nd_index()]))
            .count() as u8
    }

    /// Open a tile, flood zero regions and chord satisfied numbers.
    ///
    /// Flagged targets are ignored entirely. The first call places the bombs,
    /// keeping the clicked tile safe.
    pub fn left_click(&mut self, coords: Coord2) {
        let Ok(coords) = self.validate_coords(coords) else {
            return;
        };
        if self.grid[coords.to_nd_index()].is_flagged() {
            return;
        }

        if let Err(err) = self.place_bombs_with(RandomBombGenerator::new(self.seed), coords) {
            log::error!("Could not place bombs: {}", err);
            return;
        }
        self.reveal_from(coords);
    }

    /// Cycle the mark of a tile: closed, flagged, questioned.
    pub fn right_click(&mut self, coords: Coord2) {
        if let Ok(coords) = self.validate_coords(coords) {
            self.grid[coords.to_nd_index()].cycle_mark();
        }
    }

    /// Flag a closed tile, leaving marked and open tiles alone.
    pub fn ai_right_click(&mut self, coords: Coord2) {
        if let Ok(coords) = self.validate_coords(coords) {
            self.grid[coords.to_nd_index()].force_flag();
        }
    }

    pub fn hover(&mut self, coords: Coord2) {
        if let Ok(coords) = self.validate_coords(coords) {
            self.grid[coords.to_nd_index()].hover();
        }
    }

    pub fn unhover_all(&mut self) {
        self.grid.iter_mut().for_each(Tile::unhover);
    }

    /// Places bombs from `generator` and derives every neighbor count.
    ///
    /// Only the first call has an effect, later ones keep the existing bombs.
    /// A layout that does not match the board size and bomb count is rejected
    /// and leaves the board unplaced.
    pub fn place_bombs_with(&mut self, generator: impl BombGenerator, avoid: Coord2) -> Result<()> {
        if self.bombs_placed {
            return Ok(());
        }

        let layout = generator.generate(self.config, avoid);
        if layout.game_config() != self.config {
            log::warn!(
                "Rejected layout {:?} for board {:?}",
                layout.game_config(),
                self.config
            );
            return Err(GameError::LayoutMismatch);
        }

        for coords in self.iter_coords() {
            let tile = &mut self.grid[coords.to_nd_index()];
            if layout.contains_bomb(coords) {
                tile.set_bomb();
            }
            tile.set_adjacent_bombs(layout.adjacent_bomb_count(coords));
        }
        self.bombs_placed = true;
        log::debug!("Placed {} bombs avoiding {:?}", layout.bomb_count(), avoid);
        Ok(())
    }

    fn reveal_from(&mut self, origin: Coord2) {
        let before = self.grid[origin.to_nd_index()];
        let chord = before.is_open()
            && before.adjacent_bombs() == self.count_adjacent(origin, Tile::is_flagged);

        self.grid[origin.to_nd_index()].reveal();
        let target = self.grid[origin.to_nd_index()];
        if before.is_closed() && target.is_open() {
            log::trace!(
                "Open tile at {:?}, bomb count: {}",
                origin,
                target.adjacent_bombs()
            );
        }

        // a questioned zero stays marked but still sweeps its neighborhood
        let mut to_visit = VecDeque::new();
        if !target.is_bomb() && target.adjacent_bombs() == 0 {
            to_visit.extend(self.closed_neighbors(origin));
            log::trace!(
                "Starting flood-fill from {:?}, initial neighbors: {:?}",
                origin,
                to_visit
            );
        } else if chord {
            log::trace!("Chord sweep around {:?}", origin);
            for pos in self.iter_neighbors(origin) {
                let tile = &mut self.grid[pos.to_nd_index()];
                if !tile.is_closed() {
                    continue;
                }
                tile.reveal();
                if tile.opens_region() {
                    to_visit.extend(self.closed_neighbors(pos));
                }
            }
        }

        while let Some(visit_coords) = to_visit.pop_front() {
            let tile = &mut self.grid[visit_coords.to_nd_index()];
            // already opened by an earlier visit, or marked
            if !tile.is_closed() {
                continue;
            }

            tile.reveal();
            log::trace!(
                "Flood opened tile at {:?}, bomb count: {}",
                visit_coords,
                tile.adjacent_bombs()
            );

            if tile.opens_region() {
                to_visit.extend(self.closed_neighbors(visit_coords));
            }
        }
    }

    fn closed_neighbors(&self, coords: Coord2) -> impl Iterator<Item = Coord2> + '_ {
        self.iter_neighbors(coords)
            .filter(|&pos| self.grid[pos.to_nd_index()].is_closed())
    }

    /// Lost if any bomb is open, won once every safe tile is open.
    pub fn state(&self) -> BoardState {
        let mut open_tiles: CellCount = 0;
        for tile in self.grid.iter().filter(|tile| tile.is_open()) {
            if tile.is_bomb() {
                return BoardState::Lost;
            }
            open_tiles += 1;
        }

        if open_tiles == self.config.safe_cells() {
            BoardState::Won
        } else {
            BoardState::Running
        }
    }

    pub fn flag_count(&self) -> CellCount {
        self.grid.iter().filter(|tile| tile.is_flagged()).count() as CellCount
    }

    /// How many bombs have not been flagged yet, negative when over-flagged.
    pub fn bombs_left(&self) -> isize {
        (self.config.bombs as isize) - (self.flag_count() as isize)
    }

    /// First opened bomb in row-major order.
    pub fn exploded_at(&self) -> Option<Coord2> {
        self.iter_coords().find(|&coords| {
            let tile = self.grid[coords.to_nd_index()];
            tile.is_open() && tile.is_bomb()
        })
    }

    /// Flags every bomb, as a won board presents them.
    pub(crate) fn flag_all_bombs(&mut self) {
        self.grid
            .iter_mut()
            .filter(|tile| tile.is_bomb())
            .for_each(Tile::settle_flag);
    }

    /// What to draw at `coords` given the board outcome.
    pub fn display_at(&self, coords: Coord2, state: BoardState) -> Option<TileDisplay> {
        use TileDisplay::*;

        let tile = self.tile_at(coords)?;
        Some(match (tile.cover(), tile.is_bomb(), state) {
            (Cover::Open, true, _) => Exploded,
            (Cover::Open, false, _) => Open(tile.adjacent_bombs()),
            (_, true, BoardState::Won) => Flag,
            (Cover::Flagged, false, BoardState::Lost) => IncorrectFlag,
            (Cover::Flagged, _, _) => Flag,
            (Cover::Questioned, _, _) => Question,
            (Cover::Closed, true, BoardState::Lost) => Mine,
            (Cover::Closed, _, _) if tile.is_hovered() => Hovered,
            (Cover::Closed, _, _) => Closed,
        })
    }

    /// Display state of the whole grid.
    pub fn display(&self) -> Array2<TileDisplay> {
        let state = self.state();
        Array2::from_shape_fn(self.size().to_nd_index(), |(row, col)| {
            self.display_at((row as Coord, col as Coord), state)
                .unwrap_or(TileDisplay::Closed)
        })
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.grid.rows() {
            for tile in row {
                let c = match tile.cover() {
                    Cover::Closed => '#',
                    Cover::Flagged => 'F',
                    Cover::Questioned => '?',
                    Cover::Open if tile.is_bomb() => '*',
                    Cover::Open => match tile.adjacent_bombs() {
                        0 => '.',
                        n => char::from(b'0' + n),
                    },
                };
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
