use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - NotStarted -> Running (setup or reset)
/// - NotStarted -> InSettings
/// - Running -> LossStopped
/// - Running -> WinStopped
/// - Running -> InSettings
/// - LossStopped -> NotStarted (next tick)
/// - WinStopped -> NotStarted (next tick)
/// - InSettings -> Running (fresh board)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for a manual reset
    NotStarted,
    /// Board accepts moves
    Running,
    /// Board was just lost, shown for one tick
    LossStopped,
    /// Board was just won, shown for one tick
    WinStopped,
    /// Editing rows, columns and bombs
    InSettings,
}

impl GamePhase {
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }

    /// Indicates the board just ended and no moves can be made anymore
    pub const fn is_stopped(self) -> bool {
        use GamePhase::*;
        match self {
            NotStarted => false,
            Running => false,
            LossStopped => true,
            WinStopped => true,
            InSettings => false,
        }
    }
}

impl Default for GamePhase {
    fn default() -> Self {
        Self::NotStarted
    }
}

impl From<BoardState> for GamePhase {
    fn from(state: BoardState) -> Self {
        match state {
            BoardState::Running => Self::Running,
            BoardState::Lost => Self::LossStopped,
            BoardState::Won => Self::WinStopped,
        }
    }
}

/// Owns the current board and the phase of a play session.
///
/// Moves are coordinates on the grid, translating pointer positions is left to
/// the presentation layer. Moves outside `Running` are ignored.
#[derive(Clone, Debug)]
pub struct Game {
    config: GameConfig,
    board: Board,
    phase: GamePhase,
    seeds: SmallRng,
}

impl Game {
    pub fn new(config: GameConfig) -> Result<Self> {
        Self::with_seed(config, rand::random())
    }

    /// Session whose every board is reproducible from `seed`.
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        let mut seeds = SmallRng::seed_from_u64(seed);
        let board = Board::new_unchecked(config, seeds.random());
        Ok(Self {
            config,
            board,
            phase: GamePhase::NotStarted,
            seeds,
        })
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Settings the next board will be built with.
    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Bombs minus flags, for the counter display.
    pub fn bombs_left(&self) -> isize {
        self.board.bombs_left()
    }

    /// Replace the board with a fresh one and start running.
    pub fn setup(&mut self) {
        self.board = Board::new_unchecked(self.config, self.seeds.random());
        self.set_phase(GamePhase::Running);
    }

    /// Start over with the current settings, unavailable while in settings.
    pub fn reset(&mut self) {
        if self.phase != GamePhase::InSettings {
            self.setup();
        }
    }

    pub fn toggle_settings(&mut self) {
        use GamePhase::*;
        match self.phase {
            NotStarted | Running => self.set_phase(InSettings),
            InSettings => self.setup(),
            LossStopped | WinStopped => {}
        }
    }

    /// Edit a pending setting, only while in settings.
    pub fn adjust_setting(&mut self, field: SettingsField, delta: i16) {
        if self.phase == GamePhase::InSettings {
            self.config = self.config.adjusted(field, delta);
        }
    }

    /// Advance one frame, returning the phase to present.
    ///
    /// A running game takes its phase from the board. A stopped phase is
    /// presented for exactly one tick before dropping to `NotStarted`.
    pub fn tick(&mut self) -> GamePhase {
        if self.phase.is_stopped() {
            self.set_phase(GamePhase::NotStarted);
        } else if self.phase.is_running() {
            let next = GamePhase::from(self.board.state());
            if next == GamePhase::WinStopped {
                self.board.flag_all_bombs();
            }
            self.set_phase(next);
        }
        self.phase
    }

    pub fn left_click(&mut self, coords: Coord2) {
        if self.phase.is_running() {
            self.board.left_click(coords);
        }
    }

    pub fn right_click(&mut self, coords: Coord2) {
        if self.phase.is_running() {
            self.board.right_click(coords);
        }
    }

    pub fn hover(&mut self, coords: Coord2) {
        if self.phase.is_running() {
            self.board.hover(coords);
        }
    }

    pub fn unhover_all(&mut self) {
        self.board.unhover_all();
    }

    /// One solver pass over the running board.
    pub fn play_solver_turn(&mut self) -> Option<TurnReport> {
        self.phase
            .is_running()
            .then(|| play_turn(&mut self.board))
    }

    fn set_phase(&mut self, phase: GamePhase) {
        if self.phase != phase {
            log::debug!("Phase {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running_game(config: GameConfig) -> Game {
        let mut game = Game::with_seed(config, 11).unwrap();
        game.setup();
        game
    }

    #[test]
    fn starts_not_started_and_ignores_moves() {
        let mut game = Game::with_seed(GameConfig::default(), 1).unwrap();
        assert_eq!(game.phase(), GamePhase::NotStarted);

        game.left_click((0, 0));
        game.right_click((1, 1));

        assert!(!game.board().bombs_placed());
        assert_eq!(game.board().flag_count(), 0);
        assert_eq!(game.tick(), GamePhase::NotStarted);
    }

    #[test]
    fn rejects_invalid_config() {
        let config = GameConfig::new_unchecked((3, 3), 9);
        assert_eq!(Game::new(config).err(), Some(GameError::TooManyBombs));
    }

    #[test]
    fn win_is_shown_for_one_tick() {
        // a single safe cell wins on the first click
        let mut game = running_game(GameConfig::new((2, 2), 3));
        game.left_click((0, 1));

        assert_eq!(game.tick(), GamePhase::WinStopped);
        assert_eq!(game.bombs_left(), 0);
        assert_eq!(game.tick(), GamePhase::NotStarted);

        game.left_click((0, 0));
        assert_eq!(game.board().state(), BoardState::Won);
    }

    #[test]
    fn loss_is_shown_for_one_tick() {
        // the center touches every bomb, so the first click cannot flood
        let mut game = running_game(GameConfig::new((3, 3), 7));
        game.left_click((1, 1));
        assert_eq!(game.tick(), GamePhase::Running);

        let bomb = game
            .board()
            .iter_coords()
            .find(|&coords| game.board().tile_at(coords).unwrap().is_bomb())
            .unwrap();
        game.left_click(bomb);

        assert_eq!(game.tick(), GamePhase::LossStopped);
        assert_eq!(game.board().exploded_at(), Some(bomb));
        assert_eq!(game.tick(), GamePhase::NotStarted);
    }

    #[test]
    fn running_tick_stays_running() {
        let mut game = running_game(GameConfig::default());
        assert_eq!(game.tick(), GamePhase::Running);
    }

    #[test]
    fn reset_builds_fresh_board() {
        let mut game = running_game(GameConfig::default());
        game.left_click((3, 3));
        assert!(game.board().bombs_placed());

        game.reset();

        assert_eq!(game.phase(), GamePhase::Running);
        assert!(!game.board().bombs_placed());
        assert!(game.board().tiles().iter().all(|tile| tile.is_closed()));
    }

    #[test]
    fn settings_round_trip_applies_new_config() {
        let mut game = running_game(GameConfig::default());

        game.adjust_setting(SettingsField::Rows, SMALL_STEP);
        assert_eq!(game.config(), GameConfig::default());

        game.toggle_settings();
        assert_eq!(game.phase(), GamePhase::InSettings);
        game.left_click((0, 0));
        assert!(!game.board().bombs_placed());

        game.adjust_setting(SettingsField::Rows, LARGE_STEP);
        game.adjust_setting(SettingsField::Columns, -LARGE_STEP);
        game.adjust_setting(SettingsField::Bombs, SMALL_STEP);
        game.reset();
        assert_eq!(game.phase(), GamePhase::InSettings);

        game.toggle_settings();
        assert_eq!(game.phase(), GamePhase::Running);
        assert_eq!(game.board().size(), (13, 3));
        assert_eq!(game.board().total_bombs(), 9);
    }

    #[test]
    fn settings_unreachable_from_stopped_phase() {
        let mut game = running_game(GameConfig::new((2, 2), 3));
        game.left_click((0, 0));
        assert_eq!(game.tick(), GamePhase::WinStopped);

        game.toggle_settings();

        assert_eq!(game.phase(), GamePhase::WinStopped);
    }

    #[test]
    fn solver_only_runs_while_running() {
        let mut game = Game::with_seed(GameConfig::default(), 3).unwrap();
        assert_eq!(game.play_solver_turn(), None);

        game.setup();
        assert!(game.play_solver_turn().is_some());
    }

    #[test]
    fn same_seed_same_boards() {
        let mut a = running_game(GameConfig::default());
        let mut b = running_game(GameConfig::default());

        a.left_click((4, 4));
        b.left_click((4, 4));

        assert_eq!(a.board(), b.board());
    }
}
