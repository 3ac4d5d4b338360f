use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use sweeper_core::*;

/// Plays seeded games with the one-pass solver and reports how far it gets.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// JSON file holding a board config, overrides the size flags
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = 9)]
    rows: Coord,

    #[arg(long, default_value_t = 9)]
    columns: Coord,

    #[arg(long, default_value_t = 10)]
    bombs: CellCount,

    /// How many games to play
    #[arg(short, long, default_value_t = 100)]
    games: u32,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Give up on a game after this many solver passes
    #[arg(long, default_value_t = 1000)]
    max_turns: u32,

    /// Print every final board
    #[arg(short, long)]
    print: bool,
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum Finish {
    Won,
    Lost,
    Stalled,
}

#[derive(Debug, Default)]
struct Summary {
    won: u32,
    lost: u32,
    stalled: u32,
    passes: u64,
}

fn load_config(args: &Args) -> Result<GameConfig> {
    let config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => GameConfig {
            size: (args.rows, args.columns),
            bombs: args.bombs,
        },
    };
    config
        .validate()
        .with_context(|| format!("invalid board config {:?}", config))?;
    Ok(config)
}

/// Opens the center, then runs solver passes until the board settles.
fn play_game(config: GameConfig, seed: u64, max_turns: u32) -> Result<(Board, Finish, u32)> {
    let mut board = Board::with_seed(config, seed)?;
    board.left_click((config.rows() / 2, config.columns() / 2));

    let mut passes = 0;
    let finish = loop {
        match board.state() {
            BoardState::Won => break Finish::Won,
            BoardState::Lost => break Finish::Lost,
            BoardState::Running if passes >= max_turns => break Finish::Stalled,
            BoardState::Running => {}
        }

        let before = board.clone();
        let report = play_turn(&mut board);
        passes += 1;
        log::trace!("seed {} pass {}: {:?}", seed, passes, report);

        if board == before {
            break Finish::Stalled;
        }
    };

    Ok((board, finish, passes))
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.verbose.tracing_level_filter())
        .init();

    let config = load_config(&args)?;
    let base_seed = args.seed.unwrap_or_else(rand::random);
    log::info!("Playing {} games of {:?}, base seed {}", args.games, config, base_seed);

    let mut summary = Summary::default();
    for game in 0..args.games {
        let seed = base_seed.wrapping_add(game.into());
        let (board, finish, passes) = play_game(config, seed, args.max_turns)?;
        log::debug!("game {} seed {}: {:?} after {} passes", game, seed, finish, passes);

        match finish {
            Finish::Won => summary.won += 1,
            Finish::Lost => summary.lost += 1,
            Finish::Stalled => summary.stalled += 1,
        }
        summary.passes += u64::from(passes);

        if args.print {
            println!("game {game} (seed {seed}): {finish:?}");
            println!("{board}");
        }
    }

    let mean_passes = if args.games > 0 {
        summary.passes as f64 / f64::from(args.games)
    } else {
        0.0
    };
    println!(
        "{} games on {}x{} with {} bombs: {} won, {} lost, {} stalled, {:.2} passes per game",
        args.games,
        config.rows(),
        config.columns(),
        config.bombs,
        summary.won,
        summary.lost,
        summary.stalled,
        mean_passes
    );

    Ok(())
}
