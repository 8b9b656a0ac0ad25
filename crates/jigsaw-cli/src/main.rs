//! Headless jigsaw session simulator.
//!
//! Plays seeded jigsaw sessions with a scripted bot and reports moves, time
//! and best results per level, the way a persistence layer would record them.
//!
//! # Usage
//!
//! ```sh
//! cargo run --bin jigsaw-sim
//! ```
//!
//! Play five hard games reproducibly:
//!
//! ```sh
//! cargo run --bin jigsaw-sim -- --difficulty hard --runs 5 --phrase lighthouse
//! ```
//!
//! Replay an exact layout with a wandering bot and debug logging:
//!
//! ```sh
//! RUST_LOG=jigsaw_game=debug cargo run --bin jigsaw-sim -- --strategy wander \
//!     --seed 0f1e2d3c4b5a69788796a5b4c3d2e1f00f1e2d3c4b5a69788796a5b4c3d2e1f0
//! ```

use std::{
    cell::RefCell,
    process,
    rc::Rc,
    time::{Duration, SystemTime},
};

use clap::Parser;
use jigsaw_core::GridSize;
use jigsaw_game::{
    Difficulty, Level, LevelProgress, ManualClock, Session, SessionConfig, SessionEvent,
    format_elapsed,
};
use jigsaw_generator::LayoutSeed;
use rand::SeedableRng;
use rand_pcg::Pcg64;

use self::bot::{Bot, Strategy};

mod bot;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Number of cells along one side of the board.
    #[arg(short, long, value_name = "N", conflicts_with = "difficulty")]
    grid: Option<u8>,

    /// Difficulty preset, used when no grid size is given.
    #[arg(short, long, value_enum, default_value_t = DifficultyArg::Standard)]
    difficulty: DifficultyArg,

    /// Side length of the square board, in points.
    #[arg(long, value_name = "SIZE", default_value_t = 360.0)]
    board_size: f64,

    /// Layout seed as 64 hex digits.
    #[arg(long, value_name = "HEX", conflicts_with = "phrase")]
    seed: Option<LayoutSeed>,

    /// Derive the layout seed from a phrase.
    #[arg(long, value_name = "PHRASE")]
    phrase: Option<String>,

    /// How the bot plays.
    #[arg(short, long, value_enum, default_value_t = Strategy::Greedy)]
    strategy: Strategy,

    /// Number of games to play.
    #[arg(short, long, value_name = "COUNT", default_value_t = 1)]
    runs: u32,

    /// Gestures the bot may perform per game before giving up.
    #[arg(long, value_name = "COUNT", default_value_t = 500)]
    max_gestures: u32,

    /// Simulated time the bot spends on each gesture, in seconds.
    #[arg(long, value_name = "SECS", default_value_t = 3)]
    gesture_secs: u64,

    /// Use the wider snap threshold of the reduced-motion setting.
    #[arg(long)]
    reduce_motion: bool,

    /// Finish games the bot could not solve with auto-complete.
    #[arg(long)]
    auto_complete: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum DifficultyArg {
    Easy,
    Standard,
    Hard,
}

impl From<DifficultyArg> for Difficulty {
    fn from(value: DifficultyArg) -> Self {
        match value {
            DifficultyArg::Easy => Self::Easy,
            DifficultyArg::Standard => Self::Standard,
            DifficultyArg::Hard => Self::Hard,
        }
    }
}

fn main() {
    better_panic::install();
    env_logger::init();

    let args = Args::parse();
    if args.runs == 0 {
        eprintln!("--runs must be at least 1.");
        process::exit(2);
    }
    if !(args.board_size.is_finite() && args.board_size > 0.0) {
        eprintln!("--board-size must be a positive number.");
        process::exit(2);
    }

    let level = match args.grid.map(GridSize::new) {
        Some(Ok(grid_size)) => Level::new(format!("custom-{grid_size}"), grid_size),
        Some(Err(e)) => {
            eprintln!("{e}");
            process::exit(2);
        }
        None => {
            let difficulty = Difficulty::from(args.difficulty);
            Level::with_difficulty(format!("preset-{difficulty}"), difficulty)
        }
    };

    let clock = ManualClock::default();
    let mut session = Session::with_clock(
        clock.clone(),
        SessionConfig::with_reduced_motion(args.reduce_motion),
    );
    let mut progress = LevelProgress::new(level.id.clone());
    let completions = Rc::new(RefCell::new(Vec::new()));
    session.subscribe({
        let completions = Rc::clone(&completions);
        move |event: &SessionEvent| {
            if let SessionEvent::Completed(completion) = event {
                completions
                    .borrow_mut()
                    .push((completion.clone(), SystemTime::now()));
            }
        }
    });

    println!(
        "Level: {} ({}x{}, {} pieces)",
        level.id,
        level.grid_size,
        level.grid_size,
        level.piece_count()
    );
    println!("Strategy: {:?}", args.strategy);

    let gesture_time = Duration::from_secs(args.gesture_secs);
    for run in 0..args.runs {
        let seed = run_seed(&args, run);
        session.start_game_with_seed(level.clone(), args.board_size, seed);

        let rng = Pcg64::from_seed(*LayoutSeed::from_phrase(&format!("bot-{seed}")).as_bytes());
        let mut bot = Bot::new(args.strategy, rng, args.max_gestures);
        let report = bot.play(&mut session, |session| {
            clock.advance(gesture_time);
            session.update_timer();
        });

        if !session.is_completed() && args.auto_complete {
            log::info!("run {run}: auto-completing after {} gestures", report.gestures);
            session.auto_complete_game();
        }

        let status = if session.is_completed() {
            "solved"
        } else {
            "unsolved"
        };
        println!(
            "Run {}: {status} in {} with {} moves ({} gestures, {}/{} locked), seed {seed}",
            run + 1,
            format_elapsed(session.elapsed()),
            session.move_count(),
            report.gestures,
            session.locked_count(),
            session.pieces().len(),
        );
        session.end_game();
    }

    for (completion, played_at) in completions.borrow().iter() {
        let outcome = progress.record(completion, *played_at);
        log::debug!("recorded {completion:?}: {outcome:?}");
    }

    println!("Completed: {}/{}", progress.plays, args.runs);
    if let Some(best_time) = progress.best_time {
        println!("Best time: {}", format_elapsed(best_time));
    }
    if let Some(best_moves) = progress.best_moves {
        println!("Best moves: {best_moves}");
    }
}

fn run_seed(args: &Args, run: u32) -> LayoutSeed {
    let base = match (&args.seed, &args.phrase) {
        (Some(seed), _) => *seed,
        (None, Some(phrase)) => LayoutSeed::from_phrase(phrase),
        (None, None) => return LayoutSeed::random(),
    };
    if run == 0 {
        base
    } else {
        LayoutSeed::from_phrase(&format!("{base}-{run}"))
    }
}
