//! Samples many layouts and reports how often pieces start pre-solved.
//!
//! The corrective pass is best-effort, so this example is a quick way to check
//! how rare pre-solved starts are for a given grid and parameter set.
//!
//! # Usage
//!
//! ```sh
//! cargo run --example shuffle_stats
//! ```
//!
//! Sample a harder grid with a larger budget:
//!
//! ```sh
//! cargo run --example shuffle_stats -- --grid 6 --samples 100000
//! ```
//!
//! Use reproducible seeds derived from a phrase prefix:
//!
//! ```sh
//! cargo run --example shuffle_stats -- --phrase nightly
//! ```

use std::process;

use clap::Parser;
use jigsaw_core::{BoardGeometry, GridSize};
use jigsaw_generator::{
    DEFAULT_JITTER_FACTOR, DEFAULT_PRESOLVED_FACTOR, LayoutGenerator, LayoutParams, LayoutSeed,
};
use rayon::prelude::*;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Number of cells along one side of the board.
    #[arg(short, long, value_name = "N", default_value_t = 3)]
    grid: u8,

    /// Number of layouts to sample.
    #[arg(long, value_name = "COUNT", default_value_t = 10_000)]
    samples: usize,

    /// Maximum jitter per axis, as a fraction of the cell side.
    #[arg(long, value_name = "FACTOR", default_value_t = DEFAULT_JITTER_FACTOR)]
    jitter: f64,

    /// Pre-solved distance, as a fraction of the cell side.
    #[arg(long, value_name = "FACTOR", default_value_t = DEFAULT_PRESOLVED_FACTOR)]
    presolved: f64,

    /// Derive seeds as `<PHRASE>-<i>` instead of sampling random ones.
    #[arg(long, value_name = "PHRASE")]
    phrase: Option<String>,
}

fn main() {
    let args = Args::parse();
    let grid_size = match GridSize::new(args.grid) {
        Ok(grid_size) => grid_size,
        Err(e) => {
            eprintln!("{e}");
            process::exit(2);
        }
    };
    if args.samples == 0 {
        eprintln!("--samples must be at least 1.");
        process::exit(2);
    }

    let board = BoardGeometry::new(f64::from(grid_size.get()) * 100.0, grid_size);
    let generator = LayoutGenerator::new(LayoutParams {
        jitter_factor: args.jitter,
        presolved_factor: args.presolved,
    });

    let counts = (0..args.samples)
        .into_par_iter()
        .map(|i| {
            let seed = match &args.phrase {
                Some(phrase) => LayoutSeed::from_phrase(&format!("{phrase}-{i}")),
                None => LayoutSeed::random(),
            };
            generator
                .generate_with_seed(&board, seed)
                .presolved_count(&board, args.presolved)
        })
        .collect::<Vec<_>>();

    let affected = counts.iter().filter(|&&count| count > 0).count();
    let total = counts.iter().sum::<usize>();
    let worst = counts.iter().copied().max().unwrap_or_default();

    println!("Grid: {grid_size}x{grid_size}");
    println!("Samples: {}", args.samples);
    println!("Layouts with pre-solved pieces: {affected}");
    println!("Pre-solved pieces in total: {total}");
    println!("Worst layout: {worst} pre-solved piece(s)");
}
