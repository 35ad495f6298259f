//! Command-line configuration module.
//!
//! This module contains the flags the binary accepts and the built-in demo layout.

use std::path::PathBuf;

use clap::Parser;

use crate::{
    grid::{Grid, GridParseError},
    playback::{PlaybackOptions, DEFAULT_PATH_DELAY_MS, DEFAULT_VISIT_DELAY_MS},
    search::Algorithm,
};

/// Default number of grid rows and columns.
pub const DEFAULT_GRID_SIZE: u16 = 40;

/// Command-line arguments of the visualizer.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    /// Number of grid rows.
    #[arg(long, default_value_t = DEFAULT_GRID_SIZE, value_parser = clap::value_parser!(u16).range(1..=200))]
    pub rows: u16,
    /// Number of grid columns.
    #[arg(long, default_value_t = DEFAULT_GRID_SIZE, value_parser = clap::value_parser!(u16).range(1..=200))]
    pub cols: u16,
    /// Delay after each visited cell during playback, in milliseconds.
    #[arg(long, default_value_t = DEFAULT_VISIT_DELAY_MS)]
    pub visit_delay_ms: u64,
    /// Delay after each path cell during playback, in milliseconds.
    #[arg(long, default_value_t = DEFAULT_PATH_DELAY_MS)]
    pub path_delay_ms: u64,
    /// Search algorithm to visualize.
    #[arg(long, value_enum, default_value_t = Algorithm::Dijkstra)]
    pub algorithm: Algorithm,
    /// Start from the built-in demo layout instead of an empty grid.
    #[arg(long)]
    pub demo: bool,
    /// Write logs to this file; logging is off without it.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Returns the playback timing selected on the command line.
    #[must_use]
    pub const fn playback_options(&self) -> PlaybackOptions {
        PlaybackOptions::from_millis(self.visit_delay_ms, self.path_delay_ms)
    }

    /// Builds the initial grid.
    ///
    /// # Errors
    ///
    /// Returns a [`GridParseError`] if the demo layout fails to parse.
    pub fn grid(&self) -> Result<Grid, GridParseError> {
        if self.demo {
            DEMO_LAYOUT.parse()
        } else {
            Ok(Grid::new(self.rows.into(), self.cols.into()))
        }
    }
}

/// Layout loaded by `--demo`.
const DEMO_LAYOUT: &str = "
    ..............................
    .S.......#..........#.........
    .........#..........#.........
    .........#...####...#.........
    .........#......#...#.........
    .........#......#...#.........
    ..######.#......#...#######...
    .......#.#......#.............
    .......#........#.............
    .......#######..#..#######....
    ................#........#....
    ....#############........#....
    .........................#..E.
    .........................#....
    ..............................
";
