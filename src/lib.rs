//! Interactive shortest-path visualizer for 4-connected grids.
//!
//! The library is split into a search core and a terminal host:
//!
//! - [`grid`] holds the cell arena with its role invariants and transient search state.
//! - [`search`] runs a shortest-path algorithm over a grid and returns the visitation trace and
//!   the reconstructed path.
//! - [`playback`] replays a search result frame by frame as a cancellable asynchronous task.
//! - [`App`] is the terminal editor that places endpoints and walls, runs searches and draws the
//!   frames playback produces.

#![expect(
    clippy::cargo_common_metadata,
    reason = "Temporary allow during development."
)]

mod app;
pub mod config;
mod events;
pub mod grid;
pub mod logging;
pub mod playback;
pub mod search;
mod types;
mod ui;

pub use app::App;
