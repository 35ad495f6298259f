//! Core application state and logic for the grid editor.

use std::sync::Arc;

use color_eyre::eyre::Result;
use log::{debug, info, warn};
use ratatui::DefaultTerminal;
use tokio::sync::{watch, Mutex};

use crate::{
    config::Cli,
    events,
    grid::{Coord, Direction, Grid},
    playback::{PlaybackOptions, Player, SnapshotSink},
    search::{self, Algorithm},
    types::{Status, Tool},
    ui,
};

/// Application state container for the grid editor.
///
/// This structure holds the state of the application, which is to say the structure from which
/// Ratatui renders the board and Crossterm events write to. It plays the editing collaborator of
/// the search core: every grid mutation it performs goes through the grid's own mutators.
pub struct App {
    /// Application exit flag.
    ///
    /// This field indicates whether the application should exit. It is set to `true` when the user
    /// wants to quit but it starts off `false`.
    pub(crate) exit: bool,
    /// Snapshot of the grid drawn on screen.
    ///
    /// This field holds the last frame published by a playback or the grid state right after an
    /// edit, so drawing never waits on the grid lock.
    pub(crate) frame: Grid,
    /// Frames published by the active playback.
    pub(crate) frames: Option<watch::Receiver<Grid>>,
    /// Cell the next placement applies to.
    pub(crate) cursor: Coord,
    /// Placement tool currently selected.
    pub(crate) tool: Tool,
    /// Algorithm run on `Enter`.
    pub(crate) algorithm: Algorithm,
    /// Playback timing.
    pub(crate) options: PlaybackOptions,
    /// Message shown in the status block.
    pub(crate) status: Status,
    /// Owner of the shared grid and of the single active playback.
    pub(crate) player: Player,
}

impl Default for App {
    fn default() -> Self {
        Self::new(
            Grid::new(20, 20),
            Algorithm::default(),
            PlaybackOptions::default(),
        )
    }
}

impl App {
    /// Creates an application editing `grid`.
    pub fn new(grid: Grid, algorithm: Algorithm, options: PlaybackOptions) -> Self {
        Self {
            exit: false,
            frame: grid.clone(),
            frames: None,
            cursor: Coord::new(0, 0),
            tool: Tool::default(),
            algorithm,
            options,
            status: Status::default(),
            player: Player::new(Arc::new(Mutex::new(grid))),
        }
    }

    /// Creates an application from command-line flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial grid cannot be built.
    pub fn from_config(cli: &Cli) -> Result<Self> {
        Ok(Self::new(cli.grid()?, cli.algorithm, cli.playback_options()))
    }

    /// Runs the main loop of the application.
    ///
    /// This function handles user input and redraws the board until the exit condition is `true`,
    /// after which any running playback is cancelled and the function returns to the call site.
    ///
    /// # Errors
    ///
    /// - [`std::io::Error`]
    /// - [`crate::playback::PlaybackError`]
    pub async fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        info!(
            "editing a {}x{} grid with {}",
            self.frame.rows(),
            self.frame.cols(),
            self.algorithm.pathfinder().name()
        );

        while !self.exit {
            self.refresh().await?;
            let _ = terminal.try_draw(|frame| ui::draw(self, frame).map_err(std::io::Error::other))?;
            events::handle_events(self).await?;
        }

        let _ = self.player.cancel().await?;
        Ok(())
    }

    /// Pulls the latest playback frame and collects a finished playback's outcome.
    pub(crate) async fn refresh(&mut self) -> Result<()> {
        if let Some(frames) = self.frames.as_mut() {
            if frames.has_changed().unwrap_or(false) {
                self.frame = frames.borrow_and_update().clone();
            }
        }

        if let Some(outcome) = self.player.reap().await? {
            debug!("playback ended with {outcome:?}");
            self.status = Status::from(outcome);
            self.frames = None;
            self.sync_frame().await;
        }

        Ok(())
    }

    /// Copies the shared grid into the drawn frame.
    async fn sync_frame(&mut self) {
        self.frame = self.player.grid().lock().await.clone();
    }

    /// Moves the cursor one cell, staying inside the grid.
    pub(crate) fn move_cursor(&mut self, direction: Direction) {
        if let Some(next) = self.frame.step(self.cursor, direction) {
            self.cursor = next;
        }
    }

    /// Cancels any playback and clears search highlights before an edit.
    async fn prepare_edit(&mut self) -> Result<()> {
        if let Some(outcome) = self.player.cancel().await? {
            debug!("edit interrupted playback: {outcome:?}");
        }
        self.frames = None;
        self.player.grid().lock().await.reset_search_state();
        Ok(())
    }

    /// Applies the selected tool at the cursor.
    pub(crate) async fn apply_tool(&mut self) -> Result<()> {
        self.prepare_edit().await?;

        let mut grid = self.player.grid().lock().await;
        let changed = match self.tool {
            Tool::Wall => grid.toggle_wall(self.cursor),
            tool => grid.set_role(self.cursor, tool.role()),
        };
        self.status = if changed {
            Status::Ready
        } else {
            Status::Rejected(format!(
                "Cannot place {} at {}",
                self.tool.repr(),
                self.cursor
            ))
        };
        self.frame = grid.clone();

        Ok(())
    }

    /// Searches the grid and starts replaying the result.
    ///
    /// The search runs on a grid whose search state was just reset, and the state is reset again
    /// afterwards so the playback starts from a clean board.
    pub(crate) async fn run_algorithm(&mut self) -> Result<()> {
        self.prepare_edit().await?;

        let pathfinder = self.algorithm.pathfinder();
        let searched = {
            let mut grid = self.player.grid().lock().await;
            let searched = search::endpoints(&grid)
                .and_then(|(start, end)| pathfinder.search(&mut grid, start, end));
            grid.reset_search_state();
            self.frame = grid.clone();
            searched
        };

        let result = match searched {
            Ok(result) => result,
            Err(err) => {
                warn!("search rejected: {err}");
                self.status = Status::Rejected(format!("Cannot search: {err}"));
                return Ok(());
            }
        };
        info!(
            "{} finalized {} cells, path of {} cells",
            pathfinder.name(),
            result.visited.len(),
            result.path.len()
        );

        let (frames, receiver) = watch::channel(self.frame.clone());
        let _ = self
            .player
            .play(result, SnapshotSink::new(frames), self.options)
            .await?;
        self.frames = Some(receiver);
        self.status = Status::Playing;

        Ok(())
    }

    /// Stops the active playback, keeping its highlights.
    pub(crate) async fn cancel_playback(&mut self) -> Result<()> {
        if let Some(outcome) = self.player.cancel().await? {
            self.status = Status::from(outcome);
        }
        self.frames = None;
        self.sync_frame().await;
        Ok(())
    }

    /// Removes search highlights, keeping roles and walls.
    pub(crate) async fn clear_search(&mut self) -> Result<()> {
        self.prepare_edit().await?;
        self.status = Status::Ready;
        self.sync_frame().await;
        Ok(())
    }

    /// Returns every cell to its default state.
    pub(crate) async fn reset_grid(&mut self) -> Result<()> {
        self.prepare_edit().await?;
        self.player.grid().lock().await.reset();
        self.status = Status::Ready;
        self.sync_frame().await;
        Ok(())
    }
}
