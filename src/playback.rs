//! Playback controller module.
//!
//! This module replays a [`SearchResult`] onto a shared [`Grid`] as a timed sequence of frames. The
//! replay runs in two phases, first the visitation trace and then the shortest path, and is
//! exposed as a cancellable task whose cancellation is honored between steps.

#![expect(
    clippy::module_name_repetitions,
    reason = "Playback types are named after the operation they describe."
)]

use std::{sync::Arc, time::Duration};

use log::{info, warn};
use thiserror::Error;
use tokio::{
    sync::{watch, Mutex},
    task::{JoinError, JoinHandle},
    time,
};

use crate::{
    grid::{Coord, Grid},
    search::SearchResult,
};

/// Default delay after each visited cell, in milliseconds.
pub const DEFAULT_VISIT_DELAY_MS: u64 = 10;

/// Default delay after each path cell, in milliseconds.
pub const DEFAULT_PATH_DELAY_MS: u64 = 30;

/// Grid shared between the editor and an active playback.
pub type SharedGrid = Arc<Mutex<Grid>>;

/// Timing of a playback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaybackOptions {
    /// Pause after highlighting each visited cell.
    pub visit_step_delay: Duration,
    /// Pause after highlighting each path cell.
    pub path_step_delay: Duration,
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self::from_millis(DEFAULT_VISIT_DELAY_MS, DEFAULT_PATH_DELAY_MS)
    }
}

impl PlaybackOptions {
    /// Builds options from per-phase delays in milliseconds.
    #[must_use]
    pub const fn from_millis(visit_step_delay: u64, path_step_delay: u64) -> Self {
        Self {
            visit_step_delay: Duration::from_millis(visit_step_delay),
            path_step_delay: Duration::from_millis(path_step_delay),
        }
    }

    /// Returns how long a complete playback of `result` takes.
    #[must_use]
    pub fn duration(&self, result: &SearchResult) -> Duration {
        let visited = u32::try_from(result.visited.len()).unwrap_or(u32::MAX);
        let path = u32::try_from(result.path.len()).unwrap_or(u32::MAX);
        self.visit_step_delay
            .saturating_mul(visited)
            .saturating_add(self.path_step_delay.saturating_mul(path))
    }
}

/// Phase of a playback.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    /// Nothing has been replayed yet.
    #[default]
    Idle,
    /// Replaying the visitation trace.
    PlayingVisited,
    /// Replaying the shortest path.
    PlayingPath,
    /// Every step was replayed.
    Done,
    /// Stopped early on request.
    Cancelled,
}

impl PlaybackState {
    /// Returns whether no further steps will be replayed.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Cancelled)
    }
}

/// One frame's worth of grid mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Highlight a cell of the visitation trace.
    Visit(Coord),
    /// Highlight a cell of the shortest path.
    Path(Coord),
}

impl Step {
    /// Returns the cell the step highlights.
    #[must_use]
    pub const fn coord(self) -> Coord {
        match self {
            Self::Visit(coord) | Self::Path(coord) => coord,
        }
    }

    /// Applies the step to a grid, returning whether the cell was inside it.
    pub fn apply(self, grid: &mut Grid) -> bool {
        match self {
            Self::Visit(coord) => grid.mark_visited(coord),
            Self::Path(coord) => grid.mark_path(coord),
        }
    }

    /// Returns the pause that follows this step.
    #[must_use]
    pub const fn delay(self, options: &PlaybackOptions) -> Duration {
        match self {
            Self::Visit(_) => options.visit_step_delay,
            Self::Path(_) => options.path_step_delay,
        }
    }
}

/// Lazy, restartable sequence of playback steps.
///
/// The sequence walks the state machine `Idle -> PlayingVisited -> PlayingPath -> Done`, skipping
/// `PlayingPath` when the result holds no path.
#[derive(Clone, Debug)]
pub struct Steps {
    /// Result being replayed.
    result: SearchResult,
    /// Current phase.
    state: PlaybackState,
    /// Position within the current phase's cells.
    cursor: usize,
}

impl Steps {
    /// Starts a sequence over a search result.
    #[must_use]
    pub const fn new(result: SearchResult) -> Self {
        Self {
            result,
            state: PlaybackState::Idle,
            cursor: 0,
        }
    }

    /// Returns the phase of the most recently produced step.
    #[must_use]
    pub const fn state(&self) -> PlaybackState {
        self.state
    }

    /// Returns the result being replayed.
    #[must_use]
    pub const fn result(&self) -> &SearchResult {
        &self.result
    }

    /// Rewinds the sequence to its first step.
    pub fn restart(&mut self) {
        self.state = PlaybackState::Idle;
        self.cursor = 0;
    }

    /// Stops the sequence unless it already finished.
    pub fn cancel(&mut self) {
        if !self.state.is_terminal() {
            self.state = PlaybackState::Cancelled;
        }
    }
}

impl Iterator for Steps {
    type Item = Step;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.state {
                PlaybackState::Idle => {
                    self.state = PlaybackState::PlayingVisited;
                    self.cursor = 0;
                }
                PlaybackState::PlayingVisited => {
                    if let Some(&coord) = self.result.visited.get(self.cursor) {
                        self.cursor += 1;
                        return Some(Step::Visit(coord));
                    }
                    self.cursor = 0;
                    self.state = if self.result.path.is_empty() {
                        PlaybackState::Done
                    } else {
                        PlaybackState::PlayingPath
                    };
                }
                PlaybackState::PlayingPath => {
                    if let Some(&coord) = self.result.path.get(self.cursor) {
                        self.cursor += 1;
                        return Some(Step::Path(coord));
                    }
                    self.state = PlaybackState::Done;
                }
                PlaybackState::Done | PlaybackState::Cancelled => return None,
            }
        }
    }
}

/// Failure reported by a render sink.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("render sink failed: {0}")]
pub struct RenderError(pub String);

/// Destination of playback frames.
///
/// A sink draws the grid's current per-cell flags and must not call back into the controller.
pub trait RenderSink {
    /// Draws one frame.
    ///
    /// # Errors
    ///
    /// Returns a [`RenderError`] when the frame cannot be drawn; playback stops with it.
    fn render(&mut self, grid: &Grid) -> Result<(), RenderError>;
}

impl<F> RenderSink for F
where
    F: FnMut(&Grid) -> Result<(), RenderError>,
{
    fn render(&mut self, grid: &Grid) -> Result<(), RenderError> {
        self(grid)
    }
}

/// Sink publishing a snapshot of every frame on a watch channel.
#[derive(Debug)]
pub struct SnapshotSink {
    /// Channel the latest frame is published on.
    frames: watch::Sender<Grid>,
}

impl SnapshotSink {
    /// Wraps the sending half of a frame channel.
    #[must_use]
    pub const fn new(frames: watch::Sender<Grid>) -> Self {
        Self { frames }
    }
}

impl RenderSink for SnapshotSink {
    fn render(&mut self, grid: &Grid) -> Result<(), RenderError> {
        self.frames
            .send(grid.clone())
            .map_err(|err| RenderError(err.to_string()))
    }
}

/// Errors ending a playback abnormally.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The sink failed to draw a frame.
    #[error(transparent)]
    Render(#[from] RenderError),
    /// The playback task panicked or was aborted.
    #[error("playback task failed: {0}")]
    Task(#[from] JoinError),
}

/// How a playback ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackOutcome {
    /// Both phases were replayed.
    Completed {
        /// Number of visited cells highlighted.
        visited: usize,
        /// Number of path cells highlighted.
        path: usize,
    },
    /// The trace was replayed and no path exists.
    Unreachable {
        /// Number of visited cells highlighted.
        visited: usize,
    },
    /// Playback stopped on request.
    Cancelled {
        /// Number of visited cells highlighted before stopping.
        visited: usize,
        /// Number of path cells highlighted before stopping.
        path: usize,
    },
}

impl PlaybackOutcome {
    /// Returns the terminal state matching the outcome.
    #[must_use]
    pub const fn state(self) -> PlaybackState {
        match self {
            Self::Completed { .. } | Self::Unreachable { .. } => PlaybackState::Done,
            Self::Cancelled { .. } => PlaybackState::Cancelled,
        }
    }
}

/// Handle to a running playback.
///
/// Dropping the handle requests cancellation, so a playback never outlives its owner by more than
/// one step.
#[derive(Debug)]
pub struct PlaybackHandle {
    /// Cancellation flag observed by the task between steps.
    cancel: watch::Sender<bool>,
    /// Phase published by the task.
    state: watch::Receiver<PlaybackState>,
    /// The running task.
    task: JoinHandle<Result<PlaybackOutcome, PlaybackError>>,
}

impl PlaybackHandle {
    /// Requests cancellation at the next suspension point.
    pub fn cancel(&self) {
        let _ = self.cancel.send_replace(true);
    }

    /// Returns the phase the playback is in.
    #[must_use]
    pub fn state(&self) -> PlaybackState {
        *self.state.borrow()
    }

    /// Returns whether the task has ended.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Waits for the playback to end.
    ///
    /// # Errors
    ///
    /// Returns a [`PlaybackError`] if the sink failed or the task did not run to completion.
    pub async fn join(self) -> Result<PlaybackOutcome, PlaybackError> {
        let Self { cancel, task, .. } = self;
        let outcome = task.await?;
        drop(cancel);
        outcome
    }
}

/// Starts replaying `result` onto `grid`, drawing each step through `sink`.
///
/// The grid's search state should be reset beforehand; every step sets a flag on it and then
/// renders while holding the grid lock.
///
/// # Panics
///
/// Panics when called outside a Tokio runtime.
pub fn play<S>(
    grid: SharedGrid,
    result: SearchResult,
    sink: S,
    options: PlaybackOptions,
) -> PlaybackHandle
where
    S: RenderSink + Send + 'static,
{
    let (cancel, cancel_rx) = watch::channel(false);
    let (state_tx, state) = watch::channel(PlaybackState::Idle);
    let task = tokio::spawn(drive(
        grid,
        Steps::new(result),
        sink,
        options,
        cancel_rx,
        state_tx,
    ));

    PlaybackHandle {
        cancel,
        state,
        task,
    }
}

/// Highlight counters of a running playback.
#[derive(Clone, Copy, Debug, Default)]
struct Progress {
    /// Visited cells highlighted.
    visited: usize,
    /// Path cells highlighted.
    path: usize,
}

impl Progress {
    /// Counts one applied step.
    fn record(&mut self, step: Step) {
        match step {
            Step::Visit(_) => self.visited += 1,
            Step::Path(_) => self.path += 1,
        }
    }

    /// Builds the cancellation outcome.
    const fn cancelled(self) -> PlaybackOutcome {
        PlaybackOutcome::Cancelled {
            visited: self.visited,
            path: self.path,
        }
    }
}

/// Runs a playback to completion or cancellation.
async fn drive<S: RenderSink>(
    grid: SharedGrid,
    mut steps: Steps,
    mut sink: S,
    options: PlaybackOptions,
    mut cancel: watch::Receiver<bool>,
    state: watch::Sender<PlaybackState>,
) -> Result<PlaybackOutcome, PlaybackError> {
    info!(
        "playback started: {} visited, {} path cells",
        steps.result().visited.len(),
        steps.result().path.len()
    );

    let mut progress = Progress::default();
    while let Some(step) = steps.next() {
        let _ = state.send_replace(steps.state());
        if is_cancelled(&cancel) {
            return Ok(stop(&mut steps, &state, progress));
        }

        {
            let mut grid = grid.lock().await;
            let _ = step.apply(&mut grid);
            if let Err(err) = sink.render(&grid) {
                warn!("playback stopped, {err}");
                steps.cancel();
                let _ = state.send_replace(steps.state());
                return Err(err.into());
            }
        }
        progress.record(step);

        if suspend(&mut cancel, step.delay(&options)).await {
            return Ok(stop(&mut steps, &state, progress));
        }
    }

    let _ = state.send_replace(steps.state());
    let outcome = if steps.result().is_unreachable() {
        warn!("playback finished, the end cell is unreachable");
        PlaybackOutcome::Unreachable {
            visited: progress.visited,
        }
    } else {
        info!("playback finished, path of {} cells", progress.path);
        PlaybackOutcome::Completed {
            visited: progress.visited,
            path: progress.path,
        }
    };
    Ok(outcome)
}

/// Moves a playback into its cancelled state.
fn stop(
    steps: &mut Steps,
    state: &watch::Sender<PlaybackState>,
    progress: Progress,
) -> PlaybackOutcome {
    steps.cancel();
    let _ = state.send_replace(steps.state());
    info!(
        "playback cancelled after {} visited and {} path cells",
        progress.visited, progress.path
    );
    progress.cancelled()
}

/// Returns whether cancellation was requested or the handle is gone.
fn is_cancelled(cancel: &watch::Receiver<bool>) -> bool {
    *cancel.borrow() || cancel.has_changed().is_err()
}

/// Sleeps for `delay`, returning early with `true` if cancellation is requested meanwhile.
async fn suspend(cancel: &mut watch::Receiver<bool>, delay: Duration) -> bool {
    let woken = time::timeout(delay, cancel.wait_for(|cancelled| *cancelled)).await;
    woken.is_ok()
}

/// Owner of the single playback allowed against a grid.
///
/// Starting a playback while another is active cancels the active one and waits for it to stop
/// before the new one touches the grid.
#[derive(Debug)]
pub struct Player {
    /// Grid every playback draws on.
    grid: SharedGrid,
    /// Playback currently owned, finished or not.
    active: Option<PlaybackHandle>,
}

impl Player {
    /// Creates a player for a grid.
    #[must_use]
    pub const fn new(grid: SharedGrid) -> Self {
        Self { grid, active: None }
    }

    /// Returns the grid playbacks draw on.
    #[must_use]
    pub const fn grid(&self) -> &SharedGrid {
        &self.grid
    }

    /// Returns the phase of the owned playback, or `Idle` when there is none.
    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.active
            .as_ref()
            .map_or(PlaybackState::Idle, PlaybackHandle::state)
    }

    /// Returns whether a playback is still running.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Starts a playback, cancelling the previous one first.
    ///
    /// Returns how the previous playback ended, if there was one.
    ///
    /// # Errors
    ///
    /// Returns the previous playback's [`PlaybackError`], in which case no new playback starts.
    pub async fn play<S>(
        &mut self,
        result: SearchResult,
        sink: S,
        options: PlaybackOptions,
    ) -> Result<Option<PlaybackOutcome>, PlaybackError>
    where
        S: RenderSink + Send + 'static,
    {
        let previous = self.cancel().await?;
        self.active = Some(play(Arc::clone(&self.grid), result, sink, options));
        Ok(previous)
    }

    /// Cancels the owned playback and waits for it to stop.
    ///
    /// # Errors
    ///
    /// Returns a [`PlaybackError`] if the playback failed.
    pub async fn cancel(&mut self) -> Result<Option<PlaybackOutcome>, PlaybackError> {
        match self.active.take() {
            Some(handle) => {
                handle.cancel();
                handle.join().await.map(Some)
            }
            None => Ok(None),
        }
    }

    /// Collects the owned playback's outcome once it has ended on its own.
    ///
    /// # Errors
    ///
    /// Returns a [`PlaybackError`] if the playback failed.
    pub async fn reap(&mut self) -> Result<Option<PlaybackOutcome>, PlaybackError> {
        match self.active.take() {
            Some(handle) if handle.is_finished() => handle.join().await.map(Some),
            active => {
                self.active = active;
                Ok(None)
            }
        }
    }

    /// Waits for the owned playback to end without cancelling it.
    ///
    /// # Errors
    ///
    /// Returns a [`PlaybackError`] if the playback failed.
    pub async fn finish(&mut self) -> Result<Option<PlaybackOutcome>, PlaybackError> {
        match self.active.take() {
            Some(handle) => handle.join().await.map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex as StdMutex;

    use super::*;
    use crate::search::{endpoints, search};

    /// Searches a layout and returns the reset grid with the result.
    fn prepare(layout: &str) -> (SharedGrid, SearchResult) {
        let mut grid: Grid = layout.parse().expect("layout should parse");
        let (start, end) = endpoints(&grid).expect("layout should have endpoints");
        let result = search(&mut grid, start, end).expect("search should succeed");
        grid.reset_search_state();
        (Arc::new(Mutex::new(grid)), result)
    }

    /// Returns a sink recording every frame as text.
    fn recorder() -> (
        Arc<StdMutex<Vec<String>>>,
        impl FnMut(&Grid) -> Result<(), RenderError> + Send + 'static,
    ) {
        let frames = Arc::new(StdMutex::new(Vec::new()));
        let sink_frames = Arc::clone(&frames);
        let sink = move |grid: &Grid| -> Result<(), RenderError> {
            sink_frames
                .lock()
                .expect("frame log should not be poisoned")
                .push(grid.render_text());
            Ok(())
        };
        (frames, sink)
    }

    fn count(frames: &StdMutex<Vec<String>>) -> usize {
        frames.lock().expect("frame log should not be poisoned").len()
    }

    const OPEN: &str = "
        S.........
        ..........
        ..........
        ..........
        ..........
        ..........
        ..........
        ..........
        ..........
        .........E
    ";

    #[test]
    fn test_steps_replay_visited_then_path() {
        let result = SearchResult {
            visited: vec![Coord::new(0, 0), Coord::new(0, 1)],
            path: vec![Coord::new(0, 0), Coord::new(0, 1)],
        };
        let mut steps = Steps::new(result);

        assert_eq!(steps.state(), PlaybackState::Idle);
        assert_eq!(steps.next(), Some(Step::Visit(Coord::new(0, 0))));
        assert_eq!(steps.state(), PlaybackState::PlayingVisited);
        assert_eq!(steps.next(), Some(Step::Visit(Coord::new(0, 1))));
        assert_eq!(steps.next(), Some(Step::Path(Coord::new(0, 0))));
        assert_eq!(steps.state(), PlaybackState::PlayingPath);
        assert_eq!(steps.next(), Some(Step::Path(Coord::new(0, 1))));
        assert_eq!(steps.next(), None);
        assert_eq!(steps.state(), PlaybackState::Done);
    }

    #[test]
    fn test_steps_skip_path_phase_when_unreachable() {
        let result = SearchResult {
            visited: vec![Coord::new(0, 0)],
            path: Vec::new(),
        };
        let mut steps = Steps::new(result);

        assert_eq!(steps.next(), Some(Step::Visit(Coord::new(0, 0))));
        assert_eq!(steps.next(), None);
        assert_eq!(steps.state(), PlaybackState::Done);
    }

    #[test]
    fn test_steps_restart_and_cancel() {
        let result = SearchResult {
            visited: vec![Coord::new(1, 1)],
            path: vec![Coord::new(1, 1)],
        };
        let mut steps = Steps::new(result);
        let first: Vec<Step> = steps.by_ref().collect();

        steps.restart();
        let second: Vec<Step> = steps.by_ref().collect();
        assert_eq!(first, second, "a restarted sequence replays the same steps");

        steps.restart();
        assert!(steps.next().is_some());
        steps.cancel();
        assert_eq!(steps.state(), PlaybackState::Cancelled);
        assert_eq!(steps.next(), None);
    }

    #[test]
    fn test_options_duration_bound() {
        let options = PlaybackOptions::default();
        let result = SearchResult {
            visited: vec![Coord::new(0, 0); 5],
            path: vec![Coord::new(0, 0); 2],
        };

        assert_eq!(options.visit_step_delay, Duration::from_millis(10));
        assert_eq!(options.path_step_delay, Duration::from_millis(30));
        assert_eq!(options.duration(&result), Duration::from_millis(110));
    }

    #[tokio::test(start_paused = true)]
    async fn test_playback_completes_both_phases() {
        let (grid, result) = prepare(OPEN);
        let (frames, sink) = recorder();
        let options = PlaybackOptions::default();
        let expected = (result.visited.len(), result.path.len());
        let bound = options.duration(&result);
        let started = time::Instant::now();

        let handle = play(Arc::clone(&grid), result, sink, options);
        let outcome = handle.join().await.expect("playback should succeed");

        assert_eq!(
            outcome,
            PlaybackOutcome::Completed {
                visited: expected.0,
                path: expected.1
            }
        );
        assert_eq!(count(&frames), expected.0 + expected.1, "one frame per step");
        assert!(started.elapsed() >= bound, "every step is followed by its delay");

        let grid = grid.lock().await;
        let on_path = grid.cells().filter(|(_, cell)| cell.on_path).count();
        assert_eq!(on_path, expected.1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_playback_reports_unreachable() {
        let (grid, result) = prepare(
            "
            S.#.
            ..#E
            ",
        );
        let (frames, sink) = recorder();

        let handle = play(grid, result, sink, PlaybackOptions::default());
        let outcome = handle.join().await.expect("playback should succeed");

        assert_eq!(outcome, PlaybackOutcome::Unreachable { visited: 4 });
        assert_eq!(outcome.state(), PlaybackState::Done);
        assert_eq!(count(&frames), 4, "no path frames are rendered");
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_visited_phase() {
        let (grid, result) = prepare(OPEN);
        let total = result.visited.len();
        let (frames, sink) = recorder();

        let handle = play(Arc::clone(&grid), result, sink, PlaybackOptions::default());
        time::sleep(Duration::from_millis(35)).await;
        assert_eq!(handle.state(), PlaybackState::PlayingVisited);
        handle.cancel();
        let outcome = handle.join().await.expect("playback should stop cleanly");

        let PlaybackOutcome::Cancelled { visited, path } = outcome else {
            panic!("expected a cancelled outcome, got {outcome:?}");
        };
        assert!(visited > 0 && visited < total, "cancelled mid-trace");
        assert_eq!(path, 0);
        assert_eq!(count(&frames), visited);

        let grid = grid.lock().await;
        assert_eq!(
            grid.cells().filter(|(_, cell)| cell.visited).count(),
            visited,
            "exactly the processed cells stay highlighted"
        );
        assert!(grid.cells().all(|(_, cell)| !cell.on_path));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_the_handle_cancels() {
        let (grid, result) = prepare(OPEN);
        let total = result.visited.len();
        let (frames, sink) = recorder();

        let handle = play(grid, result, sink, PlaybackOptions::default());
        time::sleep(Duration::from_millis(25)).await;
        drop(handle);
        time::sleep(Duration::from_secs(10)).await;

        assert!(count(&frames) < total, "playback stops once its handle is gone");
    }

    #[tokio::test(start_paused = true)]
    async fn test_sink_failure_stops_playback() {
        let (grid, result) = prepare(OPEN);
        let sink = |_: &Grid| -> Result<(), RenderError> { Err(RenderError("closed".to_owned())) };

        let handle = play(grid, result, sink, PlaybackOptions::default());
        let outcome = handle.join().await;

        assert!(matches!(outcome, Err(PlaybackError::Render(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_snapshot_sink_publishes_frames() {
        let (grid, result) = prepare("S.E");
        let (frames, latest) = watch::channel(Grid::new(1, 3));

        let handle = play(grid, result, SnapshotSink::new(frames), PlaybackOptions::default());
        let outcome = handle.join().await.expect("playback should succeed");

        assert_eq!(outcome, PlaybackOutcome::Completed { visited: 3, path: 3 });
        assert_eq!(
            latest.borrow().render_text(),
            "S*E",
            "the last published frame shows the full path"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_player_cancels_the_previous_playback() {
        let (grid, result) = prepare(OPEN);
        let mut player = Player::new(Arc::clone(&grid));
        let (_, first_sink) = recorder();
        let (_, second_sink) = recorder();

        let previous = player
            .play(result.clone(), first_sink, PlaybackOptions::default())
            .await
            .expect("first playback should start");
        assert_eq!(previous, None);
        assert!(player.is_playing());

        time::sleep(Duration::from_millis(15)).await;
        grid.lock().await.reset_search_state();
        let previous = player
            .play(result, second_sink, PlaybackOptions::default())
            .await
            .expect("second playback should start");
        assert!(
            matches!(previous, Some(PlaybackOutcome::Cancelled { .. })),
            "the first playback is cancelled, got {previous:?}"
        );

        let finished = player.finish().await.expect("second playback should succeed");
        assert!(matches!(finished, Some(PlaybackOutcome::Completed { .. })));
        assert_eq!(player.state(), PlaybackState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_player_reaps_finished_playback() {
        let (grid, result) = prepare("SE");
        let mut player = Player::new(grid);
        let (_, sink) = recorder();

        let _previous = player
            .play(result, sink, PlaybackOptions::default())
            .await
            .expect("playback should start");
        assert_eq!(
            player.reap().await.expect("reap should not fail"),
            None,
            "a running playback is not reaped"
        );

        time::sleep(Duration::from_secs(1)).await;
        assert_eq!(player.state(), PlaybackState::Done);
        let reaped = player.reap().await.expect("reap should not fail");
        assert_eq!(reaped, Some(PlaybackOutcome::Completed { visited: 2, path: 2 }));
        assert_eq!(player.cancel().await.expect("nothing to cancel"), None);
    }
}
