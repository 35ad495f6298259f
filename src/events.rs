//! Event handling functions for user input and application state updates.

use std::time::Duration;

use color_eyre::eyre::Result;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEventKind};
use tokio::time;

use crate::{grid::Direction, types::Tool, App};

/// Pause between two polls of the terminal, in milliseconds.
///
/// This constant bounds how often the board is redrawn while a playback is running, and how long
/// a key press may wait before it is handled.
pub(crate) const TICK_MS: u64 = 16;

/// Handles pending input events and updates the application state accordingly.
///
/// This function drains every event already queued by the terminal without blocking, dispatches
/// key presses to [`handle_key`], and then yields to the runtime for one tick so the playback task
/// can make progress.
pub(crate) async fn handle_events(app: &mut App) -> Result<()> {
    while event::poll(Duration::ZERO)? {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                handle_key(app, key.code).await?;
            }
        }
    }

    time::sleep(Duration::from_millis(TICK_MS)).await;
    Ok(())
}

/// Dispatches one key press.
///
/// Movement uses the `hjkl` keys or the arrows, `1`-`3` and `Tab` pick the placement tool, `Space`
/// applies it, `Enter` runs the search, `c` cancels the playback, `x` clears highlights, `r`
/// resets the grid and `q` quits.
pub(crate) async fn handle_key(app: &mut App, code: KeyCode) -> Result<()> {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => app.exit = true,
        KeyCode::Char('k') | KeyCode::Up => app.move_cursor(Direction::Up),
        KeyCode::Char('j') | KeyCode::Down => app.move_cursor(Direction::Down),
        KeyCode::Char('h') | KeyCode::Left => app.move_cursor(Direction::Left),
        KeyCode::Char('l') | KeyCode::Right => app.move_cursor(Direction::Right),
        KeyCode::Char('1') => app.tool = Tool::Start,
        KeyCode::Char('2') => app.tool = Tool::End,
        KeyCode::Char('3') => app.tool = Tool::Wall,
        KeyCode::Tab => app.tool = app.tool.next(),
        KeyCode::Char(' ') => app.apply_tool().await?,
        KeyCode::Enter => app.run_algorithm().await?,
        KeyCode::Char('c') => app.cancel_playback().await?,
        KeyCode::Char('x') => app.clear_search().await?,
        KeyCode::Char('r') => app.reset_grid().await?,
        _ => {}
    }

    Ok(())
}
