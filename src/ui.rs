//! User interface rendering functions for the grid editor.

use color_eyre::eyre::{OptionExt as _, Result};
use ratatui::{
    layout::{Alignment, Constraint, Layout},
    style::{Color, Style},
    symbols::Marker,
    text::Line,
    widgets::{
        canvas::{Canvas, Points},
        Block, BorderType, Clear, Paragraph,
    },
    Frame,
};

use crate::{grid::Coord, types::Shade, App};

/// Key bindings shown under the status block.
const KEY_HINTS: &str =
    "(hjkl) move / (1-3, tab) tool / (space) place / (enter) run / (c) cancel / (x) clear / (r) reset / (q) quit";

/// Renders the whole application screen.
///
/// This function draws the board on top and the status block below it, both computed from the
/// snapshot stored in the [`App`] so the shared grid is never locked while drawing.
///
/// # Errors
///
/// This function may return errors from layout lookups or coordinate conversion failures.
pub(crate) fn draw(app: &App, frame: &mut Frame) -> Result<()> {
    clear(frame);

    let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(4)]).split(frame.area());
    let board_area = *layout
        .first()
        .ok_or_eyre("failed to get board area from layout")?;
    let status_area = *layout
        .last()
        .ok_or_eyre("failed to get status area from layout")?;

    board(app, frame, board_area)?;
    status(app, frame, status_area);

    Ok(())
}

/// Clears the terminal screen by rendering a [`Clear`] widget.
pub(crate) fn clear(frame: &mut Frame) {
    frame.render_widget(Clear, frame.area());
}

/// Renders the grid centered in `area`, one terminal cell per grid cell.
///
/// Cells are painted in [`Shade`] order on separate canvas layers, and the cursor is painted
/// last so it stays visible over every shade.
///
/// # Errors
///
/// This function may return errors if the grid is larger than a terminal can address.
pub(crate) fn board(app: &App, frame: &mut Frame, area: ratatui::layout::Rect) -> Result<()> {
    let rows = app.frame.rows();
    let cols = app.frame.cols();

    let vertical = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(u16::try_from(rows)?),
        Constraint::Min(0),
    ])
    .split(area);
    let row_band = *vertical
        .get(1)
        .ok_or_eyre("failed to get board rows from layout")?;
    let space = *Layout::horizontal([
        Constraint::Min(0),
        Constraint::Length(u16::try_from(cols)?),
        Constraint::Min(0),
    ])
    .split(row_band)
    .get(1)
    .ok_or_eyre("failed to get board space from horizontal layout")?;

    // Pre-compute screen coordinates to handle errors before the paint closure
    let mut layers = Vec::with_capacity(Shade::ALL.len());
    for shade in Shade::ALL {
        let coords: Vec<Coord> = app
            .frame
            .cells()
            .filter_map(|(coord, cell)| (Shade::of(cell) == Some(shade)).then_some(coord))
            .collect();
        layers.push((
            shade.color(),
            grid_to_canvas_coords(&coords, rows, cols)?,
        ));
    }
    let cursor = grid_to_canvas_coords(&[app.cursor], rows, cols)?;

    let canvas = Canvas::default()
        .x_bounds([
            (-rounded_div::i32(space.width.into(), 2)).into(),
            (rounded_div::i32(space.width.into(), 2)).into(),
        ])
        .y_bounds([
            (-rounded_div::i32(space.height.into(), 2)).into(),
            (rounded_div::i32(space.height.into(), 2)).into(),
        ])
        .marker(Marker::Block)
        .paint(|ctx| {
            for (color, coords) in &layers {
                ctx.draw(&Points {
                    coords,
                    color: *color,
                });
                ctx.layer();
            }
            ctx.draw(&Points {
                coords: &cursor,
                color: Color::Magenta,
            });
        });

    frame.render_widget(canvas, space);

    Ok(())
}

/// Renders the status block with the tool, the cursor and the last outcome.
pub(crate) fn status(app: &App, frame: &mut Frame, area: ratatui::layout::Rect) {
    let block = Block::bordered()
        .title(format!(" {} ", app.algorithm.pathfinder().name()))
        .title_bottom(KEY_HINTS)
        .title_alignment(Alignment::Center)
        .style(Style::default().fg(Color::Green))
        .border_type(BorderType::Rounded);

    let lines = vec![
        Line::raw(format!("Tool: {} / Cursor: {}", app.tool.repr(), app.cursor)).centered(),
        Line::styled(app.status.message(), Style::default().fg(app.status.color())).centered(),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Transforms grid coordinates to canvas coordinates.
///
/// This function converts grid coordinates (row, col) to canvas coordinates (x, y) using the
/// centered transformation: y = (rows - 1) / 2 - row, since the canvas y axis grows upwards, and
/// x = col - (cols - 1) / 2.
///
/// # Errors
///
/// This function may return errors from coordinate conversion operations.
pub(crate) fn grid_to_canvas_coords(
    coords: &[Coord],
    rows: usize,
    cols: usize,
) -> Result<Vec<(f64, f64)>> {
    let rows_n = f64::from(u16::try_from(rows)?);
    let cols_n = f64::from(u16::try_from(cols)?);

    coords
        .iter()
        .map(|coord| {
            let canvas_y = (rows_n - 1.) / 2. - f64::from(u16::try_from(coord.row)?);
            let canvas_x = f64::from(u16::try_from(coord.col)?) - (cols_n - 1.) / 2.;

            Ok((canvas_x, canvas_y))
        })
        .collect()
}
