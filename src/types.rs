//! Type definitions and enums for the editor state and status reporting.

use ratatui::style::Color;

use crate::{
    grid::{Cell, Role},
    playback::PlaybackOutcome,
};

/// Placement tools available to the editor.
///
/// This enumeration holds the role the editor places when the user applies the tool at the
/// cursor. It replaces any ambient "what am I placing" flags with one explicit value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum Tool {
    /// Places the start cell, moving it if one exists.
    #[default]
    Start,
    /// Places the end cell, moving it if one exists.
    End,
    /// Toggles walls.
    Wall,
}

impl Tool {
    /// Returns the display name of the tool.
    pub(crate) const fn repr(self) -> &'static str {
        match self {
            Self::Start => "Start",
            Self::End => "End",
            Self::Wall => "Wall",
        }
    }

    /// Returns the tool following this one when cycling.
    pub(crate) const fn next(self) -> Self {
        match self {
            Self::Start => Self::End,
            Self::End => Self::Wall,
            Self::Wall => Self::Start,
        }
    }

    /// Returns the role the tool places.
    pub(crate) const fn role(self) -> Role {
        match self {
            Self::Start => Role::Start,
            Self::End => Role::End,
            Self::Wall => Role::Wall,
        }
    }
}

/// Visual class of a cell on the board.
///
/// The declaration order is the painting order, so later classes are drawn over earlier ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Shade {
    /// Wall cell.
    Wall,
    /// Cell finalized by the search.
    Visited,
    /// Cell on the shortest path.
    Path,
    /// End cell.
    End,
    /// Start cell.
    Start,
}

impl Shade {
    /// All shades, in painting order.
    pub(crate) const ALL: [Self; 5] = [
        Self::Wall,
        Self::Visited,
        Self::Path,
        Self::End,
        Self::Start,
    ];

    /// Returns the shade a cell is painted with, if any.
    ///
    /// Roles win over search state, and the path wins over the trace.
    pub(crate) const fn of(cell: &Cell) -> Option<Self> {
        match cell.role {
            Role::Start => Some(Self::Start),
            Role::End => Some(Self::End),
            _ if cell.on_path => Some(Self::Path),
            _ if cell.visited => Some(Self::Visited),
            Role::Wall => Some(Self::Wall),
            Role::None => None,
        }
    }

    /// Returns the terminal color of the shade.
    pub(crate) const fn color(self) -> Color {
        match self {
            Self::Wall => Color::DarkGray,
            Self::Visited => Color::LightBlue,
            Self::Path => Color::Yellow,
            Self::End => Color::Red,
            Self::Start => Color::Green,
        }
    }
}

/// Message shown in the status block.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum Status {
    /// Nothing to report.
    #[default]
    Ready,
    /// A playback is running.
    Playing,
    /// The last playback highlighted a path of this many cells.
    Found(usize),
    /// The last playback finished without a path.
    Unreachable,
    /// The last playback was cancelled.
    Cancelled,
    /// The last request was rejected.
    Rejected(String),
}

impl Status {
    /// Returns the text of the status line.
    pub(crate) fn message(&self) -> String {
        match self {
            Self::Ready => "Ready".to_owned(),
            Self::Playing => "Searching...".to_owned(),
            Self::Found(cells) => format!(
                "Path found: {cells} cells, {} steps",
                cells.saturating_sub(1)
            ),
            Self::Unreachable => "You shall not pass! The end is unreachable.".to_owned(),
            Self::Cancelled => "Playback cancelled".to_owned(),
            Self::Rejected(reason) => reason.clone(),
        }
    }

    /// Returns the color of the status line.
    pub(crate) const fn color(&self) -> Color {
        match self {
            Self::Ready | Self::Playing => Color::Green,
            Self::Found(_) => Color::Yellow,
            Self::Unreachable | Self::Rejected(_) => Color::Red,
            Self::Cancelled => Color::Gray,
        }
    }
}

impl From<PlaybackOutcome> for Status {
    fn from(outcome: PlaybackOutcome) -> Self {
        match outcome {
            PlaybackOutcome::Completed { path, .. } => Self::Found(path),
            PlaybackOutcome::Unreachable { .. } => Self::Unreachable,
            PlaybackOutcome::Cancelled { .. } => Self::Cancelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_cycle() {
        let mut tool = Tool::default();
        let mut seen = Vec::new();
        for _ in 0..3 {
            seen.push(tool);
            tool = tool.next();
        }

        assert_eq!(seen, vec![Tool::Start, Tool::End, Tool::Wall]);
        assert_eq!(tool, Tool::Start, "cycling wraps around");
    }

    #[test]
    fn test_tool_roles_and_names() {
        assert_eq!(Tool::Start.role(), Role::Start);
        assert_eq!(Tool::End.role(), Role::End);
        assert_eq!(Tool::Wall.role(), Role::Wall);
        assert_eq!(Tool::Wall.repr(), "Wall");
    }

    #[test]
    fn test_shade_priority() {
        let mut cell = Cell::default();
        assert_eq!(Shade::of(&cell), None);

        cell.visited = true;
        assert_eq!(Shade::of(&cell), Some(Shade::Visited));

        cell.on_path = true;
        assert_eq!(Shade::of(&cell), Some(Shade::Path));

        cell.role = Role::Start;
        assert_eq!(Shade::of(&cell), Some(Shade::Start), "roles win over search state");

        let wall = Cell {
            role: Role::Wall,
            ..Cell::default()
        };
        assert_eq!(Shade::of(&wall), Some(Shade::Wall));
    }

    #[test]
    fn test_status_from_outcome() {
        assert_eq!(
            Status::from(PlaybackOutcome::Completed {
                visited: 9,
                path: 5
            }),
            Status::Found(5)
        );
        assert_eq!(
            Status::from(PlaybackOutcome::Unreachable { visited: 3 }),
            Status::Unreachable
        );
        assert_eq!(
            Status::from(PlaybackOutcome::Cancelled {
                visited: 1,
                path: 0
            }),
            Status::Cancelled
        );
    }

    #[test]
    fn test_status_messages() {
        assert_eq!(Status::Found(5).message(), "Path found: 5 cells, 4 steps");
        assert_eq!(Status::Rejected("nope".to_owned()).message(), "nope");
        assert_eq!(Status::Unreachable.color(), Color::Red);
    }
}
