//! Grid model module.
//!
//! This module contains the cell arena the search engine and the playback controller operate on,
//! together with the invariant-preserving mutators used by the editor and the text layout format
//! used by tests and the built-in demo grid.

use std::{fmt, str::FromStr};

use log::warn;
use thiserror::Error;

/// Sentinel distance for cells the search has not reached.
pub const UNREACHED: u32 = u32::MAX;

/// Position of a cell within a grid.
///
/// Coordinates are zero-based, with `row` growing downwards and `col` growing to the right.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    /// Zero-based row index.
    pub row: usize,
    /// Zero-based column index.
    pub col: usize,
}

impl Coord {
    /// Builds a coordinate from a row and a column.
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Returns the Manhattan distance between two coordinates.
    #[must_use]
    pub const fn manhattan(self, other: Self) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// Returns whether both coordinates share an edge.
    #[must_use]
    pub const fn is_adjacent(self, other: Self) -> bool {
        self.manhattan(other) == 1
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "({}, {})", self.row, self.col)
    }
}

/// Cardinal directions a search may move in.
///
/// The declaration order is the order neighbors are produced in, which decides how the search
/// breaks ties between equally distant cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Towards row zero.
    Up,
    /// Away from row zero.
    Down,
    /// Towards column zero.
    Left,
    /// Away from column zero.
    Right,
}

impl Direction {
    /// All directions, in neighbor order.
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];
}

/// Exclusive role a cell may hold.
///
/// A cell holds exactly one role at a time, so it can never be both a wall and an endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Role {
    /// Plain open cell.
    #[default]
    None,
    /// The cell the search starts from. At most one per grid.
    Start,
    /// The cell the search looks for. At most one per grid.
    End,
    /// Impassable cell.
    Wall,
}

/// One grid position with its role and transient search state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    /// Role placed by the editor.
    pub role: Role,
    /// Whether the cell has been finalized by a search or highlighted by playback.
    pub visited: bool,
    /// Whether the cell belongs to the highlighted shortest path.
    pub on_path: bool,
    /// Number of steps from the start cell, or [`UNREACHED`].
    pub distance: u32,
    /// Cell this one was reached from during the last search.
    ///
    /// The back-reference is stored as a coordinate into the same grid rather than as a pointer,
    /// so cells never own each other.
    pub predecessor: Option<Coord>,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            role: Role::None,
            visited: false,
            on_path: false,
            distance: UNREACHED,
            predecessor: None,
        }
    }
}

impl Cell {
    /// Returns whether the cell is the start cell.
    #[must_use]
    pub fn is_start(&self) -> bool {
        self.role == Role::Start
    }

    /// Returns whether the cell is the end cell.
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.role == Role::End
    }

    /// Returns whether the cell is a wall.
    #[must_use]
    pub fn is_wall(&self) -> bool {
        self.role == Role::Wall
    }

    /// Clears the transient search fields, keeping the role.
    fn reset_search_state(&mut self) {
        self.visited = false;
        self.on_path = false;
        self.distance = UNREACHED;
        self.predecessor = None;
    }
}

/// Fixed-size rectangular arena of cells stored in row-major order.
///
/// The grid guarantees that at most one cell holds [`Role::Start`] and at most one holds
/// [`Role::End`]; every role mutation goes through [`Grid::set_role`] or [`Grid::toggle_wall`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    /// Number of rows.
    rows: usize,
    /// Number of columns.
    cols: usize,
    /// Row-major cell storage of length `rows * cols`.
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates a grid with every cell default-initialized.
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![Cell::default(); rows.saturating_mul(cols)],
        }
    }

    /// Returns the number of rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Returns the number of columns.
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Returns the number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns whether the grid has no cells at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns whether the coordinate lies inside the grid.
    #[must_use]
    pub const fn contains(&self, coord: Coord) -> bool {
        coord.row < self.rows && coord.col < self.cols
    }

    /// Returns the row-major index of a coordinate, if it lies inside the grid.
    #[must_use]
    pub const fn index(&self, coord: Coord) -> Option<usize> {
        if self.contains(coord) {
            Some(coord.row * self.cols + coord.col)
        } else {
            None
        }
    }

    /// Returns the coordinate of a row-major index.
    ///
    /// The index is not bounds-checked; callers pass indices obtained from [`Grid::index`] or
    /// from enumerating [`Grid::cells`].
    #[must_use]
    pub const fn coord(&self, index: usize) -> Coord {
        Coord::new(index / self.cols, index % self.cols)
    }

    /// Returns the cell at a coordinate.
    #[must_use]
    pub fn cell(&self, coord: Coord) -> Option<&Cell> {
        self.index(coord).and_then(|index| self.cells.get(index))
    }

    /// Returns the cell at a coordinate mutably.
    pub(crate) fn cell_mut(&mut self, coord: Coord) -> Option<&mut Cell> {
        self.index(coord).and_then(|index| self.cells.get_mut(index))
    }

    /// Iterates over every cell with its coordinate, in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (Coord, &Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(index, cell)| (self.coord(index), cell))
    }

    /// Returns the coordinate of the start cell, if one is placed.
    #[must_use]
    pub fn start(&self) -> Option<Coord> {
        self.find_role(Role::Start)
    }

    /// Returns the coordinate of the end cell, if one is placed.
    #[must_use]
    pub fn end(&self) -> Option<Coord> {
        self.find_role(Role::End)
    }

    /// Returns the first cell in row-major order holding a role.
    fn find_role(&self, role: Role) -> Option<Coord> {
        self.cells()
            .find_map(|(coord, cell)| (cell.role == role).then_some(coord))
    }

    /// Assigns a role to a cell, returning whether the grid changed.
    ///
    /// Placing [`Role::Start`] or [`Role::End`] first clears that role from whichever cell held
    /// it. A start or end cannot be placed on a wall or on the opposite endpoint, and a wall
    /// cannot be placed on an endpoint; those requests, like out-of-bounds ones, leave the grid
    /// untouched and return `false`. [`Role::None`] clears whatever role the cell held.
    pub fn set_role(&mut self, coord: Coord, role: Role) -> bool {
        let Some(current) = self.cell(coord).map(|cell| cell.role) else {
            warn!("rejected {role:?} placement outside the grid at {coord}");
            return false;
        };

        let allowed = match role {
            Role::None => true,
            Role::Start => !matches!(current, Role::Wall | Role::End),
            Role::End => !matches!(current, Role::Wall | Role::Start),
            Role::Wall => !matches!(current, Role::Start | Role::End),
        };
        if !allowed {
            warn!("rejected {role:?} placement on {current:?} cell at {coord}");
            return false;
        }

        if matches!(role, Role::Start | Role::End) {
            for cell in self.cells.iter_mut().filter(|cell| cell.role == role) {
                cell.role = Role::None;
            }
        }

        match self.cell_mut(coord) {
            Some(cell) => {
                cell.role = role;
                true
            }
            None => false,
        }
    }

    /// Flips a wall on a plain or wall cell, returning whether the grid changed.
    ///
    /// Start and end cells are left untouched.
    pub fn toggle_wall(&mut self, coord: Coord) -> bool {
        match self.cell(coord).map(|cell| cell.role) {
            Some(Role::Wall) => self.set_role(coord, Role::None),
            Some(_) => self.set_role(coord, Role::Wall),
            None => false,
        }
    }

    /// Clears visited, path, distance and predecessor on every cell, keeping roles.
    pub fn reset_search_state(&mut self) {
        self.cells.iter_mut().for_each(Cell::reset_search_state);
    }

    /// Returns every cell to its default state, roles included.
    pub fn reset(&mut self) {
        self.cells.fill(Cell::default());
    }

    /// Marks a cell as visited, returning whether the coordinate was inside the grid.
    pub fn mark_visited(&mut self, coord: Coord) -> bool {
        let Some(cell) = self.cell_mut(coord) else {
            return false;
        };
        cell.visited = true;
        true
    }

    /// Marks a cell as part of the path, returning whether the coordinate was inside the grid.
    pub fn mark_path(&mut self, coord: Coord) -> bool {
        let Some(cell) = self.cell_mut(coord) else {
            return false;
        };
        cell.on_path = true;
        true
    }

    /// Returns the in-bounds coordinate one step away in a direction.
    #[must_use]
    pub fn step(&self, coord: Coord, direction: Direction) -> Option<Coord> {
        let next = match direction {
            Direction::Up => Coord::new(coord.row.checked_sub(1)?, coord.col),
            Direction::Down => Coord::new(coord.row.checked_add(1)?, coord.col),
            Direction::Left => Coord::new(coord.row, coord.col.checked_sub(1)?),
            Direction::Right => Coord::new(coord.row, coord.col.checked_add(1)?),
        };
        self.contains(next).then_some(next)
    }

    /// Iterates over the neighbors a search may still expand into.
    ///
    /// Neighbors are the in-bounds cells above, below, left and right of `coord`, in that order,
    /// skipping walls and cells already visited.
    pub fn neighbors(&self, coord: Coord) -> impl Iterator<Item = Coord> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |direction| self.step(coord, direction))
            .filter(|next| {
                self.cell(*next)
                    .is_some_and(|cell| !cell.is_wall() && !cell.visited)
            })
    }

    /// Renders the grid in the layout notation, with search state.
    ///
    /// Uses the characters accepted by the [`FromStr`] implementation, plus `o` for visited
    /// cells and `*` for path cells. Roles take precedence over search state.
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut text = String::with_capacity(self.rows * (self.cols + 1));
        for (coord, cell) in self.cells() {
            if coord.col == 0 && coord.row > 0 {
                text.push('\n');
            }
            text.push(match cell.role {
                Role::Start => 'S',
                Role::End => 'E',
                Role::Wall => '#',
                Role::None if cell.on_path => '*',
                Role::None if cell.visited => 'o',
                Role::None => '.',
            });
        }
        text
    }
}

/// Errors produced when parsing a grid layout.
#[derive(Debug, Error, PartialEq, Eq)]
#[expect(
    clippy::module_name_repetitions,
    reason = "The name distinguishes it from the search errors."
)]
pub enum GridParseError {
    /// The layout contains no rows.
    #[error("layout is empty")]
    Empty,
    /// A row's width differs from the first row's.
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        /// Offending row.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
    /// A character outside the layout notation.
    #[error("unknown cell {found:?} at {at}")]
    UnknownCell {
        /// Offending character.
        found: char,
        /// Position of the character.
        at: Coord,
    },
    /// A second start or end cell.
    #[error("duplicate {role:?} cell at {at}")]
    Duplicate {
        /// Role that appeared twice.
        role: Role,
        /// Position of the second occurrence.
        at: Coord,
    },
}

impl FromStr for Grid {
    type Err = GridParseError;

    /// Parses a layout where `.` is open, `#` a wall, `S` the start and `E` the end.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = input
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        let Some(first) = lines.first() else {
            return Err(GridParseError::Empty);
        };
        let cols = first.chars().count();

        let mut grid = Self::new(lines.len(), cols);
        for (row, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != cols {
                return Err(GridParseError::Ragged {
                    row,
                    expected: cols,
                    found,
                });
            }

            for (col, symbol) in line.chars().enumerate() {
                let at = Coord::new(row, col);
                let role = match symbol {
                    '.' => Role::None,
                    '#' => Role::Wall,
                    'S' => Role::Start,
                    'E' => Role::End,
                    found => return Err(GridParseError::UnknownCell { found, at }),
                };

                let duplicate = match role {
                    Role::Start => grid.start().is_some(),
                    Role::End => grid.end().is_some(),
                    Role::None | Role::Wall => false,
                };
                if duplicate {
                    return Err(GridParseError::Duplicate { role, at });
                }

                if let Some(cell) = grid.cell_mut(at) {
                    cell.role = role;
                }
            }
        }

        Ok(grid)
    }
}
