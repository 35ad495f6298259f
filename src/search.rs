//! Search engine module.
//!
//! This module contains the shortest-path engine that runs over a [`Grid`], the uniform contract
//! every algorithm implements, and the result type playback consumes.

#![expect(
    clippy::module_name_repetitions,
    reason = "Search types are named after the operation they describe."
)]

use std::{cmp::Reverse, collections::BinaryHeap};

use log::{debug, warn};
use thiserror::Error;

use crate::grid::{Coord, Grid, UNREACHED};

/// Precondition violations reported by a search.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    /// No cell holds the start role.
    #[error("no start cell is placed")]
    MissingStart,
    /// No cell holds the end role.
    #[error("no end cell is placed")]
    MissingEnd,
    /// An endpoint lies outside the grid.
    #[error("{0} lies outside the grid")]
    OutOfBounds(Coord),
    /// An endpoint is a wall.
    #[error("{0} is a wall")]
    WallEndpoint(Coord),
}

/// Whether a search reached its end cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchStatus {
    /// A shortest path was reconstructed.
    Found,
    /// Every reachable cell was finalized without meeting the end cell.
    Unreachable,
}

/// Output of one search run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchResult {
    /// Cells in the order the search finalized them.
    pub visited: Vec<Coord>,
    /// Cells from start to end inclusive, or empty when the end is unreachable.
    pub path: Vec<Coord>,
}

impl SearchResult {
    /// Returns whether the search found a path.
    #[must_use]
    pub fn status(&self) -> SearchStatus {
        if self.path.is_empty() {
            SearchStatus::Unreachable
        } else {
            SearchStatus::Found
        }
    }

    /// Returns whether the search explored cells without reaching the end.
    #[must_use]
    pub fn is_unreachable(&self) -> bool {
        self.path.is_empty() && !self.visited.is_empty()
    }
}

/// Contract shared by every search algorithm.
///
/// Implementations write distances, predecessors and visited flags into the grid as they go, so
/// callers reset the grid's search state before each run with [`Grid::reset_search_state`].
pub trait Pathfinder {
    /// Name the algorithm is selected by.
    fn name(&self) -> &'static str;

    /// Searches from `start` to `end`.
    ///
    /// # Errors
    ///
    /// Returns a [`SearchError`] when an endpoint lies outside the grid or is a wall.
    fn search(&self, grid: &mut Grid, start: Coord, end: Coord)
        -> Result<SearchResult, SearchError>;
}

/// Algorithms selectable by name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Algorithm {
    /// Dijkstra's algorithm with unit edge weights.
    #[default]
    Dijkstra,
}

impl Algorithm {
    /// Returns the engine behind the selector.
    #[must_use]
    pub fn pathfinder(self) -> &'static dyn Pathfinder {
        match self {
            Self::Dijkstra => &Dijkstra,
        }
    }
}

/// Unit-weight Dijkstra over a 4-connected grid.
///
/// The frontier pops the cell with the smallest distance; equal distances resolve in row-major
/// order, and a neighbor keeps the predecessor that reached it first.
#[derive(Clone, Copy, Debug, Default)]
pub struct Dijkstra;

impl Pathfinder for Dijkstra {
    fn name(&self) -> &'static str {
        "dijkstra"
    }

    fn search(
        &self,
        grid: &mut Grid,
        start: Coord,
        end: Coord,
    ) -> Result<SearchResult, SearchError> {
        check_endpoint(grid, start)?;
        check_endpoint(grid, end)?;

        let mut frontier = Frontier::default();
        if let Some(cell) = grid.cell_mut(start) {
            cell.distance = 0;
        }
        frontier.push(grid, start, 0);

        let mut visited = Vec::new();
        while let Some(current) = frontier.pop(grid) {
            let Some(cell) = grid.cell_mut(current) else {
                continue;
            };
            if cell.visited || cell.is_wall() {
                continue;
            }
            cell.visited = true;
            let distance = cell.distance;
            visited.push(current);

            if current == end {
                let path = reconstruct_path(grid, end);
                debug!(
                    "dijkstra reached {end} at distance {distance} after finalizing {} cells",
                    visited.len()
                );
                return Ok(SearchResult { visited, path });
            }

            let candidate = distance.saturating_add(1);
            let neighbors: Vec<Coord> = grid.neighbors(current).collect();
            for neighbor in neighbors {
                let Some(next) = grid.cell_mut(neighbor) else {
                    continue;
                };
                if candidate < next.distance {
                    next.distance = candidate;
                    next.predecessor = Some(current);
                    frontier.push(grid, neighbor, candidate);
                }
            }
        }

        warn!(
            "{end} is unreachable from {start}, finalized {} cells",
            visited.len()
        );
        Ok(SearchResult {
            visited,
            path: Vec::new(),
        })
    }
}

/// Locates the start and end of a grid.
///
/// # Errors
///
/// Returns [`SearchError::MissingStart`] or [`SearchError::MissingEnd`] when a role is not
/// placed.
pub fn endpoints(grid: &Grid) -> Result<(Coord, Coord), SearchError> {
    let start = grid.start().ok_or(SearchError::MissingStart)?;
    let end = grid.end().ok_or(SearchError::MissingEnd)?;
    Ok((start, end))
}

/// Runs the default algorithm between two cells.
///
/// # Errors
///
/// Returns a [`SearchError`] when an endpoint lies outside the grid or is a wall.
pub fn search(grid: &mut Grid, start: Coord, end: Coord) -> Result<SearchResult, SearchError> {
    Algorithm::default().pathfinder().search(grid, start, end)
}

/// Rejects endpoints outside the grid or on walls.
fn check_endpoint(grid: &Grid, coord: Coord) -> Result<(), SearchError> {
    match grid.cell(coord) {
        None => Err(SearchError::OutOfBounds(coord)),
        Some(cell) if cell.is_wall() => Err(SearchError::WallEndpoint(coord)),
        Some(_) => Ok(()),
    }
}

/// Follows predecessor links from `end` back to the cell that has none.
fn reconstruct_path(grid: &Grid, end: Coord) -> Vec<Coord> {
    let mut path = vec![end];
    let mut current = end;
    while let Some(previous) = grid.cell(current).and_then(|cell| cell.predecessor) {
        path.push(previous);
        current = previous;
    }
    path.reverse();
    path
}

/// Min-priority queue of cells keyed by distance, then row-major index.
///
/// Entries are never updated in place; a cell relaxed again gets a new entry and the stale one is
/// skipped when popped because the cell is already visited.
#[derive(Debug, Default)]
struct Frontier {
    /// Max-heap over reversed keys, so the smallest key pops first.
    heap: BinaryHeap<Reverse<(u32, usize)>>,
}

impl Frontier {
    /// Queues a cell at a distance.
    fn push(&mut self, grid: &Grid, coord: Coord, distance: u32) {
        if distance == UNREACHED {
            return;
        }
        if let Some(index) = grid.index(coord) {
            self.heap.push(Reverse((distance, index)));
        }
    }

    /// Removes the cell with the smallest key.
    fn pop(&mut self, grid: &Grid) -> Option<Coord> {
        self.heap.pop().map(|Reverse((_, index))| grid.coord(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(layout: &str) -> Grid {
        layout.parse().expect("layout should parse")
    }

    fn run(grid: &mut Grid) -> SearchResult {
        grid.reset_search_state();
        let (start, end) = endpoints(grid).expect("layout should have endpoints");
        search(grid, start, end).expect("search should accept the endpoints")
    }

    fn coords(pairs: &[(usize, usize)]) -> Vec<Coord> {
        pairs.iter().map(|&(row, col)| Coord::new(row, col)).collect()
    }

    #[test]
    fn test_three_by_three_open_grid() {
        let mut grid = parse(
            "
            S..
            ...
            ..E
            ",
        );

        let result = run(&mut grid);

        assert_eq!(
            result.path,
            coords(&[(0, 0), (0, 1), (0, 2), (1, 2), (2, 2)]),
            "ties resolve in row-major order and the first relaxation wins"
        );
        assert_eq!(
            result.visited,
            coords(&[
                (0, 0),
                (0, 1),
                (1, 0),
                (0, 2),
                (1, 1),
                (2, 0),
                (1, 2),
                (2, 1),
                (2, 2)
            ])
        );
        assert_eq!(
            grid.cell(Coord::new(2, 2)).map(|cell| cell.distance),
            Some(4)
        );
        assert_eq!(result.status(), SearchStatus::Found);
    }

    #[test]
    fn test_open_grid_distances_are_manhattan() {
        let mut grid = parse(
            "
            .....
            ..S..
            .....
            ....E
            ",
        );
        let start = Coord::new(1, 2);

        let _result = run(&mut grid);

        for (coord, cell) in grid.cells() {
            if cell.distance != UNREACHED {
                assert_eq!(
                    usize::try_from(cell.distance).ok(),
                    Some(start.manhattan(coord)),
                    "distance of {coord} should be its Manhattan distance"
                );
            }
        }
    }

    #[test]
    fn test_path_is_contiguous_and_matches_distance() {
        let mut grid = parse(
            "
            S.#....
            .##.##.
            ...#..E
            .#...#.
            ",
        );

        let result = run(&mut grid);
        let end = grid.end().expect("layout has an end");

        assert_eq!(result.path.first(), grid.start().as_ref());
        assert_eq!(result.path.last(), Some(&end));
        assert!(
            result
                .path
                .windows(2)
                .all(|pair| matches!(pair, [from, to] if from.is_adjacent(*to))),
            "consecutive path cells should be 4-adjacent"
        );
        let end_distance = grid.cell(end).map(|cell| cell.distance);
        assert_eq!(
            u32::try_from(result.path.len() - 1).ok(),
            end_distance,
            "path length should match the end distance"
        );
    }

    #[test]
    fn test_adjacent_endpoints_beside_a_wall() {
        let mut grid = parse(
            "
            SE
            #.
            ",
        );

        let result = run(&mut grid);

        assert_eq!(result.path, coords(&[(0, 0), (0, 1)]));
        assert_eq!(result.visited, coords(&[(0, 0), (0, 1)]));
    }

    #[test]
    fn test_walled_in_end_is_unreachable() {
        let mut grid = parse(
            "
            S....
            ..#..
            .#E#.
            ..#..
            .....
            ",
        );

        let result = run(&mut grid);

        assert!(result.path.is_empty());
        assert_eq!(result.visited.len(), 20, "every reachable cell is finalized");
        assert!(!result.visited.contains(&Coord::new(2, 2)));
        assert!(result.is_unreachable());
        assert_eq!(result.status(), SearchStatus::Unreachable);
    }

    #[test]
    fn test_search_is_repeatable_after_reset() {
        let mut grid = parse(
            "
            ..#...
            S.#.#.
            ....#E
            ",
        );

        let first = run(&mut grid);
        let second = run(&mut grid);

        assert_eq!(first, second);
    }

    #[test]
    fn test_start_equal_to_end_yields_single_cell_path() {
        let mut grid = Grid::new(2, 2);
        let cell = Coord::new(1, 1);

        let result = search(&mut grid, cell, cell).expect("a single cell is a valid search");

        assert_eq!(result.visited, vec![cell]);
        assert_eq!(result.path, vec![cell]);
        assert_eq!(grid.cell(cell).map(|cell| cell.distance), Some(0));
    }

    #[test]
    fn test_precondition_violations() {
        let mut grid = parse("S#.");

        assert_eq!(endpoints(&grid), Err(SearchError::MissingEnd));
        assert_eq!(endpoints(&Grid::new(1, 1)), Err(SearchError::MissingStart));
        assert_eq!(
            search(&mut grid, Coord::new(0, 0), Coord::new(0, 1)),
            Err(SearchError::WallEndpoint(Coord::new(0, 1)))
        );
        assert_eq!(
            search(&mut grid, Coord::new(0, 0), Coord::new(3, 0)),
            Err(SearchError::OutOfBounds(Coord::new(3, 0)))
        );
    }

    #[test]
    fn test_algorithm_registry() {
        let pathfinder = Algorithm::Dijkstra.pathfinder();
        let mut grid = parse("S.E");

        assert_eq!(pathfinder.name(), "dijkstra");
        let result = pathfinder
            .search(&mut grid, Coord::new(0, 0), Coord::new(0, 2))
            .expect("search should succeed");
        assert_eq!(result.path.len(), 3);
    }
}
