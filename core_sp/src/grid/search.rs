//! Breadth-first shortest path search between the start and goal markers of a [`Grid`]

use crate::grid::{Cell, Direction, Grid, Marker};
use log::{debug, trace};
use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap, VecDeque};
use thiserror::Error;

/// Why a search could not produce a path.
///
/// A goal that can't be reached is not an error; see [`GridSearch::path`].
#[derive(Error, Clone, Debug, Eq, PartialEq)]
pub enum CoreError {
    #[error("Grid of size {size} needs {} cells, got {cells}", size.saturating_mul(*size))]
    Shape { size: usize, cells: usize },

    #[error("No cell is marked '{0}'")]
    MissingMarker(Marker),

    #[error("Coordinate has {arity} components, expected 2")]
    MalformedCoordinate { arity: usize },
}

/// Component-wise `lhs - rhs` of two (row, col) coordinates
pub fn tuple_diff(lhs: &[i64], rhs: &[i64]) -> Result<(i64, i64), CoreError> {
    match (lhs, rhs) {
        ([lhs_row, lhs_col], [rhs_row, rhs_col]) => Ok((lhs_row - rhs_row, lhs_col - rhs_col)),
        ([_, _], other) | (other, _) => Err(CoreError::MalformedCoordinate {
            arity: other.len(),
        }),
    }
}

/// A [`Grid`] with its walls precomputed, ready to be searched.
///
/// This struct is created by [`GridSearch::new`].
///
/// # Examples
///
/// ```
/// use core_sp::grid::{Cell, Direction, GridSearch};
///
/// let search = GridSearch::new(&["p--", "x-x", "x-m"], 3).unwrap();
///
/// assert_eq!(
///     search.path().unwrap(),
///     vec![Cell::new(2, 2), Cell::new(2, 1), Cell::new(1, 1), Cell::new(0, 1), Cell::new(0, 0)]
/// );
/// assert_eq!(
///     search.moves().unwrap(),
///     vec![Direction::Left, Direction::Up, Direction::Up, Direction::Left]
/// );
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GridSearch {
    grid: Grid,
    /// ordered by row, then column
    walls: BTreeSet<Cell>,
}

impl GridSearch {
    /// Build the grid from flattened rows and index its walls
    pub fn new<S: AsRef<str>>(rows: &[S], size: usize) -> Result<Self, CoreError> {
        let grid = Grid::from_rows(rows, size).map_err(|e| {
            debug!("Rejected grid: {e}");
            e
        })?;
        let walls = grid
            .cells()
            .filter(|&(_, marker)| marker == Marker::Wall)
            .map(|(cell, _)| cell)
            .collect();
        Ok(Self { grid, walls })
    }

    /// Returns the underlying [`Grid`].
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Returns the positions of all walls, in row-major order.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_sp::grid::{Cell, GridSearch};
    ///
    /// let search = GridSearch::new(&["p--", "x-x", "x-m"], 3).unwrap();
    /// let walls: Vec<_> = search.walls().iter().copied().collect();
    ///
    /// assert_eq!(walls, vec![Cell::new(1, 0), Cell::new(1, 2), Cell::new(2, 0)]);
    /// ```
    pub fn walls(&self) -> &BTreeSet<Cell> {
        &self.walls
    }

    /// The first cell, in row-major order, with the given marker
    pub fn locate(&self, marker: Marker) -> Result<Cell, CoreError> {
        self.grid
            .find(marker)
            .ok_or(CoreError::MissingMarker(marker))
    }

    /// Returns the in-bounds, non-wall neighbors of the given cell.
    ///
    /// Candidates are considered down, left, up, right; that order is reversed on cells where
    /// `row + col` is even. This decides which of several equally short paths is found.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_sp::grid::{Cell, GridSearch};
    ///
    /// let search = GridSearch::new(&["---", "---", "---"], 3).unwrap();
    ///
    /// // (1, 1) is even: right, up, left, down
    /// assert_eq!(
    ///     search.neighbors(Cell::new(1, 1)).as_slice(),
    ///     &[Cell::new(1, 2), Cell::new(0, 1), Cell::new(1, 0), Cell::new(2, 1)]
    /// );
    /// // (0, 1) is odd: down, left, right
    /// assert_eq!(
    ///     search.neighbors(Cell::new(0, 1)).as_slice(),
    ///     &[Cell::new(1, 1), Cell::new(0, 0), Cell::new(0, 2)]
    /// );
    /// ```
    pub fn neighbors(&self, cell: Cell) -> heapless::Vec<Cell, 4> {
        let mut candidates = [
            cell.step(Direction::Down),
            cell.step(Direction::Left),
            cell.step(Direction::Up),
            cell.step(Direction::Right),
        ];
        if (cell.row + cell.col) % 2 == 0 {
            candidates.reverse();
        }
        candidates
            .into_iter()
            .flatten()
            .filter(|&c| self.grid.in_bounds(c))
            .filter(|c| !self.walls.contains(c))
            .collect()
    }

    /// Returns the shortest path from the start marker to the goal marker.
    ///
    /// The path includes both the start and the goal. If walls separate them, the path is
    /// empty; that is a valid result, not an error.
    pub fn path(&self) -> Result<Vec<Cell>, CoreError> {
        let start = self.locate(Marker::Start)?;
        let goal = self.locate(Marker::Goal)?;

        let mut prev: HashMap<Cell, Option<Cell>> = HashMap::new();
        let mut queue: VecDeque<Cell> = VecDeque::new();
        prev.insert(start, None);
        queue.push_back(start);

        let mut goal_reached = false;
        while let Some(current) = queue.pop_front() {
            if current == goal {
                goal_reached = true;
                break;
            }
            for next in self.neighbors(current) {
                if let Entry::Vacant(entry) = prev.entry(next) {
                    entry.insert(Some(current));
                    queue.push_back(next);
                }
            }
        }

        if !goal_reached {
            trace!("No path from {start:?} to {goal:?}");
            return Ok(vec![]);
        }

        let mut path = vec![goal];
        let mut next = goal;
        while let Some(Some(before_next)) = prev.get(&next) {
            path.push(*before_next);
            next = *before_next;
        }
        path.reverse();
        trace!("Found path of {} cells from {start:?} to {goal:?}", path.len());
        Ok(path)
    }

    /// Returns the moves that walk [`GridSearch::path`], one per step
    pub fn moves(&self) -> Result<Vec<Direction>, CoreError> {
        let path = self.path()?;
        let mut moves = Vec::with_capacity(path.len().saturating_sub(1));
        for pair in path.windows(2) {
            let (row_diff, col_diff) = tuple_diff(&pair[0].components(), &pair[1].components())?;
            if let Some(direction) = Direction::from_diff(row_diff, col_diff) {
                moves.push(direction);
            }
        }
        Ok(moves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn cells(pairs: &[(usize, usize)]) -> Vec<Cell> {
        pairs.iter().copied().map(Cell::from).collect()
    }

    /// Random grid with exactly one start and one goal
    fn random_grid(rng: &mut StdRng, size: usize, wall_chance: f64) -> Vec<String> {
        let mut chars: Vec<char> = (0..size * size)
            .map(|_| if rng.gen_bool(wall_chance) { 'x' } else { '-' })
            .collect();
        let start = rng.gen_range(0..chars.len());
        let mut goal = rng.gen_range(0..chars.len());
        while goal == start {
            goal = rng.gen_range(0..chars.len());
        }
        chars[start] = 'm';
        chars[goal] = 'p';
        chars
            .chunks(size)
            .map(|row| row.iter().collect())
            .collect()
    }

    /// Plain BFS distance, ignoring neighbor order
    fn distance(search: &GridSearch, from: Cell, to: Cell) -> Option<usize> {
        let mut dist = HashMap::from([(from, 0)]);
        let mut queue = VecDeque::from([from]);
        while let Some(current) = queue.pop_front() {
            if current == to {
                return dist.get(&to).copied();
            }
            let d = dist[&current];
            for next in search.neighbors(current) {
                dist.entry(next).or_insert_with(|| {
                    queue.push_back(next);
                    d + 1
                });
            }
        }
        None
    }

    #[test]
    fn example_grid() {
        let search = GridSearch::new(&["p--", "x-x", "x-m"], 3).unwrap();
        assert_eq!(
            search.walls().iter().copied().collect::<Vec<_>>(),
            cells(&[(1, 0), (1, 2), (2, 0)])
        );
        assert_eq!(
            search.path().unwrap(),
            cells(&[(2, 2), (2, 1), (1, 1), (0, 1), (0, 0)])
        );
        assert_eq!(
            search.moves().unwrap(),
            vec![
                Direction::Left,
                Direction::Up,
                Direction::Up,
                Direction::Left
            ]
        );
    }

    #[test]
    fn goal_walled_off() {
        let search = GridSearch::new(&["m-x", "xxx", "x-p"], 3).unwrap();
        assert_eq!(search.path(), Ok(vec![]));
        assert_eq!(search.moves(), Ok(vec![]));
    }

    #[test]
    fn corridor_between_walls() {
        // one gap in each wall row is enough to get through
        let search = GridSearch::new(&["m-x", "x-x", "x-p"], 3).unwrap();
        assert_eq!(
            search.path().unwrap(),
            cells(&[(0, 0), (0, 1), (1, 1), (2, 1), (2, 2)])
        );
        assert_eq!(
            search.moves().unwrap(),
            vec![
                Direction::Right,
                Direction::Down,
                Direction::Down,
                Direction::Right
            ]
        );
    }

    #[test]
    fn invalid_shape() {
        assert_eq!(
            GridSearch::new(&["mp"], 2),
            Err(CoreError::Shape { size: 2, cells: 2 })
        );
    }

    #[test]
    fn missing_start() {
        let search = GridSearch::new(&["--", "-p"], 2).unwrap();
        let err = CoreError::MissingMarker(Marker::Start);
        assert_eq!(search.locate(Marker::Start), Err(err.clone()));
        assert_eq!(search.path(), Err(err.clone()));
        // the same error every time
        assert_eq!(search.moves(), Err(err.clone()));
        assert_eq!(search.moves(), Err(err));
    }

    #[test]
    fn missing_goal() {
        let search = GridSearch::new(&["m-", "--"], 2).unwrap();
        assert_eq!(search.path(), Err(CoreError::MissingMarker(Marker::Goal)));
        assert_eq!(search.moves(), Err(CoreError::MissingMarker(Marker::Goal)));
    }

    #[test]
    fn missing_both_reports_start() {
        let search = GridSearch::new(&["--", "--"], 2).unwrap();
        assert_eq!(search.path(), Err(CoreError::MissingMarker(Marker::Start)));
    }

    #[test]
    fn duplicate_markers_use_first() {
        let search = GridSearch::new(&["m-p", "---", "p-m"], 3).unwrap();
        assert_eq!(search.locate(Marker::Start), Ok(Cell::new(0, 0)));
        assert_eq!(search.locate(Marker::Goal), Ok(Cell::new(0, 2)));
        assert_eq!(
            search.path().unwrap(),
            cells(&[(0, 0), (0, 1), (0, 2)])
        );
    }

    #[test]
    fn adjacent_start_and_goal() {
        let search = GridSearch::new(&["mp", "xx"], 2).unwrap();
        assert_eq!(search.path().unwrap(), cells(&[(0, 0), (0, 1)]));
        assert_eq!(search.moves().unwrap(), vec![Direction::Right]);
    }

    #[test]
    fn neighbors_skip_walls_and_edges() {
        let search = GridSearch::new(&["p--", "x-x", "x-m"], 3).unwrap();
        assert_eq!(search.neighbors(Cell::new(2, 2)).as_slice(), &[Cell::new(2, 1)]);
        assert_eq!(
            search.neighbors(Cell::new(2, 1)).as_slice(),
            &[Cell::new(1, 1), Cell::new(2, 2)]
        );
        assert!(GridSearch::new(&["x"], 1)
            .unwrap()
            .neighbors(Cell::new(0, 0))
            .is_empty());
    }

    #[test]
    fn parity_picks_between_equal_paths() {
        // two equally short routes around the center wall
        let search = GridSearch::new(&["m--", "-x-", "--p"], 3).unwrap();
        // (0, 0) is even, so right is tried before down
        assert_eq!(
            search.path().unwrap(),
            cells(&[(0, 0), (0, 1), (0, 2), (1, 2), (2, 2)])
        );
        let search = GridSearch::new(&["p--", "-x-", "--m"], 3).unwrap();
        // (2, 2) is even, so up is tried before left
        assert_eq!(
            search.moves().unwrap(),
            vec![
                Direction::Up,
                Direction::Up,
                Direction::Left,
                Direction::Left
            ]
        );
    }

    #[test]
    fn other_characters_are_passable() {
        let search = GridSearch::new(&["m?x", "x#x", "x*p"], 3).unwrap();
        assert_eq!(search.path().unwrap().len(), 5);
    }

    #[test]
    fn tuple_diff_arity() {
        assert_eq!(tuple_diff(&[2, 2], &[2, 1]), Ok((0, 1)));
        assert_eq!(
            tuple_diff(&[1, 2, 3], &[2, 1]),
            Err(CoreError::MalformedCoordinate { arity: 3 })
        );
        assert_eq!(
            tuple_diff(&[1, 2], &[1]),
            Err(CoreError::MalformedCoordinate { arity: 1 })
        );
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            CoreError::Shape { size: 2, cells: 2 }.to_string(),
            "Grid of size 2 needs 4 cells, got 2"
        );
        assert_eq!(
            CoreError::MissingMarker(Marker::Goal).to_string(),
            "No cell is marked 'p'"
        );
    }

    #[test]
    fn random_grids_deterministic() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let size = rng.gen_range(2..12);
            let rows = random_grid(&mut rng, size, 0.3);
            let first = GridSearch::new(&rows, size).unwrap();
            let second = GridSearch::new(&rows, size).unwrap();
            assert_eq!(first.path(), second.path());
            assert_eq!(first.moves(), second.moves());
        }
    }

    #[test]
    fn random_grids_paths_are_valid() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..200 {
            let size = rng.gen_range(2..16);
            let rows = random_grid(&mut rng, size, 0.35);
            let search = GridSearch::new(&rows, size).unwrap();
            let start = search.locate(Marker::Start).unwrap();
            let goal = search.locate(Marker::Goal).unwrap();
            let path = search.path().unwrap();
            let moves = search.moves().unwrap();

            match distance(&search, start, goal) {
                None => {
                    assert!(path.is_empty());
                    assert!(moves.is_empty());
                }
                Some(d) => {
                    // shortest
                    assert_eq!(path.len(), d + 1);
                    assert_eq!(moves.len(), path.len() - 1);
                    assert_eq!(path.first(), Some(&start));
                    assert_eq!(path.last(), Some(&goal));
                    for pair in path.windows(2) {
                        assert_eq!(pair[0].manhattan(&pair[1]), 1);
                        assert!(!search.walls().contains(&pair[0]));
                        assert!(!search.walls().contains(&pair[1]));
                    }
                    // replaying the moves retraces the path
                    let mut at = start;
                    for (direction, expected) in moves.iter().zip(&path[1..]) {
                        at = at.step(*direction).unwrap();
                        assert_eq!(at, *expected);
                    }
                }
            }
        }
    }
}
