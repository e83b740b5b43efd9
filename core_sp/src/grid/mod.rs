//! [`Grid`] is the square matrix of cell markers that the search runs over

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub mod search;

pub use search::{CoreError, GridSearch};

/// A location on a [`Grid`]
#[derive(
    Clone, Copy, Debug, Default, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize,
)]
pub struct Cell {
    /// Row - increases downwards
    pub row: usize,
    /// Column - increases to the right
    pub col: usize,
}

impl Cell {
    /// Create a new Cell
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Returns the cell `d_row` rows and `d_col` columns away, or `None` if that would leave the
    /// non-negative quadrant.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_sp::grid::Cell;
    ///
    /// assert_eq!(Cell::new(1, 1).offset(-1, 1), Some(Cell::new(0, 2)));
    /// assert_eq!(Cell::new(0, 1).offset(-1, 0), None);
    /// ```
    pub fn offset(&self, d_row: isize, d_col: isize) -> Option<Self> {
        Some(Self {
            row: self.row.checked_add_signed(d_row)?,
            col: self.col.checked_add_signed(d_col)?,
        })
    }

    /// The neighboring cell in the given direction, if it has non-negative coordinates
    pub fn step(&self, direction: Direction) -> Option<Self> {
        let (d_row, d_col) = direction.offset();
        self.offset(d_row, d_col)
    }

    /// The (row, col) pair as signed components
    pub fn components(&self) -> [i64; 2] {
        [self.row as i64, self.col as i64]
    }

    /// Number of single-cell moves between the two cells when nothing is in the way
    pub fn manhattan(&self, other: &Cell) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl From<(usize, usize)> for Cell {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

/// What a single character on a [`Grid`] means
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Marker {
    /// `x`, impassable
    Wall,
    /// `-`
    Open,
    /// `m`, where the search begins
    Start,
    /// `p`, where the search ends
    Goal,
    /// Any other character; passable, with no special meaning
    Other(char),
}

impl Marker {
    /// Returns whether a cell with this [`Marker`] can be entered
    pub fn walkable(self) -> bool {
        self != Marker::Wall
    }
}

impl From<char> for Marker {
    fn from(c: char) -> Self {
        match c {
            'x' => Marker::Wall,
            '-' => Marker::Open,
            'm' => Marker::Start,
            'p' => Marker::Goal,
            other => Marker::Other(other),
        }
    }
}

impl From<Marker> for char {
    fn from(marker: Marker) -> Self {
        match marker {
            Marker::Wall => 'x',
            Marker::Open => '-',
            Marker::Start => 'm',
            Marker::Goal => 'p',
            Marker::Other(c) => c,
        }
    }
}

impl Display for Marker {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", char::from(*self))
    }
}

/// A single move between adjacent cells
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// -row
    Up,
    /// +row
    Down,
    /// -col
    Left,
    /// +col
    Right,
}

impl Direction {
    /// Classify the difference `current - next` between two cells.
    ///
    /// Rows take precedence over columns; `None` if both differences are zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_sp::grid::Direction;
    ///
    /// assert_eq!(Direction::from_diff(1, 0), Some(Direction::Up));
    /// assert_eq!(Direction::from_diff(0, -1), Some(Direction::Right));
    /// assert_eq!(Direction::from_diff(0, 0), None);
    /// ```
    pub fn from_diff(row_diff: i64, col_diff: i64) -> Option<Self> {
        if row_diff > 0 {
            Some(Direction::Up)
        } else if row_diff < 0 {
            Some(Direction::Down)
        } else if col_diff > 0 {
            Some(Direction::Left)
        } else if col_diff < 0 {
            Some(Direction::Right)
        } else {
            None
        }
    }

    /// (row, col) change caused by moving in this direction
    pub fn offset(&self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Direction::Up => "Up",
            Direction::Down => "Down",
            Direction::Left => "Left",
            Direction::Right => "Right",
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A square matrix of cell characters, stored row-major.
///
/// The grid is indexed by `(row, col)`; see [`Grid::at`].
///
/// # Examples
///
/// ```
/// use core_sp::grid::{Cell, Grid, Marker};
///
/// let grid = Grid::from_rows(&["p--", "x-x", "x-m"], 3).unwrap();
/// assert_eq!(grid.at(Cell::new(0, 0)), Some(Marker::Goal));
/// assert_eq!(grid.at(Cell::new(3, 0)), None);
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Grid {
    size: usize,
    cells: Vec<char>,
}

impl Grid {
    /// Concatenate `rows` and reshape them into a `size` x `size` grid.
    ///
    /// Individual rows may have any length; only the concatenated length must equal `size²`.
    /// An empty `rows` is rejected since there is nothing to reshape.
    pub fn from_rows<S: AsRef<str>>(rows: &[S], size: usize) -> Result<Self, CoreError> {
        let cells: Vec<char> = rows.iter().flat_map(|row| row.as_ref().chars()).collect();
        if rows.is_empty() || size.checked_mul(size) != Some(cells.len()) {
            return Err(CoreError::Shape {
                size,
                cells: cells.len(),
            });
        }
        Ok(Self { size, cells })
    }

    /// Width and height of the grid
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.row < self.size && cell.col < self.size
    }

    /// Returns the [`Marker`] at the given cell, or `None` if the cell is out of bounds.
    pub fn at(&self, cell: Cell) -> Option<Marker> {
        if !self.in_bounds(cell) {
            return None;
        }
        Some(Marker::from(self.cells[cell.row * self.size + cell.col]))
    }

    /// All cells with their markers, in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (Cell, Marker)> + '_ {
        self.cells.iter().enumerate().map(|(i, &c)| {
            (
                Cell::new(i / self.size, i % self.size),
                Marker::from(c),
            )
        })
    }

    /// The characters of each row, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[char]> + '_ {
        // a zero-sized grid has no cells, so the chunk length only needs to be non-zero
        self.cells.chunks(self.size.max(1))
    }

    /// The first cell, in row-major order, with the given marker
    pub fn find(&self, marker: Marker) -> Option<Cell> {
        self.cells()
            .find(|&(_, m)| m == marker)
            .map(|(cell, _)| cell)
    }
}

/// One line of characters per row, top to bottom, with no trailing newline
impl Display for Grid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for c in row {
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reshape_rows() {
        let grid = Grid::from_rows(&["p--", "x-x", "x-m"], 3).unwrap();
        assert_eq!(grid.size(), 3);
        assert_eq!(grid.at(Cell::new(1, 0)), Some(Marker::Wall));
        assert_eq!(grid.at(Cell::new(1, 1)), Some(Marker::Open));
        assert_eq!(grid.at(Cell::new(2, 2)), Some(Marker::Start));
        assert_eq!(grid.to_string(), "p--\nx-x\nx-m");
    }

    #[test]
    fn reshape_ignores_row_boundaries() {
        // only the total length matters
        let grid = Grid::from_rows(&["p--x", "-xx-", "m"], 3).unwrap();
        assert_eq!(grid.to_string(), "p--\nx-x\nx-m");
    }

    #[test]
    fn reshape_wrong_length() {
        assert_eq!(
            Grid::from_rows(&["mp"], 2),
            Err(CoreError::Shape { size: 2, cells: 2 })
        );
        assert_eq!(
            Grid::from_rows(&["m--", "--p", "---", "---"], 3),
            Err(CoreError::Shape { size: 3, cells: 12 })
        );
    }

    #[test]
    fn reshape_no_rows() {
        let rows: [&str; 0] = [];
        assert_eq!(
            Grid::from_rows(&rows, 0),
            Err(CoreError::Shape { size: 0, cells: 0 })
        );
    }

    #[test]
    fn zero_sized_grid() {
        let grid = Grid::from_rows(&[""], 0).unwrap();
        assert_eq!(grid.cells().count(), 0);
        assert_eq!(grid.rows().count(), 0);
        assert_eq!(grid.at(Cell::new(0, 0)), None);
    }

    #[test]
    fn find_first_in_row_major_order() {
        let grid = Grid::from_rows(&["-p-", "p--", "--p"], 3).unwrap();
        assert_eq!(grid.find(Marker::Goal), Some(Cell::new(0, 1)));
        assert_eq!(grid.find(Marker::Start), None);
    }

    #[test]
    fn unknown_characters_are_kept() {
        let grid = Grid::from_rows(&["m?", "#p"], 2).unwrap();
        assert_eq!(grid.at(Cell::new(0, 1)), Some(Marker::Other('?')));
        assert!(Marker::Other('#').walkable());
        assert!(!Marker::Wall.walkable());
    }

    #[test]
    fn marker_char_conversion() {
        for c in ['x', '-', 'm', 'p', 'o', 'Z'] {
            assert_eq!(char::from(Marker::from(c)), c);
        }
    }

    #[test]
    fn cell_offset_oob() {
        assert_eq!(Cell::new(0, 0).offset(0, -1), None);
        assert_eq!(Cell::new(0, 0).offset(1, 0), Some(Cell::new(1, 0)));
        assert_eq!(Cell::new(2, 3).step(Direction::Up), Some(Cell::new(1, 3)));
        assert_eq!(Cell::new(2, 3).step(Direction::Right), Some(Cell::new(2, 4)));
    }

    #[test]
    fn direction_precedence() {
        assert_eq!(Direction::from_diff(1, 1), Some(Direction::Up));
        assert_eq!(Direction::from_diff(-1, 1), Some(Direction::Down));
        assert_eq!(Direction::from_diff(0, 1), Some(Direction::Left));
        assert_eq!(Direction::from_diff(0, -1), Some(Direction::Right));
    }

    #[test]
    fn direction_inverts_offset() {
        for direction in [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ] {
            let current = Cell::new(5, 5);
            let next = current.step(direction).unwrap();
            let [r1, c1] = current.components();
            let [r2, c2] = next.components();
            assert_eq!(Direction::from_diff(r1 - r2, c1 - c2), Some(direction));
        }
    }
}
