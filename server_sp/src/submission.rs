//! Checking submitted grid strings and converting between their submitted, searched, and stored forms

use core_sp::constants::{ROW_SEPARATOR, STORED_ROW_SEPARATOR, SUBMITTED_OPEN};
use core_sp::grid::{Direction, Marker};
use regex::Regex;

/// One row of a submitted grid, including its trailing separator
const ROW_PATTERN: &str = "[a-z]*-";

/// Checks that a submitted grid string has as many rows as it claims
pub struct GridValidator {
    row: Regex,
}

impl GridValidator {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            row: Regex::new(ROW_PATTERN)?,
        })
    }

    /// A grid of `size` rows has `size - 1` separated runs before its last row
    ///
    /// Only the number of separators is checked here; row lengths are left to the search.
    pub fn validate(&self, data: &str, size: usize) -> bool {
        if size == 0 {
            return false;
        }
        let data = data.to_lowercase();
        self.row.find_iter(&data).count() == size - 1
    }
}

/// Split a submitted grid into rows, with open cells written the way the search expects
pub fn normalize(data: &str) -> Vec<String> {
    let open = char::from(Marker::Open).to_string();
    data.to_lowercase()
        .split(ROW_SEPARATOR)
        .map(|row| row.replace(SUBMITTED_OPEN, &open))
        .collect()
}

/// Stored form of normalized rows, like `p--,x-x,x-m`
pub fn render_grid(rows: &[String]) -> String {
    rows.join(STORED_ROW_SEPARATOR)
}

/// Stored form of a move list, like `[Left, Up, Up, Left]`
pub fn render_moves(moves: &[Direction]) -> String {
    let names: Vec<&str> = moves.iter().map(Direction::name).collect();
    format!("[{}]", names.join(", "))
}
