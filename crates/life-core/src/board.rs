//! The simulation board: a fixed-size square matrix of cells.
//!
//! A [`Board`] can only be built through constructors that validate its
//! shape, so every value of the type is a well-formed N×N matrix with
//! N >= 1. Functions that take a `&Board` can therefore treat the shape as
//! a given and never fail on it.

use std::fmt;

/// Character used for a live cell in the text rendering.
pub const ALIVE_CHAR: char = '#';

/// Character used for a dead cell in the text rendering.
pub const DEAD_CHAR: char = '.';

/// Largest accepted side length (16M cells).
pub const MAX_BOARD_SIZE: usize = 4096;

/// Errors that can occur when constructing or editing a board.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    /// The requested board has no cells.
    #[error("board must have at least one row and one column")]
    Empty,

    /// The rows of the input matrix do not all have the same length.
    #[error("ragged board: row {row} has {found} columns, expected {expected}")]
    Ragged {
        /// Index of the first offending row.
        row: usize,
        /// Number of columns that row actually has.
        found: usize,
        /// Number of columns of the first row.
        expected: usize,
    },

    /// The input matrix is rectangular but not square.
    #[error("board must be square, got {rows} rows of {cols} columns")]
    NotSquare {
        /// Number of rows.
        rows: usize,
        /// Number of columns per row.
        cols: usize,
    },

    /// A coordinate falls outside the board.
    #[error("cell ({row}, {col}) is outside a {size}x{size} board")]
    OutOfBounds {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
        /// Side length of the board.
        size: usize,
    },

    /// The board side length exceeds [`MAX_BOARD_SIZE`].
    #[error("board size {size} exceeds the maximum of {MAX_BOARD_SIZE}")]
    TooLarge {
        /// Requested side length.
        size: usize,
    },
}

/// An N×N matrix of cell-alive flags stored row-major.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    /// Side length (number of rows, and of columns).
    size: usize,
    /// `size * size` cells, row-major.
    cells: Vec<bool>,
}

impl Board {
    /// Create an all-dead board of `size` × `size` cells.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Empty`] if `size` is 0 and
    /// [`BoardError::TooLarge`] if `size` exceeds [`MAX_BOARD_SIZE`].
    pub fn new(size: usize) -> Result<Self, BoardError> {
        if size == 0 {
            return Err(BoardError::Empty);
        }
        if size > MAX_BOARD_SIZE {
            return Err(BoardError::TooLarge { size });
        }
        let len = size
            .checked_mul(size)
            .ok_or(BoardError::TooLarge { size })?;
        Ok(Self {
            size,
            cells: vec![false; len],
        })
    }

    /// Build a board from a matrix of rows.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Empty`] for an empty matrix or empty rows,
    /// [`BoardError::Ragged`] when row lengths differ, and
    /// [`BoardError::NotSquare`] when the matrix is rectangular but the
    /// row count differs from the column count, and [`BoardError::TooLarge`]
    /// past [`MAX_BOARD_SIZE`].
    pub fn from_rows(rows: Vec<Vec<bool>>) -> Result<Self, BoardError> {
        let expected = rows.first().map_or(0, Vec::len);
        if rows.is_empty() || expected == 0 {
            return Err(BoardError::Empty);
        }

        if let Some((row, found)) = rows
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|(_, len)| *len != expected)
        {
            return Err(BoardError::Ragged {
                row,
                found,
                expected,
            });
        }

        if rows.len() != expected {
            return Err(BoardError::NotSquare {
                rows: rows.len(),
                cols: expected,
            });
        }
        if expected > MAX_BOARD_SIZE {
            return Err(BoardError::TooLarge { size: expected });
        }

        Ok(Self {
            size: expected,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    /// Build a `size` × `size` board with exactly the listed cells alive.
    ///
    /// # Errors
    ///
    /// Fails like [`Board::new`], or with [`BoardError::OutOfBounds`] if a
    /// listed cell lies outside the board.
    pub fn with_alive(size: usize, alive: &[(usize, usize)]) -> Result<Self, BoardError> {
        let mut board = Self::new(size)?;
        for &(row, col) in alive {
            board.set(row, col, true)?;
        }
        Ok(board)
    }

    /// Assemble a board from parts already known to be consistent.
    ///
    /// Callers guarantee `cells.len() == size * size` and `size > 0`.
    pub(crate) const fn from_parts(size: usize, cells: Vec<bool>) -> Self {
        Self { size, cells }
    }

    /// Side length of the board.
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Whether the cell at (`row`, `col`) is alive, or `None` if the
    /// coordinate is outside the board.
    pub fn get(&self, row: usize, col: usize) -> Option<bool> {
        self.index(row, col)
            .and_then(|idx| self.cells.get(idx))
            .copied()
    }

    /// Set the cell at (`row`, `col`).
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::OutOfBounds`] if the coordinate is outside
    /// the board.
    pub fn set(&mut self, row: usize, col: usize, alive: bool) -> Result<(), BoardError> {
        let size = self.size;
        let cell = self
            .index(row, col)
            .and_then(|idx| self.cells.get_mut(idx))
            .ok_or(BoardError::OutOfBounds { row, col, size })?;
        *cell = alive;
        Ok(())
    }

    /// Number of live cells.
    pub fn live_count(&self) -> usize {
        self.cells.iter().filter(|alive| **alive).count()
    }

    /// Whether every cell is dead.
    pub fn is_extinct(&self) -> bool {
        !self.cells.iter().any(|alive| *alive)
    }

    /// Iterate over the rows of the board, top to bottom.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[bool]> {
        self.cells.chunks_exact(self.size)
    }

    /// Render each row as a string of [`ALIVE_CHAR`] / [`DEAD_CHAR`].
    pub fn row_strings(&self) -> Vec<String> {
        self.rows()
            .map(|row| row.iter().map(|alive| cell_char(*alive)).collect())
            .collect()
    }

    /// All cells, row-major.
    pub(crate) fn cells(&self) -> &[bool] {
        &self.cells
    }

    fn index(&self, row: usize, col: usize) -> Option<usize> {
        if row >= self.size || col >= self.size {
            return None;
        }
        row.checked_mul(self.size)?.checked_add(col)
    }
}

const fn cell_char(alive: bool) -> char {
    if alive { ALIVE_CHAR } else { DEAD_CHAR }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for alive in row {
                write!(f, "{}", cell_char(*alive))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn new_board_is_all_dead() {
        let board = Board::new(75).unwrap();
        assert_eq!(board.size(), 75);
        assert_eq!(board.rows().len(), 75);
        assert!(board.rows().all(|row| row.len() == 75));
        assert!(board.is_extinct());
        assert_eq!(board.live_count(), 0);
    }

    #[test]
    fn zero_size_is_rejected() {
        assert_eq!(Board::new(0), Err(BoardError::Empty));
        assert_eq!(Board::from_rows(Vec::new()), Err(BoardError::Empty));
        assert_eq!(
            Board::from_rows(vec![Vec::new(), Vec::new()]),
            Err(BoardError::Empty)
        );
    }

    #[test]
    fn oversized_board_is_rejected_before_allocating() {
        let too_large = MAX_BOARD_SIZE.saturating_add(1);
        assert!(Board::new(MAX_BOARD_SIZE).is_ok());
        assert_eq!(
            Board::new(too_large),
            Err(BoardError::TooLarge { size: too_large })
        );
        assert_eq!(
            Board::new(1_000_000),
            Err(BoardError::TooLarge { size: 1_000_000 })
        );
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let rows = vec![vec![false; 3], vec![false; 2], vec![false; 3]];
        assert_eq!(
            Board::from_rows(rows),
            Err(BoardError::Ragged {
                row: 1,
                found: 2,
                expected: 3,
            })
        );
    }

    #[test]
    fn non_square_is_rejected() {
        let rows = vec![vec![false; 3], vec![false; 3]];
        assert_eq!(
            Board::from_rows(rows),
            Err(BoardError::NotSquare { rows: 2, cols: 3 })
        );
    }

    #[test]
    fn from_rows_preserves_cells() {
        let rows = vec![vec![true, false], vec![false, true]];
        let board = Board::from_rows(rows).unwrap();
        assert_eq!(board.get(0, 0), Some(true));
        assert_eq!(board.get(0, 1), Some(false));
        assert_eq!(board.get(1, 1), Some(true));
        assert_eq!(board.get(2, 0), None);
    }

    #[test]
    fn set_out_of_bounds_fails() {
        let mut board = Board::new(4).unwrap();
        assert_eq!(
            board.set(4, 0, true),
            Err(BoardError::OutOfBounds {
                row: 4,
                col: 0,
                size: 4,
            })
        );
        assert!(board.is_extinct());
    }

    #[test]
    fn with_alive_sets_listed_cells() {
        let board = Board::with_alive(5, &[(0, 0), (2, 3)]).unwrap();
        assert_eq!(board.live_count(), 2);
        assert_eq!(board.get(2, 3), Some(true));
        assert!(Board::with_alive(5, &[(5, 5)]).is_err());
    }

    #[test]
    fn display_renders_rows() {
        let board = Board::with_alive(3, &[(0, 0), (1, 1)]).unwrap();
        assert_eq!(board.to_string(), "#..\n.#.\n...\n");
        assert_eq!(board.row_strings(), vec!["#..", ".#.", "..."]);
    }
}
