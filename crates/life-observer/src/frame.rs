//! JSON projection of a generation sent to viewers.

use life_core::Generation;

/// A generation as it goes over the wire.
///
/// Rows are strings of `#` (alive) and `.` (dead), top to bottom.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BoardFrame {
    /// Run counter.
    pub run: u64,
    /// Generation number within the run.
    pub generation: u64,
    /// Board side length.
    pub size: usize,
    /// Number of live cells.
    pub live: u64,
    /// One string per row.
    pub rows: Vec<String>,
}

impl From<&Generation> for BoardFrame {
    fn from(generation: &Generation) -> Self {
        let board = &generation.board;
        Self {
            run: generation.run,
            generation: generation.number,
            size: board.size(),
            live: u64::try_from(board.live_count()).unwrap_or(u64::MAX),
            rows: board.row_strings(),
        }
    }
}
