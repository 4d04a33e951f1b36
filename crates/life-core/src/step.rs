//! Conway's rule on a torus.
//!
//! Neighbour coordinates wrap modulo the board size, so the top edge is
//! adjacent to the bottom edge and the left edge to the right edge. There
//! are no boundary cells.

use crate::board::Board;

/// Advance `board` by one generation.
///
/// The input is left untouched; the returned board shares no storage with
/// it. A live cell survives with 2 or 3 live neighbours, a dead cell comes
/// alive with exactly 3, every other cell is dead in the result.
pub fn step(board: &Board) -> Board {
    let size = board.size();
    let cells = board
        .rows()
        .enumerate()
        .flat_map(|(row, cells)| {
            cells.iter().enumerate().map(move |(col, alive)| {
                next_state(*alive, live_neighbours(board, row, col))
            })
        })
        .collect();
    Board::from_parts(size, cells)
}

/// The rule itself: current state and live neighbour count to next state.
pub const fn next_state(alive: bool, neighbours: usize) -> bool {
    matches!((alive, neighbours), (true, 2 | 3) | (false, 3))
}

/// Relative positions of the 8 Moore neighbours.
const NEIGHBOUR_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Count live cells among the 8 Moore neighbours of (`row`, `col`), with
/// toroidal wraparound.
///
/// On boards smaller than 3×3 the same cell can be reached through several
/// offsets and is counted once per offset.
pub fn live_neighbours(board: &Board, row: usize, col: usize) -> usize {
    let size = board.size();
    let cells = board.cells();

    NEIGHBOUR_OFFSETS
        .iter()
        .filter(|(dr, dc)| {
            let r = wrap(row, shift(*dr, size), size);
            let c = wrap(col, shift(*dc, size), size);
            r.checked_mul(size)
                .and_then(|base| base.checked_add(c))
                .and_then(|idx| cells.get(idx))
                .copied()
                .unwrap_or(false)
        })
        .count()
}

/// Express an offset of -1, 0 or +1 as a non-negative shift modulo `size`.
const fn shift(offset: i8, size: usize) -> usize {
    match offset {
        -1 => size.saturating_sub(1),
        0 => 0,
        _ => 1,
    }
}

/// `(coord + shift) % size` for `coord < size` and `shift < size`.
#[allow(clippy::arithmetic_side_effects)]
const fn wrap(coord: usize, shift: usize, size: usize) -> usize {
    // size > 0 for every Board, and coord + shift < 2 * size.
    (coord + shift) % size
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn blinker_horizontal() -> Board {
        Board::with_alive(7, &[(3, 2), (3, 3), (3, 4)]).unwrap()
    }

    #[test]
    fn rule_table() {
        assert!(!next_state(true, 0));
        assert!(!next_state(true, 1));
        assert!(next_state(true, 2));
        assert!(next_state(true, 3));
        assert!(!next_state(true, 4));
        assert!(!next_state(false, 2));
        assert!(next_state(false, 3));
        assert!(!next_state(false, 8));
    }

    #[test]
    fn dimensions_are_preserved() {
        for size in [1, 2, 3, 10, 75] {
            let board = Board::new(size).unwrap();
            let next = step(&board);
            assert_eq!(next.size(), size);
            assert!(next.rows().all(|row| row.len() == size));
        }
    }

    #[test]
    fn all_dead_stays_dead() {
        let board = Board::new(20).unwrap();
        assert!(step(&board).is_extinct());
    }

    #[test]
    fn single_cell_dies() {
        let board = Board::with_alive(10, &[(4, 4)]).unwrap();
        assert!(step(&board).is_extinct());
    }

    #[test]
    fn sparse_cells_die_out() {
        // Pairs and singletons: every live cell has at most one neighbour.
        let board =
            Board::with_alive(12, &[(0, 0), (0, 1), (5, 5), (9, 2), (9, 3)]).unwrap();
        assert!(step(&board).is_extinct());
    }

    #[test]
    fn block_is_still_life() {
        let block = Board::with_alive(8, &[(3, 3), (3, 4), (4, 3), (4, 4)]).unwrap();
        assert_eq!(step(&block), block);
    }

    #[test]
    fn blinker_has_period_two() {
        let start = blinker_horizontal();
        let once = step(&start);
        let vertical = Board::with_alive(7, &[(2, 3), (3, 3), (4, 3)]).unwrap();
        assert_eq!(once, vertical);
        assert_ne!(once, start);
        assert_eq!(step(&once), start);
    }

    #[test]
    fn input_is_not_mutated() {
        let start = blinker_horizontal();
        let copy = start.clone();
        let _ = step(&start);
        assert_eq!(start, copy);
    }

    #[test]
    fn corner_counts_wrapped_neighbours() {
        let n = 6;
        let board = Board::with_alive(n, &[(n - 1, n - 1), (n - 1, 0), (0, n - 1)]).unwrap();
        assert_eq!(live_neighbours(&board, 0, 0), 3);
        // (0,0) is dead with three wrapped neighbours, so it is born.
        let next = step(&board);
        assert_eq!(next.get(0, 0), Some(true));
    }

    #[test]
    fn live_corner_is_seen_across_edges() {
        let n = 6;
        let board = Board::with_alive(n, &[(0, 0)]).unwrap();
        assert_eq!(live_neighbours(&board, n - 1, n - 1), 1);
        assert_eq!(live_neighbours(&board, n - 1, 0), 1);
        assert_eq!(live_neighbours(&board, 0, n - 1), 1);
        assert_eq!(live_neighbours(&board, 2, 2), 0);
    }

    #[test]
    fn block_straddling_the_corner_is_still_life() {
        let n = 9;
        let block =
            Board::with_alive(n, &[(0, 0), (0, n - 1), (n - 1, 0), (n - 1, n - 1)]).unwrap();
        assert_eq!(step(&block), block);
    }

    #[test]
    fn glider_returns_shifted_after_four_steps() {
        let n = 10;
        let glider =
            Board::with_alive(n, &[(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)]).unwrap();
        let moved =
            Board::with_alive(n, &[(1, 2), (2, 3), (3, 1), (3, 2), (3, 3)]).unwrap();
        let mut board = glider;
        for _ in 0..4 {
            board = step(&board);
        }
        assert_eq!(board, moved);
    }
}
