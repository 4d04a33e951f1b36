//! Random board seeding.

use rand::Rng;

use crate::board::Board;

/// Upper bound (exclusive) of the per-cell draw. A cell is alive when its
/// draw is odd, which gives an even split.
const SEED_DRAW_RANGE: u32 = 50;

/// Return a new board of the same size as `board` with every cell
/// independently set alive or dead.
///
/// The input is only used for its size. Pass a seeded RNG for a
/// reproducible board.
pub fn seed(board: &Board, rng: &mut impl Rng) -> Board {
    let size = board.size();
    let cells = board
        .cells()
        .iter()
        .map(|_| rng.random_range(0..SEED_DRAW_RANGE) % 2 == 1)
        .collect();
    Board::from_parts(size, cells)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn seeded_board_keeps_size() {
        let board = Board::new(30).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let seeded = seed(&board, &mut rng);
        assert_eq!(seeded.size(), 30);
        assert!(seeded.rows().all(|row| row.len() == 30));
    }

    #[test]
    fn seeding_is_roughly_balanced() {
        let board = Board::new(75).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let live = seed(&board, &mut rng).live_count();
        let total = 75 * 75;
        // 5625 fair draws: anything outside 40%..60% is far beyond noise.
        assert!(live > total * 4 / 10, "too few live cells: {live}");
        assert!(live < total * 6 / 10, "too many live cells: {live}");
    }

    #[test]
    fn same_seed_same_board() {
        let board = Board::new(16).unwrap();
        let a = seed(&board, &mut StdRng::seed_from_u64(99));
        let b = seed(&board, &mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    fn input_board_is_untouched() {
        let board = Board::with_alive(8, &[(1, 1)]).unwrap();
        let copy = board.clone();
        let _ = seed(&board, &mut StdRng::seed_from_u64(1));
        assert_eq!(board, copy);
    }
}
