/// Puzzle grid: a permutation of piece values over cell positions.
///
/// Position `i` holds piece `grid[i]`; the grid is solved when every
/// position holds its own piece (`grid[i] == i`).
///
/// ## Move Rules
/// ┌──────────────────────────┬──────────────────────────────┐
/// │ Condition                 │ Effect                       │
/// ├──────────────────────────┼──────────────────────────────┤
/// │ source == target          │ no-op, move not counted      │
/// │ source != target          │ swap values at both indices  │
/// │ either index out of range │ no-op, move not counted      │
/// └──────────────────────────┴──────────────────────────────┘
///
/// The `correct_placement` flag of a counted move reports whether the
/// piece that sat at `target` BEFORE the swap was already correct
/// (`old[target] == target`). The penalty logic deliberately looks at
/// the pre-swap occupant, not the newly placed piece; the evaluation
/// order is load-bearing for scoring and must not be reordered.

use rand::seq::SliceRandom;
use rand::Rng;

/// Highest playable level. Level 11 is the 12×12 cap.
pub const MAX_LEVEL: u32 = 11;

/// Side length of the grid for a level: 2×2 at level 1, +1 per level,
/// capped at 12×12.
pub fn grid_side(level: u32) -> usize {
    ((level + 1).min(12)) as usize
}

/// Initial countdown budget for a level, in seconds:
/// 600 at level 1, 30 fewer per level.
pub fn initial_seconds(level: u32) -> u32 {
    600 - (level.saturating_sub(1)) * 30
}

/// Result of applying a move to a grid.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct MoveOutcome {
    /// False when the move was a no-op (same index or out of range).
    pub counted: bool,
    /// Pre-swap occupant check: was `grid[target] == target` before
    /// the swap? Only meaningful when `counted`.
    pub correct_placement: bool,
}

impl MoveOutcome {
    const IGNORED: MoveOutcome = MoveOutcome { counted: false, correct_placement: false };
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Grid {
    cells: Vec<usize>,
    side: usize,
}

impl Grid {
    /// A shuffled grid for the given side length. Fisher-Yates over
    /// `0..side²`, so every permutation is equally likely. No
    /// solvability constraint beyond "is a permutation": the shuffle
    /// may, rarely, hand back the solved arrangement.
    pub fn shuffled<R: Rng>(side: usize, rng: &mut R) -> Self {
        let mut cells: Vec<usize> = (0..side * side).collect();
        cells.shuffle(rng);
        Grid { cells, side }
    }

    /// Grid already in the solved arrangement (tests, previews).
    pub fn solved(side: usize) -> Self {
        Grid { cells: (0..side * side).collect(), side }
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Piece value at a position, for rendering.
    pub fn piece_at(&self, index: usize) -> usize {
        self.cells[index]
    }

    pub fn cells(&self) -> &[usize] {
        &self.cells
    }

    /// Is every piece on its own position?
    pub fn is_solved(&self) -> bool {
        self.cells.iter().enumerate().all(|(i, &p)| p == i)
    }

    /// Swap the pieces at `source` and `target`.
    ///
    /// Same-index and out-of-range moves are ignored (`counted` is
    /// false). The correctness flag is evaluated against the pre-swap
    /// occupant of `target`; see module docs.
    pub fn apply_move(&mut self, source: usize, target: usize) -> MoveOutcome {
        if source == target || source >= self.cells.len() || target >= self.cells.len() {
            return MoveOutcome::IGNORED;
        }
        let correct_placement = self.cells[target] == target;
        self.cells.swap(source, target);
        MoveOutcome { counted: true, correct_placement }
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0xC0FFEE)
    }

    // ── Level geometry ──

    #[test]
    fn side_grows_with_level() {
        assert_eq!(grid_side(1), 2);
        assert_eq!(grid_side(2), 3);
        assert_eq!(grid_side(10), 11);
        assert_eq!(grid_side(11), 12);
    }

    #[test]
    fn side_caps_at_twelve() {
        assert_eq!(grid_side(12), 12);
        assert_eq!(grid_side(99), 12);
    }

    #[test]
    fn initial_seconds_per_level() {
        assert_eq!(initial_seconds(1), 600);
        assert_eq!(initial_seconds(2), 570);
        assert_eq!(initial_seconds(11), 300);
    }

    // ── Shuffle ──

    #[test]
    fn shuffle_yields_permutation_for_every_level() {
        let mut r = rng();
        for level in 1..=MAX_LEVEL {
            let side = grid_side(level);
            let grid = Grid::shuffled(side, &mut r);
            assert_eq!(grid.len(), side * side);
            let mut seen = vec![false; side * side];
            for &p in grid.cells() {
                assert!(p < side * side);
                assert!(!seen[p], "duplicate piece {} at side {}", p, side);
                seen[p] = true;
            }
        }
    }

    // ── Win detection ──

    #[test]
    fn solved_grid_is_won() {
        assert!(Grid::solved(3).is_solved());
    }

    #[test]
    fn single_transposition_is_not_won() {
        let mut grid = Grid::solved(3);
        grid.apply_move(0, 1);
        assert!(!grid.is_solved());
    }

    // ── Moves ──

    #[test]
    fn same_index_move_is_ignored() {
        let mut grid = Grid::solved(2);
        let before = grid.clone();
        let outcome = grid.apply_move(2, 2);
        assert!(!outcome.counted);
        assert_eq!(grid, before);
    }

    #[test]
    fn out_of_range_move_is_ignored() {
        let mut grid = Grid::solved(2);
        assert!(!grid.apply_move(0, 99).counted);
        assert!(!grid.apply_move(99, 0).counted);
    }

    #[test]
    fn move_swaps_both_cells() {
        let mut grid = Grid::solved(2);
        let outcome = grid.apply_move(0, 3);
        assert!(outcome.counted);
        assert_eq!(grid.piece_at(0), 3);
        assert_eq!(grid.piece_at(3), 0);
    }

    #[test]
    fn correctness_checks_pre_swap_occupant() {
        // target 1 holds piece 1 before the swap: flag is true even
        // though the swap displaces it.
        let mut grid = Grid::solved(2);
        let outcome = grid.apply_move(0, 1);
        assert!(outcome.correct_placement);
        assert_eq!(grid.piece_at(1), 0); // post-swap occupant is wrong

        // Swapping back: target 1 now holds piece 0, so the flag is
        // false even though the swap puts piece 1 back in place.
        let outcome = grid.apply_move(0, 1);
        assert!(!outcome.correct_placement);
        assert_eq!(grid.piece_at(1), 1);
    }

    #[test]
    fn solving_by_swaps_reaches_won() {
        let mut r = rng();
        let mut grid = Grid::shuffled(3, &mut r);
        // Selection-sort the permutation with swap moves.
        for pos in 0..grid.len() {
            if grid.piece_at(pos) != pos {
                let from = grid.cells().iter().position(|&p| p == pos).unwrap();
                grid.apply_move(from, pos);
            }
        }
        assert!(grid.is_solved());
    }
}
