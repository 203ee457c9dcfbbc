/// One play-through of a level, from shuffle to win or loss.
///
/// Owns the grid, the move counters, the sticky placement flags and
/// the countdown clock. The clock is a three-state machine:
///
/// ┌──────────┬───────────────────────────────┬──────────────┐
/// │ State     │ Trigger                       │ Next         │
/// ├──────────┼───────────────────────────────┼──────────────┤
/// │ Running   │ 1 Hz tick, countdown reaches 0│ Lost         │
/// │ Running   │ grid solved after a move      │ Won          │
/// │ Running   │ incorrect move                │ Running, −10s│
/// │ Won/Lost  │ anything                      │ unchanged    │
/// └──────────┴───────────────────────────────┴──────────────┘
///
/// Ticks are injected by the caller (the frame loop schedules one per
/// second); nothing in here reads the wall clock, so tests advance
/// time by calling `tick()`.
///
/// A penalty can floor the countdown at 0 without losing immediately:
/// the loss fires on the next tick, giving a one-tick grace period.
/// A win in that window still counts.

use rand::Rng;

use crate::domain::grid::{self, Grid};
use crate::domain::score::{self, Rating};
use crate::sim::event::AttemptEvent;

/// Seconds deducted for a move onto a target that was not already
/// correctly occupied.
pub const INCORRECT_MOVE_PENALTY: u32 = 10;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ClockState {
    Running,
    Won,
    Lost,
}

#[derive(Clone, Debug)]
pub struct Attempt {
    pub level: u32,
    pub grid: Grid,
    pub move_count: u32,
    pub incorrect_moves: u32,
    /// Seconds left. Never negative; floored by `saturating_sub`.
    pub remaining: u32,
    /// Starting budget, kept for the rating's time percentage.
    pub initial: u32,
    /// Sticky "was ever correctly placed" flags, display only.
    /// Win detection never reads these.
    pub ever_placed: Vec<bool>,
    pub clock: ClockState,
}

impl Attempt {
    /// Start a fresh attempt at `level`: shuffled grid, zeroed
    /// counters, full time budget, clock Running.
    pub fn new<R: Rng>(level: u32, rng: &mut R) -> Self {
        let side = grid::grid_side(level);
        let grid = Grid::shuffled(side, rng);
        let cells = grid.len();
        Attempt {
            level,
            grid,
            move_count: 0,
            incorrect_moves: 0,
            remaining: grid::initial_seconds(level),
            initial: grid::initial_seconds(level),
            ever_placed: vec![false; cells],
            clock: ClockState::Running,
        }
    }

    /// Cancel this attempt and re-enter Running with a fresh shuffle
    /// and a fresh time budget (level restart).
    pub fn restart<R: Rng>(&mut self, rng: &mut R) {
        *self = Attempt::new(self.level, rng);
    }

    /// Advance the countdown by one second. Only the tick may declare
    /// a loss; terminal states ignore it.
    pub fn tick(&mut self) -> Option<AttemptEvent> {
        if self.clock != ClockState::Running {
            return None;
        }
        if self.remaining <= 1 {
            self.remaining = 0;
            self.clock = ClockState::Lost;
            return Some(AttemptEvent::Lost);
        }
        self.remaining -= 1;
        None
    }

    /// Apply a UI move (`source` dragged onto `target`).
    ///
    /// Correctness is judged against the pre-swap occupant of
    /// `target` (see `Grid::apply_move`); an incorrect move costs
    /// `INCORRECT_MOVE_PENALTY` seconds, floored at 0. The win check
    /// runs after the swap.
    pub fn apply_move(&mut self, source: usize, target: usize) -> Vec<AttemptEvent> {
        if self.clock != ClockState::Running {
            return vec![];
        }

        let outcome = self.grid.apply_move(source, target);
        if !outcome.counted {
            return vec![];
        }

        let mut events = Vec::with_capacity(2);
        self.move_count += 1;

        if outcome.correct_placement {
            events.push(AttemptEvent::CorrectPlacement { target });
        } else {
            self.incorrect_moves += 1;
            self.remaining = self.remaining.saturating_sub(INCORRECT_MOVE_PENALTY);
            events.push(AttemptEvent::IncorrectMove { target });
        }

        // Sticky display flags track where a piece currently sits
        // correctly; once set they stay set.
        for index in [source, target] {
            if self.grid.piece_at(index) == index {
                self.ever_placed[index] = true;
            }
        }

        if self.grid.is_solved() {
            self.clock = ClockState::Won;
            events.push(AttemptEvent::Won);
        }
        events
    }

    /// Score gained by this (won) attempt.
    pub fn score_delta(&self) -> i64 {
        score::score_delta(self.remaining, self.move_count)
    }

    pub fn rating(&self) -> Rating {
        score::rate(self.remaining, self.initial, self.incorrect_moves)
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
