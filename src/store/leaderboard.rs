/// Leaderboard: top players by total score, derived from the
/// progress store and never persisted on its own.
///
/// Holds a `ChangeSignal` subscribed to the store; the frame loop
/// calls `refresh_if_changed` once per frame, so every same-process
/// write shows up on the next render without any storage-event
/// plumbing.

use crate::store::progress::{ChangeSignal, ProgressStore};

/// How many players the board shows.
pub const TOP_N: usize = 5;

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct LeaderboardEntry {
    pub identity: String,
    pub total_score: i64,
}

pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
    signal: ChangeSignal,
}

impl Leaderboard {
    /// Subscribe to the store and compute the initial board.
    pub fn new(store: &mut ProgressStore) -> Self {
        let signal = store.subscribe();
        let mut board = Leaderboard { entries: vec![], signal };
        board.rebuild(store);
        board
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    /// Rebuild only if the store has written since the last check.
    /// Returns true when the board was recomputed.
    pub fn refresh_if_changed(&mut self, store: &ProgressStore) -> bool {
        if self.signal.take() {
            self.rebuild(store);
            true
        } else {
            false
        }
    }

    /// Recompute from every stored profile: drop empty identities and
    /// negative scores, sort by score descending, keep the top 5.
    pub fn rebuild(&mut self, store: &ProgressStore) {
        let mut entries: Vec<LeaderboardEntry> = store
            .all_profiles()
            .into_iter()
            .filter(|p| !p.identity.is_empty() && p.total_score >= 0)
            .map(|p| LeaderboardEntry { identity: p.identity, total_score: p.total_score })
            .collect();
        entries.sort_by(|a, b| b.total_score.cmp(&a.total_score));
        entries.truncate(TOP_N);
        self.entries = entries;
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
