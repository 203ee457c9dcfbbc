/// Scoring for a completed (won) attempt.
///
/// Pure functions with no side effects. The score delta rewards leftover
/// time and charges for every counted move; it can go negative and is
/// never clamped, so a sloppy win may cost total score.
///
/// ## Rating Table (first match wins, top-down)
/// ┌──────────────────────────────────────┬────────────────────┐
/// │ Condition                             │ Rating             │
/// ├──────────────────────────────────────┼────────────────────┤
/// │ time% ≥ 70 and incorrect == 0         │ Excellent          │
/// │ time% ≥ 50 and incorrect ≤ 3          │ Good Job           │
/// │ time% ≥ 30 and incorrect ≤ 6          │ You Can Do Better  │
/// │ otherwise                             │ Please Try Again   │
/// └──────────────────────────────────────┴────────────────────┘

/// Points gained (or lost) by a won attempt:
/// 10 per remaining second, minus 5 per move.
pub fn score_delta(remaining_seconds: u32, move_count: u32) -> i64 {
    remaining_seconds as i64 * 10 - move_count as i64 * 5
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Rating {
    Excellent,
    GoodJob,
    YouCanDoBetter,
    PleaseTryAgain,
}

impl Rating {
    pub fn label(self) -> &'static str {
        match self {
            Rating::Excellent      => "Excellent",
            Rating::GoodJob        => "Good Job",
            Rating::YouCanDoBetter => "You Can Do Better",
            Rating::PleaseTryAgain => "Please Try Again",
        }
    }
}

/// Qualitative rating from remaining time and incorrect-move count.
/// `initial_seconds` must be the attempt's starting budget.
pub fn rate(remaining_seconds: u32, initial_seconds: u32, incorrect_moves: u32) -> Rating {
    let time_percentage = if initial_seconds == 0 {
        0.0
    } else {
        remaining_seconds as f64 / initial_seconds as f64 * 100.0
    };

    if time_percentage >= 70.0 && incorrect_moves == 0 {
        Rating::Excellent
    } else if time_percentage >= 50.0 && incorrect_moves <= 3 {
        Rating::GoodJob
    } else if time_percentage >= 30.0 && incorrect_moves <= 6 {
        Rating::YouCanDoBetter
    } else {
        Rating::PleaseTryAgain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_rewards_time_and_charges_moves() {
        assert_eq!(score_delta(120, 10), 1150);
        assert_eq!(score_delta(0, 0), 0);
    }

    #[test]
    fn delta_can_go_negative() {
        assert_eq!(score_delta(1, 10), -40);
    }

    #[test]
    fn excellent_at_seventy_percent_exactly() {
        // 420/600 = exactly 70%
        assert_eq!(rate(420, 600, 0), Rating::Excellent);
    }

    #[test]
    fn just_below_seventy_falls_to_good_job() {
        // 419/600 ≈ 69.8%, still ≥ 50% with 0 incorrect
        assert_eq!(rate(419, 600, 0), Rating::GoodJob);
    }

    #[test]
    fn incorrect_moves_break_excellent() {
        assert_eq!(rate(590, 600, 1), Rating::GoodJob);
    }

    #[test]
    fn middle_tiers() {
        assert_eq!(rate(300, 600, 3), Rating::GoodJob);
        assert_eq!(rate(300, 600, 4), Rating::YouCanDoBetter);
        assert_eq!(rate(180, 600, 6), Rating::YouCanDoBetter);
    }

    #[test]
    fn worst_tier() {
        assert_eq!(rate(180, 600, 7), Rating::PleaseTryAgain);
        assert_eq!(rate(10, 600, 0), Rating::PleaseTryAgain);
    }

    #[test]
    fn zero_budget_rates_worst() {
        assert_eq!(rate(0, 0, 0), Rating::PleaseTryAgain);
    }
}
