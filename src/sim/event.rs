/// Events emitted by an attempt as moves and clock ticks land.
/// The presentation layer consumes these for messages and screen
/// changes; the store wiring reacts to Won/Lost exactly once each.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AttemptEvent {
    /// A counted move whose target already held its correct piece.
    CorrectPlacement { target: usize },
    /// A counted move that cost the 10-second penalty.
    IncorrectMove { target: usize },
    /// The grid reached the solved arrangement. Terminal.
    Won,
    /// The countdown expired. Terminal.
    Lost,
}
