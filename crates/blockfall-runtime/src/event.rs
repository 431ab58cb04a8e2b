use blockfall_engine::Move;

/// Events the game driver reacts to, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant, derive_more::From)]
pub(super) enum DriverEvent {
    /// The drop timer fired.
    Tick,
    /// A move from the input source.
    Input(Move),
    /// Every input sender is gone.
    InputClosed,
}
