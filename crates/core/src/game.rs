use crate::envelope::ActionEnvelope;
use crate::types::Tick;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TerminalOutcome {
    Win,
    Lose,
}

/// A deterministic, single-threaded game advanced one tick at a time.
///
/// Construction may fail when the configuration cannot produce a playable
/// game; everything after that is infallible and reported through events.
pub trait Game: Sized {
    type Config: Clone + 'static;
    type Action: Clone + 'static;
    type Observation: Clone + 'static;
    type Event: Clone + 'static;
    type Error: std::error::Error + 'static;

    fn new(config: Self::Config, seed: u64) -> Result<Self, Self::Error>;

    fn step(
        &mut self,
        tick: Tick,
        actions: &[ActionEnvelope<Self::Action>],
        out_events: &mut Vec<Self::Event>,
    );

    fn observe(&self, tick: Tick) -> Self::Observation;

    fn is_terminal(&self) -> Option<TerminalOutcome>;
}
