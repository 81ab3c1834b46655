use crate::types::{ActionId, Tick};

#[derive(Clone, Debug)]
pub struct ActionEnvelope<A> {
    pub action_id: ActionId,
    pub intended_tick: Tick,
    pub payload: A,
}

impl<A> ActionEnvelope<A> {
    pub fn new(action_id: ActionId, intended_tick: Tick, payload: A) -> Self {
        Self {
            action_id,
            intended_tick,
            payload,
        }
    }
}
