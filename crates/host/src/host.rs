use sim_core::{ActionEnvelope, ActionId, Game, TerminalOutcome, Tick};
use std::collections::BTreeMap;

#[derive(Debug)]
pub struct RunResult<G: Game> {
    pub outcome: Option<TerminalOutcome>,
    pub final_tick: Tick,
    pub events: Vec<G::Event>,
}

/// Drives a single game instance: owns the tick counter and the queue of
/// actions waiting for their tick.
pub struct MatchHost<G: Game> {
    game: G,
    current_tick: Tick,
    tick_hz: u32,
    next_action_id: ActionId,
    pending_actions: BTreeMap<Tick, Vec<ActionEnvelope<G::Action>>>,
}

impl<G: Game> MatchHost<G> {
    pub fn new(config: G::Config, seed: u64, tick_hz: u32) -> Result<Self, G::Error> {
        Ok(Self {
            game: G::new(config, seed)?,
            current_tick: 0,
            tick_hz,
            next_action_id: 0,
            pending_actions: BTreeMap::new(),
        })
    }

    /// Submit an action to be executed at the given tick.
    /// If `intended_tick` is in the past or current, schedules for the next tick.
    /// Returns the actual tick the action was scheduled for.
    pub fn submit(&mut self, mut action: ActionEnvelope<G::Action>) -> Tick {
        let scheduled_tick = if action.intended_tick <= self.current_tick {
            self.current_tick + 1
        } else {
            action.intended_tick
        };

        action.intended_tick = scheduled_tick;
        self.next_action_id = self.next_action_id.max(action.action_id + 1);
        self.pending_actions
            .entry(scheduled_tick)
            .or_default()
            .push(action);

        scheduled_tick
    }

    /// Queue a payload for the next tick with a host-assigned action id.
    pub fn submit_next(&mut self, payload: G::Action) -> Tick {
        let id = self.next_action_id;
        self.submit(ActionEnvelope::new(id, self.current_tick + 1, payload))
    }

    /// Queue a payload for a specific tick with a host-assigned action id.
    pub fn submit_at(&mut self, tick: Tick, payload: G::Action) -> Tick {
        let id = self.next_action_id;
        self.submit(ActionEnvelope::new(id, tick, payload))
    }

    pub fn run_for_ticks(&mut self, max_ticks: Tick) -> RunResult<G> {
        let mut all_events = Vec::new();

        for _ in 0..max_ticks {
            match self.step_one_tick() {
                Some(events) => all_events.extend(events),
                None => break,
            }
        }

        RunResult {
            outcome: self.game.is_terminal(),
            final_tick: self.current_tick,
            events: all_events,
        }
    }

    /// Advance by one tick. Returns None if game already terminal, otherwise the events from this tick.
    pub fn step_one_tick(&mut self) -> Option<Vec<G::Event>> {
        if self.game.is_terminal().is_some() {
            return None;
        }

        self.current_tick += 1;

        let mut actions = self
            .pending_actions
            .remove(&self.current_tick)
            .unwrap_or_default();

        actions.sort_by_key(|a| a.action_id);

        let mut tick_events = Vec::new();
        self.game
            .step(self.current_tick, &actions, &mut tick_events);

        Some(tick_events)
    }

    pub fn observe(&self) -> G::Observation {
        self.game.observe(self.current_tick)
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn current_tick(&self) -> Tick {
        self.current_tick
    }

    pub fn tick_hz(&self) -> u32 {
        self.tick_hz
    }

    pub fn is_terminal(&self) -> Option<TerminalOutcome> {
        self.game.is_terminal()
    }
}
