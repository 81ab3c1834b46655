use crate::actions::TdAction;
use crate::config::TdConfig;
use crate::economy::SellError;
use crate::error::TdError;
use crate::events::TdEvent;
use crate::map::{scatter_obstacles, TileMap};
use crate::pathing::resolve_paths;
use crate::systems;
use crate::world::{TdState, TowerId};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sim_core::{ActionEnvelope, Game, TerminalOutcome, Tick};
use td_types::Hud;
use tracing::{debug, info};

pub struct TdGame {
    state: TdState,
    seed: u64,
    /// HUD values last pushed to the caller.
    last_hud: Hud,
}

impl TdGame {
    /// Builds a game on a prepared map, skipping layout selection and obstacles.
    pub fn from_map(config: TdConfig, map: TileMap, seed: u64) -> Result<Self, TdError> {
        if config.tick_hz == 0 {
            return Err(TdError::ZeroTickRate);
        }

        let paths = resolve_paths(&map, config.tile_size);
        if paths.is_empty() {
            return Err(TdError::NoSpawnPoints);
        }

        info!(
            width = map.width,
            height = map.height,
            spawns = paths.len(),
            "map ready"
        );

        let state = TdState::new(config, map, paths);
        Ok(Self {
            last_hud: state.hud(),
            state,
            seed,
        })
    }

    pub fn state(&self) -> &TdState {
        &self.state
    }

    /// Throws away all progress and queues wave 1 again on the same map.
    /// Ids handed out before the restart stay dead.
    pub fn restart(&mut self) {
        self.state.reset();
        info!(seed = self.seed, "game restarted");
    }

    fn apply(&mut self, action: &TdAction, events: &mut Vec<TdEvent>) {
        match *action {
            TdAction::PlaceTower { kind, col, row } => {
                if let Err(reason) =
                    systems::try_place_tower(&mut self.state, kind, col, row, events)
                {
                    debug!(%reason, "placement rejected");
                    events.push(TdEvent::PlacementRejected {
                        kind,
                        col,
                        row,
                        reason,
                    });
                }
            }
            TdAction::SellTower { tower } => self.sell(tower, events),
            TdAction::SellAt { col, row } => {
                let tower = self
                    .state
                    .map
                    .tile(col, row)
                    .and_then(|_| self.state.world.occupancy.tower_at(col, row));
                match tower {
                    Some(tower) => self.sell(tower, events),
                    None => events.push(TdEvent::SaleRejected {
                        reason: SellError::MissingTower,
                    }),
                }
            }
            TdAction::SetPaused(paused) => {
                if self.state.outcome.is_some() || self.state.paused == paused {
                    return;
                }
                self.state.paused = paused;
                events.push(if paused {
                    TdEvent::Paused
                } else {
                    TdEvent::Resumed
                });
            }
            TdAction::Restart => self.restart(),
        }
    }

    fn sell(&mut self, tower: TowerId, events: &mut Vec<TdEvent>) {
        if let Err(reason) = systems::try_sell_tower(&mut self.state, tower, events) {
            debug!(%reason, "sale rejected");
            events.push(TdEvent::SaleRejected { reason });
        }
    }
}

impl Game for TdGame {
    type Config = TdConfig;
    type Action = TdAction;
    type Observation = td_types::TdObservation;
    type Event = TdEvent;
    type Error = TdError;

    fn new(config: Self::Config, seed: u64) -> Result<Self, Self::Error> {
        let mut map = match &config.layout {
            Some(rows) => TileMap::from_rows(rows)?,
            None => config.map.build(),
        };

        if let Some(params) = &config.obstacles {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let keep_last_column =
                config.layout.is_none() && config.map.keeps_last_column_clear();
            let placed = scatter_obstacles(&mut map, &mut rng, params, keep_last_column);
            debug!(placed, seed, "obstacles scattered");
        }

        Self::from_map(config, map, seed)
    }

    fn step(
        &mut self,
        tick: Tick,
        actions: &[ActionEnvelope<Self::Action>],
        out_events: &mut Vec<Self::Event>,
    ) {
        self.state.tick = tick;

        // 1. Input
        for action in actions {
            self.apply(&action.payload, out_events);
        }

        // 2. Simulation, frozen while paused or finished
        if self.state.is_running() {
            self.state.clock += 1;
            systems::fire_timers(&mut self.state, out_events);
            systems::move_enemies(&mut self.state, out_events);

            if self.state.outcome.is_none() {
                systems::tower_attacks(&mut self.state, out_events);
                systems::move_projectiles(&mut self.state, out_events);
                systems::check_wave_completion(&mut self.state, out_events);
            }
        }

        // 3. HUD push
        let hud = self.state.hud();
        if hud != self.last_hud {
            self.last_hud = hud;
            out_events.push(TdEvent::Hud {
                money: hud.money,
                lives: hud.lives,
                wave: hud.wave,
            });
        }
    }

    fn observe(&self, tick: Tick) -> Self::Observation {
        crate::observe::build_observation(&self.state, tick)
    }

    fn is_terminal(&self) -> Option<TerminalOutcome> {
        self.state.outcome
    }
}
