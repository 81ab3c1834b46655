use crate::config::TdConfig;
use crate::economy::Economy;
use crate::enemy::Enemy;
use crate::map::TileMap;
use crate::pathing::Path;
use crate::projectile::Projectile;
use crate::timers::{TimerEvent, TimerQueue};
use crate::tower::Tower;
use sim_core::{TerminalOutcome, Tick};
use slotmap::{new_key_type, SlotMap};

new_key_type! { pub struct EnemyId; }
new_key_type! { pub struct TowerId; }
new_key_type! { pub struct ProjectileId; }

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CellState {
    #[default]
    Empty,
    Tower(TowerId),
}

/// Which buildable tiles hold a tower.
#[derive(Clone, Debug)]
pub struct Occupancy {
    width: u16,
    cells: Vec<CellState>,
}

impl Occupancy {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            cells: vec![CellState::Empty; (width as usize) * (height as usize)],
        }
    }

    #[inline]
    fn idx(&self, col: u16, row: u16) -> usize {
        (row as usize) * (self.width as usize) + (col as usize)
    }

    #[inline]
    pub fn get(&self, col: u16, row: u16) -> CellState {
        self.cells[self.idx(col, row)]
    }

    #[inline]
    pub fn set(&mut self, col: u16, row: u16, state: CellState) {
        let idx = self.idx(col, row);
        self.cells[idx] = state;
    }

    pub fn tower_at(&self, col: u16, row: u16) -> Option<TowerId> {
        match self.get(col, row) {
            CellState::Tower(id) => Some(id),
            CellState::Empty => None,
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(CellState::Empty);
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WavePhase {
    /// Between waves. `starts_at` is the clock tick of the queued start.
    Pause {
        next_wave: u32,
        starts_at: Option<Tick>,
    },
    InWave {
        wave: u32,
        /// Spawn instructions still queued for this wave.
        spawns_remaining: u32,
        spawned: u32,
    },
}

#[derive(Clone, Debug)]
pub struct World {
    pub enemies: SlotMap<EnemyId, Enemy>,
    pub towers: SlotMap<TowerId, Tower>,
    pub projectiles: SlotMap<ProjectileId, Projectile>,
    pub occupancy: Occupancy,
}

impl World {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            enemies: SlotMap::with_key(),
            towers: SlotMap::with_key(),
            projectiles: SlotMap::with_key(),
            occupancy: Occupancy::new(width, height),
        }
    }

    /// Removes every agent. The slot maps are kept so that their keys
    /// never resolve again.
    pub fn clear(&mut self) {
        self.enemies.clear();
        self.towers.clear();
        self.projectiles.clear();
        self.occupancy.clear();
    }
}

#[derive(Clone, Debug)]
pub struct TdState {
    pub config: TdConfig,
    pub map: TileMap,
    pub paths: Vec<Path>,
    /// Last host tick seen.
    pub tick: Tick,
    /// Simulation clock. Stands still while paused or finished.
    pub clock: Tick,
    pub paused: bool,
    pub world: World,
    pub economy: Economy,
    /// Wave shown on the HUD: the one running, or the next one to start.
    pub current_wave: u32,
    pub phase: WavePhase,
    pub timers: TimerQueue<TimerEvent>,
    pub outcome: Option<TerminalOutcome>,
}

impl TdState {
    /// Fresh game on an already resolved map. Queues the first wave.
    pub fn new(config: TdConfig, map: TileMap, paths: Vec<Path>) -> Self {
        let mut state = Self {
            world: World::new(map.width, map.height),
            economy: Economy::new(&config),
            tick: 0,
            clock: 0,
            paused: false,
            current_wave: 1,
            phase: WavePhase::Pause {
                next_wave: 1,
                starts_at: None,
            },
            timers: TimerQueue::new(),
            outcome: None,
            config,
            map,
            paths,
        };
        state.queue_first_wave();
        state
    }

    /// Back to the opening position on the same map and paths.
    pub fn reset(&mut self) {
        self.world.clear();
        self.economy = Economy::new(&self.config);
        self.clock = 0;
        self.paused = false;
        self.current_wave = 1;
        self.outcome = None;
        self.timers.clear();
        self.queue_first_wave();
    }

    fn queue_first_wave(&mut self) {
        let at = self.config.millis_to_ticks(self.config.first_wave_delay_ms);
        self.timers.schedule(at, TimerEvent::StartWave(1));
        self.phase = WavePhase::Pause {
            next_wave: 1,
            starts_at: Some(at),
        };
    }

    /// Agents only advance while this holds.
    pub fn is_running(&self) -> bool {
        !self.paused && self.outcome.is_none()
    }

    pub fn hud(&self) -> td_types::Hud {
        td_types::Hud {
            money: self.economy.money,
            lives: self.economy.lives,
            wave: self.current_wave,
        }
    }
}
