use crate::config::{EnemyKind, EnemySpec};
use crate::pathing::Path;
use crate::waves::{Modifiers, OPENING_WAVES};
use glam::Vec2;
use sim_core::Tick;
use td_types::Heading;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyState {
    Walking,
    /// Frozen and untargetable until the clock reaches `until`.
    Dying { until: Tick },
}

/// Result of advancing an enemy by one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyStep {
    Walking,
    ReachedGoal { life_loss: u32 },
    Dying,
    /// Teardown finished; remove from the world.
    Destroyed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Damage {
    /// Target was already dying.
    Ignored,
    Wounded,
    Killed { reward: u32 },
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub kind: EnemyKind,
    /// Index into the resolved paths.
    pub path: usize,
    pub pos: Vec2,
    /// Next waypoint to walk toward. Only ever increases.
    pub waypoint: usize,
    pub health: i32,
    pub max_health: i32,
    /// Pixels per second, wave scaling applied.
    pub speed: f32,
    pub wave: u32,
    pub heading: Heading,
    pub state: EnemyState,
    life_loss: u32,
    reward: u32,
}

impl Enemy {
    pub fn spawn(
        kind: EnemyKind,
        spec: &EnemySpec,
        path_index: usize,
        path: &Path,
        wave: u32,
        modifiers: Modifiers,
    ) -> Self {
        let health = (spec.health as f32 * modifiers.health) as i32;
        Self {
            kind,
            path: path_index,
            pos: path.start(),
            waypoint: 0,
            health,
            max_health: health,
            speed: spec.speed * modifiers.speed,
            wave,
            heading: Heading::default(),
            state: EnemyState::Walking,
            life_loss: spec.life_loss,
            reward: spec.reward,
        }
    }

    pub fn is_dying(&self) -> bool {
        matches!(self.state, EnemyState::Dying { .. })
    }

    /// Lives lost if this enemy leaks now. Late waves charge the remaining
    /// health instead of the fixed per-kind value.
    pub fn life_loss(&self) -> u32 {
        if self.wave <= OPENING_WAVES {
            self.life_loss
        } else {
            self.health.max(1) as u32
        }
    }

    pub fn update(&mut self, path: &Path, dt: f32, arrival_radius: f32, now: Tick) -> EnemyStep {
        if let EnemyState::Dying { until } = self.state {
            return if now >= until {
                EnemyStep::Destroyed
            } else {
                EnemyStep::Dying
            };
        }

        let Some(target) = path.waypoint(self.waypoint) else {
            return EnemyStep::ReachedGoal {
                life_loss: self.life_loss(),
            };
        };

        let delta = target - self.pos;
        let distance = delta.length();

        if distance < arrival_radius {
            self.waypoint += 1;
            if self.waypoint >= path.len() {
                return EnemyStep::ReachedGoal {
                    life_loss: self.life_loss(),
                };
            }
            return EnemyStep::Walking;
        }

        self.heading = heading_of(delta);
        let travel = self.speed * dt;
        if travel >= distance {
            self.pos = target;
        } else {
            self.pos += delta / distance * travel;
        }
        EnemyStep::Walking
    }

    pub fn take_damage(&mut self, amount: i32, now: Tick, teardown_ticks: u64) -> Damage {
        if self.is_dying() {
            return Damage::Ignored;
        }

        self.health -= amount;
        if self.health > 0 {
            return Damage::Wounded;
        }

        self.state = EnemyState::Dying {
            until: now + teardown_ticks,
        };
        Damage::Killed {
            reward: self.reward,
        }
    }
}

fn heading_of(delta: Vec2) -> Heading {
    if delta.x.abs() >= delta.y.abs() {
        if delta.x >= 0.0 {
            Heading::Right
        } else {
            Heading::Left
        }
    } else if delta.y >= 0.0 {
        Heading::Down
    } else {
        Heading::Up
    }
}
