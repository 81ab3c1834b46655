use crate::config::ProjectileSpec;
use crate::enemy::Enemy;
use crate::world::EnemyId;
use glam::Vec2;
use slotmap::SlotMap;

#[derive(Clone, Debug)]
pub struct Projectile {
    pub pos: Vec2,
    pub target: EnemyId,
    pub speed: f32,
    pub damage: i32,
    pub hit_radius: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProjectileStep {
    Flying,
    /// Target no longer exists; remove without effect.
    Fizzled,
    /// Contact. The projectile is spent whether or not damage lands.
    Hit { target: EnemyId, damage: i32 },
}

impl Projectile {
    pub fn new(origin: Vec2, target: EnemyId, spec: &ProjectileSpec) -> Self {
        Self {
            pos: origin,
            target,
            speed: spec.speed,
            damage: spec.damage,
            hit_radius: spec.hit_radius,
        }
    }

    /// Homes in on the target's live position.
    pub fn update(&mut self, enemies: &SlotMap<EnemyId, Enemy>, dt: f32) -> ProjectileStep {
        let Some(enemy) = enemies.get(self.target) else {
            return ProjectileStep::Fizzled;
        };

        let delta = enemy.pos - self.pos;
        let distance = delta.length();
        if distance < self.hit_radius {
            return ProjectileStep::Hit {
                target: self.target,
                damage: self.damage,
            };
        }

        let travel = self.speed * dt;
        if travel >= distance {
            self.pos = enemy.pos;
        } else {
            self.pos += delta / distance * travel;
        }
        ProjectileStep::Flying
    }
}
