use crate::config::{TowerKind, TowerSpec};
use crate::enemy::Enemy;
use crate::map::tile_center;
use crate::world::EnemyId;
use glam::Vec2;
use sim_core::Tick;
use slotmap::SlotMap;

#[derive(Clone, Debug)]
pub struct Tower {
    pub kind: TowerKind,
    pub col: u16,
    pub row: u16,
    /// Pixel center of the tile.
    pub pos: Vec2,
    pub range: f32,
    pub fire_period: u64,
    pub last_fire: Option<Tick>,
    /// Weak: re-validated against the live enemy set every tick.
    pub target: Option<EnemyId>,
    /// Base price of the kind. The sell refund is half of this.
    pub list_price: u32,
}

impl Tower {
    pub fn new(
        kind: TowerKind,
        spec: &TowerSpec,
        (col, row): (u16, u16),
        tile_size: f32,
        fire_period: u64,
    ) -> Self {
        Self {
            kind,
            col,
            row,
            pos: tile_center(col, row, tile_size),
            range: spec.range,
            fire_period,
            last_fire: None,
            target: None,
            list_price: spec.cost,
        }
    }

    pub fn refund(&self) -> u32 {
        self.list_price / 2
    }

    fn can_hold(&self, enemy: &Enemy) -> bool {
        !enemy.is_dying() && self.pos.distance(enemy.pos) <= self.range
    }

    /// Drops a stale target, then acquires the closest enemy in range if
    /// empty-handed. Equal distances keep whichever was found first.
    pub fn update_target(&mut self, enemies: &SlotMap<EnemyId, Enemy>) {
        if let Some(id) = self.target {
            let valid = enemies.get(id).is_some_and(|e| self.can_hold(e));
            if !valid {
                self.target = None;
            }
        }

        if self.target.is_some() {
            return;
        }

        let mut best: Option<(EnemyId, f32)> = None;
        for (id, enemy) in enemies.iter() {
            if !self.can_hold(enemy) {
                continue;
            }
            let dist = self.pos.distance(enemy.pos);
            if best.map_or(true, |(_, d)| dist < d) {
                best = Some((id, dist));
            }
        }
        self.target = best.map(|(id, _)| id);
    }

    pub fn ready(&self, now: Tick) -> bool {
        self.last_fire
            .map_or(true, |last| now.saturating_sub(last) >= self.fire_period)
    }

    /// Fires at the held target if the cadence allows. Returns the target
    /// and its current position.
    pub fn try_fire(
        &mut self,
        now: Tick,
        enemies: &SlotMap<EnemyId, Enemy>,
    ) -> Option<(EnemyId, Vec2)> {
        let id = self.target?;
        if !self.ready(now) {
            return None;
        }
        let enemy = enemies.get(id)?;
        self.last_fire = Some(now);
        Some((id, enemy.pos))
    }
}
