use crate::config::{TdConfig, TowerKind};
use thiserror::Error;

/// Why a placement was refused. Refusals are reported, never fatal.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("tile ({col}, {row}) is off the map")]
    OutOfBounds { col: u16, row: u16 },
    #[error("tile ({col}, {row}) is not buildable")]
    NotBuildable { col: u16, row: u16 },
    #[error("tile ({col}, {row}) already holds a tower")]
    Occupied { col: u16, row: u16 },
    #[error("tower limit of {limit} reached")]
    AtLimit { limit: u32 },
    #[error("costs {cost}, have {have}")]
    InsufficientFunds { cost: u32, have: u32 },
    #[error("game is paused or over")]
    Halted,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SellError {
    #[error("no such tower")]
    MissingTower,
    #[error("game is paused or over")]
    Halted,
}

/// Money, lives and per-kind tower counts.
#[derive(Clone, Debug)]
pub struct Economy {
    pub money: u32,
    pub lives: u32,
    placed: [u32; 3],
    limit_bonus: u32,
    game_over: bool,
}

impl Economy {
    pub fn new(config: &TdConfig) -> Self {
        Self {
            money: config.money_start,
            lives: config.lives_start,
            placed: [0; 3],
            limit_bonus: config.effective_limit_bonus(),
            game_over: false,
        }
    }

    pub fn placed(&self, kind: TowerKind) -> u32 {
        self.placed[kind.index()]
    }

    pub fn current_cost(&self, config: &TdConfig, kind: TowerKind) -> u32 {
        let spec = config.tower(kind);
        spec.cost + self.placed(kind) * spec.cost_step
    }

    pub fn limit(&self, config: &TdConfig, kind: TowerKind) -> u32 {
        config.tower(kind).limit + self.limit_bonus
    }

    pub fn is_at_limit(&self, config: &TdConfig, kind: TowerKind) -> bool {
        self.placed(kind) >= self.limit(config, kind)
    }

    pub fn can_afford(&self, cost: u32) -> bool {
        self.money > 0 && self.money >= cost
    }

    /// Deducts the price and counts the tower. Callers check affordability first.
    pub fn charge(&mut self, kind: TowerKind, cost: u32) {
        self.money -= cost;
        self.placed[kind.index()] += 1;
    }

    pub fn refund(&mut self, kind: TowerKind, amount: u32) {
        self.money += amount;
        let count = &mut self.placed[kind.index()];
        *count = count.saturating_sub(1);
    }

    pub fn killed(&mut self, reward: u32) {
        self.money += reward;
    }

    /// Removes lives, never below zero. Returns true on the call that
    /// first brings lives to zero and never again.
    pub fn reached_goal(&mut self, life_loss: u32) -> bool {
        self.lives = self.lives.saturating_sub(life_loss);
        if self.lives == 0 && !self.game_over {
            self.game_over = true;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::MapKind;

    #[test]
    fn cost_scales_with_count() {
        let config = TdConfig::default();
        let mut eco = Economy::new(&config);
        assert_eq!(eco.current_cost(&config, TowerKind::LongRange), 40);
        eco.charge(TowerKind::LongRange, 40);
        assert_eq!(eco.current_cost(&config, TowerKind::LongRange), 140);
        assert_eq!(eco.money, 60);
        eco.refund(TowerKind::LongRange, 20);
        assert_eq!(eco.current_cost(&config, TowerKind::LongRange), 40);
        assert_eq!(eco.money, 80);
    }

    #[test]
    fn limits_include_map_bonus() {
        let mut config = TdConfig::default();
        let eco = Economy::new(&config);
        assert_eq!(eco.limit(&config, TowerKind::LongRange), 3);

        config.map = MapKind::TwinGate;
        let mut eco = Economy::new(&config);
        assert_eq!(eco.limit(&config, TowerKind::LongRange), 5);
        for _ in 0..5 {
            assert!(!eco.is_at_limit(&config, TowerKind::LongRange));
            eco.charge(TowerKind::LongRange, 0);
        }
        assert!(eco.is_at_limit(&config, TowerKind::LongRange));
    }

    #[test]
    fn broke_players_cannot_buy_free_towers() {
        let config = TdConfig::default();
        let mut eco = Economy::new(&config);
        assert!(eco.can_afford(100));
        assert!(!eco.can_afford(101));
        eco.money = 0;
        assert!(!eco.can_afford(0));
    }

    #[test]
    fn lives_clamp_and_signal_once() {
        let config = TdConfig::default();
        let mut eco = Economy::new(&config);
        assert!(!eco.reached_goal(15));
        assert!(eco.reached_goal(10));
        assert_eq!(eco.lives, 0);
        assert!(!eco.reached_goal(5));
        assert_eq!(eco.lives, 0);
        assert!(eco.game_over);
    }

    #[test]
    fn kills_pay_out() {
        let config = TdConfig::default();
        let mut eco = Economy::new(&config);
        eco.killed(10);
        assert_eq!(eco.money, 110);
    }
}
