use crate::config::{EnemyKind, TowerKind};
use crate::economy::{PlacementError, SellError};
use crate::enemy::{Damage, Enemy, EnemyStep};
use crate::events::TdEvent;
use crate::map::Tile;
use crate::projectile::{Projectile, ProjectileStep};
use crate::timers::TimerEvent;
use crate::tower::Tower;
use crate::waves;
use crate::world::{CellState, EnemyId, TdState, TowerId, WavePhase, World};
use sim_core::TerminalOutcome;
use tracing::{debug, info, warn};

pub fn try_place_tower(
    state: &mut TdState,
    kind: TowerKind,
    col: u16,
    row: u16,
    events: &mut Vec<TdEvent>,
) -> Result<TowerId, PlacementError> {
    if !state.is_running() {
        return Err(PlacementError::Halted);
    }

    match state.map.tile(col, row) {
        None => return Err(PlacementError::OutOfBounds { col, row }),
        Some(Tile::Buildable) => {}
        Some(_) => return Err(PlacementError::NotBuildable { col, row }),
    }

    if state.world.occupancy.tower_at(col, row).is_some() {
        return Err(PlacementError::Occupied { col, row });
    }

    let config = &state.config;
    if state.economy.is_at_limit(config, kind) {
        return Err(PlacementError::AtLimit {
            limit: state.economy.limit(config, kind),
        });
    }

    let cost = state.economy.current_cost(config, kind);
    if !state.economy.can_afford(cost) {
        return Err(PlacementError::InsufficientFunds {
            cost,
            have: state.economy.money,
        });
    }

    let spec = config.tower(kind);
    let tower = Tower::new(
        kind,
        spec,
        (col, row),
        config.tile_size,
        config.duration_to_ticks(spec.fire_period()),
    );

    state.economy.charge(kind, cost);
    let id = state.world.towers.insert(tower);
    state.world.occupancy.set(col, row, CellState::Tower(id));

    debug!(kind = kind.name(), col, row, cost, "tower placed");
    events.push(TdEvent::TowerPlaced {
        id,
        kind,
        col,
        row,
        cost,
    });
    Ok(id)
}

pub fn try_sell_tower(
    state: &mut TdState,
    id: TowerId,
    events: &mut Vec<TdEvent>,
) -> Result<u32, SellError> {
    if !state.is_running() {
        return Err(SellError::Halted);
    }

    let tower = state
        .world
        .towers
        .remove(id)
        .ok_or(SellError::MissingTower)?;
    let refund = tower.refund();
    state.economy.refund(tower.kind, refund);
    state
        .world
        .occupancy
        .set(tower.col, tower.row, CellState::Empty);

    debug!(kind = tower.kind.name(), refund, "tower sold");
    events.push(TdEvent::TowerSold { id, refund });
    Ok(refund)
}

/// Runs every timer due at the current clock, including ones scheduled
/// for this same tick by timers that just fired.
pub fn fire_timers(state: &mut TdState, events: &mut Vec<TdEvent>) {
    loop {
        let due = state.timers.drain_due(state.clock);
        if due.is_empty() {
            break;
        }
        for timer in due {
            match timer {
                TimerEvent::StartWave(wave) => start_wave(state, wave, events),
                TimerEvent::Spawn { wave, kind } => spawn(state, wave, kind, events),
            }
        }
    }
}

fn start_wave(state: &mut TdState, wave: u32, events: &mut Vec<TdEvent>) {
    if let WavePhase::InWave { wave: active, .. } = state.phase {
        warn!(wave, active, "wave start ignored, a wave is already running");
        return;
    }

    let spawns = waves::schedule(wave, &state.config);
    for spawn in &spawns {
        let at = state.clock + state.config.millis_to_ticks(spawn.offset_ms);
        state.timers.schedule(
            at,
            TimerEvent::Spawn {
                wave,
                kind: spawn.kind,
            },
        );
    }

    state.current_wave = wave;
    state.phase = WavePhase::InWave {
        wave,
        spawns_remaining: spawns.len() as u32,
        spawned: 0,
    };

    info!(wave, enemies = spawns.len() * state.paths.len(), "wave started");
    events.push(TdEvent::WaveStarted { wave });
}

/// One spawn instruction: one enemy on every path.
fn spawn(state: &mut TdState, wave: u32, kind: EnemyKind, events: &mut Vec<TdEvent>) {
    let spec = *state.config.enemy(kind);
    let modifiers = waves::modifiers(wave);

    for (index, path) in state.paths.iter().enumerate() {
        let enemy = Enemy::spawn(kind, &spec, index, path, wave, modifiers);
        let id = state.world.enemies.insert(enemy);
        debug!(kind = kind.name(), path = index, "enemy spawned");
        events.push(TdEvent::EnemySpawned {
            id,
            kind,
            path: index,
        });
    }

    if let WavePhase::InWave {
        spawns_remaining,
        spawned,
        ..
    } = &mut state.phase
    {
        *spawns_remaining = spawns_remaining.saturating_sub(1);
        *spawned += state.paths.len() as u32;
    }
}

pub fn move_enemies(state: &mut TdState, events: &mut Vec<TdEvent>) {
    let dt = state.config.dt();
    let radius = state.config.waypoint_radius;
    let now = state.clock;

    let ids: Vec<EnemyId> = state.world.enemies.keys().collect();
    let mut leaks = Vec::new();

    for id in ids {
        let enemy = &mut state.world.enemies[id];
        let path = &state.paths[enemy.path];
        match enemy.update(path, dt, radius, now) {
            EnemyStep::Walking | EnemyStep::Dying => {}
            EnemyStep::ReachedGoal { life_loss } => {
                state.world.enemies.remove(id);
                leaks.push((id, life_loss));
            }
            EnemyStep::Destroyed => {
                state.world.enemies.remove(id);
                events.push(TdEvent::EnemyRemoved { id });
            }
        }
    }

    // Leaks settle after every enemy moved so a game over mid-pass still
    // sees a consistent collection.
    for (id, life_loss) in leaks {
        events.push(TdEvent::EnemyLeaked { id, life_loss });
        if state.economy.reached_goal(life_loss) {
            game_over(state, events);
        }
    }
}

fn game_over(state: &mut TdState, events: &mut Vec<TdEvent>) {
    state.outcome = Some(TerminalOutcome::Lose);
    state.timers.clear();
    info!(wave = state.current_wave, "game over");
    events.push(TdEvent::GameOver);
}

pub fn tower_attacks(state: &mut TdState, events: &mut Vec<TdEvent>) {
    let now = state.clock;
    let spec = &state.config.projectile;
    let World {
        enemies,
        towers,
        projectiles,
        ..
    } = &mut state.world;

    for (tower_id, tower) in towers.iter_mut() {
        tower.update_target(enemies);
        if let Some((target, _)) = tower.try_fire(now, enemies) {
            projectiles.insert(Projectile::new(tower.pos, target, spec));
            events.push(TdEvent::ProjectileFired {
                tower: tower_id,
                target,
            });
        }
    }
}

pub fn move_projectiles(state: &mut TdState, events: &mut Vec<TdEvent>) {
    let dt = state.config.dt();
    let now = state.clock;
    let teardown = state.config.millis_to_ticks(state.config.teardown_ms);

    let mut killed_any = false;
    let ids: Vec<_> = state.world.projectiles.keys().collect();
    for id in ids {
        let step = state.world.projectiles[id].update(&state.world.enemies, dt);
        match step {
            ProjectileStep::Flying => {}
            ProjectileStep::Fizzled => {
                state.world.projectiles.remove(id);
            }
            ProjectileStep::Hit { target, damage } => {
                state.world.projectiles.remove(id);
                let Some(enemy) = state.world.enemies.get_mut(target) else {
                    continue;
                };
                if let Damage::Killed { reward } = enemy.take_damage(damage, now, teardown) {
                    killed_any = true;
                    state.economy.killed(reward);
                    debug!(kind = enemy.kind.name(), reward, "enemy killed");
                    events.push(TdEvent::EnemyKilled { id: target, reward });
                }
            }
        }
    }

    // Kills land after targeting ran, so drop locks on the newly dying
    // before the tick ends.
    if killed_any {
        let World {
            enemies, towers, ..
        } = &mut state.world;
        for tower in towers.values_mut() {
            let stale = tower
                .target
                .is_some_and(|t| enemies.get(t).map_or(true, Enemy::is_dying));
            if stale {
                tower.target = None;
            }
        }
    }
}

/// Closes the active wave once every spawn fired and the board is empty,
/// then queues the next wave or declares victory.
pub fn check_wave_completion(state: &mut TdState, events: &mut Vec<TdEvent>) {
    let WavePhase::InWave {
        wave,
        spawns_remaining: 0,
        ..
    } = state.phase
    else {
        return;
    };
    if !state.world.enemies.is_empty() {
        return;
    }

    info!(wave, lives = state.economy.lives, "wave cleared");
    events.push(TdEvent::WaveCleared { wave });

    let capped = state.config.waves_total.is_some_and(|total| wave >= total);
    if capped && state.economy.lives > 0 {
        state.outcome = Some(TerminalOutcome::Win);
        state.timers.clear();
        state.phase = WavePhase::Pause {
            next_wave: wave + 1,
            starts_at: None,
        };
        info!(wave, "victory");
        events.push(TdEvent::Victory);
        return;
    }

    let next = wave + 1;
    let at = state.clock + state.config.millis_to_ticks(state.config.inter_wave_pause_ms);
    state.timers.schedule(at, TimerEvent::StartWave(next));
    state.current_wave = next;
    state.phase = WavePhase::Pause {
        next_wave: next,
        starts_at: Some(at),
    };
}
