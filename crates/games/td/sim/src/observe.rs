use crate::config::TowerKind;
use crate::world::{EnemyId, TdState, TowerId, WavePhase};
use sim_core::{TerminalOutcome, Tick};
use slotmap::{Key, KeyData};
use td_types::{
    EnemyInfo, Point, ProjectileInfo, TdObservation, TowerInfo, TowerOffer, WaveStatus,
};

pub fn tower_id_to_string(id: TowerId) -> String {
    id.data().as_ffi().to_string()
}

pub fn enemy_id_to_string(id: EnemyId) -> String {
    id.data().as_ffi().to_string()
}

pub fn string_to_tower_id(s: &str) -> Result<TowerId, String> {
    let ffi: u64 = s.parse().map_err(|_| format!("Invalid tower_id: {}", s))?;
    Ok(TowerId::from(KeyData::from_ffi(ffi)))
}

fn outcome_to_string(outcome: TerminalOutcome) -> String {
    match outcome {
        TerminalOutcome::Win => "win".to_string(),
        TerminalOutcome::Lose => "lose".to_string(),
    }
}

pub fn build_observation(state: &TdState, tick: Tick) -> TdObservation {
    let config = &state.config;

    let wave_status = match state.phase {
        WavePhase::Pause {
            next_wave,
            starts_at,
        } => WaveStatus::Pause {
            next_wave,
            starts_at,
        },
        WavePhase::InWave {
            spawns_remaining,
            spawned,
            ..
        } => WaveStatus::InWave {
            spawns_remaining,
            spawned,
        },
    };

    TdObservation {
        tick,
        clock: state.clock,
        ticks_per_second: config.tick_hz,
        paused: state.paused,
        outcome: state.outcome.map(outcome_to_string),

        map_width: state.map.width,
        map_height: state.map.height,
        tile_size: config.tile_size,

        hud: state.hud(),
        waves_total: config.waves_total,
        wave_status,

        paths: state
            .paths
            .iter()
            .map(|p| p.waypoints.iter().map(|w| Point { x: w.x, y: w.y }).collect())
            .collect(),

        offers: TowerKind::ALL
            .iter()
            .map(|&kind| TowerOffer {
                kind: kind.name().to_string(),
                cost: state.economy.current_cost(config, kind),
                placed: state.economy.placed(kind),
                limit: state.economy.limit(config, kind),
            })
            .collect(),

        towers: state
            .world
            .towers
            .iter()
            .map(|(id, t)| TowerInfo {
                id: tower_id_to_string(id),
                kind: t.kind.name().to_string(),
                col: t.col,
                row: t.row,
                x: t.pos.x,
                y: t.pos.y,
                range: t.range,
                target: t.target.map(enemy_id_to_string),
            })
            .collect(),
        enemies: state
            .world
            .enemies
            .iter()
            .map(|(id, e)| EnemyInfo {
                id: enemy_id_to_string(id),
                kind: e.kind.name().to_string(),
                x: e.pos.x,
                y: e.pos.y,
                heading: e.heading,
                dying: e.is_dying(),
                health: e.health,
                max_health: e.max_health,
            })
            .collect(),
        projectiles: state
            .world
            .projectiles
            .values()
            .map(|p| ProjectileInfo {
                x: p.pos.x,
                y: p.pos.y,
            })
            .collect(),
    }
}
