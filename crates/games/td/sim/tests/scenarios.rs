use sim_core::{TerminalOutcome, Tick};
use sim_host::MatchHost;
use std::collections::HashMap;
use sim_td::{
    EnemyId, MapKind, SellError, TdAction, TdConfig, TdError, TdEvent, TdGame, TowerKind,
};

/// One spawn, one goal, ten tiles apart along row 1.
fn corridor_config() -> TdConfig {
    TdConfig {
        layout: Some(vec![
            "...........".into(),
            "S#########G".into(),
            "...........".into(),
        ]),
        ..TdConfig::default()
    }
}

fn host(config: TdConfig) -> MatchHost<TdGame> {
    let hz = config.tick_hz;
    MatchHost::new(config, 42, hz).unwrap()
}

/// Steps until terminal or `ticks` run out, tagging each event with its tick.
fn run(host: &mut MatchHost<TdGame>, ticks: Tick) -> Vec<(Tick, TdEvent)> {
    let mut log = Vec::new();
    for _ in 0..ticks {
        let Some(events) = host.step_one_tick() else {
            break;
        };
        let tick = host.current_tick();
        log.extend(events.into_iter().map(|e| (tick, e)));
    }
    log
}

#[test]
fn lone_runner_walks_the_corridor_and_leaks() {
    let mut host = host(corridor_config());
    let log = run(&mut host, 600);

    let (spawn_tick, first) = log
        .iter()
        .find_map(|(t, e)| match e {
            TdEvent::EnemySpawned { id, .. } => Some((*t, *id)),
            _ => None,
        })
        .unwrap();
    // First wave starts two seconds in.
    assert_eq!(spawn_tick, 120);

    let (leak_tick, life_loss) = log
        .iter()
        .find_map(|(t, e)| match e {
            TdEvent::EnemyLeaked { id, life_loss } if *id == first => Some((*t, *life_loss)),
            _ => None,
        })
        .unwrap();
    assert_eq!(life_loss, 1);

    // 480 px at 100 px/s is 288 ticks of walking. The tick that reaches a
    // waypoint only turns the enemy toward the next one, so each of the 11
    // waypoints can add at most one idle tick on top of that.
    let travel = leak_tick - spawn_tick;
    let waypoints = host.observe().paths[0].len() as u64;
    assert_eq!(waypoints, 11);
    assert!((288..=288 + waypoints).contains(&travel), "took {travel} ticks");
}

#[test]
fn leaks_drain_lives_to_zero_and_end_the_game_once() {
    let config = TdConfig {
        lives_start: 3,
        ..corridor_config()
    };
    let mut host = host(config);
    let log = run(&mut host, 2_000);

    assert_eq!(host.is_terminal(), Some(TerminalOutcome::Lose));
    let game_overs = log.iter().filter(|(_, e)| *e == TdEvent::GameOver).count();
    assert_eq!(game_overs, 1);
    let leaks = log
        .iter()
        .filter(|(_, e)| matches!(e, TdEvent::EnemyLeaked { .. }))
        .count();
    assert_eq!(leaks, 3);

    let obs = host.observe();
    assert_eq!(obs.hud.lives, 0);
    assert_eq!(obs.outcome.as_deref(), Some("lose"));

    // Nothing moves once the game is over.
    assert!(host.step_one_tick().is_none());
}

#[test]
fn surviving_the_last_wave_wins() {
    let config = TdConfig {
        waves_total: Some(1),
        ..corridor_config()
    };
    let mut host = host(config);
    let log = run(&mut host, 2_000);

    assert_eq!(host.is_terminal(), Some(TerminalOutcome::Win));
    assert!(log.iter().any(|(_, e)| *e == TdEvent::WaveCleared { wave: 1 }));
    assert!(log.iter().any(|(_, e)| *e == TdEvent::Victory));
    assert_eq!(host.observe().hud.lives, 15);
}

#[test]
fn selling_right_after_placing_refunds_half_base_cost() {
    let config = TdConfig {
        money_start: 1_000,
        ..corridor_config()
    };
    let mut host = host(config);

    for (col, expected_cost) in [(0u16, 20u32), (1, 40), (2, 60)] {
        host.submit_next(TdAction::PlaceTower {
            kind: TowerKind::Basic,
            col,
            row: 0,
        });
        let events = host.step_one_tick().unwrap();
        let id = events
            .iter()
            .find_map(|e| match e {
                TdEvent::TowerPlaced { id, cost, .. } => {
                    assert_eq!(*cost, expected_cost);
                    Some(*id)
                }
                _ => None,
            })
            .unwrap();

        let before = host.observe().hud.money;
        host.submit_next(TdAction::SellTower { tower: id });
        let events = host.step_one_tick().unwrap();
        assert!(events.contains(&TdEvent::TowerSold { id, refund: 10 }));
        assert_eq!(host.observe().hud.money, before + 10);

        // Keep one standing so the next price climbs.
        host.submit_next(TdAction::PlaceTower {
            kind: TowerKind::Basic,
            col,
            row: 2,
        });
        host.step_one_tick().unwrap();
    }
}

#[test]
fn tower_ids_from_before_a_restart_stay_dead() {
    let mut host = host(corridor_config());
    host.submit_next(TdAction::PlaceTower {
        kind: TowerKind::Basic,
        col: 0,
        row: 0,
    });
    let events = host.step_one_tick().unwrap();
    let old = events
        .iter()
        .find_map(|e| match e {
            TdEvent::TowerPlaced { id, .. } => Some(*id),
            _ => None,
        })
        .unwrap();

    host.submit_next(TdAction::Restart);
    host.step_one_tick().unwrap();
    host.submit_next(TdAction::PlaceTower {
        kind: TowerKind::LongRange,
        col: 5,
        row: 2,
    });
    host.step_one_tick().unwrap();

    host.submit_next(TdAction::SellTower { tower: old });
    let events = host.step_one_tick().unwrap();
    assert_eq!(
        events,
        vec![TdEvent::SaleRejected {
            reason: SellError::MissingTower
        }]
    );
    assert_eq!(host.observe().towers.len(), 1);
}

#[test]
fn rejected_placements_are_reported() {
    let mut host = host(corridor_config());
    host.submit_next(TdAction::PlaceTower {
        kind: TowerKind::Basic,
        col: 3,
        row: 1,
    });
    host.submit_next(TdAction::PlaceTower {
        kind: TowerKind::Basic,
        col: 40,
        row: 0,
    });
    let events = host.step_one_tick().unwrap();
    let reasons: Vec<String> = events
        .iter()
        .filter_map(|e| match e {
            TdEvent::PlacementRejected { reason, .. } => Some(reason.to_string()),
            _ => None,
        })
        .collect();
    assert_eq!(
        reasons,
        vec![
            "tile (3, 1) is not buildable".to_string(),
            "tile (40, 0) is off the map".to_string()
        ]
    );
}

#[test]
fn pause_freezes_timers_and_agents() {
    let mut host = host(corridor_config());
    host.submit_at(50, TdAction::SetPaused(true));
    let log = run(&mut host, 500);

    assert!(log.iter().any(|(t, e)| *t == 50 && *e == TdEvent::Paused));
    assert!(!log.iter().any(|(_, e)| matches!(e, TdEvent::WaveStarted { .. })));
    let obs = host.observe();
    assert!(obs.paused);
    assert_eq!(obs.clock, 49);
    assert_eq!(obs.tick, 500);

    host.submit_next(TdAction::SetPaused(false));
    let log = run(&mut host, 100);
    let started = log
        .iter()
        .find(|(_, e)| *e == TdEvent::WaveStarted { wave: 1 })
        .map(|(t, _)| *t);
    // 71 clock ticks were still owed before the first wave.
    assert_eq!(started, Some(571));
}

#[test]
fn pausing_mid_wave_freezes_enemies_projectiles_and_towers() {
    let mut host = host(corridor_config());
    host.submit_next(TdAction::PlaceTower {
        kind: TowerKind::Fast,
        col: 4,
        row: 0,
    });

    // Run until the first shot; later runners are still queued at that point.
    let mut fired = false;
    for _ in 0..400 {
        let events = host.step_one_tick().unwrap();
        if events
            .iter()
            .any(|e| matches!(e, TdEvent::ProjectileFired { .. }))
        {
            fired = true;
            break;
        }
    }
    assert!(fired);

    let before = host.observe();
    let last_fire = |host: &MatchHost<TdGame>| -> Vec<Option<Tick>> {
        let towers = &host.game().state().world.towers;
        towers.values().map(|t| t.last_fire).collect()
    };
    let fired_at = last_fire(&host);
    assert!(!before.enemies.is_empty());
    assert!(!before.projectiles.is_empty());
    assert!(matches!(
        before.wave_status,
        td_types::WaveStatus::InWave { spawns_remaining, .. } if spawns_remaining > 0
    ));

    host.submit_next(TdAction::SetPaused(true));
    let log = run(&mut host, 300);
    assert!(log.iter().any(|(_, e)| *e == TdEvent::Paused));
    assert!(!log
        .iter()
        .any(|(_, e)| matches!(e, TdEvent::EnemySpawned { .. })));

    let during = host.observe();
    assert_eq!(during.clock, before.clock);
    assert_eq!(during.enemies, before.enemies);
    assert_eq!(during.projectiles, before.projectiles);
    assert_eq!(during.towers, before.towers);
    assert_eq!(last_fire(&host), fired_at);

    host.submit_next(TdAction::SetPaused(false));
    let log = run(&mut host, 100);
    assert!(log
        .iter()
        .any(|(_, e)| matches!(e, TdEvent::EnemySpawned { .. })));
    assert_ne!(host.observe().enemies, before.enemies);
}

#[test]
fn twin_gate_spawns_every_instruction_on_both_paths() {
    let config = TdConfig {
        map: MapKind::TwinGate,
        ..TdConfig::default()
    };
    let mut host = host(config);
    let log = run(&mut host, 300);

    let mut per_path: HashMap<usize, usize> = HashMap::new();
    for (_, e) in &log {
        if let TdEvent::EnemySpawned { path, .. } = e {
            *per_path.entry(*path).or_default() += 1;
        }
    }
    assert_eq!(per_path.get(&0), Some(&5));
    assert_eq!(per_path.get(&1), Some(&5));

    let obs = host.observe();
    assert_eq!(obs.paths.len(), 2);
    assert_eq!(obs.offers[0].limit, 7);
}

#[test]
fn towers_kill_and_never_hold_dying_targets() {
    let mut host = host(corridor_config());
    host.submit_next(TdAction::PlaceTower {
        kind: TowerKind::Fast,
        col: 4,
        row: 0,
    });
    host.submit_next(TdAction::PlaceTower {
        kind: TowerKind::Basic,
        col: 6,
        row: 2,
    });

    let mut kills: HashMap<EnemyId, Tick> = HashMap::new();
    let mut removals: HashMap<EnemyId, Tick> = HashMap::new();
    let mut reward_total = 0;
    let mut last_tick = 0;
    for _ in 0..900 {
        let Some(events) = host.step_one_tick() else {
            break;
        };
        let tick = host.current_tick();
        last_tick = tick;
        for event in events {
            match event {
                TdEvent::EnemyKilled { id, reward } => {
                    reward_total += reward;
                    kills.insert(id, tick);
                }
                TdEvent::EnemyRemoved { id } => {
                    removals.insert(id, tick);
                }
                _ => {}
            }
        }

        let obs = host.observe();
        for tower in &obs.towers {
            if let Some(target) = &tower.target {
                let enemy = obs.enemies.iter().find(|e| &e.id == target);
                assert!(enemy.is_some_and(|e| !e.dying), "stale target at {tick}");
            }
        }
    }

    assert!(!kills.is_empty());
    assert_eq!(reward_total, 5 * kills.len() as u32);
    for (id, killed_at) in kills.iter().filter(|(_, t)| **t + 30 <= last_tick) {
        // 500 ms teardown at 60 Hz.
        assert_eq!(removals.get(id), Some(&(killed_at + 30)));
    }
}

#[test]
fn maps_without_spawn_points_fail_to_build() {
    let config = TdConfig {
        layout: Some(vec!["....".into(), "##G.".into()]),
        ..TdConfig::default()
    };
    let result = MatchHost::<TdGame>::new(config, 0, 60);
    assert!(matches!(result, Err(TdError::NoSpawnPoints)));
}

#[test]
fn disconnected_spawn_walks_straight_to_goal() {
    let config = TdConfig {
        layout: Some(vec!["S..X..G".into()]),
        ..TdConfig::default()
    };
    let mut host = host(config);
    let obs = host.observe();
    assert_eq!(obs.paths[0].len(), 2);

    let log = run(&mut host, 600);
    assert!(log
        .iter()
        .any(|(_, e)| matches!(e, TdEvent::EnemyLeaked { .. })));
}
