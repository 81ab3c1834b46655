use anyhow::{bail, Context, Result};
use clap::Parser;
use sim_host::MatchHost;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use sim_td::{MapKind, TdAction, TdConfig, TdEvent, TdGame, Tile, TowerKind};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "headless-runner")]
#[command(about = "Plays a scripted tower-defense game without a renderer")]
struct Args {
    /// Built-in map layout
    #[arg(long, value_enum, default_value = "serpentine")]
    map: MapArg,

    /// Seed for obstacle placement
    #[arg(long, default_value = "12345")]
    seed: u64,

    /// Tick budget (default: 10 minutes at the configured rate)
    #[arg(long)]
    ticks: Option<u64>,

    /// TOML file overriding the default config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the final observation as JSON instead of a summary
    #[arg(long)]
    json: bool,

    /// Scatter random obstacles over buildable tiles
    #[arg(long)]
    obstacles: bool,

    /// Keep spawning waves until the defense falls
    #[arg(long)]
    endless: bool,

    /// Pace ticks to wall-clock time
    #[arg(long, short)]
    realtime: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum MapArg {
    Serpentine,
    TwinGate,
}

impl From<MapArg> for MapKind {
    fn from(arg: MapArg) -> Self {
        match arg {
            MapArg::Serpentine => MapKind::Serpentine,
            MapArg::TwinGate => MapKind::TwinGate,
        }
    }
}

fn load_config(args: &Args) -> Result<TdConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            TdConfig::from_toml_str(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => TdConfig::default(),
    };

    if config.layout.is_none() {
        config.map = args.map.into();
    }
    if args.obstacles && config.obstacles.is_none() {
        config.obstacles = Some(Default::default());
    }
    if args.endless {
        config.waves_total = None;
    }
    if config.tick_hz == 0 {
        bail!("tick_hz must be positive");
    }
    Ok(config)
}

/// Buildable tiles touching a path, nearest the spawn first.
fn build_sites(game: &TdGame) -> Vec<(u16, u16)> {
    let state = game.state();
    let mut seen = HashSet::new();
    let mut sites = Vec::new();

    for path in &state.paths {
        for &(col, row) in &path.tiles {
            for (dc, dr) in [(0i32, -1i32), (0, 1), (-1, 0), (1, 0)] {
                let (c, r) = (col as i32 + dc, row as i32 + dr);
                if !state.map.in_bounds(c, r) {
                    continue;
                }
                let site = (c as u16, r as u16);
                if state.map.tile(site.0, site.1) == Some(Tile::Buildable) && seen.insert(site) {
                    sites.push(site);
                }
            }
        }
    }
    sites
}

/// Scripted build order: one purchase per shopping opportunity.
struct BuildScript {
    sites: Vec<(u16, u16)>,
    next_site: usize,
    rotation: usize,
}

impl BuildScript {
    const ORDER: [TowerKind; 4] = [
        TowerKind::Basic,
        TowerKind::Fast,
        TowerKind::Basic,
        TowerKind::LongRange,
    ];

    fn new(sites: Vec<(u16, u16)>) -> Self {
        Self {
            sites,
            next_site: 0,
            rotation: 0,
        }
    }

    /// Buys the next tower in the rotation if it is affordable. A kind at its
    /// limit gives up this turn and is tried again on the next lap.
    fn queue_purchase(&mut self, host: &mut MatchHost<TdGame>) -> bool {
        let Some(&(col, row)) = self.sites.get(self.next_site) else {
            return false;
        };
        let obs = host.observe();
        let kind = Self::ORDER[self.rotation % Self::ORDER.len()];
        let Some(offer) = obs.offers.iter().find(|o| o.kind == kind.name()) else {
            return false;
        };

        if offer.placed >= offer.limit {
            self.rotation += 1;
            return false;
        }
        if obs.hud.money < offer.cost {
            return false;
        }

        host.submit_next(TdAction::PlaceTower { kind, col, row });
        self.next_site += 1;
        self.rotation += 1;
        true
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let tick_hz = config.tick_hz;
    let max_ticks = args.ticks.unwrap_or(tick_hz as u64 * 60 * 10);

    let mut host = MatchHost::<TdGame>::new(config, args.seed, tick_hz)
        .context("building the game")?;
    let mut script = BuildScript::new(build_sites(host.game()));
    info!(sites = script.sites.len(), "build order ready");

    let tick_duration = Duration::from_secs_f64(1.0 / tick_hz as f64);
    let mut all_events = Vec::new();
    script.queue_purchase(&mut host);

    for _ in 0..max_ticks {
        let tick_start = Instant::now();
        let Some(events) = host.step_one_tick() else {
            break;
        };

        let mut shop = false;
        for event in &events {
            print_event(host.current_tick(), event, args.json);
            shop |= matches!(
                event,
                TdEvent::WaveCleared { .. } | TdEvent::EnemyKilled { .. }
            );
        }
        all_events.extend(events);

        if shop {
            script.queue_purchase(&mut host);
        }

        if args.realtime {
            let elapsed = tick_start.elapsed();
            if elapsed < tick_duration {
                std::thread::sleep(tick_duration - elapsed);
            }
        }
    }

    if args.json {
        let obs = host.observe();
        println!("{}", serde_json::to_string_pretty(&obs)?);
    } else {
        print_summary(&host, &all_events);
    }
    Ok(())
}

fn print_event(tick: u64, event: &TdEvent, quiet: bool) {
    if quiet {
        return;
    }
    match event {
        TdEvent::WaveStarted { wave } => println!("[{:>6}] === Wave {} started ===", tick, wave),
        TdEvent::WaveCleared { wave } => println!("[{:>6}] === Wave {} cleared ===", tick, wave),
        TdEvent::TowerPlaced {
            kind, col, row, cost, ..
        } => println!(
            "[{:>6}] {} tower placed at ({}, {}) for {}",
            tick,
            kind.name(),
            col,
            row,
            cost
        ),
        TdEvent::TowerSold { refund, .. } => println!("[{:>6}] Tower sold for {}", tick, refund),
        TdEvent::PlacementRejected {
            col, row, reason, ..
        } => println!("[{:>6}] Placement at ({}, {}) refused: {}", tick, col, row, reason),
        TdEvent::SaleRejected { reason } => println!("[{:>6}] Sale refused: {}", tick, reason),
        TdEvent::EnemyLeaked { life_loss, .. } => {
            println!("[{:>6}] Enemy leaked, -{} lives", tick, life_loss)
        }
        TdEvent::Hud {
            money,
            lives,
            wave,
        } => println!(
            "[{:>6}] Money {}, lives {}, wave {}",
            tick, money, lives, wave
        ),
        TdEvent::GameOver => println!("[{:>6}] GAME OVER", tick),
        TdEvent::Victory => println!("[{:>6}] VICTORY", tick),
        TdEvent::Paused => println!("[{:>6}] Paused", tick),
        TdEvent::Resumed => println!("[{:>6}] Resumed", tick),
        TdEvent::EnemySpawned { .. }
        | TdEvent::EnemyKilled { .. }
        | TdEvent::EnemyRemoved { .. }
        | TdEvent::ProjectileFired { .. } => {}
    }
}

fn print_summary(host: &MatchHost<TdGame>, events: &[TdEvent]) {
    let state = host.game().state();
    let secs = state.clock as f64 / host.tick_hz() as f64;

    let mut spawned = 0;
    let mut killed = 0;
    let mut leaked = 0;
    let mut shots = 0;
    let mut placed = 0;
    for event in events {
        match event {
            TdEvent::EnemySpawned { .. } => spawned += 1,
            TdEvent::EnemyKilled { .. } => killed += 1,
            TdEvent::EnemyLeaked { .. } => leaked += 1,
            TdEvent::ProjectileFired { .. } => shots += 1,
            TdEvent::TowerPlaced { .. } => placed += 1,
            _ => {}
        }
    }

    println!("\n=== Tower Defense Simulation Complete ===");
    println!("Outcome: {:?}", host.is_terminal());
    println!("Final tick: {} ({:.1}s simulated)", host.current_tick(), secs);
    println!("Wave: {}", state.current_wave);
    println!("Money: {}", state.economy.money);
    println!("Lives: {}", state.economy.lives);
    println!("Towers standing: {} (placed {})", state.world.towers.len(), placed);
    println!("Enemies: {} spawned, {} killed, {} leaked", spawned, killed, leaked);
    println!("Shots fired: {}", shots);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capped_basic_host() -> MatchHost<TdGame> {
        let mut config = TdConfig {
            layout: Some(vec![
                "......".into(),
                "S####G".into(),
                "......".into(),
            ]),
            money_start: 1_000,
            ..TdConfig::default()
        };
        config.basic.limit = 0;
        MatchHost::new(config, 0, 60).unwrap()
    }

    #[test]
    fn capped_kind_gives_up_its_turn_each_lap() {
        let mut host = capped_basic_host();
        let mut script = BuildScript::new(build_sites(host.game()));

        // Basic is capped, Fast buys, Basic is capped again, LongRange buys.
        let bought: Vec<bool> = (0..4)
            .map(|_| {
                let bought = script.queue_purchase(&mut host);
                host.step_one_tick().unwrap();
                bought
            })
            .collect();
        assert_eq!(bought, vec![false, true, false, true]);

        // Back to the top of the rotation: Basic is still capped.
        assert!(!script.queue_purchase(&mut host));
        assert_eq!(script.rotation, 5);
        assert_eq!(host.game().state().world.towers.len(), 2);
    }
}
