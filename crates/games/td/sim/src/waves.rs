use crate::config::{EnemyKind, TdConfig};

/// Enemy counts for one wave.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WaveComposition {
    pub runners: u32,
    pub brutes: u32,
    pub darts: u32,
}

impl WaveComposition {
    pub const fn new(runners: u32, brutes: u32, darts: u32) -> Self {
        Self {
            runners,
            brutes,
            darts,
        }
    }

    pub fn total(&self) -> u32 {
        self.runners + self.brutes + self.darts
    }

    pub fn count(&self, kind: EnemyKind) -> u32 {
        match kind {
            EnemyKind::Runner => self.runners,
            EnemyKind::Brute => self.brutes,
            EnemyKind::Dart => self.darts,
        }
    }

    fn add(self, other: Self) -> Self {
        Self {
            runners: self.runners + other.runners,
            brutes: self.brutes + other.brutes,
            darts: self.darts + other.darts,
        }
    }

    fn times(self, n: u32) -> Self {
        Self {
            runners: self.runners * n,
            brutes: self.brutes * n,
            darts: self.darts * n,
        }
    }
}

/// What each of the first waves adds on top of the previous one.
const OPENING_INCREMENTS: [WaveComposition; 5] = [
    WaveComposition::new(5, 0, 0),
    WaveComposition::new(3, 0, 3),
    WaveComposition::new(3, 0, 3),
    WaveComposition::new(0, 2, 0),
    WaveComposition::new(3, 1, 3),
];

/// Added once for every wave past the last opening wave.
const LATE_INCREMENT: WaveComposition = WaveComposition::new(5, 3, 10);

/// Waves up to this number use fixed compositions and unscaled stats.
pub const OPENING_WAVES: u32 = OPENING_INCREMENTS.len() as u32;

/// Cumulative composition of `wave` (1-based). Wave 0 is empty.
pub fn composition(wave: u32) -> WaveComposition {
    let opening = wave.min(OPENING_WAVES) as usize;
    let base = OPENING_INCREMENTS[..opening]
        .iter()
        .fold(WaveComposition::default(), |acc, inc| acc.add(*inc));
    base.add(LATE_INCREMENT.times(wave.saturating_sub(OPENING_WAVES)))
}

/// Stat multipliers applied to enemies spawned in a wave.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Modifiers {
    pub health: f32,
    pub speed: f32,
}

impl Default for Modifiers {
    fn default() -> Self {
        Self {
            health: 1.0,
            speed: 1.0,
        }
    }
}

pub fn modifiers(wave: u32) -> Modifiers {
    let over = wave.saturating_sub(OPENING_WAVES) as f32;
    Modifiers {
        health: 1.0 + 0.10 * over,
        speed: 1.0 + 0.05 * over,
    }
}

/// One spawn instruction, relative to the wave start.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScheduledSpawn {
    pub offset_ms: u32,
    pub kind: EnemyKind,
}

/// Spawn timeline for a wave. Runners go first, darts after a fixed delay,
/// brutes at whichever comes first of their fixed delay or a short gap after
/// the last runner. Sorted by offset; runners first on equal offsets.
pub fn schedule(wave: u32, config: &TdConfig) -> Vec<ScheduledSpawn> {
    let comp = composition(wave);
    let interval = config.spawn_interval_ms;

    let brute_start = match comp.runners {
        0 => config.brute_delay_ms,
        n => config
            .brute_delay_ms
            .min((n - 1) * interval + config.brute_after_last_runner_ms),
    };

    let lane = |kind: EnemyKind, start: u32| {
        (0..comp.count(kind)).map(move |i| ScheduledSpawn {
            offset_ms: start + i * interval,
            kind,
        })
    };

    let mut spawns: Vec<ScheduledSpawn> = lane(EnemyKind::Runner, 0)
        .chain(lane(EnemyKind::Dart, config.dart_delay_ms))
        .chain(lane(EnemyKind::Brute, brute_start))
        .collect();
    spawns.sort_by_key(|s| s.offset_ms);
    spawns
}
