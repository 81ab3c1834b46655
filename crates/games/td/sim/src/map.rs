use crate::config::ObstacleParams;
use glam::Vec2;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classification of a single map tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    #[default]
    Buildable,
    Path,
    Blocked,
    Spawn,
    Goal,
}

impl Tile {
    /// Enemies may walk on path, spawn and goal tiles.
    pub fn is_walkable(self) -> bool {
        matches!(self, Tile::Path | Tile::Spawn | Tile::Goal)
    }

    fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '.' => Some(Tile::Buildable),
            '#' => Some(Tile::Path),
            'X' => Some(Tile::Blocked),
            'S' => Some(Tile::Spawn),
            'G' => Some(Tile::Goal),
            _ => None,
        }
    }

    fn glyph(self) -> char {
        match self {
            Tile::Buildable => '.',
            Tile::Path => '#',
            Tile::Blocked => 'X',
            Tile::Spawn => 'S',
            Tile::Goal => 'G',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("map has no rows")]
    Empty,
    #[error("row {row} has {found} tiles, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown tile '{glyph}' at column {col}, row {row}")]
    UnknownTile { glyph: char, col: usize, row: usize },
    #[error("map has more than one goal tile")]
    MultipleGoals,
    #[error("map exceeds 65535 tiles per side")]
    TooLarge,
}

/// Built-in layouts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MapKind {
    /// 23x14, one spawn on the left edge, the path snakes to a goal on the right edge.
    #[default]
    Serpentine,
    /// 26x17, two spawns on the left edge converging on one goal.
    TwinGate,
}

impl MapKind {
    pub fn build(self) -> TileMap {
        match self {
            MapKind::Serpentine => serpentine(),
            MapKind::TwinGate => twin_gate(),
        }
    }

    /// Added to every tower kind's placement limit.
    pub fn limit_bonus(self) -> u32 {
        match self {
            MapKind::Serpentine => 0,
            MapKind::TwinGate => 2,
        }
    }

    /// TwinGate keeps its rightmost column free of obstacles.
    pub fn keeps_last_column_clear(self) -> bool {
        matches!(self, MapKind::TwinGate)
    }
}

/// Fixed 2-D tile grid, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileMap {
    pub width: u16,
    pub height: u16,
    tiles: Vec<Tile>,
}

impl TileMap {
    pub fn filled(width: u16, height: u16, tile: Tile) -> Self {
        Self {
            width,
            height,
            tiles: vec![tile; (width as usize) * (height as usize)],
        }
    }

    /// Parses ASCII rows: `.` buildable, `#` path, `X` blocked, `S` spawn, `G` goal.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, MapError> {
        let first = rows.first().ok_or(MapError::Empty)?;
        let width = first.as_ref().chars().count();
        if width == 0 {
            return Err(MapError::Empty);
        }
        if width > u16::MAX as usize || rows.len() > u16::MAX as usize {
            return Err(MapError::TooLarge);
        }

        let mut tiles = Vec::with_capacity(width * rows.len());
        let mut goals = 0;
        for (row, line) in rows.iter().enumerate() {
            let line = line.as_ref();
            let found = line.chars().count();
            if found != width {
                return Err(MapError::Ragged {
                    row,
                    expected: width,
                    found,
                });
            }
            for (col, glyph) in line.chars().enumerate() {
                let tile =
                    Tile::from_glyph(glyph).ok_or(MapError::UnknownTile { glyph, col, row })?;
                if tile == Tile::Goal {
                    goals += 1;
                }
                tiles.push(tile);
            }
        }
        if goals > 1 {
            return Err(MapError::MultipleGoals);
        }

        Ok(Self {
            width: width as u16,
            height: rows.len() as u16,
            tiles,
        })
    }

    pub fn to_rows(&self) -> Vec<String> {
        self.tiles
            .chunks(self.width as usize)
            .map(|row| row.iter().map(|t| t.glyph()).collect())
            .collect()
    }

    #[inline]
    pub fn idx(&self, col: u16, row: u16) -> usize {
        (row as usize) * (self.width as usize) + (col as usize)
    }

    #[inline]
    pub fn in_bounds(&self, col: i32, row: i32) -> bool {
        col >= 0 && row >= 0 && col < self.width as i32 && row < self.height as i32
    }

    pub fn tile(&self, col: u16, row: u16) -> Option<Tile> {
        if col < self.width && row < self.height {
            Some(self.tiles[self.idx(col, row)])
        } else {
            None
        }
    }

    pub fn set(&mut self, col: u16, row: u16, tile: Tile) {
        let idx = self.idx(col, row);
        self.tiles[idx] = tile;
    }

    /// Spawn tiles in row-major scan order.
    pub fn spawns(&self) -> Vec<(u16, u16)> {
        self.positions_of(Tile::Spawn).collect()
    }

    pub fn goal(&self) -> Option<(u16, u16)> {
        self.positions_of(Tile::Goal).next()
    }

    fn positions_of(&self, wanted: Tile) -> impl Iterator<Item = (u16, u16)> + '_ {
        let width = self.width as usize;
        self.tiles
            .iter()
            .enumerate()
            .filter(move |&(_, &t)| t == wanted)
            .map(move |(i, _)| ((i % width) as u16, (i / width) as u16))
    }
}

/// Pixel center of tile (col, row).
pub fn tile_center(col: u16, row: u16, tile_size: f32) -> Vec2 {
    Vec2::new(
        col as f32 * tile_size + tile_size / 2.0,
        row as f32 * tile_size + tile_size / 2.0,
    )
}

/// Tile under a pixel position, if it lies on the map.
pub fn world_to_tile(map: &TileMap, x: f32, y: f32, tile_size: f32) -> Option<(u16, u16)> {
    if x < 0.0 || y < 0.0 {
        return None;
    }
    let col = (x / tile_size).floor() as i32;
    let row = (y / tile_size).floor() as i32;
    map.in_bounds(col, row).then(|| (col as u16, row as u16))
}

const CARDINALS: [(i32, i32); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

/// Turns random buildable tiles into obstacles: some hugging the route, some
/// away from it. Row 0 is left free, and so is the last column when
/// `keep_last_column` is set. Only buildable tiles change, so every spawn
/// keeps its route to the goal.
pub fn scatter_obstacles<R: Rng>(
    map: &mut TileMap,
    rng: &mut R,
    params: &ObstacleParams,
    keep_last_column: bool,
) -> usize {
    let mut adjacent = Vec::new();
    let mut distant = Vec::new();
    let cols = if keep_last_column {
        map.width.saturating_sub(1)
    } else {
        map.width
    };

    for row in 1..map.height {
        for col in 0..cols {
            if map.tile(col, row) != Some(Tile::Buildable) {
                continue;
            }
            // Spawn and goal tiles count as part of the route.
            let near_path = CARDINALS.iter().any(|&(dc, dr)| {
                let (c, r) = (col as i32 + dc, row as i32 + dr);
                map.in_bounds(c, r)
                    && map.tile(c as u16, r as u16).is_some_and(Tile::is_walkable)
            });
            if near_path {
                adjacent.push((col, row));
            } else {
                distant.push((col, row));
            }
        }
    }

    adjacent.shuffle(rng);
    distant.shuffle(rng);

    let near = params.max_adjacent.min(adjacent.len()).min(params.max_total);
    let far = params
        .max_distant
        .min(distant.len())
        .min(params.max_total - near);

    for &(col, row) in adjacent.iter().take(near).chain(distant.iter().take(far)) {
        map.set(col, row, Tile::Blocked);
    }
    near + far
}

fn carve(map: &mut TileMap, cells: impl IntoIterator<Item = (u16, u16)>) {
    for (col, row) in cells {
        map.set(col, row, Tile::Path);
    }
}

/// Blocks the buildable tiles in the 3x3 square centered on (col, row).
fn block_around(map: &mut TileMap, col: u16, row: u16) {
    for r in row as i32 - 1..=row as i32 + 1 {
        for c in col as i32 - 1..=col as i32 + 1 {
            if map.in_bounds(c, r) && map.tile(c as u16, r as u16) == Some(Tile::Buildable) {
                map.set(c as u16, r as u16, Tile::Blocked);
            }
        }
    }
}

fn serpentine() -> TileMap {
    let mut map = TileMap::filled(23, 14, Tile::Buildable);
    carve(&mut map, (0..17).map(|c| (c, 4)));
    carve(&mut map, (4..8).map(|r| (16, r)));
    carve(&mut map, (4..=16).rev().map(|c| (c, 8)));
    carve(&mut map, (8..11).map(|r| (4, r)));
    carve(&mut map, (4..23).map(|c| (c, 10)));
    map.set(0, 4, Tile::Spawn);
    map.set(22, 10, Tile::Goal);
    map
}

fn twin_gate() -> TileMap {
    let mut map = TileMap::filled(26, 17, Tile::Buildable);
    carve(&mut map, (0..10).map(|c| (c, 1)));
    carve(&mut map, (1..7).map(|r| (10, r)));
    carve(&mut map, (0..9).map(|c| (c, 12)));
    carve(&mut map, (8..=12).map(|r| (9, r)));
    carve(&mut map, (9..25).map(|c| (c, 7)));
    map.set(0, 1, Tile::Spawn);
    map.set(0, 12, Tile::Spawn);
    map.set(24, 7, Tile::Goal);

    // The gate markers occupy a 3x3 footprint drawn from the tile's left/top edge.
    for r in 0..=2 {
        for c in 0..=2 {
            if map.tile(c, r) == Some(Tile::Buildable) {
                map.set(c, r, Tile::Blocked);
            }
        }
    }
    for r in 11..=13 {
        for c in 0..=2 {
            if map.tile(c, r) == Some(Tile::Buildable) {
                map.set(c, r, Tile::Blocked);
            }
        }
    }
    block_around(&mut map, 24, 7);
    map
}
