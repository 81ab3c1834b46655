use crate::map::{tile_center, TileMap};
use glam::Vec2;
use std::collections::VecDeque;

/// Neighbor directions in fixed order: up, down, left, right.
/// Stored as (dcol, drow) where positive row is down.
const NEIGHBORS: [(i32, i32); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

/// Waypoints from one spawn to the goal. Immutable once resolved.
#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    /// Spawn tile this path starts from.
    pub spawn: (u16, u16),
    /// Tiles walked, spawn first and goal last.
    pub tiles: Vec<(u16, u16)>,
    /// Pixel centers of `tiles`.
    pub waypoints: Vec<Vec2>,
    /// True when no walkable route existed and the path cuts straight across.
    pub direct: bool,
}

impl Path {
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn start(&self) -> Vec2 {
        self.waypoints[0]
    }

    pub fn waypoint(&self, index: usize) -> Option<Vec2> {
        self.waypoints.get(index).copied()
    }
}

/// Resolve one path per spawn tile, in scan order.
///
/// Returns an empty list when the map has no spawn or no goal.
pub fn resolve_paths(map: &TileMap, tile_size: f32) -> Vec<Path> {
    let Some(goal) = map.goal() else {
        return Vec::new();
    };

    map.spawns()
        .into_iter()
        .map(|spawn| {
            let (tiles, direct) = match shortest_route(map, spawn, goal) {
                Some(tiles) => (tiles, false),
                None => {
                    tracing::warn!(
                        ?spawn,
                        ?goal,
                        "no walkable route from spawn to goal, using direct path"
                    );
                    (vec![spawn, goal], true)
                }
            };
            let waypoints = tiles
                .iter()
                .map(|&(col, row)| tile_center(col, row, tile_size))
                .collect();
            Path {
                spawn,
                tiles,
                waypoints,
                direct,
            }
        })
        .collect()
}

/// Breadth-first search over walkable tiles. First visit wins, so the result
/// is a shortest route by tile count. Includes both endpoints.
fn shortest_route(map: &TileMap, start: (u16, u16), goal: (u16, u16)) -> Option<Vec<(u16, u16)>> {
    if start == goal {
        return None;
    }

    let width = map.width as usize;
    let size = width * (map.height as usize);

    let mut visited = vec![false; size];
    let mut parent: Vec<Option<usize>> = vec![None; size];
    let mut queue = VecDeque::new();

    let start_idx = map.idx(start.0, start.1);
    let goal_idx = map.idx(goal.0, goal.1);
    visited[start_idx] = true;
    queue.push_back(start_idx);

    let mut reached = false;
    while let Some(idx) = queue.pop_front() {
        if idx == goal_idx {
            reached = true;
            break;
        }

        let col = (idx % width) as i32;
        let row = (idx / width) as i32;

        for &(dc, dr) in &NEIGHBORS {
            let (nc, nr) = (col + dc, row + dr);
            if !map.in_bounds(nc, nr) {
                continue;
            }

            let (nc, nr) = (nc as u16, nr as u16);
            let nidx = map.idx(nc, nr);
            if visited[nidx] {
                continue;
            }

            let walkable = map.tile(nc, nr).is_some_and(|t| t.is_walkable());
            if !walkable {
                continue;
            }

            visited[nidx] = true;
            parent[nidx] = Some(idx);
            queue.push_back(nidx);
        }
    }

    if !reached {
        return None;
    }

    // Backtrack from the goal to the start
    let mut route = Vec::new();
    let mut current = goal_idx;
    route.push(current);
    while let Some(p) = parent[current] {
        route.push(p);
        current = p;
    }
    route.reverse();

    Some(
        route
            .into_iter()
            .map(|i| ((i % width) as u16, (i / width) as u16))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{MapKind, Tile};

    fn assert_valid(path: &Path, map: &TileMap, tile_size: f32) {
        let goal = map.goal().unwrap();
        assert_eq!(path.waypoints[0], tile_center(path.spawn.0, path.spawn.1, tile_size));
        assert_eq!(*path.waypoints.last().unwrap(), tile_center(goal.0, goal.1, tile_size));
        assert_eq!(path.tiles.len(), path.waypoints.len());
        if path.direct {
            assert_eq!(path.len(), 2);
            return;
        }
        for pair in path.tiles.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let step = a.0.abs_diff(b.0) + a.1.abs_diff(b.1);
            assert_eq!(step, 1, "{a:?} -> {b:?} is not a 4-neighbor step");
            assert!(map.tile(b.0, b.1).unwrap().is_walkable());
        }
    }

    #[test]
    fn straight_corridor() {
        let map = TileMap::from_rows(&["..........", "S#########G", ".........."].map(|r| {
            // pad the border rows to the corridor width
            format!("{r:.<11}")
        }))
        .unwrap();
        let paths = resolve_paths(&map, 48.0);

        assert_eq!(paths.len(), 1);
        let path = &paths[0];
        assert!(!path.direct);
        assert_eq!(path.len(), 11);
        assert_eq!(path.start(), Vec2::new(24.0, 72.0));
        assert_eq!(path.waypoint(10), Some(Vec2::new(504.0, 72.0)));
        assert_valid(path, &map, 48.0);
    }

    #[test]
    fn takes_the_shorter_branch() {
        let map = TileMap::from_rows(&[
            "S#####",
            "#....#",
            "#....#",
            "###..#",
            "..#..G",
        ])
        .unwrap();
        let path = &resolve_paths(&map, 10.0)[0];
        assert_eq!(path.len(), 10);
        assert_valid(path, &map, 10.0);
    }

    #[test]
    fn built_in_maps_resolve_every_spawn() {
        for kind in [MapKind::Serpentine, MapKind::TwinGate] {
            let map = kind.build();
            let paths = resolve_paths(&map, 48.0);
            assert_eq!(paths.len(), map.spawns().len());
            for path in &paths {
                assert!(!path.direct);
                assert_valid(path, &map, 48.0);
            }
        }
    }

    #[test]
    fn twin_gate_paths_start_at_their_own_spawn() {
        let map = MapKind::TwinGate.build();
        let paths = resolve_paths(&map, 48.0);
        assert_eq!(paths[0].spawn, (0, 1));
        assert_eq!(paths[1].spawn, (0, 12));
        assert_ne!(paths[0].waypoints, paths[1].waypoints);
    }

    #[test]
    fn disconnected_spawn_falls_back_to_direct_path() {
        let map = TileMap::from_rows(&["S#X#G"]).unwrap();
        let paths = resolve_paths(&map, 48.0);
        assert_eq!(paths.len(), 1);
        let path = &paths[0];
        assert!(path.direct);
        assert_eq!(path.waypoints, vec![Vec2::new(24.0, 24.0), Vec2::new(216.0, 24.0)]);
        assert_valid(path, &map, 48.0);
    }

    #[test]
    fn missing_markers_resolve_to_nothing() {
        let no_goal = TileMap::from_rows(&["S###."]).unwrap();
        assert!(resolve_paths(&no_goal, 48.0).is_empty());

        let no_spawn = TileMap::from_rows(&["####G"]).unwrap();
        assert!(resolve_paths(&no_spawn, 48.0).is_empty());
    }

    #[test]
    fn blocked_tiles_are_not_walked() {
        let mut map = TileMap::from_rows(&["S###G", "#...#", "#####"]).unwrap();
        map.set(2, 0, Tile::Blocked);
        let path = &resolve_paths(&map, 48.0)[0];
        assert!(!path.direct);
        assert!(!path.tiles.contains(&(2, 0)));
        assert_valid(path, &map, 48.0);
    }
}
