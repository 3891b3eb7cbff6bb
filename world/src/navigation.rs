//! Static per-goal navigation builder used by the world crate.

use std::collections::{BTreeMap, VecDeque};

use zombie_defence_core::{GoalId, TileCoord, TileKind};

/// One hop of a tile's route toward a specific exit.
///
/// `next` indexes the tile arena; following it repeatedly walks the zombie
/// to the exit while `distance` drops by exactly one per hop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct NavEntry {
    pub(crate) next: u32,
    pub(crate) distance: u16,
}

/// Builds the per-tile navigation maps with one reverse breadth-first walk
/// per End tile.
///
/// Each End seeds itself at distance 0 and expands outward through Road
/// tiles. Start tiles receive an entry when reached but never expand — they
/// are path origins, not thoroughfares. Road tiles no walk reaches keep an
/// empty map.
pub(crate) fn link(
    kinds: &[TileKind],
    width: u32,
    height: u32,
    goals: &[TileCoord],
) -> Vec<BTreeMap<GoalId, NavEntry>> {
    let cell_count = width as usize * height as usize;
    let mut nav: Vec<BTreeMap<GoalId, NavEntry>> = vec![BTreeMap::new(); cell_count];

    if cell_count == 0 {
        return nav;
    }

    for (goal_index, &end) in goals.iter().enumerate() {
        let goal = GoalId::new(goal_index as u32);
        let Some(end_index) = index(width, height, end) else {
            continue;
        };

        let _ = nav[end_index].insert(
            goal,
            NavEntry {
                next: end_index as u32,
                distance: 0,
            },
        );

        let mut queue = VecDeque::new();
        queue.push_back(end_index);

        while let Some(current) = queue.pop_front() {
            let current_distance = match nav[current].get(&goal) {
                Some(entry) => entry.distance,
                None => continue,
            };
            let next_distance = match current_distance.checked_add(1) {
                Some(value) => value,
                None => continue,
            };

            for neighbor in neighbors(current, width, height) {
                if !kinds[neighbor].is_walkable() {
                    continue;
                }
                if nav[neighbor].contains_key(&goal) {
                    continue;
                }

                let _ = nav[neighbor].insert(
                    goal,
                    NavEntry {
                        next: current as u32,
                        distance: next_distance,
                    },
                );

                // Starts terminate the walk; only Road keeps expanding.
                if kinds[neighbor] == TileKind::Road {
                    queue.push_back(neighbor);
                }
            }
        }
    }

    nav
}

fn index(width: u32, height: u32, cell: TileCoord) -> Option<usize> {
    if cell.column() < width && cell.row() < height {
        Some(cell.row() as usize * width as usize + cell.column() as usize)
    } else {
        None
    }
}

fn neighbors(cell_index: usize, width: u32, height: u32) -> impl Iterator<Item = usize> {
    let width_usize = width as usize;
    let column = cell_index % width_usize;
    let row = cell_index / width_usize;

    let mut candidates = [None; 4];
    let mut count = 0;

    if row > 0 {
        candidates[count] = Some(cell_index - width_usize);
        count += 1;
    }
    if column + 1 < width_usize {
        candidates[count] = Some(cell_index + 1);
        count += 1;
    }
    if row + 1 < height as usize {
        candidates[count] = Some(cell_index + width_usize);
        count += 1;
    }
    if column > 0 {
        candidates[count] = Some(cell_index - 1);
        count += 1;
    }

    candidates.into_iter().take(count).flatten()
}
