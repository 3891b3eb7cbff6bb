#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that computes deterministic tower targets from world snapshots.
//!
//! Range is a plain Euclidean test, but priority is not: among the zombies a
//! tower can reach, it always picks the one with the fewest hops left to its
//! exit — whichever is closest to leaking — rather than the spatially
//! nearest.

use zombie_defence_core::{
    TilePoint, TowerId, TowerTarget, TowerView, ZombieId, ZombiePhase, ZombieView,
};

/// Tower targeting system that reuses scratch buffers to avoid repeated
/// allocations.
#[derive(Debug, Default)]
pub struct TowerTargeting {
    tower_workspace: Vec<TowerWorkspace>,
    zombie_workspace: Vec<ZombieCandidate>,
}

impl TowerTargeting {
    /// Creates a new tower targeting system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes tower targets for the provided world snapshot.
    ///
    /// The output buffer is cleared before populating it with the latest
    /// assignments.
    pub fn handle(&mut self, towers: &TowerView, zombies: &ZombieView, out: &mut Vec<TowerTarget>) {
        out.clear();

        if towers.iter().next().is_none() || zombies.is_empty() {
            return;
        }

        self.prepare_tower_workspace(towers);
        self.prepare_zombie_workspace(zombies);
        if self.zombie_workspace.is_empty() {
            return;
        }

        for tower in &self.tower_workspace {
            let max_distance_sq = tower.range * tower.range;
            let mut best: Option<BestCandidate> = None;

            for candidate in &self.zombie_workspace {
                let dx = candidate.position.x() - tower.center.x();
                let dy = candidate.position.y() - tower.center.y();
                let distance_sq = dx * dx + dy * dy;

                if distance_sq > max_distance_sq {
                    continue;
                }

                let current = BestCandidate {
                    hops_to_exit: candidate.hops_to_exit,
                    zombie: candidate.id,
                };

                match &mut best {
                    Some(existing) => {
                        if current.precedes(existing) {
                            *existing = current;
                        }
                    }
                    None => best = Some(current),
                }
            }

            if let Some(best_candidate) = best {
                out.push(TowerTarget {
                    tower: tower.id,
                    zombie: best_candidate.zombie,
                });
            }
        }
    }

    fn prepare_tower_workspace(&mut self, towers: &TowerView) {
        self.tower_workspace.clear();
        let (lower, _) = towers.iter().size_hint();
        self.tower_workspace.reserve(lower);

        for snapshot in towers.iter() {
            self.tower_workspace.push(TowerWorkspace {
                id: snapshot.id,
                center: snapshot.cell.center(),
                range: snapshot.range(),
            });
        }
    }

    fn prepare_zombie_workspace(&mut self, zombies: &ZombieView) {
        self.zombie_workspace.clear();
        self.zombie_workspace.reserve(zombies.len());

        for snapshot in zombies.iter() {
            // Stuck zombies never leak, so they sort behind every traveler
            // but remain valid targets.
            let hops_to_exit = match snapshot.phase {
                ZombiePhase::Traveling => snapshot.distance_to_exit.unwrap_or(u16::MAX),
                ZombiePhase::Stuck => u16::MAX,
            };
            self.zombie_workspace.push(ZombieCandidate {
                id: snapshot.id,
                position: snapshot.position,
                hops_to_exit,
            });
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct TowerWorkspace {
    id: TowerId,
    center: TilePoint,
    range: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct ZombieCandidate {
    id: ZombieId,
    position: TilePoint,
    hops_to_exit: u16,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct BestCandidate {
    hops_to_exit: u16,
    zombie: ZombieId,
}

impl BestCandidate {
    fn precedes(&self, other: &Self) -> bool {
        if self.hops_to_exit != other.hops_to_exit {
            return self.hops_to_exit < other.hops_to_exit;
        }
        self.zombie < other.zombie
    }
}
