#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that emits firing commands from targeting data.
//!
//! Targeting assigns a zombie to every tower that can reach one; this system
//! filters that list down to the towers whose cooldown has elapsed and asks
//! the world to fire. A tower with no target keeps its elapsed cooldown
//! untouched, so it fires the instant something wanders into range.

use zombie_defence_core::{Command, TowerTarget, TowerView};

/// Tower combat system that queues firing commands for ready towers.
#[derive(Debug, Default)]
pub struct TowerCombat {
    scratch: Vec<Command>,
}

impl TowerCombat {
    /// Creates a new tower combat system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits `Command::FireAtZombie` entries for towers ready to fire.
    pub fn handle(
        &mut self,
        towers: &TowerView,
        tower_targets: &[TowerTarget],
        out: &mut Vec<Command>,
    ) {
        if tower_targets.is_empty() {
            return;
        }

        self.scratch.clear();

        for target in tower_targets {
            if let Some(snapshot) = towers.get(target.tower) {
                if snapshot.is_ready() {
                    self.scratch.push(Command::FireAtZombie {
                        tower: target.tower,
                        zombie: target.zombie,
                    });
                }
            }
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use zombie_defence_core::{TileCoord, TowerId, TowerKind, TowerSnapshot, ZombieId};

    fn snapshot(tower: u32, ready_in: Duration) -> TowerSnapshot {
        TowerSnapshot {
            id: TowerId::new(tower),
            kind: TowerKind::Gunner,
            cell: TileCoord::new(0, 0),
            level: 0,
            ready_in,
        }
    }

    fn target(tower: u32, zombie: u32) -> TowerTarget {
        TowerTarget {
            tower: TowerId::new(tower),
            zombie: ZombieId::new(zombie),
        }
    }

    #[test]
    fn ready_towers_fire_at_their_targets() {
        let mut system = TowerCombat::new();
        let towers = TowerView::from_snapshots(vec![
            snapshot(2, Duration::ZERO),
            snapshot(5, Duration::ZERO),
        ]);
        let targets = vec![target(2, 4), target(5, 1)];
        let mut out = Vec::new();

        system.handle(&towers, &targets, &mut out);

        assert_eq!(
            out,
            vec![
                Command::FireAtZombie {
                    tower: TowerId::new(2),
                    zombie: ZombieId::new(4),
                },
                Command::FireAtZombie {
                    tower: TowerId::new(5),
                    zombie: ZombieId::new(1),
                },
            ],
        );
    }

    #[test]
    fn cooling_or_missing_towers_are_skipped() {
        let mut system = TowerCombat::new();
        let towers = TowerView::from_snapshots(vec![
            snapshot(3, Duration::from_millis(250)),
            snapshot(8, Duration::ZERO),
        ]);
        let targets = vec![target(3, 9), target(8, 2), target(42, 3)];
        let mut out = Vec::new();

        system.handle(&towers, &targets, &mut out);

        assert_eq!(
            out,
            vec![Command::FireAtZombie {
                tower: TowerId::new(8),
                zombie: ZombieId::new(2),
            }],
        );
    }

    #[test]
    fn no_targets_means_no_commands() {
        let mut system = TowerCombat::new();
        let towers = TowerView::from_snapshots(vec![snapshot(1, Duration::ZERO)]);
        let mut out = Vec::new();

        system.handle(&towers, &[], &mut out);

        assert!(out.is_empty());
    }
}
