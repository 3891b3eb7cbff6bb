//! Authoritative tower state management utilities.

use std::collections::BTreeMap;
use std::time::Duration;

use zombie_defence_core::{TileCoord, TowerId, TowerKind};

/// Mutable state of a tower stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct TowerState {
    pub(crate) id: TowerId,
    pub(crate) kind: TowerKind,
    pub(crate) cell: TileCoord,
    pub(crate) level: usize,
    pub(crate) ready_in: Duration,
}

/// Registry that stores towers and manages identifier allocation.
#[derive(Debug, Default)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, TowerState>,
    next_tower_id: u32,
}

impl TowerRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Places a new tower, ready to fire immediately.
    pub(crate) fn insert(&mut self, kind: TowerKind, cell: TileCoord) -> TowerId {
        let id = TowerId::new(self.next_tower_id);
        self.next_tower_id += 1;
        let _ = self.entries.insert(
            id,
            TowerState {
                id,
                kind,
                cell,
                level: 0,
                ready_in: Duration::ZERO,
            },
        );
        id
    }

    pub(crate) fn get(&self, id: TowerId) -> Option<&TowerState> {
        self.entries.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: TowerId) -> Option<&mut TowerState> {
        self.entries.get_mut(&id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &TowerState> {
        self.entries.values()
    }

    pub(crate) fn occupant(&self, cell: TileCoord) -> Option<TowerId> {
        self.entries
            .values()
            .find(|state| state.cell == cell)
            .map(|state| state.id)
    }

    /// Advances every cooldown toward readiness.
    pub(crate) fn tick(&mut self, dt: Duration) {
        for state in self.entries.values_mut() {
            state.ready_in = state.ready_in.saturating_sub(dt);
        }
    }
}
