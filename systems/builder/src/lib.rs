#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that translates player build input into placement and
//! upgrade commands.
//!
//! The preview advises the player before they commit: it checks the
//! blocking layer and the current balance. The world remains the authority
//! and re-validates every command it receives; funds are never deducted
//! here.

use zombie_defence_core::{Command, TileCoord, TowerId, TowerKind};

/// Declarative placement preview describing a potential tower construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacementPreview {
    /// Kind of tower proposed for placement.
    pub kind: TowerKind,
    /// Cell the tower would occupy.
    pub cell: TileCoord,
    /// Indicates whether the blocking layer allows the placement.
    pub buildable: bool,
    /// Indicates whether the player can afford the build cost.
    pub affordable: bool,
}

impl PlacementPreview {
    /// Evaluates a prospective placement against buildability and balance.
    #[must_use]
    pub fn evaluate<F>(kind: TowerKind, cell: TileCoord, currency: u32, is_buildable: F) -> Self
    where
        F: FnOnce(TileCoord) -> bool,
    {
        Self {
            kind,
            cell,
            buildable: is_buildable(cell),
            affordable: currency >= kind.spec().build_cost(),
        }
    }

    /// Reports whether the preview represents a valid placement.
    #[must_use]
    pub const fn placeable(&self) -> bool {
        self.buildable && self.affordable
    }
}

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuilderInput {
    /// Construction the player confirmed on this frame, if any.
    pub build: Option<(TowerKind, TileCoord)>,
    /// Tower the player asked to upgrade on this frame, if any.
    pub upgrade: Option<TowerId>,
}

/// Builder system that translates input into placement commands.
#[derive(Clone, Copy, Debug, Default)]
pub struct Builder;

impl Builder {
    /// Creates a new builder system instance.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Consumes player input and emits the commands it justifies.
    ///
    /// The `is_buildable` closure should mirror the semantics of the
    /// world's `query::is_buildable` helper.
    pub fn handle<F>(
        &self,
        input: BuilderInput,
        currency: u32,
        is_buildable: F,
        out: &mut Vec<Command>,
    ) where
        F: Fn(TileCoord) -> bool,
    {
        if let Some((kind, cell)) = input.build {
            let preview = PlacementPreview::evaluate(kind, cell, currency, &is_buildable);
            if preview.placeable() {
                out.push(Command::BuildTower { kind, cell });
            }
        }

        // Upgrade validity depends on the tower's level, which the world
        // tracks; the request passes through and may come back rejected.
        if let Some(tower) = input.upgrade {
            out.push(Command::UpgradeTower { tower });
        }
    }
}
