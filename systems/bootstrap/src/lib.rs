#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that bundles the queries a presentation layer
//! needs.
//!
//! Rendering, menus, and audio live outside this workspace; they read plain
//! data from here and never touch the world directly.

use zombie_defence_core::{Outcome, ProjectileView, TowerView, WaveProgress, ZombieView};
use zombie_defence_world::{query, World};

/// Heads-up display counters read every frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HudSnapshot {
    /// Current currency balance.
    pub currency: u32,
    /// Remaining lives.
    pub lives: u32,
    /// Wave progression as current/total.
    pub wave: WaveProgress,
}

/// Produces the data required to present a running level.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Collects the HUD counters for the current frame.
    #[must_use]
    pub fn hud(&self, world: &World, wave: WaveProgress) -> HudSnapshot {
        HudSnapshot {
            currency: query::currency(world),
            lives: query::lives(world),
            wave,
        }
    }

    /// Derives the level verdict.
    ///
    /// Defeat only needs the world; victory additionally needs the wave
    /// controller's word that nothing else will ever spawn.
    #[must_use]
    pub fn outcome(&self, world: &World, waves_exhausted: bool) -> Outcome {
        if query::lives(world) == 0 {
            return Outcome::Lost;
        }
        if waves_exhausted && query::zombie_count(world) == 0 {
            return Outcome::Won;
        }
        Outcome::Playing
    }

    /// Exposes the zombies currently on the board for presentation purposes.
    #[must_use]
    pub fn zombies(&self, world: &World) -> ZombieView {
        query::zombie_view(world)
    }

    /// Exposes the placed towers for presentation purposes.
    #[must_use]
    pub fn towers(&self, world: &World) -> TowerView {
        query::tower_view(world)
    }

    /// Exposes the live projectiles and effects for presentation purposes.
    #[must_use]
    pub fn projectiles(&self, world: &World) -> ProjectileView {
        query::projectile_view(world)
    }
}
