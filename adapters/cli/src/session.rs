//! Session orchestration: the fixed per-tick ordering over the world and
//! its systems.
//!
//! Order within a tick is significant and preserved here: wave release →
//! zombie movement and removal → tower targeting and firing → projectile
//! advance and removal → outcome checks. Pausing simply stops the clock;
//! player commands still resolve so building while paused works.

use std::time::Duration;

use zombie_defence_core::{
    ColorGrid, Command, Event, Outcome, TileCoord, TowerId, TowerKind, TowerTarget,
};
use zombie_defence_system_bootstrap::{Bootstrap, HudSnapshot};
use zombie_defence_system_builder::{Builder, BuilderInput};
use zombie_defence_system_tower_combat::TowerCombat;
use zombie_defence_system_tower_targeting::TowerTargeting;
use zombie_defence_system_waves::{Config as WaveConfig, WaveController, WaveError};
use zombie_defence_world::{apply, query, MapError, World};

use crate::config::SessionConfig;

/// Errors that can prevent a session from starting.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The level rasters failed to decode.
    #[error(transparent)]
    Map(#[from] MapError),
    /// The wave file failed to parse.
    #[error(transparent)]
    Waves(#[from] WaveError),
}

/// Player intent delivered by the UI layer for one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerAction {
    /// Construct a tower of the given kind at the given cell.
    Build {
        /// Kind of tower to construct.
        kind: TowerKind,
        /// Cell the tower should occupy.
        cell: TileCoord,
    },
    /// Upgrade an existing tower by one level.
    Upgrade {
        /// Identifier of the tower to upgrade.
        tower: TowerId,
    },
    /// Release the next wave into the spawn lanes.
    CallNextWave,
    /// Stop advancing simulated time.
    Pause,
    /// Resume advancing simulated time.
    Resume,
}

/// A running level: the world plus every system that drives it.
#[derive(Debug)]
pub struct Session {
    world: World,
    waves: WaveController,
    targeting: TowerTargeting,
    combat: TowerCombat,
    builder: Builder,
    bootstrap: Bootstrap,
    commands: Vec<Command>,
    targets: Vec<TowerTarget>,
    events: Vec<Event>,
    paused: bool,
    max_dt: Duration,
}

impl Session {
    /// Builds a session from decoded level rasters and a wave file.
    pub fn new(
        map: &ColorGrid,
        blocking: &ColorGrid,
        waves_text: &str,
        config: &SessionConfig,
    ) -> Result<Self, SessionError> {
        let world = World::from_grids(map, blocking, config.level())?;
        let spawn_points = query::spawn_points(&world).len();
        let waves = WaveController::from_str(
            waves_text,
            spawn_points,
            WaveConfig::new(config.release_interval()),
        )?;

        Ok(Self {
            world,
            waves,
            targeting: TowerTargeting::new(),
            combat: TowerCombat::new(),
            builder: Builder::new(),
            bootstrap: Bootstrap::default(),
            commands: Vec::new(),
            targets: Vec::new(),
            events: Vec::new(),
            paused: false,
            max_dt: config.max_dt(),
        })
    }

    /// Runs one frame: player actions first, then — unless paused — one
    /// simulation tick in the fixed order.
    ///
    /// Returns the events the world broadcast during the frame.
    pub fn tick(&mut self, dt: Duration, actions: &[PlayerAction]) -> &[Event] {
        self.events.clear();

        let mut input = BuilderInput::default();
        for action in actions {
            match *action {
                PlayerAction::Build { kind, cell } => input.build = Some((kind, cell)),
                PlayerAction::Upgrade { tower } => input.upgrade = Some(tower),
                PlayerAction::CallNextWave => {
                    let _ = self.waves.call_next();
                }
                PlayerAction::Pause => self.paused = true,
                PlayerAction::Resume => self.paused = false,
            }
        }

        self.commands.clear();
        let currency = query::currency(&self.world);
        let world = &self.world;
        self.builder.handle(
            input,
            currency,
            |cell| query::is_buildable(world, cell),
            &mut self.commands,
        );
        flush(&mut self.world, &mut self.commands, &mut self.events);

        if self.paused {
            return &self.events;
        }

        let dt = dt.min(self.max_dt);

        // 1. Wave release.
        self.waves.update(dt, &mut self.commands);
        flush(&mut self.world, &mut self.commands, &mut self.events);

        // 2. Zombie movement, timers, removal.
        apply(&mut self.world, Command::Tick { dt }, &mut self.events);

        // 3. Targeting and firing for ready towers.
        let towers = query::tower_view(&self.world);
        let zombies = query::zombie_view(&self.world);
        self.targeting.handle(&towers, &zombies, &mut self.targets);
        self.combat.handle(&towers, &self.targets, &mut self.commands);
        flush(&mut self.world, &mut self.commands, &mut self.events);

        // 4. Projectile advance and detonation.
        apply(
            &mut self.world,
            Command::AdvanceProjectiles { dt },
            &mut self.events,
        );

        &self.events
    }

    /// Current verdict of the level.
    #[must_use]
    pub fn outcome(&self) -> Outcome {
        self.bootstrap
            .outcome(&self.world, self.waves.is_exhausted())
    }

    /// HUD counters for the current frame.
    #[must_use]
    pub fn hud(&self) -> HudSnapshot {
        self.bootstrap.hud(&self.world, self.waves.progress())
    }

    /// Read-only access to the authoritative world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Read-only access to the wave controller.
    #[must_use]
    pub fn waves(&self) -> &WaveController {
        &self.waves
    }

    /// Reports whether the clock is currently stopped.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }
}

fn flush(world: &mut World, commands: &mut Vec<Command>, events: &mut Vec<Event>) {
    for command in commands.drain(..) {
        apply(world, command, events);
    }
}
