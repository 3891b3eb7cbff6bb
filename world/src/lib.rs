#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative level state management for Zombie Defence.
//!
//! The world owns the tile arena, the blocking layer, every live zombie,
//! tower, and projectile, and the economy counters. Adapters and systems
//! mutate it exclusively through [`apply`] and read it exclusively through
//! the [`query`] module.

mod navigation;
mod projectiles;
mod tilemap;
mod towers;

use std::time::Duration;

use tracing::info;
use zombie_defence_core::{
    AttackStyle, BlockKind, BroodSpec, BuildError, ColorGrid, Command, Event, GoalId, Health,
    TileCoord, TilePoint, UpgradeError, ZombieId, ZombieKind, ZombiePhase,
};

use projectiles::ProjectileSet;
use tilemap::{next_random, TileArena};
use towers::TowerRegistry;

pub use tilemap::MapError;

const DEFAULT_STARTING_CURRENCY: u32 = 250;
const DEFAULT_STARTING_LIVES: u32 = 10;
const DEFAULT_RNG_SEED: u64 = 0x42f0_e1eb_d4a5_3c21;

/// Tunable starting conditions for a level.
#[derive(Clone, Copy, Debug)]
pub struct LevelConfig {
    /// Currency the player starts with.
    pub starting_currency: u32,
    /// Lives the player starts with.
    pub starting_lives: u32,
    /// Seed for the world's deterministic random draws.
    pub rng_seed: u64,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            starting_currency: DEFAULT_STARTING_CURRENCY,
            starting_lives: DEFAULT_STARTING_LIVES,
            rng_seed: DEFAULT_RNG_SEED,
        }
    }
}

/// Represents the authoritative Zombie Defence level state.
#[derive(Debug)]
pub struct World {
    arena: TileArena,
    blocking: Vec<BlockKind>,
    towers: TowerRegistry,
    zombies: Vec<Zombie>,
    projectiles: ProjectileSet,
    currency: u32,
    lives: u32,
    rng_state: u64,
    next_zombie_id: u32,
    defeat_announced: bool,
}

impl World {
    /// Builds a level from its two decoded rasters.
    ///
    /// The map layer paints tiles, the blocking layer paints buildability;
    /// both must share dimensions. Navigation is linked once here and never
    /// mutated afterwards.
    pub fn from_grids(
        map: &ColorGrid,
        blocking: &ColorGrid,
        config: LevelConfig,
    ) -> Result<Self, MapError> {
        if map.width() != blocking.width() || map.height() != blocking.height() {
            return Err(MapError::MismatchedLayers {
                map_width: map.width(),
                map_height: map.height(),
                blocking_width: blocking.width(),
                blocking_height: blocking.height(),
            });
        }

        let mut rng_state = config.rng_seed;
        let arena = TileArena::decode(map, &mut rng_state)?;
        let blocking = tilemap::decode_blocking(blocking);

        info!(
            columns = arena.width(),
            rows = arena.height(),
            spawn_points = arena.starts().len(),
            exits = arena.goals().len(),
            "level ready"
        );

        Ok(Self {
            arena,
            blocking,
            towers: TowerRegistry::new(),
            zombies: Vec::new(),
            projectiles: ProjectileSet::new(),
            currency: config.starting_currency,
            lives: config.starting_lives,
            rng_state,
            next_zombie_id: 0,
            defeat_announced: false,
        })
    }

    fn zombie_index(&self, zombie: ZombieId) -> Option<usize> {
        self.zombies.iter().position(|entry| entry.id == zombie)
    }

    fn spawn_at(
        &mut self,
        kind: ZombieKind,
        cell: usize,
        position: TilePoint,
        goal: Option<GoalId>,
        out_events: &mut Vec<Event>,
    ) {
        let id = ZombieId::new(self.next_zombie_id);
        self.next_zombie_id += 1;

        let destination = goal
            .and_then(|goal| self.arena.nav_entry(cell, goal))
            .map(|entry| entry.next as usize);
        let spec = kind.spec();

        self.zombies.push(Zombie {
            id,
            kind,
            position,
            cell,
            goal,
            destination,
            health: Health::new(spec.health),
            max_health: Health::new(spec.health),
            shield: spec.shield,
            stun: Duration::ZERO,
            summon_elapsed: Duration::ZERO,
            move_pause: Duration::ZERO,
            phase: ZombiePhase::Traveling,
            exited: false,
        });
        out_events.push(Event::ZombieSpawned {
            zombie: id,
            kind,
            cell: self.arena.coord_of(cell),
            goal,
        });
    }

    /// Applies damage and resolves any lethal-hit brood at the victim's
    /// position.
    fn damage_zombie(&mut self, index: usize, amount: u32, out_events: &mut Vec<Event>) {
        let (position, cell, goal, brood) = {
            let zombie = &mut self.zombies[index];
            let brood = zombie.hit(amount);
            (zombie.position, zombie.cell, zombie.goal, brood)
        };

        if let Some(BroodSpec { count, kind }) = brood {
            for _ in 0..count {
                self.spawn_at(kind, cell, position, goal, out_events);
            }
        }
    }

    /// Removes exited and dead zombies, settling the economy exactly once
    /// per removal.
    fn reap(&mut self, out_events: &mut Vec<Event>) {
        let mut index = 0;
        while index < self.zombies.len() {
            let zombie = &self.zombies[index];
            let spec = zombie.kind.spec();

            if zombie.exited {
                let lives_lost = spec.lives_impact;
                let id = zombie.id;
                self.lives = self.lives.saturating_sub(lives_lost);
                let _ = self.zombies.remove(index);
                out_events.push(Event::ZombieExited {
                    zombie: id,
                    lives_lost,
                });
                if self.lives == 0 && !self.defeat_announced {
                    self.defeat_announced = true;
                    out_events.push(Event::LivesExhausted);
                }
                continue;
            }

            if zombie.health.is_zero() {
                let reward = spec.reward;
                let id = zombie.id;
                self.currency = self.currency.saturating_add(reward);
                let _ = self.zombies.remove(index);
                out_events.push(Event::ZombieDied { zombie: id, reward });
                continue;
            }

            index += 1;
        }
    }

    fn block_at(&self, cell: TileCoord) -> Option<BlockKind> {
        self.arena.index(cell).map(|index| self.blocking[index])
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            out_events.push(Event::TimeAdvanced { dt });

            let mut summons: Vec<SummonRequest> = Vec::new();
            let arena = &world.arena;
            for zombie in world.zombies.iter_mut() {
                step_zombie(zombie, arena, dt, &mut summons, out_events);
            }
            for request in summons {
                world.spawn_at(
                    request.kind,
                    request.cell,
                    request.position,
                    request.goal,
                    out_events,
                );
            }

            world.towers.tick(dt);
            world.reap(out_events);
        }
        Command::AdvanceProjectiles { dt } => {
            let detonations = world.projectiles.advance(dt);
            for detonation in detonations {
                resolve_detonation(world, detonation, out_events);
            }
            world.reap(out_events);
        }
        Command::SpawnZombie { spawn_point, kind } => {
            let Some(&start) = world.arena.starts().get(spawn_point.get() as usize) else {
                return;
            };
            let Some(cell) = world.arena.index(start) else {
                return;
            };

            // Goal committed once at spawn, uniformly among the exits the
            // Start knows about.
            let goals = world.arena.known_goals(cell);
            let goal = match goals.len() {
                0 => None,
                1 => Some(goals[0]),
                _ => {
                    world.rng_state = next_random(world.rng_state);
                    Some(goals[(world.rng_state % goals.len() as u64) as usize])
                }
            };

            world.spawn_at(kind, cell, start.center(), goal, out_events);
        }
        Command::BuildTower { kind, cell } => {
            let Some(block) = world.block_at(cell) else {
                out_events.push(Event::BuildRejected {
                    kind,
                    cell,
                    reason: BuildError::OutOfBounds,
                });
                return;
            };
            if block != BlockKind::Buildable {
                out_events.push(Event::BuildRejected {
                    kind,
                    cell,
                    reason: BuildError::NotBuildable,
                });
                return;
            }
            if world.towers.occupant(cell).is_some() {
                out_events.push(Event::BuildRejected {
                    kind,
                    cell,
                    reason: BuildError::Occupied,
                });
                return;
            }
            let cost = kind.spec().build_cost();
            if world.currency < cost {
                out_events.push(Event::BuildRejected {
                    kind,
                    cell,
                    reason: BuildError::InsufficientFunds,
                });
                return;
            }

            world.currency -= cost;
            let tower = world.towers.insert(kind, cell);
            out_events.push(Event::TowerBuilt { tower, kind, cell });
        }
        Command::UpgradeTower { tower } => {
            let Some(state) = world.towers.get(tower) else {
                out_events.push(Event::UpgradeRejected {
                    tower,
                    reason: UpgradeError::UnknownTower,
                });
                return;
            };
            let Some(cost) = state.kind.spec().upgrade_cost(state.level) else {
                out_events.push(Event::UpgradeRejected {
                    tower,
                    reason: UpgradeError::MaxLevel,
                });
                return;
            };
            if world.currency < cost {
                out_events.push(Event::UpgradeRejected {
                    tower,
                    reason: UpgradeError::InsufficientFunds,
                });
                return;
            }

            let next_level = state.level + 1;
            world.currency -= cost;
            if let Some(state) = world.towers.get_mut(tower) {
                state.level = next_level;
            }
            out_events.push(Event::TowerUpgraded {
                tower,
                level: next_level,
            });
        }
        Command::FireAtZombie { tower, zombie } => {
            let Some(state) = world.towers.get(tower) else {
                return;
            };
            if !state.ready_in.is_zero() {
                return;
            }
            let Some(index) = world.zombie_index(zombie) else {
                return;
            };

            let kind = state.kind;
            let level = state.level;
            let spec = kind.spec();
            let origin = state.cell.center();
            let target = world.zombies[index].position;

            match (spec.attack, spec.splash_radius) {
                (AttackStyle::Lobbed { speed }, Some(radius)) => {
                    // Splash towers deal no direct damage; everything rides
                    // on the detonation.
                    let immediate = world.projectiles.spawn_grenade(
                        origin,
                        target,
                        speed,
                        spec.damage_at(level),
                        radius,
                    );
                    if let Some(detonation) = immediate {
                        resolve_detonation(world, detonation, out_events);
                    }
                }
                _ => {
                    world.damage_zombie(index, spec.damage_at(level), out_events);
                    if let Some(stun) = spec.stun_at(level) {
                        // Overwrite, not add: re-stunning refreshes.
                        world.zombies[index].stun = stun;
                    }
                    world.projectiles.spawn_trail(origin, target);
                }
            }

            if let Some(state) = world.towers.get_mut(tower) {
                state.ready_in = spec.fire_interval_at(level);
            }
            out_events.push(Event::TowerFired { tower, zombie });
            world.reap(out_events);
        }
    }
}

fn resolve_detonation(
    world: &mut World,
    detonation: projectiles::Detonation,
    out_events: &mut Vec<Event>,
) {
    // Collect first, damage second: brood spawns may grow the collection.
    let victims: Vec<usize> = world
        .zombies
        .iter()
        .enumerate()
        .filter(|(_, zombie)| zombie.position.distance_to(detonation.position) <= detonation.radius)
        .map(|(index, _)| index)
        .collect();

    let hits = victims.len() as u32;
    for index in victims {
        world.damage_zombie(index, detonation.damage, out_events);
    }

    world.projectiles.spawn_blast(detonation.position);
    out_events.push(Event::GrenadeDetonated {
        projectile: detonation.projectile,
        position: detonation.position,
        hits,
    });
}

#[derive(Clone, Copy, Debug)]
struct SummonRequest {
    kind: ZombieKind,
    cell: usize,
    position: TilePoint,
    goal: Option<GoalId>,
}

fn step_zombie(
    zombie: &mut Zombie,
    arena: &TileArena,
    dt: Duration,
    summons: &mut Vec<SummonRequest>,
    out_events: &mut Vec<Event>,
) {
    if !zombie.stun.is_zero() {
        // Stunned zombies are inert: no movement, no type behavior.
        zombie.stun = zombie.stun.saturating_sub(dt);
        return;
    }

    if let Some(summon) = zombie.kind.spec().summon {
        zombie.summon_elapsed = zombie.summon_elapsed.saturating_add(dt);
        if zombie.summon_elapsed >= summon.interval {
            zombie.summon_elapsed = Duration::ZERO;
            zombie.move_pause = summon.pause;
            for _ in 0..summon.burst {
                summons.push(SummonRequest {
                    kind: summon.kind,
                    cell: zombie.cell,
                    position: zombie.position,
                    goal: zombie.goal,
                });
            }
        }
    }

    if !zombie.move_pause.is_zero() {
        zombie.move_pause = zombie.move_pause.saturating_sub(dt);
        return;
    }

    let Some(destination) = zombie.destination else {
        if zombie.phase == ZombiePhase::Traveling {
            zombie.phase = ZombiePhase::Stuck;
            out_events.push(Event::ZombieStuck { zombie: zombie.id });
        }
        return;
    };

    let speed = zombie.kind.spec().speed;
    let target = arena.coord_of(destination).center();
    let distance = zombie.position.distance_to(target);
    // Snap threshold scales with per-tick travel so fast zombies cannot
    // overshoot and oscillate around a node at low frame rates.
    let step = speed * dt.as_secs_f32();

    if distance <= step {
        zombie.position = target;
        zombie.cell = destination;

        if !arena.kind_at(destination).is_walkable() {
            zombie.exited = true;
            return;
        }

        match zombie
            .goal
            .and_then(|goal| arena.nav_entry(destination, goal))
        {
            Some(entry) => zombie.destination = Some(entry.next as usize),
            None => {
                zombie.destination = None;
                zombie.phase = ZombiePhase::Stuck;
                out_events.push(Event::ZombieStuck { zombie: zombie.id });
            }
        }
        return;
    }

    if distance <= f32::EPSILON {
        return;
    }

    let scale = step / distance;
    zombie.position = TilePoint::new(
        zombie.position.x() + (target.x() - zombie.position.x()) * scale,
        zombie.position.y() + (target.y() - zombie.position.y()) * scale,
    );
}

#[derive(Clone, Debug)]
struct Zombie {
    id: ZombieId,
    kind: ZombieKind,
    position: TilePoint,
    cell: usize,
    goal: Option<GoalId>,
    destination: Option<usize>,
    health: Health,
    max_health: Health,
    shield: u32,
    stun: Duration,
    summon_elapsed: Duration,
    move_pause: Duration,
    phase: ZombiePhase,
    exited: bool,
}

impl Zombie {
    /// Applies damage, draining shield before health.
    ///
    /// Returns the brood to release when this hit is lethal and the kind
    /// carries one.
    fn hit(&mut self, amount: u32) -> Option<BroodSpec> {
        let mut remaining = amount;
        if self.shield > 0 {
            let absorbed = self.shield.min(remaining);
            self.shield -= absorbed;
            remaining -= absorbed;
        }
        if remaining == 0 {
            return None;
        }

        let lethal = remaining >= self.health.get() && !self.health.is_zero();
        self.health = self.health.saturating_sub(remaining);
        if lethal {
            self.kind.spec().brood
        } else {
            None
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{TileArena, World};
    use zombie_defence_core::{
        BlockKind, GoalId, ProjectileView, TileCoord, TileKind, TowerId, TowerSnapshot, TowerView,
        ZombieSnapshot, ZombieView,
    };

    /// Dimensions of the level grid as `(columns, rows)`.
    #[must_use]
    pub fn dimensions(world: &World) -> (u32, u32) {
        (world.arena.width(), world.arena.height())
    }

    /// Map-layer kind stored at the provided cell.
    #[must_use]
    pub fn tile_at(world: &World, cell: TileCoord) -> Option<TileKind> {
        world.arena.index(cell).map(|index| world.arena.kind_at(index))
    }

    /// Reports whether the cell anchors a multi-cell structure's sprite.
    #[must_use]
    pub fn is_anchor(world: &World, cell: TileCoord) -> bool {
        world
            .arena
            .index(cell)
            .is_some_and(|index| world.arena.is_anchor(index))
    }

    /// Blocking-layer kind stored at the provided cell.
    #[must_use]
    pub fn block_at(world: &World, cell: TileCoord) -> Option<BlockKind> {
        world.block_at(cell)
    }

    /// Reports whether a tower may currently be constructed at the cell.
    #[must_use]
    pub fn is_buildable(world: &World, cell: TileCoord) -> bool {
        world.block_at(cell) == Some(BlockKind::Buildable)
            && world.towers.occupant(cell).is_none()
    }

    /// Start tiles in the order wave definitions address them.
    #[must_use]
    pub fn spawn_points(world: &World) -> &[TileCoord] {
        world.arena.starts()
    }

    /// End tiles in goal-identifier order.
    #[must_use]
    pub fn goals(world: &World) -> &[TileCoord] {
        world.arena.goals()
    }

    /// Hops from a cell to the provided exit, if the cell knows a route.
    #[must_use]
    pub fn distance_to_goal(world: &World, cell: TileCoord, goal: GoalId) -> Option<u16> {
        let index = world.arena.index(cell)?;
        world
            .arena
            .nav_entry(index, goal)
            .map(|entry| entry.distance)
    }

    /// Tower occupying the provided cell, if any.
    #[must_use]
    pub fn tower_at(world: &World, cell: TileCoord) -> Option<TowerId> {
        world.towers.occupant(cell)
    }

    /// Current currency balance.
    #[must_use]
    pub fn currency(world: &World) -> u32 {
        world.currency
    }

    /// Remaining lives.
    #[must_use]
    pub fn lives(world: &World) -> u32 {
        world.lives
    }

    /// Number of zombies currently on the board.
    #[must_use]
    pub fn zombie_count(world: &World) -> usize {
        world.zombies.len()
    }

    /// Captures a read-only view of every live zombie.
    #[must_use]
    pub fn zombie_view(world: &World) -> ZombieView {
        let snapshots: Vec<ZombieSnapshot> = world
            .zombies
            .iter()
            .map(|zombie| ZombieSnapshot {
                id: zombie.id,
                kind: zombie.kind,
                position: zombie.position,
                cell: world.arena.coord_of(zombie.cell),
                goal: zombie.goal,
                health: zombie.health,
                max_health: zombie.max_health,
                shield: zombie.shield,
                stunned_for: zombie.stun,
                distance_to_exit: distance_for(&world.arena, zombie.cell, zombie.goal),
                phase: zombie.phase,
            })
            .collect();
        ZombieView::from_snapshots(snapshots)
    }

    /// Captures a read-only view of every placed tower.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        let snapshots: Vec<TowerSnapshot> = world
            .towers
            .iter()
            .map(|state| TowerSnapshot {
                id: state.id,
                kind: state.kind,
                cell: state.cell,
                level: state.level,
                ready_in: state.ready_in,
            })
            .collect();
        TowerView::from_snapshots(snapshots)
    }

    /// Captures a read-only view of every live projectile and effect.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        ProjectileView::from_snapshots(world.projectiles.snapshots())
    }

    fn distance_for(arena: &TileArena, cell: usize, goal: Option<GoalId>) -> Option<u16> {
        arena
            .nav_entry(cell, goal?)
            .map(|entry| entry.distance)
    }
}
