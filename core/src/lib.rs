#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Zombie Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.
//!
//! The crate also carries the static stat tables for every tile, zombie, and
//! tower kind so that upgrade-level indexing lives in one place.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Location of a single grid tile expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    column: u32,
    row: u32,
}

impl TileCoord {
    /// Creates a new grid tile coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the tile.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the tile.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two tile coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: TileCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Center of the tile expressed in fractional tile space.
    #[must_use]
    pub fn center(self) -> TilePoint {
        TilePoint::new(self.column as f32 + 0.5, self.row as f32 + 0.5)
    }
}

/// Fractional position measured in tile units.
///
/// Zombies and projectiles move continuously, so their positions subdivide
/// the discrete tile grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TilePoint {
    x: f32,
    y: f32,
}

impl TilePoint {
    /// Creates a new fractional tile-space position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal component measured in tiles.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical component measured in tiles.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Euclidean distance to another point in tile units.
    #[must_use]
    pub fn distance_to(self, other: TilePoint) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Exact RGB triple used by the level rasters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    red: u8,
    green: u8,
    blue: u8,
}

impl Rgb {
    /// Creates a new color from byte RGB components.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Dense 2-D grid of colors decoded from a level raster.
///
/// The asset-loading collaborator decodes the on-disk images and hands the
/// world a pair of these, one for the map layer and one for the blocking
/// layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorGrid {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
}

impl ColorGrid {
    /// Creates a grid of the provided dimensions filled with a single color.
    #[must_use]
    pub fn filled(width: u32, height: u32, fill: Rgb) -> Self {
        let capacity = width as usize * height as usize;
        Self {
            width,
            height,
            pixels: vec![fill; capacity],
        }
    }

    /// Overwrites a single pixel; out-of-bounds writes are ignored.
    pub fn set(&mut self, column: u32, row: u32, color: Rgb) {
        if let Some(index) = self.index(column, row) {
            self.pixels[index] = color;
        }
    }

    /// Color stored at the provided cell, if it lies within the grid.
    #[must_use]
    pub fn get(&self, column: u32, row: u32) -> Option<Rgb> {
        self.index(column, row).map(|index| self.pixels[index])
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, column: u32, row: u32) -> Option<usize> {
        if column < self.width && row < self.height {
            Some(row as usize * self.width as usize + column as usize)
        } else {
            None
        }
    }
}

/// Unique identifier assigned to a zombie.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ZombieId(u32);

impl ZombieId {
    /// Creates a new zombie identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an in-flight projectile or effect.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Stable identifier for a specific End tile.
///
/// Maps may carry several exits; navigation entries are keyed by this value
/// so a tile can simultaneously know its route to every reachable exit.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct GoalId(u32);

impl GoalId {
    /// Creates a new goal identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Index of a Start tile in the order the map declares them.
///
/// Wave definitions address their per-spawn-point groups through this value.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct SpawnPointId(u32);

impl SpawnPointId {
    /// Creates a new spawn-point identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Non-negative hit-point quantity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Health(u32);

impl Health {
    /// Creates a new health value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the underlying hit-point count.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Reports whether the pool is exhausted.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Subtracts damage, clamping at zero.
    #[must_use]
    pub const fn saturating_sub(self, amount: u32) -> Health {
        Health(self.0.saturating_sub(amount))
    }

    /// Remaining fraction of the provided maximum, for health bars.
    #[must_use]
    pub fn fraction_of(self, max: Health) -> f32 {
        if max.0 == 0 {
            0.0
        } else {
            self.0 as f32 / max.0 as f32
        }
    }
}

/// Type tag carried by every map-layer tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Inert filler outside the playable area.
    NoTile,
    /// Walkable path segment.
    Road,
    /// Path origin where zombies enter the map.
    Start,
    /// Path terminus; a zombie reaching it leaks through the defence.
    End,
    /// Decorative ground cover.
    Grass,
    /// Decorative shrub variant sharing the grass color key.
    Bush,
    /// Decorative boulder variant sharing the grass color key.
    Rock,
    /// Two-by-two gravestone structure.
    Grave,
    /// Four-by-four ruined house structure.
    House,
}

impl TileKind {
    /// Reports whether zombies may traverse the tile.
    #[must_use]
    pub const fn is_walkable(self) -> bool {
        matches!(self, Self::Road | Self::Start)
    }

    /// Width and height of the sprite footprint measured in tiles.
    ///
    /// Multi-cell structures span several grid cells under one sprite; the
    /// map loader normalizes their footprints after decoding.
    #[must_use]
    pub const fn footprint(self) -> (u32, u32) {
        match self {
            Self::Grave => (2, 2),
            Self::House => (4, 4),
            _ => (1, 1),
        }
    }

    /// Reports whether the kind spans more than one grid cell.
    #[must_use]
    pub const fn is_multi_cell(self) -> bool {
        let (width, height) = self.footprint();
        width > 1 || height > 1
    }
}

/// Type tag carried by every blocking-layer cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockKind {
    /// Nothing may be placed here.
    Open,
    /// The player may construct a tower here.
    Buildable,
    /// Permanently obstructed by scenery.
    Obstructed,
}

/// Kinds of zombies that wave files may reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ZombieKind {
    /// Baseline shambler.
    Zombie,
    /// Fragile sprinter.
    Fast,
    /// Slow boss that costs several lives on a leak.
    Giant,
    /// Tiny filler zombie spawned by summoners and carriers.
    Baby,
    /// Carries a shield pool that drains before health.
    Shield,
    /// Periodically stops to summon a burst of babies.
    Summoner,
    /// Releases a brood of babies when a hit would be lethal.
    Carry,
}

/// Periodic sub-spawning behavior attached to a zombie kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SummonSpec {
    /// Time between summon cycles.
    pub interval: Duration,
    /// Movement pause applied while the summon resolves.
    pub pause: Duration,
    /// Number of zombies produced per cycle.
    pub burst: u32,
    /// Kind of zombie produced.
    pub kind: ZombieKind,
}

/// Death-triggered brood behavior attached to a zombie kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BroodSpec {
    /// Number of zombies released by the lethal hit.
    pub count: u32,
    /// Kind of zombie released.
    pub kind: ZombieKind,
}

/// Static per-kind stat table for zombies.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZombieSpec {
    /// Movement speed in tiles per second.
    pub speed: f32,
    /// Starting health pool.
    pub health: u32,
    /// Starting shield pool drained before health.
    pub shield: u32,
    /// Currency credited when the zombie dies.
    pub reward: u32,
    /// Lives debited when the zombie reaches an exit.
    pub lives_impact: u32,
    /// Periodic summoning behavior, if any.
    pub summon: Option<SummonSpec>,
    /// Lethal-hit brood behavior, if any.
    pub brood: Option<BroodSpec>,
}

const ZOMBIE_SPEC: ZombieSpec = ZombieSpec {
    speed: 1.0,
    health: 100,
    shield: 0,
    reward: 20,
    lives_impact: 1,
    summon: None,
    brood: None,
};

const FAST_SPEC: ZombieSpec = ZombieSpec {
    speed: 2.0,
    health: 60,
    shield: 0,
    reward: 25,
    lives_impact: 1,
    summon: None,
    brood: None,
};

const GIANT_SPEC: ZombieSpec = ZombieSpec {
    speed: 0.5,
    health: 600,
    shield: 0,
    reward: 120,
    lives_impact: 3,
    summon: None,
    brood: None,
};

const BABY_SPEC: ZombieSpec = ZombieSpec {
    speed: 1.6,
    health: 25,
    shield: 0,
    reward: 5,
    lives_impact: 1,
    summon: None,
    brood: None,
};

const SHIELD_SPEC: ZombieSpec = ZombieSpec {
    speed: 0.9,
    health: 80,
    shield: 120,
    reward: 45,
    lives_impact: 1,
    summon: None,
    brood: None,
};

const SUMMONER_SPEC: ZombieSpec = ZombieSpec {
    speed: 0.7,
    health: 200,
    shield: 0,
    reward: 80,
    lives_impact: 2,
    summon: Some(SummonSpec {
        interval: Duration::from_millis(4000),
        pause: Duration::from_millis(1000),
        burst: 3,
        kind: ZombieKind::Baby,
    }),
    brood: None,
};

const CARRY_SPEC: ZombieSpec = ZombieSpec {
    speed: 0.8,
    health: 150,
    shield: 0,
    reward: 60,
    lives_impact: 2,
    summon: None,
    brood: Some(BroodSpec {
        count: 4,
        kind: ZombieKind::Baby,
    }),
};

impl ZombieKind {
    /// Static stat table for the kind.
    #[must_use]
    pub const fn spec(self) -> &'static ZombieSpec {
        match self {
            Self::Zombie => &ZOMBIE_SPEC,
            Self::Fast => &FAST_SPEC,
            Self::Giant => &GIANT_SPEC,
            Self::Baby => &BABY_SPEC,
            Self::Shield => &SHIELD_SPEC,
            Self::Summoner => &SUMMONER_SPEC,
            Self::Carry => &CARRY_SPEC,
        }
    }

    /// Name used by wave files to reference the kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Zombie => "zombie",
            Self::Fast => "fast",
            Self::Giant => "giant",
            Self::Baby => "baby",
            Self::Shield => "shield",
            Self::Summoner => "summoner",
            Self::Carry => "carry",
        }
    }

    /// Resolves a wave-file name into a kind.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "zombie" => Some(Self::Zombie),
            "fast" => Some(Self::Fast),
            "giant" => Some(Self::Giant),
            "baby" => Some(Self::Baby),
            "shield" => Some(Self::Shield),
            "summoner" => Some(Self::Summoner),
            "carry" => Some(Self::Carry),
            _ => None,
        }
    }
}

/// How a tower's shot travels to its target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AttackStyle {
    /// Damage lands instantly; only a brief trail is rendered.
    Hitscan,
    /// A simulated grenade flies toward the captured target point.
    Lobbed {
        /// Flight speed in tiles per second.
        speed: f32,
    },
}

/// Kinds of towers the player may construct.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TowerKind {
    /// Hit-scan rifle tower.
    Gunner,
    /// Hit-scan tower that also stuns its target.
    Frost,
    /// Lobbed-grenade tower dealing area damage only.
    Mortar,
}

/// Static per-kind stat tables for towers, indexed by upgrade level.
///
/// The cost table is shared between construction and upgrades: index 0 is
/// the build cost and index `level + 1` is the price of the next level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSpec {
    /// Construction and upgrade prices.
    pub cost: &'static [u32],
    /// Damage per shot (for splash towers, damage applied at detonation).
    pub damage: &'static [u32],
    /// Targeting radius in tiles.
    pub range: &'static [f32],
    /// Minimum time between shots.
    pub fire_interval: &'static [Duration],
    /// Stun applied to the target, if the kind stuns.
    pub stun: Option<&'static [Duration]>,
    /// Detonation radius in tiles, if the kind deals splash damage.
    pub splash_radius: Option<f32>,
    /// Shot delivery style.
    pub attack: AttackStyle,
}

const GUNNER_SPEC: TowerSpec = TowerSpec {
    cost: &[100, 80, 140],
    // One spare entry so the shortest table still caps the level.
    damage: &[25, 40, 65, 95],
    range: &[2.5, 3.0, 3.5],
    fire_interval: &[
        Duration::from_millis(600),
        Duration::from_millis(500),
        Duration::from_millis(380),
    ],
    stun: None,
    splash_radius: None,
    attack: AttackStyle::Hitscan,
};

const FROST_SPEC: TowerSpec = TowerSpec {
    cost: &[120, 90, 160],
    damage: &[10, 16, 24],
    range: &[2.2, 2.6, 3.0],
    fire_interval: &[
        Duration::from_millis(900),
        Duration::from_millis(800),
        Duration::from_millis(700),
    ],
    stun: Some(&[
        Duration::from_millis(600),
        Duration::from_millis(900),
        Duration::from_millis(1300),
    ]),
    splash_radius: None,
    attack: AttackStyle::Hitscan,
};

const MORTAR_SPEC: TowerSpec = TowerSpec {
    cost: &[150, 120, 200],
    damage: &[35, 55, 85],
    range: &[3.5, 4.0, 4.5],
    fire_interval: &[
        Duration::from_millis(1500),
        Duration::from_millis(1300),
        Duration::from_millis(1100),
    ],
    stun: None,
    splash_radius: Some(1.25),
    attack: AttackStyle::Lobbed { speed: 5.0 },
};

impl TowerSpec {
    /// Highest reachable upgrade level, derived from the shortest table.
    ///
    /// Clamping here keeps every per-level lookup in bounds even when one
    /// table carries spare entries.
    #[must_use]
    pub fn max_level(&self) -> usize {
        let mut shortest = self
            .damage
            .len()
            .min(self.range.len())
            .min(self.fire_interval.len());
        if let Some(stun) = self.stun {
            shortest = shortest.min(stun.len());
        }
        shortest.saturating_sub(1)
    }

    /// Damage dealt at the provided level.
    #[must_use]
    pub fn damage_at(&self, level: usize) -> u32 {
        self.damage[level.min(self.max_level())]
    }

    /// Targeting radius at the provided level.
    #[must_use]
    pub fn range_at(&self, level: usize) -> f32 {
        self.range[level.min(self.max_level())]
    }

    /// Shot interval at the provided level.
    #[must_use]
    pub fn fire_interval_at(&self, level: usize) -> Duration {
        self.fire_interval[level.min(self.max_level())]
    }

    /// Stun duration at the provided level, if the kind stuns.
    #[must_use]
    pub fn stun_at(&self, level: usize) -> Option<Duration> {
        self.stun.map(|table| table[level.min(self.max_level())])
    }

    /// Price of constructing the tower.
    #[must_use]
    pub fn build_cost(&self) -> u32 {
        self.cost[0]
    }

    /// Price of the next upgrade, or `None` at the level cap.
    #[must_use]
    pub fn upgrade_cost(&self, level: usize) -> Option<u32> {
        if level >= self.max_level() {
            return None;
        }
        self.cost.get(level + 1).copied()
    }
}

impl TowerKind {
    /// Static stat table for the kind.
    #[must_use]
    pub const fn spec(self) -> &'static TowerSpec {
        match self {
            Self::Gunner => &GUNNER_SPEC,
            Self::Frost => &FROST_SPEC,
            Self::Mortar => &MORTAR_SPEC,
        }
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock: zombie movement, timers, cooldowns.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Advances in-flight projectiles and resolves detonations.
    AdvanceProjectiles {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that a spawn point release a zombie into the level.
    SpawnZombie {
        /// Start tile responsible for the release.
        spawn_point: SpawnPointId,
        /// Kind of zombie to create.
        kind: ZombieKind,
    },
    /// Requests construction of a tower at the provided blocking-layer cell.
    BuildTower {
        /// Kind of tower to construct.
        kind: TowerKind,
        /// Cell the tower should occupy.
        cell: TileCoord,
    },
    /// Requests a one-level upgrade of an existing tower.
    UpgradeTower {
        /// Identifier of the tower to upgrade.
        tower: TowerId,
    },
    /// Requests that a tower fire at a specific zombie.
    FireAtZombie {
        /// Tower performing the shot.
        tower: TowerId,
        /// Zombie the shot is committed to.
        zombie: ZombieId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a zombie entered the level at a Start tile.
    ZombieSpawned {
        /// Identifier assigned to the zombie.
        zombie: ZombieId,
        /// Kind of zombie created.
        kind: ZombieKind,
        /// Tile the zombie occupies after spawning.
        cell: TileCoord,
        /// Exit the zombie committed to, if the Start knows any.
        goal: Option<GoalId>,
    },
    /// Confirms that a zombie was removed after its health reached zero.
    ZombieDied {
        /// Identifier of the removed zombie.
        zombie: ZombieId,
        /// Currency credited for the kill.
        reward: u32,
    },
    /// Confirms that a zombie was removed after reaching an exit.
    ZombieExited {
        /// Identifier of the removed zombie.
        zombie: ZombieId,
        /// Lives debited by the leak.
        lives_lost: u32,
    },
    /// Reports that a zombie entered a tile with no route to any exit.
    ZombieStuck {
        /// Identifier of the stranded zombie.
        zombie: ZombieId,
    },
    /// Announces that the defence ran out of lives.
    LivesExhausted,
    /// Confirms that a tower was constructed.
    TowerBuilt {
        /// Identifier assigned to the tower by the world.
        tower: TowerId,
        /// Kind of tower constructed.
        kind: TowerKind,
        /// Cell the tower occupies.
        cell: TileCoord,
    },
    /// Confirms that a tower advanced one upgrade level.
    TowerUpgraded {
        /// Identifier of the upgraded tower.
        tower: TowerId,
        /// Level the tower now holds.
        level: usize,
    },
    /// Reports that a construction request was rejected.
    BuildRejected {
        /// Kind of tower requested.
        kind: TowerKind,
        /// Cell provided in the request.
        cell: TileCoord,
        /// Specific reason the construction failed.
        reason: BuildError,
    },
    /// Reports that an upgrade request was rejected.
    UpgradeRejected {
        /// Identifier of the tower targeted by the request.
        tower: TowerId,
        /// Specific reason the upgrade failed.
        reason: UpgradeError,
    },
    /// Confirms that a tower fired at a zombie.
    TowerFired {
        /// Tower that fired.
        tower: TowerId,
        /// Zombie the shot committed to.
        zombie: ZombieId,
    },
    /// Reports that a grenade detonated and applied its area damage.
    GrenadeDetonated {
        /// Identifier of the detonated projectile.
        projectile: ProjectileId,
        /// Detonation point in tile space.
        position: TilePoint,
        /// Number of zombies caught in the blast.
        hits: u32,
    },
}

/// Reasons a tower construction request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildError {
    /// The requested cell lies beyond the grid bounds.
    OutOfBounds,
    /// The blocking layer does not allow construction at the cell.
    NotBuildable,
    /// Another tower already occupies the cell.
    Occupied,
    /// The player cannot afford the tower's build cost.
    InsufficientFunds,
}

/// Reasons a tower upgrade request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeError {
    /// No tower with the provided identifier exists.
    UnknownTower,
    /// The tower already sits at its level cap.
    MaxLevel,
    /// The player cannot afford the next level's cost.
    InsufficientFunds,
}

/// Pairing of a tower with the zombie it should fire at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TowerTarget {
    /// Tower that acquired the target.
    pub tower: TowerId,
    /// Zombie selected by the closest-to-exit rule.
    pub zombie: ZombieId,
}

/// Movement phase a zombie currently occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZombiePhase {
    /// Following its navigation entries toward the chosen exit.
    Traveling,
    /// Stranded on a tile with no route to any exit; still targetable.
    Stuck,
}

/// Immutable representation of a single zombie's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZombieSnapshot {
    /// Unique identifier assigned to the zombie.
    pub id: ZombieId,
    /// Kind of the zombie.
    pub kind: ZombieKind,
    /// Fractional position in tile space.
    pub position: TilePoint,
    /// Tile the zombie currently occupies.
    pub cell: TileCoord,
    /// Exit the zombie committed to at spawn, if any.
    pub goal: Option<GoalId>,
    /// Remaining health pool.
    pub health: Health,
    /// Health pool the zombie spawned with.
    pub max_health: Health,
    /// Remaining shield pool.
    pub shield: u32,
    /// Remaining stun time; positive means the zombie is inert.
    pub stunned_for: Duration,
    /// Hops remaining to the chosen exit, if the current tile knows a route.
    pub distance_to_exit: Option<u16>,
    /// Current movement phase.
    pub phase: ZombiePhase,
}

/// Read-only snapshot describing all zombies within the level.
#[derive(Clone, Debug, Default)]
pub struct ZombieView {
    snapshots: Vec<ZombieSnapshot>,
}

impl ZombieView {
    /// Creates a new zombie view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ZombieSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &ZombieSnapshot> {
        self.snapshots.iter()
    }

    /// Number of zombies captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view captured no zombies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ZombieSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Kind of tower constructed.
    pub kind: TowerKind,
    /// Cell the tower occupies.
    pub cell: TileCoord,
    /// Current upgrade level.
    pub level: usize,
    /// Time remaining until the tower may fire again.
    pub ready_in: Duration,
}

impl TowerSnapshot {
    /// Targeting radius at the tower's current level.
    #[must_use]
    pub fn range(&self) -> f32 {
        self.kind.spec().range_at(self.level)
    }

    /// Reports whether the cooldown has elapsed.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready_in.is_zero()
    }
}

/// Read-only snapshot describing all towers placed within the level.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up a snapshot by tower identifier.
    #[must_use]
    pub fn get(&self, tower: TowerId) -> Option<&TowerSnapshot> {
        self.snapshots
            .binary_search_by_key(&tower, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Render shape of an in-flight projectile or effect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ProjectileShape {
    /// Straight-line trail left by a hit-scan shot.
    Trail {
        /// Muzzle end of the trail.
        from: TilePoint,
        /// Impact end of the trail.
        to: TilePoint,
    },
    /// Grenade in flight toward its captured target point.
    Grenade {
        /// Current position in tile space.
        position: TilePoint,
    },
    /// Expanding detonation ring.
    Blast {
        /// Center of the ring.
        position: TilePoint,
        /// Current ring radius in tiles.
        radius: f32,
    },
}

/// Immutable representation of a single projectile used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Unique identifier assigned to the projectile.
    pub id: ProjectileId,
    /// Current render shape.
    pub shape: ProjectileShape,
}

/// Read-only snapshot describing all live projectiles.
#[derive(Clone, Debug, Default)]
pub struct ProjectileView {
    snapshots: Vec<ProjectileSnapshot>,
}

impl ProjectileView {
    /// Creates a new projectile view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ProjectileSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ProjectileSnapshot> {
        self.snapshots
    }
}

/// Wave progression exposed to the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaveProgress {
    /// Number of waves already called, counting the one in flight.
    pub current: u32,
    /// Total number of waves the level defines.
    pub total: u32,
}

/// Terminal verdict of a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The level is still running.
    Playing,
    /// Every wave drained and the board is clear of zombies.
    Won,
    /// The defence ran out of lives.
    Lost,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::de::DeserializeOwned;

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = TileCoord::new(1, 1);
        let destination = TileCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn tile_center_sits_at_half_offsets() {
        let center = TileCoord::new(2, 5).center();
        assert_eq!(center, TilePoint::new(2.5, 5.5));
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn tower_id_round_trips_through_bincode() {
        assert_round_trip(&TowerId::new(42));
    }

    #[test]
    fn kind_tags_round_trip_through_bincode() {
        assert_round_trip(&TowerKind::Mortar);
        assert_round_trip(&ZombieKind::Summoner);
        assert_round_trip(&TileKind::Grave);
    }

    #[test]
    fn rejection_reasons_round_trip_through_bincode() {
        assert_round_trip(&BuildError::InsufficientFunds);
        assert_round_trip(&UpgradeError::MaxLevel);
    }

    #[test]
    fn max_level_follows_shortest_table() {
        // Gunner carries a spare damage entry; range and interval cap it.
        assert_eq!(TowerKind::Gunner.spec().max_level(), 2);
        assert_eq!(TowerKind::Frost.spec().max_level(), 2);
        assert_eq!(TowerKind::Mortar.spec().max_level(), 2);
    }

    #[test]
    fn upgrade_cost_is_none_at_cap() {
        let spec = TowerKind::Gunner.spec();
        assert_eq!(spec.upgrade_cost(0), Some(80));
        assert_eq!(spec.upgrade_cost(1), Some(140));
        assert_eq!(spec.upgrade_cost(2), None);
    }

    #[test]
    fn stat_lookups_clamp_to_max_level() {
        let spec = TowerKind::Gunner.spec();
        assert_eq!(spec.damage_at(99), spec.damage_at(spec.max_level()));
        assert_eq!(spec.range_at(99), spec.range_at(spec.max_level()));
    }

    #[test]
    fn zombie_names_resolve_both_ways() {
        for kind in [
            ZombieKind::Zombie,
            ZombieKind::Fast,
            ZombieKind::Giant,
            ZombieKind::Baby,
            ZombieKind::Shield,
            ZombieKind::Summoner,
            ZombieKind::Carry,
        ] {
            assert_eq!(ZombieKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(ZombieKind::from_name("ghoul"), None);
    }

    #[test]
    fn multi_cell_footprints_match_kinds() {
        assert_eq!(TileKind::Grave.footprint(), (2, 2));
        assert_eq!(TileKind::House.footprint(), (4, 4));
        assert!(!TileKind::Road.is_multi_cell());
        assert!(TileKind::House.is_multi_cell());
    }

    #[test]
    fn only_road_and_start_are_walkable() {
        assert!(TileKind::Road.is_walkable());
        assert!(TileKind::Start.is_walkable());
        assert!(!TileKind::End.is_walkable());
        assert!(!TileKind::Grass.is_walkable());
    }

    #[test]
    fn health_fraction_handles_zero_max() {
        assert_eq!(Health::new(50).fraction_of(Health::new(100)), 0.5);
        assert_eq!(Health::new(50).fraction_of(Health::new(0)), 0.0);
    }

    #[test]
    fn color_grid_rejects_out_of_bounds_access() {
        let mut grid = ColorGrid::filled(2, 2, Rgb::new(0, 0, 0));
        grid.set(1, 1, Rgb::new(9, 9, 9));
        grid.set(5, 5, Rgb::new(1, 2, 3));
        assert_eq!(grid.get(1, 1), Some(Rgb::new(9, 9, 9)));
        assert_eq!(grid.get(5, 5), None);
    }

    #[test]
    fn views_sort_snapshots_by_identifier() {
        let view = TowerView::from_snapshots(vec![
            tower_snapshot(7),
            tower_snapshot(1),
            tower_snapshot(4),
        ]);
        let ids: Vec<u32> = view.iter().map(|snapshot| snapshot.id.get()).collect();
        assert_eq!(ids, vec![1, 4, 7]);
        assert!(view.get(TowerId::new(4)).is_some());
        assert!(view.get(TowerId::new(5)).is_none());
    }

    fn tower_snapshot(id: u32) -> TowerSnapshot {
        TowerSnapshot {
            id: TowerId::new(id),
            kind: TowerKind::Gunner,
            cell: TileCoord::new(0, 0),
            level: 0,
            ready_in: Duration::ZERO,
        }
    }
}
