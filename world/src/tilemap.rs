//! Raster decoding and tile arena construction.
//!
//! Levels arrive as two equal-dimension color grids. The map layer paints
//! the walkable and decorative tiles, the blocking layer paints where the
//! player may build. Exact RGB triples resolve through fixed tables; a key
//! may list several candidate kinds, in which case a seeded draw picks one
//! for decorative variety. Road, Start, and End keys are single-candidate
//! so the draw can never touch path topology.

use std::collections::BTreeMap;

use tracing::{debug, warn};
use zombie_defence_core::{BlockKind, ColorGrid, GoalId, Rgb, TileCoord, TileKind};

use crate::navigation::{self, NavEntry};

const MAP_COLOR_TABLE: &[(Rgb, &[TileKind])] = &[
    (Rgb::new(255, 255, 255), &[TileKind::NoTile]),
    (Rgb::new(0, 0, 0), &[TileKind::Road]),
    (Rgb::new(0, 255, 0), &[TileKind::Start]),
    (Rgb::new(255, 0, 0), &[TileKind::End]),
    (
        Rgb::new(34, 177, 76),
        &[TileKind::Grass, TileKind::Bush, TileKind::Rock],
    ),
    (Rgb::new(127, 127, 127), &[TileKind::Grave]),
    (Rgb::new(64, 64, 64), &[TileKind::House]),
];

const BLOCK_COLOR_TABLE: &[(Rgb, BlockKind)] = &[
    (Rgb::new(255, 255, 255), BlockKind::Open),
    (Rgb::new(0, 0, 255), BlockKind::Buildable),
    (Rgb::new(0, 0, 0), BlockKind::Obstructed),
];

/// Errors detected while decoding a level's rasters.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MapError {
    /// The two layers must share dimensions cell for cell.
    #[error("map layer is {map_width}x{map_height} but blocking layer is {blocking_width}x{blocking_height}")]
    MismatchedLayers {
        /// Columns in the map layer.
        map_width: u32,
        /// Rows in the map layer.
        map_height: u32,
        /// Columns in the blocking layer.
        blocking_width: u32,
        /// Rows in the blocking layer.
        blocking_height: u32,
    },
    /// A level without cells cannot be simulated.
    #[error("level raster is empty")]
    EmptyGrid,
}

/// Immutable tile storage built once at level load.
///
/// Tiles live in a dense row-major arena; navigation entries reference each
/// other by arena index, so multi-exit routes never form reference cycles.
#[derive(Clone, Debug)]
pub(crate) struct TileArena {
    width: u32,
    height: u32,
    kinds: Vec<TileKind>,
    anchors: Vec<bool>,
    nav: Vec<BTreeMap<GoalId, NavEntry>>,
    goals: Vec<TileCoord>,
    starts: Vec<TileCoord>,
}

impl TileArena {
    pub(crate) fn decode(grid: &ColorGrid, rng_state: &mut u64) -> Result<Self, MapError> {
        if grid.width() == 0 || grid.height() == 0 {
            return Err(MapError::EmptyGrid);
        }

        let width = grid.width();
        let height = grid.height();
        let mut kinds = Vec::with_capacity(width as usize * height as usize);

        for row in 0..height {
            for column in 0..width {
                let color = grid.get(column, row).unwrap_or(Rgb::new(255, 255, 255));
                kinds.push(decode_tile(color, column, row, rng_state));
            }
        }

        let anchors = normalize_multi_cell(&mut kinds, width, height);

        let mut goals = Vec::new();
        let mut starts = Vec::new();
        for (index, kind) in kinds.iter().enumerate() {
            let coord = TileCoord::new(index as u32 % width, index as u32 / width);
            match kind {
                TileKind::End => goals.push(coord),
                TileKind::Start => starts.push(coord),
                _ => {}
            }
        }

        let nav = navigation::link(&kinds, width, height, &goals);
        debug!(
            columns = width,
            rows = height,
            exits = goals.len(),
            spawn_points = starts.len(),
            "tile arena linked"
        );

        Ok(Self {
            width,
            height,
            kinds,
            anchors,
            nav,
            goals,
            starts,
        })
    }

    pub(crate) const fn width(&self) -> u32 {
        self.width
    }

    pub(crate) const fn height(&self) -> u32 {
        self.height
    }

    pub(crate) fn index(&self, cell: TileCoord) -> Option<usize> {
        if cell.column() < self.width && cell.row() < self.height {
            Some(cell.row() as usize * self.width as usize + cell.column() as usize)
        } else {
            None
        }
    }

    pub(crate) fn coord_of(&self, index: usize) -> TileCoord {
        TileCoord::new(
            (index % self.width as usize) as u32,
            (index / self.width as usize) as u32,
        )
    }

    pub(crate) fn kind_at(&self, index: usize) -> TileKind {
        self.kinds[index]
    }

    pub(crate) fn is_anchor(&self, index: usize) -> bool {
        self.anchors[index]
    }

    pub(crate) fn nav_entry(&self, index: usize, goal: GoalId) -> Option<NavEntry> {
        self.nav[index].get(&goal).copied()
    }

    pub(crate) fn known_goals(&self, index: usize) -> Vec<GoalId> {
        self.nav[index].keys().copied().collect()
    }

    pub(crate) fn goals(&self) -> &[TileCoord] {
        &self.goals
    }

    pub(crate) fn starts(&self) -> &[TileCoord] {
        &self.starts
    }
}

fn decode_tile(color: Rgb, column: u32, row: u32, rng_state: &mut u64) -> TileKind {
    for (key, candidates) in MAP_COLOR_TABLE {
        if *key != color {
            continue;
        }
        if candidates.len() == 1 {
            return candidates[0];
        }
        // Seeded draw; restricted to cosmetic variety by table construction.
        *rng_state = next_random(*rng_state);
        let index = (*rng_state % candidates.len() as u64) as usize;
        return candidates[index];
    }

    warn!(
        red = color.red(),
        green = color.green(),
        blue = color.blue(),
        column,
        row,
        "unknown map color, defaulting to NoTile"
    );
    TileKind::NoTile
}

/// Snaps multi-cell structures to a single anchored footprint.
///
/// Scanning row-major, the first uncovered cell of a multi-cell kind is its
/// top-left anchor; every cell of the footprint is overwritten to the same
/// kind so one sprite can span them. Returns the anchor flags.
fn normalize_multi_cell(kinds: &mut [TileKind], width: u32, height: u32) -> Vec<bool> {
    let mut anchors = vec![false; kinds.len()];
    let mut covered = vec![false; kinds.len()];

    for row in 0..height {
        for column in 0..width {
            let index = row as usize * width as usize + column as usize;
            if covered[index] {
                continue;
            }
            let kind = kinds[index];
            if !kind.is_multi_cell() {
                continue;
            }

            anchors[index] = true;
            let (footprint_width, footprint_height) = kind.footprint();
            for dy in 0..footprint_height {
                for dx in 0..footprint_width {
                    let cell_column = column + dx;
                    let cell_row = row + dy;
                    if cell_column >= width || cell_row >= height {
                        continue;
                    }
                    let cell_index = cell_row as usize * width as usize + cell_column as usize;
                    kinds[cell_index] = kind;
                    covered[cell_index] = true;
                }
            }
        }
    }

    anchors
}

pub(crate) fn decode_blocking(grid: &ColorGrid) -> Vec<BlockKind> {
    let mut blocks = Vec::with_capacity(grid.width() as usize * grid.height() as usize);
    for row in 0..grid.height() {
        for column in 0..grid.width() {
            let color = grid.get(column, row).unwrap_or(Rgb::new(255, 255, 255));
            blocks.push(decode_block(color, column, row));
        }
    }
    blocks
}

fn decode_block(color: Rgb, column: u32, row: u32) -> BlockKind {
    for (key, kind) in BLOCK_COLOR_TABLE {
        if *key == color {
            return *kind;
        }
    }

    warn!(
        red = color.red(),
        green = color.green(),
        blue = color.blue(),
        column,
        row,
        "unknown blocking color, defaulting to Open"
    );
    BlockKind::Open
}

pub(crate) fn next_random(state: u64) -> u64 {
    state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgb = Rgb::new(255, 255, 255);
    const ROAD: Rgb = Rgb::new(0, 0, 0);
    const START: Rgb = Rgb::new(0, 255, 0);
    const END: Rgb = Rgb::new(255, 0, 0);
    const GREENERY: Rgb = Rgb::new(34, 177, 76);
    const GRAVE: Rgb = Rgb::new(127, 127, 127);

    #[test]
    fn corridor_raster_decodes_and_links() {
        let mut grid = ColorGrid::filled(5, 1, ROAD);
        grid.set(0, 0, START);
        grid.set(4, 0, END);

        let mut rng = 7;
        let arena = TileArena::decode(&grid, &mut rng).expect("decode");

        assert_eq!(arena.starts(), &[TileCoord::new(0, 0)]);
        assert_eq!(arena.goals(), &[TileCoord::new(4, 0)]);
        let entry = arena
            .nav_entry(0, GoalId::new(0))
            .expect("start knows the exit");
        assert_eq!(entry.distance, 4);
    }

    #[test]
    fn unknown_colors_decode_to_no_tile() {
        let mut grid = ColorGrid::filled(2, 1, ROAD);
        grid.set(1, 0, Rgb::new(1, 2, 3));

        let mut rng = 7;
        let arena = TileArena::decode(&grid, &mut rng).expect("decode");
        assert_eq!(arena.kind_at(1), TileKind::NoTile);
    }

    #[test]
    fn ambiguous_keys_stay_cosmetic() {
        let grid = ColorGrid::filled(4, 4, GREENERY);
        let mut rng = 99;
        let arena = TileArena::decode(&grid, &mut rng).expect("decode");

        for index in 0..16 {
            assert!(matches!(
                arena.kind_at(index),
                TileKind::Grass | TileKind::Bush | TileKind::Rock
            ));
        }
        assert!(arena.goals().is_empty());
        assert!(arena.starts().is_empty());
    }

    #[test]
    fn cosmetic_draw_is_reproducible() {
        let grid = ColorGrid::filled(6, 6, GREENERY);
        let mut first_rng = 1234;
        let mut second_rng = 1234;
        let first = TileArena::decode(&grid, &mut first_rng).expect("decode");
        let second = TileArena::decode(&grid, &mut second_rng).expect("decode");
        assert_eq!(first.kinds, second.kinds);
    }

    #[test]
    fn grave_footprint_is_normalized_around_its_anchor() {
        let mut grid = ColorGrid::filled(4, 4, WHITE);
        grid.set(1, 1, GRAVE);

        let mut rng = 7;
        let arena = TileArena::decode(&grid, &mut rng).expect("decode");

        for (column, row) in [(1, 1), (2, 1), (1, 2), (2, 2)] {
            let index = arena.index(TileCoord::new(column, row)).expect("in bounds");
            assert_eq!(arena.kind_at(index), TileKind::Grave);
        }
        let anchor = arena.index(TileCoord::new(1, 1)).expect("in bounds");
        let spanned = arena.index(TileCoord::new(2, 2)).expect("in bounds");
        assert!(arena.is_anchor(anchor));
        assert!(!arena.is_anchor(spanned));
    }

    #[test]
    fn blocking_layer_decodes_kinds() {
        let mut grid = ColorGrid::filled(3, 1, WHITE);
        grid.set(1, 0, Rgb::new(0, 0, 255));
        grid.set(2, 0, ROAD);

        let blocks = decode_blocking(&grid);
        assert_eq!(
            blocks,
            vec![BlockKind::Open, BlockKind::Buildable, BlockKind::Obstructed]
        );
    }
}
