//! Built-in demonstration level for the headless binary.
//!
//! In the shipped game these rasters come from level images on disk; the
//! binary paints an equivalent pair in memory so it runs without assets.

use zombie_defence_core::{ColorGrid, Rgb};

const WHITE: Rgb = Rgb::new(255, 255, 255);
const ROAD: Rgb = Rgb::new(0, 0, 0);
const START: Rgb = Rgb::new(0, 255, 0);
const END: Rgb = Rgb::new(255, 0, 0);
const GREENERY: Rgb = Rgb::new(34, 177, 76);
const GRAVE: Rgb = Rgb::new(127, 127, 127);
const BUILDABLE: Rgb = Rgb::new(0, 0, 255);

/// Waves for the demo level: three hand-authored lines of rising pressure.
pub const DEMO_WAVES: &str = r#"[["zombie", 4]]
[["zombie", 3, "fast", 3]]
[["shield", 2, "fast", 2, "giant", 1]]
"#;

/// Paints the demo map and blocking rasters.
///
/// A single corridor runs west to east across a 12x7 field with buildable
/// ground on both sides of the road.
#[must_use]
pub fn demo_level() -> (ColorGrid, ColorGrid) {
    let mut map = ColorGrid::filled(12, 7, GREENERY);
    let mut blocking = ColorGrid::filled(12, 7, WHITE);

    map.set(0, 3, START);
    for column in 1..11 {
        map.set(column, 3, ROAD);
    }
    map.set(11, 3, END);

    map.set(2, 5, GRAVE);

    for column in 1..11 {
        blocking.set(column, 2, BUILDABLE);
        blocking.set(column, 4, BUILDABLE);
    }

    (map, blocking)
}

#[cfg(test)]
mod tests {
    use super::*;
    use zombie_defence_world::{query, LevelConfig, World};

    #[test]
    fn demo_level_builds_a_connected_world() {
        let (map, blocking) = demo_level();
        let world =
            World::from_grids(&map, &blocking, LevelConfig::default()).expect("demo level builds");

        assert_eq!(query::spawn_points(&world).len(), 1);
        assert_eq!(query::goals(&world).len(), 1);

        let start = query::spawn_points(&world)[0];
        let goal = zombie_defence_core::GoalId::new(0);
        assert_eq!(query::distance_to_goal(&world, start, goal), Some(11));
    }
}
