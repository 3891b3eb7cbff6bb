//! Integration tests for wave parsing and release cadence.

use std::time::Duration;

use zombie_defence_core::{Command, SpawnPointId, ZombieKind};
use zombie_defence_system_waves::{Config, WaveController, WaveError};

const INTERVAL: Duration = Duration::from_millis(1000);

fn controller(text: &str, spawn_points: usize) -> WaveController {
    WaveController::from_str(text, spawn_points, Config::new(INTERVAL)).expect("wave file parses")
}

fn released(out: &[Command]) -> Vec<(u32, ZombieKind)> {
    out.iter()
        .map(|command| match command {
            Command::SpawnZombie { spawn_point, kind } => (spawn_point.get(), *kind),
            other => panic!("unexpected command {other:?}"),
        })
        .collect()
}

#[test]
fn parses_waves_and_tracks_progress() {
    let text = "[[\"zombie\", 3]]\n\n[[\"fast\", 2], [\"giant\", 1]]\n";
    let mut controller = controller(text, 2);

    assert_eq!(controller.progress().current, 0);
    assert_eq!(controller.progress().total, 2);

    assert!(controller.call_next());
    assert_eq!(controller.progress().current, 1);
    assert!(controller.call_next());
    assert!(!controller.call_next(), "queue drained");
    assert_eq!(controller.progress().current, 2);
}

#[test]
fn unknown_kind_names_fail_the_load() {
    let error = WaveController::from_str(r#"[["ghoul", 2]]"#, 1, Config::default())
        .expect_err("unknown name must fail");
    assert!(matches!(
        error,
        WaveError::UnknownZombieKind { line: 1, ref name } if name == "ghoul"
    ));
}

#[test]
fn invalid_json_reports_the_line() {
    let error = WaveController::from_str("[[\"zombie\", 1]]\nnot json\n", 1, Config::default())
        .expect_err("bad json must fail");
    assert!(matches!(error, WaveError::Json { line: 2, .. }));
}

#[test]
fn odd_length_groups_are_malformed() {
    let error = WaveController::from_str(r#"[["zombie", 1, "fast"]]"#, 1, Config::default())
        .expect_err("odd pair must fail");
    assert!(matches!(error, WaveError::MalformedWave { line: 1 }));
}

#[test]
fn more_groups_than_spawn_points_fail_the_load() {
    let error = WaveController::from_str(r#"[["zombie", 1], ["fast", 1]]"#, 1, Config::default())
        .expect_err("excess groups must fail");
    assert!(matches!(
        error,
        WaveError::TooManySpawnGroups {
            line: 1,
            groups: 2,
            spawn_points: 1,
        }
    ));
}

#[test]
fn same_kind_releases_half_an_interval_apart() {
    let mut controller = controller(r#"[["zombie", 2]]"#, 1);
    assert!(controller.call_next());
    let mut out = Vec::new();

    // Nothing before the full interval.
    controller.update(Duration::from_millis(900), &mut out);
    assert!(out.is_empty());
    controller.update(Duration::from_millis(100), &mut out);
    assert_eq!(released(&out), vec![(0, ZombieKind::Zombie)]);

    // The matching head may follow after only half an interval.
    out.clear();
    controller.update(Duration::from_millis(400), &mut out);
    assert!(out.is_empty());
    controller.update(Duration::from_millis(100), &mut out);
    assert_eq!(released(&out), vec![(0, ZombieKind::Zombie)]);
    assert!(controller.is_exhausted());
}

#[test]
fn different_kinds_never_release_closer_than_a_full_interval() {
    let mut controller = controller(r#"[["zombie", 1, "fast", 1]]"#, 1);
    assert!(controller.call_next());
    let mut out = Vec::new();

    controller.update(INTERVAL, &mut out);
    assert_eq!(released(&out), vec![(0, ZombieKind::Zombie)]);

    // Half an interval is not enough for a different kind.
    out.clear();
    controller.update(Duration::from_millis(500), &mut out);
    assert!(out.is_empty());
    controller.update(Duration::from_millis(500), &mut out);
    assert_eq!(released(&out), vec![(0, ZombieKind::Fast)]);
}

#[test]
fn groups_drain_through_their_own_spawn_points() {
    let mut controller = controller(r#"[["zombie", 1], ["giant", 1]]"#, 2);
    assert!(controller.call_next());
    let mut out = Vec::new();

    controller.update(INTERVAL, &mut out);
    let mut releases = released(&out);
    releases.sort();
    assert_eq!(
        releases,
        vec![(0, ZombieKind::Zombie), (1, ZombieKind::Giant)]
    );
}

#[test]
fn burst_rule_resets_between_waves() {
    let text = "[[\"zombie\", 1]]\n[[\"zombie\", 1]]\n";
    let mut controller = controller(text, 1);
    assert!(controller.call_next());
    let mut out = Vec::new();
    controller.update(INTERVAL, &mut out);
    assert_eq!(out.len(), 1);

    // The marker resets on call_next, so the next wave's zombie needs the
    // full interval even though the kind matches.
    assert!(controller.call_next());
    out.clear();
    controller.update(Duration::from_millis(500), &mut out);
    assert!(out.is_empty());
    controller.update(Duration::from_millis(500), &mut out);
    assert_eq!(out.len(), 1);
}

#[test]
fn exhaustion_requires_empty_queue_and_lanes() {
    let mut controller = controller(r#"[["zombie", 1]]"#, 1);
    assert!(!controller.is_exhausted(), "wave still queued");

    assert!(controller.call_next());
    assert!(!controller.is_exhausted(), "lane still pending");

    let mut out = Vec::new();
    controller.update(INTERVAL, &mut out);
    assert_eq!(out.len(), 1);
    assert!(controller.is_exhausted());
}

#[test]
fn spawn_point_ids_match_group_order() {
    let mut controller = controller(r#"[[], ["fast", 1]]"#, 2);
    assert!(controller.call_next());
    let mut out = Vec::new();
    controller.update(INTERVAL, &mut out);
    assert_eq!(released(&out), vec![(1, ZombieKind::Fast)]);
    assert_eq!(
        out[0],
        Command::SpawnZombie {
            spawn_point: SpawnPointId::new(1),
            kind: ZombieKind::Fast,
        }
    );
}
