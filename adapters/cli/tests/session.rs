//! End-to-end session scenarios over the full system stack.

use std::time::Duration;

use zombie_defence_cli::config::SessionConfig;
use zombie_defence_cli::session::{PlayerAction, Session};
use zombie_defence_core::{
    ColorGrid, Event, Outcome, Rgb, TileCoord, TowerKind,
};
use zombie_defence_world::query;

const WHITE: Rgb = Rgb::new(255, 255, 255);
const ROAD: Rgb = Rgb::new(0, 0, 0);
const START: Rgb = Rgb::new(0, 255, 0);
const END: Rgb = Rgb::new(255, 0, 0);
const BUILDABLE: Rgb = Rgb::new(0, 0, 255);

const TICK: Duration = Duration::from_millis(100);

/// Two-row level: row 0 buildable ground, row 1 the corridor `S...E` with
/// the given number of Road tiles between Start and End.
fn corridor_session(road_tiles: u32, waves_text: &str, config: &SessionConfig) -> Session {
    let length = road_tiles + 2;
    let mut map = ColorGrid::filled(length, 2, WHITE);
    let mut blocking = ColorGrid::filled(length, 2, WHITE);
    map.set(0, 1, START);
    for column in 1..=road_tiles {
        map.set(column, 1, ROAD);
    }
    map.set(length - 1, 1, END);
    for column in 0..length {
        blocking.set(column, 0, BUILDABLE);
    }
    Session::new(&map, &blocking, waves_text, config).expect("session builds")
}

fn run_until_resolved(session: &mut Session, budget: Duration) -> Duration {
    let mut elapsed = Duration::ZERO;
    while elapsed < budget {
        let _ = session.tick(TICK, &[]);
        elapsed += TICK;
        if session.outcome() != Outcome::Playing {
            break;
        }
    }
    elapsed
}

#[test]
fn undefended_corridor_leaks_three_lives_and_is_won_after_drain() {
    let config = SessionConfig {
        starting_lives: 10,
        release_interval_ms: 1000,
        ..SessionConfig::default()
    };
    let mut session = corridor_session(4, "[[\"zombie\", 3]]\n", &config);
    let starting_currency = session.hud().currency;

    let _ = session.tick(TICK, &[PlayerAction::CallNextWave]);
    let _ = run_until_resolved(&mut session, Duration::from_secs(20));

    assert_eq!(session.outcome(), Outcome::Won);
    let hud = session.hud();
    assert_eq!(hud.lives, 7);
    assert_eq!(hud.currency, starting_currency);
    assert_eq!(hud.wave.current, 1);
    assert_eq!(hud.wave.total, 1);
    assert_eq!(query::zombie_count(session.world()), 0);
}

#[test]
fn three_leaks_against_three_lives_lose_the_level() {
    let config = SessionConfig {
        starting_lives: 3,
        release_interval_ms: 1000,
        ..SessionConfig::default()
    };
    let mut session = corridor_session(4, "[[\"zombie\", 3]]\n", &config);

    let _ = session.tick(TICK, &[PlayerAction::CallNextWave]);
    let _ = run_until_resolved(&mut session, Duration::from_secs(20));

    assert_eq!(session.outcome(), Outcome::Lost);
    assert_eq!(session.hud().lives, 0);
}

#[test]
fn victory_waits_for_the_board_to_clear() {
    let config = SessionConfig {
        release_interval_ms: 1000,
        ..SessionConfig::default()
    };
    // A single zombie on a long corridor: the controller exhausts well
    // before the zombie leaves the board.
    let mut session = corridor_session(10, "[[\"zombie\", 1]]\n", &config);
    let _ = session.tick(TICK, &[PlayerAction::CallNextWave]);

    let mut saw_exhausted_while_playing = false;
    for _ in 0..300 {
        let _ = session.tick(TICK, &[]);
        if session.waves().is_exhausted()
            && query::zombie_count(session.world()) > 0
        {
            assert_eq!(session.outcome(), Outcome::Playing);
            saw_exhausted_while_playing = true;
        }
        if session.outcome() != Outcome::Playing {
            break;
        }
    }

    assert!(saw_exhausted_while_playing);
    assert_eq!(session.outcome(), Outcome::Won);
}

#[test]
fn build_at_exact_cost_succeeds_and_below_cost_is_rejected() {
    let cost = TowerKind::Gunner.spec().build_cost();

    let config = SessionConfig {
        starting_currency: cost,
        ..SessionConfig::default()
    };
    let mut session = corridor_session(4, "[[\"zombie\", 1]]\n", &config);
    let build = PlayerAction::Build {
        kind: TowerKind::Gunner,
        cell: TileCoord::new(2, 0),
    };
    let _ = session.tick(TICK, &[build]);
    assert_eq!(session.hud().currency, 0);
    assert!(query::tower_at(session.world(), TileCoord::new(2, 0)).is_some());

    let config = SessionConfig {
        starting_currency: cost - 1,
        ..SessionConfig::default()
    };
    let mut session = corridor_session(4, "[[\"zombie\", 1]]\n", &config);
    let _ = session.tick(TICK, &[build]);
    assert_eq!(session.hud().currency, cost - 1);
    assert!(query::tower_at(session.world(), TileCoord::new(2, 0)).is_none());
}

#[test]
fn towers_never_fire_twice_within_their_interval() {
    let config = SessionConfig {
        starting_currency: 500,
        release_interval_ms: 1000,
        ..SessionConfig::default()
    };
    // Giants soak shots for the whole crossing without dying.
    let mut session = corridor_session(18, "[[\"giant\", 2]]\n", &config);
    let opening = [
        PlayerAction::Build {
            kind: TowerKind::Gunner,
            cell: TileCoord::new(3, 0),
        },
        PlayerAction::CallNextWave,
    ];
    let _ = session.tick(TICK, &opening);

    let tick = Duration::from_millis(50);
    let mut elapsed = Duration::ZERO;
    let mut fire_times = Vec::new();
    for _ in 0..600 {
        let events = session.tick(tick, &[]).to_vec();
        elapsed += tick;
        if events
            .iter()
            .any(|event| matches!(event, Event::TowerFired { .. }))
        {
            fire_times.push(elapsed);
        }
    }

    assert!(fire_times.len() >= 2, "tower should fire repeatedly");
    let interval = TowerKind::Gunner.spec().fire_interval_at(0);
    for pair in fire_times.windows(2) {
        assert!(pair[1] - pair[0] >= interval);
    }
}

#[test]
fn pausing_freezes_the_clock_but_not_the_build_menu() {
    let config = SessionConfig::default();
    let mut session = corridor_session(6, "[[\"zombie\", 1]]\n", &config);
    let _ = session.tick(TICK, &[PlayerAction::CallNextWave]);

    // Let the first zombie release and walk a little.
    for _ in 0..20 {
        let _ = session.tick(TICK, &[]);
    }
    assert_eq!(query::zombie_count(session.world()), 1);
    let before = query::zombie_view(session.world())
        .iter()
        .next()
        .expect("zombie on board")
        .position;

    let _ = session.tick(TICK, &[PlayerAction::Pause]);
    for _ in 0..10 {
        let events = session.tick(TICK, &[]);
        assert!(events.is_empty(), "paused ticks broadcast nothing");
    }
    let during = query::zombie_view(session.world())
        .iter()
        .next()
        .expect("zombie on board")
        .position;
    assert_eq!(during, before);

    // Building still works while paused.
    let _ = session.tick(
        TICK,
        &[PlayerAction::Build {
            kind: TowerKind::Gunner,
            cell: TileCoord::new(2, 0),
        }],
    );
    assert!(query::tower_at(session.world(), TileCoord::new(2, 0)).is_some());

    let _ = session.tick(TICK, &[PlayerAction::Resume]);
    for _ in 0..5 {
        let _ = session.tick(TICK, &[]);
    }
    let after = query::zombie_view(session.world())
        .iter()
        .next()
        .expect("zombie on board")
        .position;
    assert_ne!(after, before);
}

#[test]
fn defended_corridor_earns_rewards_instead_of_leaking() {
    let config = SessionConfig {
        starting_currency: 400,
        starting_lives: 5,
        release_interval_ms: 1000,
        ..SessionConfig::default()
    };
    let mut session = corridor_session(10, "[[\"zombie\", 2]]\n", &config);
    let opening = [
        PlayerAction::Build {
            kind: TowerKind::Gunner,
            cell: TileCoord::new(3, 0),
        },
        PlayerAction::Build {
            kind: TowerKind::Gunner,
            cell: TileCoord::new(6, 0),
        },
        PlayerAction::CallNextWave,
    ];
    let _ = session.tick(TICK, &opening);
    let after_build = session.hud().currency;

    let _ = run_until_resolved(&mut session, Duration::from_secs(40));

    assert_eq!(session.outcome(), Outcome::Won);
    let hud = session.hud();
    assert_eq!(hud.lives, 5, "no zombie should leak past two gunners");
    let reward = zombie_defence_core::ZombieKind::Zombie.spec().reward;
    assert_eq!(hud.currency, after_build + 2 * reward);
}
