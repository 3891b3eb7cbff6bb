//! Integration tests for the builder system.

use zombie_defence_core::{Command, TileCoord, TowerId, TowerKind};
use zombie_defence_system_builder::{Builder, BuilderInput, PlacementPreview};

#[test]
fn placeable_previews_become_build_commands() {
    let builder = Builder::new();
    let cell = TileCoord::new(3, 1);
    let input = BuilderInput {
        build: Some((TowerKind::Gunner, cell)),
        upgrade: None,
    };
    let mut out = Vec::new();

    builder.handle(input, 500, |_| true, &mut out);

    assert_eq!(
        out,
        vec![Command::BuildTower {
            kind: TowerKind::Gunner,
            cell,
        }]
    );
}

#[test]
fn unaffordable_builds_are_filtered() {
    let builder = Builder::new();
    let cost = TowerKind::Mortar.spec().build_cost();
    let input = BuilderInput {
        build: Some((TowerKind::Mortar, TileCoord::new(0, 0))),
        upgrade: None,
    };
    let mut out = Vec::new();

    builder.handle(input, cost - 1, |_| true, &mut out);

    assert!(out.is_empty());
}

#[test]
fn unbuildable_cells_are_filtered() {
    let builder = Builder::new();
    let input = BuilderInput {
        build: Some((TowerKind::Gunner, TileCoord::new(2, 2))),
        upgrade: None,
    };
    let mut out = Vec::new();

    builder.handle(input, 1_000, |_| false, &mut out);

    assert!(out.is_empty());
}

#[test]
fn upgrades_pass_through_for_world_validation() {
    let builder = Builder::new();
    let input = BuilderInput {
        build: None,
        upgrade: Some(TowerId::new(7)),
    };
    let mut out = Vec::new();

    builder.handle(input, 0, |_| true, &mut out);

    assert_eq!(
        out,
        vec![Command::UpgradeTower {
            tower: TowerId::new(7),
        }]
    );
}

#[test]
fn preview_reports_both_gates() {
    let cell = TileCoord::new(1, 1);
    let cost = TowerKind::Frost.spec().build_cost();

    let preview = PlacementPreview::evaluate(TowerKind::Frost, cell, cost, |_| true);
    assert!(preview.placeable());

    let broke = PlacementPreview::evaluate(TowerKind::Frost, cell, cost - 1, |_| true);
    assert!(broke.buildable && !broke.affordable && !broke.placeable());

    let blocked = PlacementPreview::evaluate(TowerKind::Frost, cell, cost, |_| false);
    assert!(!blocked.buildable && blocked.affordable && !blocked.placeable());
}
