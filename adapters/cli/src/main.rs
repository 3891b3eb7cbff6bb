#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a Zombie Defence session headlessly.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;
use tracing_subscriber::EnvFilter;
use zombie_defence_cli::config::SessionConfig;
use zombie_defence_cli::demo;
use zombie_defence_cli::session::{PlayerAction, Session};
use zombie_defence_core::{Outcome, TileCoord, TowerKind};

const TICK: Duration = Duration::from_millis(16);

#[derive(Parser)]
#[command(author, version, about = "Zombie Defence headless session", long_about = None)]
struct Args {
    /// Wave file to run; the built-in demo waves play otherwise.
    #[arg(long)]
    waves: Option<PathBuf>,

    /// TOML session configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// World seed; a fresh one is drawn when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Simulated seconds to run before giving up.
    #[arg(long, default_value_t = 180)]
    limit_secs: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            SessionConfig::from_toml(&text)?
        }
        None => SessionConfig::default(),
    };
    config.rng_seed = match args.seed {
        Some(seed) => seed,
        None => ChaCha8Rng::from_entropy().gen(),
    };

    let waves_text = match &args.waves {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read wave file {}", path.display()))?,
        None => demo::DEMO_WAVES.to_string(),
    };

    let (map, blocking) = demo::demo_level();
    let mut session = Session::new(&map, &blocking, &waves_text, &config)
        .context("failed to start the session")?;
    info!(seed = config.rng_seed, "session ready");

    // Scripted opening: flank the corridor, then call the first wave.
    let opening = [
        PlayerAction::Build {
            kind: TowerKind::Gunner,
            cell: TileCoord::new(3, 2),
        },
        PlayerAction::Build {
            kind: TowerKind::Frost,
            cell: TileCoord::new(6, 4),
        },
        PlayerAction::CallNextWave,
    ];
    let _ = session.tick(TICK, &opening);

    let mut elapsed = Duration::ZERO;
    let limit = Duration::from_secs(args.limit_secs);
    while elapsed < limit {
        // Call the next wave as soon as the spawn lanes drain.
        let actions: &[PlayerAction] =
            if session.waves().lanes_idle() && session.waves().has_queued_waves() {
                &[PlayerAction::CallNextWave]
            } else {
                &[]
            };
        let _ = session.tick(TICK, actions);
        elapsed += TICK;

        if session.outcome() != Outcome::Playing {
            break;
        }
    }

    let hud = session.hud();
    let verdict = match session.outcome() {
        Outcome::Won => "won",
        Outcome::Lost => "lost",
        Outcome::Playing => "unresolved",
    };
    println!(
        "{verdict} after {:.1}s: wave {}/{}, {} lives, {} currency",
        elapsed.as_secs_f32(),
        hud.wave.current,
        hud.wave.total,
        hud.lives,
        hud.currency
    );
    Ok(())
}
