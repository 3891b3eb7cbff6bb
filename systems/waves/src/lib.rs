#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave controller: parses authored wave files and releases zombies on a
//! cadence.
//!
//! Wave files are line-oriented. Each line is one wave: a JSON array of
//! per-spawn-point arrays, each a flat sequence of name/count pairs, e.g.
//! `[["zombie", 3, "fast", 2], ["giant", 1]]`. Unknown names are a hard
//! load failure — authoring errors never reach the simulation.
//!
//! Releases drain per spawn point: the head of a pending queue leaves after
//! a full interval, or after half of one when it matches the previously
//! released kind. Same-kind zombies therefore clump while different kinds
//! stay a full interval apart.

use std::collections::VecDeque;
use std::time::Duration;

use serde_json::Value;
use zombie_defence_core::{Command, SpawnPointId, WaveProgress, ZombieKind};

const DEFAULT_RELEASE_INTERVAL: Duration = Duration::from_millis(1500);

/// Errors detected while parsing a wave file.
#[derive(Debug, thiserror::Error)]
pub enum WaveError {
    /// A line is not valid JSON.
    #[error("wave line {line}: {source}")]
    Json {
        /// One-based line number in the wave file.
        line: usize,
        /// Underlying JSON parse failure.
        #[source]
        source: serde_json::Error,
    },
    /// A line parses as JSON but not as a wave definition.
    #[error("wave line {line}: expected an array of [name, count, ...] groups")]
    MalformedWave {
        /// One-based line number in the wave file.
        line: usize,
    },
    /// A group references a name missing from the zombie table.
    #[error("wave line {line}: unknown zombie kind {name:?}")]
    UnknownZombieKind {
        /// One-based line number in the wave file.
        line: usize,
        /// Name that failed to resolve.
        name: String,
    },
    /// A wave addresses more spawn points than the map provides.
    #[error("wave line {line}: {groups} spawn groups but the map has {spawn_points} spawn points")]
    TooManySpawnGroups {
        /// One-based line number in the wave file.
        line: usize,
        /// Number of groups the wave declares.
        groups: usize,
        /// Number of Start tiles the map provides.
        spawn_points: usize,
    },
}

/// Configuration parameters for the wave controller.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    release_interval: Duration,
}

impl Config {
    /// Creates a new configuration with the provided release cadence.
    #[must_use]
    pub const fn new(release_interval: Duration) -> Self {
        Self { release_interval }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            release_interval: DEFAULT_RELEASE_INTERVAL,
        }
    }
}

#[derive(Clone, Debug)]
struct WaveDefinition {
    groups: Vec<Vec<(ZombieKind, u32)>>,
}

#[derive(Debug, Default)]
struct SpawnLane {
    pending: VecDeque<ZombieKind>,
    elapsed: Duration,
    last_released: Option<ZombieKind>,
}

/// Stateful system that owns the wave queue and per-spawn-point release
/// lanes.
#[derive(Debug)]
pub struct WaveController {
    queue: VecDeque<WaveDefinition>,
    lanes: Vec<SpawnLane>,
    called: u32,
    total: u32,
    release_interval: Duration,
}

impl WaveController {
    /// Parses a line-oriented wave file for a map with the provided number
    /// of spawn points.
    pub fn from_str(
        text: &str,
        spawn_points: usize,
        config: Config,
    ) -> Result<Self, WaveError> {
        let mut queue = VecDeque::new();

        for (index, raw_line) in text.lines().enumerate() {
            let line = index + 1;
            let trimmed = raw_line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let value: Value = serde_json::from_str(trimmed)
                .map_err(|source| WaveError::Json { line, source })?;
            let wave = parse_wave(&value, line)?;
            if wave.groups.len() > spawn_points {
                return Err(WaveError::TooManySpawnGroups {
                    line,
                    groups: wave.groups.len(),
                    spawn_points,
                });
            }
            queue.push_back(wave);
        }

        let total = queue.len() as u32;
        let mut lanes = Vec::with_capacity(spawn_points);
        lanes.resize_with(spawn_points, SpawnLane::default);

        Ok(Self {
            queue,
            lanes,
            called: 0,
            total,
            release_interval: config.release_interval,
        })
    }

    /// Moves the next wave into the per-spawn-point pending lanes.
    ///
    /// A no-op returning `false` when every wave has already been called.
    pub fn call_next(&mut self) -> bool {
        let Some(wave) = self.queue.pop_front() else {
            return false;
        };
        self.called += 1;

        for lane in &mut self.lanes {
            lane.last_released = None;
        }
        for (index, group) in wave.groups.iter().enumerate() {
            let lane = &mut self.lanes[index];
            for &(kind, count) in group {
                for _ in 0..count {
                    lane.pending.push_back(kind);
                }
            }
        }
        true
    }

    /// Accumulates elapsed time and emits the spawns that came due.
    pub fn update(&mut self, dt: Duration, out: &mut Vec<Command>) {
        if self.release_interval.is_zero() {
            return;
        }
        let half_interval = self.release_interval / 2;

        for (index, lane) in self.lanes.iter_mut().enumerate() {
            if lane.pending.is_empty() {
                lane.elapsed = Duration::ZERO;
                continue;
            }

            lane.elapsed = lane.elapsed.saturating_add(dt);

            loop {
                let Some(&head) = lane.pending.front() else {
                    break;
                };
                let threshold = if lane.last_released == Some(head) {
                    half_interval
                } else {
                    self.release_interval
                };
                if lane.elapsed < threshold {
                    break;
                }

                lane.elapsed -= threshold;
                let _ = lane.pending.pop_front();
                lane.last_released = Some(head);
                out.push(Command::SpawnZombie {
                    spawn_point: SpawnPointId::new(index as u32),
                    kind: head,
                });
            }
        }
    }

    /// Reports whether every wave has been called and every lane drained.
    ///
    /// Live zombies are the world's concern; the caller combines both checks
    /// before declaring victory.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.queue.is_empty() && self.lanes_idle()
    }

    /// Reports whether uncalled waves remain in the queue.
    #[must_use]
    pub fn has_queued_waves(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Reports whether every spawn point finished releasing its group.
    #[must_use]
    pub fn lanes_idle(&self) -> bool {
        self.lanes.iter().all(|lane| lane.pending.is_empty())
    }

    /// Wave progression for the presentation layer.
    #[must_use]
    pub fn progress(&self) -> WaveProgress {
        WaveProgress {
            current: self.called,
            total: self.total,
        }
    }
}

fn parse_wave(value: &Value, line: usize) -> Result<WaveDefinition, WaveError> {
    let Value::Array(groups) = value else {
        return Err(WaveError::MalformedWave { line });
    };

    let mut wave_groups = Vec::with_capacity(groups.len());
    for group in groups {
        let Value::Array(items) = group else {
            return Err(WaveError::MalformedWave { line });
        };
        if items.len() % 2 != 0 {
            return Err(WaveError::MalformedWave { line });
        }

        let mut entries = Vec::with_capacity(items.len() / 2);
        for pair in items.chunks_exact(2) {
            let Value::String(name) = &pair[0] else {
                return Err(WaveError::MalformedWave { line });
            };
            let Some(count) = pair[1].as_u64() else {
                return Err(WaveError::MalformedWave { line });
            };
            let Some(kind) = ZombieKind::from_name(name) else {
                return Err(WaveError::UnknownZombieKind {
                    line,
                    name: name.clone(),
                });
            };
            entries.push((kind, count as u32));
        }
        wave_groups.push(entries);
    }

    Ok(WaveDefinition {
        groups: wave_groups,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_interval_configuration_releases_nothing() {
        let mut controller =
            WaveController::from_str(r#"[["zombie", 1]]"#, 1, Config::new(Duration::ZERO))
                .expect("parse");
        assert!(controller.call_next());

        let mut out = Vec::new();
        controller.update(Duration::from_secs(10), &mut out);
        assert!(out.is_empty());
    }
}
