//! Transient projectile and detonation effect simulation.

use std::time::Duration;

use zombie_defence_core::{ProjectileId, ProjectileShape, ProjectileSnapshot, TilePoint};

/// How long a hit-scan trail stays visible.
const TRAIL_LIFETIME: Duration = Duration::from_millis(100);
/// Visual blast ring growth rate in tiles per second.
const BLAST_EXPANSION: f32 = 6.0;
/// Radius at which the blast ring finishes, in tiles.
const BLAST_MAX_RADIUS: f32 = 1.5;

#[derive(Clone, Copy, Debug)]
enum Body {
    Trail {
        from: TilePoint,
        to: TilePoint,
        remaining: Duration,
    },
    Grenade {
        position: TilePoint,
        velocity: (f32, f32),
        target: TilePoint,
        prev_distance: f32,
        damage: u32,
        radius: f32,
    },
    Blast {
        position: TilePoint,
        radius: f32,
    },
}

#[derive(Clone, Copy, Debug)]
struct Projectile {
    id: ProjectileId,
    body: Body,
}

/// A grenade that passed its closest approach this tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Detonation {
    pub(crate) projectile: ProjectileId,
    pub(crate) position: TilePoint,
    pub(crate) damage: u32,
    pub(crate) radius: f32,
}

/// Owner of every live projectile and effect in a level.
#[derive(Debug, Default)]
pub(crate) struct ProjectileSet {
    entries: Vec<Projectile>,
    next_id: u32,
}

impl ProjectileSet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn spawn_trail(&mut self, from: TilePoint, to: TilePoint) {
        let id = self.allocate();
        self.entries.push(Projectile {
            id,
            body: Body::Trail {
                from,
                to,
                remaining: TRAIL_LIFETIME,
            },
        });
    }

    /// Launches a grenade toward a captured target point.
    ///
    /// Returns `None` on success, or the immediate detonation when the
    /// target coincides with the muzzle and no flight is possible.
    pub(crate) fn spawn_grenade(
        &mut self,
        from: TilePoint,
        target: TilePoint,
        speed: f32,
        damage: u32,
        radius: f32,
    ) -> Option<Detonation> {
        let id = self.allocate();
        let distance = from.distance_to(target);
        if distance <= f32::EPSILON {
            return Some(Detonation {
                projectile: id,
                position: from,
                damage,
                radius,
            });
        }

        let velocity = (
            (target.x() - from.x()) / distance * speed,
            (target.y() - from.y()) / distance * speed,
        );
        self.entries.push(Projectile {
            id,
            body: Body::Grenade {
                position: from,
                velocity,
                target,
                prev_distance: f32::MAX,
                damage,
                radius,
            },
        });
        None
    }

    pub(crate) fn spawn_blast(&mut self, position: TilePoint) {
        let id = self.allocate();
        self.entries.push(Projectile {
            id,
            body: Body::Blast {
                position,
                radius: 0.0,
            },
        });
    }

    /// Advances every projectile, dropping the expired ones and returning
    /// the grenades that detonated this tick.
    pub(crate) fn advance(&mut self, dt: Duration) -> Vec<Detonation> {
        let dt_secs = dt.as_secs_f32();
        let mut detonations = Vec::new();

        self.entries.retain_mut(|projectile| match &mut projectile.body {
            Body::Trail { remaining, .. } => {
                *remaining = remaining.saturating_sub(dt);
                !remaining.is_zero()
            }
            Body::Grenade {
                position,
                velocity,
                target,
                prev_distance,
                damage,
                radius,
            } => {
                *position = TilePoint::new(
                    position.x() + velocity.0 * dt_secs,
                    position.y() + velocity.1 * dt_secs,
                );
                let distance = position.distance_to(*target);
                // A growing distance means the grenade passed its target;
                // this holds even when one frame overshoots the point.
                if distance > *prev_distance {
                    detonations.push(Detonation {
                        projectile: projectile.id,
                        position: *position,
                        damage: *damage,
                        radius: *radius,
                    });
                    false
                } else {
                    *prev_distance = distance;
                    true
                }
            }
            Body::Blast { radius, .. } => {
                *radius += BLAST_EXPANSION * dt_secs;
                *radius <= BLAST_MAX_RADIUS
            }
        });

        detonations
    }

    pub(crate) fn snapshots(&self) -> Vec<ProjectileSnapshot> {
        self.entries
            .iter()
            .map(|projectile| ProjectileSnapshot {
                id: projectile.id,
                shape: match projectile.body {
                    Body::Trail { from, to, .. } => ProjectileShape::Trail { from, to },
                    Body::Grenade { position, .. } => ProjectileShape::Grenade { position },
                    Body::Blast { position, radius } => {
                        ProjectileShape::Blast { position, radius }
                    }
                },
            })
            .collect()
    }

    fn allocate(&mut self) -> ProjectileId {
        let id = ProjectileId::new(self.next_id);
        self.next_id += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trails_expire_after_their_lifetime() {
        let mut set = ProjectileSet::new();
        set.spawn_trail(TilePoint::new(0.0, 0.0), TilePoint::new(1.0, 0.0));

        assert!(set.advance(Duration::from_millis(50)).is_empty());
        assert_eq!(set.snapshots().len(), 1);
        assert!(set.advance(Duration::from_millis(60)).is_empty());
        assert!(set.snapshots().is_empty());
    }

    #[test]
    fn grenades_detonate_past_closest_approach() {
        let mut set = ProjectileSet::new();
        let launch = set.spawn_grenade(
            TilePoint::new(0.5, 0.5),
            TilePoint::new(2.5, 0.5),
            5.0,
            40,
            1.25,
        );
        assert!(launch.is_none());

        // 0.4s per step covers two tiles in one step; the second step
        // carries it past the target and must detonate.
        assert!(set.advance(Duration::from_millis(400)).is_empty());
        let detonations = set.advance(Duration::from_millis(400));
        assert_eq!(detonations.len(), 1);
        assert_eq!(detonations[0].damage, 40);
        assert!(detonations[0].position.x() > 2.5);
    }

    #[test]
    fn degenerate_grenade_detonates_at_the_muzzle() {
        let mut set = ProjectileSet::new();
        let point = TilePoint::new(1.5, 1.5);
        let detonation = set
            .spawn_grenade(point, point, 5.0, 25, 1.0)
            .expect("zero-length flight resolves immediately");
        assert_eq!(detonation.position, point);
        assert!(set.snapshots().is_empty());
    }

    #[test]
    fn blast_rings_expand_then_vanish() {
        let mut set = ProjectileSet::new();
        set.spawn_blast(TilePoint::new(3.0, 3.0));

        assert!(set.advance(Duration::from_millis(100)).is_empty());
        let snapshots = set.snapshots();
        assert_eq!(snapshots.len(), 1);
        match snapshots[0].shape {
            ProjectileShape::Blast { radius, .. } => {
                assert!((radius - 0.6).abs() < 1e-3);
            }
            _ => panic!("expected a blast"),
        }

        assert!(set.advance(Duration::from_millis(200)).is_empty());
        assert!(set.snapshots().is_empty());
    }
}
