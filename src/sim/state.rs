//! Simulation context and observable state
//!
//! The `Simulation` owns the pool, boundary policy, scheduler, RNG and
//! counters. Nothing outside it mutates pool bookkeeping.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::boundary::BoundaryPolicy;
use super::body::PhysicsBody;
use super::collision::{CollisionEvent, CollisionResolver};
use super::pool::{EntityPool, Handle, NoopObserver, PoolExhausted, PoolObserver};
use super::rng::SeededRng;
use super::spawn::{SpawnOutcome, SpawnScheduler};
use crate::config::{ConfigError, SimConfig};

/// Named counters exposed for observability and tests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    pub active_count: usize,
    pub spawned_count: u64,
    /// Bodies released by DestroyOnExit
    pub recycled_count: u64,
    pub collision_count: u64,
    /// Axis crossings under WrapAround (a diagonal exit counts twice)
    pub wrap_count: u64,
    /// Spawns dropped because the pool was full
    pub dropped_spawns: u64,
    pub ticks: u64,
}

/// Read-only view of one active body, as handed to a renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyView {
    pub handle: Handle,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub rotation: f32,
    pub active: bool,
}

/// Serializable per-tick report (counters + bodies)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub seed: u64,
    pub counters: Counters,
    pub bodies: Vec<BodyView>,
}

/// Why a release was queued
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ReleaseCause {
    Boundary,
    External,
}

#[derive(Debug)]
pub struct Simulation {
    config: SimConfig,
    pub(super) pool: EntityPool,
    pub(super) policy: BoundaryPolicy,
    pub(super) resolver: CollisionResolver,
    pub(super) scheduler: SpawnScheduler,
    pub(super) rng: SeededRng,
    pub(super) counters: Counters,
    /// Releases deferred to the end of the current tick
    pub(super) pending_release: Vec<(Handle, ReleaseCause)>,
    /// Host spawn requests not yet consumed by a tick
    pub(super) pending_spawns: u32,
    /// Pairs resolved during the last tick
    pub(super) collisions: Vec<CollisionEvent>,
    /// Unsimulated frame time for the fixed-step driver
    pub(super) accumulator: f32,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        Self::with_observer(config, Box::new(NoopObserver))
    }

    pub fn with_observer(
        config: SimConfig,
        observer: Box<dyn PoolObserver>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let pool = EntityPool::with_observer(config.capacity, observer)?;
        let rng = match config.rng_seed {
            Some(seed) => SeededRng::new(seed),
            None => SeededRng::from_entropy(),
        };
        let scheduler =
            SpawnScheduler::new(config.spawn, config.spawn_interval, config.target_speed);

        log::info!(
            "Simulation initialized: policy={}, seed={}",
            config.boundary_policy.as_str(),
            rng.seed()
        );

        Ok(Self {
            policy: config.policy(),
            resolver: CollisionResolver::new(config.drift_correction()),
            config,
            pool,
            scheduler,
            rng,
            counters: Counters::default(),
            pending_release: Vec::new(),
            pending_spawns: 0,
            collisions: Vec::new(),
            accumulator: 0.0,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    pub fn pool(&self) -> &EntityPool {
        &self.pool
    }

    pub fn policy(&self) -> &BoundaryPolicy {
        &self.policy
    }

    pub fn scheduler(&self) -> &SpawnScheduler {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut SpawnScheduler {
        &mut self.scheduler
    }

    pub fn counters(&self) -> Counters {
        Counters {
            active_count: self.pool.active_count(),
            ..self.counters
        }
    }

    /// Pairs resolved during the most recent tick
    pub fn last_collisions(&self) -> &[CollisionEvent] {
        &self.collisions
    }

    /// Run one scheduler trigger now (outside the tick order)
    pub fn spawn(&mut self) -> Option<Handle> {
        match self.scheduler.on_trigger(&mut self.pool, &mut self.rng) {
            SpawnOutcome::Spawned(handle) => {
                self.counters.spawned_count += 1;
                Some(handle)
            }
            SpawnOutcome::Dropped => {
                self.counters.dropped_spawns += 1;
                None
            }
            SpawnOutcome::Stopped => None,
        }
    }

    /// Place a body directly, bypassing the spawn pattern
    pub fn spawn_at(&mut self, pos: Vec2, vel: Vec2, radius: f32) -> Result<Handle, PoolExhausted> {
        let handle = self.pool.acquire()?;
        if let Some(body) = self.pool.get_mut(handle) {
            *body = PhysicsBody::new(pos, vel, radius);
        }
        self.counters.spawned_count += 1;
        Ok(handle)
    }

    /// Queue a host spawn request for the next tick
    pub fn request_spawn(&mut self) {
        self.pending_spawns = self.pending_spawns.saturating_add(1);
    }

    /// Queue a release; applied at the end of the next tick
    pub fn request_release(&mut self, handle: Handle) {
        self.pending_release.push((handle, ReleaseCause::External));
    }

    pub fn is_active(&self, handle: Handle) -> bool {
        self.pool.is_active(handle)
    }

    pub fn body(&self, handle: Handle) -> Option<&PhysicsBody> {
        self.pool.get(handle)
    }

    /// Mutable access for caller-supplied forces (gravity, drag)
    pub fn body_mut(&mut self, handle: Handle) -> Option<&mut PhysicsBody> {
        self.pool.get_mut(handle)
    }

    /// Active bodies in ascending slot order
    pub fn bodies(&self) -> impl Iterator<Item = (Handle, &PhysicsBody)> {
        self.pool.iter_active()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            seed: self.seed(),
            counters: self.counters(),
            bodies: self
                .bodies()
                .map(|(handle, body)| BodyView {
                    handle,
                    pos: body.pos,
                    vel: body.vel,
                    radius: body.radius,
                    rotation: body.rotation,
                    active: true,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Preset;

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = SimConfig {
            capacity: 0,
            ..Default::default()
        };
        assert!(matches!(
            Simulation::new(config),
            Err(ConfigError::ZeroCapacity)
        ));
    }

    #[test]
    fn test_spawn_counts_and_drops() {
        let mut sim = Simulation::new(SimConfig {
            capacity: 2,
            rng_seed: Some(1),
            ..Default::default()
        })
        .unwrap();

        assert!(sim.spawn().is_some());
        assert!(sim.spawn().is_some());
        assert!(sim.spawn().is_none());

        let c = sim.counters();
        assert_eq!(c.active_count, 2);
        assert_eq!(c.spawned_count, 2);
        assert_eq!(c.dropped_spawns, 1);
    }

    #[test]
    fn test_spawn_at_places_body() {
        let mut sim = Simulation::new(SimConfig::default()).unwrap();
        let h = sim
            .spawn_at(Vec2::new(10.0, 20.0), Vec2::new(1.0, 0.0), 4.0)
            .unwrap();
        let body = sim.body(h).unwrap();
        assert_eq!(body.pos, Vec2::new(10.0, 20.0));
        assert_eq!(body.radius, 4.0);
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut sim = Simulation::new(Preset::Rain.config()).unwrap();
        sim.spawn();
        let snapshot = sim.snapshot();
        assert_eq!(snapshot.seed, 12345);
        assert_eq!(snapshot.bodies.len(), 1);

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.counters, snapshot.counters);
        assert_eq!(back.bodies[0].handle, snapshot.bodies[0].handle);
    }
}
