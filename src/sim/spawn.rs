//! Spawn scheduling
//!
//! A scheduler turns triggers (its own interval timer, or requests from the
//! host) into pool acquisitions. An exhausted pool drops the spawn; it is
//! never an error for the simulation.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::PhysicsBody;
use super::pool::{EntityPool, Handle};
use super::rng::SeededRng;
use crate::consts::{DEFAULT_HEIGHT, DEFAULT_RADIUS, DEFAULT_SPAWN_SPEED, DEFAULT_WIDTH};

/// Where a new body appears
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PositionRecipe {
    Fixed { x: f32, y: f32 },
    /// Uniform per axis; a degenerate range pins that axis to its minimum
    Random { x: (f32, f32), y: (f32, f32) },
}

/// Initial velocity of a new body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VelocityRecipe {
    Fixed { vx: f32, vy: f32 },
    /// Random heading; the simulation's target speed overrides `speed` when set
    RandomDirection { speed: f32 },
    RandomRange { vx: (f32, f32), vy: (f32, f32) },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RadiusRecipe {
    Fixed { radius: f32 },
    Random { min: f32, max: f32 },
}

/// Recipe for initializing a freshly acquired body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnPattern {
    pub position: PositionRecipe,
    pub velocity: VelocityRecipe,
    pub radius: RadiusRecipe,
    #[serde(default)]
    pub angular_velocity: Option<f32>,
}

impl Default for SpawnPattern {
    fn default() -> Self {
        Self {
            position: PositionRecipe::Random {
                x: (0.0, DEFAULT_WIDTH),
                y: (0.0, DEFAULT_HEIGHT),
            },
            velocity: VelocityRecipe::RandomDirection {
                speed: DEFAULT_SPAWN_SPEED,
            },
            radius: RadiusRecipe::Fixed {
                radius: DEFAULT_RADIUS,
            },
            angular_velocity: None,
        }
    }
}

impl SpawnPattern {
    /// Build a body. Draw order is fixed: x, y, radius, velocity.
    pub fn build(&self, rng: &mut SeededRng, target_speed: Option<f32>) -> PhysicsBody {
        let pos = match self.position {
            PositionRecipe::Fixed { x, y } => Vec2::new(x, y),
            PositionRecipe::Random { x, y } => {
                let px = rng.range(x.0, x.1);
                let py = rng.range(y.0, y.1);
                Vec2::new(px, py)
            }
        };

        let radius = match self.radius {
            RadiusRecipe::Fixed { radius } => radius,
            RadiusRecipe::Random { min, max } => rng.range(min, max),
        };

        let vel = match self.velocity {
            VelocityRecipe::Fixed { vx, vy } => Vec2::new(vx, vy),
            VelocityRecipe::RandomDirection { speed } => {
                rng.direction() * target_speed.unwrap_or(speed)
            }
            VelocityRecipe::RandomRange { vx, vy } => {
                let x = rng.range(vx.0, vx.1);
                let y = rng.range(vy.0, vy.1);
                Vec2::new(x, y)
            }
        };

        PhysicsBody {
            pos,
            vel,
            radius,
            angular_velocity: self.angular_velocity,
            rotation: 0.0,
        }
    }
}

/// Result of a single trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnOutcome {
    Spawned(Handle),
    /// Pool was full; the spawn was dropped
    Dropped,
    /// Scheduler is stopped; the trigger was ignored
    Stopped,
}

#[derive(Debug, Clone)]
pub struct SpawnScheduler {
    pub pattern: SpawnPattern,
    /// Seconds between automatic triggers (None = host-driven only)
    interval: Option<f32>,
    timer: f32,
    running: bool,
    target_speed: Option<f32>,
}

impl SpawnScheduler {
    pub fn new(pattern: SpawnPattern, interval: Option<f32>, target_speed: Option<f32>) -> Self {
        Self {
            pattern,
            interval,
            timer: 0.0,
            running: true,
            target_speed,
        }
    }

    pub fn interval(&self) -> Option<f32> {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Unregister the trigger source. Live entities keep simulating.
    pub fn stop(&mut self) {
        if self.running {
            log::info!("Spawn scheduler stopped");
        }
        self.running = false;
    }

    pub fn start(&mut self) {
        if !self.running {
            log::info!("Spawn scheduler started");
        }
        self.running = true;
    }

    pub fn reset_timer(&mut self) {
        self.timer = 0.0;
    }

    /// Advance the interval timer and return how many triggers fired.
    ///
    /// Leftover time carries over, so a long tick can fire several times.
    /// The count saturates at `u32::MAX`.
    pub fn due_triggers(&mut self, dt: f32) -> u32 {
        let Some(interval) = self.interval else {
            return 0;
        };
        if !self.running || interval <= 0.0 {
            return 0;
        }

        self.timer += dt.max(0.0);
        if !self.timer.is_finite() {
            self.timer = 0.0;
            return u32::MAX;
        }
        // Float-to-int `as` saturates
        let fired = (self.timer / interval).floor() as u32;
        self.timer = self.timer.rem_euclid(interval);
        fired
    }

    /// Try to spawn one body from the pattern
    pub fn on_trigger(&mut self, pool: &mut EntityPool, rng: &mut SeededRng) -> SpawnOutcome {
        if !self.running {
            return SpawnOutcome::Stopped;
        }

        match pool.acquire() {
            Ok(handle) => {
                let body = self.pattern.build(rng, self.target_speed);
                if let Some(slot) = pool.get_mut(handle) {
                    *slot = body;
                }
                SpawnOutcome::Spawned(handle)
            }
            Err(e) => {
                log::debug!("Spawn dropped: {}", e);
                SpawnOutcome::Dropped
            }
        }
    }
}
