//! Per-entity kinematic state and the integrator

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_RADIUS;

/// Kinematic state of one pooled entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsBody {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Spin in radians/sec (None = body does not rotate)
    #[serde(default)]
    pub angular_velocity: Option<f32>,
    /// Accumulated rotation (radians), only advanced when spinning
    #[serde(default)]
    pub rotation: f32,
}

impl Default for PhysicsBody {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            radius: DEFAULT_RADIUS,
            angular_velocity: None,
            rotation: 0.0,
        }
    }
}

impl PhysicsBody {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self {
            pos,
            vel,
            radius,
            ..Default::default()
        }
    }

    pub fn with_angular_velocity(mut self, angular_velocity: f32) -> Self {
        self.angular_velocity = Some(angular_velocity);
        self
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Advance this body by `dt` seconds
    #[inline]
    pub fn integrate(&mut self, dt: f32) {
        integrate(self, dt);
    }
}

/// Semi-implicit Euler step: `pos += vel * dt`.
///
/// Forces (gravity, drag) are velocity mutations the caller applies before
/// this runs.
#[inline]
pub fn integrate(body: &mut PhysicsBody, dt: f32) {
    body.pos += body.vel * dt;
    if let Some(spin) = body.angular_velocity {
        body.rotation = crate::normalize_angle(body.rotation + spin * dt);
    }
}
