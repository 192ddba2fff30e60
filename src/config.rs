//! Simulation configuration and scenario presets
//!
//! Loaded from JSON or built from a preset. Validation runs once, at setup;
//! a config that passes never causes a runtime failure.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::boundary::{BoundaryPolicy, Bounds};
use crate::sim::collision::DriftCorrection;
use crate::sim::spawn::{PositionRecipe, RadiusRecipe, SpawnPattern, VelocityRecipe};

/// Rejected configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("capacity must be at least 1")]
    ZeroCapacity,
    #[error("capacity {0} exceeds the handle index range")]
    CapacityTooLarge(usize),
    #[error("bounds must have positive extent (got {width}x{height})")]
    NonPositiveExtent { width: f32, height: f32 },
    #[error("bounds margin must be non-negative (got {0})")]
    NegativeMargin(f32),
    #[error("target speed must be positive (got {0})")]
    NonPositiveTargetSpeed(f32),
    #[error("speed tolerance must be non-negative (got {0})")]
    NegativeTolerance(f32),
    #[error("spawn interval must be positive (got {0})")]
    NonPositiveSpawnInterval(f32),
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
}

/// Boundary policy selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryKind {
    #[default]
    Clamp,
    WrapAround,
    DestroyOnExit,
}

impl BoundaryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoundaryKind::Clamp => "clamp",
            BoundaryKind::WrapAround => "wrap_around",
            BoundaryKind::DestroyOnExit => "destroy_on_exit",
        }
    }
}

/// Complete simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Pool size, fixed for the life of the simulation
    pub capacity: usize,
    pub boundary_policy: BoundaryKind,
    pub bounds: Bounds,
    /// Clamp reflects the outbound velocity component
    pub clamp_bounce: bool,
    /// Speed every moving body is held to (None = no drift correction)
    pub target_speed: Option<f32>,
    /// Absolute drift allowed before rescaling
    pub speed_tolerance: f32,
    /// Seconds between automatic spawns (None = host-triggered only)
    pub spawn_interval: Option<f32>,
    /// Seed for the spawn stream (None = fresh seed per run)
    pub rng_seed: Option<u64>,
    pub spawn: SpawnPattern,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            boundary_policy: BoundaryKind::Clamp,
            bounds: Bounds::default(),
            clamp_bounce: true,
            target_speed: None,
            speed_tolerance: DEFAULT_SPEED_TOLERANCE,
            spawn_interval: None,
            rng_seed: None,
            spawn: SpawnPattern::default(),
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.capacity > u32::MAX as usize {
            return Err(ConfigError::CapacityTooLarge(self.capacity));
        }

        let Bounds {
            width,
            height,
            margin,
        } = self.bounds;
        // Written so NaN fails too
        if !(width > 0.0 && height > 0.0) {
            return Err(ConfigError::NonPositiveExtent { width, height });
        }
        if !(margin >= 0.0) {
            return Err(ConfigError::NegativeMargin(margin));
        }

        if let Some(speed) = self.target_speed {
            if !(speed > 0.0) {
                return Err(ConfigError::NonPositiveTargetSpeed(speed));
            }
        }
        if !(self.speed_tolerance >= 0.0) {
            return Err(ConfigError::NegativeTolerance(self.speed_tolerance));
        }
        if let Some(interval) = self.spawn_interval {
            if !(interval > 0.0) {
                return Err(ConfigError::NonPositiveSpawnInterval(interval));
            }
        }
        Ok(())
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn policy(&self) -> BoundaryPolicy {
        BoundaryPolicy::from_kind(self.boundary_policy, self.bounds, self.clamp_bounce)
    }

    pub fn drift_correction(&self) -> Option<DriftCorrection> {
        self.target_speed
            .map(|target| DriftCorrection::new(target, self.speed_tolerance))
    }
}

/// Built-in scenarios, one per family of demo scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Preset {
    /// Balls bouncing off the walls and each other at constant speed
    #[default]
    Bouncing,
    /// Bodies dropped from above the top edge, recycled once they fall out
    Rain,
    /// Spinning rocks drifting across a wrapping field
    Asteroids,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Bouncing, Preset::Rain, Preset::Asteroids];

    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Bouncing => "bouncing",
            Preset::Rain => "rain",
            Preset::Asteroids => "asteroids",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "bouncing" | "bounce" => Some(Preset::Bouncing),
            "rain" => Some(Preset::Rain),
            "asteroids" | "wrap" => Some(Preset::Asteroids),
            _ => None,
        }
    }

    pub fn config(&self) -> SimConfig {
        match self {
            Preset::Bouncing => SimConfig {
                capacity: 10,
                boundary_policy: BoundaryKind::Clamp,
                clamp_bounce: true,
                target_speed: Some(200.0),
                speed_tolerance: 10.0, // 5% of target
                spawn_interval: Some(0.25),
                rng_seed: Some(42),
                spawn: SpawnPattern {
                    position: PositionRecipe::Random {
                        x: (50.0, DEFAULT_WIDTH - 50.0),
                        y: (50.0, DEFAULT_HEIGHT - 50.0),
                    },
                    velocity: VelocityRecipe::RandomDirection { speed: 200.0 },
                    radius: RadiusRecipe::Fixed { radius: 20.0 },
                    angular_velocity: None,
                },
                ..Default::default()
            },
            Preset::Rain => SimConfig {
                capacity: 5,
                boundary_policy: BoundaryKind::DestroyOnExit,
                bounds: Bounds::new(DEFAULT_WIDTH, DEFAULT_HEIGHT, 50.0),
                spawn_interval: Some(0.5),
                rng_seed: Some(12345),
                spawn: SpawnPattern {
                    position: PositionRecipe::Random {
                        x: (50.0, DEFAULT_WIDTH - 50.0),
                        y: (-50.0, -50.0),
                    },
                    velocity: VelocityRecipe::Fixed { vx: 0.0, vy: 200.0 },
                    radius: RadiusRecipe::Fixed {
                        radius: DEFAULT_RADIUS,
                    },
                    angular_velocity: None,
                },
                ..Default::default()
            },
            Preset::Asteroids => SimConfig {
                capacity: 12,
                boundary_policy: BoundaryKind::WrapAround,
                bounds: Bounds::new(DEFAULT_WIDTH, DEFAULT_HEIGHT, 32.0),
                spawn_interval: Some(1.0),
                rng_seed: Some(7),
                spawn: SpawnPattern {
                    velocity: VelocityRecipe::RandomRange {
                        vx: (-80.0, 80.0),
                        vy: (-80.0, 80.0),
                    },
                    radius: RadiusRecipe::Random {
                        min: 12.0,
                        max: 40.0,
                    },
                    angular_velocity: Some(1.5),
                    ..Default::default()
                },
                ..Default::default()
            },
        }
    }
}
