//! Pool Sim - fixed-capacity entity pool driven by a 2D physics tick
//!
//! Core modules:
//! - `sim`: Deterministic simulation (pool, integration, collisions, boundaries, spawning)
//! - `config`: Simulation configuration and scenario presets
//! - `render`: Read-only instance extraction for an external renderer

pub mod config;
pub mod render;
pub mod sim;

pub use config::{BoundaryKind, ConfigError, Preset, SimConfig};
pub use sim::{
    Bounds, BoundaryPolicy, Counters, EntityPool, Handle, PhysicsBody, PoolExhausted,
    PoolObserver, SeededRng, Simulation, Snapshot, SpawnScheduler, TickInput, advance, tick,
};

/// Simulation configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default region (the 800x600 canvas every demo scene runs in)
    pub const DEFAULT_WIDTH: f32 = 800.0;
    pub const DEFAULT_HEIGHT: f32 = 600.0;

    /// Default pool size
    pub const DEFAULT_CAPACITY: usize = 20;
    /// Default body radius (32px sprites)
    pub const DEFAULT_RADIUS: f32 = 16.0;
    /// Default speed for random-direction spawns
    pub const DEFAULT_SPAWN_SPEED: f32 = 100.0;
    /// Default absolute drift tolerance
    pub const DEFAULT_SPEED_TOLERANCE: f32 = 5.0;

    /// Squared center distance treated as coincident
    pub const DEGENERATE_DISTANCE_SQ: f32 = 1e-8;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    (angle + PI).rem_euclid(TAU) - PI
}

/// Wrap a coordinate back into `[-margin, extent + margin]`.
///
/// Returns `None` when the value is already inside. Overshoot is preserved,
/// so a body leaving the high edge by `d` re-enters at `-margin + d`.
#[inline]
pub fn wrap_coordinate(value: f32, extent: f32, margin: f32) -> Option<f32> {
    let lo = -margin;
    let hi = extent + margin;
    if (lo..=hi).contains(&value) {
        return None;
    }
    Some((value - lo).rem_euclid(hi - lo) + lo)
}

/// Whether a coordinate lies inside `[-margin, extent + margin]`
#[inline]
pub fn within_margin(value: f32, extent: f32, margin: f32) -> bool {
    value >= -margin && value <= extent + margin
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_high_edge_keeps_overshoot() {
        let wrapped = wrap_coordinate(849.0, 800.0, 0.0).unwrap();
        assert!((wrapped - 49.0).abs() < 1e-3);
    }

    #[test]
    fn test_wrap_low_edge_with_margin() {
        // Span is 900 (-50..850); -60 is 10 past the low edge
        let wrapped = wrap_coordinate(-60.0, 800.0, 50.0).unwrap();
        assert!((wrapped - 840.0).abs() < 1e-3);
    }

    #[test]
    fn test_wrap_inside_is_none() {
        assert!(wrap_coordinate(0.0, 800.0, 0.0).is_none());
        assert!(wrap_coordinate(800.0, 800.0, 0.0).is_none());
        assert!(wrap_coordinate(-20.0, 800.0, 32.0).is_none());
    }

    #[test]
    fn test_normalize_angle() {
        use std::f32::consts::PI;
        assert!((normalize_angle(2.5 * PI) - 0.5 * PI).abs() < 1e-4);
        assert!((normalize_angle(0.5) - 0.5).abs() < 1e-6);
        assert!((normalize_angle(-0.5 - 2.0 * PI) - (-0.5)).abs() < 1e-4);
    }

    #[test]
    fn test_within_margin() {
        assert!(within_margin(-50.0, 600.0, 50.0));
        assert!(within_margin(650.0, 600.0, 50.0));
        assert!(!within_margin(650.1, 600.0, 50.0));
    }
}
