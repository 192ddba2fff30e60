//! Region boundary handling
//!
//! A policy is chosen once per simulation and evaluated for every active
//! body after integration. Evaluation is pure: it maps
//! `(position, velocity)` to a new position/velocity and a destroy flag,
//! leaving pool bookkeeping to the caller.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::BoundaryKind;
use crate::consts::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::{within_margin, wrap_coordinate};

/// Region `[0, width] x [0, height]` plus an off-screen margin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub margin: f32,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            margin: 0.0,
        }
    }
}

impl Bounds {
    pub fn new(width: f32, height: f32, margin: f32) -> Self {
        Self {
            width,
            height,
            margin,
        }
    }

    /// Whether a point is inside the region extended by the margin
    pub fn contains_with_margin(&self, pos: Vec2) -> bool {
        within_margin(pos.x, self.width, self.margin)
            && within_margin(pos.y, self.height, self.margin)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundaryPolicy {
    /// Keep bodies inside `[0, extent]`, optionally reflecting the velocity component
    Clamp { bounds: Bounds, bounce: bool },
    /// Re-enter on the opposite side once past `extent + margin` / `-margin`
    WrapAround { bounds: Bounds },
    /// Release bodies that leave `[-margin, extent + margin]`
    DestroyOnExit { bounds: Bounds },
}

/// Result of evaluating one body against the policy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryOutcome {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Number of axes wrapped this tick (0, 1 or 2)
    pub wrapped_axes: u32,
    /// Velocity was reflected by a clamp bounce
    pub bounced: bool,
    pub destroyed: bool,
}

impl BoundaryOutcome {
    fn unchanged(pos: Vec2, vel: Vec2) -> Self {
        Self {
            pos,
            vel,
            wrapped_axes: 0,
            bounced: false,
            destroyed: false,
        }
    }
}

impl BoundaryPolicy {
    pub fn from_kind(kind: BoundaryKind, bounds: Bounds, bounce: bool) -> Self {
        match kind {
            BoundaryKind::Clamp => BoundaryPolicy::Clamp { bounds, bounce },
            BoundaryKind::WrapAround => BoundaryPolicy::WrapAround { bounds },
            BoundaryKind::DestroyOnExit => BoundaryPolicy::DestroyOnExit { bounds },
        }
    }

    pub fn kind(&self) -> BoundaryKind {
        match self {
            BoundaryPolicy::Clamp { .. } => BoundaryKind::Clamp,
            BoundaryPolicy::WrapAround { .. } => BoundaryKind::WrapAround,
            BoundaryPolicy::DestroyOnExit { .. } => BoundaryKind::DestroyOnExit,
        }
    }

    pub fn bounds(&self) -> Bounds {
        match *self {
            BoundaryPolicy::Clamp { bounds, .. }
            | BoundaryPolicy::WrapAround { bounds }
            | BoundaryPolicy::DestroyOnExit { bounds } => bounds,
        }
    }

    pub fn evaluate(&self, pos: Vec2, vel: Vec2) -> BoundaryOutcome {
        match *self {
            BoundaryPolicy::Clamp { bounds, bounce } => clamp(bounds, bounce, pos, vel),
            BoundaryPolicy::WrapAround { bounds } => wrap(bounds, pos, vel),
            BoundaryPolicy::DestroyOnExit { bounds } => BoundaryOutcome {
                destroyed: !bounds.contains_with_margin(pos),
                ..BoundaryOutcome::unchanged(pos, vel)
            },
        }
    }
}

fn clamp(bounds: Bounds, bounce: bool, pos: Vec2, vel: Vec2) -> BoundaryOutcome {
    let (x, vx, bx) = clamp_axis(pos.x, vel.x, bounds.width, bounce);
    let (y, vy, by) = clamp_axis(pos.y, vel.y, bounds.height, bounce);
    BoundaryOutcome {
        bounced: bx || by,
        ..BoundaryOutcome::unchanged(Vec2::new(x, y), Vec2::new(vx, vy))
    }
}

/// Clamp one axis into [0, extent]; reflect only a velocity still heading out
fn clamp_axis(p: f32, v: f32, extent: f32, bounce: bool) -> (f32, f32, bool) {
    if p < 0.0 {
        let flip = bounce && v < 0.0;
        (0.0, if flip { -v } else { v }, flip)
    } else if p > extent {
        let flip = bounce && v > 0.0;
        (extent, if flip { -v } else { v }, flip)
    } else {
        (p, v, false)
    }
}

fn wrap(bounds: Bounds, pos: Vec2, vel: Vec2) -> BoundaryOutcome {
    let mut out = BoundaryOutcome::unchanged(pos, vel);
    if let Some(x) = wrap_coordinate(pos.x, bounds.width, bounds.margin) {
        out.pos.x = x;
        out.wrapped_axes += 1;
    }
    if let Some(y) = wrap_coordinate(pos.y, bounds.height, bounds.margin) {
        out.pos.y = y;
        out.wrapped_axes += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(margin: f32) -> Bounds {
        Bounds::new(800.0, 600.0, margin)
    }

    #[test]
    fn test_wrap_right_edge() {
        let policy = BoundaryPolicy::WrapAround { bounds: region(0.0) };
        let out = policy.evaluate(Vec2::new(849.0, 300.0), Vec2::new(50.0, 0.0));
        assert!((out.pos.x - 49.0).abs() < 1e-3);
        assert_eq!(out.pos.y, 300.0);
        assert_eq!(out.vel, Vec2::new(50.0, 0.0));
        assert_eq!(out.wrapped_axes, 1);
        assert!(!out.destroyed);
    }

    #[test]
    fn test_wrap_diagonal_counts_each_axis() {
        let policy = BoundaryPolicy::WrapAround { bounds: region(10.0) };
        let out = policy.evaluate(Vec2::new(-11.0, 611.0), Vec2::new(-5.0, 5.0));
        assert_eq!(out.wrapped_axes, 2);
        assert!((out.pos.x - 809.0).abs() < 1e-3);
        assert!((out.pos.y - (-9.0)).abs() < 1e-3);
    }

    #[test]
    fn test_wrap_inside_margin_untouched() {
        let policy = BoundaryPolicy::WrapAround { bounds: region(32.0) };
        let out = policy.evaluate(Vec2::new(820.0, -20.0), Vec2::ZERO);
        assert_eq!(out.wrapped_axes, 0);
        assert_eq!(out.pos, Vec2::new(820.0, -20.0));
    }

    #[test]
    fn test_clamp_with_bounce() {
        let policy = BoundaryPolicy::Clamp {
            bounds: region(0.0),
            bounce: true,
        };
        let out = policy.evaluate(Vec2::new(805.0, -3.0), Vec2::new(100.0, -40.0));
        assert_eq!(out.pos, Vec2::new(800.0, 0.0));
        assert_eq!(out.vel, Vec2::new(-100.0, 40.0));
        assert!(out.bounced);
    }

    #[test]
    fn test_clamp_without_bounce_keeps_velocity() {
        let policy = BoundaryPolicy::Clamp {
            bounds: region(0.0),
            bounce: false,
        };
        let out = policy.evaluate(Vec2::new(-10.0, 700.0), Vec2::new(-30.0, 30.0));
        assert_eq!(out.pos, Vec2::new(0.0, 600.0));
        assert_eq!(out.vel, Vec2::new(-30.0, 30.0));
        assert!(!out.bounced);
    }

    #[test]
    fn test_clamp_does_not_flip_inbound_velocity() {
        let policy = BoundaryPolicy::Clamp {
            bounds: region(0.0),
            bounce: true,
        };
        // Already heading back in: clamp position, leave velocity
        let out = policy.evaluate(Vec2::new(-1.0, 10.0), Vec2::new(20.0, 0.0));
        assert_eq!(out.vel, Vec2::new(20.0, 0.0));
        assert!(!out.bounced);
    }

    #[test]
    fn test_destroy_on_exit() {
        let policy = BoundaryPolicy::DestroyOnExit { bounds: region(50.0) };
        assert!(!policy.evaluate(Vec2::new(400.0, -50.0), Vec2::ZERO).destroyed);
        assert!(!policy.evaluate(Vec2::new(400.0, 650.0), Vec2::ZERO).destroyed);
        assert!(policy.evaluate(Vec2::new(400.0, 650.5), Vec2::ZERO).destroyed);
        assert!(policy.evaluate(Vec2::new(-51.0, 300.0), Vec2::ZERO).destroyed);
    }

    #[test]
    fn test_kind_roundtrip() {
        for kind in [BoundaryKind::Clamp, BoundaryKind::WrapAround, BoundaryKind::DestroyOnExit] {
            let policy = BoundaryPolicy::from_kind(kind, region(0.0), true);
            assert_eq!(policy.kind(), kind);
            assert_eq!(policy.bounds(), region(0.0));
        }
    }
}
