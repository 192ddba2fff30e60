//! Circle-circle collision detection and speed-preserving response
//!
//! Pairs are scanned O(n²) in ascending slot order. That is plenty for the
//! few dozen bodies a pool holds; a broad phase would only pay off for far
//! larger counts.
//!
//! Response is the "bounce with constant speed" model: each body reflects
//! its own velocity about the contact normal, so its speed is unchanged.
//! There is no momentum exchange between bodies.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::PhysicsBody;
use super::pool::{EntityPool, Handle};
use crate::consts::DEGENERATE_DISTANCE_SQ;

/// A resolved pair, valid for the tick that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionEvent {
    pub a: Handle,
    pub b: Handle,
}

/// Overlap between two circles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit vector from the first center toward the second
    pub normal: Vec2,
    /// Overlap depth (for position correction)
    pub penetration: f32,
    /// Centers coincided and the normal is a stand-in
    pub degenerate: bool,
}

/// Test two circles for overlap (`distance < r_a + r_b`)
pub fn circle_contact(pos_a: Vec2, radius_a: f32, pos_b: Vec2, radius_b: f32) -> Option<Contact> {
    let delta = pos_b - pos_a;
    let dist_sq = delta.length_squared();
    let reach = radius_a + radius_b;
    if dist_sq >= reach * reach {
        return None;
    }

    if dist_sq < DEGENERATE_DISTANCE_SQ {
        return Some(Contact {
            normal: Vec2::X,
            penetration: reach,
            degenerate: true,
        });
    }

    let dist = dist_sq.sqrt();
    Some(Contact {
        normal: delta / dist,
        penetration: reach - dist,
        degenerate: false,
    })
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Push the pair apart and reflect whichever bodies are closing on each other
pub fn resolve_contact(a: &mut PhysicsBody, b: &mut PhysicsBody, contact: &Contact) {
    let n = contact.normal;
    let push = n * (contact.penetration * 0.5);
    a.pos -= push;
    b.pos += push;

    if a.vel.dot(n) > 0.0 {
        a.vel = reflect_velocity(a.vel, n);
    }
    if b.vel.dot(n) < 0.0 {
        b.vel = reflect_velocity(b.vel, n);
    }
}

/// Rescales velocity back to a target speed once it drifts past a tolerance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriftCorrection {
    pub target_speed: f32,
    pub tolerance: f32,
}

impl DriftCorrection {
    pub fn new(target_speed: f32, tolerance: f32) -> Self {
        Self {
            target_speed,
            tolerance,
        }
    }

    /// Corrected velocity. A stationary body is left alone.
    pub fn apply(&self, vel: Vec2) -> Vec2 {
        let speed = vel.length();
        if speed <= f32::EPSILON {
            return vel;
        }
        if (speed - self.target_speed).abs() > self.tolerance {
            vel * (self.target_speed / speed)
        } else {
            vel
        }
    }

    /// Correct a body in place; true if the velocity was rescaled
    pub fn correct(&self, body: &mut PhysicsBody) -> bool {
        let corrected = self.apply(body.vel);
        let changed = corrected != body.vel;
        body.vel = corrected;
        changed
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CollisionResolver {
    pub drift: Option<DriftCorrection>,
}

impl CollisionResolver {
    pub fn new(drift: Option<DriftCorrection>) -> Self {
        Self { drift }
    }

    /// Resolve every overlapping active pair (i < j, ascending slot order).
    ///
    /// Appends one event per resolved pair and returns how many were resolved.
    pub fn resolve_all(&self, pool: &mut EntityPool, events: &mut Vec<CollisionEvent>) -> usize {
        let handles = pool.active_handles();
        let mut resolved = 0;

        for (i, &ha) in handles.iter().enumerate() {
            for &hb in &handles[i + 1..] {
                let Some((a, b)) = pool.pair_mut(ha, hb) else {
                    continue;
                };
                let Some(contact) = circle_contact(a.pos, a.radius, b.pos, b.radius) else {
                    continue;
                };
                if contact.degenerate {
                    log::debug!("Coincident centers for {} and {}, using +X normal", ha, hb);
                }

                resolve_contact(a, b, &contact);
                if let Some(drift) = &self.drift {
                    drift.correct(a);
                    drift.correct(b);
                }

                events.push(CollisionEvent { a: ha, b: hb });
                resolved += 1;
            }
        }

        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn(pool: &mut EntityPool, pos: Vec2, vel: Vec2, radius: f32) -> Handle {
        let h = pool.acquire().unwrap();
        *pool.get_mut(h).unwrap() = PhysicsBody::new(pos, vel, radius);
        h
    }

    #[test]
    fn test_contact_detection() {
        assert!(circle_contact(Vec2::ZERO, 10.0, Vec2::new(25.0, 0.0), 10.0).is_none());
        // Touching exactly is not a collision
        assert!(circle_contact(Vec2::ZERO, 10.0, Vec2::new(20.0, 0.0), 10.0).is_none());

        let c = circle_contact(Vec2::ZERO, 10.0, Vec2::new(15.0, 0.0), 10.0).unwrap();
        assert!((c.normal - Vec2::X).length() < 1e-6);
        assert!((c.penetration - 5.0).abs() < 1e-5);
        assert!(!c.degenerate);
    }

    #[test]
    fn test_coincident_centers_use_fallback_normal() {
        let c = circle_contact(Vec2::new(5.0, 5.0), 4.0, Vec2::new(5.0, 5.0), 4.0).unwrap();
        assert!(c.degenerate);
        assert_eq!(c.normal, Vec2::X);
        assert!(c.normal.is_finite());
    }

    #[test]
    fn test_reflect_velocity() {
        // Ball moving right, hits vertical wall (normal pointing left)
        let velocity = Vec2::new(100.0, 0.0);
        let normal = Vec2::new(-1.0, 0.0);

        let reflected = reflect_velocity(velocity, normal);
        assert!((reflected.x - (-100.0)).abs() < 0.001);
        assert!(reflected.y.abs() < 0.001);
    }

    #[test]
    fn test_head_on_bounce_preserves_each_speed() {
        let mut a = PhysicsBody::new(Vec2::new(0.0, 0.0), Vec2::new(120.0, 30.0), 10.0);
        let mut b = PhysicsBody::new(Vec2::new(15.0, 0.0), Vec2::new(-80.0, 0.0), 10.0);
        let (sa, sb) = (a.speed(), b.speed());

        let contact = circle_contact(a.pos, a.radius, b.pos, b.radius).unwrap();
        resolve_contact(&mut a, &mut b, &contact);

        assert!((a.speed() - sa).abs() < 1e-3);
        assert!((b.speed() - sb).abs() < 1e-3);
        assert!(a.vel.x < 0.0);
        assert!(b.vel.x > 0.0);
        // Separated to touching distance
        assert!((b.pos - a.pos).length() >= 20.0 - 1e-3);
    }

    #[test]
    fn test_separating_body_not_reflected() {
        // b is already moving away from a
        let mut a = PhysicsBody::new(Vec2::ZERO, Vec2::new(50.0, 0.0), 10.0);
        let mut b = PhysicsBody::new(Vec2::new(15.0, 0.0), Vec2::new(90.0, 0.0), 10.0);
        let contact = circle_contact(a.pos, a.radius, b.pos, b.radius).unwrap();
        resolve_contact(&mut a, &mut b, &contact);
        assert_eq!(b.vel, Vec2::new(90.0, 0.0));
        assert_eq!(a.vel, Vec2::new(-50.0, 0.0));
    }

    #[test]
    fn test_drift_correction() {
        let drift = DriftCorrection::new(100.0, 5.0);
        // Within tolerance: untouched
        assert_eq!(drift.apply(Vec2::new(103.0, 0.0)), Vec2::new(103.0, 0.0));
        // Outside tolerance: rescaled to target
        let v = drift.apply(Vec2::new(0.0, -130.0));
        assert!((v.length() - 100.0).abs() < 1e-3);
        assert!(v.y < 0.0);
        // Zero speed: skipped
        assert_eq!(drift.apply(Vec2::ZERO), Vec2::ZERO);
    }

    #[test]
    fn test_resolved_pair_lands_within_tolerance() {
        let mut pool = EntityPool::new(4).unwrap();
        let a = spawn(&mut pool, Vec2::new(100.0, 100.0), Vec2::new(120.0, 0.0), 16.0);
        let b = spawn(&mut pool, Vec2::new(120.0, 104.0), Vec2::new(-80.0, 0.0), 16.0);

        let resolver = CollisionResolver::new(Some(DriftCorrection::new(100.0, 5.0)));
        let mut events = Vec::new();
        assert_eq!(resolver.resolve_all(&mut pool, &mut events), 1);
        assert_eq!(events, vec![CollisionEvent { a, b }]);

        for h in [a, b] {
            let speed = pool.get(h).unwrap().speed();
            assert!((speed - 100.0).abs() <= 5.0, "speed {speed}");
        }
    }

    #[test]
    fn test_pairs_scanned_in_slot_order() {
        let mut pool = EntityPool::new(4).unwrap();
        // Three mutually overlapping bodies
        let h0 = spawn(&mut pool, Vec2::new(0.0, 0.0), Vec2::ZERO, 50.0);
        let h1 = spawn(&mut pool, Vec2::new(10.0, 0.0), Vec2::ZERO, 50.0);
        let h2 = spawn(&mut pool, Vec2::new(0.0, 10.0), Vec2::ZERO, 50.0);

        let mut events = Vec::new();
        CollisionResolver::default().resolve_all(&mut pool, &mut events);
        assert_eq!(events[0], CollisionEvent { a: h0, b: h1 });
        assert_eq!(events[1], CollisionEvent { a: h0, b: h2 });
        assert_eq!(events[2], CollisionEvent { a: h1, b: h2 });
    }

    #[test]
    fn test_far_apart_no_events() {
        let mut pool = EntityPool::new(2).unwrap();
        spawn(&mut pool, Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), 5.0);
        spawn(&mut pool, Vec2::new(500.0, 0.0), Vec2::new(-10.0, 0.0), 5.0);
        let mut events = Vec::new();
        assert_eq!(CollisionResolver::default().resolve_all(&mut pool, &mut events), 0);
        assert!(events.is_empty());
    }
}
