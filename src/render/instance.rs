//! Per-body instance records for an external renderer

use bytemuck::{Pod, Zeroable};

use crate::sim::Simulation;

/// Speed used to scale the color ramp when no target speed is configured
pub const REFERENCE_SPEED: f32 = 200.0;

/// One active body, laid out for a GPU instance buffer
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct BodyInstance {
    pub position: [f32; 2],
    pub velocity: [f32; 2],
    pub radius: f32,
    pub rotation: f32,
    pub color: [f32; 4],
}

/// Interpolate color based on speed (slow=blue, medium=green, fast=red/orange)
///
/// `reference` maps to the middle of the ramp.
pub fn speed_color(speed: f32, reference: f32) -> [f32; 4] {
    let t = if reference > 0.0 {
        (speed / (2.0 * reference)).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let (r, g, b) = if t < 0.25 {
        // Blue to cyan
        let u = t / 0.25;
        (0.2, 0.4 + 0.4 * u, 1.0)
    } else if t < 0.5 {
        // Cyan to green
        let u = (t - 0.25) / 0.25;
        (0.2, 0.8, 1.0 - 0.6 * u)
    } else if t < 0.75 {
        // Green to yellow
        let u = (t - 0.5) / 0.25;
        (0.2 + 0.8 * u, 0.8, 0.4 - 0.2 * u)
    } else {
        // Yellow to red/orange
        let u = (t - 0.75) / 0.25;
        (1.0, 0.8 - 0.5 * u, 0.2)
    };

    [r, g, b, 1.0]
}

/// Collect the active bodies in slot order
pub fn extract_instances(sim: &Simulation) -> Vec<BodyInstance> {
    let reference = sim.config().target_speed.unwrap_or(REFERENCE_SPEED);
    sim.bodies()
        .map(|(_, body)| BodyInstance {
            position: body.pos.to_array(),
            velocity: body.vel.to_array(),
            radius: body.radius,
            rotation: body.rotation,
            color: speed_color(body.speed(), reference),
        })
        .collect()
}

/// Raw bytes for upload
pub fn as_bytes(instances: &[BodyInstance]) -> &[u8] {
    bytemuck::cast_slice(instances)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use glam::Vec2;

    #[test]
    fn test_instance_layout_is_packed() {
        assert_eq!(std::mem::size_of::<BodyInstance>(), 40);
        let instances = [BodyInstance::zeroed(); 3];
        assert_eq!(as_bytes(&instances).len(), 120);
    }

    #[test]
    fn test_speed_color_ramp_ends() {
        let slow = speed_color(0.0, 100.0);
        assert_eq!(slow, [0.2, 0.4, 1.0, 1.0]);
        let fast = speed_color(1000.0, 100.0);
        assert!((fast[0] - 1.0).abs() < 1e-6);
        assert!((fast[1] - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_extract_matches_active_bodies() {
        let mut sim = Simulation::new(SimConfig {
            capacity: 3,
            rng_seed: Some(4),
            ..Default::default()
        })
        .unwrap();
        let a = sim
            .spawn_at(Vec2::new(10.0, 20.0), Vec2::new(3.0, 4.0), 6.0)
            .unwrap();
        let b = sim.spawn_at(Vec2::new(50.0, 60.0), Vec2::ZERO, 2.0).unwrap();
        sim.request_release(a);
        crate::sim::tick(&mut sim, &Default::default(), 0.0);

        let instances = extract_instances(&sim);
        assert_eq!(instances.len(), 1);
        assert_eq!(instances[0].position, sim.body(b).unwrap().pos.to_array());
        assert_eq!(instances[0].radius, 2.0);
    }
}
