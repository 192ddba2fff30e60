//! Simulation tick
//!
//! One tick runs in a fixed order:
//! spawn → integrate → collide → boundary → drift sweep → release.
//! Releases found mid-scan are queued and applied only after every scan has
//! finished, so slot iteration is never invalidated.

use super::body::integrate;
use super::pool::Handle;
use super::state::{ReleaseCause, Simulation};
use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Host events for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Spawn triggers from input devices or external timers
    pub spawn_requests: u32,
    /// Entities the host wants released at the end of this tick
    pub release_requests: Vec<Handle>,
}

impl TickInput {
    pub fn spawn(count: u32) -> Self {
        Self {
            spawn_requests: count,
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.spawn_requests == 0 && self.release_requests.is_empty()
    }
}

/// Advance the simulation by `dt` seconds
pub fn tick(sim: &mut Simulation, input: &TickInput, dt: f32) {
    sim.counters.ticks += 1;
    sim.collisions.clear();

    // Spawns: scheduler interval first, then host requests
    let triggers = sim
        .scheduler
        .due_triggers(dt)
        .saturating_add(input.spawn_requests)
        .saturating_add(sim.pending_spawns);
    sim.pending_spawns = 0;
    spawn_burst(sim, triggers);

    for (_, body) in sim.pool.iter_active_mut() {
        integrate(body, dt);
    }

    let resolved = sim.resolver.resolve_all(&mut sim.pool, &mut sim.collisions);
    sim.counters.collision_count += resolved as u64;

    let drift = sim.resolver.drift;
    for (handle, body) in sim.pool.iter_active_mut() {
        let outcome = sim.policy.evaluate(body.pos, body.vel);
        body.pos = outcome.pos;
        body.vel = outcome.vel;
        sim.counters.wrap_count += u64::from(outcome.wrapped_axes);

        if outcome.destroyed {
            sim.pending_release.push((handle, ReleaseCause::Boundary));
        }
    }

    // Holds every moving body at the target speed, including after bounces
    // and caller-applied forces.
    if let Some(drift) = drift {
        for (_, body) in sim.pool.iter_active_mut() {
            drift.correct(body);
        }
    }

    sim.pending_release.extend(
        input
            .release_requests
            .iter()
            .map(|&h| (h, ReleaseCause::External)),
    );
    apply_releases(sim);
}

/// Fire `triggers` spawns, stopping at the first one the pool turns away.
/// The rest are counted as dropped without touching the pool or the RNG.
fn spawn_burst(sim: &mut Simulation, triggers: u32) {
    let mut remaining = triggers;
    while remaining > 0 {
        remaining -= 1;
        if sim.spawn().is_none() {
            break;
        }
    }

    // A stopped scheduler ignores triggers instead of dropping them
    if remaining > 0 && sim.scheduler.is_running() {
        sim.counters.dropped_spawns += u64::from(remaining);
        log::debug!("Pool full, dropped {} more spawns", remaining);
    }
}

fn apply_releases(sim: &mut Simulation) {
    let pending = std::mem::take(&mut sim.pending_release);
    for (handle, cause) in pending {
        // A stale handle (released earlier this tick) is a no-op
        if !sim.pool.release(handle) {
            continue;
        }
        if cause == ReleaseCause::Boundary {
            sim.counters.recycled_count += 1;
            log::debug!("Recycled {} after boundary exit", handle);
        }
    }
}

/// Fixed-timestep driver.
///
/// Accumulates host frame time and runs whole `SIM_DT` ticks, at most
/// `MAX_SUBSTEPS` per call; a larger backlog is dropped. Input is queued and
/// consumed by the next tick that runs. Returns the number of ticks run.
pub fn advance(sim: &mut Simulation, input: &TickInput, frame_dt: f32) -> u32 {
    sim.pending_spawns = sim.pending_spawns.saturating_add(input.spawn_requests);
    for &handle in &input.release_requests {
        sim.request_release(handle);
    }

    sim.accumulator += frame_dt.max(0.0);
    let idle = TickInput::default();
    let mut steps = 0;
    // Small slack so 1/60 s frames reliably yield two 1/120 s ticks
    while sim.accumulator + 1e-6 >= SIM_DT && steps < MAX_SUBSTEPS {
        tick(sim, &idle, SIM_DT);
        sim.accumulator = (sim.accumulator - SIM_DT).max(0.0);
        steps += 1;
    }

    if steps == MAX_SUBSTEPS && sim.accumulator >= SIM_DT {
        log::debug!("Dropping {:.3}s of simulation backlog", sim.accumulator);
        sim.accumulator = 0.0;
    }
    steps
}
