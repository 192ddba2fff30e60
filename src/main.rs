//! Pool Sim headless runner
//!
//! Usage: `pool-sim [preset|config.json] [ticks]`
//!
//! Runs the fixed-step loop and prints the final snapshot as JSON.
//! Log output goes through `RUST_LOG` (e.g. `RUST_LOG=debug`).

#[cfg(not(target_arch = "wasm32"))]
use pool_sim::consts::SIM_DT;
#[cfg(not(target_arch = "wasm32"))]
use pool_sim::{ConfigError, Preset, SimConfig, Simulation, TickInput, tick};

#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_TICKS: u32 = 600;

#[cfg(not(target_arch = "wasm32"))]
fn load_config(source: &str) -> Result<SimConfig, ConfigError> {
    if let Some(preset) = Preset::from_str(source) {
        log::info!("Using preset: {}", preset.as_str());
        return Ok(preset.config());
    }
    let json = std::fs::read_to_string(source)?;
    log::info!("Loaded config from {}", source);
    SimConfig::from_json(&json)
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let source = args
        .next()
        .unwrap_or_else(|| Preset::default().as_str().to_string());
    let ticks = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_TICKS);

    let mut sim = match load_config(&source).and_then(Simulation::new) {
        Ok(sim) => sim,
        Err(e) => {
            log::warn!("Rejected configuration '{}': {}", source, e);
            eprintln!("error: {e}");
            std::process::exit(2);
        }
    };

    let input = TickInput::default();
    for _ in 0..ticks {
        tick(&mut sim, &input, SIM_DT);
    }

    let counters = sim.counters();
    log::info!(
        "Ran {} ticks: active={} spawned={} recycled={} collisions={} wraps={}",
        counters.ticks,
        counters.active_count,
        counters.spawned_count,
        counters.recycled_count,
        counters.collision_count,
        counters.wrap_count
    );

    match serde_json::to_string_pretty(&sim.snapshot()) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to serialize snapshot: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The wasm build is used as a library; there is no standalone entry point.
}
