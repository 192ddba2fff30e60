//! Deterministic simulation module
//!
//! Everything that moves entities lives here. Given a seed and the same
//! sequence of ticks and inputs, a run is reproducible:
//! - Seeded RNG only
//! - Stable iteration order (ascending slot index)
//! - No rendering or platform dependencies

pub mod body;
pub mod boundary;
pub mod collision;
pub mod pool;
pub mod rng;
pub mod spawn;
pub mod state;
pub mod tick;

pub use body::{PhysicsBody, integrate};
pub use boundary::{BoundaryOutcome, BoundaryPolicy, Bounds};
pub use collision::{
    CollisionEvent, CollisionResolver, Contact, DriftCorrection, circle_contact, reflect_velocity,
    resolve_contact,
};
pub use pool::{EntityPool, Handle, NoopObserver, PoolExhausted, PoolObserver};
pub use rng::SeededRng;
pub use spawn::{
    PositionRecipe, RadiusRecipe, SpawnOutcome, SpawnPattern, SpawnScheduler, VelocityRecipe,
};
pub use state::{BodyView, Counters, Simulation, Snapshot};
pub use tick::{TickInput, advance, tick};
