//! Simulation core
//!
//! Everything that decides outcomes lives here and stays deterministic for a
//! given seed:
//! - Randomness only through an injected `Rng`
//! - Stable iteration order (spinners sorted by id)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod events;
pub mod geometry;
pub mod integrate;
pub mod rng;
pub mod state;
pub mod telemetry;
pub mod tick;

pub use collision::resolve;
pub use events::{CollisionEvent, ImpactSource, SimEvent};
pub use integrate::{DriveStrategy, integrate};
pub use rng::{ConstRng, RngState};
pub use state::{Arena, Elimination, Fate, Spinner};
pub use telemetry::{
    NoTelemetry, PhysicalConstants, Regime, Telemetry, TelemetryBook, TelemetrySource,
    derive_spinner,
};
pub use tick::{Match, MatchPhase};
