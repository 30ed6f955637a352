//! Deterministic satellite marker simulation
//!
//! All marker animation state lives here. This module must stay pure and
//! deterministic:
//! - One advance pass per rendered frame, no per-marker callback chains
//! - Seeded RNG only (drift is the single stochastic input)
//! - No rendering or platform dependencies

pub mod satellite;
pub mod tick;

pub use satellite::{SatelliteMarker, SatelliteSpec};
pub use tick::advance;
