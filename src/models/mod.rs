//! Demand model implementations.
//!
//! Models are implemented as small, pure functions so that candidate generation
//! and any downstream charting share one definition.

pub mod demand;

pub use demand::*;
