//! Demand curve fitting.
//!
//! Responsibilities:
//!
//! - group history by SKU
//! - fit a log-log regression per SKU (parallel)
//! - fall back to a fixed elasticity when history is too thin

pub mod elasticity;

pub use elasticity::*;
