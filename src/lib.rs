//! `price-optimizer` library crate.
//!
//! The binary (`priceopt`) is a thin wrapper around this library so that:
//!
//! - the pricing pipeline is testable without spawning processes
//! - it can be called directly with in-memory observations
//!   (`app::pipeline::run_pricing`), independent of any front-end

pub mod app;
pub mod baseline;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod optimize;
pub mod report;
