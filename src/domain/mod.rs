//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - cleaned sales observations (`Observation`)
//! - the per-SKU tables each stage produces (`BaselineRow`, `ElasticityRow`,
//!   `Candidate`, `ChosenPrice`, `ReportRow`)
//! - run configuration (`PricingConstraints`, `PricingConfig`, `SampleConfig`)

pub mod types;

pub use types::*;
