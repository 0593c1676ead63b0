//! Input/output helpers.
//!
//! - CSV ingest + cleaning (`ingest`)
//! - price book and sales exports (CSV/JSON) (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
