//! Mathematical utilities: least squares and price grids.

pub mod grid;
pub mod ols;

pub use grid::*;
pub use ols::*;
