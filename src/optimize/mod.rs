//! Profit optimization over discrete candidate prices.
//!
//! - `candidates`: feasible price grid per SKU with projected demand and profit
//! - `program`: the generic 0/1 exactly-one selection program
//! - `solvers`: interchangeable solvers for that program
//! - `selector`: wires candidates, program and solver into a chosen-price table

pub mod candidates;
pub mod program;
pub mod selector;
pub mod solvers;

pub use candidates::*;
pub use program::*;
pub use selector::*;
pub use solvers::*;
