//! Solver implementations for `SelectionProgram`.

use tracing::{debug, warn};

use crate::domain::SolverKind;
use crate::optimize::program::{Assignment, SelectionProgram, SolveError};

mod enumeration;
pub use enumeration::EnumerationSolver;

/// Implementation using the Clarabel interior point solver
#[cfg(feature = "clarabel")]
mod clarabel;
#[cfg(feature = "clarabel")]
pub use self::clarabel::ClarabelSolver;

/// The interface every selection solver implements.
///
/// A solver returns the variables it set to 1, or an error if it could not
/// produce an answer. Callers decide what to do when an answer is missing.
pub trait Solver: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    fn solve(&self, program: &SelectionProgram) -> Result<Assignment, SolveError>;
}

/// Tries solvers in order and returns the first successful assignment.
pub struct SolverChain {
    solvers: Vec<Box<dyn Solver>>,
}

impl SolverChain {
    pub fn new(solvers: Vec<Box<dyn Solver>>) -> Self {
        Self { solvers }
    }

    /// Build the chain for a configured solver choice.
    ///
    /// `Auto` prefers Clarabel and keeps enumeration as the bundled fallback.
    /// Asking for Clarabel in a build without it degrades to enumeration.
    pub fn for_kind(kind: SolverKind) -> Self {
        let mut solvers: Vec<Box<dyn Solver>> = Vec::new();
        match kind {
            SolverKind::Auto => {
                #[cfg(feature = "clarabel")]
                solvers.push(Box::new(ClarabelSolver::default()));
                solvers.push(Box::new(EnumerationSolver));
            }
            SolverKind::Clarabel => {
                #[cfg(feature = "clarabel")]
                solvers.push(Box::new(ClarabelSolver::default()));
                #[cfg(not(feature = "clarabel"))]
                {
                    warn!("clarabel support not compiled in; using enumeration");
                    solvers.push(Box::new(EnumerationSolver));
                }
            }
            SolverKind::Enumeration => solvers.push(Box::new(EnumerationSolver)),
        }
        Self { solvers }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.solvers.iter().map(|s| s.name()).collect()
    }
}

impl Default for SolverChain {
    fn default() -> Self {
        Self::for_kind(SolverKind::Auto)
    }
}

impl Solver for SolverChain {
    fn name(&self) -> &'static str {
        "chain"
    }

    fn solve(&self, program: &SelectionProgram) -> Result<Assignment, SolveError> {
        for solver in &self.solvers {
            match solver.solve(program) {
                Ok(assignment) => {
                    debug!(solver = solver.name(), selected = assignment.selected().len(), "solved");
                    return Ok(assignment);
                }
                Err(err) => warn!(solver = solver.name(), error = %err, "solver failed; trying next"),
            }
        }
        Err(SolveError::Exhausted)
    }
}
