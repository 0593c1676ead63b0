use crate::optimize::program::{Assignment, SelectionProgram, SolveError};
use crate::optimize::solvers::Solver;

/// Exact solver for programs whose groups do not overlap.
///
/// With disjoint exactly-one groups the optimum decomposes: each group picks its
/// highest-objective member independently (ties go to the lowest index), and
/// ungrouped variables are selected when their coefficient is positive.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnumerationSolver;

impl Solver for EnumerationSolver {
    fn name(&self) -> &'static str {
        "enumeration"
    }

    fn solve(&self, program: &SelectionProgram) -> Result<Assignment, SolveError> {
        if !program.groups_are_disjoint() {
            return Err(SolveError::Unsupported {
                solver: self.name(),
                reason: "groups share variables".to_string(),
            });
        }

        let objective = program.objective();
        let mut grouped = vec![false; objective.len()];
        let mut selected = Vec::with_capacity(program.groups().len());

        for group in program.groups() {
            let mut best = group[0];
            for &i in &group[1..] {
                // Strict comparison keeps the lowest index on ties.
                if objective[i] > objective[best] {
                    best = i;
                }
            }
            if !objective[best].is_finite() {
                return Err(SolveError::InvalidProgram(format!(
                    "non-finite objective coefficient at variable {best}"
                )));
            }
            selected.push(best);
            for &i in group {
                grouped[i] = true;
            }
        }

        selected.extend(
            objective
                .iter()
                .enumerate()
                .filter(|&(i, &c)| !grouped[i] && c > 0.0)
                .map(|(i, _)| i),
        );

        Ok(Assignment::new(selected))
    }
}
