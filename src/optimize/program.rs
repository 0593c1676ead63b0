//! A 0/1 selection program.
//!
//! ```text
//! maximize    Σ c_i x_i
//! subject to  Σ_{i ∈ G_k} x_i = 1     for every group G_k
//!             x_i ∈ {0, 1}
//! ```
//!
//! Price selection uses one variable per candidate and one group per SKU, but
//! nothing here knows about SKUs or prices. Solvers only see this shape.

use thiserror::Error;

/// Errors raised while building or solving a program.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    #[error("solver `{0}` is not available in this build")]
    Unavailable(&'static str),
    #[error("solver `{solver}` stopped with status {status}")]
    NotSolved { solver: &'static str, status: String },
    #[error("solver `{solver}` cannot handle this program: {reason}")]
    Unsupported { solver: &'static str, reason: String },
    #[error("invalid program: {0}")]
    InvalidProgram(String),
    #[error("no solver produced an assignment")]
    Exhausted,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionProgram {
    objective: Vec<f64>,
    groups: Vec<Vec<usize>>,
}

impl SelectionProgram {
    /// A program with one binary variable per objective coefficient and no constraints yet.
    pub fn new(objective: Vec<f64>) -> Self {
        Self {
            objective,
            groups: Vec::new(),
        }
    }

    /// Require exactly one of `members` to be selected. Returns the group index.
    pub fn exactly_one(&mut self, mut members: Vec<usize>) -> Result<usize, SolveError> {
        if members.is_empty() {
            return Err(SolveError::InvalidProgram(
                "an exactly-one group needs at least one member".to_string(),
            ));
        }
        if let Some(&bad) = members.iter().find(|&&i| i >= self.objective.len()) {
            return Err(SolveError::InvalidProgram(format!(
                "variable {bad} out of range for {} variables",
                self.objective.len()
            )));
        }
        members.sort_unstable();
        members.dedup();
        self.groups.push(members);
        Ok(self.groups.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.objective.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objective.is_empty()
    }

    pub fn objective(&self) -> &[f64] {
        &self.objective
    }

    pub fn groups(&self) -> &[Vec<usize>] {
        &self.groups
    }

    /// True when no variable belongs to more than one group.
    pub fn groups_are_disjoint(&self) -> bool {
        let mut seen = vec![false; self.objective.len()];
        for &i in self.groups.iter().flatten() {
            if std::mem::replace(&mut seen[i], true) {
                return false;
            }
        }
        true
    }

    /// Objective value of an assignment.
    pub fn objective_value(&self, assignment: &Assignment) -> f64 {
        assignment
            .selected()
            .iter()
            .filter_map(|&i| self.objective.get(i))
            .sum()
    }

    /// Whether an assignment satisfies every group constraint.
    pub fn is_feasible(&self, assignment: &Assignment) -> bool {
        self.groups.iter().all(|group| {
            group
                .iter()
                .filter(|&&i| assignment.is_selected(i))
                .count()
                == 1
        })
    }
}

/// The set of variables a solver set to 1.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignment {
    selected: Vec<usize>,
}

impl Assignment {
    pub fn new(mut selected: Vec<usize>) -> Self {
        selected.sort_unstable();
        selected.dedup();
        Self { selected }
    }

    pub fn selected(&self) -> &[usize] {
        &self.selected
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.binary_search(&index).is_ok()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}
