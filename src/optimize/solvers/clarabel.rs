use clarabel::{algebra::*, solver::*};

use crate::optimize::program::{Assignment, SelectionProgram, SolveError};
use crate::optimize::solvers::Solver;

/// Values within this distance of the group maximum are treated as tied.
const TIE_TOLERANCE: f64 = 1e-6;

/// Solves the LP relaxation of a selection program with Clarabel.
///
/// The relaxation replaces `x ∈ {0, 1}` with `0 ≤ x ≤ 1`. For disjoint
/// exactly-one groups the constraint matrix is totally unimodular, so an
/// optimal vertex is integral. Interior-point methods can land in the middle of
/// an optimal face when several members tie, so each group is read back as its
/// largest relaxed value (ties: higher objective, then lower index).
pub struct ClarabelSolver(DefaultSettings<f64>);

impl Default for ClarabelSolver {
    fn default() -> Self {
        let mut settings = DefaultSettings::default();
        settings.verbose = false;
        Self(settings)
    }
}

impl Solver for ClarabelSolver {
    fn name(&self) -> &'static str {
        "clarabel"
    }

    fn solve(&self, program: &SelectionProgram) -> Result<Assignment, SolveError> {
        if program.is_empty() {
            return Ok(Assignment::default());
        }

        let n = program.len();
        let groups = program.groups();
        let ngroups = groups.len();

        // Row layout:
        //   [0, ngroups)              Σ_{i∈G} x_i = 1     (zero cone)
        //   [ngroups, ngroups + n)    -x_i + s = 0        (nonnegative cone, x ≥ 0)
        //   [ngroups + n, ngroups+2n) x_i + s = 1         (nonnegative cone, x ≤ 1)
        let mut membership: Vec<Vec<usize>> = vec![Vec::new(); n];
        for (g, members) in groups.iter().enumerate() {
            for &i in members {
                membership[i].push(g);
            }
        }

        let mut b = vec![1.0; ngroups];
        b.extend(std::iter::repeat_n(0.0, n));
        b.extend(std::iter::repeat_n(1.0, n));

        let mut cones = Vec::with_capacity(2);
        if ngroups > 0 {
            cones.push(ZeroConeT(ngroups));
        }
        cones.push(NonnegativeConeT(2 * n));

        // Clarabel's matrix input is CSC; row indices within a column must ascend.
        let mut a_colptr = Vec::with_capacity(n + 1);
        let mut a_rowval = Vec::new();
        let mut a_nzval = Vec::new();
        for (i, rows) in membership.iter().enumerate() {
            a_colptr.push(a_nzval.len());
            for &g in rows {
                a_rowval.push(g);
                a_nzval.push(1.0);
            }
            a_rowval.push(ngroups + i);
            a_nzval.push(-1.0);
            a_rowval.push(ngroups + n + i);
            a_nzval.push(1.0);
        }
        a_colptr.push(a_nzval.len());

        let a_matrix = CscMatrix {
            m: b.len(),
            n,
            colptr: a_colptr,
            rowval: a_rowval,
            nzval: a_nzval,
        };
        if a_matrix.check_format().is_err() {
            return Err(SolveError::InvalidProgram(
                "malformed constraint matrix".to_string(),
            ));
        }

        // Linear objective only; Clarabel minimizes so we negate.
        let p_matrix = CscMatrix {
            m: n,
            n,
            colptr: vec![0; n + 1],
            rowval: Vec::new(),
            nzval: Vec::new(),
        };
        let q: Vec<f64> = program.objective().iter().map(|c| -c).collect();

        let mut solver = DefaultSolver::new(&p_matrix, &q, &a_matrix, &b, &cones, self.0.clone());
        solver.solve();

        match solver.solution.status {
            SolverStatus::Solved | SolverStatus::AlmostSolved => {}
            status => {
                return Err(SolveError::NotSolved {
                    solver: self.name(),
                    status: format!("{status:?}"),
                });
            }
        }

        let x = &solver.solution.x;
        let objective = program.objective();
        let mut selected = Vec::with_capacity(ngroups);
        for members in groups {
            let mut best = members[0];
            for &i in &members[1..] {
                let (xi, xb) = (x[i], x[best]);
                if xi > xb + TIE_TOLERANCE
                    || ((xi - xb).abs() <= TIE_TOLERANCE && objective[i] > objective[best])
                {
                    best = i;
                }
            }
            selected.push(best);
        }

        // Variables outside every group only have their box bounds.
        for (i, rows) in membership.iter().enumerate() {
            if rows.is_empty() && x[i] > 0.5 {
                selected.push(i);
            }
        }

        Ok(Assignment::new(selected))
    }
}
