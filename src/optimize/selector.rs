//! Price selection: exactly one candidate per SKU, maximizing total profit.
//!
//! The candidate table is turned into a `SelectionProgram` (one variable per
//! candidate, one exactly-one group per SKU) and handed to a `Solver`. Any SKU
//! the solver leaves without a pick is priced at its baseline, so a non-empty
//! candidate table always yields a complete chosen table.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info, warn};

use crate::domain::{BaselineRow, Candidate, ChosenPrice, ElasticityRow, PricingConstraints};
use crate::optimize::candidates::generate_candidates;
use crate::optimize::program::{Assignment, SelectionProgram, SolveError};
use crate::optimize::solvers::Solver;

/// A selection program together with the SKU each group belongs to.
#[derive(Debug, Clone)]
pub struct PricingProgram {
    pub program: SelectionProgram,
    /// `skus[g]` owns group `g` of `program`.
    pub skus: Vec<String>,
}

/// Build the selection program for a candidate table.
///
/// Groups are created in order of first appearance of each SKU.
pub fn build_program(candidates: &[Candidate]) -> Result<PricingProgram, SolveError> {
    let mut skus: Vec<String> = Vec::new();
    let mut members: Vec<Vec<usize>> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for (i, c) in candidates.iter().enumerate() {
        let g = *index.entry(c.sku.as_str()).or_insert_with(|| {
            skus.push(c.sku.clone());
            members.push(Vec::new());
            skus.len() - 1
        });
        members[g].push(i);
    }

    let mut program = SelectionProgram::new(candidates.iter().map(|c| c.predicted_profit).collect());
    for group in members {
        program.exactly_one(group)?;
    }

    Ok(PricingProgram { program, skus })
}

/// Keep the current price for every SKU.
pub fn baseline_fallback(baseline: &[BaselineRow]) -> Vec<ChosenPrice> {
    baseline.iter().map(baseline_choice).collect()
}

fn baseline_choice(base: &BaselineRow) -> ChosenPrice {
    ChosenPrice {
        sku: base.sku.clone(),
        opt_price: base.base_price,
        opt_qty: base.base_units,
        opt_profit: base.base_profit(),
    }
}

/// Choose one price per SKU in `candidates`.
///
/// Returns an empty table for an empty candidate table. SKUs for which the
/// solver selected nothing (including a failed solve) get their baseline price.
pub fn select_prices(
    candidates: &[Candidate],
    baseline: &[BaselineRow],
    solver: &dyn Solver,
) -> Vec<ChosenPrice> {
    if candidates.is_empty() {
        return Vec::new();
    }

    let PricingProgram { program, skus } = match build_program(candidates) {
        Ok(built) => built,
        Err(err) => {
            warn!(error = %err, "could not build selection program; keeping baseline prices");
            let priced: HashSet<&str> = candidates.iter().map(|c| c.sku.as_str()).collect();
            return baseline_fallback(baseline)
                .into_iter()
                .filter(|c| priced.contains(c.sku.as_str()))
                .collect();
        }
    };
    let assignment = match solver.solve(&program) {
        Ok(assignment) => assignment,
        Err(err) => {
            warn!(solver = solver.name(), error = %err, "price selection failed");
            Assignment::default()
        }
    };
    if !assignment.is_empty() && !program.is_feasible(&assignment) {
        warn!(solver = solver.name(), "assignment breaks exactly-one groups; using first pick per SKU");
    }
    debug!(objective = program.objective_value(&assignment), "solved selection program");

    let base_by_sku: HashMap<&str, &BaselineRow> =
        baseline.iter().map(|b| (b.sku.as_str(), b)).collect();

    let mut chosen = Vec::with_capacity(skus.len());
    let mut fallbacks = 0usize;
    for (sku, group) in skus.iter().zip(program.groups()) {
        match group.iter().find(|&&i| assignment.is_selected(i)) {
            Some(&i) => {
                let c = &candidates[i];
                chosen.push(ChosenPrice {
                    sku: c.sku.clone(),
                    opt_price: c.price,
                    opt_qty: c.predicted_qty,
                    opt_profit: c.predicted_profit,
                });
            }
            None => match base_by_sku.get(sku.as_str()) {
                Some(base) => {
                    fallbacks += 1;
                    chosen.push(baseline_choice(base));
                }
                None => warn!(sku = %sku, "no selection and no baseline; SKU dropped"),
            },
        }
    }

    if fallbacks > 0 {
        warn!(
            fallbacks,
            skus = skus.len(),
            "solver left SKUs unassigned; kept baseline prices"
        );
    }
    chosen
}

/// Generate candidates and select prices in one step.
pub fn optimize_prices(
    baseline: &[BaselineRow],
    elasticities: &[ElasticityRow],
    constraints: &PricingConstraints,
    solver: &dyn Solver,
) -> Vec<ChosenPrice> {
    let candidates = generate_candidates(baseline, elasticities, constraints);
    let chosen = select_prices(&candidates, baseline, solver);

    let total: f64 = chosen.iter().map(|c| c.opt_profit).sum();
    info!(
        skus = chosen.len(),
        candidates = candidates.len(),
        projected_profit = total,
        "selected prices"
    );
    chosen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimize::solvers::EnumerationSolver;

    struct Nothing;

    impl Solver for Nothing {
        fn name(&self) -> &'static str {
            "nothing"
        }

        fn solve(&self, _program: &SelectionProgram) -> Result<Assignment, SolveError> {
            Ok(Assignment::default())
        }
    }

    fn cand(sku: &str, price: f64, profit: f64) -> Candidate {
        Candidate {
            sku: sku.into(),
            price,
            predicted_qty: 1.0,
            predicted_profit: profit,
        }
    }

    fn base(sku: &str, price: f64, units: f64, cost: f64) -> BaselineRow {
        BaselineRow {
            sku: sku.into(),
            base_price: price,
            base_units: units,
            cost,
        }
    }

    #[test]
    fn program_groups_by_sku() {
        let cands = vec![cand("A", 1.0, 1.0), cand("B", 1.0, 1.0), cand("A", 2.0, 1.0)];
        let PricingProgram { program, skus } = build_program(&cands).unwrap();
        assert_eq!(skus, vec!["A", "B"]);
        assert_eq!(program.groups(), &[vec![0, 2], vec![1]]);
    }

    #[test]
    fn every_candidate_lands_in_exactly_one_group() {
        let cands: Vec<Candidate> = (0..30)
            .map(|i| cand(["A", "B", "C"][i % 3], i as f64, (i * 7 % 11) as f64))
            .collect();
        let PricingProgram { program, skus } = build_program(&cands).unwrap();

        assert_eq!(skus.len(), 3);
        assert_eq!(program.groups().len(), skus.len());
        assert!(program.groups_are_disjoint());
        let covered: usize = program.groups().iter().map(Vec::len).sum();
        assert_eq!(covered, cands.len());
        for (sku, group) in skus.iter().zip(program.groups()) {
            assert!(group.iter().all(|&i| &cands[i].sku == sku));
        }
    }

    #[test]
    fn picks_the_most_profitable_candidate() {
        let cands = vec![cand("A", 8.0, 5.0), cand("A", 9.0, 12.0), cand("A", 10.0, 3.0)];
        let chosen = select_prices(&cands, &[], &EnumerationSolver);
        assert_eq!(chosen.len(), 1);
        assert_eq!(chosen[0].opt_profit, 12.0);
        assert_eq!(chosen[0].opt_price, 9.0);
    }

    #[test]
    fn empty_solve_falls_back_to_baseline() {
        let cands = vec![cand("A", 8.0, 5.0), cand("B", 3.0, 1.0)];
        let baseline = vec![base("A", 10.0, 100.0, 6.0), base("B", 4.0, 10.0, 1.0)];

        let chosen = select_prices(&cands, &baseline, &Nothing);
        assert_eq!(chosen, baseline_fallback(&baseline));
        assert_eq!(chosen[0].opt_profit, 400.0);
        assert_eq!(chosen[1].opt_price, 4.0);
        assert_eq!(chosen[1].opt_profit, 30.0);
    }

    #[test]
    fn empty_candidates_give_empty_table() {
        assert!(select_prices(&[], &[base("A", 1.0, 1.0, 0.5)], &Nothing).is_empty());
    }
}
