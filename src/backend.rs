//! Translation of a model into a `microlp` problem and back.

use microlp::{ComparisonOp, OptimizationDirection};
use tracing::debug;

use crate::constraint::Constraint;
use crate::error::Error;
use crate::model::{ObjSense, Problem};
use crate::solution::Solution;
use crate::status::Status;
use crate::variable::{VarId, VarType};

/// Status and solution of a solver run.
pub(crate) struct Outcome {
    pub(crate) status: Status,
    pub(crate) solution: Option<Solution>,
}

impl Outcome {
    fn without_solution(status: Status) -> Self {
        Outcome {
            status,
            solution: None,
        }
    }
}

pub(crate) fn solve(prob: &Problem) -> Result<Outcome, Error> {
    debug!(
        name = %prob.name,
        n_vars = prob.vars.len(),
        n_conss = prob.conss.len(),
        "solving model"
    );

    if prob.vars.is_empty() {
        return Ok(solve_empty(prob));
    }

    if let Some(cons) = prob.conss.iter().find(|c| is_empty(c) && !admits_zero(c)) {
        debug!(name = %cons.name, "constraint without terms excludes zero");
        return Ok(Outcome::without_solution(Status::Infeasible));
    }

    let has_integral = prob.vars.iter().any(|v| v.var_type.is_integral());
    let bounds = integer_bounds(prob);
    let contradictory = prob.vars.iter().zip(&bounds).find(|(_, (lb, ub))| lb > ub);
    if let Some((v, _)) = contradictory {
        debug!(var = %v.name, "variable bounds are contradictory");
        return Ok(Outcome::without_solution(Status::Infeasible));
    }
    let mut objective_cut = None;
    if prob.obj_integral && prob.params.tighten_integral_objective && has_integral {
        let (relaxation, _) = build(prob, &bounds, true, None);
        match relaxation.solve() {
            Ok(relaxed) => {
                let bound = relaxed.objective();
                let tol = prob.params.int_tolerance;
                let rounded = match prob.sense {
                    ObjSense::Minimize => (bound - tol).ceil(),
                    ObjSense::Maximize => (bound + tol).floor(),
                };
                debug!(bound, rounded, "objective cut from LP relaxation");
                objective_cut = Some(rounded);
            }
            Err(microlp::Error::Infeasible) => {
                debug!("LP relaxation is infeasible");
                return Ok(Outcome::without_solution(Status::Infeasible));
            }
            // the integer search settles unboundedness on its own
            Err(microlp::Error::Unbounded) => {}
            Err(microlp::Error::InternalError(msg)) => return Err(Error::Solver(msg)),
        }
    }

    let (problem, vars) = build(prob, &bounds, false, objective_cut);
    let outcome = match problem.solve() {
        Ok(sol) => {
            let solution = extract(prob, &vars, &sol);
            debug!(obj_val = solution.obj_val, "optimal solution found");
            Outcome {
                status: Status::Optimal,
                solution: Some(solution),
            }
        }
        Err(microlp::Error::InternalError(msg)) => return Err(Error::Solver(msg)),
        Err(err) => {
            debug!(%err, "no solution");
            Outcome::without_solution(Status::from(&err))
        }
    };
    Ok(outcome)
}

/// Builds the solver problem with the given variable bounds, optionally dropping integrality
/// and adding an objective cut.
fn build(
    prob: &Problem,
    bounds: &[(f64, f64)],
    relax: bool,
    objective_cut: Option<f64>,
) -> (microlp::Problem, Vec<microlp::Variable>) {
    let direction = match prob.sense {
        ObjSense::Minimize => OptimizationDirection::Minimize,
        ObjSense::Maximize => OptimizationDirection::Maximize,
    };
    let mut problem = microlp::Problem::new(direction);

    let vars: Vec<microlp::Variable> = prob
        .vars
        .iter()
        .zip(bounds)
        .map(|(v, &(lb, ub))| match (relax, v.var_type) {
            (false, VarType::Binary) => problem.add_binary_var(v.obj),
            // float to int casts saturate, so bounds still infinite become i32::MIN / i32::MAX
            (false, VarType::Integer) => {
                problem.add_integer_var(v.obj, (lb.ceil() as i32, ub.floor() as i32))
            }
            (true, VarType::Binary) => problem.add_var(v.obj, (0.0, 1.0)),
            _ => problem.add_var(v.obj, (lb, ub)),
        })
        .collect();

    for cons in &prob.conss {
        add_cons(&mut problem, &vars, cons);
    }

    if let Some(rhs) = objective_cut {
        let expr: Vec<(microlp::Variable, f64)> = prob
            .vars
            .iter()
            .filter(|v| v.obj != 0.0)
            .map(|v| (vars[v.id], v.obj))
            .collect();
        if !expr.is_empty() {
            let op = match prob.sense {
                ObjSense::Minimize => ComparisonOp::Ge,
                ObjSense::Maximize => ComparisonOp::Le,
            };
            problem.add_constraint(expr, op, rhs);
        }
    }

    (problem, vars)
}

/// One side of a constraint written as `sum(coef * var) <= rhs`.
struct Side {
    terms: Vec<(VarId, f64)>,
    rhs: f64,
}

fn sides(cons: &Constraint) -> impl Iterator<Item = Side> + '_ {
    let terms = || -> Vec<(VarId, f64)> {
        cons.terms
            .iter()
            .copied()
            .filter(|&(_, coef)| coef != 0.0)
            .collect()
    };
    let upper = cons.rhs.is_finite().then(|| Side {
        terms: terms(),
        rhs: cons.rhs,
    });
    let lower = cons.lhs.is_finite().then(|| Side {
        terms: terms().into_iter().map(|(var, coef)| (var, -coef)).collect(),
        rhs: -cons.lhs,
    });
    upper.into_iter().chain(lower)
}

/// Sum of `coef * var` over the side's terms except `skip`, each term at its smallest
/// (`largest == false`) or largest value within `bounds`.
fn extreme_activity(side: &Side, skip: VarId, bounds: &[(f64, f64)], largest: bool) -> f64 {
    side.terms
        .iter()
        .filter(|&&(var, _)| var != skip)
        .map(|&(var, coef)| {
            let (lb, ub) = bounds[var];
            if (coef > 0.0) == largest {
                coef * ub
            } else {
                coef * lb
            }
        })
        .sum()
}

/// Variable bounds handed to the solver, with finite upper bounds for integer variables
/// declared without one.
///
/// The branch-and-bound search of microlp misses optima when integer domains reach
/// `i32::MAX`. Rows first bound every feasible point: `a * x <= rhs - (smallest activity of
/// the other terms)` for `a > 0`. A variable still unbounded whose decrease never worsens
/// the objective is then capped where every row side it could violate by decreasing holds
/// on its own, which keeps at least one optimal point.
fn integer_bounds(prob: &Problem) -> Vec<(f64, f64)> {
    let tol = prob.params.int_tolerance;
    let mut bounds: Vec<(f64, f64)> = prob.vars.iter().map(|v| (v.lb, v.ub)).collect();
    let open = |bounds: &[(f64, f64)], var: VarId| {
        prob.vars[var].var_type.is_integral() && bounds[var].1.is_infinite()
    };
    let derived: Vec<bool> = (0..bounds.len()).map(|var| open(&bounds, var)).collect();
    if !derived.contains(&true) {
        return bounds;
    }
    let sides: Vec<Side> = prob.conss.iter().flat_map(sides).collect();

    // each round can make further activities finite
    for _ in 0..bounds.len() {
        let mut changed = false;
        for side in &sides {
            for &(var, coef) in &side.terms {
                if coef <= 0.0 || !derived[var] {
                    continue;
                }
                let rest = extreme_activity(side, var, &bounds, false);
                if !rest.is_finite() {
                    continue;
                }
                let ub = ((side.rhs - rest) / coef + tol).floor();
                if ub < bounds[var].1 {
                    bounds[var].1 = ub;
                    changed = true;
                }
            }
        }
        if !changed {
            break;
        }
    }

    for var in 0..bounds.len() {
        if !open(&bounds, var) || bounds[var].0.is_infinite() {
            continue;
        }
        let obj = prob.vars[var].obj;
        let decrease_helps = match prob.sense {
            ObjSense::Minimize => obj >= 0.0,
            ObjSense::Maximize => obj <= 0.0,
        };
        if decrease_helps {
            bounds[var].1 = decrease_cap(&sides, var, &bounds, tol);
        }
    }

    for (v, &(_, ub)) in prob.vars.iter().zip(&bounds) {
        if v.var_type.is_integral() && ub.is_infinite() {
            debug!(var = %v.name, "no finite upper bound for integer variable");
        }
    }
    bounds
}

/// Smallest value down to which `var` can be lowered from any larger value without violating
/// a row side, whatever the other variables are. Infinite when some side has no such value.
fn decrease_cap(sides: &[Side], var: VarId, bounds: &[(f64, f64)], tol: f64) -> f64 {
    let mut cap = bounds[var].0;
    for side in sides {
        let Some(&(_, coef)) = side.terms.iter().find(|&&(v, _)| v == var) else {
            continue;
        };
        if coef > 0.0 {
            continue;
        }
        let rest = extreme_activity(side, var, bounds, true);
        if !rest.is_finite() {
            return f64::INFINITY;
        }
        // coef * x + rest <= rhs for every x from here on
        cap = cap.max(((side.rhs - rest) / coef - tol).ceil());
    }
    cap
}

fn is_empty(cons: &Constraint) -> bool {
    cons.terms.iter().all(|(_, coef)| *coef == 0.0)
}

fn admits_zero(cons: &Constraint) -> bool {
    cons.lhs <= 0.0 && 0.0 <= cons.rhs
}

fn add_cons(problem: &mut microlp::Problem, vars: &[microlp::Variable], cons: &Constraint) {
    if is_empty(cons) {
        return;
    }
    let expr = || -> Vec<(microlp::Variable, f64)> {
        cons.terms
            .iter()
            .filter(|(_, coef)| *coef != 0.0)
            .map(|&(var, coef)| (vars[var], coef))
            .collect()
    };

    match (cons.lhs.is_finite(), cons.rhs.is_finite()) {
        (true, true) if cons.lhs == cons.rhs => {
            problem.add_constraint(expr(), ComparisonOp::Eq, cons.rhs)
        }
        (true, true) => {
            problem.add_constraint(expr(), ComparisonOp::Ge, cons.lhs);
            problem.add_constraint(expr(), ComparisonOp::Le, cons.rhs);
        }
        (true, false) => problem.add_constraint(expr(), ComparisonOp::Ge, cons.lhs),
        (false, true) => problem.add_constraint(expr(), ComparisonOp::Le, cons.rhs),
        (false, false) => {}
    }
}

/// Reads variable values back, snapping integral variables to the nearest integer.
fn extract(prob: &Problem, vars: &[microlp::Variable], sol: &microlp::Solution) -> Solution {
    let tol = prob.params.int_tolerance;
    let values: Vec<f64> = prob
        .vars
        .iter()
        .zip(vars)
        .map(|(v, &var)| {
            let val = *sol.var_value(var);
            let rounded = val.round();
            let val = if v.var_type.is_integral() && (val - rounded).abs() <= tol {
                rounded
            } else {
                val
            };
            // normalize -0.0
            val + 0.0
        })
        .collect();

    let obj_val = prob
        .vars
        .iter()
        .zip(&values)
        .map(|(v, val)| v.obj * val)
        .sum();

    Solution {
        values,
        names: prob.vars.iter().map(|v| v.name.clone()).collect(),
        obj_val,
    }
}

/// A model without variables is optimal with objective zero when every constraint admits zero.
fn solve_empty(prob: &Problem) -> Outcome {
    if !prob.conss.iter().all(admits_zero) {
        return Outcome::without_solution(Status::Infeasible);
    }
    Outcome {
        status: Status::Optimal,
        solution: Some(Solution {
            values: Vec::new(),
            names: Vec::new(),
            obj_val: 0.0,
        }),
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn empty_model_is_optimal() {
        let solved = Model::default().solve().unwrap();
        assert_eq!(solved.status(), Status::Optimal);
        assert_eq!(solved.obj_val(), 0.0);
    }

    #[test]
    fn empty_model_with_violated_constant_constraint() {
        let mut model = Model::default();
        model.add(cons().ge(1.0));
        let solved = model.solve().unwrap();
        assert_eq!(solved.status(), Status::Infeasible);
    }

    #[test]
    fn constraint_without_terms() {
        let mut model = Model::default().minimize();
        let x = model.add(var().continuous(0.0, 1.0).obj(1.0));
        model.add(cons().coef(&x, 0.0).le(1.0));
        assert_eq!(model.clone().solve().unwrap().status(), Status::Optimal);

        model.add(cons().name("never").eq(1.0));
        assert_eq!(model.solve().unwrap().status(), Status::Infeasible);
    }

    #[test]
    fn integral_values_are_snapped() {
        let mut model = Model::default().maximize();
        let x = model.add(var().integer(0, 10).obj(1.0));
        let y = model.add(var().integer(0, 10).obj(1.0));
        model.add(cons().coef(&x, 3.0).coef(&y, 7.0).le(22.0));

        let solved = model.solve().unwrap();
        let sol = solved.require_optimal().unwrap();
        assert_eq!(sol.val(&x), sol.val(&x).round());
        assert_eq!(sol.val(&y), sol.val(&y).round());
        assert_eq!(sol.obj_val(), 7.0);
    }

    #[test]
    fn infeasible_relaxation_short_circuits() {
        let mut model = Model::default().minimize().set_obj_integral();
        let x = model.add(var().integer(0, 5).obj(1.0));
        model.add(cons().coef(&x, 1.0).ge(6.0));
        let solved = model.solve().unwrap();
        assert_eq!(solved.status(), Status::Infeasible);
    }

    fn without_cut() -> Params {
        Params {
            tighten_integral_objective: false,
            ..Params::default()
        }
    }

    #[test]
    fn unbounded_integers_take_the_tightest_row_bound() {
        let mut model = Model::with_params(&without_cut()).maximize();
        let a = model.add(var().name("a").nonneg_integer().obj(50.0));
        let b = model.add(var().name("b").nonneg_integer().obj(40.0));
        model.add(cons().coef(&a, 2.0).coef(&b, 3.0).le(12.0));
        model.add(cons().coef(&a, 3.0).coef(&b, 2.0).le(10.0));
        assert_eq!(
            super::integer_bounds(&model.prob),
            vec![(0.0, 3.0), (0.0, 4.0)]
        );

        let solved = model.solve().unwrap();
        let sol = solved.require_optimal().unwrap();
        assert_eq!(sol.obj_val(), 180.0);
        assert_eq!((sol.val(&a), sol.val(&b)), (2.0, 2.0));
    }

    #[test]
    fn covering_rows_cap_integers_that_only_cost() {
        let mut model = Model::with_params(&without_cut()).minimize();
        let x = model.add(var().nonneg_integer().obj(1.0));
        let y = model.add(var().nonneg_integer().obj(1.0));
        model.add(cons().coef(&x, 3.0).coef(&y, 2.0).ge(25.0));
        assert_eq!(
            super::integer_bounds(&model.prob),
            vec![(0.0, 9.0), (0.0, 13.0)]
        );

        let solved = model.solve().unwrap();
        assert_eq!(solved.obj_val(), 9.0);
    }

    #[test]
    fn profitable_integers_without_rows_stay_unbounded() {
        let mut model = Model::default().maximize();
        model.add(var().nonneg_integer().obj(1.0));
        let bounds = super::integer_bounds(&model.prob);
        assert_eq!(bounds[0].0, 0.0);
        assert!(bounds[0].1.is_infinite());
    }

    #[test]
    fn continuous_bounds_are_untouched() {
        let mut model = Model::default().maximize();
        let x = model.add(var().obj(1.0));
        let n = model.add(var().nonneg_integer().obj(1.0));
        model.add(cons().coef(&x, 1.0).coef(&n, 1.0).le(4.5));
        let bounds = super::integer_bounds(&model.prob);
        assert_eq!(bounds, vec![(0.0, f64::INFINITY), (0.0, 4.0)]);
    }

    #[test]
    fn integer_infeasible_but_relaxation_feasible() {
        let mut model = Model::default().minimize();
        let x = model.add(var().integer(0, 10).obj(1.0));
        model.add(cons().coef(&x, 2.0).eq(3.0));
        let solved = model.solve().unwrap();
        assert_eq!(solved.status(), Status::Infeasible);
    }
}
