use std::io;

use crate::backend;
use crate::builder::CanBeAddedToModel;
use crate::constraint::Constraint;
use crate::error::Error;
use crate::param::Params;
use crate::solution::Solution;
use crate::status::Status;
use crate::variable::{VarId, VarType, Variable};
use crate::writer;

/// Tolerance used by [`Model::eq`].
const FEASTOL: f64 = 1e-6;

/// Represents an optimization model.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct Model<State> {
    pub(crate) prob: Problem,
    pub(crate) state: State,
}

/// The data of a model, independent of its stage.
#[derive(Debug, Clone)]
pub(crate) struct Problem {
    pub(crate) name: String,
    pub(crate) sense: ObjSense,
    pub(crate) obj_integral: bool,
    pub(crate) params: Params,
    pub(crate) vars: Vec<Variable>,
    pub(crate) conss: Vec<Constraint>,
}

/// Represents the state of an optimization model where the problem has been
/// created and variables and constraints can be added.
#[derive(Debug, Clone)]
pub struct ProblemCreated;

/// Represents the state of an optimization model that has been solved.
#[derive(Debug, Clone)]
pub struct Solved {
    status: Status,
    best_sol: Option<Solution>,
}

/// The direction of optimization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjSense {
    /// Minimize the objective.
    Minimize,
    /// Maximize the objective.
    Maximize,
}

impl Model<ProblemCreated> {
    /// Creates an empty minimization model using the given parameters.
    pub fn with_params(params: &Params) -> Self {
        Model {
            prob: Problem {
                name: "problem".to_string(),
                sense: ObjSense::Minimize,
                obj_integral: false,
                params: params.clone(),
                vars: Vec::new(),
                conss: Vec::new(),
            },
            state: ProblemCreated,
        }
    }

    /// Sets the objective sense of the model and returns the same `Model` instance.
    pub fn set_obj_sense(mut self, sense: ObjSense) -> Self {
        self.prob.sense = sense;
        self
    }

    /// Sets the objective sense to minimization.
    pub fn minimize(self) -> Self {
        self.set_obj_sense(ObjSense::Minimize)
    }

    /// Sets the objective sense to maximization.
    pub fn maximize(self) -> Self {
        self.set_obj_sense(ObjSense::Maximize)
    }

    /// Sets the name of the problem.
    pub fn set_name(mut self, name: &str) -> Self {
        self.prob.name = name.to_string();
        self
    }

    /// Informs the model that the objective value is always integral and returns the same
    /// `Model` instance.
    ///
    /// Integer models declared this way have their LP relaxation bound rounded and added as an
    /// objective cut before the integer search. The caller is responsible for the declaration
    /// being true: every variable with a non-zero objective coefficient must be integral and
    /// every such coefficient must be an integer.
    pub fn set_obj_integral(mut self) -> Self {
        self.prob.obj_integral = true;
        self
    }

    /// Adds a variable, a constraint, or a collection of either to the model.
    pub fn add<B: CanBeAddedToModel>(&mut self, builder: B) -> B::Return {
        builder.add(self)
    }

    /// Adds a new variable to the model with the given lower bound, upper bound, objective
    /// coefficient, name, and type.
    pub fn add_var(
        &mut self,
        lb: f64,
        ub: f64,
        obj: f64,
        name: &str,
        var_type: VarType,
    ) -> Variable {
        let var = Variable {
            id: self.prob.vars.len(),
            name: name.to_string(),
            var_type,
            lb,
            ub,
            obj,
        };
        self.prob.vars.push(var.clone());
        var
    }

    /// Adds a new linear constraint `lhs <= sum(coef * var) <= rhs` to the model.
    ///
    /// Variables are identified by their position in the model. A handle from another
    /// model whose position also exists here refers to this model's variable at that
    /// position; no check can tell the two apart.
    ///
    /// # Panics
    ///
    /// This method panics if a term references a position past the model's last variable.
    pub fn add_cons(
        &mut self,
        terms: Vec<(VarId, f64)>,
        lhs: f64,
        rhs: f64,
        name: &str,
    ) -> Constraint {
        let n_vars = self.prob.vars.len();
        assert!(
            terms.iter().all(|&(var, _)| var < n_vars),
            "constraint {name} references a variable outside of the model"
        );
        let cons = Constraint {
            index: self.prob.conss.len(),
            name: name.to_string(),
            lhs,
            rhs,
            terms,
        };
        self.prob.conss.push(cons.clone());
        cons
    }

    /// Returns the status of the model, which is always `Unknown` before solving.
    pub fn status(&self) -> Status {
        Status::Unknown
    }

    /// Solves the model and returns it in the `Solved` state.
    ///
    /// Infeasible and unbounded models are not errors: they are reported through
    /// [`Model::status`]. An error is returned only when the solver itself fails.
    pub fn solve(self) -> Result<Model<Solved>, Error> {
        let outcome = backend::solve(&self.prob)?;
        Ok(Model {
            prob: self.prob,
            state: Solved {
                status: outcome.status,
                best_sol: outcome.solution,
            },
        })
    }
}

impl Model<Solved> {
    /// Returns the status of the optimization run.
    pub fn status(&self) -> Status {
        self.state.status
    }

    /// Returns the best solution found, if one exists.
    pub fn best_sol(&self) -> Option<&Solution> {
        self.state.best_sol.as_ref()
    }

    /// Returns the number of solutions available, zero or one.
    pub fn n_sols(&self) -> usize {
        usize::from(self.state.best_sol.is_some())
    }

    /// Returns the objective value of the best solution, or the infinite value matching the
    /// objective sense when no solution exists.
    pub fn obj_val(&self) -> f64 {
        match (&self.state.best_sol, self.prob.sense) {
            (Some(sol), _) => sol.obj_val(),
            (None, ObjSense::Minimize) => f64::INFINITY,
            (None, ObjSense::Maximize) => f64::NEG_INFINITY,
        }
    }

    /// Returns the optimal solution, or [`Error::NotOptimal`] with the solve status.
    pub fn require_optimal(&self) -> Result<&Solution, Error> {
        match (&self.state.best_sol, self.state.status) {
            (Some(sol), Status::Optimal) => Ok(sol),
            (_, status) => Err(Error::NotOptimal(status)),
        }
    }

    /// Returns whether two values are equal within the feasibility tolerance.
    pub fn eq(&self, a: f64, b: f64) -> bool {
        (a - b).abs() <= FEASTOL * a.abs().max(b.abs()).max(1.0)
    }

    /// Drops the solve result and returns the model to the `ProblemCreated` state, where
    /// variables and constraints can be added before solving again.
    pub fn free_transform(self) -> Model<ProblemCreated> {
        Model {
            prob: self.prob,
            state: ProblemCreated,
        }
    }
}

/// A trait for optimization models with a problem created.
pub trait ModelWithProblem {
    /// Returns the name of the problem.
    fn name(&self) -> &str;

    /// Returns the objective sense.
    fn sense(&self) -> ObjSense;

    /// Returns all variables in the optimization model.
    fn vars(&self) -> &[Variable];

    /// Returns the variable with the given name, if it exists.
    fn var_by_name(&self, name: &str) -> Option<&Variable>;

    /// Returns the number of variables in the optimization model.
    fn n_vars(&self) -> usize;

    /// Returns the number of constraints in the optimization model.
    fn n_conss(&self) -> usize;

    /// Returns all constraints in the optimization model.
    fn conss(&self) -> &[Constraint];

    /// Writes the optimization model in LP format.
    fn write_lp(&self, out: &mut dyn io::Write) -> Result<(), Error>;

    /// Returns the optimization model in LP format.
    fn to_lp_string(&self) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = self.write_lp(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl<S> ModelWithProblem for Model<S> {
    fn name(&self) -> &str {
        &self.prob.name
    }

    fn sense(&self) -> ObjSense {
        self.prob.sense
    }

    fn vars(&self) -> &[Variable] {
        &self.prob.vars
    }

    fn var_by_name(&self, name: &str) -> Option<&Variable> {
        self.prob.vars.iter().find(|v| v.name == name)
    }

    fn n_vars(&self) -> usize {
        self.prob.vars.len()
    }

    fn n_conss(&self) -> usize {
        self.prob.conss.len()
    }

    fn conss(&self) -> &[Constraint] {
        &self.prob.conss
    }

    fn write_lp(&self, out: &mut dyn io::Write) -> Result<(), Error> {
        writer::write_lp(&self.prob, out)?;
        Ok(())
    }
}

/// Creates a model that skips the objective cut for integral objectives, useful for writing
/// tests that exercise the plain branch-and-bound path.
pub fn minimal_model() -> Model<ProblemCreated> {
    Model::with_params(&Params {
        tighten_integral_objective: false,
        ..Params::default()
    })
}

/// The default implementation for a `Model` instance in the `ProblemCreated` state.
impl Default for Model<ProblemCreated> {
    /// Creates a new minimization `Model` named "problem" with default parameters.
    fn default() -> Self {
        Model::with_params(&Params::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    fn create_model() -> (Model<ProblemCreated>, Variable, Variable) {
        let mut model = Model::default().set_name("test").maximize();
        let x1 = model.add(var().integer(0, isize::MAX).obj(3.).name("x1"));
        let x2 = model.add(var().integer(0, isize::MAX).obj(4.).name("x2"));
        model.add(
            cons()
                .name("c1")
                .coef(&x1, 2.)
                .coef(&x2, 1.)
                .le(100.),
        );
        model.add(
            cons()
                .name("c2")
                .coef(&x1, 1.)
                .coef(&x2, 2.)
                .le(80.),
        );
        (model, x1, x2)
    }

    #[test]
    fn solve_from_builders() {
        let (model, x1, x2) = create_model();
        assert_eq!(model.name(), "test");
        assert_eq!(model.n_vars(), 2);
        assert_eq!(model.n_conss(), 2);

        let solved = model.solve().unwrap();
        assert_eq!(solved.status(), Status::Optimal);
        assert!(solved.eq(solved.obj_val(), 200.));

        let sol = solved.best_sol().unwrap();
        assert!(solved.eq(sol.val(&x1), 40.));
        assert!(solved.eq(sol.val(&x2), 20.));
        assert_eq!(solved.n_sols(), 1);
    }

    #[test]
    fn continuous_lp_optimum() {
        let mut model = Model::default().maximize();
        let x = model.add(var().name("x").obj(1.));
        let y = model.add(var().name("y").obj(2.));
        model.add(cons().coef(&x, 2.).coef(&y, 1.).le(20.));
        model.add(cons().coef(&x, -4.).coef(&y, 5.).le(10.));
        model.add(cons().coef(&x, -1.).coef(&y, 2.).ge(-2.));

        let solved = model.solve().unwrap();
        let sol = solved.require_optimal().unwrap();
        assert!(solved.eq(sol.obj_val(), 145. / 7.));
        assert!(solved.eq(sol.val(&x), 45. / 7.));
        assert!(solved.eq(sol.val(&y), 50. / 7.));
    }

    #[test]
    fn range_constraint_binds_both_sides() {
        let mut model = Model::default().minimize();
        let x = model.add(var().name("x").obj(1.));
        model.add(cons().coef(&x, 1.).range(2., 5.));
        let solved = model.solve().unwrap();
        assert!(solved.eq(solved.obj_val(), 2.));

        let mut model = Model::default().maximize();
        let x = model.add(var().name("x").obj(1.));
        model.add(cons().coef(&x, 1.).range(2., 5.));
        let solved = model.solve().unwrap();
        assert!(solved.eq(solved.require_optimal().unwrap().val(&x), 5.));
    }

    #[test]
    fn obj_val_without_solution() {
        let mut model = Model::default().minimize();
        let x = model.add(var().continuous(0., 1.).obj(1.));
        model.add(cons().coef(&x, 1.).ge(3.));

        let solved = model.solve().unwrap();
        assert_eq!(solved.status(), Status::Infeasible);
        assert_eq!(solved.obj_val(), f64::INFINITY);
        assert_eq!(solved.n_sols(), 0);
        assert!(matches!(
            solved.require_optimal(),
            Err(Error::NotOptimal(Status::Infeasible))
        ));
    }

    #[test]
    fn integral_objective_cut_keeps_optimum() {
        let build = |model: Model<ProblemCreated>| {
            let mut model = model.minimize().set_obj_integral();
            let patterns =
                model.add((0..2).map(|i| var().nonneg_integer().obj(1.).name(format!("p{i}"))));
            model.add(cons().coef(&patterns[0], 3.).coef(&patterns[1], 1.).ge(7.));
            model.add(cons().coef(&patterns[0], 1.).coef(&patterns[1], 2.).ge(5.));
            model
        };

        let tightened = build(Model::default()).solve().unwrap();
        let plain = build(minimal_model()).solve().unwrap();
        assert_eq!(tightened.status(), Status::Optimal);
        assert!(tightened.eq(tightened.obj_val(), plain.obj_val()));
        assert!(tightened.eq(tightened.obj_val(), 4.));
    }

    #[test]
    fn free_transform_allows_resolving() {
        let (model, x1, _) = create_model();
        let solved = model.solve().unwrap();
        let mut model = solved.free_transform();
        assert_eq!(model.status(), Status::Unknown);

        model.add(cons().name("cap").coef(&x1, 1.).le(10.));
        let solved = model.solve().unwrap();
        assert_eq!(solved.status(), Status::Optimal);
        assert!(solved.eq(solved.best_sol().unwrap().val(&x1), 10.));
        assert!(solved.eq(solved.obj_val(), 170.));
    }

    #[test]
    fn var_lookup_by_name() {
        let (model, _, x2) = create_model();
        assert_eq!(model.var_by_name("x2"), Some(&x2));
        assert!(model.var_by_name("x3").is_none());
        assert_eq!(model.sense(), ObjSense::Maximize);
    }

    #[test]
    #[should_panic(expected = "outside of the model")]
    fn foreign_variable_panics() {
        let mut other = Model::default();
        other.add(var());
        let foreign = other.add(var());

        let mut model = Model::default();
        model.add(cons().coef(&foreign, 1.).le(1.));
    }

    #[test]
    fn handles_resolve_by_position() {
        let mut other = Model::default();
        let foreign = other.add(var().name("elsewhere"));

        let mut model = Model::default().maximize();
        let x = model.add(var().name("x").continuous(0., 3.).obj(1.));
        let row = model.add(cons().coef(&foreign, 1.).le(2.));
        assert_eq!(row.terms(), [(x.index(), 1.)]);

        let solved = model.solve().unwrap();
        assert!(solved.eq(solved.require_optimal().unwrap().val(&x), 2.));
    }

    #[test]
    fn eq_is_relative_for_large_values() {
        let (model, _, _) = create_model();
        let solved = model.solve().unwrap();
        assert!(solved.eq(1_000_000., 1_000_000.5));
        assert!(!solved.eq(1., 1.1));
    }
}
