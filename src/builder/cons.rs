use crate::builder::CanBeAddedToModel;
use crate::{Constraint, Model, ModelWithProblem, ProblemCreated, VarId, Variable};

/// A builder for creating linear constraints.
#[derive(Debug, Clone)]
pub struct ConsBuilder {
    /// Left-hand side of constraint
    pub(crate) lhs: f64,
    /// Right-hand side of constraint
    pub(crate) rhs: f64,
    /// (Optional) name of constraint
    pub(crate) name: Option<String>,
    /// Coefficients of constraint
    pub(crate) coefs: Vec<(VarId, f64)>,
}

/// Creates a new default `ConsBuilder`.
pub fn cons() -> ConsBuilder {
    ConsBuilder::default()
}

impl Default for ConsBuilder {
    fn default() -> Self {
        ConsBuilder {
            lhs: f64::NEG_INFINITY,
            rhs: f64::INFINITY,
            name: None,
            coefs: Vec::new(),
        }
    }
}

impl ConsBuilder {
    /// Creates a constraint of the form `expr <= val`.
    pub fn le(mut self, val: f64) -> Self {
        self.rhs = val;
        self.lhs = f64::NEG_INFINITY;
        self
    }

    /// Creates a constraint of the form `val <= expr`.
    pub fn ge(mut self, val: f64) -> Self {
        self.lhs = val;
        self.rhs = f64::INFINITY;
        self
    }

    /// Creates a constraint of the form `expr = val`.
    pub fn eq(mut self, val: f64) -> Self {
        self.lhs = val;
        self.rhs = val;
        self
    }

    /// Creates a constraint of the form `lo <= expr <= hi`.
    pub fn range(mut self, lo: f64, hi: f64) -> Self {
        self.lhs = lo;
        self.rhs = hi;
        self
    }

    /// Sets the name of the constraint.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Adds a coefficient to the constraint.
    ///
    /// `var` must come from the model the constraint is added to; see
    /// [`Model::add_cons`](crate::Model::add_cons).
    pub fn coef(mut self, var: &Variable, coef: f64) -> Self {
        self.coefs.push((var.id, coef));
        self
    }

    /// Adds multiple coefficients to the constraint.
    pub fn coefs(mut self, var_refs: Vec<&Variable>, vals: Vec<f64>) -> Self {
        self.coefs
            .extend(var_refs.into_iter().map(|v| v.id).zip(vals));
        self
    }

    /// Adds multiple coefficients to the constraint.
    pub fn expr<'v, I>(mut self, iter: I) -> Self
    where
        I: IntoIterator<Item = (&'v Variable, f64)>,
    {
        self.coefs
            .extend(iter.into_iter().map(|(var, coef)| (var.id, coef)));
        self
    }

    /// Sums coefficients of repeated variables, keeping first-occurrence order.
    fn merged_coefs(&self) -> Vec<(VarId, f64)> {
        let mut merged: Vec<(VarId, f64)> = Vec::with_capacity(self.coefs.len());
        for &(var, coef) in &self.coefs {
            match merged.iter_mut().find(|(v, _)| *v == var) {
                Some((_, acc)) => *acc += coef,
                None => merged.push((var, coef)),
            }
        }
        merged
    }
}

impl CanBeAddedToModel for ConsBuilder {
    type Return = Constraint;
    fn add(self, model: &mut Model<ProblemCreated>) -> Self::Return {
        let terms = self.merged_coefs();
        let name = self
            .name
            .unwrap_or_else(|| format!("cons{}", model.n_conss()));

        model.add_cons(terms, self.lhs, self.rhs, &name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ObjSense, Status, minimal_model, var};

    #[test]
    fn test_cons_builder() {
        let cons = cons().name("c").eq(1.0);

        assert_eq!(cons.name.as_deref(), Some("c"));
        assert_eq!(cons.lhs, 1.0);
        assert_eq!(cons.rhs, 1.0);
    }

    #[test]
    fn test_cons_builder_add() {
        let mut model = Model::default().set_obj_sense(ObjSense::Maximize);
        let x = model.add(var().name("x").obj(1.0).continuous(0.0, 10.0));
        let y = model.add(var().name("y").obj(1.0).continuous(0.0, 10.0));

        let c = model.add(cons().name("c").coef(&x, 1.0).coef(&y, 1.0).le(3.0));

        assert_eq!(model.n_conss(), 1);
        assert_eq!(c.name(), "c");
        assert_eq!(c.rhs(), 3.0);

        let solved = model.solve().unwrap();
        assert_eq!(solved.status(), Status::Optimal);
        assert!(solved.eq(solved.obj_val(), 3.0));
    }

    #[test]
    fn test_cons_add_all() {
        let mut model = minimal_model().maximize();
        let x = model.add(var().binary().obj(1.0));
        let y = model.add(var().binary().obj(1.0));

        let conss = vec![
            cons().name("1").coef(&x, 1.0).le(1.0),
            cons().name("2").coef(&y, 1.0).le(0.0),
        ];
        let conss = model.add(conss);
        assert_eq!(conss.len(), 2);
        assert_eq!(conss[1].name(), "2");

        let solved = model.solve().unwrap();
        assert!(solved.eq(solved.obj_val(), 1.0));
    }

    #[test]
    fn repeated_variables_are_merged() {
        let mut model = Model::default();
        let x = model.add(var().name("x"));
        let y = model.add(var().name("y"));

        let c = model.add(
            cons()
                .coef(&x, 1.0)
                .coef(&y, 2.0)
                .expr([(&x, 3.0), (&y, -2.0)])
                .ge(0.0),
        );

        assert_eq!(c.terms(), &[(0, 4.0), (1, 0.0)]);
        assert_eq!(c.name(), "cons0");
    }

    #[test]
    fn coefs_pairs_vars_with_values() {
        let mut model = Model::default();
        let x = model.add(var());
        let y = model.add(var());
        let c = model.add(cons().coefs(vec![&x, &y], vec![2.0, 5.0]).range(1.0, 4.0));

        assert_eq!(c.terms(), &[(0, 2.0), (1, 5.0)]);
        assert_eq!(c.lhs(), 1.0);
        assert_eq!(c.rhs(), 4.0);
    }
}
