use crate::builder::CanBeAddedToModel;
use crate::{Model, ModelWithProblem, ProblemCreated, VarType, Variable};

/// A builder for variables.
#[derive(Debug, Clone)]
pub struct VarBuilder {
    name: Option<String>,
    obj: f64,
    lb: f64,
    ub: f64,
    var_type: VarType,
}

/// Creates a new default `VarBuilder`: a continuous, non-negative variable
/// with a zero objective coefficient.
pub fn var() -> VarBuilder {
    VarBuilder::default()
}

impl Default for VarBuilder {
    fn default() -> Self {
        VarBuilder {
            name: None,
            obj: 0.0,
            lb: 0.0,
            ub: f64::INFINITY,
            var_type: VarType::Continuous,
        }
    }
}

impl VarBuilder {
    /// Sets the variable to be an integer variable.
    pub fn integer(mut self, lb: isize, ub: isize) -> Self {
        self.lb = lb as f64;
        self.ub = ub as f64;
        self.var_type = VarType::Integer;
        self
    }

    /// Sets the variable to be a non-negative integer variable without upper bound.
    pub fn nonneg_integer(mut self) -> Self {
        self.lb = 0.0;
        self.ub = f64::INFINITY;
        self.var_type = VarType::Integer;
        self
    }

    /// Sets the variable to be a binary variable.
    pub fn binary(mut self) -> Self {
        self.lb = 0.0;
        self.ub = 1.0;
        self.var_type = VarType::Binary;
        self
    }

    /// Sets the variable to be a continuous variable.
    pub fn continuous(mut self, lb: f64, ub: f64) -> Self {
        self.lb = lb;
        self.ub = ub;
        self.var_type = VarType::Continuous;
        self
    }

    /// Sets the name of the variable.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the objective coefficient of the variable.
    pub fn obj(mut self, obj: f64) -> Self {
        self.obj = obj;
        self
    }
}

impl CanBeAddedToModel for VarBuilder {
    type Return = Variable;
    fn add(self, model: &mut Model<ProblemCreated>) -> Variable {
        let name = self
            .name
            .unwrap_or_else(|| format!("x{}", model.n_vars()));

        model.add_var(self.lb, self.ub, self.obj, &name, self.var_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ObjSense, Status, cons};

    #[test]
    fn default_is_a_nonnegative_continuous_variable() {
        let builder = var();
        assert_eq!(builder.name, None);
        assert_eq!(builder.obj, 0.0);
        assert_eq!((builder.lb, builder.ub), (0.0, f64::INFINITY));
        assert_eq!(builder.var_type, VarType::Continuous);
    }

    #[test]
    fn last_kind_wins() {
        let builder = var().binary().nonneg_integer();
        assert_eq!(builder.var_type, VarType::Integer);
        assert_eq!((builder.lb, builder.ub), (0.0, f64::INFINITY));

        let builder = var().integer(-2, 5).continuous(0.5, 1.5);
        assert_eq!(builder.var_type, VarType::Continuous);
        assert_eq!((builder.lb, builder.ub), (0.5, 1.5));
    }

    #[test]
    fn unnamed_variables_are_named_by_position() {
        let product = String::from("chairs");
        let mut model = Model::default();
        let named = model.add(var().name(format!("make_{product}")));
        let unnamed = model.add(var().nonneg_integer());
        let binary = model.add(var().binary());

        assert_eq!(named.name(), "make_chairs");
        assert_eq!(unnamed.name(), "x1");
        assert_eq!(binary.name(), "x2");
        assert_eq!(model.var_by_name("x1"), Some(&unnamed));
    }

    #[test]
    fn nonneg_integer_stops_at_the_constraint() {
        let mut model = Model::default().set_obj_sense(ObjSense::Maximize);
        let n = model.add(var().name("batches").nonneg_integer().obj(3.0));
        assert_eq!(n.ub(), f64::INFINITY);
        assert_eq!(n.var_type(), VarType::Integer);
        model.add(cons().name("oven_hours").coef(&n, 2.0).le(7.0));

        let solved = model.solve().unwrap();
        assert_eq!(solved.status(), Status::Optimal);
        let sol = solved.best_sol().unwrap();
        assert!(solved.eq(sol.val(&n), 3.0));
        assert!(solved.eq(sol.obj_val(), 9.0));
    }

    #[test]
    fn products_from_an_iterator() {
        let products = [("tables", 30.0, 3.0), ("chairs", 20.0, 2.0)];
        let mut model = Model::default().set_obj_sense(ObjSense::Maximize);
        let make = model.add(
            products
                .iter()
                .map(|(name, profit, _)| var().name(*name).nonneg_integer().obj(*profit)),
        );
        model.add(
            cons()
                .name("wood")
                .expr(make.iter().zip(products.iter().map(|p| p.2)))
                .le(13.0),
        );

        let names: Vec<&str> = make.iter().map(|v| v.name()).collect();
        assert_eq!(names, ["tables", "chairs"]);
        let solved = model.solve().unwrap();
        assert_eq!(solved.status(), Status::Optimal);
        assert!(solved.eq(solved.obj_val(), 130.0));
    }
}
