use std::fmt;

use crate::variable::Variable;

/// Variable values of a solution together with its objective value.
#[derive(Clone, PartialEq)]
pub struct Solution {
    pub(crate) values: Vec<f64>,
    pub(crate) names: Vec<String>,
    pub(crate) obj_val: f64,
}

impl Solution {
    /// Returns the objective value of the solution.
    pub fn obj_val(&self) -> f64 {
        self.obj_val
    }

    /// Returns the value of a variable in the solution.
    pub fn val(&self, var: &Variable) -> f64 {
        self.values[var.id]
    }

    /// Returns the values of all variables, indexed by variable index.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Iterates over `(name, value)` pairs in order of variable creation.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }
}

impl fmt::Debug for Solution {
    /// Formats the solution for debugging purposes, listing non-zero values only.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Solution with obj val: {}", self.obj_val)?;
        for (name, val) in self.iter() {
            if val != 0.0 {
                writeln!(f, "Var {name}={val}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn values_by_handle_and_name() {
        let mut model = Model::default().minimize();
        let x = model.add(var().name("x").continuous(1., 5.).obj(1.));
        let y = model.add(var().name("y").continuous(0., 5.).obj(2.));

        let solved = model.solve().unwrap();
        let sol = solved.best_sol().unwrap();
        assert!(solved.eq(sol.val(&x), 1.));
        assert!(solved.eq(sol.val(&y), 0.));
        assert!(solved.eq(sol.obj_val(), 1.));

        let names: Vec<_> = sol.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["x", "y"]);
        assert_eq!(sol.values().len(), 2);
    }

    #[test]
    fn debug_lists_nonzero_values() {
        let mut model = Model::default().maximize();
        model.add(var().name("a").continuous(0., 3.).obj(1.));
        model.add(var().name("b").continuous(0., 3.).obj(-1.));

        let solved = model.solve().unwrap();
        let text = format!("{:?}", solved.best_sol().unwrap());
        assert!(text.contains("Var a=3"));
        assert!(!text.contains("Var b"));
    }
}
