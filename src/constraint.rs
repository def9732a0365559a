use crate::solution::Solution;
use crate::variable::VarId;

/// A linear constraint `lhs <= sum(coef * var) <= rhs`.
///
/// One-sided constraints use an infinite `lhs` or `rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub(crate) index: usize,
    pub(crate) name: String,
    pub(crate) lhs: f64,
    pub(crate) rhs: f64,
    pub(crate) terms: Vec<(VarId, f64)>,
}

/// The relation a constraint imposes on its linear expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConsSense {
    /// `expr <= rhs`
    Le(f64),
    /// `expr >= lhs`
    Ge(f64),
    /// `expr == rhs`
    Eq(f64),
    /// `lhs <= expr <= rhs`
    Range(f64, f64),
    /// No finite side.
    Free,
}

impl Constraint {
    /// Returns the index of the constraint in its model.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the name of the constraint.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the left-hand side of the constraint.
    pub fn lhs(&self) -> f64 {
        self.lhs
    }

    /// Returns the right-hand side of the constraint.
    pub fn rhs(&self) -> f64 {
        self.rhs
    }

    /// Returns the (variable, coefficient) pairs of the constraint.
    pub fn terms(&self) -> &[(VarId, f64)] {
        &self.terms
    }

    /// Classifies the constraint by its finite sides.
    pub fn sense(&self) -> ConsSense {
        match (self.lhs.is_finite(), self.rhs.is_finite()) {
            (true, true) if self.lhs == self.rhs => ConsSense::Eq(self.rhs),
            (true, true) => ConsSense::Range(self.lhs, self.rhs),
            (true, false) => ConsSense::Ge(self.lhs),
            (false, true) => ConsSense::Le(self.rhs),
            (false, false) => ConsSense::Free,
        }
    }

    /// Evaluates the linear expression of the constraint at the given solution.
    pub fn activity(&self, sol: &Solution) -> f64 {
        self.terms
            .iter()
            .map(|&(var, coef)| coef * sol.values[var])
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    #[test]
    fn sense_from_sides() {
        let mut model = Model::default();
        let x = model.add(var().name("x"));
        let le = model.add(cons().coef(&x, 1.).le(4.));
        let ge = model.add(cons().coef(&x, 1.).ge(1.));
        let eq = model.add(cons().coef(&x, 1.).eq(2.));
        let range = model.add(cons().coef(&x, 1.).range(1., 3.));

        assert_eq!(le.sense(), ConsSense::Le(4.));
        assert_eq!(ge.sense(), ConsSense::Ge(1.));
        assert_eq!(eq.sense(), ConsSense::Eq(2.));
        assert_eq!(range.sense(), ConsSense::Range(1., 3.));
        assert_eq!(range.index(), 3);
    }

    #[test]
    fn activity_at_solution() {
        let mut model = Model::default().maximize();
        let x = model.add(var().continuous(0., 2.).obj(1.));
        let y = model.add(var().continuous(0., 3.).obj(1.));
        let c = model.add(cons().coef(&x, 2.).coef(&y, 1.).name("c").le(100.));

        let solved = model.solve().unwrap();
        let sol = solved.best_sol().unwrap();
        assert!(solved.eq(c.activity(sol), 7.));
        assert_eq!(c.name(), "c");
    }
}
