use serde::{Deserialize, Serialize};

/// Index of a variable inside its model, in order of creation.
pub type VarId = usize;

/// The integrality requirement of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VarType {
    /// Any real value within the bounds.
    Continuous,
    /// Integral values within the bounds.
    Integer,
    /// 0 or 1.
    Binary,
}

impl VarType {
    /// Returns `true` for integer and binary variables.
    pub fn is_integral(self) -> bool {
        matches!(self, VarType::Integer | VarType::Binary)
    }
}

/// A decision variable of a model.
///
/// Handles are cheap to clone and stay valid for the lifetime of the model that
/// created them, including after solving.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub(crate) id: VarId,
    pub(crate) name: String,
    pub(crate) var_type: VarType,
    pub(crate) lb: f64,
    pub(crate) ub: f64,
    pub(crate) obj: f64,
}

impl Variable {
    /// Returns the index of the variable in its model.
    pub fn index(&self) -> VarId {
        self.id
    }

    /// Returns the name of the variable.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the type of the variable.
    pub fn var_type(&self) -> VarType {
        self.var_type
    }

    /// Returns the lower bound of the variable.
    pub fn lb(&self) -> f64 {
        self.lb
    }

    /// Returns the upper bound of the variable.
    pub fn ub(&self) -> f64 {
        self.ub
    }

    /// Returns the objective coefficient of the variable.
    pub fn obj(&self) -> f64 {
        self.obj
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    #[test]
    fn handle_reflects_builder() {
        let mut model = Model::default();
        let x = model.add(var().integer(-3, 7).obj(2.5).name("x"));

        assert_eq!(x.index(), 0);
        assert_eq!(x.name(), "x");
        assert_eq!(x.var_type(), VarType::Integer);
        assert_eq!(x.lb(), -3.);
        assert_eq!(x.ub(), 7.);
        assert_eq!(x.obj(), 2.5);
    }

    #[test]
    fn integrality() {
        assert!(VarType::Integer.is_integral());
        assert!(VarType::Binary.is_integral());
        assert!(!VarType::Continuous.is_integral());
    }
}
