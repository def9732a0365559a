use std::fmt;

use serde::Serialize;

/// An enum representing the status of an optimization run.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
pub enum Status {
    /// The model has not been solved yet.
    Unknown,
    /// The problem was solved to optimality, an optimal solution is available.
    Optimal,
    /// The problem was proven to be infeasible.
    Infeasible,
    /// The problem was proven to be unbounded.
    Unbounded,
}

impl Status {
    /// Returns `true` if an optimal solution is available.
    pub fn is_optimal(self) -> bool {
        self == Status::Optimal
    }
}

impl From<&microlp::Error> for Status {
    /// Maps a solver outcome that carries no solution to a status.
    fn from(err: &microlp::Error) -> Self {
        match err {
            microlp::Error::Infeasible => Status::Infeasible,
            microlp::Error::Unbounded => Status::Unbounded,
            microlp::Error::InternalError(_) => Status::Unknown,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Status::Unknown => "Not Solved",
            Status::Optimal => "Optimal",
            Status::Infeasible => "Infeasible",
            Status::Unbounded => "Unbounded",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    #[test]
    fn unknown() {
        assert_eq!(Model::default().status(), Status::Unknown);
    }

    #[test]
    fn display_labels() {
        assert_eq!(Status::Unknown.to_string(), "Not Solved");
        assert_eq!(Status::Optimal.to_string(), "Optimal");
        assert_eq!(Status::Infeasible.to_string(), "Infeasible");
        assert_eq!(Status::Unbounded.to_string(), "Unbounded");
    }

    #[test]
    fn from_solver_error() {
        assert_eq!(Status::from(&microlp::Error::Infeasible), Status::Infeasible);
        assert_eq!(Status::from(&microlp::Error::Unbounded), Status::Unbounded);
        assert_eq!(
            Status::from(&microlp::Error::InternalError("boom".into())),
            Status::Unknown
        );
    }

    #[test]
    fn infeasible() {
        let mut model = Model::default().maximize();
        let x = model.add(var().continuous(0., 1.).obj(1.));
        model.add(cons().coef(&x, 1.).ge(2.));

        let solved = model.solve().unwrap();
        assert_eq!(solved.status(), Status::Infeasible);
        assert!(solved.best_sol().is_none());
    }

    #[test]
    fn unbounded() {
        let mut model = Model::default().maximize();
        let x = model.add(var().obj(1.));
        let y = model.add(var().obj(1.));
        model.add(cons().coef(&x, 1.).coef(&y, -1.).le(3.));

        let solved = model.solve().unwrap();
        assert_eq!(solved.status(), Status::Unbounded);
    }
}
