use thiserror::Error;

use crate::status::Status;

/// Errors raised while building, solving or reporting a model.
#[derive(Debug, Error)]
pub enum Error {
    /// The solver failed for a reason other than infeasibility or unboundedness.
    #[error("solver failure: {0}")]
    Solver(String),
    /// The model was solved but no optimal solution is available.
    #[error("no optimal solution, status: {0}")]
    NotOptimal(Status),
    /// No example is registered under the given id.
    #[error("unknown example `{0}`")]
    UnknownExample(String),
    /// No chapter with the given number exists.
    #[error("unknown chapter {0}")]
    UnknownChapter(u8),
    #[error("invalid configuration: {0}")]
    Config(#[from] Box<figment::Error>),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}

impl Error {
    /// Returns the status carried by a [`Error::NotOptimal`] error.
    pub fn status(&self) -> Option<Status> {
        match self {
            Error::NotOptimal(status) => Some(*status),
            _ => None,
        }
    }
}
