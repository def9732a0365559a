//! Worked linear and mixed-integer programming models.
//!
//! The crate pairs a small model-building layer (variables, linear constraints, objective
//! sense) with a collection of textbook problems: production planning, blending, transport,
//! selection, scheduling, cutting and routing. Solving is delegated to [`microlp`].
//!
//! ```no_run
//! use milp_primer::prelude::*;
//!
//! let mut model = Model::default().maximize();
//! let x = model.add(var().name("x").obj(1.));
//! let y = model.add(var().name("y").obj(2.));
//! model.add(cons().name("red").coef(&x, 2.).coef(&y, 1.).le(20.));
//! model.add(cons().name("blue").coef(&x, -4.).coef(&y, 5.).le(10.));
//!
//! let solved = model.solve().unwrap();
//! println!("{} {}", solved.status(), solved.obj_val());
//! ```

/// Variable and constraint builders.
pub mod builder;
/// Layered runtime settings.
pub mod config;
/// Linear constraints.
pub mod constraint;
/// The error type.
pub mod error;
/// Tracing subscriber setup.
pub mod logging;
/// The model and its solve stages.
pub mod model;
/// Solver parameters.
pub mod param;
/// The worked examples.
pub mod problems;
/// Text and JSON output of example results.
pub mod report;
/// Solutions.
pub mod solution;
/// Solve status.
pub mod status;
/// Decision variables.
pub mod variable;

mod backend;
mod writer;

pub use builder::CanBeAddedToModel;
pub use builder::cons::{ConsBuilder, cons};
pub use builder::var::{VarBuilder, var};
pub use constraint::{ConsSense, Constraint};
pub use error::Error;
pub use model::{Model, ModelWithProblem, ObjSense, ProblemCreated, Solved, minimal_model};
pub use param::Params;
pub use solution::Solution;
pub use status::Status;
pub use variable::{VarId, VarType, Variable};

/// Everything needed to build and solve a model.
pub mod prelude {
    pub use crate::builder::CanBeAddedToModel;
    pub use crate::builder::cons::cons;
    pub use crate::builder::var::var;
    pub use crate::constraint::{ConsSense, Constraint};
    pub use crate::error::Error;
    pub use crate::model::{
        Model, ModelWithProblem, ObjSense, ProblemCreated, Solved, minimal_model,
    };
    pub use crate::param::Params;
    pub use crate::solution::Solution;
    pub use crate::status::Status;
    pub use crate::variable::{VarType, Variable};
}
