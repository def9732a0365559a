//! Textbook LP and MILP problems.
//!
//! Every problem is a plain data struct whose `Default` is the textbook instance. Its
//! `solve` method builds a [`Model`](crate::Model), solves it and returns a typed plan;
//! [`Example::run`] turns the plan into a [`Report`].

use std::fmt;

use crate::error::Error;
use crate::model::{Model, ProblemCreated};
use crate::param::Params;
use crate::report::Report;
use crate::status::Status;

pub mod allocation;
pub mod blending;
pub mod catalog;
pub mod cutting;
pub mod network;
pub mod production;
pub mod scheduling;
pub mod selection;
pub mod transport;
pub mod two_variable;

pub use catalog::{by_chapter, catalog, find};

/// The chapters of the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Chapter {
    /// Linear programs with continuous variables.
    Linear,
    /// Integer and binary variables.
    MixedInteger,
    /// Larger applied models.
    Applications,
}

impl Chapter {
    pub const ALL: [Chapter; 3] = [Chapter::Linear, Chapter::MixedInteger, Chapter::Applications];

    pub fn number(self) -> u8 {
        match self {
            Chapter::Linear => 3,
            Chapter::MixedInteger => 4,
            Chapter::Applications => 5,
        }
    }

    pub fn from_number(number: u8) -> Result<Self, Error> {
        Chapter::ALL
            .into_iter()
            .find(|c| c.number() == number)
            .ok_or(Error::UnknownChapter(number))
    }

    pub fn title(self) -> &'static str {
        match self {
            Chapter::Linear => "Linear programming",
            Chapter::MixedInteger => "Mixed-integer linear programming",
            Chapter::Applications => "Applied examples",
        }
    }

    /// Background printed before the first example of a chapter, if the chapter has any.
    pub fn introduction(self) -> Option<&'static str> {
        match self {
            Chapter::Linear => Some(
                "\
A modeling layer lets a problem be written the way it reads on paper:
  * constraints and objectives are built from ordinary arithmetic on variables,
  * the same model runs on any solver behind the layer,
  * integer and binary variables need no extra work.

Every example follows the same workflow:
  1. create a model with an objective sense,
  2. declare the decision variables with their bounds,
  3. add the constraints and the objective coefficients,
  4. solve,
  5. read the status, the objective value and the variable values.",
            ),
            Chapter::MixedInteger => Some(
                "\
Variable kinds:
  * continuous: any real value within its bounds,
  * integer: whole numbers only,
  * binary: an integer restricted to 0 or 1.

Binary variables express:
  * yes/no decisions, e.g. whether to open a facility,
  * logical conditions between decisions, e.g. at most one of two products,
  * selection of a subset, e.g. which projects to fund.",
            ),
            Chapter::Applications => None,
        }
    }

    /// Printed after a chapter's summary.
    pub fn completion(self) -> String {
        match self.next() {
            Some(next) => format!(
                "{self} complete. Continue with chapter {}: {}.",
                next.number(),
                next.title()
            ),
            None => format!("{self} complete."),
        }
    }

    /// The chapter after this one.
    pub fn next(self) -> Option<Chapter> {
        Chapter::ALL.into_iter().find(|c| c.number() == self.number() + 1)
    }

    /// What the chapter's examples teach, printed after the last example of a chapter.
    pub fn summary(self) -> &'static str {
        match self {
            Chapter::Linear => {
                "\
Building a model: create it with a sense, declare bounded variables, add named
constraints and an objective, solve, read the values back.
Sums over dictionaries of variables keep larger models short.
Applications: resource allocation, blending, transportation, portfolio selection."
            }
            Chapter::MixedInteger => {
                "\
Variable kinds: continuous, integer and binary.
Binary variables model yes/no decisions such as project selection and facility opening.
Big-M constraints express logic: exclusive choices and conditional production.
Fixed costs pair a binary activation variable with a capacity constraint.
Applications: lot sizing, facility location, production planning."
            }
            Chapter::Applications => {
                "\
Multi-period planning with inventory, regular and overtime production.
Diet optimization with ranged nutrient constraints.
Knapsack, the basic combinatorial selection problem.
Shift scheduling with integer staffing levels.
Assignment with a one-to-one matching.
Cutting stock by pattern enumeration.
Shortest path with flow conservation.
Bin packing with symmetry breaking constraints."
            }
        }
    }
}

/// Closing recap printed after the whole collection has run.
pub const COLLECTION_COMPLETE: &str = "\
All chapters complete.

Covered:
  * chapter 3: linear programs, from two variables to portfolios,
  * chapter 4: integer and binary variables, logic and fixed costs,
  * chapter 5: applied models from diets to bin packing.

Where to go next:
  * larger instances of the same models,
  * commercial solvers such as Gurobi or CPLEX for hard instances,
  * decomposition and column generation for large-scale models.";

impl fmt::Display for Chapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Chapter {}: {}", self.number(), self.title())
    }
}

/// A worked example that can be modeled, solved and reported.
pub trait Example: Send + Sync {
    /// Short kebab-case identifier, unique in the catalog.
    fn id(&self) -> &'static str;

    fn chapter(&self) -> Chapter;

    /// Position inside the chapter, starting at 1.
    fn number(&self) -> u8;

    fn title(&self) -> &'static str;

    /// The problem statement with the instance data.
    fn statement(&self) -> String;

    /// Builds the model without solving it.
    fn model(&self, params: &Params) -> Model<ProblemCreated>;

    /// Solves the example and reports the outcome. Infeasibility is part of the report,
    /// only solver failures are errors.
    fn run(&self, params: &Params) -> Result<Report, Error>;

    /// `Example 3.1: Basic maximization` style heading.
    fn heading(&self) -> String {
        format!(
            "Example {}.{}: {}",
            self.chapter().number(),
            self.number(),
            self.title()
        )
    }
}

/// The typed result of solving an example.
pub trait Plan {
    /// Objective value of the plan.
    fn objective(&self) -> f64;

    /// Appends the result lines and named values of the plan.
    fn describe(&self, report: &mut Report);
}

/// Turns the result of an example's `solve` into its report.
pub(crate) fn report<E, P>(example: &E, outcome: Result<P, Error>) -> Result<Report, Error>
where
    E: Example + ?Sized,
    P: Plan,
{
    let mut report = Report::new(example.id(), example.heading());
    report.statement = example.statement();
    match outcome {
        Ok(plan) => {
            report.status = Status::Optimal;
            report.objective = Some(plan.objective());
            plan.describe(&mut report);
        }
        Err(Error::NotOptimal(status)) => {
            report.status = status;
            report.line("No optimal solution exists for this instance.");
        }
        Err(err) => return Err(err),
    }
    Ok(report)
}

/// Rounds a solver value to the nearest integer count.
pub(crate) fn count(val: f64) -> u32 {
    val.round().max(0.0) as u32
}

/// Whether a binary variable's value means "selected".
pub(crate) fn is_on(val: f64) -> bool {
    val > 0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chapter_numbers_round_trip() {
        for chapter in Chapter::ALL {
            assert_eq!(Chapter::from_number(chapter.number()).unwrap(), chapter);
        }
        assert!(matches!(
            Chapter::from_number(2),
            Err(Error::UnknownChapter(2))
        ));
        assert_eq!(
            Chapter::MixedInteger.to_string(),
            "Chapter 4: Mixed-integer linear programming"
        );
    }

    #[test]
    fn introductions_and_completions() {
        let linear = Chapter::Linear.introduction().unwrap();
        assert!(linear.contains("5. read the status"));
        let mixed = Chapter::MixedInteger.introduction().unwrap();
        assert!(mixed.contains("binary: an integer restricted to 0 or 1"));
        assert_eq!(Chapter::Applications.introduction(), None);

        assert_eq!(Chapter::Linear.next(), Some(Chapter::MixedInteger));
        assert_eq!(Chapter::Applications.next(), None);
        assert_eq!(
            Chapter::Linear.completion(),
            "Chapter 3: Linear programming complete. \
             Continue with chapter 4: Mixed-integer linear programming."
        );
        assert_eq!(
            Chapter::Applications.completion(),
            "Chapter 5: Applied examples complete."
        );
        assert!(COLLECTION_COMPLETE.starts_with("All chapters complete."));
    }

    #[test]
    fn counts_and_flags() {
        assert_eq!(count(2.9999999), 3);
        assert_eq!(count(-0.0), 0);
        assert!(is_on(1.0));
        assert!(!is_on(1e-9));
    }
}
