//! Two-variable linear programs that can be drawn and solved graphically.

use crate::builder::cons::cons;
use crate::builder::var::var;
use crate::error::Error;
use crate::model::{Model, ObjSense, ProblemCreated};
use crate::param::Params;
use crate::problems::{Chapter, Example, Plan, report};
use crate::report::{Report, variable_listing};
use crate::variable::Variable;

/// Direction of a constraint row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowSense {
    Le,
    Ge,
    Eq,
}

impl RowSense {
    fn symbol(self) -> &'static str {
        match self {
            RowSense::Le => "<=",
            RowSense::Ge => ">=",
            RowSense::Eq => "=",
        }
    }
}

/// A constraint `coefs[0] x + coefs[1] y <sense> rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub name: &'static str,
    pub coefs: [f64; 2],
    pub sense: RowSense,
    pub rhs: f64,
}

impl Row {
    pub fn new(name: &'static str, coefs: [f64; 2], sense: RowSense, rhs: f64) -> Self {
        Row {
            name,
            coefs,
            sense,
            rhs,
        }
    }
}

/// An LP over `x, y >= 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct TwoVariableLp {
    pub id: &'static str,
    pub number: u8,
    pub title: &'static str,
    pub sense: ObjSense,
    pub objective: [f64; 2],
    pub rows: Vec<Row>,
    /// Explain the optimum as the vertex of its binding rows.
    pub interpret: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TwoVariablePlan {
    pub x: f64,
    pub y: f64,
    pub objective: f64,
    /// Names of the rows that hold with equality at the optimum.
    pub binding: Vec<&'static str>,
    interpret: bool,
    listing: Vec<String>,
}

impl TwoVariableLp {
    /// max x + 2y over three inequalities.
    pub fn basic_max() -> Self {
        TwoVariableLp {
            id: "basic-max",
            number: 1,
            title: "Basic maximization",
            sense: ObjSense::Maximize,
            objective: [1., 2.],
            rows: vec![
                Row::new("red", [2., 1.], RowSense::Le, 20.),
                Row::new("blue", [-4., 5.], RowSense::Le, 10.),
                Row::new("yellow", [-1., 2.], RowSense::Ge, -2.),
            ],
            interpret: true,
        }
    }

    /// min 3x + 2y over two covering constraints.
    pub fn basic_min() -> Self {
        TwoVariableLp {
            id: "basic-min",
            number: 2,
            title: "Basic minimization",
            sense: ObjSense::Minimize,
            objective: [3., 2.],
            rows: vec![
                Row::new("cover1", [1., 1.], RowSense::Ge, 4.),
                Row::new("cover2", [2., 1.], RowSense::Ge, 6.),
            ],
            interpret: true,
        }
    }

    /// [`TwoVariableLp::basic_max`] with the equality `-x + 5y = 15` added.
    pub fn with_equality() -> Self {
        let mut lp = TwoVariableLp::basic_max();
        lp.id = "equality";
        lp.number = 3;
        lp.title = "Equality constraint";
        lp.interpret = false;
        lp.rows
            .push(Row::new("green", [-1., 5.], RowSense::Eq, 15.));
        lp
    }

    fn build(&self, params: &Params) -> (Model<ProblemCreated>, Variable, Variable) {
        let mut model = Model::with_params(params)
            .set_name(self.id)
            .set_obj_sense(self.sense);
        let x = model.add(var().name("x").obj(self.objective[0]));
        let y = model.add(var().name("y").obj(self.objective[1]));
        for row in &self.rows {
            let lhs = cons()
                .name(row.name)
                .coef(&x, row.coefs[0])
                .coef(&y, row.coefs[1]);
            model.add(match row.sense {
                RowSense::Le => lhs.le(row.rhs),
                RowSense::Ge => lhs.ge(row.rhs),
                RowSense::Eq => lhs.eq(row.rhs),
            });
        }
        (model, x, y)
    }

    pub fn solve(&self, params: &Params) -> Result<TwoVariablePlan, Error> {
        let (model, x, y) = self.build(params);
        let solved = model.solve()?;
        let sol = solved.require_optimal()?;
        let (x, y) = (sol.val(&x), sol.val(&y));
        let binding = self
            .rows
            .iter()
            .filter(|row| (row.coefs[0] * x + row.coefs[1] * y - row.rhs).abs() < 1e-6)
            .map(|row| row.name)
            .collect();
        Ok(TwoVariablePlan {
            x,
            y,
            objective: sol.obj_val(),
            binding,
            interpret: self.interpret,
            listing: variable_listing(&solved),
        })
    }
}

/// Renders `a x + b y` the way it is written by hand, e.g. `-4x + 5y`.
fn linear(coefs: [f64; 2]) -> String {
    let mut out = String::new();
    for (coef, name) in coefs.into_iter().zip(["x", "y"]) {
        if coef == 0.0 {
            continue;
        }
        let abs = coef.abs();
        match (out.is_empty(), coef < 0.0) {
            (true, true) => out.push('-'),
            (true, false) => {}
            (false, true) => out.push_str(" - "),
            (false, false) => out.push_str(" + "),
        }
        if abs != 1.0 {
            out.push_str(&abs.to_string());
        }
        out.push_str(name);
    }
    if out.is_empty() {
        out.push('0');
    }
    out
}

impl Example for TwoVariableLp {
    fn id(&self) -> &'static str {
        self.id
    }

    fn chapter(&self) -> Chapter {
        Chapter::Linear
    }

    fn number(&self) -> u8 {
        self.number
    }

    fn title(&self) -> &'static str {
        self.title
    }

    fn statement(&self) -> String {
        let sense = match self.sense {
            ObjSense::Minimize => "minimize",
            ObjSense::Maximize => "maximize",
        };
        let mut text = format!("{sense}  z = {}\n\nsubject to\n", linear(self.objective));
        for row in &self.rows {
            text.push_str(&format!(
                "  {} {} {}\n",
                linear(row.coefs),
                row.sense.symbol(),
                row.rhs
            ));
        }
        text.push_str("  x >= 0, y >= 0\n");
        text
    }

    fn model(&self, params: &Params) -> Model<ProblemCreated> {
        self.build(params).0
    }

    fn run(&self, params: &Params) -> Result<Report, Error> {
        report(self, self.solve(params))
    }
}

impl Plan for TwoVariablePlan {
    fn objective(&self) -> f64 {
        self.objective
    }

    fn describe(&self, report: &mut Report) {
        for line in &self.listing {
            report.line(line.as_str());
        }
        report.value("x", self.x);
        report.value("y", self.y);
        if self.interpret {
            report.line("");
            report.line("[Interpretation]");
            report.line(format!(
                "The optimum is x = {:.2}, y = {:.2} with z = {:.2}.",
                self.x, self.y, self.objective
            ));
            if !self.binding.is_empty() {
                report.line(format!(
                    "It is the corner of the feasible region where {} hold with equality.",
                    self.binding.join(" and ")
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn basic_max_optimum() {
        let plan = TwoVariableLp::basic_max()
            .solve(&Params::default())
            .unwrap();
        assert!(close(plan.objective, 145. / 7.));
        assert!(close(plan.x, 45. / 7.));
        assert!(close(plan.y, 50. / 7.));
    }

    #[test]
    fn basic_min_optimum() {
        let plan = TwoVariableLp::basic_min()
            .solve(&Params::default())
            .unwrap();
        assert!(close(plan.objective, 10.));
        assert!(close(plan.x, 2.));
        assert!(close(plan.y, 2.));
    }

    #[test]
    fn equality_moves_the_optimum() {
        let plan = TwoVariableLp::with_equality()
            .solve(&Params::default())
            .unwrap();
        assert!(close(plan.objective, 185. / 11.));
        assert!(close(plan.x, 85. / 11.));
        assert!(close(plan.y, 50. / 11.));
        assert!(close(-plan.x + 5. * plan.y, 15.));
    }

    #[test]
    fn statement_lists_rows() {
        let text = TwoVariableLp::basic_max().statement();
        assert!(text.starts_with("maximize  z = x + 2y\n"));
        assert!(text.contains("  -4x + 5y <= 10\n"));
        assert!(text.contains("  -x + 2y >= -2\n"));
    }

    #[test]
    fn model_names_constraints() {
        let model = TwoVariableLp::with_equality().model(&Params::default());
        assert_eq!(model.n_vars(), 2);
        let names: Vec<&str> = model.conss().iter().map(|c| c.name()).collect();
        assert_eq!(names, ["red", "blue", "yellow", "green"]);
    }

    #[test]
    fn optimum_sits_on_binding_rows() {
        let plan = TwoVariableLp::basic_max().solve(&Params::default()).unwrap();
        assert_eq!(plan.binding, ["red", "blue"]);
        let plan = TwoVariableLp::basic_min().solve(&Params::default()).unwrap();
        assert_eq!(plan.binding, ["cover1", "cover2"]);
    }

    #[test]
    fn graphical_examples_explain_their_optimum() {
        let report = TwoVariableLp::basic_max().run(&Params::default()).unwrap();
        let at = report.lines.iter().position(|l| l == "[Interpretation]").unwrap();
        assert_eq!(
            report.lines[at + 1],
            "The optimum is x = 6.43, y = 7.14 with z = 20.71."
        );
        assert_eq!(
            report.lines[at + 2],
            "It is the corner of the feasible region where red and blue hold with equality."
        );

        let report = TwoVariableLp::basic_min().run(&Params::default()).unwrap();
        assert!(report.lines.contains(
            &"The optimum is x = 2.00, y = 2.00 with z = 10.00.".to_string()
        ));

        let report = TwoVariableLp::with_equality().run(&Params::default()).unwrap();
        assert!(!report.lines.contains(&"[Interpretation]".to_string()));
    }

    #[test]
    fn report_lists_variables() {
        let report = TwoVariableLp::basic_min().run(&Params::default()).unwrap();
        assert_eq!(report.status, Status::Optimal);
        assert_eq!(report.heading, "Example 3.2: Basic minimization");
        assert!(report.lines.contains(&"  x = 2.0000".to_string()));
        assert!(close(report.get("y").unwrap(), 2.));
    }
}
