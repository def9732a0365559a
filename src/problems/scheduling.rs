//! Staffing and one-to-one assignment.

use crate::builder::cons::cons;
use crate::builder::var::var;
use crate::error::Error;
use crate::model::{Model, ProblemCreated};
use crate::param::Params;
use crate::problems::{Chapter, Example, Plan, count, is_on, report};
use crate::report::Report;
use crate::variable::Variable;

/// Weekly shifts of consecutive working days, starting on any day of the week.
#[derive(Debug, Clone, PartialEq)]
pub struct ShiftScheduling {
    /// `(day, required staff)` in week order; the week wraps around.
    pub days: Vec<(String, u32)>,
    /// Consecutive days worked per shift.
    pub shift_length: usize,
    /// Available employees, if limited.
    pub max_staff: Option<u32>,
}

impl Default for ShiftScheduling {
    fn default() -> Self {
        let days = [
            ("Mon", 5),
            ("Tue", 6),
            ("Wed", 7),
            ("Thu", 6),
            ("Fri", 8),
            ("Sat", 10),
            ("Sun", 4),
        ];
        ShiftScheduling {
            days: days
                .into_iter()
                .map(|(day, required)| (day.to_string(), required))
                .collect(),
            shift_length: 5,
            max_staff: Some(15),
        }
    }
}

impl ShiftScheduling {
    /// Whether a shift starting on day `start` works on day `day`.
    pub fn covers(&self, start: usize, day: usize) -> bool {
        let n = self.days.len();
        (day + n - start) % n < self.shift_length
    }

    fn build(&self, params: &Params) -> (Model<ProblemCreated>, Vec<Variable>) {
        let mut model = Model::with_params(params)
            .set_name("scheduling")
            .minimize()
            .set_obj_integral();
        let starts = model.add(
            self.days
                .iter()
                .map(|(day, _)| var().name(format!("shift_{day}")).nonneg_integer().obj(1.)),
        );
        for (d, (day, required)) in self.days.iter().enumerate() {
            let on_duty = starts
                .iter()
                .enumerate()
                .filter(|(s, _)| self.covers(*s, d))
                .map(|(_, x)| (x, 1.));
            model.add(
                cons()
                    .name(format!("required_{day}"))
                    .expr(on_duty)
                    .ge(f64::from(*required)),
            );
        }
        if let Some(max_staff) = self.max_staff {
            model.add(
                cons()
                    .name("max_staff")
                    .expr(starts.iter().map(|x| (x, 1.)))
                    .le(f64::from(max_staff)),
            );
        }
        (model, starts)
    }

    pub fn solve(&self, params: &Params) -> Result<ShiftPlan, Error> {
        let (model, starts) = self.build(params);
        let solved = model.solve()?;
        let sol = solved.require_optimal()?;
        let staff: Vec<u32> = starts.iter().map(|x| count(sol.val(x))).collect();
        let coverage: Vec<u32> = (0..self.days.len())
            .map(|d| {
                staff
                    .iter()
                    .enumerate()
                    .filter(|(s, _)| self.covers(*s, d))
                    .map(|(_, n)| n)
                    .sum()
            })
            .collect();
        Ok(ShiftPlan {
            days: self.days.clone(),
            shift_length: self.shift_length,
            total: staff.iter().sum(),
            staff,
            coverage,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShiftPlan {
    pub days: Vec<(String, u32)>,
    pub shift_length: usize,
    /// Employees starting on each day.
    pub staff: Vec<u32>,
    /// Employees working on each day.
    pub coverage: Vec<u32>,
    pub total: u32,
}

impl Example for ShiftScheduling {
    fn id(&self) -> &'static str {
        "shift-scheduling"
    }

    fn chapter(&self) -> Chapter {
        Chapter::Applications
    }

    fn number(&self) -> u8 {
        4
    }

    fn title(&self) -> &'static str {
        "Shift scheduling"
    }

    fn statement(&self) -> String {
        let required: Vec<String> = self
            .days
            .iter()
            .map(|(day, n)| format!("{day}: {n}"))
            .collect();
        let mut text = format!(
            "Build a weekly rota.\n\nRequired staff per day:\n  {}\n\n\
             Every employee works {} consecutive days.\n",
            required.join(", "),
            self.shift_length
        );
        if let Some(max_staff) = self.max_staff {
            text.push_str(&format!("At most {max_staff} employees are available.\n"));
        }
        text.push_str("Goal: minimize the number of employees.\n");
        text
    }

    fn model(&self, params: &Params) -> Model<ProblemCreated> {
        self.build(params).0
    }

    fn run(&self, params: &Params) -> Result<Report, Error> {
        report(self, self.solve(params))
    }
}

impl Plan for ShiftPlan {
    fn objective(&self) -> f64 {
        f64::from(self.total)
    }

    fn describe(&self, report: &mut Report) {
        let n = self.days.len();
        report.line(format!("Employees needed: {}", self.total));
        report.line("Shifts by start day:");
        for (s, staff) in self.staff.iter().enumerate() {
            report.value(format!("start_{}", self.days[s].0), f64::from(*staff));
            if *staff == 0 {
                continue;
            }
            let worked: Vec<&str> = (0..self.shift_length)
                .map(|k| self.days[(s + k) % n].0.as_str())
                .collect();
            report.line(format!(
                "  starting {}: {staff} -> works {}",
                self.days[s].0,
                worked.join(", ")
            ));
        }
        report.line("Staff per day:");
        for ((day, required), on_duty) in self.days.iter().zip(&self.coverage) {
            report.line(format!("  {day}: {on_duty} (required {required})"));
        }
    }
}

/// Assign each worker exactly one task and each task exactly one worker.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub workers: Vec<String>,
    pub tasks: Vec<String>,
    /// Hours worker `w` needs for task `t`, `hours[w][t]`.
    pub hours: Vec<Vec<f64>>,
}

impl Default for Assignment {
    fn default() -> Self {
        Assignment {
            workers: ["A", "B", "C", "D"].map(String::from).to_vec(),
            tasks: ["1", "2", "3", "4"].map(String::from).to_vec(),
            hours: vec![
                vec![8., 6., 5., 7.],
                vec![6., 7., 8., 6.],
                vec![9., 5., 6., 8.],
                vec![7., 8., 7., 5.],
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentPlan {
    /// `(worker, task, hours)` in worker order.
    pub pairs: Vec<(String, String, f64)>,
    pub total_hours: f64,
}

impl AssignmentPlan {
    pub fn task_of(&self, worker: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(w, _, _)| w == worker)
            .map(|(_, t, _)| t.as_str())
    }
}

impl Assignment {
    fn build(&self, params: &Params) -> (Model<ProblemCreated>, Vec<Vec<Variable>>) {
        let mut model = Model::with_params(params).set_name("assignment").minimize();
        if self.hours.iter().flatten().all(|h| h.fract() == 0.) {
            model = model.set_obj_integral();
        }
        let assign: Vec<Vec<Variable>> = self
            .workers
            .iter()
            .zip(&self.hours)
            .map(|(worker, row)| {
                model.add(self.tasks.iter().zip(row).map(|(task, h)| {
                    var()
                        .name(format!("x_{worker}_{task}"))
                        .binary()
                        .obj(*h)
                }))
            })
            .collect();
        for (worker, row) in self.workers.iter().zip(&assign) {
            model.add(
                cons()
                    .name(format!("worker_{worker}"))
                    .expr(row.iter().map(|x| (x, 1.)))
                    .eq(1.),
            );
        }
        for (t, task) in self.tasks.iter().enumerate() {
            model.add(
                cons()
                    .name(format!("task_{task}"))
                    .expr(assign.iter().map(|row| (&row[t], 1.)))
                    .eq(1.),
            );
        }
        (model, assign)
    }

    pub fn solve(&self, params: &Params) -> Result<AssignmentPlan, Error> {
        let (model, assign) = self.build(params);
        let solved = model.solve()?;
        let sol = solved.require_optimal()?;
        let mut pairs = Vec::with_capacity(self.workers.len());
        for (w, row) in assign.iter().enumerate() {
            for (t, x) in row.iter().enumerate() {
                if is_on(sol.val(x)) {
                    pairs.push((
                        self.workers[w].clone(),
                        self.tasks[t].clone(),
                        self.hours[w][t],
                    ));
                }
            }
        }
        Ok(AssignmentPlan {
            total_hours: pairs.iter().map(|(_, _, h)| h).sum(),
            pairs,
        })
    }
}

impl Example for Assignment {
    fn id(&self) -> &'static str {
        "assignment"
    }

    fn chapter(&self) -> Chapter {
        Chapter::Applications
    }

    fn number(&self) -> u8 {
        5
    }

    fn title(&self) -> &'static str {
        "Task assignment"
    }

    fn statement(&self) -> String {
        let mut text = format!(
            "Assign {} workers to {} tasks, one task each.\n\nHours per task:\n{:<10}",
            self.workers.len(),
            self.tasks.len(),
            ""
        );
        for task in &self.tasks {
            text.push_str(&format!("{:>8}", format!("task {task}")));
        }
        text.push('\n');
        for (worker, row) in self.workers.iter().zip(&self.hours) {
            text.push_str(&format!("{worker:<10}"));
            for h in row {
                text.push_str(&format!("{h:>8}"));
            }
            text.push('\n');
        }
        text.push_str("\nGoal: minimize the total hours.\n");
        text
    }

    fn model(&self, params: &Params) -> Model<ProblemCreated> {
        self.build(params).0
    }

    fn run(&self, params: &Params) -> Result<Report, Error> {
        report(self, self.solve(params))
    }
}

impl Plan for AssignmentPlan {
    fn objective(&self) -> f64 {
        self.total_hours
    }

    fn describe(&self, report: &mut Report) {
        report.line(format!("Total hours: {}", self.total_hours));
        report.line("Assignment:");
        for (worker, task, hours) in &self.pairs {
            report.line(format!("  worker {worker} -> task {task} ({hours} h)"));
            report.value(format!("{worker}->{task}"), *hours);
        }
    }
}
