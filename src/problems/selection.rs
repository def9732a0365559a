//! Yes/no selection under a single capacity: project portfolios and knapsacks.

use crate::builder::cons::cons;
use crate::builder::var::var;
use crate::error::Error;
use crate::model::{Model, ProblemCreated};
use crate::param::Params;
use crate::problems::{Chapter, Example, Plan, is_on, report};
use crate::report::{Report, money, thousands};
use crate::variable::Variable;

/// Something that can be picked, consuming `weight` of the capacity and earning `value`.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub name: String,
    pub weight: f64,
    pub value: f64,
}

fn items(data: &[(&str, f64, f64)]) -> Vec<Item> {
    data.iter()
        .map(|&(name, weight, value)| Item {
            name: name.to_string(),
            weight,
            value,
        })
        .collect()
}

fn build_selection(
    name: &str,
    items: &[Item],
    capacity: f64,
    params: &Params,
) -> (Model<ProblemCreated>, Vec<Variable>) {
    let mut model = Model::with_params(params).set_name(name).maximize();
    if items.iter().all(|i| i.value.fract() == 0.) {
        model = model.set_obj_integral();
    }
    let picks = model.add(
        items
            .iter()
            .map(|i| var().name(format!("x_{}", i.name)).binary().obj(i.value)),
    );
    model.add(
        cons()
            .name("capacity")
            .expr(items.iter().zip(&picks).map(|(i, x)| (x, i.weight)))
            .le(capacity),
    );
    (model, picks)
}

fn solve_selection(
    name: &str,
    items: &[Item],
    capacity: f64,
    params: &Params,
) -> Result<SelectionPlan, Error> {
    let (model, picks) = build_selection(name, items, capacity, params);
    let solved = model.solve()?;
    let sol = solved.require_optimal()?;
    let chosen: Vec<Item> = items
        .iter()
        .zip(&picks)
        .filter(|(_, x)| is_on(sol.val(x)))
        .map(|(i, _)| i.clone())
        .collect();
    Ok(SelectionPlan {
        weight: chosen.iter().map(|i| i.weight).sum(),
        value: chosen.iter().map(|i| i.value).sum(),
        chosen,
        capacity,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectionPlan {
    pub chosen: Vec<Item>,
    pub weight: f64,
    pub value: f64,
    pub capacity: f64,
}

impl SelectionPlan {
    pub fn names(&self) -> Vec<&str> {
        self.chosen.iter().map(|i| i.name.as_str()).collect()
    }

    fn record_values(&self, report: &mut Report) {
        for item in &self.chosen {
            report.value(item.name.as_str(), 1.);
        }
    }
}

/// Projects competing for a budget.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectSelection {
    /// Projects as items: cost is the weight, expected profit the value.
    pub projects: Vec<Item>,
    pub budget: f64,
}

impl Default for ProjectSelection {
    fn default() -> Self {
        ProjectSelection {
            projects: items(&[
                ("A", 30_000., 50_000.),
                ("B", 40_000., 60_000.),
                ("C", 25_000., 35_000.),
                ("D", 35_000., 55_000.),
                ("E", 20_000., 25_000.),
            ]),
            budget: 100_000.,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectPlan(pub SelectionPlan);

impl ProjectSelection {
    pub fn solve(&self, params: &Params) -> Result<ProjectPlan, Error> {
        solve_selection("project_selection", &self.projects, self.budget, params).map(ProjectPlan)
    }
}

impl Example for ProjectSelection {
    fn id(&self) -> &'static str {
        "project-selection"
    }

    fn chapter(&self) -> Chapter {
        Chapter::MixedInteger
    }

    fn number(&self) -> u8 {
        2
    }

    fn title(&self) -> &'static str {
        "Project selection"
    }

    fn statement(&self) -> String {
        let mut text = format!(
            "Choose projects within a budget of {}.\n\n{:<10}{:>12}{:>12}\n",
            money(self.budget, 0),
            "project",
            "cost",
            "profit"
        );
        for p in &self.projects {
            text.push_str(&format!(
                "{:<10}{:>12}{:>12}\n",
                p.name,
                money(p.weight, 0),
                money(p.value, 0)
            ));
        }
        text.push_str("\nGoal: maximize the expected profit.\n");
        text
    }

    fn model(&self, params: &Params) -> Model<ProblemCreated> {
        build_selection("project_selection", &self.projects, self.budget, params).0
    }

    fn run(&self, params: &Params) -> Result<Report, Error> {
        report(self, self.solve(params))
    }
}

impl Plan for ProjectPlan {
    fn objective(&self) -> f64 {
        self.0.value
    }

    fn describe(&self, report: &mut Report) {
        let plan = &self.0;
        report.line(format!("Expected profit: {}", money(plan.value, 0)));
        report.line("Selected projects:");
        for p in &plan.chosen {
            report.line(format!(
                "  {}: cost {}, profit {}",
                p.name,
                money(p.weight, 0),
                money(p.value, 0)
            ));
        }
        report.line(format!(
            "Budget used: {} / {}",
            money(plan.weight, 0),
            money(plan.capacity, 0)
        ));
        plan.record_values(report);
    }
}

/// The 0-1 knapsack.
#[derive(Debug, Clone, PartialEq)]
pub struct Knapsack {
    pub items: Vec<Item>,
    pub capacity: f64,
}

impl Default for Knapsack {
    fn default() -> Self {
        Knapsack {
            items: items(&[
                ("A", 5., 60.),
                ("B", 3., 50.),
                ("C", 4., 70.),
                ("D", 2., 30.),
                ("E", 6., 80.),
                ("F", 1., 20.),
                ("G", 4., 55.),
            ]),
            capacity: 12.,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KnapsackPlan(pub SelectionPlan);

impl Knapsack {
    pub fn solve(&self, params: &Params) -> Result<KnapsackPlan, Error> {
        solve_selection("knapsack", &self.items, self.capacity, params).map(KnapsackPlan)
    }
}

impl Example for Knapsack {
    fn id(&self) -> &'static str {
        "knapsack"
    }

    fn chapter(&self) -> Chapter {
        Chapter::Applications
    }

    fn number(&self) -> u8 {
        3
    }

    fn title(&self) -> &'static str {
        "Knapsack"
    }

    fn statement(&self) -> String {
        let mut text = format!(
            "Pack a bag holding {} kg.\n\n{:<8}{:>8}{:>8}\n",
            self.capacity, "item", "weight", "value"
        );
        for i in &self.items {
            text.push_str(&format!(
                "{:<8}{:>6}kg{:>8}\n",
                i.name,
                i.weight,
                money(i.value, 0)
            ));
        }
        text.push_str("\nGoal: maximize the packed value.\n");
        text
    }

    fn model(&self, params: &Params) -> Model<ProblemCreated> {
        build_selection("knapsack", &self.items, self.capacity, params).0
    }

    fn run(&self, params: &Params) -> Result<Report, Error> {
        report(self, self.solve(params))
    }
}

impl Plan for KnapsackPlan {
    fn objective(&self) -> f64 {
        self.0.value
    }

    fn describe(&self, report: &mut Report) {
        let plan = &self.0;
        report.line(format!("Total value: {}", money(plan.value, 0)));
        report.line("Packed items:");
        for i in &plan.chosen {
            report.line(format!(
                "  {}: {} kg, {}",
                i.name,
                thousands(i.weight, 0),
                money(i.value, 0)
            ));
        }
        report.line(format!("Capacity used: {} kg / {} kg", plan.weight, plan.capacity));
        plan.record_values(report);
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    #[test]
    fn project_selection_optimum() {
        let ProjectPlan(plan) = ProjectSelection::default()
            .solve(&Params::default())
            .unwrap();
        assert_eq!(plan.value, 150_000.);
        assert_eq!(plan.names(), ["B", "C", "D"]);
        assert_eq!(plan.weight, 100_000.);
    }

    #[test]
    fn knapsack_optimum() {
        let KnapsackPlan(plan) = Knapsack::default().solve(&Params::default()).unwrap();
        assert_eq!(plan.value, 195.);
        assert_eq!(plan.names(), ["B", "C", "F", "G"]);
        assert_eq!(plan.weight, 12.);
    }

    #[test]
    fn knapsack_report() {
        let report = Knapsack::default().run(&Params::default()).unwrap();
        assert_eq!(report.objective, Some(195.));
        assert!(report.lines.contains(&"  C: 4 kg, $70".to_string()));
        assert!(report.lines.contains(&"Capacity used: 12 kg / 12 kg".to_string()));
        assert_eq!(report.get("G"), Some(1.));
        assert_eq!(report.get("A"), None);
    }

    #[test]
    fn nothing_fits_in_an_empty_bag() {
        let knapsack = Knapsack {
            capacity: 0.,
            ..Knapsack::default()
        };
        let KnapsackPlan(plan) = knapsack.solve(&Params::default()).unwrap();
        assert!(plan.chosen.is_empty());
        assert_eq!(plan.value, 0.);
    }

    fn brute_force(items: &[Item], capacity: f64) -> f64 {
        let n = items.len();
        (0u32..1 << n)
            .filter_map(|mask| {
                let picked = items.iter().enumerate().filter(|(i, _)| mask & (1 << i) != 0);
                let (weight, value) = picked.fold((0., 0.), |(w, v), (_, item)| {
                    (w + item.weight, v + item.value)
                });
                (weight <= capacity).then_some(value)
            })
            .fold(0., f64::max)
    }

    #[test]
    fn random_knapsacks_match_brute_force() {
        let mut rng = StdRng::seed_from_u64(7);
        for round in 0..25 {
            let n = rng.gen_range(3..=9usize);
            let items: Vec<Item> = (0..n)
                .map(|i| Item {
                    name: format!("i{i}"),
                    weight: f64::from(rng.gen_range(1..=10u32)),
                    value: f64::from(rng.gen_range(1..=40u32)),
                })
                .collect();
            let capacity = f64::from(rng.gen_range(5..=25u32));
            let knapsack = Knapsack { items, capacity };

            let KnapsackPlan(plan) = knapsack.solve(&Params::default()).unwrap();
            let best = brute_force(&knapsack.items, capacity);
            assert_eq!(plan.value, best, "round {round}: {knapsack:?}");
            assert!(plan.weight <= capacity);
        }
    }
}
