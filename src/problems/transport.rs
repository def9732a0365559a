//! Shipping goods from supply points to demand points.

use crate::builder::cons::cons;
use crate::builder::var::var;
use crate::error::Error;
use crate::model::{Model, ProblemCreated};
use crate::param::Params;
use crate::problems::{Chapter, Example, Plan, is_on, report};
use crate::report::{Report, money};
use crate::variable::Variable;

#[derive(Debug, Clone, PartialEq)]
pub struct Source {
    pub name: String,
    pub supply: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sink {
    pub name: String,
    pub demand: f64,
}

fn sinks(data: &[(&str, f64)]) -> Vec<Sink> {
    data.iter()
        .map(|&(name, demand)| Sink {
            name: name.to_string(),
            demand,
        })
        .collect()
}

/// Adds one shipment variable per route, `ship[i][j]` from origin `i` to sink `j`, and a
/// demand row per sink.
fn add_routes(
    model: &mut Model<ProblemCreated>,
    origins: &[String],
    sinks: &[Sink],
    cost: &[Vec<f64>],
) -> Vec<Vec<Variable>> {
    let ship: Vec<Vec<Variable>> = origins
        .iter()
        .enumerate()
        .map(|(i, origin)| {
            model.add(
                sinks
                    .iter()
                    .enumerate()
                    .map(|(j, sink)| var().name(format!("ship_{origin}_{}", sink.name)).obj(cost[i][j])),
            )
        })
        .collect();
    for (j, sink) in sinks.iter().enumerate() {
        model.add(
            cons()
                .name(format!("demand_{}", sink.name))
                .expr(ship.iter().map(|row| (&row[j], 1.)))
                .ge(sink.demand),
        );
    }
    ship
}

/// Renders a cost or shipment matrix with origins as rows.
fn matrix(origins: &[String], sinks: &[Sink], values: &[Vec<f64>], decimals: usize) -> String {
    let mut text = format!("{:<10}", "");
    for sink in sinks {
        text.push_str(&format!("{:>8}", sink.name));
    }
    text.push('\n');
    for (origin, row) in origins.iter().zip(values) {
        text.push_str(&format!("{origin:<10}"));
        for value in row {
            text.push_str(&format!("{value:>8.decimals$}"));
        }
        text.push('\n');
    }
    text
}

/// Balanced-or-surplus transportation from factories to warehouses.
#[derive(Debug, Clone, PartialEq)]
pub struct Transportation {
    pub sources: Vec<Source>,
    pub sinks: Vec<Sink>,
    /// Unit shipping cost, `cost[source][sink]`.
    pub cost: Vec<Vec<f64>>,
}

impl Default for Transportation {
    fn default() -> Self {
        Transportation {
            sources: [("F1", 100.), ("F2", 150.), ("F3", 120.)]
                .into_iter()
                .map(|(name, supply)| Source {
                    name: name.to_string(),
                    supply,
                })
                .collect(),
            sinks: sinks(&[("WA", 80.), ("WB", 90.), ("WC", 110.), ("WD", 90.)]),
            cost: vec![
                vec![8., 6., 10., 9.],
                vec![9., 12., 13., 7.],
                vec![14., 9., 16., 5.],
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShippingPlan {
    pub origins: Vec<String>,
    pub sinks: Vec<Sink>,
    /// Shipped units, `shipments[origin][sink]`.
    pub shipments: Vec<Vec<f64>>,
    pub cost: f64,
}

impl ShippingPlan {
    fn new(origins: Vec<String>, sinks: &[Sink], shipments: Vec<Vec<f64>>, cost: f64) -> Self {
        ShippingPlan {
            origins,
            sinks: sinks.to_vec(),
            shipments,
            cost,
        }
    }

    pub fn shipped_from(&self, origin: usize) -> f64 {
        self.shipments[origin].iter().sum()
    }

    pub fn delivered_to(&self, sink: usize) -> f64 {
        self.shipments.iter().map(|row| row[sink]).sum()
    }
}

impl Transportation {
    fn origins(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.name.clone()).collect()
    }

    fn build(&self, params: &Params) -> (Model<ProblemCreated>, Vec<Vec<Variable>>) {
        let mut model = Model::with_params(params)
            .set_name("transportation")
            .minimize();
        let ship = add_routes(&mut model, &self.origins(), &self.sinks, &self.cost);
        for (source, row) in self.sources.iter().zip(&ship) {
            model.add(
                cons()
                    .name(format!("supply_{}", source.name))
                    .expr(row.iter().map(|x| (x, 1.)))
                    .le(source.supply),
            );
        }
        (model, ship)
    }

    pub fn solve(&self, params: &Params) -> Result<ShippingPlan, Error> {
        let (model, ship) = self.build(params);
        let solved = model.solve()?;
        let sol = solved.require_optimal()?;
        let shipments: Vec<Vec<f64>> = ship
            .iter()
            .map(|row| row.iter().map(|x| sol.val(x)).collect())
            .collect();
        Ok(ShippingPlan::new(
            self.origins(),
            &self.sinks,
            shipments,
            sol.obj_val(),
        ))
    }
}

impl Example for Transportation {
    fn id(&self) -> &'static str {
        "transportation"
    }

    fn chapter(&self) -> Chapter {
        Chapter::Linear
    }

    fn number(&self) -> u8 {
        6
    }

    fn title(&self) -> &'static str {
        "Transportation"
    }

    fn statement(&self) -> String {
        let mut text = format!(
            "Ship goods from {} factories to {} warehouses.\n\nSupply:\n",
            self.sources.len(),
            self.sinks.len()
        );
        for source in &self.sources {
            text.push_str(&format!("  {}: {}\n", source.name, source.supply));
        }
        text.push_str("Demand:\n");
        for sink in &self.sinks {
            text.push_str(&format!("  {}: {}\n", sink.name, sink.demand));
        }
        text.push_str("\nUnit cost:\n");
        text.push_str(&matrix(&self.origins(), &self.sinks, &self.cost, 0));
        text.push_str("\nGoal: minimize the total shipping cost.\n");
        text
    }

    fn model(&self, params: &Params) -> Model<ProblemCreated> {
        self.build(params).0
    }

    fn run(&self, params: &Params) -> Result<Report, Error> {
        report(self, self.solve(params))
    }
}

impl Plan for ShippingPlan {
    fn objective(&self) -> f64 {
        self.cost
    }

    fn describe(&self, report: &mut Report) {
        report.line(format!("Minimum shipping cost: {}", money(self.cost, 2)));
        report.line("Shipments:");
        for line in matrix(&self.origins, &self.sinks, &self.shipments, 0).lines() {
            report.line(line);
        }
        for (origin, row) in self.origins.iter().zip(&self.shipments) {
            for (sink, units) in self.sinks.iter().zip(row) {
                report.value(format!("{origin}->{}", sink.name), *units);
            }
        }
    }
}

/// A candidate warehouse site.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub name: String,
    pub build_cost: f64,
    pub capacity: f64,
}

/// Choose warehouse sites and supply stores from them.
#[derive(Debug, Clone, PartialEq)]
pub struct FacilityLocation {
    pub candidates: Vec<Candidate>,
    pub stores: Vec<Sink>,
    /// Unit shipping cost, `cost[candidate][store]`.
    pub cost: Vec<Vec<f64>>,
}

impl Default for FacilityLocation {
    fn default() -> Self {
        let candidate = |name: &str, build_cost: f64, capacity: f64| Candidate {
            name: name.to_string(),
            build_cost,
            capacity,
        };
        FacilityLocation {
            candidates: vec![
                candidate("1", 500_000., 100.),
                candidate("2", 400_000., 80.),
                candidate("3", 600_000., 120.),
            ],
            stores: sinks(&[("A", 40.), ("B", 50.), ("C", 30.), ("D", 60.)]),
            cost: vec![
                vec![8., 10., 6., 7.],
                vec![5., 6., 9., 11.],
                vec![9., 7., 4., 5.],
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FacilityPlan {
    pub open: Vec<bool>,
    pub shipping: ShippingPlan,
    pub build_cost: f64,
    pub total_cost: f64,
}

impl FacilityLocation {
    fn origins(&self) -> Vec<String> {
        self.candidates.iter().map(|c| c.name.clone()).collect()
    }

    fn build(
        &self,
        params: &Params,
    ) -> (Model<ProblemCreated>, Vec<Variable>, Vec<Vec<Variable>>) {
        let mut model = Model::with_params(params)
            .set_name("facility_location")
            .minimize();
        let open = model.add(
            self.candidates
                .iter()
                .map(|c| var().name(format!("build_{}", c.name)).binary().obj(c.build_cost)),
        );
        let ship = add_routes(&mut model, &self.origins(), &self.stores, &self.cost);
        for ((candidate, y), row) in self.candidates.iter().zip(&open).zip(&ship) {
            model.add(
                cons()
                    .name(format!("capacity_{}", candidate.name))
                    .expr(row.iter().map(|x| (x, 1.)))
                    .coef(y, -candidate.capacity)
                    .le(0.),
            );
        }
        (model, open, ship)
    }

    pub fn solve(&self, params: &Params) -> Result<FacilityPlan, Error> {
        let (model, open, ship) = self.build(params);
        let solved = model.solve()?;
        let sol = solved.require_optimal()?;
        let open: Vec<bool> = open.iter().map(|y| is_on(sol.val(y))).collect();
        let build_cost = self
            .candidates
            .iter()
            .zip(&open)
            .filter(|(_, open)| **open)
            .map(|(c, _)| c.build_cost)
            .sum::<f64>();
        let shipments: Vec<Vec<f64>> = ship
            .iter()
            .map(|row| row.iter().map(|x| sol.val(x)).collect())
            .collect();
        let shipping = ShippingPlan::new(
            self.origins(),
            &self.stores,
            shipments,
            sol.obj_val() - build_cost,
        );
        Ok(FacilityPlan {
            open,
            shipping,
            build_cost,
            total_cost: sol.obj_val(),
        })
    }
}

impl Example for FacilityLocation {
    fn id(&self) -> &'static str {
        "facility-location"
    }

    fn chapter(&self) -> Chapter {
        Chapter::MixedInteger
    }

    fn number(&self) -> u8 {
        5
    }

    fn title(&self) -> &'static str {
        "Facility location"
    }

    fn statement(&self) -> String {
        let mut text = format!(
            "Pick warehouse sites among {} candidates to supply {} stores.\n\nBuild cost and capacity:\n",
            self.candidates.len(),
            self.stores.len()
        );
        for c in &self.candidates {
            text.push_str(&format!(
                "  site {}: {}, capacity {}\n",
                c.name,
                money(c.build_cost, 0),
                c.capacity
            ));
        }
        text.push_str("Store demand:\n");
        for store in &self.stores {
            text.push_str(&format!("  {}: {}\n", store.name, store.demand));
        }
        text.push_str("\nUnit cost:\n");
        text.push_str(&matrix(&self.origins(), &self.stores, &self.cost, 0));
        text.push_str("\nGoal: minimize build plus shipping cost.\n");
        text
    }

    fn model(&self, params: &Params) -> Model<ProblemCreated> {
        self.build(params).0
    }

    fn run(&self, params: &Params) -> Result<Report, Error> {
        report(self, self.solve(params))
    }
}

impl Plan for FacilityPlan {
    fn objective(&self) -> f64 {
        self.total_cost
    }

    fn describe(&self, report: &mut Report) {
        report.line(format!("Total cost: {}", money(self.total_cost, 0)));
        report.line(format!("  build: {}", money(self.build_cost, 0)));
        report.line(format!("  shipping: {}", money(self.shipping.cost, 0)));
        report.line("Sites:");
        for ((name, open), row) in self
            .shipping
            .origins
            .iter()
            .zip(&self.open)
            .zip(&self.shipping.shipments)
        {
            report.value(format!("build_{name}"), if *open { 1. } else { 0. });
            if !*open {
                report.line(format!("  site {name}: not built"));
                continue;
            }
            report.line(format!("  site {name}: built, ships"));
            for (store, units) in self.shipping.sinks.iter().zip(row) {
                if *units > 1e-6 {
                    report.line(format!("    -> store {}: {units:.0}", store.name));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transportation_optimum() {
        let problem = Transportation::default();
        let plan = problem.solve(&Params::default()).unwrap();
        assert!((plan.cost - 3110.).abs() < 1e-6);
        for (i, source) in problem.sources.iter().enumerate() {
            assert!(plan.shipped_from(i) <= source.supply + 1e-6);
        }
        for (j, sink) in problem.sinks.iter().enumerate() {
            assert!(plan.delivered_to(j) >= sink.demand - 1e-6);
        }
    }

    #[test]
    fn transportation_statement_has_cost_matrix() {
        let text = Transportation::default().statement();
        assert!(text.contains("F3              14       9      16       5\n"));
    }

    #[test]
    fn facility_location_opens_two_sites() {
        let problem = FacilityLocation::default();
        let plan = problem.solve(&Params::default()).unwrap();
        assert!((plan.total_cost - 901_130.).abs() < 1e-3);
        assert_eq!(plan.open, [true, true, false]);
        assert!((plan.build_cost - 900_000.).abs() < 1e-9);
        assert!((plan.shipping.cost - 1_130.).abs() < 1e-3);
        for (i, candidate) in problem.candidates.iter().enumerate() {
            let shipped = plan.shipping.shipped_from(i);
            let limit = if plan.open[i] { candidate.capacity } else { 0. };
            assert!(shipped <= limit + 1e-6);
        }
    }

    #[test]
    fn facility_report_lists_sites() {
        let report = FacilityLocation::default()
            .run(&Params::default())
            .unwrap();
        assert!(report.lines.contains(&"Total cost: $901,130".to_string()));
        assert!(report.lines.contains(&"  site 3: not built".to_string()));
        assert_eq!(report.get("build_1"), Some(1.));
    }
}
