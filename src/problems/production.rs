//! Production planning with integer quantities, logical conditions and inventories.

use crate::builder::cons::cons;
use crate::builder::var::var;
use crate::error::Error;
use crate::model::{Model, ProblemCreated};
use crate::param::Params;
use crate::problems::allocation::{Product, ProductMix, ProductMixPlan, Resource, ResourceAllocation};
use crate::problems::{Chapter, Example, Plan, count, is_on, report};
use crate::report::{Report, money};
use crate::variable::Variable;

/// Two products made in whole units, compared against the continuous relaxation.
#[derive(Debug, Clone, PartialEq)]
pub struct IntegerProduction {
    pub mix: ProductMix,
}

impl Default for IntegerProduction {
    fn default() -> Self {
        let product = |name: &str, profit: f64, usage: [f64; 2]| Product {
            name: name.to_string(),
            profit,
            usage: usage.to_vec(),
        };
        IntegerProduction {
            mix: ProductMix {
                products: vec![product("A", 50., [2., 3.]), product("B", 40., [3., 2.])],
                resources: vec![
                    Resource {
                        name: "machine_hours".to_string(),
                        capacity: 12.,
                    },
                    Resource {
                        name: "workers".to_string(),
                        capacity: 10.,
                    },
                ],
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntegerProductionPlan {
    pub integer: ProductMixPlan,
    pub relaxed: ProductMixPlan,
}

impl IntegerProduction {
    fn build(&self, params: &Params, integral: bool) -> (Model<ProblemCreated>, Vec<Variable>) {
        let name = if integral {
            "production_integer"
        } else {
            "production_continuous"
        };
        let mut model = Model::with_params(params).set_name(name).maximize();
        if integral {
            model = model.set_obj_integral();
        }
        let quantities = self.mix.add_to(&mut model, integral);
        (model, quantities)
    }

    fn solve_mix(&self, params: &Params, integral: bool) -> Result<ProductMixPlan, Error> {
        let (model, quantities) = self.build(params, integral);
        let solved = model.solve()?;
        let sol = solved.require_optimal()?;
        Ok(self.mix.plan(quantities.iter().map(|x| sol.val(x)).collect()))
    }

    pub fn solve(&self, params: &Params) -> Result<IntegerProductionPlan, Error> {
        Ok(IntegerProductionPlan {
            integer: self.solve_mix(params, true)?,
            relaxed: self.solve_mix(params, false)?,
        })
    }
}

impl Example for IntegerProduction {
    fn id(&self) -> &'static str {
        "integer-production"
    }

    fn chapter(&self) -> Chapter {
        Chapter::MixedInteger
    }

    fn number(&self) -> u8 {
        1
    }

    fn title(&self) -> &'static str {
        "Integer production planning"
    }

    fn statement(&self) -> String {
        format!(
            "Products can only be made in whole units.\n\n{}\nGoal: maximize profit with integer quantities.\n",
            self.mix.table()
        )
    }

    fn model(&self, params: &Params) -> Model<ProblemCreated> {
        self.build(params, true).0
    }

    fn run(&self, params: &Params) -> Result<Report, Error> {
        report(self, self.solve(params))
    }
}

impl Plan for IntegerProductionPlan {
    fn objective(&self) -> f64 {
        self.integer.profit
    }

    fn describe(&self, report: &mut Report) {
        self.integer.describe_with(report, 0);
        report.line("Continuous relaxation for comparison:");
        let quantities: Vec<String> = self
            .relaxed
            .quantities
            .iter()
            .map(|(name, q)| format!("{name} = {q:.2}"))
            .collect();
        report.line(format!("  {}", quantities.join(", ")));
        report.line(format!("  profit: {}", money(self.relaxed.profit, 2)));
        report.value("relaxed_profit", self.relaxed.profit);
    }
}

/// The resource allocation mix where two products cannot both be produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ExclusiveProduction {
    pub mix: ProductMix,
    /// Indices of the two mutually exclusive products.
    pub exclusive: (usize, usize),
    /// Upper bound on any production quantity, linking it to its on/off switch.
    pub big_m: f64,
}

impl Default for ExclusiveProduction {
    fn default() -> Self {
        ExclusiveProduction {
            mix: ResourceAllocation::default().mix,
            exclusive: (0, 2),
            big_m: 100.,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExclusivePlan {
    pub mix: ProductMixPlan,
    /// `(product, produced)` for both exclusive products.
    pub chosen: Vec<(String, bool)>,
}

impl ExclusiveProduction {
    fn build(&self, params: &Params) -> (Model<ProblemCreated>, Vec<Variable>, Vec<Variable>) {
        let mut model = Model::with_params(params)
            .set_name("exclusive_production")
            .maximize();
        let quantities = self.mix.add_to(&mut model, false);
        let (a, b) = self.exclusive;
        let switches: Vec<Variable> = [a, b]
            .into_iter()
            .map(|i| {
                let product = &self.mix.products[i];
                let y = model.add(var().name(format!("y_{}", product.name)).binary());
                model.add(
                    cons()
                        .name(format!("big_m_{}", product.name))
                        .coef(&quantities[i], 1.)
                        .coef(&y, -self.big_m)
                        .le(0.),
                );
                y
            })
            .collect();
        model.add(
            cons()
                .name("exclusive")
                .expr(switches.iter().map(|y| (y, 1.)))
                .le(1.),
        );
        (model, quantities, switches)
    }

    pub fn solve(&self, params: &Params) -> Result<ExclusivePlan, Error> {
        let (model, quantities, switches) = self.build(params);
        let solved = model.solve()?;
        let sol = solved.require_optimal()?;
        let (a, b) = self.exclusive;
        Ok(ExclusivePlan {
            mix: self.mix.plan(quantities.iter().map(|x| sol.val(x)).collect()),
            chosen: [a, b]
                .into_iter()
                .zip(&switches)
                .map(|(i, y)| (self.mix.products[i].name.clone(), is_on(sol.val(y))))
                .collect(),
        })
    }
}

impl Example for ExclusiveProduction {
    fn id(&self) -> &'static str {
        "exclusive-production"
    }

    fn chapter(&self) -> Chapter {
        Chapter::MixedInteger
    }

    fn number(&self) -> u8 {
        3
    }

    fn title(&self) -> &'static str {
        "Exclusive choice with big-M"
    }

    fn statement(&self) -> String {
        let (a, b) = self.exclusive;
        let (a, b) = (&self.mix.products[a].name, &self.mix.products[b].name);
        format!(
            "The resource allocation mix, but {a} and {b} share a machine and cannot both be made.\n\n\
             {}\nWith binary switches y and M = {}:\n  \
             x_{a} <= M y_{a}\n  x_{b} <= M y_{b}\n  y_{a} + y_{b} <= 1\n",
            self.mix.table(),
            self.big_m
        )
    }

    fn model(&self, params: &Params) -> Model<ProblemCreated> {
        self.build(params).0
    }

    fn run(&self, params: &Params) -> Result<Report, Error> {
        report(self, self.solve(params))
    }
}

impl Plan for ExclusivePlan {
    fn objective(&self) -> f64 {
        self.mix.profit
    }

    fn describe(&self, report: &mut Report) {
        self.mix.describe(report);
        report.line("Choice:");
        for (name, produced) in &self.chosen {
            let answer = if *produced { "yes" } else { "no" };
            report.line(format!("  produce {name}: {answer}"));
        }
    }
}

/// A product line that costs a fixed amount when it runs at all.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductLine {
    pub name: String,
    pub unit_profit: f64,
    pub fixed_cost: f64,
    pub max_output: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FixedCost {
    pub lines: Vec<ProductLine>,
    /// Shared production hours, one hour per unit.
    pub hours: f64,
}

impl Default for FixedCost {
    fn default() -> Self {
        let line = |name: &str, unit_profit: f64, fixed_cost: f64, max_output: f64| ProductLine {
            name: name.to_string(),
            unit_profit,
            fixed_cost,
            max_output,
        };
        FixedCost {
            lines: vec![
                line("A", 10., 50., 20.),
                line("B", 15., 80., 15.),
                line("C", 8., 30., 25.),
            ],
            hours: 30.,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FixedCostPlan {
    /// `(line, output, running)`.
    pub lines: Vec<(String, u32, bool)>,
    pub variable_profit: f64,
    pub fixed_cost: f64,
}

impl FixedCostPlan {
    pub fn net_profit(&self) -> f64 {
        self.variable_profit - self.fixed_cost
    }
}

impl FixedCost {
    fn build(&self, params: &Params) -> (Model<ProblemCreated>, Vec<Variable>, Vec<Variable>) {
        let mut model = Model::with_params(params)
            .set_name("fixed_cost")
            .maximize()
            .set_obj_integral();
        let output = model.add(self.lines.iter().map(|l| {
            var()
                .name(format!("x_{}", l.name))
                .nonneg_integer()
                .obj(l.unit_profit)
        }));
        let running = model.add(
            self.lines
                .iter()
                .map(|l| var().name(format!("y_{}", l.name)).binary().obj(-l.fixed_cost)),
        );
        model.add(
            cons()
                .name("hours")
                .expr(output.iter().map(|x| (x, 1.)))
                .le(self.hours),
        );
        for ((line, x), y) in self.lines.iter().zip(&output).zip(&running) {
            model.add(
                cons()
                    .name(format!("run_{}", line.name))
                    .coef(x, 1.)
                    .coef(y, -line.max_output)
                    .le(0.),
            );
        }
        (model, output, running)
    }

    pub fn solve(&self, params: &Params) -> Result<FixedCostPlan, Error> {
        let (model, output, running) = self.build(params);
        let solved = model.solve()?;
        let sol = solved.require_optimal()?;
        let mut plan = FixedCostPlan {
            lines: Vec::with_capacity(self.lines.len()),
            variable_profit: 0.,
            fixed_cost: 0.,
        };
        for ((line, x), y) in self.lines.iter().zip(&output).zip(&running) {
            let units = count(sol.val(x));
            let on = is_on(sol.val(y));
            plan.variable_profit += line.unit_profit * f64::from(units);
            if on {
                plan.fixed_cost += line.fixed_cost;
            }
            plan.lines.push((line.name.clone(), units, on));
        }
        Ok(plan)
    }
}

impl Example for FixedCost {
    fn id(&self) -> &'static str {
        "fixed-cost"
    }

    fn chapter(&self) -> Chapter {
        Chapter::MixedInteger
    }

    fn number(&self) -> u8 {
        4
    }

    fn title(&self) -> &'static str {
        "Fixed activation costs"
    }

    fn statement(&self) -> String {
        let mut text = format!(
            "Running a product line costs a fixed amount.\n\n{:<8}{:>14}{:>12}{:>12}\n",
            "", "profit/unit", "fixed", "max units"
        );
        for line in &self.lines {
            text.push_str(&format!(
                "{:<8}{:>14}{:>12}{:>12}\n",
                line.name,
                money(line.unit_profit, 0),
                money(line.fixed_cost, 0),
                line.max_output
            ));
        }
        text.push_str(&format!(
            "\nProduction hours: {} (one hour per unit)\nGoal: maximize net profit.\n",
            self.hours
        ));
        text
    }

    fn model(&self, params: &Params) -> Model<ProblemCreated> {
        self.build(params).0
    }

    fn run(&self, params: &Params) -> Result<Report, Error> {
        report(self, self.solve(params))
    }
}

impl Plan for FixedCostPlan {
    fn objective(&self) -> f64 {
        self.net_profit()
    }

    fn describe(&self, report: &mut Report) {
        report.line(format!("Net profit: {}", money(self.net_profit(), 0)));
        report.line("Production:");
        for (name, units, on) in &self.lines {
            let state = if *on { "running" } else { "idle" };
            report.line(format!("  {name}: {units} units ({state})"));
            report.value(name.as_str(), f64::from(*units));
        }
        report.line(format!("Variable profit: {}", money(self.variable_profit, 0)));
        report.line(format!("Fixed cost: {}", money(self.fixed_cost, 0)));
    }
}

/// Uncapacitated-style lot sizing with a per-period production limit.
#[derive(Debug, Clone, PartialEq)]
pub struct LotSizing {
    pub demand: Vec<f64>,
    pub setup_cost: f64,
    pub unit_cost: f64,
    /// Cost per unit held over one period.
    pub holding_cost: f64,
    pub max_output: f64,
}

impl Default for LotSizing {
    fn default() -> Self {
        LotSizing {
            demand: vec![40., 60., 30., 50.],
            setup_cost: 100.,
            unit_cost: 5.,
            holding_cost: 2.,
            max_output: 80.,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LotPeriod {
    pub demand: f64,
    pub output: u32,
    pub inventory: f64,
    pub setup: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LotSizingPlan {
    pub periods: Vec<LotPeriod>,
    pub cost: f64,
}

impl LotSizing {
    fn build(
        &self,
        params: &Params,
    ) -> (
        Model<ProblemCreated>,
        Vec<Variable>,
        Vec<Variable>,
        Vec<Variable>,
    ) {
        let mut model = Model::with_params(params).set_name("lot_sizing").minimize();
        let periods = 1..=self.demand.len();
        let output = model.add(periods.clone().map(|t| {
            var()
                .name(format!("produce_{t}"))
                .nonneg_integer()
                .obj(self.unit_cost)
        }));
        let setup = model.add(
            periods
                .clone()
                .map(|t| var().name(format!("setup_{t}")).binary().obj(self.setup_cost)),
        );
        let inventory = model.add(
            periods.map(|t| var().name(format!("inventory_{t}")).obj(self.holding_cost)),
        );

        for (t, demand) in self.demand.iter().enumerate() {
            // inventory[t-1] + output[t] - inventory[t] = demand[t]
            let mut balance = cons()
                .name(format!("balance_{}", t + 1))
                .coef(&output[t], 1.)
                .coef(&inventory[t], -1.);
            if t > 0 {
                balance = balance.coef(&inventory[t - 1], 1.);
            }
            model.add(balance.eq(*demand));
            model.add(
                cons()
                    .name(format!("setup_link_{}", t + 1))
                    .coef(&output[t], 1.)
                    .coef(&setup[t], -self.max_output)
                    .le(0.),
            );
        }
        (model, output, setup, inventory)
    }

    pub fn solve(&self, params: &Params) -> Result<LotSizingPlan, Error> {
        let (model, output, setup, inventory) = self.build(params);
        let solved = model.solve()?;
        let sol = solved.require_optimal()?;
        let periods = self
            .demand
            .iter()
            .enumerate()
            .map(|(t, demand)| LotPeriod {
                demand: *demand,
                output: count(sol.val(&output[t])),
                inventory: sol.val(&inventory[t]),
                setup: is_on(sol.val(&setup[t])),
            })
            .collect();
        Ok(LotSizingPlan {
            periods,
            cost: sol.obj_val(),
        })
    }
}

impl Example for LotSizing {
    fn id(&self) -> &'static str {
        "lot-sizing"
    }

    fn chapter(&self) -> Chapter {
        Chapter::MixedInteger
    }

    fn number(&self) -> u8 {
        6
    }

    fn title(&self) -> &'static str {
        "Lot sizing"
    }

    fn statement(&self) -> String {
        let demand: Vec<String> = self
            .demand
            .iter()
            .enumerate()
            .map(|(t, d)| format!("period {} = {d}", t + 1))
            .collect();
        format!(
            "Plan production over {} periods.\n\nDemand: {}\n\nCosts:\n  setup: {} per run\n  \
             production: {} per unit\n  holding: {} per unit and period\n\n\
             At most {} units per period, no backlog.\nGoal: minimize the total cost.\n",
            self.demand.len(),
            demand.join(", "),
            money(self.setup_cost, 0),
            money(self.unit_cost, 0),
            money(self.holding_cost, 0),
            self.max_output
        )
    }

    fn model(&self, params: &Params) -> Model<ProblemCreated> {
        self.build(params).0
    }

    fn run(&self, params: &Params) -> Result<Report, Error> {
        report(self, self.solve(params))
    }
}

impl Plan for LotSizingPlan {
    fn objective(&self) -> f64 {
        self.cost
    }

    fn describe(&self, report: &mut Report) {
        report.line(format!("Total cost: {}", money(self.cost, 0)));
        report.line("period  demand  output  inventory  setup");
        report.line("-".repeat(45));
        for (t, period) in self.periods.iter().enumerate() {
            let setup = if period.setup { "yes" } else { "-" };
            report.line(format!(
                "{:>6}  {:>6}  {:>6}  {:>9.0}  {setup:>5}",
                t + 1,
                period.demand,
                period.output,
                period.inventory
            ));
            report.value(format!("produce_{}", t + 1), f64::from(period.output));
        }
    }
}

/// Regular and overtime production over several months with inventory carried forward.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiPeriod {
    pub demand: Vec<f64>,
    pub regular_cost: f64,
    pub regular_capacity: f64,
    pub overtime_cost: f64,
    pub overtime_capacity: f64,
    pub holding_cost: f64,
    pub initial_inventory: f64,
    /// Minimum stock at the end of the last month.
    pub final_inventory: f64,
}

impl Default for MultiPeriod {
    fn default() -> Self {
        MultiPeriod {
            demand: vec![100., 150., 120.],
            regular_cost: 10.,
            regular_capacity: 80.,
            overtime_cost: 15.,
            overtime_capacity: 40.,
            holding_cost: 2.,
            initial_inventory: 20.,
            final_inventory: 30.,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Month {
    pub demand: f64,
    pub regular: f64,
    pub overtime: f64,
    pub inventory: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MultiPeriodPlan {
    pub months: Vec<Month>,
    pub cost: f64,
}

impl MultiPeriod {
    /// Units that must be produced in total: all demand plus the final stock, minus what is
    /// already in stock.
    pub fn required_output(&self) -> f64 {
        self.demand.iter().sum::<f64>() + self.final_inventory - self.initial_inventory
    }

    pub fn capacity(&self) -> f64 {
        (self.regular_capacity + self.overtime_capacity) * self.demand.len() as f64
    }

    fn build(
        &self,
        params: &Params,
    ) -> (
        Model<ProblemCreated>,
        Vec<Variable>,
        Vec<Variable>,
        Vec<Variable>,
    ) {
        let mut model = Model::with_params(params)
            .set_name("multi_period_production")
            .minimize();
        let months = 1..=self.demand.len();
        let regular = model.add(months.clone().map(|m| {
            var()
                .name(format!("regular_{m}"))
                .continuous(0., self.regular_capacity)
                .obj(self.regular_cost)
        }));
        let overtime = model.add(months.clone().map(|m| {
            var()
                .name(format!("overtime_{m}"))
                .continuous(0., self.overtime_capacity)
                .obj(self.overtime_cost)
        }));
        let inventory = model.add(
            months.map(|m| var().name(format!("inventory_{m}")).obj(self.holding_cost)),
        );

        for (m, demand) in self.demand.iter().enumerate() {
            let balance = cons()
                .name(format!("balance_{}", m + 1))
                .coef(&regular[m], 1.)
                .coef(&overtime[m], 1.)
                .coef(&inventory[m], -1.);
            let row = if m == 0 {
                balance.eq(demand - self.initial_inventory)
            } else {
                balance.coef(&inventory[m - 1], 1.).eq(*demand)
            };
            model.add(row);
        }
        if let Some(last) = inventory.last() {
            model.add(
                cons()
                    .name("final_inventory")
                    .coef(last, 1.)
                    .ge(self.final_inventory),
            );
        }
        (model, regular, overtime, inventory)
    }

    pub fn solve(&self, params: &Params) -> Result<MultiPeriodPlan, Error> {
        let (model, regular, overtime, inventory) = self.build(params);
        let solved = model.solve()?;
        let sol = solved.require_optimal()?;
        let months = self
            .demand
            .iter()
            .enumerate()
            .map(|(m, demand)| Month {
                demand: *demand,
                regular: sol.val(&regular[m]),
                overtime: sol.val(&overtime[m]),
                inventory: sol.val(&inventory[m]),
            })
            .collect();
        Ok(MultiPeriodPlan {
            months,
            cost: sol.obj_val(),
        })
    }
}

impl Example for MultiPeriod {
    fn id(&self) -> &'static str {
        "multi-period"
    }

    fn chapter(&self) -> Chapter {
        Chapter::Applications
    }

    fn number(&self) -> u8 {
        1
    }

    fn title(&self) -> &'static str {
        "Multi-period production planning"
    }

    fn statement(&self) -> String {
        let demand: Vec<String> = self
            .demand
            .iter()
            .enumerate()
            .map(|(m, d)| format!("month {} = {d}", m + 1))
            .collect();
        format!(
            "Plan {} months of production.\n\nDemand: {}\n\nCosts:\n  regular: {} per unit, \
             at most {} per month\n  overtime: {} per unit, at most {} per month\n  \
             holding: {} per unit and month\n\nInitial inventory: {}\nFinal inventory: at least {}\n\
             Goal: minimize the total cost.\n\nRequired output is {} against a capacity of {}.\n",
            self.demand.len(),
            demand.join(", "),
            money(self.regular_cost, 0),
            self.regular_capacity,
            money(self.overtime_cost, 0),
            self.overtime_capacity,
            money(self.holding_cost, 0),
            self.initial_inventory,
            self.final_inventory,
            self.required_output(),
            self.capacity()
        )
    }

    fn model(&self, params: &Params) -> Model<ProblemCreated> {
        self.build(params).0
    }

    fn run(&self, params: &Params) -> Result<Report, Error> {
        report(self, self.solve(params))
    }
}

impl Plan for MultiPeriodPlan {
    fn objective(&self) -> f64 {
        self.cost
    }

    fn describe(&self, report: &mut Report) {
        report.line(format!("Total cost: {}", money(self.cost, 0)));
        report.line("month  demand  regular  overtime  inventory");
        report.line("-".repeat(45));
        for (m, month) in self.months.iter().enumerate() {
            report.line(format!(
                "{:>5}  {:>6}  {:>7.0}  {:>8.0}  {:>9.0}",
                m + 1,
                month.demand,
                month.regular,
                month.overtime,
                month.inventory
            ));
            report.value(format!("regular_{}", m + 1), month.regular);
            report.value(format!("overtime_{}", m + 1), month.overtime);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    #[test]
    fn integer_production_differs_from_relaxation() {
        let plan = IntegerProduction::default()
            .solve(&Params::default())
            .unwrap();
        assert!((plan.integer.profit - 180.).abs() < 1e-6);
        assert_eq!(plan.integer.quantity("A"), Some(2.));
        assert_eq!(plan.integer.quantity("B"), Some(2.));

        assert!((plan.relaxed.profit - 188.).abs() < 1e-6);
        assert!((plan.relaxed.quantity("A").unwrap() - 1.2).abs() < 1e-6);
        assert!((plan.relaxed.quantity("B").unwrap() - 3.2).abs() < 1e-6);
    }

    #[test]
    fn integer_production_without_objective_cut() {
        let params = Params {
            tighten_integral_objective: false,
            ..Params::default()
        };
        let plan = IntegerProduction::default().solve(&params).unwrap();
        assert!((plan.integer.profit - 180.).abs() < 1e-6);
    }

    #[test]
    fn integer_production_model_is_integral() {
        let model = IntegerProduction::default().model(&Params::default());
        assert!(model.vars().iter().all(|v| v.var_type() == VarType::Integer));
    }

    #[test]
    fn exclusive_production_drops_one_product() {
        let plan = ExclusiveProduction::default()
            .solve(&Params::default())
            .unwrap();
        assert!((plan.mix.profit - 1800.).abs() < 1e-6);
        assert!(plan.mix.quantity("P1").unwrap().abs() < 1e-6);
        assert!((plan.mix.quantity("P3").unwrap() - 45.).abs() < 1e-6);
        assert_eq!(
            plan.chosen,
            [("P1".to_string(), false), ("P3".to_string(), true)]
        );
    }

    #[test]
    fn fixed_cost_optimum() {
        let plan = FixedCost::default().solve(&Params::default()).unwrap();
        assert!((plan.net_profit() - 245.).abs() < 1e-6);
        assert_eq!(
            plan.lines,
            [
                ("A".to_string(), 15, true),
                ("B".to_string(), 15, true),
                ("C".to_string(), 0, false),
            ]
        );
        assert_eq!(plan.fixed_cost, 130.);
    }

    #[test]
    fn lot_sizing_optimum_balances_inventory() {
        let problem = LotSizing::default();
        let plan = problem.solve(&Params::default()).unwrap();
        assert!((plan.cost - 1280.).abs() < 1e-6);

        let mut stock = 0.;
        for period in &plan.periods {
            stock += f64::from(period.output) - period.demand;
            assert!((stock - period.inventory).abs() < 1e-6);
            assert!(period.inventory >= -1e-9);
            assert!(period.setup || period.output == 0);
            assert!(f64::from(period.output) <= problem.max_output);
        }
    }

    #[test]
    fn multi_period_textbook_data_is_infeasible() {
        let problem = MultiPeriod::default();
        assert_eq!(problem.required_output(), 380.);
        assert_eq!(problem.capacity(), 360.);

        assert!(matches!(
            problem.solve(&Params::default()),
            Err(Error::NotOptimal(Status::Infeasible))
        ));
        let report = problem.run(&Params::default()).unwrap();
        assert_eq!(report.status, Status::Infeasible);
        assert!(report.render_text().contains("Status: Infeasible"));
    }

    #[test]
    fn multi_period_with_reachable_final_stock() {
        let problem = MultiPeriod {
            final_inventory: 10.,
            ..MultiPeriod::default()
        };
        let plan = problem.solve(&Params::default()).unwrap();
        assert!((plan.cost - 4320.).abs() < 1e-6);
        let inventory: Vec<f64> = plan.months.iter().map(|m| m.inventory).collect();
        for (got, want) in inventory.iter().zip([40., 10., 10.]) {
            assert!((got - want).abs() < 1e-6);
        }
    }

    #[test]
    fn multi_period_prefers_regular_time() {
        let problem = MultiPeriod {
            final_inventory: 0.,
            ..MultiPeriod::default()
        };
        let plan = problem.solve(&Params::default()).unwrap();
        assert!((plan.cost - 4110.).abs() < 1e-6);
        assert!(plan.months.iter().all(|m| (m.regular - 80.).abs() < 1e-6));
    }
}
