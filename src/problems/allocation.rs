//! Allocation of limited resources: product mixes and investment portfolios.

use crate::builder::cons::cons;
use crate::builder::var::var;
use crate::error::Error;
use crate::model::{Model, ProblemCreated};
use crate::param::Params;
use crate::problems::{Chapter, Example, Plan, report};
use crate::report::{Report, money};
use crate::variable::Variable;

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub name: String,
    /// Profit per unit.
    pub profit: f64,
    /// Consumption of each resource per unit, in resource order.
    pub usage: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub name: String,
    pub capacity: f64,
}

/// Products competing for shared resources.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductMix {
    pub products: Vec<Product>,
    pub resources: Vec<Resource>,
}

impl ProductMix {
    /// Adds one production variable per product and one capacity row per resource, with
    /// profits as objective coefficients.
    pub(crate) fn add_to(&self, model: &mut Model<ProblemCreated>, integral: bool) -> Vec<Variable> {
        let quantities = model.add(self.products.iter().map(|p| {
            let quantity = var().name(format!("x_{}", p.name)).obj(p.profit);
            if integral {
                quantity.nonneg_integer()
            } else {
                quantity
            }
        }));
        for (r, resource) in self.resources.iter().enumerate() {
            model.add(
                cons()
                    .name(resource.name.as_str())
                    .expr(
                        self.products
                            .iter()
                            .zip(&quantities)
                            .map(|(p, x)| (x, p.usage[r])),
                    )
                    .le(resource.capacity),
            );
        }
        quantities
    }

    /// Reads the quantities back and computes resource usage.
    pub(crate) fn plan(&self, values: Vec<f64>) -> ProductMixPlan {
        let profit: f64 = self
            .products
            .iter()
            .zip(&values)
            .map(|(p, q)| p.profit * q)
            .sum();
        let usage = self
            .resources
            .iter()
            .enumerate()
            .map(|(r, resource)| {
                let used: f64 = self
                    .products
                    .iter()
                    .zip(&values)
                    .map(|(p, q)| p.usage[r] * q)
                    .sum();
                (resource.name.clone(), used, resource.capacity)
            })
            .collect();
        ProductMixPlan {
            quantities: self
                .products
                .iter()
                .map(|p| p.name.clone())
                .zip(values)
                .collect(),
            usage,
            profit,
        }
    }

    /// A table of products against resources.
    pub(crate) fn table(&self) -> String {
        let mut text = format!("{:<12}{:>8}", "", "profit");
        for resource in &self.resources {
            text.push_str(&format!("{:>12}", resource.name));
        }
        text.push('\n');
        for product in &self.products {
            text.push_str(&format!("{:<12}{:>8}", product.name, money(product.profit, 0)));
            for usage in &product.usage {
                text.push_str(&format!("{usage:>12}"));
            }
            text.push('\n');
        }
        text.push_str(&format!("{:<20}", "capacity"));
        for resource in &self.resources {
            text.push_str(&format!("{:>12}", resource.capacity));
        }
        text.push('\n');
        text
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductMixPlan {
    pub quantities: Vec<(String, f64)>,
    /// `(resource, used, capacity)` per resource.
    pub usage: Vec<(String, f64, f64)>,
    pub profit: f64,
}

impl ProductMixPlan {
    pub fn quantity(&self, product: &str) -> Option<f64> {
        self.quantities
            .iter()
            .find(|(name, _)| name == product)
            .map(|(_, q)| *q)
    }

    pub(crate) fn describe_with(&self, report: &mut Report, decimals: usize) {
        report.line(format!("Maximum profit: {}", money(self.profit, decimals)));
        report.line("Production plan:");
        for (name, quantity) in &self.quantities {
            report.line(format!("  {name}: {quantity:.decimals$} units"));
            report.value(name.as_str(), *quantity);
        }
        report.line("Resource usage:");
        for (name, used, capacity) in &self.usage {
            report.line(format!("  {name}: {used:.2} / {capacity}"));
        }
    }
}

impl Plan for ProductMixPlan {
    fn objective(&self) -> f64 {
        self.profit
    }

    fn describe(&self, report: &mut Report) {
        self.describe_with(report, 2);
    }
}

/// Continuous production of four products from manpower and two materials.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceAllocation {
    pub mix: ProductMix,
}

impl Default for ResourceAllocation {
    fn default() -> Self {
        let product = |name: &str, profit: f64, usage: [f64; 3]| Product {
            name: name.to_string(),
            profit,
            usage: usage.to_vec(),
        };
        let resource = |name: &str, capacity: f64| Resource {
            name: name.to_string(),
            capacity,
        };
        ResourceAllocation {
            mix: ProductMix {
                products: vec![
                    product("P1", 20., [1., 3., 0.]),
                    product("P2", 12., [1., 2., 1.]),
                    product("P3", 40., [1., 1., 2.]),
                    product("P4", 25., [1., 0., 3.]),
                ],
                resources: vec![
                    resource("manpower", 50.),
                    resource("material_a", 100.),
                    resource("material_b", 90.),
                ],
            },
        }
    }
}

impl ResourceAllocation {
    fn build(&self, params: &Params) -> (Model<ProblemCreated>, Vec<Variable>) {
        let mut model = Model::with_params(params)
            .set_name("resource_allocation")
            .maximize();
        let quantities = self.mix.add_to(&mut model, false);
        (model, quantities)
    }

    pub fn solve(&self, params: &Params) -> Result<ProductMixPlan, Error> {
        let (model, quantities) = self.build(params);
        let solved = model.solve()?;
        let sol = solved.require_optimal()?;
        Ok(self.mix.plan(quantities.iter().map(|x| sol.val(x)).collect()))
    }
}

impl Example for ResourceAllocation {
    fn id(&self) -> &'static str {
        "resource-allocation"
    }

    fn chapter(&self) -> Chapter {
        Chapter::Linear
    }

    fn number(&self) -> u8 {
        4
    }

    fn title(&self) -> &'static str {
        "Resource allocation"
    }

    fn statement(&self) -> String {
        format!(
            "Plan the production of {} products sharing limited resources.\n\n{}\nGoal: maximize total profit.\n",
            self.mix.products.len(),
            self.mix.table()
        )
    }

    fn model(&self, params: &Params) -> Model<ProblemCreated> {
        self.build(params).0
    }

    fn run(&self, params: &Params) -> Result<Report, Error> {
        report(self, self.solve(params))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    pub name: String,
    /// Expected yearly return as a fraction of the amount invested.
    pub expected_return: f64,
    pub min_amount: f64,
    pub max_amount: f64,
}

/// Split a budget over assets to maximize the expected return.
#[derive(Debug, Clone, PartialEq)]
pub struct Portfolio {
    pub budget: f64,
    pub assets: Vec<Asset>,
}

impl Default for Portfolio {
    fn default() -> Self {
        let budget = 100_000.;
        let asset = |name: &str, expected_return: f64, min_amount: f64, max_amount: f64| Asset {
            name: name.to_string(),
            expected_return,
            min_amount,
            max_amount,
        };
        Portfolio {
            budget,
            assets: vec![
                asset("stock", 0.12, 0., 0.5 * budget),
                asset("bond", 0.06, 0.2 * budget, f64::INFINITY),
                asset("real_estate", 0.09, 0., 30_000.),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioPlan {
    pub budget: f64,
    pub amounts: Vec<(String, f64)>,
    pub expected_return: f64,
}

impl Portfolio {
    fn build(&self, params: &Params) -> (Model<ProblemCreated>, Vec<Variable>) {
        let mut model = Model::with_params(params).set_name("portfolio").maximize();
        let amounts = model.add(
            self.assets
                .iter()
                .map(|a| var().name(a.name.as_str()).obj(a.expected_return)),
        );
        model.add(
            cons()
                .name("budget")
                .expr(amounts.iter().map(|x| (x, 1.)))
                .eq(self.budget),
        );
        for (asset, x) in self.assets.iter().zip(&amounts) {
            if asset.min_amount > 0. {
                model.add(
                    cons()
                        .name(format!("{}_min", asset.name))
                        .coef(x, 1.)
                        .ge(asset.min_amount),
                );
            }
            if asset.max_amount.is_finite() {
                model.add(
                    cons()
                        .name(format!("{}_max", asset.name))
                        .coef(x, 1.)
                        .le(asset.max_amount),
                );
            }
        }
        (model, amounts)
    }

    pub fn solve(&self, params: &Params) -> Result<PortfolioPlan, Error> {
        let (model, amounts) = self.build(params);
        let solved = model.solve()?;
        let sol = solved.require_optimal()?;
        Ok(PortfolioPlan {
            budget: self.budget,
            amounts: self
                .assets
                .iter()
                .zip(&amounts)
                .map(|(a, x)| (a.name.clone(), sol.val(x)))
                .collect(),
            expected_return: sol.obj_val(),
        })
    }
}

impl Example for Portfolio {
    fn id(&self) -> &'static str {
        "portfolio"
    }

    fn chapter(&self) -> Chapter {
        Chapter::Linear
    }

    fn number(&self) -> u8 {
        7
    }

    fn title(&self) -> &'static str {
        "Investment portfolio"
    }

    fn statement(&self) -> String {
        let mut text = format!(
            "Invest {} across {} assets.\n\n{:<14}{:>10}{:>16}{:>16}\n",
            money(self.budget, 0),
            self.assets.len(),
            "",
            "return",
            "minimum",
            "maximum"
        );
        for asset in &self.assets {
            let max = if asset.max_amount.is_finite() {
                money(asset.max_amount, 0)
            } else {
                "-".to_string()
            };
            text.push_str(&format!(
                "{:<14}{:>9.1}%{:>16}{:>16}\n",
                asset.name,
                asset.expected_return * 100.,
                money(asset.min_amount, 0),
                max
            ));
        }
        text.push_str("\nGoal: maximize the expected return.\n");
        text
    }

    fn model(&self, params: &Params) -> Model<ProblemCreated> {
        self.build(params).0
    }

    fn run(&self, params: &Params) -> Result<Report, Error> {
        report(self, self.solve(params))
    }
}

impl Plan for PortfolioPlan {
    fn objective(&self) -> f64 {
        self.expected_return
    }

    fn describe(&self, report: &mut Report) {
        report.line(format!("Expected return: {}", money(self.expected_return, 2)));
        report.line("Allocation:");
        for (name, amount) in &self.amounts {
            report.line(format!(
                "  {name}: {} ({:.1}%)",
                money(*amount, 2),
                amount / self.budget * 100.
            ));
            report.value(name.as_str(), *amount);
        }
    }
}
