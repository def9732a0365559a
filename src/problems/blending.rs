//! Blending: mix ingredients at least cost while meeting nutrient requirements.

use crate::builder::cons::cons;
use crate::builder::var::var;
use crate::error::Error;
use crate::model::{Model, ProblemCreated};
use crate::param::Params;
use crate::problems::{Chapter, Example, Plan, report};
use crate::report::{Report, money};
use crate::variable::Variable;

/// A nutrient with optional lower and upper bounds on the blended amount.
#[derive(Debug, Clone, PartialEq)]
pub struct Nutrient {
    pub name: String,
    pub unit: String,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Nutrient {
    fn new(name: &str, unit: &str, min: Option<f64>, max: Option<f64>) -> Self {
        Nutrient {
            name: name.to_string(),
            unit: unit.to_string(),
            min,
            max,
        }
    }

    fn bounds(&self) -> String {
        self.scaled_bounds(1., &format!(" {}", self.unit))
    }

    /// Bounds as a percentage of a batch of `total` units.
    fn share_bounds(&self, total: f64) -> String {
        self.scaled_bounds(100. / total, "%")
    }

    fn scaled_bounds(&self, scale: f64, unit: &str) -> String {
        match (self.min.map(|m| m * scale), self.max.map(|m| m * scale)) {
            (Some(min), Some(max)) => format!("{min}-{max}{unit}"),
            (Some(min), None) => format!("at least {min}{unit}"),
            (None, Some(max)) => format!("at most {max}{unit}"),
            (None, None) => "unbounded".to_string(),
        }
    }
}

/// An ingredient with its cost and nutrient content per unit, in nutrient order.
#[derive(Debug, Clone, PartialEq)]
pub struct Ingredient {
    pub name: String,
    pub cost: f64,
    pub content: Vec<f64>,
}

impl Ingredient {
    fn new(name: &str, cost: f64, content: &[f64]) -> Self {
        Ingredient {
            name: name.to_string(),
            cost,
            content: content.to_vec(),
        }
    }
}

/// Ingredients mixed into a blend, optionally of a fixed total amount.
#[derive(Debug, Clone, PartialEq)]
pub struct Blend {
    pub ingredients: Vec<Ingredient>,
    pub nutrients: Vec<Nutrient>,
    pub total: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlendPlan {
    pub amounts: Vec<(String, f64)>,
    /// Blended amount of each nutrient, in nutrient order.
    pub nutrients: Vec<f64>,
    pub cost: f64,
}

impl BlendPlan {
    pub fn amount(&self, ingredient: &str) -> Option<f64> {
        self.amounts
            .iter()
            .find(|(name, _)| name == ingredient)
            .map(|(_, a)| *a)
    }
}

impl Blend {
    fn build(&self, name: &str, params: &Params) -> (Model<ProblemCreated>, Vec<Variable>) {
        let mut model = Model::with_params(params).set_name(name).minimize();
        let amounts = model.add(
            self.ingredients
                .iter()
                .map(|i| var().name(format!("x_{}", i.name)).obj(i.cost)),
        );
        if let Some(total) = self.total {
            model.add(
                cons()
                    .name("total")
                    .expr(amounts.iter().map(|x| (x, 1.)))
                    .eq(total),
            );
        }
        for (n, nutrient) in self.nutrients.iter().enumerate() {
            let blended = cons().name(nutrient.name.as_str()).expr(
                self.ingredients
                    .iter()
                    .zip(&amounts)
                    .map(|(i, x)| (x, i.content[n])),
            );
            let blended = match (nutrient.min, nutrient.max) {
                (Some(min), Some(max)) => blended.range(min, max),
                (Some(min), None) => blended.ge(min),
                (None, Some(max)) => blended.le(max),
                (None, None) => continue,
            };
            model.add(blended);
        }
        (model, amounts)
    }

    fn solve(&self, name: &str, params: &Params) -> Result<BlendPlan, Error> {
        let (model, amounts) = self.build(name, params);
        let solved = model.solve()?;
        let sol = solved.require_optimal()?;
        let values: Vec<f64> = amounts.iter().map(|x| sol.val(x)).collect();
        let nutrients: Vec<f64> = (0..self.nutrients.len())
            .map(|n| {
                self.ingredients
                    .iter()
                    .zip(&values)
                    .map(|(i, a)| i.content[n] * a)
                    .sum()
            })
            .collect();
        Ok(BlendPlan {
            amounts: self
                .ingredients
                .iter()
                .map(|i| i.name.clone())
                .zip(values)
                .collect(),
            nutrients,
            cost: sol.obj_val(),
        })
    }

    fn table(&self, cost_label: &str, scale: f64, suffix: &str) -> String {
        let mut text = format!("{:<12}{:>10}", "", cost_label);
        for nutrient in &self.nutrients {
            text.push_str(&format!("{:>12}", nutrient.name));
        }
        text.push('\n');
        for ingredient in &self.ingredients {
            text.push_str(&format!(
                "{:<12}{:>10}",
                ingredient.name,
                money(ingredient.cost, 2)
            ));
            for content in &ingredient.content {
                text.push_str(&format!("{:>12}", format!("{}{suffix}", content * scale)));
            }
            text.push('\n');
        }
        text
    }
}

/// A 100 kg feed batch from two raw materials.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedMix {
    /// Content is the mass fraction of each nutrient; bounds are kilograms in the batch.
    pub blend: Blend,
}

impl Default for FeedMix {
    fn default() -> Self {
        FeedMix {
            blend: Blend {
                ingredients: vec![
                    Ingredient::new("A", 5., &[0.30, 0.10, 0.05]),
                    Ingredient::new("B", 8., &[0.20, 0.15, 0.10]),
                ],
                nutrients: vec![
                    Nutrient::new("protein", "kg", Some(25.), None),
                    Nutrient::new("fat", "kg", Some(12.), None),
                    Nutrient::new("fiber", "kg", None, Some(8.)),
                ],
                total: Some(100.),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedMixPlan {
    pub blend: BlendPlan,
    total: f64,
    nutrients: Vec<Nutrient>,
}

impl FeedMix {
    pub fn solve(&self, params: &Params) -> Result<FeedMixPlan, Error> {
        let blend = self.blend.solve("feed_mix", params)?;
        let total: f64 = blend.amounts.iter().map(|(_, a)| a).sum();
        Ok(FeedMixPlan {
            blend,
            total,
            nutrients: self.blend.nutrients.clone(),
        })
    }
}

impl Example for FeedMix {
    fn id(&self) -> &'static str {
        "feed-mix"
    }

    fn chapter(&self) -> Chapter {
        Chapter::Linear
    }

    fn number(&self) -> u8 {
        5
    }

    fn title(&self) -> &'static str {
        "Feed blending"
    }

    fn statement(&self) -> String {
        let mut text = String::from("Mix raw materials into animal feed.\n\n");
        text.push_str(&self.blend.table("cost/kg", 100., "%"));
        text.push_str("\nRequirements:\n");
        for nutrient in &self.blend.nutrients {
            text.push_str(&format!("  {}: {}\n", nutrient.name, nutrient.bounds()));
        }
        if let Some(total) = self.blend.total {
            text.push_str(&format!("\nGoal: make {total} kg of feed at minimum cost.\n"));
        }
        text
    }

    fn model(&self, params: &Params) -> Model<ProblemCreated> {
        self.blend.build("feed_mix", params).0
    }

    fn run(&self, params: &Params) -> Result<Report, Error> {
        report(self, self.solve(params))
    }
}

impl Plan for FeedMixPlan {
    fn objective(&self) -> f64 {
        self.blend.cost
    }

    fn describe(&self, report: &mut Report) {
        report.line(format!("Minimum cost: {}", money(self.blend.cost, 2)));
        report.line("Blend:");
        for (name, amount) in &self.blend.amounts {
            report.line(format!("  {name}: {amount:.2} kg"));
            report.value(name.as_str(), *amount);
        }
        report.line("Nutrients:");
        for (nutrient, amount) in self.nutrients.iter().zip(&self.blend.nutrients) {
            report.line(format!(
                "  {}: {:.2}% ({})",
                nutrient.name,
                amount / self.total * 100.,
                nutrient.share_bounds(self.total)
            ));
        }
    }
}

/// A day of meals from five foods, in portions of 100 g.
#[derive(Debug, Clone, PartialEq)]
pub struct Diet {
    pub blend: Blend,
}

impl Default for Diet {
    fn default() -> Self {
        Diet {
            blend: Blend {
                ingredients: vec![
                    Ingredient::new("chicken", 3.0, &[200., 25., 10., 0.]),
                    Ingredient::new("fish", 4.0, &[150., 20., 5., 0.]),
                    Ingredient::new("rice", 1.0, &[350., 7., 1., 77.]),
                    Ingredient::new("vegetables", 2.0, &[50., 3., 0., 10.]),
                    Ingredient::new("egg", 2.5, &[150., 13., 11., 1.]),
                ],
                nutrients: vec![
                    Nutrient::new("calories", "kcal", Some(1800.), Some(2200.)),
                    Nutrient::new("protein", "g", Some(50.), None),
                    Nutrient::new("fat", "g", Some(30.), Some(70.)),
                    Nutrient::new("carbs", "g", Some(200.), Some(300.)),
                ],
                total: None,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DietPlan {
    pub blend: BlendPlan,
    nutrients: Vec<Nutrient>,
}

impl Diet {
    pub fn solve(&self, params: &Params) -> Result<DietPlan, Error> {
        Ok(DietPlan {
            blend: self.blend.solve("diet", params)?,
            nutrients: self.blend.nutrients.clone(),
        })
    }
}

impl Example for Diet {
    fn id(&self) -> &'static str {
        "diet"
    }

    fn chapter(&self) -> Chapter {
        Chapter::Applications
    }

    fn number(&self) -> u8 {
        2
    }

    fn title(&self) -> &'static str {
        "Diet problem"
    }

    fn statement(&self) -> String {
        let mut text = String::from("Plan a day of meals. Food data per 100 g:\n\n");
        text.push_str(&self.blend.table("price", 1., ""));
        text.push_str("\nDaily requirements:\n");
        for nutrient in &self.blend.nutrients {
            text.push_str(&format!("  {}: {}\n", nutrient.name, nutrient.bounds()));
        }
        text.push_str("\nGoal: minimize the cost.\n");
        text
    }

    fn model(&self, params: &Params) -> Model<ProblemCreated> {
        self.blend.build("diet", params).0
    }

    fn run(&self, params: &Params) -> Result<Report, Error> {
        report(self, self.solve(params))
    }
}

impl Plan for DietPlan {
    fn objective(&self) -> f64 {
        self.blend.cost
    }

    fn describe(&self, report: &mut Report) {
        report.line(format!("Daily cost: {}", money(self.blend.cost, 2)));
        report.line("Meals (grams):");
        for (name, portions) in &self.blend.amounts {
            if *portions > 0.01 {
                report.line(format!("  {name}: {:.0} g", portions * 100.));
            }
            report.value(name.as_str(), portions * 100.);
        }
        report.line("Nutrient totals:");
        for (nutrient, amount) in self.nutrients.iter().zip(&self.blend.nutrients) {
            report.line(format!(
                "  {}: {amount:.1} {} ({})",
                nutrient.name,
                nutrient.unit,
                nutrient.bounds()
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    #[test]
    fn feed_mix_optimum() {
        let plan = FeedMix::default().solve(&Params::default()).unwrap();
        assert!((plan.blend.cost - 620.).abs() < 1e-6);
        assert!((plan.blend.amount("A").unwrap() - 60.).abs() < 1e-6);
        assert!((plan.blend.amount("B").unwrap() - 40.).abs() < 1e-6);
        assert!((plan.total - 100.).abs() < 1e-6);
    }

    #[test]
    fn feed_mix_report_shows_percentages() {
        let report = FeedMix::default().run(&Params::default()).unwrap();
        assert!(report.lines.contains(&"Minimum cost: $620.00".to_string()));
        assert!(report.lines.contains(&"  protein: 26.00% (at least 25%)".to_string()));
        assert!(report.lines.contains(&"  fiber: 7.00% (at most 8%)".to_string()));
    }

    #[test]
    fn bounds_in_batch_units_and_as_shares() {
        let protein = Nutrient::new("protein", "kg", Some(50.), None);
        assert_eq!(protein.bounds(), "at least 50 kg");
        assert_eq!(protein.share_bounds(200.), "at least 25%");
        let fat = Nutrient::new("fat", "g", Some(10.), Some(20.));
        assert_eq!(fat.bounds(), "10-20 g");
        assert_eq!(fat.share_bounds(100.), "10-20%");
    }

    #[test]
    fn diet_optimum_meets_every_bound() {
        let diet = Diet::default();
        let plan = diet.solve(&Params::default()).unwrap();
        assert!((plan.blend.cost - 3087. / 286.).abs() < 1e-6);
        for (nutrient, amount) in diet.blend.nutrients.iter().zip(&plan.blend.nutrients) {
            if let Some(min) = nutrient.min {
                assert!(*amount >= min - 1e-6, "{} below minimum", nutrient.name);
            }
            if let Some(max) = nutrient.max {
                assert!(*amount <= max + 1e-6, "{} above maximum", nutrient.name);
            }
        }
    }

    #[test]
    fn ranged_nutrients_become_range_constraints() {
        let model = Diet::default().model(&Params::default());
        assert_eq!(model.n_vars(), 5);
        let senses: Vec<ConsSense> = model.conss().iter().map(|c| c.sense()).collect();
        assert_eq!(
            senses,
            [
                ConsSense::Range(1800., 2200.),
                ConsSense::Ge(50.),
                ConsSense::Range(30., 70.),
                ConsSense::Range(200., 300.),
            ]
        );
    }

    #[test]
    fn impossible_requirement_is_infeasible() {
        let mut feed = FeedMix::default();
        feed.blend.nutrients[0].min = Some(40.);
        let report = feed.run(&Params::default()).unwrap();
        assert_eq!(report.status, Status::Infeasible);
    }
}
