//! Cutting stock rods into pieces and packing items into bins.

use crate::builder::cons::cons;
use crate::builder::var::var;
use crate::error::Error;
use crate::model::{Model, ProblemCreated};
use crate::param::Params;
use crate::problems::{Chapter, Example, Plan, count, is_on, report};
use crate::report::Report;
use crate::variable::Variable;

/// A way of cutting one stock rod: how many pieces of each length it yields.
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    pub name: String,
    /// Pieces per demanded length, in piece order.
    pub counts: Vec<u32>,
}

/// A demanded piece length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Piece {
    pub length: f64,
    pub demand: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CuttingStock {
    pub stock_length: f64,
    pub pieces: Vec<Piece>,
    pub patterns: Vec<Pattern>,
}

impl Default for CuttingStock {
    fn default() -> Self {
        let counts = [
            [3, 0, 0],
            [2, 1, 0],
            [0, 2, 0],
            [0, 0, 2],
            [1, 1, 0],
            [1, 0, 1],
            [0, 1, 1],
        ];
        CuttingStock {
            stock_length: 10.,
            pieces: vec![
                Piece {
                    length: 3.,
                    demand: 25,
                },
                Piece {
                    length: 4.,
                    demand: 20,
                },
                Piece {
                    length: 5.,
                    demand: 15,
                },
            ],
            patterns: counts
                .iter()
                .enumerate()
                .map(|(p, counts)| Pattern {
                    name: format!("P{}", p + 1),
                    counts: counts.to_vec(),
                })
                .collect(),
        }
    }
}

impl CuttingStock {
    /// Total length a pattern cuts from one rod.
    pub fn used_length(&self, pattern: &Pattern) -> f64 {
        self.pieces
            .iter()
            .zip(&pattern.counts)
            .map(|(piece, n)| piece.length * f64::from(*n))
            .sum()
    }

    /// Replaces the patterns by every maximal pattern: those leaving less than the shortest
    /// piece as offcut.
    pub fn with_maximal_patterns(mut self) -> Self {
        let lengths: Vec<f64> = self.pieces.iter().map(|p| p.length).collect();
        self.patterns = maximal_patterns(self.stock_length, &lengths)
            .into_iter()
            .enumerate()
            .map(|(p, counts)| Pattern {
                name: format!("M{}", p + 1),
                counts,
            })
            .collect();
        self
    }

    fn describe_pattern(&self, pattern: &Pattern) -> String {
        let parts: Vec<String> = self
            .pieces
            .iter()
            .zip(&pattern.counts)
            .filter(|(_, n)| **n > 0)
            .map(|(piece, n)| format!("{}m x{n}", piece.length))
            .collect();
        parts.join(" + ")
    }

    fn build(&self, params: &Params) -> (Model<ProblemCreated>, Vec<Variable>) {
        let mut model = Model::with_params(params)
            .set_name("cutting_stock")
            .minimize()
            .set_obj_integral();
        let uses = model.add(
            self.patterns
                .iter()
                .map(|p| var().name(format!("x_{}", p.name)).nonneg_integer().obj(1.)),
        );
        for (i, piece) in self.pieces.iter().enumerate() {
            model.add(
                cons()
                    .name(format!("demand_{}m", piece.length))
                    .expr(
                        self.patterns
                            .iter()
                            .zip(&uses)
                            .map(|(p, x)| (x, f64::from(p.counts[i]))),
                    )
                    .ge(f64::from(piece.demand)),
            );
        }
        (model, uses)
    }

    pub fn solve(&self, params: &Params) -> Result<CuttingPlan, Error> {
        let (model, uses) = self.build(params);
        let solved = model.solve()?;
        let sol = solved.require_optimal()?;
        let usage: Vec<u32> = uses.iter().map(|x| count(sol.val(x))).collect();
        let produced: Vec<u32> = (0..self.pieces.len())
            .map(|i| {
                self.patterns
                    .iter()
                    .zip(&usage)
                    .map(|(p, n)| p.counts[i] * n)
                    .sum()
            })
            .collect();
        let waste: f64 = self
            .patterns
            .iter()
            .zip(&usage)
            .map(|(p, n)| (self.stock_length - self.used_length(p)) * f64::from(*n))
            .sum();
        Ok(CuttingPlan {
            patterns: self
                .patterns
                .iter()
                .zip(&usage)
                .filter(|(_, n)| **n > 0)
                .map(|(p, n)| (p.name.clone(), self.describe_pattern(p), *n))
                .collect(),
            produced,
            demand: self.pieces.clone(),
            rods: usage.iter().sum(),
            waste,
        })
    }
}

/// Every combination of piece counts fitting in `stock_length` whose offcut is shorter than
/// the shortest piece.
pub fn maximal_patterns(stock_length: f64, lengths: &[f64]) -> Vec<Vec<u32>> {
    fn extend(
        lengths: &[f64],
        shortest: f64,
        index: usize,
        remaining: f64,
        counts: &mut Vec<u32>,
        out: &mut Vec<Vec<u32>>,
    ) {
        if index == lengths.len() {
            if remaining < shortest && counts.iter().any(|n| *n > 0) {
                out.push(counts.clone());
            }
            return;
        }
        let max = (remaining / lengths[index]).floor() as u32;
        for n in (0..=max).rev() {
            counts.push(n);
            extend(
                lengths,
                shortest,
                index + 1,
                remaining - f64::from(n) * lengths[index],
                counts,
                out,
            );
            counts.pop();
        }
    }

    let shortest = lengths.iter().copied().fold(f64::INFINITY, f64::min);
    let mut out = Vec::new();
    if shortest.is_finite() && shortest > 0. {
        extend(lengths, shortest, 0, stock_length, &mut Vec::new(), &mut out);
    }
    out
}

#[derive(Debug, Clone, PartialEq)]
pub struct CuttingPlan {
    /// `(pattern, description, rods cut)` for every pattern in use.
    pub patterns: Vec<(String, String, u32)>,
    /// Pieces produced per demanded length.
    pub produced: Vec<u32>,
    pub demand: Vec<Piece>,
    pub rods: u32,
    pub waste: f64,
}

impl Example for CuttingStock {
    fn id(&self) -> &'static str {
        "cutting-stock"
    }

    fn chapter(&self) -> Chapter {
        Chapter::Applications
    }

    fn number(&self) -> u8 {
        6
    }

    fn title(&self) -> &'static str {
        "Cutting stock"
    }

    fn statement(&self) -> String {
        let mut text = format!("Cut {} m rods into pieces.\n\nDemand:\n", self.stock_length);
        for piece in &self.pieces {
            text.push_str(&format!("  {} m: {}\n", piece.length, piece.demand));
        }
        text.push_str("\nPatterns:\n");
        for pattern in &self.patterns {
            let used = self.used_length(pattern);
            text.push_str(&format!(
                "  {}: {} = {used} m (offcut {} m)\n",
                pattern.name,
                self.describe_pattern(pattern),
                self.stock_length - used
            ));
        }
        text.push_str("\nGoal: minimize the number of rods.\n");
        text
    }

    fn model(&self, params: &Params) -> Model<ProblemCreated> {
        self.build(params).0
    }

    fn run(&self, params: &Params) -> Result<Report, Error> {
        report(self, self.solve(params))
    }
}

impl Plan for CuttingPlan {
    fn objective(&self) -> f64 {
        f64::from(self.rods)
    }

    fn describe(&self, report: &mut Report) {
        report.line(format!("Rods used: {}", self.rods));
        report.line("Patterns cut:");
        for (name, description, n) in &self.patterns {
            report.line(format!("  {name}: {n} times ({description})"));
            report.value(name.as_str(), f64::from(*n));
        }
        report.line("Pieces produced:");
        for (piece, produced) in self.demand.iter().zip(&self.produced) {
            report.line(format!(
                "  {} m: {produced} (required {})",
                piece.length, piece.demand
            ));
        }
        report.line(format!("Offcut: {} m", self.waste));
    }
}

/// Pack items into as few equal bins as possible.
#[derive(Debug, Clone, PartialEq)]
pub struct BinPacking {
    pub sizes: Vec<f64>,
    pub capacity: f64,
}

impl Default for BinPacking {
    fn default() -> Self {
        BinPacking {
            sizes: vec![6., 5., 4., 4., 3., 3., 2., 2.],
            capacity: 10.,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PackingPlan {
    /// Item indices in each used bin.
    pub bins: Vec<Vec<usize>>,
    pub sizes: Vec<f64>,
    pub capacity: f64,
}

impl PackingPlan {
    pub fn load(&self, bin: usize) -> f64 {
        self.bins[bin].iter().map(|&i| self.sizes[i]).sum()
    }
}

impl BinPacking {
    /// One bin per item is always enough.
    fn n_bins(&self) -> usize {
        self.sizes.len()
    }

    fn build(
        &self,
        params: &Params,
    ) -> (Model<ProblemCreated>, Vec<Variable>, Vec<Vec<Variable>>) {
        let mut model = Model::with_params(params)
            .set_name("bin_packing")
            .minimize()
            .set_obj_integral();
        let bins = 1..=self.n_bins();
        let used = model.add(bins.clone().map(|b| var().name(format!("bin_{b}")).binary().obj(1.)));
        let assign: Vec<Vec<Variable>> = (1..=self.sizes.len())
            .map(|i| {
                model.add(
                    bins.clone()
                        .map(|b| var().name(format!("item_{i}_bin_{b}")).binary()),
                )
            })
            .collect();

        for (i, row) in assign.iter().enumerate() {
            model.add(
                cons()
                    .name(format!("item_{}", i + 1))
                    .expr(row.iter().map(|x| (x, 1.)))
                    .eq(1.),
            );
        }
        for (b, y) in used.iter().enumerate() {
            model.add(
                cons()
                    .name(format!("capacity_{}", b + 1))
                    .expr(
                        self.sizes
                            .iter()
                            .zip(&assign)
                            .map(|(size, row)| (&row[b], *size)),
                    )
                    .coef(y, -self.capacity)
                    .le(0.),
            );
        }
        // open bins in order
        for (b, pair) in used.windows(2).enumerate() {
            model.add(
                cons()
                    .name(format!("symmetry_{}", b + 1))
                    .coef(&pair[0], 1.)
                    .coef(&pair[1], -1.)
                    .ge(0.),
            );
        }
        (model, used, assign)
    }

    pub fn solve(&self, params: &Params) -> Result<PackingPlan, Error> {
        let (model, used, assign) = self.build(params);
        let solved = model.solve()?;
        let sol = solved.require_optimal()?;
        let bins: Vec<Vec<usize>> = used
            .iter()
            .enumerate()
            .filter(|(_, y)| is_on(sol.val(y)))
            .map(|(b, _)| {
                assign
                    .iter()
                    .enumerate()
                    .filter(|(_, row)| is_on(sol.val(&row[b])))
                    .map(|(i, _)| i)
                    .collect()
            })
            .collect();
        Ok(PackingPlan {
            bins,
            sizes: self.sizes.clone(),
            capacity: self.capacity,
        })
    }
}

impl Example for BinPacking {
    fn id(&self) -> &'static str {
        "bin-packing"
    }

    fn chapter(&self) -> Chapter {
        Chapter::Applications
    }

    fn number(&self) -> u8 {
        8
    }

    fn title(&self) -> &'static str {
        "Bin packing"
    }

    fn statement(&self) -> String {
        let sizes: Vec<String> = self
            .sizes
            .iter()
            .enumerate()
            .map(|(i, s)| format!("{}: {s}", i + 1))
            .collect();
        format!(
            "Pack items into bins of capacity {}.\n\nItem sizes:\n  {}\n\n\
             Bins are opened in order to break symmetry.\nGoal: minimize the number of bins.\n",
            self.capacity,
            sizes.join(", ")
        )
    }

    fn model(&self, params: &Params) -> Model<ProblemCreated> {
        self.build(params).0
    }

    fn run(&self, params: &Params) -> Result<Report, Error> {
        report(self, self.solve(params))
    }
}

impl Plan for PackingPlan {
    fn objective(&self) -> f64 {
        self.bins.len() as f64
    }

    fn describe(&self, report: &mut Report) {
        report.line(format!("Bins used: {}", self.bins.len()));
        report.line("Contents:");
        for (b, items) in self.bins.iter().enumerate() {
            let labels: Vec<String> = items.iter().map(|i| (i + 1).to_string()).collect();
            let sizes: Vec<String> = items.iter().map(|&i| self.sizes[i].to_string()).collect();
            report.line(format!(
                "  bin {}: items [{}] (sizes [{}], total {}/{})",
                b + 1,
                labels.join(", "),
                sizes.join(", "),
                self.load(b),
                self.capacity
            ));
            report.value(format!("bin_{}", b + 1), self.load(b));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    #[test]
    fn cutting_stock_optimum() {
        let problem = CuttingStock::default();
        let plan = problem.solve(&Params::default()).unwrap();
        assert_eq!(plan.rods, 24);
        for (piece, produced) in problem.pieces.iter().zip(&plan.produced) {
            assert!(*produced >= piece.demand);
        }
        let used: f64 = problem
            .pieces
            .iter()
            .zip(&plan.produced)
            .map(|(piece, n)| piece.length * f64::from(*n))
            .sum();
        assert!((used + plan.waste - 240.).abs() < 1e-9);
    }

    #[test]
    fn every_pattern_fits_the_rod() {
        let problem = CuttingStock::default();
        for pattern in &problem.patterns {
            assert!(problem.used_length(pattern) <= problem.stock_length);
        }
    }

    #[test]
    fn maximal_patterns_for_textbook_lengths() {
        let patterns = maximal_patterns(10., &[3., 4., 5.]);
        assert_eq!(
            patterns,
            [
                vec![3, 0, 0],
                vec![2, 1, 0],
                vec![1, 0, 1],
                vec![0, 2, 0],
                vec![0, 1, 1],
                vec![0, 0, 2],
            ]
        );
        assert!(maximal_patterns(10., &[]).is_empty());
        assert!(maximal_patterns(2., &[3.]).is_empty());
    }

    #[test]
    fn maximal_patterns_reach_the_same_optimum() {
        let problem = CuttingStock::default().with_maximal_patterns();
        assert_eq!(problem.patterns.len(), 6);
        let plan = problem.solve(&Params::default()).unwrap();
        assert_eq!(plan.rods, 24);
    }

    #[test]
    fn bin_packing_uses_three_bins() {
        let problem = BinPacking::default();
        let plan = problem.solve(&Params::default()).unwrap();
        assert_eq!(plan.bins.len(), 3);

        let mut seen = vec![0; problem.sizes.len()];
        for (b, items) in plan.bins.iter().enumerate() {
            assert!(plan.load(b) <= problem.capacity + 1e-9);
            for &i in items {
                seen[i] += 1;
            }
        }
        assert!(seen.iter().all(|n| *n == 1));
    }

    #[test]
    fn bin_packing_model_shape() {
        let model = BinPacking::default().model(&Params::default());
        // 8 bin switches and 8 x 8 assignments
        assert_eq!(model.n_vars(), 72);
        // assignment, capacity and symmetry rows
        assert_eq!(model.n_conss(), 8 + 8 + 7);
    }
}
