//! Shortest path as a unit flow through a directed network.

use crate::builder::cons::cons;
use crate::builder::var::var;
use crate::error::Error;
use crate::model::{Model, ProblemCreated};
use crate::param::Params;
use crate::problems::{Chapter, Example, Plan, is_on, report};
use crate::report::Report;
use crate::variable::Variable;

#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub length: f64,
}

/// Route one unit of flow from `source` to `sink` along directed edges.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPath {
    pub nodes: Vec<String>,
    pub edges: Vec<Edge>,
    pub source: String,
    pub sink: String,
}

impl Default for ShortestPath {
    fn default() -> Self {
        let edges = [
            ("A", "B", 4.),
            ("A", "C", 2.),
            ("B", "C", 1.),
            ("B", "D", 5.),
            ("C", "D", 8.),
            ("C", "E", 10.),
            ("D", "E", 2.),
            ("D", "F", 6.),
            ("E", "F", 3.),
        ];
        ShortestPath {
            nodes: ["A", "B", "C", "D", "E", "F"].map(String::from).to_vec(),
            edges: edges
                .into_iter()
                .map(|(from, to, length)| Edge {
                    from: from.to_string(),
                    to: to.to_string(),
                    length,
                })
                .collect(),
            source: "A".to_string(),
            sink: "F".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoutePlan {
    /// Nodes visited from source to sink.
    pub route: Vec<String>,
    /// `(from, to, length)` of each edge taken, in route order.
    pub legs: Vec<(String, String, f64)>,
    pub distance: f64,
}

impl ShortestPath {
    /// Net flow leaving `node`: one at the source, minus one at the sink, zero elsewhere.
    /// A route from a node to itself needs no flow at all.
    fn supply(&self, node: &str) -> f64 {
        if self.source == self.sink {
            0.
        } else if node == self.source {
            1.
        } else if node == self.sink {
            -1.
        } else {
            0.
        }
    }

    fn build(&self, params: &Params) -> (Model<ProblemCreated>, Vec<Variable>) {
        let mut model = Model::with_params(params)
            .set_name("shortest_path")
            .minimize();
        if self.edges.iter().all(|e| e.length.fract() == 0.) {
            model = model.set_obj_integral();
        }
        let used = model.add(
            self.edges
                .iter()
                .map(|e| var().name(format!("x_{}_{}", e.from, e.to)).binary().obj(e.length)),
        );
        for node in &self.nodes {
            let flow = self.edges.iter().zip(&used).filter_map(|(e, x)| {
                if e.from == *node {
                    Some((x, 1.))
                } else if e.to == *node {
                    Some((x, -1.))
                } else {
                    None
                }
            });
            model.add(
                cons()
                    .name(format!("flow_{node}"))
                    .expr(flow)
                    .eq(self.supply(node)),
            );
        }
        (model, used)
    }

    pub fn solve(&self, params: &Params) -> Result<RoutePlan, Error> {
        let (model, used) = self.build(params);
        let solved = model.solve()?;
        let sol = solved.require_optimal()?;
        let taken: Vec<&Edge> = self
            .edges
            .iter()
            .zip(&used)
            .filter(|(_, x)| is_on(sol.val(x)))
            .map(|(e, _)| e)
            .collect();

        let mut route = vec![self.source.clone()];
        let mut legs = Vec::new();
        let mut at = self.source.as_str();
        // Zero-length cycles may ride along with the path; follow at most one edge per node.
        while at != self.sink && legs.len() < taken.len() {
            let Some(edge) = taken.iter().find(|e| e.from == at) else {
                break;
            };
            legs.push((edge.from.clone(), edge.to.clone(), edge.length));
            route.push(edge.to.clone());
            at = edge.to.as_str();
        }
        Ok(RoutePlan {
            route,
            legs,
            distance: sol.obj_val(),
        })
    }
}

impl Example for ShortestPath {
    fn id(&self) -> &'static str {
        "shortest-path"
    }

    fn chapter(&self) -> Chapter {
        Chapter::Applications
    }

    fn number(&self) -> u8 {
        7
    }

    fn title(&self) -> &'static str {
        "Shortest path"
    }

    fn statement(&self) -> String {
        let mut text = format!(
            "Find the shortest route from {} to {}.\n\nRoads:\n",
            self.source, self.sink
        );
        for e in &self.edges {
            text.push_str(&format!("  {} -> {}: {}\n", e.from, e.to, e.length));
        }
        text.push_str(
            "\nModel: one unit of flow leaves the source and reaches the sink;\n\
             every other node passes on what it receives.\n",
        );
        text
    }

    fn model(&self, params: &Params) -> Model<ProblemCreated> {
        self.build(params).0
    }

    fn run(&self, params: &Params) -> Result<Report, Error> {
        report(self, self.solve(params))
    }
}

impl Plan for RoutePlan {
    fn objective(&self) -> f64 {
        self.distance
    }

    fn describe(&self, report: &mut Report) {
        report.line(format!("Shortest distance: {}", self.distance));
        report.line(format!("Route: {}", self.route.join(" -> ")));
        for (from, to, length) in &self.legs {
            report.line(format!("  {from} -> {to}: {length}"));
            report.value(format!("{from}->{to}"), 1.);
        }
    }
}
