use serde::Serialize;

use crate::error::Error;
use crate::model::{Model, Solved};
use crate::status::Status;

/// Width of the `=` rules framing a section title.
pub const RULE_WIDTH: usize = 60;

/// Formats a section title framed by two rules, with a blank line before and after.
pub fn section(title: &str) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    format!("\n{rule}\n {title}\n{rule}\n")
}

/// Lists the objective value and every variable value of a solved model, nothing when the
/// model has no solution.
pub fn variable_listing(model: &Model<Solved>) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(sol) = model.best_sol() {
        lines.push(format!("Objective value: {:.4}", sol.obj_val()));
        lines.push("Decision variables:".to_string());
        lines.extend(sol.iter().map(|(name, val)| format!("  {name} = {val:.4}")));
    }
    lines
}

/// Formats a number with `decimals` fraction digits and `,` thousands separators.
pub fn thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(formatted.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if let Some(frac_part) = frac_part {
        grouped.push('.');
        grouped.push_str(frac_part);
    }

    let is_zero = formatted.chars().all(|c| c == '0' || c == '.');
    if value < 0.0 && !is_zero {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Formats an amount of dollars, e.g. `$1,900.00`.
pub fn money(value: f64, decimals: usize) -> String {
    let amount = thousands(value, decimals);
    match amount.strip_prefix('-') {
        Some(abs) => format!("-${abs}"),
        None => format!("${amount}"),
    }
}

/// A named numeric result, e.g. the quantity of one product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedValue {
    pub name: String,
    pub value: f64,
}

/// The outcome of running one example.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub id: String,
    pub heading: String,
    pub statement: String,
    pub status: Status,
    /// Objective value of the optimal plan, absent when no plan was found.
    pub objective: Option<f64>,
    /// Human readable result lines.
    pub lines: Vec<String>,
    /// Machine readable results.
    pub values: Vec<NamedValue>,
    /// The model in LP format, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl Report {
    pub fn new(id: impl Into<String>, heading: impl Into<String>) -> Self {
        Report {
            id: id.into(),
            heading: heading.into(),
            statement: String::new(),
            status: Status::Unknown,
            objective: None,
            lines: Vec::new(),
            values: Vec::new(),
            model: None,
        }
    }

    pub fn line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn value(&mut self, name: impl Into<String>, value: f64) {
        self.values.push(NamedValue {
            name: name.into(),
            value,
        });
    }

    /// Returns the first value recorded under `name`.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.iter().find(|v| v.name == name).map(|v| v.value)
    }

    /// Renders the banner, the problem statement and the result lines.
    pub fn render_text(&self) -> String {
        let mut out = section(&self.heading);
        if !self.statement.is_empty() {
            out.push('\n');
            out.push_str(self.statement.trim_end());
            out.push_str("\n\n");
        }
        out.push_str("[Result]\n");
        out.push_str(&format!("Status: {}\n", self.status));
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

/// Renders reports as a pretty-printed JSON array.
pub fn render_json(reports: &[Report]) -> Result<String, Error> {
    Ok(serde_json::to_string_pretty(reports)?)
}
