use serde::{Deserialize, Serialize};

/// Solver parameters shared by every model built from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Distance from the nearest integer within which an integral variable's
    /// value is snapped to that integer.
    pub int_tolerance: f64,
    /// Whether models declared with `set_obj_integral` get an objective cut
    /// from their rounded LP relaxation bound before the integer search.
    pub tighten_integral_objective: bool,
}

impl Default for Params {
    fn default() -> Self {
        Params {
            int_tolerance: 1e-6,
            tighten_integral_objective: true,
        }
    }
}
