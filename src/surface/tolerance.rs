use serde::{Deserialize, Serialize};

/// Numeric tolerance for area invariants.
///
/// Boolean operations snap coordinates to a fixed grid, so sums of class
/// areas can drift from the boundary area by slivers far below a square
/// metre. Comparisons allow `relative * max(|reference|, 1)` of slack.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerance {
    pub relative: f64,
}

impl Default for Tolerance {
    fn default() -> Self { Self { relative: 1e-6 } }
}

impl Tolerance {
    pub fn new(relative: f64) -> Self { Self { relative } }

    /// Absolute slack allowed when comparing values of magnitude `reference`.
    #[inline]
    pub fn slack(&self, reference: f64) -> f64 {
        self.relative * reference.abs().max(1.0)
    }

    /// True when `a` and `b` agree within the slack for `reference`.
    #[inline]
    pub fn approx_eq(&self, a: f64, b: f64, reference: f64) -> bool {
        (a - b).abs() <= self.slack(reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slack_scales_with_reference() {
        let tol = Tolerance::default();
        assert!(tol.approx_eq(10_000.0, 10_000.005, 10_000.0));
        assert!(!tol.approx_eq(10_000.0, 10_000.02, 10_000.0));
    }

    #[test]
    fn slack_has_a_floor_for_small_references() {
        let tol = Tolerance::default();
        assert!(tol.approx_eq(0.0, 5e-7, 0.0));
    }
}
