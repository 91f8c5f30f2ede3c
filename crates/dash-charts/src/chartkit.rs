//! # chartkit
//!
//! Core chart primitives: the linear scale and the SVG path builder.

use std::fmt::Write;

// ============================================================================
// SCALE FUNCTION
// ============================================================================

/// Linear interpolation from `[domain_min, domain_max]` into `[range_min, range_max]`.
///
/// A degenerate domain (`domain_max == domain_min`) uses a denominator of 1,
/// so every value collapses onto the range-minimum side instead of dividing by zero.
pub fn scale(value: f64, domain_min: f64, domain_max: f64, range_min: f64, range_max: f64) -> f64 {
    let span = domain_max - domain_min;
    let denominator = if span == 0.0 { 1.0 } else { span };
    range_min + (range_max - range_min) * (value - domain_min) / denominator
}

// ============================================================================
// SCALE DOMAIN
// ============================================================================

/// Input interval of a scale. `min` is always 0 (no negative values).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleDomain {
    pub min: f64,
    pub max: f64,
}

impl ScaleDomain {
    /// Value domain `[0, max(values)]`; a zero, missing or non-finite max becomes 1
    pub fn for_values(values: impl IntoIterator<Item = f64>) -> Self {
        let max = values.into_iter().fold(f64::NEG_INFINITY, f64::max);
        let max = if max == 0.0 || !max.is_finite() { 1.0 } else { max };
        Self { min: 0.0, max }
    }

    /// Index domain `[0, count - 1]`; a single point (or none) becomes `[0, 1]`
    pub fn for_indices(count: usize) -> Self {
        let max = count.saturating_sub(1);
        Self {
            min: 0.0,
            max: if max == 0 { 1.0 } else { max as f64 },
        }
    }
}

// ============================================================================
// STRATEGY PATTERN: Scale Trait
// ============================================================================

/// Strategy trait for scales (maps domain values to range values)
pub trait Scale {
    fn scale(&self, value: f64) -> f64;
}

/// Linear scale (D3-style continuous scale)
#[derive(Debug, Clone)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new() -> Self {
        Self {
            domain: (0.0, 1.0),
            range: (0.0, 1.0),
        }
    }

    pub fn domain(mut self, min: f64, max: f64) -> Self {
        self.domain = (min, max);
        self
    }

    pub fn with_domain(self, domain: ScaleDomain) -> Self {
        self.domain(domain.min, domain.max)
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.range = (min, max);
        self
    }
}

impl Default for LinearScale {
    fn default() -> Self {
        Self::new()
    }
}

impl Scale for LinearScale {
    fn scale(&self, value: f64) -> f64 {
        let (d_min, d_max) = self.domain;
        let (r_min, r_max) = self.range;
        scale(value, d_min, d_max, r_min, r_max)
    }
}

// ============================================================================
// PATH BUILDER (fluent API)
// ============================================================================

/// SVG path builder with fluent API
#[derive(Debug, Clone, Default)]
pub struct PathBuilder {
    commands: String,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self {
            commands: String::with_capacity(256),
        }
    }

    pub fn move_to(mut self, x: f64, y: f64) -> Self {
        let _ = write!(self.commands, "M{:.2},{:.2}", x, y);
        self
    }

    pub fn line_to(mut self, x: f64, y: f64) -> Self {
        let _ = write!(self.commands, "L{:.2},{:.2}", x, y);
        self
    }

    pub fn build(self) -> String {
        self.commands
    }
}

/// Polyline through `points` in order: one move, then line-to for the rest
pub fn line_path(points: &[(f64, f64)]) -> String {
    let Some((&(x, y), rest)) = points.split_first() else {
        return String::new();
    };

    rest.iter()
        .fold(PathBuilder::new().move_to(x, y), |path, &(x, y)| path.line_to(x, y))
        .build()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_scale() {
        let scale = LinearScale::new().domain(0.0, 100.0).range(0.0, 500.0);

        assert_eq!(scale.scale(0.0), 0.0);
        assert_eq!(scale.scale(50.0), 250.0);
        assert_eq!(scale.scale(100.0), 500.0);
    }

    #[test]
    fn test_inverted_range() {
        // y axis: larger values map closer to the top
        assert_eq!(scale(0.0, 0.0, 30.0, 190.0, 30.0), 190.0);
        assert_eq!(scale(30.0, 0.0, 30.0, 190.0, 30.0), 30.0);
        assert_eq!(scale(15.0, 0.0, 30.0, 190.0, 30.0), 110.0);
    }

    #[test]
    fn test_degenerate_domain_does_not_divide_by_zero() {
        let px = scale(5.0, 5.0, 5.0, 30.0, 370.0);
        assert_eq!(px, 30.0);
        assert!(px.is_finite());

        let zero = scale(0.0, 0.0, 0.0, 190.0, 30.0);
        assert_eq!(zero, 190.0);
    }

    #[test]
    fn test_output_within_range_for_domain_inputs() {
        let (d_min, d_max) = (0.0, 37.0);
        let (r_min, r_max) = (30.0, 370.0);
        for i in 0..=370 {
            let value = d_min + (d_max - d_min) * i as f64 / 370.0;
            let px = scale(value, d_min, d_max, r_min, r_max);
            assert!(px >= r_min - 1e-9 && px <= r_max + 1e-9, "{} out of range", px);
        }
    }

    #[test]
    fn test_value_domain() {
        assert_eq!(ScaleDomain::for_values([10.0, 30.0, 0.0]).max, 30.0);
        assert_eq!(ScaleDomain::for_values([0.0, 0.0]).max, 1.0);
        assert_eq!(ScaleDomain::for_values(std::iter::empty()).max, 1.0);
        assert_eq!(ScaleDomain::for_values([f64::NAN]).max, 1.0);
        assert_eq!(ScaleDomain::for_values([4.0]).min, 0.0);
    }

    #[test]
    fn test_index_domain() {
        assert_eq!(ScaleDomain::for_indices(3).max, 2.0);
        assert_eq!(ScaleDomain::for_indices(1).max, 1.0);
        assert_eq!(ScaleDomain::for_indices(0).max, 1.0);
    }

    #[test]
    fn test_path_builder() {
        let path = PathBuilder::new().move_to(0.0, 0.0).line_to(100.0, 100.0).build();

        assert_eq!(path, "M0.00,0.00L100.00,100.00");
    }

    #[test]
    fn test_line_path_keeps_order() {
        let path = line_path(&[(0.0, 0.0), (50.0, 50.0), (10.0, 0.0)]);
        assert_eq!(path, "M0.00,0.00L50.00,50.00L10.00,0.00");
        assert_eq!(line_path(&[]), "");
    }
}
