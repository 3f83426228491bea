//! Numeric ranges and the linear domain-to-pixel scale.

/// Numeric range with inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Range {
    /// Minimum value.
    pub min: f64,
    /// Maximum value.
    pub max: f64,
}

impl Range {
    /// Create a new range, swapping bounds if needed.
    pub fn new(mut min: f64, mut max: f64) -> Self {
        if min > max {
            std::mem::swap(&mut min, &mut max);
        }
        Self { min, max }
    }

    /// Span of the range.
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Check whether both bounds are finite.
    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// Check whether the range has positive span and finite bounds.
    pub fn is_valid(&self) -> bool {
        self.is_finite() && self.span() > 0.0
    }
}

/// Affine mapping between a data domain and a pixel range.
///
/// The scale is rebuilt per event from the current domain and drawable
/// width; it is never cached across frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: Range,
    range: Range,
}

impl LinearScale {
    /// Create a scale between a domain and a range.
    ///
    /// Returns `None` when either interval is non-finite or has zero span.
    pub fn new(domain: Range, range: Range) -> Option<Self> {
        if !domain.is_valid() || !range.is_valid() {
            return None;
        }
        Some(Self { domain, range })
    }

    /// Access the domain.
    pub fn domain(&self) -> Range {
        self.domain
    }

    /// Access the range.
    pub fn range(&self) -> Range {
        self.range
    }

    /// Map a domain value into the range.
    pub fn map_value(&self, value: f64) -> Option<f64> {
        if !value.is_finite() {
            return None;
        }
        let normalized = (value - self.domain.min) / self.domain.span();
        Some(self.range.min + normalized * self.range.span())
    }

    /// Invert a range value back into the domain.
    pub fn invert_value(&self, value: f64) -> Option<f64> {
        if !value.is_finite() {
            return None;
        }
        let normalized = (value - self.range.min) / self.range.span();
        Some(self.domain.min + normalized * self.domain.span())
    }
}
