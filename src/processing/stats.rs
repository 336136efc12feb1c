//! Per-frame edge statistics

use serde::Serialize;

/// Magnitude statistics over the interior pixels of one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct EdgeStats {
    /// Interior pixels evaluated
    pub pixels: u64,
    /// Pixels marked as edges
    pub edges: u64,
    /// Smallest gradient magnitude (0 when no pixels were evaluated)
    pub min_magnitude: u32,
    /// Largest gradient magnitude
    pub max_magnitude: u32,
    /// Sum of all magnitudes
    pub sum_magnitude: u64,
}

impl EdgeStats {
    /// Account for one evaluated pixel
    #[inline]
    pub fn record(&mut self, magnitude: u32, is_edge: bool) {
        if self.pixels == 0 {
            self.min_magnitude = magnitude;
            self.max_magnitude = magnitude;
        } else {
            self.min_magnitude = self.min_magnitude.min(magnitude);
            self.max_magnitude = self.max_magnitude.max(magnitude);
        }
        self.pixels += 1;
        self.edges += is_edge as u64;
        self.sum_magnitude += magnitude as u64;
    }

    /// Combine stats from disjoint pixel sets
    pub fn merge(self, other: Self) -> Self {
        if self.pixels == 0 {
            return other;
        }
        if other.pixels == 0 {
            return self;
        }
        Self {
            pixels: self.pixels + other.pixels,
            edges: self.edges + other.edges,
            min_magnitude: self.min_magnitude.min(other.min_magnitude),
            max_magnitude: self.max_magnitude.max(other.max_magnitude),
            sum_magnitude: self.sum_magnitude + other.sum_magnitude,
        }
    }

    pub fn mean_magnitude(&self) -> f64 {
        if self.pixels == 0 {
            0.0
        } else {
            self.sum_magnitude as f64 / self.pixels as f64
        }
    }

    /// Fraction of evaluated pixels that are edges
    pub fn edge_ratio(&self) -> f64 {
        if self.pixels == 0 {
            0.0
        } else {
            self.edges as f64 / self.pixels as f64
        }
    }
}

impl std::fmt::Display for EdgeStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "edges {}/{} ({:.2}%), magnitude min {} max {} avg {:.2}",
            self.edges,
            self.pixels,
            self.edge_ratio() * 100.0,
            self.min_magnitude,
            self.max_magnitude,
            self.mean_magnitude()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_merge() {
        let mut a = EdgeStats::default();
        a.record(10, false);
        a.record(300, true);

        let mut b = EdgeStats::default();
        b.record(4, false);

        let merged = a.merge(b);
        assert_eq!(merged.pixels, 3);
        assert_eq!(merged.edges, 1);
        assert_eq!(merged.min_magnitude, 4);
        assert_eq!(merged.max_magnitude, 300);
        assert_eq!(merged.sum_magnitude, 314);
        assert!((merged.edge_ratio() - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_merge_with_empty_keeps_min() {
        let mut a = EdgeStats::default();
        a.record(50, false);
        assert_eq!(a.merge(EdgeStats::default()).min_magnitude, 50);
        assert_eq!(EdgeStats::default().merge(a).min_magnitude, 50);
    }

    #[test]
    fn test_empty_ratios() {
        let s = EdgeStats::default();
        assert_eq!(s.mean_magnitude(), 0.0);
        assert_eq!(s.edge_ratio(), 0.0);
    }
}
