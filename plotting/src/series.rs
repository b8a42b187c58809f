use std::ops::Range;

use koshi_diffeq::SolutionSequence;

/// Running min/max over every finite point of the series drawn on one chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesBounds {
    pub xmax: f64,
    pub xmin: f64,
    pub ymax: f64,
    pub ymin: f64,
}

impl Default for SeriesBounds {
    fn default() -> Self {
        Self {
            xmax: -f64::INFINITY,
            xmin: f64::INFINITY,
            ymax: -f64::INFINITY,
            ymin: f64::INFINITY,
        }
    }
}

impl SeriesBounds {
    /// Widens the bounds to cover `sequence`. Points with a non-finite coordinate
    /// are skipped.
    pub fn insert(&mut self, sequence: &SolutionSequence) {
        for point in sequence.iter().filter(|p| p.x.is_finite() && p.y.is_finite()) {
            self.xmin = self.xmin.min(point.x);
            self.xmax = self.xmax.max(point.x);
            self.ymin = self.ymin.min(point.y);
            self.ymax = self.ymax.max(point.y);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.xmin > self.xmax || self.ymin > self.ymax
    }

    /// Axis ranges padded by `margin` of their span. Degenerate spans are widened
    /// to one unit so the chart always has some extent.
    pub fn ranges(&self, margin: f64) -> (Range<f64>, Range<f64>) {
        if self.is_empty() {
            return (0.0..1.0, -1.0..1.0);
        }
        (
            padded(self.xmin, self.xmax, margin),
            padded(self.ymin, self.ymax, margin),
        )
    }
}

fn padded(min: f64, max: f64, margin: f64) -> Range<f64> {
    let span = max - min;
    if span <= f64::EPSILON {
        return (min - 0.5)..(max + 0.5);
    }
    (min - span * margin)..(max + span * margin)
}
