use std::slice::Iter;

use log::{debug, warn};
use tolerance::check_error;

use crate::solvers::SolverMethods;

/// A single solution estimate `y` at abscissa `x`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SamplePoint {
    pub x: f64,
    pub y: f64,
}

impl SamplePoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for SamplePoint {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// The ordered output of one solver invocation.
///
/// Holds `steps + 1` points, the first being the initial condition at x = 0 and the
/// last lying at x = 1. Points are spaced by the constant step size `dt`. Sequences
/// are built by the solvers in this crate and are read-only afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct SolutionSequence {
    points: Vec<SamplePoint>,
    dt: f64,
}

impl SolutionSequence {
    /// Starts a sequence at the initial condition, preallocating `steps + 1` points.
    pub(crate) fn start(y0: f64, steps: usize, dt: f64) -> Self {
        let mut points = Vec::with_capacity(steps + 1);
        points.push(SamplePoint::new(0.0, y0));
        Self { points, dt }
    }

    pub(crate) fn push(&mut self, x: f64, y: f64) {
        self.points.push(SamplePoint::new(x, y));
    }

    /// Logs the finished solve. Non-finite values are kept, only reported.
    pub(crate) fn finish(self, method: SolverMethods) -> Self {
        let last = self.last();
        debug!(
            "{} finished {} steps (h = {}), y({}) = {}",
            method,
            self.steps(),
            self.dt,
            last.x,
            last.y
        );
        if !last.y.is_finite() {
            warn!(
                "{} with {} steps produced a non-finite value at x = {}",
                method,
                self.steps(),
                last.x
            );
        }
        self
    }

    pub fn points(&self) -> &[SamplePoint] {
        &self.points
    }

    pub fn iter(&self) -> Iter<'_, SamplePoint> {
        self.points.iter()
    }

    /// Number of points, always `steps + 1`.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn steps(&self) -> usize {
        self.points.len() - 1
    }

    pub fn step_size(&self) -> f64 {
        self.dt
    }

    pub fn first(&self) -> SamplePoint {
        self.points[0]
    }

    pub fn last(&self) -> SamplePoint {
        self.points[self.points.len() - 1]
    }

    /// Splits the sequence into parallel x and y arrays, preserving index order.
    pub fn split(&self) -> (Vec<f64>, Vec<f64>) {
        self.points.iter().map(|p| (p.x, p.y)).unzip()
    }

    /// Checks that every pair of neighbouring points is `dt` apart in x.
    pub fn is_uniformly_spaced(&self, rel_tol: f64) -> bool {
        self.points
            .windows(2)
            .all(|pair| check_error(self.dt, pair[1].x - pair[0].x, rel_tol, 0.0))
    }
}

impl<'a> IntoIterator for &'a SolutionSequence {
    type Item = &'a SamplePoint;
    type IntoIter = Iter<'a, SamplePoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
