use crate::{SolverErrors, solvers::SolverMethods};

/// Left end of the integration interval.
pub const X_START: f64 = 0.0;
/// Right end of the integration interval.
pub const X_END: f64 = 1.0;

/// Fixed-step control configuration.
///
/// The interval [`X_START`, `X_END`] is split into `steps` equal steps of size `dt`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FixedStepControl {
    /// Number of steps taken across the interval.
    pub steps: usize,
    /// Constant step size.
    pub dt: f64,
}

impl FixedStepControl {
    /// Constructs a fixed-step controller for `method`, rejecting step counts the
    /// method cannot start from.
    pub fn new(method: SolverMethods, steps: usize) -> Result<Self, SolverErrors> {
        let minimum = method.minimum_steps();
        if steps < minimum {
            return Err(SolverErrors::InvalidStepCount {
                method,
                steps,
                minimum,
            });
        }
        Ok(Self {
            steps,
            dt: (X_END - X_START) / steps as f64,
        })
    }
}
