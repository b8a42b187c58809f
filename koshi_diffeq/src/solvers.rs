use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    OdeModel, SolverErrors, adams::AdamsBashforth3, euler::Euler, rk::RungeKutta4,
    sequence::SolutionSequence,
};

/// A fixed-step method producing a full [`SolutionSequence`] over [0, 1].
pub trait OdeSolver {
    /// The method this solver implements.
    fn method(&self) -> SolverMethods;

    /// Solves y' = f(x, y), y(0) = `y0` with `steps` equal steps.
    ///
    /// Returns `steps + 1` points, or an error if `steps` is below the method's
    /// minimum or the model fails to evaluate.
    fn solve<M>(&self, model: &M, y0: f64, steps: usize) -> Result<SolutionSequence, SolverErrors>
    where
        M: OdeModel + ?Sized;
}

/// The available fixed-step methods, selectable at runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SolverMethods {
    Euler,
    RungeKutta4,
    AdamsBashforth3,
}

impl SolverMethods {
    pub const ALL: [SolverMethods; 3] = [
        SolverMethods::Euler,
        SolverMethods::RungeKutta4,
        SolverMethods::AdamsBashforth3,
    ];

    /// Smallest step count the method can produce a complete sequence for.
    ///
    /// Adams-Bashforth 3 needs three seed points before its formula applies.
    pub fn minimum_steps(&self) -> usize {
        match self {
            SolverMethods::Euler | SolverMethods::RungeKutta4 => 1,
            SolverMethods::AdamsBashforth3 => 3,
        }
    }

    /// Short name used for output files.
    pub fn file_stem(&self) -> &'static str {
        match self {
            SolverMethods::Euler => "euler",
            SolverMethods::RungeKutta4 => "rk4",
            SolverMethods::AdamsBashforth3 => "adams",
        }
    }
}

impl fmt::Display for SolverMethods {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SolverMethods::Euler => "Euler",
            SolverMethods::RungeKutta4 => "Runge-Kutta 4",
            SolverMethods::AdamsBashforth3 => "Adams-Bashforth 3",
        };
        f.write_str(name)
    }
}

impl OdeSolver for SolverMethods {
    fn method(&self) -> SolverMethods {
        *self
    }

    fn solve<M>(&self, model: &M, y0: f64, steps: usize) -> Result<SolutionSequence, SolverErrors>
    where
        M: OdeModel + ?Sized,
    {
        match self {
            SolverMethods::Euler => Euler.solve(model, y0, steps),
            SolverMethods::RungeKutta4 => RungeKutta4.solve(model, y0, steps),
            SolverMethods::AdamsBashforth3 => AdamsBashforth3.solve(model, y0, steps),
        }
    }
}
