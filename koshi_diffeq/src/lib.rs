use std::error::Error;

use thiserror::Error;

/// Submodules for the fixed-step solvers and their plumbing.
pub mod adams;
pub mod driver;
pub mod euler;
pub mod rk;
pub mod saving;
pub mod sequence;
pub mod solvers;
pub mod stepping;

pub use adams::AdamsBashforth3;
pub use driver::{DriverErrors, SolveDriver, TaggedSequence};
pub use euler::Euler;
pub use rk::{RungeKutta4, rk4_step};
pub use sequence::{SamplePoint, SolutionSequence};
pub use solvers::{OdeSolver, SolverMethods};
pub use stepping::FixedStepControl;

/// Boxed error returned by a failing derivative evaluation.
pub type DerivativeError = Box<dyn Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum SolverErrors {
    #[error("{method} requires at least {minimum} steps, got {steps}")]
    InvalidStepCount {
        method: SolverMethods,
        steps: usize,
        minimum: usize,
    },
    #[error("derivative evaluation failed at (x = {x}, y = {y}): {source}")]
    Derivative {
        x: f64,
        y: f64,
        source: DerivativeError,
    },
    #[error("no step counts were configured")]
    NoStepCounts,
}

/// Trait for the right-hand side f(x, y) of a scalar first-order ODE y' = f(x, y).
///
/// Implementations must be pure: the solvers evaluate `f` many times per solve and
/// the driver may evaluate it from several threads at once. Any closure
/// `Fn(f64, f64) -> f64` is a model; fallible closures can be wrapped in [`Fallible`].
pub trait OdeModel {
    /// Evaluate the derivative at `(x, y)`.
    fn f(&self, x: f64, y: f64) -> Result<f64, DerivativeError>;
}

impl<F> OdeModel for F
where
    F: Fn(f64, f64) -> f64,
{
    fn f(&self, x: f64, y: f64) -> Result<f64, DerivativeError> {
        Ok(self(x, y))
    }
}

/// Adapts a closure returning `Result` into an [`OdeModel`].
///
/// The closure's error is boxed and reported as [`SolverErrors::Derivative`].
#[derive(Clone, Copy, Debug)]
pub struct Fallible<F>(pub F);

impl<F, E> OdeModel for Fallible<F>
where
    F: Fn(f64, f64) -> Result<f64, E>,
    E: Into<DerivativeError>,
{
    fn f(&self, x: f64, y: f64) -> Result<f64, DerivativeError> {
        (self.0)(x, y).map_err(Into::into)
    }
}

// evaluates the model, attaching the point where it failed
pub(crate) fn evaluate<M>(model: &M, x: f64, y: f64) -> Result<f64, SolverErrors>
where
    M: OdeModel + ?Sized,
{
    model
        .f(x, y)
        .map_err(|source| SolverErrors::Derivative { x, y, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_models() {
        let model = |x: f64, y: f64| y * y + x;
        assert_eq!(model.f(1.0, -2.0).unwrap(), 5.0);
    }

    #[test]
    fn fallible_errors_carry_the_failing_point() {
        let model = Fallible(|x: f64, y: f64| {
            if y < 0.0 {
                Err("negative state")
            } else {
                Ok(x + y)
            }
        });

        assert_eq!(evaluate(&model, 1.0, 2.0).unwrap(), 3.0);
        match evaluate(&model, 0.5, -1.0) {
            Err(SolverErrors::Derivative { x, y, source }) => {
                assert_eq!(x, 0.5);
                assert_eq!(y, -1.0);
                assert_eq!(source.to_string(), "negative state");
            }
            other => panic!("expected a derivative error, got {other:?}"),
        }
    }

    #[test]
    fn models_work_behind_trait_objects() {
        let model: &dyn OdeModel = &|_x: f64, y: f64| 2.0 * y;
        assert_eq!(evaluate(model, 0.0, 3.0).unwrap(), 6.0);
    }
}
