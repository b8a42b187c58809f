use crate::{
    OdeModel, SolverErrors, evaluate,
    sequence::SolutionSequence,
    solvers::{OdeSolver, SolverMethods},
    stepping::FixedStepControl,
};

/// Explicit (forward) Euler: yi+1 = yi + h * f(xi, yi).
///
/// First order in `h`. No stability checks are made, so the step count has to suit
/// the model.
#[derive(Clone, Copy, Debug, Default)]
pub struct Euler;

impl OdeSolver for Euler {
    fn method(&self) -> SolverMethods {
        SolverMethods::Euler
    }

    fn solve<M>(&self, model: &M, y0: f64, steps: usize) -> Result<SolutionSequence, SolverErrors>
    where
        M: OdeModel + ?Sized,
    {
        let FixedStepControl { steps, dt } = FixedStepControl::new(self.method(), steps)?;

        let mut sequence = SolutionSequence::start(y0, steps, dt);
        let (mut x, mut y) = (0.0, y0);
        for _ in 0..steps {
            // derivative at the current point, not the next one
            y += dt * evaluate(model, x, y)?;
            x += dt;
            sequence.push(x, y);
        }

        Ok(sequence.finish(self.method()))
    }
}
