use crate::{
    OdeModel, SolverErrors, evaluate,
    rk::rk4_step,
    sequence::SolutionSequence,
    solvers::{OdeSolver, SolverMethods},
    stepping::FixedStepControl,
};

// weights for f(xn+2), f(xn+1), f(xn)
const WEIGHTS: [f64; 3] = [23.0 / 12.0, -16.0 / 12.0, 5.0 / 12.0];

/// Three-step explicit Adams-Bashforth method.
///
/// The points at x = h and x = 2h are seeded with two [`rk4_step`]s, after which
///
/// ```text
/// yn+3 = yn+2 + h * (23/12 f(xn+2, yn+2) - 16/12 f(xn+1, yn+1) + 5/12 f(xn, yn))
/// ```
///
/// is applied on the three most recently recorded points. Requires at least 3 steps.
#[derive(Clone, Copy, Debug, Default)]
pub struct AdamsBashforth3;

impl OdeSolver for AdamsBashforth3 {
    fn method(&self) -> SolverMethods {
        SolverMethods::AdamsBashforth3
    }

    fn solve<M>(&self, model: &M, y0: f64, steps: usize) -> Result<SolutionSequence, SolverErrors>
    where
        M: OdeModel + ?Sized,
    {
        let FixedStepControl { steps, dt } = FixedStepControl::new(self.method(), steps)?;

        let mut sequence = SolutionSequence::start(y0, steps, dt);

        // bootstrap
        let x1 = dt;
        let y1 = rk4_step(model, 0.0, y0, dt)?;
        sequence.push(x1, y1);
        let x2 = x1 + dt;
        let y2 = rk4_step(model, x1, y1, dt)?;
        sequence.push(x2, y2);

        // derivatives at the recorded points, oldest first. Each recorded point is
        // evaluated once; the slot for the newest point is filled inside the loop.
        let mut f = [evaluate(model, 0.0, y0)?, evaluate(model, x1, y1)?, 0.0];
        let (mut x, mut y) = (x2, y2);
        for _ in 3..=steps {
            f[2] = evaluate(model, x, y)?;
            y += dt * (WEIGHTS[0] * f[2] + WEIGHTS[1] * f[1] + WEIGHTS[2] * f[0]);
            x += dt;
            sequence.push(x, y);
            f.rotate_left(1);
        }

        Ok(sequence.finish(self.method()))
    }
}
