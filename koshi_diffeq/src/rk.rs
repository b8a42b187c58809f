use crate::{
    OdeModel, SolverErrors, evaluate,
    sequence::SolutionSequence,
    solvers::{OdeSolver, SolverMethods},
    stepping::FixedStepControl,
};

/// Advances `yn` at `xn` by one classical 4-stage Runge-Kutta step of size `h`.
///
/// ```text
/// k1 = f(xn, yn)
/// k2 = f(xn + h/2, yn + h*k1/2)
/// k3 = f(xn + h/2, yn + h*k2/2)
/// k4 = f(xn + h, yn + h*k3)
/// yn+1 = yn + h/6 * (k1 + 2k2 + 2k3 + k4)
/// ```
///
/// A failing model is reported as is; the step is not retried.
pub fn rk4_step<M>(model: &M, xn: f64, yn: f64, h: f64) -> Result<f64, SolverErrors>
where
    M: OdeModel + ?Sized,
{
    let half_h = h / 2.0;

    let k1 = evaluate(model, xn, yn)?;
    let k2 = evaluate(model, xn + half_h, yn + half_h * k1)?;
    let k3 = evaluate(model, xn + half_h, yn + half_h * k2)?;
    let k4 = evaluate(model, xn + h, yn + h * k3)?;

    Ok(yn + h / 6.0 * (k1 + 2.0 * k2 + 2.0 * k3 + k4))
}

/// Classical Runge-Kutta 4, one [`rk4_step`] per step.
#[derive(Clone, Copy, Debug, Default)]
pub struct RungeKutta4;

impl OdeSolver for RungeKutta4 {
    fn method(&self) -> SolverMethods {
        SolverMethods::RungeKutta4
    }

    fn solve<M>(&self, model: &M, y0: f64, steps: usize) -> Result<SolutionSequence, SolverErrors>
    where
        M: OdeModel + ?Sized,
    {
        let FixedStepControl { steps, dt } = FixedStepControl::new(self.method(), steps)?;

        let mut sequence = SolutionSequence::start(y0, steps, dt);
        let (mut x, mut y) = (0.0, y0);
        for _ in 0..steps {
            y = rk4_step(model, x, y, dt)?;
            x += dt;
            sequence.push(x, y);
        }

        Ok(sequence.finish(self.method()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Fallible;
    use approx::assert_abs_diff_eq;
    use std::cell::RefCell;

    const TOL: f64 = 1e-12;

    #[test]
    fn zero_derivative_leaves_the_state_unchanged() {
        let model = |_x: f64, _y: f64| 0.0;
        let mut y = -2.0;
        let h = 0.1;
        for i in 0..10 {
            y = rk4_step(&model, i as f64 * h, y, h).unwrap();
            assert_eq!(y, -2.0);
        }
    }

    #[test]
    fn single_step_matches_taylor_series_for_exponential() {
        // for y' = y one step reproduces exp(h) through the h^4 term
        let model = |_x: f64, y: f64| y;
        let h: f64 = 0.1;
        let expected = 1.0 + h + h.powi(2) / 2.0 + h.powi(3) / 6.0 + h.powi(4) / 24.0;
        assert_abs_diff_eq!(rk4_step(&model, 0.0, 1.0, h).unwrap(), expected, epsilon = TOL);
    }

    #[test]
    fn stages_are_evaluated_at_the_classical_nodes() {
        let calls = RefCell::new(Vec::new());
        let model = |x: f64, y: f64| {
            calls.borrow_mut().push((x, y));
            1.0
        };
        let y1 = rk4_step(&model, 0.2, 3.0, 0.1).unwrap();

        assert_abs_diff_eq!(y1, 3.1, epsilon = TOL);
        let calls = calls.into_inner();
        assert_eq!(calls.len(), 4);
        assert_abs_diff_eq!(calls[0].0, 0.2, epsilon = TOL);
        assert_abs_diff_eq!(calls[1].0, 0.25, epsilon = TOL);
        assert_abs_diff_eq!(calls[1].1, 3.05, epsilon = TOL);
        assert_abs_diff_eq!(calls[2].0, 0.25, epsilon = TOL);
        assert_abs_diff_eq!(calls[3].0, 0.3, epsilon = TOL);
        assert_abs_diff_eq!(calls[3].1, 3.1, epsilon = TOL);
    }

    #[test]
    fn solver_is_exact_for_quartic_solutions() {
        // y' = 4x^3 has y = x^4 + y0, which RK4 integrates without truncation error
        let model = |x: f64, _y: f64| 4.0 * x.powi(3);
        let sequence = RungeKutta4.solve(&model, 0.5, 8).unwrap();
        for point in &sequence {
            assert_abs_diff_eq!(point.y, point.x.powi(4) + 0.5, epsilon = TOL);
        }
    }

    #[test]
    fn solver_accepts_a_single_step() {
        let model = |_x: f64, y: f64| y;
        let sequence = RungeKutta4.solve(&model, 1.0, 1).unwrap();
        assert_eq!(sequence.len(), 2);
        assert_abs_diff_eq!(sequence.last().y, 1.0 + 1.0 + 0.5 + 1.0 / 6.0 + 1.0 / 24.0, epsilon = TOL);
    }

    #[test]
    fn model_failures_propagate() {
        let model = Fallible(|x: f64, y: f64| if x > 0.5 { Err("out of domain") } else { Ok(y) });
        match RungeKutta4.solve(&model, 1.0, 10) {
            Err(SolverErrors::Derivative { x, source, .. }) => {
                assert!(x > 0.5);
                assert_eq!(source.to_string(), "out of domain");
            }
            other => panic!("expected a derivative error, got {other:?}"),
        }
    }
}
