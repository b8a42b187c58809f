use color::{Color, Palette};
use log::info;
use rayon::prelude::*;
use thiserror::Error;

use crate::{
    OdeModel, SolverErrors,
    saving::{SequenceSink, SinkErrors},
    sequence::SolutionSequence,
    solvers::{OdeSolver, SolverMethods},
    stepping::FixedStepControl,
};

#[derive(Debug, Error)]
pub enum DriverErrors {
    #[error("{0}")]
    Solver(#[from] SolverErrors),
    #[error("{0}")]
    Sink(#[from] SinkErrors),
}

/// A solved sequence together with how it was produced and how to display it.
#[derive(Clone, Debug, PartialEq)]
pub struct TaggedSequence {
    pub method: SolverMethods,
    pub steps: usize,
    pub color: Color,
    pub sequence: SolutionSequence,
}

impl TaggedSequence {
    /// Legend label for plots.
    pub fn label(&self) -> String {
        format!("steps = {}", self.steps)
    }
}

/// Runs one solver over a set of step counts for a fixed initial value.
///
/// Each resulting sequence gets the palette color matching its position in the
/// step-count list. Failures are not recovered: the first error ends the run.
#[derive(Clone, Debug)]
pub struct SolveDriver {
    initial_value: f64,
    step_counts: Vec<usize>,
    palette: Palette,
    parallel: bool,
}

impl Default for SolveDriver {
    fn default() -> Self {
        Self {
            initial_value: -2.0,
            step_counts: vec![10, 20, 30],
            palette: Palette::default(),
            parallel: false,
        }
    }
}

impl SolveDriver {
    pub fn new(initial_value: f64) -> Self {
        Self {
            initial_value,
            ..Default::default()
        }
    }

    pub fn with_step_counts(mut self, step_counts: Vec<usize>) -> Self {
        self.step_counts = step_counts;
        self
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Solves the step counts concurrently. Output order is unchanged.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn initial_value(&self) -> f64 {
        self.initial_value
    }

    pub fn step_counts(&self) -> &[usize] {
        &self.step_counts
    }

    /// Solves `model` once per configured step count.
    ///
    /// Every step count is validated against the solver before anything is solved.
    pub fn run<S, M>(&self, solver: &S, model: &M) -> Result<Vec<TaggedSequence>, SolverErrors>
    where
        S: OdeSolver + Sync,
        M: OdeModel + Sync + ?Sized,
    {
        if self.step_counts.is_empty() {
            return Err(SolverErrors::NoStepCounts);
        }
        let method = solver.method();
        for &steps in &self.step_counts {
            FixedStepControl::new(method, steps)?;
        }

        info!(
            "solving with {} from y0 = {} at step counts {:?}",
            method, self.initial_value, self.step_counts
        );

        let y0 = self.initial_value;
        let sequences = if self.parallel {
            self.step_counts
                .par_iter()
                .map(|&steps| solver.solve(model, y0, steps))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            self.step_counts
                .iter()
                .map(|&steps| solver.solve(model, y0, steps))
                .collect::<Result<Vec<_>, _>>()?
        };

        Ok(sequences
            .into_iter()
            .zip(&self.step_counts)
            .enumerate()
            .map(|(i, (sequence, &steps))| TaggedSequence {
                method,
                steps,
                color: self.palette.get(i).clone(),
                sequence,
            })
            .collect())
    }

    /// Solves, then hands every tagged sequence to `sink` in step-count order.
    ///
    /// Nothing reaches the sink if any solve fails.
    pub fn run_into<S, M, K>(&self, solver: &S, model: &M, sink: &mut K) -> Result<(), DriverErrors>
    where
        S: OdeSolver + Sync,
        M: OdeModel + Sync + ?Sized,
        K: SequenceSink + ?Sized,
    {
        let tagged = self.run(solver, model)?;
        sink.begin(solver.method())?;
        for sequence in &tagged {
            sink.accept(sequence)?;
        }
        sink.finish()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Fallible, saving::MemoryResult};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn riccati(x: f64, y: f64) -> f64 {
        y * y + x
    }

    #[test]
    fn defaults_reproduce_the_reference_run() {
        let driver = SolveDriver::default();
        assert_eq!(driver.initial_value(), -2.0);
        assert_eq!(driver.step_counts(), &[10, 20, 30]);

        let tagged = driver.run(&SolverMethods::Euler, &riccati).unwrap();
        assert_eq!(tagged.len(), 3);
        let colors: Vec<&Color> = tagged.iter().map(|t| &t.color).collect();
        assert_eq!(colors, vec![&Color::RED, &Color::GREEN, &Color::BLUE]);
        for (t, steps) in tagged.iter().zip([10, 20, 30]) {
            assert_eq!(t.steps, steps);
            assert_eq!(t.sequence.len(), steps + 1);
            assert_eq!(t.sequence.first().y, -2.0);
            assert_eq!(t.method, SolverMethods::Euler);
        }
        assert_eq!(tagged[1].label(), "steps = 20");
    }

    #[test]
    fn parallel_and_serial_runs_agree() {
        let driver = SolveDriver::new(0.5).with_step_counts(vec![40, 3, 17, 8, 25]);
        for method in SolverMethods::ALL {
            let serial = driver.run(&method, &riccati).unwrap();
            let parallel = driver.clone().with_parallel(true).run(&method, &riccati).unwrap();
            assert_eq!(serial, parallel);
        }
    }

    #[test]
    fn invalid_counts_fail_before_any_evaluation() {
        let calls = AtomicUsize::new(0);
        let model = |_x: f64, y: f64| {
            calls.fetch_add(1, Ordering::Relaxed);
            y
        };
        let driver = SolveDriver::default().with_step_counts(vec![10, 2, 30]);

        assert!(matches!(
            driver.run(&SolverMethods::AdamsBashforth3, &model),
            Err(SolverErrors::InvalidStepCount { steps: 2, .. })
        ));
        assert_eq!(calls.load(Ordering::Relaxed), 0);

        // the same counts are fine for Euler
        assert!(driver.run(&SolverMethods::Euler, &model).is_ok());
    }

    #[test]
    fn empty_step_counts_are_rejected() {
        let driver = SolveDriver::default().with_step_counts(Vec::new());
        assert!(matches!(
            driver.run(&SolverMethods::Euler, &riccati),
            Err(SolverErrors::NoStepCounts)
        ));
    }

    #[test]
    fn sink_receives_sequences_in_order() {
        let driver = SolveDriver::default()
            .with_step_counts(vec![30, 10])
            .with_palette(Palette::new(vec![Color::BLACK]));
        let mut sink = MemoryResult::new();
        driver
            .run_into(&SolverMethods::AdamsBashforth3, &riccati, &mut sink)
            .unwrap();

        let steps: Vec<usize> = sink.sequences.iter().map(|t| t.steps).collect();
        assert_eq!(steps, vec![30, 10]);
        assert!(sink.sequences.iter().all(|t| t.color == Color::BLACK));
    }

    #[test]
    fn deserialized_empty_palette_still_colors_every_sequence() {
        let palette: Palette = ron::from_str("[]").unwrap();
        let tagged = SolveDriver::default()
            .with_palette(palette)
            .run(&SolverMethods::Euler, &riccati)
            .unwrap();

        let colors: Vec<&Color> = tagged.iter().map(|t| &t.color).collect();
        assert_eq!(colors, vec![&Color::RED, &Color::GREEN, &Color::BLUE]);
    }

    #[test]
    fn model_failure_reaches_the_caller_and_skips_the_sink() {
        let model = Fallible(|x: f64, _y: f64| if x > 0.5 { Err("boom") } else { Ok(1.0) });
        let mut sink = MemoryResult::new();
        let result = SolveDriver::default().run_into(&SolverMethods::Euler, &model, &mut sink);

        assert!(matches!(
            result,
            Err(DriverErrors::Solver(SolverErrors::Derivative { .. }))
        ));
        assert!(sink.sequences.is_empty());
    }
}
