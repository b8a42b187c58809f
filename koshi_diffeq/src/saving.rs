use std::{
    fs::{self, File},
    io::BufWriter,
    path::PathBuf,
};

use csv::Writer;
use thiserror::Error;

use crate::{driver::TaggedSequence, solvers::SolverMethods};

#[derive(Debug, Error)]
pub enum SinkErrors {
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Csv(#[from] csv::Error),
    #[error("rendering failed: {0}")]
    Render(String),
    #[error("sink received a sequence before begin() was called")]
    NotStarted,
}

/// Downstream consumer of the tagged sequences produced by a [`SolveDriver`] run.
///
/// The driver calls `begin` once per solver method, `accept` once per step count in
/// configured order, then `finish`.
///
/// [`SolveDriver`]: crate::driver::SolveDriver
pub trait SequenceSink {
    fn begin(&mut self, _method: SolverMethods) -> Result<(), SinkErrors> {
        Ok(())
    }
    fn accept(&mut self, tagged: &TaggedSequence) -> Result<(), SinkErrors>;
    fn finish(&mut self) -> Result<(), SinkErrors> {
        Ok(())
    }
}

/// Collects every tagged sequence in memory.
#[derive(Debug, Default)]
pub struct MemoryResult {
    pub sequences: Vec<TaggedSequence>,
}

impl MemoryResult {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SequenceSink for MemoryResult {
    fn accept(&mut self, tagged: &TaggedSequence) -> Result<(), SinkErrors> {
        self.sequences.push(tagged.clone());
        Ok(())
    }
}

/// Writes each method's sequences to `<folder>/<method>.csv` with the columns
/// `steps,index,x,y`.
#[derive(Debug)]
pub struct CsvWriter {
    folder: PathBuf,
    writer: Option<Writer<BufWriter<File>>>,
}

impl CsvWriter {
    pub fn new(folder: PathBuf) -> Self {
        Self {
            folder,
            writer: None,
        }
    }

    pub fn path_for(&self, method: SolverMethods) -> PathBuf {
        self.folder.join(format!("{}.csv", method.file_stem()))
    }
}

impl SequenceSink for CsvWriter {
    fn begin(&mut self, method: SolverMethods) -> Result<(), SinkErrors> {
        fs::create_dir_all(&self.folder)?;
        let file = File::create(self.path_for(method))?;
        let mut writer = Writer::from_writer(BufWriter::new(file));
        writer.write_record(["steps", "index", "x", "y"])?;
        self.writer = Some(writer);
        Ok(())
    }

    fn accept(&mut self, tagged: &TaggedSequence) -> Result<(), SinkErrors> {
        let writer = self.writer.as_mut().ok_or(SinkErrors::NotStarted)?;
        for (i, point) in tagged.sequence.iter().enumerate() {
            writer.write_record(&[
                tagged.steps.to_string(),
                i.to_string(),
                point.x.to_string(),
                point.y.to_string(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkErrors> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
        }
        Ok(())
    }
}

/// Fans every call out to several sinks, in insertion order.
#[derive(Default)]
pub struct Sinks(Vec<Box<dyn SequenceSink>>);

impl Sinks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sink: Box<dyn SequenceSink>) {
        self.0.push(sink);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl SequenceSink for Sinks {
    fn begin(&mut self, method: SolverMethods) -> Result<(), SinkErrors> {
        for sink in &mut self.0 {
            sink.begin(method)?;
        }
        Ok(())
    }

    fn accept(&mut self, tagged: &TaggedSequence) -> Result<(), SinkErrors> {
        for sink in &mut self.0 {
            sink.accept(tagged)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkErrors> {
        for sink in &mut self.0 {
            sink.finish()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{OdeSolver, euler::Euler};
    use color::Color;

    fn tagged(steps: usize) -> TaggedSequence {
        let model = |_x: f64, y: f64| y;
        TaggedSequence {
            method: SolverMethods::Euler,
            steps,
            color: Color::RED,
            sequence: Euler.solve(&model, 1.0, steps).unwrap(),
        }
    }

    #[test]
    fn csv_rows_per_sequence() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = CsvWriter::new(dir.path().join("out"));

        writer.begin(SolverMethods::Euler).unwrap();
        writer.accept(&tagged(2)).unwrap();
        writer.accept(&tagged(4)).unwrap();
        writer.finish().unwrap();

        let contents = fs::read_to_string(dir.path().join("out").join("euler.csv")).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 1 + 3 + 5);
        assert_eq!(lines[0], "steps,index,x,y");
        assert_eq!(lines[1], "2,0,0,1");
        assert_eq!(lines[2], "2,1,0.5,1.5");
        assert_eq!(lines[3], "2,2,1,2.25");
        assert!(lines[4].starts_with("4,0,"));
    }

    #[test]
    fn csv_accept_before_begin_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = CsvWriter::new(dir.path().to_path_buf());
        assert!(matches!(writer.accept(&tagged(2)), Err(SinkErrors::NotStarted)));
    }

    #[test]
    fn fanout_reaches_every_sink() {
        let dir = tempfile::tempdir().unwrap();
        let mut sinks = Sinks::new();
        sinks.push(Box::new(CsvWriter::new(dir.path().to_path_buf())));
        sinks.push(Box::new(MemoryResult::new()));
        assert_eq!(sinks.len(), 2);

        sinks.begin(SolverMethods::RungeKutta4).unwrap();
        sinks.accept(&tagged(3)).unwrap();
        sinks.finish().unwrap();

        assert!(dir.path().join("rk4.csv").exists());
    }
}
