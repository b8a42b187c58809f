use std::fmt::Display;
use std::fs;
use std::path::PathBuf;

use koshi_diffeq::{
    SolverMethods, TaggedSequence,
    saving::{SequenceSink, SinkErrors},
};
use log::info;
use plotters::coord::{cartesian::Cartesian2d, types::RangedCoordf64};
use plotters::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod series;
pub use series::SeriesBounds;

#[derive(Debug, Error)]
pub enum PlotErrors {
    #[error("drawing failed: {0}")]
    Drawing(String),
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("finish() called before begin()")]
    NotStarted,
}

impl From<PlotErrors> for SinkErrors {
    fn from(value: PlotErrors) -> Self {
        match value {
            PlotErrors::Io(e) => SinkErrors::Io(e),
            PlotErrors::NotStarted => SinkErrors::NotStarted,
            other => SinkErrors::Render(other.to_string()),
        }
    }
}

fn drawing(e: impl Display) -> PlotErrors {
    PlotErrors::Drawing(e.to_string())
}

/// Image settings for rendered charts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlotConfig {
    pub width: u32,
    pub height: u32,
    pub caption_size: u32,
    /// Radius of the point markers in pixels.
    pub marker_size: u32,
    /// Fraction of the data span added around the axes.
    pub margin: f64,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            caption_size: 40,
            marker_size: 4,
            margin: 0.05,
        }
    }
}

/// Renders every sequence of a method onto one overlaid scatter chart, written to
/// `<folder>/<method>.png` when the driver finishes.
pub struct PlotRenderer {
    folder: PathBuf,
    config: PlotConfig,
    method: Option<SolverMethods>,
    pending: Vec<TaggedSequence>,
}

impl PlotRenderer {
    pub fn new(folder: PathBuf, config: PlotConfig) -> Self {
        Self {
            folder,
            config,
            method: None,
            pending: Vec::new(),
        }
    }

    pub fn path_for(&self, method: SolverMethods) -> PathBuf {
        self.folder.join(format!("{}.png", method.file_stem()))
    }

    fn render(&self, method: SolverMethods) -> Result<PathBuf, PlotErrors> {
        fs::create_dir_all(&self.folder)?;
        let path = self.path_for(method);

        {
            let root = BitMapBackend::new(&path, (self.config.width, self.config.height))
                .into_drawing_area();
            root.fill(&WHITE).map_err(drawing)?;

            let mut bounds = SeriesBounds::default();
            for tagged in &self.pending {
                bounds.insert(&tagged.sequence);
            }
            let (x_range, y_range) = bounds.ranges(self.config.margin);

            let mut chart = ChartBuilder::on(&root)
                .caption(method.to_string(), ("sans-serif", self.config.caption_size))
                .margin(20)
                .x_label_area_size(40)
                .y_label_area_size(60)
                .build_cartesian_2d(x_range, y_range)
                .map_err(drawing)?;

            chart
                .configure_mesh()
                .x_desc("x")
                .y_desc("y")
                .draw()
                .map_err(drawing)?;

            draw_sequences(&mut chart, &self.pending, self.config.marker_size)?;

            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()
                .map_err(drawing)?;

            root.present().map_err(drawing)?;
        }
        Ok(path)
    }
}

/// Draws each sequence as a line with point markers and registers its legend entry.
/// Text is only drawn later, by the legend and the mesh.
fn draw_sequences<DB: DrawingBackend>(
    chart: &mut ChartContext<'_, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    sequences: &[TaggedSequence],
    marker_size: u32,
) -> Result<(), PlotErrors> {
    for tagged in sequences {
        let (r, g, b) = tagged.color.to_rgb8();
        let color = RGBColor(r, g, b).mix(f64::from(tagged.color.alpha()));

        let points: Vec<(f64, f64)> = tagged
            .sequence
            .iter()
            .filter(|p| p.x.is_finite() && p.y.is_finite())
            .map(|p| (p.x, p.y))
            .collect();

        chart
            .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))
            .map_err(drawing)?
            .label(tagged.label())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));

        chart
            .draw_series(
                points
                    .iter()
                    .map(|&point| Circle::new(point, marker_size, color.filled())),
            )
            .map_err(drawing)?;
    }
    Ok(())
}

impl SequenceSink for PlotRenderer {
    fn begin(&mut self, method: SolverMethods) -> Result<(), SinkErrors> {
        self.method = Some(method);
        self.pending.clear();
        Ok(())
    }

    fn accept(&mut self, tagged: &TaggedSequence) -> Result<(), SinkErrors> {
        if self.method.is_none() {
            return Err(SinkErrors::NotStarted);
        }
        self.pending.push(tagged.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkErrors> {
        let method = self.method.take().ok_or(PlotErrors::NotStarted)?;
        let path = self.render(method)?;
        info!(
            "plotted {} sequences for {} to {}",
            self.pending.len(),
            method,
            path.display()
        );
        self.pending.clear();
        Ok(())
    }
}
