use std::error::Error;
use std::fs::File;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use koshi_diffeq::{
    SolveDriver, SolverMethods,
    saving::{CsvWriter, Sinks},
};
use log::{info, warn};
use plotting::PlotRenderer;
use simplelog::{
    ColorChoice, CombinedLogger, Config, SharedLogger, TermLogger, TerminalMode, WriteLogger,
};

mod config;
use config::KoshiConfig;

#[derive(Debug, Parser)]
#[command(
    version,
    about = "Euler, Runge-Kutta 4 and Adams-Bashforth 3 solutions of y' = y^2 + x on [0, 1]",
    long_about = None
)]
struct Cli {
    /// RON configuration file, built-in defaults are used without one
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Write the default configuration to FILE and exit
    #[arg(long, value_name = "FILE")]
    write_default_config: Option<PathBuf>,
    /// Directory for the plots and CSV files
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,
    /// Initial value y(0)
    #[arg(long, allow_hyphen_values = true)]
    initial_value: Option<f64>,
    /// Step counts, comma separated
    #[arg(short, long, value_delimiter = ',')]
    steps: Option<Vec<usize>>,
    /// Solver methods, comma separated
    #[arg(short, long, value_enum, value_delimiter = ',')]
    method: Option<Vec<Method>>,
    /// Solve the step counts concurrently
    #[arg(long)]
    parallel: bool,
    /// Skip the CSV output
    #[arg(long)]
    no_csv: bool,
    /// Skip the PNG output
    #[arg(long)]
    no_plot: bool,
    /// off, error, warn, info, debug or trace
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Method {
    Euler,
    Rk4,
    AdamsBashforth3,
}

impl From<Method> for SolverMethods {
    fn from(value: Method) -> Self {
        match value {
            Method::Euler => SolverMethods::Euler,
            Method::Rk4 => SolverMethods::RungeKutta4,
            Method::AdamsBashforth3 => SolverMethods::AdamsBashforth3,
        }
    }
}

impl Cli {
    /// Command line flags take precedence over the configuration file.
    fn apply(self, config: &mut KoshiConfig) {
        if let Some(output) = self.output {
            config.output_dir = output;
        }
        if let Some(initial_value) = self.initial_value {
            config.initial_value = initial_value;
        }
        if let Some(steps) = self.steps {
            config.step_counts = steps;
        }
        if let Some(methods) = self.method {
            config.methods = methods.into_iter().map(SolverMethods::from).collect();
        }
        if let Some(log_level) = self.log_level {
            config.log_level = log_level;
        }
        config.parallel |= self.parallel;
        config.write_csv &= !self.no_csv;
        config.write_plot &= !self.no_plot;
    }
}

// the problem this binary solves
fn derivative(x: f64, y: f64) -> f64 {
    y * y + x
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Some(path) = &cli.write_default_config {
        KoshiConfig::default().save(path)?;
        println!("wrote default configuration to {}", path.display());
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => KoshiConfig::load(path)?,
        None => KoshiConfig::default(),
    };
    cli.apply(&mut config);

    init_logging(&config)?;
    run(&config)?;
    info!("finished");
    Ok(())
}

fn init_logging(config: &KoshiConfig) -> Result<(), Box<dyn Error>> {
    let level = config.level_filter()?;
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let Some(path) = &config.log_file {
        loggers.push(WriteLogger::new(level, Config::default(), File::create(path)?));
    }
    if CombinedLogger::init(loggers).is_err() {
        eprintln!("a logger was already installed, keeping it");
    }
    Ok(())
}

fn run(config: &KoshiConfig) -> Result<(), Box<dyn Error>> {
    let driver = SolveDriver::new(config.initial_value)
        .with_step_counts(config.step_counts.clone())
        .with_palette(config.palette.clone())
        .with_parallel(config.parallel);

    if config.methods.is_empty() {
        warn!("no solver methods configured, nothing to do");
    }

    for &method in &config.methods {
        let mut sinks = Sinks::new();
        if config.write_plot {
            sinks.push(Box::new(PlotRenderer::new(
                config.output_dir.clone(),
                config.plot.clone(),
            )));
        }
        if config.write_csv {
            sinks.push(Box::new(CsvWriter::new(config.output_dir.clone())));
        }
        if sinks.is_empty() {
            warn!("plot and CSV output are disabled, {method} results are discarded");
        }

        driver.run_into(&method, &derivative, &mut sinks)?;
    }
    Ok(())
}
