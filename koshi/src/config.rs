use std::fs;
use std::path::{Path, PathBuf};

use color::Palette;
use koshi_diffeq::SolverMethods;
use plotting::PlotConfig;
use ron::{
    from_str,
    ser::{PrettyConfig, to_string_pretty},
};
use serde::{Deserialize, Serialize};
use simplelog::LevelFilter;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigErrors {
    #[error("could not access {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
    #[error("{0}")]
    Serialize(#[from] ron::Error),
    #[error("unknown log level '{0}', expected off, error, warn, info, debug or trace")]
    LogLevel(String),
}

/// Everything a run needs besides the derivative itself.
///
/// Missing fields in a RON file take their default, so a file only has to list
/// what it changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct KoshiConfig {
    pub initial_value: f64,
    pub step_counts: Vec<usize>,
    pub methods: Vec<SolverMethods>,
    /// Colors assigned to the step counts in order.
    pub palette: Palette,
    pub output_dir: PathBuf,
    pub write_plot: bool,
    pub write_csv: bool,
    pub parallel: bool,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
    pub plot: PlotConfig,
}

impl Default for KoshiConfig {
    fn default() -> Self {
        Self {
            initial_value: -2.0,
            step_counts: vec![10, 20, 30],
            methods: vec![SolverMethods::Euler, SolverMethods::AdamsBashforth3],
            palette: Palette::default(),
            output_dir: PathBuf::from("output"),
            write_plot: true,
            write_csv: true,
            parallel: false,
            log_level: "info".to_string(),
            log_file: None,
            plot: PlotConfig::default(),
        }
    }
}

impl KoshiConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigErrors> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigErrors::Io {
            path: path.to_path_buf(),
            source,
        })?;
        from_str(&contents).map_err(|source| ConfigErrors::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigErrors> {
        let ron_string = to_string_pretty(self, PrettyConfig::new())?;
        fs::write(path, ron_string).map_err(|source| ConfigErrors::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn level_filter(&self) -> Result<LevelFilter, ConfigErrors> {
        self.log_level
            .parse()
            .map_err(|_| ConfigErrors::LogLevel(self.log_level.clone()))
    }
}
