use std::{path::PathBuf, time::Duration};

use thiserror::Error;

use crate::maze::Layout;

/// How a run is presented.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Draw every step in the terminal
    #[default]
    Animate,
    /// Run at full speed and only report the outcome
    Headless,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("step delay of {0:?} is longer than the maximum of {max:?}", max = Config::MAX_STEP_DELAY)]
    StepDelayTooLong(Duration),
    #[error("a {cols}x{rows} maze is too large to animate in a terminal")]
    TooLargeToAnimate { cols: i64, rows: i64 },
    #[error("cell size must be positive (got {0}x{1})")]
    InvalidCellSize(f64, f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Number of columns. Validated when the grid is built.
    pub cols: i64,
    /// Number of rows. Validated when the grid is built.
    pub rows: i64,
    /// Seed for maze generation. `None` draws a fresh maze each run.
    pub seed: Option<u64>,
    /// Passed through to the renderer with every cell
    pub layout: Layout,
    /// Pause after each step while animating
    pub step_delay: Duration,
    pub mode: Mode,
    /// Print the finished maze with its path in headless mode
    pub print: bool,
    /// Write logs to this file instead of stderr
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cols: 20,
            rows: 12,
            seed: None,
            layout: Layout::default(),
            step_delay: Duration::from_millis(10),
            mode: Mode::default(),
            print: false,
            log_file: None,
        }
    }
}

impl Config {
    pub const MAX_STEP_DELAY: Duration = Duration::from_secs(1);
    /// Environment variable holding the log filter directives
    pub const LOG_ENV_VAR: &'static str = "MAZECARVE_LOG";

    /// Checks the settings that do not depend on grid construction.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.step_delay > Config::MAX_STEP_DELAY {
            return Err(ConfigError::StepDelayTooLong(self.step_delay));
        }
        let (w, h) = self.layout.cell_size;
        if !(w > 0.0 && h > 0.0) {
            return Err(ConfigError::InvalidCellSize(w, h));
        }
        if self.mode == Mode::Animate {
            // The lattice has 2n + 1 characters per axis, each cell two columns wide
            let fits = |n: i64, width: i64| {
                n.checked_mul(2)
                    .and_then(|n| n.checked_add(1))
                    .and_then(|n| n.checked_mul(width))
                    .is_some_and(|n| n <= u16::MAX as i64)
            };
            if !fits(self.cols, 2) || !fits(self.rows, 1) {
                return Err(ConfigError::TooLargeToAnimate {
                    cols: self.cols,
                    rows: self.rows,
                });
            }
        }
        Ok(())
    }
}
