use crate::error::{ConfigError, Result};
use crate::image::checked_cells;
use crate::raster::{validate_iterations, FillJob};
use crate::strategies::{FillStrategy, StrategyInfo};
use crate::viewport::Viewport;

pub const DEFAULT_WIDTH: usize = 1536;
pub const DEFAULT_HEIGHT: usize = 1024;
pub const DEFAULT_MAX_ITERS: u32 = 20;

/// Flag that asks the driver to open a window on the image of the last run.
pub const SHOW_FLAG: &str = "--show";

#[derive(Clone, Debug, PartialEq)]
/// One run of the driver: what to render and with which strategies.
pub struct RunConfig {
    pub viewport: Viewport,
    pub width: usize,
    pub height: usize,
    pub max_iters: u32,
    /// Strategy names, in the order they are run
    pub strategies: Vec<String>,
    pub show: bool,
}

impl Default for RunConfig {
    fn default() -> RunConfig {
        RunConfig {
            viewport: Viewport::default(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            max_iters: DEFAULT_MAX_ITERS,
            strategies: StrategyInfo::new()
                .names()
                .into_iter()
                .map(String::from)
                .collect(),
            show: false,
        }
    }
}

impl RunConfig {
    /// Build a config from command line arguments (without the program name).
    ///
    /// Positional arguments select strategies; no arguments means all of them.
    pub fn from_args<I, S>(args: I) -> Result<RunConfig>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let info = StrategyInfo::new();
        let mut config = RunConfig::default();
        let mut selected: Vec<String> = Vec::new();
        for arg in args {
            let arg = arg.as_ref();
            if arg == SHOW_FLAG {
                config.show = true;
                continue;
            }
            info.by_name(arg)?;
            if selected.iter().any(|s| s == arg) {
                log::warn!("strategy '{}' given more than once, running it once", arg);
            } else {
                selected.push(arg.to_string());
            }
        }
        if !selected.is_empty() {
            config.strategies = selected;
        }
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyImage {
                width: self.width,
                height: self.height,
            });
        }
        checked_cells(self.width, self.height)?;
        validate_iterations(self.max_iters)?;
        self.viewport.validate()
    }

    pub fn job(&self) -> FillJob {
        FillJob::new(self.viewport, self.max_iters)
    }

    /// The selected strategies, resolved against the registry.
    pub fn resolve_strategies(&self) -> Result<Vec<Box<dyn FillStrategy>>> {
        let info = StrategyInfo::new();
        self.strategies.iter().map(|name| info.by_name(name)).collect()
    }
}
