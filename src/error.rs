/// Everything that can be wrong with a render request.
///
/// All of these are detected before a single pixel is computed. Once a
/// request passes validation, filling the buffer cannot fail.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("image must have at least one pixel, got {width}x{height}")]
    EmptyImage { width: usize, height: usize },
    #[error("iteration budget must be at least 1")]
    NoIterations,
    #[error("iteration budget {0} does not fit in an 8-bit pixel (max 255)")]
    IterationsOutOfRange(u32),
    #[error("degenerate viewport on the {axis} axis: max {max} is not greater than min {min}")]
    DegenerateViewport {
        axis: &'static str,
        min: f64,
        max: f64,
    },
    #[error("viewport bound {name} is not finite ({value})")]
    NonFiniteBound { name: &'static str, value: f64 },
    #[error("image of {width}x{height} pixels is too large")]
    ImageTooLarge { width: usize, height: usize },
    #[error("unknown strategy '{0}'")]
    UnknownStrategy(String),
    #[error("a parallel strategy needs at least one worker")]
    ZeroWorkers,
}

pub type Result<T> = std::result::Result<T, ConfigError>;
