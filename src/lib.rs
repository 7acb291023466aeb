//! Escape-time Mandelbrot rendering with interchangeable execution strategies.
//!
//! One kernel ([`escape::escape_time`]) and one rasterizer
//! ([`raster::rasterize_with`]) are shared by every strategy in
//! [`strategies`]; the strategies only differ in how pixels are scheduled.

pub mod colorings;
pub mod complex;
pub mod config;
pub mod error;
pub mod escape;
#[cfg(feature = "gui")]
pub mod gui;
pub mod image;
pub mod producer;
pub mod raster;
pub mod strategies;
pub mod timing;
pub mod viewport;

pub use complex::Complex;
pub use config::RunConfig;
pub use error::{ConfigError, Result};
pub use escape::escape_time;
pub use image::ImageBuffer;
pub use raster::{rasterize, rasterize_with, FillJob};
pub use strategies::{FillStrategy, StrategyInfo};
pub use viewport::Viewport;
