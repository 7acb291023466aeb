use crate::error::Result;
use crate::image::ImageBuffer;
use crate::raster::{rasterize_with, FillJob};
use crate::strategies::FillStrategy;
use std::time::{Duration, Instant};

/// A filled buffer together with how long the fill took.
pub struct Timed {
    pub strategy: &'static str,
    pub buffer: ImageBuffer,
    pub elapsed: Duration,
}

impl Timed {
    pub fn report_line(&self) -> String {
        format!(
            "Mandelbrot created in {:.6} s ({})",
            self.elapsed.as_secs_f64(),
            self.strategy
        )
    }
}

/// Allocate a fresh `height` x `width` buffer and time filling it with `strategy`.
/// Only the fill is timed, not the allocation.
pub fn timed_fill(
    strategy: &dyn FillStrategy,
    job: &FillJob,
    height: usize,
    width: usize,
) -> Result<Timed> {
    let mut buffer = ImageBuffer::new(height, width)?;
    let start = Instant::now();
    rasterize_with(strategy, job, &mut buffer)?;
    let elapsed = start.elapsed();
    let timed = Timed {
        strategy: strategy.name(),
        buffer,
        elapsed,
    };
    log::info!("{}", timed.report_line());
    Ok(timed)
}
