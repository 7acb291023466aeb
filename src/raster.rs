use crate::error::{ConfigError, Result};
use crate::escape::mandel_value;
use crate::image::ImageBuffer;
use crate::strategies::{FillStrategy, Sequential};
use crate::viewport::{PixelToPlane, Viewport};

/// The largest budget whose counts still fit in one byte per pixel.
pub const MAX_ITERATIONS: u32 = u8::MAX as u32;

#[derive(Clone, Copy, Debug, PartialEq)]
/// What to compute: the region of the plane and the iteration budget.
/// The size of the image is taken from the buffer being filled.
pub struct FillJob {
    pub viewport: Viewport,
    pub max_iters: u32,
}

impl FillJob {
    pub fn new(viewport: Viewport, max_iters: u32) -> FillJob {
        FillJob {
            viewport,
            max_iters,
        }
    }

    /// Check the job against a buffer of `width` x `height` pixels.
    pub fn validate(&self, width: usize, height: usize) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(ConfigError::EmptyImage { width, height });
        }
        validate_iterations(self.max_iters)?;
        self.viewport.validate()
    }

    /// Validate the job against `buffer` and bind the two together for a fill.
    pub fn bind<'a>(&self, buffer: &'a mut ImageBuffer) -> Result<FillTarget<'a>> {
        let (width, height) = (buffer.width(), buffer.height());
        self.validate(width, height)?;
        Ok(FillTarget {
            buffer,
            converter: PixelToPlane::new(&self.viewport, width, height),
            max_iters: self.max_iters,
        })
    }
}

/// A non-empty buffer together with a job that has been checked against it.
///
/// Only [`FillJob::bind`] creates these, so a [`FillStrategy`] never sees an
/// empty image, a degenerate viewport or a budget that does not fit a byte.
pub struct FillTarget<'a> {
    buffer: &'a mut ImageBuffer,
    converter: PixelToPlane,
    max_iters: u32,
}

impl<'a> FillTarget<'a> {
    pub fn width(&self) -> usize {
        self.buffer.width()
    }
    pub fn height(&self) -> usize {
        self.buffer.height()
    }
    pub fn max_iters(&self) -> u32 {
        self.max_iters
    }
    pub fn into_parts(self) -> (&'a mut ImageBuffer, PixelToPlane, u32) {
        (self.buffer, self.converter, self.max_iters)
    }
}

pub fn validate_iterations(max_iters: u32) -> Result<()> {
    if max_iters == 0 {
        Err(ConfigError::NoIterations)
    } else if max_iters > MAX_ITERATIONS {
        Err(ConfigError::IterationsOutOfRange(max_iters))
    } else {
        Ok(())
    }
}

/// Compute one row of pixels. `y` is the row index in the full image.
pub(crate) fn fill_row(row: &mut [u8], y: usize, converter: &PixelToPlane, max: u32) {
    let imag = converter.cvt_y(y);
    for (x, cell) in row.iter_mut().enumerate() {
        *cell = mandel_value(converter.cvt_x(x), imag, max) as u8;
    }
}

/// Fill `buffer` with escape times for `viewport`, on the calling thread.
pub fn rasterize(viewport: &Viewport, buffer: &mut ImageBuffer, max_iters: u32) -> Result<()> {
    rasterize_with(&Sequential, &FillJob::new(*viewport, max_iters), buffer)
}

/// Validate the job, then let `strategy` fill the whole buffer.
pub fn rasterize_with(
    strategy: &dyn FillStrategy,
    job: &FillJob,
    buffer: &mut ImageBuffer,
) -> Result<()> {
    let target = job.bind(buffer)?;
    log::debug!(
        "filling {}x{} with {} (max_iters {})",
        target.width(),
        target.height(),
        strategy.name(),
        target.max_iters()
    );
    strategy.fill(target);
    Ok(())
}
