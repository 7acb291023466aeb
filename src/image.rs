use crate::error::{ConfigError, Result};

/// Neither side may exceed this, so sizes always fit drawing APIs that take `i32`.
pub const MAX_DIMENSION: usize = i32::MAX as usize;

/// The number of cells of a `width` x `height` image, if it can be allocated.
pub fn checked_cells(width: usize, height: usize) -> Result<usize> {
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(ConfigError::ImageTooLarge { width, height });
    }
    width
        .checked_mul(height)
        .ok_or(ConfigError::ImageTooLarge { width, height })
}

/// A height x width grid of iteration counts, stored row-major.
///
/// The rasterizer is the only writer. After a fill the buffer is handed to
/// whoever displays or inspects it and is not modified again.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageBuffer {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl ImageBuffer {
    pub fn new(height: usize, width: usize) -> Result<ImageBuffer> {
        let cells = checked_cells(width, height)?;
        Ok(ImageBuffer {
            data: vec![0; cells],
            width,
            height,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The value at row `y`, column `x`.
    pub fn get(&self, y: usize, x: usize) -> u8 {
        assert!(y < self.height && x < self.width);
        self.data[y * self.width + x]
    }

    pub fn set(&mut self, y: usize, x: usize, value: u8) {
        assert!(y < self.height && x < self.width);
        self.data[y * self.width + x] = value;
    }

    pub fn row(&self, y: usize) -> &[u8] {
        &self.data[y * self.width..(y + 1) * self.width]
    }

    pub fn rows(&self) -> std::slice::Chunks<'_, u8> {
        self.data.chunks(self.width.max(1))
    }

    /// Disjoint mutable rows, in order. Parallel fills hand these out to workers.
    pub fn rows_mut(&mut self) -> std::slice::ChunksMut<'_, u8> {
        self.data.chunks_mut(self.width.max(1))
    }

    /// Disjoint mutable bands of `rows` whole rows each. The last band may be shorter.
    pub fn bands_mut(&mut self, rows: usize) -> std::slice::ChunksMut<'_, u8> {
        self.data.chunks_mut((rows * self.width).max(1))
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }
}
