use crate::error::{ConfigError, Result};
use crate::image::ImageBuffer;
use dyn_clone::DynClone;

/// Bytes per pixel of the packed 32-bit RGB format (0x00RRGGBB, native endian).
pub const BYTES_PER_PIXEL: usize = 4;

pub trait ColorFromCount: DynClone + Sync + Send {
    /// Get a color in 0xRRGGBB format, given the iteration count
    /// and the iteration budget
    fn get(&self, v: u32, max: u32) -> u32;
}

dyn_clone::clone_trait_object!(ColorFromCount);

/// Linear grayscale: the count itself is the intensity.
#[derive(Clone)]
struct Gray {}

impl ColorFromCount for Gray {
    fn get(&self, v: u32, max: u32) -> u32 {
        if max == 0 {
            return 0x000000;
        }
        let g = v.min(max) * 255 / max;
        (g << 16) | (g << 8) | g
    }
}

#[derive(Clone)]
struct Rgb18 {}

impl ColorFromCount for Rgb18 {
    fn get(&self, v: u32, max: u32) -> u32 {
        if max <= v {
            return 0x000000;
        }
        match v % 18 {
            0 => 0xff3f3f,
            1 => 0xff7f3f,
            2 => 0xffbf3f,
            3 => 0xffff3f,
            4 => 0xbfff3f,
            5 => 0x7fff3f,
            6 => 0x3fff3f,
            7 => 0x3fff7f,
            8 => 0x3fffbf,
            9 => 0x3fffff,
            10 => 0x3fbfff,
            11 => 0x3f7fff,
            12 => 0x3f3fff,
            13 => 0x7f3fff,
            14 => 0xbf3fff,
            15 => 0xff3fff,
            16 => 0xff3fbf,
            _ => 0xff3f7f,
        }
    }
}

#[derive(Clone)]
struct RedBlack {}

impl ColorFromCount for RedBlack {
    fn get(&self, v: u32, _max: u32) -> u32 {
        if v % 2 == 1 {
            0xff0000
        } else {
            0x0
        }
    }
}

fn all_color_from_counts() -> Vec<Box<dyn ColorFromCount>> {
    vec![Box::new(Gray {}), Box::new(Rgb18 {}), Box::new(RedBlack {})]
}

pub struct ColorInfo {
    names: [&'static str; 3],
    producers: Vec<Box<dyn ColorFromCount>>,
}

impl Default for ColorInfo {
    fn default() -> ColorInfo {
        ColorInfo::new()
    }
}

impl ColorInfo {
    pub fn new() -> ColorInfo {
        let names = ["gray", "rgb18", "red-black"];
        let producers = all_color_from_counts();
        assert_eq!(names.len(), producers.len());
        ColorInfo { names, producers }
    }
    pub fn color_names(&self) -> &[&str] {
        self.names.as_slice()
    }
    pub fn len(&self) -> usize {
        self.names.len()
    }
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
    pub fn producer(&self, i: usize) -> Box<dyn ColorFromCount> {
        assert!(i < self.len());
        self.producers[i].clone()
    }
}

/// An image in packed 32-bit RGB, ready to hand to a drawing surface.
pub struct RgbImage {
    pub data: Vec<u8>,
    pub width: usize,
    pub height: usize,
    pub stride: usize,
}

/// Convert a buffer of iteration counts to packed RGB with the given scheme.
pub fn colorize(buffer: &ImageBuffer, max: u32, scheme: &dyn ColorFromCount) -> Result<RgbImage> {
    let width = buffer.width();
    let height = buffer.height();
    let too_large = ConfigError::ImageTooLarge { width, height };
    let stride = width.checked_mul(BYTES_PER_PIXEL).ok_or(too_large.clone())?;
    let len = stride.checked_mul(height).ok_or(too_large)?;
    let mut data = vec![0; len];
    for (counts, line) in buffer.rows().zip(data.chunks_mut(stride.max(1))) {
        for (&v, px) in counts.iter().zip(line.chunks_mut(BYTES_PER_PIXEL)) {
            px.copy_from_slice(&scheme.get(v as u32, max).to_ne_bytes());
        }
    }
    Ok(RgbImage {
        data,
        width,
        height,
        stride,
    })
}
