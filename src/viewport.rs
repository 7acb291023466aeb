use crate::error::{ConfigError, Result};

#[derive(Clone, Copy, Debug, PartialEq)]
/// The rectangle of the complex plane that is mapped onto an image
pub struct Viewport {
    /// Real part at the left edge (column 0)
    pub min_x: f64,
    /// Real part one pixel beyond the right edge
    pub max_x: f64,
    /// Imaginary part at row 0
    pub min_y: f64,
    /// Imaginary part one pixel beyond the last row
    pub max_y: f64,
}

impl Default for Viewport {
    fn default() -> Viewport {
        Viewport::new(-2.0, 1.0, -1.0, 1.0)
    }
}

impl Viewport {
    pub fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Viewport {
        Viewport {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("min_x", self.min_x),
            ("max_x", self.max_x),
            ("min_y", self.min_y),
            ("max_y", self.max_y),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFiniteBound { name, value });
            }
        }
        if self.max_x <= self.min_x {
            return Err(ConfigError::DegenerateViewport {
                axis: "real",
                min: self.min_x,
                max: self.max_x,
            });
        }
        if self.max_y <= self.min_y {
            return Err(ConfigError::DegenerateViewport {
                axis: "imaginary",
                min: self.min_y,
                max: self.max_y,
            });
        }
        Ok(())
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/*
The transformation from pixel coordinates (x_p, y_p) to plane coordinates (re, im) is
re(x_p) = min_x + x_p * sx
im(y_p) = min_y + y_p * sy
with sx = (max_x - min_x) / width and sy = (max_y - min_y) / height.

Row 0 holds min_y. There is no flip of the vertical axis, so the image comes out
upside down compared to the mathematical convention. That is the expected output.
 */
pub struct PixelToPlane {
    min_x: f64,
    min_y: f64,
    sx: f64,
    sy: f64,
}

impl PixelToPlane {
    pub fn new(viewport: &Viewport, width: usize, height: usize) -> PixelToPlane {
        PixelToPlane {
            min_x: viewport.min_x,
            min_y: viewport.min_y,
            sx: viewport.width() / width as f64,
            sy: viewport.height() / height as f64,
        }
    }
    pub fn cvt_x(&self, px: usize) -> f64 {
        self.min_x + px as f64 * self.sx
    }
    pub fn cvt_y(&self, py: usize) -> f64 {
        self.min_y + py as f64 * self.sy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_the_classic_view() {
        let v = Viewport::default();
        assert_eq!((v.min_x, v.max_x, v.min_y, v.max_y), (-2.0, 1.0, -1.0, 1.0));
        assert!(v.validate().is_ok());
    }

    #[test]
    fn degenerate_axes_are_rejected() {
        let flat_x = Viewport::new(1.0, 1.0, -1.0, 1.0);
        assert!(matches!(
            flat_x.validate(),
            Err(ConfigError::DegenerateViewport { axis: "real", .. })
        ));
        let inverted_y = Viewport::new(-2.0, 1.0, 1.0, -1.0);
        assert!(matches!(
            inverted_y.validate(),
            Err(ConfigError::DegenerateViewport {
                axis: "imaginary",
                ..
            })
        ));
    }

    #[test]
    fn non_finite_bounds_are_rejected() {
        let v = Viewport::new(f64::NEG_INFINITY, 1.0, -1.0, 1.0);
        assert!(matches!(
            v.validate(),
            Err(ConfigError::NonFiniteBound { name: "min_x", .. })
        ));
        let v = Viewport::new(-2.0, 1.0, -1.0, f64::NAN);
        assert!(matches!(
            v.validate(),
            Err(ConfigError::NonFiniteBound { name: "max_y", .. })
        ));
    }

    #[test]
    fn pixel_mapping_matches_corners_and_center() {
        let conv = PixelToPlane::new(&Viewport::default(), 1536, 1024);
        assert_eq!((conv.cvt_x(0), conv.cvt_y(0)), (-2.0, -1.0));
        assert_eq!(conv.cvt_x(1) - conv.cvt_x(0), 3.0 / 1536.0);
        assert_eq!(conv.cvt_y(1) - conv.cvt_y(0), 2.0 / 1024.0);
        assert!((conv.cvt_x(768) + 0.5).abs() < 1e-12);
        assert!(conv.cvt_y(512).abs() < 1e-12);
    }
}
