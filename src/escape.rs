use crate::complex::Complex;

/// Squared radius of the escape disk. Once |z| reaches 2 the orbit diverges.
pub const ESCAPE_NORM_SQR: f64 = 4.0;

/// Return the number of iterations before the orbit of `c` under z -> z^2 + c
/// leaves the disk of radius 2, or `max_iter` when it stays inside.
///
/// Points that reach `max_iter` are treated as members of the set. This is
/// only a heuristic, not a proof of boundedness.
pub fn escape_time(c: Complex, max_iter: u32) -> u32 {
    let mut z = Complex::ZERO;
    for iter in 0..max_iter {
        z = z * z + c;
        // The stop criterion
        if z.norm_sqr() >= ESCAPE_NORM_SQR {
            return iter;
        }
    }
    max_iter
}

/// Convenience form taking the real and imaginary parts separately.
pub fn mandel_value(x: f64, y: f64, max_iter: u32) -> u32 {
    escape_time(Complex::new(x, y), max_iter)
}
