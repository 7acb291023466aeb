use mandel_strategies::strategies::{RowBands, Sequential, Strided};
use mandel_strategies::{
    escape_time, rasterize, rasterize_with, Complex, ConfigError, FillJob, ImageBuffer,
    RunConfig, StrategyInfo, Viewport,
};

fn default_image() -> ImageBuffer {
    let config = RunConfig::default();
    let mut image = ImageBuffer::new(config.height, config.width).unwrap();
    rasterize(&config.viewport, &mut image, config.max_iters).unwrap();
    image
}

#[test]
fn test_default_run_corner_and_center() {
    let image = default_image();
    assert_eq!((image.height(), image.width()), (1024, 1536));
    // pixel (0, 0) is c = -2 - 1i, outside the disk of radius 2
    assert_eq!(image.get(0, 0), 0);
    // pixel (512, 768) is c = -0.5 + 0i, inside the main cardioid
    assert_eq!(image.get(512, 768), 20);
    assert!(image.as_slice().iter().all(|&v| v <= 20));
}

#[test]
fn test_rasterize_is_deterministic() {
    let viewport = Viewport::new(-0.8, -0.7, 0.05, 0.15);
    let mut a = ImageBuffer::new(40, 60).unwrap();
    let mut b = ImageBuffer::new(40, 60).unwrap();
    rasterize(&viewport, &mut a, 255).unwrap();
    rasterize(&viewport, &mut b, 255).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_symmetric_viewport_mirrors_rows() {
    // Pixel sizes are powers of two, so row y and row h - y sample exact conjugates.
    let h = 64;
    let viewport = Viewport::new(-2.0, 2.0, -1.0, 1.0);
    let mut image = ImageBuffer::new(h, 128).unwrap();
    rasterize(&viewport, &mut image, 60).unwrap();
    for y in 1..h {
        assert_eq!(image.row(y), image.row(h - y), "row {}", y);
    }
}

#[test]
fn test_every_pixel_matches_the_kernel() {
    let viewport = Viewport::new(-1.5, 0.5, -1.0, 1.0);
    let (h, w) = (13, 17);
    let mut image = ImageBuffer::new(h, w).unwrap();
    rasterize(&viewport, &mut image, 50).unwrap();
    let sx = 2.0 / w as f64;
    let sy = 2.0 / h as f64;
    for y in 0..h {
        for x in 0..w {
            let c = Complex::new(-1.5 + x as f64 * sx, -1.0 + y as f64 * sy);
            assert_eq!(image.get(y, x) as u32, escape_time(c, 50));
        }
    }
}

#[test]
fn test_all_registered_strategies_agree() {
    let config = RunConfig::default();
    let job = FillJob::new(config.viewport, config.max_iters);
    let expected = default_image();
    let info = StrategyInfo::new();
    for i in 0..info.len() {
        let strategy = info.producer(i);
        let mut image = ImageBuffer::new(config.height, config.width).unwrap();
        rasterize_with(strategy.as_ref(), &job, &mut image).unwrap();
        assert!(image == expected, "{} differs", strategy.name());
    }
}

#[test]
fn test_odd_shapes_with_explicit_workers() {
    let job = FillJob::new(Viewport::new(-2.0, 0.6, -1.2, 1.2), 100);
    let mut expected = ImageBuffer::new(31, 5).unwrap();
    rasterize_with(&Sequential, &job, &mut expected).unwrap();
    for workers in [1, 2, 7, 31, 50] {
        let mut bands = ImageBuffer::new(31, 5).unwrap();
        rasterize_with(&RowBands::with_workers(workers).unwrap(), &job, &mut bands).unwrap();
        assert_eq!(bands, expected);
        let mut strided = ImageBuffer::new(31, 5).unwrap();
        rasterize_with(&Strided::with_workers(workers).unwrap(), &job, &mut strided).unwrap();
        assert_eq!(strided, expected);
    }
}

#[test]
fn test_invalid_configurations_fail_before_computing() {
    let mut image = ImageBuffer::new(4, 4).unwrap();
    let degenerate = Viewport::new(-1.0, 1.0, 0.5, 0.5);
    assert!(matches!(
        rasterize(&degenerate, &mut image, 20),
        Err(ConfigError::DegenerateViewport { .. })
    ));
    let infinite = Viewport::new(-1.0, f64::INFINITY, -1.0, 1.0);
    assert!(matches!(
        rasterize(&infinite, &mut image, 20),
        Err(ConfigError::NonFiniteBound { .. })
    ));
    assert_eq!(
        rasterize(&Viewport::default(), &mut ImageBuffer::new(4, 0).unwrap(), 20),
        Err(ConfigError::EmptyImage {
            width: 0,
            height: 4
        })
    );
    assert!(image.as_slice().iter().all(|&v| v == 0));
}
