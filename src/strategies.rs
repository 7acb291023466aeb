use crate::error::{ConfigError, Result};
use crate::escape::mandel_value;
use crate::raster::{fill_row, FillTarget};
use dyn_clone::DynClone;
use rayon::prelude::*;
use scoped_threadpool::Pool;

/// A way of scheduling the per-pixel kernel over an image buffer.
///
/// Every implementation must produce exactly the same buffer for the same
/// job. The target has already been validated, see [`crate::raster::FillJob::bind`].
pub trait FillStrategy: DynClone + Sync + Send {
    fn name(&self) -> &'static str;
    fn fill(&self, target: FillTarget<'_>);
}

dyn_clone::clone_trait_object!(FillStrategy);

/// One thread, columns outer and rows inner.
#[derive(Clone, Debug, Default)]
pub struct Sequential;

impl FillStrategy for Sequential {
    fn name(&self) -> &'static str {
        "sequential"
    }

    fn fill(&self, target: FillTarget<'_>) {
        let (buffer, converter, max) = target.into_parts();
        let w = buffer.width();
        let h = buffer.height();
        for x in 0..w {
            let real = converter.cvt_x(x);
            for y in 0..h {
                let imag = converter.cvt_y(y);
                buffer.set(y, x, mandel_value(real, imag, max) as u8);
            }
        }
    }
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

fn check_workers(workers: usize) -> Result<usize> {
    if workers == 0 {
        Err(ConfigError::ZeroWorkers)
    } else {
        Ok(workers)
    }
}

/// Upper bound on pool threads, whatever was requested.
pub const MAX_WORKERS: usize = 256;

/// Never more workers than rows or than [`MAX_WORKERS`].
fn effective_workers(requested: usize, rows: usize) -> usize {
    requested.min(rows).min(MAX_WORKERS).max(1)
}

/// Contiguous bands of whole rows, one band per pool thread.
#[derive(Clone, Debug)]
pub struct RowBands {
    workers: usize,
}

impl Default for RowBands {
    fn default() -> RowBands {
        RowBands {
            workers: default_workers(),
        }
    }
}

impl RowBands {
    pub fn with_workers(workers: usize) -> Result<RowBands> {
        Ok(RowBands {
            workers: check_workers(workers)?,
        })
    }
}

impl FillStrategy for RowBands {
    fn name(&self) -> &'static str {
        "row-bands"
    }

    fn fill(&self, target: FillTarget<'_>) {
        let (buffer, converter, max) = target.into_parts();
        let w = buffer.width();
        let n = effective_workers(self.workers, buffer.height());
        let band_rows = buffer.height().div_ceil(n);
        log::debug!("row-bands: {} workers, {} rows per band", n, band_rows);
        let converter = &converter;
        let mut pool = Pool::new(n as u32);
        pool.scoped(|scope| {
            for (band_idx, band) in buffer.bands_mut(band_rows).enumerate() {
                let y0 = band_idx * band_rows;
                scope.execute(move || {
                    for (dy, row) in band.chunks_mut(w).enumerate() {
                        fill_row(row, y0 + dy, converter, max);
                    }
                });
            }
        });
    }
}

/// Worker k of n computes every row y with y % n == k, like a grid-stride
/// loop on a GPU.
#[derive(Clone, Debug)]
pub struct Strided {
    workers: usize,
}

impl Default for Strided {
    fn default() -> Strided {
        Strided {
            workers: default_workers(),
        }
    }
}

impl Strided {
    pub fn with_workers(workers: usize) -> Result<Strided> {
        Ok(Strided {
            workers: check_workers(workers)?,
        })
    }
}

impl FillStrategy for Strided {
    fn name(&self) -> &'static str {
        "strided"
    }

    fn fill(&self, target: FillTarget<'_>) {
        let (buffer, converter, max) = target.into_parts();
        let n = effective_workers(self.workers, buffer.height());
        log::debug!("strided: {} workers, stride {}", n, n);
        let converter = &converter;
        let mut lanes: Vec<Vec<(usize, &mut [u8])>> = (0..n).map(|_| Vec::new()).collect();
        for (y, row) in buffer.rows_mut().enumerate() {
            lanes[y % n].push((y, row));
        }
        let mut pool = Pool::new(n as u32);
        pool.scoped(|scope| {
            for lane in lanes {
                scope.execute(move || {
                    for (y, row) in lane {
                        fill_row(row, y, converter, max);
                    }
                });
            }
        });
    }
}

/// Rows on the rayon global pool.
#[derive(Clone, Debug, Default)]
pub struct Rayon;

impl FillStrategy for Rayon {
    fn name(&self) -> &'static str {
        "rayon"
    }

    fn fill(&self, target: FillTarget<'_>) {
        let (buffer, converter, max) = target.into_parts();
        let w = buffer.width();
        buffer
            .as_mut_slice()
            .par_chunks_mut(w)
            .enumerate()
            .for_each(|(y, row)| fill_row(row, y, &converter, max));
    }
}

fn all_strategies() -> Vec<Box<dyn FillStrategy>> {
    vec![
        Box::new(Sequential),
        Box::new(RowBands::default()),
        Box::new(Strided::default()),
        Box::new(Rayon),
    ]
}

pub struct StrategyInfo {
    producers: Vec<Box<dyn FillStrategy>>,
}

impl Default for StrategyInfo {
    fn default() -> StrategyInfo {
        StrategyInfo::new()
    }
}

impl StrategyInfo {
    pub fn new() -> StrategyInfo {
        StrategyInfo {
            producers: all_strategies(),
        }
    }
    pub fn names(&self) -> Vec<&'static str> {
        self.producers.iter().map(|p| p.name()).collect()
    }
    pub fn len(&self) -> usize {
        self.producers.len()
    }
    pub fn is_empty(&self) -> bool {
        self.producers.is_empty()
    }
    pub fn producer(&self, i: usize) -> Box<dyn FillStrategy> {
        assert!(i < self.len());
        self.producers[i].clone()
    }
    pub fn by_name(&self, name: &str) -> Result<Box<dyn FillStrategy>> {
        self.producers
            .iter()
            .find(|p| p.name() == name)
            .cloned()
            .ok_or_else(|| ConfigError::UnknownStrategy(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageBuffer;
    use crate::raster::{rasterize_with, FillJob};
    use crate::viewport::Viewport;

    fn render(strategy: &dyn FillStrategy, height: usize, width: usize) -> ImageBuffer {
        let mut buf = ImageBuffer::new(height, width).unwrap();
        let job = FillJob::new(Viewport::default(), 40);
        rasterize_with(strategy, &job, &mut buf).unwrap();
        buf
    }

    #[test]
    fn parallel_strategies_match_sequential() {
        let expected = render(&Sequential, 37, 53);
        let candidates: Vec<Box<dyn FillStrategy>> = vec![
            Box::new(RowBands::with_workers(1).unwrap()),
            Box::new(RowBands::with_workers(4).unwrap()),
            Box::new(RowBands::with_workers(64).unwrap()),
            Box::new(Strided::with_workers(3).unwrap()),
            Box::new(Strided::with_workers(100).unwrap()),
            Box::new(Rayon),
        ];
        for s in candidates {
            assert_eq!(render(s.as_ref(), 37, 53), expected, "{}", s.name());
        }
    }

    #[test]
    fn bands_that_do_not_divide_the_height() {
        // 10 rows over 4 workers: bands of 3, 3, 3, 1
        let expected = render(&Sequential, 10, 7);
        let bands = RowBands::with_workers(4).unwrap();
        assert_eq!(render(&bands, 10, 7), expected);
    }

    #[test]
    fn zero_workers_is_a_config_error() {
        assert_eq!(RowBands::with_workers(0).unwrap_err(), ConfigError::ZeroWorkers);
        assert_eq!(Strided::with_workers(0).unwrap_err(), ConfigError::ZeroWorkers);
    }

    #[test]
    fn more_workers_than_rows_are_capped() {
        assert_eq!(effective_workers(8, 3), 3);
        assert_eq!(effective_workers(2, 3), 2);
        assert_eq!(effective_workers(8, 0), 1);
        assert_eq!(effective_workers(usize::MAX, 10_000), MAX_WORKERS);
    }

    #[test]
    fn huge_worker_requests_still_fill_correctly() {
        let expected = render(&Sequential, 300, 4);
        let bands = RowBands::with_workers(usize::MAX).unwrap();
        let strided = Strided::with_workers(usize::MAX).unwrap();
        assert_eq!(render(&bands, 300, 4), expected);
        assert_eq!(render(&strided, 300, 4), expected);
    }

    #[test]
    fn strategies_only_run_on_bound_targets() {
        let v = Viewport::new(0.0, 1.0, 0.0, 1.0);
        let mut origin = ImageBuffer::new(1, 1).unwrap();
        assert!(FillJob::new(v, 300).bind(&mut origin).is_err());
        Sequential.fill(FillJob::new(v, 255).bind(&mut origin).unwrap());
        assert_eq!(origin.get(0, 0), 255);

        let mut no_columns = ImageBuffer::new(3, 0).unwrap();
        assert!(FillJob::new(v, 20).bind(&mut no_columns).is_err());
        let mut one_column = ImageBuffer::new(3, 1).unwrap();
        Rayon.fill(FillJob::new(v, 20).bind(&mut one_column).unwrap());
        assert_eq!(one_column.get(0, 0), 20);
    }

    #[test]
    fn registry_lists_and_finds_strategies() {
        let info = StrategyInfo::new();
        assert_eq!(info.names(), vec!["sequential", "row-bands", "strided", "rayon"]);
        assert_eq!(info.len(), 4);
        assert_eq!(info.producer(2).name(), "strided");
        assert_eq!(info.by_name("rayon").unwrap().name(), "rayon");
        assert_eq!(
            info.by_name("cuda").err(),
            Some(ConfigError::UnknownStrategy("cuda".to_string()))
        );
    }
}
