//! Benchmark driver: configuration sweeps, timing and derived metrics.
//!
//! A sweep is a straight-line pass over an ordered list of kernel
//! configurations. Per configuration the driver resets the output matrix,
//! times exactly one kernel invocation through the [`Clock`] capability and
//! derives bandwidth and speedup. Records are streamed to an observer as they
//! are produced, in evaluation order.
//!
//! The speedup baseline is fixed: it is the first configuration evaluated,
//! which for the blocked sweep is always the standard (unblocked) run. The
//! baseline's own speedup is exactly 1.0.

use std::fmt;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::clock::Clock;
use crate::error::{dimension_mismatch, validation_error, Result};
use crate::kernels::{multiply_blocked, multiply_naive, multiply_standard};
use crate::matrix::Matrix;
use crate::report::{create_report_file, Report};
use crate::{DEFAULT_BLOCK_SIZES, DEFAULT_DIM, DEFAULT_SEED, MEM_OPS_PER_MADD};

/// Elapsed times at or below this are reported as measured but logged as
/// imprecise, since they sit too close to the timer's useful resolution.
const IMPRECISE_ELAPSED: Duration = Duration::from_millis(1);

/// Kernel selected for one timed configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelSpec {
    /// The i→j→k ordering, kept for the loop-ordering comparison.
    Naive,
    /// The unblocked i→k→j reference.
    Standard,
    /// The tiled kernel with the given block size.
    Blocked(usize),
}

impl fmt::Display for KernelSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelSpec::Naive => write!(f, "i-j-k (naive)"),
            KernelSpec::Standard => write!(f, "standard"),
            KernelSpec::Blocked(block_size) => write!(f, "{}", block_size),
        }
    }
}

/// One record of the measurement sequence.
#[derive(Debug, Clone)]
pub struct Measurement {
    pub kernel: KernelSpec,
    pub elapsed: Duration,
    pub bandwidth_mbps: f64,
    pub speedup: f64,
}

impl Measurement {
    /// Elapsed time in milliseconds.
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }

    /// Formats the record as a report row.
    pub fn format_row(&self) -> String {
        format!(
            "{:>8}, {:>10.2}, {:>12.2}, {:>6.2}x",
            self.kernel.to_string(),
            self.elapsed_ms(),
            self.bandwidth_mbps,
            self.speedup
        )
    }
}

/// Estimated bandwidth in MB/s (1 MB = 1024 * 1024 bytes) for one `m x k`
/// by `k x n` multiplication.
///
/// The traffic model assumes [`MEM_OPS_PER_MADD`] memory operations of
/// `f64` width per multiply-add. A zero elapsed time yields an infinite
/// estimate; readings that small are below the timer's resolution anyway.
pub fn bandwidth_mbps(m: usize, n: usize, k: usize, elapsed: Duration) -> f64 {
    let madds = m as f64 * n as f64 * k as f64;
    let bytes = madds * MEM_OPS_PER_MADD as f64 * std::mem::size_of::<f64>() as f64;
    (bytes / (1024.0 * 1024.0)) / elapsed.as_secs_f64()
}

/// Configuration for the blocked multiplication sweep.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Square matrix dimension.
    pub dim: usize,
    /// Candidate block sizes, evaluated in order after the standard run.
    pub block_sizes: Vec<usize>,
    /// Seed for the input matrices.
    pub seed: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        SweepConfig {
            dim: DEFAULT_DIM,
            block_sizes: DEFAULT_BLOCK_SIZES.to_vec(),
            seed: DEFAULT_SEED,
        }
    }
}

impl SweepConfig {
    /// Checks the configuration before any buffer is allocated.
    pub fn validate(&self) -> Result<()> {
        if self.dim == 0 {
            return Err(validation_error("matrix dimension must be positive"));
        }
        for &block_size in &self.block_sizes {
            if block_size == 0 {
                return Err(validation_error("block size must be positive"));
            }
            if block_size > self.dim {
                return Err(validation_error(format!(
                    "block size {} exceeds matrix dimension {}",
                    block_size, self.dim
                )));
            }
        }
        Ok(())
    }

    /// The ordered configuration list: the standard baseline first, then the
    /// candidate block sizes.
    fn specs(&self) -> Vec<KernelSpec> {
        let mut specs = Vec::with_capacity(self.block_sizes.len() + 1);
        specs.push(KernelSpec::Standard);
        specs.extend(self.block_sizes.iter().map(|&bs| KernelSpec::Blocked(bs)));
        specs
    }
}

/// Configuration for the loop-ordering comparison.
///
/// The four operand dimensions are independent so an incompatible pair can
/// actually be expressed; the shape check runs during validation, before any
/// computation and before the report artifact exists.
#[derive(Debug, Clone)]
pub struct OrderingConfig {
    pub a_rows: usize,
    pub a_cols: usize,
    pub b_rows: usize,
    pub b_cols: usize,
    pub seed: u64,
}

impl OrderingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.a_rows == 0 || self.a_cols == 0 || self.b_rows == 0 || self.b_cols == 0 {
            return Err(validation_error("matrix dimensions must be positive"));
        }
        if self.a_cols != self.b_rows {
            return Err(dimension_mismatch(
                (self.a_rows, self.a_cols),
                (self.b_rows, self.b_cols),
            ));
        }
        Ok(())
    }
}

/// Runs the blocked sweep without any report sink, streaming each record to
/// `observer` as it is produced.
pub fn run_sweep<C: Clock>(
    config: &SweepConfig,
    clock: &C,
    observer: impl FnMut(&Measurement) -> Result<()>,
) -> Result<Vec<Measurement>> {
    config.validate()?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let a = Matrix::random(config.dim, config.dim, &mut rng)?;
    let b = Matrix::random(config.dim, config.dim, &mut rng)?;
    let mut c = Matrix::zeroed(config.dim, config.dim)?;

    info!(
        "blocked sweep: dim={} seed={} configurations={}",
        config.dim,
        config.seed,
        config.block_sizes.len() + 1
    );

    run_configurations(&config.specs(), &a, &b, &mut c, clock, observer)
}

/// Runs the loop-ordering comparison without any report sink.
pub fn run_orderings<C: Clock>(
    config: &OrderingConfig,
    clock: &C,
    observer: impl FnMut(&Measurement) -> Result<()>,
) -> Result<Vec<Measurement>> {
    config.validate()?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let a = Matrix::random(config.a_rows, config.a_cols, &mut rng)?;
    let b = Matrix::random(config.b_rows, config.b_cols, &mut rng)?;
    let mut c = Matrix::zeroed(config.a_rows, config.b_cols)?;

    info!(
        "loop-ordering comparison: {}x{} * {}x{} seed={}",
        config.a_rows, config.a_cols, config.b_rows, config.b_cols, config.seed
    );

    run_configurations(
        &[KernelSpec::Naive, KernelSpec::Standard],
        &a,
        &b,
        &mut c,
        clock,
        observer,
    )
}

/// Times each configuration in order against shared operands.
///
/// The output matrix is reset before every run so each kernel accumulates
/// into zeros. The first configuration becomes the speedup baseline.
fn run_configurations<C: Clock>(
    specs: &[KernelSpec],
    a: &Matrix,
    b: &Matrix,
    c: &mut Matrix,
    clock: &C,
    mut observer: impl FnMut(&Measurement) -> Result<()>,
) -> Result<Vec<Measurement>> {
    let (m, n, k) = (a.rows(), b.cols(), a.cols());
    let mut measurements: Vec<Measurement> = Vec::with_capacity(specs.len());
    let mut baseline = Duration::ZERO;

    for &spec in specs {
        c.reset();

        let start = clock.now();
        match spec {
            KernelSpec::Naive => multiply_naive(a, b, c)?,
            KernelSpec::Standard => multiply_standard(a, b, c)?,
            KernelSpec::Blocked(block_size) => multiply_blocked(a, b, c, block_size)?,
        }
        let elapsed = clock.now().saturating_sub(start);

        if elapsed <= IMPRECISE_ELAPSED {
            warn!(
                "configuration {} finished in {:?}, near the timer resolution; treat the reading as imprecise",
                spec, elapsed
            );
        }

        let speedup = if measurements.is_empty() {
            baseline = elapsed;
            1.0
        } else {
            baseline.as_secs_f64() / elapsed.as_secs_f64()
        };

        let measurement = Measurement {
            kernel: spec,
            elapsed,
            bandwidth_mbps: bandwidth_mbps(m, n, k, elapsed),
            speedup,
        };
        debug!("measured: {}", measurement.format_row());
        observer(&measurement)?;
        measurements.push(measurement);
    }

    Ok(measurements)
}

/// Full blocked-sweep command: validates, allocates, opens the artifact and
/// emits every record to the console and the artifact as it is produced.
pub fn run_matmul_command<C: Clock>(
    config: &SweepConfig,
    output: &Path,
    clock: &C,
    console: &mut dyn Write,
) -> Result<Vec<Measurement>> {
    config.validate()?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let a = Matrix::random(config.dim, config.dim, &mut rng)?;
    let b = Matrix::random(config.dim, config.dim, &mut rng)?;
    let mut c = Matrix::zeroed(config.dim, config.dim)?;

    let mut file = create_report_file(output)?;
    let mut report = Report::new();
    report.add_sink("console", console);
    report.add_sink(output.display().to_string(), &mut file);

    report.preamble(
        "Blocked Matrix Multiplication Performance Analysis",
        &format!("Matrix size: {} x {}", config.dim, config.dim),
    )?;
    report.columns("Block Size, Time (msec), Bandwidth (MB/s), Speedup vs Standard")?;

    info!(
        "blocked sweep: dim={} seed={} configurations={}",
        config.dim,
        config.seed,
        config.block_sizes.len() + 1
    );

    run_configurations(&config.specs(), &a, &b, &mut c, clock, |measurement| {
        report.row(&measurement.format_row())
    })
}

/// Full loop-ordering command. The operand shape check runs before the
/// artifact is created, so a mismatch leaves no report file behind.
pub fn run_orderings_command<C: Clock>(
    config: &OrderingConfig,
    output: &Path,
    clock: &C,
    console: &mut dyn Write,
) -> Result<Vec<Measurement>> {
    config.validate()?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let a = Matrix::random(config.a_rows, config.a_cols, &mut rng)?;
    let b = Matrix::random(config.b_rows, config.b_cols, &mut rng)?;
    let mut c = Matrix::zeroed(config.a_rows, config.b_cols)?;

    let mut file = create_report_file(output)?;
    let mut report = Report::new();
    report.add_sink("console", console);
    report.add_sink(output.display().to_string(), &mut file);

    report.preamble(
        "Loop Ordering Performance Analysis",
        &format!("Matrix size: {} x {}", config.a_rows, config.b_cols),
    )?;
    report.columns("Version, Time (msec), Bandwidth (MB/s), Speedup")?;

    run_configurations(
        &[KernelSpec::Naive, KernelSpec::Standard],
        &a,
        &b,
        &mut c,
        clock,
        |measurement| report.row(&measurement.format_row()),
    )
}
