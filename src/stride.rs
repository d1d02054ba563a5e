//! Strided-access bandwidth probe.
//!
//! Keeps the number of touched elements constant while growing the distance
//! between successive accesses, so each pass moves the same logical amount of
//! data with progressively worse spatial locality. At stride 1 every cache
//! line is fully used; at larger strides most of each fetched line is wasted
//! and the measured rate drops accordingly.

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use log::{debug, info, warn};

use crate::clock::Clock;
use crate::error::{allocation_error, validation_error, Result};
use crate::report::{create_report_file, Report};
use crate::{DEFAULT_MAX_STRIDE, DEFAULT_STRIDE_TOUCHES};

/// Configuration for the stride probe.
#[derive(Debug, Clone)]
pub struct StrideConfig {
    /// Elements summed per pass, independent of the stride.
    pub touches: usize,
    /// Largest stride exercised; the buffer holds `touches * max_stride`
    /// doubles so every stride can touch `touches` distinct elements.
    pub max_stride: usize,
}

impl Default for StrideConfig {
    fn default() -> Self {
        StrideConfig {
            touches: DEFAULT_STRIDE_TOUCHES,
            max_stride: DEFAULT_MAX_STRIDE,
        }
    }
}

impl StrideConfig {
    pub fn validate(&self) -> Result<()> {
        if self.touches == 0 {
            return Err(validation_error("touches must be positive"));
        }
        if self.max_stride == 0 {
            return Err(validation_error("max stride must be positive"));
        }
        Ok(())
    }
}

/// One record of the probe sequence.
#[derive(Debug, Clone)]
pub struct StrideMeasurement {
    pub stride: usize,
    /// Sum of the touched elements; the buffer is all ones, so this equals
    /// the touch count and doubles as a sanity check on the pass.
    pub sum: f64,
    pub elapsed: Duration,
    pub rate_mbps: f64,
}

impl StrideMeasurement {
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }

    pub fn format_row(&self) -> String {
        format!(
            "{:>6}, {:>12.1}, {:>10.2}, {:>12.2}",
            self.stride,
            self.sum,
            self.elapsed_ms(),
            self.rate_mbps
        )
    }
}

/// Touched bytes per pass divided by elapsed time, in MB/s
/// (1 MB = 1024 * 1024 bytes).
fn rate_mbps(touches: usize, elapsed: Duration) -> f64 {
    let bytes = touches as f64 * std::mem::size_of::<f64>() as f64;
    (bytes / (1024.0 * 1024.0)) / elapsed.as_secs_f64()
}

/// Runs the probe, streaming each record to `observer` in stride order.
pub fn run_stride_probe<C: Clock>(
    config: &StrideConfig,
    clock: &C,
    mut observer: impl FnMut(&StrideMeasurement) -> Result<()>,
) -> Result<Vec<StrideMeasurement>> {
    config.validate()?;

    let len = config.touches.checked_mul(config.max_stride).ok_or_else(|| {
        validation_error(format!(
            "buffer of {} x {} doubles overflows usize",
            config.touches, config.max_stride
        ))
    })?;

    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|e| allocation_error(len, e.to_string()))?;
    buffer.resize(len, 1.0f64);

    info!(
        "stride probe: touches={} max_stride={} buffer={} doubles",
        config.touches, config.max_stride, len
    );

    let mut measurements = Vec::with_capacity(config.max_stride);

    for stride in 1..=config.max_stride {
        let mut sum = 0.0;

        let start = clock.now();
        for i in (0..config.touches * stride).step_by(stride) {
            sum += buffer[i];
        }
        let elapsed = clock.now().saturating_sub(start);

        if elapsed <= Duration::from_millis(1) {
            warn!(
                "stride {} finished in {:?}, near the timer resolution; treat the reading as imprecise",
                stride, elapsed
            );
        }

        let measurement = StrideMeasurement {
            stride,
            sum,
            elapsed,
            rate_mbps: rate_mbps(config.touches, elapsed),
        };
        debug!("measured: {}", measurement.format_row());
        observer(&measurement)?;
        measurements.push(measurement);
    }

    Ok(measurements)
}

/// Full stride-probe command: console always, artifact only when requested.
pub fn run_stride_command<C: Clock>(
    config: &StrideConfig,
    output: Option<&Path>,
    clock: &C,
    console: &mut dyn Write,
) -> Result<Vec<StrideMeasurement>> {
    config.validate()?;

    let mut file = match output {
        Some(path) => Some(create_report_file(path)?),
        None => None,
    };

    let mut report = Report::new();
    report.add_sink("console", console);
    if let (Some(path), Some(file)) = (output, file.as_mut()) {
        report.add_sink(path.display().to_string(), file);
    }

    report.preamble(
        "Strided Access Performance Analysis",
        &format!(
            "Touches per pass: {}, strides: 1..={}",
            config.touches, config.max_stride
        ),
    )?;
    report.columns("Stride, Sum, Time (msec), Rate (MB/s)")?;

    run_stride_probe(config, clock, |measurement| {
        report.row(&measurement.format_row())
    })
}
