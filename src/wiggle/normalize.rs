use log::debug;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, ArrayViewD, Axis, Ix1, Ix2};

use super::error::WiggleError;

// ---------------------------------------------------------------------------
// NormalizedDataset – rescaled samples plus the axes they are drawn against
// ---------------------------------------------------------------------------

/// Output of [`normalize`]: everything a renderer needs for one section.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedDataset {
    /// Samples rescaled into trace-spacing units (rows = samples, columns = traces).
    pub data: Array2<f64>,
    /// Vertical coordinate of every row (time or depth).
    pub sample_axis: Array1<f64>,
    /// Baseline position of every trace.
    pub trace_axis: Array1<f64>,
    /// Minimum gap between consecutive trace baselines.
    pub trace_spacing: f64,
}

impl NormalizedDataset {
    /// Number of traces (columns).
    pub fn num_traces(&self) -> usize {
        self.data.ncols()
    }

    /// Number of samples per trace (rows).
    pub fn num_samples(&self) -> usize {
        self.data.nrows()
    }

    /// Iterate `(baseline offset, rescaled trace)` pairs in trace order.
    pub fn traces(&self) -> impl Iterator<Item = (f64, ArrayView1<'_, f64>)> + '_ {
        self.trace_axis
            .iter()
            .copied()
            .zip(self.data.axis_iter(Axis(1)))
    }

    /// Horizontal plot range, padded by one trace spacing on each side.
    pub fn x_bounds(&self) -> [f64; 2] {
        let first = self.trace_axis.iter().next().copied().unwrap_or(0.0);
        let last = self.trace_axis.iter().last().copied().unwrap_or(0.0);
        [first - self.trace_spacing, last + self.trace_spacing]
    }

    /// Vertical plot range: first to last sample coordinate.
    pub fn y_bounds(&self) -> [f64; 2] {
        let first = self.sample_axis.iter().next().copied().unwrap_or(0.0);
        let last = self.sample_axis.iter().last().copied().unwrap_or(0.0);
        [first, last]
    }
}

// ---------------------------------------------------------------------------
// Normalizer
// ---------------------------------------------------------------------------

/// Validate a sample matrix and its axes, then rescale amplitudes so the
/// column with the largest standard deviation spans
/// `trace_spacing * stretch_factor`.
///
/// Missing axes default to `0..n`. The trace axis is expected to be sorted
/// ascending without duplicates; an unsorted axis yields a meaningless
/// (possibly negative) spacing and is not corrected here. An all-zero matrix
/// divides by a zero standard deviation and produces non-finite samples.
/// A NaN sample or trace position propagates: every output sample becomes NaN.
///
/// `verbose` only enables debug logging.
pub fn normalize(
    data: ArrayViewD<'_, f64>,
    sample_axis: Option<ArrayViewD<'_, f64>>,
    trace_axis: Option<ArrayViewD<'_, f64>>,
    stretch_factor: f64,
    verbose: bool,
) -> Result<NormalizedDataset, WiggleError> {
    if data.ndim() != 2 {
        return Err(WiggleError::Shape(format!(
            "data must be a 2D array, got {} dimension(s)",
            data.ndim()
        )));
    }
    let data = data
        .into_dimensionality::<Ix2>()
        .map_err(|e| WiggleError::Shape(e.to_string()))?;
    let (num_samples, num_traces) = data.dim();

    let sample_axis = resolve_axis(sample_axis, num_samples, "sample_axis", "rows", verbose)?;
    let trace_axis = resolve_axis(trace_axis, num_traces, "trace_axis", "columns", verbose)?;

    if !stretch_factor.is_finite() {
        return Err(WiggleError::Type(format!(
            "stretch_factor must be a finite number, got {stretch_factor}"
        )));
    }

    let trace_spacing = trace_spacing(trace_axis.view())?;

    let max_std = column_std(data).fold(f64::NEG_INFINITY, |acc, &s| nan_max(acc, s));
    let rescaled = data.mapv(|v| v / max_std * trace_spacing * stretch_factor);

    if verbose {
        debug!(
            "normalized {num_samples}x{num_traces} section: trace_spacing={trace_spacing}, \
             max_std={max_std}, stretch_factor={stretch_factor}"
        );
    }

    Ok(NormalizedDataset {
        data: rescaled,
        sample_axis,
        trace_axis,
        trace_spacing,
    })
}

/// Population standard deviation of every column.
pub fn column_std(data: ArrayView2<'_, f64>) -> Array1<f64> {
    data.std_axis(Axis(0), 0.0)
}

/// Minimum gap between adjacent trace-axis values.
pub fn trace_spacing(trace_axis: ArrayView1<'_, f64>) -> Result<f64, WiggleError> {
    if trace_axis.len() < 2 {
        return Err(WiggleError::Shape(format!(
            "at least two traces are needed to derive trace spacing, got {}",
            trace_axis.len()
        )));
    }
    Ok(trace_axis
        .iter()
        .zip(trace_axis.iter().skip(1))
        .map(|(a, b)| b - a)
        .fold(f64::INFINITY, nan_min))
}

// f64::max/min drop NaN operands; these keep them
fn nan_max(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.max(b)
    }
}

fn nan_min(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.min(b)
    }
}

fn resolve_axis(
    axis: Option<ArrayViewD<'_, f64>>,
    expected: usize,
    name: &str,
    dimension: &str,
    verbose: bool,
) -> Result<Array1<f64>, WiggleError> {
    let Some(axis) = axis else {
        let generated: Array1<f64> = (0..expected).map(|i| i as f64).collect();
        if verbose {
            debug!("{name} is automatically generated: {generated}");
        }
        return Ok(generated);
    };

    if axis.ndim() != 1 {
        return Err(WiggleError::Shape(format!(
            "{name} must be a 1D array, got {} dimension(s)",
            axis.ndim()
        )));
    }
    if axis.len() != expected {
        return Err(WiggleError::Shape(format!(
            "{name} has {} values but data has {expected} {dimension}",
            axis.len()
        )));
    }
    axis.into_dimensionality::<Ix1>()
        .map(|a| a.to_owned())
        .map_err(|e| WiggleError::Shape(e.to_string()))
}
