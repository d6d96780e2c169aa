use ndarray::{Array1, Array2};

use crate::config::WiggleOptions;
use crate::wiggle::{self, column_std, NormalizedDataset, WiggleError};

// ---------------------------------------------------------------------------
// SeismicSection – a loaded sample matrix with optional axes
// ---------------------------------------------------------------------------

/// A section as read from disk: rows are samples, columns are traces.
///
/// Axes are kept as loaded; their lengths are checked by [`wiggle::normalize`],
/// not here.
#[derive(Debug, Clone, PartialEq)]
pub struct SeismicSection {
    pub data: Array2<f64>,
    /// Time/depth of every row, if the file provides one.
    pub sample_axis: Option<Vec<f64>>,
    /// Baseline position of every trace, if the file provides one.
    pub trace_axis: Option<Vec<f64>>,
}

impl SeismicSection {
    pub fn new(data: Array2<f64>) -> Self {
        Self {
            data,
            sample_axis: None,
            trace_axis: None,
        }
    }

    /// Number of traces (columns).
    pub fn num_traces(&self) -> usize {
        self.data.ncols()
    }

    /// Number of samples per trace (rows).
    pub fn num_samples(&self) -> usize {
        self.data.nrows()
    }

    /// Rescale for display with the given options.
    pub fn normalize(&self, options: &WiggleOptions) -> Result<NormalizedDataset, WiggleError> {
        let sample_axis = self.sample_axis.clone().map(Array1::from);
        let trace_axis = self.trace_axis.clone().map(Array1::from);
        wiggle::normalize(
            self.data.view().into_dyn(),
            sample_axis.as_ref().map(|a| a.view().into_dyn()),
            trace_axis.as_ref().map(|a| a.view().into_dyn()),
            options.stretch_factor,
            options.verbose,
        )
    }

    /// Per-trace summary of the raw samples, in trace order.
    pub fn trace_stats(&self) -> Vec<TraceStats> {
        let stds = column_std(self.data.view());
        self.data
            .columns()
            .into_iter()
            .zip(stds.iter())
            .enumerate()
            .map(|(index, (column, &std))| TraceStats {
                index,
                position: self
                    .trace_axis
                    .as_ref()
                    .and_then(|axis| axis.get(index).copied())
                    .unwrap_or(index as f64),
                std,
                peak: column.iter().fold(0.0f64, |acc, v| acc.max(v.abs())),
            })
            .collect()
    }
}

/// Raw-amplitude summary of one trace.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceStats {
    pub index: usize,
    /// Trace-axis value (or the index when the section has no trace axis).
    pub position: f64,
    pub std: f64,
    /// Largest absolute amplitude.
    pub peak: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn normalize_forwards_axes_and_options() {
        let mut section = SeismicSection::new(array![[1.0, -1.0], [-1.0, 1.0]]);
        section.trace_axis = Some(vec![0.0, 5.0]);
        section.sample_axis = Some(vec![0.0, 0.004]);
        let out = section.normalize(&WiggleOptions::default()).unwrap();
        assert_eq!(out.trace_spacing, 5.0);
        assert_eq!(out.sample_axis.to_vec(), vec![0.0, 0.004]);
    }

    #[test]
    fn bad_axis_length_surfaces_shape_error() {
        let mut section = SeismicSection::new(Array2::ones((10, 3)));
        section.sample_axis = Some(vec![0.0; 9]);
        let err = section.normalize(&WiggleOptions::default()).unwrap_err();
        assert!(matches!(err, WiggleError::Shape(_)));
    }

    #[test]
    fn trace_stats_report_std_and_peak() {
        let section = SeismicSection::new(array![[2.0, 0.0], [-2.0, -3.0]]);
        let stats = section.trace_stats();
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].std, 2.0);
        assert_eq!(stats[0].peak, 2.0);
        assert_eq!(stats[1].peak, 3.0);
        assert_eq!(stats[1].position, 1.0);
    }
}
