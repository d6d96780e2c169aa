use std::ops::Range;

use super::error::WiggleError;

// ---------------------------------------------------------------------------
// RefinedTrace – a trace with interpolated zero-amplitude points
// ---------------------------------------------------------------------------

/// A trace and its coordinates after [`insert_zeros`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RefinedTrace {
    /// Amplitudes; exactly `0.0` at every inserted crossing.
    pub trace: Vec<f64>,
    /// Coordinates paired with `trace`, in the input order.
    pub axis: Vec<f64>,
}

impl RefinedTrace {
    pub fn len(&self) -> usize {
        self.trace.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trace.is_empty()
    }

    /// Plot points `[amplitude + offset, coordinate]` for a trace whose
    /// baseline sits at `offset`.
    pub fn points(&self, offset: f64) -> Vec<[f64; 2]> {
        self.trace
            .iter()
            .zip(&self.axis)
            .map(|(&amp, &t)| [amp + offset, t])
            .collect()
    }

    /// Index ranges of the maximal non-negative runs that contain at least one
    /// strictly positive sample. With zeros inserted, each run starts and
    /// ends on the baseline unless it touches either end of the trace.
    pub fn positive_lobes(&self) -> Vec<Range<usize>> {
        let mut lobes = Vec::new();
        let mut start: Option<usize> = None;
        let mut has_positive = false;

        for (i, &v) in self.trace.iter().enumerate() {
            if v >= 0.0 {
                start.get_or_insert(i);
                has_positive |= v > 0.0;
            } else if let Some(s) = start.take() {
                if has_positive {
                    lobes.push(s..i);
                }
                has_positive = false;
            }
        }
        if let Some(s) = start {
            if has_positive {
                lobes.push(s..self.trace.len());
            }
        }
        lobes
    }
}

// ---------------------------------------------------------------------------
// Zero-crossing splitter
// ---------------------------------------------------------------------------

/// Indices `i` where `trace[i]` and `trace[i + 1]` have strictly opposite
/// signs. Exact zeros never start or end a crossing.
pub fn zero_crossings(trace: &[f64]) -> Vec<usize> {
    trace
        .windows(2)
        .enumerate()
        .filter(|(_, w)| (w[0] > 0.0 && w[1] < 0.0) || (w[0] < 0.0 && w[1] > 0.0))
        .map(|(i, _)| i)
        .collect()
}

/// Insert a linearly interpolated zero-amplitude point at every sign change.
///
/// `axis` defaults to `0..trace.len()`. Original samples are kept untouched;
/// the output grows by one point per crossing. Coordinates are expected to be
/// strictly ordered and samples finite.
pub fn insert_zeros(trace: &[f64], axis: Option<&[f64]>) -> Result<RefinedTrace, WiggleError> {
    let axis: Vec<f64> = match axis {
        Some(axis) if axis.len() != trace.len() => {
            return Err(WiggleError::Shape(format!(
                "axis has {} values but trace has {}",
                axis.len(),
                trace.len()
            )));
        }
        Some(axis) => axis.to_vec(),
        None => (0..trace.len()).map(|i| i as f64).collect(),
    };

    let crossings = zero_crossings(trace);
    if crossings.is_empty() {
        return Ok(RefinedTrace {
            trace: trace.to_vec(),
            axis,
        });
    }

    let capacity = trace.len() + crossings.len();
    let mut refined = RefinedTrace {
        trace: Vec::with_capacity(capacity),
        axis: Vec::with_capacity(capacity),
    };

    let mut start = 0;
    for &i in &crossings {
        refined.trace.extend_from_slice(&trace[start..=i]);
        refined.axis.extend_from_slice(&axis[start..=i]);

        refined.trace.push(0.0);
        refined
            .axis
            .push(zero_position(axis[i], trace[i], axis[i + 1], trace[i + 1]));
        start = i + 1;
    }
    refined.trace.extend_from_slice(&trace[start..]);
    refined.axis.extend_from_slice(&axis[start..]);

    Ok(refined)
}

/// Coordinate where the segment `(x1, y1)`–`(x2, y2)` reaches zero amplitude.
fn zero_position(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let slope = (y2 - y1) / (x2 - x1);
    x1 - y1 / slope
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_crossing_inserts_midpoint() {
        let out = insert_zeros(&[1.0, -1.0], Some(&[0.0, 1.0])).unwrap();
        assert_eq!(out.trace, vec![1.0, 0.0, -1.0]);
        assert_eq!(out.axis, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn crossing_uses_linear_interpolation() {
        let out = insert_zeros(&[2.0, -1.0], Some(&[0.0, 3.0])).unwrap();
        assert_eq!(out.trace, vec![2.0, 0.0, -1.0]);
        assert!((out.axis[1] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn default_axis_is_sample_index() {
        let out = insert_zeros(&[-3.0, 1.0, 2.0], None).unwrap();
        assert_eq!(out.trace, vec![-3.0, 0.0, 1.0, 2.0]);
        assert!((out.axis[1] - 0.75).abs() < 1e-12);
        assert_eq!(out.axis[2], 1.0);
    }

    #[test]
    fn positive_trace_is_unchanged() {
        let out = insert_zeros(&[1.0, 2.0, 3.0], None).unwrap();
        assert_eq!(out.trace, vec![1.0, 2.0, 3.0]);
        assert_eq!(out.axis, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn short_and_flat_traces_pass_through() {
        assert!(insert_zeros(&[], None).unwrap().is_empty());
        let one = insert_zeros(&[-4.0], Some(&[7.0])).unwrap();
        assert_eq!(one.trace, vec![-4.0]);
        assert_eq!(one.axis, vec![7.0]);
        let zeros = insert_zeros(&[0.0, 0.0, 0.0], None).unwrap();
        assert_eq!(zeros.trace, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn output_grows_by_number_of_crossings() {
        let trace = [0.5, -0.2, -0.3, 0.8, 0.1, -0.9, 0.4];
        let crossings = zero_crossings(&trace);
        assert_eq!(crossings, vec![0, 2, 4, 5]);
        let out = insert_zeros(&trace, None).unwrap();
        assert_eq!(out.len(), trace.len() + crossings.len());
        assert_eq!(out.trace.iter().filter(|&&v| v == 0.0).count(), 4);
    }

    #[test]
    fn original_samples_survive_at_their_coordinates() {
        let trace = [0.5, -0.2, -0.3, 0.8, 0.1, -0.9, 0.4];
        let axis = [0.0, 0.004, 0.008, 0.012, 0.016, 0.020, 0.024];
        let out = insert_zeros(&trace, Some(&axis[..])).unwrap();
        for (&t, &v) in axis.iter().zip(&trace) {
            let k = out.axis.iter().position(|&a| a == t).unwrap();
            assert_eq!(out.trace[k], v);
        }
        assert!(out.axis.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn rerunning_on_refined_output_is_stable() {
        let trace = [1.0, -2.0, 3.0, 0.0, -1.0, -1.0, 2.0];
        let once = insert_zeros(&trace, None).unwrap();
        let twice = insert_zeros(&once.trace, Some(once.axis.as_slice())).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn mismatched_axis_is_shape_error() {
        let err = insert_zeros(&[1.0, -1.0], Some(&[0.0])).unwrap_err();
        assert!(matches!(err, WiggleError::Shape(_)));
    }

    #[test]
    fn positive_lobes_are_bounded_by_zeros() {
        let out = insert_zeros(&[1.0, -1.0, 2.0, 3.0, -1.0], None).unwrap();
        // [1, 0, -1, 0, 2, 3, 0, -1]
        assert_eq!(out.positive_lobes(), vec![0..2, 3..7]);
        let negative = insert_zeros(&[-1.0, -2.0], None).unwrap();
        assert!(negative.positive_lobes().is_empty());
    }

    #[test]
    fn points_are_offset_horizontally() {
        let out = insert_zeros(&[1.0, -1.0], Some(&[0.0, 1.0])).unwrap();
        assert_eq!(out.points(10.0), vec![[11.0, 0.0], [10.0, 0.5], [9.0, 1.0]]);
    }
}
