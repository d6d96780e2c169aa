use serde::{Deserialize, Serialize};

use crate::wiggle::{insert_zeros, NormalizedDataset, WiggleError};

// ---------------------------------------------------------------------------
// Colour and mode
// ---------------------------------------------------------------------------

/// Plain 8-bit RGB colour passed through to the drawing backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const RED: Rgb = Rgb(200, 30, 30);
    pub const BLUE: Rgb = Rgb(30, 60, 200);
}

impl Default for Rgb {
    fn default() -> Self {
        Rgb::BLACK
    }
}

/// How each trace is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// One polyline per trace.
    #[default]
    Raw,
    /// Polyline plus filled positive excursions (variable area).
    Fill,
}

// ---------------------------------------------------------------------------
// Drawing capability
// ---------------------------------------------------------------------------

/// Drawing surface a wiggle section is rendered onto.
///
/// Points are `[x, y]` in data coordinates: `x` is the trace baseline plus
/// amplitude, `y` is the sample-axis coordinate. Sinks that draw the sample
/// axis downward handle the flip themselves.
pub trait TraceSink {
    fn draw_polyline(&mut self, points: &[[f64; 2]], color: Rgb) -> Result<(), WiggleError>;

    /// `points` form a closed outline; the last point connects back to the first.
    fn draw_filled_polygon(&mut self, points: &[[f64; 2]], color: Rgb)
        -> Result<(), WiggleError>;

    fn set_bounds(&mut self, x: [f64; 2], y: [f64; 2]) -> Result<(), WiggleError>;
}

/// Draw every trace of `dataset` onto `sink`.
pub fn render_wiggle<S: TraceSink + ?Sized>(
    dataset: &NormalizedDataset,
    mode: RenderMode,
    color: Rgb,
    sink: &mut S,
) -> Result<(), WiggleError> {
    sink.set_bounds(dataset.x_bounds(), dataset.y_bounds())?;

    let sample_axis = dataset.sample_axis.to_vec();

    for (offset, trace) in dataset.traces() {
        match mode {
            RenderMode::Raw => {
                let points: Vec<[f64; 2]> = trace
                    .iter()
                    .zip(&sample_axis)
                    .map(|(&amp, &t)| [amp + offset, t])
                    .collect();
                sink.draw_polyline(&points, color)?;
            }
            RenderMode::Fill => {
                let refined = insert_zeros(&trace.to_vec(), Some(sample_axis.as_slice()))?;
                let points = refined.points(offset);
                for lobe in refined.positive_lobes() {
                    let mut outline = points[lobe.clone()].to_vec();
                    outline.push([offset, refined.axis[lobe.end - 1]]);
                    outline.push([offset, refined.axis[lobe.start]]);
                    sink.draw_filled_polygon(&outline, color)?;
                }
                sink.draw_polyline(&points, color)?;
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Display list – a sink that records calls for later replay
// ---------------------------------------------------------------------------

/// One recorded drawing call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Polyline { points: Vec<[f64; 2]>, color: Rgb },
    /// Fill-mode lobes are the trace curve followed by the two baseline
    /// points that close it (end first, then start).
    Polygon { points: Vec<[f64; 2]>, color: Rgb },
}

/// Split a fill-mode lobe outline into convex trapezoids, one per curve
/// segment, each spanning from the segment to the baseline.
///
/// The lobe itself is concave wherever a positive excursion has more than
/// one peak; backends that can only fill convex shapes draw these instead.
pub fn baseline_strips(outline: &[[f64; 2]]) -> Vec<[[f64; 2]; 4]> {
    if outline.len() < 3 {
        return Vec::new();
    }
    let (curve, closing) = outline.split_at(outline.len() - 2);
    let baseline = closing[0][0];
    curve
        .windows(2)
        .map(|w| [w[0], w[1], [baseline, w[1][1]], [baseline, w[0][1]]])
        .collect()
}

/// Sink that records drawing calls so a backend can replay them once the
/// plot area has been set up from the recorded bounds.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DisplayList {
    pub commands: Vec<DrawCommand>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

impl DisplayList {
    /// Record a whole section.
    pub fn from_dataset(
        dataset: &NormalizedDataset,
        mode: RenderMode,
        color: Rgb,
    ) -> Result<Self, WiggleError> {
        let mut list = DisplayList::default();
        render_wiggle(dataset, mode, color, &mut list)?;
        Ok(list)
    }
}

impl TraceSink for DisplayList {
    fn draw_polyline(&mut self, points: &[[f64; 2]], color: Rgb) -> Result<(), WiggleError> {
        self.commands.push(DrawCommand::Polyline {
            points: points.to_vec(),
            color,
        });
        Ok(())
    }

    fn draw_filled_polygon(&mut self, points: &[[f64; 2]], color: Rgb) -> Result<(), WiggleError> {
        self.commands.push(DrawCommand::Polygon {
            points: points.to_vec(),
            color,
        });
        Ok(())
    }

    fn set_bounds(&mut self, x: [f64; 2], y: [f64; 2]) -> Result<(), WiggleError> {
        self.x_bounds = x;
        self.y_bounds = y;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wiggle::normalize;
    use ndarray::{array, Array1, Array2};

    fn section() -> NormalizedDataset {
        let data = array![[1.0, -1.0], [-1.0, 1.0]];
        let xx = array![0.0, 5.0];
        normalize(data.view().into_dyn(), None, Some(xx.view().into_dyn()), 0.15, false).unwrap()
    }

    fn polylines(list: &DisplayList) -> Vec<&Vec<[f64; 2]>> {
        list.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Polyline { points, .. } => Some(points),
                _ => None,
            })
            .collect()
    }

    fn polygons(list: &DisplayList) -> Vec<&Vec<[f64; 2]>> {
        list.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Polygon { points, .. } => Some(points),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn raw_mode_draws_offset_polylines() {
        let list = DisplayList::from_dataset(&section(), RenderMode::Raw, Rgb::BLACK).unwrap();
        assert!(polygons(&list).is_empty());
        let lines = polylines(&list);
        assert_eq!(lines.len(), 2);
        assert_eq!(*lines[0], vec![[0.75, 0.0], [-0.75, 1.0]]);
        assert_eq!(*lines[1], vec![[4.25, 0.0], [5.75, 1.0]]);
        assert_eq!(list.x_bounds, [-5.0, 10.0]);
        assert_eq!(list.y_bounds, [0.0, 1.0]);
    }

    #[test]
    fn fill_mode_closes_lobes_on_baseline() {
        let list = DisplayList::from_dataset(&section(), RenderMode::Fill, Rgb::RED).unwrap();
        let lines = polylines(&list);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].len(), 3);

        let fills = polygons(&list);
        assert_eq!(fills.len(), 2);

        // first trace: positive at the top, zero at t = 0.5
        assert_eq!(fills[0][0], [0.75, 0.0]);
        assert_eq!(fills[0][1], [0.0, 0.5]);
        assert_eq!(fills[0].last(), Some(&[0.0, 0.0]));

        // second trace: positive at the bottom
        assert_eq!(fills[1][0], [5.0, 0.5]);
        assert_eq!(fills[1][1], [5.75, 1.0]);
        assert!(list
            .commands
            .iter()
            .all(|c| matches!(c, DrawCommand::Polyline { color, .. } | DrawCommand::Polygon { color, .. } if *color == Rgb::RED)));
    }

    fn is_convex(points: &[[f64; 2]]) -> bool {
        let n = points.len();
        let turns: Vec<f64> = (0..n)
            .map(|i| {
                let [ax, ay] = points[i];
                let [bx, by] = points[(i + 1) % n];
                let [cx, cy] = points[(i + 2) % n];
                (bx - ax) * (cy - by) - (by - ay) * (cx - bx)
            })
            .collect();
        turns.iter().all(|&z| z >= -1e-12) || turns.iter().all(|&z| z <= 1e-12)
    }

    fn shoelace_area(points: &[[f64; 2]]) -> f64 {
        let n = points.len();
        let twice: f64 = (0..n)
            .map(|i| {
                let [ax, ay] = points[i];
                let [bx, by] = points[(i + 1) % n];
                ax * by - bx * ay
            })
            .sum();
        twice.abs() / 2.0
    }

    #[test]
    fn double_peaked_lobe_splits_into_convex_strips() {
        // one positive excursion with two peaks and a dip between them
        let mut data = Array2::<f64>::zeros((5, 2));
        data.column_mut(0).assign(&array![-1.0, 2.0, 0.5, 2.0, -1.0]);
        let ds = NormalizedDataset {
            data,
            sample_axis: Array1::from(vec![0.0, 1.0, 2.0, 3.0, 4.0]),
            trace_axis: array![0.0, 1.0],
            trace_spacing: 1.0,
        };
        let list = DisplayList::from_dataset(&ds, RenderMode::Fill, Rgb::BLACK).unwrap();
        let fills = polygons(&list);
        assert_eq!(fills.len(), 1);
        let lobe = fills[0];
        assert!(!is_convex(lobe));

        let strips = baseline_strips(lobe);
        assert_eq!(strips.len(), lobe.len() - 3);
        for strip in &strips {
            assert!(is_convex(strip), "{strip:?}");
            assert!(strip.iter().all(|p| p[0] >= 0.0));
        }
        let covered: f64 = strips.iter().map(|s| shoelace_area(s)).sum();
        assert!((covered - shoelace_area(lobe)).abs() < 1e-9);
    }

    #[test]
    fn mode_names_deserialize_lowercase() {
        let mode: RenderMode = serde_json::from_str("\"fill\"").unwrap();
        assert_eq!(mode, RenderMode::Fill);
    }
}
