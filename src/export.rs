use std::io::Cursor;

use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb as ImageRgb};
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;

use crate::config::WiggleOptions;
use crate::render::{DisplayList, DrawCommand, Rgb};
use crate::wiggle::{NormalizedDataset, WiggleError};

// ---------------------------------------------------------------------------
// Static export (plotters bitmap → PNG)
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct ExportStyle {
    pub width: u32,
    pub height: u32,
    pub background: Rgb,
    /// Draw tick labels. Requires a system font.
    pub draw_axes: bool,
}

impl Default for ExportStyle {
    fn default() -> Self {
        Self {
            width: 900,
            height: 600,
            background: Rgb::WHITE,
            draw_axes: true,
        }
    }
}

type WiggleChart<'a, 'b> =
    ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Render a normalized section to PNG bytes. The sample axis runs downward.
pub fn render_png(
    dataset: &NormalizedDataset,
    options: &WiggleOptions,
    style: &ExportStyle,
) -> Result<Vec<u8>, WiggleError> {
    if dataset.num_traces() == 0 || dataset.num_samples() == 0 {
        return Err(WiggleError::Render("section has no samples".into()));
    }

    let list = DisplayList::from_dataset(dataset, options.mode, options.color)?;

    let mut buffer = vec![0u8; rgb_buffer_len(style.width, style.height)];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (style.width, style.height))
            .into_drawing_area();
        root.fill(&to_plotters(style.background))?;

        // y is negated so that the first sample sits at the top
        let [x0, x1] = list.x_bounds;
        let [t0, t1] = list.y_bounds;
        let label_area = if style.draw_axes { 45 } else { 0 };
        let mut chart = ChartBuilder::on(&root)
            .margin(10)
            .set_label_area_size(LabelAreaPosition::Left, label_area)
            .set_label_area_size(LabelAreaPosition::Top, label_area)
            .build_cartesian_2d(x0..x1, -t1..-t0)?;

        if style.draw_axes {
            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_label_formatter(&|v: &f64| format!("{v:.1}"))
                .y_label_formatter(&|v: &f64| format!("{:.3}", -v))
                .draw()?;
        }

        replay(&mut chart, &list.commands)?;
        root.present()?;
    }
    encode_png(&buffer, style.width, style.height)
}

fn replay(chart: &mut WiggleChart<'_, '_>, commands: &[DrawCommand]) -> Result<(), WiggleError> {
    for command in commands {
        match command {
            DrawCommand::Polyline { points, color } => {
                let color = to_plotters(*color);
                chart.draw_series(LineSeries::new(
                    points.iter().map(|p| (p[0], -p[1])),
                    &color,
                ))?;
            }
            DrawCommand::Polygon { points, color } => {
                let outline: Vec<(f64, f64)> = points.iter().map(|p| (p[0], -p[1])).collect();
                chart.draw_series(std::iter::once(Polygon::new(
                    outline,
                    to_plotters(*color).filled(),
                )))?;
            }
        }
    }
    Ok(())
}

fn rgb_buffer_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * 3
}

fn to_plotters(color: Rgb) -> RGBColor {
    RGBColor(color.0, color.1, color.2)
}

fn encode_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>, WiggleError> {
    let image = ImageBuffer::<ImageRgb<u8>, _>::from_raw(width, height, buffer.to_vec())
        .ok_or_else(|| WiggleError::Render("failed to allocate image buffer".into()))?;
    let mut output = Vec::new();
    let dynamic = DynamicImage::ImageRgb8(image);
    dynamic.write_to(&mut Cursor::new(&mut output), ImageFormat::Png)?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RenderMode;
    use crate::wiggle::normalize;
    use ndarray::{array, Array1, Array2};

    fn dataset() -> NormalizedDataset {
        let data = array![[1.0, -1.0, 0.5], [-1.0, 1.0, -0.5], [0.5, 0.25, 1.0]];
        normalize(data.view().into_dyn(), None, None, 0.4, false).unwrap()
    }

    #[test]
    fn display_list_records_fill_mode() {
        let list = DisplayList::from_dataset(&dataset(), RenderMode::Fill, Rgb::BLUE).unwrap();
        assert_eq!(list.x_bounds, [-1.0, 3.0]);
        assert_eq!(list.y_bounds, [0.0, 2.0]);
        let lines = list
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Polyline { .. }))
            .count();
        assert_eq!(lines, 3);
        assert!(list
            .commands
            .iter()
            .any(|c| matches!(c, DrawCommand::Polygon { color, .. } if *color == Rgb::BLUE)));
    }

    #[test]
    fn png_export_produces_png_bytes() {
        let style = ExportStyle {
            width: 200,
            height: 150,
            draw_axes: false,
            ..ExportStyle::default()
        };
        let options = WiggleOptions {
            mode: RenderMode::Fill,
            ..WiggleOptions::default()
        };
        let png = render_png(&dataset(), &options, &style).unwrap();
        assert_eq!(&png[..4], &[0x89, b'P', b'N', b'G']);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn buffer_size_does_not_wrap_in_u32() {
        assert_eq!(rgb_buffer_len(200, 150), 90_000);
        assert_eq!(rgb_buffer_len(70_000, 70_000), 14_700_000_000);
    }

    #[test]
    fn empty_section_is_render_error() {
        let ds = NormalizedDataset {
            data: Array2::zeros((0, 2)),
            sample_axis: Array1::zeros(0),
            trace_axis: array![0.0, 1.0],
            trace_spacing: 1.0,
        };
        let err = render_png(&ds, &WiggleOptions::default(), &ExportStyle::default()).unwrap_err();
        assert!(matches!(err, WiggleError::Render(_)));
    }
}
