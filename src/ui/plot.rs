use eframe::egui::{Color32, Stroke, Ui};
use egui_plot::{GridMark, Line, Plot, PlotBounds, PlotPoints, PlotUi, Polygon, VPlacement};

use wiggle_view::render::{baseline_strips, DisplayList, DrawCommand, Rgb};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Wiggle plot (central panel)
// ---------------------------------------------------------------------------

/// Render the wiggle section in the central panel.
///
/// egui_plot has no inverted axis, so sample coordinates are negated on the
/// way in and the axis labels negate them back.
pub fn wiggle_plot(ui: &mut Ui, state: &mut AppState) {
    let reset = std::mem::take(&mut state.reset_view);

    let list = match &state.display {
        Some(list) => list,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a file to view a section  (File → Open…)");
            });
            return;
        }
    };

    Plot::new("wiggle_plot")
        .x_axis_label("Trace position")
        .y_axis_label("Sample")
        .x_axis_position(VPlacement::Top)
        .y_axis_formatter(|mark: GridMark, _range| flipped_label(mark))
        .label_formatter(|_name, point| format!("x = {:.3}\nt = {:.4}", point.x, -point.y))
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            if reset {
                let [x0, x1] = list.x_bounds;
                let [t0, t1] = list.y_bounds;
                plot_ui.set_plot_bounds(PlotBounds::from_min_max([x0, -t1], [x1, -t0]));
            }
            draw_display_list(plot_ui, list);
        });
}

fn draw_display_list(plot_ui: &mut PlotUi, list: &DisplayList) {
    for command in &list.commands {
        match command {
            DrawCommand::Polyline { points, color } => {
                let line = Line::new(flip(points)).color(to_egui(*color)).width(1.0);
                plot_ui.line(line);
            }
            DrawCommand::Polygon { points, color } => {
                // egui_plot only fills convex polygons
                let fill = to_egui(*color);
                for strip in baseline_strips(points) {
                    let polygon = Polygon::new(flip(&strip))
                        .fill_color(fill)
                        .stroke(Stroke::NONE);
                    plot_ui.polygon(polygon);
                }
            }
        }
    }
}

fn flip(points: &[[f64; 2]]) -> PlotPoints<'static> {
    points.iter().map(|&[x, t]| [x, -t]).collect()
}

fn flipped_label(mark: GridMark) -> String {
    let value = -mark.value;
    let decimals = (-mark.step_size.log10()).ceil().max(0.0) as usize;
    if value == 0.0 {
        "0".to_string()
    } else {
        format!("{value:.decimals$}")
    }
}

fn to_egui(color: Rgb) -> Color32 {
    Color32::from_rgb(color.0, color.1, color.2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flipped_points_outlive_their_source() {
        let points: PlotPoints<'static> = {
            let recorded = vec![[1.0, 2.0], [0.5, 3.0]];
            flip(&recorded)
        };
        let first = points.points()[0];
        assert_eq!((first.x, first.y), (1.0, -2.0));
        assert_eq!(points.points().len(), 2);
    }
}
