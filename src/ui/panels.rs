use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use wiggle_view::render::{RenderMode, Rgb};

use crate::state::AppState;

const COLOR_PRESETS: [(&str, Rgb); 3] = [
    ("Black", Rgb::BLACK),
    ("Red", Rgb::RED),
    ("Blue", Rgb::BLUE),
];

// ---------------------------------------------------------------------------
// Left side panel – display options and trace table
// ---------------------------------------------------------------------------

/// Render the left options panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Display");
    ui.separator();

    let mut changed = false;

    changed |= ui
        .add(
            egui::Slider::new(&mut state.options.stretch_factor, 0.01..=2.0)
                .text("Stretch factor")
                .logarithmic(true),
        )
        .changed();

    ui.horizontal(|ui: &mut Ui| {
        changed |= ui
            .radio_value(&mut state.options.mode, RenderMode::Raw, "Raw")
            .changed();
        changed |= ui
            .radio_value(&mut state.options.mode, RenderMode::Fill, "Fill")
            .changed();
    });

    let current = COLOR_PRESETS
        .iter()
        .find(|(_, c)| *c == state.options.color)
        .map_or("Custom", |(name, _)| *name);
    egui::ComboBox::from_label("Color")
        .selected_text(current)
        .show_ui(ui, |ui: &mut Ui| {
            for (name, color) in COLOR_PRESETS {
                changed |= ui
                    .selectable_value(&mut state.options.color, color, name)
                    .changed();
            }
        });

    changed |= ui
        .checkbox(&mut state.options.verbose, "Log diagnostics")
        .changed();

    if changed {
        state.refresh();
    }

    ui.add_space(8.0);
    ui.heading("Traces");
    ui.separator();

    if state.stats.is_empty() {
        ui.label("No section loaded.");
        return;
    }

    if let Some(ds) = &state.normalized {
        ui.label(format!("Trace spacing: {:.4}", ds.trace_spacing));
    }

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::remainder())
        .header(20.0, |mut header| {
            for title in ["#", "Position", "Std", "Peak"] {
                header.col(|ui: &mut Ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, state.stats.len(), |mut row| {
                let s = state.stats[row.index()];
                row.col(|ui: &mut Ui| {
                    ui.label(s.index.to_string());
                });
                row.col(|ui: &mut Ui| {
                    ui.label(format!("{:.2}", s.position));
                });
                row.col(|ui: &mut Ui| {
                    ui.label(format!("{:.4}", s.std));
                });
                row.col(|ui: &mut Ui| {
                    ui.label(format!("{:.4}", s.peak));
                });
            });
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_export = state.normalized.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export PNG…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(name), Some(section)) = (&state.source_name, &state.section) {
            ui.label(format!(
                "{name}: {} traces × {} samples",
                section.num_traces(),
                section.num_samples()
            ));
        }

        ui.separator();

        if ui.button("Fit view").clicked() {
            state.reset_view = true;
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open seismic section")
        .add_filter("Supported files", &["parquet", "pq", "json", "csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        match wiggle_view::data::loader::load_file(&path) {
            Ok(section) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                state.set_section(section, name);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

pub fn export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export wiggle plot")
        .set_file_name("wiggle.png")
        .add_filter("PNG", &["png"])
        .save_file();

    if let Some(path) = file {
        if let Err(e) = state.export_png(&path) {
            log::error!("Failed to export plot: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
