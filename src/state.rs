use std::path::Path;

use anyhow::{Context, Result};

use wiggle_view::config::WiggleOptions;
use wiggle_view::data::model::{SeismicSection, TraceStats};
use wiggle_view::export::{render_png, ExportStyle};
use wiggle_view::render::DisplayList;
use wiggle_view::wiggle::NormalizedDataset;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded section (None until user loads a file).
    pub section: Option<SeismicSection>,

    /// File name of the loaded section, for the top bar.
    pub source_name: Option<String>,

    /// Display options edited in the side panel.
    pub options: WiggleOptions,

    /// Section rescaled with the current options (cached).
    pub normalized: Option<NormalizedDataset>,

    /// Drawing calls for the current section and options (cached).
    pub display: Option<DisplayList>,

    /// Raw per-trace statistics for the side panel table.
    pub stats: Vec<TraceStats>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Fit the plot to the section bounds on the next frame.
    pub reset_view: bool,
}

impl AppState {
    pub fn with_options(options: WiggleOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Ingest a newly loaded section and rebuild the cached plot.
    pub fn set_section(&mut self, section: SeismicSection, name: String) {
        self.stats = section.trace_stats();
        self.section = Some(section);
        self.source_name = Some(name);
        self.reset_view = true;
        self.refresh();
    }

    /// Recompute normalization and drawing calls after a section or option change.
    pub fn refresh(&mut self) {
        let Some(section) = &self.section else {
            return;
        };

        let result = section.normalize(&self.options).and_then(|dataset| {
            let list = DisplayList::from_dataset(&dataset, self.options.mode, self.options.color)?;
            Ok((dataset, list))
        });

        match result {
            Ok((dataset, list)) => {
                self.normalized = Some(dataset);
                self.display = Some(list);
                self.status_message = None;
            }
            Err(e) => {
                log::warn!("Cannot display section: {e}");
                self.normalized = None;
                self.display = None;
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Render the current section to a PNG file.
    pub fn export_png(&self, path: &Path) -> Result<()> {
        let dataset = self
            .normalized
            .as_ref()
            .context("no section to export")?;
        let png = render_png(dataset, &self.options, &ExportStyle::default())?;
        std::fs::write(path, png).with_context(|| format!("writing {}", path.display()))?;
        log::info!("Exported wiggle plot to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};
    use wiggle_view::render::RenderMode;

    #[test]
    fn loading_a_section_builds_the_display_list() {
        let mut state = AppState::default();
        let mut section = SeismicSection::new(array![[1.0, -1.0], [-1.0, 1.0]]);
        section.trace_axis = Some(vec![0.0, 5.0]);
        state.set_section(section, "test.json".into());

        assert!(state.reset_view);
        assert_eq!(state.stats.len(), 2);
        let dataset = state.normalized.as_ref().unwrap();
        assert_eq!(dataset.trace_spacing, 5.0);
        assert_eq!(state.display.as_ref().unwrap().commands.len(), 2);
    }

    #[test]
    fn switching_to_fill_adds_polygons() {
        let mut state = AppState::default();
        state.set_section(SeismicSection::new(array![[1.0, -1.0], [-1.0, 1.0]]), "s".into());
        state.options.mode = RenderMode::Fill;
        state.refresh();
        assert_eq!(state.display.as_ref().unwrap().commands.len(), 4);
    }

    #[test]
    fn invalid_section_reports_status() {
        let mut state = AppState::default();
        let mut section = SeismicSection::new(Array2::ones((10, 3)));
        section.sample_axis = Some(vec![0.0; 9]);
        state.set_section(section, "bad.csv".into());
        assert!(state.display.is_none());
        assert!(state.status_message.is_some());
    }
}
