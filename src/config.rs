use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::render::{RenderMode, Rgb};

/// Environment variable naming an optional JSON options file for the viewer.
pub const CONFIG_ENV_VAR: &str = "WIGGLE_CONFIG";

/// Display options for a wiggle section.
///
/// Missing fields in a JSON file fall back to the defaults:
///
/// ```json
/// { "stretch_factor": 0.3, "mode": "fill", "color": [0, 0, 0], "verbose": true }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WiggleOptions {
    /// Fraction of the trace spacing the largest-variance trace may occupy.
    pub stretch_factor: f64,
    pub color: Rgb,
    pub mode: RenderMode,
    /// Emit normalization diagnostics through `log`.
    pub verbose: bool,
}

impl Default for WiggleOptions {
    fn default() -> Self {
        Self {
            stretch_factor: 0.15,
            color: Rgb::BLACK,
            mode: RenderMode::Raw,
            verbose: false,
        }
    }
}

impl WiggleOptions {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading options file {}", path.display()))?;
        serde_json::from_str(&text).context("parsing options JSON")
    }

    /// Options from the file named by [`CONFIG_ENV_VAR`], or defaults when the
    /// variable is unset.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::from_json_file(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }
}
