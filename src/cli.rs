// ============================================================================
// Pixelpad CLI - startup options
// ============================================================================
//
// Usage examples:
//   pixelpad --color "#ff0000" --tool bucket
//   pixelpad --zoom 3 --no-grid
//   pixelpad --lang es --log-file /tmp/pixelpad.log
//
// Values given here override the saved settings for this session only; they
// are never written back to the settings file.

use std::path::PathBuf;

use clap::Parser;

use crate::canvas::{CellColor, MAX_ZOOM, MIN_ZOOM, ZoomScale};
use crate::components::tools::Tool;
use crate::settings::AppSettings;

/// Pixelpad - a 36×36 pixel-art editor.
#[derive(Parser, Debug)]
#[command(name = "pixelpad", about = "Pixelpad pixel-art editor", version)]
pub struct CliArgs {
    /// Starting paint color, e.g. "#ff0000" or "f00".
    #[arg(short, long, value_name = "HEX")]
    pub color: Option<CellColor>,

    /// Starting zoom scale.
    #[arg(
        short,
        long,
        value_name = "1-4",
        value_parser = clap::value_parser!(u32).range(MIN_ZOOM as i64..=MAX_ZOOM as i64)
    )]
    pub zoom: Option<u32>,

    /// Tool selected at startup.
    #[arg(short, long, value_enum)]
    pub tool: Option<Tool>,

    /// UI language code (en, es). Defaults to the saved setting or the system language.
    #[arg(long, value_name = "CODE")]
    pub lang: Option<String>,

    /// Hide the cell grid lines.
    #[arg(long)]
    pub no_grid: bool,

    /// Write the session log here instead of the platform data directory.
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

impl CliArgs {
    /// Overlay command-line values on loaded settings.
    pub fn apply_to(&self, settings: &mut AppSettings) {
        if let Some(color) = self.color {
            settings.default_color = color;
        }
        if let Some(zoom) = self.zoom {
            settings.zoom = ZoomScale::new(zoom);
        }
        if let Some(lang) = &self.lang {
            settings.language = lang.clone();
        }
        if self.no_grid {
            settings.show_grid_lines = false;
        }
    }
}
