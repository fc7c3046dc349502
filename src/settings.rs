use std::path::PathBuf;

use crate::canvas::{CellColor, ZoomScale};
use crate::keybindings::KeyBindings;

/// Application settings that persist across sessions
#[derive(Clone, Debug)]
pub struct AppSettings {
    /// Paint color at startup
    pub default_color: CellColor,
    /// Zoom scale at startup (1–4)
    pub zoom: ZoomScale,
    /// Draw cell boundaries over the canvas
    pub show_grid_lines: bool,
    /// Maximum number of undo steps (0 = unlimited)
    pub max_undo_steps: usize,
    /// Language code. Empty string = auto-detect system language.
    pub language: String,
    pub keybindings: KeyBindings,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            default_color: CellColor::default(),
            zoom: ZoomScale::default(),
            show_grid_lines: true,
            max_undo_steps: 0,
            language: String::new(),
            keybindings: KeyBindings::default(),
        }
    }
}

impl AppSettings {
    /// Path to the settings file.
    /// On Linux:   ~/.config/pixelpad/pixelpad_settings.cfg  (XDG_CONFIG_HOME respected)
    /// On Windows: %APPDATA%\Pixelpad\pixelpad_settings.cfg
    /// On macOS:   ~/Library/Application Support/Pixelpad/pixelpad_settings.cfg
    pub fn settings_path() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        {
            let appdata = std::env::var("APPDATA")
                .or_else(|_| std::env::var("USERPROFILE"))
                .ok()?;
            return Some(PathBuf::from(appdata).join("Pixelpad").join("pixelpad_settings.cfg"));
        }
        #[cfg(target_os = "macos")]
        {
            let home = std::env::var("HOME").ok()?;
            return Some(
                PathBuf::from(home)
                    .join("Library")
                    .join("Application Support")
                    .join("Pixelpad")
                    .join("pixelpad_settings.cfg"),
            );
        }
        #[cfg(not(any(target_os = "windows", target_os = "macos")))]
        {
            let config_dir = std::env::var("XDG_CONFIG_HOME")
                .map(PathBuf::from)
                .or_else(|_| std::env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
                .ok()?;
            Some(config_dir.join("pixelpad").join("pixelpad_settings.cfg"))
        }
    }

    /// Render as `key=value` lines.
    pub fn to_config_string(&self) -> String {
        let mut content = format!(
            "default_color={}\n\
             zoom={}\n\
             show_grid_lines={}\n\
             max_undo_steps={}\n\
             language={}\n",
            self.default_color,
            self.zoom.get(),
            self.show_grid_lines,
            self.max_undo_steps,
            self.language,
        );
        for line in self.keybindings.to_config_lines() {
            content.push_str(&line);
            content.push('\n');
        }
        content
    }

    /// Parse `key=value` lines. Unknown keys are skipped; bad values keep defaults.
    pub fn from_config_str(content: &str) -> Self {
        let mut s = Self::default();
        for line in content.lines() {
            let Some((key, val)) = line.split_once('=') else { continue };
            let key = key.trim();
            let val = val.trim();
            match key {
                "default_color" => match val.parse() {
                    Ok(color) => s.default_color = color,
                    Err(e) => log_warn!("settings: default_color {:?}: {}", val, e),
                },
                "zoom" => {
                    if let Ok(scale) = val.parse() {
                        s.zoom = ZoomScale::new(scale);
                    }
                }
                "show_grid_lines" => {
                    s.show_grid_lines = val != "false";
                }
                "max_undo_steps" => {
                    s.max_undo_steps = val.parse().unwrap_or(0);
                }
                "language" => {
                    s.language = val.to_string();
                }
                _ => {
                    if let Some(action) = key.strip_prefix("key.") {
                        s.keybindings.load_config_line(action, val);
                    }
                }
            }
        }
        s
    }

    /// Save settings to disk.
    pub fn save(&self) -> std::io::Result<()> {
        let Some(path) = Self::settings_path() else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, self.to_config_string())?;
        log_info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Load settings from disk (defaults if the file is missing or unreadable).
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            return Self::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                log_info!("Settings loaded from {}", path.display());
                Self::from_config_str(&content)
            }
            Err(_) => Self::default(),
        }
    }
}
