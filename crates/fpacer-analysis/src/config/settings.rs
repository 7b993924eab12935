//! Settings parser for .fpacer/config.toml

use super::types::Settings;
use fpacer_core::prelude::*;
use std::path::Path;

pub const CONFIG_FILENAME: &str = "config.toml";
pub const FPACER_DIR: &str = ".fpacer";

const DEFAULT_CONFIG: &str = r#"# Frame Pacer Configuration

[analysis]
target_candidates = [30]   # Frame-rate targets the detector chooses between
slow_frame_factor = 1.5    # Slow frame: frame time > target frame time × factor
instability_factor = 1.3   # Unstable frame: frame time > previous frame × factor

[output]
format = "ndjson"          # ndjson | json | summary
include_frames = false     # Include raw frame rows in JSON output
"#;

/// Load settings from `.fpacer/config.toml` under `project_path`.
///
/// A missing, unreadable, unparsable, or invalid file yields defaults; the
/// problem is logged and never surfaced as an error.
pub fn load_settings(project_path: &Path) -> Settings {
    let config_path = project_path.join(FPACER_DIR).join(CONFIG_FILENAME);

    if !config_path.exists() {
        debug!("No config file at {:?}, using defaults", config_path);
        return Settings::default();
    }

    match load_settings_file(&config_path) {
        Ok(settings) => {
            debug!("Loaded settings from {:?}", config_path);
            settings
        }
        Err(e) => {
            warn!("Ignoring {:?}: {}", config_path, e);
            Settings::default()
        }
    }
}

/// Load settings from an explicit file path.
///
/// # Errors
///
/// Returns [`Error::ConfigNotFound`] if the file does not exist and
/// [`Error::Config`] if it cannot be read, parsed, or validated.
pub fn load_settings_file(path: &Path) -> Result<Settings> {
    if !path.exists() {
        return Err(Error::config_not_found(path));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::config(format!("Failed to read {}: {}", path.display(), e)))?;

    let settings: Settings = toml::from_str(&content)
        .map_err(|e| Error::config(format!("Failed to parse {}: {}", path.display(), e)))?;

    settings.analysis.validate()?;
    Ok(settings)
}

/// Create `.fpacer/config.toml` with commented defaults if it does not exist.
pub fn init_config_dir(project_path: &Path) -> Result<()> {
    let fpacer_dir = project_path.join(FPACER_DIR);

    if !fpacer_dir.exists() {
        std::fs::create_dir_all(&fpacer_dir)
            .map_err(|e| Error::config(format!("Failed to create .fpacer dir: {}", e)))?;
    }

    let config_path = fpacer_dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        std::fs::write(&config_path, DEFAULT_CONFIG)
            .map_err(|e| Error::config(format!("Failed to write config.toml: {}", e)))?;
        info!("Created default config at {:?}", config_path);
    }

    Ok(())
}
