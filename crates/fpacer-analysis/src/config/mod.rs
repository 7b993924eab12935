//! Configuration file parsing for Frame Pacer
//!
//! Supports:
//! - `.fpacer/config.toml` - Analysis thresholds and output preferences

pub mod settings;
pub mod types;

pub use settings::{init_config_dir, load_settings, load_settings_file, CONFIG_FILENAME, FPACER_DIR};
pub use types::*;
