//! Climatrends Core Library
//!
//! Shared pieces used by the server binary:
//! - Configuration loading (XDG-compliant)
//! - App-wide constants

mod config;

pub use config::{find_config_file, get_xdg_data_dir, load_config, ConfigSource};

/// Application name used for XDG paths
pub const APP_NAME: &str = "climatrends";

/// Default server port
pub const DEFAULT_PORT: u16 = 9810;
