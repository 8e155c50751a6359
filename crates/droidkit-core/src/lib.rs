#![allow(
    clippy::missing_errors_doc,
    reason = "Error enums carry their own docs"
)]

pub mod badging;
pub mod config;
pub mod devices;
pub mod runner;
pub mod utils;

use std::path::PathBuf;
use std::sync::LazyLock;
pub static CONFIG_DIR: LazyLock<PathBuf> = LazyLock::new(|| {
    utils::setup_droidkit_dir(&dirs::config_dir().unwrap_or_else(std::env::temp_dir))
});
pub static CACHE_DIR: LazyLock<PathBuf> = LazyLock::new(|| {
    utils::setup_droidkit_dir(&dirs::cache_dir().unwrap_or_else(std::env::temp_dir))
});
