use log::error;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Canonical name of the toolkit, also used for its directories and log files
pub const NAME: &str = "droidkit";

/// `<dir>/droidkit`, created if needed.
///
/// Failing to create it is only logged: callers find out when they write into it.
pub fn setup_droidkit_dir(dir: &Path) -> PathBuf {
    let dir = dir.join(NAME);
    if let Err(e) = fs::create_dir_all(&dir) {
        error!("Can't create directory {dir:?}: {e}");
    }
    dir
}
