use droidkit_core::{utils::NAME, CACHE_DIR};
use fern::{
    colors::{Color, ColoredLevelConfig},
    FormatCallback,
};
use log::Record;
use std::path::PathBuf;
use std::{
    fmt::{self, Arguments},
    fs::OpenOptions,
};

/// `CACHE_DIR/droidkit_{date}.log`
pub fn log_file_path() -> PathBuf {
    CACHE_DIR.join(format!(
        "{NAME}_{}.log",
        chrono::Local::now().format("%Y%m%d")
    ))
}

/// `HH:MM:SS.mmm LEVEL target: message`
fn write_line(out: FormatCallback, level: &dyn fmt::Display, message: &Arguments, record: &Record) {
    out.finish(format_args!(
        "{} {level:5} {}: {message}",
        chrono::Local::now().format("%H:%M:%S%.3f"),
        record.target(),
    ));
}

fn format_plain(out: FormatCallback, message: &Arguments, record: &Record) {
    write_line(out, &record.level(), message, record);
}

fn format_colored(out: FormatCallback, message: &Arguments, record: &Record) {
    let colors = ColoredLevelConfig::new()
        .info(Color::Green)
        .debug(Color::BrightBlack);
    write_line(out, &colors.color(record.level()), message, record);
}

/// Sets up logging to `stderr` and to a daily file in `CACHE_DIR`.
///
/// `stdout` is left alone: it only carries command results.
pub fn setup_logger(verbose: bool) -> Result<(), fern::InitError> {
    let default_log_level = log::LevelFilter::Warn;
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path())?;

    let file_dispatcher = fern::Dispatch::new()
        .format(format_plain)
        .level(default_log_level)
        // Rust compiler makes module names use _ instead of -
        .level_for("droidkit_core", log::LevelFilter::Debug)
        .level_for("droidkit_cli", log::LevelFilter::Debug)
        .chain(log_file);

    let stderr_level = if verbose {
        log::LevelFilter::Debug
    } else {
        default_log_level
    };
    let stderr_dispatcher = fern::Dispatch::new()
        .format(format_colored)
        .level(default_log_level)
        .level_for("droidkit_core", stderr_level)
        .level_for("droidkit_cli", stderr_level)
        .chain(std::io::stderr());

    fern::Dispatch::new()
        .chain(stderr_dispatcher)
        .chain(file_dispatcher)
        .apply()?;

    Ok(())
}
