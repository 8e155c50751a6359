//! Package name of an APK, scraped from `aapt dump badging`.
//!
//! Only the first line of the dump matters:
//! ```txt
//! package: name='com.example.app' versionCode='1' versionName='1.0'
//! ```

use crate::runner::CommandRunner;
use log::{debug, error};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

pub const USAGE: &str = "Command expects the APK as an argument";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("{}", USAGE)]
pub struct UsageError;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BadgingError {
    #[error("aapt produced no output")]
    NoOutput,
    #[error("no quoted package name in `{0}`")]
    NoQuotedToken(String),
    #[error("empty package name in `{0}`")]
    EmptyName(String),
}

/// Checks the raw CLI arguments: exactly one, mentioning `.apk` somewhere.
///
/// This is a sanity check on the text, the file isn't opened.
pub fn validate_args<S: AsRef<str>>(args: &[S]) -> Result<&str, UsageError> {
    match args {
        [apk] if apk.as_ref().contains(".apk") => Ok(apk.as_ref()),
        _ => Err(UsageError),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageName(String);

impl PackageName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pulls the package name out of a badging dump.
pub fn extract_package_name(dump: &str) -> Result<PackageName, BadgingError> {
    // Greedy on purpose: spans from the first `'` to the last one on the line,
    // as long as no `"` sits in between. Only its first word is kept.
    static RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r#"'([^"]*)'"#).unwrap_or_else(|_| unreachable!()));

    let first_line = dump.lines().next().ok_or(BadgingError::NoOutput)?;
    let quoted = RE
        .find(first_line)
        .ok_or_else(|| BadgingError::NoQuotedToken(first_line.to_string()))?
        .as_str();
    let name: String = quoted
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .chars()
        .filter(|&c| c != '\'')
        .collect();

    if name.is_empty() {
        return Err(BadgingError::EmptyName(first_line.to_string()));
    }
    Ok(PackageName(name))
}

/// Runs `aapt dump badging` on APKs.
#[derive(Debug)]
pub struct PackageNameExtractor<R> {
    runner: R,
    aapt: String,
}

impl<R: CommandRunner> PackageNameExtractor<R> {
    pub fn new<S: Into<String>>(runner: R, aapt: S) -> Self {
        Self {
            runner,
            aapt: aapt.into(),
        }
    }

    /// A failing `aapt` is logged and then handled like an empty dump.
    pub fn package_name(&self, apk: &str) -> Result<PackageName, BadgingError> {
        let dump = self
            .runner
            .run(&self.aapt, &["dump", "badging", apk])
            .unwrap_or_else(|err| {
                error!("package_name({apk}) -> {err}");
                String::new()
            });
        let name = extract_package_name(&dump)?;
        debug!("{apk} -> {name}");
        Ok(name)
    }
}
