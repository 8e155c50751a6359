//! Serial numbers of the devices `adb` can currently talk to.
//!
//! The list is never persisted: every [`DeviceLister::refresh`]
//! re-runs `adb devices` and replaces the cached serials.

use crate::runner::CommandRunner;
use log::{debug, error, warn};
use serde::Serialize;
use std::fmt;

/// Name of the variable `adb` itself reads to pick a default device.
pub const ANDROID_SERIAL_ENV: &str = "ANDROID_SERIAL";

/// Unique serial identifier, as printed by `adb devices`
#[derive(Debug, Serialize, Clone, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Serial(String);

impl Serial {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Serial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for Serial {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

/// Status column of an `adb devices` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceState {
    Device,
    Offline,
    Unauthorized,
    /// Anything else ADB may report: `recovery`, `sideload`, `no permissions (...)`...
    Other(String),
}

impl DeviceState {
    pub fn from_status(status: &str) -> Self {
        match status {
            "device" => Self::Device,
            "offline" => Self::Offline,
            "unauthorized" => Self::Unauthorized,
            s => Self::Other(s.to_string()),
        }
    }
}

/// Parses `adb devices` output into `(serial, state)` pairs.
///
/// The first line is the `List of devices attached` header.
/// Blank lines are skipped. A line without a status column still names a device.
pub fn parse_device_lines(output: &str) -> Vec<(Serial, DeviceState)> {
    output
        .lines()
        .skip(1) // header
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let serial = fields.next()?;
            let state = fields.next().map_or_else(
                || {
                    debug!("`adb devices` line without status: {line:?}");
                    DeviceState::Other(String::new())
                },
                DeviceState::from_status,
            );
            Some((Serial(serial.to_string()), state))
        })
        .collect()
}

/// Serials of every listed device that is not `offline`, in listing order.
///
/// Duplicates are kept.
pub fn available_serials(output: &str) -> Vec<Serial> {
    parse_device_lines(output)
        .into_iter()
        .filter(|(_, state)| *state != DeviceState::Offline)
        .map(|(serial, _)| serial)
        .collect()
}

/// Position in a device listing, given either as a number or as user text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerialIndex<'a> {
    Int(usize),
    Text(&'a str),
}

impl SerialIndex<'_> {
    /// Text only counts when it survives `text -> integer -> text` untouched,
    /// so `"02"`, `"+2"` or `" 2"` never resolve.
    pub fn resolve(self) -> Option<usize> {
        match self {
            Self::Int(i) => Some(i),
            Self::Text(s) => {
                let n: i64 = s.parse().ok()?;
                if n.to_string() != s {
                    return None;
                }
                usize::try_from(n).ok()
            }
        }
    }
}

impl From<usize> for SerialIndex<'_> {
    fn from(i: usize) -> Self {
        Self::Int(i)
    }
}

impl<'a> From<&'a str> for SerialIndex<'a> {
    fn from(s: &'a str) -> Self {
        Self::Text(s)
    }
}

impl<'a> From<&'a String> for SerialIndex<'a> {
    fn from(s: &'a String) -> Self {
        Self::Text(s)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("no device selected: `{0}` is not set")]
    Unset(String),
    #[error("selected device `{0}` is not connected")]
    NotConnected(String),
}

/// Cached view over `adb devices`.
#[derive(Debug)]
pub struct DeviceLister<R> {
    runner: R,
    adb: String,
    serials: Vec<Serial>,
}

impl<R: CommandRunner> DeviceLister<R> {
    /// Builds the lister and runs a first [`Self::refresh`].
    pub fn new<S: Into<String>>(runner: R, adb: S) -> Self {
        let mut lister = Self {
            runner,
            adb: adb.into(),
            serials: vec![],
        };
        lister.refresh();
        lister
    }

    /// Re-runs `adb devices`.
    ///
    /// A failing `adb` is reported in the logs and treated as "no devices".
    pub fn refresh(&mut self) -> &[Serial] {
        let output = self
            .runner
            .run(&self.adb, &["devices"])
            .unwrap_or_else(|err| {
                error!("refresh() -> {err}");
                String::new()
            });
        self.serials = available_serials(&output);
        debug!("{} available device(s)", self.serials.len());
        &self.serials
    }

    /// Serials from the last refresh.
    pub fn devices(&self) -> &[Serial] {
        &self.serials
    }

    pub fn contains(&self, serial: &str) -> bool {
        self.serials.iter().any(|s| s == serial)
    }

    pub fn serial_at<'a, I: Into<SerialIndex<'a>>>(&self, index: I) -> Option<&Serial> {
        index.into().resolve().and_then(|i| self.serials.get(i))
    }

    /// Refreshes, then checks that `expected` is one of the available serials.
    pub fn validate_selection(&mut self, expected: Option<&str>) -> Result<(), SelectionError> {
        self.refresh();
        match expected {
            Some(serial) if self.contains(serial) => Ok(()),
            Some(serial) => {
                warn!("{serial} not in {:?}", self.serials);
                Err(SelectionError::NotConnected(serial.to_string()))
            }
            None => Err(SelectionError::Unset(String::new())),
        }
    }

    /// [`Self::validate_selection`] against the value of the `var` environment variable.
    pub fn validate_env_selection(&mut self, var: &str) -> Result<(), SelectionError> {
        let expected = std::env::var(var).ok();
        self.validate_selection(expected.as_deref())
            .map_err(|e| match e {
                SelectionError::Unset(_) => SelectionError::Unset(var.to_string()),
                e @ SelectionError::NotConnected(_) => e,
            })
    }
}
