//! Everything that leaves the process goes through here.
//!
//! `adb` and `aapt` are never spawned directly by the parsers:
//! they ask a [`CommandRunner`] for the text output of a program,
//! so tests can hand them canned output instead of real tools.
//!
//! [`SystemRunner`] is the only implementation that touches `std::process`.
//! It blocks until the child exits; there is no timeout.

use log::{error, info};
use std::process::Command;

#[cfg(target_os = "windows")]
use std::os::windows::process::CommandExt;

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("{program} failed to start: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} returned non-success status ({code}): {msg}")]
    NonZero {
        program: String,
        code: i32,
        msg: String,
    },
}

/// Capability to run an external program and capture its standard output.
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<String, RunError>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, program: &str, args: &[&str]) -> Result<String, RunError> {
        (**self).run(program, args)
    }
}

pub fn to_trimmed_utf8(v: &[u8]) -> String {
    String::from_utf8_lossy(v).trim_end().to_string()
}

/// Runs programs found on `PATH` (or given as a path).
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<String, RunError> {
        let mut cmd = Command::new(program);
        cmd.args(args);
        #[cfg(target_os = "windows")]
        let cmd = cmd.creation_flags(0x0800_0000); // do not open a cmd window

        info!("Ran command: {program} {}", args.join(" "));

        let o = cmd.output().map_err(|e| {
            error!("{program}: {e}");
            RunError::Spawn {
                program: program.to_string(),
                source: e,
            }
        })?;

        let stdout = to_trimmed_utf8(&o.stdout);
        if o.status.success() {
            Ok(stdout)
        } else {
            let stderr = to_trimmed_utf8(&o.stderr);
            // Android tools don't always report errors on `stderr`
            let msg = if stderr.is_empty() { stdout } else { stderr };
            Err(RunError::NonZero {
                program: program.to_string(),
                code: o.status.code().unwrap_or(-1),
                msg,
            })
        }
    }
}

#[allow(clippy::unwrap_used, reason = "tests")]
#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::io;

    /// Replays queued outputs and records every invocation.
    #[derive(Debug, Default)]
    pub struct Canned {
        outputs: RefCell<Vec<Result<String, RunError>>>,
        pub calls: RefCell<Vec<Vec<String>>>,
    }

    impl Canned {
        pub fn new() -> Self {
            Self::default()
        }
        #[must_use]
        pub fn then(self, out: &str) -> Self {
            self.outputs.borrow_mut().push(Ok(out.to_string()));
            self
        }
        #[must_use]
        pub fn then_missing(self, program: &str) -> Self {
            self.outputs.borrow_mut().push(Err(RunError::Spawn {
                program: program.to_string(),
                source: io::Error::from(io::ErrorKind::NotFound),
            }));
            self
        }
    }

    impl CommandRunner for Canned {
        fn run(&self, program: &str, args: &[&str]) -> Result<String, RunError> {
            let mut call = vec![program.to_string()];
            call.extend(args.iter().map(|a| (*a).to_string()));
            self.calls.borrow_mut().push(call);

            let mut outputs = self.outputs.borrow_mut();
            if outputs.is_empty() {
                Ok(String::new())
            } else {
                outputs.remove(0)
            }
        }
    }

    #[test]
    fn trims_trailing_whitespace_only() {
        assert_eq!(to_trimmed_utf8(b"  a\tb\r\n\n"), "  a\tb");
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let err = SystemRunner
            .run("droidkit-surely-not-installed-anywhere", &[])
            .unwrap_err();
        assert!(matches!(err, RunError::Spawn { .. }));
    }

    #[test]
    fn canned_runner_records_calls() {
        let runner = Canned::new().then("x");
        assert_eq!(runner.run("adb", &["devices"]).unwrap(), "x");
        assert_eq!(runner.run("adb", &["devices"]).unwrap(), "");
        assert_eq!(runner.calls.borrow().len(), 2);
        assert_eq!(runner.calls.borrow()[0], ["adb", "devices"]);
    }
}
