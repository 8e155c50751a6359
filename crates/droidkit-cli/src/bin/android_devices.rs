use clap::{Parser, Subcommand};
use droidkit_cli::{logger::setup_logger, writeln_or_ignore};
use droidkit_core::{
    config::Config,
    devices::DeviceLister,
    runner::{CommandRunner, SystemRunner},
};
use log::error;
use std::io::Write;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "android-devices")]
#[command(about = "List the serials of connected Android devices", long_about = None)]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to the `adb` binary (overrides the config file)
    #[arg(long, global = true)]
    adb: Option<String>,

    /// Also print debug logs on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print available (not offline) serials, one per line
    #[command(visible_alias = "ls")]
    List {
        /// Print a JSON array instead
        #[arg(long)]
        json: bool,
    },

    /// Succeed only if SERIAL is available
    Contains { serial: String },

    /// Print the serial at INDEX (0-based, as listed)
    At { index: String },

    /// Fail with status 1 unless the selected device is available
    Check {
        /// Variable holding the selected serial (defaults to the config, then `ANDROID_SERIAL`)
        #[arg(long)]
        env: Option<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = setup_logger(cli.verbose) {
        eprintln!("Can't set up logging: {e}");
    }

    ExitCode::from(run(
        cli,
        Config::load_configuration_file(),
        SystemRunner,
        &mut std::io::stdout(),
        &mut std::io::stderr(),
    ))
}

const SUCCESS: u8 = 0;
const FAILURE: u8 = 1;

fn run<R: CommandRunner>(
    cli: Cli,
    config: Config,
    runner: R,
    out: &mut impl Write,
    err: &mut impl Write,
) -> u8 {
    let adb = cli.adb.unwrap_or(config.tools.adb);
    let mut lister = DeviceLister::new(runner, adb);

    match cli.command.unwrap_or(Commands::List { json: false }) {
        Commands::List { json } => {
            if json {
                match serde_json::to_string(lister.devices()) {
                    Ok(s) => writeln_or_ignore!(out, "{s}"),
                    Err(e) => {
                        error!("{e}");
                        writeln_or_ignore!(err, "{e}");
                        return FAILURE;
                    }
                }
            } else {
                for serial in lister.devices() {
                    writeln_or_ignore!(out, "{serial}");
                }
            }
            SUCCESS
        }
        Commands::Contains { serial } => {
            if lister.contains(&serial) {
                SUCCESS
            } else {
                FAILURE
            }
        }
        Commands::At { index } => match lister.serial_at(&index) {
            Some(serial) => {
                writeln_or_ignore!(out, "{serial}");
                SUCCESS
            }
            None => FAILURE,
        },
        Commands::Check { env } => {
            let var = env.unwrap_or(config.devices.serial_env);
            match lister.validate_env_selection(&var) {
                Ok(()) => SUCCESS,
                Err(e) => {
                    error!("{e}");
                    writeln_or_ignore!(err, "{e}");
                    FAILURE
                }
            }
        }
    }
}

#[allow(clippy::unwrap_used, reason = "tests")]
#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use droidkit_core::runner::RunError;

    const LISTING: &str = "List of devices attached\n\
        emulator-5554\tdevice\n\
        0123456789ABCDEF\toffline\n\
        R58M42ABCDE\tunauthorized\n";

    /// Answers every call with the same `adb devices` listing.
    struct Listing(&'static str);

    impl CommandRunner for Listing {
        fn run(&self, _program: &str, _args: &[&str]) -> Result<String, RunError> {
            Ok(self.0.to_string())
        }
    }

    fn run_with(args: &[&str], listing: &'static str) -> (u8, String, String) {
        let mut argv = vec!["android-devices"];
        argv.extend_from_slice(args);
        let cli = Cli::try_parse_from(argv).unwrap();
        let (mut out, mut err) = (Vec::new(), Vec::new());
        let code = run(cli, Config::default(), Listing(listing), &mut out, &mut err);
        (
            code,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn list_is_the_default() {
        let (code, out, _) = run_with(&[], LISTING);
        assert_eq!(code, SUCCESS);
        assert_eq!(out, "emulator-5554\nR58M42ABCDE\n");
    }

    #[test]
    fn list_as_json() {
        let (code, out, _) = run_with(&["list", "--json"], LISTING);
        assert_eq!(code, SUCCESS);
        assert_eq!(out, "[\"emulator-5554\",\"R58M42ABCDE\"]\n");
    }

    #[test]
    fn contains_sets_the_exit_code() {
        assert_eq!(run_with(&["contains", "R58M42ABCDE"], LISTING).0, SUCCESS);
        assert_eq!(
            run_with(&["contains", "0123456789ABCDEF"], LISTING).0,
            FAILURE
        );
    }

    #[test]
    fn at_prints_only_round_tripping_indexes() {
        let (code, out, _) = run_with(&["at", "1"], LISTING);
        assert_eq!(code, SUCCESS);
        assert_eq!(out, "R58M42ABCDE\n");

        let (code, out, _) = run_with(&["at", "01"], LISTING);
        assert_eq!(code, FAILURE);
        assert!(out.is_empty());
    }

    #[test]
    fn check_exits_1_when_selected_serial_is_gone() {
        std::env::set_var("DROIDKIT_CLI_TEST_OFFLINE_SERIAL", "0123456789ABCDEF");
        let (code, out, err) = run_with(
            &["check", "--env", "DROIDKIT_CLI_TEST_OFFLINE_SERIAL"],
            LISTING,
        );
        assert_eq!(code, 1);
        assert!(out.is_empty());
        assert_eq!(
            err,
            "selected device `0123456789ABCDEF` is not connected\n"
        );
    }

    #[test]
    fn check_succeeds_when_selected_serial_is_listed() {
        std::env::set_var("DROIDKIT_CLI_TEST_LISTED_SERIAL", "emulator-5554");
        let (code, _, _) = run_with(
            &["check", "--env", "DROIDKIT_CLI_TEST_LISTED_SERIAL"],
            LISTING,
        );
        assert_eq!(code, SUCCESS);
    }

    #[test]
    fn check_exits_1_without_devices() {
        std::env::set_var("DROIDKIT_CLI_TEST_NO_DEVICES_SERIAL", "emulator-5554");
        let (code, _, _) = run_with(
            &["check", "--env", "DROIDKIT_CLI_TEST_NO_DEVICES_SERIAL"],
            "List of devices attached\n",
        );
        assert_eq!(code, 1);
    }

    #[test]
    fn check_with_custom_env() {
        let cli =
            Cli::try_parse_from(["android-devices", "check", "--env", "MY_SERIAL", "--adb", "/sdk/adb"])
                .unwrap();
        assert_eq!(cli.adb.as_deref(), Some("/sdk/adb"));
        assert!(matches!(cli.command, Some(Commands::Check { env: Some(ref v) }) if v == "MY_SERIAL"));
    }
}
