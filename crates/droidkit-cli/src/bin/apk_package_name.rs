use clap::Parser;
use droidkit_cli::{logger::setup_logger, writeln_or_ignore};
use droidkit_core::{
    badging::{validate_args, PackageNameExtractor},
    config::Config,
    runner::{CommandRunner, SystemRunner},
};
use log::error;
use std::io::Write;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "apk-package-name")]
#[command(about = "Print the package name declared by an APK", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the `aapt` binary (overrides the config file)
    #[arg(long)]
    aapt: Option<String>,

    /// Also print debug logs on stderr
    #[arg(short, long)]
    verbose: bool,

    /// The APK to inspect
    #[arg(value_name = "APK")]
    args: Vec<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = setup_logger(cli.verbose) {
        eprintln!("Can't set up logging: {e}");
    }

    ExitCode::from(run(
        cli,
        Config::load_configuration_file,
        SystemRunner,
        &mut std::io::stdout(),
        &mut std::io::stderr(),
    ))
}

const SUCCESS: u8 = 0;
const FAILURE: u8 = 1;
const USAGE_FAILURE: u8 = 2;

/// `config` is only read once the arguments are known to be usable.
fn run<R: CommandRunner>(
    cli: Cli,
    config: impl FnOnce() -> Config,
    runner: R,
    out: &mut impl Write,
    err: &mut impl Write,
) -> u8 {
    let apk = match validate_args(&cli.args) {
        Ok(apk) => apk,
        Err(usage) => {
            writeln_or_ignore!(err, "{usage}");
            return USAGE_FAILURE;
        }
    };

    let aapt = cli.aapt.unwrap_or_else(|| config().tools.aapt);
    match PackageNameExtractor::new(runner, aapt).package_name(apk) {
        Ok(name) => {
            writeln_or_ignore!(out, "{name}");
            SUCCESS
        }
        Err(e) => {
            error!("{apk}: {e}");
            writeln_or_ignore!(err, "{apk}: {e}");
            FAILURE
        }
    }
}
