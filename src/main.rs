//! CLI entry point for the Flatpak browser integration setup.

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use flatpak_browser_integration::cli::Cli;
use flatpak_browser_integration::error::Error;
use flatpak_browser_integration::ops::SystemOps;
use flatpak_browser_integration::registry::{BrowserFamily, Registry};
use flatpak_browser_integration::setup::Setup;

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("flatpak_browser_integration=debug,warn")
    } else {
        EnvFilter::new("flatpak_browser_integration=info,warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
}

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_logging(cli.debug);

    println!("This tool sets up 1Password in a Flatpak browser.");
    println!(
        "Note: it makes it possible for any Flatpak application to integrate, \
         not just browsers. Consider whether that is worth the risk."
    );
    println!();

    let family = match cli.family.as_deref() {
        Some(name) => match BrowserFamily::parse(name) {
            Some(family) => Some(family),
            None => {
                eprintln!("Invalid --family '{name}': expected chromium or firefox");
                return ExitCode::from(1);
            }
        },
        None => None,
    };

    let home = match dirs::home_dir() {
        Some(home) => home,
        None => {
            eprintln!("Error: {}", Error::HomeNotFound);
            return ExitCode::from(1);
        }
    };

    let registry = match Registry::detect() {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("Error querying installed Flatpak applications: {e}");
            return ExitCode::from(1);
        }
    };

    let ops = SystemOps;
    let setup = Setup::new(home, registry, &ops).helper_path(cli.helper_path.clone());

    match setup.run(cli.browser.as_deref(), family) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}
