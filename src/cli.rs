//! CLI parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::setup::DEFAULT_HELPER;

/// Configure 1Password native messaging for a Flatpak browser.
#[derive(Parser, Debug)]
#[command(name = "flatpak-browser-integration")]
#[command(about = "Set up 1Password native messaging for Flatpak-sandboxed browsers")]
#[command(version)]
pub struct Cli {
    /// Flatpak application ID of the browser (e.g. com.google.Chrome);
    /// prompted for interactively when omitted
    #[arg(short = 'b', long = "browser")]
    pub browser: Option<String>,

    /// Browser family override for unrecognized browsers: chromium or firefox
    #[arg(short = 'f', long = "family")]
    pub family: Option<String>,

    /// Path to the 1Password helper binary
    #[arg(long = "helper-path", default_value = DEFAULT_HELPER)]
    pub helper_path: PathBuf,

    /// Enable debug logging
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
