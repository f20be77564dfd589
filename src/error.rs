//! Error types for the integration setup.

use thiserror::Error;

/// Main error type for the setup run.
///
/// Every variant is fatal unless the caller explicitly downgrades it;
/// recovery is always "fix the environment and re-run setup", never a
/// rollback.
#[derive(Error, Debug)]
pub enum Error {
    #[error("browser '{0}' is not an installed Flatpak application; re-run setup and pick an installed browser")]
    BrowserNotInstalled(String),

    #[error("browser '{0}' is not recognized as Chromium-based or Firefox-based; pass --family chromium|firefox")]
    UnclassifiableBrowser(String),

    #[error("could not determine the current user's home directory")]
    HomeNotFound,

    #[error("no browser selected")]
    NoBrowserSelected,

    #[error("command failed: {0}")]
    CommandFailed(String),

    #[error("could not add '{token}' to {file}: add it manually and re-run setup")]
    AllowListUpdate { file: String, token: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
