//! Persisted configuration record, reused across reruns.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::registry::{BrowserFamily, Registry};

/// Record filename under `~/.config`.
pub const CONFIG_FILE: &str = "1password-flatpak-browser-integration-config.json";

/// The browser/paths chosen on the first successful run. One record per
/// installation; reruns reuse it instead of re-discovering.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ConfigRecord {
    pub flatpak_browser_id: String,
    pub browser_type: BrowserFamily,
    pub wrapper_path: PathBuf,
    pub manifest_path: PathBuf,
}

pub fn config_path(home: &Path) -> PathBuf {
    home.join(".config").join(CONFIG_FILE)
}

/// Load the persisted record, if any, and revalidate it against the
/// installed applications. A record naming a browser that is no longer
/// installed is fatal: silently reusing it would configure the wrong
/// browser.
pub fn load(home: &Path, registry: &Registry) -> Result<Option<ConfigRecord>> {
    let path = config_path(home);
    if !path.exists() {
        return Ok(None);
    }
    tracing::info!("existing configuration found at {}, loading", path.display());
    let record: ConfigRecord = serde_json::from_str(&fs::read_to_string(&path)?)?;
    if !registry.is_installed(&record.flatpak_browser_id) {
        return Err(Error::BrowserNotInstalled(record.flatpak_browser_id));
    }
    tracing::info!(
        "using browser {} ({}) from config",
        record.flatpak_browser_id,
        record.browser_type.as_str()
    );
    Ok(Some(record))
}

/// Persist the record unless one already exists. Reruns rely on
/// resolve/verify, never on replacing the stored record.
pub fn save(home: &Path, record: &ConfigRecord) -> Result<()> {
    let path = config_path(home);
    if path.exists() {
        tracing::debug!("keeping existing configuration at {}", path.display());
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut json = serde_json::to_string_pretty(record)?;
    json.push('\n');
    fs::write(&path, json)?;
    tracing::info!("saved configuration to {}", path.display());
    Ok(())
}
