//! Shared Mozilla-family manifest under `~/.mozilla/native-messaging-hosts`.
//!
//! Every Firefox-derived browser that relies on the stock manifest lookup
//! reads this one location, so there is exactly one global manifest per
//! machine. After writing it the coordinator marks it immutable with
//! `chattr +i` so no single browser setup can edit a file the others
//! depend on.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::manifest::{self, AllowList, FIREFOX_ALLOWED_EXTENSIONS, MANIFEST_FILE};
use crate::ops::PrivilegedOps;
use crate::registry::BROWSERS_NOT_USING_MOZILLA;
use crate::wrapper::WRAPPER_FILE;

/// Global native-messaging-hosts directory for the Mozilla family.
pub fn global_hosts_dir(home: &Path) -> PathBuf {
    home.join(".mozilla/native-messaging-hosts")
}

/// Global copy of the wrapper script, referenced by the global manifest.
pub fn global_wrapper_path(home: &Path) -> PathBuf {
    global_hosts_dir(home).join(WRAPPER_FILE)
}

/// Create or refresh the global manifest for a Firefox-family browser.
///
/// Browsers in [`BROWSERS_NOT_USING_MOZILLA`] ship their own integration
/// and are skipped. When the existing global manifest already verifies
/// (including the immutability attribute), nothing is written.
pub fn ensure_global_manifest(
    home: &Path,
    browser_id: &str,
    wrapper_path: &Path,
    ops: &dyn PrivilegedOps,
) -> Result<()> {
    if BROWSERS_NOT_USING_MOZILLA.contains(&browser_id) {
        return Ok(());
    }

    let hosts_dir = global_hosts_dir(home);
    let global_wrapper = global_wrapper_path(home);
    let manifest_file = hosts_dir.join(MANIFEST_FILE);
    let allow = AllowList::Extensions(FIREFOX_ALLOWED_EXTENSIONS);

    if manifest::verify(&global_wrapper, allow, &hosts_dir, true, ops)? {
        tracing::info!("already added to {}", manifest_file.display());
        return Ok(());
    }

    tracing::info!("setting up global Mozilla manifest");

    fs::create_dir_all(&hosts_dir)?;
    fs::copy(wrapper_path, &global_wrapper)?;

    ops.grant_filesystem_access(browser_id, &hosts_dir)?;

    // The attribute may simply not be set yet; clearing it is best-effort.
    if let Err(e) = ops.clear_immutable(&manifest_file) {
        tracing::debug!("clearing immutable attribute: {e}");
    }

    fs::write(&manifest_file, manifest::render(&global_wrapper, allow)?)?;

    tracing::info!(
        "marking {} read-only with chattr +i; undo with: sudo chattr -i {}",
        manifest_file.display(),
        manifest_file.display()
    );
    if let Err(e) = ops.set_immutable(&manifest_file) {
        tracing::error!(
            "could not mark {} immutable: {e}; other Mozilla browsers may overwrite it",
            manifest_file.display()
        );
    } else {
        tracing::info!("created and locked {}", manifest_file.display());
    }

    Ok(())
}
