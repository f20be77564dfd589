//! Locates the directory where a browser's native-messaging manifests live.
//!
//! Flatpak browsers keep their profile under `~/.var/app/<id>/`, but the
//! exact layout varies per browser, so both families use a heuristic search
//! with a conventional fallback. The resolver never fails; an unwritable
//! fallback surfaces later, when the manifest is written.

use std::fs;
use std::path::{Path, PathBuf};

use crate::registry::BrowserFamily;

/// Sandboxed application directory for a Flatpak browser.
pub fn app_dir(home: &Path, browser_id: &str) -> PathBuf {
    home.join(".var/app").join(browser_id)
}

/// Resolve the native-messaging-hosts directory for a classified browser.
/// Returns `None` only for `Unrecognized`; callers settle the family first.
pub fn resolve_directory(home: &Path, family: BrowserFamily, browser_id: &str) -> Option<PathBuf> {
    match family {
        BrowserFamily::Chromium => Some(chromium_hosts_dir(home, browser_id)),
        BrowserFamily::Firefox => Some(firefox_hosts_dir(home, browser_id)),
        BrowserFamily::Unrecognized => None,
    }
}

/// Chromium family: any directory literally named `NativeMessagingHosts`
/// under the browser's `config` tree, at any depth.
pub fn chromium_hosts_dir(home: &Path, browser_id: &str) -> PathBuf {
    let app = app_dir(home, browser_id);
    let pattern = format!("{}/config/**/NativeMessagingHosts", app.display());
    if let Ok(entries) = glob::glob(&pattern) {
        for entry in entries.flatten() {
            if entry.is_dir() {
                return entry;
            }
        }
    }
    app.join(".config/google-chrome/NativeMessagingHosts")
}

/// Firefox family: find a profile root among the app dir's immediate
/// subdirectories, then one level deeper (some browsers nest the profile
/// under a vendor directory, e.g. `.mozilla/firefox`).
///
/// The manifest directory is always appended to the OUTER candidate, even
/// when the nested directory matched: Firefox reads
/// `.mozilla/native-messaging-hosts`, not `.mozilla/firefox/...`. Keep it
/// that way.
pub fn firefox_hosts_dir(home: &Path, browser_id: &str) -> PathBuf {
    let app = app_dir(home, browser_id);
    for outer in subdirectories(&app) {
        if is_firefox_profile_root(&outer) {
            return outer.join("native-messaging-hosts");
        }
        for inner in subdirectories(&outer) {
            if is_firefox_profile_root(&inner) {
                return outer.join("native-messaging-hosts");
            }
        }
    }
    app.join(".mozilla/native-messaging-hosts")
}

/// A directory qualifies as a Firefox profile root if it exists, is not a
/// cache directory, and carries a `profiles.ini`.
fn is_firefox_profile_root(dir: &Path) -> bool {
    if !dir.is_dir() {
        return false;
    }
    match dir.file_name().and_then(|n| n.to_str()) {
        Some("cache") | Some(".cache") | None => return false,
        _ => {}
    }
    dir.join("profiles.ini").is_file()
}

/// Immediate subdirectories, sorted by name so the scan order is stable
/// across filesystems.
fn subdirectories(dir: &Path) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = match fs::read_dir(dir) {
        Ok(entries) => entries
            .flatten()
            .map(|e| e.path())
            .filter(|p| p.is_dir())
            .collect(),
        Err(_) => Vec::new(),
    };
    dirs.sort();
    dirs
}
