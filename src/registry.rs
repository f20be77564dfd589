//! Browser classification tables and the installed-Flatpak query.

use std::process::Command;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Chromium-family Flatpak application ids (incomplete by nature; unknown
/// ids can still be classified manually).
pub const CHROMIUM_BROWSERS: &[&str] = &[
    "com.google.Chrome",
    "com.brave.Browser",
    "com.vivaldi.Vivaldi",
    "com.opera.Opera",
    "com.microsoft.Edge",
    "ru.yandex.Browser",
    "org.chromium.Chromium",
    "io.github.ungoogled_software.ungoogled_chromium",
];

/// Firefox-family Flatpak application ids.
pub const FIREFOX_BROWSERS: &[&str] = &[
    "org.mozilla.firefox",
    "one.ablaze.floorp",
    "io.gitlab.librewolf-community",
    "org.torproject.torbrowser-launcher",
    "app.zen_browser.zen",
    "org.garudalinux.firedragon",
    "net.mullvad.MullvadBrowser",
    "net.waterfox.waterfox",
];

/// Firefox-family browsers that already look up manifests on their own and
/// must not be pointed at the shared `~/.mozilla` location.
pub const BROWSERS_NOT_USING_MOZILLA: &[&str] = &[
    "org.mozilla.firefox",
    "io.gitlab.librewolf-community",
    "net.waterfox.waterfox",
];

/// Extension-protocol family of a browser. Decides which allow-list block
/// the manifest carries and which directory heuristic applies.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BrowserFamily {
    Chromium,
    Firefox,
    Unrecognized,
}

impl BrowserFamily {
    pub fn as_str(self) -> &'static str {
        match self {
            BrowserFamily::Chromium => "chromium",
            BrowserFamily::Firefox => "firefox",
            BrowserFamily::Unrecognized => "unrecognized",
        }
    }

    /// Parse a manually supplied family name. Only the two concrete
    /// families are accepted.
    pub fn parse(s: &str) -> Option<BrowserFamily> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chromium" => Some(BrowserFamily::Chromium),
            "firefox" => Some(BrowserFamily::Firefox),
            _ => None,
        }
    }
}

/// Classify a Flatpak application id by membership in the static tables.
/// Ids absent from both tables are `Unrecognized`.
pub fn classify(browser_id: &str) -> BrowserFamily {
    if CHROMIUM_BROWSERS.contains(&browser_id) {
        BrowserFamily::Chromium
    } else if FIREFOX_BROWSERS.contains(&browser_id) {
        BrowserFamily::Firefox
    } else {
        BrowserFamily::Unrecognized
    }
}

static INSTALLED: OnceCell<Vec<String>> = OnceCell::new();

/// The set of installed Flatpak applications, queried once per process.
pub struct Registry {
    installed: Vec<String>,
}

impl Registry {
    /// Query `flatpak list` for installed application ids. The query runs
    /// at most once per process; later calls reuse the cached list.
    pub fn detect() -> Result<Registry> {
        let installed = INSTALLED.get_or_try_init(query_flatpak_list)?;
        Ok(Registry {
            installed: installed.clone(),
        })
    }

    /// Build a registry from a known list, bypassing the `flatpak` query.
    pub fn with_installed(installed: Vec<String>) -> Registry {
        Registry { installed }
    }

    pub fn installed(&self) -> &[String] {
        &self.installed
    }

    pub fn is_installed(&self, browser_id: &str) -> bool {
        self.installed.iter().any(|id| id == browser_id)
    }

    /// Filter a candidate table down to the installed ids, preserving the
    /// candidate order.
    pub fn filter_installed<'a>(&self, candidates: &[&'a str]) -> Vec<&'a str> {
        candidates
            .iter()
            .copied()
            .filter(|id| self.is_installed(id))
            .collect()
    }
}

fn query_flatpak_list() -> Result<Vec<String>> {
    let output = Command::new("flatpak")
        .args(["list", "--app", "--columns=application"])
        .output()
        .map_err(|e| Error::CommandFailed(format!("flatpak list: {e}")))?;
    if !output.status.success() {
        return Err(Error::CommandFailed(format!(
            "flatpak list exited with {}",
            output.status
        )));
    }
    Ok(String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}
