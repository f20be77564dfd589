//! Native-messaging manifest: canonical rendering and idempotency checks.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::ops::PrivilegedOps;
use crate::registry::BrowserFamily;

/// Host name the 1Password extensions connect to.
pub const HOST_NAME: &str = "com.1password.1password";

/// Manifest filename under a native-messaging-hosts directory.
pub const MANIFEST_FILE: &str = "com.1password.1password.json";

const DESCRIPTION: &str = "1Password BrowserSupport";

/// 1Password addon ids permitted to talk to the helper (Firefox family).
pub const FIREFOX_ALLOWED_EXTENSIONS: &[&str] = &[
    "{0a75d802-9aed-41e7-8daa-24c067386e82}",
    "{25fc87fa-4d31-4fee-b5c1-c32a7844c063}",
    "{d634138d-c276-4fc8-924b-40a0ea21d284}",
];

/// 1Password extension origins permitted to talk to the helper (Chromium
/// family).
pub const CHROMIUM_ALLOWED_ORIGINS: &[&str] = &[
    "chrome-extension://hjlinigoblmkhjejkmbegnoaljkphmgo/",
    "chrome-extension://gejiddohjgogedgjnonbofjigllpkmbf/",
    "chrome-extension://khgocmkkpikpnmmkgmdnfckapcdkgfaf/",
    "chrome-extension://aeblfdkhhhdcdjpifhhbdiojplfjncoa/",
    "chrome-extension://dppgmdbiimibapkepcbdbmkaabgiofem/",
];

/// Family-specific allow-list fragment of the manifest. Chromium manifests
/// carry `allowed_origins`, Firefox manifests `allowed_extensions`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowList {
    Extensions(&'static [&'static str]),
    Origins(&'static [&'static str]),
}

impl BrowserFamily {
    /// The allow-list block for this family; `None` for `Unrecognized`.
    pub fn allow_list(self) -> Option<AllowList> {
        match self {
            BrowserFamily::Chromium => Some(AllowList::Origins(CHROMIUM_ALLOWED_ORIGINS)),
            BrowserFamily::Firefox => Some(AllowList::Extensions(FIREFOX_ALLOWED_EXTENSIONS)),
            BrowserFamily::Unrecognized => None,
        }
    }
}

/// A native messaging host manifest. Exactly one of the two allow-list
/// fields is present, depending on the browser family.
#[derive(Serialize, Deserialize, Debug)]
pub struct Manifest {
    pub name: String,
    pub description: String,
    pub path: PathBuf,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_extensions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_origins: Option<Vec<String>>,
}

/// Render the canonical manifest text for a wrapper path and allow-list.
///
/// The output is byte-for-byte stable for identical inputs; [`verify`]
/// relies on that to detect an already-correct installation.
pub fn render(wrapper_path: &Path, allow: AllowList) -> Result<String> {
    let mut manifest = Manifest {
        name: HOST_NAME.to_string(),
        description: DESCRIPTION.to_string(),
        path: wrapper_path.to_path_buf(),
        kind: "stdio".to_string(),
        allowed_extensions: None,
        allowed_origins: None,
    };
    match allow {
        AllowList::Extensions(ids) => {
            manifest.allowed_extensions = Some(ids.iter().map(|s| s.to_string()).collect());
        }
        AllowList::Origins(origins) => {
            manifest.allowed_origins = Some(origins.iter().map(|s| s.to_string()).collect());
        }
    }
    let mut json = serde_json::to_string_pretty(&manifest)?;
    json.push('\n');
    Ok(json)
}

/// Whether the manifest under `dir` already matches the expected
/// configuration.
///
/// The checks short-circuit from cheap to expensive: file existence first,
/// then the immutability attribute (when required), and only then the byte
/// comparison against [`render`].
pub fn verify(
    wrapper_path: &Path,
    allow: AllowList,
    dir: &Path,
    require_immutable: bool,
    ops: &dyn PrivilegedOps,
) -> Result<bool> {
    let manifest_file = dir.join(MANIFEST_FILE);
    if !manifest_file.exists() || !wrapper_path.exists() {
        return Ok(false);
    }
    if require_immutable && !ops.is_immutable(&manifest_file) {
        return Ok(false);
    }
    let current = fs::read_to_string(&manifest_file)?;
    Ok(current == render(wrapper_path, allow)?)
}
