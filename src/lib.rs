//! # flatpak-browser-integration
//!
//! Configure **1Password native messaging** for browsers installed as
//! **Flatpaks**:
//!
//! - Discover installed Flatpak browsers and classify them as
//!   Chromium-family or Firefox-family
//! - Resolve the browser-specific `native-messaging-hosts` directory inside
//!   the sandboxed profile
//! - Generate the host manifest and verify it idempotently across reruns
//! - Maintain the shared Mozilla-family manifest under
//!   `~/.mozilla/native-messaging-hosts`, locked with `chattr +i`
//! - Persist the chosen browser/paths so later runs skip discovery
//!
//! ---
//!
//! ## Why Flatpak breaks native messaging
//!
//! A browser extension talks to 1Password through a **native messaging
//! host**: a helper process the browser spawns and exchanges framed JSON
//! with over stdin/stdout. A Flatpak browser cannot spawn that helper:
//! the binary lives outside its sandbox. Three things have to line up:
//!
//! 1. A **wrapper script** inside the browser's sandbox that escapes via
//!    `flatpak-spawn --host` (or `exec`s the helper directly when already
//!    on the host).
//! 2. A **manifest** in the directory the browser actually reads, naming
//!    that wrapper and allow-listing the 1Password extension ids.
//! 3. The wrapper's process name appended to
//!    `/etc/1password/custom_allowed_browsers` so the helper accepts the
//!    connection.
//!
//! Each browser hides its profile somewhere different under
//! `~/.var/app/<id>/`, which is why the directory resolution is heuristic:
//! Chromium derivatives get a recursive search for `NativeMessagingHosts`,
//! Firefox derivatives a `profiles.ini` scan (see [`resolver`]).
//!
//! ---
//!
//! ## Quick start (as a library)
//!
//! ```no_run
//! use flatpak_browser_integration::ops::SystemOps;
//! use flatpak_browser_integration::registry::Registry;
//! use flatpak_browser_integration::setup::Setup;
//!
//! # fn main() -> flatpak_browser_integration::error::Result<()> {
//! let home = dirs::home_dir().expect("home dir");
//! let registry = Registry::detect()?;
//! let ops = SystemOps;
//!
//! let record = Setup::new(home, registry, &ops)
//!     .run(Some("one.ablaze.floorp"), None)?;
//! println!("manifest at {}", record.manifest_path.display());
//! # Ok(())
//! # }
//! ```
//!
//! The pieces compose individually too:
//!
//! ```
//! use std::path::Path;
//! use flatpak_browser_integration::manifest::{render, AllowList, CHROMIUM_ALLOWED_ORIGINS};
//!
//! let json = render(
//!     Path::new("/home/me/.var/app/com.google.Chrome/data/bin/1password-wrapper.sh"),
//!     AllowList::Origins(CHROMIUM_ALLOWED_ORIGINS),
//! ).unwrap();
//! assert!(json.contains("\"type\": \"stdio\""));
//! ```
//!
//! ---
//!
//! ## Reruns and recovery
//!
//! The tool is idempotent: a second run in an unchanged environment
//! verifies every artifact byte-for-byte and writes nothing. There is no
//! rollback: when a step fails, the run exits non-zero with an actionable
//! message and the fix is to re-run setup. The persisted record is
//! revalidated on load; if its browser was uninstalled the run aborts
//! rather than configuring the wrong browser.
//!
//! Privileged steps (`sudo chattr`, `sudo tee`, `flatpak override`) sit
//! behind the [`ops::PrivilegedOps`] capability trait, so the decision
//! logic tests against a fake without touching the system.
//!
//! ---
//!
//! ## Troubleshooting
//!
//! - *"Specified native messaging host not found"*: the manifest is not in
//!   the directory this browser reads. Re-run with `--debug` and check the
//!   resolved directory; some browsers need one profile start before their
//!   config tree exists.
//! - *Extension connects, helper refuses*: `flatpak-session-helper` is
//!   missing from `/etc/1password/custom_allowed_browsers`.
//! - *Global manifest keeps reverting*: another tool edited it; the
//!   immutability flag exists exactly for this. Undo manually with
//!   `sudo chattr -i`.

pub mod cli;
pub mod error;
pub mod global;
pub mod manifest;
pub mod ops;
pub mod registry;
pub mod resolver;
pub mod setup;
pub mod store;
pub mod wrapper;

#[doc(inline)]
pub use error::{Error, Result};
#[doc(inline)]
pub use global::ensure_global_manifest;
#[doc(inline)]
pub use manifest::{render, verify, AllowList, Manifest};
#[doc(inline)]
pub use registry::{classify, BrowserFamily, Registry};
#[doc(inline)]
pub use resolver::resolve_directory;
#[doc(inline)]
pub use setup::Setup;
#[doc(inline)]
pub use store::ConfigRecord;
