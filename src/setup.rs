//! The full configuration run, from browser discovery to the allow-list
//! check. Strictly sequential; a rerun in an unchanged environment writes
//! nothing.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::global;
use crate::manifest::{self, MANIFEST_FILE};
use crate::ops::PrivilegedOps;
use crate::registry::{classify, BrowserFamily, Registry, CHROMIUM_BROWSERS, FIREFOX_BROWSERS};
use crate::resolver;
use crate::store::{self, ConfigRecord};
use crate::wrapper;

/// File 1Password consults for additional allowed browser processes.
pub const ALLOW_LIST_FILE: &str = "/etc/1password/custom_allowed_browsers";

/// Process name the browser-side wrapper runs under; appending it to the
/// allow-list is what actually enables the integration.
pub const ALLOW_LIST_TOKEN: &str = "flatpak-session-helper";

/// Default install location of the 1Password helper binary.
pub const DEFAULT_HELPER: &str = "/opt/1Password/1Password-BrowserSupport";

/// One configuration run. Paths are explicit so tests can point everything
/// at a temporary tree.
pub struct Setup<'a> {
    home: PathBuf,
    helper_path: PathBuf,
    allow_list_path: PathBuf,
    registry: Registry,
    ops: &'a dyn PrivilegedOps,
}

impl<'a> Setup<'a> {
    pub fn new(home: PathBuf, registry: Registry, ops: &'a dyn PrivilegedOps) -> Setup<'a> {
        Setup {
            home,
            helper_path: PathBuf::from(DEFAULT_HELPER),
            allow_list_path: PathBuf::from(ALLOW_LIST_FILE),
            registry,
            ops,
        }
    }

    pub fn helper_path(mut self, path: PathBuf) -> Setup<'a> {
        self.helper_path = path;
        self
    }

    pub fn allow_list_path(mut self, path: PathBuf) -> Setup<'a> {
        self.allow_list_path = path;
        self
    }

    /// Run the whole configuration. `browser` and `family` skip the
    /// interactive prompts when given.
    pub fn run(
        &self,
        browser: Option<&str>,
        family: Option<BrowserFamily>,
    ) -> Result<ConfigRecord> {
        let existing = store::load(&self.home, &self.registry)?;

        let record = match existing {
            Some(record) => record,
            None => self.discover(browser, family)?,
        };

        tracing::info!("giving {} permission to run programs outside the sandbox", record.flatpak_browser_id);
        self.ops.grant_host_spawn(&record.flatpak_browser_id)?;

        // A missing wrapper only means someone cleaned the app dir; the
        // rerun recreates it at the recorded path.
        if !record.wrapper_path.exists() {
            wrapper::write_script(&record.wrapper_path, &self.helper_path)?;
        }

        let allow = record
            .browser_type
            .allow_list()
            .ok_or_else(|| Error::UnclassifiableBrowser(record.flatpak_browser_id.clone()))?;
        let hosts_dir = record
            .manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.home.clone());

        if manifest::verify(&record.wrapper_path, allow, &hosts_dir, false, self.ops)? {
            tracing::info!("manifest at {} already correct", record.manifest_path.display());
        } else {
            tracing::info!("writing native messaging manifest to {}", record.manifest_path.display());
            fs::create_dir_all(&hosts_dir)?;
            fs::write(&record.manifest_path, manifest::render(&record.wrapper_path, allow)?)?;
        }

        if record.browser_type == BrowserFamily::Firefox {
            global::ensure_global_manifest(
                &self.home,
                &record.flatpak_browser_id,
                &record.wrapper_path,
                self.ops,
            )?;
        }

        tracing::info!("adding Flatpaks to the list of browsers 1Password allows");
        if let Err(e) = self
            .ops
            .append_allow_list_entry(&self.allow_list_path, ALLOW_LIST_TOKEN)
        {
            tracing::error!(
                "failed to update {}: {e}; append '{ALLOW_LIST_TOKEN}' manually",
                self.allow_list_path.display()
            );
        }

        self.verify_allow_list()?;
        tracing::info!("success: restart both your browser and 1Password");

        store::save(&self.home, &record)?;
        Ok(record)
    }

    /// First-run discovery: pick a browser, classify it, create the wrapper
    /// and resolve the manifest path.
    fn discover(
        &self,
        browser: Option<&str>,
        family: Option<BrowserFamily>,
    ) -> Result<ConfigRecord> {
        let browser_id = match browser {
            Some(id) => id.to_string(),
            None => self.prompt_browser_id()?,
        };
        if !self.registry.is_installed(&browser_id) {
            return Err(Error::BrowserNotInstalled(browser_id));
        }

        let browser_type = match classify(&browser_id) {
            BrowserFamily::Unrecognized => self.manual_family(&browser_id, family)?,
            known => known,
        };

        tracing::info!("creating wrapper script for {browser_id}");
        let wrapper_path = wrapper::wrapper_path(&self.home, &browser_id);
        wrapper::write_script(&wrapper_path, &self.helper_path)?;

        let hosts_dir = resolver::resolve_directory(&self.home, browser_type, &browser_id)
            .ok_or_else(|| Error::UnclassifiableBrowser(browser_id.clone()))?;
        fs::create_dir_all(&hosts_dir)?;

        Ok(ConfigRecord {
            flatpak_browser_id: browser_id,
            browser_type,
            wrapper_path,
            manifest_path: hosts_dir.join(MANIFEST_FILE),
        })
    }

    fn manual_family(
        &self,
        browser_id: &str,
        family: Option<BrowserFamily>,
    ) -> Result<BrowserFamily> {
        if let Some(family) = family {
            if family != BrowserFamily::Unrecognized {
                return Ok(family);
            }
            return Err(Error::UnclassifiableBrowser(browser_id.to_string()));
        }
        tracing::warn!(
            "browser {browser_id} not recognized as Chromium-based or Firefox-based"
        );
        let answer = prompt("Enter the browser family (chromium or firefox): ")?;
        BrowserFamily::parse(&answer)
            .ok_or_else(|| Error::UnclassifiableBrowser(browser_id.to_string()))
    }

    fn prompt_browser_id(&self) -> Result<String> {
        let chromium = self.registry.filter_installed(CHROMIUM_BROWSERS);
        let firefox = self.registry.filter_installed(FIREFOX_BROWSERS);
        print_detected("Detected Chromium-based browsers (incomplete list):", &chromium);
        print_detected("Detected Firefox-based browsers (incomplete list):", &firefox);

        let id = prompt(
            "Enter your browser's Flatpak application ID (e.g. com.google.Chrome): ",
        )?;
        if id.is_empty() {
            return Err(Error::NoBrowserSelected);
        }
        Ok(id)
    }

    fn verify_allow_list(&self) -> Result<()> {
        let ok = fs::read_to_string(&self.allow_list_path)
            .map(|contents| contents.contains(ALLOW_LIST_TOKEN))
            .unwrap_or(false);
        if ok {
            Ok(())
        } else {
            Err(Error::AllowListUpdate {
                file: self.allow_list_path.display().to_string(),
                token: ALLOW_LIST_TOKEN.to_string(),
            })
        }
    }
}

fn print_detected(heading: &str, browsers: &[&str]) {
    println!("{heading}");
    if browsers.is_empty() {
        println!("None");
    } else {
        for id in browsers {
            println!("{id}");
        }
    }
}

fn prompt(message: &str) -> Result<String> {
    print!("{message}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
