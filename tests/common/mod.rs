#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use flatpak_browser_integration::error::{Error, Result};
use flatpak_browser_integration::ops::PrivilegedOps;

/// In-memory stand-in for the privileged host operations. Records every
/// call and models the immutability attribute as a set of paths; the
/// allow-list append writes to the real (temp) file so the final
/// verification step can read it back. Individual operations can be made
/// to fail, standing in for a declined elevation prompt.
#[derive(Default)]
pub struct FakeOps {
    calls: RefCell<Vec<String>>,
    immutable: RefCell<HashSet<PathBuf>>,
    fail_append: Cell<bool>,
    fail_toggles: Cell<bool>,
}

impl FakeOps {
    pub fn new() -> FakeOps {
        FakeOps::default()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn calls_named(&self, name: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.starts_with(name))
            .count()
    }

    pub fn mark_immutable(&self, path: &Path) {
        self.immutable.borrow_mut().insert(path.to_path_buf());
    }

    /// Make `append_allow_list_entry` fail from now on.
    pub fn fail_allow_list_append(&self) {
        self.fail_append.set(true);
    }

    /// Make `set_immutable` and `clear_immutable` fail from now on.
    pub fn fail_immutability_toggles(&self) {
        self.fail_toggles.set(true);
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }
}

impl PrivilegedOps for FakeOps {
    fn grant_host_spawn(&self, browser_id: &str) -> Result<()> {
        self.record(format!("grant_host_spawn {browser_id}"));
        Ok(())
    }

    fn grant_filesystem_access(&self, browser_id: &str, path: &Path) -> Result<()> {
        self.record(format!(
            "grant_filesystem_access {browser_id} {}",
            path.display()
        ));
        Ok(())
    }

    fn is_immutable(&self, path: &Path) -> bool {
        self.record(format!("is_immutable {}", path.display()));
        self.immutable.borrow().contains(path)
    }

    fn set_immutable(&self, path: &Path) -> Result<()> {
        self.record(format!("set_immutable {}", path.display()));
        if self.fail_toggles.get() {
            return Err(Error::CommandFailed("sudo chattr +i exited with 1".to_string()));
        }
        self.immutable.borrow_mut().insert(path.to_path_buf());
        Ok(())
    }

    fn clear_immutable(&self, path: &Path) -> Result<()> {
        self.record(format!("clear_immutable {}", path.display()));
        if self.fail_toggles.get() {
            return Err(Error::CommandFailed("sudo chattr -i exited with 1".to_string()));
        }
        self.immutable.borrow_mut().remove(path);
        Ok(())
    }

    fn append_allow_list_entry(&self, file: &Path, token: &str) -> Result<()> {
        self.record(format!("append_allow_list {token}"));
        if self.fail_append.get() {
            return Err(Error::CommandFailed("sudo tee exited with 1".to_string()));
        }
        let existing = fs::read_to_string(file).unwrap_or_default();
        if !existing.contains(token) {
            if let Some(parent) = file.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(file, format!("{existing}{token}\n"))?;
        }
        Ok(())
    }
}
