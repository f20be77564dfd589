//! Privileged and sandbox-permission side effects, behind a capability
//! trait so the core logic can run against a fake in tests.

use std::path::Path;
use std::process::Command;

use crate::error::{Error, Result};

/// Host-environment operations the setup flow delegates: Flatpak permission
/// grants, the `chattr` immutability attribute, and the 1Password allow-list
/// file. All of them shell out and may prompt for elevation.
pub trait PrivilegedOps {
    /// Allow the browser to spawn host commands
    /// (`flatpak override --talk-name=org.freedesktop.Flatpak`).
    fn grant_host_spawn(&self, browser_id: &str) -> Result<()>;

    /// Allow the browser to read a host directory
    /// (`flatpak override --filesystem=<path>`).
    fn grant_filesystem_access(&self, browser_id: &str, path: &Path) -> Result<()>;

    /// Whether the immutability attribute is set on `path`. Any failure to
    /// read the attribute counts as "not immutable".
    fn is_immutable(&self, path: &Path) -> bool;

    fn set_immutable(&self, path: &Path) -> Result<()>;

    fn clear_immutable(&self, path: &Path) -> Result<()>;

    /// Append `token` to the allow-list file unless it is already present.
    fn append_allow_list_entry(&self, file: &Path, token: &str) -> Result<()>;
}

/// Real implementation: `flatpak`, `lsattr`, `sudo chattr`, `sudo tee`.
pub struct SystemOps;

impl PrivilegedOps for SystemOps {
    fn grant_host_spawn(&self, browser_id: &str) -> Result<()> {
        run(
            "flatpak",
            &[
                "override",
                "--user",
                "--talk-name=org.freedesktop.Flatpak",
                browser_id,
            ],
        )
    }

    fn grant_filesystem_access(&self, browser_id: &str, path: &Path) -> Result<()> {
        let fs_arg = format!("--filesystem={}", path.display());
        run("flatpak", &["override", "--user", &fs_arg, browser_id])
    }

    fn is_immutable(&self, path: &Path) -> bool {
        let output = match Command::new("lsattr").arg(path).output() {
            Ok(o) if o.status.success() => o,
            _ => return false,
        };
        let stdout = String::from_utf8_lossy(&output.stdout);
        // lsattr prints the attribute field first; 'i' occupies the 5th slot.
        stdout
            .split_whitespace()
            .next()
            .and_then(|attrs| attrs.chars().nth(4))
            == Some('i')
    }

    fn set_immutable(&self, path: &Path) -> Result<()> {
        let path = path_arg(path)?;
        run("sudo", &["chattr", "+i", path])
    }

    fn clear_immutable(&self, path: &Path) -> Result<()> {
        let path = path_arg(path)?;
        run("sudo", &["chattr", "-i", path])
    }

    fn append_allow_list_entry(&self, file: &Path, token: &str) -> Result<()> {
        if let Ok(contents) = std::fs::read_to_string(file) {
            if contents.contains(token) {
                tracing::info!("'{token}' already present in {}", file.display());
                return Ok(());
            }
        }
        if let Some(parent) = file.parent() {
            if !parent.exists() {
                tracing::info!("creating directory {}", parent.display());
                run("sudo", &["mkdir", "-p", path_arg(parent)?])?;
            }
        }
        // tee keeps the append under sudo while the token comes over stdin.
        let cmd = format!(
            "printf '%s\\n' '{token}' | sudo tee -a '{}' >/dev/null",
            file.display()
        );
        run("sh", &["-c", &cmd])
    }
}

fn path_arg(path: &Path) -> Result<&str> {
    path.to_str().ok_or_else(|| {
        Error::CommandFailed(format!("path is not valid UTF-8: {}", path.display()))
    })
}

fn run(program: &str, args: &[&str]) -> Result<()> {
    tracing::debug!("running: {program} {}", args.join(" "));
    let status = Command::new(program)
        .args(args)
        .status()
        .map_err(|e| Error::CommandFailed(format!("{program}: {e}")))?;
    if !status.success() {
        return Err(Error::CommandFailed(format!(
            "{program} {} exited with {status}",
            args.join(" ")
        )));
    }
    Ok(())
}
