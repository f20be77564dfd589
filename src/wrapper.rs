//! Per-browser wrapper script that launches the 1Password helper.
//!
//! The script runs inside the browser's sandbox, so it has to detect the
//! sandbox and escape through `flatpak-spawn --host` before it can reach
//! the helper binary.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::resolver;

/// Wrapper script filename, shared by the per-browser and global copies.
pub const WRAPPER_FILE: &str = "1password-wrapper.sh";

/// Shell text of the wrapper for a given helper binary path.
pub fn script_content(helper: &Path) -> String {
    format!(
        "#!/bin/bash\n\
         if [ \"${{container-}}\" = flatpak ]; then\n\
         \x20 flatpak-spawn --host {helper} \"$@\"\n\
         else\n\
         \x20 exec {helper} \"$@\"\n\
         fi\n",
        helper = helper.display()
    )
}

/// Path of the wrapper inside a browser's sandboxed data directory.
pub fn wrapper_path(home: &Path, browser_id: &str) -> PathBuf {
    resolver::app_dir(home, browser_id)
        .join("data/bin")
        .join(WRAPPER_FILE)
}

/// Write the wrapper script at `path`, creating parent directories and
/// marking it executable.
pub fn write_script(path: &Path, helper: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, script_content(helper))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
    }
    Ok(())
}
