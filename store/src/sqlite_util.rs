//! SQLite file preparation and timestamp helpers.

use std::fs::{self, OpenOptions};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};

/// Create the parent directory and the database file with owner-only
/// permissions (Unix: 0o700 / 0o600) before SQLite opens it.
pub(crate) fn prepare_db_path(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        ensure_private_dir(parent)?;
    }

    if !path.exists() {
        let mut options = OpenOptions::new();
        options.create(true).truncate(false).read(true).write(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        options
            .open(path)
            .with_context(|| format!("Failed to create database file: {}", path.display()))?;
    }
    Ok(())
}

/// Create `dir` if missing and, when the current user owns it, tighten it to
/// 0o700. Directories owned by someone else (e.g. `/tmp`) are left alone.
fn ensure_private_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::{MetadataExt, PermissionsExt};
        let metadata = fs::metadata(dir)
            .with_context(|| format!("Failed to read directory metadata: {}", dir.display()))?;

        let our_uid = unsafe { libc::getuid() };
        if metadata.uid() != our_uid {
            return Ok(());
        }

        let mode = metadata.permissions().mode() & 0o777;
        if mode & 0o077 != 0 {
            tracing::debug!(dir = %dir.display(), "tightening store directory to 0700 (was {mode:o})");
            fs::set_permissions(dir, fs::Permissions::from_mode(0o700))
                .with_context(|| format!("Failed to set directory permissions: {}", dir.display()))?;
        }
    }
    Ok(())
}

/// Current UTC time as RFC 3339 with millisecond precision.
pub(crate) fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
