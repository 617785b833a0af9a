//! Atomic output writes.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{BuildError, Result};

/// Write `contents` to `path` in one step.
///
/// Writes to a `.<file>.<pid>.tmp` sibling first, then renames it over `path`,
/// so a reader never observes a partial document. On Unix the file mode is
/// `0600`, also when a stale temp file was left behind by an earlier crash.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let tmp_path = temp_path(path);

    let result = write_temp(&tmp_path, contents)
        .and_then(|()| fs::rename(&tmp_path, path).map_err(|e| BuildError::io(path, e)));
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result?;

    info!(path = %path.display(), bytes = contents.len(), "wrote schedule document");
    Ok(())
}

fn write_temp(tmp_path: &Path, contents: &[u8]) -> Result<()> {
    match fs::remove_file(tmp_path) {
        Ok(()) => debug!(path = %tmp_path.display(), "removed stale temp file"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(BuildError::io(tmp_path, e)),
    }

    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options
        .open(tmp_path)
        .map_err(|e| BuildError::io(tmp_path, e))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))
            .map_err(|e| BuildError::io(tmp_path, e))?;
    }
    file.write_all(contents)
        .and_then(|()| file.sync_all())
        .map_err(|e| BuildError::io(tmp_path, e))
}

pub(super) fn temp_path(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    path.with_file_name(format!(".{file_name}.{}.tmp", std::process::id()))
}
