use crate::error::{Result, StingrayError};
use std::path::Path;

fn map_io_error(path: &Path, e: std::io::Error) -> StingrayError {
    match e.kind() {
        std::io::ErrorKind::PermissionDenied => StingrayError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => StingrayError::from(e),
    }
}

pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.is_dir() {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e))?;
    }
    Ok(())
}

/// Move `from` onto `to` with a single rename, replacing any existing file.
pub fn rename_into_place(from: &Path, to: &Path) -> Result<()> {
    std::fs::rename(from, to).map_err(|e| map_io_error(to, e))
}

pub fn remove_file(path: &Path) -> Result<()> {
    std::fs::remove_file(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => StingrayError::NotFound {
            name: path.display().to_string(),
        },
        _ => map_io_error(path, e),
    })
}

/// Durably flush a file's directory entry after a rename.
pub fn sync_dir(path: &Path) {
    #[cfg(unix)]
    {
        if let Err(e) = std::fs::File::open(path).and_then(|dir| dir.sync_all()) {
            log::debug!("Could not sync directory {}: {e}", path.display());
        }
    }

    #[cfg(not(unix))]
    {
        let _ = path;
    }
}
