use crate::error::{Result, StingrayError};
use crate::utils::fs;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

pub const APPS_DIR: &str = "apps";
pub const MANIFEST_FILE: &str = "bundle.json";
pub const TEMP_SUFFIX: &str = ".dl";
pub const PACKAGE_EXTENSION: &str = "pkg";

/// Apps shipped for the emulator's own UI; hidden from listings and never deleted.
pub fn is_system_app(name: &str) -> bool {
    name.contains("controls")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppEntry {
    pub name: String,
    pub modified: DateTime<Utc>,
}

impl AppEntry {
    /// Display name: the entry name up to its first dot.
    pub fn display_name(&self) -> &str {
        self.name.split('.').next().unwrap_or(&self.name)
    }
}

/// The on-disk installation directory.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn apps_dir(&self) -> PathBuf {
        self.root.join(APPS_DIR)
    }

    pub fn asset_path(&self, file_name: &str) -> PathBuf {
        self.root.join(file_name)
    }

    pub fn temp_path(&self, file_name: &str) -> PathBuf {
        self.root.join(format!("{file_name}{TEMP_SUFFIX}"))
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE)
    }

    pub fn package_path(&self, app_name: &str) -> PathBuf {
        self.apps_dir().join(format!("{app_name}.{PACKAGE_EXTENSION}"))
    }

    pub fn is_initialized(&self) -> bool {
        self.root.is_dir()
    }

    pub fn ensure_directory(&self) -> Result<()> {
        fs::ensure_dir_exists(&self.root)
    }

    pub fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    /// Names of the entries under `apps/`, sorted. Empty if `apps/` is missing.
    pub fn list_apps(&self) -> Result<Vec<String>> {
        Ok(self
            .app_entries()?
            .into_iter()
            .map(|entry| entry.name)
            .collect())
    }

    pub fn app_entries(&self) -> Result<Vec<AppEntry>> {
        let apps_dir = self.apps_dir();
        let read_dir = match std::fs::read_dir(&apps_dir) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(e.into()),
        };

        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = entry?;
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                log::warn!("Skipping non UTF-8 entry in {}", apps_dir.display());
                continue;
            };
            let modified = entry
                .metadata()
                .and_then(|m| m.modified())
                .map(DateTime::<Utc>::from)
                .unwrap_or_default();
            entries.push(AppEntry { name, modified });
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    /// Rename a finished download into its final name.
    ///
    /// A single `rename` keeps `final_path` either absent, the previous file,
    /// or the complete new file.
    pub fn atomic_replace(&self, temp_path: &Path, final_path: &Path) -> Result<()> {
        log::debug!(
            "Renaming {} -> {}",
            temp_path.display(),
            final_path.display()
        );
        fs::rename_into_place(temp_path, final_path)?;
        if let Some(parent) = final_path.parent() {
            fs::sync_dir(parent);
        }
        Ok(())
    }

    pub fn delete_app(&self, app_name: &str) -> Result<()> {
        let path = self.package_path(app_name);
        if !path.is_file() {
            return Err(StingrayError::NotFound {
                name: app_name.to_string(),
            });
        }
        fs::remove_file(&path)
    }
}
