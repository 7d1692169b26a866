use crate::core::store::{is_system_app, LocalStore};
use crate::error::{Result, StingrayError};
use chrono::{DateTime, Utc};
use flate2::read::GzDecoder;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use tar::Archive;

/// Identity of a bundle archive on disk.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct BundleFingerprint {
    pub archive: String,
    pub size: u64,
    pub modified: DateTime<Utc>,
}

impl BundleFingerprint {
    pub fn of(archive_path: &Path) -> Result<Self> {
        let metadata = std::fs::metadata(archive_path)
            .map_err(|e| StingrayError::extraction_error(archive_path, e))?;
        let archive = archive_path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| StingrayError::extraction_error(archive_path, "invalid file name"))?
            .to_string();

        Ok(Self {
            archive,
            size: metadata.len(),
            modified: metadata.modified().map(DateTime::<Utc>::from)?,
        })
    }
}

/// Written after a successful extraction.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct BundleManifest {
    #[serde(flatten)]
    pub fingerprint: BundleFingerprint,
    pub extracted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractOutcome {
    /// Archive unpacked; `apps` is the number of visible entries afterwards.
    Extracted { apps: usize },
    AlreadyExtracted,
}

pub struct ArchiveInstaller {
    store: LocalStore,
}

impl ArchiveInstaller {
    pub fn new(store: LocalStore) -> Self {
        Self { store }
    }

    pub fn read_manifest(&self) -> Result<Option<BundleManifest>> {
        let path = self.store.manifest_path();
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)?;
        match serde_json::from_str(&content) {
            Ok(manifest) => Ok(Some(manifest)),
            Err(e) => {
                log::warn!("Ignoring unreadable {}: {e}", path.display());
                Ok(None)
            }
        }
    }

    fn write_manifest(&self, fingerprint: BundleFingerprint) -> Result<()> {
        let manifest = BundleManifest {
            fingerprint,
            extracted_at: Utc::now(),
        };
        let content = serde_json::to_string_pretty(&manifest)?;
        std::fs::write(self.store.manifest_path(), content)?;
        Ok(())
    }

    /// Whether `archive_path` is the bundle that populated `apps/`.
    pub fn is_extracted(&self, archive_path: &Path) -> Result<bool> {
        if self.store.list_apps()?.is_empty() {
            return Ok(false);
        }
        let current = BundleFingerprint::of(archive_path)?;
        Ok(self
            .read_manifest()?
            .is_some_and(|manifest| manifest.fingerprint == current))
    }

    /// Unpack the apps bundle into the installation root unless this exact
    /// archive has already been extracted.
    pub fn ensure_apps_extracted(&self, archive_path: &Path) -> Result<ExtractOutcome> {
        if self.is_extracted(archive_path)? {
            log::debug!("{} already extracted", archive_path.display());
            return Ok(ExtractOutcome::AlreadyExtracted);
        }

        let fingerprint = BundleFingerprint::of(archive_path)?;
        extract_archive(archive_path, self.store.root())?;
        self.write_manifest(fingerprint)?;

        let apps = self
            .store
            .list_apps()?
            .iter()
            .filter(|name| !is_system_app(name))
            .count();
        Ok(ExtractOutcome::Extracted { apps })
    }
}

pub fn extract_archive(archive_path: &Path, destination: &Path) -> Result<()> {
    log::debug!(
        "Extracting {} to {}",
        archive_path.display(),
        destination.display()
    );

    let file_name = archive_path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| StingrayError::extraction_error(archive_path, "invalid archive name"))?;

    if !(file_name.ends_with(".tar.gz") || file_name.ends_with(".tgz")) {
        return Err(StingrayError::extraction_error(
            archive_path,
            format!("unsupported archive format: {file_name}"),
        ));
    }

    extract_tar_gz(archive_path, destination)
        .map_err(|e| StingrayError::extraction_error(archive_path, e))
}

fn extract_tar_gz(archive_path: &Path, destination: &Path) -> std::io::Result<()> {
    let mut archive = Archive::new(GzDecoder::new(File::open(archive_path)?));
    // Entry times are install times, shown by `list`.
    archive.set_preserve_mtime(false);
    archive.unpack(destination)
}


#[cfg(test)]
mod tests {
    use super::testing::tar_gz;
    use super::*;
    use pretty_assertions::assert_eq;

    fn installer() -> (tempfile::TempDir, LocalStore, ArchiveInstaller) {
        let temp = tempfile::tempdir().unwrap();
        let store = LocalStore::new(temp.path());
        (temp, store.clone(), ArchiveInstaller::new(store))
    }

    fn bundle() -> Vec<u8> {
        tar_gz(&[
            ("apps/clock.pkg", b"clock"),
            ("apps/weather.pkg", b"weather"),
            ("apps/controls/index.js", b"controls"),
        ])
    }

    #[test]
    fn test_extracts_into_apps_dir() {
        let (_temp, store, installer) = installer();
        let archive = store.asset_path("stingray-dist.tar.gz");
        std::fs::write(&archive, bundle()).unwrap();

        let outcome = installer.ensure_apps_extracted(&archive).unwrap();

        assert_eq!(outcome, ExtractOutcome::Extracted { apps: 2 });
        assert_eq!(
            store.list_apps().unwrap(),
            vec!["clock.pkg", "controls", "weather.pkg"]
        );
        assert!(store.manifest_path().exists());
    }

    #[test]
    fn test_second_run_is_noop() {
        let (_temp, store, installer) = installer();
        let archive = store.asset_path("stingray-dist.tar.gz");
        std::fs::write(&archive, bundle()).unwrap();

        installer.ensure_apps_extracted(&archive).unwrap();
        std::fs::remove_file(store.apps_dir().join("weather.pkg")).unwrap();

        let outcome = installer.ensure_apps_extracted(&archive).unwrap();

        assert_eq!(outcome, ExtractOutcome::AlreadyExtracted);
        assert!(!store.apps_dir().join("weather.pkg").exists());
    }

    #[test]
    fn test_new_bundle_is_extracted_again() {
        let (_temp, store, installer) = installer();
        let archive = store.asset_path("stingray-dist.tar.gz");
        std::fs::write(&archive, bundle()).unwrap();
        installer.ensure_apps_extracted(&archive).unwrap();

        let updated = tar_gz(&[
            ("apps/clock.pkg", b"clock v2"),
            ("apps/weather.pkg", b"weather"),
            ("apps/radio.pkg", b"radio"),
        ]);
        std::fs::write(&archive, updated).unwrap();

        let outcome = installer.ensure_apps_extracted(&archive).unwrap();

        assert_eq!(outcome, ExtractOutcome::Extracted { apps: 3 });
        assert_eq!(
            std::fs::read(store.apps_dir().join("clock.pkg")).unwrap(),
            b"clock v2"
        );
    }

    #[test]
    fn test_populated_apps_without_manifest_is_extracted() {
        let (_temp, store, installer) = installer();
        let archive = store.asset_path("stingray-dist.tar.gz");
        std::fs::write(&archive, bundle()).unwrap();
        std::fs::create_dir_all(store.apps_dir()).unwrap();
        std::fs::write(store.apps_dir().join("clock.pkg"), b"partial").unwrap();

        assert!(!installer.is_extracted(&archive).unwrap());
        installer.ensure_apps_extracted(&archive).unwrap();

        assert_eq!(
            std::fs::read(store.apps_dir().join("clock.pkg")).unwrap(),
            b"clock"
        );
        assert!(installer.is_extracted(&archive).unwrap());
    }

    #[test]
    fn test_malformed_archive() {
        let (_temp, store, installer) = installer();
        let archive = store.asset_path("stingray-dist.tar.gz");
        std::fs::write(&archive, b"definitely not gzip").unwrap();

        let result = installer.ensure_apps_extracted(&archive);

        assert!(matches!(result, Err(StingrayError::ExtractionError { .. })));
        assert!(!store.manifest_path().exists());
    }

    #[test]
    fn test_missing_archive() {
        let (_temp, store, installer) = installer();
        let result = installer.ensure_apps_extracted(&store.asset_path("stingray-dist.tar.gz"));
        assert!(matches!(result, Err(StingrayError::ExtractionError { .. })));
    }

    #[test]
    fn test_unsupported_format() {
        let (_temp, store, _installer) = installer();
        let archive = store.asset_path("stingray-dist.rar");
        std::fs::write(&archive, b"rar").unwrap();

        let result = extract_archive(&archive, store.root());
        assert!(matches!(result, Err(StingrayError::ExtractionError { .. })));
    }

    #[test]
    fn test_zip_bundle_is_unsupported() {
        let (_temp, store, installer) = installer();
        let archive = store.asset_path("stingray-dist.zip");
        std::fs::write(&archive, b"PK\x03\x04").unwrap();

        let result = installer.ensure_apps_extracted(&archive);

        assert!(matches!(result, Err(StingrayError::ExtractionError { .. })));
        assert!(store.list_apps().unwrap().is_empty());
    }

    #[test]
    fn test_extracted_apps_carry_install_time() {
        let (_temp, store, installer) = installer();
        let archive = store.asset_path("stingray-dist.tar.gz");
        std::fs::write(&archive, bundle()).unwrap();
        let before = Utc::now() - chrono::Duration::seconds(5);

        installer.ensure_apps_extracted(&archive).unwrap();

        for entry in store.app_entries().unwrap() {
            assert!(entry.modified >= before, "{} kept archive mtime", entry.name);
        }
    }

    #[test]
    fn test_manifest_round_trip_on_disk() {
        let (_temp, store, installer) = installer();
        let archive = store.asset_path("stingray-dist.tar.gz");
        std::fs::write(&archive, bundle()).unwrap();
        installer.ensure_apps_extracted(&archive).unwrap();

        let manifest = installer.read_manifest().unwrap().unwrap();
        assert_eq!(manifest.fingerprint, BundleFingerprint::of(&archive).unwrap());
        assert_eq!(manifest.fingerprint.archive, "stingray-dist.tar.gz");
    }
}
