use crate::commands::http_fetcher;
use crate::core::bundle::{ArchiveInstaller, ExtractOutcome};
use crate::core::config::Config;
use crate::core::download::AssetSource;
use crate::core::fetcher::{AssetFetcher, InstallOutcome};
use crate::error::{Result, StingrayError};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateTarget {
    Emulator,
    Apps,
}

impl FromStr for UpdateTarget {
    type Err = StingrayError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "emulator" => Ok(UpdateTarget::Emulator),
            "apps" => Ok(UpdateTarget::Apps),
            _ => Err(StingrayError::usage_error(
                "Invalid command.\nTry:\nstingray update emulator|apps",
            )),
        }
    }
}

pub fn update(target: &str, quiet: bool) -> Result<()> {
    let target: UpdateTarget = target.parse()?;
    let config = Config::load()?;
    let fetcher = http_fetcher(&config, quiet)?;

    let outcome = update_asset(&config, &fetcher, target)?;
    if !outcome.completed {
        println!("{}", outcome.message);
    }
    Ok(())
}

/// Force a fresh download of `target`. The apps bundle is re-extracted
/// afterwards.
pub fn update_asset<S: AssetSource>(
    config: &Config,
    fetcher: &AssetFetcher<S>,
    target: UpdateTarget,
) -> Result<InstallOutcome> {
    let store = fetcher.store();
    if !store.is_initialized() {
        return Ok(InstallOutcome::not_initialized());
    }

    let spec = match target {
        UpdateTarget::Emulator => &config.emulator,
        UpdateTarget::Apps => &config.apps,
    };

    let outcome = fetcher.ensure_installed(spec, true)?;
    println!("✅ {}", outcome.message);

    if target == UpdateTarget::Apps {
        let archive = store.asset_path(&spec.file_name()?);
        let installer = ArchiveInstaller::new(store.clone());
        if let ExtractOutcome::Extracted { apps } = installer.ensure_apps_extracted(&archive)? {
            println!("📦 Extracted {apps} apps to {}", store.apps_dir().display());
        }
    }

    Ok(outcome)
}
