use crate::commands::http_fetcher;
use crate::core::bundle::{ArchiveInstaller, ExtractOutcome};
use crate::core::config::Config;
use crate::core::download::AssetSource;
use crate::core::fetcher::{AssetFetcher, InstallOutcome};
use crate::error::Result;

#[derive(Debug)]
pub struct InitReport {
    pub emulator: InstallOutcome,
    pub apps: InstallOutcome,
    pub extract: ExtractOutcome,
}

pub fn init(quiet: bool) -> Result<()> {
    let config = Config::load()?;
    let fetcher = http_fetcher(&config, quiet)?;

    let report = install_assets(&config, &fetcher)?;

    if !report.apps.already_existed {
        print_banner();
    }
    Ok(())
}

/// Create the installation directory, fetch both assets and unpack the apps
/// bundle. Each step is skipped when already done.
pub fn install_assets<S: AssetSource>(
    config: &Config,
    fetcher: &AssetFetcher<S>,
) -> Result<InitReport> {
    let store = fetcher.store();
    store.ensure_directory()?;

    let emulator = fetcher.ensure_installed(&config.emulator, false)?;
    println!("✅ {}", emulator.message);

    let apps = fetcher.ensure_installed(&config.apps, false)?;
    println!("✅ {}", apps.message);

    let archive = store.asset_path(&config.apps.file_name()?);
    let extract = ArchiveInstaller::new(store.clone()).ensure_apps_extracted(&archive)?;
    if let ExtractOutcome::Extracted { apps } = extract {
        println!("📦 Extracted {apps} apps to {}", store.apps_dir().display());
    }

    Ok(InitReport {
        emulator,
        apps,
        extract,
    })
}

fn print_banner() {
    println!();
    println!("  ╔═══════════════════════════╗");
    println!("  ║       Stingray  cli       ║");
    println!("  ╚═══════════════════════════╝");
    println!();
    println!("Usage:");
    println!("   stingray run              Run the emulator");
    println!("   stingray install [dir]    Install an app into the emulator");
    println!("   stingray list             Show installed apps");
    println!("   stingray delete <app>     Delete an app");
    println!("   stingray update <emulator|apps>");
    println!();
    println!("Get more information:");
    println!("   stingray --help");
}
