use crate::core::bundle::ArchiveInstaller;
use crate::core::config::Config;
use crate::core::runtime::DockerRuntime;
use crate::core::store::LocalStore;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Check {
    pub label: String,
    pub ok: bool,
    pub hint: Option<String>,
}

impl Check {
    fn new<S: Into<String>>(label: S, ok: bool, hint: &str) -> Self {
        Self {
            label: label.into(),
            ok,
            hint: (!ok).then(|| hint.to_string()),
        }
    }
}

pub fn check_environment() -> Result<()> {
    println!("🔍 Stingray CLI - Environment Check");
    println!();

    let config = Config::load()?;
    let store = LocalStore::new(config.root());
    let runtime_found = DockerRuntime::detect(&store).is_ok();

    let checks = diagnose(&config, &store, runtime_found)?;
    for check in &checks {
        println!("  {} {}", if check.ok { "✅" } else { "❌" }, check.label);
        if let Some(hint) = &check.hint {
            println!("     {hint}");
        }
    }

    println!();
    let issues = checks.iter().filter(|check| !check.ok).count();
    if issues == 0 {
        println!("✅ Everything looks good!");
    } else {
        println!("⚠️  Found {issues} issue(s)");
    }
    Ok(())
}

pub fn diagnose(config: &Config, store: &LocalStore, runtime_found: bool) -> Result<Vec<Check>> {
    let mut checks = vec![Check::new(
        format!("installation directory {}", store.root().display()),
        store.is_initialized(),
        "run `stingray init`",
    )];

    for spec in [&config.emulator, &config.apps] {
        let file_name = spec.file_name()?;
        checks.push(Check::new(
            format!("{} ({file_name})", spec.title),
            store.asset_path(&file_name).is_file(),
            "run `stingray init`",
        ));
        if store.temp_path(&file_name).exists() {
            log::warn!("Leftover partial download {}", store.temp_path(&file_name).display());
        }
    }

    let archive = store.asset_path(&config.apps.file_name()?);
    let extracted = archive.is_file() && ArchiveInstaller::new(store.clone()).is_extracted(&archive)?;
    checks.push(Check::new(
        "apps extracted",
        extracted,
        "run `stingray update apps`",
    ));

    checks.push(Check::new(
        "docker available",
        runtime_found,
        "install Docker to run the emulator",
    ));

    Ok(checks)
}
