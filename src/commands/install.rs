use crate::core::config::Config;
use crate::core::runtime::{install_invocation, ContainerRuntime, DockerRuntime};
use crate::core::store::LocalStore;
use crate::error::{Result, StingrayError};
use std::path::{Path, PathBuf};

pub fn install_app(dir: Option<&str>) -> Result<()> {
    let config = Config::load()?;
    let store = LocalStore::new(config.root());

    let runtime = match DockerRuntime::detect(&store) {
        Ok(runtime) => runtime,
        Err(StingrayError::RuntimeNotFound { .. }) => {
            println!("Docker is not installed");
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    let app_dir = resolve_app_dir(&std::env::current_dir()?, dir);
    let app_name = app_dir
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| app_dir.display().to_string());

    if install_with(&runtime, &config, &store, &app_dir)? {
        println!("✅ {app_name} installed successfully.");
        println!();
        println!("Try to run emulator:");
        println!("stingray run");
    } else {
        println!();
        println!("App is not installed.");
        println!();
        println!("Get more information:");
        println!("stingray --help");
    }
    Ok(())
}

/// Absolute path of the app to install: `dir` relative to `cwd`, or `cwd`.
pub fn resolve_app_dir(cwd: &Path, dir: Option<&str>) -> PathBuf {
    match dir {
        Some(dir) => cwd.join(dir.trim_end_matches('/')),
        None => cwd.to_path_buf(),
    }
}

/// Run the container's `install_app` for `app_dir`. Returns whether it
/// succeeded.
pub fn install_with<R: ContainerRuntime>(
    runtime: &R,
    config: &Config,
    store: &LocalStore,
    app_dir: &Path,
) -> Result<bool> {
    if !store.is_initialized() {
        println!("Init cli first.");
        return Ok(false);
    }
    if !app_dir.is_dir() {
        return Err(StingrayError::NotFound {
            name: app_dir.display().to_string(),
        });
    }

    let status = runtime.run(&install_invocation(config, store, app_dir))?;
    log::debug!("install_app exited with {status}");
    Ok(status.success())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_resolve_app_dir() {
        let cwd = Path::new("/work");
        assert_eq!(resolve_app_dir(cwd, None), PathBuf::from("/work"));
        assert_eq!(
            resolve_app_dir(cwd, Some("apps/clock/")),
            PathBuf::from("/work/apps/clock")
        );
    }

    #[cfg(unix)]
    mod with_runtime {
        use super::super::*;
        use crate::core::runtime::testing::RecordingRuntime;

        fn setup() -> (tempfile::TempDir, Config, LocalStore, PathBuf) {
            let temp = tempfile::tempdir().unwrap();
            let config = Config::load_from(temp.path().join(".stingray-cli")).unwrap();
            let store = LocalStore::new(config.root());
            let app_dir = temp.path().join("my-app");
            std::fs::create_dir_all(&app_dir).unwrap();
            (temp, config, store, app_dir)
        }

        #[test]
        fn test_install_requires_init() {
            let (_temp, config, store, app_dir) = setup();
            let runtime = RecordingRuntime::exiting_with(0);

            assert!(!install_with(&runtime, &config, &store, &app_dir).unwrap());
            assert!(runtime.invocations.borrow().is_empty());
        }

        #[test]
        fn test_install_reports_exit_status() {
            let (_temp, config, store, app_dir) = setup();
            store.ensure_directory().unwrap();

            let ok = RecordingRuntime::exiting_with(0);
            assert!(install_with(&ok, &config, &store, &app_dir).unwrap());
            assert_eq!(ok.invocations.borrow()[0].command[0], "install_app");

            let failed = RecordingRuntime::exiting_with(2);
            assert!(!install_with(&failed, &config, &store, &app_dir).unwrap());
        }

        #[test]
        fn test_install_missing_app_dir() {
            let (temp, config, store, _app_dir) = setup();
            store.ensure_directory().unwrap();
            let runtime = RecordingRuntime::exiting_with(0);

            let result = install_with(&runtime, &config, &store, &temp.path().join("nope"));
            assert!(matches!(result, Err(StingrayError::NotFound { .. })));
        }
    }
}
