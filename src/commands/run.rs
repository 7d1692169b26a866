use crate::core::config::Config;
use crate::core::runtime::{emulator_invocation, AudioDevice, ContainerRuntime, DockerRuntime};
use crate::core::store::LocalStore;
use crate::error::{Result, StingrayError};
use std::process::ExitStatus;

pub fn run_emulator(audio: AudioDevice) -> Result<()> {
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

    let Some(status) = launch(&runtime, &config, &store, audio)? else {
        println!("Init cli first.");
        return Ok(());
    };
    log::debug!("Emulator exited with {status}");

    println!();
    println!("Get more information:");
    println!("stingray --help");
    Ok(())
}

/// Start the emulator container. Returns `None` without running anything
/// when the installation directory does not exist yet.
pub fn launch<R: ContainerRuntime>(
    runtime: &R,
    config: &Config,
    store: &LocalStore,
    audio: AudioDevice,
) -> Result<Option<ExitStatus>> {
    if !store.is_initialized() {
        return Ok(None);
    }
    if !store.apps_dir().is_dir() {
        log::warn!(
            "{} does not exist, run `stingray update apps`",
            store.apps_dir().display()
        );
    }
    runtime.run(&emulator_invocation(config, store, audio)).map(Some)
}
