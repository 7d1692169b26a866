use crate::core::config::Config;
use crate::core::store::{is_system_app, LocalStore};
use crate::error::{Result, StingrayError};

pub fn delete_app(app_name: &str) -> Result<()> {
    let config = Config::load()?;
    let store = LocalStore::new(config.root());

    if delete_package(&store, app_name)? {
        println!("✅ {app_name} app is deleted!");
    } else {
        println!("Invalid app name, try again.");
    }
    Ok(())
}

/// Remove `apps/<app_name>.pkg`. Returns `false` without touching anything
/// for system apps, names that are not a single path component, and apps
/// that are not installed.
pub fn delete_package(store: &LocalStore, app_name: &str) -> Result<bool> {
    let is_plain_name = !app_name.is_empty()
        && app_name != "."
        && app_name != ".."
        && !app_name.contains(['/', '\\']);

    if !is_plain_name || is_system_app(app_name) {
        log::debug!("Refusing to delete '{app_name}'");
        return Ok(false);
    }

    match store.delete_app(app_name) {
        Ok(()) => Ok(true),
        Err(StingrayError::NotFound { .. }) => Ok(false),
        Err(e) => Err(e),
    }
}
