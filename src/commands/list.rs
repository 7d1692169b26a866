use crate::core::config::Config;
use crate::core::store::{is_system_app, AppEntry, LocalStore};
use crate::error::Result;
use comfy_table::{presets::ASCII_FULL, Cell, Table};

pub fn list_apps() -> Result<()> {
    let config = Config::load()?;
    let store = LocalStore::new(config.root());

    let apps = visible_apps(store.app_entries()?);
    if apps.is_empty() {
        println!("No apps installed.");
        println!();
        println!("To install the bundled apps, run:");
        println!("  stingray init");
        return Ok(());
    }

    println!("{}", render_table(&apps));
    println!("Source code (StingrayTV apps):");
    println!("{}", config.apps_source_url);
    Ok(())
}

/// Installed apps without the emulator's system entries.
pub fn visible_apps(entries: Vec<AppEntry>) -> Vec<AppEntry> {
    entries
        .into_iter()
        .filter(|entry| !is_system_app(&entry.name))
        .collect()
}

pub fn render_table(apps: &[AppEntry]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_header(vec!["Index", "App name", "Installed at"]);

    for (index, app) in apps.iter().enumerate() {
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(app.display_name()),
            Cell::new(app.modified.format("%Y-%m-%d %H:%M:%S")),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn entry(name: &str) -> AppEntry {
        AppEntry {
            name: name.to_string(),
            modified: Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap(),
        }
    }

    #[test]
    fn test_visible_apps_hides_controls() {
        let names = [
            "clock.pkg",
            "controls",
            "controls.pkg",
            "remote-controls.pkg",
            "weather.pkg",
            "control.pkg",
        ];
        let visible: Vec<String> = visible_apps(names.iter().map(|n| entry(n)).collect())
            .into_iter()
            .map(|e| e.name)
            .collect();

        assert_eq!(visible, vec!["clock.pkg", "weather.pkg", "control.pkg"]);
    }

    #[test]
    fn test_render_table() {
        let table = render_table(&[entry("clock.pkg"), entry("weather.v2.pkg")]).to_string();

        assert!(table.contains("App name"));
        assert!(table.contains("clock"));
        assert!(table.contains("weather"));
        assert!(!table.contains("weather.v2"));
        assert!(table.contains("2024-03-09 14:05:00"));
    }
}
