use crate::error::{Result, StingrayError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CLI_DIR: &str = ".stingray-cli";
pub const HOME_ENV: &str = "STINGRAY_CLI_HOME";
pub const CONFIG_FILE: &str = "config.toml";

/// A downloadable asset: a display title and the URL it is fetched from.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AssetSpec {
    pub title: String,
    pub url: String,
}

impl AssetSpec {
    pub fn new<T: Into<String>, U: Into<String>>(title: T, url: U) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }

    /// Local file name of the asset: the last path segment of its URL.
    pub fn file_name(&self) -> Result<String> {
        let without_query = self.url.split(['?', '#']).next().unwrap_or_default();
        match without_query.rsplit('/').next() {
            Some(name) if !name.is_empty() => Ok(name.to_string()),
            _ => Err(StingrayError::config_error(format!(
                "cannot derive a file name from '{}'",
                self.url
            ))),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    #[serde(skip)]
    pub root: PathBuf,
    pub emulator: AssetSpec,
    pub apps: AssetSpec,
    pub container_image: String,
    pub apps_source_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            root: PathBuf::from(CLI_DIR),
            emulator: AssetSpec::new(
                "StingrayTV Emulator",
                "https://devstingray.gs-labs.tv/dist-files/stingray-emu.img",
            ),
            apps: AssetSpec::new(
                "StingrayTV Apps",
                "https://devstingray.gs-labs.tv/dist-files/stingray-dist.tar.gz",
            ),
            container_image: "stingray-emu".to_string(),
            apps_source_url: "https://github.com/GSGroup/stingray-js-apps".to_string(),
        }
    }
}

impl Config {
    /// Resolve the installation root and apply `config.toml` overrides.
    ///
    /// Never creates the installation directory.
    pub fn load() -> Result<Self> {
        Self::load_from(get_stingray_dir()?)
    }

    pub fn load_from<P: Into<PathBuf>>(root: P) -> Result<Self> {
        let root = root.into();
        let config_path = root.join(CONFIG_FILE);

        let mut config = if config_path.exists() {
            log::debug!("Reading config overrides from {}", config_path.display());
            let content = std::fs::read_to_string(&config_path)?;
            Self::parse(&content)?
        } else {
            Config::default()
        };

        config.root = root;
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.emulator.file_name()?;
        config.apps.file_name()?;
        Ok(config)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn get_stingray_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }

    dirs::home_dir()
        .map(|home| home.join(CLI_DIR))
        .ok_or(StingrayError::HomeDirectoryNotFound)
}
