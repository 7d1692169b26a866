pub mod delete;
pub mod doctor;
pub mod init;
pub mod install;
pub mod list;
pub mod run;
pub mod update;

use crate::core::config::Config;
use crate::core::download::{Downloader, HttpSource};
use crate::core::fetcher::AssetFetcher;
use crate::core::store::LocalStore;
use crate::error::Result;

/// Fetcher over the real HTTP source for the configured installation root.
pub(crate) fn http_fetcher(config: &Config, quiet: bool) -> Result<AssetFetcher<HttpSource>> {
    let downloader = Downloader::new(HttpSource::new()?);
    let downloader = if quiet { downloader.quiet() } else { downloader };
    Ok(AssetFetcher::new(LocalStore::new(config.root()), downloader))
}
