use crate::error::{Result, StingrayError};
use crate::utils::progress;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use std::time::Duration;

/// Some asset hosts reject requests without a browser-like agent.
pub const USER_AGENT: &str = "Mozilla/5.0";
pub const RESPONSE_TIMEOUT: Duration = Duration::from_secs(10);

const WRITE_BUF_SIZE: usize = 256 * 1024;

/// An opened remote asset: its body stream and the advertised size, if any.
pub struct RemoteAsset {
    pub content_length: Option<u64>,
    pub body: Box<dyn Read + Send>,
}

/// Where asset bytes come from. The HTTP client in production, memory in tests.
pub trait AssetSource {
    fn open(&self, url: &str) -> Result<RemoteAsset>;
}

impl<T: AssetSource + ?Sized> AssetSource for &T {
    fn open(&self, url: &str) -> Result<RemoteAsset> {
        (**self).open(url)
    }
}

pub struct HttpSource {
    client: reqwest::blocking::Client,
}

impl HttpSource {
    pub fn new() -> Result<Self> {
        Self::from_builder(Self::client_builder())
    }

    /// `timeout` bounds connecting, waiting for the response headers and each
    /// body read, not the whole transfer.
    fn client_builder() -> reqwest::blocking::ClientBuilder {
        reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(RESPONSE_TIMEOUT)
            .timeout(RESPONSE_TIMEOUT)
    }

    fn from_builder(builder: reqwest::blocking::ClientBuilder) -> Result<Self> {
        let client = builder
            .build()
            .map_err(|e| StingrayError::config_error(format!("HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl AssetSource for HttpSource {
    fn open(&self, url: &str) -> Result<RemoteAsset> {
        log::debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(|e| StingrayError::download_error(url, e))?;

        let content_length = response.content_length();
        log::debug!(
            "{url}: HTTP {} content-length={content_length:?}",
            response.status()
        );

        Ok(RemoteAsset {
            content_length,
            body: Box::new(response),
        })
    }
}

pub struct Downloader<S> {
    source: S,
    show_progress: bool,
}

impl<S: AssetSource> Downloader<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            show_progress: true,
        }
    }

    pub fn quiet(mut self) -> Self {
        self.show_progress = false;
        self
    }

    /// Stream `url` into `destination`, reporting progress under `title`.
    ///
    /// Returns the number of bytes written. On failure the partially written
    /// `destination` is left on disk.
    pub fn download_file(&self, url: &str, title: &str, destination: &Path) -> Result<u64> {
        let asset = self.source.open(url)?;

        let file = File::create(destination).map_err(|e| {
            StingrayError::download_error(url, format!("{}: {e}", destination.display()))
        })?;
        let mut writer = BufWriter::with_capacity(WRITE_BUF_SIZE, file);

        let pb = progress::download_bar(title, asset.content_length, self.show_progress);
        let mut reader = pb.wrap_read(asset.body);

        let written = std::io::copy(&mut reader, &mut writer)
            .map_err(|e| StingrayError::download_error(url, e))?;

        writer
            .flush()
            .map_err(|e| StingrayError::download_error(url, e))?;
        let file = writer
            .into_inner()
            .map_err(|e| StingrayError::download_error(url, e.error()))?;
        file.sync_all()
            .map_err(|e| StingrayError::download_error(url, e))?;
        drop(file);

        if let Some(expected) = asset.content_length {
            if written != expected {
                pb.abandon();
                return Err(StingrayError::download_error(
                    url,
                    format!("received {written} of {expected} bytes"),
                ));
            }
        }

        pb.finish();
        log::debug!("Wrote {written} bytes to {}", destination.display());
        Ok(written)
    }
}
