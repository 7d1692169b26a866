use crate::core::config::AssetSpec;
use crate::core::download::{AssetSource, Downloader};
use crate::core::store::LocalStore;
use crate::error::Result;

/// What an install attempt has to do, derived from a fresh filesystem probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallState {
    pub exists: bool,
    pub force_update: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallAction {
    Skip,
    Download,
    Replace,
}

impl InstallState {
    pub fn action(&self) -> InstallAction {
        match (self.exists, self.force_update) {
            (false, _) => InstallAction::Download,
            (true, false) => InstallAction::Skip,
            (true, true) => InstallAction::Replace,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOutcome {
    pub message: String,
    pub was_updated: bool,
    pub already_existed: bool,
    pub completed: bool,
}

impl InstallOutcome {
    /// Outcome before any work has been done; `completed` is set by the fetcher.
    fn planned(spec: &AssetSpec, state: InstallState) -> Self {
        let message = match state.action() {
            InstallAction::Download => format!("{} is installed!", spec.title),
            InstallAction::Skip => format!("{} is already installed!", spec.title),
            InstallAction::Replace => format!("{} is update!", spec.title),
        };

        Self {
            message,
            was_updated: state.action() == InstallAction::Replace,
            already_existed: state.exists,
            completed: false,
        }
    }

    /// The installation directory is missing; nothing was attempted.
    pub fn not_initialized() -> Self {
        Self {
            message: "Init cli first.".to_string(),
            was_updated: false,
            already_existed: false,
            completed: false,
        }
    }
}

pub struct AssetFetcher<S> {
    store: LocalStore,
    downloader: Downloader<S>,
}

impl<S: AssetSource> AssetFetcher<S> {
    pub fn new(store: LocalStore, downloader: Downloader<S>) -> Self {
        Self { store, downloader }
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    pub fn ensure_installed(&self, spec: &AssetSpec, force_update: bool) -> Result<InstallOutcome> {
        let file_name = spec.file_name()?;
        let final_path = self.store.asset_path(&file_name);

        let state = InstallState {
            exists: self.store.exists(&final_path),
            force_update,
        };
        let mut outcome = InstallOutcome::planned(spec, state);
        log::debug!("{}: {:?} -> {:?}", spec.title, state, state.action());

        if state.action() == InstallAction::Skip {
            outcome.completed = true;
            return Ok(outcome);
        }

        let temp_path = self.store.temp_path(&file_name);
        self.downloader
            .download_file(&spec.url, &spec.title, &temp_path)?;
        self.store.atomic_replace(&temp_path, &final_path)?;

        outcome.completed = true;
        Ok(outcome)
    }
}
