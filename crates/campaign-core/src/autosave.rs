//! Auto-save collaborator.
//!
//! The orchestrator hands the pre-advance state to an [`AutoSave`] once per
//! tick. A failed save is logged and otherwise ignored; it never aborts the
//! tick.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::state::CampaignState;

/// Errors raised while writing an auto-save.
#[derive(Debug, thiserror::Error)]
pub enum AutoSaveError {
    /// The save file could not be written.
    #[error("auto-save I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// The snapshot could not be serialized.
    #[error("auto-save serialization error: {source}")]
    Json {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}

/// Persists the campaign before each day advance.
pub trait AutoSave {
    /// Save `state` as it is before the clock moves.
    fn save(&mut self, state: &CampaignState) -> Result<(), AutoSaveError>;
}

/// Auto-save that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAutoSave;

impl AutoSave for NoAutoSave {
    fn save(&mut self, _state: &CampaignState) -> Result<(), AutoSaveError> {
        Ok(())
    }
}

/// Writes `autosave-YYYY-MM-DD.json` snapshots into a directory.
#[derive(Debug, Clone)]
pub struct JsonAutoSave {
    dir: PathBuf,
}

impl JsonAutoSave {
    /// Save into `dir`, which is created on first use.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory the snapshots are written to.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the snapshot for `state`'s current date.
    pub fn path_for(&self, state: &CampaignState) -> PathBuf {
        self.dir
            .join(format!("autosave-{}.json", state.today().format("%Y-%m-%d")))
    }
}

impl AutoSave for JsonAutoSave {
    fn save(&mut self, state: &CampaignState) -> Result<(), AutoSaveError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(state);
        let json = serde_json::to_string_pretty(&state.snapshot())?;
        fs::write(&path, json)?;
        debug!(path = %path.display(), "Auto-save written");
        Ok(())
    }
}
