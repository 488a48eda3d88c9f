use std::path::PathBuf;

use shardline_lite::{
    backend::{Backend, BackendConfig, snapshot::Snapshot},
    handlers::v1::LiteTransport,
};
use shardline_sdk::Client;
use tracing::debug;

use crate::error::CliError;

/// An in-process service restored from, and saved back to, a state file.
pub struct LiteSession {
    path: PathBuf,
    client: Client<LiteTransport>,
}

impl LiteSession {
    pub fn open(path: PathBuf, config: BackendConfig) -> Result<Self, CliError> {
        let snapshot =
            Snapshot::load(&path).map_err(|e| CliError::LoadState(path.clone(), e))?;
        let backend = Backend::from_snapshot(config, snapshot)
            .map_err(|e| CliError::LoadState(path.clone(), e))?;
        debug!(path = %path.display(), "service state loaded");
        Ok(Self {
            path,
            client: Client::new(LiteTransport::new(backend)),
        })
    }

    pub fn client(&self) -> &Client<LiteTransport> {
        &self.client
    }

    pub fn save(&self) -> Result<(), CliError> {
        let snapshot = self.client.transport().backend().snapshot();
        snapshot
            .save(&self.path)
            .map_err(|e| CliError::SaveState(self.path.clone(), e))?;
        debug!(path = %self.path.display(), "service state saved");
        Ok(())
    }
}
