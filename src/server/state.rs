use axum::extract::FromRef;

use crate::dataset::Dataset;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

/// The dataset is immutable once loaded, readers share it without locking.
pub type GuardedDataset = Arc<Dataset>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub dataset: GuardedDataset,
    pub source_path: PathBuf,
    pub hash: String,
}

impl ServerState {
    pub fn new(config: ServerConfig, dataset: GuardedDataset, source_path: PathBuf) -> ServerState {
        ServerState {
            config,
            start_time: Instant::now(),
            dataset,
            source_path,
            hash: env!("GIT_HASH").to_owned(),
        }
    }
}

impl FromRef<ServerState> for GuardedDataset {
    fn from_ref(input: &ServerState) -> Self {
        input.dataset.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
