//! CLI Commands

mod demo;
mod init;
mod play;
mod status;

pub use demo::DemoCommand;
pub use init::InitCommand;
pub use play::PlayCommand;
pub use status::StatusCommand;

use crate::config::{default_config_path, default_data_dir, CipherboardConfig};
use crate::signer::LocalSigner;
use cipherboard::prelude::*;
use cipherboard_client::JsonFileSessionStore;
use std::path::PathBuf;
use std::sync::Arc;

/// Resolve the effective config and data directory for a command
pub(crate) fn load_config(
    config_path: Option<PathBuf>,
    data_dir: Option<PathBuf>,
) -> anyhow::Result<(CipherboardConfig, PathBuf)> {
    let config = match &config_path {
        Some(path) => CipherboardConfig::load(path)?,
        None => {
            let dir = data_dir.clone().unwrap_or_else(|| default_data_dir("local"));
            let path = default_config_path(&dir);
            if path.exists() {
                CipherboardConfig::load(&path)?
            } else {
                CipherboardConfig::local()
            }
        }
    };

    let dir = data_dir.unwrap_or_else(|| default_data_dir(&config.service.network));
    Ok((config, dir))
}

/// Assemble the arcade service over the local co-processor
pub(crate) fn build_service(
    config: &CipherboardConfig,
    data_dir: &PathBuf,
) -> anyhow::Result<ArcadeService> {
    let store = JsonFileSessionStore::new(data_dir.join(&config.session.cache_dir))?;
    let arcade_config = ArcadeConfig {
        contract: ContractRef::derive(&config.service.contract_label),
        network: NetworkId(config.service.network_id),
        authority: Principal::derive("cipherboard/coprocessor"),
    };
    Ok(ArcadeService::new(
        arcade_config,
        Arc::new(LocalSigner),
        Arc::new(store),
    ))
}
