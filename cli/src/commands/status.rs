//! Status Command - Show configuration and session cache state

use std::path::PathBuf;

use clap::Args;

use super::load_config;

/// Show configuration and session cache state
#[derive(Args)]
pub struct StatusCommand {}

impl StatusCommand {
    pub fn execute(
        self,
        config_path: Option<PathBuf>,
        data_dir: Option<PathBuf>,
    ) -> anyhow::Result<()> {
        let (config, dir) = load_config(config_path, data_dir)?;

        println!("cipherboard {}", env!("CARGO_PKG_VERSION"));
        println!();
        println!("Network:      {} (id {})", config.service.network, config.service.network_id);
        println!("Contract:     {}", config.service.contract_label);
        println!("Session TTL:  {} days", config.session.duration_days);
        println!("Data dir:     {}", dir.display());

        let cache_dir = dir.join(&config.session.cache_dir);
        let cached = if cache_dir.exists() {
            std::fs::read_dir(&cache_dir)?
                .filter_map(|entry| entry.ok())
                .filter(|entry| {
                    entry
                        .path()
                        .extension()
                        .map(|ext| ext == "json")
                        .unwrap_or(false)
                })
                .count()
        } else {
            0
        };
        println!("Sessions:     {} cached", cached);

        Ok(())
    }
}
