//! Init Command - Write a default configuration

use std::path::PathBuf;

use clap::Args;

use crate::config::{default_config_path, default_data_dir, CipherboardConfig};

/// Write a default configuration
#[derive(Args)]
pub struct InitCommand {
    /// Network to configure (local, testnet)
    #[arg(short, long, default_value = "local")]
    network: String,

    /// Overwrite an existing configuration
    #[arg(long)]
    force: bool,
}

impl InitCommand {
    pub fn execute(
        self,
        config_path: Option<PathBuf>,
        data_dir: Option<PathBuf>,
    ) -> anyhow::Result<()> {
        let dir = data_dir.unwrap_or_else(|| default_data_dir(&self.network));
        let path = config_path.unwrap_or_else(|| default_config_path(&dir));

        if path.exists() && !self.force {
            anyhow::bail!(
                "Configuration already exists at {} (use --force to overwrite)",
                path.display()
            );
        }

        let config = CipherboardConfig::for_network(&self.network);
        config.save(&path)?;

        println!("Configuration written to {}", path.display());
        println!("Network:      {}", config.service.network);
        println!("Contract:     {}", config.service.contract_label);
        println!("Session TTL:  {} days", config.session.duration_days);

        Ok(())
    }
}
