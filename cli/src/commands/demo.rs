//! Demo Command - Scripted multi-player round

use std::path::PathBuf;

use clap::Args;

use super::{build_service, load_config};
use cipherboard::prelude::*;

/// Run a scripted multi-player round against the local co-processor
#[derive(Args)]
pub struct DemoCommand {}

impl DemoCommand {
    pub async fn execute(
        self,
        config_path: Option<PathBuf>,
        data_dir: Option<PathBuf>,
    ) -> anyhow::Result<()> {
        let (config, dir) = load_config(config_path, data_dir)?;
        let service = build_service(&config, &dir)?;

        let rounds: &[(&str, u32)] = &[("alice", 50), ("bob", 80), ("alice", 30), ("carol", 20)];

        for (name, score) in rounds {
            let principal = Principal::derive(name);
            service.register_asset(principal, AssetId(1));
            service.submit_score(principal, *score).await?;
            println!("{} submitted an encrypted score", name);
        }

        println!();
        println!("Leaderboard (by recency; scores stay encrypted):");
        for entry in service.leaderboard().await {
            println!(
                "  #{} {} (submitted at {})",
                entry.rank,
                entry.principal,
                entry.submitted_at.as_millis()
            );
        }

        println!();
        for name in ["alice", "bob", "carol"] {
            let principal = Principal::derive(name);
            service.connect(principal);
            let session = service.authorize(principal).await?;
            match service.own_score(principal, &session).await? {
                DecryptOutcome::Plaintext(value) => {
                    println!("{} reveals their own best: {}", name, value)
                }
                outcome => println!("{} reveal outcome: {:?}", name, outcome),
            }
        }

        if let Some(max) = service.encrypted_max().await {
            println!();
            println!("Encrypted global maximum handle: {}", max.to_hex());
            println!("(the holder's identity is not derivable from the aggregate)");
        }

        Ok(())
    }
}
