//! Play Command - Submit and reveal one player's score

use std::path::PathBuf;

use clap::Args;

use super::{build_service, load_config};
use cipherboard::prelude::*;

/// Submit a score and reveal it back through the decryption pipeline
#[derive(Args)]
pub struct PlayCommand {
    /// Player name (principal is derived from it)
    #[arg(short, long)]
    player: String,

    /// Plaintext score to submit
    #[arg(short, long)]
    score: u32,
}

impl PlayCommand {
    pub async fn execute(
        self,
        config_path: Option<PathBuf>,
        data_dir: Option<PathBuf>,
    ) -> anyhow::Result<()> {
        let (config, dir) = load_config(config_path, data_dir)?;
        let service = build_service(&config, &dir)?;

        let principal = Principal::derive(&self.player);
        service.register_asset(principal, AssetId(1));
        service.connect(principal);

        match service.submit_score(principal, self.score).await? {
            SubmitOutcome::Submitted => {
                println!("Submitted encrypted score for {}", self.player)
            }
            SubmitOutcome::InFlight => {
                println!("A submission is already outstanding; nothing sent");
                return Ok(());
            }
        }

        let session = service.authorize(principal).await?;
        match service.own_score(principal, &session).await? {
            DecryptOutcome::Plaintext(value) => {
                println!("Ledger holds (your best so far): {}", value)
            }
            DecryptOutcome::Ignored => println!("Context changed mid-request; result discarded"),
            DecryptOutcome::InFlight => println!("A decryption is already outstanding"),
        }

        let record = service
            .record(principal)
            .await
            .ok_or_else(|| anyhow::anyhow!("record missing after submission"))?;
        println!("Handle:       {}", record.ciphertext.to_hex());
        println!("Submitted at: {}", record.submitted_at.as_millis());

        Ok(())
    }
}
