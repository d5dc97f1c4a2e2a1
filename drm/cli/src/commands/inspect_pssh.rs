use anyhow::{Context, Result};
use clap::Args;
use tracing::{debug, warn};

use drm_core::PsshBox;

use super::dispatch::{Decoded, has_decoder};

/**
    Inspect a PSSH box.
*/
#[derive(Args)]
pub struct InspectPsshCommand {
    /// Base64-encoded PSSH box.
    pub base64: String,
}

impl InspectPsshCommand {
    pub fn run(self) -> Result<()> {
        let pssh = PsshBox::from_base64(&self.base64).context("failed to parse PSSH box")?;
        let system = pssh.system_id();
        debug!(version = pssh.version, %system, "parsed PSSH box");

        println!("Version:    {}", pssh.version);
        println!("System ID:  {system}");
        println!("Data Size:  {} bytes", pssh.data.len());

        let kids = pssh.key_ids();
        if !kids.is_empty() {
            println!();
            println!("Key IDs ({}):", kids.len());
            for kid in kids {
                println!("  {}", hex::encode(kid));
            }
        }

        if system.is_unknown() {
            warn!(%system, "unrecognized system ID, skipping init data");
            return Ok(());
        }
        if !has_decoder(system) {
            warn!(%system, "no decoder for system, skipping init data");
            return Ok(());
        }

        let decoded = Decoded::from_init_data(system, pssh.init_data())
            .with_context(|| format!("failed to decode {} init data", system.to_name()))?;
        println!();
        decoded.print();

        Ok(())
    }
}
