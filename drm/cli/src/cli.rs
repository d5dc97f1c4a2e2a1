use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands::{DecodeCommand, InspectPsshCommand};

/**
    Inspect PlayReady and Widevine PSSH data.
*/
#[derive(Parser)]
#[command(name = "drm-cli")]
pub struct Cli {
    /// Log decoding steps to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Inspect a PSSH box.
    InspectPssh(InspectPsshCommand),
    /// Decode a length-prefixed PSSH payload from a file.
    Decode(DecodeCommand),
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Command::InspectPssh(cmd) => cmd.run(),
            Command::Decode(cmd) => cmd.run(),
        }
    }
}
