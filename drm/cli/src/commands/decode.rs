use std::fs::File;
use std::io::{BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tracing::debug;

use drm_core::SystemId;

use super::dispatch::Decoded;

/**
    Decode a length-prefixed PSSH payload from a file.

    The file must hold, at `offset`, the big-endian `data_size` field of a
    PSSH box followed by that many bytes of init data.
*/
#[derive(Args)]
pub struct DecodeCommand {
    /// DRM system that produced the payload (`playready`, `widevine` or a UUID).
    #[arg(short, long)]
    pub system: SystemId,
    /// Byte offset of the length field.
    #[arg(short, long, default_value_t = 0)]
    pub offset: u64,
    /// File to read.
    pub file: PathBuf,
}

impl DecodeCommand {
    pub fn run(self) -> Result<()> {
        decode_file(&self.file, self.offset, self.system)?.print();
        Ok(())
    }
}

fn decode_file(path: &Path, offset: u64, system: SystemId) -> Result<Decoded> {
    let mut file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    file.seek(SeekFrom::Start(offset))
        .with_context(|| format!("failed to seek to offset {offset}"))?;
    debug!(path = %path.display(), offset, "reading payload");

    Decoded::read_from(system, BufReader::new(file)).with_context(|| {
        format!(
            "failed to decode {} payload at offset {offset}",
            system.to_name()
        )
    })
}
