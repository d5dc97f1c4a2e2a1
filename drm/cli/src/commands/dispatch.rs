use std::io::Read;

use anyhow::{Result, bail};
use tracing::debug;

use drm_core::SystemId;
use drm_playready::PlayReadyHeader;
use drm_widevine::WidevineHeader;

/**
    Init data decoded by the scheme its system ID selects.
*/
#[derive(Debug)]
pub enum Decoded {
    PlayReady(PlayReadyHeader),
    Widevine(WidevineHeader),
}

impl Decoded {
    /**
        Decode bare init data (no length prefix).
    */
    pub fn from_init_data(system: SystemId, data: &[u8]) -> Result<Self> {
        debug!(%system, len = data.len(), "decoding init data");
        Ok(match system {
            SystemId::PlayReady => Self::PlayReady(PlayReadyHeader::from_init_data(data)?),
            SystemId::Widevine => Self::Widevine(WidevineHeader::from_init_data(data)?),
            other => bail!("no decoder for {other}"),
        })
    }

    /**
        Read a big-endian length prefix and that many bytes from `source`,
        then decode them.
    */
    pub fn read_from<R: Read>(system: SystemId, source: R) -> Result<Self> {
        debug!(%system, "reading length-prefixed payload");
        Ok(match system {
            SystemId::PlayReady => Self::PlayReady(PlayReadyHeader::read_from(source)?),
            SystemId::Widevine => Self::Widevine(WidevineHeader::read_from(source)?),
            other => bail!("no decoder for {other}"),
        })
    }

    pub fn print(&self) {
        match self {
            Self::PlayReady(header) => print_playready(header),
            Self::Widevine(header) => print_widevine(header),
        }
    }
}

/**
    Whether a decoder exists for `system`.
*/
pub fn has_decoder(system: SystemId) -> bool {
    matches!(system, SystemId::PlayReady | SystemId::Widevine)
}

fn print_playready(header: &PlayReadyHeader) {
    let wrm = &header.wrm_header;
    if wrm.version.is_empty() {
        println!("WRM Header: (no version)");
    } else {
        println!("WRM Header: v{}", wrm.version);
    }

    for (index, (key, entry)) in header.keys.iter().zip(&wrm.data).enumerate() {
        println!();
        println!("Key {index}:");
        println!("  KID:       {}", key.kid_base64);
        println!("  Key ID:    {} ({})", key.key_id_base64(), key.key_id_hex());
        for info in &entry.protect_info {
            println!("  Algorithm: {} ({} bytes)", info.alg_id, info.key_len);
        }
        if let Some(url) = &key.la_url {
            println!("  LA URL:    {url}");
        }
        if let Some(url) = &entry.lui_url {
            println!("  LUI URL:   {url}");
        }
        if let Some(ds_id) = &entry.ds_id {
            println!("  DS ID:     {ds_id}");
        }
    }
}

fn print_widevine(header: &WidevineHeader) {
    match (&header.content_id, header.content_id_hex()) {
        (Some(content_id), Some(content_id_hex)) => println!(
            "Content ID: {} ({content_id_hex})",
            String::from_utf8_lossy(content_id)
        ),
        _ => println!("Content ID: (none)"),
    }
    println!(
        "Provider:   {}",
        header.provider.as_deref().unwrap_or("(none)")
    );
    if let Some(scheme) = header.protection_scheme_fourcc() {
        println!("Scheme:     {scheme}");
    }
    if !header.key_ids.is_empty() {
        println!();
        println!("Widevine Key IDs ({}):", header.key_ids.len());
        for kid in &header.key_ids {
            println!("  {}", hex::encode(kid));
        }
    }
}
