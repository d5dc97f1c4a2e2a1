use std::io::Read;

use drm_core::{BoxReader, PsshResult};
use drm_playready_format::{PlayReadyObject, WrmHeader};

/**
    One key from a WRM header, in both byte orders.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayReadyKey {
    /**
        Key ID as written in the header (base64, GUID byte order).
    */
    pub kid_base64: String,
    /**
        Key ID in canonical byte order, comparable with the `tenc` default KID.
    */
    pub key_id: [u8; 16],
    pub la_url: Option<String>,
}

impl PlayReadyKey {
    pub fn key_id_base64(&self) -> String {
        data_encoding::BASE64.encode(&self.key_id)
    }

    pub fn key_id_hex(&self) -> String {
        hex::encode(self.key_id)
    }
}

/**
    Decoded PlayReady init data.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayReadyHeader {
    pub wrm_header: WrmHeader,
    /**
        One key per `<DATA>` entry, in document order.
    */
    pub keys: Vec<PlayReadyKey>,
}

impl PlayReadyHeader {
    /**
        Validate and convert every key ID of a parsed WRM header.
    */
    pub fn from_wrm_header(wrm_header: WrmHeader) -> PsshResult<Self> {
        let keys = wrm_header
            .data
            .iter()
            .map(|entry| -> PsshResult<PlayReadyKey> {
                Ok(PlayReadyKey {
                    kid_base64: entry.kid.clone(),
                    key_id: entry.key_id()?,
                    la_url: entry.la_url.clone(),
                })
            })
            .collect::<PsshResult<_>>()?;
        Ok(Self { wrm_header, keys })
    }

    /**
        Decode the init data of a PlayReady PSSH box (a PlayReady Object).
    */
    pub fn from_init_data(data: &[u8]) -> PsshResult<Self> {
        let object = PlayReadyObject::from_bytes(data)?;
        Self::from_wrm_header(object.wrm_header()?)
    }

    /**
        Read a length-prefixed PlayReady payload from `source` and decode it.

        `source` must be positioned at the big-endian `data_size` field of
        the PSSH box.
    */
    pub fn read_from<R: Read>(source: R) -> PsshResult<Self> {
        let payload = BoxReader::new(source).read_payload()?;
        Self::from_init_data(&payload.payload)
    }

    /**
        Canonical key IDs, in document order.
    */
    pub fn key_ids(&self) -> Vec<[u8; 16]> {
        self.keys.iter().map(|k| k.key_id).collect()
    }
}
