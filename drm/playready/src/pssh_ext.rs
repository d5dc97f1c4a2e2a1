/*!
    PlayReady extension trait for `PsshBox`.

    `PlayReadyExt` adds PlayReady-specific methods to `drm_core::PsshBox`:
    - Parse the PlayReady Object records of the init data
    - Extract the WRM header from the type-1 record
    - Extract KIDs from the WRM header, converted to canonical byte order
*/

use drm_core::{PsshBox, PsshResult, SystemId};
use drm_playready_format::{PlayReadyObject, WrmHeader};

use crate::decoder::PlayReadyHeader;

/**
    PlayReady-specific extensions for [`PsshBox`].
*/
pub trait PlayReadyExt {
    fn playready_object(&self) -> PsshResult<PlayReadyObject>;

    fn playready_wrm_header(&self) -> PsshResult<WrmHeader>;

    /**
        Decode the init data, validating every key ID.
    */
    fn playready_header(&self) -> PsshResult<PlayReadyHeader>;

    /**
        Canonical key IDs, preferring the box header (v1) over the WRM header.
    */
    fn playready_key_ids(&self) -> PsshResult<Vec<[u8; 16]>>;

    fn ensure_playready(&self) -> PsshResult<()>;
}

impl PlayReadyExt for PsshBox {
    fn playready_object(&self) -> PsshResult<PlayReadyObject> {
        PlayReadyObject::from_bytes(self.init_data())
    }

    fn playready_wrm_header(&self) -> PsshResult<WrmHeader> {
        self.playready_object()?.wrm_header()
    }

    fn playready_header(&self) -> PsshResult<PlayReadyHeader> {
        PlayReadyHeader::from_init_data(self.init_data())
    }

    fn playready_key_ids(&self) -> PsshResult<Vec<[u8; 16]>> {
        let header_kids = self.key_ids();
        if !header_kids.is_empty() {
            return Ok(header_kids.to_vec());
        }
        Ok(self.playready_header()?.key_ids())
    }

    fn ensure_playready(&self) -> PsshResult<()> {
        self.ensure_system_id(SystemId::PlayReady)
    }
}
