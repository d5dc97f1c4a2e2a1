use drm_core::{KEY_ID_LEN, PsshBox, PsshError, PsshResult, SystemId};
use drm_widevine_proto::WidevinePsshData;

use crate::decoder::{WidevineHeader, decode_pssh_data};

/**
    Widevine-specific extensions for [`PsshBox`].
*/
pub trait WidevineExt {
    /**
        Decode the data payload as a WidevinePsshData protobuf.
    */
    fn widevine_pssh_data(&self) -> PsshResult<WidevinePsshData>;

    /**
        Decode the data payload and project the fields of interest.
    */
    fn widevine_header(&self) -> PsshResult<WidevineHeader>;

    /**
        Extract key IDs, preferring the box header (v1) over protobuf parsing (v0).

        - v1: returns the key IDs stored in the box header directly.
        - v0: decodes `self.data` as a WidevinePsshData protobuf and extracts
          the `key_id` repeated field. Any entry that is not 16 bytes fails
          with [`PsshError::InvalidKeyId`].
    */
    fn widevine_key_ids(&self) -> PsshResult<Vec<[u8; 16]>>;

    /**
        Check that this PSSH box is a Widevine box.
    */
    fn ensure_widevine(&self) -> PsshResult<()>;
}

impl WidevineExt for PsshBox {
    fn widevine_pssh_data(&self) -> PsshResult<WidevinePsshData> {
        decode_pssh_data(self.init_data())
    }

    fn widevine_header(&self) -> PsshResult<WidevineHeader> {
        WidevineHeader::from_init_data(self.init_data())
    }

    fn widevine_key_ids(&self) -> PsshResult<Vec<[u8; 16]>> {
        let header_kids = self.key_ids();
        if !header_kids.is_empty() {
            return Ok(header_kids.to_vec());
        }

        let header = self.widevine_header()?;
        let mut kids = Vec::with_capacity(header.key_ids.len());
        for raw_kid in &header.key_ids {
            let kid = <[u8; KEY_ID_LEN]>::try_from(raw_kid.as_slice()).map_err(|_| {
                PsshError::InvalidKeyId(format!(
                    "key_id length {} (expected {KEY_ID_LEN})",
                    raw_kid.len()
                ))
            })?;
            kids.push(kid);
        }
        Ok(kids)
    }

    fn ensure_widevine(&self) -> PsshResult<()> {
        self.ensure_system_id(SystemId::Widevine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drm_core::{PLAYREADY_SYSTEM_ID, WIDEVINE_SYSTEM_ID};
    use drm_widevine_proto::prost::Message;
    use hex_literal::hex;

    const KID: [u8; 16] = hex!("eb676abbcb345e96bbcf616630f1a3da");

    fn widevine_box(version: u8, key_ids: Vec<[u8; 16]>, data: &WidevinePsshData) -> PsshBox {
        PsshBox {
            version,
            flags: [0; 3],
            system_id: WIDEVINE_SYSTEM_ID,
            key_ids,
            data: data.encode_to_vec(),
        }
    }

    #[test]
    fn v0_key_ids_from_protobuf() {
        let data = WidevinePsshData {
            key_ids: vec![KID.to_vec()],
            content_id: Some(b"movie-1".to_vec()),
            ..Default::default()
        };
        let pssh = PsshBox::from_base64(&widevine_box(0, vec![], &data).to_base64()).unwrap();
        pssh.ensure_widevine().unwrap();
        assert_eq!(pssh.widevine_key_ids().unwrap(), vec![KID]);
        assert_eq!(pssh.widevine_pssh_data().unwrap(), data);

        let header = pssh.widevine_header().unwrap();
        assert_eq!(header.content_id.as_deref(), Some(&b"movie-1"[..]));
        assert_eq!(header.provider, None);
    }

    #[test]
    fn v1_box_header_kids_win() {
        let other = hex!("00000000000000000000000000000001");
        let data = WidevinePsshData {
            key_ids: vec![KID.to_vec()],
            ..Default::default()
        };
        let pssh = widevine_box(1, vec![other], &data);
        assert_eq!(pssh.widevine_key_ids().unwrap(), vec![other]);
    }

    #[test]
    fn v0_short_key_id_rejected() {
        let data = WidevinePsshData {
            key_ids: vec![vec![0u8; 8]],
            provider: Some("example".into()),
            ..Default::default()
        };
        let pssh = widevine_box(0, vec![], &data);
        assert!(matches!(
            pssh.widevine_key_ids(),
            Err(PsshError::InvalidKeyId(_))
        ));
        assert_eq!(
            pssh.widevine_header().unwrap().provider.as_deref(),
            Some("example")
        );
    }

    #[test]
    fn wrong_system() {
        let mut pssh = widevine_box(0, vec![], &WidevinePsshData::default());
        pssh.system_id = PLAYREADY_SYSTEM_ID;
        assert!(matches!(
            pssh.ensure_widevine(),
            Err(PsshError::SystemIdMismatch(SystemId::PlayReady, SystemId::Widevine))
        ));
    }
}
