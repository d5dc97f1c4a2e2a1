use std::io::Read;

use drm_core::{BoxReader, PsshError, PsshResult};
use drm_widevine_proto::WidevinePsshData;
use drm_widevine_proto::prost::Message;

/**
    The fields of a `WidevinePsshData` message that callers care about.

    Absent fields are `None`; every other field on the wire is tolerated.
*/
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WidevineHeader {
    pub content_id: Option<Vec<u8>>,
    pub provider: Option<String>,
    /**
        Key IDs exactly as carried, whatever their length.
    */
    pub key_ids: Vec<Vec<u8>>,
    pub protection_scheme: Option<u32>,
}

impl WidevineHeader {
    pub fn from_pssh_data(data: WidevinePsshData) -> Self {
        Self {
            content_id: data.content_id,
            provider: data.provider,
            key_ids: data.key_ids,
            protection_scheme: data.protection_scheme,
        }
    }

    /**
        Decode the init data of a Widevine PSSH box.

        Fails only when the bytes are not a well-formed protobuf message.
    */
    pub fn from_init_data(data: &[u8]) -> PsshResult<Self> {
        decode_pssh_data(data).map(Self::from_pssh_data)
    }

    /**
        Read a length-prefixed Widevine payload from `source` and decode it.

        `source` must be positioned at the big-endian `data_size` field of
        the PSSH box.
    */
    pub fn read_from<R: Read>(source: R) -> PsshResult<Self> {
        let payload = BoxReader::new(source).read_payload()?;
        Self::from_init_data(&payload.payload)
    }

    pub fn content_id_hex(&self) -> Option<String> {
        self.content_id.as_ref().map(hex::encode)
    }

    /**
        Protection scheme as its four-character code, e.g. `cenc` or `cbcs`.
    */
    pub fn protection_scheme_fourcc(&self) -> Option<String> {
        self.protection_scheme
            .map(|scheme| String::from_utf8_lossy(&scheme.to_be_bytes()).into_owned())
    }
}

/**
    Decode raw init data as a `WidevinePsshData` protobuf.
*/
pub fn decode_pssh_data(data: &[u8]) -> PsshResult<WidevinePsshData> {
    WidevinePsshData::decode(data)
        .map_err(|e| PsshError::MalformedHeader(format!("WidevinePsshData: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    /// content_id = "AB", provider = "example", plus two unknown fields.
    const SCENARIO: [u8; 20] = hex!(
        "2202" "4142"               // 4: content_id
        "1a07" "6578616d706c65"     // 3: provider
        "9806" "01"                 // 99: unknown varint
        "a201" "01" "7a"            // 20: unknown bytes
    );

    fn framed(init_data: &[u8]) -> Vec<u8> {
        let mut buf = (init_data.len() as u32).to_be_bytes().to_vec();
        buf.extend_from_slice(init_data);
        buf
    }

    #[test]
    fn decodes_scenario_ignoring_unknown_fields() {
        let header = WidevineHeader::read_from(framed(&SCENARIO).as_slice()).unwrap();
        assert_eq!(
            header,
            WidevineHeader {
                content_id: Some(vec![0x41, 0x42]),
                provider: Some("example".into()),
                key_ids: vec![],
                protection_scheme: None,
            }
        );
        assert_eq!(header.content_id_hex().as_deref(), Some("4142"));
    }

    #[test]
    fn empty_message_has_no_fields() {
        let header = WidevineHeader::from_init_data(&[]).unwrap();
        assert_eq!(header, WidevineHeader::default());
    }

    #[test]
    fn key_ids_and_scheme() {
        let kid = hex!("00112233445566778899aabbccddeeff");
        let data = WidevinePsshData {
            key_ids: vec![kid.to_vec()],
            protection_scheme: Some(u32::from_be_bytes(*b"cbcs")),
            ..Default::default()
        };
        let header = WidevineHeader::from_init_data(&data.encode_to_vec()).unwrap();
        assert_eq!(header.key_ids, vec![kid.to_vec()]);
        assert_eq!(header.protection_scheme_fourcc().as_deref(), Some("cbcs"));
    }

    #[test]
    fn short_key_id_does_not_hide_other_fields() {
        let data = WidevinePsshData {
            key_ids: vec![vec![0u8; 8]],
            content_id: Some(b"AB".to_vec()),
            provider: Some("example".into()),
            ..Default::default()
        };
        let header = WidevineHeader::from_init_data(&data.encode_to_vec()).unwrap();
        assert_eq!(header.content_id.as_deref(), Some(&b"AB"[..]));
        assert_eq!(header.provider.as_deref(), Some("example"));
        assert_eq!(header.key_ids, vec![vec![0u8; 8]]);
    }

    #[test]
    fn structurally_invalid_messages() {
        for bad in [
            &hex!("2205" "41")[..],                   // truncated length-delimited field
            &hex!("08ffffffffffffffffffff01")[..],    // varint longer than 10 bytes
            &hex!("08")[..],                          // varint cut short
            &hex!("2001")[..],                        // content_id with varint wire type
            &hex!("1a02" "c328")[..],                 // provider not UTF-8
        ] {
            let err = WidevineHeader::from_init_data(bad).unwrap_err();
            assert!(matches!(err, PsshError::MalformedHeader(_)), "{bad:02x?}");
        }
    }

    #[test]
    fn truncated_payload() {
        let mut raw = framed(&SCENARIO);
        raw[3] += 1;
        let err = WidevineHeader::read_from(raw.as_slice()).unwrap_err();
        assert!(matches!(err, PsshError::TruncatedInput(_)));
    }
}
