use crate::error::{PsshError, PsshResult};
use crate::reader::BoxReader;
use crate::types::SystemId;

/**
    A complete, standalone PSSH box.

    ISOBMFF PSSH box layout:
      [0..4]    box_size: u32 big-endian (total box size including this header)
      [4..8]    box_type: "pssh"
      [8]       version: u8 (0 or 1)
      [9..12]   flags: u24
      [12..28]  system_id: 16 bytes
      if version == 1:
        [28..32]  key_id_count: u32 big-endian
        [32..]    key_ids: key_id_count * 16 bytes
      [..]      data_size: u32 big-endian
      [..]      data: data_size bytes

    Locating the box inside a media file is up to the caller.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PsshBox {
    pub version: u8,
    pub flags: [u8; 3],
    pub system_id: [u8; 16],
    /**
        Key IDs from the box header (v1 only), in canonical byte order.
    */
    pub key_ids: Vec<[u8; 16]>,
    /**
        Init data: a PlayReady Object, a WidevinePsshData protobuf, etc.
    */
    pub data: Vec<u8>,
}

const HEADER_LEN: usize = 28;

impl PsshBox {
    /**
        Parse a base64-encoded PSSH box.
    */
    pub fn from_base64(pssh: &str) -> PsshResult<Self> {
        let bytes = data_encoding::BASE64
            .decode(pssh.trim().as_bytes())
            .map_err(|e| PsshError::InvalidBase64(format!("PSSH: {e}")))?;
        Self::from_bytes(&bytes)
    }

    /**
        Parse a PSSH box from raw bytes starting at `box_size`.
    */
    pub fn from_bytes(input: &[u8]) -> PsshResult<Self> {
        // header + data_size
        if input.len() < HEADER_LEN + 4 {
            return Err(box_err("input too short for PSSH box header"));
        }

        let box_size = u32::from_be_bytes([input[0], input[1], input[2], input[3]]) as usize;
        if box_size > input.len() {
            return Err(PsshError::TruncatedInput(format!(
                "box_size {box_size} exceeds input length {}",
                input.len()
            )));
        }
        if box_size < HEADER_LEN + 4 {
            return Err(box_err(&format!("box_size {box_size} smaller than header")));
        }

        let mut reader = BoxReader::new(&input[4..box_size]);
        if &reader.read_array::<4>("box_type")? != b"pssh" {
            return Err(box_err("box_type is not 'pssh'"));
        }

        let version = reader.read_u8("version")?;
        if version > 1 {
            return Err(box_err(&format!("unsupported version {version}")));
        }
        let flags = reader.read_array("flags")?;
        let system_id = reader.read_array("system_id")?;

        let mut key_ids = Vec::new();
        if version == 1 {
            let kid_count = reader.read_u32_be("key_id_count")?;
            for _ in 0..kid_count {
                key_ids.push(reader.read_array("key_id")?);
            }
        }

        let data = reader.read_payload()?.payload;

        let consumed = 4 + reader.consumed() as usize;
        if consumed != box_size {
            return Err(box_err(&format!(
                "trailing bytes: consumed {consumed}, box_size {box_size}"
            )));
        }

        Ok(PsshBox {
            version,
            flags,
            system_id,
            key_ids,
            data,
        })
    }

    /**
        Serialize back to ISOBMFF PSSH box bytes.
    */
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut size = HEADER_LEN;
        if self.version == 1 {
            size += 4 + self.key_ids.len() * 16;
        }
        size += 4 + self.data.len();

        let mut buf = Vec::with_capacity(size);
        buf.extend_from_slice(&(size as u32).to_be_bytes());
        buf.extend_from_slice(b"pssh");
        buf.push(self.version);
        buf.extend_from_slice(&self.flags);
        buf.extend_from_slice(&self.system_id);

        if self.version == 1 {
            buf.extend_from_slice(&(self.key_ids.len() as u32).to_be_bytes());
            for kid in &self.key_ids {
                buf.extend_from_slice(kid);
            }
        }

        buf.extend_from_slice(&(self.data.len() as u32).to_be_bytes());
        buf.extend_from_slice(&self.data);
        buf
    }

    pub fn to_base64(&self) -> String {
        data_encoding::BASE64.encode(&self.to_bytes())
    }

    /**
        Key IDs from the box header. Always empty for v0 boxes; the
        scheme-specific init data has to be decoded to find them.
    */
    pub fn key_ids(&self) -> &[[u8; 16]] {
        &self.key_ids
    }

    pub fn init_data(&self) -> &[u8] {
        &self.data
    }

    pub fn system_id(&self) -> SystemId {
        SystemId::from_bytes(self.system_id)
    }

    /**
        Check that this PSSH box belongs to the given DRM system.
    */
    pub fn ensure_system_id(&self, expected: SystemId) -> PsshResult<()> {
        let actual = self.system_id();
        if actual == expected {
            Ok(())
        } else {
            Err(PsshError::SystemIdMismatch(actual, expected))
        }
    }
}

fn box_err(msg: &str) -> PsshError {
    PsshError::MalformedBox(msg.into())
}
