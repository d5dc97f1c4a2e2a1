/*!
    PlayReady Object (PRO), the init data of a PlayReady PSSH box.

    Layout (all fields little-endian, unlike the big-endian PSSH framing):
      [0..4]    length: u32 (total object length, same value as data_size)
      [4..6]    record_count: u16
      [6..]     records[record_count]:
                  type: u16
                  length: u16
                  data: length bytes

    Record types:
    - 0x0001: rights management header (UTF-16LE WRM header XML)
    - 0x0002: reserved
    - 0x0003: embedded license store
*/

use core::fmt;

use drm_core::{BoxReader, PsshError, PsshResult};

use crate::wrm_header::WrmHeader;

const OBJECT_HEADER_LEN: usize = 6;
const RECORD_HEADER_LEN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    RightsManagementHeader,
    Reserved,
    EmbeddedLicenseStore,
    Unknown(u16),
}

impl RecordType {
    pub const fn from_u16(value: u16) -> Self {
        match value {
            0x0001 => Self::RightsManagementHeader,
            0x0002 => Self::Reserved,
            0x0003 => Self::EmbeddedLicenseStore,
            other => Self::Unknown(other),
        }
    }

    pub const fn to_u16(self) -> u16 {
        match self {
            Self::RightsManagementHeader => 0x0001,
            Self::Reserved => 0x0002,
            Self::EmbeddedLicenseStore => 0x0003,
            Self::Unknown(value) => value,
        }
    }

    pub const fn to_name(self) -> &'static str {
        match self {
            Self::RightsManagementHeader => "rights management header",
            Self::Reserved => "reserved",
            Self::EmbeddedLicenseStore => "embedded license store",
            Self::Unknown(_) => "unknown",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:04x})", self.to_name(), self.to_u16())
    }
}

/**
    A single typed record inside a PlayReady Object.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayReadyRecord {
    pub record_type: RecordType,
    pub data: Vec<u8>,
}

impl PlayReadyRecord {
    /**
        Build a rights management header record from WRM header XML.
    */
    pub fn wrm_header(xml: &str) -> Self {
        Self {
            record_type: RecordType::RightsManagementHeader,
            data: encode_utf16le(xml),
        }
    }

    /**
        Decode the record data as UTF-16LE text.
    */
    pub fn text(&self) -> PsshResult<String> {
        decode_utf16le(&self.data)
    }
}

/**
    Parsed PlayReady Object.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayReadyObject {
    /**
        Length restated by the object itself. Kept for diagnostics only;
        bounds come from the enclosing PSSH data size.
    */
    pub length: u32,
    pub records: Vec<PlayReadyRecord>,
}

impl PlayReadyObject {
    /**
        Wrap a single WRM header in an object, the common layout in PSSH boxes.
    */
    pub fn from_wrm_header_xml(xml: &str) -> Self {
        let record = PlayReadyRecord::wrm_header(xml);
        let length = OBJECT_HEADER_LEN + RECORD_HEADER_LEN + record.data.len();
        Self {
            length: length as u32,
            records: vec![record],
        }
    }

    /**
        Parse an object from the init data of a PlayReady PSSH box.

        Exactly `record_count` records must fill the input. A count that
        runs past the input, or leaves bytes over, is rejected with
        [`PsshError::UnsupportedRecord`].
    */
    pub fn from_bytes(data: &[u8]) -> PsshResult<Self> {
        let mut reader = BoxReader::new(data);
        let length = reader.read_u32_le("object length")?;
        let record_count = reader.read_u16_le("record_count")?;

        let mut records = Vec::with_capacity(record_count.into());
        for index in 0..record_count {
            let record = read_record(&mut reader).map_err(|e| match e {
                PsshError::TruncatedInput(detail) => PsshError::UnsupportedRecord(format!(
                    "record count {record_count} does not fit the payload: record {index}: {detail}"
                )),
                other => other,
            })?;
            records.push(record);
        }

        let consumed = reader.consumed() as usize;
        if consumed != data.len() {
            return Err(PsshError::UnsupportedRecord(format!(
                "{} bytes left after {record_count} record(s)",
                data.len() - consumed
            )));
        }

        Ok(Self { length, records })
    }

    /**
        Serialize back to PlayReady Object bytes.
    */
    pub fn to_bytes(&self) -> PsshResult<Vec<u8>> {
        let record_count = u16::try_from(self.records.len()).map_err(|_| {
            PsshError::UnsupportedRecord(format!("{} records", self.records.len()))
        })?;

        let mut records = Vec::new();
        for record in &self.records {
            let len = u16::try_from(record.data.len()).map_err(|_| {
                PsshError::UnsupportedRecord(format!(
                    "{} record of {} bytes",
                    record.record_type,
                    record.data.len()
                ))
            })?;
            records.extend_from_slice(&record.record_type.to_u16().to_le_bytes());
            records.extend_from_slice(&len.to_le_bytes());
            records.extend_from_slice(&record.data);
        }

        let mut buf = Vec::with_capacity(OBJECT_HEADER_LEN + records.len());
        buf.extend_from_slice(&self.length.to_le_bytes());
        buf.extend_from_slice(&record_count.to_le_bytes());
        buf.extend_from_slice(&records);
        Ok(buf)
    }

    /**
        The single rights management header record.

        Other record types are skipped. Zero or several header records are
        rejected with [`PsshError::UnsupportedRecord`].
    */
    pub fn wrm_header_record(&self) -> PsshResult<&PlayReadyRecord> {
        let mut headers = self
            .records
            .iter()
            .filter(|r| r.record_type == RecordType::RightsManagementHeader);
        match (headers.next(), headers.next()) {
            (Some(record), None) => Ok(record),
            (None, _) => Err(PsshError::UnsupportedRecord(
                "no rights management header record".into(),
            )),
            (Some(_), Some(_)) => Err(PsshError::UnsupportedRecord(format!(
                "{} rights management header records",
                2 + headers.count()
            ))),
        }
    }

    pub fn wrm_header_xml(&self) -> PsshResult<String> {
        self.wrm_header_record()?.text()
    }

    pub fn wrm_header(&self) -> PsshResult<WrmHeader> {
        WrmHeader::from_xml(&self.wrm_header_xml()?)
    }
}

fn read_record(reader: &mut BoxReader<&[u8]>) -> PsshResult<PlayReadyRecord> {
    let record_type = RecordType::from_u16(reader.read_u16_le("record type")?);
    let len = reader.read_u16_le("record length")?;
    let data = reader.read_vec(len.into(), "record data")?;
    Ok(PlayReadyRecord { record_type, data })
}

/**
    Decode UTF-16LE bytes into a string, dropping a leading byte order mark.

    Odd byte counts and unpaired surrogates fail with
    [`PsshError::InvalidEncoding`].
*/
pub fn decode_utf16le(bytes: &[u8]) -> PsshResult<String> {
    if bytes.len() % 2 != 0 {
        return Err(PsshError::InvalidEncoding(format!(
            "UTF-16 needs an even byte count, got {}",
            bytes.len()
        )));
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    let text =
        String::from_utf16(&units).map_err(|e| PsshError::InvalidEncoding(e.to_string()))?;
    match text.strip_prefix('\u{feff}') {
        Some(rest) => Ok(rest.to_owned()),
        None => Ok(text),
    }
}

pub fn encode_utf16le(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(u16::to_le_bytes).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const XML: &str = "<WRMHEADER version=\"4.0.0.0\"><DATA><KID>AQIDBAUGBwgJCgsMDQ4PEA==</KID></DATA></WRMHEADER>";

    fn raw_object(count: u16, records: &[(u16, &[u8])]) -> Vec<u8> {
        let body: Vec<u8> = records
            .iter()
            .flat_map(|(ty, data)| {
                let mut rec = ty.to_le_bytes().to_vec();
                rec.extend_from_slice(&(data.len() as u16).to_le_bytes());
                rec.extend_from_slice(data);
                rec
            })
            .collect();
        let mut buf = ((6 + body.len()) as u32).to_le_bytes().to_vec();
        buf.extend_from_slice(&count.to_le_bytes());
        buf.extend_from_slice(&body);
        buf
    }

    #[test]
    fn utf16_odd_length_rejected() {
        for len in [1, 3, 7, 391] {
            let err = decode_utf16le(&vec![0x41; len]).unwrap_err();
            assert!(matches!(err, PsshError::InvalidEncoding(_)), "len {len}");
        }
    }

    #[test]
    fn utf16_unpaired_surrogate_rejected() {
        let err = decode_utf16le(&[0x00, 0xd8, 0x41, 0x00]).unwrap_err();
        assert!(matches!(err, PsshError::InvalidEncoding(_)));
    }

    #[test]
    fn utf16_surrogate_pair_and_bom() {
        let mut bytes = encode_utf16le("\u{feff}a\u{1f600}");
        assert_eq!(decode_utf16le(&bytes).unwrap(), "a\u{1f600}");
        bytes.clear();
        assert_eq!(decode_utf16le(&bytes).unwrap(), "");
    }

    #[test]
    fn single_header_record() {
        let data = encode_utf16le(XML);
        let raw = raw_object(1, &[(1, &data[..])]);
        let pro = PlayReadyObject::from_bytes(&raw).unwrap();
        assert_eq!(pro.length as usize, raw.len());
        assert_eq!(pro.records.len(), 1);
        assert_eq!(
            pro.records[0].record_type,
            RecordType::RightsManagementHeader
        );
        assert_eq!(pro.wrm_header_xml().unwrap(), XML);
        assert_eq!(pro.to_bytes().unwrap(), raw);
    }

    #[test]
    fn builder_matches_wire_layout() {
        let pro = PlayReadyObject::from_wrm_header_xml(XML);
        let raw = pro.to_bytes().unwrap();
        assert_eq!(raw, raw_object(1, &[(1, &encode_utf16le(XML)[..])]));
        assert_eq!(PlayReadyObject::from_bytes(&raw).unwrap(), pro);
    }

    #[test]
    fn skips_embedded_license_store() {
        let data = encode_utf16le(XML);
        let raw = raw_object(2, &[(3, &[0u8; 8][..]), (1, &data[..])]);
        let pro = PlayReadyObject::from_bytes(&raw).unwrap();
        assert_eq!(pro.records[0].record_type, RecordType::EmbeddedLicenseStore);
        assert_eq!(pro.wrm_header_xml().unwrap(), XML);
    }

    #[test]
    fn declared_count_past_payload() {
        let data = encode_utf16le(XML);
        let raw = raw_object(2, &[(1, &data[..])]);
        let err = PlayReadyObject::from_bytes(&raw).unwrap_err();
        assert!(matches!(err, PsshError::UnsupportedRecord(_)));
    }

    #[test]
    fn record_length_past_payload() {
        let data = encode_utf16le(XML);
        let mut raw = raw_object(1, &[(1, &data[..])]);
        raw[8] = raw[8].wrapping_add(2);
        let err = PlayReadyObject::from_bytes(&raw).unwrap_err();
        assert!(matches!(err, PsshError::UnsupportedRecord(_)));
    }

    #[test]
    fn bytes_left_after_declared_records() {
        let data = encode_utf16le(XML);
        let raw = raw_object(1, &[(1, &data[..]), (3, &[0u8; 4][..])]);
        let err = PlayReadyObject::from_bytes(&raw).unwrap_err();
        assert!(matches!(err, PsshError::UnsupportedRecord(_)));
    }

    #[test]
    fn missing_header_record() {
        let raw = raw_object(1, &[(3, &[0u8; 4][..])]);
        let pro = PlayReadyObject::from_bytes(&raw).unwrap();
        let err = pro.wrm_header_record().unwrap_err();
        assert!(matches!(err, PsshError::UnsupportedRecord(_)));
    }

    #[test]
    fn several_header_records() {
        let data = encode_utf16le(XML);
        let raw = raw_object(3, &[(1, &data[..]), (1, &data[..]), (1, &data[..])]);
        let pro = PlayReadyObject::from_bytes(&raw).unwrap();
        assert_eq!(
            pro.wrm_header_record().unwrap_err(),
            PsshError::UnsupportedRecord("3 rights management header records".into())
        );
    }

    #[test]
    fn truncated_object_header() {
        let err = PlayReadyObject::from_bytes(&[0x10, 0x00, 0x00]).unwrap_err();
        assert!(matches!(err, PsshError::TruncatedInput(_)));
    }

    #[test]
    fn record_type_display() {
        assert_eq!(
            RecordType::from_u16(3).to_string(),
            "embedded license store (0x0003)"
        );
        assert_eq!(RecordType::from_u16(0x42), RecordType::Unknown(0x42));
    }
}
