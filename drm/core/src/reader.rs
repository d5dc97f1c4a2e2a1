use std::io::{ErrorKind, Read};

use crate::error::{PsshError, PsshResult};

/**
    The length-prefixed init data of a PSSH box.

    Layout, starting at the `data_size` field of the box:
      [0..4]    declared_length: u32 big-endian
      [4..]     payload: declared_length bytes
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PsshPayload {
    /**
        Length as declared by the source. Always equal to `payload.len()`
        once a payload has been read successfully.
    */
    pub declared_length: u32,
    /**
        Init data. For PlayReady this is a PlayReady Object, for Widevine a
        serialized WidevinePsshData protobuf.
    */
    pub payload: Vec<u8>,
}

/**
    Bounded reader over a byte source.

    Every read either fills the requested amount or fails with
    [`PsshError::TruncatedInput`]. Buffers never grow past what the source
    actually delivered, so a bogus declared length cannot force a large
    allocation.
*/
#[derive(Debug)]
pub struct BoxReader<R> {
    inner: R,
    consumed: u64,
}

impl<R: Read> BoxReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, consumed: 0 }
    }

    /**
        Number of bytes pulled from the source so far.
    */
    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    /**
        Read a big-endian length followed by exactly that many bytes.
    */
    pub fn read_payload(&mut self) -> PsshResult<PsshPayload> {
        let declared_length = self.read_u32_be("data_size")?;
        let payload = self.read_vec(declared_length as usize, "data")?;
        Ok(PsshPayload {
            declared_length,
            payload,
        })
    }

    pub fn read_u8(&mut self, field: &'static str) -> PsshResult<u8> {
        let [b] = self.read_array::<1>(field)?;
        Ok(b)
    }

    pub fn read_u16_le(&mut self, field: &'static str) -> PsshResult<u16> {
        self.read_array(field).map(u16::from_le_bytes)
    }

    pub fn read_u32_be(&mut self, field: &'static str) -> PsshResult<u32> {
        self.read_array(field).map(u32::from_be_bytes)
    }

    pub fn read_u32_le(&mut self, field: &'static str) -> PsshResult<u32> {
        self.read_array(field).map(u32::from_le_bytes)
    }

    /**
        Read exactly `N` bytes into a fixed-size array.
    */
    pub fn read_array<const N: usize>(&mut self, field: &'static str) -> PsshResult<[u8; N]> {
        let mut buf = [0u8; N];
        let mut filled = 0;
        while filled < N {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => return Err(truncated(field, N, filled)),
                Ok(n) => {
                    filled += n;
                    self.consumed += n as u64;
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(PsshError::Io(format!("{field}: {e}"))),
            }
        }
        Ok(buf)
    }

    /**
        Read exactly `len` bytes into a vector.
    */
    pub fn read_vec(&mut self, len: usize, field: &'static str) -> PsshResult<Vec<u8>> {
        let mut buf = Vec::new();
        let got = (&mut self.inner)
            .take(len as u64)
            .read_to_end(&mut buf)
            .map_err(|e| PsshError::Io(format!("{field}: {e}")))?;
        self.consumed += got as u64;
        if got < len {
            return Err(truncated(field, len, got));
        }
        Ok(buf)
    }
}

/**
    Read one length-prefixed PSSH payload from `source`.
*/
pub fn read_payload<R: Read>(source: R) -> PsshResult<PsshPayload> {
    BoxReader::new(source).read_payload()
}

fn truncated(field: &str, needed: usize, got: usize) -> PsshError {
    PsshError::TruncatedInput(format!("{field}: needed {needed} bytes, got {got}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn framed(payload: &[u8]) -> Vec<u8> {
        let mut buf = (payload.len() as u32).to_be_bytes().to_vec();
        buf.extend_from_slice(payload);
        buf
    }

    #[test]
    fn reads_declared_payload() {
        let raw = framed(b"init-data");
        let mut reader = BoxReader::new(raw.as_slice());
        let payload = reader.read_payload().unwrap();
        assert_eq!(payload.declared_length, 9);
        assert_eq!(payload.payload, b"init-data");
        assert_eq!(reader.consumed(), 13);
    }

    #[test]
    fn leaves_trailing_bytes_unread() {
        let mut raw = framed(b"abc");
        raw.extend_from_slice(b"next");
        let mut source = raw.as_slice();
        let payload = read_payload(&mut source).unwrap();
        assert_eq!(payload.payload, b"abc");
        assert_eq!(source, b"next");
    }

    #[test]
    fn declared_length_one_past_available() {
        let mut raw = framed(b"0123456789");
        raw[3] += 1;
        let mut reader = BoxReader::new(raw.as_slice());
        let err = reader.read_payload().unwrap_err();
        assert!(matches!(err, PsshError::TruncatedInput(_)));
        // Never reads past the end of the source.
        assert_eq!(reader.consumed(), raw.len() as u64);
    }

    #[test]
    fn huge_declared_length_is_bounded_by_source() {
        let mut raw = u32::MAX.to_be_bytes().to_vec();
        raw.extend_from_slice(&[0u8; 32]);
        let mut reader = BoxReader::new(raw.as_slice());
        let err = reader.read_payload().unwrap_err();
        assert_eq!(
            err,
            PsshError::TruncatedInput(format!("data: needed {} bytes, got 32", u32::MAX))
        );
        assert_eq!(reader.consumed(), 36);
    }

    #[test]
    fn short_length_field() {
        let err = read_payload(&[0u8, 0][..]).unwrap_err();
        assert_eq!(
            err,
            PsshError::TruncatedInput("data_size: needed 4 bytes, got 2".into())
        );
    }

    #[test]
    fn empty_source() {
        let err = read_payload(&[0u8; 0][..]).unwrap_err();
        assert!(matches!(err, PsshError::TruncatedInput(_)));
    }

    #[test]
    fn mixed_endian_integers() {
        let raw = [0x00, 0x00, 0x01, 0x02, 0x02, 0x01, 0x00, 0x00, 0x03, 0x00, 0x7f];
        let mut reader = BoxReader::new(&raw[..]);
        assert_eq!(reader.read_u32_be("be").unwrap(), 0x0102);
        assert_eq!(reader.read_u32_le("le").unwrap(), 0x0102);
        assert_eq!(reader.read_u16_le("count").unwrap(), 3);
        assert_eq!(reader.read_u8("byte").unwrap(), 0x7f);
        assert!(matches!(
            reader.read_u8("eof"),
            Err(PsshError::TruncatedInput(_))
        ));
    }
}
