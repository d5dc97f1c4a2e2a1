/*!
    Wire formats carried in PlayReady PSSH boxes.

    Pure parsing: no crypto, no I/O, no logging.
*/

pub mod pro;
pub mod wrm_header;

pub use self::pro::{PlayReadyObject, PlayReadyRecord, RecordType, decode_utf16le, encode_utf16le};
pub use self::wrm_header::{DataEntry, ProtectInfo, WrmHeader};
