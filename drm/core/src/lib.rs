#![allow(clippy::doc_overindented_list_items)]

mod constants;
mod error;
mod pssh;
mod reader;
mod types;

pub mod kid;

pub use self::constants::{
    CLEARKEY_SYSTEM_ID, FAIRPLAY_SYSTEM_ID, KEY_ID_LEN, PLAYREADY_SYSTEM_ID, WIDEVINE_SYSTEM_ID,
};
pub use self::error::{ParseError, PsshError, PsshResult};
pub use self::kid::{kid_from_guid, kid_to_guid, swap_guid_order};
pub use self::pssh::PsshBox;
pub use self::reader::{BoxReader, PsshPayload, read_payload};
pub use self::types::SystemId;
