/*!
    Widevine PSSH init data.

    The payload of a Widevine PSSH box is a `WidevinePsshData` protobuf
    message. [`WidevineHeader`] keeps the fields worth showing and
    [`WidevineExt`] reaches them straight from a [`PsshBox`].
*/

mod decoder;
mod pssh_ext;

pub mod proto {
    pub use drm_widevine_proto::prost::Message;
    pub use drm_widevine_proto::*;
}

// Re-export shared DRM types from drm-core
pub use drm_core::{PsshBox, PsshError, PsshResult, SystemId, WIDEVINE_SYSTEM_ID};

pub use self::decoder::{WidevineHeader, decode_pssh_data};
pub use self::pssh_ext::WidevineExt;
