mod decoder;
mod pssh_ext;

pub mod format {
    pub use drm_playready_format::*;
}

// Re-export shared DRM types from drm-core
pub use drm_core::{PLAYREADY_SYSTEM_ID, PsshBox, PsshError, PsshResult, SystemId};

pub use self::decoder::{PlayReadyHeader, PlayReadyKey};
pub use self::pssh_ext::PlayReadyExt;
