use core::fmt;
use core::str::FromStr;

use crate::constants::{
    CLEARKEY_SYSTEM_ID, FAIRPLAY_SYSTEM_ID, PLAYREADY_SYSTEM_ID, WIDEVINE_SYSTEM_ID,
};
use crate::error::ParseError;

/**
    DRM content protection system identifier.

    Recognizes the major DRM systems by their DASH-IF registered UUIDs.
    Unrecognized system IDs are captured in the `Unknown` variant.

    Reference: <https://dashif.org/identifiers/content_protection/>
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemId {
    Widevine,
    PlayReady,
    FairPlay,
    ClearKey,
    Unknown([u8; 16]),
}

impl SystemId {
    /**
        Identify a DRM system from its 16-byte UUID.
    */
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        match bytes {
            WIDEVINE_SYSTEM_ID => Self::Widevine,
            PLAYREADY_SYSTEM_ID => Self::PlayReady,
            FAIRPLAY_SYSTEM_ID => Self::FairPlay,
            CLEARKEY_SYSTEM_ID => Self::ClearKey,
            other => Self::Unknown(other),
        }
    }

    /**
        Return the raw 16-byte UUID for this system.
    */
    pub const fn to_bytes(self) -> [u8; 16] {
        match self {
            Self::Widevine => WIDEVINE_SYSTEM_ID,
            Self::PlayReady => PLAYREADY_SYSTEM_ID,
            Self::FairPlay => FAIRPLAY_SYSTEM_ID,
            Self::ClearKey => CLEARKEY_SYSTEM_ID,
            Self::Unknown(bytes) => bytes,
        }
    }

    pub const fn to_name(self) -> &'static str {
        match self {
            Self::Widevine => "Widevine",
            Self::PlayReady => "PlayReady",
            Self::FairPlay => "FairPlay",
            Self::ClearKey => "ClearKey",
            Self::Unknown(_) => "Unknown",
        }
    }

    /**
        Look up a known system by name, ignoring ASCII case.
    */
    pub fn from_name(name: &str) -> Option<Self> {
        [
            Self::Widevine,
            Self::PlayReady,
            Self::FairPlay,
            Self::ClearKey,
        ]
        .into_iter()
        .find(|id| id.to_name().eq_ignore_ascii_case(name.trim()))
    }

    /**
        Parse a UUID string into a `SystemId`.

        Accepts both hyphenated (`edef8ba9-79d6-4ace-a3c8-27dcd51d21ed`) and
        plain (`edef8ba979d64acea3c827dcd51d21ed`) formats. Hex digits are
        case-insensitive.
    */
    pub fn from_uuid(s: &str) -> Option<Self> {
        let digits: String = s.trim().chars().filter(|&c| c != '-').collect();
        let bytes: [u8; 16] = hex::decode(digits).ok()?.try_into().ok()?;
        Some(Self::from_bytes(bytes))
    }

    /**
        Format as a standard UUID string (`xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx`).
    */
    pub fn to_uuid(self) -> String {
        let b = self.to_bytes();
        format!(
            "{}-{}-{}-{}-{}",
            hex::encode(&b[0..4]),
            hex::encode(&b[4..6]),
            hex::encode(&b[6..8]),
            hex::encode(&b[8..10]),
            hex::encode(&b[10..16]),
        )
    }

    pub const fn is_unknown(self) -> bool {
        matches!(self, Self::Unknown(_))
    }
}

impl fmt::Display for SystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.to_name(), self.to_uuid())
    }
}

/**
    Parse a system by name (`playready`, `Widevine`, ...) or by UUID.
*/
impl FromStr for SystemId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
            .or_else(|| Self::from_uuid(s))
            .ok_or_else(|| ParseError {
                kind: "system ID",
                value: s.to_owned(),
            })
    }
}
