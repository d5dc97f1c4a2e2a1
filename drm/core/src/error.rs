use thiserror::Error;

use crate::types::SystemId;

/**
    Errors from PSSH box and init data parsing.

    Every decode step returns one of these as a value. Nothing here is
    retried or logged; the caller decides whether to abort.
*/
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PsshError {
    // ── Framing ───────────────────────────────────────────────────────
    #[error("truncated input: {0}")]
    TruncatedInput(String),
    #[error("I/O error: {0}")]
    Io(String),
    #[error("malformed PSSH box: {0}")]
    MalformedBox(String),
    #[error("unsupported record: {0}")]
    UnsupportedRecord(String),

    // ── Payload decoding ──────────────────────────────────────────────
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),
    #[error("malformed header: {0}")]
    MalformedHeader(String),

    // ── Key IDs ───────────────────────────────────────────────────────
    #[error("invalid key ID: {0}")]
    InvalidKeyId(String),
    #[error("key ID must be 16 bytes, got {0}")]
    InvalidLength(usize),

    // ── Base64 / system ID ────────────────────────────────────────────
    #[error("invalid base64: {0}")]
    InvalidBase64(String),
    #[error("PSSH system ID is {0}, expected {1}")]
    SystemIdMismatch(SystemId, SystemId),
}

/**
    Error returned by `FromStr` implementations on enum types.
*/
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseError {
    pub kind: &'static str,
    pub value: String,
}

/**
    Type alias for results that may return a [`PsshError`].
*/
pub type PsshResult<T> = std::result::Result<T, PsshError>;
