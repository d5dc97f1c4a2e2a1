/*!
    Key ID byte order conversion.

    PlayReady writes key IDs as Microsoft GUIDs: a u32, a u16 and a u16 in
    little-endian order, followed by 8 bytes stored as-is. The `tenc` box
    and Widevine carry the same ID in plain big-endian (UUID) order.

      GUID:      d3 d2 d1 d0 | d5 d4 | d7 d6 | d8 .. d15
      canonical: d0 d1 d2 d3 | d4 d5 | d6 d7 | d8 .. d15

    The permutation only swaps bytes within each field, so applying it twice
    is the identity and the same function converts in both directions.
*/

use crate::error::{PsshError, PsshResult};

/**
    Swap between GUID (mixed-endian) and canonical (big-endian) byte order.
*/
pub const fn swap_guid_order(kid: [u8; 16]) -> [u8; 16] {
    [
        kid[3], kid[2], kid[1], kid[0], //
        kid[5], kid[4], //
        kid[7], kid[6], //
        kid[8], kid[9], kid[10], kid[11], kid[12], kid[13], kid[14], kid[15],
    ]
}

/**
    Convert a GUID-order key ID (as found in a WRM header) to canonical order.
*/
pub fn kid_from_guid(guid: &[u8]) -> PsshResult<[u8; 16]> {
    to_kid_array(guid).map(swap_guid_order)
}

/**
    Convert a canonical key ID (as found in `tenc`) to GUID order.
*/
pub fn kid_to_guid(kid: &[u8]) -> PsshResult<[u8; 16]> {
    to_kid_array(kid).map(swap_guid_order)
}

fn to_kid_array(bytes: &[u8]) -> PsshResult<[u8; 16]> {
    bytes
        .try_into()
        .map_err(|_| PsshError::InvalidLength(bytes.len()))
}
