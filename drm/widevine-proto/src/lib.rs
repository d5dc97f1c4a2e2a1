/*!
    `WidevinePsshData`, the init data of a Widevine PSSH box.

    Declared with the prost derive macros instead of generated from a
    `.proto` file, so building needs no `protoc`. Field numbers follow
    `widevine_pssh_data.proto`; fields missing from this declaration are
    skipped by the decoder like any other unknown field.
*/

pub use prost;

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct WidevinePsshData {
    /// Deprecated; superseded by `protection_scheme`.
    #[prost(enumeration = "widevine_pssh_data::Algorithm", optional, tag = "1")]
    pub algorithm: Option<i32>,
    #[prost(bytes = "vec", repeated, tag = "2")]
    pub key_ids: Vec<Vec<u8>>,
    /// Content provider name. Deprecated.
    #[prost(string, optional, tag = "3")]
    pub provider: Option<String>,
    #[prost(bytes = "vec", optional, tag = "4")]
    pub content_id: Option<Vec<u8>>,
    /// Deprecated.
    #[prost(string, optional, tag = "5")]
    pub track_type: Option<String>,
    /// Deprecated.
    #[prost(string, optional, tag = "6")]
    pub policy: Option<String>,
    #[prost(uint32, optional, tag = "7")]
    pub crypto_period_index: Option<u32>,
    /// Deprecated.
    #[prost(bytes = "vec", optional, tag = "8")]
    pub grouped_license: Option<Vec<u8>>,
    /// FourCC of the protection scheme, big-endian (`cenc`, `cbcs`, ...).
    #[prost(uint32, optional, tag = "9")]
    pub protection_scheme: Option<u32>,
    #[prost(uint32, optional, tag = "10")]
    pub crypto_period_seconds: Option<u32>,
    #[prost(enumeration = "widevine_pssh_data::Type", optional, tag = "11")]
    pub r#type: Option<i32>,
    #[prost(uint32, optional, tag = "12")]
    pub key_sequence: Option<u32>,
    #[prost(bytes = "vec", repeated, tag = "13")]
    pub group_ids: Vec<Vec<u8>>,
    #[prost(message, repeated, tag = "14")]
    pub entitled_keys: Vec<widevine_pssh_data::EntitledKey>,
    #[prost(string, optional, tag = "15")]
    pub video_feature: Option<String>,
}

pub mod widevine_pssh_data {
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct EntitledKey {
        #[prost(bytes = "vec", optional, tag = "1")]
        pub entitlement_key_id: Option<Vec<u8>>,
        #[prost(bytes = "vec", optional, tag = "2")]
        pub key_id: Option<Vec<u8>>,
        /// Content key wrapped by the entitlement key.
        #[prost(bytes = "vec", optional, tag = "3")]
        pub key: Option<Vec<u8>>,
        #[prost(bytes = "vec", optional, tag = "4")]
        pub iv: Option<Vec<u8>>,
        #[prost(uint32, optional, tag = "5")]
        pub entitlement_key_size_bytes: Option<u32>,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum Type {
        Single = 0,
        Entitlement = 1,
        EntitledKey = 2,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum Algorithm {
        Unencrypted = 0,
        Aesctr = 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn field_numbers_on_the_wire() {
        let data = WidevinePsshData {
            key_ids: vec![vec![0xaa; 16]],
            provider: Some("p".into()),
            content_id: Some(b"c".to_vec()),
            protection_scheme: Some(0x6365_6e63),
            ..Default::default()
        };
        let bytes = data.encode_to_vec();
        // key_ids (2), provider (3), content_id (4), protection_scheme (9)
        assert_eq!(bytes[0], 0x12);
        assert_eq!(bytes[18], 0x1a);
        assert_eq!(bytes[21], 0x22);
        assert_eq!(bytes[24], 0x48);
        assert_eq!(WidevinePsshData::decode(bytes.as_slice()).unwrap(), data);
    }

    #[test]
    fn enumerations() {
        let data = WidevinePsshData {
            algorithm: Some(widevine_pssh_data::Algorithm::Aesctr as i32),
            r#type: Some(widevine_pssh_data::Type::Entitlement as i32),
            ..Default::default()
        };
        assert_eq!(data.algorithm(), widevine_pssh_data::Algorithm::Aesctr);
        assert_eq!(data.r#type(), widevine_pssh_data::Type::Entitlement);
        assert_eq!(
            WidevinePsshData::default().r#type(),
            widevine_pssh_data::Type::Single
        );
    }
}
