mod decode;
mod dispatch;
mod inspect_pssh;

pub use self::decode::DecodeCommand;
pub use self::inspect_pssh::InspectPsshCommand;
