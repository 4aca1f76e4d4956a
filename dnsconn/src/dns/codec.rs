use crate::core::DnsConnError;

/// Encode a structured DNS message into wire format bytes.
pub trait Pack {
    fn pack(&self) -> Result<Vec<u8>, DnsConnError>;
}

/// Decode a structured DNS message from wire format bytes.
pub trait Unpack: Sized {
    fn unpack(buf: &[u8]) -> Result<Self, DnsConnError>;
}
