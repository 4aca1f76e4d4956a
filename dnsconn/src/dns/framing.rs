use crate::core::DnsConnError;
use byteorder::{ByteOrder, NetworkEndian};
use std::fmt;

/// Buffer size used for UDP reads, larger than the legacy 512 byte limit.
pub const DEFAULT_MSG_SIZE: usize = 4096;

/// Largest possible DNS message, the most a TCP read can ever need.
pub const MAX_MSG_SIZE: usize = 65536;

/// Size of the big-endian length prefix before each message on a stream.
pub const LENGTH_PREFIX_SIZE: usize = 2;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TransportKind {
    Udp,
    Tcp,
}

impl TransportKind {
    /// Size of buffer to allocate for reading a message over this transport.
    /// TCP gets room for the largest possible message while UDP gets a practical
    /// default since the size is picked by transport, not by message.
    pub fn buffer_size(&self) -> usize {
        match self {
            TransportKind::Tcp => MAX_MSG_SIZE,
            TransportKind::Udp => DEFAULT_MSG_SIZE,
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportKind::Udp => write!(f, "udp"),
            TransportKind::Tcp => write!(f, "tcp"),
        }
    }
}

/// Buffer size for an optional transport, no transport means no buffer.
pub fn buffer_size(kind: Option<TransportKind>) -> Option<usize> {
    kind.map(|k| k.buffer_size())
}

/// Encode the length prefix for a message of `len` bytes.
pub fn encode_length(len: usize) -> Result<[u8; LENGTH_PREFIX_SIZE], DnsConnError> {
    let len = u16::try_from(len).map_err(|_| {
        DnsConnError::framing(format!(
            "message of {} bytes exceeds max of {} bytes",
            len,
            u16::MAX
        ))
    })?;

    let mut out = [0; LENGTH_PREFIX_SIZE];
    NetworkEndian::write_u16(&mut out, len);
    Ok(out)
}

/// Decode a length prefix and check that the message it announces is non-empty
/// and fits in a buffer of `capacity` bytes. When it doesn't fit, the returned
/// error carries the announced length so the caller can grow its buffer.
pub fn decode_length(prefix: [u8; LENGTH_PREFIX_SIZE], capacity: usize) -> Result<usize, DnsConnError> {
    let len = usize::from(NetworkEndian::read_u16(&prefix));
    if len == 0 {
        return Err(DnsConnError::zero_length("received zero length message"));
    }

    if len > capacity {
        return Err(DnsConnError::buffer_too_small(
            format!("message of {} bytes does not fit in buffer of {} bytes", len, capacity),
            len,
        ));
    }

    Ok(len)
}

/// Check that a buffer of `capacity` bytes can at least hold a length prefix.
pub fn check_prefix_capacity(capacity: usize) -> Result<(), DnsConnError> {
    if capacity < LENGTH_PREFIX_SIZE {
        Err(DnsConnError::buffer_too_small(
            format!("buffer of {} bytes cannot hold length prefix", capacity),
            LENGTH_PREFIX_SIZE,
        ))
    } else {
        Ok(())
    }
}
