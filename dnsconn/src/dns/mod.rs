mod auth;
mod codec;
mod conn;
mod core;
mod framing;
mod name;
mod record;

pub use crate::dns::auth::{Authentication, Authenticator};
pub use crate::dns::codec::{Pack, Unpack};
pub use crate::dns::conn::{Connection, ConnectionBuilder, ConnectionConfig, Datagram, Socket};
pub use crate::dns::core::{CodeTables, RecordClass, RecordType};
pub use crate::dns::framing::{
    buffer_size, check_prefix_capacity, decode_length, encode_length, TransportKind, DEFAULT_MSG_SIZE,
    LENGTH_PREFIX_SIZE, MAX_MSG_SIZE,
};
pub use crate::dns::name::{is_fqdn, label_count};
pub use crate::dns::record::{Record, RecordData, RecordHeader, RecordSet};
