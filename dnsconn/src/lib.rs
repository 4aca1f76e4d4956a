#![allow(clippy::uninlined_format_args)]
#![warn(missing_debug_implementations, unreachable_pub)]
#![deny(unused_must_use)]

mod core;
pub mod dns;
mod timeout;

pub use crate::core::{DnsConnError, ErrorKind};
pub use crate::timeout::{Timed, Timeout};
