use crate::core::{DnsConnError, ErrorKind};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Message authentication applied to raw wire bytes, e.g. TSIG.
///
/// Implementations see complete messages: `generate` receives the plaintext
/// message before it is framed and sent and returns it with an authentication
/// record appended, `verify` receives a fully assembled message after it has been
/// read. Any error returned aborts the read or write that invoked it.
pub trait Authenticator: Send + Sync {
    fn verify(&self, msg: &[u8]) -> Result<(), DnsConnError>;

    fn generate(&self, msg: &[u8]) -> Result<Vec<u8>, DnsConnError>;
}

/// Authentication to apply to every message read or written by a connection.
///
/// The hook is shared with the caller that attached it and not owned by the
/// connection.
#[derive(Clone, Default)]
pub enum Authentication {
    #[default]
    None,
    Hook(Arc<dyn Authenticator>),
}

impl Authentication {
    pub fn hook<A>(auth: A) -> Self
    where
        A: Authenticator + 'static,
    {
        Self::Hook(Arc::new(auth))
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Hook(_))
    }

    pub fn verify(&self, msg: &[u8]) -> Result<(), DnsConnError> {
        match self {
            Self::None => Ok(()),
            Self::Hook(a) => a.verify(msg).map_err(|e| auth_error("verify failed", e)),
        }
    }

    pub fn generate<'a>(&self, msg: &'a [u8]) -> Result<Cow<'a, [u8]>, DnsConnError> {
        match self {
            Self::None => Ok(Cow::Borrowed(msg)),
            Self::Hook(a) => a
                .generate(msg)
                .map(Cow::Owned)
                .map_err(|e| auth_error("generate failed", e)),
        }
    }
}

/// Any failure of a hook is an authentication failure, whatever kind of error it reports.
fn auth_error(msg: &str, e: DnsConnError) -> DnsConnError {
    if e.kind() == ErrorKind::Authentication {
        e
    } else {
        DnsConnError::authentication_cause(msg, e)
    }
}

impl fmt::Debug for Authentication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "Authentication::None"),
            Self::Hook(_) => write!(f, "Authentication::Hook(..)"),
        }
    }
}
