use std::error;
use std::fmt;
use std::io;
use std::time::Duration;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    /// The connection is not set up correctly for the requested operation.
    Configuration,
    /// The caller supplied buffer cannot hold the message being read.
    BufferTooSmall,
    /// A TCP length prefix declared an empty message.
    ZeroLength,
    /// Any other violation of the TCP length-prefix framing rules.
    Framing,
    Authentication,
    Timeout,
    IO,
    ShortWrite,
    Codec,
    Runtime,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration => write!(f, "configuration error"),
            Self::BufferTooSmall => write!(f, "buffer too small"),
            Self::ZeroLength => write!(f, "zero length message"),
            Self::Framing => write!(f, "framing error"),
            Self::Authentication => write!(f, "authentication error"),
            Self::Timeout => write!(f, "timeout"),
            Self::IO => write!(f, "io error"),
            Self::ShortWrite => write!(f, "short write"),
            Self::Codec => write!(f, "codec error"),
            Self::Runtime => write!(f, "runtime error"),
        }
    }
}

#[derive(Debug)]
enum ErrorRepr {
    Message(String),
    Cause(Box<dyn error::Error + Send + Sync + 'static>),
    MessageCause(String, Box<dyn error::Error + Send + Sync + 'static>),
    Size(String, usize),
}

#[derive(Debug)]
pub struct DnsConnError {
    kind: ErrorKind,
    repr: ErrorRepr,
}

impl DnsConnError {
    fn message<S>(kind: ErrorKind, msg: S) -> DnsConnError
    where
        S: Into<String>,
    {
        DnsConnError {
            kind,
            repr: ErrorRepr::Message(msg.into()),
        }
    }

    fn message_cause<S, E>(kind: ErrorKind, msg: S, e: E) -> DnsConnError
    where
        S: Into<String>,
        E: error::Error + Send + Sync + 'static,
    {
        DnsConnError {
            kind,
            repr: ErrorRepr::MessageCause(msg.into(), Box::new(e)),
        }
    }

    pub fn configuration<S>(msg: S) -> DnsConnError
    where
        S: Into<String>,
    {
        Self::message(ErrorKind::Configuration, msg)
    }

    /// A buffer could not hold a message of `required` bytes. The required size
    /// is available from [`DnsConnError::required_size`] so that callers can
    /// allocate a large enough buffer and try again.
    pub fn buffer_too_small<S>(msg: S, required: usize) -> DnsConnError
    where
        S: Into<String>,
    {
        DnsConnError {
            kind: ErrorKind::BufferTooSmall,
            repr: ErrorRepr::Size(msg.into(), required),
        }
    }

    pub fn zero_length<S>(msg: S) -> DnsConnError
    where
        S: Into<String>,
    {
        Self::message(ErrorKind::ZeroLength, msg)
    }

    pub fn framing<S>(msg: S) -> DnsConnError
    where
        S: Into<String>,
    {
        Self::message(ErrorKind::Framing, msg)
    }

    pub fn authentication<S>(msg: S) -> DnsConnError
    where
        S: Into<String>,
    {
        Self::message(ErrorKind::Authentication, msg)
    }

    pub fn authentication_cause<S, E>(msg: S, e: E) -> DnsConnError
    where
        S: Into<String>,
        E: error::Error + Send + Sync + 'static,
    {
        Self::message_cause(ErrorKind::Authentication, msg, e)
    }

    pub fn timeout<S>(t: Duration, operation: S) -> DnsConnError
    where
        S: fmt::Display,
    {
        Self::message(
            ErrorKind::Timeout,
            format!("operation {} timed out after {:?}", operation, t),
        )
    }

    pub fn short_write<S>(msg: S) -> DnsConnError
    where
        S: Into<String>,
    {
        Self::message(ErrorKind::ShortWrite, msg)
    }

    pub fn codec<S>(msg: S) -> DnsConnError
    where
        S: Into<String>,
    {
        Self::message(ErrorKind::Codec, msg)
    }

    pub fn codec_cause<S, E>(msg: S, e: E) -> DnsConnError
    where
        S: Into<String>,
        E: error::Error + Send + Sync + 'static,
    {
        Self::message_cause(ErrorKind::Codec, msg, e)
    }

    pub fn runtime<S>(msg: S) -> DnsConnError
    where
        S: Into<String>,
    {
        Self::message(ErrorKind::Runtime, msg)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Number of bytes a buffer must be able to hold for the operation to
    /// succeed, set only for `ErrorKind::BufferTooSmall` errors.
    pub fn required_size(&self) -> Option<usize> {
        match &self.repr {
            ErrorRepr::Size(_, n) => Some(*n),
            _ => None,
        }
    }

    /// Return true if this error was caused by a deadline expiring, either one
    /// enforced by this crate or one reported by the operating system.
    pub fn is_timeout(&self) -> bool {
        self.kind == ErrorKind::Timeout
    }
}

impl fmt::Display for DnsConnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repr {
            ErrorRepr::Message(msg) => write!(f, "{}: {}", self.kind, msg),
            ErrorRepr::Cause(e) => write!(f, "{}: {}", self.kind, e),
            ErrorRepr::MessageCause(msg, e) => write!(f, "{}: {}: {}", self.kind, msg, e),
            ErrorRepr::Size(msg, n) => write!(f, "{}: {} (need {} bytes)", self.kind, msg, n),
        }
    }
}

impl error::Error for DnsConnError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match &self.repr {
            ErrorRepr::Message(_) => None,
            ErrorRepr::Cause(e) => Some(e.as_ref()),
            ErrorRepr::MessageCause(_, e) => Some(e.as_ref()),
            ErrorRepr::Size(_, _) => None,
        }
    }
}

impl From<io::Error> for DnsConnError {
    fn from(e: io::Error) -> Self {
        // Sockets with OS level deadlines report them as `TimedOut` or `WouldBlock`
        // depending on the platform. Both count as a timeout for retry purposes.
        let kind = match e.kind() {
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => ErrorKind::Timeout,
            _ => ErrorKind::IO,
        };

        DnsConnError {
            kind,
            repr: ErrorRepr::Cause(Box::new(e)),
        }
    }
}

impl From<(String, io::Error)> for DnsConnError {
    fn from((s, e): (String, io::Error)) -> Self {
        let kind = match e.kind() {
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => ErrorKind::Timeout,
            _ => ErrorKind::IO,
        };

        DnsConnError {
            kind,
            repr: ErrorRepr::MessageCause(s, Box::new(e)),
        }
    }
}
