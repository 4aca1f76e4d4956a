use crate::core::DnsConnError;
use crate::dns::auth::Authentication;
use crate::dns::codec::{Pack, Unpack};
use crate::dns::framing::{self, TransportKind, LENGTH_PREFIX_SIZE};
use crate::timeout::Timeout;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpStream, UdpSocket};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);
const DEFAULT_ATTEMPTS: u8 = 1;

/// Socket that sends and receives whole datagrams to and from any peer.
#[allow(async_fn_in_trait)]
pub trait Datagram {
    async fn send_to(&self, buf: &[u8], target: SocketAddr) -> io::Result<usize>;
    async fn recv_from(&self, buf: &mut [u8]) -> io::Result<(usize, SocketAddr)>;
}

impl Datagram for UdpSocket {
    async fn send_to(&self, buf: &[u8], target: SocketAddr) -> io::Result<usize> {
        UdpSocket::send_to(self, buf, target).await
    }

    async fn recv_from(&self, buf: &mut [u8]) -> io::Result<(usize, SocketAddr)> {
        UdpSocket::recv_from(self, buf).await
    }
}

/// Timeout and retry settings for a `Connection`.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct ConnectionConfig {
    /// Deadline for each individual socket operation. Zero means the default
    /// of one second.
    pub timeout: Duration,

    /// Number of times a write is attempted when the socket times out. Zero
    /// means the default of a single attempt.
    pub attempts: u8,
}

impl ConnectionConfig {
    pub fn effective_timeout(&self) -> Duration {
        if self.timeout.is_zero() {
            DEFAULT_TIMEOUT
        } else {
            self.timeout
        }
    }

    pub fn effective_attempts(&self) -> u8 {
        if self.attempts == 0 {
            DEFAULT_ATTEMPTS
        } else {
            self.attempts
        }
    }
}

/// The single socket a `Connection` reads from and writes to.
#[derive(Debug)]
pub enum Socket<D, S> {
    Udp(D),
    Tcp(S),
}

impl<D, S> Socket<D, S> {
    pub fn kind(&self) -> TransportKind {
        match self {
            Socket::Udp(_) => TransportKind::Udp,
            Socket::Tcp(_) => TransportKind::Tcp,
        }
    }
}

/// Builder for a `Connection` from already established sockets.
///
/// Exactly one of a UDP socket or TCP stream must be set, anything else is
/// rejected with a configuration error by [`ConnectionBuilder::build`].
#[derive(Debug)]
pub struct ConnectionBuilder<D = UdpSocket, S = TcpStream> {
    udp: Option<D>,
    tcp: Option<S>,
    remote: Option<SocketAddr>,
    auth: Authentication,
    config: ConnectionConfig,
}

impl<D, S> ConnectionBuilder<D, S> {
    pub fn new() -> Self {
        Self {
            udp: None,
            tcp: None,
            remote: None,
            auth: Authentication::None,
            config: ConnectionConfig::default(),
        }
    }

    pub fn udp(mut self, sock: D) -> Self {
        self.udp = Some(sock);
        self
    }

    pub fn tcp(mut self, stream: S) -> Self {
        self.tcp = Some(stream);
        self
    }

    pub fn remote(mut self, addr: SocketAddr) -> Self {
        self.remote = Some(addr);
        self
    }

    pub fn authentication(mut self, auth: Authentication) -> Self {
        self.auth = auth;
        self
    }

    pub fn config(mut self, config: ConnectionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<Connection<D, S>, DnsConnError> {
        let socket = match (self.udp, self.tcp) {
            (Some(udp), None) => Socket::Udp(udp),
            (None, Some(tcp)) => Socket::Tcp(tcp),
            (Some(_), Some(_)) => return Err(DnsConnError::configuration("UDP and TCP are both set")),
            (None, None) => return Err(DnsConnError::configuration("neither UDP nor TCP is set")),
        };

        Ok(Connection {
            socket,
            remote: self.remote,
            auth: self.auth,
            config: self.config,
            deadline: self.config.effective_timeout(),
        })
    }
}

impl<D, S> Default for ConnectionBuilder<D, S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Connection that moves raw DNS messages over a single UDP socket or TCP stream.
///
/// Messages sent over TCP are framed with a two byte, big-endian, length prefix.
/// Every socket operation is bounded by the deadline from the connection config
/// and writes that time out are retried up to the configured number of attempts.
/// If authentication is set, every message written is signed and every message
/// read is verified.
///
/// Reply messages are not matched to requests, callers must check that the
/// reply they get is the one they are expecting.
#[derive(Debug)]
pub struct Connection<D = UdpSocket, S = TcpStream> {
    socket: Socket<D, S>,
    remote: Option<SocketAddr>,
    auth: Authentication,
    config: ConnectionConfig,
    deadline: Duration,
}

impl Connection<UdpSocket, TcpStream> {
    /// Create a new connection from a UDP socket. Messages are written to `remote`
    /// or, if not supplied, the address the socket is connected to. The remote is
    /// replaced by the sender of each message read.
    pub fn udp(sock: UdpSocket, remote: Option<SocketAddr>) -> Self {
        let remote = remote.or_else(|| sock.peer_addr().ok());
        let config = ConnectionConfig::default();

        Self {
            socket: Socket::Udp(sock),
            remote,
            auth: Authentication::None,
            config,
            deadline: config.effective_timeout(),
        }
    }

    /// Create a new connection from an established TCP stream.
    pub fn tcp(stream: TcpStream) -> Result<Self, DnsConnError> {
        let remote = stream.peer_addr()?;
        let config = ConnectionConfig::default();

        Ok(Self {
            socket: Socket::Tcp(stream),
            remote: Some(remote),
            auth: Authentication::None,
            config,
            deadline: config.effective_timeout(),
        })
    }
}

impl<D, S> Connection<D, S>
where
    D: Datagram,
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn transport(&self) -> TransportKind {
        self.socket.kind()
    }

    /// Address of the peer: the TCP peer or the sender of the most recent UDP message.
    pub fn remote(&self) -> Option<SocketAddr> {
        self.remote
    }

    pub fn remote_port(&self) -> Option<u16> {
        self.remote.map(|a| a.port())
    }

    pub fn config(&self) -> ConnectionConfig {
        self.config
    }

    /// Replace the timeout and retry settings. The new timeout is applied to the
    /// socket by the next call to [`Connection::set_timeout`] or [`Connection::write`].
    pub fn set_config(&mut self, config: ConnectionConfig) {
        self.config = config;
    }

    pub fn authentication(&self) -> &Authentication {
        &self.auth
    }

    pub fn set_authentication(&mut self, auth: Authentication) {
        self.auth = auth;
    }

    /// Create a new buffer large enough to read a message with the current
    /// transport: 64KiB for TCP and 4KiB for UDP.
    pub fn new_buffer(&self) -> Vec<u8> {
        vec![0; self.transport().buffer_size()]
    }

    /// Apply the configured timeout, or the default of one second, as the
    /// deadline for every subsequent operation on the socket.
    pub fn set_timeout(&mut self) -> Duration {
        self.deadline = self.config.effective_timeout();
        tracing::trace!(message = "applied socket deadline", transport = %self.transport(), deadline = ?self.deadline);
        self.deadline
    }

    /// Read a single message into `buf`, returning the size of the message.
    ///
    /// Messages read over TCP that don't fit in `buf` result in an error of kind
    /// `ErrorKind::BufferTooSmall` with the size of the message available via
    /// [`DnsConnError::required_size`]. The message itself is left unread.
    pub async fn read(&mut self, buf: &mut [u8]) -> Result<usize, DnsConnError> {
        let n = match &mut self.socket {
            Socket::Udp(sock) => {
                let (n, addr) = sock.recv_from(buf).timeout(self.deadline, "udp.recv_from").await?;
                self.remote = Some(addr);
                n
            }
            Socket::Tcp(stream) => read_frame(stream, buf, self.deadline).await?,
        };

        self.auth.verify(&buf[..n])?;
        Ok(n)
    }

    /// Write the message in `buf`, returning the number of bytes of the message
    /// written. The count includes any authentication record added to it.
    pub async fn write(&mut self, buf: &[u8]) -> Result<usize, DnsConnError> {
        let attempts = self.config.effective_attempts();
        let deadline = self.set_timeout();
        let msg = self.auth.generate(buf)?;

        match &mut self.socket {
            Socket::Udp(sock) => {
                let remote = self
                    .remote
                    .ok_or_else(|| DnsConnError::configuration("no remote address to send UDP message to"))?;
                send_datagram(sock, &msg, remote, attempts, deadline).await
            }
            Socket::Tcp(stream) => write_frame(stream, &msg, attempts, deadline).await,
        }
    }

    /// Close the connection, shutting down the write side of a TCP stream.
    pub async fn close(self) -> Result<(), DnsConnError> {
        match self.socket {
            Socket::Udp(_) => Ok(()),
            Socket::Tcp(mut stream) => stream.shutdown().timeout(self.deadline, "tcp.shutdown").await,
        }
    }

    /// Write `request` and read a single reply, returning the raw reply. When
    /// `skip_send` is true, no request is written and only the reply is read.
    pub async fn exchange(&mut self, request: &[u8], skip_send: bool) -> Result<Vec<u8>, DnsConnError> {
        if !skip_send {
            self.write(request).await?;
        }

        let mut reply = self.new_buffer();
        let n = self.read(&mut reply).await?;
        reply.truncate(n);
        Ok(reply)
    }

    /// Read a single message and decode it.
    pub async fn read_message<M>(&mut self) -> Result<M, DnsConnError>
    where
        M: Unpack,
    {
        let mut buf = self.new_buffer();
        let n = self.read(&mut buf).await?;
        M::unpack(&buf[..n])
    }

    /// Encode a message and write it.
    pub async fn write_message<M>(&mut self, msg: &M) -> Result<(), DnsConnError>
    where
        M: Pack,
    {
        let out = msg.pack()?;
        self.write(&out).await.map(|_| ())
    }
}

async fn read_frame<S>(stream: &mut S, buf: &mut [u8], deadline: Duration) -> Result<usize, DnsConnError>
where
    S: AsyncRead + Unpin,
{
    framing::check_prefix_capacity(buf.len())?;

    let mut prefix = [0; LENGTH_PREFIX_SIZE];
    stream.read_exact(&mut prefix).timeout(deadline, "tcp.read_length").await?;
    let len = framing::decode_length(prefix, buf.len())?;

    // A single read from a stream may only return part of a message so keep
    // reading until we have all of it. Read no further than the end of this
    // message so that the next one is left intact on the stream.
    let mut read = 0;
    while read < len {
        let n = stream.read(&mut buf[read..len]).timeout(deadline, "tcp.read").await?;
        if n == 0 {
            return Err(DnsConnError::from(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("connection closed after {} of {} message bytes", read, len),
            )));
        }

        read += n;
        if read < len {
            tracing::trace!(message = "partial read of message", read = read, len = len);
        }
    }

    Ok(len)
}

async fn send_datagram<D>(
    sock: &D,
    msg: &[u8],
    remote: SocketAddr,
    attempts: u8,
    deadline: Duration,
) -> Result<usize, DnsConnError>
where
    D: Datagram,
{
    let mut attempt = 0;
    loop {
        let send = async {
            sock.send_to(msg, remote)
                .await
                .map_err(|e| (format!("sending to {}", remote), e))
        };

        match send.timeout(deadline, "udp.send_to").await {
            Ok(n) if n == msg.len() => return Ok(n),
            Ok(n) => {
                return Err(DnsConnError::short_write(format!(
                    "sent {} of {} message bytes to {}",
                    n,
                    msg.len(),
                    remote
                )))
            }
            Err(e) if e.is_timeout() && attempt + 1 < attempts => {
                attempt += 1;
                tracing::debug!(message = "retrying UDP send after timeout", attempt = attempt, max_attempts = attempts, remote = %remote, err = %e);
            }
            Err(e) => return Err(e),
        }
    }
}

async fn write_frame<S>(stream: &mut S, msg: &[u8], attempts: u8, deadline: Duration) -> Result<usize, DnsConnError>
where
    S: AsyncWrite + Unpin,
{
    let prefix = framing::encode_length(msg.len())?;

    let mut attempt = 0;
    let n = loop {
        match stream.write(&prefix).timeout(deadline, "tcp.write_length").await {
            Ok(n) => break n,
            Err(e) if e.is_timeout() && attempt + 1 < attempts => {
                attempt += 1;
                tracing::debug!(message = "retrying TCP length write after timeout", attempt = attempt, max_attempts = attempts, err = %e);
            }
            Err(e) => return Err(e),
        }
    };

    if n != LENGTH_PREFIX_SIZE {
        return Err(DnsConnError::short_write(format!(
            "write failure: wrote {} of {} length prefix bytes",
            n, LENGTH_PREFIX_SIZE
        )));
    }

    // Each write picks up where the previous one stopped so that a timeout part
    // way through the message doesn't cause any of it to be sent twice. The
    // message gets the same attempt budget as the length prefix.
    let mut written = 0;
    let mut attempt = 0;
    while written < msg.len() {
        match stream.write(&msg[written..]).timeout(deadline, "tcp.write").await {
            Ok(0) => {
                return Err(DnsConnError::short_write(format!(
                    "write failure: wrote {} of {} message bytes",
                    written,
                    msg.len()
                )))
            }
            Ok(n) => {
                written += n;
                if written < msg.len() {
                    tracing::trace!(message = "partial write of message", written = written, len = msg.len());
                }
            }
            Err(e) if e.is_timeout() && attempt + 1 < attempts => {
                attempt += 1;
                tracing::debug!(message = "retrying TCP message write after timeout", attempt = attempt, max_attempts = attempts, written = written, err = %e);
            }
            Err(e) => return Err(e),
        }
    }

    stream.flush().timeout(deadline, "tcp.flush").await?;
    Ok(written)
}
