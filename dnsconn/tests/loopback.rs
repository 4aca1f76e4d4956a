#![allow(clippy::uninlined_format_args)]

use dnsconn::dns::{Connection, ConnectionConfig, MAX_MSG_SIZE};
use dnsconn::ErrorKind;
use rand::Rng;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream, UdpSocket};

const LOCALHOST: &str = "127.0.0.1:0";

/// Start a UDP server that echoes every datagram back to its sender.
async fn udp_echo_server() -> SocketAddr {
    let sock = UdpSocket::bind(LOCALHOST).await.expect("error binding UDP socket");
    let addr = sock.local_addr().expect("error getting local address");

    tokio::spawn(async move {
        let mut buf = vec![0; MAX_MSG_SIZE];
        loop {
            let (n, peer) = match sock.recv_from(&mut buf).await {
                Ok(v) => v,
                Err(e) => {
                    eprintln!("error reading from UDP socket: {}", e);
                    return;
                }
            };

            if let Err(e) = sock.send_to(&buf[..n], peer).await {
                eprintln!("error writing to UDP socket: {}", e);
                return;
            }
        }
    });

    addr
}

async fn tcp_pair() -> (TcpStream, TcpStream) {
    let listener = TcpListener::bind(LOCALHOST).await.expect("error binding TCP listener");
    let addr = listener.local_addr().expect("error getting local address");
    let (client, server) = tokio::join!(TcpStream::connect(addr), listener.accept());

    (
        client.expect("error connecting to TCP listener"),
        server.expect("error accepting TCP connection").0,
    )
}

#[tokio::test]
async fn test_udp_exchange_round_trip() {
    let server = udp_echo_server().await;
    let sock = UdpSocket::bind(LOCALHOST).await.unwrap();
    let mut conn = Connection::udp(sock, Some(server));

    let mut rng = rand::thread_rng();
    for _ in 0..50 {
        let len = rng.gen_range(1..=512);
        let request: Vec<u8> = (0..len).map(|_| rng.gen()).collect();

        let reply = conn.exchange(&request, false).await.unwrap();
        assert_eq!(request, reply);
        assert_eq!(Some(server), conn.remote());
        assert_eq!(Some(server.port()), conn.remote_port());
    }

    conn.close().await.unwrap();
}

#[tokio::test]
async fn test_udp_connected_socket_remote() {
    let server = udp_echo_server().await;
    let sock = UdpSocket::bind(LOCALHOST).await.unwrap();
    sock.connect(server).await.unwrap();
    let mut conn = Connection::udp(sock, None);

    assert_eq!(Some(server), conn.remote());
    let reply = conn.exchange(&[1, 2, 3], false).await.unwrap();
    assert_eq!(vec![1, 2, 3], reply);
}

#[tokio::test]
async fn test_udp_read_timeout() {
    let sock = UdpSocket::bind(LOCALHOST).await.unwrap();
    let mut conn = Connection::udp(sock, None);
    conn.set_config(ConnectionConfig {
        timeout: Duration::from_millis(50),
        attempts: 0,
    });
    conn.set_timeout();

    let err = conn.exchange(&[], true).await.unwrap_err();
    assert_eq!(ErrorKind::Timeout, err.kind());
}

#[tokio::test]
async fn test_tcp_exchange_fragmented_reply() {
    let (client, mut server) = tcp_pair().await;
    let mut conn = Connection::tcp(client).unwrap();
    assert_eq!(server.local_addr().ok(), conn.remote());

    let handle = tokio::spawn(async move {
        let len = server.read_u16().await.unwrap();
        let mut request = vec![0; usize::from(len)];
        server.read_exact(&mut request).await.unwrap();

        // Send the reply back a few bytes at a time so that the client has to
        // assemble it from multiple reads.
        let mut reply = (request.len() as u16).to_be_bytes().to_vec();
        reply.extend_from_slice(&request);
        for chunk in reply.chunks(3) {
            server.write_all(chunk).await.unwrap();
            server.flush().await.unwrap();
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        server
    });

    let request: Vec<u8> = (0..=255).collect();
    let reply = conn.exchange(&request, false).await.unwrap();
    assert_eq!(request, reply);

    let _server = handle.await.unwrap();
    conn.close().await.unwrap();
}

#[tokio::test]
async fn test_tcp_reply_too_large_for_buffer() {
    let (client, mut server) = tcp_pair().await;
    let mut conn = Connection::tcp(client).unwrap();

    server.write_all(&[0x01, 0x00]).await.unwrap();
    server.write_all(&[7; 256]).await.unwrap();

    let mut buf = vec![0; 128];
    let err = conn.read(&mut buf).await.unwrap_err();
    assert_eq!(ErrorKind::BufferTooSmall, err.kind());
    assert_eq!(Some(256), err.required_size());
}

#[tokio::test]
async fn test_tcp_zero_length_reply() {
    let (client, mut server) = tcp_pair().await;
    let mut conn = Connection::tcp(client).unwrap();

    server.write_all(&[0, 0, 1, 2, 3]).await.unwrap();

    let mut buf = conn.new_buffer();
    let err = conn.read(&mut buf).await.unwrap_err();
    assert_eq!(ErrorKind::ZeroLength, err.kind());
}

#[tokio::test]
async fn test_tcp_peer_closed_mid_message() {
    let (client, mut server) = tcp_pair().await;
    let mut conn = Connection::tcp(client).unwrap();

    server.write_all(&[0, 10, 1, 2, 3]).await.unwrap();
    drop(server);

    let mut buf = conn.new_buffer();
    let err = conn.read(&mut buf).await.unwrap_err();
    assert_eq!(ErrorKind::IO, err.kind());
}
