#![no_main]

use dnsconn::dns::{ConnectionBuilder, LENGTH_PREFIX_SIZE, MAX_MSG_SIZE};
use libfuzzer_sys::{Corpus, fuzz_target};
use tokio::io::{AsyncWriteExt, DuplexStream};
use tokio::net::UdpSocket;

fuzz_target!(|data: &[u8]| -> Corpus {
    // Everything has to fit in the in-memory stream before it's read
    if data.len() > MAX_MSG_SIZE + LENGTH_PREFIX_SIZE {
        return Corpus::Reject;
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();

    runtime.block_on(async {
        let (client, mut server) = tokio::io::duplex(MAX_MSG_SIZE + LENGTH_PREFIX_SIZE);
        server.write_all(data).await.unwrap();
        drop(server);

        let mut conn = ConnectionBuilder::<UdpSocket, DuplexStream>::new()
            .tcp(client)
            .build()
            .unwrap();

        let mut buf = conn.new_buffer();
        match conn.read(&mut buf).await {
            Ok(n) => {
                assert!(n > 0);
                assert_eq!(&data[LENGTH_PREFIX_SIZE..LENGTH_PREFIX_SIZE + n], &buf[..n]);
                Corpus::Keep
            }
            Err(_) => Corpus::Reject,
        }
    })
});
