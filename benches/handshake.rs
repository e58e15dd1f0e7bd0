//! Performance benchmarks for the upgrade handshake.
//!
//! Run with: `cargo bench`

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use wsaccept::HandshakeError;
use wsaccept::protocol::handshake::{compute_accept_key, negotiate, write_rejection};
use wsaccept::protocol::request::{Request, find_head_end};

const REQUEST: &[u8] = b"GET /chat HTTP/1.1\r\n\
    Host: server.example.com\r\n\
    Upgrade: websocket\r\n\
    Connection: Upgrade\r\n\
    Sec-WebSocket-Key: dGhlIHNhbXBsZSBub25jZQ==\r\n\
    Sec-WebSocket-Version: 13\r\n\
    Origin: http://example.com\r\n\
    Sec-WebSocket-Protocol: chat\r\n\
    User-Agent: bench/1.0\r\n\
    Accept-Encoding: gzip, deflate\r\n\
    \r\n";

fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("request_head");

    group.bench_function("find_head_end", |b| {
        b.iter(|| find_head_end(black_box(REQUEST)))
    });

    group.bench_function("parse", |b| b.iter(|| Request::parse(black_box(REQUEST))));

    group.finish();
}

fn bench_handshake(c: &mut Criterion) {
    let mut group = c.benchmark_group("handshake");

    group.bench_function("compute_accept_key", |b| {
        b.iter(|| compute_accept_key(black_box("dGhlIHNhbXBsZSBub25jZQ==")))
    });

    group.bench_function("negotiate_and_write", |b| {
        let mut buf = Vec::with_capacity(256);
        b.iter(|| {
            buf.clear();
            if let Ok(response) = negotiate(black_box(REQUEST)) {
                response.write(&mut buf);
            }
        })
    });

    group.bench_function("write_rejection", |b| {
        let mut buf = Vec::with_capacity(256);
        let err = HandshakeError::MissingKey;
        b.iter(|| {
            buf.clear();
            write_rejection(&mut buf, black_box(&err));
        })
    });

    group.finish();
}

criterion_group!(benches, bench_parsing, bench_handshake);
criterion_main!(benches);
