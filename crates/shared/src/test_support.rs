//! Local HTTP server for exercising the fetch and model clients without the network.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;

/// Serve a single request with the given status line and body, then close.
/// Returns the base URL, e.g. `http://127.0.0.1:41669`.
pub fn serve_once(status: &'static str, content_type: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    thread::spawn(move || {
        let Ok((mut stream, _)) = listener.accept() else {
            return;
        };
        read_request(&mut stream);

        let response = format!(
            "HTTP/1.1 {}\r\ncontent-type: {}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status,
            content_type,
            body.len(),
            body
        );
        let _ = stream.write_all(response.as_bytes());
        let _ = stream.flush();
    });

    format!("http://{}", addr)
}

/// A URL on a port nothing listens on.
pub fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/", addr)
}

/// Consume headers and any content-length body so the client sees a clean exchange.
fn read_request(stream: &mut impl Read) {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];

    let header_end = loop {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => return,
            Ok(n) => data.extend_from_slice(&buf[..n]),
        }
        if let Some(pos) = data.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let headers = String::from_utf8_lossy(&data[..header_end]).to_lowercase();
    let content_length = headers
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    let mut body_read = data.len() - header_end;
    while body_read < content_length {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => return,
            Ok(n) => body_read += n,
        }
    }
}
