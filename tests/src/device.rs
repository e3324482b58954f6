use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// First byte of a TLS record carrying a handshake.
const TLS_HANDSHAKE: u8 = 0x16;

/// A fake phone answering every request, HTTPS included, with the same
/// plain HTTP page. TLS clients therefore see a protocol mismatch and fall
/// back to HTTP.
pub struct MockDevice {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl MockDevice {
    pub async fn serve(page: impl Into<String>) -> Self {
        let listener: TcpListener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr: SocketAddr = listener.local_addr().unwrap();
        let page: Arc<String> = Arc::new(page.into());

        let handle = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(respond(stream, page.clone()));
            }
        });

        Self { addr, handle }
    }

    /// `127.0.0.1:<port>`, as it would appear in an address file.
    pub fn address(&self) -> String {
        self.addr.to_string()
    }
}

impl Drop for MockDevice {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn respond(mut stream: TcpStream, page: Arc<String>) {
    let mut buf = [0u8; 4096];
    let mut request: Vec<u8> = Vec::new();
    loop {
        match stream.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
        let tls: bool = request.first() == Some(&TLS_HANDSHAKE);
        if tls || request.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }

    let response: String = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        page.len(),
        page
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}

/// An address on which nothing listens.
pub async fn refused_address() -> String {
    let listener: TcpListener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    drop(listener);
    addr.to_string()
}

/// A status page with the battery block in the third table.
pub fn battery_page(health: &str, temperature: &str) -> String {
    page_with_tables(&[
        "<tr><td>Model</td><td>CP-8821</td></tr>",
        "<tr><td>Battery health</td><td>Decoy</td></tr>",
        &format!(
            "<tr><td>Battery health</td><td>{health}</td></tr>\
             <tr><td>Battery temperature: </td><td>{temperature}</td></tr>"
        ),
        "<tr><td>Battery temperature: </td><td>99 degrees Celsius</td></tr>",
    ])
}

pub fn page_with_tables(tables: &[&str]) -> String {
    let body: String = tables
        .iter()
        .map(|rows| format!("<table>{rows}</table>"))
        .collect();
    format!("<html><head><title>Device Information</title></head><body>{body}</body></html>")
}
