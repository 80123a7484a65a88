//! Shared utilities for integration testing.
//!
//! Mock backends speak raw HTTP/1.1 over TCP so the tests see exactly what
//! the gateway put on the wire.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use edge_gateway::{GatewayConfig, GatewayServer, Shutdown};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, Notify};

/// A request as received by a mock backend.
#[derive(Debug, Clone)]
pub struct Captured {
    pub method: String,
    /// Request target, path plus query.
    pub target: String,
    /// Header names lowercased, in arrival order.
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Captured {
    pub fn header(&self, name: &str) -> Option<&str> {
        header(&self.headers, name)
    }
}

/// Response a programmable backend sends back.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status_line: &'static str,
    pub headers: Vec<(&'static str, String)>,
    pub body: String,
}

impl MockResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self::with_status("200 OK", body)
    }

    pub fn with_status(status_line: &'static str, body: impl Into<String>) -> Self {
        Self {
            status_line,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }
}

fn header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Decode a complete chunked body, or `None` if more bytes are needed.
fn decode_chunked(mut raw: &[u8]) -> Option<Vec<u8>> {
    let mut out = Vec::new();
    loop {
        let line_end = find(raw, b"\r\n")?;
        let size_text = std::str::from_utf8(&raw[..line_end]).ok()?;
        let size = usize::from_str_radix(size_text.split(';').next()?.trim(), 16).ok()?;
        raw = &raw[line_end + 2..];
        if size == 0 {
            return find(raw, b"\r\n").map(|_| out);
        }
        if raw.len() < size + 2 {
            return None;
        }
        out.extend_from_slice(&raw[..size]);
        raw = &raw[size + 2..];
    }
}

async fn read_request(socket: &mut TcpStream) -> Option<Captured> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let head_end = loop {
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            break pos + 4;
        }
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split(' ');
    let method = request_line.next()?.to_string();
    let target = request_line.next()?.to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|l| l.split_once(':'))
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();

    let mut body = buf[head_end..].to_vec();
    if let Some(len) = header(&headers, "content-length").and_then(|v| v.parse::<usize>().ok()) {
        while body.len() < len {
            let n = socket.read(&mut chunk).await.ok()?;
            if n == 0 {
                break;
            }
            body.extend_from_slice(&chunk[..n]);
        }
        body.truncate(len);
    } else if header(&headers, "transfer-encoding").is_some_and(|v| v.contains("chunked")) {
        body = loop {
            if let Some(decoded) = decode_chunked(&body) {
                break decoded;
            }
            let n = socket.read(&mut chunk).await.ok()?;
            if n == 0 {
                return None;
            }
            body.extend_from_slice(&chunk[..n]);
        };
    }

    Some(Captured {
        method,
        target,
        headers,
        body,
    })
}

/// Start a programmable backend on an ephemeral loopback port.
///
/// Every received request is also sent to the returned channel.
pub async fn start_backend<F>(respond: F) -> (SocketAddr, mpsc::UnboundedReceiver<Captured>)
where
    F: Fn(&Captured) -> MockResponse + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();
    let respond = Arc::new(respond);

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let tx = tx.clone();
            let respond = respond.clone();
            tokio::spawn(async move {
                let Some(request) = read_request(&mut socket).await else {
                    return;
                };
                let response = respond(&request);
                let _ = tx.send(request);

                let mut raw = format!("HTTP/1.1 {}\r\n", response.status_line);
                for (name, value) in &response.headers {
                    raw.push_str(&format!("{name}: {value}\r\n"));
                }
                raw.push_str(&format!(
                    "Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                    response.body.len(),
                    response.body
                ));
                let _ = socket.write_all(raw.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    (addr, rx)
}

/// Start a backend that replies with a fixed body to everything.
pub async fn start_mock_backend(body: &'static str) -> (SocketAddr, mpsc::UnboundedReceiver<Captured>) {
    start_backend(move |_| MockResponse::ok(body)).await
}

/// Start an event-stream backend that sends `first`, waits for `gate`,
/// then sends `second` and ends the stream. It labels the body JSON so the
/// gateway's overlay is observable.
pub async fn start_gated_stream_backend(
    first: &'static str,
    second: &'static str,
    gate: Arc<Notify>,
) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let gate = gate.clone();
            tokio::spawn(async move {
                if read_request(&mut socket).await.is_none() {
                    return;
                }
                let head = "HTTP/1.1 200 OK\r\n\
                            Content-Type: application/json\r\n\
                            Cache-Control: max-age=3600\r\n\
                            Transfer-Encoding: chunked\r\n\r\n";
                let _ = socket.write_all(head.as_bytes()).await;
                let _ = socket
                    .write_all(format!("{:x}\r\n{}\r\n", first.len(), first).as_bytes())
                    .await;
                let _ = socket.flush().await;

                gate.notified().await;

                let _ = socket
                    .write_all(format!("{:x}\r\n{}\r\n0\r\n\r\n", second.len(), second).as_bytes())
                    .await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// Start a backend that accepts connections and reads the request but
/// never answers. Connections stay open until the test ends.
pub async fn start_silent_backend() -> (SocketAddr, mpsc::UnboundedReceiver<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let tx = tx.clone();
            tokio::spawn(async move {
                if let Some(request) = read_request(&mut socket).await {
                    let _ = tx.send(request);
                }
                std::future::pending::<()>().await;
            });
        }
    });

    (addr, rx)
}

/// Send `target` as-is on a raw connection and return the response status
/// code and body. Used where an HTTP client would normalize the path.
pub async fn raw_get(gateway: SocketAddr, target: &str) -> (u16, String) {
    let mut socket = TcpStream::connect(gateway).await.unwrap();
    let request = format!("GET {target} HTTP/1.1\r\nHost: {gateway}\r\nConnection: close\r\n\r\n");
    socket.write_all(request.as_bytes()).await.unwrap();

    let mut raw = Vec::new();
    socket.read_to_end(&mut raw).await.unwrap();
    let text = String::from_utf8_lossy(&raw).to_string();

    let status = text
        .split(' ')
        .nth(1)
        .and_then(|code| code.parse().ok())
        .unwrap();
    let head_end = find(&raw, b"\r\n\r\n").unwrap() + 4;
    let chunked = text[..head_end]
        .to_ascii_lowercase()
        .contains("transfer-encoding: chunked");
    let body = if chunked {
        decode_chunked(&raw[head_end..]).unwrap()
    } else {
        raw[head_end..].to_vec()
    };
    (status, String::from_utf8(body).unwrap())
}

/// A loopback address nothing listens on.
pub fn unused_addr() -> SocketAddr {
    let socket = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    socket.local_addr().unwrap()
}

/// Run a gateway on an ephemeral port. Trigger the returned [`Shutdown`]
/// to stop it.
pub async fn start_gateway(mut config: GatewayConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    config.listener.bind_address = addr.to_string();

    let shutdown = Shutdown::new();
    let server = GatewayServer::new(config).expect("gateway config");
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap()
}

/// Gateway config pointed at `backend`.
pub fn config_for(backend: SocketAddr) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.backend.base_url = format!("http://{backend}");
    config
}

/// Assert no request reached a backend within a short window.
pub async fn assert_untouched(rx: &mut mpsc::UnboundedReceiver<Captured>) {
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(rx.try_recv().is_err(), "backend should not have been contacted");
}
