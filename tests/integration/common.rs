use purr_links::config::{Config, ResolverConfig};
use purr_links::WebLinkResolver;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::{Request, Respond, ResponseTemplate};

/// Short timeouts so failure tests finish quickly
pub fn fast_resolver_config() -> ResolverConfig {
    ResolverConfig {
        connect_timeout_ms: 500,
        read_timeout_ms: 500,
        ..ResolverConfig::default()
    }
}

pub fn fast_config() -> Config {
    Config {
        resolver: fast_resolver_config(),
        ..Config::default()
    }
}

pub fn resolver() -> WebLinkResolver {
    WebLinkResolver::from_config(&fast_resolver_config()).expect("Failed to build resolver")
}

pub fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/html")
}

/// Answers every request with a redirect to a path never seen before
pub struct EndlessRedirect {
    served: AtomicUsize,
}

impl EndlessRedirect {
    pub fn new() -> Self {
        Self {
            served: AtomicUsize::new(0),
        }
    }
}

impl Respond for EndlessRedirect {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let next = self.served.fetch_add(1, Ordering::SeqCst) + 1;
        ResponseTemplate::new(302).insert_header("Location", format!("/hop/{}", next).as_str())
    }
}

/// Starts a bare HTTP server whose GET responses have no `Content-Length`
/// and end when the connection closes
///
/// Returns the `host:port` it listens on.
pub async fn start_close_delimited_server(content_type: &'static str, body: Vec<u8>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind listener");
    let addr = listener.local_addr().expect("Failed to read local address");

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let body = body.clone();
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }

                if request.starts_with(b"HEAD") {
                    let _ = socket
                        .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\nConnection: close\r\n\r\n")
                        .await;
                } else {
                    let head = format!(
                        "HTTP/1.1 200 OK\r\nContent-Type: {}\r\nConnection: close\r\n\r\n",
                        content_type
                    );
                    let _ = socket.write_all(head.as_bytes()).await;
                    let _ = socket.write_all(&body).await;
                }
                let _ = socket.shutdown().await;
            });
        }
    });

    addr.to_string()
}

/// Returns a local port with nothing listening on it
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind listener");
    let port = listener.local_addr().expect("Failed to read local address").port();
    drop(listener);
    port
}

/// Starts a server that reads whatever the client sends first, answers with
/// `reply` (nothing when empty) and closes the connection
///
/// Pointed at with `https://`, the first read is the TLS ClientHello.
pub async fn start_hangup_server(reply: &'static [u8]) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind listener");
    let addr = listener.local_addr().expect("Failed to read local address");

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                if matches!(socket.read(&mut buf).await, Ok(n) if n > 0) && !reply.is_empty() {
                    let _ = socket.write_all(reply).await;
                }
                let _ = socket.shutdown().await;
            });
        }
    });

    addr.to_string()
}

/// Starts an HTML server whose GET body never ends: one filler line every
/// `interval`, never a title
pub async fn start_trickle_server(interval: Duration) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind listener");
    let addr = listener.local_addr().expect("Failed to read local address");

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }

                if request.starts_with(b"HEAD") {
                    let _ = socket
                        .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\nConnection: close\r\n\r\n")
                        .await;
                    return;
                }

                let head = b"HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nConnection: close\r\n\r\n";
                if socket.write_all(head).await.is_err() {
                    return;
                }
                while socket.write_all(b"<p>still loading</p>\n").await.is_ok() {
                    tokio::time::sleep(interval).await;
                }
            });
        }
    });

    addr.to_string()
}
