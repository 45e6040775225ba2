//! Shared utilities for integration testing.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use gateway_block_page::cache::{CacheError, KvStore};
use gateway_block_page::BlockPageConfig;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tower::ServiceExt;

pub const RULE_BODY: &str = r#"{"success":true,"errors":[],"result":{"id":"r1","name":"Block Gambling"}}"#;

/// Calls observed by a mock upstream.
#[derive(Clone, Default)]
pub struct CallLog {
    count: Arc<AtomicU32>,
    heads: Arc<Mutex<Vec<String>>>,
    times: Arc<Mutex<Vec<Instant>>>,
}

impl CallLog {
    pub fn count(&self) -> u32 {
        self.count.load(Ordering::SeqCst)
    }

    pub fn heads(&self) -> Vec<String> {
        self.heads.lock().unwrap().clone()
    }

    /// Gaps between consecutive calls.
    pub fn gaps(&self) -> Vec<Duration> {
        let times = self.times.lock().unwrap();
        times.windows(2).map(|w| w[1] - w[0]).collect()
    }
}

fn status_line(status: u16) -> &'static str {
    match status {
        200 => "200 OK",
        401 => "401 Unauthorized",
        403 => "403 Forbidden",
        404 => "404 Not Found",
        429 => "429 Too Many Requests",
        500 => "500 Internal Server Error",
        502 => "502 Bad Gateway",
        503 => "503 Service Unavailable",
        _ => "200 OK",
    }
}

async fn read_head(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::with_capacity(1024);
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") && buf.len() < 16 * 1024 {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Start a programmable mock upstream on an ephemeral port.
///
/// `f` receives the zero-based call index and returns `(status, body)`.
pub async fn start_programmable_backend<F, Fut>(f: F) -> (SocketAddr, CallLog)
where
    F: Fn(u32) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let log = CallLog::default();
    let f = Arc::new(f);

    let task_log = log.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    let log = task_log.clone();
                    tokio::spawn(async move {
                        let head = read_head(&mut socket).await;
                        log.times.lock().unwrap().push(Instant::now());
                        log.heads.lock().unwrap().push(head);
                        let index = log.count.fetch_add(1, Ordering::SeqCst);

                        let (status, body) = f(index).await;
                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_line(status),
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, log)
}

/// Mock upstream that always answers with the same status and body.
pub async fn start_fixed_backend(status: u16, body: &'static str) -> (SocketAddr, CallLog) {
    start_programmable_backend(move |_| async move { (status, body.to_string()) }).await
}

/// An address nothing is listening on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Config pointing at a mock upstream with credentials and fast retries.
pub fn config_for(upstream: SocketAddr) -> BlockPageConfig {
    let mut config = BlockPageConfig::default();
    config.upstream.api_base_url = format!("http://{}/client/v4", upstream);
    config.upstream.api_token = "test-token".into();
    config.upstream.account_id = "acc-1".into();
    config.upstream.system_proxy = false;
    config.upstream.request_timeout_secs = 2;
    config.retries.base_delay_ms = 20;
    config
}

/// A write seen by [`RecordingStore`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedPut {
    pub key: String,
    pub value: String,
    pub ttl: Duration,
}

/// Store that never hits, records every write and can refuse them.
#[derive(Default)]
pub struct RecordingStore {
    pub fail_puts: bool,
    puts: Mutex<Vec<RecordedPut>>,
}

impl RecordingStore {
    pub fn failing_puts() -> Self {
        Self {
            fail_puts: true,
            ..Default::default()
        }
    }

    pub fn puts(&self) -> Vec<RecordedPut> {
        self.puts.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl KvStore for RecordingStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Ok(None)
    }

    async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        self.puts.lock().unwrap().push(RecordedPut {
            key: key.to_string(),
            value: value.to_string(),
            ttl,
        });
        if self.fail_puts {
            return Err(CacheError::Unavailable("read-only replica".into()));
        }
        Ok(())
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

/// Send one request through the router in-process.
pub async fn send(router: &Router, uri: &str, headers: &[(&str, &str)]) -> TestResponse {
    send_with_method(router, "GET", uri, headers).await
}

pub async fn send_with_method(
    router: &Router,
    method: &str,
    uri: &str,
    headers: &[(&str, &str)],
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let request = builder.body(Body::empty()).unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    TestResponse {
        status,
        headers,
        body: String::from_utf8(bytes.to_vec()).unwrap(),
    }
}
