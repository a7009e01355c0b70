//! Shared test fixtures for transport and callback tests.

use super::{HttpError, HttpRequest, HttpResponse, ReqwestClient, Transport, TransportFuture};
use crate::time::Sleeper;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Builds an empty response with the given status.
pub fn response(status: http::StatusCode) -> HttpResponse {
    HttpResponse::new(status, http::HeaderMap::new(), vec![])
}

/// Mock transport that replays a scripted sequence of results.
///
/// Once the script runs out, every further call fails with
/// [`HttpError::Timeout`]. Every request is captured in call order.
#[derive(Debug)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Result<HttpResponse, HttpError>>>,
    requests: Mutex<Vec<HttpRequest>>,
    call_count: AtomicUsize,
}

impl ScriptedTransport {
    pub fn new(script: Vec<Result<HttpResponse, HttpError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
        }
    }

    pub fn success() -> Self {
        Self::new(vec![Ok(response(http::StatusCode::OK))])
    }

    pub fn failing_then_success(failures: usize) -> Self {
        let mut script: Vec<_> = (0..failures).map(|_| Err(HttpError::Timeout)).collect();
        script.push(Ok(response(http::StatusCode::OK)));
        Self::new(script)
    }

    pub fn always_failing() -> Self {
        Self::new(vec![])
    }

    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn captured_requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for ScriptedTransport {
    fn perform(&self, req: HttpRequest) -> TransportFuture<'_> {
        Box::pin(async move {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().unwrap().push(req);
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(HttpError::Timeout))
        })
    }
}

/// Transport that never answers.
#[derive(Debug, Default)]
pub struct HangingTransport {
    call_count: AtomicUsize,
}

impl HangingTransport {
    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

impl Transport for HangingTransport {
    fn perform(&self, _req: HttpRequest) -> TransportFuture<'_> {
        Box::pin(async move {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            std::future::pending().await
        })
    }
}

/// Sleeper that returns immediately and records each requested delay.
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

impl Sleeper for &RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.delays.lock().unwrap().push(duration);
    }
}

/// What the stub server saw.
pub struct Captured {
    pub head: String,
    pub body: Vec<u8>,
}

impl Captured {
    /// Returns the request head lowercased, for case-insensitive header checks.
    pub fn head_lower(&self) -> String {
        self.head.to_ascii_lowercase()
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn content_length(head: &str) -> usize {
    head.lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.trim()
                .eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse().unwrap())
        })
        .unwrap_or(0)
}

/// Accepts one connection, answers with `status_line` and `reply`, and
/// returns the captured request.
pub async fn serve_once(
    status_line: &'static str,
    reply: &'static str,
) -> (url::Url, tokio::task::JoinHandle<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0_u8; 1024];

        let header_end = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before request head");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = find(&buf, b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
        let length = content_length(&head);
        while buf.len() < header_end + length {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before request body");
            buf.extend_from_slice(&chunk[..n]);
        }
        let body = buf[header_end..header_end + length].to_vec();

        let response = format!(
            "{status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{reply}",
            reply.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;

        Captured { head, body }
    });

    let url = url::Url::parse(&format!("http://{addr}/callback")).unwrap();
    (url, handle)
}

/// Client that never goes through a proxy, so localhost stubs are reachable.
pub fn direct_client() -> ReqwestClient {
    ReqwestClient::from_client(reqwest::Client::builder().no_proxy().build().unwrap())
}
