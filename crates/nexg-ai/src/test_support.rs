//! Loopback HTTP responder and scripted model client shared by unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::{AiClient, AiError, AiResponse, Message};

/// Serve exactly one HTTP response on a loopback port.
///
/// Returns the base URL and a handle resolving to the raw request text.
pub(crate) async fn serve_once(status_line: &str, body: &str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let response = format!(
        "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
        body.len()
    );

    let handle = tokio::spawn(async move {
        let (mut sock, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = sock.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if request_complete(&buf) {
                break;
            }
        }
        sock.write_all(response.as_bytes()).await.unwrap();
        let _ = sock.shutdown().await;
        String::from_utf8_lossy(&buf).into_owned()
    });

    (format!("http://{addr}"), handle)
}

fn request_complete(buf: &[u8]) -> bool {
    let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
        return false;
    };
    let headers = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
    let length = headers
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);
    buf.len() >= end + 4 + length
}

/// Model double that replays queued replies and records every request.
///
/// With `gated`, each call parks until `release()` is called.
pub(crate) struct ScriptedClient {
    replies: Mutex<VecDeque<Result<String, AiError>>>,
    pub(crate) requests: Mutex<Vec<(Vec<Message>, Option<String>)>>,
    gated: bool,
    gate: Notify,
    pub(crate) received: Notify,
}

impl ScriptedClient {
    pub(crate) fn new(replies: Vec<Result<String, AiError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
            gated: false,
            gate: Notify::new(),
            received: Notify::new(),
        }
    }

    pub(crate) fn gated(replies: Vec<Result<String, AiError>>) -> Self {
        Self {
            gated: true,
            ..Self::new(replies)
        }
    }

    pub(crate) fn release(&self) {
        self.gate.notify_one();
    }

    pub(crate) fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub(crate) fn last_request(&self) -> (Vec<Message>, Option<String>) {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait]
impl AiClient for ScriptedClient {
    async fn send_message(
        &self,
        messages: &[Message],
        system: Option<&str>,
    ) -> Result<AiResponse, AiError> {
        self.requests
            .lock()
            .unwrap()
            .push((messages.to_vec(), system.map(String::from)));
        self.received.notify_one();
        if self.gated {
            self.gate.notified().await;
        }
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AiError::ApiError("no scripted reply".into())));
        reply.map(|content| AiResponse {
            content,
            finish_reason: Some("STOP".into()),
        })
    }
}
