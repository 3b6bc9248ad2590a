// crates/metrics-router/tests/common/mod.rs
// ============================================================================
// Module: Metrics Router Test Support
// Description: Scripted local HTTP servers for client tests.
// Purpose: Record outbound requests and replay canned responses.
// Dependencies: tiny_http
// ============================================================================

#![allow(dead_code, reason = "Shared helpers are reused across multiple test binaries.")]
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only helpers favor direct unwrap/expect for clarity."
)]

use std::net::TcpListener;
use std::sync::Arc;
use std::sync::Mutex;
use std::thread;

use tiny_http::Header;
use tiny_http::Response;
use tiny_http::Server;

/// Request captured by a scripted server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RecordedRequest {
    /// Returns a header value, matching the name case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(field, _)| field.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Canned response replayed by a scripted server.
#[derive(Debug, Clone)]
pub struct ScriptedResponse {
    pub status: u16,
    pub body: String,
    pub headers: Vec<(&'static str, String)>,
}

impl ScriptedResponse {
    /// JSON response with the given status.
    pub fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            headers: vec![("Content-Type", "application/json".to_string())],
        }
    }

    /// Response without a body.
    pub fn empty(status: u16) -> Self {
        Self {
            status,
            body: String::new(),
            headers: Vec::new(),
        }
    }

    /// Adds a response header.
    pub fn with_header(mut self, name: &'static str, value: &str) -> Self {
        self.headers.push((name, value.to_string()));
        self
    }
}

/// Handle to a scripted server thread.
pub struct ScriptedServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    handle: thread::JoinHandle<()>,
}

impl ScriptedServer {
    /// Waits for every scripted response to be served and returns the requests.
    pub fn finish(self) -> Vec<RecordedRequest> {
        self.handle.join().unwrap();
        self.requests.lock().unwrap().clone()
    }
}

/// Spawns a server that answers one request per scripted response, in order.
pub fn spawn_scripted(responses: Vec<ScriptedResponse>) -> ScriptedServer {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&requests);
    let handle = thread::spawn(move || {
        for scripted in responses {
            let Ok(mut request) = server.recv() else {
                return;
            };
            let mut body = String::new();
            let _ = request.as_reader().read_to_string(&mut body);
            let headers = request
                .headers()
                .iter()
                .map(|header| (header.field.as_str().to_string(), header.value.as_str().to_string()))
                .collect();
            recorded.lock().unwrap().push(RecordedRequest {
                method: request.method().to_string(),
                url: request.url().to_string(),
                headers,
                body,
            });
            let mut response =
                Response::from_string(scripted.body).with_status_code(scripted.status);
            for (name, value) in scripted.headers {
                response = response.with_header(Header::from_bytes(name, value).unwrap());
            }
            let _ = request.respond(response);
        }
    });
    ScriptedServer {
        base_url: format!("http://{addr}"),
        requests,
        handle,
    }
}

/// Returns a loopback URL with nothing listening on it.
pub fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
