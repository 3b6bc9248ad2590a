// system-tests/tests/helpers/fake_router.rs
// ============================================================================
// Module: Fake Metrics Router
// Description: In-memory stand-in for the metrics router v3 API.
// Purpose: Run the suite end to end without a live service.
// Dependencies: serde_json, tempfile, tiny_http
// ============================================================================

//! ## Overview
//! [`FakeRouter`] serves the thirteen operations under `/api/v3` from
//! in-memory state, records every request, and can inject an error status
//! for one operation or answer target reads with a different entity. Statuses mirror the live service: creates return 201,
//! settings replacement 201, route deletion 204, everything else 200.

use std::collections::BTreeMap;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;
use std::thread;

use serde_json::Value;
use serde_json::json;
use tiny_http::Header;
use tiny_http::Method;
use tiny_http::Request;
use tiny_http::Response;
use tiny_http::Server;

/// Path prefix the fake serves under.
const API_PREFIX: &str = "/api/v3";
/// Fixed timestamp stamped on created resources.
const TIMESTAMP: &str = "2026-01-05T10:00:00Z";

/// Request seen by the fake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeenRequest {
    /// HTTP method.
    pub method: String,
    /// Path including the API prefix.
    pub path: String,
    /// Raw request body.
    pub body: String,
}

/// Injected failure for one operation.
#[derive(Debug, Clone, Copy)]
struct Fault {
    operation: &'static str,
    status: u16,
}

/// Resources and request log shared with the server thread.
#[derive(Default)]
struct FakeState {
    next_id: u32,
    targets: BTreeMap<String, Value>,
    routes: BTreeMap<String, Value>,
    settings: Option<Value>,
    requests: Vec<SeenRequest>,
    fault: Option<Fault>,
    foreign_target: bool,
}

/// Running fake service.
pub struct FakeRouter {
    server: Arc<Server>,
    state: Arc<Mutex<FakeState>>,
    handle: Option<thread::JoinHandle<()>>,
    base_url: String,
}

impl FakeRouter {
    /// Starts a fake with no injected faults.
    pub fn spawn() -> io::Result<Self> {
        Self::start(FakeState::default())
    }

    /// Starts a fake that answers `operation` with `status` and an error body.
    pub fn spawn_with_fault(operation: &'static str, status: u16) -> io::Result<Self> {
        Self::start(FakeState {
            fault: Some(Fault {
                operation,
                status,
            }),
            ..FakeState::default()
        })
    }

    /// Starts a fake whose target reads return another target's id and name.
    pub fn spawn_with_foreign_target() -> io::Result<Self> {
        Self::start(FakeState {
            foreign_target: true,
            ..FakeState::default()
        })
    }

    fn start(state: FakeState) -> io::Result<Self> {
        let server =
            Arc::new(Server::http("127.0.0.1:0").map_err(|err| io::Error::other(err.to_string()))?);
        let addr = server
            .server_addr()
            .to_ip()
            .ok_or_else(|| io::Error::other("fake router is not bound to an ip address"))?;
        let state = Arc::new(Mutex::new(state));
        let handle = {
            let server = Arc::clone(&server);
            let state = Arc::clone(&state);
            thread::spawn(move || {
                for request in server.incoming_requests() {
                    handle_request(&state, request);
                }
            })
        };
        Ok(Self {
            server,
            state,
            handle: Some(handle),
            base_url: format!("http://{addr}{API_PREFIX}"),
        })
    }

    /// Returns the service URL, including the API prefix.
    pub fn url(&self) -> &str {
        &self.base_url
    }

    /// Returns every request seen so far.
    pub fn requests(&self) -> Vec<SeenRequest> {
        lock(&self.state).requests.clone()
    }

    /// Returns the number of requests seen so far.
    pub fn request_count(&self) -> usize {
        lock(&self.state).requests.len()
    }

    /// Returns the ids of targets that still exist.
    pub fn target_ids(&self) -> Vec<String> {
        lock(&self.state).targets.keys().cloned().collect()
    }

    /// Returns the ids of routes that still exist.
    pub fn route_ids(&self) -> Vec<String> {
        lock(&self.state).routes.keys().cloned().collect()
    }
}

impl Drop for FakeRouter {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Writes a credentials file for the suite pointing at `url` with no auth.
pub fn write_config(dir: &Path, url: &str) -> io::Result<PathBuf> {
    let path = dir.join("metrics_router_v3.env");
    let content = format!(
        "# metrics router suite configuration\nMETRICS_ROUTER_URL={url}\nMETRICS_ROUTER_AUTH_TYPE=noauth\n"
    );
    std::fs::write(&path, content)?;
    Ok(path)
}

/// Locks fake state, recovering from a panicked handler.
fn lock(state: &Mutex<FakeState>) -> MutexGuard<'_, FakeState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
// SECTION: Request Handling
// ============================================================================

fn handle_request(state: &Mutex<FakeState>, mut request: Request) {
    let mut body = String::new();
    let _ = request.as_reader().read_to_string(&mut body);
    let method = request.method().clone();
    let path = request.url().split('?').next().unwrap_or_default().to_string();

    let (status, payload) = {
        let mut state = lock(state);
        state.requests.push(SeenRequest {
            method: method.to_string(),
            path: path.clone(),
            body: body.clone(),
        });
        let segments: Vec<&str> = path
            .strip_prefix(API_PREFIX)
            .unwrap_or_default()
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();
        let operation = classify(&method, &segments);
        match (operation, state.fault) {
            (Some(operation), Some(fault)) if fault.operation == operation => {
                (fault.status, Some(error_body(fault.status, "injected fault")))
            }
            (Some(operation), _) => dispatch(&mut state, operation, &segments, &body),
            (None, _) => (404, Some(error_body(404, "unknown path"))),
        }
    };

    let mut response =
        Response::from_string(payload.map(|payload| payload.to_string()).unwrap_or_default())
            .with_status_code(status);
    if status != 204
        && let Ok(header) = Header::from_bytes("Content-Type", "application/json")
    {
        response = response.with_header(header);
    }
    let _ = request.respond(response);
}

fn classify(method: &Method, segments: &[&str]) -> Option<&'static str> {
    let operation = match (method, segments) {
        (Method::Post, ["targets"]) => "create_target",
        (Method::Get, ["targets"]) => "list_targets",
        (Method::Get, ["targets", _]) => "get_target",
        (Method::Put, ["targets", _]) => "replace_target",
        (Method::Delete, ["targets", _]) => "delete_target",
        (Method::Post, ["targets", _, "validate"]) => "validate_target",
        (Method::Post, ["routes"]) => "create_route",
        (Method::Get, ["routes"]) => "list_routes",
        (Method::Get, ["routes", _]) => "get_route",
        (Method::Put, ["routes", _]) => "replace_route",
        (Method::Delete, ["routes", _]) => "delete_route",
        (Method::Get, ["settings"]) => "get_settings",
        (Method::Put, ["settings"]) => "replace_settings",
        _ => return None,
    };
    Some(operation)
}

fn dispatch(
    state: &mut FakeState,
    operation: &str,
    segments: &[&str],
    body: &str,
) -> (u16, Option<Value>) {
    let input: Value = serde_json::from_str(body).unwrap_or(Value::Null);
    let id = segments.get(1).copied().unwrap_or_default();
    match operation {
        "create_target" => {
            state.next_id += 1;
            let id = format!("target-{}", state.next_id);
            let target = json!({
                "id": id,
                "name": input["name"],
                "crn": format!("crn:v1:bluemix:public:metrics-router:us-south:a/acct::target:{id}"),
                "destination_crn": input["destination_crn"],
                "target_type": "sysdig_monitor",
                "region": input.get("region").cloned().unwrap_or_else(|| json!("us-south")),
                "write_status": {"status": "success"},
                "created_at": TIMESTAMP,
                "updated_at": TIMESTAMP,
            });
            state.targets.insert(id, target.clone());
            (201, Some(target))
        }
        "list_targets" => (200, Some(json!({"targets": state.targets.values().collect::<Vec<_>>()}))),
        "get_target" if state.foreign_target => found(state.targets.get(id).map(|target| {
            let mut foreign = target.clone();
            foreign["id"] = json!("target-foreign");
            foreign["name"] = json!("someone-elses-target");
            foreign
        })),
        "get_target" | "validate_target" => found(state.targets.get(id).cloned()),
        "replace_target" => match state.targets.get_mut(id) {
            Some(target) => {
                for field in ["name", "destination_crn"] {
                    if let Some(value) = input.get(field) {
                        target[field] = value.clone();
                    }
                }
                (200, Some(target.clone()))
            }
            None => not_found(),
        },
        "delete_target" => match state.targets.remove(id) {
            Some(_) => {
                let in_settings = state.settings.as_ref().is_some_and(|settings| {
                    settings["default_targets"]
                        .as_array()
                        .is_some_and(|targets| targets.iter().any(|target| target["id"] == id))
                });
                let warnings = if in_settings {
                    json!([{"code": "default_target_removed", "message": "target was a default target"}])
                } else {
                    json!([])
                };
                (200, Some(json!({"status_code": 200, "warnings": warnings})))
            }
            None => not_found(),
        },
        "create_route" => match build_route(state, None, &input) {
            Ok(route) => (201, Some(route)),
            Err(response) => response,
        },
        "list_routes" => (200, Some(json!({"routes": state.routes.values().collect::<Vec<_>>()}))),
        "get_route" => found(state.routes.get(id).cloned()),
        "replace_route" => {
            if !state.routes.contains_key(id) {
                return not_found();
            }
            match build_route(state, Some(id), &input) {
                Ok(route) => (200, Some(route)),
                Err(response) => response,
            }
        }
        "delete_route" => match state.routes.remove(id) {
            Some(_) => (204, None),
            None => not_found(),
        },
        "get_settings" => (
            200,
            Some(state.settings.clone().unwrap_or_else(|| {
                json!({
                    "default_targets": [],
                    "permitted_target_regions": [],
                    "metadata_region_primary": "us-south",
                    "private_api_endpoint_only": false,
                })
            })),
        ),
        "replace_settings" => {
            let mut defaults = Vec::new();
            for target_id in input["default_targets"].as_array().cloned().unwrap_or_default() {
                match target_id.as_str().and_then(|id| state.targets.get(id)) {
                    Some(target) => defaults.push(target_reference(target)),
                    None => return (400, Some(error_body(400, "default target not found"))),
                }
            }
            let settings = json!({
                "default_targets": defaults,
                "permitted_target_regions": input["permitted_target_regions"].as_array().cloned().unwrap_or_default(),
                "metadata_region_primary": input["metadata_region_primary"],
                "private_api_endpoint_only": input["private_api_endpoint_only"],
            });
            state.settings = Some(settings.clone());
            (201, Some(settings))
        }
        _ => not_found(),
    }
}

fn build_route(
    state: &mut FakeState,
    existing_id: Option<&str>,
    input: &Value,
) -> Result<Value, (u16, Option<Value>)> {
    let mut rules = Vec::new();
    for rule in input["rules"].as_array().cloned().unwrap_or_default() {
        let mut targets = Vec::new();
        for target_id in rule["target_ids"].as_array().cloned().unwrap_or_default() {
            match target_id.as_str().and_then(|id| state.targets.get(id)) {
                Some(target) => targets.push(target_reference(target)),
                None => return Err((400, Some(error_body(400, "rule target not found")))),
            }
        }
        rules.push(json!({"targets": targets, "inclusion_filters": rule["inclusion_filters"]}));
    }
    let id = match existing_id {
        Some(id) => id.to_string(),
        None => {
            state.next_id += 1;
            format!("route-{}", state.next_id)
        }
    };
    let route = json!({
        "id": id,
        "name": input["name"],
        "crn": format!("crn:v1:bluemix:public:metrics-router:us-south:a/acct::route:{id}"),
        "rules": rules,
        "created_at": TIMESTAMP,
        "updated_at": TIMESTAMP,
    });
    state.routes.insert(id, route.clone());
    Ok(route)
}

fn target_reference(target: &Value) -> Value {
    json!({
        "id": target["id"],
        "crn": target["crn"],
        "name": target["name"],
        "target_type": target["target_type"],
    })
}

fn found(value: Option<Value>) -> (u16, Option<Value>) {
    value.map_or_else(not_found, |value| (200, Some(value)))
}

fn not_found() -> (u16, Option<Value>) {
    (404, Some(error_body(404, "resource not found")))
}

fn error_body(status: u16, message: &str) -> Value {
    json!({
        "errors": [{"code": "fake_error", "message": message}],
        "status_code": status,
    })
}
