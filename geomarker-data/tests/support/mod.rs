//! Scripted HTTP server for exercising the MediaWiki client end to end.
//!
//! An axum router on an ephemeral port records each request's query
//! parameters and user agent, then answers with the reply chosen by the
//! test's routing closure.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::Router;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Canned answer for one request.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Respond with the given status and JSON body.
    Json(u16, String),
    /// Hold the request open without answering.
    Stall,
}

impl Reply {
    /// A `200 OK` JSON reply.
    pub fn ok(body: &str) -> Self {
        Self::Json(200, body.to_owned())
    }
}

/// One request observed by the server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Decoded query parameters.
    pub params: HashMap<String, String>,
    /// Value of the `User-Agent` header, if sent.
    pub user_agent: Option<String>,
}

impl RecordedRequest {
    /// Decoded value of query parameter `key`.
    pub fn param(&self, key: &str) -> Option<String> {
        self.params.get(key).cloned()
    }
}

type Route = Arc<dyn Fn(&RecordedRequest) -> Reply + Send + Sync>;

#[derive(Clone)]
struct ServerState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    route: Route,
}

/// A local server answering from a routing closure.
pub struct ScriptedServer {
    endpoint: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    task: JoinHandle<()>,
}

impl ScriptedServer {
    /// Bind an ephemeral port and start answering with `route`.
    pub async fn start<F>(route: F) -> Self
    where
        F: Fn(&RecordedRequest) -> Reply + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind scripted server");
        let address = listener.local_addr().expect("read local address");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = ServerState {
            requests: Arc::clone(&requests),
            route: Arc::new(route),
        };
        let app = Router::new()
            .route("/w/api.php", get(answer))
            .with_state(state);

        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("scripted server stopped");
        });

        Self {
            endpoint: format!("http://{address}/w/api.php"),
            requests,
            task,
        }
    }

    /// The `api.php` URL served by this instance.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Requests received so far, in arrival order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Drop for ScriptedServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn answer(
    State(state): State<ServerState>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let request = RecordedRequest { params, user_agent };
    state
        .requests
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(request.clone());

    match (state.route)(&request) {
        Reply::Json(status, body) => {
            let status = StatusCode::from_u16(status).expect("scripted status is valid");
            (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
        }
        Reply::Stall => {
            tokio::time::sleep(Duration::from_secs(60)).await;
            StatusCode::GATEWAY_TIMEOUT.into_response()
        }
    }
}
