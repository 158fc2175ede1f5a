//! Streamable HTTP transport: one POST per request, replies framed as SSE or JSON.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{
        sse::{Event, Sse},
        IntoResponse, Response,
    },
    routing::{get, post},
    Json, Router,
};
use futures::StreamExt;
use serde_json::Value;
use tower_http::trace::TraceLayer;
use tracing::Instrument;
use uuid::Uuid;

use crate::auth::{AuthDecision, AuthGate};
use crate::config::ServerConfig;
use crate::protocol::ProtocolHandler;
use crate::session::{SessionFrames, TransportSession};
use crate::types::{
    error_codes, JsonRpcError, JsonRpcMessage, JsonRpcRequest, McpError, McpResult, RequestId,
    JSONRPC_VERSION,
};

/// Path the protocol is served on.
pub const MCP_PATH: &str = "/mcp";

const EVENT_STREAM_MIME_TYPE: &str = "text/event-stream";

/// Everything a request handler needs. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    handler: Arc<ProtocolHandler>,
    auth: Arc<AuthGate>,
    json_response: bool,
    notification_buffer: usize,
}

impl AppState {
    pub fn new(handler: ProtocolHandler, config: &ServerConfig) -> Self {
        Self {
            handler: Arc::new(handler),
            auth: Arc::new(AuthGate::new(config.auth_token.clone())),
            json_response: config.json_response,
            notification_buffer: config.notification_buffer,
        }
    }
}

/// Build the router: `POST/GET/DELETE /mcp` and `GET /health`.
pub fn router(state: AppState) -> Router {
    let mcp = post(handle_post)
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer))
        .get(method_not_allowed)
        .delete(method_not_allowed);

    Router::new()
        .route(MCP_PATH, mcp)
        .route("/health", get(|| async { "ok" }))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// HTTP transport bound to a protocol handler.
pub struct HttpTransport {
    state: AppState,
}

impl HttpTransport {
    pub fn new(handler: ProtocolHandler, config: &ServerConfig) -> Self {
        Self {
            state: AppState::new(handler, config),
        }
    }

    pub fn router(&self) -> Router {
        router(self.state.clone())
    }

    /// Serve on `addr` until Ctrl-C.
    pub async fn run(&self, addr: &str) -> McpResult<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        let local = listener.local_addr()?;

        if !self.state.auth.is_enforced() {
            tracing::warn!("No bearer token configured; {MCP_PATH} is open to any caller");
        }
        tracing::info!("listening on http://{local}{MCP_PATH}");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| McpError::Transport(e.to_string()))?;

        tracing::info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}

async fn require_bearer(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let authorization = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    match state.auth.check(authorization) {
        AuthDecision::Allow => next.run(request).await,
        AuthDecision::Deny(reason) => {
            tracing::warn!(?reason, "Rejected unauthenticated request");
            error_response(StatusCode::UNAUTHORIZED, McpError::from(reason))
        }
    }
}

async fn method_not_allowed(request: Request) -> Response {
    tracing::info!("Received {} MCP request", request.method());
    error_response(StatusCode::METHOD_NOT_ALLOWED, McpError::MethodNotAllowed)
}

async fn handle_post(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let value: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(e) => {
            tracing::error!("Failed to read request body: {e}");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                McpError::InternalError(e.to_string()),
            );
        }
    };

    let message = match parse_message(value) {
        Ok(message) => message,
        Err(e) => {
            tracing::debug!("Rejected message: {e}");
            return error_response(StatusCode::BAD_REQUEST, e);
        }
    };

    match message {
        JsonRpcMessage::Request(request) => {
            let stream = accepts_event_stream(&headers) && !state.json_response;
            serve_request(&state, request, stream).await
        }
        JsonRpcMessage::Notification(notification) => {
            tracing::debug!(method = %notification.method, "Accepted client notification");
            StatusCode::ACCEPTED.into_response()
        }
        JsonRpcMessage::Response(_) | JsonRpcMessage::Error(_) => {
            tracing::debug!("Accepted client response");
            StatusCode::ACCEPTED.into_response()
        }
    }
}

fn parse_message(value: Value) -> McpResult<JsonRpcMessage> {
    if value.is_array() {
        return Err(McpError::InvalidRequest(
            "batch requests are not supported".to_string(),
        ));
    }
    let message: JsonRpcMessage =
        serde_json::from_value(value).map_err(|e| McpError::ParseError(e.to_string()))?;
    if message.version() != JSONRPC_VERSION {
        return Err(McpError::InvalidRequest(format!(
            "unsupported jsonrpc version '{}'",
            message.version()
        )));
    }
    Ok(message)
}

fn accepts_event_stream(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::ACCEPT)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.contains(EVENT_STREAM_MIME_TYPE))
}

async fn serve_request(state: &AppState, request: JsonRpcRequest, stream: bool) -> Response {
    // Log correlation only; never sent to the client.
    let span = tracing::info_span!("session", trace_id = %Uuid::new_v4());
    span.in_scope(|| {
        tracing::debug!(method = %request.method, id = %request.id, "Opening session");
    });
    let (session, frames) = TransportSession::open(request, state.notification_buffer);
    tokio::spawn(session.run(state.handler.clone()).instrument(span));

    if stream {
        sse_response(frames)
    } else {
        json_response(frames).await
    }
}

fn sse_response(frames: SessionFrames) -> Response {
    let events = frames.into_stream().filter_map(|frame| async move {
        match serde_json::to_string(&frame) {
            Ok(data) => Some(Ok::<_, Infallible>(Event::default().event("message").data(data))),
            Err(e) => {
                tracing::error!("Failed to serialize frame: {e}");
                None
            }
        }
    });
    Sse::new(events).into_response()
}

async fn json_response(mut frames: SessionFrames) -> Response {
    while let Some(frame) = frames.next().await {
        match frame {
            JsonRpcMessage::Notification(notification) => {
                tracing::debug!(
                    method = %notification.method,
                    "Dropping notification: client did not accept an event stream"
                );
            }
            JsonRpcMessage::Error(error) => {
                let status = if error.error.code == error_codes::INTERNAL_ERROR {
                    StatusCode::INTERNAL_SERVER_ERROR
                } else {
                    StatusCode::OK
                };
                return (status, Json(error)).into_response();
            }
            reply => return (StatusCode::OK, Json(reply)).into_response(),
        }
    }

    tracing::error!("Session ended without a reply");
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        McpError::InternalError("session ended without a reply".to_string()),
    )
}

fn error_response(status: StatusCode, error: McpError) -> Response {
    let body: JsonRpcError = error.to_json_rpc_error(RequestId::Null);
    (status, Json(body)).into_response()
}
