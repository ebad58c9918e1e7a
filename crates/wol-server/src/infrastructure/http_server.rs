//! HTTP control server: routing, middleware, and the serve loop.
//!
//! # Request pipeline
//!
//! ```text
//! request
//!   → TraceLayer        (span per request)
//!   → cors              (OPTIONS answered here; CORS headers on every reply)
//!   → request_gate      (IP allowlist, 403 "Access denied")
//!   → route handler     (auth checked per endpoint)
//! ```
//!
//! | Method    | Path      | Auth | Handler         |
//! |-----------|-----------|------|-----------------|
//! | GET       | `/`       | no   | dashboard       |
//! | POST      | `/login`  | no   | password check  |
//! | GET       | `/health` | no   | liveness probe  |
//! | GET, POST | `/wake`   | yes  | send packet     |
//! | GET       | `/config` | yes  | full config     |
//! | POST      | `/config` | yes  | partial update  |
//!
//! Anything else is `404 Not found`, including a known path with the wrong
//! method.  axum would answer `HEAD` with the `GET` handler, so each `GET`
//! route registers an explicit `HEAD` that returns 404.
//!
//! # Shutdown
//!
//! `run_server` serves until the supplied shutdown future completes, then
//! lets in-flight requests finish.  Wake tasks already spawned run to
//! completion on the runtime.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    body::Bytes,
    extract::{ConnectInfo, Query, Request, State},
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_MAX_AGE, AUTHORIZATION,
        },
        HeaderMap, HeaderValue, Method, StatusCode, Uri,
    },
    middleware::{self, Next},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use wol_core::{bearer_token, ConfigUpdate, WolConfig};

use crate::application::{ControlError, ControlService, Credentials};
use crate::domain::{ApiResponse, HealthResponse};
use crate::infrastructure::{dashboard::render_dashboard, network};

const ALLOWED_METHODS: &str = "GET,POST,PUT,DELETE,OPTIONS";
const ALLOWED_HEADERS: &str = "Content-Type, Authorization";
const PREFLIGHT_MAX_AGE_SECS: &str = "86400";

// ── State ─────────────────────────────────────────────────────────────────────

/// Per-router state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    service: Arc<ControlService>,
    /// `host:port` shown in the dashboard header.
    server_address: Arc<str>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Builds the full router with middleware attached.
///
/// Serve it with `into_make_service_with_connect_info::<SocketAddr>()`; the
/// allowlist gate needs the peer address.
pub fn build_router(service: Arc<ControlService>, server_address: impl Into<String>) -> Router {
    let state = AppState {
        service,
        server_address: Arc::from(server_address.into()),
    };

    Router::new()
        .route("/", get(dashboard).head(not_found).fallback(not_found))
        .route("/login", post(login).fallback(not_found))
        .route("/health", get(health).head(not_found).fallback(not_found))
        .route(
            "/wake",
            get(wake).head(not_found).post(wake).fallback(not_found),
        )
        .route(
            "/config",
            get(read_config)
                .head(not_found)
                .post(update_config)
                .fallback(not_found),
        )
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(state.clone(), request_gate))
        .layer(middleware::from_fn(cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds `listen_addr` and serves until `shutdown` resolves.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound or the server fails.
pub async fn run_server(
    listen_addr: SocketAddr,
    service: Arc<ControlService>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind(listen_addr)
        .await
        .with_context(|| format!("failed to bind HTTP listener on {listen_addr}"))?;
    let bound = listener
        .local_addr()
        .context("failed to read bound listener address")?;

    let shown = if bound.ip().is_unspecified() {
        SocketAddr::new(network::local_ipv4().into(), bound.port())
    } else {
        bound
    };
    info!("WOL server listening on {bound}; dashboard at http://{shown}/");

    let app = build_router(service, shown.to_string());
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await
    .context("HTTP server error")?;

    info!("WOL server stopped");
    Ok(())
}

// ── Middleware ────────────────────────────────────────────────────────────────

/// Answers preflight requests and stamps CORS headers on every response.
async fn cors(request: Request, next: Next) -> Response {
    let mut response = if request.method() == Method::OPTIONS {
        (StatusCode::OK, "OK").into_response()
    } else {
        next.run(request).await
    };

    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_HEADERS),
    );
    headers.insert(
        ACCESS_CONTROL_MAX_AGE,
        HeaderValue::from_static(PREFLIGHT_MAX_AGE_SECS),
    );
    response
}

/// Rejects peers outside the IP allowlist.
///
/// IPv4-mapped IPv6 peers (`::ffff:a.b.c.d`) are checked as plain IPv4.
async fn request_gate(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Response {
    let ip = peer.ip().to_canonical();
    info!("{} {} from {ip}", request.method(), request.uri().path());

    if !state.service.allows(ip).await {
        warn!("access denied for {ip}: not in allowlist");
        return (StatusCode::FORBIDDEN, "Access denied").into_response();
    }
    next.run(request).await
}

// ── Handlers ──────────────────────────────────────────────────────────────────

async fn dashboard(State(state): State<AppState>) -> Html<String> {
    let config = state.service.snapshot().await;
    Html(render_dashboard(&config, &state.server_address))
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    #[serde(default)]
    password: Option<String>,
}

async fn login(State(state): State<AppState>, body: Bytes) -> Response {
    let request: LoginRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            warn!("malformed login body: {e}");
            return failure(StatusCode::BAD_REQUEST, format!("Login failed: {e}"));
        }
    };

    let password = request.password.unwrap_or_default();
    match state.service.login(&password).await {
        Some(token) => Json(ApiResponse::ok("Login successful").with_auth_token(token)).into_response(),
        None => Json(ApiResponse::failure("Invalid password")).into_response(),
    }
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok(now_millis()))
}

async fn wake(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Json<ApiResponse>, ControlError> {
    state.service.authorize(&credentials(&headers, &uri)).await?;

    // The send task is detached; its outcome is only logged.
    let dispatch = state.service.wake().await?;
    Ok(Json(
        ApiResponse::ok(format!("Wake packet sent to {}", dispatch.mac)).with_timestamp(now_millis()),
    ))
}

async fn read_config(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Json<WolConfig>, ControlError> {
    state.service.authorize(&credentials(&headers, &uri)).await?;
    Ok(Json(state.service.snapshot().await))
}

async fn update_config(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
    body: Bytes,
) -> Result<Response, ControlError> {
    state.service.authorize(&credentials(&headers, &uri)).await?;

    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(failure(
            StatusCode::BAD_REQUEST,
            "No configuration data received",
        ));
    }
    let update: ConfigUpdate = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            return Ok(failure(
                StatusCode::BAD_REQUEST,
                format!("Invalid JSON format: {e}"),
            ))
        }
    };

    state.service.update_config(&update).await?;
    Ok(Json(ApiResponse::ok("Configuration updated successfully")).into_response())
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not found")
}

// ── Helpers ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

/// Collects the bearer token and the `?token=` parameter from a request.
fn credentials(headers: &HeaderMap, uri: &Uri) -> Credentials {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token)
        .map(str::to_string);
    let query_token = Query::<TokenQuery>::try_from_uri(uri)
        .ok()
        .and_then(|Query(query)| query.token);
    Credentials {
        bearer,
        query_token,
    }
}

fn failure(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ApiResponse::failure(message))).into_response()
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

impl IntoResponse for ControlError {
    fn into_response(self) -> Response {
        let status = match &self {
            ControlError::Unauthorized => StatusCode::UNAUTHORIZED,
            ControlError::NoTarget | ControlError::InvalidConfig(_) => StatusCode::BAD_REQUEST,
            ControlError::Storage(e) => {
                error!("config update not persisted: {e}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        failure(status, self.to_string())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
