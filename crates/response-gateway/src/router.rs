//! HTTP router construction.
//!
//! Every route below the origin guard acts for the owner the guard
//! resolved. Handlers never tell the displayer why something failed:
//! validation errors, denials and collaborator faults all produce the same
//! response.

use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, QueryRejection},
        ConnectInfo, DefaultBodyLimit, Path, Query, Request, State,
    },
    http::{header, HeaderMap, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use response_ingest::{ImageQuery, ResponderApi, ResponseRequest, IMAGE_CONTENT_TYPE};
use responder_telemetry::gather_metrics;
use serde_json::json;
use shared_types::Owner;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, warn};

use crate::client_ip::request_meta;
use crate::config::{GatewayConfig, ResponseShape};
use crate::origin::OriginPolicy;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn ResponderApi>,
    pub config: Arc<GatewayConfig>,
    pub origins: Arc<OriginPolicy>,
}

impl AppState {
    pub fn new(api: Arc<dyn ResponderApi>, config: GatewayConfig, origins: OriginPolicy) -> Self {
        Self {
            api,
            config: Arc::new(config),
            origins: Arc::new(origins),
        }
    }
}

/// Build the HTTP router.
pub fn build_router(state: AppState) -> Router {
    let responder = Router::new()
        .route("/responder/:type", post(post_response))
        .route("/inviter/image", get(invite_image))
        .fallback(unknown_route)
        .layer(create_cors_layer(&state.origins))
        .layer(middleware::from_fn_with_state(state.clone(), resolve_owner));

    let mut ops = Router::new().route("/health", get(health_check));
    if state.config.expose_metrics {
        ops = ops.route("/metrics", get(metrics));
    }

    let layers = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(state.config.max_body_bytes));

    ops.merge(responder).layer(layers).with_state(state)
}

/// CORS for the displayer.
///
/// The layer answers every `OPTIONS` request itself, so preflights never
/// reach a handler. The origin guard runs first, so mirroring the request
/// origin only ever echoes the one allowed origin. Development answers `*`.
pub fn create_cors_layer(origins: &OriginPolicy) -> CorsLayer {
    let allow_origin = if origins.is_open() {
        AllowOrigin::any()
    } else {
        AllowOrigin::mirror_request()
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
}

/// Resolve the owner from `Origin`, rejecting requests from elsewhere with 403.
async fn resolve_owner(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let origin = request
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok());

    match state.origins.resolve(origin) {
        Ok(owner) => {
            request.extensions_mut().insert(owner);
            next.run(request).await
        }
        Err(e) => {
            warn!(error = %e, "Rejected request");
            StatusCode::FORBIDDEN.into_response()
        }
    }
}

async fn post_response(
    State(state): State<AppState>,
    Extension(owner): Extension<Owner>,
    Path(response_type): Path<String>,
    peer: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let shape = state.config.response_shape;
    let body = match body {
        Ok(body) => body,
        Err(e) => {
            debug!(error = %e, "Unreadable request body");
            return outcome(shape, false);
        }
    };

    let request = ResponseRequest {
        owner,
        response_type,
        body: body.to_vec(),
        meta: request_meta(
            &headers,
            peer.map(|ConnectInfo(addr)| addr),
            state.config.trust_forwarded_for,
        ),
    };

    // The pipeline logs and reports its own failures
    let success = state.api.handle_response(request).await.is_ok();
    outcome(shape, success)
}

async fn invite_image(
    State(state): State<AppState>,
    Extension(owner): Extension<Owner>,
    query: Result<Query<ImageQuery>, QueryRejection>,
) -> Response {
    let query = query.map(|Query(q)| q).unwrap_or_default();
    let image = state.api.invite_image(&owner, &query).await;

    (
        [
            (header::CONTENT_TYPE, IMAGE_CONTENT_TYPE),
            (header::CACHE_CONTROL, "no-store"),
        ],
        image.into_bytes(),
    )
        .into_response()
}

async fn unknown_route(State(state): State<AppState>, method: Method) -> Response {
    debug!(%method, "Unknown route");
    outcome(state.config.response_shape, false)
}

async fn health_check() -> &'static str {
    "OK"
}

async fn metrics() -> Response {
    match gather_metrics() {
        Ok(text) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            text,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to gather metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn outcome(shape: ResponseShape, success: bool) -> Response {
    match shape {
        ResponseShape::StatusOnly if success => StatusCode::OK.into_response(),
        ResponseShape::StatusOnly => StatusCode::BAD_REQUEST.into_response(),
        ResponseShape::SuccessBody => Json(json!({ "success": success })).into_response(),
    }
}
