//! Reverse-proxy handlers: relay the inbound request to the owning service
//! and return its response verbatim.

use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse};
use tracing::warn;

use crate::error::AppError;
use crate::state::GatewayState;

/// Headers that must not be relayed in either direction.
const HOP_BY_HOP: [&str; 9] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
    "host",
];

fn is_hop_by_hop(name: &str) -> bool {
    HOP_BY_HOP.iter().any(|h| name.eq_ignore_ascii_case(h))
}

/// Forward `/patients*` traffic. Only reachable behind the authentication
/// filter; the path is relayed unchanged.
pub async fn forward_patients(
    req: HttpRequest,
    body: web::Bytes,
    state: web::Data<GatewayState>,
) -> Result<HttpResponse, AppError> {
    let upstream = state.patient_upstream.clone();
    forward(req, body, state, &upstream, None).await
}

/// Forward `/auth/*` traffic with the `/auth` prefix stripped, so
/// `/auth/login` reaches the authority as `/login`. No token validation on
/// this scope, it is where tokens come from.
pub async fn forward_auth(
    req: HttpRequest,
    body: web::Bytes,
    state: web::Data<GatewayState>,
) -> Result<HttpResponse, AppError> {
    let upstream = state.auth_upstream.clone();
    forward(req, body, state, &upstream, Some("/auth")).await
}

async fn forward(
    req: HttpRequest,
    body: web::Bytes,
    state: web::Data<GatewayState>,
    upstream: &str,
    strip_prefix: Option<&str>,
) -> Result<HttpResponse, AppError> {
    let path = match strip_prefix {
        Some(prefix) => req.uri().path().strip_prefix(prefix).unwrap_or("/"),
        None => req.uri().path(),
    };

    let mut url = format!("{upstream}{path}");
    if let Some(query) = req.uri().query() {
        url.push('?');
        url.push_str(query);
    }

    let method = reqwest::Method::from_bytes(req.method().as_str().as_bytes())
        .map_err(|e| AppError::internal(format!("Unsupported method: {e}")))?;

    let mut upstream_req = state.http.request(method, &url);
    for (name, value) in req.headers() {
        if !is_hop_by_hop(name.as_str()) {
            upstream_req = upstream_req.header(name.as_str(), value.as_bytes());
        }
    }

    let upstream_resp = upstream_req.body(body.to_vec()).send().await.map_err(|e| {
        warn!(url = %url, error = %e, "Upstream call failed");
        AppError::upstream_unavailable(format!("Upstream call failed: {e}"))
    })?;

    let status = StatusCode::from_u16(upstream_resp.status().as_u16())
        .map_err(|e| AppError::internal(format!("Invalid upstream status: {e}")))?;

    let mut builder = HttpResponse::build(status);
    for (name, value) in upstream_resp.headers() {
        if !is_hop_by_hop(name.as_str()) {
            builder.insert_header((name.as_str(), value.as_bytes()));
        }
    }

    let bytes = upstream_resp
        .bytes()
        .await
        .map_err(|e| AppError::upstream_unavailable(format!("Upstream body read failed: {e}")))?;

    Ok(builder.body(bytes))
}
