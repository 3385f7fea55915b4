use std::time::Instant;

use axum::{
    body::Body,
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};

use crate::context::RequestContext;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Tag the request with a [`RequestContext`], log its outcome, and echo the
/// request id back in `x-request-id`.
pub async fn request_logging(mut req: Request<Body>, next: Next) -> Response {
    let ctx = RequestContext::new();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    req.extensions_mut().insert(ctx);

    let started = Instant::now();
    let mut res = next.run(req).await;
    let latency_ms = started.elapsed().as_millis() as u64;
    let status = res.status().as_u16();

    if res.status().is_server_error() {
        tracing::error!(request_id = %ctx.request_id(), %method, %path, status, latency_ms, "request failed");
    } else {
        tracing::info!(request_id = %ctx.request_id(), %method, %path, status, latency_ms, "request handled");
    }

    if let Ok(value) = HeaderValue::from_str(&ctx.request_id().to_string()) {
        res.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    res
}
