//! Pipeline dispatcher.
//!
//! One ordered chain runs per request: tracing, identity parsing, request
//! logging, the downstream handler, trace-id echo, response logging, trace
//! teardown. Each step is independently toggled by
//! [`MiddlewareConfig`](crate::config::MiddlewareConfig).

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{ConnectInfo, Request},
    http::{header, HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::{error, info};

use crate::config::{headers, MiddlewareConfig};
use crate::identity::{StaffInfo, UserInfo};
use crate::trace;

/// Middleware entry point, invoked once per request.
///
/// The whole chain runs inside a fresh trace scope; the scope itself is the
/// cancellation-safe backstop for teardown, the explicit token reset keeps
/// set/reset balanced within the request.
pub(crate) async fn dispatch(
    config: Arc<MiddlewareConfig>,
    req: Request,
    next: Next,
) -> Response {
    trace::scope(run(config, req, next)).await
}

async fn run(config: Arc<MiddlewareConfig>, mut req: Request, next: Next) -> Response {
    let start = Instant::now();

    let token = config.tracing_enabled.then(|| {
        let inbound = header_value(&req, &config.trace_header);
        trace::set_trace_id(inbound)
    });

    if config.identity_enabled {
        let tenant_id = header_value(&req, &config.tenant_id_header);
        let user = UserInfo {
            tenant_id: tenant_id.clone(),
            user_id: header_value(&req, &config.user_id_header),
        };
        let staff = StaffInfo {
            tenant_id,
            staff_id: header_value(&req, &config.staff_id_header),
        };
        req.extensions_mut().insert(user);
        req.extensions_mut().insert(staff);
    }

    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let should_log = config.logging_enabled && !config.log_exclude_paths.contains(&path);

    if should_log {
        let client = req
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let user_agent = req
            .headers()
            .get(header::USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("unknown");

        info!(
            method = %method,
            path = %path,
            client = %client,
            user_agent = %user_agent,
            "request started"
        );
    }

    let mut response = next.run(req).await;
    let elapsed = start.elapsed();

    if config.tracing_enabled {
        let trace_id = trace::get_trace_id();
        if !trace_id.is_empty() {
            if let Ok(value) = HeaderValue::from_str(&trace_id) {
                response.headers_mut().insert(headers::TRACE_ID, value);
            }
        }
    }

    if should_log {
        let status = response.status();
        if status.is_server_error() {
            error!(
                method = %method,
                path = %path,
                status = %status,
                elapsed_ms = %elapsed.as_millis(),
                "request failed"
            );
        } else {
            info!(
                method = %method,
                path = %path,
                status = %status,
                elapsed_ms = %elapsed.as_millis(),
                "request completed"
            );
        }
    }

    if let Some(token) = token {
        trace::reset_trace_id(token);
    }

    response
}

fn header_value(req: &Request, name: &HeaderName) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}
