//! Response-standardization interceptor.
//!
//! Layered outermost, this middleware inspects successful JSON responses
//! and enforces the [`ApiResponse`] envelope shape: conforming bodies pass
//! through (with the trace id injected when missing), non-conforming
//! bodies are replaced by a uniform 500 envelope. Routes can opt out with
//! [`allow_raw_response`].

use axum::{
    body::{to_bytes, Body},
    extract::Request,
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tracing::{error, warn};

use crate::config::headers;
use crate::response::{ApiResponse, ERR_INVALID_RESPONSE_FORMAT};
use crate::trace;

const BODY_PREVIEW_CHARS: usize = 200;

/// Marker carried on responses from routes exempted by
/// [`allow_raw_response`].
#[derive(Debug, Clone, Copy)]
pub struct RawResponse;

/// Route layer exempting a handler from envelope enforcement.
///
/// ```rust
/// use axum::{middleware, routing::get, Router};
/// use nexus_middleware::allow_raw_response;
///
/// let router: Router = Router::new().route(
///     "/raw",
///     get(|| async { "plain" }).route_layer(middleware::from_fn(allow_raw_response)),
/// );
/// # let _ = router;
/// ```
pub async fn allow_raw_response(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    response.extensions_mut().insert(RawResponse);
    response
}

/// Enforce the envelope shape on the final serialized response.
pub async fn standardize_response(req: Request, next: Next) -> Response {
    let path = req.uri().path().to_owned();
    let response = next.run(req).await;

    if response.extensions().get::<RawResponse>().is_some() {
        return response;
    }

    // Only successful JSON payloads are standardized; error-status
    // responses already carry their own semantics.
    if !is_json(&response) || !response.status().is_success() {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!(path = %path, error = %err, "failed to buffer response body");
            return Response::from_parts(parts, Body::empty());
        }
    };

    let document: Value = match serde_json::from_slice(&bytes) {
        Ok(value) => value,
        // Should not occur for a JSON-typed response; pass through.
        Err(_) => return Response::from_parts(parts, Body::from(bytes)),
    };

    match document {
        Value::Object(mut map) if map.contains_key("code") && map.contains_key("message") => {
            // Any non-null value counts as present; only an empty string
            // is treated like a missing id.
            let has_trace_id = map
                .get("trace_id")
                .is_some_and(|id| !id.is_null() && id.as_str() != Some(""));
            if has_trace_id {
                return Response::from_parts(parts, Body::from(bytes));
            }

            let trace_id = active_trace_id(&parts.headers);
            if trace_id.is_empty() {
                // No id to inject; the envelope stays unannotated.
                return Response::from_parts(parts, Body::from(bytes));
            }

            map.insert("trace_id".to_string(), Value::String(trace_id));
            match serde_json::to_vec(&map) {
                Ok(body) => {
                    parts.headers.remove(header::CONTENT_LENGTH);
                    Response::from_parts(parts, Body::from(body))
                }
                Err(_) => Response::from_parts(parts, Body::from(bytes)),
            }
        }
        _ => {
            let preview: String = String::from_utf8_lossy(&bytes)
                .chars()
                .take(BODY_PREVIEW_CHARS)
                .collect();
            error!(
                path = %path,
                body_preview = %preview,
                "non-conforming API response"
            );

            let trace_id = active_trace_id(&parts.headers);
            let envelope = ApiResponse::<Value> {
                code: ERR_INVALID_RESPONSE_FORMAT.to_string(),
                message: format!(
                    "handler for endpoint '{path}' did not return a standard ApiResponse envelope"
                ),
                data: None,
                trace_id: (!trace_id.is_empty()).then_some(trace_id),
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(envelope)).into_response()
        }
    }
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|content_type| content_type.starts_with("application/json"))
}

/// The trace id governing this response: the echoed response header set by
/// the pipeline, else whatever the task-local context still holds.
fn active_trace_id(response_headers: &HeaderMap) -> String {
    response_headers
        .get(headers::TRACE_ID)
        .and_then(|value| value.to_str().ok())
        .filter(|id| !id.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(trace::get_trace_id)
}
