//! Composable middleware for axum services.
//!
//! This crate bundles three cross-cutting concerns into one ordered
//! request/response pipeline:
//!
//! - **trace propagation**: a per-request trace id, taken from the inbound
//!   `x-trace-id` header or freshly generated, available anywhere during
//!   handling via [`trace::get_trace_id`] and echoed on the response;
//! - **identity parsing**: tenant/user/staff headers copied into typed
//!   records, retrievable with the [`CurrentUser`]/[`CurrentStaff`]
//!   extractors;
//! - **response standardization**: an outermost interceptor enforcing the
//!   [`ApiResponse`] envelope on successful JSON responses.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use axum::{routing::get, Json, Router};
//! use nexus_middleware::{headers, ApiResponse, MiddlewareBuilder};
//!
//! async fn hello() -> ApiResponse<&'static str> {
//!     ApiResponse::success(Some("world"))
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let router = Router::new().route("/hello", get(hello));
//!     let app = MiddlewareBuilder::new()
//!         .with_tracing(headers::TRACE_ID)
//!         .with_identity_parsing(headers::TENANT_ID, headers::USER_ID, headers::STAFF_ID)
//!         .with_request_logging(["/health"])
//!         .with_response_standardization()
//!         .apply(router);
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8080")
//!         .await
//!         .expect("failed to bind");
//!     axum::serve(listener, app).await.expect("server error");
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod extractors;
pub mod identity;
pub mod middleware;
pub mod response;
pub mod trace;

// Re-export commonly used types
pub use config::{headers, MiddlewareBuilder, MiddlewareConfig};
pub use error::MiddlewareError;
pub use extractors::{CurrentStaff, CurrentUser};
pub use identity::{StaffInfo, UserInfo};
pub use middleware::{allow_raw_response, RawResponse};
pub use response::{ApiResponse, PageData, ERR_INVALID_RESPONSE_FORMAT, SUCCESS_CODE};
