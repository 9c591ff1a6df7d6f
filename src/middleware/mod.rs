//! HTTP middleware components.
//!
//! - **pipeline**: the ordered per-request chain (tracing, identity,
//!   logging, trace teardown)
//! - **standardize**: the response-envelope interceptor and its opt-out
//!   route layer

pub(crate) mod pipeline;
pub mod standardize;

pub use standardize::{allow_raw_response, standardize_response, RawResponse};
