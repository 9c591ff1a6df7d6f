//! Standardized API response types.
//!
//! Every endpoint is expected to answer with an [`ApiResponse`] envelope:
//! a string `code` (`"0"` means success), a human-readable `message`, an
//! optional `data` payload, and the trace id of the request that produced
//! it. The envelope serializes all four keys explicitly (`null` where
//! unset) so clients can rely on a stable shape.

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::MiddlewareError;
use crate::trace;

/// Code carried by every successful envelope.
pub const SUCCESS_CODE: &str = "0";

/// Message carried by envelopes built with [`ApiResponse::success`].
pub const SUCCESS_MESSAGE: &str = "OK";

/// Code of the envelope synthesized when an endpoint returns a
/// non-conforming body.
pub const ERR_INVALID_RESPONSE_FORMAT: &str = "ERR_INVALID_RESPONSE_FORMAT";

/// Standard response envelope.
///
/// Both constructors snapshot the current trace id at construction time,
/// so an envelope built inside a request scope carries that request's id
/// even if serialization happens later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Status code; `"0"` means success.
    pub code: String,

    /// Human-readable outcome message.
    pub message: String,

    /// Business payload, if any.
    pub data: Option<T>,

    /// Trace id of the originating request, if one was active.
    pub trace_id: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Build a success envelope around `data`.
    pub fn success(data: Option<T>) -> Self {
        Self {
            code: SUCCESS_CODE.to_string(),
            message: SUCCESS_MESSAGE.to_string(),
            data,
            trace_id: current_trace_id(),
        }
    }

    /// Build a failure envelope.
    ///
    /// Rejects the reserved success code `"0"` — that is a programming
    /// error at the call site, not a response to send.
    pub fn failure(
        code: impl Into<String>,
        message: impl Into<String>,
        data: Option<T>,
    ) -> Result<Self, MiddlewareError> {
        let code = code.into();
        if code == SUCCESS_CODE {
            return Err(MiddlewareError::ReservedSuccessCode(code));
        }
        Ok(Self {
            code,
            message: message.into(),
            data,
            trace_id: current_trace_id(),
        })
    }

    /// Whether this envelope carries the success code.
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

fn current_trace_id() -> Option<String> {
    let id = trace::get_trace_id();
    (!id.is_empty()).then_some(id)
}

/// Paginated payload intended to ride inside [`ApiResponse::success`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageData<T> {
    /// Total number of items across all pages.
    pub total_count: u64,

    /// Items per page, at least 1.
    pub page_size: u64,

    /// Current page number, 1-indexed.
    pub page_index: u64,

    /// Items of the current page.
    pub items: Vec<T>,
}

impl<T> PageData<T> {
    /// Build a page, clamping `page_size` and `page_index` to a minimum
    /// of 1.
    pub fn new(total_count: u64, page_size: u64, page_index: u64, items: Vec<T>) -> Self {
        Self {
            total_count,
            page_size: page_size.max(1),
            page_index: page_index.max(1),
            items,
        }
    }

    /// Number of pages needed to hold `total_count` items.
    pub fn total_pages(&self) -> u64 {
        self.total_count.div_ceil(self.page_size)
    }
}
