//! Library error types.

use thiserror::Error;

/// Errors raised by this crate's own API surface.
///
/// These are synchronous configuration errors surfaced to the calling code,
/// never rendered as HTTP responses.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MiddlewareError {
    /// `ApiResponse::failure` was given the success sentinel code.
    #[error("failure responses must not use the reserved success code \"{0}\"")]
    ReservedSuccessCode(String),
}
