//! Middleware configuration and fluent builder.

use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    extract::Request,
    http::HeaderName,
    middleware::{self, Next},
    Router,
};

use crate::middleware::{pipeline, standardize};

/// Conventional header names used by the default configuration.
pub mod headers {
    use axum::http::HeaderName;

    /// Inbound trace-propagation header; also the fixed name under which
    /// the trace id is echoed on responses.
    pub const TRACE_ID: HeaderName = HeaderName::from_static("x-trace-id");

    /// Tenant identifier header.
    pub const TENANT_ID: HeaderName = HeaderName::from_static("x-tenant-id");

    /// End-user identifier header.
    pub const USER_ID: HeaderName = HeaderName::from_static("x-user-id");

    /// Staff identifier header.
    pub const STAFF_ID: HeaderName = HeaderName::from_static("x-staff-id");
}

/// Immutable pipeline configuration.
///
/// Built through [`MiddlewareBuilder`]; every concern stays disabled until
/// explicitly enabled.
#[derive(Debug, Clone)]
pub struct MiddlewareConfig {
    /// Header carrying the inbound trace id.
    pub trace_header: HeaderName,

    /// Header carrying the tenant identifier.
    pub tenant_id_header: HeaderName,

    /// Header carrying the end-user identifier.
    pub user_id_header: HeaderName,

    /// Header carrying the staff identifier.
    pub staff_id_header: HeaderName,

    /// Paths excluded from request/response logging, matched exactly.
    pub log_exclude_paths: HashSet<String>,

    /// Whether trace propagation runs.
    pub tracing_enabled: bool,

    /// Whether identity parsing runs.
    pub identity_enabled: bool,

    /// Whether request/response logging runs.
    pub logging_enabled: bool,

    /// Whether the response-standardization interceptor runs.
    pub standardize_enabled: bool,
}

impl Default for MiddlewareConfig {
    fn default() -> Self {
        Self {
            trace_header: headers::TRACE_ID,
            tenant_id_header: headers::TENANT_ID,
            user_id_header: headers::USER_ID,
            staff_id_header: headers::STAFF_ID,
            log_exclude_paths: HashSet::new(),
            tracing_enabled: false,
            identity_enabled: false,
            logging_enabled: false,
            standardize_enabled: false,
        }
    }
}

/// Fluent builder for the middleware stack.
///
/// ```rust
/// use axum::Router;
/// use nexus_middleware::{headers, MiddlewareBuilder};
///
/// let router = MiddlewareBuilder::new()
///     .with_tracing(headers::TRACE_ID)
///     .with_identity_parsing(headers::TENANT_ID, headers::USER_ID, headers::STAFF_ID)
///     .with_request_logging(["/health"])
///     .with_response_standardization()
///     .apply(Router::new());
/// # let _ = router;
/// ```
#[derive(Debug, Default)]
pub struct MiddlewareBuilder {
    config: MiddlewareConfig,
}

impl MiddlewareBuilder {
    /// Start from the default (all-disabled) configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable trace propagation, reading the inbound id from `header`.
    pub fn with_tracing(mut self, header: HeaderName) -> Self {
        self.config.tracing_enabled = true;
        self.config.trace_header = header;
        self
    }

    /// Enable identity parsing from the three given headers.
    pub fn with_identity_parsing(
        mut self,
        tenant_id_header: HeaderName,
        user_id_header: HeaderName,
        staff_id_header: HeaderName,
    ) -> Self {
        self.config.identity_enabled = true;
        self.config.tenant_id_header = tenant_id_header;
        self.config.user_id_header = user_id_header;
        self.config.staff_id_header = staff_id_header;
        self
    }

    /// Enable request/response logging, skipping the given paths.
    ///
    /// Exclusion is an exact string match against the request path, not a
    /// prefix or pattern match.
    pub fn with_request_logging<I, S>(mut self, exclude_paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.logging_enabled = true;
        self.config.log_exclude_paths = exclude_paths.into_iter().map(Into::into).collect();
        self
    }

    /// Enable envelope enforcement on successful JSON responses.
    pub fn with_response_standardization(mut self) -> Self {
        self.config.standardize_enabled = true;
        self
    }

    /// Finish building and return the configuration.
    pub fn build(self) -> MiddlewareConfig {
        self.config
    }

    /// Attach the configured middleware stack to `router`.
    ///
    /// The pipeline layer is applied first; when enabled, the
    /// standardization interceptor is layered after it, making it the
    /// outermost wrapper so it observes the final serialized response.
    pub fn apply(self, router: Router) -> Router {
        let config = Arc::new(self.config);
        let standardize_enabled = config.standardize_enabled;

        let router = router.layer(middleware::from_fn(move |req: Request, next: Next| {
            pipeline::dispatch(Arc::clone(&config), req, next)
        }));

        if standardize_enabled {
            router.layer(middleware::from_fn(standardize::standardize_response))
        } else {
            router
        }
    }
}
